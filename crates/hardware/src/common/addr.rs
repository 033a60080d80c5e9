//! Access events and address helpers.
//!
//! Addresses are plain 64-bit byte addresses. The host tags every memory
//! access with the address of the instruction that issued it; that tag is
//! the key the prefetcher learns per-instruction stride history under.

use std::fmt;

/// A 64-bit byte address (instruction or data).
pub type Addr = u64;

/// A single memory access observed by the prefetcher.
///
/// # Examples
///
/// ```
/// use dcpt_core::common::AccessEvent;
///
/// let ev = AccessEvent::new(0x400_100, 0x8000_0040);
/// assert_eq!(ev.to_string(), "pc=0x400100 addr=0x80000040");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AccessEvent {
    /// Address of the instruction issuing the access.
    pub pc: Addr,
    /// Memory address being accessed.
    pub addr: Addr,
}

impl AccessEvent {
    /// Creates a new access event.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the issuing instruction.
    /// * `addr` - Accessed memory address.
    #[inline]
    pub const fn new(pc: Addr, addr: Addr) -> Self {
        Self { pc, addr }
    }
}

impl fmt::Display for AccessEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pc={:#x} addr={:#x}", self.pc, self.addr)
    }
}
