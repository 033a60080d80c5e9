//! Configuration system for the DCPT prefetcher.
//!
//! This module defines the configuration structures used to size the
//! prefetcher and the replay harness. It provides:
//! 1. **Defaults:** Baseline table geometry (entries, deltas, in-flight queue, block size).
//! 2. **Structures:** `PrefetcherConfig` for the prediction core, `ReplayConfig` for the host model.
//! 3. **Validation:** Rejection of geometry that cannot describe a working table.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or use `Config::default()`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::error::ConfigError;
use crate::core::delta::DeltaWindow;

/// Default configuration constants.
///
/// The prediction core defaults come from [`crate::common::constants`]; the
/// replay harness defaults live here because only the host model uses them.
mod defaults {
    use crate::common::constants;

    pub const ENTRY_LIMIT: usize = constants::ENTRY_LIMIT;
    pub const DELTAS_ENTRY: usize = constants::DELTAS_ENTRY;
    pub const DELTA_BITFIELD_WIDTH: u32 = constants::DELTA_BITFIELD_WIDTH;
    pub const INFLIGHT_ELEMENTS: usize = constants::INFLIGHT_ELEMENTS;
    pub const BLOCK_SIZE: u64 = constants::BLOCK_SIZE;
    pub const STRIDE_SHIFT: u32 = constants::STRIDE_SHIFT;

    /// Resident blocks in the replay cache model (32 KiB of 64-byte blocks).
    pub const CACHE_BLOCKS: usize = 512;

    /// Outstanding demand misses tracked by the replay cache model.
    pub const MISS_QUEUE_ENTRIES: usize = 16;

    /// Accesses a demand miss stays outstanding before its block is resident.
    pub const MISS_LATENCY: u64 = 8;
}

/// Smallest supported delta bit-field width.
pub const MIN_DELTA_WIDTH: u32 = 2;

/// Largest supported delta bit-field width.
pub const MAX_DELTA_WIDTH: u32 = 32;

/// Largest accepted value for any table, queue, or cache capacity.
pub const MAX_CAPACITY: usize = 1 << 20;

/// Rejects a capacity of zero or above [`MAX_CAPACITY`].
fn check_capacity(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroCapacity { field });
    }
    if value > MAX_CAPACITY {
        return Err(ConfigError::CapacityTooLarge {
            field,
            value,
            max: MAX_CAPACITY,
        });
    }
    Ok(())
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use dcpt_core::config::Config;
///
/// let json = r#"{
///     "prefetcher": { "entry_limit": 64, "stride_shift": 0 },
///     "replay": { "cache_blocks": 1024 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.prefetcher.entry_limit, 64);
/// assert_eq!(config.prefetcher.deltas_per_entry, 6);
/// assert_eq!(config.prefetcher.stride_shift, 0);
/// assert_eq!(config.replay.cache_blocks, 1024);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Prediction table geometry
    #[serde(default)]
    pub prefetcher: PrefetcherConfig,
    /// Host cache model used by trace replay
    #[serde(default)]
    pub replay: ReplayConfig,
}

impl Config {
    /// Parses and validates a JSON configuration document.
    ///
    /// Omitted sections and fields take their default values.
    ///
    /// # Arguments
    ///
    /// * `json` - The configuration document.
    ///
    /// # Returns
    ///
    /// The validated configuration, or the first problem found.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Validates both sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.prefetcher.validate()?;
        self.replay.validate()
    }
}

/// Geometry of the prediction core.
///
/// Every field is fixed for the lifetime of a prefetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefetcherConfig {
    /// Maximum number of tracked instruction addresses
    #[serde(default = "PrefetcherConfig::default_entry_limit")]
    pub entry_limit: usize,

    /// Deltas remembered per instruction address
    #[serde(default = "PrefetcherConfig::default_deltas_per_entry")]
    pub deltas_per_entry: usize,

    /// Width in bits of a stored delta field
    #[serde(default = "PrefetcherConfig::default_delta_bitfield_width")]
    pub delta_bitfield_width: u32,

    /// Issued prefetches remembered for deduplication
    #[serde(default = "PrefetcherConfig::default_inflight_elements")]
    pub inflight_elements: usize,

    /// Cache block size in bytes
    #[serde(default = "PrefetcherConfig::default_block_size")]
    pub block_size: u64,

    /// Right shift applied to the block distance before storing it.
    ///
    /// The default of 1 halves every stride and drops its low bit, so a
    /// one-block stride is never recorded. Set to 0 to store full block
    /// distances. Projection always multiplies the stored value by the block
    /// size and does not undo the shift.
    #[serde(default = "PrefetcherConfig::default_stride_shift")]
    pub stride_shift: u32,
}

impl PrefetcherConfig {
    fn default_entry_limit() -> usize {
        defaults::ENTRY_LIMIT
    }

    fn default_deltas_per_entry() -> usize {
        defaults::DELTAS_ENTRY
    }

    fn default_delta_bitfield_width() -> u32 {
        defaults::DELTA_BITFIELD_WIDTH
    }

    fn default_inflight_elements() -> usize {
        defaults::INFLIGHT_ELEMENTS
    }

    fn default_block_size() -> u64 {
        defaults::BLOCK_SIZE
    }

    fn default_stride_shift() -> u32 {
        defaults::STRIDE_SHIFT
    }

    /// Returns the window of storable delta values for this bit-field width.
    ///
    /// The width must already be validated.
    pub fn window(&self) -> DeltaWindow {
        DeltaWindow::from_bitfield_width(self.delta_bitfield_width)
    }

    /// Returns the largest storable delta.
    pub fn max_delta(&self) -> i64 {
        self.window().max()
    }

    /// Checks that the geometry describes a working prefetcher.
    ///
    /// # Returns
    ///
    /// `Ok(())` if every capacity is in `1..=MAX_CAPACITY`, the block size is
    /// a power of two, the delta width is in `2..=32`, and the stride shift
    /// is below 63.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_capacity("entry_limit", self.entry_limit)?;
        check_capacity("deltas_per_entry", self.deltas_per_entry)?;
        check_capacity("inflight_elements", self.inflight_elements)?;
        if !self.block_size.is_power_of_two() {
            return Err(ConfigError::InvalidBlockSize(self.block_size));
        }
        if !(MIN_DELTA_WIDTH..=MAX_DELTA_WIDTH).contains(&self.delta_bitfield_width) {
            return Err(ConfigError::InvalidDeltaWidth {
                width: self.delta_bitfield_width,
                min: MIN_DELTA_WIDTH,
                max: MAX_DELTA_WIDTH,
            });
        }
        if self.stride_shift >= 63 {
            return Err(ConfigError::InvalidStrideShift(self.stride_shift));
        }
        Ok(())
    }
}

impl Default for PrefetcherConfig {
    fn default() -> Self {
        Self {
            entry_limit: defaults::ENTRY_LIMIT,
            deltas_per_entry: defaults::DELTAS_ENTRY,
            delta_bitfield_width: defaults::DELTA_BITFIELD_WIDTH,
            inflight_elements: defaults::INFLIGHT_ELEMENTS,
            block_size: defaults::BLOCK_SIZE,
            stride_shift: defaults::STRIDE_SHIFT,
        }
    }
}

/// Host cache model used by trace replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Resident blocks held by the model cache (fully associative, FIFO)
    #[serde(default = "ReplayConfig::default_cache_blocks")]
    pub cache_blocks: usize,

    /// Outstanding demand misses the model tracks as pending
    #[serde(default = "ReplayConfig::default_miss_queue_entries")]
    pub miss_queue_entries: usize,

    /// Accesses a demand miss stays outstanding before its block becomes resident
    #[serde(default = "ReplayConfig::default_miss_latency")]
    pub miss_latency: u64,
}

impl ReplayConfig {
    fn default_cache_blocks() -> usize {
        defaults::CACHE_BLOCKS
    }

    fn default_miss_queue_entries() -> usize {
        defaults::MISS_QUEUE_ENTRIES
    }

    fn default_miss_latency() -> u64 {
        defaults::MISS_LATENCY
    }

    /// Checks that both capacities are in `1..=MAX_CAPACITY`. A miss latency
    /// of zero is allowed and makes demand misses resident immediately.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_capacity("cache_blocks", self.cache_blocks)?;
        check_capacity("miss_queue_entries", self.miss_queue_entries)
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            cache_blocks: defaults::CACHE_BLOCKS,
            miss_queue_entries: defaults::MISS_QUEUE_ENTRIES,
            miss_latency: defaults::MISS_LATENCY,
        }
    }
}
