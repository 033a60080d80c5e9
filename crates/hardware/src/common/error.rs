//! Error types for the outer surfaces of the prefetcher.
//!
//! The prediction core itself never fails: zero strides are dropped,
//! out-of-range strides are clamped, and full tables evict. Errors only
//! arise when building a prefetcher from user input:
//! 1. **Configuration:** Geometry that cannot describe a working table.
//! 2. **Traces:** Unreadable files or malformed access records.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Rejected prefetcher or replay configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A capacity that must be non-zero was zero.
    #[error("`{field}` must be greater than zero")]
    ZeroCapacity {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A capacity exceeded the supported maximum.
    #[error("`{field}` must be at most {max}, got {value}")]
    CapacityTooLarge {
        /// Name of the offending field.
        field: &'static str,
        /// Requested capacity.
        value: usize,
        /// Largest accepted capacity.
        max: usize,
    },

    /// Block size is zero or not a power of two.
    #[error("block size must be a non-zero power of two, got {0}")]
    InvalidBlockSize(u64),

    /// Delta bit-field width is outside the supported range.
    #[error("delta bit-field width must be between {min} and {max} bits, got {width}")]
    InvalidDeltaWidth {
        /// Requested width.
        width: u32,
        /// Smallest supported width.
        min: u32,
        /// Largest supported width.
        max: u32,
    },

    /// Stride shift would discard the whole block distance.
    #[error("stride shift must be below 63, got {0}")]
    InvalidStrideShift(u32),

    /// The configuration document could not be parsed.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("cannot read configuration {path}: {source}")]
    Io {
        /// File that failed to open or read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Failure while loading an access trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be opened or read.
    #[error("cannot read trace {path}: {source}")]
    Io {
        /// File that failed to open or read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A read from an already-open trace stream failed.
    #[error("trace read failed at line {line}: {source}")]
    Read {
        /// 1-based line number being read.
        line: usize,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A line did not contain exactly two fields.
    #[error("line {line}: expected `<pc> <addr>`, got {text:?}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// Offending line, trimmed.
        text: String,
    },

    /// A field was not a valid decimal or `0x` hexadecimal number.
    #[error("line {line}: invalid number {field:?}")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// Offending field.
        field: String,
    },
}
