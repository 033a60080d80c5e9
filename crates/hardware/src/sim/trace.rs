//! Access Trace Loader.
//!
//! Reads memory access traces into [`AccessEvent`]s. A trace is plain text
//! with one access per line:
//!
//! ```text
//! # pc        addr
//! 0x400a10    0x7ffe_0000
//! 0x400a10    0x7ffe0100
//! 4196880,    2147418624
//! ```
//!
//! 1. **Fields:** Instruction address then memory address, separated by whitespace or a comma.
//! 2. **Numbers:** Decimal, or hexadecimal with a `0x` prefix; `_` separators are allowed.
//! 3. **Comments:** Everything after `#` is ignored, as are blank lines.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::common::{AccessEvent, TraceError};

/// Parses a decimal or `0x`-prefixed hexadecimal number.
///
/// # Returns
///
/// `None` if the field is empty or not a valid number.
pub fn parse_number(field: &str) -> Option<u64> {
    let cleaned: String = field.chars().filter(|&c| c != '_').collect();
    if let Some(hex) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).ok()
    } else {
        cleaned.parse().ok()
    }
}

/// Parses one trace line.
///
/// # Arguments
///
/// * `line_no` - 1-based line number, used in errors.
/// * `line` - The raw line.
///
/// # Returns
///
/// `Ok(None)` for blank and comment-only lines, otherwise the access event.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<AccessEvent>, TraceError> {
    let body = line.split('#').next().unwrap_or_default().trim();
    if body.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = body
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|f| !f.is_empty())
        .collect();
    let [pc, addr] = fields.as_slice() else {
        return Err(TraceError::Malformed {
            line: line_no,
            text: body.to_string(),
        });
    };

    let number = |field: &str| {
        parse_number(field).ok_or_else(|| TraceError::InvalidNumber {
            line: line_no,
            field: field.to_string(),
        })
    };
    Ok(Some(AccessEvent::new(number(*pc)?, number(*addr)?)))
}

/// Streams access events from a reader, one result per non-blank line.
pub fn events<R: BufRead>(reader: R) -> impl Iterator<Item = Result<AccessEvent, TraceError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Ok(text) => parse_line(i + 1, &text).transpose(),
            Err(source) => Some(Err(TraceError::Read { line: i + 1, source })),
        })
}

/// Reads a whole trace from a reader.
pub fn read<R: BufRead>(reader: R) -> Result<Vec<AccessEvent>, TraceError> {
    events(reader).collect()
}

/// Parses a whole trace held in memory.
pub fn parse_str(text: &str) -> Result<Vec<AccessEvent>, TraceError> {
    read(text.as_bytes())
}

/// Loads a trace file from disk.
///
/// # Arguments
///
/// * `path` - Path to the trace file.
///
/// # Returns
///
/// Every access in file order, or the first error encountered.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<AccessEvent>, TraceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read(BufReader::new(file))
}
