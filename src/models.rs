//! Data models for the package size report.
//!
//! This module contains the core data structures shared between the
//! registry client, the aggregator, and the reporters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit labels for base-1024 byte formatting.
const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Size information for a single published package.
///
/// Constructed once per successful metadata fetch and never mutated
/// afterwards. `size` is always derived from `raw_size` via
/// [`format_bytes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSizeInfo {
    /// Registry package identifier, possibly scoped (e.g. `@org/pkg`).
    pub name: String,
    /// Unpacked size of the latest published version, in bytes.
    pub raw_size: u64,
    /// Human-readable rendering of `raw_size`.
    pub size: String,
}

impl PackageSizeInfo {
    /// Creates a new entry, deriving the pretty size from the byte count.
    pub fn new(name: impl Into<String>, raw_size: u64) -> Self {
        Self {
            name: name.into(),
            raw_size,
            size: format_bytes(raw_size),
        }
    }
}

impl fmt::Display for PackageSizeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.size)
    }
}

/// Formats a byte count using base-1024 scaling.
///
/// Zero renders as `"0 Byte"` (singular, no decimals). Everything else
/// picks the unit at index `floor(log(bytes) / log(1024))` from
/// {Bytes, KB, MB, GB, TB} and renders the scaled value with exactly
/// two decimal places.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Byte".to_string();
    }

    let mut index = 0;
    let mut scale: u64 = 1;
    while index < SIZE_UNITS.len() - 1 && bytes >= scale * 1024 {
        scale *= 1024;
        index += 1;
    }

    format!("{:.2} {}", bytes as f64 / scale as f64, SIZE_UNITS[index])
}
