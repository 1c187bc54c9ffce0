//! CSV report generation.
//!
//! Writes one row per kept package in sort order. Fields containing
//! commas, quotes, or newlines are quoted RFC-4180 style so scoped or
//! unusual package names cannot corrupt the file.

use crate::models::PackageSizeInfo;
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::path::Path;

/// Fixed CSV header row.
pub const CSV_HEADER: &str = "Package Name,Size (Bytes),Size (Pretty)";

/// Render the full CSV document, header included.
pub fn render_csv(packages: &[PackageSizeInfo]) -> String {
    let mut output = String::new();

    output.push_str(CSV_HEADER);
    output.push('\n');

    for package in packages {
        output.push_str(&escape_field(&package.name));
        output.push(',');
        output.push_str(&package.raw_size.to_string());
        output.push(',');
        output.push_str(&escape_field(&package.size));
        output.push('\n');
    }

    output
}

/// Write the CSV report to a file.
pub fn write_csv(packages: &[PackageSizeInfo], path: &Path) -> Result<()> {
    let content = render_csv(packages);

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write CSV report to {}", path.display()))?;

    Ok(())
}

/// Quote a field if it contains a comma, quote, or line break.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
