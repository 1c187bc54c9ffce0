//! Console table rendering.

use crate::models::PackageSizeInfo;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Render the kept packages as a console table, in the order given.
pub fn render_table(packages: &[PackageSizeInfo]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Package Name", "Size (Bytes)", "Size (Pretty)"]);

    for package in packages {
        table.add_row(vec![
            Cell::new(&package.name),
            Cell::new(package.raw_size).set_alignment(CellAlignment::Right),
            Cell::new(&package.size),
        ]);
    }

    table
}
