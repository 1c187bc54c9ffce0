//! Report rendering.
//!
//! This module turns the sorted package list into its two output
//! surfaces: a CSV file and a console table.

pub mod csv;
pub mod table;

pub use csv::{render_csv, write_csv};
pub use table::render_table;
