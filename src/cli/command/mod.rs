pub mod aggregate;
pub mod download;

use std::path::{Path, PathBuf};

pub use aggregate::aggregate;
pub use download::download;

/// File name for one sub-basin's output table, safe for the file system.
pub fn make_table_file_name(output_dir: &Path, subbasin: &str) -> PathBuf {
    let safe = subbasin.replace([' ', '/'], "_");

    output_dir.join(format!("{}_timeseries.csv", safe))
}

// -- Tests -------------------------------------------------------------------
