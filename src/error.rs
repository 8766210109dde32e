use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP transfer error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Attribute column `{column}` not found in shapefile; available columns: {}", .available.join(", "))]
    MissingIdColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("Unresolvable coordinate reference system: {0}")]
    CrsMismatch(String),

    #[error("File name `{0}` does not match `<variable>_<year>subset.nc`")]
    InvalidFileName(String),

    #[error("No NetCDF grids found in `{}`", .0.display())]
    EmptyGridDirectory(PathBuf),

    #[error("Invalid grid structure: {0}")]
    InvalidGrid(String),

    #[error("Cannot decode time axis: {0}")]
    TimeDecode(String),

    #[error("Download failed for {failed} of {total} requests")]
    IncompleteDownload { failed: usize, total: usize },
}
