//! Variable code and year parsed from a subset file name.

use crate::error::{PipelineError, Result};

/// Identifies the (variable, year) pair a raw grid file holds.
#[derive(Debug, Clone, PartialEq)]
pub struct FileProperties {
    pub variable: String,
    pub year: i32,
}

impl FileProperties {
    /// Parses a `<variable>_<year>subset.nc` file name.
    pub fn from_file(file_name: &str) -> Result<Self> {
        let stem = file_name
            .strip_suffix("subset.nc")
            .ok_or_else(|| PipelineError::InvalidFileName(file_name.to_string()))?;

        let (variable, year) = stem
            .rsplit_once('_')
            .ok_or_else(|| PipelineError::InvalidFileName(file_name.to_string()))?;

        if variable.is_empty() {
            return Err(PipelineError::InvalidFileName(file_name.to_string()));
        }

        let year = year
            .parse()
            .map_err(|_| PipelineError::InvalidFileName(file_name.to_string()))?;

        Ok(FileProperties {
            variable: variable.to_string(),
            year,
        })
    }
}

// -- Tests -------------------------------------------------------------------
