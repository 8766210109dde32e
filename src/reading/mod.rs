//! Reading raw grids and boundary polygons from disk.

pub mod boundary;
pub mod file_properties;
pub mod grid;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

pub use boundary::{boundary_crs, load_subbasins, BoundaryCrs, Subbasin};
pub use file_properties::FileProperties;
pub use grid::RawGrid;

/// One raw grid file known to the run.
#[derive(Debug, Clone)]
pub struct GridEntry {
    pub path: PathBuf,
    pub properties: FileProperties,
}

/// Explicit list of the grid files a run will consume, grouped by variable
/// and sorted by year within each group.
#[derive(Debug, Default)]
pub struct GridManifest {
    groups: BTreeMap<String, Vec<GridEntry>>,
}

impl GridManifest {
    /// Scans a directory for `<variable>_<year>subset.nc` files.
    ///
    /// A `.nc` file that does not follow the naming convention fails the
    /// scan; an empty directory is a configuration error.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut groups: BTreeMap<String, Vec<GridEntry>> = BTreeMap::new();

        for entry in dir.read_dir()? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("nc") {
                continue;
            }

            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| PipelineError::InvalidFileName(path.display().to_string()))?;
            let properties = FileProperties::from_file(file_name)?;

            groups
                .entry(properties.variable.clone())
                .or_default()
                .push(GridEntry { path, properties });
        }

        if groups.is_empty() {
            return Err(PipelineError::EmptyGridDirectory(dir.to_path_buf()));
        }

        for entries in groups.values_mut() {
            entries.sort_by_key(|e| e.properties.year);
        }

        Ok(GridManifest { groups })
    }

    /// Variable codes in their fixed output order.
    pub fn variables(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    pub fn groups(&self) -> &BTreeMap<String, Vec<GridEntry>> {
        &self.groups
    }

    pub fn file_count(&self) -> usize {
        self.groups.values().map(|v| v.len()).sum()
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs::File;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn should_group_files_by_variable_and_sort_by_year() {
        let dir = TempDir::new().unwrap();
        for name in [
            "tmin_2022subset.nc",
            "tmin_2021subset.nc",
            "prcp_2021subset.nc",
            "notes.txt",
        ] {
            File::create(dir.path().join(name)).unwrap();
        }

        let manifest = GridManifest::from_dir(dir.path()).unwrap();

        assert_eq!(manifest.variables(), vec!["prcp", "tmin"]);
        assert_eq!(manifest.file_count(), 3);

        let tmin = &manifest.groups()["tmin"];
        assert_eq!(tmin[0].properties.year, 2021);
        assert_eq!(tmin[1].properties.year, 2022);
    }

    #[test]
    fn should_fail_on_empty_directory() {
        let dir = TempDir::new().unwrap();

        let result = GridManifest::from_dir(dir.path());

        assert!(matches!(result, Err(PipelineError::EmptyGridDirectory(_))));
    }

    #[test]
    fn should_fail_on_unconventional_file_name() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("daymet_v4_tmin.nc")).unwrap();

        let result = GridManifest::from_dir(dir.path());

        assert!(matches!(result, Err(PipelineError::InvalidFileName(_))));
    }
}
