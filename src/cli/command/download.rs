//! Download Daymet subsets for the configured region and year range.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    cli::create_spinner,
    download::{download_subset, subset_file_name, subset_url, BoundingBox},
    error::{PipelineError, Result},
};

/// Daymet v4 North America tile set.
const REGION: &str = "na";

/// Great Salt Lake drainage basin.
const BBOX: BoundingBox = BoundingBox {
    north: 43.0,
    south: 39.5,
    east: -110.5,
    west: -114.5,
};

const VARIABLES: [&str; 6] = ["prcp", "srad", "swe", "tmax", "tmin", "vp"];

/// Fetches one subset file per (variable, year) pair and returns the
/// manifest of files written. A failed pair is reported and skipped; the
/// command fails afterwards if any pair failed.
pub async fn download(output_dir: &Path, start_year: i32, end_year: i32) -> Result<Vec<PathBuf>> {
    if start_year > end_year {
        return Err(PipelineError::Config(format!(
            "start year {} is after end year {}",
            start_year, end_year
        )));
    }

    fs::create_dir_all(output_dir)?;

    let total = VARIABLES.len() * (end_year - start_year + 1) as usize;
    let mut manifest = Vec::new();
    let mut failed = 0usize;

    for year in start_year..=end_year {
        for variable in VARIABLES {
            let url = subset_url(REGION, variable, year, &BBOX);
            let file_path = output_dir.join(subset_file_name(variable, year));

            let bar = create_spinner(format!("Downloading {} {}...", variable, year));
            match download_subset(&url, file_path.clone(), &bar).await {
                Ok(()) => {
                    bar.finish_with_message(format!("{} {} downloaded", variable, year));
                    manifest.push(file_path);
                }
                Err(e) => {
                    bar.finish_with_message(format!("{} {} failed", variable, year));
                    eprintln!("Error downloading {} {}: {}", variable, year, e);
                    // Never leave a truncated file that a later run would
                    // mistake for a complete subset.
                    let _ = fs::remove_file(&file_path);
                    failed += 1;
                }
            }
        }
    }

    if failed > 0 {
        return Err(PipelineError::IncompleteDownload { failed, total });
    }

    Ok(manifest)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn should_reject_inverted_year_range() {
        let dir = TempDir::new().unwrap();

        let result = download(dir.path(), 2023, 2020).await;

        assert!(matches!(result, Err(PipelineError::Config(_))));
    }
}
