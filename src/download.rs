//! Builds and issues subset requests against the ORNL DAAC NetCDF Subset Service.

use std::{fs::File, io::Write, path::PathBuf};

use chrono::NaiveDate;
use futures::StreamExt;
use indicatif::ProgressBar;

use crate::error::{PipelineError, Result};

const NCSS_BASE_URL: &str = "https://thredds.daac.ornl.gov/thredds/ncss/ornldaac/2129";

/// Geographic subset requested from the service, in decimal degrees.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Builds the subset request URL for one (variable, year) pair.
///
/// The time window runs from Jan 1 to the last day of the Daymet calendar
/// year: Dec 31, or Dec 30 in leap years because the source fixes every
/// year at 365 days.
pub fn subset_url(region: &str, variable: &str, year: i32, bbox: &BoundingBox) -> String {
    let (start, end) = time_window(year);

    format!(
        "{NCSS_BASE_URL}/daymet_v4_daily_{region}_{variable}_{year}.nc?\
         var={variable}\
         &north={}&west={}&east={}&south={}\
         &horizStride=1\
         &time_start={}T12:00:00Z&time_end={}T12:00:00Z\
         &timeStride=1&accept=netcdf",
        bbox.north, bbox.west, bbox.east, bbox.south, start, end,
    )
}

/// Start and end dates of the 365-day Daymet year.
pub fn time_window(year: i32) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
    let last_day = if is_leap_year(year) { 30 } else { 31 };
    let end = NaiveDate::from_ymd_opt(year, 12, last_day).unwrap();

    (start, end)
}

fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// File name the aggregator expects for one (variable, year) pair.
pub fn subset_file_name(variable: &str, year: i32) -> String {
    format!("{}_{}subset.nc", variable, year)
}

/// Streams one subset response to disk, failing on a non-success status so
/// that a service error never leaves a truncated file behind as a success.
pub async fn download_subset(url: &str, file_path: PathBuf, progress_bar: &ProgressBar) -> Result<()> {
    let response = reqwest::get(url).await?;

    if !response.status().is_success() {
        return Err(PipelineError::Config(format!(
            "Subset request failed with status {}: {}",
            response.status(),
            url
        )));
    }

    let mut file = File::create(file_path)?;
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result?;
        file.write_all(&chunk)?;
        progress_bar.inc(chunk.len() as u64);
    }

    Ok(())
}

// -- Tests -------------------------------------------------------------------
