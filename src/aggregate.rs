//! Maps raster grids onto boundary polygons and computes daily spatial means.
//!
//! Aggregation policy: a grid cell contributes to a polygon iff its centre
//! point lies inside the polygon boundary. No-data cells are excluded from
//! the mean; a polygon with zero contributing cells stays missing rather
//! than zero.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use geo::{Contains, MultiPolygon, Point};

use crate::cli::create_progress_bar;
use crate::error::{PipelineError, Result};
use crate::reading::{GridManifest, RawGrid, Subbasin};
use crate::timeseries::TimeseriesTable;

/// Indices `(row, col)` of the cells whose centre falls inside the polygon.
pub fn cell_mask(grid: &RawGrid, geometry: &MultiPolygon<f64>) -> Vec<(usize, usize)> {
    let mut mask = Vec::new();

    for (row, &y) in grid.y.iter().enumerate() {
        for (col, &x) in grid.x.iter().enumerate() {
            if geometry.contains(&Point::new(x, y)) {
                mask.push((row, col));
            }
        }
    }

    mask
}

/// Mean of the non-missing masked cells at one time step.
pub fn spatial_mean(grid: &RawGrid, step: usize, mask: &[(usize, usize)]) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;

    for &(row, col) in mask {
        if let Some(value) = grid.value(step, row, col) {
            sum += f64::from(value);
            count += 1;
        }
    }

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Builds one table per sub-basin across every grid in the manifest.
///
/// Sub-basin geometries must already be on the grid's projection plane.
/// An unreadable grid file is reported and skipped; the remaining files
/// still contribute.
pub fn build_tables(
    subbasins: &[Subbasin],
    manifest: &GridManifest,
) -> Result<Vec<(String, TimeseriesTable)>> {
    let variables = manifest.variables();
    let mut all_dates: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut series: Vec<BTreeMap<String, BTreeMap<NaiveDate, f64>>> =
        vec![BTreeMap::new(); subbasins.len()];

    let pb = create_progress_bar(
        manifest.file_count() as u64,
        "Aggregating grids".to_string(),
    );

    for (variable, entries) in manifest.groups() {
        for entry in entries {
            pb.set_message(format!("Aggregating {} {}", variable, entry.properties.year));
            let grid = match RawGrid::open(&entry.path, variable) {
                Ok(grid) => grid,
                Err(e) => {
                    eprintln!("Error reading `{}`: {}", entry.path.display(), e);
                    pb.inc(1);
                    continue;
                }
            };

            all_dates.extend(grid.dates.iter().copied());

            for (index, subbasin) in subbasins.iter().enumerate() {
                let mask = cell_mask(&grid, &subbasin.geometry);
                if mask.is_empty() {
                    println!(
                        "  Warning: `{}` is outside the {} {} grid extent",
                        subbasin.name, entry.properties.year, variable
                    );
                    continue;
                }

                let var_series = series[index].entry(variable.clone()).or_default();
                for (step, date) in grid.dates.iter().enumerate() {
                    if let Some(mean) = spatial_mean(&grid, step, &mask) {
                        var_series.insert(*date, mean);
                    }
                }
            }

            pb.inc(1);
        }
    }

    pb.finish_with_message("Aggregation complete");

    if all_dates.is_empty() {
        return Err(PipelineError::InvalidGrid(
            "no readable grid files contributed any dates".to_string(),
        ));
    }

    let dates: Vec<NaiveDate> = all_dates.into_iter().collect();
    let mut tables = Vec::new();

    for (index, subbasin) in subbasins.iter().enumerate() {
        let mut table = TimeseriesTable::new(dates.clone(), variables.clone());
        for (variable, per_date) in &series[index] {
            for (&date, &mean) in per_date {
                table.insert(variable, date, mean);
            }
        }
        tables.push((subbasin.name.clone(), table));
    }

    Ok(tables)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    fn grid_fixture(values: Vec<f32>) -> RawGrid {
        RawGrid {
            variable: "tmin".to_string(),
            x: vec![500.0, 1500.0, 2500.0],
            y: vec![500.0, 1500.0],
            dates: vec![
                NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
            ],
            fill_value: -9999.0,
            values,
        }
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon::from(vec![polygon![
            (x: x0, y: y0),
            (x: x1, y: y0),
            (x: x1, y: y1),
            (x: x0, y: y1),
        ]])
    }

    #[test]
    fn should_mask_cells_with_centre_inside() {
        let grid = grid_fixture(vec![0.0; 12]);
        let geometry = square(0.0, 0.0, 2000.0, 2000.0);

        let mask = cell_mask(&grid, &geometry);

        assert_eq!(mask, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn should_mask_nothing_outside_extent() {
        let grid = grid_fixture(vec![0.0; 12]);
        let geometry = square(10_000.0, 10_000.0, 20_000.0, 20_000.0);

        assert!(cell_mask(&grid, &geometry).is_empty());
    }

    #[test]
    fn should_average_masked_cells() {
        let grid = grid_fixture(vec![
            1.0, 2.0, 99.0, 4.0, 5.0, 99.0, // step 0
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0, // step 1
        ]);
        let mask = vec![(0, 0), (0, 1), (1, 0), (1, 1)];

        assert_eq!(spatial_mean(&grid, 0, &mask), Some(3.0));
    }

    #[test]
    fn should_exclude_no_data_cells_from_mean() {
        let grid = grid_fixture(vec![
            -9999.0, 2.0, 99.0, 4.0, 6.0, 99.0, // step 0
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0, // step 1
        ]);
        let mask = vec![(0, 0), (0, 1), (1, 0), (1, 1)];

        assert_eq!(spatial_mean(&grid, 0, &mask), Some(4.0));
    }

    #[test]
    fn should_report_missing_when_all_cells_are_no_data() {
        let grid = grid_fixture(vec![-9999.0; 12]);
        let mask = vec![(0, 0), (0, 1)];

        assert_eq!(spatial_mean(&grid, 0, &mask), None);
    }

    #[test]
    fn should_report_missing_for_empty_mask() {
        let grid = grid_fixture(vec![1.0; 12]);

        assert_eq!(spatial_mean(&grid, 0, &[]), None);
    }
}
