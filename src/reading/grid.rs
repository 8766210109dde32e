//! Raw grid data structure and NetCDF reading logic.

use std::path::Path;

use chrono::{Duration, NaiveDate};
use netcdf::AttributeValue;

use crate::error::{PipelineError, Result};

const DEFAULT_FILL_VALUE: f32 = -9999.0;

/// One (variable, year) grid: a `(time, y, x)` array with projection-plane
/// cell coordinates in meters and one date per time step.
#[derive(Debug, Clone)]
pub struct RawGrid {
    pub variable: String,
    /// Cell centre x coordinates (meters, projection plane)
    pub x: Vec<f64>,
    /// Cell centre y coordinates (meters, projection plane)
    pub y: Vec<f64>,
    pub dates: Vec<NaiveDate>,
    pub fill_value: f32,
    /// Values in `(time, y, x)` row-major order
    pub values: Vec<f32>,
}

impl RawGrid {
    /// Reads one subset file, converting kilometre coordinates to meters.
    pub fn open(path: &Path, variable: &str) -> Result<Self> {
        let file = netcdf::open(path)?;

        let x = read_coords(&file, "x", path)?;
        let y = read_coords(&file, "y", path)?;

        let time_var = file
            .variable("time")
            .ok_or_else(|| missing_variable("time", path))?;
        let offsets = time_var.get_values::<f64, _>(..)?;
        let units = str_attribute(&time_var, "units").ok_or_else(|| {
            PipelineError::TimeDecode(format!("no time units in `{}`", path.display()))
        })?;
        let dates = decode_time(&units, &offsets)?;

        let data_var = file
            .variable(variable)
            .ok_or_else(|| missing_variable(variable, path))?;

        let dims: Vec<usize> = data_var.dimensions().iter().map(|d| d.len()).collect();
        if dims != [dates.len(), y.len(), x.len()] {
            return Err(PipelineError::InvalidGrid(format!(
                "`{}` in `{}` has shape {:?}, expected (time, y, x) = ({}, {}, {})",
                variable,
                path.display(),
                dims,
                dates.len(),
                y.len(),
                x.len(),
            )));
        }

        let fill_value = f32_attribute(&data_var, "_FillValue")
            .or_else(|| f32_attribute(&data_var, "missing_value"))
            .unwrap_or(DEFAULT_FILL_VALUE);
        let values = data_var.get_values::<f32, _>(..)?;

        Ok(RawGrid {
            variable: variable.to_string(),
            x,
            y,
            dates,
            fill_value,
            values,
        })
    }

    pub fn nx(&self) -> usize {
        self.x.len()
    }

    pub fn ny(&self) -> usize {
        self.y.len()
    }

    pub fn steps(&self) -> usize {
        self.dates.len()
    }

    /// Cell value at one time step, with the no-data sentinel mapped to None.
    pub fn value(&self, step: usize, row: usize, col: usize) -> Option<f32> {
        let v = self.values[(step * self.ny() + row) * self.nx() + col];

        if v == self.fill_value || v.is_nan() {
            None
        } else {
            Some(v)
        }
    }
}

/// Reads a 1-D coordinate variable, scaled to meters per its units attribute.
fn read_coords(file: &netcdf::File, name: &str, path: &Path) -> Result<Vec<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| missing_variable(name, path))?;
    let coords = var.get_values::<f64, _>(..)?;

    // Daymet publishes projection coordinates in kilometres.
    let scale = match str_attribute(&var, "units").as_deref() {
        Some("m") | Some("meters") => 1.0,
        _ => 1000.0,
    };

    Ok(coords.into_iter().map(|c| c * scale).collect())
}

/// Decodes a CF `days since <epoch>` time axis to calendar dates.
///
/// Daymet stamps each step at 12:00, so offsets arrive as `n + 0.5` and are
/// floored to the day.
pub fn decode_time(units: &str, offsets: &[f64]) -> Result<Vec<NaiveDate>> {
    let rest = units
        .strip_prefix("days since ")
        .ok_or_else(|| PipelineError::TimeDecode(format!("unsupported units `{}`", units)))?;
    let date_part = rest
        .split_whitespace()
        .next()
        .ok_or_else(|| PipelineError::TimeDecode(format!("unsupported units `{}`", units)))?;
    let epoch = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| PipelineError::TimeDecode(format!("bad epoch `{}`: {}", date_part, e)))?;

    Ok(offsets
        .iter()
        .map(|&offset| epoch + Duration::days(offset.floor() as i64))
        .collect())
}

fn missing_variable(name: &str, path: &Path) -> PipelineError {
    PipelineError::InvalidGrid(format!("missing variable `{}` in `{}`", name, path.display()))
}

fn str_attribute(var: &netcdf::Variable, name: &str) -> Option<String> {
    match var.attribute(name)?.value().ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

fn f32_attribute(var: &netcdf::Variable, name: &str) -> Option<f32> {
    match var.attribute(name)?.value().ok()? {
        AttributeValue::Float(v) => Some(v),
        AttributeValue::Double(v) => Some(v as f32),
        AttributeValue::Floats(v) => v.first().copied(),
        AttributeValue::Doubles(v) => v.first().map(|&d| d as f32),
        _ => None,
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn should_decode_noon_stamped_days() {
        let dates = decode_time("days since 1950-01-01 00:00:00", &[0.5, 1.5, 2.5]).unwrap();

        assert_eq!(dates[0], NaiveDate::from_ymd_opt(1950, 1, 1).unwrap());
        assert_eq!(dates[2], NaiveDate::from_ymd_opt(1950, 1, 3).unwrap());
    }

    #[test]
    fn should_reject_non_day_units() {
        let result = decode_time("hours since 1950-01-01", &[0.0]);

        assert!(matches!(result, Err(PipelineError::TimeDecode(_))));
    }

    #[test]
    fn should_read_subset_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tmin_2023subset.nc");
        write_fixture(&path);

        let grid = RawGrid::open(&path, "tmin").unwrap();

        assert_eq!(grid.nx(), 3);
        assert_eq!(grid.ny(), 2);
        assert_eq!(grid.steps(), 2);
        // kilometre coordinates scaled to meters
        assert_eq!(grid.x, vec![1000.0, 2000.0, 3000.0]);
        assert_eq!(grid.dates[0], NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(grid.value(0, 0, 0), Some(1.0));
        // fill value maps to missing
        assert_eq!(grid.value(1, 1, 2), None);
    }

    #[test]
    fn should_fail_on_missing_variable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tmin_2023subset.nc");
        write_fixture(&path);

        let result = RawGrid::open(&path, "tmax");

        assert!(matches!(result, Err(PipelineError::InvalidGrid(_))));
    }

    fn write_fixture(path: &std::path::Path) {
        let mut file = netcdf::create(path).unwrap();
        file.add_dimension("time", 2).unwrap();
        file.add_dimension("y", 2).unwrap();
        file.add_dimension("x", 3).unwrap();

        let mut time = file.add_variable::<f64>("time", &["time"]).unwrap();
        time.put_attribute("units", "days since 2023-01-01 00:00:00")
            .unwrap();
        time.put_values(&[0.5, 1.5], ..).unwrap();

        let mut x = file.add_variable::<f64>("x", &["x"]).unwrap();
        x.put_attribute("units", "km").unwrap();
        x.put_values(&[1.0, 2.0, 3.0], ..).unwrap();

        let mut y = file.add_variable::<f64>("y", &["y"]).unwrap();
        y.put_attribute("units", "km").unwrap();
        y.put_values(&[10.0, 11.0], ..).unwrap();

        let mut tmin = file.add_variable::<f32>("tmin", &["time", "y", "x"]).unwrap();
        tmin.put_attribute("_FillValue", -9999.0f32).unwrap();
        let values: Vec<f32> = vec![
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, // step 0
            7.0, 8.0, 9.0, 10.0, 11.0, -9999.0, // step 1
        ];
        tmin.put_values(&values, ..).unwrap();
    }
}
