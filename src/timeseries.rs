//! Per-basin time series table and CSV serialisation.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::Result;

/// Daily values for one sub-basin: one row per date, one column per
/// variable. Missing cells stay `None` and serialise as empty fields.
#[derive(Debug, Clone)]
pub struct TimeseriesTable {
    dates: Vec<NaiveDate>,
    variables: Vec<String>,
    date_index: BTreeMap<NaiveDate, usize>,
    cells: Vec<Option<f64>>,
}

impl TimeseriesTable {
    /// Creates an empty table over the given dates and variables.
    ///
    /// Dates are sorted ascending; the variable order is fixed so every
    /// table of a run shares one header.
    pub fn new(mut dates: Vec<NaiveDate>, variables: Vec<String>) -> Self {
        dates.sort();
        dates.dedup();

        let date_index = dates.iter().enumerate().map(|(i, &d)| (d, i)).collect();
        let cells = vec![None; dates.len() * variables.len()];

        TimeseriesTable {
            dates,
            variables,
            date_index,
            cells,
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Sets one cell. Unknown dates and variables are ignored rather than
    /// growing the table; the row and column sets are fixed at creation.
    pub fn insert(&mut self, variable: &str, date: NaiveDate, value: f64) {
        let Some(&row) = self.date_index.get(&date) else {
            return;
        };
        let Some(col) = self.variables.iter().position(|v| v == variable) else {
            return;
        };

        self.cells[row * self.variables.len() + col] = Some(value);
    }

    pub fn get(&self, variable: &str, date: NaiveDate) -> Option<f64> {
        let row = *self.date_index.get(&date)?;
        let col = self.variables.iter().position(|v| v == variable)?;

        self.cells[row * self.variables.len() + col]
    }

    /// Writes the table as `date,<var>,...` with ISO dates.
    pub fn save_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        let mut header = vec!["date".to_string()];
        header.extend(self.variables.iter().cloned());
        writer.write_record(&header)?;

        for (row, date) in self.dates.iter().enumerate() {
            let mut record = vec![date.format("%Y-%m-%d").to_string()];
            for col in 0..self.variables.len() {
                let field = match self.cells[row * self.variables.len() + col] {
                    Some(value) => value.to_string(),
                    None => String::new(),
                };
                record.push(field);
            }
            writer.write_record(&record)?;
        }

        writer.flush()?;

        Ok(())
    }
}

// -- Tests -------------------------------------------------------------------
