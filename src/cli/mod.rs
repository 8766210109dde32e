//! Command line interface.

pub mod command;

use std::path::PathBuf;
use std::time::Duration;

use clap::{command, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download Daymet NetCDF subsets for the configured region
    Download {
        /// Directory to write the subset files to
        #[arg(long, default_value = "daymet")]
        output_dir: PathBuf,

        /// First year to request
        #[arg(long, default_value_t = 2015)]
        start_year: i32,

        /// Last year to request (inclusive)
        #[arg(long, default_value_t = 2023)]
        end_year: i32,
    },
    /// Aggregate downloaded grids over sub-basin polygons
    Aggregate {
        /// Path to the sub-basin boundary shapefile
        #[arg(long)]
        shapefile: PathBuf,

        /// Directory containing the downloaded `.nc` files
        #[arg(long)]
        netcdf_dir: PathBuf,

        /// Directory to write the per-basin CSV files to
        #[arg(long)]
        output_dir: PathBuf,

        /// Attribute column holding unique sub-basin names
        #[arg(long)]
        id_column: String,
    },
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    ProgressBar::new(size).with_message(message).with_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    )
}
