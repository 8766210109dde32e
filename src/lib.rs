pub mod aggregate;
pub mod cli;
pub mod download;
pub mod error;
pub mod projection;
pub mod reading;
pub mod timeseries;

pub use error::{PipelineError, Result};
