use anyhow::{Error, Result};
use clap::Parser;
use daymet::cli::{command, Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Download {
            output_dir,
            start_year,
            end_year,
        } => match command::download(&output_dir, start_year, end_year).await {
            Ok(manifest) => println!("Saved {} subset files to `{}`", manifest.len(), output_dir.display()),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Aggregate {
            shapefile,
            netcdf_dir,
            output_dir,
            id_column,
        } => match command::aggregate(&shapefile, &netcdf_dir, &output_dir, &id_column) {
            Ok(files) => println!("Wrote {} time series tables to `{}`", files.len(), output_dir.display()),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
