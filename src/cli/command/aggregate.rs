//! Aggregate downloaded grids over sub-basin polygons.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    aggregate::build_tables,
    error::{PipelineError, Result},
    projection::LambertConformal,
    reading::{boundary_crs, load_subbasins, BoundaryCrs, GridManifest, Subbasin},
};

use super::make_table_file_name;

pub fn aggregate(
    shapefile: &Path,
    netcdf_dir: &Path,
    output_dir: &Path,
    id_column: &str,
) -> Result<Vec<PathBuf>> {
    if !netcdf_dir.is_dir() {
        return Err(PipelineError::Config(format!(
            "NetCDF directory not found at `{}`",
            netcdf_dir.display()
        )));
    }

    let subbasins = load_subbasins(shapefile, id_column)?;
    println!("Found {} sub-basins to process.", subbasins.len());

    let subbasins = match boundary_crs(shapefile)? {
        BoundaryCrs::Geographic => {
            println!("Projecting sub-basins onto the Daymet grid plane...");
            let projection = LambertConformal::daymet();
            subbasins
                .into_iter()
                .map(|subbasin| Subbasin {
                    geometry: projection.project_geometry(&subbasin.geometry),
                    name: subbasin.name,
                })
                .collect()
        }
        BoundaryCrs::DaymetLcc => subbasins,
    };

    let manifest = GridManifest::from_dir(netcdf_dir)?;
    println!("Found variables: {}", manifest.variables().join(", "));

    fs::create_dir_all(output_dir)?;

    let tables = build_tables(&subbasins, &manifest)?;

    let mut written = Vec::new();
    for (name, table) in tables {
        let path = make_table_file_name(output_dir, &name);
        println!("Writing file: {}", path.display());
        table.save_csv(&path)?;
        written.push(path);
    }

    Ok(written)
}
