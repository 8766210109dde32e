//! Sub-basin boundary polygons loaded from a shapefile.

use std::fs;
use std::path::Path;

use geo::MultiPolygon;
use shapefile::dbase::FieldValue;
use shapefile::Shape;

use crate::error::{PipelineError, Result};

/// A named boundary polygon.
#[derive(Debug, Clone)]
pub struct Subbasin {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
}

/// Spatial reference of the boundary file, sniffed from its `.prj` sidecar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryCrs {
    /// Geographic lon/lat degrees; polygons must be projected before use.
    Geographic,
    /// Already on the Daymet Lambert Conformal Conic plane in meters.
    DaymetLcc,
}

/// Loads all polygons keyed by the identifier attribute.
pub fn load_subbasins(path: &Path, id_column: &str) -> Result<Vec<Subbasin>> {
    if !path.is_file() {
        return Err(PipelineError::Config(format!(
            "shapefile not found at `{}`",
            path.display()
        )));
    }

    let mut reader = shapefile::Reader::from_path(path)?;
    let mut subbasins = Vec::new();

    for shape_record in reader.iter_shapes_and_records() {
        let (shape, record) = shape_record?;

        let name = match record.get(id_column).cloned() {
            Some(FieldValue::Character(Some(name))) => name.trim().to_string(),
            Some(_) => {
                return Err(PipelineError::Config(format!(
                    "attribute column `{}` must hold non-empty text",
                    id_column
                )))
            }
            None => {
                let available: Vec<String> =
                    record.into_iter().map(|(field, _)| field).collect();
                return Err(PipelineError::MissingIdColumn {
                    column: id_column.to_string(),
                    available,
                });
            }
        };

        let geometry: MultiPolygon<f64> = match shape {
            Shape::Polygon(polygon) => polygon.into(),
            other => {
                return Err(PipelineError::Config(format!(
                    "unsupported shape type `{}` for sub-basin `{}`",
                    other.shapetype(),
                    name
                )))
            }
        };

        subbasins.push(Subbasin { name, geometry });
    }

    if subbasins.is_empty() {
        return Err(PipelineError::Config(format!(
            "no polygons found in `{}`",
            path.display()
        )));
    }

    Ok(subbasins)
}

/// Determines the boundary file's spatial reference.
///
/// Without a `.prj` sidecar the polygons are assumed geographic. A projected
/// CRS other than a Lambert Conformal Conic cannot be brought onto the grid
/// plane here and fails the run.
pub fn boundary_crs(shapefile_path: &Path) -> Result<BoundaryCrs> {
    let prj_path = shapefile_path.with_extension("prj");
    if !prj_path.is_file() {
        return Ok(BoundaryCrs::Geographic);
    }

    let wkt = fs::read_to_string(&prj_path)?;

    if wkt.contains("PROJCS") {
        if wkt.contains("Lambert_Conformal_Conic") {
            Ok(BoundaryCrs::DaymetLcc)
        } else {
            Err(PipelineError::CrsMismatch(format!(
                "`{}` describes a projected CRS other than Lambert Conformal Conic; \
                 reproject the shapefile to geographic coordinates first",
                prj_path.display()
            )))
        }
    } else if wkt.contains("GEOGCS") {
        Ok(BoundaryCrs::Geographic)
    } else {
        Err(PipelineError::CrsMismatch(format!(
            "`{}` holds no recognisable CRS definition",
            prj_path.display()
        )))
    }
}

// -- Tests -------------------------------------------------------------------
