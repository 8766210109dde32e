//! Lambert Conformal Conic projection.
//!
//! Daymet grids are distributed on a Lambert Conformal Conic plane with
//! standard parallels at 25°N and 60°N, origin 42.5°N 100°W. Boundary
//! polygons arrive in geographic coordinates and are projected forward onto
//! that plane so containment tests against grid cell centres are valid.

use std::f64::consts::PI;

use geo::{Coord, MapCoords, MultiPolygon};

/// Lambert Conformal Conic projection parameters.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Central meridian in radians
    lon0: f64,
    /// Earth radius (meters)
    radius: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the latitude of origin
    rho0: f64,
}

impl LambertConformal {
    /// Create a projection from its defining angles, all in degrees.
    pub fn new(lat0_deg: f64, lon0_deg: f64, latin1_deg: f64, latin2_deg: f64) -> Self {
        let to_rad = PI / 180.0;

        let lat0 = lat0_deg * to_rad;
        let lon0 = lon0_deg * to_rad;
        let latin1 = latin1_deg * to_rad;
        let latin2 = latin2_deg * to_rad;

        let radius = 6378137.0;

        // Cone constant n: tangent cone when the parallels coincide,
        // secant cone otherwise.
        let n = if (latin1 - latin2).abs() < 1e-10 {
            latin1.sin()
        } else {
            let ln_ratio = (latin1.cos() / latin2.cos()).ln();
            let tan_ratio =
                ((PI / 4.0 + latin2 / 2.0).tan() / (PI / 4.0 + latin1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };

        let f = (latin1.cos() * (PI / 4.0 + latin1 / 2.0).tan().powf(n)) / n;
        let rho0 = radius * f / (PI / 4.0 + lat0 / 2.0).tan().powf(n);

        Self {
            lon0,
            radius,
            n,
            f,
            rho0,
        }
    }

    /// The projection the Daymet v4 grids are published on.
    pub fn daymet() -> Self {
        Self::new(42.5, -100.0, 25.0, 60.0)
    }

    /// Project geographic coordinates (degrees) to plane coordinates (meters).
    ///
    /// The origin of the plane is at (lat0, lon0); x grows east, y north.
    pub fn project(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let to_rad = PI / 180.0;
        let lat = lat_deg * to_rad;
        let lon = lon_deg * to_rad;

        // Normalize longitude difference to [-π, π]
        let mut dlon = lon - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let rho = self.radius * self.f / (PI / 4.0 + lat / 2.0).tan().powf(self.n);
        let theta = self.n * dlon;

        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();

        (x, y)
    }

    /// Project every vertex of a polygon set onto the plane.
    pub fn project_geometry(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        geometry.map_coords(|coord| {
            let (x, y) = self.project(coord.x, coord.y);
            Coord { x, y }
        })
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    #[test]
    fn should_project_origin_to_zero() {
        let proj = LambertConformal::daymet();
        let (x, y) = proj.project(-100.0, 42.5);

        assert!(x.abs() < 1e-6, "x should be ~0, got {}", x);
        assert!(y.abs() < 1e-6, "y should be ~0, got {}", y);
    }

    #[test]
    fn should_keep_central_meridian_vertical() {
        let proj = LambertConformal::daymet();

        let (x_north, y_north) = proj.project(-100.0, 45.0);
        let (x_south, y_south) = proj.project(-100.0, 40.0);

        assert!(x_north.abs() < 1e-6);
        assert!(x_south.abs() < 1e-6);
        assert!(y_north > 0.0, "north of origin should have y > 0");
        assert!(y_south < 0.0, "south of origin should have y < 0");
    }

    #[test]
    fn should_place_west_of_meridian_at_negative_x() {
        let proj = LambertConformal::daymet();
        let (x, _) = proj.project(-112.0, 41.0);

        assert!(x < 0.0, "west of the central meridian should have x < 0");
    }

    #[test]
    fn should_preserve_degree_scale_roughly() {
        // One degree of latitude is ~111 km on the sphere; between the
        // standard parallels the cone shrinks it a few percent.
        let proj = LambertConformal::daymet();
        let (_, y) = proj.project(-100.0, 43.5);

        assert!(y > 95_000.0 && y < 112_000.0, "got {}", y);
    }

    #[test]
    fn should_project_polygon_vertices() {
        let proj = LambertConformal::daymet();
        let geometry = MultiPolygon::from(vec![polygon![
            (x: -101.0, y: 42.0),
            (x: -99.0, y: 42.0),
            (x: -99.0, y: 43.0),
            (x: -101.0, y: 43.0),
        ]]);

        let projected = proj.project_geometry(&geometry);
        let exterior = &projected.0[0].exterior().0;

        assert!(exterior[0].x < 0.0);
        assert!(exterior[1].x > 0.0);
    }
}
