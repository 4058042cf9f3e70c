//! Spherical Web Mercator (EPSG:3857) ↔ geographic lon/lat.
//!
//! Map surfaces hand out projected metres; markers are displayed as lon/lat.
//! No datum handling: the sphere has radius `EARTH_RADIUS`.

use std::f64::consts::{FRAC_PI_4, PI};

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::geometry::Coord;

/// Sphere radius used by EPSG:3857, in metres.
pub const EARTH_RADIUS: f64 = 6_378_137.0;
/// Half the projected world width, `π R`.
pub const HALF_WORLD: f64 = PI * EARTH_RADIUS;
/// Latitude at which the square world ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;
/// Tile edge in pixels for zoom → resolution.
pub const TILE_SIZE: f64 = 256.0;

/// Geographic position in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Project lon/lat degrees to Web Mercator metres. Latitude is clamped to the
/// square world.
pub fn from_lon_lat(ll: LonLat) -> Coord {
    let lat = ll.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = EARTH_RADIUS * ll.lon.to_radians();
    let y = EARTH_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    Vector2::new(x, y.clamp(-HALF_WORLD, HALF_WORLD))
}

/// Fold a longitude into [-180, 180]; exactly 180 stays 180.
pub fn wrap_lon(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        return lon;
    }
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

/// Inverse of `from_lon_lat`. Points east or west of the projected world (the
/// map repeats horizontally) come back with longitude wrapped into [-180, 180].
pub fn to_lon_lat(p: Coord) -> LonLat {
    let lon = wrap_lon((p.x / EARTH_RADIUS).to_degrees());
    let lat = (2.0 * (p.y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    LonLat { lon, lat }
}

/// Initial map view.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewCfg {
    pub center: LonLat,
    pub zoom: f64,
}

impl Default for ViewCfg {
    fn default() -> Self {
        // Gurugram
        Self {
            center: LonLat::new(77.026344, 28.457523),
            zoom: 12.0,
        }
    }
}

impl ViewCfg {
    #[inline]
    pub fn center_projected(&self) -> Coord {
        from_lon_lat(self.center)
    }

    /// Projected metres per screen pixel at the equator for this zoom.
    #[inline]
    pub fn resolution(&self) -> f64 {
        2.0 * HALF_WORLD / TILE_SIZE / 2f64.powf(self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_origin() {
        let p = from_lon_lat(LonLat::new(0.0, 0.0));
        assert!(p.norm() < 1e-9);
        let ll = to_lon_lat(Vector2::zeros());
        assert!(ll.lon.abs() < 1e-12 && ll.lat.abs() < 1e-12);
    }

    #[test]
    fn antimeridian_is_half_world() {
        let p = from_lon_lat(LonLat::new(180.0, 0.0));
        assert!((p.x - HALF_WORLD).abs() < 1e-6);
        let top = from_lon_lat(LonLat::new(0.0, 90.0));
        assert!((top.y - HALF_WORLD).abs() < 1e-3);
    }

    #[test]
    fn longitude_wraps_past_the_antimeridian() {
        let east = to_lon_lat(Vector2::new(1.5 * HALF_WORLD, 0.0));
        assert!((east.lon + 90.0).abs() < 1e-9, "lon {}", east.lon);
        let west = to_lon_lat(Vector2::new(-1.5 * HALF_WORLD, 0.0));
        assert!((west.lon - 90.0).abs() < 1e-9, "lon {}", west.lon);
        let edge = to_lon_lat(Vector2::new(HALF_WORLD, 0.0));
        assert!((edge.lon - 180.0).abs() < 1e-9);
        assert_eq!(wrap_lon(540.0), 180.0);
        assert_eq!(wrap_lon(-540.0), -180.0);
        assert_eq!(wrap_lon(77.5), 77.5);
    }

    #[test]
    fn round_trip_default_center() {
        let view = ViewCfg::default();
        let ll = to_lon_lat(view.center_projected());
        assert!((ll.lon - view.center.lon).abs() < 1e-9);
        assert!((ll.lat - view.center.lat).abs() < 1e-9);
    }

    #[test]
    fn resolution_halves_per_zoom_level() {
        let z0 = ViewCfg {
            zoom: 0.0,
            ..ViewCfg::default()
        };
        assert!((z0.resolution() - 156_543.033_928_041).abs() < 1e-6);
        let z1 = ViewCfg { zoom: 1.0, ..z0 };
        assert!((z0.resolution() / z1.resolution() - 2.0).abs() < 1e-12);
    }
}
