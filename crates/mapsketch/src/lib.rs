//! Measure what users draw on a map.
//!
//! - `geometry`: shoelace area and edge lengths over projected vertex rings.
//! - `projection`: Web Mercator ↔ lon/lat for marker display.
//! - `surface`: capability trait for the host map plus a scoped guard.
//! - `session`: owned drawing state and its pure update functions.
//! - `report`: text rendering of a session.

pub mod geometry;
pub mod projection;
pub mod report;
pub mod session;
pub mod surface;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geometry::{
    compute_area, compute_segment_lengths, measure_polygon, Coord, EdgeConvention, InvalidGeometry,
    MeasureCfg, PolygonMeasurement,
};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::geometry::rand::{draw_point, draw_ring_radial, ReplayToken, RingCfg, VertexCount};
    pub use crate::geometry::{
        compute_area, compute_segment_lengths, measure_polygon, perimeter, segment_lengths,
        signed_area, Coord, EdgeConvention, InvalidGeometry, MeasureCfg, PolygonMeasurement,
    };
    pub use crate::projection::{from_lon_lat, to_lon_lat, LonLat, ViewCfg};
    pub use crate::session::{apply, toggle, MapSession, Marker, ModeToggles, Outcome, SessionState};
    pub use crate::surface::{
        DrawMode, HeadlessSurface, InteractionSurface, MarkerStyle, Overlay, ShapeEvent, SurfaceGuard,
    };
    pub use nalgebra::Vector2 as Vec2;
}
