//! Planar polygon measurement (area and edge lengths).
//!
//! Purpose
//! - Evaluate user-drawn vertex rings in projected map units: shoelace area and
//!   per-edge Euclidean lengths.
//! - Stay pure and stateless so the evaluator is testable without any map
//!   surface attached.
//!
//! Conventions
//! - A ring is an ordered vertex list; the last vertex implicitly connects to the
//!   first. Rings emitted explicitly closed (last == first) measure the same as
//!   their open form.
//! - Which edges count as "sides" is an explicit `EdgeConvention`, never implied.
//!
//! Code cross-refs: `compute_area`, `compute_segment_lengths`, `measure_polygon`

mod error;
mod measure;
pub mod rand;
mod types;

pub use error::InvalidGeometry;
pub use measure::{
    compute_area, compute_segment_lengths, measure_polygon, perimeter, segment_lengths, signed_area,
    PolygonMeasurement,
};
pub use types::{Coord, EdgeConvention, MeasureCfg, MIN_AREA_VERTICES, MIN_SEGMENT_VERTICES};
