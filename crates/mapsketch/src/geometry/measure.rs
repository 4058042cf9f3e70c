//! Shoelace area and per-edge lengths over vertex rings.
//!
//! Both operations validate before computing: too few vertices, a non-finite
//! coordinate, or a result that overflows `f64` is an `InvalidGeometry`, never a
//! number.

use serde::{Deserialize, Serialize};

use super::error::InvalidGeometry;
use super::types::{Coord, EdgeConvention, MeasureCfg, MIN_AREA_VERTICES, MIN_SEGMENT_VERTICES};

/// Derived, read-only measurement of one finished ring.
///
/// Serialized as `{ "coords": [[x, y], ..], "area": .., "sidesLength": [..] }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonMeasurement {
    #[serde(rename = "coords")]
    pub ring: Vec<Coord>,
    pub area: f64,
    pub sides_length: Vec<f64>,
}

impl PolygonMeasurement {
    /// Sum of the reported side lengths.
    #[inline]
    pub fn total_length(&self) -> f64 {
        self.sides_length.iter().sum()
    }
}

fn validate(ring: &[Coord], needed: usize) -> Result<(), InvalidGeometry> {
    if ring.len() < needed {
        return Err(InvalidGeometry::TooFewVertices {
            needed,
            got: ring.len(),
        });
    }
    if let Some(index) = ring
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite()))
    {
        return Err(InvalidGeometry::NonFinite { index });
    }
    Ok(())
}

#[inline]
fn cross(a: Coord, b: Coord) -> f64 {
    a.x * b.y - b.x * a.y
}

/// Euclidean distance without squaring first, so large coordinates keep a finite length.
#[inline]
fn edge_length(a: Coord, b: Coord) -> f64 {
    let d = b - a;
    d.x.hypot(d.y)
}

#[inline]
fn finite(value: f64) -> Result<f64, InvalidGeometry> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InvalidGeometry::Overflow)
    }
}

#[inline]
pub(crate) fn is_explicitly_closed(ring: &[Coord], eps: f64) -> bool {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() >= 2 => (last - first).norm() <= eps,
        _ => false,
    }
}

/// Signed shoelace area; positive for counter-clockwise rings.
///
/// Pre: at least 3 finite vertices.
pub fn signed_area(ring: &[Coord]) -> Result<f64, InvalidGeometry> {
    validate(ring, MIN_AREA_VERTICES)?;
    // Relative to the first vertex: same sum, far less cancellation at
    // mercator-sized offsets (~1e7 m).
    let origin = ring[0];
    let n = ring.len();
    let twice: f64 = (0..n)
        .map(|i| cross(ring[i] - origin, ring[(i + 1) % n] - origin))
        .sum();
    finite(0.5 * twice)
}

/// Enclosed area in squared input units. Orientation is not surfaced.
///
/// Returns 0 for a collinear ring.
pub fn compute_area(ring: &[Coord]) -> Result<f64, InvalidGeometry> {
    signed_area(ring).map(f64::abs)
}

/// Per-edge Euclidean lengths under an explicit closing-edge convention.
///
/// - `Open`: `n - 1` lengths, adjacent pairs only.
/// - `Closed`: adds last → first unless the ring already repeats its first
///   vertex (within `cfg.eps_closure`). A two-vertex ring reports its single
///   segment twice.
pub fn segment_lengths(ring: &[Coord], cfg: MeasureCfg) -> Result<Vec<f64>, InvalidGeometry> {
    validate(ring, MIN_SEGMENT_VERTICES)?;
    let mut out = ring
        .windows(2)
        .map(|w| finite(edge_length(w[0], w[1])))
        .collect::<Result<Vec<f64>, _>>()?;
    if cfg.convention == EdgeConvention::Closed && !is_explicitly_closed(ring, cfg.eps_closure) {
        out.push(finite(edge_length(ring[ring.len() - 1], ring[0]))?);
    }
    Ok(out)
}

/// Side lengths with the default (closed) convention.
#[inline]
pub fn compute_segment_lengths(ring: &[Coord]) -> Result<Vec<f64>, InvalidGeometry> {
    segment_lengths(ring, MeasureCfg::default())
}

/// Boundary length of the closed ring.
pub fn perimeter(ring: &[Coord]) -> Result<f64, InvalidGeometry> {
    finite(compute_segment_lengths(ring)?.into_iter().sum())
}

/// Area plus side lengths of a finished ring.
pub fn measure_polygon(ring: &[Coord], cfg: MeasureCfg) -> Result<PolygonMeasurement, InvalidGeometry> {
    let area = compute_area(ring)?;
    let sides_length = segment_lengths(ring, cfg)?;
    Ok(PolygonMeasurement {
        ring: ring.to_vec(),
        area,
        sides_length,
    })
}
