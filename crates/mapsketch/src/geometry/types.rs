//! Coordinates, edge conventions and measurement tolerances.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Projected planar coordinate `(x, y)`. No CRS validation is performed.
pub type Coord = Vector2<f64>;

/// Minimum ring length accepted by `compute_area`.
pub const MIN_AREA_VERTICES: usize = 3;
/// Minimum vertex count accepted by `compute_segment_lengths`.
pub const MIN_SEGMENT_VERTICES: usize = 2;

/// Which edges of a ring are reported as sides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeConvention {
    /// Every polygon edge, including last → first. A ring that already repeats
    /// its first vertex at the end does not get a second, zero-length closing edge.
    #[default]
    Closed,
    /// Adjacent pairs of the given sequence only (`n - 1` lengths).
    Open,
}

/// Measurement configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasureCfg {
    pub convention: EdgeConvention,
    /// Distance under which the last vertex counts as a repeat of the first.
    pub eps_closure: f64,
}

impl Default for MeasureCfg {
    fn default() -> Self {
        Self {
            convention: EdgeConvention::Closed,
            eps_closure: 1e-12,
        }
    }
}

impl MeasureCfg {
    #[inline]
    pub fn open() -> Self {
        Self {
            convention: EdgeConvention::Open,
            ..Self::default()
        }
    }
}
