use std::fmt;

/// Vertex input an evaluator operation refuses to measure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidGeometry {
    /// Fewer vertices than the operation needs (3 for area, 2 for lengths).
    TooFewVertices { needed: usize, got: usize },
    /// A coordinate component is NaN or infinite.
    NonFinite { index: usize },
    /// Finite coordinates whose area or lengths exceed the `f64` range.
    Overflow,
}

impl fmt::Display for InvalidGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidGeometry::TooFewVertices { needed, got } => {
                write!(f, "invalid geometry: need at least {needed} vertices, got {got}")
            }
            InvalidGeometry::NonFinite { index } => {
                write!(f, "invalid geometry: vertex {index} is not finite")
            }
            InvalidGeometry::Overflow => {
                write!(f, "invalid geometry: coordinates too large to measure")
            }
        }
    }
}

impl std::error::Error for InvalidGeometry {}
