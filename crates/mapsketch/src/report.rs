//! Plain-text rendering of a session: marker list and polygon measurements.

use std::fmt::Write;

use crate::session::SessionState;

/// Render markers as `Latitude: .., Longitude: ..` and polygons with area and
/// two-decimal side lengths. Empty sections are omitted.
pub fn render(state: &SessionState) -> String {
    let mut out = String::new();
    if !state.markers.is_empty() {
        out.push_str("Added Markers:\n");
        for (i, m) in state.markers.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. Latitude: {}, Longitude: {}",
                i + 1,
                m.lon_lat.lat,
                m.lon_lat.lon
            );
        }
    }
    if !state.polygons.is_empty() {
        out.push_str("Drawn Polygon:\n");
        for p in &state.polygons {
            out.push_str("  - Type: Polygon\n");
            let _ = writeln!(out, "    Area: {} m²", p.area);
            out.push_str("    Side Lengths:\n");
            for (k, len) in p.sides_length.iter().enumerate() {
                let _ = writeln!(out, "      {}. Side {}: {:.2} m", k + 1, k + 1, len);
            }
        }
    }
    out
}
