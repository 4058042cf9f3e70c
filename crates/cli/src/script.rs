//! Replay scripts: user gestures as JSON, fed through a headless map session.
//!
//! ```json
//! [{"toggle": "polygon"}, {"polygon": [[0, 0], [4, 0], [0, 3]]},
//!  {"toggle": "point"}, {"point_lonlat": {"lon": 77.03, "lat": 28.46}}]
//! ```

use mapsketch::prelude::*;
use serde::Deserialize;

/// One user gesture.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Toggle(DrawMode),
    Point(Coord),
    PointLonlat(LonLat),
    Polygon(Vec<Coord>),
    PolygonLonlat(Vec<LonLat>),
}

/// Per-run counters for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub accepted: usize,
    pub rejected: usize,
    /// Gestures made while their mode was off (no event reached the session).
    pub dropped: usize,
}

/// What a replay produced.
#[derive(Debug, Clone)]
pub struct Replay {
    pub state: SessionState,
    pub tally: Tally,
    /// Overlays on the surface just before teardown.
    pub overlays: Vec<Overlay>,
}

/// Run `steps` against `surface`; the session starts with every mode off.
/// `style` overrides the default marker icon.
pub fn run(
    steps: &[Step],
    surface: &mut HeadlessSurface,
    cfg: MeasureCfg,
    style: Option<MarkerStyle>,
) -> Replay {
    let mut session = MapSession::new(surface, ModeToggles::default(), cfg);
    if let Some(style) = style {
        session = session.with_marker_style(style);
    }
    let mut tally = Tally::default();
    for step in steps {
        let event = match step {
            Step::Toggle(mode) => {
                let on = session.toggle(*mode);
                tracing::debug!(?mode, on, "toggle");
                continue;
            }
            Step::Point(p) => session.surface().finish_point(*p),
            Step::PointLonlat(ll) => session.surface().finish_point(from_lon_lat(*ll)),
            Step::Polygon(ring) => session.surface().finish_polygon(ring),
            Step::PolygonLonlat(ring) => {
                let projected: Vec<Coord> = ring.iter().map(|ll| from_lon_lat(*ll)).collect();
                session.surface().finish_polygon(&projected)
            }
        };
        match event {
            Some(ev) => {
                if session.handle(&ev).is_accepted() {
                    tally.accepted += 1;
                } else {
                    tally.rejected += 1;
                }
            }
            None => tally.dropped += 1,
        }
    }
    let overlays = session.surface().overlays.clone();
    Replay {
        state: session.finish(),
        tally,
        overlays,
    }
}
