//! Session-scoped drawing state.
//!
//! State is an owned value threaded through pure update functions (`toggle`,
//! `apply`); `MapSession` is the thin driver that pairs it with a surface guard
//! and renders accepted shapes back.

use serde::{Deserialize, Serialize};

use crate::geometry::{measure_polygon, Coord, InvalidGeometry, MeasureCfg, PolygonMeasurement};
use crate::projection::LonLat;
use crate::surface::{DrawMode, InteractionSurface, MarkerStyle, Overlay, ShapeEvent, SurfaceGuard};

/// Tolerance for recognising a redrawn ring.
const SAME_RING_EPS: f64 = 1e-9;

/// Which draw interactions the user has switched on. Independent of each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeToggles {
    pub marker: bool,
    pub polygon: bool,
}

impl ModeToggles {
    #[inline]
    pub fn is_on(&self, mode: DrawMode) -> bool {
        match mode {
            DrawMode::Point => self.marker,
            DrawMode::Polygon => self.polygon,
        }
    }

    #[inline]
    pub fn set(&mut self, mode: DrawMode, on: bool) {
        match mode {
            DrawMode::Point => self.marker = on,
            DrawMode::Polygon => self.polygon = on,
        }
    }

    pub fn enabled(&self) -> Vec<DrawMode> {
        [DrawMode::Point, DrawMode::Polygon]
            .into_iter()
            .filter(|m| self.is_on(*m))
            .collect()
    }
}

/// A placed marker: projected position plus its display lon/lat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub coord: Coord,
    #[serde(flatten)]
    pub lon_lat: LonLat,
}

/// Everything drawn during one session. Append-only apart from superseded rings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub modes: ModeToggles,
    pub markers: Vec<Marker>,
    pub polygons: Vec<PolygonMeasurement>,
}

/// Result of feeding one event to `apply`.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    MarkerAdded(Marker),
    /// `superseded` holds the earlier record of the same ring, if any.
    PolygonMeasured {
        measurement: PolygonMeasurement,
        superseded: Option<PolygonMeasurement>,
    },
    /// The event's draw mode is switched off.
    Ignored { mode: DrawMode },
    /// Geometry could not be measured; state is unchanged.
    Rejected(InvalidGeometry),
}

impl Outcome {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::MarkerAdded(_) | Outcome::PolygonMeasured { .. })
    }

    /// Overlay to render for an accepted shape.
    pub fn overlay(&self, style: &MarkerStyle) -> Option<Overlay> {
        match self {
            Outcome::MarkerAdded(m) => Some(Overlay::Marker {
                coord: m.coord,
                style: style.clone(),
            }),
            Outcome::PolygonMeasured { measurement, .. } => Some(Overlay::Polygon {
                ring: measurement.ring.clone(),
            }),
            Outcome::Ignored { .. } | Outcome::Rejected(_) => None,
        }
    }
}

/// Flip one draw mode.
pub fn toggle(mut state: SessionState, mode: DrawMode) -> SessionState {
    let on = !state.modes.is_on(mode);
    state.modes.set(mode, on);
    state
}

/// Fold one completed-shape event into the state.
///
/// Markers are projected with `project`; polygons are measured under `cfg`. A
/// polygon whose ring matches an earlier one (any start vertex, either winding,
/// explicit closure ignored) replaces that record.
pub fn apply<F>(
    mut state: SessionState,
    event: &ShapeEvent,
    project: F,
    cfg: MeasureCfg,
) -> (SessionState, Outcome)
where
    F: Fn(Coord) -> LonLat,
{
    let mode = event.mode();
    if !state.modes.is_on(mode) {
        return (state, Outcome::Ignored { mode });
    }
    match event {
        ShapeEvent::Point { coord } => {
            if !(coord.x.is_finite() && coord.y.is_finite()) {
                return (state, Outcome::Rejected(InvalidGeometry::NonFinite { index: 0 }));
            }
            let marker = Marker {
                coord: *coord,
                lon_lat: project(*coord),
            };
            state.markers.push(marker.clone());
            (state, Outcome::MarkerAdded(marker))
        }
        ShapeEvent::Polygon { ring } => match measure_polygon(ring, cfg) {
            Ok(measurement) => {
                let superseded = state
                    .polygons
                    .iter()
                    .position(|p| same_ring(&p.ring, ring, SAME_RING_EPS))
                    .map(|i| state.polygons.remove(i));
                state.polygons.push(measurement.clone());
                (
                    state,
                    Outcome::PolygonMeasured {
                        measurement,
                        superseded,
                    },
                )
            }
            Err(e) => (state, Outcome::Rejected(e)),
        },
    }
}

fn strip_closure(ring: &[Coord], eps: f64) -> &[Coord] {
    match ring {
        [first, .., last] if ring.len() > 1 && (last - first).norm() <= eps => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// Same boundary up to start vertex, winding and explicit closure.
pub(crate) fn same_ring(a: &[Coord], b: &[Coord], eps: f64) -> bool {
    let a = strip_closure(a, eps);
    let b = strip_closure(b, eps);
    let n = a.len();
    if n == 0 || n != b.len() {
        return false;
    }
    let close = |p: &Coord, q: &Coord| (p - q).norm() <= eps;
    (0..n).any(|k| {
        (0..n).all(|i| close(&a[i], &b[(i + k) % n]))
            || (0..n).all(|i| close(&a[i], &b[(k + n - i) % n]))
    })
}

/// Driver pairing session state with a scoped surface.
pub struct MapSession<'a, S: InteractionSurface + ?Sized> {
    guard: SurfaceGuard<'a, S>,
    state: SessionState,
    cfg: MeasureCfg,
    marker_style: MarkerStyle,
}

impl<'a, S: InteractionSurface + ?Sized> MapSession<'a, S> {
    pub fn new(surface: &'a mut S, modes: ModeToggles, cfg: MeasureCfg) -> Self {
        let guard = SurfaceGuard::acquire(surface, &modes.enabled());
        Self {
            guard,
            state: SessionState {
                modes,
                ..SessionState::default()
            },
            cfg,
            marker_style: MarkerStyle::default(),
        }
    }

    pub fn with_marker_style(mut self, style: MarkerStyle) -> Self {
        self.marker_style = style;
        self
    }

    /// Flip a draw mode and (de)activate its surface interaction. Returns the new setting.
    pub fn toggle(&mut self, mode: DrawMode) -> bool {
        self.state = toggle(std::mem::take(&mut self.state), mode);
        let on = self.state.modes.is_on(mode);
        self.guard.set_mode(mode, on);
        on
    }

    /// Handle one completed-shape event from the surface.
    pub fn handle(&mut self, event: &ShapeEvent) -> Outcome {
        let guard = &self.guard;
        let (state, outcome) = apply(
            std::mem::take(&mut self.state),
            event,
            |p| guard.surface().to_lon_lat(p),
            self.cfg,
        );
        self.state = state;
        match &outcome {
            Outcome::MarkerAdded(m) => {
                tracing::info!(lon = m.lon_lat.lon, lat = m.lon_lat.lat, "marker added");
            }
            Outcome::PolygonMeasured {
                measurement,
                superseded,
            } => {
                tracing::info!(
                    area = measurement.area,
                    sides = measurement.sides_length.len(),
                    superseded = superseded.is_some(),
                    "polygon measured"
                );
            }
            Outcome::Ignored { mode } => tracing::debug!(?mode, "event for disabled mode ignored"),
            Outcome::Rejected(e) => tracing::warn!(error = %e, "shape rejected"),
        }
        if let Some(overlay) = outcome.overlay(&self.marker_style) {
            self.guard.surface_mut().render(overlay);
        }
        outcome
    }

    #[inline]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[inline]
    pub fn surface(&self) -> &S {
        self.guard.surface()
    }

    /// End the session: interactions and surface resources are released.
    pub fn finish(self) -> SessionState {
        let MapSession { state, .. } = self;
        state
    }
}
