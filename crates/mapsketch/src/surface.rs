//! Boundary to the host map surface.
//!
//! The surface is external: it owns tiles, layers and input handling. The core
//! only needs it as a coordinate source (completed-shape events), a projection
//! to lon/lat, and a render sink for finished overlays.
//!
//! `SurfaceGuard` scopes every acquired draw interaction to a lexical lifetime;
//! interactions and rendering resources are released in `Drop`, so teardown also
//! runs when the owner unwinds.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::geometry::Coord;
use crate::projection::{self, LonLat};

/// Drawing interaction a surface can enter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    Point,
    Polygon,
}

/// Completed-shape event, carrying raw projected coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeEvent {
    /// A point-draw gesture finished.
    Point { coord: Coord },
    /// A polygon was closed; `ring` is the outer boundary as drawn.
    Polygon { ring: Vec<Coord> },
}

impl ShapeEvent {
    #[inline]
    pub fn mode(&self) -> DrawMode {
        match self {
            ShapeEvent::Point { .. } => DrawMode::Point,
            ShapeEvent::Polygon { .. } => DrawMode::Polygon,
        }
    }
}

/// Icon style for marker overlays. The asset itself is external.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub src: String,
    pub scale: f64,
    pub cross_origin: Option<String>,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            src: "pin.png".to_string(),
            scale: 0.05,
            cross_origin: Some("anonymous".to_string()),
        }
    }
}

/// Finished shape handed back to the surface for display. Opaque to the core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Overlay {
    Marker { coord: Coord, style: MarkerStyle },
    Polygon { ring: Vec<Coord> },
}

/// Capabilities the core requires from a host map surface.
pub trait InteractionSurface {
    /// Start emitting completed-shape events for `mode`.
    fn enable_draw(&mut self, mode: DrawMode);
    /// Stop emitting events for `mode` and drop its interaction.
    fn disable_draw(&mut self, mode: DrawMode);
    /// Projected coordinate → lon/lat, pass-through precision.
    fn to_lon_lat(&self, p: Coord) -> LonLat;
    /// Show a finished shape.
    fn render(&mut self, overlay: Overlay);
    /// Release rendering resources. Called once, after all interactions are gone.
    fn dispose(&mut self);
}

/// Scoped ownership of a surface's draw interactions.
pub struct SurfaceGuard<'a, S: InteractionSurface + ?Sized> {
    surface: &'a mut S,
    active: BTreeSet<DrawMode>,
}

impl<'a, S: InteractionSurface + ?Sized> SurfaceGuard<'a, S> {
    pub fn acquire(surface: &'a mut S, modes: &[DrawMode]) -> Self {
        let mut guard = Self {
            surface,
            active: BTreeSet::new(),
        };
        for &mode in modes {
            guard.set_mode(mode, true);
        }
        tracing::debug!(modes = ?guard.active, "surface acquired");
        guard
    }

    /// Enable or disable one interaction; no-op if already in that state.
    pub fn set_mode(&mut self, mode: DrawMode, on: bool) {
        if on && self.active.insert(mode) {
            self.surface.enable_draw(mode);
            tracing::debug!(?mode, "draw interaction enabled");
        } else if !on && self.active.remove(&mode) {
            self.surface.disable_draw(mode);
            tracing::debug!(?mode, "draw interaction disabled");
        }
    }

    #[inline]
    pub fn is_active(&self, mode: DrawMode) -> bool {
        self.active.contains(&mode)
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &*self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut *self.surface
    }
}

impl<S: InteractionSurface + ?Sized> Drop for SurfaceGuard<'_, S> {
    fn drop(&mut self) {
        let modes: Vec<DrawMode> = self.active.iter().copied().collect();
        for mode in modes {
            self.set_mode(mode, false);
        }
        self.surface.dispose();
        tracing::debug!("surface released");
    }
}

/// In-memory surface: Web Mercator projection, recorded overlays.
///
/// Shape gestures only produce events while their mode is enabled, and polygon
/// rings come back explicitly closed, as browser map libraries emit them.
#[derive(Clone, Debug, Default)]
pub struct HeadlessSurface {
    pub enabled: BTreeSet<DrawMode>,
    pub overlays: Vec<Overlay>,
    pub disposed: bool,
    /// Count of interactions torn down via `disable_draw`.
    pub released: usize,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate finishing a point gesture.
    pub fn finish_point(&self, coord: Coord) -> Option<ShapeEvent> {
        self.enabled
            .contains(&DrawMode::Point)
            .then_some(ShapeEvent::Point { coord })
    }

    /// Simulate closing a polygon gesture.
    pub fn finish_polygon(&self, ring: &[Coord]) -> Option<ShapeEvent> {
        if !self.enabled.contains(&DrawMode::Polygon) {
            return None;
        }
        let mut ring = ring.to_vec();
        if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
            if first != last {
                ring.push(first);
            }
        }
        Some(ShapeEvent::Polygon { ring })
    }
}

impl InteractionSurface for HeadlessSurface {
    fn enable_draw(&mut self, mode: DrawMode) {
        self.enabled.insert(mode);
    }

    fn disable_draw(&mut self, mode: DrawMode) {
        if self.enabled.remove(&mode) {
            self.released += 1;
        }
    }

    fn to_lon_lat(&self, p: Coord) -> LonLat {
        projection::to_lon_lat(p)
    }

    fn render(&mut self, overlay: Overlay) {
        self.overlays.push(overlay);
    }

    fn dispose(&mut self) {
        self.overlays.clear();
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn guard_releases_interactions_on_drop() {
        let mut surface = HeadlessSurface::new();
        {
            let mut guard = SurfaceGuard::acquire(&mut surface, &[DrawMode::Point, DrawMode::Polygon]);
            assert!(guard.is_active(DrawMode::Point));
            guard.surface_mut().render(Overlay::Polygon { ring: vec![] });
            assert_eq!(guard.surface().overlays.len(), 1);
        }
        assert!(surface.enabled.is_empty());
        assert_eq!(surface.released, 2);
        assert!(surface.disposed);
        assert!(surface.overlays.is_empty());
    }

    #[test]
    fn guard_releases_on_unwind() {
        let mut surface = HeadlessSurface::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = SurfaceGuard::acquire(&mut surface, &[DrawMode::Polygon]);
            panic!("host unmounted abnormally");
        }));
        assert!(result.is_err());
        assert!(surface.disposed);
        assert!(surface.enabled.is_empty());
    }

    #[test]
    fn set_mode_is_idempotent() {
        let mut surface = HeadlessSurface::new();
        {
            let mut guard = SurfaceGuard::acquire(&mut surface, &[]);
            guard.set_mode(DrawMode::Point, true);
            guard.set_mode(DrawMode::Point, true);
            guard.set_mode(DrawMode::Point, false);
            guard.set_mode(DrawMode::Point, false);
            assert!(!guard.is_active(DrawMode::Point));
        }
        assert_eq!(surface.released, 1);
    }

    #[test]
    fn gestures_require_enabled_mode() {
        let mut surface = HeadlessSurface::new();
        assert!(surface.finish_point(vector![1.0, 2.0]).is_none());
        surface.enable_draw(DrawMode::Polygon);
        let ev = surface
            .finish_polygon(&[vector![0.0, 0.0], vector![1.0, 0.0], vector![0.0, 1.0]])
            .expect("polygon mode enabled");
        match ev {
            ShapeEvent::Polygon { ring } => {
                assert_eq!(ring.len(), 4);
                assert_eq!(ring[0], ring[3]);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn shape_event_json_is_tagged() {
        let ev: ShapeEvent = serde_json::from_str(r#"{"type":"point","coord":[1.5,-2.0]}"#).unwrap();
        assert_eq!(ev, ShapeEvent::Point { coord: vector![1.5, -2.0] });
        assert_eq!(ev.mode(), DrawMode::Point);
    }
}
