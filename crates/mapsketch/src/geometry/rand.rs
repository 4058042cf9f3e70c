//! Random simple rings around a center (radial jitter + replay tokens).
//!
//! Purpose
//! - Deterministic stand-in for user-drawn shapes: property tests, benches and the
//!   CLI demo all draw from here.
//!
//! Model
//! - Start from `n` equally spaced angles on [0, 2π), add bounded angular and
//!   radial jitter, keep the angular order. Sorted angles around a fixed center
//!   give a star-shaped, hence simple, ring.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::Coord;

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}
impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter ring sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RingCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii = `base_radius * (1 + u)`, with `u∈[-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    pub base_radius: f64,
    pub random_phase: bool,
    pub center: Coord,
    /// Repeat the first vertex at the end, the way map drawing tools emit rings.
    pub explicitly_closed: bool,
}
impl Default for RingCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Fixed(6),
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            base_radius: 500.0,
            random_phase: true,
            center: Vector2::zeros(),
            explicitly_closed: false,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}
impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a random simple ring, counter-clockwise around `cfg.center`.
pub fn draw_ring_radial(cfg: RingCfg, tok: ReplayToken) -> Vec<Coord> {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.99);
    let r0 = cfg.base_radius.max(1e-9);
    let delta = std::f64::consts::TAU / (n as f64);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * std::f64::consts::TAU
    } else {
        0.0
    };
    let mut ring: Vec<Coord> = (0..n)
        .map(|k| {
            let jitter = (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let th = phase + (k as f64) * delta + jitter;
            let u = (rng.gen::<f64>() * 2.0 - 1.0) * rj;
            let r = (1.0 + u) * r0;
            cfg.center + Vector2::new(th.cos() * r, th.sin() * r)
        })
        .collect();
    if cfg.explicitly_closed {
        ring.push(ring[0]);
    }
    ring
}

/// Draw a single point uniformly from the disc of radius `spread` around `center`.
pub fn draw_point(center: Coord, spread: f64, tok: ReplayToken) -> Coord {
    let mut rng = tok.to_std_rng();
    let th = rng.gen::<f64>() * std::f64::consts::TAU;
    let r = spread.max(0.0) * rng.gen::<f64>().sqrt();
    center + Vector2::new(th.cos() * r, th.sin() * r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{compute_area, signed_area};

    #[test]
    fn reproducible_draw() {
        let cfg = RingCfg {
            vertex_count: VertexCount::Fixed(10),
            ..RingCfg::default()
        };
        let tok = ReplayToken { seed: 42, index: 7 };
        let a = draw_ring_radial(cfg, tok);
        let b = draw_ring_radial(cfg, tok);
        assert_eq!(a.len(), 10);
        for (p, q) in a.iter().zip(b.iter()) {
            assert!((p - q).norm() < 1e-12);
        }
        let other = draw_ring_radial(cfg, ReplayToken { seed: 42, index: 8 });
        assert!(a.iter().zip(other.iter()).any(|(p, q)| (p - q).norm() > 1e-9));
    }

    #[test]
    fn rings_are_ccw_and_bounded_by_radius() {
        let cfg = RingCfg {
            vertex_count: VertexCount::Uniform { min: 3, max: 12 },
            center: Vector2::new(8.5e6, 3.3e6),
            ..RingCfg::default()
        };
        for index in 0..32 {
            let ring = draw_ring_radial(cfg, ReplayToken { seed: 3, index });
            assert!(signed_area(&ring).unwrap() > 0.0);
            let r_max = cfg.base_radius * (1.0 + cfg.radial_jitter);
            assert!(ring.iter().all(|p| (p - cfg.center).norm() <= r_max + 1e-6));
        }
    }

    #[test]
    fn explicitly_closed_ring_repeats_first_vertex() {
        let cfg = RingCfg {
            explicitly_closed: true,
            ..RingCfg::default()
        };
        let tok = ReplayToken { seed: 9, index: 0 };
        let closed = draw_ring_radial(cfg, tok);
        assert_eq!(closed.first(), closed.last());
        let open = draw_ring_radial(
            RingCfg {
                explicitly_closed: false,
                ..cfg
            },
            tok,
        );
        assert_eq!(closed.len(), open.len() + 1);
        let (a, b) = (compute_area(&closed).unwrap(), compute_area(&open).unwrap());
        assert!((a - b).abs() < 1e-6 * a.max(1.0));
    }

    #[test]
    fn point_stays_within_spread() {
        let c = Vector2::new(1.0, -2.0);
        for index in 0..16 {
            let p = draw_point(c, 3.0, ReplayToken { seed: 5, index });
            assert!((p - c).norm() <= 3.0 + 1e-12);
        }
    }
}
