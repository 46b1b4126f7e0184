//! Random posed rectangles (replay tokens for reproducibility).
//!
//! Model
//! - Draw width and height uniformly, a uniformly random rotation (axis from
//!   rejection sampling in the unit ball, angle in [0, 2π)), and a center in a
//!   box around the origin.
//! - Local frame: the rectangle spans x (width) and y (height), facing +z.
//! - Optional per-coordinate jitter on the corners models hit-test noise.

use nalgebra::{Rotation3, Unit};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::quad::QuadCorners;
use crate::vec3::Vec3;

/// Sampler configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuadCfg {
    /// Centers are drawn from `[-center_extent, center_extent]^3`.
    pub center_extent: f64,
    /// Inclusive-exclusive width range (meters).
    pub width: (f64, f64),
    pub height: (f64, f64),
    /// Max absolute jitter per corner coordinate. 0 yields exact rectangles.
    pub corner_noise: f64,
}

impl Default for QuadCfg {
    fn default() -> Self {
        Self {
            center_extent: 2.0,
            width: (0.1, 1.5),
            height: (0.1, 1.5),
            corner_noise: 0.0,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer.
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

/// One drawn rectangle with its ground truth.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawnQuad {
    pub corners: QuadCorners,
    pub center: Vec3,
    pub width: f64,
    pub height: f64,
    /// Unit normal, same sign as `(BL - BR) × (BL - TL)` before noise.
    pub normal: Vec3,
}

/// Uniform in `[lo, hi)`; degenerate or non-finite ranges collapse to a bound.
fn uniform<R: Rng>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    if lo.is_finite() && hi.is_finite() && hi > lo {
        rng.gen_range(lo..hi)
    } else if lo.is_finite() {
        lo
    } else if hi.is_finite() {
        hi
    } else {
        0.0
    }
}

/// Non-negative finite magnitude; anything else means 0.
#[inline]
fn magnitude(x: f64) -> f64 {
    if x.is_finite() {
        x.max(0.0)
    } else {
        0.0
    }
}

fn random_axis<R: Rng>(rng: &mut R) -> Unit<Vec3> {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let n = v.norm();
        if n > 1e-3 && n <= 1.0 {
            return Unit::new_unchecked(v / n);
        }
    }
}

/// Draw one posed rectangle.
///
/// Negative or non-finite extents and noise are treated as 0, so every
/// returned coordinate is finite.
pub fn draw_quad(cfg: QuadCfg, tok: ReplayToken) -> DrawnQuad {
    let mut rng = tok.to_std_rng();
    let width = uniform(&mut rng, cfg.width).max(1e-6);
    let height = uniform(&mut rng, cfg.height).max(1e-6);
    let axis = random_axis(&mut rng);
    let angle = rng.gen::<f64>() * std::f64::consts::TAU;
    let rot = Rotation3::from_axis_angle(&axis, angle);
    let e = magnitude(cfg.center_extent);
    let center = Vec3::new(
        uniform(&mut rng, (-e, e)),
        uniform(&mut rng, (-e, e)),
        uniform(&mut rng, (-e, e)),
    );

    let (hw, hh) = (0.5 * width, 0.5 * height);
    let noise = magnitude(cfg.corner_noise);
    let mut place = |x: f64, y: f64| {
        let jitter = Vec3::new(
            uniform(&mut rng, (-noise, noise)),
            uniform(&mut rng, (-noise, noise)),
            uniform(&mut rng, (-noise, noise)),
        );
        center + rot * Vec3::new(x, y, 0.0) + jitter
    };
    let corners = QuadCorners::new(
        place(-hw, hh),
        place(hw, hh),
        place(-hw, -hh),
        place(hw, -hh),
    );

    DrawnQuad {
        corners,
        center,
        width,
        height,
        normal: rot * Vec3::z(),
    }
}

/// `count` consecutive draws starting at index 0.
pub fn draw_quads(cfg: QuadCfg, seed: u64, count: usize) -> Vec<DrawnQuad> {
    (0..count as u64)
        .map(|index| draw_quad(cfg, ReplayToken { seed, index }))
        .collect()
}
