//! 3D vector primitives over `nalgebra::Vector3<f64>`.
//!
//! Raw operations (`divide`, `normalize`) follow IEEE semantics and may yield
//! inf/NaN on zero input; the `try_*` variants report degenerate geometry
//! instead. Reconstruction code only uses the checked forms.

use nalgebra::Vector3;

use crate::error::PlacementError;

pub type Vec3 = Vector3<f64>;

#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    a + b
}

#[inline]
pub fn subtract(a: Vec3, b: Vec3) -> Vec3 {
    a - b
}

#[inline]
pub fn scale(v: Vec3, s: f64) -> Vec3 {
    v * s
}

/// Component-wise division. Infinite or NaN components when `s == 0`.
#[inline]
pub fn divide(v: Vec3, s: f64) -> Vec3 {
    v / s
}

/// Division that refuses `|s| <= eps`.
pub fn try_divide(v: Vec3, s: f64, eps: f64) -> Result<Vec3, PlacementError> {
    if !s.is_finite() || s.abs() <= eps {
        return Err(PlacementError::degenerate("divisor"));
    }
    Ok(v / s)
}

#[inline]
pub fn length(v: Vec3) -> f64 {
    (v.x * v.x + v.y * v.y + v.z * v.z).sqrt()
}

/// `v / length(v)`; NaN components for the zero vector.
#[inline]
pub fn normalize(v: Vec3) -> Vec3 {
    divide(v, length(v))
}

/// Unit vector along `v`, or degenerate geometry if `length(v) <= eps`.
pub fn try_normalize(v: Vec3, eps: f64) -> Result<Vec3, PlacementError> {
    let len = length(v);
    if !len.is_finite() || len <= eps {
        return Err(PlacementError::degenerate("zero-length vector"));
    }
    Ok(v / len)
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Right-handed cross product.
#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

#[inline]
pub fn distance(a: Vec3, b: Vec3) -> f64 {
    length(a - b)
}

/// `acos` with its argument clamped to [-1, 1].
#[inline]
pub fn clamped_acos(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos()
}

/// Some unit vector orthogonal to `v`; `X` for the zero vector.
pub fn any_orthogonal(v: Vec3) -> Vec3 {
    let len = length(v);
    if len <= f64::EPSILON {
        return Vec3::x();
    }
    let n = v / len;
    // Helper axis must not be near-parallel to `n`.
    let helper = if n.y.abs() < 0.9 { Vec3::y() } else { Vec3::x() };
    normalize(cross(n, helper))
}
