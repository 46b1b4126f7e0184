//! Four corners → oriented rectangular plane.
//!
//! Model
//! - Size from the bottom edge (width) and left edge (height).
//! - Position at the TL–BR diagonal midpoint.
//! - Axis `(BL - BR) × (BL - TL)`: the plane normal, sign set by winding.
//! - Angle between `axis × dir(TR - BR)` and `axis × dir(midRight - BR)`, where
//!   `midRight` is the midpoint of the right edge. Both project the right edge
//!   into the plane; the arccosine argument is clamped.
//! - Degeneracy checks compare sines, not raw lengths, so they hold at any scale.

use crate::cfg::GeomCfg;
use crate::error::PlacementError;
use crate::vec3::{self, Vec3};

use super::types::{Orientation, Placement, QuadCorners};

/// Finite and strictly above `eps` (NaN fails).
#[inline]
fn above(x: f64, eps: f64) -> bool {
    x.is_finite() && x > eps
}

/// `(width, height)` = `(|BR - BL|, |BL - TL|)`.
#[inline]
pub fn quad_dimensions(q: &QuadCorners) -> (f64, f64) {
    (
        vec3::distance(q.bottom_right, q.bottom_left),
        vec3::distance(q.bottom_left, q.top_left),
    )
}

/// Reconstruct the plane coincident with `q`.
///
/// Errors with `DegenerateGeometry` for zero-length edges, collinear corners,
/// or a right edge along the normal. All checks are relative to the quad's own
/// size, so millimetre and kilometre quads are treated alike.
pub fn reconstruct_quad(q: &QuadCorners, cfg: GeomCfg) -> Result<Placement, PlacementError> {
    let (width, height) = quad_dimensions(q);
    if !above(width, cfg.eps_len) {
        return Err(PlacementError::degenerate("bottom edge has zero length"));
    }
    if !above(height, cfg.eps_len) {
        return Err(PlacementError::degenerate("left edge has zero length"));
    }

    let br = q.bottom_right;
    let center = q.diagonal_center();
    let mid_right = br + (q.top_right - br) * 0.5;
    let n = unit_normal(q, width, height, cfg)?;

    // Unit edge directions keep |u| and |v| as sines, independent of scale.
    let right = vec3::try_normalize(q.top_right - br, cfg.eps_len)
        .map_err(|_| PlacementError::degenerate("right edge has zero length"))?;
    let half_right = vec3::try_normalize(mid_right - br, cfg.eps_len)
        .map_err(|_| PlacementError::degenerate("right edge has zero length"))?;
    let u = vec3::cross(n, right);
    let v = vec3::cross(n, half_right);
    let denom = vec3::length(u) * vec3::length(v);
    if !above(denom, cfg.eps_cross) {
        return Err(PlacementError::degenerate("right edge parallel to normal"));
    }
    let angle = vec3::clamped_acos(vec3::dot(u, v) / denom);

    Ok(Placement {
        position: center,
        orientation: Orientation {
            axis: n,
            angle,
        },
        width,
        height,
    })
}

/// `(BL - BR) × (BL - TL)`, normalized.
///
/// `|axis| / (width * height)` is the sine between the bottom and left edges;
/// below `eps_len` the corners count as collinear.
fn unit_normal(q: &QuadCorners, width: f64, height: f64, cfg: GeomCfg) -> Result<Vec3, PlacementError> {
    let axis = vec3::cross(
        q.bottom_left - q.bottom_right,
        q.bottom_left - q.top_left,
    );
    let len = vec3::length(axis);
    if !above(len / (width * height), cfg.eps_len) {
        return Err(PlacementError::degenerate("corners are collinear"));
    }
    Ok(axis / len)
}

/// Unit plane normal from the reconstruction axis (same sign convention).
pub fn quad_normal(q: &QuadCorners, cfg: GeomCfg) -> Result<Vec3, PlacementError> {
    let (width, height) = quad_dimensions(q);
    if !above(width, cfg.eps_len) || !above(height, cfg.eps_len) {
        return Err(PlacementError::degenerate("edge has zero length"));
    }
    unit_normal(q, width, height, cfg)
}
