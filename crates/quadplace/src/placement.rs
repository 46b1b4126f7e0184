//! Fixed-size rectangles oriented to a surface normal (2D-to-3D placement).
//!
//! Rotation that carries a reference direction onto the target normal:
//! `axis = normalize(ref × n)`, `angle = acos(clamp(ref̂ · n̂))`.
//!
//! `Reference::CenterRay` uses the target center (a ray from the world origin)
//! as the reference direction; results depend on where the origin sits.
//! `Reference::Axis` uses the rectangle's own resting facing direction, which
//! is the frame-independent form.

use serde::{Deserialize, Serialize};

use crate::cfg::GeomCfg;
use crate::error::PlacementError;
use crate::quad::{Orientation, Placement};
use crate::vec3::{self, Vec3};

/// Positive rectangle size (meters).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneSize {
    pub width: f64,
    pub height: f64,
}

impl PlaneSize {
    pub fn new(width: f64, height: f64) -> Result<Self, PlacementError> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    pub fn validate(&self) -> Result<(), PlacementError> {
        let ok = |s: f64| s.is_finite() && s > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(PlacementError::InvalidSize {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Direction rotated onto the target normal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reference {
    /// The target center's position vector.
    CenterRay,
    /// A fixed facing axis, e.g. `(0, 0, 1)` for a plane facing +z at rest.
    Axis(Vec3),
}

impl Reference {
    /// `Axis(+z)`.
    pub fn facing_z() -> Self {
        Reference::Axis(Vec3::z())
    }

    #[inline]
    fn direction(&self, center: Vec3) -> Vec3 {
        match *self {
            Reference::CenterRay => center,
            Reference::Axis(a) => a,
        }
    }
}

/// Axis + angle rotating `reference` onto `normal`.
///
/// Parallel inputs give angle 0 and anti-parallel inputs give π; in both cases the
/// cross product vanishes and the axis is some unit vector orthogonal to the
/// reference direction.
pub fn orient_to_normal(
    normal: Vec3,
    center: Vec3,
    reference: Reference,
    cfg: GeomCfg,
) -> Result<Orientation, PlacementError> {
    let r = vec3::try_normalize(reference.direction(center), cfg.eps_len)
        .map_err(|_| PlacementError::degenerate("reference direction has zero length"))?;
    let n = vec3::try_normalize(normal, cfg.eps_len)
        .map_err(|_| PlacementError::degenerate("normal has zero length"))?;

    let angle = vec3::clamped_acos(vec3::dot(r, n));
    let axis = match vec3::try_normalize(vec3::cross(r, n), cfg.eps_cross) {
        Ok(axis) => axis,
        Err(_) => vec3::any_orthogonal(r),
    };
    Ok(Orientation { axis, angle })
}

/// Place a `size` rectangle at `center`, facing along `normal`.
pub fn place_2d(
    size: PlaneSize,
    normal: Vec3,
    center: Vec3,
    reference: Reference,
    cfg: GeomCfg,
) -> Result<Placement, PlacementError> {
    size.validate()?;
    let orientation = orient_to_normal(normal, center, reference, cfg)?;
    Ok(Placement {
        position: center,
        orientation,
        width: size.width,
        height: size.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn size() -> PlaneSize {
        PlaneSize::new(0.8, 0.45).unwrap()
    }

    #[test]
    fn parallel_normal_needs_no_rotation() {
        let c = Vec3::new(0.2, -0.1, 1.5);
        let p = place_2d(size(), c * 3.0, c, Reference::CenterRay, GeomCfg::default()).unwrap();
        assert!(p.orientation.angle.abs() < 1e-7);
        assert!((vec3::length(p.orientation.axis) - 1.0).abs() < 1e-12);
        assert_eq!(p.position, c);
        assert_eq!((p.width, p.height), (0.8, 0.45));
    }

    #[test]
    fn antiparallel_normal_flips() {
        let c = Vec3::new(0.0, 1.0, -2.0);
        let o = orient_to_normal(-c, c, Reference::CenterRay, GeomCfg::default()).unwrap();
        assert!((o.angle - PI).abs() < 1e-7);
        assert!(vec3::dot(o.axis, c).abs() < 1e-12);
        // Half-turn about any perpendicular axis takes c to -c.
        let r = o.rotation().unwrap() * vec3::normalize(c);
        assert!((r + vec3::normalize(c)).norm() < 1e-7);
    }

    #[test]
    fn rotation_carries_reference_onto_normal() {
        let n = Vec3::new(1.0, 2.0, -0.5);
        let o = orient_to_normal(n, Vec3::new(4.0, 4.0, 4.0), Reference::facing_z(), GeomCfg::default())
            .unwrap();
        let r = o.rotation().unwrap() * Vec3::z();
        assert!((r - vec3::normalize(n)).norm() < 1e-9);
    }

    #[test]
    fn axis_reference_ignores_center() {
        let n = Vec3::x();
        let a = orient_to_normal(n, Vec3::new(1.0, 0.0, 0.0), Reference::facing_z(), GeomCfg::default())
            .unwrap();
        let b = orient_to_normal(n, Vec3::new(-3.0, 7.0, 2.0), Reference::facing_z(), GeomCfg::default())
            .unwrap();
        assert_eq!(a, b);
        assert!((a.angle - FRAC_PI_2).abs() < 1e-12);
        assert!((a.axis - Vec3::y()).norm() < 1e-12);
    }

    #[test]
    fn zero_vectors_are_degenerate() {
        let cfg = GeomCfg::default();
        let e = orient_to_normal(Vec3::x(), Vec3::zeros(), Reference::CenterRay, cfg).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::DegenerateGeometry);
        let e = orient_to_normal(Vec3::zeros(), Vec3::x(), Reference::CenterRay, cfg).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::DegenerateGeometry);
    }

    #[test]
    fn non_positive_size_rejected() {
        assert_eq!(
            PlaneSize::new(0.0, 1.0).unwrap_err().kind(),
            ErrorKind::InvalidSize
        );
        let bad = PlaneSize {
            width: 1.0,
            height: f64::NAN,
        };
        let e = place_2d(bad, Vec3::z(), Vec3::z(), Reference::CenterRay, GeomCfg::default());
        assert!(matches!(e, Err(PlacementError::InvalidSize { .. })));
    }
}
