//! Observation types and the hit-test seam.
//!
//! The detector reports rectangles in normalized image coordinates; the host
//! AR session projects each corner into world space. Both are external: this
//! module only names the data and the `HitTester` contract, and resolves all
//! four corners (or none).

use serde::{Deserialize, Serialize};

use crate::error::PlacementError;
use crate::quad::{Corner, QuadCorners};
use crate::vec3::Vec3;

/// Point in normalized (0–1) image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImagePoint {
    pub x: f64,
    pub y: f64,
}

impl ImagePoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Detector image space → hit-test view space: `(1 - y, 1 - x)`.
    ///
    /// The camera image is rotated a quarter turn and mirrored relative to the
    /// portrait view the hit-test runs against.
    #[inline]
    pub fn to_view(self) -> Self {
        Self {
            x: 1.0 - self.y,
            y: 1.0 - self.x,
        }
    }
}

/// Detected quadrilateral in image space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectangleObservation {
    pub top_left: ImagePoint,
    pub top_right: ImagePoint,
    pub bottom_left: ImagePoint,
    pub bottom_right: ImagePoint,
}

impl RectangleObservation {
    #[inline]
    pub fn get(&self, corner: Corner) -> ImagePoint {
        match corner {
            Corner::TopLeft => self.top_left,
            Corner::TopRight => self.top_right,
            Corner::BottomLeft => self.bottom_left,
            Corner::BottomRight => self.bottom_right,
        }
    }
}

/// Surfaces a hit-test may intersect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitTestKind {
    /// A plane the session already tracks.
    ExistingPlane,
    /// A horizontal plane estimated from the current frame only.
    EstimatedHorizontalPlane,
    /// A sparse feature point.
    FeaturePoint,
}

/// External hit-test collaborator.
///
/// Returns the world position of the nearest hit for a view-space point, or
/// `None` on a miss.
pub trait HitTester {
    fn hit_test(&self, point: ImagePoint, kinds: &[HitTestKind]) -> Option<Vec3>;
}

impl<F> HitTester for F
where
    F: Fn(ImagePoint, &[HitTestKind]) -> Option<Vec3>,
{
    #[inline]
    fn hit_test(&self, point: ImagePoint, kinds: &[HitTestKind]) -> Option<Vec3> {
        self(point, kinds)
    }
}

/// Hit-test all four corners (after `to_view`). The first miss aborts the quad.
pub fn resolve_corners<H: HitTester + ?Sized>(
    obs: &RectangleObservation,
    tester: &H,
    kinds: &[HitTestKind],
) -> Result<QuadCorners, PlacementError> {
    let mut world = [Vec3::zeros(); 4];
    for (slot, corner) in world.iter_mut().zip(Corner::ALL) {
        *slot = tester
            .hit_test(obs.get(corner).to_view(), kinds)
            .ok_or(PlacementError::MissingCorrespondence { corner })?;
    }
    Ok(QuadCorners::from_array(world))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn observation() -> RectangleObservation {
        RectangleObservation {
            top_left: ImagePoint::new(0.1, 0.9),
            top_right: ImagePoint::new(0.9, 0.9),
            bottom_left: ImagePoint::new(0.1, 0.1),
            bottom_right: ImagePoint::new(0.9, 0.1),
        }
    }

    /// Floor at y = 0: view (u, v) → world (u, 0, v).
    fn floor(p: ImagePoint, _kinds: &[HitTestKind]) -> Option<Vec3> {
        Some(Vec3::new(p.x, 0.0, p.y))
    }

    #[test]
    fn to_view_swaps_and_mirrors() {
        let p = ImagePoint::new(0.25, 0.75).to_view();
        assert_eq!(p, ImagePoint::new(0.25, 0.75));
        let q = ImagePoint::new(0.0, 0.5).to_view();
        assert_eq!(q, ImagePoint::new(0.5, 1.0));
    }

    #[test]
    fn resolves_in_corner_order() {
        let q = resolve_corners(&observation(), &floor, &[HitTestKind::ExistingPlane]).unwrap();
        // TL image (0.1, 0.9) → view (0.1, 0.9)
        assert!((q.top_left - Vec3::new(0.1, 0.0, 0.9)).norm() < 1e-12);
        // TR image (0.9, 0.9) → view (0.1, 0.1)
        assert!((q.top_right - Vec3::new(0.1, 0.0, 0.1)).norm() < 1e-12);
        assert!((q.bottom_right - Vec3::new(0.9, 0.0, 0.1)).norm() < 1e-12);
    }

    #[test]
    fn first_miss_names_corner() {
        // Misses everything right of the view's midline.
        let half = |p: ImagePoint, _: &[HitTestKind]| (p.x < 0.5).then(|| Vec3::new(p.x, 0.0, p.y));
        let err = resolve_corners(&observation(), &half, &[HitTestKind::FeaturePoint]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingCorrespondence);
        assert_eq!(
            err,
            PlacementError::MissingCorrespondence {
                corner: Corner::BottomLeft
            }
        );
    }

    #[test]
    fn kinds_are_forwarded() {
        let only_features = |p: ImagePoint, kinds: &[HitTestKind]| {
            kinds
                .contains(&HitTestKind::FeaturePoint)
                .then(|| Vec3::new(p.x, p.y, 1.0))
        };
        assert!(resolve_corners(&observation(), &only_features, &[HitTestKind::FeaturePoint]).is_ok());
        assert!(resolve_corners(&observation(), &only_features, &[HitTestKind::ExistingPlane]).is_err());
    }
}
