//! Per-frame pipeline: observations → pending overlays.
//!
//! Each call is independent and returns a `FrameReport` by value; the caller
//! (renderer) owns every scene mutation. A quad that fails anywhere is skipped
//! whole and recorded in `FrameReport::skipped`.

use serde::{Deserialize, Serialize};

use crate::cfg::{GeomCfg, PlacementCfg};
use crate::detect::{resolve_corners, HitTestKind, HitTester, RectangleObservation};
use crate::error::PlacementError;
use crate::placement::place_2d;
use crate::quad::{reconstruct_quad, Outline, Placement, QuadCorners, QuadMesh};

/// Which overlay to build for each detected rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Corners lie on a tracked plane: fill the reconstructed quad.
    #[default]
    OnExistingPlane,
    /// Corners come from feature points: place a fixed-size stand-in.
    InTheAir,
}

impl Variant {
    pub fn hit_kinds(self) -> &'static [HitTestKind] {
        match self {
            Variant::OnExistingPlane => &[
                HitTestKind::ExistingPlane,
                HitTestKind::EstimatedHorizontalPlane,
            ],
            Variant::InTheAir => &[HitTestKind::FeaturePoint],
        }
    }
}

/// Geometry for one rectangle, ready to hand to a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub variant: Variant,
    pub placement: Placement,
    /// Filled quad; `None` for the in-air stand-in.
    pub mesh: Option<QuadMesh>,
    pub outline: Outline,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Skipped {
    /// Position of the observation within the frame's input.
    pub index: usize,
    #[serde(serialize_with = "ser_error")]
    pub error: PlacementError,
}

fn ser_error<S: serde::Serializer>(e: &PlacementError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(e)
}

/// Pending overlays plus skipped entries for one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FrameReport {
    pub overlays: Vec<Overlay>,
    pub skipped: Vec<Skipped>,
}

impl FrameReport {
    pub fn push(&mut self, index: usize, result: Result<Overlay, PlacementError>) {
        match result {
            Ok(overlay) => self.overlays.push(overlay),
            Err(error) => {
                tracing::debug!(index, %error, "quad skipped");
                self.skipped.push(Skipped { index, error });
            }
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty() && self.skipped.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameProcessor {
    pub variant: Variant,
    pub placement: PlacementCfg,
    pub geom: GeomCfg,
}

impl FrameProcessor {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Overlay for one resolved quad.
    ///
    /// - `OnExistingPlane`: reconstructed plane, its mesh, all four boundary segments.
    /// - `InTheAir`: `placement.size` rectangle at the diagonal midpoint, facing
    ///   `(TR - TL) × (BL - TL)`, plus the boundary segments.
    pub fn overlay_for(&self, q: &QuadCorners) -> Result<Overlay, PlacementError> {
        let outline = Outline::from_corners(q);
        let (placement, mesh) = match self.variant {
            Variant::OnExistingPlane => (
                reconstruct_quad(q, self.geom)?,
                Some(QuadMesh::from_corners(q)),
            ),
            Variant::InTheAir => (
                place_2d(
                    self.placement.size,
                    q.edge_normal(),
                    q.diagonal_center(),
                    self.placement.reference,
                    self.geom,
                )?,
                None,
            ),
        };
        Ok(Overlay {
            variant: self.variant,
            placement,
            mesh,
            outline,
        })
    }

    /// Resolve and reconstruct every observation in a frame.
    pub fn process<H: HitTester + ?Sized>(
        &self,
        observations: &[RectangleObservation],
        tester: &H,
    ) -> FrameReport {
        let kinds = self.variant.hit_kinds();
        self.process_quads(
            observations
                .iter()
                .map(|obs| resolve_corners(obs, tester, kinds)),
        )
    }

    /// Reconstruct already-resolved corner sets; `Err` entries are carried as skips.
    pub fn process_quads<I>(&self, quads: I) -> FrameReport
    where
        I: IntoIterator<Item = Result<QuadCorners, PlacementError>>,
    {
        let mut report = FrameReport::default();
        for (index, quad) in quads.into_iter().enumerate() {
            report.push(index, quad.and_then(|q| self.overlay_for(&q)));
        }
        tracing::trace!(
            variant = ?self.variant,
            overlays = report.overlays.len(),
            skipped = report.skipped.len(),
            "frame processed"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::ImagePoint;
    use crate::error::ErrorKind;
    use crate::placement::Reference;
    use crate::quad::Edge;
    use crate::vec3::{self, Vec3};

    /// Floor at y = 0 that misses a circular hole around view (0.5, 0.5).
    struct HoleyFloor {
        hole_radius: f64,
    }

    impl HitTester for HoleyFloor {
        fn hit_test(&self, p: ImagePoint, kinds: &[HitTestKind]) -> Option<Vec3> {
            if !kinds.contains(&HitTestKind::ExistingPlane) {
                return None;
            }
            let d = ((p.x - 0.5).powi(2) + (p.y - 0.5).powi(2)).sqrt();
            (d >= self.hole_radius).then(|| Vec3::new(p.x, 0.0, p.y))
        }
    }

    fn square(lo: f64, hi: f64) -> RectangleObservation {
        RectangleObservation {
            top_left: ImagePoint::new(lo, hi),
            top_right: ImagePoint::new(hi, hi),
            bottom_left: ImagePoint::new(lo, lo),
            bottom_right: ImagePoint::new(hi, lo),
        }
    }

    fn unit_square() -> QuadCorners {
        QuadCorners::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
        )
    }

    #[test]
    fn missing_corner_skips_only_that_quad() {
        let floor = HoleyFloor { hole_radius: 0.2 };
        // Second square has a corner at view (0.55, 0.55), inside the hole.
        let frame = [square(0.1, 0.9), square(0.45, 0.8), square(0.0, 1.0)];
        let report = FrameProcessor::new(Variant::OnExistingPlane).process(&frame, &floor);
        assert_eq!(report.overlays.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].index, 1);
        assert_eq!(
            report.skipped[0].error.kind(),
            ErrorKind::MissingCorrespondence
        );
    }

    #[test]
    fn in_the_air_uses_feature_points() {
        let floor = HoleyFloor { hole_radius: 0.0 };
        let report = FrameProcessor::new(Variant::InTheAir).process(&[square(0.1, 0.9)], &floor);
        assert!(report.overlays.is_empty());
        assert!(matches!(
            report.skipped[0].error,
            PlacementError::MissingCorrespondence { .. }
        ));
    }

    #[test]
    fn on_plane_overlay_has_mesh_and_bottom_edge() {
        let o = FrameProcessor::new(Variant::OnExistingPlane)
            .overlay_for(&unit_square())
            .unwrap();
        assert!(o.mesh.is_some());
        assert_eq!(o.outline.segment(Edge::Bottom).to, Vec3::new(1.0, 0.0, 1.0));
        assert!((o.placement.width - 1.0).abs() < 1e-12);
    }

    #[test]
    fn in_the_air_places_fixed_size_standin() {
        let fp = FrameProcessor {
            variant: Variant::InTheAir,
            placement: PlacementCfg {
                reference: Reference::facing_z(),
                ..PlacementCfg::default()
            },
            geom: GeomCfg::default(),
        };
        let q = unit_square();
        let o = fp.overlay_for(&q).unwrap();
        assert!(o.mesh.is_none());
        assert_eq!((o.placement.width, o.placement.height), (0.8, 0.45));
        assert!((o.placement.position - Vec3::new(0.5, 0.0, 0.5)).norm() < 1e-12);
        // (TR - TL) × (BL - TL) = X × Z = -Y; +z at rest must land on it.
        let facing = o.placement.orientation.rotation().unwrap() * Vec3::z();
        assert!((facing + Vec3::y()).norm() < 1e-9);
        assert_eq!(o.outline, Outline::from_corners(&q));
    }

    #[test]
    fn degenerate_quads_are_skipped_not_nan() {
        let c = Vec3::new(1.0, 1.0, 1.0);
        let quads = vec![Ok(QuadCorners::new(c, c, c, c)), Ok(unit_square())];
        let report = FrameProcessor::default().process_quads(quads);
        assert_eq!(report.overlays.len(), 1);
        assert_eq!(report.skipped[0].error.kind(), ErrorKind::DegenerateGeometry);
        let p = report.overlays[0].placement;
        assert!(p.orientation.angle.is_finite());
        assert!((vec3::length(p.orientation.axis) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn report_serializes_errors_as_text() {
        let mut report = FrameReport::default();
        report.push(
            3,
            Err(PlacementError::MissingCorrespondence {
                corner: crate::quad::Corner::TopLeft,
            }),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["skipped"][0]["index"], 3);
        assert_eq!(
            json["skipped"][0]["error"],
            "missing correspondence: top-left corner did not resolve to a world point"
        );
        assert!(!report.is_empty());
    }

    #[test]
    fn results_cross_threads() {
        fn assert_send<T: Send + 'static>() {}
        assert_send::<FrameReport>();
        assert_send::<FrameProcessor>();
        let fp = FrameProcessor::default();
        let handle = std::thread::spawn(move || fp.process_quads(vec![Ok(unit_square())]));
        assert_eq!(handle.join().unwrap().overlays.len(), 1);
    }
}
