//! Geometry core for rectangle overlays in AR scenes.
//!
//! The host AR session detects rectangles and hit-tests their corners into
//! world space; this crate turns those corner sets into placement records
//! (position, axis + angle, width, height) plus outline segments for an
//! external renderer. Nothing here touches a scene graph.
//!
//! Layout
//! - `vec3`: 3D vector primitives (checked and raw variants).
//! - `quad`: four-corner reconstruction and the overlay geometry around it.
//! - `placement`: fixed-size rectangles oriented to a surface normal.
//! - `detect`: observation types and the `HitTester` seam.
//! - `frame`: per-frame pipeline returning pending overlays.
//! - `sample`: reproducible posed rectangles for tests and benches.

pub mod cfg;
pub mod detect;
pub mod error;
pub mod frame;
pub mod placement;
pub mod quad;
pub mod sample;
pub mod vec3;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::{GeomCfg, PlacementCfg};
pub use error::{ErrorKind, PlacementError};
pub use vec3::Vec3;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::{GeomCfg, PlacementCfg};
    pub use crate::detect::{HitTestKind, HitTester, ImagePoint, RectangleObservation};
    pub use crate::error::{ErrorKind, PlacementError};
    pub use crate::frame::{FrameProcessor, FrameReport, Overlay, Skipped, Variant};
    pub use crate::placement::{orient_to_normal, place_2d, PlaneSize, Reference};
    pub use crate::quad::{
        reconstruct_quad, Corner, Edge, Orientation, Outline, Placement, QuadCorners, QuadMesh,
        Segment,
    };
    pub use crate::vec3::Vec3;
}
