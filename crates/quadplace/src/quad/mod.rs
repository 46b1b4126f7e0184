//! Quad reconstruction: four hit-tested corners → positioned, oriented plane.
//!
//! Purpose
//! - Turn one rectangle's world-space corners into a `Placement` (center,
//!   axis + angle, width, height) a renderer can instantiate directly.
//! - Provide the boundary `Outline` and a two-triangle `QuadMesh` for the
//!   filled overlay.
//!
//! Conventions
//! - Corner order is always TL, TR, BL, BR (see `Corner::ALL`).
//! - Returned axes are unit length; angles are radians in [0, π].
//! - Degenerate inputs are errors, never NaN in the output.

mod reconstruct;
mod types;

pub use reconstruct::{quad_dimensions, quad_normal, reconstruct_quad};
pub use types::{Corner, Edge, Orientation, Outline, Placement, QuadCorners, QuadMesh, Segment};
