//! Value types for quad reconstruction: corners, placements, outlines, meshes.

use std::fmt;

use nalgebra::{Rotation3, Unit};
use serde::{Deserialize, Serialize};

use crate::vec3::{self, Vec3};

/// Named corner of a detected quadrilateral.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Input order used throughout: TL, TR, BL, BR.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Short column prefix (`tl`, `tr`, `bl`, `br`).
    pub fn prefix(self) -> &'static str {
        match self {
            Corner::TopLeft => "tl",
            Corner::TopRight => "tr",
            Corner::BottomLeft => "bl",
            Corner::BottomRight => "br",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        };
        f.write_str(s)
    }
}

/// Four world-space corners of one detected rectangle.
///
/// Invariants (assumed, not checked): roughly coplanar, consistent winding.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuadCorners {
    pub top_left: Vec3,
    pub top_right: Vec3,
    pub bottom_left: Vec3,
    pub bottom_right: Vec3,
}

impl QuadCorners {
    #[inline]
    pub fn new(top_left: Vec3, top_right: Vec3, bottom_left: Vec3, bottom_right: Vec3) -> Self {
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }

    /// From `[TL, TR, BL, BR]`.
    #[inline]
    pub fn from_array(c: [Vec3; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    #[inline]
    pub fn get(&self, corner: Corner) -> Vec3 {
        match corner {
            Corner::TopLeft => self.top_left,
            Corner::TopRight => self.top_right,
            Corner::BottomLeft => self.bottom_left,
            Corner::BottomRight => self.bottom_right,
        }
    }

    /// Midpoint of the TL–BR diagonal.
    #[inline]
    pub fn diagonal_center(&self) -> Vec3 {
        self.bottom_right + (self.top_left - self.bottom_right) * 0.5
    }

    /// Normal from the top and left edges, `(TR - TL) × (BL - TL)`. Not normalized.
    #[inline]
    pub fn edge_normal(&self) -> Vec3 {
        vec3::cross(
            self.top_right - self.top_left,
            self.bottom_left - self.top_left,
        )
    }
}

/// Axis + angle (radians). `axis` is unit length when produced by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub axis: Vec3,
    pub angle: f64,
}

impl Orientation {
    /// `None` when the axis has no direction or the angle is not finite,
    /// e.g. for a record deserialized from untrusted input.
    pub fn rotation(&self) -> Option<Rotation3<f64>> {
        if !self.angle.is_finite() || !self.axis.iter().all(|c| c.is_finite()) {
            return None;
        }
        let axis = Unit::try_new(self.axis, f64::EPSILON)?;
        Some(Rotation3::from_axis_angle(&axis, self.angle))
    }
}

/// Placement record consumed by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vec3,
    pub orientation: Orientation,
    pub width: f64,
    pub height: f64,
}

/// Quad boundary edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub edge: Edge,
    pub from: Vec3,
    pub to: Vec3,
}

impl Segment {
    #[inline]
    pub fn length(&self) -> f64 {
        vec3::distance(self.from, self.to)
    }
}

/// All four boundary segments: left TL–BL, right TR–BR, top TL–TR, bottom BL–BR.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub segments: [Segment; 4],
}

impl Outline {
    pub fn from_corners(q: &QuadCorners) -> Self {
        let seg = |edge, from, to| Segment { edge, from, to };
        Self {
            segments: [
                seg(Edge::Left, q.top_left, q.bottom_left),
                seg(Edge::Right, q.top_right, q.bottom_right),
                seg(Edge::Top, q.top_left, q.top_right),
                seg(Edge::Bottom, q.bottom_left, q.bottom_right),
            ],
        }
    }

    pub fn segment(&self, edge: Edge) -> &Segment {
        // Array order matches `Edge` declaration order.
        &self.segments[edge as usize]
    }
}

/// Filled quad as two triangles over the corner vertices.
///
/// `vertices` are `[TL, TR, BL, BR]`; triangles are TL-TR-BR and TL-BL-BR.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuadMesh {
    pub vertices: [Vec3; 4],
    pub triangles: [[u32; 3]; 2],
}

impl QuadMesh {
    pub fn from_corners(q: &QuadCorners) -> Self {
        Self {
            vertices: [q.top_left, q.top_right, q.bottom_left, q.bottom_right],
            triangles: [[0, 1, 3], [0, 2, 3]],
        }
    }

    /// Sum of triangle areas.
    pub fn area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let (a, b, c) = (
                    self.vertices[a as usize],
                    self.vertices[b as usize],
                    self.vertices[c as usize],
                );
                0.5 * vec3::length(vec3::cross(b - a, c - a))
            })
            .sum()
    }
}
