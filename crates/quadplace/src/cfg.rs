//! Tolerances and placement defaults.

use serde::{Deserialize, Serialize};

use crate::placement::{PlaneSize, Reference};

/// Geometry configuration (tolerances).
///
/// - `eps_len`: smallest edge length / vector norm treated as non-zero.
/// - `eps_cross`: smallest cross-product magnitude (or product of norms) used
///   as an arccosine denominator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeomCfg {
    pub eps_len: f64,
    pub eps_cross: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_len: 1e-9,
            eps_cross: 1e-12,
        }
    }
}

/// Fixed-size placeholder rectangle used by the in-air path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementCfg {
    pub size: PlaneSize,
    pub reference: Reference,
}

impl Default for PlacementCfg {
    fn default() -> Self {
        Self {
            // 16:9 screen, 0.8 m wide.
            size: PlaneSize {
                width: 0.8,
                height: 0.45,
            },
            reference: Reference::CenterRay,
        }
    }
}
