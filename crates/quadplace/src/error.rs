//! Error types for reconstruction and placement.

use thiserror::Error;

use crate::quad::Corner;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    #[error("missing correspondence: {corner} corner did not resolve to a world point")]
    MissingCorrespondence { corner: Corner },

    #[error("degenerate geometry: {what}")]
    DegenerateGeometry { what: &'static str },

    #[error("invalid plane size {width} x {height}: both sides must be positive")]
    InvalidSize { width: f64, height: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingCorrespondence,
    DegenerateGeometry,
    InvalidSize,
}

impl PlacementError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlacementError::MissingCorrespondence { .. } => ErrorKind::MissingCorrespondence,
            PlacementError::DegenerateGeometry { .. } => ErrorKind::DegenerateGeometry,
            PlacementError::InvalidSize { .. } => ErrorKind::InvalidSize,
        }
    }

    #[inline]
    pub(crate) fn degenerate(what: &'static str) -> Self {
        PlacementError::DegenerateGeometry { what }
    }
}
