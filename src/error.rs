// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

use thiserror::Error;

pub use crate::mesh::MeshError;

pub type TessResult<T> = Result<T, TessError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TessError {
    /// A contour coordinate was NaN or outside the supported range. Once set, the
    /// tessellator refuses further work.
    #[error("contour coordinate is NaN or outside +/-2^23")]
    InvalidInput,

    #[error("no contour vertices were added")]
    EmptyContours,

    #[error("polygon size must be at least 3, got {0}")]
    InvalidPolygonSize(usize),

    #[error("contours are not closed: a region still has winding number {winding} after the sweep")]
    UnclosedContours { winding: i32 },

    #[error("mesh invariant violated: {0}")]
    Mesh(#[from] MeshError),
}
