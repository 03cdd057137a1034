// sweep-tess: polygon tessellation by plane sweep over a half-edge mesh
// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

pub mod dict;
pub mod error;
pub mod geom;
pub mod mesh;
pub mod priorityq;
pub mod sweep;
pub mod tess;

pub use error::{MeshError, TessError, TessResult};
pub use tess::{
    tessellate, ElementType, TessConfig, TessOption, TessOutput, TessStatus, Tessellator, WindingRule,
    TESS_UNDEF,
};
