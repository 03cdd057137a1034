// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Public tessellator: contour ingestion, projection, the sweep, triangulation
// and output extraction, in that order.

mod geometry;
mod output;

use log::{debug, warn};

use crate::error::{TessError, TessResult};
use crate::geom::Real;
use crate::mesh::{sym, Mesh, INVALID};
use crate::sweep;

// ─────────────────────────────── Public types ──────────────────────────────────

/// Decides from a region's winding number whether it is inside the polygon.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum WindingRule {
    #[default]
    Odd,
    NonZero,
    Positive,
    Negative,
    AbsGeqTwo,
}

impl WindingRule {
    pub fn is_inside(self, n: i32) -> bool {
        match self {
            WindingRule::Odd => n & 1 != 0,
            WindingRule::NonZero => n != 0,
            WindingRule::Positive => n > 0,
            WindingRule::Negative => n < 0,
            WindingRule::AbsGeqTwo => n >= 2 || n <= -2,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ElementType {
    #[default]
    Polygons,
    ConnectedPolygons,
    BoundaryContours,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TessOption {
    /// Wind new contours clockwise instead of counter-clockwise.
    ReverseContours,
    /// Check the mesh after every phase and reject empty input.
    StrictValidation,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TessStatus {
    Ok,
    InvalidInput,
}

/// Marks an unused slot in `elements`, or an output vertex that did not come
/// from the input (`vertex_indices`).
pub const TESS_UNDEF: u32 = u32::MAX;

/// Flat output buffers of one tessellation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TessOutput {
    /// `vertex_count * vertex_size` coordinates.
    pub vertices: Vec<Real>,
    /// Input index of each output vertex, [`TESS_UNDEF`] for crossings.
    pub vertex_indices: Vec<u32>,
    pub elements: Vec<u32>,
    pub vertex_count: usize,
    pub element_count: usize,
}

/// Parameters for the one-shot [`tessellate`] function.
#[derive(Clone, Debug, PartialEq)]
pub struct TessConfig {
    pub winding_rule: WindingRule,
    pub element_type: ElementType,
    /// Maximum vertices per output polygon.
    pub poly_size: usize,
    /// Coordinates per vertex, both for the contours and the output (2 or 3).
    pub vertex_size: usize,
    /// Plane normal; `None` computes one from the input.
    pub normal: Option<[Real; 3]>,
    pub strict: bool,
    pub reverse_contours: bool,
}

impl Default for TessConfig {
    fn default() -> Self {
        TessConfig {
            winding_rule: WindingRule::Odd,
            element_type: ElementType::Polygons,
            poly_size: 3,
            vertex_size: 2,
            normal: None,
            strict: true,
            reverse_contours: false,
        }
    }
}

// ─────────────────────────── Tessellator ──────────────────────────────────────

/// Accumulates contours and tessellates them.
///
/// Each call to [`tessellate`](Self::tessellate) consumes the contours added so
/// far; the output stays readable until the next call.
pub struct Tessellator {
    mesh: Option<Mesh>,
    status: TessStatus,
    reverse_contours: bool,
    strict: bool,
    vertex_index_counter: u32,
    out: TessOutput,
}

impl Tessellator {
    pub fn new() -> Self {
        Tessellator {
            mesh: None,
            status: TessStatus::Ok,
            reverse_contours: false,
            strict: false,
            vertex_index_counter: 0,
            out: TessOutput::default(),
        }
    }

    pub fn set_option(&mut self, option: TessOption, value: bool) {
        match option {
            TessOption::ReverseContours => self.reverse_contours = value,
            TessOption::StrictValidation => self.strict = value,
        }
    }

    /// Adds one closed contour. `size` is the number of coordinates per vertex
    /// (clamped to 2..=3) and `vertices` holds them back to back.
    ///
    /// A NaN or out-of-range coordinate puts the tessellator in the
    /// [`TessStatus::InvalidInput`] state; the contour is dropped and
    /// `tessellate` will fail.
    pub fn add_contour(&mut self, size: usize, vertices: &[Real]) {
        if self.status != TessStatus::Ok {
            return;
        }
        let size = size.clamp(2, 3);
        if vertices.iter().any(|&c| !geometry::is_valid_coord(c)) {
            warn!("rejecting contour with invalid coordinates");
            self.status = TessStatus::InvalidInput;
            return;
        }

        let mesh = self.mesh.get_or_insert_with(Mesh::new);
        let winding = if self.reverse_contours { -1 } else { 1 };
        let mut e = INVALID;
        for point in vertices.chunks_exact(size) {
            if e == INVALID {
                // A single self-looped edge.
                e = mesh.make_edge();
                mesh.splice(e, sym(e));
            } else {
                // Split the previous edge to make room for the new vertex.
                mesh.split_edge(e);
                e = mesh.lnext(e);
            }

            let org = mesh.org(e);
            let vert = &mut mesh.verts[org as usize];
            vert.coords = [point[0], point[1], if size > 2 { point[2] } else { 0.0 }];
            vert.idx = self.vertex_index_counter;
            self.vertex_index_counter += 1;

            mesh.edges[e as usize].winding = winding;
            mesh.edges[sym(e) as usize].winding = -winding;
        }
    }

    /// Tessellates every contour added since the last call.
    ///
    /// `poly_size` caps the vertices per output polygon (3 gives triangles) and is
    /// ignored for boundary output. `vertex_size` is the number of coordinates
    /// written per output vertex. `normal` fixes the projection plane; `None`
    /// computes it from the input.
    pub fn tessellate(
        &mut self,
        winding_rule: WindingRule,
        element_type: ElementType,
        poly_size: usize,
        vertex_size: usize,
        normal: Option<[Real; 3]>,
    ) -> TessResult<()> {
        self.out = TessOutput::default();
        if self.status != TessStatus::Ok {
            return Err(TessError::InvalidInput);
        }
        if element_type != ElementType::BoundaryContours && poly_size < 3 {
            return Err(TessError::InvalidPolygonSize(poly_size));
        }

        let mut mesh = self.mesh.take().unwrap_or_default();
        self.vertex_index_counter = 0;
        if self.strict && mesh.vertex_count() == 0 {
            return Err(TessError::EmptyContours);
        }
        let validate = self.strict || cfg!(debug_assertions);

        let projection = geometry::project_polygon(&mut mesh, normal);
        debug!(
            "projected {} vertices: normal {:?}, bounds ({}, {})..({}, {})",
            mesh.vertex_count(),
            projection.normal,
            projection.bmin.s,
            projection.bmin.t,
            projection.bmax.s,
            projection.bmax.t
        );

        sweep::compute_interior(&mut mesh, winding_rule, projection.bmin, projection.bmax, validate)?;

        if element_type == ElementType::BoundaryContours {
            mesh.set_winding_number(1, true);
        } else {
            let faces = mesh.tessellate_interior()?;
            debug!("triangulated {} monotone faces", faces);
            mesh.discard_exterior();
        }
        if validate {
            mesh.check()?;
        }

        let vertex_size = vertex_size.clamp(2, 3);
        self.out = match element_type {
            ElementType::BoundaryContours => output::output_contours(&mesh, vertex_size),
            _ => output::output_polymesh(&mut mesh, element_type, poly_size, vertex_size),
        };
        debug!(
            "output: {} vertices, {} elements",
            self.out.vertex_count, self.out.element_count
        );
        Ok(())
    }

    // ─────── Accessors ────────────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.out.vertex_count
    }

    pub fn element_count(&self) -> usize {
        self.out.element_count
    }

    pub fn vertices(&self) -> &[Real] {
        &self.out.vertices
    }

    pub fn vertex_indices(&self) -> &[u32] {
        &self.out.vertex_indices
    }

    pub fn elements(&self) -> &[u32] {
        &self.out.elements
    }

    pub fn output(&self) -> &TessOutput {
        &self.out
    }

    pub fn into_output(self) -> TessOutput {
        self.out
    }

    pub fn status(&self) -> TessStatus {
        self.status
    }
}

impl Default for Tessellator {
    fn default() -> Self {
        Self::new()
    }
}

/// Tessellates `contours` in one call. Each contour is a flat list of
/// `config.vertex_size` coordinates per vertex.
pub fn tessellate<C: AsRef<[Real]>>(config: &TessConfig, contours: &[C]) -> TessResult<TessOutput> {
    let mut tess = Tessellator::new();
    tess.set_option(TessOption::ReverseContours, config.reverse_contours);
    tess.set_option(TessOption::StrictValidation, config.strict);
    for contour in contours {
        tess.add_contour(config.vertex_size, contour.as_ref());
    }
    tess.tessellate(
        config.winding_rule,
        config.element_type,
        config.poly_size,
        config.vertex_size,
        config.normal,
    )?;
    Ok(tess.into_output())
}
