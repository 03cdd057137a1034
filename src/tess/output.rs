// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Extraction of flat output buffers from a finished mesh.

use super::{ElementType, TessOutput, TESS_UNDEF};
use crate::mesh::{FaceIdx, Mesh, VertIdx};

fn push_vertex(out: &mut TessOutput, mesh: &Mesh, v: VertIdx, vertex_size: usize) {
    let vert = &mesh.verts[v as usize];
    out.vertices.extend_from_slice(&vert.coords[..vertex_size]);
    out.vertex_indices.push(vert.idx);
}

/// Emits one element per inside face, `poly_size` vertex slots each, padded with
/// [`TESS_UNDEF`]. Connected output appends `poly_size` neighbour slots holding the
/// element number across each edge, or [`TESS_UNDEF`] on the boundary.
pub(crate) fn output_polymesh(
    mesh: &mut Mesh,
    element_type: ElementType,
    poly_size: usize,
    vertex_size: usize,
) -> TessOutput {
    if poly_size > 3 {
        mesh.merge_convex_faces(poly_size);
    }

    let verts: Vec<VertIdx> = mesh.vertex_ids().collect();
    for &v in &verts {
        mesh.verts[v as usize].n = TESS_UNDEF;
    }

    // Number the used vertices and the inside faces.
    let mut out = TessOutput::default();
    let mut inside_faces: Vec<FaceIdx> = Vec::new();
    let faces: Vec<FaceIdx> = mesh.face_ids().collect();
    for f in faces {
        mesh.faces[f as usize].n = TESS_UNDEF;
        if !mesh.faces[f as usize].inside {
            continue;
        }
        let start = mesh.faces[f as usize].an_edge;
        let mut e = start;
        loop {
            let v = mesh.org(e);
            if mesh.verts[v as usize].n == TESS_UNDEF {
                mesh.verts[v as usize].n = out.vertex_count as u32;
                out.vertex_count += 1;
            }
            e = mesh.lnext(e);
            if e == start {
                break;
            }
        }
        mesh.faces[f as usize].n = inside_faces.len() as u32;
        inside_faces.push(f);
    }
    out.element_count = inside_faces.len();

    out.vertices = vec![0.0; out.vertex_count * vertex_size];
    out.vertex_indices = vec![TESS_UNDEF; out.vertex_count];
    for &v in &verts {
        let vert = &mesh.verts[v as usize];
        if vert.n != TESS_UNDEF {
            let n = vert.n as usize;
            out.vertices[n * vertex_size..(n + 1) * vertex_size]
                .copy_from_slice(&vert.coords[..vertex_size]);
            out.vertex_indices[n] = vert.idx;
        }
    }

    let stride = match element_type {
        ElementType::ConnectedPolygons => poly_size * 2,
        _ => poly_size,
    };
    out.elements.reserve(inside_faces.len() * stride);
    for f in inside_faces {
        let start = mesh.faces[f as usize].an_edge;
        let mut loop_edges = Vec::with_capacity(poly_size);
        let mut e = start;
        loop {
            loop_edges.push(e);
            e = mesh.lnext(e);
            if e == start {
                break;
            }
        }

        let pad = poly_size.saturating_sub(loop_edges.len());
        out.elements
            .extend(loop_edges.iter().map(|&e| mesh.verts[mesh.org(e) as usize].n));
        out.elements.extend(std::iter::repeat(TESS_UNDEF).take(pad));

        if element_type == ElementType::ConnectedPolygons {
            out.elements.extend(loop_edges.iter().map(|&e| {
                let rf = mesh.rface(e);
                if mesh.face_inside(rf) {
                    mesh.faces[rf as usize].n
                } else {
                    TESS_UNDEF
                }
            }));
            out.elements.extend(std::iter::repeat(TESS_UNDEF).take(pad));
        }
    }
    out
}

/// Emits every inside face as one closed loop. Elements are `(start, count)` pairs
/// into the vertex buffer; vertices are repeated per loop.
pub(crate) fn output_contours(mesh: &Mesh, vertex_size: usize) -> TessOutput {
    let mut out = TessOutput::default();
    for f in mesh.face_ids() {
        if !mesh.faces[f as usize].inside {
            continue;
        }
        let start_vertex = out.vertex_count;
        let start = mesh.faces[f as usize].an_edge;
        let mut e = start;
        loop {
            push_vertex(&mut out, mesh, mesh.org(e), vertex_size);
            out.vertex_count += 1;
            e = mesh.lnext(e);
            if e == start {
                break;
            }
        }
        out.elements.push(start_vertex as u32);
        out.elements.push((out.vertex_count - start_vertex) as u32);
        out.element_count += 1;
    }
    out
}
