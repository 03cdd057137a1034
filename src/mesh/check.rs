// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Full consistency pass over the mesh. O(n) in the number of half-edges; not
// run on any hot path unless validation is requested.

use thiserror::Error;

use super::{sym, EdgeIdx, FaceIdx, Mesh, VertIdx, E_HEAD, E_HEAD_SYM, F_HEAD, INVALID, V_HEAD};

/// The first invariant found violated by [`Mesh::check`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("half-edge {edge} has an out-of-range mate or link")]
    MateNotInvolution { edge: EdgeIdx },

    #[error("half-edge {edge} breaks the Lnext/Onext cycle identities")]
    BrokenLinks { edge: EdgeIdx },

    #[error("face {face} loop is not closed under Lnext (at half-edge {edge})")]
    FaceLoopBroken { face: FaceIdx, edge: EdgeIdx },

    #[error("vertex {vertex} ring is not closed under Onext (at half-edge {edge})")]
    VertexRingBroken { vertex: VertIdx, edge: EdgeIdx },

    #[error("{list} list has a broken prev link at element {index}")]
    ListLinkBroken { list: &'static str, index: u32 },

    #[error("half-edge {edge} in the edge list has no origin or destination")]
    DanglingEdge { edge: EdgeIdx },

    #[error("face {face} has fewer than three edges")]
    DegenerateFace { face: FaceIdx },

    #[error("{list} list header was modified")]
    HeaderNotEmpty { list: &'static str },
}

impl Mesh {
    /// Verifies every topological invariant of the mesh.
    ///
    /// Walks the face list checking each loop under Lnext, the vertex list checking
    /// each ring under Onext, and the global edge list checking prev links and mate
    /// consistency. Each walk is bounded by the arena size, so a corrupted cycle is
    /// reported instead of looping forever.
    pub fn check(&self) -> Result<(), MeshError> {
        let limit = self.edges.len();

        let mut f_prev = F_HEAD;
        loop {
            let f = self.faces[f_prev as usize].next;
            if f == F_HEAD {
                break;
            }
            if f == INVALID || self.faces[f as usize].prev != f_prev {
                return Err(MeshError::ListLinkBroken { list: "face", index: f_prev });
            }
            let e_start = self.faces[f as usize].an_edge;
            let mut e = e_start;
            let mut steps = 0;
            loop {
                self.check_half_edge(e)?;
                if self.lface(e) != f {
                    return Err(MeshError::FaceLoopBroken { face: f, edge: e });
                }
                e = self.lnext(e);
                steps += 1;
                if e == e_start {
                    break;
                }
                if steps > limit {
                    return Err(MeshError::FaceLoopBroken { face: f, edge: e });
                }
            }
            f_prev = f;
        }
        if self.faces[F_HEAD as usize].prev != f_prev || self.faces[F_HEAD as usize].an_edge != INVALID {
            return Err(MeshError::HeaderNotEmpty { list: "face" });
        }

        let mut v_prev = V_HEAD;
        loop {
            let v = self.verts[v_prev as usize].next;
            if v == V_HEAD {
                break;
            }
            if v == INVALID || self.verts[v as usize].prev != v_prev {
                return Err(MeshError::ListLinkBroken { list: "vertex", index: v_prev });
            }
            let e_start = self.verts[v as usize].an_edge;
            let mut e = e_start;
            let mut steps = 0;
            loop {
                self.check_half_edge(e)?;
                if self.org(e) != v {
                    return Err(MeshError::VertexRingBroken { vertex: v, edge: e });
                }
                e = self.onext(e);
                steps += 1;
                if e == e_start {
                    break;
                }
                if steps > limit {
                    return Err(MeshError::VertexRingBroken { vertex: v, edge: e });
                }
            }
            v_prev = v;
        }
        if self.verts[V_HEAD as usize].prev != v_prev || self.verts[V_HEAD as usize].an_edge != INVALID {
            return Err(MeshError::HeaderNotEmpty { list: "vertex" });
        }

        let mut e_prev = E_HEAD;
        let mut steps = 0;
        loop {
            let e = self.edges[e_prev as usize].next;
            if e == E_HEAD {
                break;
            }
            if e == INVALID || self.edges[sym(e) as usize].next != sym(e_prev) {
                return Err(MeshError::ListLinkBroken { list: "edge", index: e_prev });
            }
            self.check_half_edge(e)?;
            if self.org(e) == INVALID || self.dst(e) == INVALID {
                return Err(MeshError::DanglingEdge { edge: e });
            }
            e_prev = e;
            steps += 1;
            if steps > limit {
                return Err(MeshError::ListLinkBroken { list: "edge", index: e });
            }
        }
        let head = &self.edges[E_HEAD as usize];
        let head_sym = &self.edges[E_HEAD_SYM as usize];
        if head_sym.next != sym(e_prev)
            || head.org != INVALID
            || head_sym.org != INVALID
            || head.lface != INVALID
            || head_sym.lface != INVALID
        {
            return Err(MeshError::HeaderNotEmpty { list: "edge" });
        }
        Ok(())
    }

    fn check_half_edge(&self, e: EdgeIdx) -> Result<(), MeshError> {
        let len = self.edges.len() as u32;
        if e == INVALID || e < 2 || e >= len || sym(e) >= len || sym(sym(e)) != e {
            return Err(MeshError::MateNotInvolution { edge: e });
        }
        let lnext = self.lnext(e);
        let onext = self.onext(e);
        if lnext >= len || onext >= len {
            return Err(MeshError::MateNotInvolution { edge: e });
        }
        if sym(self.onext(lnext)) != e || self.lnext(sym(onext)) != e {
            return Err(MeshError::BrokenLinks { edge: e });
        }
        Ok(())
    }
}
