// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Planar half-edge mesh.
//
// Vertices, faces and half-edges live in Vec arenas and refer to each other by
// u32 index. Half-edges are allocated in mated pairs, so the mate of `e` is
// always `e ^ 1`. Slot 0 of each arena is the dummy header of a circular
// doubly linked list (the edge header uses slots 0 and 1). Removed elements
// are unlinked from their list and their links set to INVALID; slots are not
// reused within one mesh.
//
// The global edge list only threads the even half of each pair; the "prev"
// link of an edge is stored in its mate's `next`.

mod check;
mod triangulate;

use crate::geom::{ccw, lex_leq, Real, SweepPoint};
use crate::priorityq::PqHandle;

pub use check::MeshError;

pub const INVALID: u32 = u32::MAX;

/// Index into `Mesh::verts`.
pub type VertIdx = u32;
/// Index into `Mesh::faces`.
pub type FaceIdx = u32;
/// Index into `Mesh::edges`.
pub type EdgeIdx = u32;

pub const V_HEAD: VertIdx = 0;
pub const F_HEAD: FaceIdx = 0;
pub const E_HEAD: EdgeIdx = 0;
pub const E_HEAD_SYM: EdgeIdx = 1;

/// The mate of a half-edge.
#[inline(always)]
pub fn sym(e: EdgeIdx) -> EdgeIdx {
    e ^ 1
}

#[derive(Clone, Debug)]
pub struct Vertex {
    pub next: VertIdx,
    pub prev: VertIdx,
    /// One half-edge with this vertex as origin.
    pub an_edge: EdgeIdx,
    pub coords: [Real; 3],
    pub s: Real,
    pub t: Real,
    pub pq_handle: Option<PqHandle>,
    /// Output slot assigned during extraction.
    pub n: u32,
    /// Insertion index of the input vertex, INVALID for synthetic vertices.
    pub idx: u32,
}

impl Vertex {
    #[inline]
    pub fn point(&self) -> SweepPoint {
        SweepPoint::new(self.s, self.t)
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Vertex {
            next: INVALID,
            prev: INVALID,
            an_edge: INVALID,
            coords: [0.0; 3],
            s: 0.0,
            t: 0.0,
            pq_handle: None,
            n: INVALID,
            idx: INVALID,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Face {
    pub next: FaceIdx,
    pub prev: FaceIdx,
    pub an_edge: EdgeIdx,
    /// Output slot assigned during extraction.
    pub n: u32,
    pub inside: bool,
}

impl Default for Face {
    fn default() -> Self {
        Face {
            next: INVALID,
            prev: INVALID,
            an_edge: INVALID,
            n: INVALID,
            inside: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HalfEdge {
    /// Next pair in the global edge list (see module docs).
    pub next: EdgeIdx,
    /// Next half-edge counter-clockwise around the origin.
    pub onext: EdgeIdx,
    /// Next half-edge counter-clockwise around the left face.
    pub lnext: EdgeIdx,
    pub org: VertIdx,
    pub lface: FaceIdx,
    /// Region using this edge as its upper boundary during the sweep.
    pub active_region: u32,
    /// Change in winding number when crossing from the right face to the left face.
    pub winding: i32,
}

impl Default for HalfEdge {
    fn default() -> Self {
        HalfEdge {
            next: INVALID,
            onext: INVALID,
            lnext: INVALID,
            org: INVALID,
            lface: INVALID,
            active_region: INVALID,
            winding: 0,
        }
    }
}

pub struct Mesh {
    pub verts: Vec<Vertex>,
    pub faces: Vec<Face>,
    pub edges: Vec<HalfEdge>,
}

impl Mesh {
    pub fn new() -> Self {
        let v_head = Vertex {
            next: V_HEAD,
            prev: V_HEAD,
            ..Vertex::default()
        };
        let f_head = Face {
            next: F_HEAD,
            prev: F_HEAD,
            ..Face::default()
        };
        let e_head = HalfEdge {
            next: E_HEAD,
            ..HalfEdge::default()
        };
        let e_head_sym = HalfEdge {
            next: E_HEAD_SYM,
            ..HalfEdge::default()
        };
        Mesh {
            verts: vec![v_head],
            faces: vec![f_head],
            edges: vec![e_head, e_head_sym],
        }
    }

    // ─────── Stored relations ────────────────────────────────────────────────

    #[inline]
    pub fn org(&self, e: EdgeIdx) -> VertIdx {
        self.edges[e as usize].org
    }

    #[inline]
    pub fn onext(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].onext
    }

    #[inline]
    pub fn lnext(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].lnext
    }

    #[inline]
    pub fn lface(&self, e: EdgeIdx) -> FaceIdx {
        self.edges[e as usize].lface
    }

    #[inline]
    pub fn winding(&self, e: EdgeIdx) -> i32 {
        self.edges[e as usize].winding
    }

    // ─────── Derived relations ───────────────────────────────────────────────

    #[inline]
    pub fn dst(&self, e: EdgeIdx) -> VertIdx {
        self.org(sym(e))
    }

    #[inline]
    pub fn rface(&self, e: EdgeIdx) -> FaceIdx {
        self.lface(sym(e))
    }

    /// Previous edge around the origin: `Sym.Lnext`.
    #[inline]
    pub fn oprev(&self, e: EdgeIdx) -> EdgeIdx {
        self.lnext(sym(e))
    }

    /// Previous edge around the left face: `Onext.Sym`.
    #[inline]
    pub fn lprev(&self, e: EdgeIdx) -> EdgeIdx {
        sym(self.onext(e))
    }

    /// `Lnext.Sym`
    #[inline]
    pub fn dprev(&self, e: EdgeIdx) -> EdgeIdx {
        sym(self.lnext(e))
    }

    /// `Sym.Onext`
    #[inline]
    pub fn rprev(&self, e: EdgeIdx) -> EdgeIdx {
        self.onext(sym(e))
    }

    /// `Rprev.Sym`
    #[inline]
    pub fn dnext(&self, e: EdgeIdx) -> EdgeIdx {
        sym(self.rprev(e))
    }

    /// `Oprev.Sym`
    #[inline]
    pub fn rnext(&self, e: EdgeIdx) -> EdgeIdx {
        sym(self.oprev(e))
    }

    // ─────── Geometry shortcuts ──────────────────────────────────────────────

    #[inline]
    pub fn point(&self, v: VertIdx) -> SweepPoint {
        self.verts[v as usize].point()
    }

    #[inline]
    pub fn org_point(&self, e: EdgeIdx) -> SweepPoint {
        self.point(self.org(e))
    }

    #[inline]
    pub fn dst_point(&self, e: EdgeIdx) -> SweepPoint {
        self.point(self.dst(e))
    }

    #[inline]
    pub fn edge_goes_left(&self, e: EdgeIdx) -> bool {
        lex_leq(self.dst_point(e), self.org_point(e))
    }

    #[inline]
    pub fn edge_goes_right(&self, e: EdgeIdx) -> bool {
        lex_leq(self.org_point(e), self.dst_point(e))
    }

    #[inline]
    pub fn face_inside(&self, f: FaceIdx) -> bool {
        f != INVALID && self.faces[f as usize].inside
    }

    /// Live vertices, in list order.
    pub fn vertex_ids(&self) -> VertexIds<'_> {
        VertexIds {
            mesh: self,
            cur: self.verts[V_HEAD as usize].next,
        }
    }

    /// Live faces, in list order.
    pub fn face_ids(&self) -> FaceIds<'_> {
        FaceIds {
            mesh: self,
            cur: self.faces[F_HEAD as usize].next,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_ids().count()
    }

    pub fn face_count(&self) -> usize {
        self.face_ids().count()
    }

    /// Number of edge pairs in the global edge list.
    pub fn edge_count(&self) -> usize {
        let mut n = 0;
        let mut e = self.edges[E_HEAD as usize].next;
        while e != E_HEAD {
            n += 1;
            e = self.edges[e as usize].next;
        }
        n
    }

    /// Number of edges (equivalently vertices) around a face.
    pub fn count_face_verts(&self, f: FaceIdx) -> usize {
        let e_start = self.faces[f as usize].an_edge;
        let mut e = e_start;
        let mut n = 0;
        loop {
            n += 1;
            e = self.lnext(e);
            if e == e_start {
                break;
            }
        }
        n
    }

    // ─────── Allocation ──────────────────────────────────────────────────────

    // New isolated pair inserted before `e_next` in the global edge list.
    fn make_edge_pair(&mut self, e_next: EdgeIdx) -> EdgeIdx {
        let e_next = e_next & !1;
        let e_new = self.edges.len() as EdgeIdx;
        let e_sym = sym(e_new);
        let e_prev = self.edges[sym(e_next) as usize].next;

        self.edges.push(HalfEdge {
            next: e_next,
            onext: e_new,
            lnext: e_sym,
            ..HalfEdge::default()
        });
        self.edges.push(HalfEdge {
            next: e_prev,
            onext: e_sym,
            lnext: e_new,
            ..HalfEdge::default()
        });
        self.edges[sym(e_prev) as usize].next = e_new;
        self.edges[sym(e_next) as usize].next = e_sym;
        e_new
    }

    // New vertex before `v_next`, becoming the origin of every edge around `e_orig`.
    fn make_vertex(&mut self, e_orig: EdgeIdx, v_next: VertIdx) -> VertIdx {
        let v_new = self.verts.len() as VertIdx;
        let v_prev = self.verts[v_next as usize].prev;
        self.verts.push(Vertex {
            next: v_next,
            prev: v_prev,
            an_edge: e_orig,
            ..Vertex::default()
        });
        self.verts[v_prev as usize].next = v_new;
        self.verts[v_next as usize].prev = v_new;

        let mut e = e_orig;
        loop {
            self.edges[e as usize].org = v_new;
            e = self.onext(e);
            if e == e_orig {
                break;
            }
        }
        v_new
    }

    // New face before `f_next`, becoming the left face of the loop through `e_orig`.
    // The inside flag is inherited from `f_next`.
    fn make_face(&mut self, e_orig: EdgeIdx, f_next: FaceIdx) -> FaceIdx {
        let f_new = self.faces.len() as FaceIdx;
        let f_prev = self.faces[f_next as usize].prev;
        let inside = self.faces[f_next as usize].inside;
        self.faces.push(Face {
            next: f_next,
            prev: f_prev,
            an_edge: e_orig,
            n: INVALID,
            inside,
        });
        self.faces[f_prev as usize].next = f_new;
        self.faces[f_next as usize].prev = f_new;

        let mut e = e_orig;
        loop {
            self.edges[e as usize].lface = f_new;
            e = self.lnext(e);
            if e == e_orig {
                break;
            }
        }
        f_new
    }

    fn kill_vertex(&mut self, v_del: VertIdx, new_org: VertIdx) {
        let e_start = self.verts[v_del as usize].an_edge;
        let mut e = e_start;
        loop {
            self.edges[e as usize].org = new_org;
            e = self.onext(e);
            if e == e_start {
                break;
            }
        }

        let Vertex { prev, next, .. } = self.verts[v_del as usize];
        self.verts[prev as usize].next = next;
        self.verts[next as usize].prev = prev;

        let dead = &mut self.verts[v_del as usize];
        dead.next = INVALID;
        dead.prev = INVALID;
        dead.an_edge = INVALID;
    }

    fn kill_face(&mut self, f_del: FaceIdx, new_lface: FaceIdx) {
        let e_start = self.faces[f_del as usize].an_edge;
        let mut e = e_start;
        loop {
            self.edges[e as usize].lface = new_lface;
            e = self.lnext(e);
            if e == e_start {
                break;
            }
        }

        let Face { prev, next, .. } = self.faces[f_del as usize];
        self.faces[prev as usize].next = next;
        self.faces[next as usize].prev = prev;

        let dead = &mut self.faces[f_del as usize];
        dead.next = INVALID;
        dead.prev = INVALID;
        dead.an_edge = INVALID;
    }

    fn kill_edge(&mut self, e_del: EdgeIdx) {
        let e_del = e_del & !1;
        let e_next = self.edges[e_del as usize].next;
        let e_prev = self.edges[sym(e_del) as usize].next;
        self.edges[sym(e_next) as usize].next = e_prev;
        self.edges[sym(e_prev) as usize].next = e_next;

        for half in [e_del, sym(e_del)] {
            let dead = &mut self.edges[half as usize];
            dead.next = INVALID;
            dead.active_region = INVALID;
        }
    }

    // Exchanges a.Onext and b.Onext, fixing up the Lnext links that point at them.
    fn swap_onext(&mut self, a: EdgeIdx, b: EdgeIdx) {
        let a_onext = self.onext(a);
        let b_onext = self.onext(b);
        self.edges[sym(a_onext) as usize].lnext = b;
        self.edges[sym(b_onext) as usize].lnext = a;
        self.edges[a as usize].onext = b_onext;
        self.edges[b as usize].onext = a_onext;
    }

    // ─────── Topology operators ──────────────────────────────────────────────

    /// Creates one edge with two new vertices and a single loop face.
    pub fn make_edge(&mut self) -> EdgeIdx {
        let e = self.make_edge_pair(E_HEAD);
        self.make_vertex(e, V_HEAD);
        self.make_vertex(sym(e), V_HEAD);
        self.make_face(e, F_HEAD);
        e
    }

    /// Exchanges `e_org.Onext` and `e_dst.Onext`.
    ///
    /// If the origins differ the two vertices merge (the origin of `e_dst` goes
    /// away); if they were the same the vertex splits in two. Independently, if the
    /// left faces differ the two loops merge, otherwise the loop splits in two.
    pub fn splice(&mut self, e_org: EdgeIdx, e_dst: EdgeIdx) {
        if e_org == e_dst {
            return;
        }

        let org_vertex = self.org(e_org);
        let org_face = self.lface(e_org);

        let joining_vertices = self.org(e_dst) != org_vertex;
        if joining_vertices {
            self.kill_vertex(self.org(e_dst), org_vertex);
        }
        let joining_loops = self.lface(e_dst) != org_face;
        if joining_loops {
            self.kill_face(self.lface(e_dst), org_face);
        }

        self.swap_onext(e_dst, e_org);

        if !joining_vertices {
            self.make_vertex(e_dst, org_vertex);
            self.verts[org_vertex as usize].an_edge = e_org;
        }
        if !joining_loops {
            self.make_face(e_dst, org_face);
            self.faces[org_face as usize].an_edge = e_org;
        }
    }

    /// Removes the edge `e_del`. The faces on either side merge, or if they were
    /// already the same face it splits in two. Vertices left without edges are removed.
    pub fn delete_edge(&mut self, e_del: EdgeIdx) {
        let e_del_sym = sym(e_del);

        let joining_loops = self.lface(e_del) != self.rface(e_del);
        if joining_loops {
            self.kill_face(self.lface(e_del), self.rface(e_del));
        }

        if self.onext(e_del) == e_del {
            self.kill_vertex(self.org(e_del), INVALID);
        } else {
            let rface = self.rface(e_del);
            self.faces[rface as usize].an_edge = self.oprev(e_del);
            let org = self.org(e_del);
            self.verts[org as usize].an_edge = self.onext(e_del);

            self.swap_onext(e_del, self.oprev(e_del));
            if !joining_loops {
                self.make_face(e_del, self.lface(e_del));
            }
        }

        if self.onext(e_del_sym) == e_del_sym {
            self.kill_vertex(self.org(e_del_sym), INVALID);
            self.kill_face(self.lface(e_del_sym), INVALID);
        } else {
            let lface = self.lface(e_del);
            self.faces[lface as usize].an_edge = self.oprev(e_del_sym);
            let org = self.org(e_del_sym);
            self.verts[org as usize].an_edge = self.onext(e_del_sym);
            self.swap_onext(e_del_sym, self.oprev(e_del_sym));
        }

        self.kill_edge(e_del);
    }

    /// Creates a new edge `e_new = e_org.Lnext` whose destination is a new vertex.
    /// Both halves share the left face of `e_org`.
    pub fn add_edge_vertex(&mut self, e_org: EdgeIdx) -> EdgeIdx {
        let e_new = self.make_edge_pair(e_org);
        let e_new_sym = sym(e_new);

        self.swap_onext(e_new, self.lnext(e_org));
        let org = self.dst(e_org);
        self.edges[e_new as usize].org = org;
        self.make_vertex(e_new_sym, org);

        let lface = self.lface(e_org);
        self.edges[e_new as usize].lface = lface;
        self.edges[e_new_sym as usize].lface = lface;
        e_new
    }

    /// Splits `e_org` at a new vertex, returning the second half `e_new = e_org.Lnext`.
    /// Both halves keep the winding of the original edge.
    pub fn split_edge(&mut self, e_org: EdgeIdx) -> EdgeIdx {
        let e_new = sym(self.add_edge_vertex(e_org));
        let e_org_sym = sym(e_org);

        // Move e_org's destination to the new vertex.
        self.swap_onext(e_org_sym, self.oprev(e_org_sym));
        self.swap_onext(e_org_sym, e_new);

        let new_vertex = self.org(e_new);
        self.edges[e_org_sym as usize].org = new_vertex;
        let dst = self.dst(e_new);
        self.verts[dst as usize].an_edge = sym(e_new);
        self.edges[sym(e_new) as usize].lface = self.rface(e_org);
        self.edges[e_new as usize].winding = self.winding(e_org);
        self.edges[sym(e_new) as usize].winding = self.winding(e_org_sym);
        e_new
    }

    /// Creates an edge from `e_org.Dst` to `e_dst.Org` and returns it. If the two
    /// edges share a left face the face is split, otherwise the two loops merge.
    pub fn connect(&mut self, e_org: EdgeIdx, e_dst: EdgeIdx) -> EdgeIdx {
        let e_new = self.make_edge_pair(e_org);
        let e_new_sym = sym(e_new);

        let org_face = self.lface(e_org);
        let joining_loops = self.lface(e_dst) != org_face;
        if joining_loops {
            self.kill_face(self.lface(e_dst), org_face);
        }

        self.swap_onext(e_new, self.lnext(e_org));
        self.swap_onext(e_new_sym, e_dst);

        self.edges[e_new as usize].org = self.dst(e_org);
        self.edges[e_new_sym as usize].org = self.org(e_dst);
        self.edges[e_new as usize].lface = org_face;
        self.edges[e_new_sym as usize].lface = org_face;
        self.faces[org_face as usize].an_edge = e_new_sym;

        if !joining_loops {
            self.make_face(e_new, org_face);
        }
        e_new
    }

    /// Destroys a face: its edges lose their left face, and any edge with no face
    /// on either side is removed along with vertices it leaves isolated.
    pub fn zap_face(&mut self, f_zap: FaceIdx) {
        let e_start = self.faces[f_zap as usize].an_edge;
        let mut e_next = self.lnext(e_start);
        loop {
            let e = e_next;
            e_next = self.lnext(e);

            self.edges[e as usize].lface = INVALID;
            if self.rface(e) == INVALID {
                for half in [e, sym(e)] {
                    if self.onext(half) == half {
                        self.kill_vertex(self.org(half), INVALID);
                    } else {
                        let org = self.org(half);
                        self.verts[org as usize].an_edge = self.onext(half);
                        self.swap_onext(half, self.oprev(half));
                    }
                }
                self.kill_edge(e);
            }

            if e == e_start {
                break;
            }
        }

        let Face { prev, next, .. } = self.faces[f_zap as usize];
        self.faces[prev as usize].next = next;
        self.faces[next as usize].prev = prev;
        let dead = &mut self.faces[f_zap as usize];
        dead.next = INVALID;
        dead.prev = INVALID;
        dead.an_edge = INVALID;
    }

    /// Zaps every face not marked inside.
    pub fn discard_exterior(&mut self) {
        let mut f = self.faces[F_HEAD as usize].next;
        while f != F_HEAD {
            let next = self.faces[f as usize].next;
            if !self.faces[f as usize].inside {
                self.zap_face(f);
            }
            f = next;
        }
    }

    /// Resets edge windings so that boundary edges between inside and outside faces
    /// carry `value` (positive when the inside is on the left). Every other edge gets
    /// winding zero, or is deleted when `keep_only_boundary` is set.
    pub fn set_winding_number(&mut self, value: i32, keep_only_boundary: bool) {
        let mut e = self.edges[E_HEAD as usize].next;
        while e != E_HEAD {
            let e_next = self.edges[e as usize].next;
            let left_inside = self.face_inside(self.lface(e));
            if self.face_inside(self.rface(e)) != left_inside {
                self.edges[e as usize].winding = if left_inside { value } else { -value };
            } else if !keep_only_boundary {
                self.edges[e as usize].winding = 0;
            } else {
                self.delete_edge(e);
            }
            e = e_next;
        }
    }

    /// Merges adjacent inside faces while the result stays convex and has at most
    /// `max_verts_per_face` vertices.
    pub fn merge_convex_faces(&mut self, max_verts_per_face: usize) {
        let mut f = self.faces[F_HEAD as usize].next;
        while f != F_HEAD {
            if !self.faces[f as usize].inside {
                f = self.faces[f as usize].next;
                continue;
            }

            let mut e_cur = self.faces[f as usize].an_edge;
            let v_start = self.org(e_cur);
            loop {
                let mut e_next = self.lnext(e_cur);
                let e_sym = sym(e_cur);
                let mut merged = false;

                let neighbour = self.lface(e_sym);
                if self.face_inside(neighbour) {
                    let cur_nv = self.count_face_verts(f);
                    let sym_nv = self.count_face_verts(neighbour);
                    if cur_nv + sym_nv - 2 <= max_verts_per_face {
                        let convex = ccw(
                            self.org_point(self.lprev(e_cur)),
                            self.org_point(e_cur),
                            self.org_point(self.lnext(self.lnext(e_sym))),
                        ) && ccw(
                            self.org_point(self.lprev(e_sym)),
                            self.org_point(e_sym),
                            self.org_point(self.lnext(self.lnext(e_cur))),
                        );
                        if convex {
                            e_next = self.lnext(e_sym);
                            self.delete_edge(e_sym);
                            merged = true;
                        }
                    }
                }

                if !merged && self.org(self.lnext(e_cur)) == v_start {
                    break;
                }
                e_cur = e_next;
            }
            f = self.faces[f as usize].next;
        }
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

pub struct VertexIds<'a> {
    mesh: &'a Mesh,
    cur: VertIdx,
}

impl Iterator for VertexIds<'_> {
    type Item = VertIdx;

    fn next(&mut self) -> Option<VertIdx> {
        if self.cur == V_HEAD || self.cur == INVALID {
            return None;
        }
        let v = self.cur;
        self.cur = self.mesh.verts[v as usize].next;
        Some(v)
    }
}

pub struct FaceIds<'a> {
    mesh: &'a Mesh,
    cur: FaceIdx,
}

impl Iterator for FaceIds<'_> {
    type Item = FaceIdx;

    fn next(&mut self) -> Option<FaceIdx> {
        if self.cur == F_HEAD || self.cur == INVALID {
            return None;
        }
        let f = self.cur;
        self.cur = self.mesh.faces[f as usize].next;
        Some(f)
    }
}
