// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

use super::Sweep;
use crate::geom::lex_eq;
use crate::mesh::{sym, E_HEAD, F_HEAD};

impl Sweep<'_> {
    /// Drops zero-length edges and contours with fewer than three edges before the
    /// sweep starts.
    pub(super) fn remove_degenerate_edges(&mut self) {
        let mesh = &mut *self.mesh;
        let mut e = mesh.edges[E_HEAD as usize].next;
        while e != E_HEAD {
            let mut e_next = mesh.edges[e as usize].next;
            let mut e_lnext = mesh.lnext(e);

            if lex_eq(mesh.org_point(e), mesh.dst_point(e)) && mesh.lnext(e_lnext) != e {
                // Zero-length edge in a contour of at least three edges.
                mesh.splice(e_lnext, e);
                mesh.delete_edge(e);
                e = e_lnext;
                e_lnext = mesh.lnext(e);
            }
            if mesh.lnext(e_lnext) == e {
                // Contour of one or two edges.
                if e_lnext != e {
                    if e_lnext == e_next || e_lnext == sym(e_next) {
                        e_next = mesh.edges[e_next as usize].next;
                    }
                    mesh.delete_edge(e_lnext);
                }
                if e == e_next || e == sym(e_next) {
                    e_next = mesh.edges[e_next as usize].next;
                }
                mesh.delete_edge(e);
            }
            e = e_next;
        }
    }

    /// Deletes every face bounded by only two edges, folding the winding of the
    /// deleted edge into its neighbour. This also removes untouched sentinels.
    pub(super) fn remove_degenerate_faces(&mut self) {
        let mut f = self.mesh.faces[F_HEAD as usize].next;
        while f != F_HEAD {
            let f_next = self.mesh.faces[f as usize].next;
            let e = self.mesh.faces[f as usize].an_edge;
            debug_assert!(self.mesh.lnext(e) != e);
            if self.mesh.lnext(self.mesh.lnext(e)) == e {
                let onext = self.mesh.onext(e);
                self.add_winding(onext, e);
                self.mesh.delete_edge(e);
            }
            f = f_next;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::geom::{Real, SweepPoint};
    use crate::mesh::{sym, Mesh, INVALID};
    use crate::sweep::Sweep;
    use crate::tess::WindingRule;

    fn contour(mesh: &mut Mesh, points: &[(Real, Real)]) {
        let mut e = INVALID;
        for &(s, t) in points {
            if e == INVALID {
                e = mesh.make_edge();
                mesh.splice(e, sym(e));
            } else {
                mesh.split_edge(e);
                e = mesh.lnext(e);
            }
            let v = mesh.org(e) as usize;
            mesh.verts[v].s = s;
            mesh.verts[v].t = t;
        }
    }

    fn sweep(mesh: &mut Mesh) -> Sweep<'_> {
        let origin = SweepPoint::new(0.0, 0.0);
        Sweep::new(mesh, WindingRule::Odd, origin, origin)
    }

    #[test]
    fn zero_length_edge_is_collapsed() {
        let mut mesh = Mesh::new();
        contour(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        sweep(&mut mesh).remove_degenerate_edges();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.edge_count(), 3);
        assert!(mesh.check().is_ok());
    }

    #[test]
    fn two_edge_contour_is_removed() {
        let mut mesh = Mesh::new();
        contour(&mut mesh, &[(0.0, 0.0), (1.0, 0.0)]);
        contour(&mut mesh, &[(5.0, 5.0), (6.0, 5.0), (5.0, 6.0)]);
        sweep(&mut mesh).remove_degenerate_edges();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.edge_count(), 3);
    }

    #[test]
    fn lone_edge_face_is_removed() {
        let mut mesh = Mesh::new();
        mesh.make_edge();
        sweep(&mut mesh).remove_degenerate_faces();
        assert_eq!(mesh.edge_count(), 0);
        assert_eq!(mesh.face_count(), 0);
        assert_eq!(mesh.vertex_count(), 0);
    }
}
