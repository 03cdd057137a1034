// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Triangulation of the monotone faces left by the sweep.

use super::{sym, FaceIdx, Mesh, MeshError, F_HEAD};
use crate::geom::{lex_leq, orient_sign};

impl Mesh {
    /// Triangulates one monotone face with `k` vertices into `k - 2` triangles,
    /// adding only diagonals.
    ///
    /// The face is walked from its rightmost vertex along both chains. At each step
    /// the chain whose next vertex is further left is advanced, and triangles are
    /// cut from the other chain for as long as the cut stays inside the face. What
    /// remains is fanned out from the leftmost vertex.
    pub fn tessellate_mono_region(&mut self, face: FaceIdx) -> Result<(), MeshError> {
        let mut up = self.faces[face as usize].an_edge;
        if self.lnext(up) == up || self.lnext(self.lnext(up)) == up {
            return Err(MeshError::DegenerateFace { face });
        }

        // Rightmost vertex becomes up.Org.
        while lex_leq(self.dst_point(up), self.org_point(up)) {
            up = self.lprev(up);
        }
        while lex_leq(self.org_point(up), self.dst_point(up)) {
            up = self.lnext(up);
        }
        let mut lo = self.lprev(up);

        while self.lnext(up) != lo {
            if lex_leq(self.dst_point(up), self.org_point(lo)) {
                // up.Dst is further left: cut triangles from lo.Org.
                while self.lnext(lo) != up
                    && (self.edge_goes_left(self.lnext(lo))
                        || orient_sign(
                            self.org_point(lo),
                            self.dst_point(lo),
                            self.dst_point(self.lnext(lo)),
                        ) <= 0.0)
                {
                    let diag = self.connect(self.lnext(lo), lo);
                    lo = sym(diag);
                }
                lo = self.lprev(lo);
            } else {
                // lo.Org is further left: cut triangles from up.Dst.
                while self.lnext(lo) != up
                    && (self.edge_goes_right(self.lprev(up))
                        || orient_sign(
                            self.dst_point(up),
                            self.org_point(up),
                            self.org_point(self.lprev(up)),
                        ) >= 0.0)
                {
                    let diag = self.connect(up, self.lprev(up));
                    up = sym(diag);
                }
                up = self.lnext(up);
            }
        }

        // Fan out what is left from the leftmost vertex.
        if self.lnext(lo) == up {
            return Err(MeshError::DegenerateFace { face });
        }
        while self.lnext(self.lnext(lo)) != up {
            let diag = self.connect(self.lnext(lo), lo);
            lo = sym(diag);
        }
        Ok(())
    }

    /// Triangulates every face marked inside. Faces created by the cuts are
    /// inserted before the face being processed, so each is visited once.
    pub fn tessellate_interior(&mut self) -> Result<usize, MeshError> {
        let mut count = 0;
        let mut f = self.faces[F_HEAD as usize].next;
        while f != F_HEAD {
            let next = self.faces[f as usize].next;
            if self.faces[f as usize].inside {
                self.tessellate_mono_region(f)?;
                count += 1;
            }
            f = next;
        }
        Ok(count)
    }
}
