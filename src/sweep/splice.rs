// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Keeping adjacent dictionary edges consistent with each other: ordering
// violations at shared endpoints are fixed by splicing, and crossings are
// turned into new vertices that go back into the event queue.

use log::trace;

use super::{EventKey, RegionIdx, Sweep, INVALID_REGION};
use crate::geom::{intersect_segments, l1_dist, lex_eq, lex_leq, orient_sign, SweepPoint};
use crate::mesh::{sym, VertIdx, INVALID};

impl Sweep<'_> {
    /// Checks the right (origin) endpoints of `reg_up` and the region below it.
    ///
    /// If the upper edge's origin lies below the lower edge, or the lower edge's
    /// origin above the upper edge, the offending vertex is spliced into the other
    /// edge. Coincident origins on different vertices are merged and the merged
    /// vertex leaves the queue. Returns true if the mesh changed.
    pub(super) fn check_for_right_splice(&mut self, reg_up: RegionIdx) -> bool {
        let reg_lo = self.below(reg_up);
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let org_up = self.mesh.org_point(e_up);
        let org_lo = self.mesh.org_point(e_lo);

        if lex_leq(org_up, org_lo) {
            if orient_sign(self.mesh.dst_point(e_lo), org_up, org_lo) > 0.0 {
                return false;
            }
            if !lex_eq(org_up, org_lo) {
                // Splice e_up.Org into e_lo.
                self.mesh.split_edge(sym(e_lo));
                let oprev = self.mesh.oprev(e_lo);
                self.mesh.splice(e_up, oprev);
                self.reg_mut(reg_up).dirty = true;
                self.reg_mut(reg_lo).dirty = true;
            } else if self.mesh.org(e_up) != self.mesh.org(e_lo) {
                // Same location, different vertices: keep e_lo.Org.
                let dead = self.mesh.org(e_up);
                if let Some(handle) = self.mesh.verts[dead as usize].pq_handle.take() {
                    self.pq.delete(handle);
                }
                let oprev = self.mesh.oprev(e_lo);
                self.mesh.splice(oprev, e_up);
            }
        } else {
            if orient_sign(self.mesh.dst_point(e_up), org_lo, org_up) < 0.0 {
                return false;
            }
            // e_lo.Org is above e_up: splice it into e_up.
            let above = self.above(reg_up);
            self.reg_mut(above).dirty = true;
            self.reg_mut(reg_up).dirty = true;
            self.mesh.split_edge(sym(e_up));
            let oprev = self.mesh.oprev(e_lo);
            self.mesh.splice(oprev, e_up);
        }
        true
    }

    /// Same as [`check_for_right_splice`](Self::check_for_right_splice) for the left
    /// (destination) endpoints. The destinations are never at the same location.
    pub(super) fn check_for_left_splice(&mut self, reg_up: RegionIdx) -> bool {
        let reg_lo = self.below(reg_up);
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let dst_up = self.mesh.dst_point(e_up);
        let dst_lo = self.mesh.dst_point(e_lo);
        debug_assert!(!lex_eq(dst_up, dst_lo));

        if lex_leq(dst_up, dst_lo) {
            if orient_sign(dst_up, dst_lo, self.mesh.org_point(e_up)) < 0.0 {
                return false;
            }
            // e_lo.Dst is above e_up: splice it into e_up.
            let above = self.above(reg_up);
            self.reg_mut(above).dirty = true;
            self.reg_mut(reg_up).dirty = true;
            let e = self.mesh.split_edge(e_up);
            self.mesh.splice(sym(e_lo), e);
            let f = self.mesh.lface(e);
            self.mesh.faces[f as usize].inside = self.reg(reg_up).inside;
        } else {
            if orient_sign(dst_lo, dst_up, self.mesh.org_point(e_lo)) > 0.0 {
                return false;
            }
            // e_up.Dst is below e_lo: splice it into e_lo.
            self.reg_mut(reg_up).dirty = true;
            self.reg_mut(reg_lo).dirty = true;
            let e = self.mesh.split_edge(e_lo);
            let lnext = self.mesh.lnext(e_up);
            self.mesh.splice(lnext, sym(e_lo));
            let f = self.mesh.rface(e);
            self.mesh.faces[f as usize].inside = self.reg(reg_up).inside;
        }
        true
    }

    /// Tests the upper edge of `reg_up` against the edge below it for a crossing
    /// right of the sweep line. A crossing becomes a new vertex at the computed
    /// point, clamped so it never lands left of the event or right of either
    /// origin, and is queued as a future event.
    ///
    /// Returns true only when the repair had to re-run region clean-up itself, in
    /// which case the caller's view of the dictionary is stale.
    pub(super) fn check_for_intersect(&mut self, mut reg_up: RegionIdx) -> bool {
        let mut reg_lo = self.below(reg_up);
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let org_up = self.mesh.org(e_up);
        let org_lo = self.mesh.org(e_lo);
        let dst_up = self.mesh.dst(e_up);
        let dst_lo = self.mesh.dst(e_lo);
        let (p_org_up, p_org_lo) = (self.mesh.point(org_up), self.mesh.point(org_lo));
        let (p_dst_up, p_dst_lo) = (self.mesh.point(dst_up), self.mesh.point(dst_lo));
        let event = self.event_point();

        debug_assert!(!lex_eq(p_dst_lo, p_dst_up));
        debug_assert!(org_up != self.event && org_lo != self.event);
        debug_assert!(!self.reg(reg_up).fix_upper_edge && !self.reg(reg_lo).fix_upper_edge);

        if org_up == org_lo {
            return false;
        }

        let t_min_up = p_org_up.t.min(p_dst_up.t);
        let t_max_lo = p_org_lo.t.max(p_dst_lo.t);
        if t_min_up > t_max_lo {
            return false;
        }

        if lex_leq(p_org_up, p_org_lo) {
            if orient_sign(p_dst_lo, p_org_up, p_org_lo) > 0.0 {
                return false;
            }
        } else if orient_sign(p_dst_up, p_org_lo, p_org_up) < 0.0 {
            return false;
        }

        let mut isect = intersect_segments(p_dst_up, p_org_up, p_dst_lo, p_org_lo);
        if lex_leq(isect, event) {
            // Rounded to the left of the sweep line.
            isect = event;
        }
        let org_min = if lex_leq(p_org_up, p_org_lo) { p_org_up } else { p_org_lo };
        if lex_leq(org_min, isect) {
            isect = org_min;
        }

        if lex_eq(isect, p_org_up) || lex_eq(isect, p_org_lo) {
            // Crossing at one of the right endpoints.
            self.check_for_right_splice(reg_up);
            return false;
        }

        if (!lex_eq(p_dst_up, event) && orient_sign(p_dst_up, event, isect) >= 0.0)
            || (!lex_eq(p_dst_lo, event) && orient_sign(p_dst_lo, event, isect) <= 0.0)
        {
            // Rounding put one of the new edges on the wrong side of the event,
            // or through it.
            if dst_lo == self.event {
                // Splice dst_lo into e_up and redo the regions there.
                self.mesh.split_edge(sym(e_up));
                self.mesh.splice(sym(e_lo), e_up);
                reg_up = self.top_left_region(reg_up);
                let below = self.below(reg_up);
                let e_up = self.e_up(below);
                self.finish_left_regions(below, reg_lo);
                let oprev = self.mesh.oprev(e_up);
                self.add_right_edges(reg_up, oprev, e_up, Some(e_up), true);
                return true;
            }
            if dst_up == self.event {
                // Splice dst_up into e_lo and redo the regions there.
                self.mesh.split_edge(sym(e_lo));
                let lnext = self.mesh.lnext(e_up);
                let oprev = self.mesh.oprev(e_lo);
                self.mesh.splice(lnext, oprev);
                reg_lo = reg_up;
                reg_up = self.top_right_region(reg_up);
                let e = self.mesh.rprev(self.e_up(self.below(reg_up)));
                self.reg_mut(reg_lo).e_up = self.mesh.oprev(e_lo);
                let e_lo = self.finish_left_regions(reg_lo, INVALID_REGION);
                let first = self.mesh.onext(e_lo);
                let last = self.mesh.rprev(e_up);
                self.add_right_edges(reg_up, first, last, Some(e), true);
                return true;
            }

            // Only reachable from connect_right_vertex: split whichever edge passes
            // on the wrong side and move the new vertex onto the event. The caller
            // then splices it.
            if orient_sign(p_dst_up, event, isect) >= 0.0 {
                let above = self.above(reg_up);
                self.reg_mut(above).dirty = true;
                self.reg_mut(reg_up).dirty = true;
                self.mesh.split_edge(sym(e_up));
                let v = self.mesh.org(e_up);
                self.move_to_event(v);
            }
            if orient_sign(p_dst_lo, event, isect) <= 0.0 {
                self.reg_mut(reg_up).dirty = true;
                self.reg_mut(reg_lo).dirty = true;
                self.mesh.split_edge(sym(e_lo));
                let v = self.mesh.org(e_lo);
                self.move_to_event(v);
            }
            return false;
        }

        // General case: split both edges and join them at a new vertex. The
        // argument order of the splice keeps the new face on the processed side,
        // where faces are smaller.
        self.mesh.split_edge(sym(e_up));
        self.mesh.split_edge(sym(e_lo));
        let oprev = self.mesh.oprev(e_lo);
        self.mesh.splice(oprev, e_up);

        let v = self.mesh.org(e_up);
        {
            let vert = &mut self.mesh.verts[v as usize];
            vert.s = isect.s;
            vert.t = isect.t;
        }
        let handle = self.pq.insert(EventKey {
            point: isect,
            vertex: v,
        });
        self.mesh.verts[v as usize].pq_handle = Some(handle);
        self.interpolate_vertex(v, [org_up, dst_up, org_lo, dst_lo]);
        self.intersections += 1;
        trace!("  intersection v{} at ({}, {})", v, isect.s, isect.t);

        let above = self.above(reg_up);
        self.reg_mut(above).dirty = true;
        self.reg_mut(reg_up).dirty = true;
        self.reg_mut(reg_lo).dirty = true;
        false
    }

    /// Re-checks every dirty region from the bottom up, splicing and intersecting
    /// adjacent edges until the dictionary is consistent again.
    pub(super) fn walk_dirty_regions(&mut self, mut reg_up: RegionIdx) {
        let mut reg_lo = self.below(reg_up);
        loop {
            while reg_lo != INVALID_REGION && self.reg(reg_lo).dirty {
                reg_up = reg_lo;
                reg_lo = self.below(reg_lo);
            }
            if reg_lo == INVALID_REGION || !self.reg(reg_up).dirty {
                // Nothing lies below the bottom sentinel.
                self.reg_mut(reg_up).dirty = false;
                reg_lo = reg_up;
                reg_up = self.above(reg_up);
                if reg_up == INVALID_REGION || !self.reg(reg_up).dirty {
                    return;
                }
            }
            self.reg_mut(reg_up).dirty = false;
            let mut e_up = self.e_up(reg_up);
            let mut e_lo = self.e_up(reg_lo);

            if self.mesh.dst(e_up) != self.mesh.dst(e_lo) && self.check_for_left_splice(reg_up) {
                // A temporary edge is no longer needed once real edges bound the gap.
                if self.reg(reg_lo).fix_upper_edge {
                    self.delete_region(reg_lo);
                    self.mesh.delete_edge(e_lo);
                    reg_lo = self.below(reg_up);
                    e_lo = self.e_up(reg_lo);
                } else if self.reg(reg_up).fix_upper_edge {
                    self.delete_region(reg_up);
                    self.mesh.delete_edge(e_up);
                    reg_up = self.above(reg_lo);
                    e_up = self.e_up(reg_up);
                }
            }

            if self.mesh.org(e_up) != self.mesh.org(e_lo) {
                let dst_up = self.mesh.dst(e_up);
                let dst_lo = self.mesh.dst(e_lo);
                if dst_up != dst_lo
                    && !self.reg(reg_up).fix_upper_edge
                    && !self.reg(reg_lo).fix_upper_edge
                    && (dst_up == self.event || dst_lo == self.event)
                {
                    // check_for_intersect may fall back to the event as the crossing,
                    // so the event has to lie between two real edges.
                    if self.check_for_intersect(reg_up) {
                        return;
                    }
                } else {
                    self.check_for_right_splice(reg_up);
                }
            }

            if self.mesh.org(e_up) == self.mesh.org(e_lo) && self.mesh.dst(e_up) == self.mesh.dst(e_lo) {
                // Two-edge loop: fold the windings together and drop the upper edge.
                self.add_winding(e_lo, e_up);
                self.delete_region(reg_up);
                self.mesh.delete_edge(e_up);
                reg_up = self.above(reg_lo);
            }
        }
    }

    fn move_to_event(&mut self, v: VertIdx) {
        let event = &self.mesh.verts[self.event as usize];
        let (s, t, coords) = (event.s, event.t, event.coords);
        let vert = &mut self.mesh.verts[v as usize];
        vert.s = s;
        vert.t = t;
        vert.coords = coords;
    }

    /// Gives a crossing vertex 3D coordinates blended from the endpoints of the two
    /// edges that produced it. Each edge contributes half, split between its ends
    /// in inverse proportion to their L1 distance from the crossing.
    fn interpolate_vertex(&mut self, v: VertIdx, ends: [VertIdx; 4]) {
        let p: SweepPoint = self.mesh.point(v);
        let mut coords = [0.0; 3];
        for pair in ends.chunks(2) {
            let (org, dst) = (&self.mesh.verts[pair[0] as usize], &self.mesh.verts[pair[1] as usize]);
            let t1 = l1_dist(org.point(), p);
            let t2 = l1_dist(dst.point(), p);
            let (w_org, w_dst) = if t1 + t2 > 0.0 {
                (0.5 * t2 / (t1 + t2), 0.5 * t1 / (t1 + t2))
            } else {
                (0.25, 0.25)
            };
            for (i, c) in coords.iter_mut().enumerate() {
                *c += w_org * org.coords[i] + w_dst * dst.coords[i];
            }
        }
        let vert = &mut self.mesh.verts[v as usize];
        vert.coords = coords;
        vert.idx = INVALID;
    }
}
