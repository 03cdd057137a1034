// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Bentley-Ottmann style plane sweep.
//
// Vertices are processed in lex_leq order. The dictionary holds one
// ActiveRegion per gap between consecutive edges crossing the sweep line,
// bounded above and below by sentinel edges far outside the input. When a
// region is closed off by the sweep its left face is tagged inside or outside
// according to the winding rule. Crossings are turned into explicit vertices
// as soon as the two edges become adjacent in the dictionary, so every face
// left behind is monotone.
//
// Regions, dictionary nodes and queue handles all refer to each other by
// index. Removing a region clears the back-link from its edge first.

mod cleanup;
mod splice;

use log::{debug, log_enabled, trace, warn, Level};

use crate::dict::{Dict, NodeIdx};
use crate::error::{TessError, TessResult};
use crate::geom::{lex_eq, lex_leq, orient_eval, orient_sign, Real, SweepPoint};
use crate::mesh::{sym, EdgeIdx, Mesh, VertIdx, INVALID};
use crate::priorityq::PriorityQ;
use crate::tess::WindingRule;

/// Index into the sweep's region arena.
pub type RegionIdx = u32;

pub const INVALID_REGION: RegionIdx = INVALID;

/// The strip between two adjacent edges crossing the sweep line.
#[derive(Clone, Debug)]
pub struct ActiveRegion {
    /// Upper boundary, directed right to left.
    pub e_up: EdgeIdx,
    pub node_up: NodeIdx,
    pub winding_number: i32,
    pub inside: bool,
    /// One of the two synthetic edges framing the sweep.
    pub sentinel: bool,
    /// Upper or lower edge changed; adjacent pair must be re-checked.
    pub dirty: bool,
    /// `e_up` is a temporary edge that will be replaced once a better one is known.
    pub fix_upper_edge: bool,
}

impl ActiveRegion {
    fn new(e_up: EdgeIdx) -> Self {
        ActiveRegion {
            e_up,
            node_up: INVALID,
            winding_number: 0,
            inside: false,
            sentinel: false,
            dirty: false,
            fix_upper_edge: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct EventKey {
    point: SweepPoint,
    vertex: VertIdx,
}

fn event_leq(a: &EventKey, b: &EventKey) -> bool {
    lex_leq(a.point, b.point)
}

/// Orders regions by where their upper edges cross the sweep line at `event`.
///
/// Edges ending at the event itself are compared by slope, since they all meet
/// there. Every other pair is compared by evaluating both edges at the event's s.
fn edge_leq(mesh: &Mesh, regions: &[ActiveRegion], event: VertIdx, r1: RegionIdx, r2: RegionIdx) -> bool {
    let e1 = regions[r1 as usize].e_up;
    let e2 = regions[r2 as usize].e_up;
    let ev = mesh.point(event);

    if mesh.dst(e1) == event {
        if mesh.dst(e2) == event {
            if lex_leq(mesh.org_point(e1), mesh.org_point(e2)) {
                return orient_sign(mesh.dst_point(e2), mesh.org_point(e1), mesh.org_point(e2)) <= 0.0;
            }
            return orient_sign(mesh.dst_point(e1), mesh.org_point(e2), mesh.org_point(e1)) >= 0.0;
        }
        return orient_sign(mesh.dst_point(e2), ev, mesh.org_point(e2)) <= 0.0;
    }
    if mesh.dst(e2) == event {
        return orient_sign(mesh.dst_point(e1), ev, mesh.org_point(e1)) >= 0.0;
    }

    let t1 = orient_eval(mesh.dst_point(e1), ev, mesh.org_point(e1));
    let t2 = orient_eval(mesh.dst_point(e2), ev, mesh.org_point(e2));
    t1 >= t2
}

/// Sweep state for one tessellation run.
pub struct Sweep<'m> {
    mesh: &'m mut Mesh,
    rule: WindingRule,
    dict: Dict<RegionIdx>,
    pq: PriorityQ<EventKey>,
    regions: Vec<ActiveRegion>,
    free_regions: Vec<RegionIdx>,
    event: VertIdx,
    /// Bounding box of the input in sweep coordinates.
    bmin: SweepPoint,
    bmax: SweepPoint,
    intersections: usize,
}

/// Runs the sweep over a projected mesh.
///
/// On return every face is tagged inside or outside by `rule`, all crossings are
/// explicit vertices, and every inside face is monotone. Zero-length edges and
/// two-edge faces have been removed.
pub fn compute_interior(
    mesh: &mut Mesh,
    rule: WindingRule,
    bmin: SweepPoint,
    bmax: SweepPoint,
    validate: bool,
) -> TessResult<()> {
    let mut sweep = Sweep::new(mesh, rule, bmin, bmax);
    sweep.run(validate)
}

impl<'m> Sweep<'m> {
    fn new(mesh: &'m mut Mesh, rule: WindingRule, bmin: SweepPoint, bmax: SweepPoint) -> Self {
        let capacity = mesh.vertex_count().max(8);
        Sweep {
            mesh,
            rule,
            dict: Dict::new(),
            pq: PriorityQ::new(capacity, event_leq),
            regions: Vec::new(),
            free_regions: Vec::new(),
            event: INVALID,
            bmin,
            bmax,
            intersections: 0,
        }
    }

    fn run(&mut self, validate: bool) -> TessResult<()> {
        self.remove_degenerate_edges();
        self.init_priority_queue();
        self.init_edge_dict();

        let mut events = 0usize;
        while let Some(EventKey { vertex: v, .. }) = self.pq.extract_min() {
            self.mesh.verts[v as usize].pq_handle = None;
            if self.mesh.verts[v as usize].an_edge == INVALID {
                // Merged away while still queued.
                continue;
            }

            // Merge every vertex at exactly the same location before sweeping it.
            while let Some(next) = self.pq.peek_min() {
                if !lex_eq(next.point, self.mesh.point(v)) {
                    break;
                }
                self.pq.extract_min();
                let vn = next.vertex;
                self.mesh.verts[vn as usize].pq_handle = None;
                let dead = self.mesh.verts[vn as usize].an_edge;
                if dead != INVALID {
                    let keep = self.mesh.verts[v as usize].an_edge;
                    self.mesh.splice(keep, dead);
                }
            }

            events += 1;
            self.sweep_event(v);
        }

        debug!(
            "sweep finished: {} events, {} intersection vertices",
            events, self.intersections
        );

        self.done_edge_dict(validate)?;
        self.remove_degenerate_faces();
        if validate {
            self.mesh.check()?;
        }
        Ok(())
    }

    // ─────── Region bookkeeping ──────────────────────────────────────────────

    #[inline]
    fn reg(&self, r: RegionIdx) -> &ActiveRegion {
        &self.regions[r as usize]
    }

    #[inline]
    fn reg_mut(&mut self, r: RegionIdx) -> &mut ActiveRegion {
        &mut self.regions[r as usize]
    }

    #[inline]
    fn e_up(&self, r: RegionIdx) -> EdgeIdx {
        self.regions[r as usize].e_up
    }

    #[inline]
    fn event_point(&self) -> SweepPoint {
        self.mesh.point(self.event)
    }

    fn above(&self, r: RegionIdx) -> RegionIdx {
        let node = self.dict.succ(self.reg(r).node_up);
        self.dict.key(node).unwrap_or(INVALID_REGION)
    }

    fn below(&self, r: RegionIdx) -> RegionIdx {
        let node = self.dict.pred(self.reg(r).node_up);
        self.dict.key(node).unwrap_or(INVALID_REGION)
    }

    fn alloc_region(&mut self, region: ActiveRegion) -> RegionIdx {
        match self.free_regions.pop() {
            Some(r) => {
                self.regions[r as usize] = region;
                r
            }
            None => {
                self.regions.push(region);
                (self.regions.len() - 1) as RegionIdx
            }
        }
    }

    fn dict_insert_before(&mut self, node: NodeIdx, reg: RegionIdx) -> NodeIdx {
        let (mesh, regions, event) = (&*self.mesh, &self.regions, self.event);
        self.dict
            .insert_before(node, reg, |a, b| edge_leq(mesh, regions, event, a, b))
    }

    fn dict_search(&self, reg: RegionIdx) -> RegionIdx {
        let (mesh, regions, event) = (&*self.mesh, &self.regions, self.event);
        let node = self.dict.search(reg, |a, b| edge_leq(mesh, regions, event, a, b));
        self.dict.key(node).unwrap_or(INVALID_REGION)
    }

    /// New region with upper edge `e_new_up`, placed directly below `reg_above`.
    fn add_region_below(&mut self, reg_above: RegionIdx, e_new_up: EdgeIdx) -> RegionIdx {
        let reg = self.alloc_region(ActiveRegion::new(e_new_up));
        let hint = self.reg(reg_above).node_up;
        let node = self.dict_insert_before(hint, reg);
        self.reg_mut(reg).node_up = node;
        self.mesh.edges[e_new_up as usize].active_region = reg;
        reg
    }

    fn delete_region(&mut self, reg: RegionIdx) {
        let ActiveRegion { e_up, node_up, .. } = *self.reg(reg);
        debug_assert!(!self.reg(reg).fix_upper_edge || self.mesh.winding(e_up) == 0);
        self.mesh.edges[e_up as usize].active_region = INVALID;
        self.dict.delete(node_up);
        self.free_regions.push(reg);
    }

    /// Replaces the temporary upper edge of `reg` with `new_edge`.
    fn fix_upper_edge(&mut self, reg: RegionIdx, new_edge: EdgeIdx) {
        debug_assert!(self.reg(reg).fix_upper_edge);
        let old = self.e_up(reg);
        self.mesh.delete_edge(old);
        let r = self.reg_mut(reg);
        r.fix_upper_edge = false;
        r.e_up = new_edge;
        self.mesh.edges[new_edge as usize].active_region = reg;
    }

    fn compute_winding(&mut self, reg: RegionIdx) {
        let above = self.above(reg);
        let winding = self.reg(above).winding_number + self.mesh.winding(self.e_up(reg));
        let inside = self.rule.is_inside(winding);
        let r = self.reg_mut(reg);
        r.winding_number = winding;
        r.inside = inside;
    }

    /// Retires a region whose upper and lower edges both end at the event,
    /// tagging its left face.
    fn finish_region(&mut self, reg: RegionIdx) {
        let e = self.e_up(reg);
        let f = self.mesh.lface(e);
        let face = &mut self.mesh.faces[f as usize];
        face.inside = self.regions[reg as usize].inside;
        face.an_edge = e;
        self.delete_region(reg);
    }

    /// Uppermost region whose upper edge leaves the same origin as `reg`'s, then
    /// one above it. A temporary edge found there is replaced now that its
    /// vertex has real right-going edges.
    fn top_left_region(&mut self, mut reg: RegionIdx) -> RegionIdx {
        let org = self.mesh.org(self.e_up(reg));
        loop {
            reg = self.above(reg);
            if self.mesh.org(self.e_up(reg)) != org {
                break;
            }
        }
        if self.reg(reg).fix_upper_edge {
            let below_up = self.e_up(self.below(reg));
            let lnext = self.mesh.lnext(self.e_up(reg));
            let e = self.mesh.connect(sym(below_up), lnext);
            self.fix_upper_edge(reg, e);
            reg = self.above(reg);
        }
        reg
    }

    fn top_right_region(&self, mut reg: RegionIdx) -> RegionIdx {
        let dst = self.mesh.dst(self.e_up(reg));
        loop {
            reg = self.above(reg);
            if self.mesh.dst(self.e_up(reg)) != dst {
                return reg;
            }
        }
    }

    fn add_winding(&mut self, e_dst: EdgeIdx, e_src: EdgeIdx) {
        let w = self.mesh.winding(e_src);
        let w_sym = self.mesh.winding(sym(e_src));
        self.mesh.edges[e_dst as usize].winding += w;
        self.mesh.edges[sym(e_dst) as usize].winding += w_sym;
    }

    // ─────── Event processing ────────────────────────────────────────────────

    /// Finishes regions from `reg_first` down to (not including) `reg_last`, whose
    /// upper edges all end at the event, relinking the mesh so the edges around
    /// the event appear in dictionary order. Returns the lowest left-going edge.
    fn finish_left_regions(&mut self, reg_first: RegionIdx, reg_last: RegionIdx) -> EdgeIdx {
        let mut reg_prev = reg_first;
        let mut e_prev = self.e_up(reg_first);
        while reg_prev != reg_last {
            self.reg_mut(reg_prev).fix_upper_edge = false;
            let reg = self.below(reg_prev);
            let mut e = self.e_up(reg);
            if self.mesh.org(e) != self.mesh.org(e_prev) {
                if !self.reg(reg).fix_upper_edge {
                    // Past the last left-going edge.
                    self.finish_region(reg_prev);
                    break;
                }
                // The lower edge is temporary; swap in a real one ending at the event.
                let lprev = self.mesh.lprev(e_prev);
                e = self.mesh.connect(lprev, sym(e));
                self.fix_upper_edge(reg, e);
            }

            if self.mesh.onext(e_prev) != e {
                let oprev = self.mesh.oprev(e);
                self.mesh.splice(oprev, e);
                self.mesh.splice(e_prev, e);
            }
            self.finish_region(reg_prev);
            e_prev = self.e_up(reg);
            reg_prev = reg;
        }
        e_prev
    }

    /// Adds regions for the right-going edges `e_first..e_last` (Onext order) below
    /// `reg_up`, then walks every right-going edge at this vertex assigning winding
    /// numbers and relinking the mesh to match dictionary order. `e_top_left` is the
    /// edge just above the new ones around their origin, if there are left-going edges.
    fn add_right_edges(
        &mut self,
        reg_up: RegionIdx,
        e_first: EdgeIdx,
        e_last: EdgeIdx,
        e_top_left: Option<EdgeIdx>,
        clean_up: bool,
    ) {
        let mut e = e_first;
        loop {
            debug_assert!(lex_leq(self.mesh.org_point(e), self.mesh.dst_point(e)));
            self.add_region_below(reg_up, sym(e));
            e = self.mesh.onext(e);
            if e == e_last {
                break;
            }
        }

        let e_top_left = match e_top_left {
            Some(e) => e,
            None => self.mesh.rprev(self.e_up(self.below(reg_up))),
        };

        let mut reg_prev = reg_up;
        let mut e_prev = e_top_left;
        let mut first_time = true;
        loop {
            let reg = self.below(reg_prev);
            let e = sym(self.e_up(reg));
            if self.mesh.org(e) != self.mesh.org(e_prev) {
                break;
            }

            if self.mesh.onext(e) != e_prev {
                // Move e to sit just below e_prev around the vertex.
                let oprev = self.mesh.oprev(e);
                self.mesh.splice(oprev, e);
                let oprev_prev = self.mesh.oprev(e_prev);
                self.mesh.splice(oprev_prev, e);
            }

            let winding = self.reg(reg_prev).winding_number - self.mesh.winding(e);
            let inside = self.rule.is_inside(winding);
            let r = self.reg_mut(reg);
            r.winding_number = winding;
            r.inside = inside;

            // Coincident right-going edges are merged before any intersection tests.
            self.reg_mut(reg_prev).dirty = true;
            if !first_time && self.check_for_right_splice(reg_prev) {
                self.add_winding(e, e_prev);
                self.delete_region(reg_prev);
                self.mesh.delete_edge(e_prev);
            }
            first_time = false;
            reg_prev = reg;
            e_prev = e;
        }
        self.reg_mut(reg_prev).dirty = true;

        if clean_up {
            self.walk_dirty_regions(reg_prev);
        }
    }

    /// The event has left-going edges but none going right. A temporary edge is
    /// added to the closer of the two bounding chains so the event stays connected.
    fn connect_right_vertex(&mut self, mut reg_up: RegionIdx, mut e_bottom_left: EdgeIdx) {
        let mut e_top_left = self.mesh.onext(e_bottom_left);
        let reg_lo = self.below(reg_up);
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let mut degenerate = false;

        if self.mesh.dst(e_up) != self.mesh.dst(e_lo) {
            self.check_for_intersect(reg_up);
        }

        // The bounding edges may now pass through the event itself.
        if lex_eq(self.mesh.org_point(e_up), self.event_point()) {
            let oprev = self.mesh.oprev(e_top_left);
            self.mesh.splice(oprev, e_up);
            reg_up = self.top_left_region(reg_up);
            let below = self.below(reg_up);
            e_top_left = self.e_up(below);
            self.finish_left_regions(below, reg_lo);
            degenerate = true;
        }
        if lex_eq(self.mesh.org_point(e_lo), self.event_point()) {
            let oprev = self.mesh.oprev(e_lo);
            self.mesh.splice(e_bottom_left, oprev);
            e_bottom_left = self.finish_left_regions(reg_lo, INVALID_REGION);
            degenerate = true;
        }
        if degenerate {
            let first = self.mesh.onext(e_bottom_left);
            self.add_right_edges(reg_up, first, e_top_left, Some(e_top_left), true);
            return;
        }

        let target = if lex_leq(self.mesh.org_point(e_lo), self.mesh.org_point(e_up)) {
            self.mesh.oprev(e_lo)
        } else {
            e_up
        };
        let lprev = self.mesh.lprev(e_bottom_left);
        let e_new = self.mesh.connect(lprev, target);

        // No clean-up yet, or e_new could vanish before it is marked temporary.
        let onext = self.mesh.onext(e_new);
        self.add_right_edges(reg_up, e_new, onext, Some(onext), false);
        let temp_region = self.mesh.edges[sym(e_new) as usize].active_region;
        self.reg_mut(temp_region).fix_upper_edge = true;
        self.walk_dirty_regions(reg_up);
    }

    /// The event lies exactly on the upper edge of `reg_up` (or on its endpoints).
    fn connect_left_degenerate(&mut self, mut reg_up: RegionIdx, v_event: VertIdx) {
        let e = self.e_up(reg_up);
        let ev_edge = self.mesh.verts[v_event as usize].an_edge;

        if lex_eq(self.mesh.org_point(e), self.mesh.point(v_event)) {
            // Unprocessed vertex at the same spot: merge and wait for it.
            self.mesh.splice(e, ev_edge);
            return;
        }

        if !lex_eq(self.mesh.dst_point(e), self.mesh.point(v_event)) {
            // Split e at the event and splice the event into it.
            self.mesh.split_edge(sym(e));
            if self.reg(reg_up).fix_upper_edge {
                // Drop the unused part of the temporary edge.
                let onext = self.mesh.onext(e);
                self.mesh.delete_edge(onext);
                self.reg_mut(reg_up).fix_upper_edge = false;
            }
            let ev_edge = self.mesh.verts[v_event as usize].an_edge;
            self.mesh.splice(ev_edge, e);
            self.sweep_event(v_event);
            return;
        }

        // The event coincides with e.Dst, which was already processed: splice in
        // the extra right-going edges.
        reg_up = self.top_right_region(reg_up);
        let reg = self.below(reg_up);
        let mut e_top_right = sym(self.e_up(reg));
        let e_last = self.mesh.onext(e_top_right);
        let mut e_top_left = Some(e_last);
        if self.reg(reg).fix_upper_edge {
            // e.Dst had only a temporary right-going edge; the real ones replace it.
            self.delete_region(reg);
            self.mesh.delete_edge(e_top_right);
            e_top_right = self.mesh.oprev(e_last);
        }
        let ev_edge = self.mesh.verts[v_event as usize].an_edge;
        self.mesh.splice(ev_edge, e_top_right);
        if !self.mesh.edge_goes_left(e_last) {
            e_top_left = None;
        }
        let first = self.mesh.onext(e_top_right);
        self.add_right_edges(reg_up, first, e_last, e_top_left, true);
    }

    /// The event has no processed edges: every edge at it goes right.
    fn connect_left_vertex(&mut self, v_event: VertIdx) {
        let an_edge = self.mesh.verts[v_event as usize].an_edge;

        // Locate the region containing the event with a temporary search key.
        let key = self.alloc_region(ActiveRegion::new(sym(an_edge)));
        let reg_up = self.dict_search(key);
        self.free_regions.push(key);

        // The sentinels bracket every event, so both lookups always succeed.
        debug_assert_ne!(reg_up, INVALID_REGION, "no region above left vertex {}", v_event);
        if reg_up == INVALID_REGION {
            warn!("left vertex {} has no region above it; event dropped", v_event);
            return;
        }
        let reg_lo = self.below(reg_up);
        debug_assert_ne!(reg_lo, INVALID_REGION, "no region below left vertex {}", v_event);
        if reg_lo == INVALID_REGION {
            warn!("left vertex {} has no region below it; event dropped", v_event);
            return;
        }
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);

        if orient_sign(self.mesh.dst_point(e_up), self.mesh.point(v_event), self.mesh.org_point(e_up)) == 0.0 {
            self.connect_left_degenerate(reg_up, v_event);
            return;
        }

        // Connect to the rightmost processed vertex of either chain.
        let reg = if lex_leq(self.mesh.dst_point(e_lo), self.mesh.dst_point(e_up)) {
            reg_up
        } else {
            reg_lo
        };

        if self.reg(reg_up).inside || self.reg(reg).fix_upper_edge {
            let e_new = if reg == reg_up {
                let lnext = self.mesh.lnext(e_up);
                self.mesh.connect(sym(an_edge), lnext)
            } else {
                let dnext = self.mesh.dnext(e_lo);
                sym(self.mesh.connect(dnext, an_edge))
            };
            if self.reg(reg).fix_upper_edge {
                self.fix_upper_edge(reg, e_new);
            } else {
                let new_reg = self.add_region_below(reg_up, e_new);
                self.compute_winding(new_reg);
            }
            self.sweep_event(v_event);
        } else {
            // Outside the polygon: no need to connect the vertex to anything.
            self.add_right_edges(reg_up, an_edge, an_edge, None, true);
        }
    }

    fn sweep_event(&mut self, v_event: VertIdx) {
        self.event = v_event;
        if log_enabled!(Level::Trace) {
            let p = self.mesh.point(v_event);
            trace!("event v{} at ({}, {})", v_event, p.s, p.t);
            self.trace_regions();
        }

        // Look for an edge at the event that is already an upper region boundary.
        let start = self.mesh.verts[v_event as usize].an_edge;
        let mut e = start;
        while self.mesh.edges[e as usize].active_region == INVALID {
            e = self.mesh.onext(e);
            if e == start {
                trace!("  left vertex");
                self.connect_left_vertex(v_event);
                return;
            }
        }

        // Close off the regions between left-going edges, then add the right-going ones.
        let reg_up = self.top_left_region(self.mesh.edges[e as usize].active_region);
        let reg = self.below(reg_up);
        let e_top_left = self.e_up(reg);
        let e_bottom_left = self.finish_left_regions(reg, INVALID_REGION);

        if self.mesh.onext(e_bottom_left) == e_top_left {
            trace!("  right vertex without right-going edges");
            self.connect_right_vertex(reg_up, e_bottom_left);
        } else {
            trace!("  right vertex");
            let first = self.mesh.onext(e_bottom_left);
            self.add_right_edges(reg_up, first, e_top_left, Some(e_top_left), true);
        }
    }

    fn trace_regions(&self) {
        for r in self.dict.keys() {
            let reg = self.reg(r);
            let (o, d) = (self.mesh.org_point(reg.e_up), self.mesh.dst_point(reg.e_up));
            trace!(
                "  region {}: ({}, {}) -> ({}, {}) winding {} inside {}{}{}",
                r,
                o.s,
                o.t,
                d.s,
                d.t,
                reg.winding_number,
                reg.inside,
                if reg.dirty { " dirty" } else { "" },
                if reg.fix_upper_edge { " fix" } else { "" },
            );
        }
    }

    // ─────── Setup and teardown ──────────────────────────────────────────────

    fn init_priority_queue(&mut self) {
        let verts: Vec<VertIdx> = self.mesh.vertex_ids().collect();
        for v in verts {
            let key = EventKey {
                point: self.mesh.point(v),
                vertex: v,
            };
            let handle = self.pq.insert(key);
            self.mesh.verts[v as usize].pq_handle = Some(handle);
        }
        self.pq.init();
    }

    /// Adds a horizontal sentinel edge from `smax` to `smin` at height `t`.
    fn add_sentinel(&mut self, smin: Real, smax: Real, t: Real) {
        let e = self.mesh.make_edge();
        let (org, dst) = (self.mesh.org(e), self.mesh.dst(e));
        for (v, s) in [(org, smax), (dst, smin)] {
            let vert = &mut self.mesh.verts[v as usize];
            vert.s = s;
            vert.t = t;
        }
        self.event = dst;

        let mut region = ActiveRegion::new(e);
        region.sentinel = true;
        let reg = self.alloc_region(region);
        let (mesh, regions, event) = (&*self.mesh, &self.regions, self.event);
        let node = self
            .dict
            .insert(reg, |a, b| edge_leq(mesh, regions, event, a, b));
        self.reg_mut(reg).node_up = node;
    }

    /// Frames the input with sentinels well outside its bounding box.
    fn init_edge_dict(&mut self) {
        let w = (self.bmax.s - self.bmin.s) + 0.01;
        let h = (self.bmax.t - self.bmin.t) + 0.01;
        let smin = self.bmin.s - w;
        let smax = self.bmax.s + w;
        let tmin = self.bmin.t - h;
        let tmax = self.bmax.t + h;
        self.add_sentinel(smin, smax, tmin);
        self.add_sentinel(smin, smax, tmax);
    }

    /// Retires the regions left once the queue is empty: the two sentinels and at
    /// most one temporary edge. Any other leftover region, or one with non-zero
    /// winding, means a contour was not closed.
    fn done_edge_dict(&mut self, validate: bool) -> TessResult<()> {
        let mut fixed_edges = 0;
        while let Some(reg) = self.dict.key(self.dict.min()) {
            let region = self.reg(reg).clone();
            if !region.sentinel {
                fixed_edges += 1;
                if validate && (!region.fix_upper_edge || fixed_edges > 1) {
                    return Err(TessError::UnclosedContours {
                        winding: region.winding_number,
                    });
                }
            }
            if region.winding_number != 0 {
                if validate {
                    return Err(TessError::UnclosedContours {
                        winding: region.winding_number,
                    });
                }
                warn!("region left with winding {} at end of sweep", region.winding_number);
            }
            self.delete_region(reg);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loop_mesh(points: &[(Real, Real)]) -> Mesh {
        let mut mesh = Mesh::new();
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
            mesh.verts[v].coords = [s, t, 0.0];
            mesh.edges[e as usize].winding = 1;
            mesh.edges[sym(e) as usize].winding = -1;
        }
        mesh
    }

    fn bounds(mesh: &Mesh) -> (SweepPoint, SweepPoint) {
        let mut lo = SweepPoint::new(Real::MAX, Real::MAX);
        let mut hi = SweepPoint::new(Real::MIN, Real::MIN);
        for v in mesh.vertex_ids() {
            let p = mesh.point(v);
            lo.s = lo.s.min(p.s);
            lo.t = lo.t.min(p.t);
            hi.s = hi.s.max(p.s);
            hi.t = hi.t.max(p.t);
        }
        (lo, hi)
    }

    fn inside_faces(mesh: &Mesh) -> usize {
        mesh.face_ids().filter(|&f| mesh.faces[f as usize].inside).count()
    }

    fn face_vertices(mesh: &Mesh, f: u32) -> Vec<VertIdx> {
        let start = mesh.faces[f as usize].an_edge;
        let mut out = Vec::new();
        let mut e = start;
        loop {
            out.push(mesh.org(e));
            e = mesh.lnext(e);
            if e == start {
                break;
            }
        }
        out
    }

    fn sweep(points: &[(Real, Real)], rule: WindingRule) -> Mesh {
        let mut mesh = loop_mesh(points);
        let (lo, hi) = bounds(&mesh);
        compute_interior(&mut mesh, rule, lo, hi, true).unwrap();
        mesh
    }

    #[test]
    fn square_interior_is_one_monotone_face() {
        let mesh = sweep(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)], WindingRule::Odd);
        assert_eq!(inside_faces(&mesh), 1);
        assert!(mesh.check().is_ok());
    }

    #[test]
    fn only_input_vertices_survive_discarding_the_exterior() {
        let mut mesh = sweep(&[(0.0, 0.0), (4.0, 0.0), (2.0, 3.0)], WindingRule::NonZero);
        mesh.discard_exterior();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.edge_count(), 3);
    }

    #[test]
    fn bowtie_gains_an_intersection_vertex() {
        let mesh = sweep(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)], WindingRule::Odd);
        // Sentinel vertices linger on the outside face until it is discarded.
        let mut used: Vec<VertIdx> = mesh
            .face_ids()
            .filter(|&f| mesh.faces[f as usize].inside)
            .flat_map(|f| face_vertices(&mesh, f))
            .collect();
        used.sort_unstable();
        used.dedup();
        assert_eq!(used.len(), 5);
        assert_eq!(inside_faces(&mesh), 2);
        let input = used.iter().filter(|&&v| mesh.verts[v as usize].idx != INVALID).count();
        assert_eq!(input, 4);
        let crossing = mesh
            .vertex_ids()
            .find(|&v| mesh.verts[v as usize].idx == INVALID)
            .map(|v| mesh.point(v));
        let crossing = crossing.expect("intersection vertex");
        approx::assert_abs_diff_eq!(crossing.s, 5.0, epsilon = 1e-4);
        approx::assert_abs_diff_eq!(crossing.t, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn disjoint_contours_each_start_from_a_left_vertex() {
        // Two squares side by side and one above: every contour opens with a left vertex
        // that must land between existing regions.
        let mut mesh = loop_mesh(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        for square in [
            [(3.0, 0.0), (5.0, 0.0), (5.0, 2.0), (3.0, 2.0)],
            [(1.0, 3.0), (4.0, 3.0), (4.0, 5.0), (1.0, 5.0)],
        ] {
            let mut e = INVALID;
            for &(s, t) in &square {
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
                mesh.edges[e as usize].winding = 1;
                mesh.edges[sym(e) as usize].winding = -1;
            }
        }
        let (lo, hi) = bounds(&mesh);
        compute_interior(&mut mesh, WindingRule::NonZero, lo, hi, true).unwrap();
        assert!(inside_faces(&mesh) >= 3);
        mesh.discard_exterior();
        assert_eq!(mesh.vertex_count(), 12);
        assert!(mesh.check().is_ok());
    }

    #[test]
    fn concave_polygon_is_split_into_monotone_pieces() {
        // A "W" shape: two reflex vertices opening downward force extra diagonals.
        let mesh = sweep(
            &[(0.0, 0.0), (1.0, 3.0), (2.0, 1.0), (3.0, 3.0), (4.0, 1.0), (5.0, 3.0), (6.0, 0.0)],
            WindingRule::NonZero,
        );
        assert!(inside_faces(&mesh) >= 1);
        assert!(mesh.check().is_ok());
    }

    #[test]
    fn edge_leq_orders_by_height_at_event() {
        let mut mesh = Mesh::new();
        let low = mesh.make_edge();
        let high = mesh.make_edge();
        let ev_edge = mesh.make_edge();
        let set = |mesh: &mut Mesh, v: VertIdx, s: Real, t: Real| {
            mesh.verts[v as usize].s = s;
            mesh.verts[v as usize].t = t;
        };
        // Edges directed right to left.
        let (lo_org, lo_dst) = (mesh.org(low), mesh.dst(low));
        let (hi_org, hi_dst) = (mesh.org(high), mesh.dst(high));
        let event = mesh.org(ev_edge);
        set(&mut mesh, lo_org, 10.0, 0.0);
        set(&mut mesh, lo_dst, 0.0, 0.0);
        set(&mut mesh, hi_org, 10.0, 5.0);
        set(&mut mesh, hi_dst, 0.0, 5.0);
        set(&mut mesh, event, 5.0, 2.0);

        let regions = vec![ActiveRegion::new(low), ActiveRegion::new(high)];
        assert!(edge_leq(&mesh, &regions, event, 0, 1));
        assert!(!edge_leq(&mesh, &regions, event, 1, 0));
    }
}
