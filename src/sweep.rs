// License: SGI Free Software License B (MIT-compatible)
//
// The sweep: computes the planar arrangement of the projected contours and
// marks each face inside or outside according to the winding rule.
//
// A sweep line moves left to right (vert_leq order) across the plane. The
// dictionary holds the active regions, bottom to top, between the edges
// currently crossing the sweep line; two horizontal sentinel edges far above
// and below all input bracket the dictionary so every query has an answer.
// The event queue delivers vertices in sweep order; edge intersections
// discovered en route are split, given a synthesized vertex via the combine
// callback, and queued as new events.
//
// Numerical errors can leave the computed arrangement locally inconsistent
// with the dictionary order. The "dirty region" machinery re-checks any
// region pair whose neighborhood changed and restores the invariants by
// splicing (check_for_right_splice / check_for_left_splice) before any
// further intersection tests.
//
// The mesh is passed explicitly through the sweep calls; the tessellator
// itself carries the dictionary, region arena, event queue, and callbacks.

use tracing::{debug, trace};

use crate::dict::{Dict, NodeIdx, DICT_HEAD};
use crate::geom::{
    edge_intersect, edge_sign, vert_eq, vert_l1_dist, vert_leq, Real, SENTINEL_COORD,
};
use crate::mesh::{EdgeIdx, Mesh, VertIdx, E_HEAD, F_HEAD, INVALID, V_HEAD};
use crate::priorityq::PriorityQ;
use crate::tess::{TessError, Tessellator};

/// Index into the tessellator's region arena.
pub type RegionIdx = u32;

/// A region of the plane between two adjacent active edges, tracked while
/// the sweep line crosses it. e_up is the upper bounding edge; the lower
/// bound is the next region down in the dictionary.
#[derive(Clone, Debug)]
pub struct ActiveRegion {
    /// Upper bounding edge, oriented right to left.
    pub e_up: EdgeIdx,
    /// This region's node in the sweep dictionary.
    pub node_up: NodeIdx,
    /// Winding number just below e_up.
    pub winding_number: i32,
    pub inside: bool,
    pub sentinel: bool,
    /// Marked when the region's bounds need re-checking against its
    /// neighbor before the next intersection test.
    pub dirty: bool,
    /// e_up is a temporary edge introduced by connect_right_vertex; it must
    /// be replaced (or deleted with zero winding) before the region ends.
    pub fix_upper_edge: bool,
}

impl Default for ActiveRegion {
    fn default() -> Self {
        Self {
            e_up: INVALID,
            node_up: INVALID,
            winding_number: 0,
            inside: false,
            sentinel: false,
            dirty: false,
            fix_upper_edge: false,
        }
    }
}

/// Event-queue key. Coordinates are copied in because a queued vertex's
/// (s, t) never changes while it is in the queue.
#[derive(Clone, Copy, Debug)]
pub struct EventKey {
    pub s: Real,
    pub t: Real,
    pub vert: VertIdx,
}

pub fn event_leq(a: &EventKey, b: &EventKey) -> bool {
    vert_leq(a.s, a.t, b.s, b.t)
}

/// Fold e_src's winding onto e_dst (both halves) before deleting e_src.
fn add_winding(mesh: &mut Mesh, e_dst: EdgeIdx, e_src: EdgeIdx) {
    mesh.edges[e_dst as usize].winding += mesh.edges[e_src as usize].winding;
    mesh.edges[(e_dst ^ 1) as usize].winding += mesh.edges[(e_src ^ 1) as usize].winding;
}

/// Delete any face reduced to two edges (residue of fixable-edge cleanup),
/// folding its winding onto the surviving neighbor.
pub(crate) fn remove_degenerate_faces(mesh: &mut Mesh) {
    let mut f = mesh.faces[F_HEAD as usize].next;
    while f != F_HEAD {
        let f_next = mesh.faces[f as usize].next;
        let e = mesh.faces[f as usize].an_edge;
        debug_assert!(mesh.lnext(e) != e);

        if mesh.lnext(mesh.lnext(e)) == e {
            let e_onext = mesh.onext(e);
            add_winding(mesh, e_onext, e);
            mesh.delete_edge(e);
        }
        f = f_next;
    }
}

impl<D: 'static> Tessellator<D> {
    // ─────────────── Region arena ───────────────

    fn alloc_region(&mut self) -> RegionIdx {
        if let Some(idx) = self.region_free.pop() {
            self.regions[idx as usize] = ActiveRegion::default();
            idx
        } else {
            let idx = self.regions.len() as RegionIdx;
            self.regions.push(ActiveRegion::default());
            idx
        }
    }

    fn free_region(&mut self, idx: RegionIdx) {
        self.region_free.push(idx);
    }

    #[inline]
    fn region(&self, idx: RegionIdx) -> &ActiveRegion {
        &self.regions[idx as usize]
    }

    #[inline]
    fn region_mut(&mut self, idx: RegionIdx) -> &mut ActiveRegion {
        &mut self.regions[idx as usize]
    }

    /// Region on the opposite side of e_up, one up in the dictionary.
    fn region_above(&self, reg: RegionIdx) -> RegionIdx {
        self.dict.key(self.dict.succ(self.region(reg).node_up))
    }

    fn region_below(&self, reg: RegionIdx) -> RegionIdx {
        self.dict.key(self.dict.pred(self.region(reg).node_up))
    }

    // ─────────────── Dictionary ordering ───────────────

    /// Both edges cross the sweep line through the current event. Orders
    /// them by where they cross it, with a consistent tie-break when one or
    /// both terminate exactly at the event.
    fn edge_leq(&self, mesh: &Mesh, reg1: RegionIdx, reg2: RegionIdx) -> bool {
        let e1 = self.region(reg1).e_up;
        let e2 = self.region(reg2).e_up;

        let (e1os, e1ot) = mesh.vert_st(mesh.org(e1));
        let (e1ds, e1dt) = mesh.vert_st(mesh.dst(e1));
        let (e2os, e2ot) = mesh.vert_st(mesh.org(e2));
        let (e2ds, e2dt) = mesh.vert_st(mesh.dst(e2));
        let (ev_s, ev_t) = (self.event_s, self.event_t);

        if vert_eq(e1ds, e1dt, ev_s, ev_t) {
            if vert_eq(e2ds, e2dt, ev_s, ev_t) {
                // Both destinations touch the event; sort by slope.
                if vert_leq(e1os, e1ot, e2os, e2ot) {
                    return edge_sign(e2ds, e2dt, e1os, e1ot, e2os, e2ot) <= 0.0;
                }
                return edge_sign(e1ds, e1dt, e2os, e2ot, e1os, e1ot) >= 0.0;
            }
            return edge_sign(e2ds, e2dt, ev_s, ev_t, e2os, e2ot) <= 0.0;
        }
        if vert_eq(e2ds, e2dt, ev_s, ev_t) {
            return edge_sign(e1ds, e1dt, ev_s, ev_t, e1os, e1ot) >= 0.0;
        }

        // General case: compare the t-heights where each edge crosses the
        // sweep line.
        let t1 = crate::geom::edge_eval(e1ds, e1dt, ev_s, ev_t, e1os, e1ot);
        let t2 = crate::geom::edge_eval(e2ds, e2dt, ev_s, ev_t, e2os, e2ot);
        t1 >= t2
    }

    /// Insert `reg` into the dictionary, walking backward from `node` to
    /// its sorted position.
    fn dict_insert_region(&mut self, mesh: &Mesh, mut node: NodeIdx, reg: RegionIdx) -> NodeIdx {
        loop {
            node = self.dict.pred(node);
            let key = self.dict.key(node);
            if key == INVALID || self.edge_leq(mesh, key, reg) {
                break;
            }
        }
        self.dict.link_after(node, reg)
    }

    /// First region at or above the query edge, walking forward from the
    /// bottom of the dictionary.
    fn dict_search_region(&mut self, mesh: &Mesh, tmp_e_up: EdgeIdx) -> RegionIdx {
        let tmp_reg = self.alloc_region();
        self.region_mut(tmp_reg).e_up = tmp_e_up;

        let mut node = self.dict.succ(DICT_HEAD);
        let result = loop {
            let key = self.dict.key(node);
            if key == INVALID {
                break INVALID;
            }
            if self.edge_leq(mesh, tmp_reg, key) {
                break key;
            }
            node = self.dict.succ(node);
        };

        self.free_region(tmp_reg);
        result
    }

    // ─────────────── Event queue ───────────────

    fn pq_insert_vertex(&mut self, mesh: &mut Mesh, v: VertIdx) {
        let (s, t) = mesh.vert_st(v);
        if let Some(pq) = self.pq.as_mut() {
            let handle = pq.insert(EventKey { s, t, vert: v });
            mesh.verts[v as usize].pq_handle = handle;
        }
    }

    fn pq_delete(&mut self, handle: i32) {
        if let Some(pq) = self.pq.as_mut() {
            pq.delete(handle);
        }
    }

    fn pq_minimum(&self) -> Option<EventKey> {
        let pq = self.pq.as_ref()?;
        if pq.is_empty() {
            None
        } else {
            pq.minimum()
        }
    }

    fn pq_extract_min(&mut self) -> Option<EventKey> {
        let pq = self.pq.as_mut()?;
        if pq.is_empty() {
            None
        } else {
            pq.extract_min()
        }
    }

    fn init_priority_queue(&mut self, mesh: &mut Mesh) {
        let mut count = 0usize;
        let mut v = mesh.verts[V_HEAD as usize].next;
        while v != V_HEAD {
            count += 1;
            v = mesh.verts[v as usize].next;
        }

        let mut pq = PriorityQ::new(count.max(1), event_leq);
        let mut v = mesh.verts[V_HEAD as usize].next;
        while v != V_HEAD {
            let (s, t) = mesh.vert_st(v);
            let handle = pq.insert(EventKey { s, t, vert: v });
            mesh.verts[v as usize].pq_handle = handle;
            v = mesh.verts[v as usize].next;
        }
        pq.init();
        self.pq = Some(pq);

        debug!(vertices = count, "event queue built");
    }

    // ─────────────── Sentinels ───────────────

    /// A horizontal sentinel edge at height t, guaranteeing that every
    /// dictionary search has a region above and below it.
    fn add_sentinel(&mut self, mesh: &mut Mesh, smin: Real, smax: Real, t: Real) {
        let e = mesh.make_edge();
        {
            let org = mesh.org(e);
            mesh.verts[org as usize].s = smax;
            mesh.verts[org as usize].t = t;
            let dst = mesh.dst(e);
            mesh.verts[dst as usize].s = smin;
            mesh.verts[dst as usize].t = t;
        }
        let dst = mesh.dst(e);
        let (ds, dt) = mesh.vert_st(dst);
        self.event = dst;
        self.event_s = ds;
        self.event_t = dt;

        let reg = self.alloc_region();
        {
            let r = self.region_mut(reg);
            r.e_up = e;
            r.winding_number = 0;
            r.inside = false;
            r.fix_upper_edge = false;
            r.sentinel = true;
            r.dirty = false;
        }
        let node = self.dict_insert_region(mesh, DICT_HEAD, reg);
        self.region_mut(reg).node_up = node;
        mesh.edges[e as usize].active_region = reg;
    }

    fn init_edge_dict(&mut self, mesh: &mut Mesh) {
        self.dict = Dict::new();
        self.add_sentinel(mesh, -SENTINEL_COORD, SENTINEL_COORD, -SENTINEL_COORD);
        self.add_sentinel(mesh, -SENTINEL_COORD, SENTINEL_COORD, SENTINEL_COORD);
    }

    fn done_edge_dict(&mut self, mesh: &mut Mesh) {
        loop {
            let node = self.dict.min();
            if node == DICT_HEAD {
                break;
            }
            let reg = self.dict.key(node);
            if !self.region(reg).sentinel {
                // The only region that may remain besides the sentinels is
                // the residue of a single unterminated fixable edge.
                debug_assert!(self.region(reg).fix_upper_edge);
            }
            debug_assert_eq!(self.region(reg).winding_number, 0);
            self.delete_region(mesh, reg);
        }
    }

    // ─────────────── Region bookkeeping ───────────────

    /// New region directly below `reg_above`, bounded above by `e_new_up`.
    /// The caller is responsible for the winding number.
    fn add_region_below(
        &mut self,
        mesh: &mut Mesh,
        reg_above: RegionIdx,
        e_new_up: EdgeIdx,
    ) -> RegionIdx {
        let reg_new = self.alloc_region();
        self.region_mut(reg_new).e_up = e_new_up;
        let node_above = self.region(reg_above).node_up;
        let node = self.dict_insert_region(mesh, node_above, reg_new);
        self.region_mut(reg_new).node_up = node;
        mesh.edges[e_new_up as usize].active_region = reg_new;
        reg_new
    }

    fn delete_region(&mut self, mesh: &mut Mesh, reg: RegionIdx) {
        if self.region(reg).fix_upper_edge {
            // A fixable edge is only deleted once its winding is zero.
            debug_assert_eq!(mesh.edges[self.region(reg).e_up as usize].winding, 0);
        }
        let e_up = self.region(reg).e_up;
        mesh.edges[e_up as usize].active_region = INVALID;
        self.dict.delete(self.region(reg).node_up);
        self.free_region(reg);
    }

    /// Replace a fixable upper edge with a real one.
    fn fix_upper_edge(&mut self, mesh: &mut Mesh, reg: RegionIdx, new_edge: EdgeIdx) {
        debug_assert!(self.region(reg).fix_upper_edge);
        let old = self.region(reg).e_up;
        mesh.delete_edge(old);
        let r = self.region_mut(reg);
        r.fix_upper_edge = false;
        r.e_up = new_edge;
        mesh.edges[new_edge as usize].active_region = reg;
    }

    fn compute_winding(&mut self, mesh: &Mesh, reg: RegionIdx) {
        let above = self.region_above(reg);
        let winding =
            self.region(above).winding_number + mesh.edges[self.region(reg).e_up as usize].winding;
        let inside = self.is_winding_inside(winding);
        let r = self.region_mut(reg);
        r.winding_number = winding;
        r.inside = inside;
    }

    /// The sweep has passed the region: transfer its inside flag to the
    /// bounded face and retire it.
    fn finish_region(&mut self, mesh: &mut Mesh, reg: RegionIdx) {
        let e = self.region(reg).e_up;
        let lface = mesh.edges[e as usize].lface;
        mesh.faces[lface as usize].inside = self.region(reg).inside;
        // Optimization for tessellate_mono_region: start near the rightmost
        // vertex of the face.
        mesh.faces[lface as usize].an_edge = e;
        self.delete_region(mesh, reg);
    }

    /// Region above the uppermost edge sharing reg's upper-edge origin,
    /// fixing a temporary edge there if one is found.
    fn top_left_region(&mut self, mesh: &mut Mesh, reg: RegionIdx) -> RegionIdx {
        let org = mesh.org(self.region(reg).e_up);
        let mut r = reg;
        loop {
            r = self.region_above(r);
            if mesh.org(self.region(r).e_up) != org {
                break;
            }
        }
        if self.region(r).fix_upper_edge {
            let below = self.region_below(r);
            let below_e_sym = self.region(below).e_up ^ 1;
            let r_e_lnext = mesh.lnext(self.region(r).e_up);
            let new_e = mesh.connect(below_e_sym, r_e_lnext);
            self.fix_upper_edge(mesh, r, new_e);
            r = self.region_above(r);
        }
        r
    }

    /// Region above the uppermost edge sharing reg's upper-edge destination.
    fn top_right_region(&self, mesh: &Mesh, reg: RegionIdx) -> RegionIdx {
        let dst = mesh.dst(self.region(reg).e_up);
        let mut r = reg;
        loop {
            r = self.region_above(r);
            if mesh.dst(self.region(r).e_up) != dst {
                break;
            }
        }
        r
    }

    /// Finish regions from reg_first down while their left-going upper
    /// edges all end at the event (or until reg_last). Fixable edges found
    /// along the way get a real edge connected in their place, and the
    /// mesh's onext order is relinked to match the dictionary order.
    /// Returns the lowermost left-going edge processed.
    fn finish_left_regions(
        &mut self,
        mesh: &mut Mesh,
        reg_first: RegionIdx,
        reg_last: RegionIdx,
    ) -> EdgeIdx {
        let mut reg_prev = reg_first;
        let mut e_prev = self.region(reg_first).e_up;

        while reg_prev != reg_last {
            self.region_mut(reg_prev).fix_upper_edge = false;
            let reg = self.region_below(reg_prev);
            let mut e = self.region(reg).e_up;

            if mesh.org(e) != mesh.org(e_prev) {
                if !self.region(reg).fix_upper_edge {
                    self.finish_region(mesh, reg_prev);
                    break;
                }
                // Time to fix the temporary edge from connect_right_vertex.
                let new_e = mesh.connect(mesh.lprev(e_prev), e ^ 1);
                self.fix_upper_edge(mesh, reg, new_e);
                e = new_e;
            }

            if mesh.onext(e_prev) != e {
                // Relink so e immediately follows e_prev around the origin.
                let e_oprev = mesh.oprev(e);
                mesh.splice(e_oprev, e);
                mesh.splice(e_prev, e);
            }

            self.finish_region(mesh, reg_prev);
            e_prev = self.region(reg).e_up;
            reg_prev = reg;
        }
        e_prev
    }

    // ─────────────── Combine plumbing ───────────────

    pub(crate) fn call_error(&mut self, err: TessError) {
        if let Some(cb) = self.cb.error.as_mut() {
            cb(err);
        }
    }

    /// Give the vertex client data through the combine callback. Without a
    /// callback: an optional merge (needed = false) falls back to the first
    /// contributing datum, a synthesized intersection (needed = true) is a
    /// fatal error, reported once.
    fn call_combine(
        &mut self,
        mesh: &mut Mesh,
        v: VertIdx,
        data4: [u32; 4],
        weights: [Real; 4],
        needed: bool,
    ) {
        let coords = mesh.verts[v as usize].coords;
        mesh.verts[v as usize].data = INVALID;

        if let Some(combine) = self.cb.combine.as_mut() {
            let pool = &self.data;
            let refs = data4.map(|i| pool.get(i as usize));
            let merged = combine(coords, refs, weights);
            self.data.push(merged);
            mesh.verts[v as usize].data = (self.data.len() - 1) as u32;
        } else if !needed {
            mesh.verts[v as usize].data = data4[0];
        } else if !self.fatal_error {
            debug!("edges intersect but no combine callback is registered");
            self.call_error(TessError::NeedCombineCallback);
            self.fatal_error = true;
        }
    }

    /// Two vertices with identical (s, t) merge into one; the client hears
    /// about it through combine with half weight each.
    fn splice_merge_vertices(&mut self, mesh: &mut Mesh, e1: EdgeIdx, e2: EdgeIdx) {
        let d1 = mesh.verts[mesh.org(e1) as usize].data;
        let d2 = mesh.verts[mesh.org(e2) as usize].data;
        self.call_combine(
            mesh,
            mesh.org(e1),
            [d1, d2, INVALID, INVALID],
            [0.5, 0.5, 0.0, 0.0],
            false,
        );
        mesh.splice(e1, e2);
    }

    /// Coordinates and client data for a synthesized intersection vertex.
    /// Each edge contributes half the total weight, split between its
    /// endpoints in inverse proportion to their L1 distance from the
    /// intersection.
    fn get_intersect_data(
        &mut self,
        mesh: &mut Mesh,
        isect: VertIdx,
        org_up: VertIdx,
        dst_up: VertIdx,
        org_lo: VertIdx,
        dst_lo: VertIdx,
    ) {
        mesh.verts[isect as usize].coords = [0.0; 3];
        let (w0, w1) = vertex_weights(mesh, isect, org_up, dst_up);
        let (w2, w3) = vertex_weights(mesh, isect, org_lo, dst_lo);
        let data4 = [
            mesh.verts[org_up as usize].data,
            mesh.verts[dst_up as usize].data,
            mesh.verts[org_lo as usize].data,
            mesh.verts[dst_lo as usize].data,
        ];
        self.call_combine(mesh, isect, data4, [w0, w1, w2, w3], true);
    }

    // ─────────────── Splice checks ───────────────

    /// The upper and lower edges of reg_up should meet at their left ends
    /// in the order the dictionary says; if numerically they do not, splice
    /// the later origin into the other edge. Returns true if the topology
    /// changed.
    fn check_for_right_splice(&mut self, mesh: &mut Mesh, reg_up: RegionIdx) -> bool {
        let reg_lo = self.region_below(reg_up);
        let e_up = self.region(reg_up).e_up;
        let e_lo = self.region(reg_lo).e_up;

        let up_org = mesh.org(e_up);
        let lo_org = mesh.org(e_lo);
        let (euo_s, euo_t) = mesh.vert_st(up_org);
        let (elo_s, elo_t) = mesh.vert_st(lo_org);
        let (eld_s, eld_t) = mesh.vert_st(mesh.dst(e_lo));
        let (eud_s, eud_t) = mesh.vert_st(mesh.dst(e_up));

        if vert_leq(euo_s, euo_t, elo_s, elo_t) {
            if edge_sign(eld_s, eld_t, euo_s, euo_t, elo_s, elo_t) > 0.0 {
                return false;
            }
            if !vert_eq(euo_s, euo_t, elo_s, elo_t) {
                // Splice e_up's origin into e_lo.
                mesh.split_edge(e_lo ^ 1);
                let e_lo_oprev = mesh.oprev(e_lo);
                mesh.splice(e_up, e_lo_oprev);
                self.region_mut(reg_up).dirty = true;
                self.region_mut(reg_lo).dirty = true;
            } else if up_org != lo_org {
                // Coincident distinct vertices: merge them, discarding
                // e_up's origin from the queue.
                let handle = mesh.verts[up_org as usize].pq_handle;
                self.pq_delete(handle);
                let e_lo_oprev = mesh.oprev(e_lo);
                self.splice_merge_vertices(mesh, e_lo_oprev, e_up);
            }
        } else {
            if edge_sign(eud_s, eud_t, elo_s, elo_t, euo_s, euo_t) < 0.0 {
                return false;
            }
            // e_lo's origin sits above e_up: splice it in.
            let above = self.region_above(reg_up);
            self.region_mut(above).dirty = true;
            self.region_mut(reg_up).dirty = true;
            mesh.split_edge(e_up ^ 1);
            let e_lo_oprev = mesh.oprev(e_lo);
            mesh.splice(e_lo_oprev, e_up);
        }
        true
    }

    /// Mirror image of check_for_right_splice for the right (destination)
    /// ends of the two edges.
    fn check_for_left_splice(&mut self, mesh: &mut Mesh, reg_up: RegionIdx) -> bool {
        let reg_lo = self.region_below(reg_up);
        let e_up = self.region(reg_up).e_up;
        let e_lo = self.region(reg_lo).e_up;

        let (eud_s, eud_t) = mesh.vert_st(mesh.dst(e_up));
        let (eld_s, eld_t) = mesh.vert_st(mesh.dst(e_lo));
        let (euo_s, euo_t) = mesh.vert_st(mesh.org(e_up));
        let (elo_s, elo_t) = mesh.vert_st(mesh.org(e_lo));
        debug_assert!(!vert_eq(eud_s, eud_t, eld_s, eld_t));

        if vert_leq(eud_s, eud_t, eld_s, eld_t) {
            if edge_sign(eud_s, eud_t, eld_s, eld_t, euo_s, euo_t) < 0.0 {
                return false;
            }
            // e_lo's destination is above e_up: splice it into e_up.
            let above = self.region_above(reg_up);
            self.region_mut(above).dirty = true;
            self.region_mut(reg_up).dirty = true;
            let e = mesh.split_edge(e_up);
            mesh.splice(e_lo ^ 1, e);
            let lf = mesh.edges[e as usize].lface;
            mesh.faces[lf as usize].inside = self.region(reg_up).inside;
        } else {
            if edge_sign(eld_s, eld_t, eud_s, eud_t, elo_s, elo_t) > 0.0 {
                return false;
            }
            // e_up's destination is below e_lo: splice it into e_lo.
            self.region_mut(reg_up).dirty = true;
            self.region_mut(reg_lo).dirty = true;
            let e = mesh.split_edge(e_lo);
            let e_up_lnext = mesh.lnext(e_up);
            mesh.splice(e_up_lnext, e_lo ^ 1);
            let rf = mesh.rface(e);
            mesh.faces[rf as usize].inside = self.region(reg_up).inside;
        }
        true
    }

    /// Test the upper and lower edges of reg_up for a proper crossing and,
    /// if found, split both at a synthesized vertex queued as a new event.
    /// The intersection is clamped so it never falls before the current
    /// event or before the later of the two origins. Returns true only when
    /// the current event was spliced into an edge and fully reprocessed.
    fn check_for_intersect(&mut self, mesh: &mut Mesh, reg_up: RegionIdx) -> bool {
        let reg_lo = self.region_below(reg_up);
        let e_up = self.region(reg_up).e_up;
        let e_lo = self.region(reg_lo).e_up;

        let org_up = mesh.org(e_up);
        let org_lo = mesh.org(e_lo);
        let dst_up = mesh.dst(e_up);
        let dst_lo = mesh.dst(e_lo);

        let (ou_s, ou_t) = mesh.vert_st(org_up);
        let (ol_s, ol_t) = mesh.vert_st(org_lo);
        let (du_s, du_t) = mesh.vert_st(dst_up);
        let (dl_s, dl_t) = mesh.vert_st(dst_lo);
        let (ev_s, ev_t) = (self.event_s, self.event_t);

        debug_assert!(!vert_eq(du_s, du_t, dl_s, dl_t));
        debug_assert!(org_up != self.event && org_lo != self.event);
        debug_assert!(
            !self.region(reg_up).fix_upper_edge && !self.region(reg_lo).fix_upper_edge
        );

        if org_up == org_lo {
            return false; // right endpoints are the same
        }

        let t_min_up = ou_t.min(du_t);
        let t_max_lo = ol_t.max(dl_t);
        if t_min_up > t_max_lo {
            return false; // t ranges are disjoint
        }

        if vert_leq(ou_s, ou_t, ol_s, ol_t) {
            if edge_sign(dl_s, dl_t, ou_s, ou_t, ol_s, ol_t) > 0.0 {
                return false;
            }
        } else if edge_sign(du_s, du_t, ol_s, ol_t, ou_s, ou_t) < 0.0 {
            return false;
        }

        let (mut isect_s, mut isect_t) = edge_intersect(du_s, du_t, ou_s, ou_t, dl_s, dl_t, ol_s, ol_t);

        // The intersection may not be in sweep order; clamp it forward to
        // the event and back to the later origin, so processing never moves
        // backward.
        if vert_leq(isect_s, isect_t, ev_s, ev_t) {
            isect_s = ev_s;
            isect_t = ev_t;
        }
        let (om_s, om_t) = if vert_leq(ou_s, ou_t, ol_s, ol_t) {
            (ou_s, ou_t)
        } else {
            (ol_s, ol_t)
        };
        if vert_leq(om_s, om_t, isect_s, isect_t) {
            isect_s = om_s;
            isect_t = om_t;
        }

        if vert_eq(isect_s, isect_t, ou_s, ou_t) || vert_eq(isect_s, isect_t, ol_s, ol_t) {
            // Easy case: the intersection collapsed onto an origin.
            self.check_for_right_splice(mesh, reg_up);
            return false;
        }

        trace!(s = isect_s, t = isect_t, "edge intersection");

        if (!vert_eq(du_s, du_t, ev_s, ev_t)
            && edge_sign(du_s, du_t, ev_s, ev_t, isect_s, isect_t) >= 0.0)
            || (!vert_eq(dl_s, dl_t, ev_s, ev_t)
                && edge_sign(dl_s, dl_t, ev_s, ev_t, isect_s, isect_t) <= 0.0)
        {
            // A destination numerically on the wrong side of the event.
            if dst_lo == self.event {
                // Splice dst_lo into e_up and reprocess.
                mesh.split_edge(e_up ^ 1);
                mesh.splice(e_lo ^ 1, e_up);
                let reg_up2 = self.top_left_region(mesh, reg_up);
                let e_up2 = self.region(self.region_below(reg_up2)).e_up;
                let below = self.region_below(reg_up2);
                self.finish_left_regions(mesh, below, reg_lo);
                let e_oprev = mesh.oprev(e_up2);
                self.add_right_edges(mesh, reg_up2, e_oprev, e_up2, e_up2, true);
                return true;
            }
            if dst_up == self.event {
                // Splice dst_up into e_lo and reprocess.
                mesh.split_edge(e_lo ^ 1);
                let e_up_lnext = mesh.lnext(e_up);
                let e_lo_oprev = mesh.oprev(e_lo);
                mesh.splice(e_up_lnext, e_lo_oprev);
                let reg_lo2 = reg_up;
                let reg_up2 = self.top_right_region(mesh, reg_up);
                let e_finish = mesh.rprev(self.region(self.region_below(reg_up2)).e_up);
                let new_lo_up = mesh.oprev(e_lo);
                self.region_mut(reg_lo2).e_up = new_lo_up;
                let lo_end = self.finish_left_regions(mesh, reg_lo2, INVALID);
                let e_first = mesh.onext(lo_end);
                let e_last = mesh.rprev(e_up);
                self.add_right_edges(mesh, reg_up2, e_first, e_last, e_finish, true);
                return true;
            }
            // Split whichever edge passes the event on the wrong side and
            // let connect_right_vertex splice things up.
            if edge_sign(du_s, du_t, ev_s, ev_t, isect_s, isect_t) >= 0.0 {
                let above = self.region_above(reg_up);
                self.region_mut(above).dirty = true;
                self.region_mut(reg_up).dirty = true;
                mesh.split_edge(e_up ^ 1);
                let org = mesh.org(e_up);
                mesh.verts[org as usize].s = ev_s;
                mesh.verts[org as usize].t = ev_t;
            }
            if edge_sign(dl_s, dl_t, ev_s, ev_t, isect_s, isect_t) <= 0.0 {
                self.region_mut(reg_up).dirty = true;
                self.region_mut(reg_lo).dirty = true;
                mesh.split_edge(e_lo ^ 1);
                let org = mesh.org(e_lo);
                mesh.verts[org as usize].s = ev_s;
                mesh.verts[org as usize].t = ev_t;
            }
            return false;
        }

        // General case: split both edges and splice the two new vertices
        // into one intersection vertex, queued as a future event.
        mesh.split_edge(e_up ^ 1);
        mesh.split_edge(e_lo ^ 1);
        let e_lo_oprev = mesh.oprev(e_lo);
        mesh.splice(e_lo_oprev, e_up);

        let isect = mesh.org(e_up);
        mesh.verts[isect as usize].s = isect_s;
        mesh.verts[isect as usize].t = isect_t;
        self.pq_insert_vertex(mesh, isect);
        self.get_intersect_data(mesh, isect, org_up, dst_up, org_lo, dst_lo);

        let above = self.region_above(reg_up);
        self.region_mut(above).dirty = true;
        self.region_mut(reg_up).dirty = true;
        self.region_mut(reg_lo).dirty = true;
        false
    }

    /// Re-examine every dirty region pair, restoring the dictionary
    /// invariants by splicing, merging identical edges, and testing for
    /// intersections exposed by the changes.
    fn walk_dirty_regions(&mut self, mesh: &mut Mesh, reg_up: RegionIdx) {
        let mut reg_up = reg_up;
        let mut reg_lo = self.region_below(reg_up);

        loop {
            // Find the lowest dirty region; pairs get checked bottom-up.
            while reg_lo != INVALID && self.region(reg_lo).dirty {
                reg_up = reg_lo;
                reg_lo = self.region_below(reg_lo);
            }
            if !self.region(reg_up).dirty {
                reg_lo = reg_up;
                reg_up = self.region_above(reg_up);
                if reg_up == INVALID || !self.region(reg_up).dirty {
                    return;
                }
            }
            self.region_mut(reg_up).dirty = false;
            if reg_lo == INVALID {
                return;
            }
            let mut e_up = self.region(reg_up).e_up;
            let mut e_lo = self.region(reg_lo).e_up;

            if mesh.dst(e_up) != mesh.dst(e_lo) && self.check_for_left_splice(mesh, reg_up) {
                // A splice freed one of the regions' fixable edges.
                if self.region(reg_lo).fix_upper_edge {
                    self.delete_region(mesh, reg_lo);
                    mesh.delete_edge(e_lo);
                    reg_lo = self.region_below(reg_up);
                    e_lo = self.region(reg_lo).e_up;
                } else if self.region(reg_up).fix_upper_edge {
                    self.delete_region(mesh, reg_up);
                    mesh.delete_edge(e_up);
                    reg_up = self.region_above(reg_lo);
                    e_up = self.region(reg_up).e_up;
                }
            }

            if mesh.org(e_up) != mesh.org(e_lo) {
                if mesh.dst(e_up) != mesh.dst(e_lo)
                    && !self.region(reg_up).fix_upper_edge
                    && !self.region(reg_lo).fix_upper_edge
                    && (mesh.dst(e_up) == self.event || mesh.dst(e_lo) == self.event)
                {
                    if self.check_for_intersect(mesh, reg_up) {
                        // The walk restarted inside check_for_intersect.
                        return;
                    }
                } else {
                    self.check_for_right_splice(mesh, reg_up);
                }
            }

            if mesh.org(e_up) == mesh.org(e_lo) && mesh.dst(e_up) == mesh.dst(e_lo) {
                // Identical edges: merge windings and drop one region.
                add_winding(mesh, e_lo, e_up);
                self.delete_region(mesh, reg_up);
                mesh.delete_edge(e_up);
                reg_up = self.region_above(reg_lo);
            }
        }
    }

    // ─────────────── Per-event processing ───────────────

    /// Insert the right-going edges from the current event into the
    /// dictionary (between e_first's and e_last's onext positions), set
    /// their winding numbers, and relink the mesh to the dictionary order.
    /// `e_top_left` is the leftmost of the event's left-going edges, or
    /// INVALID if there were none.
    fn add_right_edges(
        &mut self,
        mesh: &mut Mesh,
        reg_up: RegionIdx,
        e_first: EdgeIdx,
        e_last: EdgeIdx,
        e_top_left: EdgeIdx,
        clean_up: bool,
    ) {
        let mut e = e_first;
        loop {
            debug_assert!(mesh.edge_goes_right(e));
            self.add_region_below(mesh, reg_up, e ^ 1);
            e = mesh.onext(e);
            if e == e_last {
                break;
            }
        }

        let e_top_left = if e_top_left == INVALID {
            let below = self.region_below(reg_up);
            mesh.rprev(self.region(below).e_up)
        } else {
            e_top_left
        };

        let mut reg_prev = reg_up;
        let mut e_prev = e_top_left;
        let mut first_time = true;

        loop {
            let reg = self.region_below(reg_prev);
            let e = self.region(reg).e_up ^ 1;
            if mesh.org(e) != mesh.org(e_prev) {
                break;
            }

            if mesh.onext(e) != e_prev {
                // Unlink e and relink it below e_prev.
                let e_oprev = mesh.oprev(e);
                mesh.splice(e_oprev, e);
                let ep_oprev = mesh.oprev(e_prev);
                mesh.splice(ep_oprev, e);
            }

            let winding =
                self.region(reg_prev).winding_number - mesh.edges[e as usize].winding;
            let inside = self.is_winding_inside(winding);
            {
                let r = self.region_mut(reg);
                r.winding_number = winding;
                r.inside = inside;
            }

            // Two outgoing edges with the same slope get merged before any
            // intersection tests see them.
            self.region_mut(reg_prev).dirty = true;
            if !first_time && self.check_for_right_splice(mesh, reg_prev) {
                add_winding(mesh, e, e_prev);
                self.delete_region(mesh, reg_prev);
                mesh.delete_edge(e_prev);
            }
            first_time = false;
            reg_prev = reg;
            e_prev = e;
        }
        self.region_mut(reg_prev).dirty = true;

        if clean_up {
            self.walk_dirty_regions(mesh, reg_prev);
        }
    }

    /// The event has no right-going edges; connect it rightward with a
    /// temporary fixable edge so the region invariants hold until a real
    /// right endpoint arrives.
    fn connect_right_vertex(&mut self, mesh: &mut Mesh, reg_up: RegionIdx, e_bottom_left: EdgeIdx) {
        let mut e_bottom_left = e_bottom_left;
        let mut e_top_left = mesh.onext(e_bottom_left);
        let reg_lo = self.region_below(reg_up);
        let e_up = self.region(reg_up).e_up;
        let e_lo = self.region(reg_lo).e_up;
        let mut degenerate = false;
        let mut reg_up = reg_up;

        if mesh.dst(e_up) != mesh.dst(e_lo) {
            self.check_for_intersect(mesh, reg_up);
        }

        // The intersection handling may have left the event coinciding
        // with an edge origin; handle those degeneracies now.
        let up_org = mesh.org(e_up);
        let (s, t) = mesh.vert_st(up_org);
        if vert_eq(s, t, self.event_s, self.event_t) {
            let e_tl_oprev = mesh.oprev(e_top_left);
            mesh.splice(e_tl_oprev, e_up);
            reg_up = self.top_left_region(mesh, reg_up);
            let below = self.region_below(reg_up);
            e_top_left = self.region(below).e_up;
            self.finish_left_regions(mesh, below, reg_lo);
            degenerate = true;
        }
        let lo_org = mesh.org(e_lo);
        let (s, t) = mesh.vert_st(lo_org);
        if vert_eq(s, t, self.event_s, self.event_t) {
            let e_lo_oprev = mesh.oprev(e_lo);
            mesh.splice(e_bottom_left, e_lo_oprev);
            e_bottom_left = self.finish_left_regions(mesh, reg_lo, INVALID);
            degenerate = true;
        }
        if degenerate {
            let e_first = mesh.onext(e_bottom_left);
            self.add_right_edges(mesh, reg_up, e_first, e_top_left, e_top_left, true);
            return;
        }

        // Connect to the nearer of the two origins.
        let (euo_s, euo_t) = mesh.vert_st(mesh.org(e_up));
        let (elo_s, elo_t) = mesh.vert_st(mesh.org(e_lo));
        let e_target = if vert_leq(elo_s, elo_t, euo_s, euo_t) {
            mesh.oprev(e_lo)
        } else {
            e_up
        };
        let e_bl_lprev = mesh.lprev(e_bottom_left);
        let e_new = mesh.connect(e_bl_lprev, e_target);

        let e_new_onext = mesh.onext(e_new);
        self.add_right_edges(mesh, reg_up, e_new, e_new_onext, e_new_onext, false);
        let new_region = mesh.edges[(e_new ^ 1) as usize].active_region;
        self.region_mut(new_region).fix_upper_edge = true;
        self.walk_dirty_regions(mesh, reg_up);
    }

    /// The event lies exactly on an edge already in the dictionary.
    fn connect_left_degenerate(&mut self, mesh: &mut Mesh, reg_up: RegionIdx, v_event: VertIdx) {
        let e = self.region(reg_up).e_up;
        let (os, ot) = mesh.vert_st(mesh.org(e));

        if vert_eq(os, ot, self.event_s, self.event_t) {
            // e's origin is an unprocessed coincident vertex: merge now and
            // let the queue deliver it later.
            let v_an = mesh.verts[v_event as usize].an_edge;
            self.splice_merge_vertices(mesh, e, v_an);
            return;
        }

        let (ds, dt) = mesh.vert_st(mesh.dst(e));
        if !vert_eq(ds, dt, self.event_s, self.event_t) {
            // General case: the event splits the interior of e.
            mesh.split_edge(e ^ 1);
            if self.region(reg_up).fix_upper_edge {
                // The fixable edge now has a real endpoint; drop the spare
                // half left by the split.
                let e_onext = mesh.onext(e);
                mesh.delete_edge(e_onext);
                self.region_mut(reg_up).fix_upper_edge = false;
            }
            let v_an = mesh.verts[v_event as usize].an_edge;
            mesh.splice(v_an, e);
            self.sweep_event(mesh, v_event);
            return;
        }

        // The event coincides with e's destination, which was already
        // processed: splice in the new right-going edges.
        let reg_up = self.top_right_region(mesh, reg_up);
        let reg = self.region_below(reg_up);
        let mut e_top_right = self.region(reg).e_up ^ 1;
        let e_top_left = mesh.onext(e_top_right);
        let e_last = e_top_left;
        if self.region(reg).fix_upper_edge {
            // The destination had only a fixable right-going edge; the new
            // real edges replace it.
            debug_assert!(e_top_left != e_top_right);
            self.delete_region(mesh, reg);
            mesh.delete_edge(e_top_right);
            e_top_right = mesh.oprev(e_top_left);
        }
        let v_an = mesh.verts[v_event as usize].an_edge;
        mesh.splice(v_an, e_top_right);
        let e_top_left = if !mesh.edge_goes_left(e_top_left) {
            INVALID // no left-going edges at the destination
        } else {
            e_top_left
        };
        let e_first = mesh.onext(e_top_right);
        self.add_right_edges(mesh, reg_up, e_first, e_last, e_top_left, true);
    }

    /// The event's edges are all right-going: it starts fresh regions.
    /// Either it lies in an interior region (connect it leftward so the
    /// region can later be triangulated), or it only needs its own edges
    /// inserted.
    fn connect_left_vertex(&mut self, mesh: &mut Mesh, v_event: VertIdx) {
        let an_edge = mesh.verts[v_event as usize].an_edge;

        let reg_up = self.dict_search_region(mesh, an_edge ^ 1);
        let reg_lo = self.region_below(reg_up);
        if reg_lo == INVALID {
            // Can happen for coplanar degenerate input.
            return;
        }
        let e_up = self.region(reg_up).e_up;
        let e_lo = self.region(reg_lo).e_up;

        let (eud_s, eud_t) = mesh.vert_st(mesh.dst(e_up));
        let (euo_s, euo_t) = mesh.vert_st(mesh.org(e_up));
        if edge_sign(eud_s, eud_t, self.event_s, self.event_t, euo_s, euo_t) == 0.0 {
            self.connect_left_degenerate(mesh, reg_up, v_event);
            return;
        }

        // Connect to the edge whose destination comes later.
        let (eld_s, eld_t) = mesh.vert_st(mesh.dst(e_lo));
        let reg = if vert_leq(eld_s, eld_t, eud_s, eud_t) {
            reg_up
        } else {
            reg_lo
        };

        if self.region(reg_up).inside || self.region(reg).fix_upper_edge {
            let e_new = if reg == reg_up {
                mesh.connect(an_edge ^ 1, mesh.lnext(e_up))
            } else {
                mesh.connect(mesh.dnext(e_lo), an_edge) ^ 1
            };
            if self.region(reg).fix_upper_edge {
                self.fix_upper_edge(mesh, reg, e_new);
            } else {
                let r = self.add_region_below(mesh, reg_up, e_new);
                self.compute_winding(mesh, r);
            }
            self.sweep_event(mesh, v_event);
        } else {
            self.add_right_edges(mesh, reg_up, an_edge, an_edge, INVALID, true);
        }
    }

    /// Process one event vertex: finish the regions it closes off on the
    /// left and open regions for its right-going edges.
    fn sweep_event(&mut self, mesh: &mut Mesh, v_event: VertIdx) {
        trace!(
            v = v_event,
            s = self.event_s,
            t = self.event_t,
            "sweep event"
        );

        // Is the event a right endpoint of an edge already in the
        // dictionary?
        let an_edge = mesh.verts[v_event as usize].an_edge;
        let mut e = an_edge;
        loop {
            if mesh.edges[e as usize].active_region != INVALID {
                break;
            }
            e = mesh.onext(e);
            if e == an_edge {
                // No: all edges go right.
                self.connect_left_vertex(mesh, v_event);
                return;
            }
        }

        // Yes: finish every region closed off at this vertex, then insert
        // the right-going edges.
        let ar = mesh.edges[e as usize].active_region;
        let reg_up = self.top_left_region(mesh, ar);
        let reg = self.region_below(reg_up);
        let e_top_left = self.region(reg).e_up;
        let e_bottom_left = self.finish_left_regions(mesh, reg, INVALID);

        if mesh.onext(e_bottom_left) == e_top_left {
            // No right-going edges: bridge rightward with a fixable edge.
            self.connect_right_vertex(mesh, reg_up, e_bottom_left);
        } else {
            let e_first = mesh.onext(e_bottom_left);
            self.add_right_edges(mesh, reg_up, e_first, e_top_left, e_top_left, true);
        }
    }

    // ─────────────── Top level ───────────────

    /// Delete zero-length edges and collapse contours of one or two edges.
    /// Runs before the event queue is built, so vertex removal here is safe.
    fn remove_degenerate_edges(&mut self, mesh: &mut Mesh) {
        let mut e = mesh.edges[E_HEAD as usize].next;
        while e != E_HEAD {
            let mut e_next = mesh.edges[e as usize].next;
            let mut e_lnext = mesh.lnext(e);

            let (os, ot) = mesh.vert_st(mesh.org(e));
            let (ds, dt) = mesh.vert_st(mesh.dst(e));
            if vert_eq(os, ot, ds, dt) && mesh.lnext(e_lnext) != e {
                // Zero-length edge in a contour of at least 3 edges: merge
                // the endpoints, discarding e's origin.
                self.splice_merge_vertices(mesh, e_lnext, e);
                mesh.delete_edge(e);
                e = e_lnext;
                e_lnext = mesh.lnext(e);
            }

            if mesh.lnext(e_lnext) == e {
                // Degenerate contour of one or two edges.
                if e_lnext != e {
                    if e_lnext == e_next || e_lnext == (e_next ^ 1) {
                        e_next = mesh.edges[e_next as usize].next;
                    }
                    mesh.delete_edge(e_lnext);
                }
                if e == e_next || e == (e_next ^ 1) {
                    e_next = mesh.edges[e_next as usize].next;
                }
                mesh.delete_edge(e);
            }

            e = e_next;
        }
    }

    /// Compute the planar arrangement of the projected contours and mark
    /// each face inside or outside per the winding rule. On return the
    /// interior faces are all s-monotone.
    pub(crate) fn compute_interior(&mut self, mesh: &mut Mesh) {
        self.fatal_error = false;

        self.remove_degenerate_edges(mesh);
        self.init_priority_queue(mesh);
        self.init_edge_dict(mesh);

        while let Some(key) = self.pq_extract_min() {
            let v = key.vert;
            // Merge any later vertices at exactly the same position, so
            // each position is swept once.
            while let Some(next) = self.pq_minimum() {
                if !vert_eq(next.s, next.t, key.s, key.t) {
                    break;
                }
                self.pq_extract_min();
                let e1 = mesh.verts[v as usize].an_edge;
                let e2 = mesh.verts[next.vert as usize].an_edge;
                self.splice_merge_vertices(mesh, e1, e2);
            }

            self.event = v;
            self.event_s = key.s;
            self.event_t = key.t;
            self.sweep_event(mesh, v);
        }

        self.done_edge_dict(mesh);
        self.pq = None;

        remove_degenerate_faces(mesh);
        mesh.check_mesh();
        debug!(fatal = self.fatal_error, "sweep finished");
    }
}

fn vertex_weights(mesh: &mut Mesh, isect: VertIdx, org: VertIdx, dst: VertIdx) -> (Real, Real) {
    let (is_, it) = mesh.vert_st(isect);
    let (os, ot) = mesh.vert_st(org);
    let (ds, dt) = mesh.vert_st(dst);
    let t1 = vert_l1_dist(os, ot, is_, it);
    let t2 = vert_l1_dist(ds, dt, is_, it);
    let w0 = 0.5 * t2 / (t1 + t2);
    let w1 = 0.5 * t1 / (t1 + t2);

    let org_coords = mesh.verts[org as usize].coords;
    let dst_coords = mesh.verts[dst as usize].coords;
    let c = &mut mesh.verts[isect as usize].coords;
    c[0] += w0 * org_coords[0] + w1 * dst_coords[0];
    c[1] += w0 * org_coords[1] + w1 * dst_coords[1];
    c[2] += w0 * org_coords[2] + w1 * dst_coords[2];

    (w0, w1)
}
