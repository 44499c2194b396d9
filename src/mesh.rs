// License: SGI Free Software License B (MIT-compatible)
//
// Half-edge mesh (a quad-edge variant in the Guibas/Stolfi style). All
// pointers are u32 indices into Vec arenas.
//
//   - INVALID (u32::MAX) is the null index.
//   - Half-edges are allocated in pairs: edges[i] and edges[i^1] form a pair,
//     so sym(e) = e ^ 1. Even index = e, odd = eSym.
//   - Slot 0 of each arena is a circular-list head: verts[0], faces[0], and
//     the edges[0]/edges[1] pair. Deleted records are unlinked from the
//     circular lists but their Vec slots are not reclaimed; a polygon's mesh
//     is dropped whole at end_polygon.
//
// The only connectivity-changing primitive is do_splice, which swaps two
// onext pointers and the matching lnext pointers. Every public operation is
// built from it plus the allocate/kill helpers, and keeps the invariant that
// each vertex ring and face loop is consistent on return.

use crate::geom::{vert_leq, Real};

pub const INVALID: u32 = u32::MAX;

/// Index into Mesh::verts
pub type VertIdx = u32;
/// Index into Mesh::faces
pub type FaceIdx = u32;
/// Index into Mesh::edges
pub type EdgeIdx = u32;

/// The symmetric half-edge, always the other element of the pair.
#[inline(always)]
pub fn sym(e: EdgeIdx) -> EdgeIdx {
    e ^ 1
}

#[derive(Clone, Debug)]
pub struct Vertex {
    pub next: VertIdx,
    pub prev: VertIdx,
    pub an_edge: EdgeIdx,
    /// Original client coordinates (after clamping).
    pub coords: [Real; 3],
    /// Projected sweep coordinates.
    pub s: Real,
    pub t: Real,
    /// Handle into the event queue while the vertex is queued.
    pub pq_handle: i32,
    /// Handle into the tessellator's client-data pool; INVALID for
    /// sentinels and for vertices synthesized after a fatal error.
    pub data: u32,
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            next: INVALID,
            prev: INVALID,
            an_edge: INVALID,
            coords: [0.0; 3],
            s: 0.0,
            t: 0.0,
            pq_handle: crate::priorityq::INVALID_HANDLE,
            data: INVALID,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Face {
    pub next: FaceIdx,
    pub prev: FaceIdx,
    pub an_edge: EdgeIdx,
    /// Set by the sweep according to the winding rule.
    pub inside: bool,
}

impl Default for Face {
    fn default() -> Self {
        Self {
            next: INVALID,
            prev: INVALID,
            an_edge: INVALID,
            inside: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HalfEdge {
    /// Next in the global edge list; even-indexed edges link to even-indexed
    /// edges and odd to odd.
    pub next: EdgeIdx,
    /// Next edge CCW around the origin vertex.
    pub onext: EdgeIdx,
    /// Next edge CCW around the left face.
    pub lnext: EdgeIdx,
    /// Origin vertex.
    pub org: VertIdx,
    /// Left face.
    pub lface: FaceIdx,
    /// Active region whose upper edge this is (INVALID when not in the
    /// sweep dictionary).
    pub active_region: u32,
    /// Change in winding number when crossing from the right face to the
    /// left face.
    pub winding: i32,
}

impl Default for HalfEdge {
    fn default() -> Self {
        Self {
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

pub const V_HEAD: VertIdx = 0;
pub const F_HEAD: FaceIdx = 0;
pub const E_HEAD: EdgeIdx = 0;
pub const E_HEAD_SYM: EdgeIdx = 1;

/// The half-edge mesh.
pub struct Mesh {
    pub verts: Vec<Vertex>,
    pub faces: Vec<Face>,
    pub edges: Vec<HalfEdge>,
}

impl Mesh {
    /// Empty mesh: just the three list heads.
    pub fn new() -> Self {
        let mut m = Mesh {
            verts: Vec::new(),
            faces: Vec::new(),
            edges: Vec::new(),
        };

        m.verts.push(Vertex {
            next: V_HEAD,
            prev: V_HEAD,
            ..Vertex::default()
        });
        m.faces.push(Face {
            next: F_HEAD,
            prev: F_HEAD,
            ..Face::default()
        });
        m.edges.push(HalfEdge {
            next: E_HEAD,
            ..HalfEdge::default()
        });
        m.edges.push(HalfEdge {
            next: E_HEAD_SYM,
            ..HalfEdge::default()
        });

        m
    }

    // ─────────────── Navigation (macro translations) ───────────────

    /// Destination vertex of e (= org of sym).
    #[inline]
    pub fn dst(&self, e: EdgeIdx) -> VertIdx {
        self.edges[(e ^ 1) as usize].org
    }

    /// Right face of e (= lface of sym).
    #[inline]
    pub fn rface(&self, e: EdgeIdx) -> FaceIdx {
        self.edges[(e ^ 1) as usize].lface
    }

    /// Oprev = sym->lnext
    #[inline]
    pub fn oprev(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[(e ^ 1) as usize].lnext
    }

    /// Lprev = onext->sym
    #[inline]
    pub fn lprev(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].onext ^ 1
    }

    /// Dprev = lnext->sym
    #[inline]
    pub fn dprev(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].lnext ^ 1
    }

    /// Rprev = sym->onext
    #[inline]
    pub fn rprev(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[(e ^ 1) as usize].onext
    }

    /// Dnext = rprev->sym
    #[inline]
    pub fn dnext(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[(e ^ 1) as usize].onext ^ 1
    }

    /// Rnext = oprev->sym
    #[inline]
    pub fn rnext(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[(e ^ 1) as usize].lnext ^ 1
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
    pub fn org(&self, e: EdgeIdx) -> VertIdx {
        self.edges[e as usize].org
    }

    #[inline]
    pub fn vert_st(&self, v: VertIdx) -> (Real, Real) {
        let v = &self.verts[v as usize];
        (v.s, v.t)
    }

    /// vert_leq(dst, org): the edge points leftward in sweep order.
    #[inline]
    pub fn edge_goes_left(&self, e: EdgeIdx) -> bool {
        let (ds, dt) = self.vert_st(self.dst(e));
        let (os, ot) = self.vert_st(self.org(e));
        vert_leq(ds, dt, os, ot)
    }

    /// vert_leq(org, dst): the edge points rightward in sweep order.
    #[inline]
    pub fn edge_goes_right(&self, e: EdgeIdx) -> bool {
        let (os, ot) = self.vert_st(self.org(e));
        let (ds, dt) = self.vert_st(self.dst(e));
        vert_leq(os, ot, ds, dt)
    }

    /// The right face exists and is interior; used for boundary edge flags.
    #[inline]
    pub fn edge_is_internal(&self, e: EdgeIdx) -> bool {
        let rf = self.rface(e);
        rf != INVALID && self.faces[rf as usize].inside
    }

    // ─────────────── Allocation and unlinking ───────────────

    /// Allocate a half-edge pair, linked into the global edge list before
    /// e_next's pair. Returns the even half; its sym is the result ^ 1.
    fn make_edge_pair(&mut self, e_next: EdgeIdx) -> EdgeIdx {
        let e_next = e_next & !1;
        let e_new = self.edges.len() as EdgeIdx;
        let e_sym = e_new ^ 1;

        let e_prev = self.edges[(e_next ^ 1) as usize].next;

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

        self.edges[(e_prev ^ 1) as usize].next = e_new;
        self.edges[(e_next ^ 1) as usize].next = e_sym;

        e_new
    }

    /// Allocate a vertex whose ring is e_orig's origin ring, inserted before
    /// v_next in the global vertex list.
    fn make_vertex(&mut self, e_orig: EdgeIdx, v_next: VertIdx) -> VertIdx {
        let v_new = self.verts.len() as VertIdx;
        let v_prev = self.verts[v_next as usize].prev;

        self.verts.push(Vertex {
            prev: v_prev,
            next: v_next,
            an_edge: e_orig,
            ..Vertex::default()
        });
        self.verts[v_prev as usize].next = v_new;
        self.verts[v_next as usize].prev = v_new;

        let mut e = e_orig;
        loop {
            self.edges[e as usize].org = v_new;
            e = self.edges[e as usize].onext;
            if e == e_orig {
                break;
            }
        }
        v_new
    }

    /// Allocate a face whose loop is e_orig's lnext loop, inserted before
    /// f_next in the global face list. The new face inherits f_next's
    /// inside flag so faces split during the sweep stay consistent.
    fn make_face(&mut self, e_orig: EdgeIdx, f_next: FaceIdx) -> FaceIdx {
        let f_new = self.faces.len() as FaceIdx;
        let f_prev = self.faces[f_next as usize].prev;

        self.faces.push(Face {
            prev: f_prev,
            next: f_next,
            an_edge: e_orig,
            inside: self.faces[f_next as usize].inside,
        });
        self.faces[f_prev as usize].next = f_new;
        self.faces[f_next as usize].prev = f_new;

        let mut e = e_orig;
        loop {
            self.edges[e as usize].lface = f_new;
            e = self.edges[e as usize].lnext;
            if e == e_orig {
                break;
            }
        }
        f_new
    }

    /// Unlink v_del, repointing its ring edges at new_org (INVALID when the
    /// ring is going away too).
    fn kill_vertex(&mut self, v_del: VertIdx, new_org: VertIdx) {
        let e_start = self.verts[v_del as usize].an_edge;
        if e_start != INVALID {
            let mut e = e_start;
            loop {
                self.edges[e as usize].org = new_org;
                e = self.edges[e as usize].onext;
                if e == e_start {
                    break;
                }
            }
        }
        let v_prev = self.verts[v_del as usize].prev;
        let v_next = self.verts[v_del as usize].next;
        self.verts[v_prev as usize].next = v_next;
        self.verts[v_next as usize].prev = v_prev;
        self.verts[v_del as usize].next = INVALID;
        self.verts[v_del as usize].prev = INVALID;
        self.verts[v_del as usize].an_edge = INVALID;
    }

    /// Unlink f_del, repointing its loop edges at new_lface.
    fn kill_face(&mut self, f_del: FaceIdx, new_lface: FaceIdx) {
        let e_start = self.faces[f_del as usize].an_edge;
        if e_start != INVALID {
            let mut e = e_start;
            loop {
                self.edges[e as usize].lface = new_lface;
                e = self.edges[e as usize].lnext;
                if e == e_start {
                    break;
                }
            }
        }
        let f_prev = self.faces[f_del as usize].prev;
        let f_next = self.faces[f_del as usize].next;
        self.faces[f_prev as usize].next = f_next;
        self.faces[f_next as usize].prev = f_prev;
        self.faces[f_del as usize].next = INVALID;
        self.faces[f_del as usize].prev = INVALID;
        self.faces[f_del as usize].an_edge = INVALID;
    }

    /// Unlink an edge pair from the global edge list.
    fn kill_edge(&mut self, e_del: EdgeIdx) {
        let e_del = e_del & !1;
        let e_next = self.edges[e_del as usize].next;
        let e_prev = self.edges[(e_del ^ 1) as usize].next;
        self.edges[(e_next ^ 1) as usize].next = e_prev;
        self.edges[(e_prev ^ 1) as usize].next = e_next;
        self.edges[e_del as usize].next = INVALID;
        self.edges[(e_del ^ 1) as usize].next = INVALID;
    }

    /// The one topology primitive: swap a->onext with b->onext and fix the
    /// two lnext pointers that mirror them. If a and b had the same origin
    /// ring this splits it; otherwise it joins the two rings. Same for the
    /// face loops, in the opposite sense.
    fn do_splice(edges: &mut [HalfEdge], a: EdgeIdx, b: EdgeIdx) {
        let a_onext = edges[a as usize].onext;
        let b_onext = edges[b as usize].onext;
        edges[(a_onext ^ 1) as usize].lnext = b;
        edges[(b_onext ^ 1) as usize].lnext = a;
        edges[a as usize].onext = b_onext;
        edges[b as usize].onext = a_onext;
    }

    // ─────────────── Public operations ───────────────

    /// Create one edge with two fresh vertices and one face (a loop of two
    /// half-edges).
    pub fn make_edge(&mut self) -> EdgeIdx {
        let e = self.make_edge_pair(E_HEAD);
        let e_sym = e ^ 1;

        self.make_vertex(e, V_HEAD);
        self.make_vertex(e_sym, V_HEAD);
        self.make_face(e, F_HEAD);

        e
    }

    /// The fundamental connectivity operation: exchange e_org->onext with
    /// e_dst->onext. Depending on whether the two edges shared an origin
    /// and/or a left face beforehand, this joins or splits vertex rings and
    /// face loops. A vertex created by a split inherits the coordinates and
    /// data of the original vertex.
    pub fn splice(&mut self, e_org: EdgeIdx, e_dst: EdgeIdx) {
        if e_org == e_dst {
            return;
        }

        let org_org = self.edges[e_org as usize].org;
        let dst_org = self.edges[e_dst as usize].org;
        let org_lface = self.edges[e_org as usize].lface;
        let dst_lface = self.edges[e_dst as usize].lface;

        let joining_vertices = dst_org != org_org;
        let joining_loops = dst_lface != org_lface;

        if joining_vertices {
            self.kill_vertex(dst_org, org_org);
        }
        if joining_loops {
            self.kill_face(dst_lface, org_lface);
        }

        Mesh::do_splice(&mut self.edges, e_dst, e_org);

        if !joining_vertices {
            let v_new = self.make_vertex(e_dst, org_org);
            let src = self.verts[org_org as usize].clone();
            let v = &mut self.verts[v_new as usize];
            v.coords = src.coords;
            v.s = src.s;
            v.t = src.t;
            v.data = src.data;
            self.verts[org_org as usize].an_edge = e_org;
        }
        if !joining_loops {
            self.make_face(e_dst, org_lface);
            self.faces[org_lface as usize].an_edge = e_org;
        }
    }

    /// Remove e_del. If e_del separates two faces they are joined; if it is
    /// a dangling edge its endpoint is removed with it.
    pub fn delete_edge(&mut self, e_del: EdgeIdx) {
        let e_del_sym = e_del ^ 1;

        let lface = self.edges[e_del as usize].lface;
        let rface = self.rface(e_del);
        let joining_loops = lface != rface;
        if joining_loops {
            self.kill_face(lface, rface);
        }

        if self.edges[e_del as usize].onext == e_del {
            let org = self.edges[e_del as usize].org;
            self.kill_vertex(org, INVALID);
        } else {
            let oprev = self.oprev(e_del);
            let rf = self.rface(e_del);
            self.faces[rf as usize].an_edge = oprev;
            let org = self.edges[e_del as usize].org;
            self.verts[org as usize].an_edge = self.edges[e_del as usize].onext;

            Mesh::do_splice(&mut self.edges, e_del, oprev);
            if !joining_loops {
                self.make_face(e_del, self.edges[e_del as usize].lface);
            }
        }

        if self.edges[e_del_sym as usize].onext == e_del_sym {
            let org = self.edges[e_del_sym as usize].org;
            self.kill_vertex(org, INVALID);
            let lf = self.edges[e_del as usize].lface;
            self.kill_face(lf, INVALID);
        } else {
            let oprev = self.oprev(e_del_sym);
            let lf = self.edges[e_del as usize].lface;
            self.faces[lf as usize].an_edge = oprev;
            let org = self.edges[e_del_sym as usize].org;
            self.verts[org as usize].an_edge = self.edges[e_del_sym as usize].onext;
            Mesh::do_splice(&mut self.edges, e_del_sym, oprev);
        }

        self.kill_edge(e_del);
    }

    /// Create e_new = e_org->lnext with a fresh destination vertex. e_new
    /// shares e_org's left face.
    pub fn add_edge_vertex(&mut self, e_org: EdgeIdx) -> EdgeIdx {
        let e_new = self.make_edge_pair(e_org);
        let e_new_sym = e_new ^ 1;

        let e_org_lnext = self.edges[e_org as usize].lnext;
        Mesh::do_splice(&mut self.edges, e_new, e_org_lnext);

        let e_org_dst = self.dst(e_org);
        self.edges[e_new as usize].org = e_org_dst;
        self.make_vertex(e_new_sym, e_org_dst);

        let lf = self.edges[e_org as usize].lface;
        self.edges[e_new as usize].lface = lf;
        self.edges[e_new_sym as usize].lface = lf;

        e_new
    }

    /// Split e_org into e_org followed by e_new (= e_org->lnext), with a new
    /// vertex between them. The new edge inherits e_org's winding.
    pub fn split_edge(&mut self, e_org: EdgeIdx) -> EdgeIdx {
        let temp = self.add_edge_vertex(e_org);
        let e_new = temp ^ 1;

        // Disconnect e_org from its destination and reconnect to the new vertex.
        let e_org_sym = e_org ^ 1;
        let oprev = self.oprev(e_org_sym);
        Mesh::do_splice(&mut self.edges, e_org_sym, oprev);
        Mesh::do_splice(&mut self.edges, e_org_sym, e_new);

        let e_new_org = self.edges[e_new as usize].org;
        self.edges[e_org_sym as usize].org = e_new_org;
        let e_new_dst = self.dst(e_new);
        self.verts[e_new_dst as usize].an_edge = e_new ^ 1;
        self.edges[(e_new ^ 1) as usize].lface = self.rface(e_org);

        self.edges[e_new as usize].winding = self.edges[e_org as usize].winding;
        self.edges[(e_new ^ 1) as usize].winding = self.edges[e_org_sym as usize].winding;

        e_new
    }

    /// Create a new edge from e_org->dst to e_dst->org. If the two edges had
    /// different left faces the faces are joined; otherwise the shared face
    /// is split in two.
    pub fn connect(&mut self, e_org: EdgeIdx, e_dst: EdgeIdx) -> EdgeIdx {
        let e_new = self.make_edge_pair(e_org);
        let e_new_sym = e_new ^ 1;

        let dst_lface = self.edges[e_dst as usize].lface;
        let org_lface = self.edges[e_org as usize].lface;
        let joining_loops = dst_lface != org_lface;
        if joining_loops {
            self.kill_face(dst_lface, org_lface);
        }

        let e_org_lnext = self.edges[e_org as usize].lnext;
        Mesh::do_splice(&mut self.edges, e_new, e_org_lnext);
        Mesh::do_splice(&mut self.edges, e_new_sym, e_dst);

        self.edges[e_new as usize].org = self.dst(e_org);
        self.edges[e_new_sym as usize].org = self.edges[e_dst as usize].org;
        self.edges[e_new as usize].lface = org_lface;
        self.edges[e_new_sym as usize].lface = org_lface;

        // The old face keeps the loop on e_new_sym's side.
        self.faces[org_lface as usize].an_edge = e_new_sym;

        if !joining_loops {
            self.make_face(e_new, org_lface);
        }

        e_new
    }

    /// Destroy a face without regard for topology consistency elsewhere in
    /// the mesh: its edges become border edges (no left face), and edges
    /// with no face on either side are removed entirely, along with any
    /// isolated vertices that leaves behind.
    pub fn zap_face(&mut self, f_zap: FaceIdx) {
        let e_start = self.faces[f_zap as usize].an_edge;
        let mut e_next = self.edges[e_start as usize].lnext;

        loop {
            let e = e_next;
            e_next = self.edges[e as usize].lnext;

            self.edges[e as usize].lface = INVALID;
            if self.rface(e) == INVALID {
                let e_onext = self.edges[e as usize].onext;
                if e_onext == e {
                    let org = self.edges[e as usize].org;
                    if org != INVALID {
                        self.kill_vertex(org, INVALID);
                    }
                } else {
                    let org = self.edges[e as usize].org;
                    if org != INVALID {
                        self.verts[org as usize].an_edge = e_onext;
                    }
                    let oprev = self.oprev(e);
                    Mesh::do_splice(&mut self.edges, e, oprev);
                }

                let e_sym = e ^ 1;
                let e_sym_onext = self.edges[e_sym as usize].onext;
                if e_sym_onext == e_sym {
                    let org = self.edges[e_sym as usize].org;
                    if org != INVALID {
                        self.kill_vertex(org, INVALID);
                    }
                } else {
                    let org = self.edges[e_sym as usize].org;
                    if org != INVALID {
                        self.verts[org as usize].an_edge = e_sym_onext;
                    }
                    let oprev = self.oprev(e_sym);
                    Mesh::do_splice(&mut self.edges, e_sym, oprev);
                }

                self.kill_edge(e);
            }

            if e == e_start {
                break;
            }
        }

        let f_prev = self.faces[f_zap as usize].prev;
        let f_next = self.faces[f_zap as usize].next;
        self.faces[f_prev as usize].next = f_next;
        self.faces[f_next as usize].prev = f_prev;
        self.faces[f_zap as usize].next = INVALID;
        self.faces[f_zap as usize].prev = INVALID;
        self.faces[f_zap as usize].an_edge = INVALID;
    }

    /// Walk the three circular lists and assert every topology invariant.
    /// Compiled only into debug builds; release builds get a no-op.
    #[cfg(debug_assertions)]
    pub fn check_mesh(&self) {
        // Faces: every loop edge points back at the face.
        let mut f_prev = F_HEAD;
        loop {
            let f = self.faces[f_prev as usize].next;
            if f == F_HEAD {
                break;
            }
            assert_eq!(self.faces[f as usize].prev, f_prev);
            let e_start = self.faces[f as usize].an_edge;
            let mut e = e_start;
            loop {
                assert_ne!(e ^ 1, e);
                assert_eq!(self.onext(self.lnext(e)) ^ 1, e);
                assert_eq!(self.lnext(self.onext(e) ^ 1), e);
                assert_eq!(self.edges[e as usize].lface, f);
                e = self.edges[e as usize].lnext;
                if e == e_start {
                    break;
                }
            }
            f_prev = f;
        }
        assert_eq!(self.faces[F_HEAD as usize].prev, f_prev);

        // Vertices: every ring edge originates here.
        let mut v_prev = V_HEAD;
        loop {
            let v = self.verts[v_prev as usize].next;
            if v == V_HEAD {
                break;
            }
            assert_eq!(self.verts[v as usize].prev, v_prev);
            let e_start = self.verts[v as usize].an_edge;
            let mut e = e_start;
            loop {
                assert_eq!(self.edges[e as usize].org, v);
                // onext and lnext agree: e->onext == e->lprev->sym... inverse
                assert_eq!(self.oprev(self.edges[e as usize].onext), e);
                e = self.edges[e as usize].onext;
                if e == e_start {
                    break;
                }
            }
            v_prev = v;
        }
        assert_eq!(self.verts[V_HEAD as usize].prev, v_prev);

        // Edges: the pair structure and live links.
        let mut e = self.edges[E_HEAD as usize].next;
        while e != E_HEAD {
            assert_ne!(self.edges[e as usize].org, INVALID);
            assert_ne!(self.edges[(e ^ 1) as usize].org, INVALID);
            assert_ne!(self.edges[e as usize].lnext, INVALID);
            assert_ne!(self.edges[e as usize].onext, INVALID);
            e = self.edges[e as usize].next;
        }
    }

    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn check_mesh(&self) {}
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_edge_creates_single_edge() {
        let mut mesh = Mesh::new();
        let e = mesh.make_edge();
        // heads plus: 2 vertices, 1 face, 1 edge pair
        assert_eq!(mesh.verts.len(), 3);
        assert_eq!(mesh.faces.len(), 2);
        assert_eq!(mesh.edges.len(), 4);
        let org1 = mesh.edges[e as usize].org;
        let org2 = mesh.edges[(e ^ 1) as usize].org;
        assert_ne!(org1, org2);
        assert_ne!(org1, INVALID);
        assert_ne!(org2, INVALID);
        mesh.check_mesh();
    }

    #[test]
    fn sym_involution() {
        for e in 0u32..16 {
            assert_eq!(sym(sym(e)), e);
        }
    }

    #[test]
    fn split_edge_keeps_winding() {
        let mut mesh = Mesh::new();
        let e = mesh.make_edge();
        mesh.edges[e as usize].winding = 1;
        mesh.edges[(e ^ 1) as usize].winding = -1;
        let e_new = mesh.split_edge(e);
        assert_eq!(mesh.edges[e_new as usize].winding, 1);
        assert_eq!(mesh.edges[(e_new ^ 1) as usize].winding, -1);
        // e's destination is now e_new's origin
        assert_eq!(mesh.dst(e), mesh.edges[e_new as usize].org);
        mesh.check_mesh();
    }

    #[test]
    fn connect_closes_a_triangle() {
        let mut mesh = Mesh::new();
        let e1 = mesh.make_edge();
        let e2 = mesh.add_edge_vertex(e1);
        // connect e2->dst back to e1->org: a triangle plus its complement
        let e3 = mesh.connect(e2, e1);
        assert_eq!(mesh.dst(e3), mesh.edges[e1 as usize].org);
        // two faces now: one on each side of the triangle (plus F_HEAD)
        let f1 = mesh.faces[F_HEAD as usize].next;
        let f2 = mesh.faces[f1 as usize].next;
        assert_ne!(f1, F_HEAD);
        assert_ne!(f2, F_HEAD);
        assert_eq!(mesh.faces[f2 as usize].next, F_HEAD);
        mesh.check_mesh();
    }

    #[test]
    fn delete_edge_rejoins_faces() {
        let mut mesh = Mesh::new();
        let e1 = mesh.make_edge();
        let e2 = mesh.add_edge_vertex(e1);
        let e3 = mesh.connect(e2, e1);
        mesh.delete_edge(e3);
        // back to a single face besides the head
        let f1 = mesh.faces[F_HEAD as usize].next;
        assert_eq!(mesh.faces[f1 as usize].next, F_HEAD);
        mesh.check_mesh();
    }

    #[test]
    fn splice_preserves_winding() {
        let mut mesh = Mesh::new();
        let e1 = mesh.make_edge();
        let e2 = mesh.make_edge();
        for (e, w) in [(e1, 1), (e1 ^ 1, -1), (e2, 2), (e2 ^ 1, -2)] {
            mesh.edges[e as usize].winding = w;
        }

        // Join the two origin rings, then split them apart again. Splice
        // only rewires connectivity; no edge's winding may change either way.
        mesh.splice(e1, e2);
        assert_eq!(mesh.edges[e1 as usize].org, mesh.edges[e2 as usize].org);
        for (e, w) in [(e1, 1), (e1 ^ 1, -1), (e2, 2), (e2 ^ 1, -2)] {
            assert_eq!(mesh.edges[e as usize].winding, w);
        }

        mesh.splice(e1, e2);
        assert_ne!(mesh.edges[e1 as usize].org, mesh.edges[e2 as usize].org);
        for (e, w) in [(e1, 1), (e1 ^ 1, -1), (e2, 2), (e2 ^ 1, -2)] {
            assert_eq!(mesh.edges[e as usize].winding, w);
        }
        mesh.check_mesh();
    }

    #[test]
    fn connect_adds_a_zero_winding_diagonal() {
        let mut mesh = Mesh::new();
        let e1 = mesh.make_edge();
        let e2 = mesh.add_edge_vertex(e1);
        for (e, w) in [(e1, 1), (e1 ^ 1, -1), (e2, 1), (e2 ^ 1, -1)] {
            mesh.edges[e as usize].winding = w;
        }

        // The new edge must not carry winding flux: region winding is
        // computed from the crossed input edges, and edges added to close
        // faces have to be transparent to that count.
        let e3 = mesh.connect(e2, e1);
        assert_eq!(mesh.edges[e3 as usize].winding, 0);
        assert_eq!(mesh.edges[(e3 ^ 1) as usize].winding, 0);
        for (e, w) in [(e1, 1), (e1 ^ 1, -1), (e2, 1), (e2 ^ 1, -1)] {
            assert_eq!(mesh.edges[e as usize].winding, w);
        }
        mesh.check_mesh();
    }

    #[test]
    fn splice_merges_coincident_vertices() {
        let mut mesh = Mesh::new();
        let e1 = mesh.make_edge();
        let e2 = mesh.make_edge();
        let before: usize = {
            let mut n = 0;
            let mut v = mesh.verts[V_HEAD as usize].next;
            while v != V_HEAD {
                n += 1;
                v = mesh.verts[v as usize].next;
            }
            n
        };
        assert_eq!(before, 4);
        mesh.splice(e1, e2);
        let after: usize = {
            let mut n = 0;
            let mut v = mesh.verts[V_HEAD as usize].next;
            while v != V_HEAD {
                n += 1;
                v = mesh.verts[v as usize].next;
            }
            n
        };
        assert_eq!(after, 3, "splice joins the two origins");
        assert_eq!(mesh.edges[e1 as usize].org, mesh.edges[e2 as usize].org);
        mesh.check_mesh();
    }
}
