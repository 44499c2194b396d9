// License: SGI Free Software License B (MIT-compatible)
//
// Post-sweep mesh passes: triangulating the monotone interior regions,
// resetting winding numbers for boundary extraction, and discarding the
// exterior.
//
// tessellate_mono_region assumes the invariant the sweep established: each
// interior face is an s-monotone polygon whose boundary splits into an upper
// chain of leftgoing edges and a lower chain of rightgoing edges meeting at
// a leftmost and a rightmost vertex.

use crate::geom::{edge_sign, vert_leq};
use crate::mesh::{FaceIdx, Mesh, E_HEAD, F_HEAD, INVALID};

/// Triangulate one monotone face by emitting ears greedily along whichever
/// chain is behind, then fanning out the remainder from the leftmost vertex.
pub fn tessellate_mono_region(mesh: &mut Mesh, face: FaceIdx) {
    // Find the rightmost vertex: advance while the chain still goes right,
    // then back up while it still goes left. `up` ends up as the rightgoing
    // edge out of the leftmost vertex on the upper chain.
    let mut up = mesh.faces[face as usize].an_edge;
    debug_assert!(
        mesh.lnext(up) != up && mesh.lnext(mesh.lnext(up)) != up,
        "monotone face must have at least 3 edges"
    );

    loop {
        let (ds, dt) = mesh.vert_st(mesh.dst(up));
        let (os, ot) = mesh.vert_st(mesh.org(up));
        if !vert_leq(ds, dt, os, ot) {
            break;
        }
        up = mesh.lprev(up);
    }
    loop {
        let (os, ot) = mesh.vert_st(mesh.org(up));
        let (ds, dt) = mesh.vert_st(mesh.dst(up));
        if !vert_leq(os, ot, ds, dt) {
            break;
        }
        up = mesh.lnext(up);
    }

    let mut lo = mesh.lprev(up);

    while mesh.lnext(up) != lo {
        let (uds, udt) = mesh.vert_st(mesh.dst(up));
        let (los, lot) = mesh.vert_st(mesh.org(lo));
        if vert_leq(uds, udt, los, lot) {
            // up->dst is to the left of lo->org: cut ears off the lower
            // chain while they stay convex.
            while mesh.lnext(lo) != up {
                let lo_lnext = mesh.lnext(lo);
                let (ns, nt) = mesh.vert_st(mesh.dst(lo_lnext));
                let (os, ot) = mesh.vert_st(mesh.org(lo));
                let (ds, dt) = mesh.vert_st(mesh.dst(lo));
                if !mesh.edge_goes_left(lo_lnext) && edge_sign(os, ot, ds, dt, ns, nt) > 0.0 {
                    break;
                }
                let temp = mesh.connect(lo_lnext, lo);
                lo = temp ^ 1;
            }
            lo = mesh.lprev(lo);
        } else {
            // Symmetric case on the upper chain.
            while mesh.lnext(lo) != up {
                let up_lprev = mesh.lprev(up);
                let (ns, nt) = mesh.vert_st(mesh.org(up_lprev));
                let (ds, dt) = mesh.vert_st(mesh.dst(up));
                let (os, ot) = mesh.vert_st(mesh.org(up));
                if !mesh.edge_goes_right(up_lprev) && edge_sign(ds, dt, os, ot, ns, nt) < 0.0 {
                    break;
                }
                let temp = mesh.connect(up, up_lprev);
                up = temp ^ 1;
            }
            up = mesh.lnext(up);
        }
    }

    // Whatever is left is a fan from the leftmost vertex.
    debug_assert!(mesh.lnext(lo) != up);
    while mesh.lnext(mesh.lnext(lo)) != up {
        let lo_lnext = mesh.lnext(lo);
        let temp = mesh.connect(lo_lnext, lo);
        lo = temp ^ 1;
    }
}

/// Triangulate every interior face.
pub fn tessellate_interior(mesh: &mut Mesh) {
    let mut f = mesh.faces[F_HEAD as usize].next;
    while f != F_HEAD {
        let next = mesh.faces[f as usize].next;
        if mesh.faces[f as usize].inside {
            tessellate_mono_region(mesh, f);
        }
        f = next;
    }
}

/// Reset winding numbers so that boundary edges carry `value` (oriented with
/// the interior on the left) and everything else carries zero. With
/// `keep_only_boundary` the non-boundary edges are deleted instead, leaving
/// each interior face as exactly one boundary loop.
pub fn set_winding_number(mesh: &mut Mesh, value: i32, keep_only_boundary: bool) {
    let mut e = mesh.edges[E_HEAD as usize].next;
    while e != E_HEAD {
        let e_next = mesh.edges[e as usize].next;

        let lface = mesh.edges[e as usize].lface;
        let rface = mesh.rface(e);
        let lf_inside = lface != INVALID && mesh.faces[lface as usize].inside;
        let rf_inside = rface != INVALID && mesh.faces[rface as usize].inside;

        if rf_inside != lf_inside {
            mesh.edges[e as usize].winding = if lf_inside { value } else { -value };
        } else if !keep_only_boundary {
            mesh.edges[e as usize].winding = 0;
        } else {
            mesh.delete_edge(e);
        }

        e = e_next;
    }
}

/// Zap every exterior face, leaving a mesh that contains only the interior
/// plus its boundary edges.
pub fn discard_exterior(mesh: &mut Mesh) {
    let mut f = mesh.faces[F_HEAD as usize].next;
    while f != F_HEAD {
        let next = mesh.faces[f as usize].next;
        if !mesh.faces[f as usize].inside {
            mesh.zap_face(f);
        }
        f = next;
    }
}

/// Count the edges around a face loop.
pub fn face_degree(mesh: &Mesh, f: FaceIdx) -> usize {
    let e_start = mesh.faces[f as usize].an_edge;
    let mut e = e_start;
    let mut n = 0;
    loop {
        n += 1;
        e = mesh.lnext(e);
        if e == e_start {
            break;
        }
    }
    n
}

/// Count interior faces.
pub fn count_inside_faces(mesh: &Mesh) -> usize {
    let mut n = 0;
    let mut f = mesh.faces[F_HEAD as usize].next;
    while f != F_HEAD {
        if mesh.faces[f as usize].inside {
            n += 1;
        }
        f = mesh.faces[f as usize].next;
    }
    n
}
