// License: SGI Free Software License B (MIT-compatible)
//
// Projects the 3D input vertices onto a 2D (s, t) plane for the sweep.
// If the client supplied a nonzero normal, the projection plane is
// perpendicular to it; otherwise an approximate normal is fitted to the
// input. Projection just selects two coordinate axes (the two not claimed
// by the normal's dominant axis), which is exact for axis-aligned input
// and well-conditioned everywhere else.

use crate::geom::Real;
use crate::mesh::{Mesh, F_HEAD, INVALID, V_HEAD};

fn dot(u: &[Real; 3], v: &[Real; 3]) -> Real {
    u[0] * v[0] + u[1] * v[1] + u[2] * v[2]
}

/// Index of the component with the largest magnitude.
pub fn long_axis(v: &[Real; 3]) -> usize {
    let mut i = 0;
    if v[1].abs() > v[0].abs() {
        i = 1;
    }
    if v[2].abs() > v[i].abs() {
        i = 2;
    }
    i
}

/// Index of the component with the smallest magnitude.
pub fn short_axis(v: &[Real; 3]) -> usize {
    let mut i = 0;
    if v[1].abs() < v[0].abs() {
        i = 1;
    }
    if v[2].abs() < v[i].abs() {
        i = 2;
    }
    i
}

/// Fit an approximate polygon normal: take the longest diameter of the
/// vertex set as a base direction, then pick the vertex whose cross product
/// against it is largest. Degenerate input (all collinear) falls back to an
/// arbitrary perpendicular axis.
pub fn compute_normal(mesh: &Mesh, norm: &mut [Real; 3]) {
    let first_v = mesh.verts[V_HEAD as usize].next;
    if first_v == V_HEAD {
        *norm = [0.0, 0.0, 1.0];
        return;
    }

    let mut max_val = [0.0; 3];
    let mut min_val = [0.0; 3];
    let mut max_vert = [V_HEAD; 3];
    let mut min_vert = [V_HEAD; 3];

    for i in 0..3 {
        let c = mesh.verts[first_v as usize].coords[i];
        min_val[i] = c;
        min_vert[i] = first_v;
        max_val[i] = c;
        max_vert[i] = first_v;
    }

    let mut v = mesh.verts[V_HEAD as usize].next;
    while v != V_HEAD {
        for i in 0..3 {
            let c = mesh.verts[v as usize].coords[i];
            if c < min_val[i] {
                min_val[i] = c;
                min_vert[i] = v;
            }
            if c > max_val[i] {
                max_val[i] = c;
                max_vert[i] = v;
            }
        }
        v = mesh.verts[v as usize].next;
    }

    // Axis with the largest extent.
    let mut i = 0;
    if max_val[1] - min_val[1] > max_val[0] - min_val[0] {
        i = 1;
    }
    if max_val[2] - min_val[2] > max_val[i] - min_val[i] {
        i = 2;
    }
    if min_val[i] >= max_val[i] {
        // All vertices coincide.
        *norm = [0.0, 0.0, 1.0];
        return;
    }

    let v1 = min_vert[i];
    let v2 = max_vert[i];
    let d1 = [
        mesh.verts[v1 as usize].coords[0] - mesh.verts[v2 as usize].coords[0],
        mesh.verts[v1 as usize].coords[1] - mesh.verts[v2 as usize].coords[1],
        mesh.verts[v1 as usize].coords[2] - mesh.verts[v2 as usize].coords[2],
    ];

    let mut max_len2 = 0.0;
    let mut v = mesh.verts[V_HEAD as usize].next;
    while v != V_HEAD {
        let d2 = [
            mesh.verts[v as usize].coords[0] - mesh.verts[v2 as usize].coords[0],
            mesh.verts[v as usize].coords[1] - mesh.verts[v2 as usize].coords[1],
            mesh.verts[v as usize].coords[2] - mesh.verts[v2 as usize].coords[2],
        ];
        let tn = [
            d1[1] * d2[2] - d1[2] * d2[1],
            d1[2] * d2[0] - d1[0] * d2[2],
            d1[0] * d2[1] - d1[1] * d2[0],
        ];
        let tl2 = tn[0] * tn[0] + tn[1] * tn[1] + tn[2] * tn[2];
        if tl2 > max_len2 {
            max_len2 = tl2;
            *norm = tn;
        }
        v = mesh.verts[v as usize].next;
    }

    if max_len2 <= 0.0 {
        *norm = [0.0, 0.0, 0.0];
        norm[short_axis(&d1)] = 1.0;
    }
}

/// If the projected contours enclose their interior clockwise, negate t so
/// the sweep always sees CCW interiors. Only meaningful when the normal was
/// fitted rather than supplied; a supplied normal's orientation is the
/// client's choice.
pub fn check_orientation(mesh: &mut Mesh) {
    // Sum the signed areas of the face loops whose winding is positive,
    // i.e. the loops as the client wound them.
    let mut area = 0.0;
    let mut f = mesh.faces[F_HEAD as usize].next;
    while f != F_HEAD {
        let an = mesh.faces[f as usize].an_edge;
        if an != INVALID && mesh.edges[an as usize].winding > 0 {
            let mut e = an;
            loop {
                let org = mesh.edges[e as usize].org;
                let dst = mesh.dst(e);
                area += (mesh.verts[org as usize].s - mesh.verts[dst as usize].s)
                    * (mesh.verts[org as usize].t + mesh.verts[dst as usize].t);
                e = mesh.edges[e as usize].lnext;
                if e == an {
                    break;
                }
            }
        }
        f = mesh.faces[f as usize].next;
    }
    if area < 0.0 {
        let mut v = mesh.verts[V_HEAD as usize].next;
        while v != V_HEAD {
            mesh.verts[v as usize].t = -mesh.verts[v as usize].t;
            v = mesh.verts[v as usize].next;
        }
    }
}

/// Set every vertex's (s, t) from its 3D coordinates.
pub fn project_polygon(mesh: &mut Mesh, normal: &[Real; 3]) {
    let mut norm = *normal;
    let mut computed = false;
    if norm == [0.0, 0.0, 0.0] {
        compute_normal(mesh, &mut norm);
        computed = true;
    }

    let i = long_axis(&norm);
    let mut s_unit = [0.0; 3];
    let mut t_unit = [0.0; 3];
    s_unit[(i + 1) % 3] = 1.0;
    t_unit[(i + 2) % 3] = if norm[i] > 0.0 { 1.0 } else { -1.0 };

    let mut v = mesh.verts[V_HEAD as usize].next;
    while v != V_HEAD {
        let c = mesh.verts[v as usize].coords;
        mesh.verts[v as usize].s = dot(&c, &s_unit);
        mesh.verts[v as usize].t = dot(&c, &t_unit);
        v = mesh.verts[v as usize].next;
    }
    if computed {
        check_orientation(mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;

    fn ring(mesh: &mut Mesh, pts: &[[Real; 3]]) {
        let e0 = mesh.make_edge();
        mesh.edges[e0 as usize].winding = 1;
        mesh.edges[(e0 ^ 1) as usize].winding = -1;
        let org = mesh.org(e0);
        mesh.verts[org as usize].coords = pts[0];
        let dst = mesh.dst(e0);
        mesh.verts[dst as usize].coords = pts[1];
        let mut e = e0;
        for &p in &pts[2..] {
            e = mesh.add_edge_vertex(e);
            mesh.edges[e as usize].winding = 1;
            mesh.edges[(e ^ 1) as usize].winding = -1;
            let dst = mesh.dst(e);
            mesh.verts[dst as usize].coords = p;
        }
        let e_close = mesh.connect(e, e0);
        mesh.edges[e_close as usize].winding = 1;
        mesh.edges[(e_close ^ 1) as usize].winding = -1;
    }

    #[test]
    fn long_and_short_axis() {
        assert_eq!(long_axis(&[1.0, -3.0, 2.0]), 1);
        assert_eq!(short_axis(&[1.0, -3.0, 2.0]), 0);
        assert_eq!(long_axis(&[0.0, 0.0, 1.0]), 2);
    }

    #[test]
    fn z_normal_projects_to_xy() {
        let mut mesh = Mesh::new();
        ring(
            &mut mesh,
            &[
                [0.0, 0.0, 5.0],
                [2.0, 0.0, 5.0],
                [2.0, 3.0, 5.0],
                [0.0, 3.0, 5.0],
            ],
        );
        project_polygon(&mut mesh, &[0.0, 0.0, 1.0]);
        let mut v = mesh.verts[V_HEAD as usize].next;
        while v != V_HEAD {
            let vert = &mesh.verts[v as usize];
            assert_eq!(vert.s, vert.coords[0]);
            assert_eq!(vert.t, vert.coords[1]);
            v = mesh.verts[v as usize].next;
        }
    }

    #[test]
    fn fitted_normal_recovers_plane() {
        let mut mesh = Mesh::new();
        ring(
            &mut mesh,
            &[
                [0.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [2.0, 3.0, 0.0],
                [0.0, 3.0, 0.0],
            ],
        );
        let mut norm = [0.0, 0.0, 0.0];
        compute_normal(&mesh, &mut norm);
        assert_eq!(long_axis(&norm), 2, "planar xy polygon has a z normal");
    }

    #[test]
    fn fitted_projection_yields_ccw_interior() {
        // CW in xy: with a fitted normal, check_orientation must flip t so
        // the winding-positive loop encloses area counter-clockwise.
        let mut mesh = Mesh::new();
        ring(
            &mut mesh,
            &[
                [0.0, 0.0, 0.0],
                [0.0, 3.0, 0.0],
                [2.0, 3.0, 0.0],
                [2.0, 0.0, 0.0],
            ],
        );
        project_polygon(&mut mesh, &[0.0, 0.0, 0.0]);

        let f1 = mesh.faces[F_HEAD as usize].next;
        let an = mesh.faces[f1 as usize].an_edge;
        let e_start = if mesh.edges[an as usize].winding > 0 {
            an
        } else {
            an ^ 1
        };
        let mut area = 0.0;
        let mut e = e_start;
        loop {
            let (os, ot) = mesh.vert_st(mesh.org(e));
            let (ds, dt) = mesh.vert_st(mesh.dst(e));
            area += (os - ds) * (ot + dt);
            e = mesh.lnext(e);
            if e == e_start {
                break;
            }
        }
        assert!(area >= 0.0, "projected interior should wind CCW, area={area}");
    }
}
