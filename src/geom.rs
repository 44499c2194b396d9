// License: SGI Free Software License B (MIT-compatible)
//
// Numeric predicates for the sweep: vertex ordering, signed distance from a
// chord, and the two-pass intersection interpolation. All functions are pure
// and operate on projected (s, t) coordinates.

/// Scalar type for all coordinates.
pub type Real = f64;

/// Largest magnitude accepted for any input coordinate. Larger values are
/// clamped (with an error report) so intermediate products stay finite.
pub const MAX_COORD: Real = 1.0e150;

/// Sentinel edges sit far outside any clamped input.
pub(crate) const SENTINEL_COORD: Real = 4.0 * MAX_COORD;

/// Lexicographic sweep order: u precedes v by s first, then t.
#[inline]
pub fn vert_leq(u_s: Real, u_t: Real, v_s: Real, v_t: Real) -> bool {
    u_s < v_s || (u_s == v_s && u_t <= v_t)
}

/// Exact coordinate equality.
#[inline]
pub fn vert_eq(u_s: Real, u_t: Real, v_s: Real, v_t: Real) -> bool {
    u_s == v_s && u_t == v_t
}

/// vert_leq with s and t transposed; used when interpolating the
/// t-coordinate of an intersection.
#[inline]
pub fn trans_leq(u_s: Real, u_t: Real, v_s: Real, v_t: Real) -> bool {
    u_t < v_t || (u_t == v_t && u_s <= v_s)
}

/// Given u, v, w with vert_leq(u,v) and vert_leq(v,w), evaluates the signed
/// t-distance from v to the chord uw at v's s-coordinate. Returns 0 for a
/// vertical chord. Interpolates from the nearer endpoint for accuracy.
pub fn edge_eval(u_s: Real, u_t: Real, v_s: Real, v_t: Real, w_s: Real, w_t: Real) -> Real {
    let gap_l = v_s - u_s;
    let gap_r = w_s - v_s;
    if gap_l + gap_r > 0.0 {
        if gap_l < gap_r {
            (v_t - u_t) + (u_t - w_t) * (gap_l / (gap_l + gap_r))
        } else {
            (v_t - w_t) + (w_t - u_t) * (gap_r / (gap_l + gap_r))
        }
    } else {
        0.0
    }
}

/// Sign of the t-distance from v to the chord uw. Aliased to the full
/// evaluation so the sign can never disagree with edge_eval.
#[inline]
pub fn edge_sign(u_s: Real, u_t: Real, v_s: Real, v_t: Real, w_s: Real, w_t: Real) -> Real {
    edge_eval(u_s, u_t, v_s, v_t, w_s, w_t)
}

/// edge_eval with s and t transposed.
pub fn trans_eval(u_s: Real, u_t: Real, v_s: Real, v_t: Real, w_s: Real, w_t: Real) -> Real {
    let gap_l = v_t - u_t;
    let gap_r = w_t - v_t;
    if gap_l + gap_r > 0.0 {
        if gap_l < gap_r {
            (v_s - u_s) + (u_s - w_s) * (gap_l / (gap_l + gap_r))
        } else {
            (v_s - w_s) + (w_s - u_s) * (gap_r / (gap_l + gap_r))
        }
    } else {
        0.0
    }
}

/// edge_sign with s and t transposed.
pub fn trans_sign(u_s: Real, u_t: Real, v_s: Real, v_t: Real, w_s: Real, w_t: Real) -> Real {
    let gap_l = v_t - u_t;
    let gap_r = w_t - v_t;
    if gap_l + gap_r > 0.0 {
        (v_s - w_s) * gap_l + (v_s - u_s) * gap_r
    } else {
        0.0
    }
}

/// L1 distance between two vertices; used for combine-callback weights.
#[inline]
pub fn vert_l1_dist(u_s: Real, u_t: Real, v_s: Real, v_t: Real) -> Real {
    (u_s - v_s).abs() + (u_t - v_t).abs()
}

/// Stable weighted interpolation: (b*x + a*y) / (a + b), computed from the
/// side with the larger weight; midpoint when both weights vanish. Negative
/// weights are clamped to zero. The result always lies between x and y.
#[inline]
pub fn interpolate(mut a: Real, x: Real, mut b: Real, y: Real) -> Real {
    if a < 0.0 {
        a = 0.0;
    }
    if b < 0.0 {
        b = 0.0;
    }
    if a <= b {
        if b == 0.0 {
            (x + y) / 2.0
        } else {
            x + (y - x) * (a / (a + b))
        }
    } else {
        y + (x - y) * (b / (a + b))
    }
}

/// Intersection of segments (o1,d1) and (o2,d2), assumed to actually cross
/// or nearly so. The s and t coordinates are interpolated independently,
/// each after sorting the four endpoints in the relevant order, so the
/// result is guaranteed to lie within the bounding rectangle of both
/// segments even for nearly parallel input.
#[allow(clippy::too_many_arguments)]
pub fn edge_intersect(
    o1_s: Real,
    o1_t: Real,
    d1_s: Real,
    d1_t: Real,
    o2_s: Real,
    o2_t: Real,
    d2_s: Real,
    d2_t: Real,
) -> (Real, Real) {
    // s-coordinate: sort the four endpoints under vert_leq so that each
    // segment runs left to right and segment 1 starts leftmost.
    let v_s;
    {
        let (mut a_s, mut a_t) = (o1_s, o1_t);
        let (mut b_s, mut b_t) = (d1_s, d1_t);
        let (mut c_s, mut c_t) = (o2_s, o2_t);
        let (mut d_s, mut d_t) = (d2_s, d2_t);

        if !vert_leq(a_s, a_t, b_s, b_t) {
            core::mem::swap(&mut a_s, &mut b_s);
            core::mem::swap(&mut a_t, &mut b_t);
        }
        if !vert_leq(c_s, c_t, d_s, d_t) {
            core::mem::swap(&mut c_s, &mut d_s);
            core::mem::swap(&mut c_t, &mut d_t);
        }
        if !vert_leq(a_s, a_t, c_s, c_t) {
            core::mem::swap(&mut a_s, &mut c_s);
            core::mem::swap(&mut a_t, &mut c_t);
            core::mem::swap(&mut b_s, &mut d_s);
            core::mem::swap(&mut b_t, &mut d_t);
        }

        if !vert_leq(c_s, c_t, b_s, b_t) {
            // Technically not intersecting; use the midpoint of the middle pair.
            v_s = (c_s + b_s) / 2.0;
        } else if vert_leq(b_s, b_t, d_s, d_t) {
            // Interior endpoints are c and b.
            let mut z1 = edge_eval(a_s, a_t, c_s, c_t, b_s, b_t);
            let mut z2 = edge_eval(c_s, c_t, b_s, b_t, d_s, d_t);
            if z1 + z2 < 0.0 {
                z1 = -z1;
                z2 = -z2;
            }
            v_s = interpolate(z1, c_s, z2, b_s);
        } else {
            // Interior endpoints are c and d.
            let mut z1 = edge_sign(a_s, a_t, c_s, c_t, b_s, b_t);
            let mut z2 = -edge_sign(a_s, a_t, d_s, d_t, b_s, b_t);
            if z1 + z2 < 0.0 {
                z1 = -z1;
                z2 = -z2;
            }
            v_s = interpolate(z1, c_s, z2, d_s);
        }
    }

    // t-coordinate: the same dance under trans_leq.
    let v_t;
    {
        let (mut a_s, mut a_t) = (o1_s, o1_t);
        let (mut b_s, mut b_t) = (d1_s, d1_t);
        let (mut c_s, mut c_t) = (o2_s, o2_t);
        let (mut d_s, mut d_t) = (d2_s, d2_t);

        if !trans_leq(a_s, a_t, b_s, b_t) {
            core::mem::swap(&mut a_s, &mut b_s);
            core::mem::swap(&mut a_t, &mut b_t);
        }
        if !trans_leq(c_s, c_t, d_s, d_t) {
            core::mem::swap(&mut c_s, &mut d_s);
            core::mem::swap(&mut c_t, &mut d_t);
        }
        if !trans_leq(a_s, a_t, c_s, c_t) {
            core::mem::swap(&mut a_s, &mut c_s);
            core::mem::swap(&mut a_t, &mut c_t);
            core::mem::swap(&mut b_s, &mut d_s);
            core::mem::swap(&mut b_t, &mut d_t);
        }

        if !trans_leq(c_s, c_t, b_s, b_t) {
            v_t = (c_t + b_t) / 2.0;
        } else if trans_leq(b_s, b_t, d_s, d_t) {
            let mut z1 = trans_eval(a_s, a_t, c_s, c_t, b_s, b_t);
            let mut z2 = trans_eval(c_s, c_t, b_s, b_t, d_s, d_t);
            if z1 + z2 < 0.0 {
                z1 = -z1;
                z2 = -z2;
            }
            v_t = interpolate(z1, c_t, z2, b_t);
        } else {
            let mut z1 = trans_sign(a_s, a_t, c_s, c_t, b_s, b_t);
            let mut z2 = -trans_sign(a_s, a_t, d_s, d_t, b_s, b_t);
            if z1 + z2 < 0.0 {
                z1 = -z1;
                z2 = -z2;
            }
            v_t = interpolate(z1, c_t, z2, d_t);
        }
    }

    (v_s, v_t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vert_leq_is_lexicographic() {
        assert!(vert_leq(0.0, 0.0, 1.0, 0.0));
        assert!(vert_leq(0.0, 0.0, 0.0, 1.0));
        assert!(vert_leq(0.0, 0.0, 0.0, 0.0));
        assert!(!vert_leq(1.0, 0.0, 0.0, 0.0));
        assert!(!vert_leq(0.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn trans_leq_swaps_axes() {
        assert!(trans_leq(0.0, 0.0, 0.0, 1.0));
        assert!(trans_leq(1.0, 0.0, 0.0, 1.0));
        assert!(!trans_leq(0.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn edge_eval_measures_distance_above_chord() {
        // v sits one unit above the chord from (0,0) to (1,0)
        let r = edge_eval(0.0, 0.0, 0.5, 1.0, 1.0, 0.0);
        assert!((r - 1.0).abs() < 1e-12, "got {r}");
    }

    #[test]
    fn edge_eval_vertical_chord_is_zero() {
        assert_eq!(edge_eval(0.0, 0.0, 0.0, 0.5, 0.0, 1.0), 0.0);
    }

    #[test]
    fn edge_sign_agrees_with_edge_eval() {
        let cases = [
            (0.0, 0.0, 0.5, 0.7, 1.0, 0.0),
            (0.0, 0.0, 0.5, -0.7, 1.0, 0.0),
            (-3.0, 1.0, 0.0, 0.0, 2.0, -1.0),
        ];
        for (us, ut, vs, vt, ws, wt) in cases {
            let a = edge_eval(us, ut, vs, vt, ws, wt);
            let b = edge_sign(us, ut, vs, vt, ws, wt);
            assert_eq!(a.signum(), b.signum());
        }
    }

    #[test]
    fn interpolate_midpoint_when_weights_vanish() {
        assert!((interpolate(0.0, 0.0, 0.0, 1.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn interpolate_stays_in_range() {
        let r = interpolate(3.0, -2.0, 1.0, 6.0);
        assert!((-2.0..=6.0).contains(&r));
        // negative weights clamp to zero
        let r = interpolate(-1.0, 0.0, 1.0, 4.0);
        assert_eq!(r, 0.0);
    }

    #[test]
    fn edge_intersect_symmetric_cross() {
        let (s, t) = edge_intersect(0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0);
        assert!((s - 0.5).abs() < 1e-12, "s={s}");
        assert!((t - 0.5).abs() < 1e-12, "t={t}");
    }

    #[test]
    fn edge_intersect_stays_in_bounding_box() {
        let (s, t) = edge_intersect(0.0, 0.0, 4.0, 1e-9, 0.0, 1e-9, 4.0, 0.0);
        assert!((0.0..=4.0).contains(&s));
        assert!((0.0..=1e-9).contains(&t));
    }
}
