// License: SGI Free Software License B (MIT-compatible)

mod helpers;

use glutess::WindingRule;
use helpers::*;

const OUTER: [[f64; 2]; 4] = [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]];
const INNER_CCW: [[f64; 2]; 4] = [[1.0, 1.0], [3.0, 1.0], [3.0, 3.0], [1.0, 3.0]];
const INNER_CW: [[f64; 2]; 4] = [[1.0, 1.0], [1.0, 3.0], [3.0, 3.0], [3.0, 1.0]];

fn area_under(rule: WindingRule, contours: &[&[[f64; 2]]]) -> f64 {
    let (mut tess, log) = recording_tess();
    with_combine(&mut tess);
    tess.set_winding_rule(rule);
    tess.begin_polygon();
    for c in contours {
        add_contour(&mut tess, c);
    }
    tess.end_polygon();
    assert!(errors(&log).is_empty(), "unexpected errors: {:?}", errors(&log));
    total_area(&log)
}

// Nested squares, both CCW: winding is 1 in the ring and 2 in the core.

#[test]
fn odd_fills_the_ring_only() {
    let area = area_under(WindingRule::Odd, &[&OUTER, &INNER_CCW]);
    assert!(approx_eq(area, 12.0), "area={area}");
}

#[test]
fn nonzero_fills_everything() {
    let area = area_under(WindingRule::NonZero, &[&OUTER, &INNER_CCW]);
    assert!(approx_eq(area, 16.0), "area={area}");
}

#[test]
fn positive_fills_everything_for_ccw_input() {
    let area = area_under(WindingRule::Positive, &[&OUTER, &INNER_CCW]);
    assert!(approx_eq(area, 16.0), "area={area}");
}

#[test]
fn negative_fills_nothing_for_ccw_input() {
    let area = area_under(WindingRule::Negative, &[&OUTER, &INNER_CCW]);
    assert!(approx_eq(area, 0.0), "area={area}");
}

#[test]
fn abs_geq_two_fills_the_core_only() {
    let area = area_under(WindingRule::AbsGeqTwo, &[&OUTER, &INNER_CCW]);
    assert!(approx_eq(area, 4.0), "area={area}");
}

// Nested squares with the inner reversed: winding is 1 in the ring and 0 in
// the core, i.e. a square with a hole under every common rule.

#[test]
fn odd_treats_reversed_inner_as_hole() {
    let area = area_under(WindingRule::Odd, &[&OUTER, &INNER_CW]);
    assert!(approx_eq(area, 12.0), "area={area}");
}

#[test]
fn nonzero_treats_reversed_inner_as_hole() {
    let area = area_under(WindingRule::NonZero, &[&OUTER, &INNER_CW]);
    assert!(approx_eq(area, 12.0), "area={area}");
}

#[test]
fn abs_geq_two_rejects_single_cover() {
    let area = area_under(WindingRule::AbsGeqTwo, &[&OUTER, &INNER_CW]);
    assert!(approx_eq(area, 0.0), "area={area}");
}

// Two overlapping CCW squares: winding 1 in each lobe, 2 in the overlap.

const LEFT: [[f64; 2]; 4] = [[0.0, 0.0], [3.0, 0.0], [3.0, 3.0], [0.0, 3.0]];
const RIGHT: [[f64; 2]; 4] = [[2.0, 0.0], [5.0, 0.0], [5.0, 3.0], [2.0, 3.0]];

#[test]
fn overlap_under_odd_excludes_the_intersection() {
    let area = area_under(WindingRule::Odd, &[&LEFT, &RIGHT]);
    assert!(approx_eq(area, 12.0), "area={area}");
}

#[test]
fn overlap_under_nonzero_is_the_union() {
    let area = area_under(WindingRule::NonZero, &[&LEFT, &RIGHT]);
    assert!(approx_eq(area, 15.0), "area={area}");
}

#[test]
fn overlap_under_abs_geq_two_is_the_intersection() {
    let area = area_under(WindingRule::AbsGeqTwo, &[&LEFT, &RIGHT]);
    assert!(approx_eq(area, 3.0), "area={area}");
}
