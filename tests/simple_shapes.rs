// License: SGI Free Software License B (MIT-compatible)

mod helpers;

use helpers::*;

const SQUARE: [[f64; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

#[test]
fn square_yields_two_triangles() {
    let log = tessellate(&[&SQUARE]);

    let tris = triangles(&log);
    assert_eq!(tris.len(), 2);
    assert!(approx_eq(total_area(&log), 1.0));
    assert!(errors(&log).is_empty());
}

#[test]
fn triangle_batch_has_one_begin_and_one_end() {
    let log = tessellate(&[&SQUARE]);

    let begins = log
        .borrow()
        .iter()
        .filter(|e| matches!(e, Event::Begin(_)))
        .count();
    let ends = log.borrow().iter().filter(|e| matches!(e, Event::End)).count();
    assert_eq!(begins, 1);
    assert_eq!(ends, 1);
}

#[test]
fn convex_polygon_has_n_minus_2_triangles() {
    // Regular-ish hexagon.
    let hexagon: [[f64; 2]; 6] = [
        [0.0, 0.0],
        [2.0, -1.0],
        [4.0, 0.0],
        [4.0, 2.0],
        [2.0, 3.0],
        [0.0, 2.0],
    ];
    let log = tessellate(&[&hexagon]);
    assert_eq!(triangles(&log).len(), 4);
}

#[test]
fn concave_polygon_is_covered_exactly() {
    // An L shape of area 3.
    let ell: [[f64; 2]; 6] = [
        [0.0, 0.0],
        [2.0, 0.0],
        [2.0, 1.0],
        [1.0, 1.0],
        [1.0, 2.0],
        [0.0, 2.0],
    ];
    let log = tessellate(&[&ell]);
    assert_eq!(triangles(&log).len(), 4);
    assert!(approx_eq(total_area(&log), 3.0));
}

#[test]
fn clockwise_contour_is_filled_too() {
    // Default winding rule is Odd: orientation must not matter.
    let cw: Vec<[f64; 2]> = SQUARE.iter().rev().copied().collect();
    let log = tessellate(&[&cw]);
    assert!(approx_eq(total_area(&log), 1.0));
}

#[test]
fn two_disjoint_squares() {
    let right: [[f64; 2]; 4] = [[3.0, 0.0], [4.0, 0.0], [4.0, 1.0], [3.0, 1.0]];
    let log = tessellate(&[&SQUARE, &right]);
    assert_eq!(triangles(&log).len(), 4);
    assert!(approx_eq(total_area(&log), 2.0));
}

#[test]
fn empty_polygon_emits_nothing() {
    let log = tessellate(&[]);
    assert!(log.borrow().is_empty());
}

#[test]
fn degenerate_contours_are_silently_dropped() {
    let point: [[f64; 2]; 1] = [[0.5, 0.5]];
    let segment: [[f64; 2]; 2] = [[0.0, 0.0], [1.0, 1.0]];
    let log = tessellate(&[&point, &segment]);
    assert!(triangles(&log).is_empty());
    assert!(errors(&log).is_empty());
}

#[test]
fn repeated_vertices_collapse() {
    let dup: [[f64; 2]; 6] = [
        [0.0, 0.0],
        [0.0, 0.0],
        [1.0, 0.0],
        [1.0, 1.0],
        [1.0, 1.0],
        [0.0, 1.0],
    ];
    let log = tessellate(&[&dup]);
    assert_eq!(triangles(&log).len(), 2);
    assert!(approx_eq(total_area(&log), 1.0));
}

#[test]
fn edge_flags_mark_the_boundary() {
    let log = tessellate(&[&SQUARE]);

    // The interior diagonal must show up as at least one flag transition,
    // and flags must precede the vertices they describe.
    let events = log.borrow();
    let first_flag = events
        .iter()
        .position(|e| matches!(e, Event::EdgeFlag(_)))
        .expect("edge-flag callback must fire");
    let first_vertex = events
        .iter()
        .position(|e| matches!(e, Event::Vertex(_)))
        .expect("vertex callback must fire");
    assert!(first_flag < first_vertex);
    assert!(events.iter().any(|e| matches!(e, Event::EdgeFlag(false))));
    assert!(events.iter().any(|e| matches!(e, Event::EdgeFlag(true))));
}

#[test]
fn polygon_reuse_is_independent() {
    let (mut tess, log) = recording_tess();
    with_combine(&mut tess);

    tess.begin_polygon();
    add_contour(&mut tess, &SQUARE);
    tess.end_polygon();
    let first = triangles(&log).len();

    tess.begin_polygon();
    add_contour(&mut tess, &SQUARE);
    tess.end_polygon();

    assert_eq!(triangles(&log).len(), first * 2);
    assert!(errors(&log).is_empty());
}
