// License: SGI Free Software License B (MIT-compatible)

mod helpers;

use std::cell::RefCell;
use std::rc::Rc;

use glutess::TessError;
use helpers::*;

// A bowtie: the contour crosses itself at (1, 1).
const BOWTIE: [[f64; 2]; 4] = [[0.0, 0.0], [2.0, 2.0], [2.0, 0.0], [0.0, 2.0]];

#[test]
fn intersection_without_combine_is_fatal() {
    let (mut tess, log) = recording_tess();
    tess.begin_polygon();
    add_contour(&mut tess, &BOWTIE);
    tess.end_polygon();

    assert_eq!(errors(&log), vec![TessError::NeedCombineCallback]);
    assert!(triangles(&log).is_empty(), "no output after a fatal error");
}

#[test]
fn need_combine_is_reported_once_per_polygon() {
    // Two crossings: a double bowtie.
    let double: [[f64; 2]; 6] = [
        [0.0, 0.0],
        [2.0, 2.0],
        [4.0, 0.0],
        [4.0, 2.0],
        [2.0, 0.0],
        [0.0, 2.0],
    ];
    let (mut tess, log) = recording_tess();
    tess.begin_polygon();
    add_contour(&mut tess, &double);
    tess.end_polygon();

    assert_eq!(errors(&log), vec![TessError::NeedCombineCallback]);
}

#[test]
fn bowtie_with_combine_produces_both_lobes() {
    let log = tessellate(&[&BOWTIE]);

    assert!(errors(&log).is_empty());
    let tris = triangles(&log);
    assert!(!tris.is_empty());
    // The two lobes have area 1 each.
    assert!(approx_eq(total_area(&log), 2.0));
    // Every emitted vertex stays inside the input bounding box.
    for t in &tris {
        for v in t {
            assert!((0.0..=2.0).contains(&v[0]), "x out of range: {v:?}");
            assert!((0.0..=2.0).contains(&v[1]), "y out of range: {v:?}");
        }
    }
}

#[test]
fn symmetric_crossing_has_equal_weights() {
    let combines: Rc<RefCell<Vec<([f64; 3], [f64; 4])>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = combines.clone();

    let (mut tess, log) = recording_tess();
    tess.on_combine(move |coords, _data, weights| {
        sink.borrow_mut().push((coords, weights));
        coords
    });

    tess.begin_polygon();
    add_contour(&mut tess, &BOWTIE);
    tess.end_polygon();

    assert!(errors(&log).is_empty());
    let calls = combines.borrow();
    assert_eq!(calls.len(), 1, "exactly one synthesized vertex");
    let (coords, weights) = calls[0];
    // The crossing is the midpoint of both edges: four equal quarters.
    assert!(approx_eq(coords[0], 1.0) && approx_eq(coords[1], 1.0));
    for w in weights {
        assert!(approx_eq(w, 0.25), "weights={weights:?}");
    }
}

#[test]
fn combine_sees_the_contributing_data() {
    let (mut tess, log) = recording_tess();
    tess.on_combine(|coords, data, _weights| {
        // An edge intersection contributes data from both edges.
        assert!(data[0].is_some() && data[1].is_some());
        assert!(data[2].is_some() && data[3].is_some());
        coords
    });

    tess.begin_polygon();
    add_contour(&mut tess, &BOWTIE);
    tess.end_polygon();
    assert!(errors(&log).is_empty());
}

#[test]
fn fatal_error_does_not_poison_the_next_polygon() {
    let (mut tess, log) = recording_tess();

    tess.begin_polygon();
    add_contour(&mut tess, &BOWTIE);
    tess.end_polygon();
    assert_eq!(errors(&log), vec![TessError::NeedCombineCallback]);

    // A simple square afterwards tessellates normally.
    tess.begin_polygon();
    add_contour(&mut tess, &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    tess.end_polygon();

    assert_eq!(triangles(&log).len(), 2);
    assert_eq!(errors(&log).len(), 1, "no new errors");
}
