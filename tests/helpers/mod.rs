// License: SGI Free Software License B (MIT-compatible)
//
// Shared test plumbing: a tessellator wired to a shared event log, plus
// extractors for the primitive stream.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use glutess::{PrimitiveType, TessError, Tessellator};

/// Per-vertex datum used throughout the tests: the input coordinates, so
/// output vertices can be checked geometrically.
pub type Datum = [f64; 3];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    Begin(PrimitiveType),
    EdgeFlag(bool),
    Vertex(Datum),
    End,
    Error(TessError),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

/// Route sweep tracing into the test harness output. Idempotent.
pub fn init_logging() {
    use std::sync::Once;
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// A tessellator with every streaming callback recording into a shared log.
/// No combine callback; tests that need one call `with_combine`.
pub fn recording_tess() -> (Tessellator<Datum>, Log) {
    init_logging();
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut tess = Tessellator::new();

    let l = log.clone();
    tess.on_begin(move |prim| l.borrow_mut().push(Event::Begin(prim)));
    let l = log.clone();
    tess.on_edge_flag(move |flag| l.borrow_mut().push(Event::EdgeFlag(flag)));
    let l = log.clone();
    tess.on_vertex(move |d: &Datum| l.borrow_mut().push(Event::Vertex(*d)));
    let l = log.clone();
    tess.on_end(move || l.borrow_mut().push(Event::End));
    let l = log.clone();
    tess.on_error(move |err| l.borrow_mut().push(Event::Error(err)));

    (tess, log)
}

/// Synthesized vertices just carry their new position.
pub fn with_combine(tess: &mut Tessellator<Datum>) {
    tess.on_combine(|coords, _data, _weights| coords);
}

/// Feed one contour of 2D points at z = 0.
pub fn add_contour(tess: &mut Tessellator<Datum>, pts: &[[f64; 2]]) {
    tess.begin_contour();
    for p in pts {
        let c = [p[0], p[1], 0.0];
        tess.vertex(c, c);
    }
    tess.end_contour();
}

/// Tessellate a set of contours under default settings and return the log.
pub fn tessellate(contours: &[&[[f64; 2]]]) -> Log {
    let (mut tess, log) = recording_tess();
    with_combine(&mut tess);
    tess.begin_polygon();
    for c in contours {
        add_contour(&mut tess, c);
    }
    tess.end_polygon();
    log
}

/// Vertex triples of the Triangles primitives in the log.
pub fn triangles(log: &Log) -> Vec<[Datum; 3]> {
    let mut verts = Vec::new();
    let mut in_tris = false;
    for ev in log.borrow().iter() {
        match ev {
            Event::Begin(PrimitiveType::Triangles) => in_tris = true,
            Event::End => in_tris = false,
            Event::Vertex(v) if in_tris => verts.push(*v),
            _ => {}
        }
    }
    assert_eq!(verts.len() % 3, 0, "triangle stream length must be a multiple of 3");
    verts
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect()
}

/// Vertex lists of the LineLoop primitives in the log.
pub fn line_loops(log: &Log) -> Vec<Vec<Datum>> {
    let mut loops = Vec::new();
    let mut current: Option<Vec<Datum>> = None;
    for ev in log.borrow().iter() {
        match ev {
            Event::Begin(PrimitiveType::LineLoop) => current = Some(Vec::new()),
            Event::Vertex(v) => {
                if let Some(l) = current.as_mut() {
                    l.push(*v);
                }
            }
            Event::End => {
                if let Some(l) = current.take() {
                    loops.push(l);
                }
            }
            _ => {}
        }
    }
    loops
}

pub fn errors(log: &Log) -> Vec<TessError> {
    log.borrow()
        .iter()
        .filter_map(|ev| match ev {
            Event::Error(e) => Some(*e),
            _ => None,
        })
        .collect()
}

pub fn signed_area(tri: &[Datum; 3]) -> f64 {
    0.5 * ((tri[1][0] - tri[0][0]) * (tri[2][1] - tri[0][1])
        - (tri[2][0] - tri[0][0]) * (tri[1][1] - tri[0][1]))
}

/// Total unsigned area of all triangles in the log.
pub fn total_area(log: &Log) -> f64 {
    triangles(log).iter().map(|t| signed_area(t).abs()).sum()
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
