// License: SGI Free Software License B (MIT-compatible)

//! Polygon tessellation via a sweep-line over the planar arrangement of the
//! input contours.
//!
//! The input is any set of closed contours in 3D, in any orientation, with
//! any self-intersections or overlaps. The tessellator projects them onto a
//! plane, computes which regions are interior under a configurable winding
//! rule, and streams the interior back as triangles (or as boundary line
//! loops) through client callbacks:
//!
//! ```
//! use glutess::{Tessellator, WindingRule};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let triangles = Rc::new(RefCell::new(Vec::new()));
//! let sink = triangles.clone();
//!
//! let mut tess: Tessellator<[f64; 2]> = Tessellator::new();
//! tess.set_winding_rule(WindingRule::Odd);
//! tess.on_vertex(move |v| sink.borrow_mut().push(*v));
//!
//! tess.begin_polygon();
//! tess.begin_contour();
//! for p in [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]] {
//!     tess.vertex([p[0], p[1], 0.0], p);
//! }
//! tess.end_contour();
//! tess.end_polygon();
//!
//! assert_eq!(triangles.borrow().len(), 6); // two triangles
//! ```
//!
//! Wherever two contours cross, a vertex is synthesized at the intersection
//! and the client's combine callback is asked to produce its datum from the
//! four surrounding ones. Vertices are exact-arithmetic-free: the sweep
//! tolerates floating-point inconsistencies by construction.

pub mod dict;
pub mod geom;
pub mod mesh;
pub mod priorityq;
pub mod project;
pub mod sweep;
pub mod tess;
pub mod tessmono;

pub use geom::{Real, MAX_COORD};
pub use mesh::Mesh;
pub use tess::{PrimitiveType, TessError, Tessellator, WindingRule};
