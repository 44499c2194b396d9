// License: SGI Free Software License B (MIT-compatible)
//
// Public tessellation API. The client describes a polygon as a set of
// contours between begin_polygon/end_polygon, and end_polygon runs the
// pipeline: project to a plane, sweep the arrangement, mark the interior
// by the winding rule, triangulate (or extract the boundary), and stream
// the result through the registered callbacks.
//
// Calls out of order are repaired rather than rejected: the missing
// begin/end is reported through the error callback and then performed
// implicitly, so a sloppy caller still gets geometry out.

pub mod render;

use thiserror::Error;
use tracing::debug;

use crate::dict::Dict;
use crate::geom::{Real, MAX_COORD};
use crate::mesh::{EdgeIdx, Mesh, VertIdx, INVALID};
use crate::priorityq::PriorityQ;
use crate::project;
use crate::sweep::{ActiveRegion, EventKey, RegionIdx};
use crate::tessmono;

/// Rule deciding which winding numbers count as interior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindingRule {
    #[default]
    Odd,
    NonZero,
    Positive,
    Negative,
    AbsGeqTwo,
}

/// Primitive kind announced by the begin callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveType {
    Triangles,
    LineLoop,
}

/// Errors reported through the error callback. None of them abort the
/// tessellator; NeedCombineCallback suppresses output for the current
/// polygon, the rest are repaired in place.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TessError {
    #[error("begin_polygon was not called before this operation")]
    MissingBeginPolygon,
    #[error("end_polygon was not called before this operation")]
    MissingEndPolygon,
    #[error("begin_contour was not called before this operation")]
    MissingBeginContour,
    #[error("end_contour was not called before this operation")]
    MissingEndContour,
    #[error("input coordinate exceeds the representable range and was clamped")]
    CoordTooLarge,
    #[error("contours intersect but no combine callback is registered")]
    NeedCombineCallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum State {
    Dormant,
    InPolygon,
    InContour,
}

/// Client callbacks. Vertex data lives in a pool owned by the tessellator;
/// the vertex callback borrows from it.
pub(crate) struct Callbacks<D: 'static> {
    pub begin: Option<Box<dyn FnMut(PrimitiveType)>>,
    pub vertex: Option<Box<dyn FnMut(&D)>>,
    pub edge_flag: Option<Box<dyn FnMut(bool)>>,
    pub end: Option<Box<dyn FnMut()>>,
    pub error: Option<Box<dyn FnMut(TessError)>>,
    pub combine: Option<Box<dyn FnMut([Real; 3], [Option<&D>; 4], [Real; 4]) -> D>>,
    pub mesh: Option<Box<dyn FnMut(Mesh, Vec<D>)>>,
}

impl<D: 'static> Default for Callbacks<D> {
    fn default() -> Self {
        Callbacks {
            begin: None,
            vertex: None,
            edge_flag: None,
            end: None,
            error: None,
            combine: None,
            mesh: None,
        }
    }
}

/// Polygon tessellator. `D` is the per-vertex client datum carried through
/// to the output callbacks; intersections of contours synthesize new data
/// through the combine callback.
pub struct Tessellator<D: 'static> {
    state: State,
    /// Mesh under construction, present from begin_polygon to end_polygon.
    mesh: Option<Mesh>,
    /// Most recent edge of the current contour.
    last_edge: EdgeIdx,

    normal: [Real; 3],
    winding_rule: WindingRule,
    boundary_only: bool,

    // Sweep state.
    pub(crate) event: VertIdx,
    pub(crate) event_s: Real,
    pub(crate) event_t: Real,
    pub(crate) regions: Vec<ActiveRegion>,
    pub(crate) region_free: Vec<RegionIdx>,
    pub(crate) dict: Dict,
    pub(crate) pq: Option<PriorityQ<EventKey>>,
    pub(crate) fatal_error: bool,

    pub(crate) cb: Callbacks<D>,
    pub(crate) data: Vec<D>,
}

impl<D: 'static> Default for Tessellator<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: 'static> Tessellator<D> {
    pub fn new() -> Self {
        Tessellator {
            state: State::Dormant,
            mesh: None,
            last_edge: INVALID,
            normal: [0.0; 3],
            winding_rule: WindingRule::Odd,
            boundary_only: false,
            event: INVALID,
            event_s: 0.0,
            event_t: 0.0,
            regions: Vec::new(),
            region_free: Vec::new(),
            dict: Dict::new(),
            pq: None,
            fatal_error: false,
            cb: Callbacks::default(),
            data: Vec::new(),
        }
    }

    // ─────────────── Properties ───────────────

    pub fn set_winding_rule(&mut self, rule: WindingRule) {
        self.winding_rule = rule;
    }

    /// Emit only the boundary between interior and exterior, as line loops,
    /// instead of a triangulation.
    pub fn set_boundary_only(&mut self, boundary_only: bool) {
        self.boundary_only = boundary_only;
    }

    /// Supply the polygon normal. A zero normal (the default) makes the
    /// tessellator fit one to the input.
    pub fn set_normal(&mut self, normal: [Real; 3]) {
        self.normal = normal;
    }

    pub(crate) fn is_winding_inside(&self, n: i32) -> bool {
        match self.winding_rule {
            WindingRule::Odd => n & 1 != 0,
            WindingRule::NonZero => n != 0,
            WindingRule::Positive => n > 0,
            WindingRule::Negative => n < 0,
            WindingRule::AbsGeqTwo => !(-1..=1).contains(&n),
        }
    }

    // ─────────────── Callback registration ───────────────

    pub fn on_begin(&mut self, f: impl FnMut(PrimitiveType) + 'static) {
        self.cb.begin = Some(Box::new(f));
    }

    pub fn on_vertex(&mut self, f: impl FnMut(&D) + 'static) {
        self.cb.vertex = Some(Box::new(f));
    }

    /// Registering an edge-flag callback guarantees triangle output with
    /// per-edge boundary flags, announced before the affected vertices.
    pub fn on_edge_flag(&mut self, f: impl FnMut(bool) + 'static) {
        self.cb.edge_flag = Some(Box::new(f));
    }

    pub fn on_end(&mut self, f: impl FnMut() + 'static) {
        self.cb.end = Some(Box::new(f));
    }

    pub fn on_error(&mut self, f: impl FnMut(TessError) + 'static) {
        self.cb.error = Some(Box::new(f));
    }

    /// Called when vertices must merge or a new vertex appears at a contour
    /// intersection: given the new position, up to four source data and
    /// their weights, produce the datum for the new vertex.
    pub fn on_combine(&mut self, f: impl FnMut([Real; 3], [Option<&D>; 4], [Real; 4]) -> D + 'static) {
        self.cb.combine = Some(Box::new(f));
    }

    /// Receive the tessellated interior as a mesh instead of (or in
    /// addition to) the streamed primitives. The mesh's exterior faces are
    /// discarded before handover, and the data pool moves with it.
    pub fn on_mesh(&mut self, f: impl FnMut(Mesh, Vec<D>) + 'static) {
        self.cb.mesh = Some(Box::new(f));
    }

    // ─────────────── State machine ───────────────

    fn require_state(&mut self, state: State) {
        if self.state != state {
            self.goto_state(state);
        }
    }

    /// Repair an out-of-order call: report each missing begin/end and then
    /// perform it, until the tessellator reaches the state the caller
    /// assumed.
    fn goto_state(&mut self, target: State) {
        while self.state != target {
            if self.state < target {
                match self.state {
                    State::Dormant => {
                        self.call_error(TessError::MissingBeginPolygon);
                        self.begin_polygon();
                    }
                    State::InPolygon => {
                        self.call_error(TessError::MissingBeginContour);
                        self.begin_contour();
                    }
                    State::InContour => unreachable!(),
                }
            } else {
                match self.state {
                    State::InContour => {
                        self.call_error(TessError::MissingEndContour);
                        self.end_contour();
                    }
                    State::InPolygon => {
                        self.call_error(TessError::MissingEndPolygon);
                        self.end_polygon();
                    }
                    State::Dormant => unreachable!(),
                }
            }
        }
    }

    // ─────────────── Polygon input ───────────────

    pub fn begin_polygon(&mut self) {
        self.require_state(State::Dormant);
        self.state = State::InPolygon;

        self.mesh = Some(Mesh::new());
        self.data.clear();
        self.regions.clear();
        self.region_free.clear();
        self.fatal_error = false;
    }

    pub fn begin_contour(&mut self) {
        self.require_state(State::InPolygon);
        self.state = State::InContour;
        self.last_edge = INVALID;
    }

    /// Add a vertex to the current contour. Coordinates outside
    /// [-MAX_COORD, MAX_COORD] are clamped and reported as CoordTooLarge.
    pub fn vertex(&mut self, coords: [Real; 3], data: D) {
        self.require_state(State::InContour);

        let mut coords = coords;
        let mut clamped = false;
        for x in coords.iter_mut() {
            if *x < -MAX_COORD {
                *x = -MAX_COORD;
                clamped = true;
            }
            if *x > MAX_COORD {
                *x = MAX_COORD;
                clamped = true;
            }
        }
        if clamped {
            self.call_error(TessError::CoordTooLarge);
        }

        self.data.push(data);
        let handle = (self.data.len() - 1) as u32;
        self.add_vertex(coords, handle);
    }

    fn add_vertex(&mut self, coords: [Real; 3], data_handle: u32) {
        let Some(mesh) = self.mesh.as_mut() else {
            return;
        };

        let e = if self.last_edge == INVALID {
            // First vertex of the contour: a self-loop with one vertex.
            let e = mesh.make_edge();
            mesh.splice(e, e ^ 1);
            e
        } else {
            // Split to create a vertex and edge following last_edge around
            // the contour's left face.
            mesh.split_edge(self.last_edge)
        };

        let org = mesh.org(e);
        let v = &mut mesh.verts[org as usize];
        v.coords = coords;
        v.data = data_handle;

        // Vertices arrive in an order where a CCW contour adds +1 to the
        // winding number of the region it encloses.
        mesh.edges[e as usize].winding = 1;
        mesh.edges[(e ^ 1) as usize].winding = -1;

        self.last_edge = e;
    }

    pub fn end_contour(&mut self) {
        self.require_state(State::InContour);
        self.state = State::InPolygon;
    }

    /// Run the pipeline and deliver the output through the callbacks.
    pub fn end_polygon(&mut self) {
        self.require_state(State::InPolygon);
        self.state = State::Dormant;

        let Some(mut mesh) = self.mesh.take() else {
            return;
        };
        debug!(
            winding_rule = ?self.winding_rule,
            boundary_only = self.boundary_only,
            "tessellating polygon"
        );

        project::project_polygon(&mut mesh, &self.normal);
        self.compute_interior(&mut mesh);

        if !self.fatal_error {
            if self.boundary_only {
                tessmono::set_winding_number(&mut mesh, 1, true);
            } else {
                tessmono::tessellate_interior(&mut mesh);
            }
            mesh.check_mesh();

            let streaming = self.cb.begin.is_some()
                || self.cb.vertex.is_some()
                || self.cb.edge_flag.is_some()
                || self.cb.end.is_some();
            if streaming {
                if self.boundary_only {
                    render::render_boundary(&mesh, &self.data, &mut self.cb);
                } else {
                    render::render_mesh(&mesh, &self.data, &mut self.cb);
                }
            }

            if self.cb.mesh.is_some() {
                tessmono::discard_exterior(&mut mesh);
                let data = std::mem::take(&mut self.data);
                if let Some(mesh_cb) = self.cb.mesh.as_mut() {
                    mesh_cb(mesh, data);
                }
                return;
            }
        }
        self.data.clear();
    }
}
