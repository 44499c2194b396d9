// License: SGI Free Software License B (MIT-compatible)
//
// Streams the finished mesh through the client callbacks: interior faces
// as one triangle batch, or as one line loop per face in boundary mode.

use crate::mesh::{Mesh, F_HEAD};
use crate::tess::{Callbacks, PrimitiveType};

/// Emit every interior face (a triangle after tessellation) as part of a
/// single Triangles primitive. Edge flags are coalesced: the flag callback
/// runs only when the boundary/interior state of the upcoming edge differs
/// from the last one announced.
pub(crate) fn render_mesh<D: 'static>(mesh: &Mesh, data: &[D], cb: &mut Callbacks<D>) {
    let mut began = false;
    let mut edge_state: Option<bool> = None;

    let mut f = mesh.faces[F_HEAD as usize].next;
    while f != F_HEAD {
        if mesh.faces[f as usize].inside {
            if !began {
                if let Some(begin) = cb.begin.as_mut() {
                    begin(PrimitiveType::Triangles);
                }
                began = true;
            }

            let e_start = mesh.faces[f as usize].an_edge;
            let mut e = e_start;
            loop {
                if cb.edge_flag.is_some() {
                    // A boundary edge has a non-interior face on its right.
                    let flag = !mesh.edge_is_internal(e);
                    if edge_state != Some(flag) {
                        edge_state = Some(flag);
                        if let Some(edge_flag) = cb.edge_flag.as_mut() {
                            edge_flag(flag);
                        }
                    }
                }
                if let Some(vertex) = cb.vertex.as_mut() {
                    let org = mesh.org(e);
                    let handle = mesh.verts[org as usize].data;
                    if let Some(d) = data.get(handle as usize) {
                        vertex(d);
                    }
                }
                e = mesh.lnext(e);
                if e == e_start {
                    break;
                }
            }
        }
        f = mesh.faces[f as usize].next;
    }

    if began {
        if let Some(end) = cb.end.as_mut() {
            end();
        }
    }
}

/// Emit each interior face as its own LineLoop primitive. After boundary
/// extraction every interior face is one boundary contour.
pub(crate) fn render_boundary<D: 'static>(mesh: &Mesh, data: &[D], cb: &mut Callbacks<D>) {
    let mut f = mesh.faces[F_HEAD as usize].next;
    while f != F_HEAD {
        if mesh.faces[f as usize].inside {
            if let Some(begin) = cb.begin.as_mut() {
                begin(PrimitiveType::LineLoop);
            }

            let e_start = mesh.faces[f as usize].an_edge;
            let mut e = e_start;
            loop {
                if let Some(vertex) = cb.vertex.as_mut() {
                    let org = mesh.org(e);
                    let handle = mesh.verts[org as usize].data;
                    if let Some(d) = data.get(handle as usize) {
                        vertex(d);
                    }
                }
                e = mesh.lnext(e);
                if e == e_start {
                    break;
                }
            }

            if let Some(end) = cb.end.as_mut() {
                end();
            }
        }
        f = mesh.faces[f as usize].next;
    }
}
