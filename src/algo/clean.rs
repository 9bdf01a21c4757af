//! Cleaning passes: removing unused, duplicated and degenerate elements.
//!
//! All functions only mark elements as deleted (and redirect references
//! where needed); call [`Mesh::compact`] afterwards to actually free the
//! slots. Each function returns the number of elements it deleted.

use optional::Optioned as Opt;
use tracing::debug;

use crate::{
    comp::IndexRemap,
    handle::{FaceHandle, Handle, VertexHandle},
    mesh::{traits::remap_references, Mesh, MeshConfig},
};
use super::stat::referenced_vertices;


/// Deletes all vertices that no face or edge refers to. References to them
/// from other components (e.g. adjacent vertices) are set to null.
pub fn remove_unreferenced_vertices<C: MeshConfig>(mesh: &mut Mesh<C>) -> usize {
    let referenced = referenced_vertices(mesh);
    let unreferenced = mesh.vertices().handles()
        .filter(|&v| !referenced[v])
        .collect::<Vec<_>>();
    if unreferenced.is_empty() {
        return 0;
    }

    let mut targets = identity_targets::<VertexHandle>(mesh.vertices().container_size());
    for &v in &unreferenced {
        mesh.delete_vertex(v);
        targets[v.to_usize()] = Opt::none();
    }
    remap_references(mesh, &IndexRemap::from_targets(targets));

    debug!("removed {} unreferenced vertices", unreferenced.len());
    unreferenced.len()
}

/// Merges vertices with exactly the same position. Of each group, the vertex
/// with the smallest handle is kept; all references to the others are
/// redirected to it.
///
/// Faces might become degenerate by this; see
/// [`remove_degenerate_faces`].
pub fn remove_duplicated_vertices<C: MeshConfig>(mesh: &mut Mesh<C>) -> usize {
    let mut sorted = mesh.vertices().handles().collect::<Vec<_>>();
    if sorted.len() < 2 {
        return 0;
    }

    sorted.sort_by(|&a, &b| {
        let (pa, pb) = (mesh.vertices().coord(a), mesh.vertices().coord(b));
        pa.x.total_cmp(&pb.x)
            .then_with(|| pa.y.total_cmp(&pb.y))
            .then_with(|| pa.z.total_cmp(&pb.z))
            .then_with(|| a.cmp(&b))
    });

    let mut targets = identity_targets::<VertexHandle>(mesh.vertices().container_size());
    let mut deleted = 0;
    let mut i = 0;
    while i < sorted.len() {
        let keep = sorted[i];
        let mut j = i + 1;
        while j < sorted.len() && mesh.vertices().coord(sorted[j]) == mesh.vertices().coord(keep) {
            targets[sorted[j].to_usize()] = Opt::some(keep);
            mesh.delete_vertex(sorted[j]);
            deleted += 1;
            j += 1;
        }
        i = j;
    }

    if deleted > 0 {
        remap_references(mesh, &IndexRemap::from_targets(targets));
    }

    debug!("merged {} duplicated vertices", deleted);
    deleted
}

/// Deletes faces that consist of the same vertices as another face,
/// regardless of order and orientation. The face with the smallest handle of
/// each group is kept.
pub fn remove_duplicated_faces<C: MeshConfig>(mesh: &mut Mesh<C>) -> usize {
    let mut keys = mesh.faces().handles()
        .map(|f| {
            let mut vertices = mesh.faces().vertices(f)
                .iter()
                .map(|v| v.into_option())
                .collect::<Vec<_>>();
            vertices.sort_unstable();
            (vertices, f)
        })
        .collect::<Vec<(Vec<Option<VertexHandle>>, FaceHandle)>>();
    keys.sort_unstable();

    let mut deleted = 0;
    for pair in keys.windows(2) {
        if pair[0].0 == pair[1].0 {
            mesh.delete_face(pair[1].1);
            deleted += 1;
        }
    }

    debug!("removed {} duplicated faces", deleted);
    deleted
}

/// Deletes faces in which two consecutive vertices are the same (e.g. the
/// triangle `a, a, b`).
pub fn remove_degenerate_faces<C: MeshConfig>(mesh: &mut Mesh<C>) -> usize {
    let degenerate = mesh.faces().handles()
        .filter(|&f| {
            let n = mesh.faces().vertex_number(f);
            (0..n).any(|i| mesh.faces().vertex(f, i) == mesh.faces().vertex_mod(f, i as isize + 1))
        })
        .collect::<Vec<_>>();

    for &f in &degenerate {
        mesh.delete_face(f);
    }

    debug!("removed {} degenerate faces", degenerate.len());
    degenerate.len()
}

/// Deletes vertices whose position has a NaN or infinite coordinate. With
/// `delete_faces`, faces referring to those vertices are deleted, too (they
/// do not count towards the returned number).
pub fn remove_degenerated_vertices<C: MeshConfig>(mesh: &mut Mesh<C>, delete_faces: bool) -> usize {
    let degenerate = mesh.vertices().handles()
        .filter(|&v| {
            let p = mesh.vertices().coord(v);
            !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite())
        })
        .collect::<Vec<_>>();

    for &v in &degenerate {
        mesh.delete_vertex(v);
    }

    if delete_faces && !degenerate.is_empty() {
        let faces = mesh.faces().handles()
            .filter(|&f| {
                mesh.faces().vertices(f)
                    .iter()
                    .filter_map(|v| v.into_option())
                    .any(|v| mesh.vertices().is_deleted(v))
            })
            .collect::<Vec<_>>();
        for f in faces {
            mesh.delete_face(f);
        }
    }

    debug!("removed {} degenerated vertices", degenerate.len());
    degenerate.len()
}

fn identity_targets<H: Handle>(len: usize) -> Vec<Opt<H>> {
    (0..len).map(|i| Opt::some(H::from_usize(i))).collect()
}
