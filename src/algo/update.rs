//! Recomputing stored connectivity from the face vertex lists.
//!
//! Adjacency components are not kept up to date automatically when faces
//! are added, changed or deleted. After editing a mesh, call the functions
//! of this module for the components you need.

use tracing::debug;

use crate::{
    comp::{ComponentKind, PresentMode},
    error::{Error, Result},
    handle::{ElementKind, FaceHandle, Handle, VertexHandle},
    mesh::{FaceAdjMeshMut, FaceConfig, Mesh, MeshConfig, VertexConfig},
};
use super::sorted_face_edges;


/// Recomputes the adjacent faces of every face.
///
/// Border edges get no adjacent face. If two faces share an edge, they point
/// to each other. If more faces share an edge, the faces around it form a
/// ring in which each face points to the next one (ordered by face handle).
///
/// Returns `Error::MissingComponent` if the face adjacency is disabled.
pub fn update_per_face_adjacent_faces<M: FaceAdjMeshMut>(mesh: &mut M) -> Result<()> {
    mesh.require_face_adjacency()?;

    let faces = mesh.face_handles().collect::<Vec<_>>();
    for &f in &faces {
        for i in 0..mesh.face_vertex_number(f) {
            mesh.set_adj_face(f, i, None);
        }
    }

    let edges = sorted_face_edges(mesh);
    let mut start = 0;
    let mut non_manifold = 0;
    while start < edges.len() {
        let mut end = start + 1;
        while end < edges.len() && edges[end].0 == edges[start].0 {
            end += 1;
        }

        if end - start > 1 {
            if end - start > 2 {
                non_manifold += 1;
            }
            for k in start..end {
                let next = if k + 1 == end { start } else { k + 1 };
                let (_, f, i) = edges[k];
                mesh.set_adj_face(f, i, Some(edges[next].1));
            }
        }
        start = end;
    }

    debug!(
        "updated adjacent faces of {} faces ({} non-manifold edges)",
        faces.len(),
        non_manifold,
    );
    Ok(())
}

/// Recomputes the list of adjacent faces of every vertex. The faces are
/// listed in increasing handle order.
///
/// Returns `Error::MissingComponent` if the vertex adjacent faces are
/// disabled.
pub fn update_per_vertex_adjacent_faces<C>(mesh: &mut Mesh<C>) -> Result<()>
where
    C: MeshConfig,
    <C::Vertex as VertexConfig>::AdjacentFaces: PresentMode,
{
    require_vertex_component(mesh.vertices().is_adj_faces_enabled(), ComponentKind::AdjacentFaces)?;
    clear_per_vertex_adjacent_faces(mesh)?;

    let faces = mesh.faces().handles().collect::<Vec<_>>();
    for &f in &faces {
        for i in 0..mesh.faces().vertex_number(f) {
            if let Some(v) = mesh.faces().vertex(f, i) {
                mesh.vertices_mut().push_adj_face(v, f)?;
            }
        }
    }

    debug!("updated adjacent faces of {} vertices", mesh.vertices().num_elements());
    Ok(())
}

/// Empties the list of adjacent faces of every vertex.
pub fn clear_per_vertex_adjacent_faces<C>(mesh: &mut Mesh<C>) -> Result<()>
where
    C: MeshConfig,
    <C::Vertex as VertexConfig>::AdjacentFaces: PresentMode,
{
    require_vertex_component(mesh.vertices().is_adj_faces_enabled(), ComponentKind::AdjacentFaces)?;

    let vertices = mesh.vertices().handles().collect::<Vec<_>>();
    for v in vertices {
        mesh.vertices_mut().clear_adj_faces(v)?;
    }
    Ok(())
}

/// Recomputes the adjacent vertices of every vertex: all vertices connected
/// to it by a face edge, each listed once, in increasing handle order.
pub fn update_per_vertex_adjacent_vertices<C>(mesh: &mut Mesh<C>) -> Result<()>
where
    C: MeshConfig,
    <C::Vertex as VertexConfig>::AdjacentVertices: PresentMode,
{
    require_vertex_component(
        mesh.vertices().is_adj_vertices_enabled(),
        ComponentKind::AdjacentVertices,
    )?;

    let mut neighbors = vec![Vec::<VertexHandle>::new(); mesh.vertices().container_size()];
    for f in mesh.faces().handles() {
        let n = mesh.faces().vertex_number(f);
        for i in 0..n {
            let a = mesh.faces().vertex(f, i);
            let b = mesh.faces().vertex_mod(f, i as isize + 1);
            if let (Some(a), Some(b)) = (a, b) {
                neighbors[a.to_usize()].push(b);
                neighbors[b.to_usize()].push(a);
            }
        }
    }

    let vertices = mesh.vertices().handles().collect::<Vec<_>>();
    for v in vertices {
        let list = &mut neighbors[v.to_usize()];
        list.sort_unstable();
        list.dedup();

        mesh.vertices_mut().clear_adj_vertices(v)?;
        for &w in list.iter() {
            mesh.vertices_mut().push_adj_vertex(v, w)?;
        }
    }

    debug!("updated adjacent vertices");
    Ok(())
}

/// Sets the border flags of face edges, faces and vertices from the face
/// adjacency: an edge is on the border if it has no adjacent face, a face or
/// vertex if it touches such an edge. All previous border flags are reset.
pub fn update_border<C>(mesh: &mut Mesh<C>) -> Result<()>
where
    C: MeshConfig,
    <C::Face as FaceConfig>::AdjacentFaces: PresentMode,
{
    if !mesh.faces().is_adj_faces_enabled() {
        return Err(Error::missing(ElementKind::Face, ComponentKind::AdjacentFaces));
    }

    let vertices = mesh.vertices().handles().collect::<Vec<_>>();
    for v in vertices {
        mesh.vertices_mut().flags_mut(v).set_on_border(false);
    }

    let faces = mesh.faces().handles().collect::<Vec<FaceHandle>>();
    let mut border_edges = 0;
    for &f in &faces {
        let mut face_on_border = false;
        for i in 0..mesh.faces().vertex_number(f) {
            let on_border = mesh.faces().adj_face(f, i)?.is_none();
            mesh.faces_mut().edge_flags_mut(f, i).set_on_border(on_border);
            if on_border {
                border_edges += 1;
                face_on_border = true;
                let ends = [mesh.faces().vertex(f, i), mesh.faces().vertex_mod(f, i as isize + 1)];
                for v in ends.iter().flatten() {
                    mesh.vertices_mut().flags_mut(*v).set_on_border(true);
                }
            }
        }
        mesh.faces_mut().flags_mut(f).set_on_border(face_on_border);
    }

    debug!("updated border flags: {} border face edges", border_edges);
    Ok(())
}

fn require_vertex_component(enabled: bool, component: ComponentKind) -> Result<()> {
    if enabled {
        Ok(())
    } else {
        Err(Error::missing(ElementKind::Vertex, component))
    }
}
