//! Local topology of faces: triangulating polygons, querying and editing the
//! face adjacency around single edges.
//!
//! All functions working with adjacency require it to be enabled and up to
//! date (see [`crate::algo::update`]). They return
//! `Error::MissingComponent` if it is disabled.

use std::collections::BTreeSet;

use cgmath::{EuclideanSpace, InnerSpace, Rad};
use fxhash::FxHashSet;

use crate::{
    error::{Error, Result},
    handle::{FaceHandle, VertexHandle},
    mesh::{FaceAdjMesh, FaceAdjMeshMut, FaceMesh, Mesh, MeshConfig, MeshPos},
};
use super::{earcut::ear_cut, face_normal};


// ===========================================================================
// ===== Polygon triangulation
// ===========================================================================

/// Stores the polygon `polygon` (vertex handles in counter clockwise order)
/// as triangles, reusing `face` for the first triangle and adding new faces
/// for the remaining ones.
///
/// Edges of the resulting triangles that are not edges of the polygon are
/// marked as *faux* in the per face edge flags; all other edges get their
/// faux flag cleared.
///
/// Fails without modifying the mesh:
/// - with `Error::BadVertexIndex` if any vertex is out of range or deleted,
/// - with `Error::BadHandle` if `face` is out of range or deleted,
/// - with `Error::WrongSize` if the polygon has less than three vertices,
/// - with `Error::UnsupportedArity` if the faces of the mesh have a fixed
///   number of vertices other than three,
/// - with `Error::InvalidFace` if the polygon cannot be triangulated.
pub fn add_triangle_faces_from_polygon<C: MeshConfig>(
    mesh: &mut Mesh<C>,
    face: FaceHandle,
    polygon: &[VertexHandle],
) -> Result<()> {
    mesh.faces().require(face)?;
    let triangles = triangulate(mesh, polygon)?;
    fill_with_triangles(mesh, face, polygon, &triangles)
}

/// Like [`add_triangle_faces_from_polygon`], but the first triangle is
/// stored in a new face, too. Returns the handle of the first face; the
/// others follow with consecutive handles.
pub fn add_new_triangle_faces_from_polygon<C: MeshConfig>(
    mesh: &mut Mesh<C>,
    polygon: &[VertexHandle],
) -> Result<FaceHandle> {
    let triangles = triangulate(mesh, polygon)?;
    let face = mesh.add_empty_face();
    fill_with_triangles(mesh, face, polygon, &triangles)?;
    Ok(face)
}

fn triangulate<C: MeshConfig>(
    mesh: &Mesh<C>,
    polygon: &[VertexHandle],
) -> Result<Vec<[usize; 3]>> {
    for &v in polygon {
        mesh.vertices().require(v)?;
    }

    if let Some(arity) = <Mesh<C> as FaceMesh>::FACE_VERTEX_NUMBER {
        if arity != 3 {
            return Err(Error::UnsupportedArity { polygon: polygon.len(), arity });
        }
    }

    if polygon.len() < 3 {
        return Err(Error::WrongSize(format!(
            "a polygon needs at least 3 vertices, but {} were given",
            polygon.len(),
        )));
    }

    let positions = polygon.iter().map(|&v| *mesh.vertices().coord(v)).collect::<Vec<_>>();
    let triangles = ear_cut(&positions);
    if triangles.is_empty() {
        return Err(Error::InvalidFace(format!(
            "polygon with {} vertices could not be triangulated",
            polygon.len(),
        )));
    }

    Ok(triangles)
}

fn fill_with_triangles<C: MeshConfig>(
    mesh: &mut Mesh<C>,
    face: FaceHandle,
    polygon: &[VertexHandle],
    triangles: &[[usize; 3]],
) -> Result<()> {
    let n = polygon.len();

    // Polygon edges as unordered pairs of local indices.
    let boundary = (0..n)
        .map(|i| local_edge(i, (i + 1) % n))
        .collect::<FxHashSet<_>>();

    for (k, tri) in triangles.iter().enumerate() {
        let f = if k == 0 { face } else { mesh.add_empty_face() };
        mesh.set_face_vertices(f, &[polygon[tri[0]], polygon[tri[1]], polygon[tri[2]]])?;
        for j in 0..3 {
            let faux = !boundary.contains(&local_edge(tri[j], tri[(j + 1) % 3]));
            mesh.faces_mut().edge_flags_mut(f, j).set_faux(faux);
        }
    }

    Ok(())
}

fn local_edge(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}


// ===========================================================================
// ===== Queries
// ===========================================================================

/// Iterator over the faces around one edge, starting with the face the
/// iterator was created from. See [`edge_adjacent_faces`].
#[derive(Debug, Clone)]
pub struct EdgeAdjFaceIter<'a, M: FaceAdjMesh> {
    mesh: &'a M,
    v0: VertexHandle,
    v1: VertexHandle,
    start: FaceHandle,
    current: Option<FaceHandle>,
    steps_left: usize,
}

impl<M: FaceAdjMesh> Iterator for EdgeAdjFaceIter<'_, M> {
    type Item = FaceHandle;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.steps_left = self.steps_left.saturating_sub(1);
        self.current = self.mesh.index_of_edge(current, self.v0, self.v1)
            .and_then(|e| self.mesh.adj_face(current, e))
            .filter(|&next| next != self.start && self.steps_left > 0);

        Some(current)
    }
}

/// Iterates over the faces sharing edge `edge` of `f`, following the
/// adjacency from face to face until coming back to `f` or reaching a face
/// without neighbor on that edge.
///
/// For manifold edges this yields one or two faces; for non-manifold edges
/// all faces in the ring.
pub fn edge_adjacent_faces<M: FaceAdjMesh>(
    mesh: &M,
    f: FaceHandle,
    edge: usize,
) -> Result<EdgeAdjFaceIter<'_, M>> {
    mesh.require_face_adjacency()?;
    Ok(EdgeAdjFaceIter {
        mesh,
        v0: mesh.face_vertex(f, edge),
        v1: mesh.face_vertex_mod(f, edge as isize + 1),
        start: f,
        current: Some(f),
        steps_left: mesh.face_container_size() + 1,
    })
}

/// Returns `true` if edge `edge` of `f` is a border edge (no adjacent face)
/// or the face on the other side points back to `f`.
///
/// On non-manifold edges, the adjacent faces form a ring in which the
/// relation is not symmetric, so this returns `false` there.
pub fn is_face_manifold_on_edge<M: FaceAdjMesh>(mesh: &M, f: FaceHandle, edge: usize) -> Result<bool> {
    mesh.require_face_adjacency()?;
    Ok(match mesh.adj_face(f, edge) {
        None => true,
        Some(other) => mesh.index_of_adj_face(other, f).is_some(),
    })
}

/// Returns `true` if no face lies on the other side of edge `edge` of `f`.
pub fn is_face_edge_on_border<M: FaceAdjMesh>(mesh: &M, f: FaceHandle, edge: usize) -> Result<bool> {
    mesh.require_face_adjacency()?;
    Ok(mesh.adj_face(f, edge).is_none())
}

/// Number of faces sharing edge `edge` of `f`, including `f` itself.
pub fn edge_adjacent_faces_number<M: FaceAdjMesh>(mesh: &M, f: FaceHandle, edge: usize) -> Result<usize> {
    Ok(edge_adjacent_faces(mesh, f, edge)?.count())
}

/// Number of border edges of `f`.
pub fn face_edges_on_border_number<M: FaceAdjMesh>(mesh: &M, f: FaceHandle) -> Result<usize> {
    mesh.require_face_adjacency()?;
    Ok((0..mesh.face_vertex_number(f)).filter(|&i| mesh.adj_face(f, i).is_none()).count())
}

/// Checks whether the edge `edge` of the triangle `f` can be flipped without
/// breaking the topology.
///
/// Returns `false` if `f` or the face across the edge are not triangles, if
/// the edge is on the border or non-manifold, if the two faces are not
/// consistently oriented, or if the flipped edge already exists. This is a
/// purely topological check; the flip might still fold the surface.
pub fn check_flip_edge<M: FaceAdjMesh>(mesh: &M, f: FaceHandle, edge: usize) -> Result<bool> {
    mesh.require_face_adjacency()?;

    if mesh.face_vertex_number(f) != 3 {
        return Ok(false);
    }

    let other = match mesh.adj_face(f, edge) {
        Some(other) => other,
        None => return Ok(false),
    };
    let other_edge = match mesh.index_of_adj_face(other, f) {
        Some(e) => e,
        None => return Ok(false),
    };
    if mesh.face_vertex_number(other) != 3 {
        return Ok(false);
    }

    // The shared edge has to run in opposite directions in both faces.
    let v0 = mesh.face_vertex(f, edge);
    let v1 = mesh.face_vertex_mod(f, edge as isize + 1);
    if mesh.face_vertex(other, other_edge) != v1
        || mesh.face_vertex_mod(other, other_edge as isize + 1) != v0
    {
        return Ok(false);
    }

    // The endpoints of the flipped edge must not be connected already.
    let f_v2 = mesh.face_vertex_mod(f, edge as isize + 2);
    let other_v2 = mesh.face_vertex_mod(other, other_edge as isize + 2);

    let start = match MeshPos::from_vertex(mesh, f, f_v2) {
        Some(pos) => pos,
        None => return Ok(false),
    };
    let mut pos = start;
    let mut seen = FxHashSet::default();
    loop {
        pos.next_edge_adjacent_to_v(mesh);
        if pos.adj_vertex(mesh) == Some(other_v2) {
            return Ok(false);
        }
        if pos == start || !seen.insert(pos) {
            return Ok(true);
        }
    }
}

/// The signed angle between the normals of `f` and the face across edge
/// `edge`. Positive if the surface is convex at that edge, negative if it is
/// concave. `None` if the edge is on the border.
pub fn face_dihedral_angle_on_edge<M: FaceAdjMesh>(
    mesh: &M,
    f: FaceHandle,
    edge: usize,
) -> Result<Option<Rad<f64>>> {
    mesh.require_face_adjacency()?;

    let other = match mesh.adj_face(f, edge) {
        Some(other) => other,
        None => return Ok(None),
    };
    let other_edge = mesh.index_of_adj_face(other, f)
        .or_else(|| {
            let v0 = mesh.face_vertex(f, edge);
            let v1 = mesh.face_vertex_mod(f, edge as isize + 1);
            mesh.index_of_edge(other, v0, v1)
        })
        .ok_or_else(|| Error::InconsistentMesh(format!(
            "{:?} is adjacent to {:?}, but does not share edge {} with it",
            other,
            f,
            edge,
        )))?;

    // The vertices not on the shared edge (for triangles).
    let p0 = mesh.vertex_position(mesh.face_vertex_mod(f, edge as isize - 1)).to_vec();
    let p1 = mesh.vertex_position(mesh.face_vertex_mod(other, other_edge as isize - 1)).to_vec();

    let n0 = face_normal(mesh, f);
    let n1 = face_normal(mesh, other);

    let dist01 = n0.dot(p0) - n0.dot(p1);
    let dist10 = n1.dot(p1) - n1.dot(p0);
    let sign = if dist01.abs() > dist10.abs() { dist01 } else { dist10 };

    let angle = n0.angle(n1);
    Ok(Some(if sign > 0.0 { angle } else { -angle }))
}

/// Collects the connected patch of faces around `seed` for which `selector`
/// returns `true`. Faces are connected if they share an edge. If `selector`
/// rejects `seed`, the patch is empty.
///
/// `selector` is called at most once per face.
pub fn flood_face_patch<M, F>(mesh: &M, seed: FaceHandle, mut selector: F) -> Result<BTreeSet<FaceHandle>>
where
    M: FaceAdjMesh,
    F: FnMut(FaceHandle) -> bool,
{
    mesh.require_face_adjacency()?;

    let mut patch = BTreeSet::new();
    if !selector(seed) {
        return Ok(patch);
    }

    let mut rejected = FxHashSet::default();
    let mut stack = vec![seed];
    patch.insert(seed);
    while let Some(f) = stack.pop() {
        for i in 0..mesh.face_vertex_number(f) {
            let adj = match mesh.adj_face(f, i) {
                Some(adj) if !mesh.is_face_deleted(adj) => adj,
                _ => continue,
            };
            if patch.contains(&adj) || rejected.contains(&adj) {
                continue;
            }

            if selector(adj) {
                patch.insert(adj);
                stack.push(adj);
            } else {
                rejected.insert(adj);
            }
        }
    }

    Ok(patch)
}


// ===========================================================================
// ===== Editing the adjacency
// ===========================================================================

/// Removes `f` from the faces adjacent on edge `edge`.
///
/// If the edge is manifold, both faces get a border there. If more faces
/// share the edge, `f` is taken out of their ring and the remaining faces
/// stay connected. Does nothing if the edge already is a border.
pub fn detach_adjacent_faces_on_edge<M: FaceAdjMeshMut>(
    mesh: &mut M,
    f: FaceHandle,
    edge: usize,
) -> Result<()> {
    mesh.require_face_adjacency()?;

    let next = match mesh.adj_face(f, edge) {
        Some(next) => next,
        None => return Ok(()),
    };
    let prev = edge_adjacent_faces(&*mesh, f, edge)?.last().unwrap_or(next);

    if prev == next {
        if let Some(i) = mesh.index_of_adj_face(next, f) {
            mesh.set_adj_face(next, i, None);
        }
    } else if let Some(i) = mesh.index_of_adj_face(prev, f) {
        mesh.set_adj_face(prev, i, Some(next));
    }
    mesh.set_adj_face(f, edge, None);

    Ok(())
}

/// Detaches `f` on all of its edges and removes it from the adjacent faces
/// of its vertices (if vertices track them).
///
/// Vertices that do not list `f` are skipped: the vertex adjacency might
/// simply not have been computed.
pub fn detach_face<M: FaceAdjMeshMut>(mesh: &mut M, f: FaceHandle) -> Result<()> {
    mesh.require_face_adjacency()?;

    for e in 0..mesh.face_vertex_number(f) {
        detach_adjacent_faces_on_edge(mesh, f, e)?;
        if mesh.is_vertex_face_adjacency_enabled() {
            if let Some(v) = mesh.try_face_vertex(f, e) {
                mesh.remove_vertex_adj_face(v, f);
            }
        }
    }

    Ok(())
}
