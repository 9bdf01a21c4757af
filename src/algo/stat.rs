//! Global topology statistics: edge counts, holes, connected components,
//! manifoldness and per face counts.

use std::collections::BTreeSet;

use fxhash::FxHashSet;
use optional::Optioned as Opt;
use tracing::{debug, warn};

use crate::{
    comp::{ComponentKind, RefVisitor},
    error::Result,
    handle::{ElementKind, FaceHandle, Handle, VertexHandle},
    map::DenseMap,
    mesh::{
        traits::container_sizes, Container, ContainerVisitor, Element, ElementContainers,
        FaceAdjMesh, FaceMesh, MeshPos,
    },
};
use super::{face_topology::is_face_manifold_on_edge, sorted_face_edges};


// ===========================================================================
// ===== Edges
// ===========================================================================

/// Number of distinct edges of a mesh, determined from the face vertex
/// lists alone (no adjacency needed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeCounts {
    /// Number of distinct vertex pairs connected by a face edge.
    pub total: usize,

    /// Edges used by exactly one face.
    pub boundary: usize,

    /// Edges used by more than two faces.
    pub non_manifold: usize,
}

/// Counts the edges of all live faces. Two face edges are the same edge if
/// they connect the same two vertices, regardless of direction.
pub fn number_edges<M: FaceMesh>(mesh: &M) -> EdgeCounts {
    let edges = sorted_face_edges(mesh);

    let mut counts = EdgeCounts::default();
    let mut run = 1;
    for i in 0..edges.len() {
        if i + 1 == edges.len() || edges[i].0 != edges[i + 1].0 {
            counts.total += 1;
            if run == 1 {
                counts.boundary += 1;
            }
            if run > 2 {
                counts.non_manifold += 1;
            }
            run = 1;
        } else {
            run += 1;
        }
    }

    counts
}

/// Whether every edge is shared by exactly two faces. The empty mesh is
/// water tight.
pub fn is_water_tight<M: FaceMesh>(mesh: &M) -> bool {
    let counts = number_edges(mesh);
    counts.boundary == 0 && counts.non_manifold == 0
}

/// `V - E + F` of the live elements, with `E` as counted by
/// [`number_edges`].
pub fn euler_characteristic<M: FaceMesh>(mesh: &M) -> isize {
    mesh.num_vertices() as isize - number_edges(mesh).total as isize + mesh.num_faces() as isize
}


// ===========================================================================
// ===== Holes and components
// ===========================================================================

/// All border loops of the mesh. Each loop is the list of positions visited
/// when walking along the border: every position lies on a border edge, at
/// the vertex the walk arrived at.
///
/// Requires face adjacency.
pub fn border_loops<M: FaceAdjMesh>(mesh: &M) -> Result<Vec<Vec<MeshPos>>> {
    mesh.require_face_adjacency()?;

    let mut visited = FxHashSet::default();
    let mut loops = Vec::new();
    for f in mesh.face_handles() {
        for e in 0..mesh.face_vertex_number(f) {
            if visited.contains(&(f, e))
                || mesh.adj_face(f, e).is_some()
                || mesh.face_edge_vertices(f, e).is_none()
            {
                continue;
            }

            let start = MeshPos::from_edge(mesh, f, e);
            let mut pos = start;
            let mut border = Vec::new();
            loop {
                if !pos.next_edge_on_border_adjacent_to_v(mesh) {
                    warn!("border walk from {:?} got stuck at {:?}", start, pos);
                    break;
                }
                if !pos.flip_vertex(mesh) {
                    warn!("border walk from {:?} reached a null vertex at {:?}", start, pos);
                    break;
                }

                // A second visit of an edge other than the start means the
                // walk entered a loop not containing the start.
                if !visited.insert((pos.face(), pos.edge())) && pos != start {
                    break;
                }
                border.push(pos);
                if pos == start {
                    break;
                }
            }

            visited.insert((f, e));
            loops.push(border);
        }
    }

    Ok(loops)
}

/// Number of border loops. Requires face adjacency.
pub fn number_holes<M: FaceAdjMesh>(mesh: &M) -> Result<usize> {
    Ok(border_loops(mesh)?.len())
}

/// The sets of faces connected via face adjacency, in the order of their
/// smallest face handle.
pub fn connected_components<M: FaceAdjMesh>(mesh: &M) -> Result<Vec<BTreeSet<FaceHandle>>> {
    mesh.require_face_adjacency()?;

    let mut visited = vec![false; mesh.face_container_size()];
    let mut components = Vec::new();
    let mut stack = Vec::new();
    for seed in mesh.face_handles() {
        if visited[seed.to_usize()] {
            continue;
        }

        visited[seed.to_usize()] = true;
        stack.push(seed);
        let mut component = BTreeSet::new();
        while let Some(f) = stack.pop() {
            component.insert(f);
            for i in 0..mesh.face_vertex_number(f) {
                if let Some(adj) = mesh.adj_face(f, i) {
                    if !visited[adj.to_usize()] && !mesh.is_face_deleted(adj) {
                        visited[adj.to_usize()] = true;
                        stack.push(adj);
                    }
                }
            }
        }
        components.push(component);
    }

    debug!("found {} connected components", components.len());
    Ok(components)
}

pub fn number_connected_components<M: FaceAdjMesh>(mesh: &M) -> Result<usize> {
    Ok(connected_components(mesh)?.len())
}

/// Vertices at which the surface is not locally a disk (or half disk), in
/// increasing order.
///
/// A vertex is reported if it is an endpoint of a non-manifold edge or if
/// not all of its incident faces can be reached by rotating around it
/// (e.g. two cones touching at their tips).
pub fn non_manifold_vertices<M: FaceAdjMesh>(mesh: &M) -> Result<Vec<VertexHandle>> {
    mesh.require_face_adjacency()?;

    let n = mesh.vertex_container_size();
    let mut incident = vec![0usize; n];
    let mut flagged = vec![false; n];
    for f in mesh.face_handles() {
        for i in 0..mesh.face_vertex_number(f) {
            if let Some(v) = mesh.try_face_vertex(f, i) {
                incident[v.to_usize()] += 1;
            }
            if !is_face_manifold_on_edge(mesh, f, i)? {
                if let Some((a, b)) = mesh.face_edge_vertices(f, i) {
                    flagged[a.to_usize()] = true;
                    flagged[b.to_usize()] = true;
                }
            }
        }
    }

    let mut visited = vec![false; n];
    for f in mesh.face_handles() {
        let vertices = (0..mesh.face_vertex_number(f)).filter_map(|i| mesh.try_face_vertex(f, i));
        for v in vertices {
            if visited[v.to_usize()] {
                continue;
            }
            visited[v.to_usize()] = true;

            let star = MeshPos::from_vertex(mesh, f, v)
                .map(|pos| pos.number_of_adjacent_faces_to_v(mesh))
                .unwrap_or(0);
            if star != incident[v.to_usize()] {
                flagged[v.to_usize()] = true;
            }
        }
    }

    Ok(
        (0..n)
            .filter(|&i| flagged[i])
            .map(VertexHandle::from_usize)
            .collect()
    )
}

pub fn number_non_manifold_vertices<M: FaceAdjMesh>(mesh: &M) -> Result<usize> {
    Ok(non_manifold_vertices(mesh)?.len())
}


// ===========================================================================
// ===== Per face counts
// ===========================================================================

/// Sum of the vertex numbers of all live faces.
pub fn count_per_face_vertex_references<M: FaceMesh>(mesh: &M) -> usize {
    mesh.face_handles().map(|f| mesh.face_vertex_number(f)).sum()
}

/// The largest vertex number of any live face, 0 without faces.
pub fn largest_face_size<M: FaceMesh>(mesh: &M) -> usize {
    mesh.face_handles().map(|f| mesh.face_vertex_number(f)).max().unwrap_or(0)
}

/// Number of triangles a triangulation of all faces would have: `n - 2`
/// per face with `n` vertices.
pub fn count_triangulated_triangles<M: FaceMesh>(mesh: &M) -> usize {
    mesh.face_handles().map(|f| mesh.face_vertex_number(f).saturating_sub(2)).sum()
}


// ===========================================================================
// ===== Referenced vertices
// ===========================================================================

/// Marks every vertex handed to it as vertex reference.
struct MarkReferenced<'a>(&'a mut DenseMap<VertexHandle, bool>);

impl RefVisitor for MarkReferenced<'_> {
    fn visit<H: Handle>(&mut self, component: ComponentKind, refs: &[Opt<H>]) {
        if H::KIND != ElementKind::Vertex || component != ComponentKind::VertexReferences {
            return;
        }

        for r in refs {
            if let Some(slot) = r.into_option().and_then(|h| self.0.get_mut(VertexHandle::new(h.idx()))) {
                *slot = true;
            }
        }
    }
}

struct LiveElements<'a>(MarkReferenced<'a>);

impl ContainerVisitor for LiveElements<'_> {
    fn visit<E: Element>(&mut self, container: &Container<E>) {
        for (h, _) in container.iter() {
            container.visit_element_refs(h.to_usize(), &mut self.0);
        }
    }
}

/// For every vertex slot, whether a live element (face, edge or half edge)
/// refers to it. Adjacency lists do not count.
pub fn referenced_vertices<M: ElementContainers>(mesh: &M) -> DenseMap<VertexHandle, bool> {
    let len = container_sizes(mesh)[ElementKind::Vertex.index()].unwrap_or(0);
    let mut referenced = DenseMap::from_elem(false, len);
    mesh.visit_containers(&mut LiveElements(MarkReferenced(&mut referenced)));
    referenced
}

/// Number of live vertices no live element refers to.
pub fn number_unreferenced_vertices<M: FaceMesh>(mesh: &M) -> usize {
    let referenced = referenced_vertices(mesh);
    mesh.vertex_handles().filter(|&v| !referenced[v]).count()
}


#[cfg(test)]
mod tests {
    use crate::{
        mesh::{configs::{PolyMesh, TriMesh}, Mesh},
        shape,
    };
    use super::*;

    #[test]
    fn edges_of_a_fan() {
        let mut m = Mesh::<PolyMesh>::new();
        let c = m.add_vertex([0.0, 0.0, 0.0].into());
        let ring = (0..4)
            .map(|i| {
                let a = std::f64::consts::FRAC_PI_2 * i as f64;
                m.add_vertex([a.cos(), a.sin(), 0.0].into())
            })
            .collect::<Vec<_>>();
        for i in 0..4 {
            m.add_face(&[c, ring[i], ring[(i + 1) % 4]]).unwrap();
        }

        assert_eq!(number_edges(&m), EdgeCounts { total: 8, boundary: 4, non_manifold: 0 });
        assert_eq!(euler_characteristic(&m), 1);
    }

    #[test]
    fn deleted_faces_are_ignored() {
        let mut m: Mesh<TriMesh> = shape::icosahedron();
        assert!(is_water_tight(&m));

        m.delete_face(FaceHandle::new(0));
        assert_eq!(number_edges(&m), EdgeCounts { total: 30, boundary: 3, non_manifold: 0 });
        assert_eq!(count_per_face_vertex_references(&m), 57);
        assert_eq!(number_unreferenced_vertices(&m), 0);
    }

    #[test]
    fn unreferenced_after_vertex_delete() {
        let mut m = Mesh::<TriMesh>::new();
        let vs = (0..5).map(|i| m.add_vertex([i as f64, 0.0, 0.0].into())).collect::<Vec<_>>();
        m.add_face(&[vs[0], vs[1], vs[2]]).unwrap();
        m.delete_vertex(vs[4]);

        let referenced = referenced_vertices(&m);
        assert_eq!(referenced.num_elements(), 5);
        assert_eq!(referenced.get(vs[3]), Some(&false));
        // Deleted vertices are not counted.
        assert_eq!(number_unreferenced_vertices(&m), 1);
    }

    #[test]
    fn adjacency_is_required() {
        let m: Mesh<TriMesh> = shape::cube();
        assert!(border_loops(&m).is_err());
        assert!(connected_components(&m).is_err());
        assert!(non_manifold_vertices(&m).is_err());
    }
}
