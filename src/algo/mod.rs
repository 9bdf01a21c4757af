//! Algorithms operating on meshes.
//!
//! Most functions here are generic over the traits in [`crate::mesh`] and
//! thus work with all mesh types. Functions that need face adjacency check
//! at runtime whether it is available and return
//! `Error::MissingComponent` otherwise.

pub mod bounding;
pub mod check;
pub mod clean;
pub mod earcut;
pub mod face_topology;
pub mod stat;
pub mod update;


use crate::{
    comp::Normal,
    handle::{FaceHandle, VertexHandle},
    mesh::FaceMesh,
};

/// Sorted pair of vertex handles, identifying an edge regardless of its
/// orientation.
pub(crate) fn unordered(a: VertexHandle, b: VertexHandle) -> (VertexHandle, VertexHandle) {
    if a <= b { (a, b) } else { (b, a) }
}

/// All edges of all live faces: `(unordered endpoints, face, edge index)`,
/// sorted so that all occurrences of an edge are next to each other. Edges
/// with a null endpoint are skipped.
pub(crate) fn sorted_face_edges<M: FaceMesh>(
    mesh: &M,
) -> Vec<((VertexHandle, VertexHandle), FaceHandle, usize)> {
    let mut edges = Vec::new();
    for f in mesh.face_handles() {
        for i in 0..mesh.face_vertex_number(f) {
            if let Some((a, b)) = mesh.face_edge_vertices(f, i) {
                edges.push((unordered(a, b), f, i));
            }
        }
    }

    edges.sort_unstable();
    edges
}

/// The (not normalized) normal of a polygon computed with Newell's method.
/// Works for non planar and concave polygons.
pub(crate) fn newell_normal(points: &[cgmath::Point3<f64>]) -> Normal {
    let mut n = Normal::new(0.0, 0.0, 0.0);
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        n.x += (p.y - q.y) * (p.z + q.z);
        n.y += (p.z - q.z) * (p.x + q.x);
        n.z += (p.x - q.x) * (p.y + q.y);
    }
    n
}

/// The normal of face `f`, normalized. Zero for degenerate faces. Null
/// vertex references are ignored.
pub fn face_normal<M: FaceMesh>(mesh: &M, f: FaceHandle) -> Normal {
    use cgmath::InnerSpace;

    let points = (0..mesh.face_vertex_number(f))
        .filter_map(|i| mesh.try_face_vertex(f, i))
        .map(|v| *mesh.vertex_position(v))
        .collect::<Vec<_>>();
    let n = newell_normal(&points);
    if n.magnitude2() > 0.0 {
        n.normalize()
    } else {
        n
    }
}


#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use cgmath::Point3;

    use crate::handle::Handle;
    use super::*;

    #[test]
    fn newell_of_square() {
        let square = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let n = newell_normal(&square);
        assert_relative_eq!(n.x, 0.0);
        assert_relative_eq!(n.y, 0.0);
        // Twice the area, pointing up for counter clockwise order.
        assert_relative_eq!(n.z, 2.0);
    }

    #[test]
    fn unordered_pairs() {
        let (a, b) = (VertexHandle::new(3), VertexHandle::new(1));
        assert_eq!(unordered(a, b), (b, a));
        assert_eq!(unordered(b, a), (b, a));
    }
}
