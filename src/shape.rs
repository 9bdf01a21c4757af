//! Simple meshes for tests, benchmarks and examples.
//!
//! All builders are generic over the mesh type. Faces are counter clockwise
//! when looking at them from outside. Shapes made of quads are built from
//! quads if the mesh can hold them and from two triangles per quad if it only
//! stores triangles.
//!
//! # Panics
//!
//! Builders that need triangles (everything but [`cube`] and [`grid`])
//! panic for meshes that only store quads.

use cgmath::{Point3, Rad, Vector3, prelude::*};

use crate::{
    comp::Coordinate,
    handle::VertexHandle,
    mesh::FaceMeshMut,
};


/// Adds a face, splitting quads into two triangles for triangle meshes.
fn add_polygon<M: FaceMeshMut>(mesh: &mut M, vertices: &[VertexHandle]) {
    let res = match (M::FACE_VERTEX_NUMBER, vertices) {
        (Some(3), &[a, b, c, d]) => {
            mesh.add_face(&[a, b, c]).and_then(|_| mesh.add_face(&[a, c, d]))
        }
        _ => mesh.add_face(vertices),
    };

    if let Err(e) = res {
        panic!("cannot build shape with this mesh type: {}", e);
    }
}

fn add_vertices<M: FaceMeshMut>(mesh: &mut M, coords: &[[f64; 3]]) -> Vec<VertexHandle> {
    coords.iter().map(|&c| mesh.add_vertex(c.into())).collect()
}

/// The cube `[-1, 1]³` with 8 vertices and 6 quads (or 12 triangles).
pub fn cube<M: FaceMeshMut>() -> M {
    let mut mesh = M::default();

    // Vertex `i` has the coordinates `(i & 1, i >> 1 & 1, i >> 2 & 1)`,
    // mapped to `-1` and `1`.
    let coords = (0..8)
        .map(|i| {
            let c = |bit: u32| if i >> bit & 1 == 1 { 1.0 } else { -1.0 };
            [c(0), c(1), c(2)]
        })
        .collect::<Vec<_>>();
    let v = add_vertices(&mut mesh, &coords);

    let sides = [
        [0, 2, 3, 1], // -z
        [4, 5, 7, 6], // +z
        [0, 1, 5, 4], // -y
        [2, 6, 7, 3], // +y
        [0, 4, 6, 2], // -x
        [1, 3, 7, 5], // +x
    ];
    for [a, b, c, d] in sides {
        add_polygon(&mut mesh, &[v[a], v[b], v[c], v[d]]);
    }

    mesh
}

/// The regular icosahedron with 12 vertices and 20 triangles. All vertices
/// lie on a sphere of radius `sqrt(1 + φ²)` around the origin.
pub fn icosahedron<M: FaceMeshMut>() -> M {
    let mut mesh = M::default();

    let t = (1.0 + 5f64.sqrt()) / 2.0;
    let v = add_vertices(&mut mesh, &[
        [-1.0, t, 0.0], [1.0, t, 0.0], [-1.0, -t, 0.0], [1.0, -t, 0.0],
        [0.0, -1.0, t], [0.0, 1.0, t], [0.0, -1.0, -t], [0.0, 1.0, -t],
        [t, 0.0, -1.0], [t, 0.0, 1.0], [-t, 0.0, -1.0], [-t, 0.0, 1.0],
    ]);

    let faces = [
        // Around vertex 0
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],

        // The band next to it
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],

        // Around vertex 3
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],

        // The band next to that
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];
    for [a, b, c] in faces {
        add_polygon(&mut mesh, &[v[a], v[b], v[c]]);
    }

    mesh
}

/// A strip of `n` triangles in the XY-plane, facing +z.
///
/// ```text
///     1 --- 3 --- 5
///     | \   | \   | \
///     |   \ |   \ |   ...
///     0 --- 2 --- 4 ---
/// ```
///
/// Vertex `2k` is at `(k, 0, 0)`, vertex `2k + 1` at `(k, 1, 0)`. The strip
/// has `n + 2` vertices (none for `n = 0`).
pub fn triangle_strip<M: FaceMeshMut>(n: usize) -> M {
    let mut mesh = M::default();
    if n == 0 {
        return mesh;
    }

    let coords = (0..n + 2)
        .map(|i| [(i / 2) as f64, (i % 2) as f64, 0.0])
        .collect::<Vec<_>>();
    let v = add_vertices(&mut mesh, &coords);

    for i in 0..n {
        if i % 2 == 0 {
            add_polygon(&mut mesh, &[v[i], v[i + 2], v[i + 1]]);
        } else {
            add_polygon(&mut mesh, &[v[i], v[i + 1], v[i + 2]]);
        }
    }

    mesh
}

/// A regular grid of `nx * ny` unit cells in the XY-plane, facing +z.
///
/// Vertex `(i, j)` is at `(i, j, 0)` and has the index `j * (nx + 1) + i`.
/// Each cell is a quad (or two triangles) with the vertices `(i, j)`,
/// `(i + 1, j)`, `(i + 1, j + 1)` and `(i, j + 1)`.
pub fn grid<M: FaceMeshMut>(nx: usize, ny: usize) -> M {
    let mut mesh = M::default();
    if nx == 0 || ny == 0 {
        return mesh;
    }

    let coords = (0..=ny)
        .flat_map(|j| (0..=nx).map(move |i| [i as f64, j as f64, 0.0]))
        .collect::<Vec<_>>();
    let v = add_vertices(&mut mesh, &coords);

    let idx = |i: usize, j: usize| j * (nx + 1) + i;
    for j in 0..ny {
        for i in 0..nx {
            add_polygon(&mut mesh, &[
                v[idx(i, j)],
                v[idx(i + 1, j)],
                v[idx(i + 1, j + 1)],
                v[idx(i, j + 1)],
            ]);
        }
    }

    mesh
}

/// A flat round disc that lies in the XY-plane and which normals point upwards
/// (+z). It is made of triangles sharing the center vertex.
#[derive(Debug, Clone, Copy)]
pub struct Disc {
    /// The number of faces generated for the disc. Has to be at least 3 or
    /// else building the mesh will panic. *Default*: 16.
    pub faces: u32,

    /// The center point of the disc. *Default*: `[0, 0, 0]`.
    pub center: Coordinate,

    /// The outer radius (with ∞ faces, this would be the real radius).
    /// *Default*: 1.0.
    pub radius: f64,
}

impl Default for Disc {
    fn default() -> Self {
        Self {
            faces: 16,
            center: Point3::origin(),
            radius: 1.0,
        }
    }
}

impl Disc {
    /// Builds the disc. The center vertex comes first, followed by the outer
    /// vertices in counter clockwise order, starting at `center + [r, 0, 0]`.
    ///
    /// ```text
    ///      3 _
    ///      |   ‾ – _
    ///      |         2
    ///      |  B    ⋰  \
    ///      |     ⋰     \
    ///      |   ⋰   A    \
    ///      | ⋰           \
    ///      0 ------------ 1
    /// ```
    pub fn build<M: FaceMeshMut>(self) -> M {
        assert!(
            self.faces >= 3,
            "trying to build a disc with {} faces (minimum is 3)",
            self.faces,
        );

        let mut mesh = M::default();
        let center = mesh.add_vertex(self.center);
        let outer = (0..self.faces)
            .map(|i| {
                let angle = Rad::full_turn() * i as f64 / self.faces as f64;
                let offset = Vector3::new(angle.cos(), angle.sin(), 0.0) * self.radius;
                mesh.add_vertex(self.center + offset)
            })
            .collect::<Vec<_>>();

        for i in 0..outer.len() {
            let next = outer[(i + 1) % outer.len()];
            add_polygon(&mut mesh, &[center, outer[i], next]);
        }

        mesh
    }
}


#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use cgmath::InnerSpace;

    use crate::{
        handle::{FaceHandle, Handle},
        mesh::{configs::{PolyMesh, QuadMesh, TriMesh}, FaceMesh, Mesh},
    };
    use super::*;

    /// Sum of the cross products of all face corners; points along the
    /// outward normal for each planar face oriented counter clockwise.
    fn face_normal<M: FaceMesh>(m: &M, f: FaceHandle) -> Vector3<f64> {
        let ps = m.face_vertices(f).map(|v| *m.vertex_position(v)).collect::<Vec<_>>();
        let mut n = Vector3::zero();
        for i in 0..ps.len() {
            let a = ps[i] - ps[0];
            let b = ps[(i + 1) % ps.len()] - ps[0];
            n += a.cross(b);
        }
        n
    }

    fn centroid<M: FaceMesh>(m: &M, f: FaceHandle) -> Vector3<f64> {
        let n = m.face_vertex_number(f) as f64;
        m.face_vertices(f).fold(Vector3::zero(), |acc, v| acc + m.vertex_position(v).to_vec()) / n
    }

    fn assert_outward<M: FaceMesh>(m: &M) {
        for f in m.face_handles() {
            assert!(face_normal(m, f).dot(centroid(m, f)) > 0.0, "{:?} points inwards", f);
        }
    }

    #[test]
    fn cube_orientation() {
        let quads: Mesh<QuadMesh> = cube();
        assert_eq!(quads.num_faces(), 6);
        assert_outward(&quads);

        let tris: Mesh<TriMesh> = cube();
        assert_eq!(tris.num_vertices(), 8);
        assert_eq!(tris.num_faces(), 12);
        assert_outward(&tris);
    }

    #[test]
    fn icosahedron_is_regular() {
        let m: Mesh<PolyMesh> = icosahedron();
        assert_outward(&m);

        let r = m.vertex_position(m.vertex_handles().next().unwrap()).to_vec().magnitude();
        for v in m.vertex_handles() {
            assert_relative_eq!(m.vertex_position(v).to_vec().magnitude(), r, epsilon = 1e-12);
        }
    }

    #[test]
    fn flat_shapes_face_up() {
        let strip: Mesh<TriMesh> = triangle_strip(5);
        assert_eq!(strip.num_vertices(), 7);
        let grid: Mesh<TriMesh> = grid(3, 2);
        assert_eq!((grid.num_vertices(), grid.num_faces()), (12, 12));
        let disc: Mesh<PolyMesh> = Disc { faces: 5, ..Disc::default() }.build();
        assert_eq!(disc.num_faces(), 5);

        for f in strip.face_handles() {
            assert!(face_normal(&strip, f).z > 0.0);
        }
        for f in grid.face_handles() {
            assert!(face_normal(&grid, f).z > 0.0);
        }
        for f in disc.face_handles() {
            assert!(face_normal(&disc, f).z > 0.0);
        }
        assert_eq!(triangle_strip::<Mesh<TriMesh>>(0).num_vertices(), 0);
    }

    #[test]
    #[should_panic]
    fn triangles_need_triangle_faces() {
        let _: Mesh<QuadMesh> = icosahedron();
    }

    #[test]
    fn disc_vertices_on_circle() {
        let disc: Mesh<TriMesh> = Disc { faces: 8, radius: 2.0, ..Disc::default() }.build();
        let center = *disc.vertex_position(Handle::new(0));
        for v in disc.vertex_handles().skip(1) {
            assert_relative_eq!((*disc.vertex_position(v) - center).magnitude(), 2.0, epsilon = 1e-12);
        }
    }
}
