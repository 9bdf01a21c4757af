//! Property based tests of the triangulation, the grid topology and the
//! matrix import.

use proptest::prelude::*;
use tessel::{
    algo::{face_topology, stat, update},
    import::{import_mesh_from_matrices, MatrixView},
    mesh::configs::{PolyMesh, TriMesh},
    prelude::*,
    shape,
};


/// A convex polygon with `n` corners on a circle, with random angular gaps.
fn arb_convex_polygon() -> impl Strategy<Value = Vec<[f64; 3]>> {
    prop::collection::vec(0.2..1.0f64, 3..24).prop_map(|gaps| {
        let total = gaps.iter().sum::<f64>();
        let mut angle = 0.0f64;
        gaps.iter()
            .map(|gap| {
                let p = [angle.cos(), angle.sin(), 0.0];
                angle += std::f64::consts::TAU * gap / total;
                p
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn convex_polygons_triangulate_with_faux_diagonals(polygon in arb_convex_polygon()) {
        let n = polygon.len();
        let mut m = Mesh::<TriMesh>::new();
        let vs = polygon.iter().map(|&p| m.add_vertex(p.into())).collect::<Vec<_>>();
        face_topology::add_new_triangle_faces_from_polygon(&mut m, &vs).unwrap();

        prop_assert_eq!(m.num_faces(), n - 2);

        // Every diagonal is seen from both of its triangles.
        let faux = m.face_handles()
            .map(|f| (0..3).filter(|&i| m.faces().edge_flags(f, i).is_faux()).count())
            .sum::<usize>();
        prop_assert_eq!(faux, 2 * (n - 3));

        let edges = stat::number_edges(&m);
        prop_assert_eq!(edges.boundary, n);
        prop_assert_eq!(edges.total, 2 * n - 3);
        prop_assert_eq!(stat::euler_characteristic(&m), 1);
    }

    #[test]
    fn grids_are_disks(nx in 1usize..8, ny in 1usize..8) {
        let mut m: Mesh<PolyMesh> = shape::grid(nx, ny);
        m.faces_mut().enable_adj_faces();
        update::update_per_face_adjacent_faces(&mut m).unwrap();

        prop_assert_eq!(stat::euler_characteristic(&m), 1);
        prop_assert_eq!(stat::number_holes(&m).unwrap(), 1);
        prop_assert_eq!(stat::number_edges(&m).boundary, 2 * (nx + ny));
        prop_assert!(stat::non_manifold_vertices(&m).unwrap().is_empty());
    }

    #[test]
    fn removed_faces_split_components(nx in 2usize..8, column in 0usize..8) {
        // Deleting a full column of cells splits the strip unless the column
        // is at one end.
        let column = column % nx;
        let mut m: Mesh<PolyMesh> = shape::grid(nx, 1);
        m.delete_face(FaceHandle::from_usize(column));
        m.compact();
        m.faces_mut().enable_adj_faces();
        update::update_per_face_adjacent_faces(&mut m).unwrap();

        let expected = if column == 0 || column == nx - 1 { 1 } else { 2 };
        prop_assert_eq!(stat::number_connected_components(&m).unwrap(), expected);
    }

    #[test]
    fn layouts_describe_the_same_matrix(
        rows in 0usize..6,
        cols in 1usize..6,
        seed in any::<u32>(),
    ) {
        let row_major = (0..rows * cols).map(|i| (i as u32).wrapping_mul(seed)).collect::<Vec<_>>();
        let column_major = (0..cols)
            .flat_map(|c| (0..rows).map(move |r| r * cols + c))
            .map(|i| row_major[i])
            .collect::<Vec<_>>();

        let a = MatrixView::row_major(&row_major, rows, cols).unwrap();
        let b = MatrixView::column_major(&column_major, rows, cols).unwrap();
        for r in 0..rows {
            prop_assert_eq!(a.row(r).collect::<Vec<_>>(), b.row(r).collect::<Vec<_>>());
        }
    }

    #[test]
    fn import_rejects_bad_indices_without_changes(bad in 4i64..100) {
        let mut m: Mesh<TriMesh> = shape::triangle_strip(2);
        let vertices = [[0.0; 3]; 4];
        let faces = [[0, 1, 2], [1, 2, bad]];
        let res = import_mesh_from_matrices(
            &mut m,
            MatrixView::from_rows(&vertices),
            MatrixView::from_rows(&faces),
            MatrixView::empty(),
        );

        prop_assert!(res.is_err());
        prop_assert_eq!(m.num_vertices(), 4);
        prop_assert_eq!(m.num_faces(), 2);
        prop_assert_eq!(m.vertex_position(VertexHandle::new(3)).y, 1.0);
    }
}
