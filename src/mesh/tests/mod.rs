#[macro_use]
pub(crate) mod util;


// ===============================================================================================
// ===== The main macro containing the test suite
// ===============================================================================================

/// Generates unit tests for the mesh data structure `$name`.
///
/// In the brackets, you can specify additional capabilities of the mesh
/// type. These will generate additional unit tests and change how meshes
/// are prepared. The following are assumed for every mesh type this macro is
/// invoked with:
/// - `FaceMeshMut`
/// - `FaceAdjMesh`
/// - faces can be triangles
///
/// For a list of extras you can specify here, check the `test_helper` macro
/// definition.
macro_rules! gen_mesh_tests {
    // Entry point: here we just do some sanity checks on the specified
    // extras.
    ($name:ty : [$($extra:ident),*]) => {
        $(
            test_helper!(@is_valid_extra_trait $extra);
        )*

        gen_mesh_tests!(@inner $name, [ $($extra),* ]);
    };

    // The main part. It's an extra macro arm in order to treat `$extras` as
    // single tt which is a bit more convenient.
    (@inner $name:ty, $extras:tt) => {
        #[allow(unused_imports)]
        use crate::{
            algo::{check::check_mesh_pointers, face_topology::*, stat::*, update::*},
            handle::{FaceHandle, Handle, VertexHandle},
            mesh::{FaceAdjMesh, FaceAdjMeshMut, FaceMesh, FaceMeshMut, MeshPos},
            mesh::tests::util::build_mesh,
            shape,
        };

        /// Builds a mesh and computes the face adjacency if it is stored.
        #[allow(dead_code)]
        fn build(coords: &[[f64; 3]], faces: &[&[usize]]) -> $name {
            let mut m: $name = build_mesh(coords, faces);
            refresh(&mut m);
            m
        }

        /// Brings the stored adjacency up to date after faces changed.
        #[allow(unused_variables)]
        fn refresh(m: &mut $name) {
            test_helper!(@if FaceAdjMeshMut in $extras => {
                m.faces_mut().enable_adj_faces();
                update_per_face_adjacent_faces(m).unwrap();
            });
        }

        fn f(i: usize) -> FaceHandle {
            FaceHandle::from_usize(i)
        }

        fn v(i: usize) -> VertexHandle {
            VertexHandle::from_usize(i)
        }

        fn adj_of(m: &$name, face: FaceHandle) -> Vec<Option<FaceHandle>> {
            (0..m.face_vertex_number(face)).map(|i| m.adj_face(face, i)).collect()
        }

        #[test]
        fn empty() {
            let m = build(&[], &[]);

            assert_eq!(m.num_vertices(), 0);
            assert_eq!(m.num_faces(), 0);
            assert_eq!(number_edges(&m), EdgeCounts::default());
            assert!(connected_components(&m).unwrap().is_empty());
            assert_eq!(number_holes(&m).unwrap(), 0);
            check_mesh_pointers(&m).unwrap();
        }

        #[test]
        fn single_vertex() {
            let m = build(&[[0.0, 0.0, 0.0]], &[]);

            assert_eq!(m.num_vertices(), 1);
            assert_eq!(m.vertex_handles().collect::<Vec<_>>(), [v(0)]);
            assert_eq!(euler_characteristic(&m), 1);
            check_mesh_pointers(&m).unwrap();
        }

        #[test]
        fn single_triangle() {
            //
            //         (C)
            //        /   \
            //       /     \
            //      /       \
            //    (A) ----- (B)
            //
            let m = build(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], &[&[0, 1, 2]]);

            assert_eq!(m.face_vertices(f(0)).collect::<Vec<_>>(), [v(0), v(1), v(2)]);
            assert_eq!(adj_of(&m, f(0)), [None, None, None]);
            for e in 0..3 {
                assert!(is_face_manifold_on_edge(&m, f(0), e).unwrap());
                assert!(is_face_edge_on_border(&m, f(0), e).unwrap());
                assert_eq!(edge_adjacent_faces_number(&m, f(0), e).unwrap(), 1);
                assert!(!check_flip_edge(&m, f(0), e).unwrap());
            }
            assert_eq!(face_edges_on_border_number(&m, f(0)).unwrap(), 3);

            assert_eq!(number_edges(&m), EdgeCounts { total: 3, boundary: 3, non_manifold: 0 });
            assert!(!is_water_tight(&m));
            let loops = border_loops(&m).unwrap();
            assert_eq!(loops.len(), 1);
            assert_eq!(loops[0].len(), 3);
            assert_eq!(euler_characteristic(&m), 1);
            check_mesh_pointers(&m).unwrap();
        }

        #[test]
        fn two_triangles() {
            //
            //         (C) ----- (D)
            //        /   \  Y  /
            //       /  X  \   /
            //      /       \ /
            //    (A) ----- (B)
            //
            let m = build(
                &[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 1.0, 0.0], [3.0, 1.0, 0.0]],
                &[&[0, 1, 2], &[1, 3, 2]],
            );
            let (fx, fy) = (f(0), f(1));

            assert_eq!(adj_of(&m, fx), [None, Some(fy), None]);
            assert_eq!(adj_of(&m, fy), [None, None, Some(fx)]);
            assert_eq!(m.index_of_adj_face(fy, fx), Some(2));
            assert_eq!(edge_adjacent_faces_number(&m, fx, 1).unwrap(), 2);
            assert_eq!(edge_adjacent_faces_number(&m, fx, 0).unwrap(), 1);
            for e in 0..3 {
                assert!(is_face_manifold_on_edge(&m, fx, e).unwrap());
                assert!(is_face_manifold_on_edge(&m, fy, e).unwrap());
            }

            // Flipping B-C creates A-D, which does not exist yet.
            assert!(check_flip_edge(&m, fx, 1).unwrap());
            assert!(check_flip_edge(&m, fy, 2).unwrap());
            assert!(!check_flip_edge(&m, fx, 0).unwrap());

            let all = flood_face_patch(&m, fx, |_| true).unwrap();
            assert_eq!(all.into_iter().collect::<Vec<_>>(), [fx, fy]);
            let only_x = flood_face_patch(&m, fx, |face| face != fy).unwrap();
            assert_eq!(only_x.into_iter().collect::<Vec<_>>(), [fx]);
            assert!(flood_face_patch(&m, fx, |face| face == fy).unwrap().is_empty());

            assert_eq!(number_edges(&m), EdgeCounts { total: 5, boundary: 4, non_manifold: 0 });
            let loops = border_loops(&m).unwrap();
            assert_eq!(loops.len(), 1);
            assert_eq!(loops[0].len(), 4);
            assert!(non_manifold_vertices(&m).unwrap().is_empty());
            check_mesh_pointers(&m).unwrap();
        }

        #[test]
        fn tetrahedron() {
            //
            //             (T)
            //            / | \
            //           /  |  \
            //          /   |   \
            //         /   (C)   \
            //        / ⋰     ⋱  \
            //       (A) ------- (B)
            //
            let mut m = build(
                &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0], [0.5, 0.5, 1.0]],
                &[&[0, 2, 1], &[0, 1, 3], &[1, 2, 3], &[2, 0, 3]],
            );
            let (f_bottom, f_ab, f_bc, f_ca) = (f(0), f(1), f(2), f(3));

            assert_eq!(adj_of(&m, f_bottom), [Some(f_ca), Some(f_bc), Some(f_ab)]);
            assert_eq!(adj_of(&m, f_ab), [Some(f_bottom), Some(f_bc), Some(f_ca)]);
            for face in m.face_handles().collect::<Vec<_>>() {
                for e in 0..3 {
                    assert_eq!(edge_adjacent_faces_number(&m, face, e).unwrap(), 2);
                    assert!(is_face_manifold_on_edge(&m, face, e).unwrap());
                    // All vertex pairs are already connected.
                    assert!(!check_flip_edge(&m, face, e).unwrap());
                }
            }

            assert!(is_water_tight(&m));
            assert_eq!(number_holes(&m).unwrap(), 0);
            assert_eq!(number_edges(&m).total, 6);
            assert_eq!(euler_characteristic(&m), 2);
            assert_eq!(number_connected_components(&m).unwrap(), 1);
            assert!(non_manifold_vertices(&m).unwrap().is_empty());

            // Removing one face opens a hole bounded by three edges.
            m.delete_face(f_ab);
            refresh(&mut m);
            assert!(!is_water_tight(&m));
            let loops = border_loops(&m).unwrap();
            assert_eq!(loops.len(), 1);
            assert_eq!(loops[0].len(), 3);
            assert_eq!(number_edges(&m), EdgeCounts { total: 6, boundary: 3, non_manifold: 0 });
        }

        #[test]
        fn triangle_strip_and_one_ring() {
            //
            //    (A)---(D)
            //     | \ Y | \
            //     |  \  |  \
            //     | X \ | Z \
            //     |    \|    \
            //    (B)---(C)---(E)
            //
            let m = build(
                &[[0.0, 1.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [2.0, 0.0, 0.0]],
                &[&[0, 1, 2], &[0, 2, 3], &[3, 2, 4]],
            );

            // C is part of all three faces.
            let pos = MeshPos::from_vertex(&m, f(1), v(2)).unwrap();
            assert_eq!(pos.number_of_adjacent_faces_to_v(&m), 3);
            let pos = MeshPos::from_vertex(&m, f(0), v(1)).unwrap();
            assert_eq!(pos.number_of_adjacent_faces_to_v(&m), 1);

            let patch = flood_face_patch(&m, f(2), |_| true).unwrap();
            assert_eq!(patch.len(), 3);
            assert_eq!(border_loops(&m).unwrap()[0].len(), 5);
        }

        #[test]
        fn connected_components_partition() {
            // Two strips of two triangles each plus a lonely triangle.
            let mut coords = Vec::new();
            for offset in &[0.0, 10.0] {
                coords.push([*offset, 0.0, 0.0]);
                coords.push([offset + 1.0, 0.0, 0.0]);
                coords.push([*offset, 1.0, 0.0]);
                coords.push([offset + 1.0, 1.0, 0.0]);
            }
            coords.extend_from_slice(&[[20.0, 0.0, 0.0], [21.0, 0.0, 0.0], [20.0, 1.0, 0.0]]);
            let m = build(&coords, &[
                &[0, 1, 2], &[1, 3, 2],
                &[4, 5, 6], &[5, 7, 6],
                &[8, 9, 10],
            ]);

            let components = connected_components(&m).unwrap();
            assert_eq!(components.len(), 3);

            let mut seen = std::collections::BTreeSet::new();
            for c in &components {
                for &face in c {
                    assert!(seen.insert(face), "{:?} is in two components", face);
                }
            }
            assert_eq!(seen.into_iter().collect::<Vec<_>>(), m.face_handles().collect::<Vec<_>>());

            let sizes = components.iter().map(|c| c.len()).collect::<Vec<_>>();
            assert_eq!(sizes, [2, 2, 1]);
            assert_eq!(number_holes(&m).unwrap(), 3);
        }

        #[test]
        fn closed_shapes() {
            let m: $name = shape::icosahedron();
            let mut m = m;
            refresh(&mut m);

            assert_eq!(m.num_vertices(), 12);
            assert_eq!(m.num_faces(), 20);
            assert!(is_water_tight(&m));
            assert_eq!(number_edges(&m).total, 30);
            assert_eq!(number_holes(&m).unwrap(), 0);
            assert_eq!(euler_characteristic(&m), 2);
            for face in m.face_handles().collect::<Vec<_>>() {
                for vertex in m.face_vertices(face).collect::<Vec<_>>() {
                    let pos = MeshPos::from_vertex(&m, face, vertex).unwrap();
                    assert_eq!(pos.number_of_adjacent_faces_to_v(&m), 5);
                }
            }

            m.delete_face(f(7));
            refresh(&mut m);
            assert!(!is_water_tight(&m));
            let loops = border_loops(&m).unwrap();
            assert_eq!(loops.len(), 1);
            assert_eq!(loops[0].len(), 3);

            let mut cube: $name = shape::cube();
            refresh(&mut cube);
            // Quads where the faces can hold them, two triangles per side otherwise.
            let total = if largest_face_size(&cube) == 4 { 12 } else { 18 };
            assert_eq!(number_edges(&cube), EdgeCounts { total, boundary: 0, non_manifold: 0 });
            assert_eq!(euler_characteristic(&cube), 2);
            check_mesh_pointers(&cube).unwrap();
        }

        #[test]
        fn statistics() {
            let m = build(
                &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [5.0, 5.0, 5.0]],
                &[&[0, 1, 2]],
            );

            assert_eq!(count_per_face_vertex_references(&m), 3);
            assert_eq!(largest_face_size(&m), 3);
            assert_eq!(count_triangulated_triangles(&m), 1);
            assert_eq!(number_unreferenced_vertices(&m), 1);
            let referenced = referenced_vertices(&m);
            assert_eq!(referenced.get(v(3)), Some(&false));
            assert_eq!(referenced.get(v(0)), Some(&true));
        }

        test_helper!(@if_item [FaceAdjMeshMut] in $extras => {
            #[test]
            fn detach_manifold_edge() {
                let mut m = build(
                    &[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 1.0, 0.0], [3.0, 1.0, 0.0]],
                    &[&[0, 1, 2], &[1, 3, 2]],
                );
                let (fx, fy) = (f(0), f(1));

                detach_adjacent_faces_on_edge(&mut m, fx, 1).unwrap();
                assert!(is_face_edge_on_border(&m, fx, 1).unwrap());
                assert!(is_face_edge_on_border(&m, fy, 2).unwrap());
                assert!(is_face_manifold_on_edge(&m, fx, 1).unwrap());
                assert!(is_face_manifold_on_edge(&m, fy, 2).unwrap());
                assert_eq!(number_connected_components(&m).unwrap(), 2);
                check_mesh_pointers(&m).unwrap();
            }

            #[test]
            fn detach_face_from_vertices() {
                let mut m = build(
                    &[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 1.0, 0.0], [3.0, 1.0, 0.0]],
                    &[&[0, 1, 2], &[1, 3, 2]],
                );
                m.vertices_mut().enable_adj_faces();
                update_per_vertex_adjacent_faces(&mut m).unwrap();
                assert_eq!(m.vertices().adj_faces(v(1)).unwrap().len(), 2);

                detach_face(&mut m, f(0)).unwrap();
                assert_eq!(adj_of(&m, f(1)), [None, None, None]);
                let adj = m.vertices().adj_faces(v(1)).unwrap()
                    .iter()
                    .filter_map(|h| h.into_option())
                    .collect::<Vec<_>>();
                assert_eq!(adj, [f(1)]);

                // A second detach finds nothing to remove and is fine with it.
                detach_face(&mut m, f(0)).unwrap();
            }

            #[test]
            fn non_manifold_edge() {
                //
                //        (C)   (E)
                //         | \ / |
                //         |  X  |      Three faces share A-B. E lies
                //         | / \ |      above the plane, D below.
                //        (A)---(B)
                //           \ /
                //           (D)
                //
                let mut m = build(
                    &[
                        [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0],
                        [0.5, -1.0, 0.0], [0.5, 0.0, 1.0],
                    ],
                    &[&[0, 1, 2], &[1, 0, 3], &[0, 1, 4]],
                );

                assert_eq!(number_edges(&m).non_manifold, 1);
                assert!(!is_water_tight(&m));
                for face in 0..3 {
                    let e = m.index_of_edge(f(face), v(0), v(1)).unwrap();
                    assert_eq!(edge_adjacent_faces_number(&m, f(face), e).unwrap(), 3);
                }
                assert!(!is_face_manifold_on_edge(&m, f(0), 0).unwrap());

                let flagged = non_manifold_vertices(&m).unwrap();
                assert!(flagged.contains(&v(0)) && flagged.contains(&v(1)));

                // Detaching one face keeps the ring of the other two intact.
                detach_adjacent_faces_on_edge(&mut m, f(0), 0).unwrap();
                assert!(is_face_edge_on_border(&m, f(0), 0).unwrap());
                assert_eq!(edge_adjacent_faces_number(&m, f(1), 0).unwrap(), 2);
                assert_eq!(m.adj_face(f(1), 0), Some(f(2)));
                assert_eq!(m.adj_face(f(2), 0), Some(f(1)));
            }

            #[test]
            fn missing_adjacency_is_reported() {
                let mut m: $name = build_mesh(&[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], &[&[0, 1, 2]]);
                assert!(is_face_manifold_on_edge(&m, f(0), 0).is_err());
                assert!(number_holes(&m).is_err());
                assert!(update_per_face_adjacent_faces(&mut m).is_err());

                m.faces_mut().enable_adj_faces();
                update_per_face_adjacent_faces(&mut m).unwrap();
                assert!(is_face_manifold_on_edge(&m, f(0), 0).unwrap());

                m.faces_mut().disable_adj_faces();
                assert!(matches!(
                    check_flip_edge(&m, f(0), 0),
                    Err(crate::Error::MissingComponent { .. })
                ));
            }
        });

        test_helper!(@if_item [Polygons] in $extras => {
            #[test]
            fn mixed_polygons() {
                //
                //    (D) ----- (C) ---- (E)
                //     |         |      /
                //     |    X    |  Y  /
                //     |         |    /
                //    (A) ----- (B) -
                //
                let m = build(
                    &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0], [2.0, 1.0, 0.0]],
                    &[&[0, 1, 2, 3], &[1, 4, 2]],
                );

                assert_eq!(m.face_vertex_number(f(0)), 4);
                assert_eq!(m.face_vertex_mod(f(0), -1), v(3));
                assert_eq!(adj_of(&m, f(0)), [None, Some(f(1)), None, None]);
                assert_eq!(adj_of(&m, f(1)), [None, None, Some(f(0))]);
                assert_eq!(largest_face_size(&m), 4);
                assert_eq!(count_per_face_vertex_references(&m), 7);
                assert_eq!(count_triangulated_triangles(&m), 3);
                // Only triangles can be flipped.
                assert!(!check_flip_edge(&m, f(0), 1).unwrap());
                assert_eq!(border_loops(&m).unwrap()[0].len(), 5);
            }

            #[test]
            fn quad_grid() {
                let mut m: $name = shape::grid(2, 2);
                refresh(&mut m);

                assert_eq!(m.num_vertices(), 9);
                assert_eq!(m.num_faces(), 4);
                assert!(m.face_handles().all(|face| m.face_vertex_number(face) == 4));
                assert_eq!(number_edges(&m), EdgeCounts { total: 12, boundary: 8, non_manifold: 0 });
                assert_eq!(euler_characteristic(&m), 1);
                let loops = border_loops(&m).unwrap();
                assert_eq!(loops.len(), 1);
                assert_eq!(loops[0].len(), 8);

                let center = v(4);
                let face = m.face_handles().next().unwrap();
                let pos = MeshPos::from_vertex(&m, face, center).unwrap();
                assert_eq!(pos.number_of_adjacent_faces_to_v(&m), 4);
            }
        });
    };
}
