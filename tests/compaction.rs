//! References stay valid when containers are compacted.

use optional::Optioned as Opt;
use tessel::{
    algo::{check::check_mesh_pointers, clean, stat, update},
    comp::Coordinate,
    mesh::configs::{TriEdgeMesh, TriMesh},
    prelude::*,
    shape,
};
use tracing_subscriber::EnvFilter;


/// Prints the library's debug events when running with `RUST_LOG=debug`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}


fn adjacent_faces(m: &Mesh<TriMesh>) -> Vec<[Option<FaceHandle>; 3]> {
    m.face_handles()
        .map(|f| [m.adj_face(f, 0), m.adj_face(f, 1), m.adj_face(f, 2)])
        .collect()
}

fn vertex_faces(m: &Mesh<TriMesh>) -> Vec<Vec<FaceHandle>> {
    m.vertex_handles()
        .map(|v| {
            m.vertices().adj_faces(v).unwrap()
                .iter()
                .filter_map(|f| f.into_option())
                .collect()
        })
        .collect()
}

#[test]
fn remapped_adjacency_matches_recomputed_one() {
    init_tracing();
    let mut m: Mesh<TriMesh> = shape::icosahedron();
    m.faces_mut().enable_adj_faces();
    m.vertices_mut().enable_adj_faces();
    update::update_per_face_adjacent_faces(&mut m).unwrap();
    update::update_per_vertex_adjacent_faces(&mut m).unwrap();

    for &i in &[0, 5, 6, 19] {
        m.delete_face(FaceHandle::new(i));
    }
    let remap = m.compact_faces();
    assert_eq!(remap.num_removed(), 4);
    assert_eq!(remap.get(FaceHandle::new(7)), Some(FaceHandle::new(4)));
    check_mesh_pointers(&m).unwrap();

    let stored_adj = adjacent_faces(&m);
    let stored_vertex_faces = vertex_faces(&m);

    update::update_per_face_adjacent_faces(&mut m).unwrap();
    update::update_per_vertex_adjacent_faces(&mut m).unwrap();
    assert_eq!(stored_adj, adjacent_faces(&m));
    assert_eq!(stored_vertex_faces, vertex_faces(&m));
}

/// Every live face as its corner positions, plus the corners of the live
/// face across each of its edges.
fn face_relations(m: &Mesh<TriMesh>) -> Vec<(Vec<Coordinate>, Vec<Option<Vec<Coordinate>>>)> {
    let corners = |f: FaceHandle| {
        m.face_vertices(f).map(|v| *m.vertex_position(v)).collect::<Vec<_>>()
    };
    m.face_handles()
        .map(|f| {
            let adj = (0..3)
                .map(|i| m.adj_face(f, i).filter(|&a| !m.is_face_deleted(a)).map(corners))
                .collect();
            (corners(f), adj)
        })
        .collect()
}

/// Every live vertex as its position, plus the first corner of each live
/// face listed as adjacent to it.
fn vertex_relations(m: &Mesh<TriMesh>) -> Vec<(Coordinate, Vec<Coordinate>)> {
    m.vertex_handles()
        .map(|v| {
            let faces = m.vertices().adj_faces(v).unwrap()
                .iter()
                .filter_map(|f| f.into_option())
                .filter(|&f| !m.is_face_deleted(f))
                .map(|f| *m.vertex_position(m.face_vertex(f, 0)))
                .collect();
            (*m.vertex_position(v), faces)
        })
        .collect()
}

#[test]
fn compaction_preserves_relations() {
    init_tracing();
    let mut m: Mesh<TriMesh> = shape::icosahedron();
    m.faces_mut().enable_adj_faces();
    m.vertices_mut().enable_adj_faces();
    update::update_per_face_adjacent_faces(&mut m).unwrap();
    update::update_per_vertex_adjacent_faces(&mut m).unwrap();

    // Vertices 0 and 3 are opposite each other, so their stars are disjoint.
    let doomed = [VertexHandle::new(0), VertexHandle::new(3)];
    let incident = m.face_handles()
        .filter(|&f| doomed.iter().any(|&v| m.index_of_vertex(f, v).is_some()))
        .collect::<Vec<_>>();
    assert_eq!(incident.len(), 10);
    for &v in &doomed {
        m.delete_vertex(v);
    }
    for &f in &incident {
        m.delete_face(f);
    }

    let faces_before = face_relations(&m);
    let vertices_before = vertex_relations(&m);

    m.compact();
    assert_eq!(m.num_vertices(), 10);
    assert_eq!(m.num_faces(), 10);
    assert_eq!(m.vertices().container_size(), 10);
    assert_eq!(m.faces().container_size(), 10);
    check_mesh_pointers(&m).unwrap();

    assert_eq!(face_relations(&m), faces_before);
    assert_eq!(vertex_relations(&m), vertices_before);

    // The band between the two removed caps is a tube with two holes.
    assert_eq!(stat::number_holes(&m).unwrap(), 2);
    assert_eq!(stat::euler_characteristic(&m), 0);
}

#[test]
fn statistics_skip_null_vertices() {
    init_tracing();
    let mut m: Mesh<TriMesh> = shape::icosahedron();
    m.faces_mut().enable_adj_faces();
    update::update_per_face_adjacent_faces(&mut m).unwrap();

    // The five faces around vertex 0 keep a null reference.
    m.delete_vertex(VertexHandle::new(0));
    m.compact();
    assert_eq!(m.num_vertices(), 11);
    assert_eq!(m.num_faces(), 20);
    assert_eq!(m.faces().vertex(FaceHandle::new(0), 0), None);

    let edges = stat::number_edges(&m);
    assert_eq!(edges.total, 25);
    assert_eq!(edges.boundary, 0);
    assert_eq!(edges.non_manifold, 0);
    assert_eq!(stat::euler_characteristic(&m), 11 - 25 + 20);

    assert_eq!(stat::number_holes(&m).unwrap(), 0);
    assert!(stat::non_manifold_vertices(&m).unwrap().is_empty());
    assert_eq!(stat::number_connected_components(&m).unwrap(), 1);
    check_mesh_pointers(&m).unwrap();
}

#[test]
fn face_positions_survive_cleaning() {
    init_tracing();
    // Two separate copies of a strip, welded back together.
    let mut m: Mesh<TriMesh> = shape::triangle_strip(4);
    let copy = m.clone();
    m.append(&copy);
    m.add_vertex([5.0, 5.0, 5.0].into());

    let positions = |m: &Mesh<TriMesh>| {
        m.face_handles()
            .map(|f| m.face_vertices(f).map(|v| *m.vertex_position(v)).collect::<Vec<_>>())
            .collect::<Vec<_>>()
    };
    let before = positions(&m);

    assert_eq!(clean::remove_duplicated_vertices(&mut m), 6);
    assert_eq!(clean::remove_unreferenced_vertices(&mut m), 1);
    m.compact();
    assert_eq!(m.num_vertices(), 6);
    assert_eq!(positions(&m), before);

    assert_eq!(clean::remove_duplicated_faces(&mut m), 4);
    m.compact();
    assert_eq!(m.num_faces(), 4);
    assert_eq!(positions(&m)[..], before[..4]);
    check_mesh_pointers(&m).unwrap();
}

#[test]
fn edges_lose_deleted_endpoints() {
    init_tracing();
    let mut m = Mesh::<TriEdgeMesh>::new();
    let vs = (0..4).map(|i| m.add_vertex([i as f64, 0.0, 0.0].into())).collect::<Vec<_>>();
    m.add_face(&[vs[0], vs[1], vs[2]]).unwrap();
    let e0 = m.add_edge(vs[0], vs[3]).unwrap();
    let e1 = m.add_edge(vs[1], vs[2]).unwrap();

    m.delete_vertex(vs[0]);
    m.delete_edge(e1);
    m.compact();

    assert_eq!(m.num_vertices(), 3);
    assert_eq!(m.num_edges(), 1);
    assert_eq!(m.edges().endpoints(e0), [None, Some(VertexHandle::new(2))]);
    assert_eq!(
        m.faces().vertices(FaceHandle::new(0)),
        &[Opt::none(), Opt::some(VertexHandle::new(0)), Opt::some(VertexHandle::new(1))],
    );
    check_mesh_pointers(&m).unwrap();
}
