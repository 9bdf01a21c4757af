//! Everything related to [`Mesh`].

use std::fmt;

use cgmath::{Matrix4, SquareMatrix};
use optional::Optioned as Opt;
use tracing::debug;

use crate::{
    algo::bounding::BoundingBox,
    comp::{Absent, Coordinate, CustomAttributes, IndexRemap, PresentMode},
    error::{Error, Result},
    handle::{hsize, EdgeHandle, ElementKind, FaceHandle, Handle, VertexHandle},
};
use super::{
    traits::{adopt_containers, nullify_references, remap_references, shift_references},
    Arity, Container, ContainerVisitor, ContainerVisitorMut, Edge, EdgeConfig, ElementContainers,
    Face, FaceAdjMesh, FaceAdjMeshMut, FaceConfig, FaceMesh, FaceMeshMut, MeshId, Vertex, VertexConfig,
};


/// Compile time configuration of [`Mesh`]: the component configuration of
/// each element kind.
pub trait MeshConfig: 'static {
    type Vertex: VertexConfig<HalfEdge = Absent>;
    type Face: FaceConfig;
    type Edge: EdgeConfig;
}

type FaceArity<C> = <<C as MeshConfig>::Face as FaceConfig>::Arity;


/// A shared vertex mesh (also called indexed face set): every face stores
/// the handles of its vertices, in counter clockwise order.
///
/// All further connectivity (adjacent faces per face, adjacent faces per
/// vertex, explicit edges, ...) is stored in components that are configured
/// by `C` and computed by the functions in [`crate::algo::update`].
///
/// Besides its elements, a mesh has a bounding box, a transformation
/// matrix, a list of texture paths, a name and custom attributes.
pub struct Mesh<C: MeshConfig> {
    id: MeshId,
    vertices: Container<Vertex<C::Vertex>>,
    faces: Container<Face<C::Face>>,
    edges: Container<Edge<C::Edge>>,
    bounding_box: BoundingBox<f64>,
    transform: Matrix4<f64>,
    textures: Vec<String>,
    name: String,
    attributes: CustomAttributes,
}

impl<C: MeshConfig> Mesh<C> {
    pub fn new() -> Self {
        let id = MeshId::fresh();
        Self {
            id,
            vertices: Container::new(id),
            faces: Container::new(id),
            edges: Container::new(id),
            bounding_box: BoundingBox::new(),
            transform: Matrix4::identity(),
            textures: Vec::new(),
            name: String::new(),
            attributes: CustomAttributes::default(),
        }
    }

    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn vertices(&self) -> &Container<Vertex<C::Vertex>> {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut Container<Vertex<C::Vertex>> {
        &mut self.vertices
    }

    pub fn faces(&self) -> &Container<Face<C::Face>> {
        &self.faces
    }

    pub fn faces_mut(&mut self) -> &mut Container<Face<C::Face>> {
        &mut self.faces
    }

    pub fn edges(&self) -> &Container<Edge<C::Edge>> {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut Container<Edge<C::Edge>> {
        &mut self.edges
    }

    pub fn num_edges(&self) -> usize {
        self.edges.num_elements()
    }

    // ----- Adding elements --------------------------------------------------

    pub fn add_vertex(&mut self, coord: Coordinate) -> VertexHandle {
        let v = self.vertices.add();
        self.vertices.set_coord(v, coord);
        v
    }

    /// Adds `n` vertices at the origin and returns the handle of the first
    /// one. The others follow with consecutive indices.
    pub fn add_vertices(&mut self, n: usize) -> VertexHandle {
        self.vertices.add_n(n)
    }

    /// Adds a face with the given vertices (in counter clockwise order).
    ///
    /// Fails with `Error::WrongSize` if the number of vertices does not fit
    /// the face arity and with `Error::BadVertexIndex` if any vertex does not
    /// exist. Nothing is modified in that case.
    pub fn add_face(&mut self, vertices: &[VertexHandle]) -> Result<FaceHandle> {
        check_face_size::<FaceArity<C>>(vertices.len())?;
        for &v in vertices {
            self.vertices.require(v)?;
        }

        let f = self.faces.add();
        self.faces.resize_vertices(f, vertices.len())?;
        for (i, &v) in vertices.iter().enumerate() {
            self.faces.set_vertex(f, i, v);
        }
        Ok(f)
    }

    /// Adds a face without vertices: polygon faces have zero vertices, faces
    /// of fixed arity have that many null vertex references.
    pub fn add_empty_face(&mut self) -> FaceHandle {
        self.faces.add()
    }

    /// Adds `n` empty faces and returns the handle of the first one.
    pub fn add_faces(&mut self, n: usize) -> FaceHandle {
        self.faces.add_n(n)
    }

    /// Replaces the vertex list of `f`. For polygon meshes this can change
    /// the number of vertices of `f`; all per face vertex components are
    /// resized with it.
    pub fn set_face_vertices(&mut self, f: FaceHandle, vertices: &[VertexHandle]) -> Result<()> {
        self.faces.require(f)?;
        check_face_size::<FaceArity<C>>(vertices.len())?;
        for &v in vertices {
            self.vertices.require(v)?;
        }

        self.faces.resize_vertices(f, vertices.len())?;
        for (i, &v) in vertices.iter().enumerate() {
            self.faces.set_vertex(f, i, v);
        }
        Ok(())
    }

    /// Adds an explicit edge between `a` and `b`.
    pub fn add_edge(&mut self, a: VertexHandle, b: VertexHandle) -> Result<EdgeHandle> {
        self.vertices.require(a)?;
        self.vertices.require(b)?;
        let e = self.edges.add();
        self.edges.set_endpoints(e, a, b);
        Ok(e)
    }

    pub fn add_edges(&mut self, n: usize) -> EdgeHandle {
        self.edges.add_n(n)
    }

    pub fn reserve_vertices(&mut self, additional: usize) {
        self.vertices.reserve(additional);
    }

    pub fn reserve_faces(&mut self, additional: usize) {
        self.faces.reserve(additional);
    }

    pub fn reserve_edges(&mut self, additional: usize) {
        self.edges.reserve(additional);
    }

    /// Makes the number of live vertices `n`, adding vertices at the origin
    /// or marking the last live vertices deleted.
    pub fn resize_vertices(&mut self, n: usize) {
        self.vertices.resize(n);
    }

    /// Like `resize_vertices`, for faces. New faces are empty.
    pub fn resize_faces(&mut self, n: usize) {
        self.faces.resize(n);
    }

    pub fn resize_edges(&mut self, n: usize) {
        self.edges.resize(n);
    }

    // ----- Deleting and compacting -----------------------------------------

    /// Marks `v` deleted. Faces and edges referring to `v` are not touched;
    /// their references become null when the vertices are compacted.
    pub fn delete_vertex(&mut self, v: VertexHandle) {
        self.vertices.delete(v);
    }

    pub fn delete_face(&mut self, f: FaceHandle) {
        self.faces.delete(f);
    }

    pub fn delete_edge(&mut self, e: EdgeHandle) {
        self.edges.delete(e);
    }

    /// Removes all deleted vertices, renumbering the remaining ones, and
    /// updates every vertex reference in the mesh.
    pub fn compact_vertices(&mut self) -> IndexRemap<VertexHandle> {
        let remap = self.vertices.compact();
        if !remap.is_identity() {
            remap_references(self, &remap);
        }
        remap
    }

    pub fn compact_faces(&mut self) -> IndexRemap<FaceHandle> {
        let remap = self.faces.compact();
        if !remap.is_identity() {
            remap_references(self, &remap);
        }
        remap
    }

    pub fn compact_edges(&mut self) -> IndexRemap<EdgeHandle> {
        let remap = self.edges.compact();
        if !remap.is_identity() {
            remap_references(self, &remap);
        }
        remap
    }

    /// Compacts all containers.
    pub fn compact(&mut self) {
        let removed = [
            self.compact_vertices().num_removed(),
            self.compact_faces().num_removed(),
            self.compact_edges().num_removed(),
        ];
        debug!(
            "compacted mesh: removed {} vertices, {} faces and {} edges",
            removed[0],
            removed[1],
            removed[2],
        );
    }

    /// Removes all vertices. Every vertex reference in the mesh becomes null.
    pub fn clear_vertices(&mut self) {
        self.vertices.clear();
        nullify_references(self, ElementKind::Vertex);
    }

    pub fn clear_faces(&mut self) {
        self.faces.clear();
        nullify_references(self, ElementKind::Face);
    }

    pub fn clear_edges(&mut self) {
        self.edges.clear();
        nullify_references(self, ElementKind::Edge);
    }

    /// Removes all elements. Enabled optional components stay enabled; the
    /// name, transform, textures and attributes are kept.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
        self.edges.clear();
        self.bounding_box = BoundingBox::new();
    }

    /// Appends all elements of `other` (deleted ones included). References
    /// are shifted so that they point to the appended copies.
    ///
    /// Optional components enabled in `self` but not in `other` get initial
    /// values for the appended elements; components enabled only in `other`
    /// are dropped.
    pub fn append(&mut self, other: &Mesh<C>) {
        let mut offsets = [0; 4];
        offsets[ElementKind::Vertex.index()] = self.vertices.container_size() as hsize;
        offsets[ElementKind::Face.index()] = self.faces.container_size() as hsize;
        offsets[ElementKind::Edge.index()] = self.edges.container_size() as hsize;

        let mut other = other.clone();
        shift_references(&mut other, offsets);

        self.bounding_box.add_box(&other.bounding_box);
        self.vertices.append(other.vertices);
        self.faces.append(other.faces);
        self.edges.append(other.edges);
    }

    // ----- Mesh wide data --------------------------------------------------

    /// The bounding box as of the last `update_bounding_box` call. Invalid
    /// (see `BoundingBox::is_valid`) if never computed.
    pub fn bounding_box(&self) -> &BoundingBox<f64> {
        &self.bounding_box
    }

    /// Recomputes the bounding box from all live vertices.
    pub fn update_bounding_box(&mut self) {
        self.bounding_box = BoundingBox::around(self.vertices.iter().map(|(_, v)| v.coord));
    }

    pub fn transform(&self) -> &Matrix4<f64> {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Matrix4<f64>) {
        self.transform = transform;
    }

    /// Paths of the textures the texture coordinate indices refer to.
    pub fn textures(&self) -> &[String] {
        &self.textures
    }

    pub fn push_texture(&mut self, path: impl Into<String>) {
        self.textures.push(path.into());
    }

    pub fn clear_textures(&mut self) {
        self.textures.clear();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn attributes(&self) -> &CustomAttributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut CustomAttributes {
        &mut self.attributes
    }
}

pub(crate) fn check_face_size<A: Arity>(len: usize) -> Result<()> {
    match A::VERTEX_NUMBER {
        Some(n) if n != len => Err(Error::WrongSize(format!(
            "faces of this mesh have {} vertices, but {} were given",
            n,
            len,
        ))),
        None if len < 3 => Err(Error::WrongSize(format!(
            "a face needs at least 3 vertices, but {} were given",
            len,
        ))),
        _ => Ok(()),
    }
}

impl<C: MeshConfig> Default for Mesh<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloning creates a mesh with a new identity.
impl<C: MeshConfig> Clone for Mesh<C> {
    fn clone(&self) -> Self {
        let mut out = Self {
            id: MeshId::fresh(),
            vertices: self.vertices.clone(),
            faces: self.faces.clone(),
            edges: self.edges.clone(),
            bounding_box: self.bounding_box,
            transform: self.transform,
            textures: self.textures.clone(),
            name: self.name.clone(),
            attributes: self.attributes.clone(),
        };
        adopt_containers(&mut out);
        out
    }
}

impl<C: MeshConfig> fmt::Debug for Mesh<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("vertices", &self.vertices)
            .field("faces", &self.faces)
            .field("edges", &self.edges)
            .finish()
    }
}

impl<C: MeshConfig> ElementContainers for Mesh<C> {
    fn mesh_id(&self) -> MeshId {
        self.id
    }

    fn visit_containers<V: ContainerVisitor>(&self, v: &mut V) {
        v.visit(&self.vertices);
        v.visit(&self.faces);
        v.visit(&self.edges);
    }

    fn visit_containers_mut<V: ContainerVisitorMut>(&mut self, v: &mut V) {
        v.visit_mut(&mut self.vertices);
        v.visit_mut(&mut self.faces);
        v.visit_mut(&mut self.edges);
    }
}

impl<C: MeshConfig> FaceMesh for Mesh<C> {
    const FACE_VERTEX_NUMBER: Option<usize> = <FaceArity<C> as Arity>::VERTEX_NUMBER;

    fn num_vertices(&self) -> usize {
        self.vertices.num_elements()
    }

    fn num_faces(&self) -> usize {
        self.faces.num_elements()
    }

    fn vertex_container_size(&self) -> usize {
        self.vertices.container_size()
    }

    fn face_container_size(&self) -> usize {
        self.faces.container_size()
    }

    fn is_vertex_deleted(&self, v: VertexHandle) -> bool {
        self.vertices.is_deleted(v)
    }

    fn is_face_deleted(&self, f: FaceHandle) -> bool {
        self.faces.is_deleted(f)
    }

    fn vertex_position(&self, v: VertexHandle) -> &Coordinate {
        self.vertices.coord(v)
    }

    fn face_vertex_number(&self, f: FaceHandle) -> usize {
        self.faces.vertex_number(f)
    }

    fn try_face_vertex(&self, f: FaceHandle, i: usize) -> Option<VertexHandle> {
        self.faces.vertex(f, i)
    }

    fn index_of_vertex(&self, f: FaceHandle, v: VertexHandle) -> Option<usize> {
        self.faces.index_of_vertex(f, v)
    }

    fn index_of_edge(&self, f: FaceHandle, v0: VertexHandle, v1: VertexHandle) -> Option<usize> {
        self.faces.index_of_edge(f, v0, v1)
    }
}

impl<C: MeshConfig> FaceMeshMut for Mesh<C> {
    fn add_vertex(&mut self, coord: Coordinate) -> VertexHandle {
        Mesh::add_vertex(self, coord)
    }

    fn add_face(&mut self, vertices: &[VertexHandle]) -> Result<FaceHandle> {
        Mesh::add_face(self, vertices)
    }

    fn delete_face(&mut self, f: FaceHandle) {
        Mesh::delete_face(self, f)
    }
}

impl<C: MeshConfig> FaceAdjMesh for Mesh<C>
where
    <C::Face as FaceConfig>::AdjacentFaces: PresentMode,
{
    fn is_face_adjacency_enabled(&self) -> bool {
        self.faces.is_adj_faces_enabled()
    }

    fn adj_face(&self, f: FaceHandle, i: usize) -> Option<FaceHandle> {
        self.faces.adj_faces(f).ok().and_then(|adj| adj[i].into_option())
    }
}

impl<C: MeshConfig> FaceAdjMeshMut for Mesh<C>
where
    <C::Face as FaceConfig>::AdjacentFaces: PresentMode,
{
    fn set_adj_face(&mut self, f: FaceHandle, i: usize, adj: Option<FaceHandle>) {
        if let Ok(list) = self.faces.adj_faces_mut(f) {
            list[i] = Opt::from(adj);
        }
    }

    fn is_vertex_face_adjacency_enabled(&self) -> bool {
        self.vertices.tracks_adj_faces()
    }

    fn remove_vertex_adj_face(&mut self, v: VertexHandle, f: FaceHandle) -> bool {
        self.vertices.forget_adj_face(v, f)
    }
}


#[cfg(test)]
mod tests {
    use crate::mesh::configs::{PolyMesh, QuadMesh, TriMesh};
    use super::*;

    gen_mesh_tests!(Mesh<TriMesh>: [FaceAdjMeshMut]);

    mod poly {
        use super::*;

        gen_mesh_tests!(Mesh<PolyMesh>: [FaceAdjMeshMut, Polygons]);
    }

    #[test]
    fn empty_faces_have_no_vertices() {
        let mut m = Mesh::<PolyMesh>::new();
        let f = m.add_empty_face();
        assert_eq!(m.face_vertex_number(f), 0);
        assert_eq!(m.try_face_vertex_mod(f, 1), None);
        assert_eq!(m.faces().vertex_mod(f, -1), None);
        assert_eq!(crate::algo::stat::number_edges(&m).total, 0);

        // Fixed arity faces start with null references.
        let mut tris = Mesh::<TriMesh>::new();
        let f = tris.add_empty_face();
        assert_eq!(tris.face_vertex_number(f), 3);
        assert_eq!(tris.try_face_vertex(f, 0), None);
        assert_eq!(tris.face_edge_vertices(f, 2), None);
        assert_eq!(crate::algo::stat::number_edges(&tris).total, 0);
    }

    #[test]
    #[should_panic(expected = "is null")]
    fn face_vertex_mod_of_empty_face() {
        let mut m = Mesh::<PolyMesh>::new();
        let f = m.add_empty_face();
        m.face_vertex_mod(f, 0);
    }

    #[test]
    fn add_face_validates_before_mutating() {
        let mut m = Mesh::<TriMesh>::new();
        let a = m.add_vertex([0.0, 0.0, 0.0].into());
        let b = m.add_vertex([1.0, 0.0, 0.0].into());
        let c = m.add_vertex([0.0, 1.0, 0.0].into());

        assert!(matches!(m.add_face(&[a, b]), Err(Error::WrongSize(_))));
        assert!(matches!(
            m.add_face(&[a, b, VertexHandle::new(10)]),
            Err(Error::BadVertexIndex { index: 10, .. })
        ));

        m.delete_vertex(c);
        assert!(matches!(
            m.add_face(&[a, b, c]),
            Err(Error::BadVertexIndex { index: 2, reason: crate::error::BadIndexReason::Deleted })
        ));
        assert_eq!(m.num_faces(), 0);
        assert_eq!(m.faces().container_size(), 0);
    }

    #[test]
    fn polygons_of_any_size() {
        let mut m = Mesh::<PolyMesh>::new();
        let v = m.add_vertices(5);
        let vs = (0..5).map(|i| VertexHandle::new(v.idx() + i)).collect::<Vec<_>>();

        let f = m.add_face(&vs).unwrap();
        assert_eq!(m.face_vertex_number(f), 5);
        m.set_face_vertices(f, &vs[..4]).unwrap();
        assert_eq!(m.face_vertex_number(f), 4);
        assert!(m.add_face(&vs[..2]).is_err());

        let mut quads = Mesh::<QuadMesh>::new();
        let w = quads.add_vertices(4);
        let ws = (0..4).map(|i| VertexHandle::new(w.idx() + i)).collect::<Vec<_>>();
        assert!(quads.add_face(&ws).is_ok());
        assert!(quads.add_face(&ws[..3]).is_err());
    }

    #[test]
    fn compaction_rewrites_references() {
        let mut m = Mesh::<TriMesh>::new();
        let vs = (0..5).map(|i| m.add_vertex([i as f64, 0.0, 0.0].into())).collect::<Vec<_>>();
        let f0 = m.add_face(&[vs[0], vs[1], vs[2]]).unwrap();
        let f1 = m.add_face(&[vs[2], vs[3], vs[4]]).unwrap();

        m.delete_vertex(vs[1]);
        let remap = m.compact_vertices();
        assert_eq!(remap.get(vs[4]), Some(VertexHandle::new(3)));
        assert_eq!(m.num_vertices(), 4);

        // The face that referenced the deleted vertex now holds null.
        assert_eq!(m.faces().vertex(f0, 1), None);
        assert_eq!(
            m.face_vertices(f1).collect::<Vec<_>>(),
            [VertexHandle::new(1), VertexHandle::new(2), VertexHandle::new(3)],
        );
        assert_eq!(m.vertex_position(VertexHandle::new(3)).x, 4.0);
    }

    #[test]
    fn clear_kind_nulls_references() {
        let mut m = Mesh::<TriMesh>::new();
        let a = m.add_vertex([0.0, 0.0, 0.0].into());
        let b = m.add_vertex([1.0, 0.0, 0.0].into());
        let c = m.add_vertex([0.0, 1.0, 0.0].into());
        let f = m.add_face(&[a, b, c]).unwrap();

        m.clear_vertices();
        assert_eq!(m.num_vertices(), 0);
        assert!(m.faces().vertices(f).iter().all(|v| v.is_none()));
    }

    #[test]
    fn clone_gets_new_identity() {
        let mut m = Mesh::<TriMesh>::new();
        m.add_vertex([0.0, 0.0, 0.0].into());
        m.set_name("bunny");

        let copy = m.clone();
        assert_ne!(copy.id(), m.id());
        assert_eq!(copy.vertices().owner(), copy.id());
        assert_eq!(copy.name(), "bunny");
        assert_eq!(copy.num_vertices(), 1);
    }

    #[test]
    fn append_shifts_references() {
        let mut m = Mesh::<TriMesh>::new();
        let a = m.add_vertex([0.0, 0.0, 0.0].into());
        let b = m.add_vertex([1.0, 0.0, 0.0].into());
        let c = m.add_vertex([0.0, 1.0, 0.0].into());
        m.add_face(&[a, b, c]).unwrap();

        let other = m.clone();
        m.append(&other);
        assert_eq!(m.num_vertices(), 6);
        assert_eq!(m.num_faces(), 2);
        assert_eq!(
            m.face_vertices(FaceHandle::new(1)).collect::<Vec<_>>(),
            [VertexHandle::new(3), VertexHandle::new(4), VertexHandle::new(5)],
        );
        assert_eq!(m.vertices().owner(), m.id());
    }

    #[test]
    fn bounding_box_and_metadata() {
        let mut m = Mesh::<TriMesh>::new();
        m.add_vertex([0.0, -1.0, 2.0].into());
        let v = m.add_vertex([3.0, 1.0, 0.0].into());
        m.add_vertex([9.0, 9.0, 9.0].into());
        m.delete_vertex(VertexHandle::new(2));
        assert!(!m.bounding_box().is_valid());

        m.update_bounding_box();
        assert_eq!(m.bounding_box().x(), [0.0, 3.0]);
        assert_eq!(m.bounding_box().z(), [0.0, 2.0]);

        m.push_texture("wood.png");
        m.attributes_mut().set("scale", 0.5f64);
        assert_eq!(m.textures(), ["wood.png".to_string()]);
        assert_eq!(*m.attributes().get::<f64>("scale").unwrap(), 0.5);
        assert_eq!(m.vertices().coord(v).x, 3.0);
    }

    #[test]
    fn resize_soft_deletes_trailing_elements() {
        let mut m = Mesh::<TriMesh>::new();
        m.resize_vertices(5);
        m.delete_vertex(VertexHandle::new(4));
        m.resize_vertices(2);

        assert_eq!(m.num_vertices(), 2);
        assert_eq!(m.vertices().container_size(), 5);
        assert!(m.vertices().contains(VertexHandle::new(1)));
        assert!(!m.vertices().contains(VertexHandle::new(2)));

        m.compact_vertices();
        assert_eq!(m.vertices().container_size(), 2);
    }
}
