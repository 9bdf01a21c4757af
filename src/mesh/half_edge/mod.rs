//! Everything related to the [`HalfEdgeMesh`].

use std::fmt;

use fxhash::FxHashMap;
use cgmath::{Vector3, Zero};
use optional::Optioned as Opt;
use smallvec::SmallVec;

use crate::{
    algo::bounding::BoundingBox,
    comp::{
        inline_bit, Absent, Color, ComponentKind, Coordinate, ElementFlags, FieldStorage, Horizontal, Mark,
        Normal, Quality, RefVisitor, RefVisitorMut, Slot,
    },
    error::{Error, Result},
    handle::{ElementKind, FaceHandle, HalfEdgeHandle, Handle, VertexHandle},
};
use super::{
    shared_vertex::check_face_size,
    traits::{adopt_containers, remap_references},
    Arity, Container, ContainerVisitor, ContainerVisitorMut, Element, ElementContainers,
    FaceAdjMesh, FaceConfig, FaceMesh, FaceMeshMut, MeshId, NoSide, Vertex, VertexConfig,
};


/// Compile time configuration of a [`HalfEdgeMesh`].
///
/// Faces cannot store adjacency or per face vertex components: the half
/// edges already encode that information, so storing it twice would only
/// allow it to disagree.
pub trait HalfEdgeConfig: 'static {
    type Vertex: VertexConfig<HalfEdge = Horizontal>;
    type Face: FaceConfig<AdjacentFaces = Absent, AdjacentEdges = Absent, WedgeTexCoords = Absent>;
}


// ===========================================================================
// ===== Elements
// ===========================================================================

/// One directed side of an edge.
///
/// The half edges of a face form a cycle via `next`/`prev`, in counter
/// clockwise order. `twin` is the half edge running in the opposite direction
/// on the neighboring face; it is null on border edges.
#[derive(Clone, Debug)]
pub struct HalfEdge {
    pub(crate) flags: ElementFlags,
    pub(crate) next: Opt<HalfEdgeHandle>,
    pub(crate) prev: Opt<HalfEdgeHandle>,
    pub(crate) twin: Opt<HalfEdgeHandle>,
    pub(crate) from: Opt<VertexHandle>,
    pub(crate) to: Opt<VertexHandle>,
    pub(crate) face: Opt<FaceHandle>,
}

impl Element for HalfEdge {
    const KIND: ElementKind = ElementKind::HalfEdge;
    type Handle = HalfEdgeHandle;
    type Side = NoSide;

    const INLINE_COMPONENTS: u32 = ComponentKind::Flags.bit()
        | ComponentKind::VertexReferences.bit()
        | ComponentKind::HalfEdgeReferences.bit();

    fn new() -> Self {
        Self {
            flags: ElementFlags::default(),
            next: Opt::none(),
            prev: Opt::none(),
            twin: Opt::none(),
            from: Opt::none(),
            to: Opt::none(),
            face: Opt::none(),
        }
    }

    fn flags(&self) -> &ElementFlags {
        &self.flags
    }

    fn flags_mut(&mut self) -> &mut ElementFlags {
        &mut self.flags
    }

    fn visit_refs<V: RefVisitor>(&self, v: &mut V) {
        v.visit(ComponentKind::HalfEdgeReferences, &[self.next, self.prev, self.twin]);
        v.visit(ComponentKind::VertexReferences, &[self.from, self.to]);
        v.visit(ComponentKind::AdjacentFaces, std::slice::from_ref(&self.face));
    }

    fn visit_refs_mut<V: RefVisitorMut>(&mut self, v: &mut V) {
        let mut hes = [self.next, self.prev, self.twin];
        v.visit_mut(ComponentKind::HalfEdgeReferences, &mut hes);
        let [next, prev, twin] = hes;
        self.next = next;
        self.prev = prev;
        self.twin = twin;

        let mut vs = [self.from, self.to];
        v.visit_mut(ComponentKind::VertexReferences, &mut vs);
        let [from, to] = vs;
        self.from = from;
        self.to = to;

        v.visit_mut(ComponentKind::AdjacentFaces, std::slice::from_mut(&mut self.face));
    }
}

impl Container<HalfEdge> {
    pub fn next(&self, he: HalfEdgeHandle) -> Option<HalfEdgeHandle> {
        self.elements[he.to_usize()].next.into_option()
    }

    pub fn prev(&self, he: HalfEdgeHandle) -> Option<HalfEdgeHandle> {
        self.elements[he.to_usize()].prev.into_option()
    }

    pub fn twin(&self, he: HalfEdgeHandle) -> Option<HalfEdgeHandle> {
        self.elements[he.to_usize()].twin.into_option()
    }

    /// The vertex `he` starts at.
    pub fn from(&self, he: HalfEdgeHandle) -> Option<VertexHandle> {
        self.elements[he.to_usize()].from.into_option()
    }

    /// The vertex `he` points to.
    pub fn to(&self, he: HalfEdgeHandle) -> Option<VertexHandle> {
        self.elements[he.to_usize()].to.into_option()
    }

    /// The face `he` belongs to.
    pub fn face(&self, he: HalfEdgeHandle) -> Option<FaceHandle> {
        self.elements[he.to_usize()].face.into_option()
    }
}

/// A face of a half edge mesh: the entry point to the cycle of half edges
/// bounding it, plus one cycle per hole.
pub struct HeFace<C: FaceConfig> {
    pub(crate) flags: ElementFlags,
    pub(crate) outer: Opt<HalfEdgeHandle>,
    pub(crate) inner: SmallVec<[Opt<HalfEdgeHandle>; 2]>,
    pub(crate) normal: Slot<C::Normal, Normal>,
    pub(crate) color: Slot<C::Color, Color>,
    pub(crate) quality: Slot<C::Quality, Quality>,
    pub(crate) mark: Slot<C::Mark, Mark>,
}

impl<C: FaceConfig> Clone for HeFace<C> {
    fn clone(&self) -> Self {
        Self {
            flags: self.flags,
            outer: self.outer,
            inner: self.inner.clone(),
            normal: self.normal.clone(),
            color: self.color.clone(),
            quality: self.quality.clone(),
            mark: self.mark.clone(),
        }
    }
}

impl<C: FaceConfig> fmt::Debug for HeFace<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HeFace")
            .field("flags", &self.flags)
            .field("outer", &self.outer)
            .field("inner", &self.inner)
            .field("normal", &self.normal)
            .field("color", &self.color)
            .field("quality", &self.quality)
            .field("mark", &self.mark)
            .finish()
    }
}

impl<C: FaceConfig> Element for HeFace<C> {
    const KIND: ElementKind = ElementKind::Face;
    type Handle = FaceHandle;
    type Side = HeFaceSide<C>;

    const INLINE_COMPONENTS: u32 = ComponentKind::Flags.bit()
        | ComponentKind::HalfEdgeReferences.bit()
        | inline_bit::<C::Normal>(ComponentKind::Normal)
        | inline_bit::<C::Color>(ComponentKind::Color)
        | inline_bit::<C::Quality>(ComponentKind::Quality)
        | inline_bit::<C::Mark>(ComponentKind::Mark);

    fn new() -> Self {
        Self {
            flags: ElementFlags::default(),
            outer: Opt::none(),
            inner: SmallVec::new(),
            normal: FieldStorage::from_value(Vector3::zero()),
            color: FieldStorage::from_value(Color::default()),
            quality: FieldStorage::from_value(0.0),
            mark: FieldStorage::from_value(0),
        }
    }

    fn flags(&self) -> &ElementFlags {
        &self.flags
    }

    fn flags_mut(&mut self) -> &mut ElementFlags {
        &mut self.flags
    }

    fn visit_refs<V: RefVisitor>(&self, v: &mut V) {
        v.visit(ComponentKind::HalfEdgeReferences, std::slice::from_ref(&self.outer));
        v.visit(ComponentKind::HalfEdgeReferences, &self.inner[..]);
    }

    fn visit_refs_mut<V: RefVisitorMut>(&mut self, v: &mut V) {
        v.visit_mut(ComponentKind::HalfEdgeReferences, std::slice::from_mut(&mut self.outer));
        v.visit_mut(ComponentKind::HalfEdgeReferences, &mut self.inner[..]);
    }
}

side_storage! {
    /// Side tables of the optional components of half edge mesh faces.
    HeFaceSide<FaceConfig> for HeFace, |_f| {
        normal: Normal = Vector3::zero() => Normal,
        color: Color = Color::default() => Color,
        quality: Quality = 0.0 => Quality,
        mark: Mark = 0 => Mark,
    }
}

impl_component!(value HeFace<FaceConfig>, Normal, normal, Normal, Normal, _f => Vector3::zero());
impl_component!(value HeFace<FaceConfig>, Color, color, Color, Color, _f => Color::default());
impl_component!(value HeFace<FaceConfig>, Quality, quality, Quality, Quality, _f => 0.0);
impl_component!(value HeFace<FaceConfig>, Mark, mark, Mark, Mark, _f => 0);


// ===========================================================================
// ===== The mesh
// ===========================================================================

/// A half edge mesh: every edge is stored as two directed half edges, one per
/// adjacent face.
///
/// All adjacency (face to face, vertex to face) is implied by the half
/// edges, so it can never be out of date. In exchange, the mesh can only
/// represent manifold edges: `add_face` rejects faces whose edges are
/// already used by two faces (or by one face in the same direction).
///
/// Faces can have holes, each bounded by its own cycle of half edges.
pub struct HalfEdgeMesh<C: HalfEdgeConfig> {
    id: MeshId,
    vertices: Container<Vertex<C::Vertex>>,
    faces: Container<HeFace<C::Face>>,
    half_edges: Container<HalfEdge>,

    /// Maps `(from, to)` to the live half edge between those vertices.
    edge_index: FxHashMap<(VertexHandle, VertexHandle), HalfEdgeHandle>,
    bounding_box: BoundingBox<f64>,
    name: String,
}

impl<C: HalfEdgeConfig> HalfEdgeMesh<C> {
    pub fn new() -> Self {
        let id = MeshId::fresh();
        Self {
            id,
            vertices: Container::new(id),
            faces: Container::new(id),
            half_edges: Container::new(id),
            edge_index: FxHashMap::default(),
            bounding_box: BoundingBox::new(),
            name: String::new(),
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

    pub fn faces(&self) -> &Container<HeFace<C::Face>> {
        &self.faces
    }

    pub fn faces_mut(&mut self) -> &mut Container<HeFace<C::Face>> {
        &mut self.faces
    }

    pub fn half_edges(&self) -> &Container<HalfEdge> {
        &self.half_edges
    }

    pub fn num_half_edges(&self) -> usize {
        self.half_edges.num_elements()
    }

    pub fn add_vertex(&mut self, coord: Coordinate) -> VertexHandle {
        let v = self.vertices.add();
        self.vertices.set_coord(v, coord);
        v
    }

    /// The live half edge from `from` to `to`, if any.
    pub fn half_edge_between(&self, from: VertexHandle, to: VertexHandle) -> Option<HalfEdgeHandle> {
        self.edge_index.get(&(from, to)).copied()
    }

    /// One half edge starting at `v`, if `v` is part of any face.
    pub fn outgoing_half_edge(&self, v: VertexHandle) -> Option<HalfEdgeHandle> {
        self.vertices.half_edge(v)
    }

    /// The half edge `f` is entered through.
    pub fn outer_half_edge(&self, f: FaceHandle) -> Option<HalfEdgeHandle> {
        self.faces.elements[f.to_usize()].outer.into_option()
    }

    /// One half edge per hole of `f`.
    pub fn inner_half_edges(&self, f: FaceHandle) -> impl Iterator<Item = HalfEdgeHandle> + '_ {
        self.faces.elements[f.to_usize()].inner.iter().filter_map(|h| h.into_option())
    }

    /// The cycle of half edges starting at `start`, following `next`.
    pub fn cycle(&self, start: HalfEdgeHandle) -> impl Iterator<Item = HalfEdgeHandle> + '_ {
        let mut current = Some(start);
        let mut first = true;
        std::iter::from_fn(move || {
            let he = current?;
            if !first && he == start {
                return None;
            }
            first = false;
            current = self.half_edges.next(he);
            Some(he)
        })
    }

    /// The half edges bounding `f` (outer boundary only).
    pub fn face_half_edges(&self, f: FaceHandle) -> impl Iterator<Item = HalfEdgeHandle> + '_ {
        self.outer_half_edge(f).into_iter().flat_map(move |start| self.cycle(start))
    }

    /// Checks that `vertices` can form a new boundary cycle.
    fn check_cycle(&self, vertices: &[VertexHandle]) -> Result<()> {
        for &v in vertices {
            self.vertices.require(v)?;
        }

        let n = vertices.len();
        for (i, &a) in vertices.iter().enumerate() {
            if vertices[i + 1..].contains(&a) {
                return Err(Error::InvalidFace(format!("vertex {:?} appears twice", a)));
            }

            let b = vertices[(i + 1) % n];
            if self.edge_index.contains_key(&(a, b)) {
                return Err(Error::InvalidFace(format!(
                    "the half edge {:?} -> {:?} already exists (the edge would be \
                        non-manifold or the face has inconsistent orientation)",
                    a,
                    b,
                )));
            }
        }

        Ok(())
    }

    /// Creates a cycle of half edges around `vertices` belonging to `f` and
    /// returns its first half edge.
    fn add_cycle(&mut self, f: FaceHandle, vertices: &[VertexHandle]) -> HalfEdgeHandle {
        let n = vertices.len();
        let first = self.half_edges.add_n(n);
        let he = |i: usize| HalfEdgeHandle::from_usize(first.to_usize() + (i % n));

        for i in 0..n {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            let h = he(i);
            let twin = self.edge_index.get(&(b, a)).copied();

            {
                let elem = &mut self.half_edges.elements[h.to_usize()];
                elem.next = Opt::some(he(i + 1));
                elem.prev = Opt::some(he(i + n - 1));
                elem.from = Opt::some(a);
                elem.to = Opt::some(b);
                elem.face = Opt::some(f);
                elem.twin = Opt::from(twin);
            }
            if let Some(t) = twin {
                self.half_edges.elements[t.to_usize()].twin = Opt::some(h);
            }

            self.edge_index.insert((a, b), h);
            if self.vertices.half_edge(a).is_none() {
                self.vertices.set_half_edge(a, Some(h));
            }
        }

        first
    }

    /// Adds a face bounded by `vertices` (counter clockwise).
    ///
    /// Fails with `Error::WrongSize` or `Error::BadVertexIndex` like
    /// `Mesh::add_face`, and with `Error::InvalidFace` if a vertex appears
    /// twice or a half edge of the new face already exists.
    pub fn add_face(&mut self, vertices: &[VertexHandle]) -> Result<FaceHandle> {
        check_face_size::<<C::Face as FaceConfig>::Arity>(vertices.len())?;
        self.check_cycle(vertices)?;

        let f = self.faces.add();
        let first = self.add_cycle(f, vertices);
        self.faces.elements[f.to_usize()].outer = Opt::some(first);
        Ok(f)
    }

    /// Adds a hole bounded by `vertices` to `f`. The hole's vertices should be
    /// given in clockwise order.
    pub fn add_hole(&mut self, f: FaceHandle, vertices: &[VertexHandle]) -> Result<()> {
        self.faces.require(f)?;
        if vertices.len() < 3 {
            return Err(Error::WrongSize(format!(
                "a hole needs at least 3 vertices, but {} were given",
                vertices.len(),
            )));
        }
        self.check_cycle(vertices)?;

        let first = self.add_cycle(f, vertices);
        self.faces.elements[f.to_usize()].inner.push(Opt::some(first));
        Ok(())
    }

    /// Marks `f` and all its half edges deleted. The twins of those half
    /// edges become border half edges.
    pub fn delete_face(&mut self, f: FaceHandle) {
        if self.faces.is_deleted(f) {
            return;
        }

        let starts = self.outer_half_edge(f).into_iter()
            .chain(self.inner_half_edges(f))
            .collect::<SmallVec<[_; 4]>>();
        let hes = starts.iter()
            .flat_map(|&s| self.cycle(s))
            .collect::<Vec<_>>();

        for &h in &hes {
            if let Some(t) = self.half_edges.twin(h) {
                self.half_edges.elements[t.to_usize()].twin = Opt::none();
            }
            if let (Some(a), Some(b)) = (self.half_edges.from(h), self.half_edges.to(h)) {
                self.edge_index.remove(&(a, b));
            }
            self.half_edges.delete(h);
        }

        // Vertices whose outgoing half edge is gone get another one, if any.
        for &h in &hes {
            if let Some(v) = self.half_edges.from(h) {
                if self.vertices.half_edge(v) == Some(h) {
                    let replacement = self.edge_index.iter()
                        .filter(|((from, _), _)| *from == v)
                        .map(|(_, &he)| he)
                        .min();
                    self.vertices.set_half_edge(v, replacement);
                }
            }
        }

        self.faces.delete(f);
    }

    /// Removes all deleted elements and updates all references.
    pub fn compact(&mut self) {
        let remap = self.half_edges.compact();
        if !remap.is_identity() {
            remap_references(self, &remap);
        }
        let remap = self.faces.compact();
        if !remap.is_identity() {
            remap_references(self, &remap);
        }
        let remap = self.vertices.compact();
        if !remap.is_identity() {
            remap_references(self, &remap);
        }

        self.rebuild_edge_index();
    }

    fn rebuild_edge_index(&mut self) {
        self.edge_index = self.half_edges.iter()
            .filter_map(|(h, e)| Some(((e.from.into_option()?, e.to.into_option()?), h)))
            .collect();
    }

    pub fn bounding_box(&self) -> &BoundingBox<f64> {
        &self.bounding_box
    }

    pub fn update_bounding_box(&mut self) {
        self.bounding_box = BoundingBox::around(self.vertices.iter().map(|(_, v)| v.coord));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The half edge of `f` with index `i` (counting from the outer half
    /// edge).
    fn face_half_edge(&self, f: FaceHandle, i: usize) -> HalfEdgeHandle {
        match self.face_half_edges(f).nth(i) {
            Some(he) => he,
            None => panic!("face {:?} has no half edge with index {}", f, i),
        }
    }
}

impl<C: HalfEdgeConfig> Default for HalfEdgeMesh<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloning creates a mesh with a new identity.
impl<C: HalfEdgeConfig> Clone for HalfEdgeMesh<C> {
    fn clone(&self) -> Self {
        let mut out = Self {
            id: MeshId::fresh(),
            vertices: self.vertices.clone(),
            faces: self.faces.clone(),
            half_edges: self.half_edges.clone(),
            edge_index: self.edge_index.clone(),
            bounding_box: self.bounding_box,
            name: self.name.clone(),
        };
        adopt_containers(&mut out);
        out
    }
}

impl<C: HalfEdgeConfig> fmt::Debug for HalfEdgeMesh<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HalfEdgeMesh")
            .field("id", &self.id)
            .field("vertices", &self.vertices)
            .field("faces", &self.faces)
            .field("half_edges", &self.half_edges)
            .finish()
    }
}

impl<C: HalfEdgeConfig> ElementContainers for HalfEdgeMesh<C> {
    fn mesh_id(&self) -> MeshId {
        self.id
    }

    fn visit_containers<V: ContainerVisitor>(&self, v: &mut V) {
        v.visit(&self.vertices);
        v.visit(&self.faces);
        v.visit(&self.half_edges);
    }

    fn visit_containers_mut<V: ContainerVisitorMut>(&mut self, v: &mut V) {
        v.visit_mut(&mut self.vertices);
        v.visit_mut(&mut self.faces);
        v.visit_mut(&mut self.half_edges);
    }
}

impl<C: HalfEdgeConfig> FaceMesh for HalfEdgeMesh<C> {
    const FACE_VERTEX_NUMBER: Option<usize> =
        <<C::Face as FaceConfig>::Arity as Arity>::VERTEX_NUMBER;

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
        match Self::FACE_VERTEX_NUMBER {
            Some(n) => n,
            None => self.face_half_edges(f).count(),
        }
    }

    fn try_face_vertex(&self, f: FaceHandle, i: usize) -> Option<VertexHandle> {
        self.half_edges.from(self.face_half_edge(f, i))
    }
}

impl<C: HalfEdgeConfig> FaceMeshMut for HalfEdgeMesh<C> {
    fn add_vertex(&mut self, coord: Coordinate) -> VertexHandle {
        HalfEdgeMesh::add_vertex(self, coord)
    }

    fn add_face(&mut self, vertices: &[VertexHandle]) -> Result<FaceHandle> {
        HalfEdgeMesh::add_face(self, vertices)
    }

    fn delete_face(&mut self, f: FaceHandle) {
        HalfEdgeMesh::delete_face(self, f)
    }
}

impl<C: HalfEdgeConfig> FaceAdjMesh for HalfEdgeMesh<C> {
    fn is_face_adjacency_enabled(&self) -> bool {
        true
    }

    fn adj_face(&self, f: FaceHandle, i: usize) -> Option<FaceHandle> {
        let he = self.face_half_edge(f, i);
        self.half_edges.twin(he).and_then(|t| self.half_edges.face(t))
    }
}
