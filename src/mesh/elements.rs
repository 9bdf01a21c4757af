//! The vertex, face and edge element types and their configurations.
//!
//! All components an element kind can have are fields of its struct. The
//! configuration decides (per component) whether the field actually stores
//! the value, whether the value lives in a side table of the container, or
//! whether the component does not exist.

use std::fmt;

use cgmath::{Point3, Vector3, Zero};
use optional::Optioned as Opt;

use crate::{
    comp::{
        inline_bit, Color, ComponentKind, ComponentMode, Coordinate, EdgeFlags, ElementFlags,
        FieldStorage, Mark, Normal, PresentMode, Quality, RefList, RefVisitor, RefVisitorMut, SideTable, Slot,
        TexCoord,
    },
    error::{Error, Result},
    handle::{EdgeHandle, ElementKind, FaceHandle, Handle, HalfEdgeHandle, VertexHandle},
};
use super::{initial_vertex_number, Arity, Container, Element, FaceList};


// ===========================================================================
// ===== Configurations
// ===========================================================================

/// Component configuration of [`Vertex`].
pub trait VertexConfig: 'static {
    type Normal: ComponentMode;
    type Color: ComponentMode;
    type Quality: ComponentMode;
    type TexCoord: ComponentMode;
    type Mark: ComponentMode;
    type AdjacentFaces: ComponentMode;
    type AdjacentVertices: ComponentMode;
    type AdjacentEdges: ComponentMode;

    /// One outgoing half edge. Only used by `HalfEdgeMesh`.
    type HalfEdge: ComponentMode;
}

/// Component configuration of [`Face`].
pub trait FaceConfig: 'static {
    /// Number of vertices per face.
    type Arity: Arity;

    type Normal: ComponentMode;
    type Color: ComponentMode;
    type Quality: ComponentMode;
    type Mark: ComponentMode;
    type AdjacentFaces: ComponentMode;
    type AdjacentEdges: ComponentMode;
    type WedgeTexCoords: ComponentMode;
}

/// Component configuration of [`Edge`].
pub trait EdgeConfig: 'static {
    type Color: ComponentMode;
    type Quality: ComponentMode;
    type Mark: ComponentMode;
    type AdjacentFaces: ComponentMode;
    type AdjacentEdges: ComponentMode;
}

/// A list with one entry per vertex of a face with configuration `C`.
pub type FaceVertexList<C, T> = <<C as FaceConfig>::Arity as Arity>::List<T>;


/// Implements `Clone` and `Debug` field by field, without bounds on the
/// configuration type.
macro_rules! element_boilerplate {
    ($elem:ident<$cfg:ident> { $($field:ident),* $(,)? }) => {
        impl<C: $cfg> Clone for $elem<C> {
            fn clone(&self) -> Self {
                Self {
                    $( $field: self.$field.clone(), )*
                }
            }
        }

        impl<C: $cfg> fmt::Debug for $elem<C> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.debug_struct(stringify!($elem))
                    $( .field(stringify!($field), &self.$field) )*
                    .finish()
            }
        }
    };
}

fn visit_field<H, S, V>(field: &S, component: ComponentKind, v: &mut V)
where
    H: Handle,
    S: FieldStorage<RefList<H>>,
    V: RefVisitor,
{
    if let Some(list) = field.get() {
        v.visit(component, &list[..]);
    }
}

fn visit_field_mut<H, S, V>(field: &mut S, component: ComponentKind, v: &mut V)
where
    H: Handle,
    S: FieldStorage<RefList<H>>,
    V: RefVisitorMut,
{
    if let Some(list) = field.get_mut() {
        v.visit_mut(component, &mut list[..]);
    }
}


// ===========================================================================
// ===== Vertex
// ===========================================================================

/// A vertex: a position plus the components enabled by `C`.
pub struct Vertex<C: VertexConfig> {
    pub(crate) flags: ElementFlags,
    pub(crate) coord: Coordinate,
    pub(crate) normal: Slot<C::Normal, Normal>,
    pub(crate) color: Slot<C::Color, Color>,
    pub(crate) quality: Slot<C::Quality, Quality>,
    pub(crate) tex_coord: Slot<C::TexCoord, TexCoord>,
    pub(crate) mark: Slot<C::Mark, Mark>,
    pub(crate) adj_faces: Slot<C::AdjacentFaces, RefList<FaceHandle>>,
    pub(crate) adj_vertices: Slot<C::AdjacentVertices, RefList<VertexHandle>>,
    pub(crate) adj_edges: Slot<C::AdjacentEdges, RefList<EdgeHandle>>,
    pub(crate) half_edge: Slot<C::HalfEdge, Opt<HalfEdgeHandle>>,
}

element_boilerplate!(Vertex<VertexConfig> {
    flags, coord, normal, color, quality, tex_coord, mark,
    adj_faces, adj_vertices, adj_edges, half_edge,
});

impl<C: VertexConfig> Element for Vertex<C> {
    const KIND: ElementKind = ElementKind::Vertex;
    type Handle = VertexHandle;
    type Side = VertexSide<C>;

    const INLINE_COMPONENTS: u32 = ComponentKind::Flags.bit()
        | ComponentKind::Coordinate.bit()
        | inline_bit::<C::Normal>(ComponentKind::Normal)
        | inline_bit::<C::Color>(ComponentKind::Color)
        | inline_bit::<C::Quality>(ComponentKind::Quality)
        | inline_bit::<C::TexCoord>(ComponentKind::TexCoord)
        | inline_bit::<C::Mark>(ComponentKind::Mark)
        | inline_bit::<C::AdjacentFaces>(ComponentKind::AdjacentFaces)
        | inline_bit::<C::AdjacentVertices>(ComponentKind::AdjacentVertices)
        | inline_bit::<C::AdjacentEdges>(ComponentKind::AdjacentEdges)
        | inline_bit::<C::HalfEdge>(ComponentKind::HalfEdgeReferences);

    fn new() -> Self {
        Self {
            flags: ElementFlags::default(),
            coord: Point3::new(0.0, 0.0, 0.0),
            normal: FieldStorage::from_value(Vector3::zero()),
            color: FieldStorage::from_value(Color::default()),
            quality: FieldStorage::from_value(0.0),
            tex_coord: FieldStorage::from_value(TexCoord::default()),
            mark: FieldStorage::from_value(0),
            adj_faces: FieldStorage::from_value(RefList::new()),
            adj_vertices: FieldStorage::from_value(RefList::new()),
            adj_edges: FieldStorage::from_value(RefList::new()),
            half_edge: FieldStorage::from_value(Opt::none()),
        }
    }

    fn flags(&self) -> &ElementFlags {
        &self.flags
    }

    fn flags_mut(&mut self) -> &mut ElementFlags {
        &mut self.flags
    }

    fn visit_refs<V: RefVisitor>(&self, v: &mut V) {
        visit_field(&self.adj_faces, ComponentKind::AdjacentFaces, v);
        visit_field(&self.adj_vertices, ComponentKind::AdjacentVertices, v);
        visit_field(&self.adj_edges, ComponentKind::AdjacentEdges, v);
        if let Some(he) = self.half_edge.get() {
            v.visit(ComponentKind::HalfEdgeReferences, std::slice::from_ref(he));
        }
    }

    fn visit_refs_mut<V: RefVisitorMut>(&mut self, v: &mut V) {
        visit_field_mut(&mut self.adj_faces, ComponentKind::AdjacentFaces, v);
        visit_field_mut(&mut self.adj_vertices, ComponentKind::AdjacentVertices, v);
        visit_field_mut(&mut self.adj_edges, ComponentKind::AdjacentEdges, v);
        if let Some(he) = self.half_edge.get_mut() {
            v.visit_mut(ComponentKind::HalfEdgeReferences, std::slice::from_mut(he));
        }
    }
}

side_storage! {
    /// Side tables of the optional vertex components.
    VertexSide<VertexConfig> for Vertex, |_v| {
        normal: Normal = Vector3::zero() => Normal,
        color: Color = Color::default() => Color,
        quality: Quality = 0.0 => Quality,
        tex_coord: TexCoord = TexCoord::default() => TexCoord,
        mark: Mark = 0 => Mark,
        adj_faces: RefList<FaceHandle> = RefList::new() => AdjacentFaces [refs],
        adj_vertices: RefList<VertexHandle> = RefList::new() => AdjacentVertices [refs],
        adj_edges: RefList<EdgeHandle> = RefList::new() => AdjacentEdges [refs],
    }
}

impl_component!(value Vertex<VertexConfig>, Normal, normal, Normal, Normal, _v => Vector3::zero());
impl_component!(value Vertex<VertexConfig>, Color, color, Color, Color, _v => Color::default());
impl_component!(value Vertex<VertexConfig>, Quality, quality, Quality, Quality, _v => 0.0);
impl_component!(
    value Vertex<VertexConfig>, TexCoord, tex_coord, TexCoord, TexCoord, _v => TexCoord::default()
);
impl_component!(value Vertex<VertexConfig>, Mark, mark, Mark, Mark, _v => 0);
impl_component!(
    list Vertex<VertexConfig>, AdjacentFaces, adj_faces, AdjacentFaces,
    [Opt<FaceHandle>], _v => RefList::new()
);
impl_component!(
    list Vertex<VertexConfig>, AdjacentVertices, adj_vertices, AdjacentVertices,
    [Opt<VertexHandle>], _v => RefList::new()
);
impl_component!(
    list Vertex<VertexConfig>, AdjacentEdges, adj_edges, AdjacentEdges,
    [Opt<EdgeHandle>], _v => RefList::new()
);

impl<C: VertexConfig> Container<Vertex<C>> {
    pub fn coord(&self, v: VertexHandle) -> &Coordinate {
        &self.elements[v.to_usize()].coord
    }

    pub fn coord_mut(&mut self, v: VertexHandle) -> &mut Coordinate {
        &mut self.elements[v.to_usize()].coord
    }

    pub fn set_coord(&mut self, v: VertexHandle, coord: Coordinate) {
        self.elements[v.to_usize()].coord = coord;
    }

    /// Positions of all slots, deleted ones included.
    pub fn coords(&self) -> impl Iterator<Item = &Coordinate> + '_ {
        self.elements.iter().map(|v| &v.coord)
    }

    /// Whether vertices currently store their adjacent faces, regardless of
    /// how that component is configured.
    pub(crate) fn tracks_adj_faces(&self) -> bool {
        <C::AdjacentFaces as ComponentMode>::PRESENT
            && (!<C::AdjacentFaces as ComponentMode>::OPTIONAL || self.side.adj_faces.is_enabled())
    }

    /// Removes `f` from the adjacent faces of `v` if vertices track them.
    pub(crate) fn forget_adj_face(&mut self, v: VertexHandle, f: FaceHandle) -> bool {
        let i = v.to_usize();
        let Container { elements, side, .. } = self;
        let list = match elements[i].adj_faces.get_mut() {
            Some(list) => Some(list),
            None => side.adj_faces.get_mut(i),
        };

        match list.and_then(|l| l.iter().position(|x| x.into_option() == Some(f)).map(|p| (l, p))) {
            Some((l, pos)) => {
                l.remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn half_edge(&self, v: VertexHandle) -> Option<HalfEdgeHandle> {
        self.elements[v.to_usize()].half_edge.get().and_then(|h| h.into_option())
    }

    pub(crate) fn set_half_edge(&mut self, v: VertexHandle, he: Option<HalfEdgeHandle>) {
        if let Some(slot) = self.elements[v.to_usize()].half_edge.get_mut() {
            *slot = Opt::from(he);
        }
    }
}

/// Generates `push_x`, `remove_x` and `clear_xs` for a reference list
/// component of vertices or edges.
macro_rules! ref_list_ops {
    (
        $elem:ident<$cfg:ident>, $name:ident, $field:ident, $handle:ident,
        $list:ident, $push:ident, $remove:ident, $clear:ident
    ) => {
        impl<C: $cfg> Container<$elem<C>>
        where
            C::$name: PresentMode,
        {
            fn $list(&mut self, h: <$elem<C> as Element>::Handle) -> Result<&mut RefList<$handle>> {
                let i = h.to_usize();
                let Container { elements, side, .. } = self;
                match elements[i].$field.get_mut() {
                    Some(list) => Ok(list),
                    None => side.$field.get_mut(i)
                        .ok_or_else(|| Error::missing(ElementKind::$elem, ComponentKind::$name)),
                }
            }

            /// Appends a reference to the list.
            pub fn $push(&mut self, h: <$elem<C> as Element>::Handle, r: $handle) -> Result<()> {
                self.$list(h)?.push(Opt::some(r));
                Ok(())
            }

            /// Removes the first occurrence of `r` from the list. Returns
            /// whether it was found.
            pub fn $remove(&mut self, h: <$elem<C> as Element>::Handle, r: $handle) -> Result<bool> {
                let list = self.$list(h)?;
                match list.iter().position(|x| x.into_option() == Some(r)) {
                    Some(pos) => {
                        list.remove(pos);
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }

            pub fn $clear(&mut self, h: <$elem<C> as Element>::Handle) -> Result<()> {
                self.$list(h)?.clear();
                Ok(())
            }
        }
    };
}

ref_list_ops!(
    Vertex<VertexConfig>, AdjacentFaces, adj_faces, FaceHandle,
    adj_face_list, push_adj_face, remove_adj_face, clear_adj_faces
);
ref_list_ops!(
    Vertex<VertexConfig>, AdjacentVertices, adj_vertices, VertexHandle,
    adj_vertex_list, push_adj_vertex, remove_adj_vertex, clear_adj_vertices
);
ref_list_ops!(
    Vertex<VertexConfig>, AdjacentEdges, adj_edges, EdgeHandle,
    adj_edge_list, push_adj_edge, remove_adj_edge, clear_adj_edges
);


// ===========================================================================
// ===== Face
// ===========================================================================

/// A face: an ordered list of vertex references plus the components enabled
/// by `C`.
///
/// The vertex references, the per edge flags and all per face vertex
/// components (adjacent faces, adjacent edges, wedge texture coordinates)
/// always have the same length: entry `i` belongs to the edge from vertex
/// `i` to vertex `i + 1 (mod n)`.
pub struct Face<C: FaceConfig> {
    pub(crate) flags: ElementFlags,
    pub(crate) vertices: FaceVertexList<C, Opt<VertexHandle>>,
    pub(crate) edge_flags: FaceVertexList<C, EdgeFlags>,
    pub(crate) normal: Slot<C::Normal, Normal>,
    pub(crate) color: Slot<C::Color, Color>,
    pub(crate) quality: Slot<C::Quality, Quality>,
    pub(crate) mark: Slot<C::Mark, Mark>,
    pub(crate) adj_faces: Slot<C::AdjacentFaces, FaceVertexList<C, Opt<FaceHandle>>>,
    pub(crate) adj_edges: Slot<C::AdjacentEdges, FaceVertexList<C, Opt<EdgeHandle>>>,
    pub(crate) wedge_tex_coords: Slot<C::WedgeTexCoords, FaceVertexList<C, TexCoord>>,
}

element_boilerplate!(Face<FaceConfig> {
    flags, vertices, edge_flags, normal, color, quality, mark,
    adj_faces, adj_edges, wedge_tex_coords,
});

impl<C: FaceConfig> Face<C> {
    fn vertex_number(&self) -> usize {
        self.vertices.as_ref().len()
    }
}

impl<C: FaceConfig> Element for Face<C> {
    const KIND: ElementKind = ElementKind::Face;
    type Handle = FaceHandle;
    type Side = FaceSide<C>;

    const INLINE_COMPONENTS: u32 = ComponentKind::Flags.bit()
        | ComponentKind::VertexReferences.bit()
        | inline_bit::<C::Normal>(ComponentKind::Normal)
        | inline_bit::<C::Color>(ComponentKind::Color)
        | inline_bit::<C::Quality>(ComponentKind::Quality)
        | inline_bit::<C::Mark>(ComponentKind::Mark)
        | inline_bit::<C::AdjacentFaces>(ComponentKind::AdjacentFaces)
        | inline_bit::<C::AdjacentEdges>(ComponentKind::AdjacentEdges)
        | inline_bit::<C::WedgeTexCoords>(ComponentKind::WedgeTexCoords);

    fn new() -> Self {
        let n = initial_vertex_number::<C::Arity>();
        Self {
            flags: ElementFlags::default(),
            vertices: FaceList::filled(n, Opt::none()),
            edge_flags: FaceList::filled(n, EdgeFlags::default()),
            normal: FieldStorage::from_value(Vector3::zero()),
            color: FieldStorage::from_value(Color::default()),
            quality: FieldStorage::from_value(0.0),
            mark: FieldStorage::from_value(0),
            adj_faces: FieldStorage::from_value(FaceList::filled(n, Opt::none())),
            adj_edges: FieldStorage::from_value(FaceList::filled(n, Opt::none())),
            wedge_tex_coords: FieldStorage::from_value(FaceList::filled(n, TexCoord::default())),
        }
    }

    fn flags(&self) -> &ElementFlags {
        &self.flags
    }

    fn flags_mut(&mut self) -> &mut ElementFlags {
        &mut self.flags
    }

    fn visit_refs<V: RefVisitor>(&self, v: &mut V) {
        v.visit(ComponentKind::VertexReferences, self.vertices.as_ref());
        if let Some(list) = self.adj_faces.get() {
            v.visit(ComponentKind::AdjacentFaces, list.as_ref());
        }
        if let Some(list) = self.adj_edges.get() {
            v.visit(ComponentKind::AdjacentEdges, list.as_ref());
        }
    }

    fn visit_refs_mut<V: RefVisitorMut>(&mut self, v: &mut V) {
        v.visit_mut(ComponentKind::VertexReferences, self.vertices.as_mut());
        if let Some(list) = self.adj_faces.get_mut() {
            v.visit_mut(ComponentKind::AdjacentFaces, list.as_mut());
        }
        if let Some(list) = self.adj_edges.get_mut() {
            v.visit_mut(ComponentKind::AdjacentEdges, list.as_mut());
        }
    }
}

side_storage! {
    /// Side tables of the optional face components.
    FaceSide<FaceConfig> for Face, |f| {
        normal: Normal = Vector3::zero() => Normal,
        color: Color = Color::default() => Color,
        quality: Quality = 0.0 => Quality,
        mark: Mark = 0 => Mark,
        adj_faces: FaceVertexList<C, Opt<FaceHandle>>
            = FaceList::filled(f.vertex_number(), Opt::none()) => AdjacentFaces [refs],
        adj_edges: FaceVertexList<C, Opt<EdgeHandle>>
            = FaceList::filled(f.vertex_number(), Opt::none()) => AdjacentEdges [refs],
        wedge_tex_coords: FaceVertexList<C, TexCoord>
            = FaceList::filled(f.vertex_number(), TexCoord::default()) => WedgeTexCoords,
    }
}

impl_component!(value Face<FaceConfig>, Normal, normal, Normal, Normal, _f => Vector3::zero());
impl_component!(value Face<FaceConfig>, Color, color, Color, Color, _f => Color::default());
impl_component!(value Face<FaceConfig>, Quality, quality, Quality, Quality, _f => 0.0);
impl_component!(value Face<FaceConfig>, Mark, mark, Mark, Mark, _f => 0);
impl_component!(
    list Face<FaceConfig>, AdjacentFaces, adj_faces, AdjacentFaces,
    [Opt<FaceHandle>], f => FaceList::filled(f.vertex_number(), Opt::none())
);
impl_component!(
    list Face<FaceConfig>, AdjacentEdges, adj_edges, AdjacentEdges,
    [Opt<EdgeHandle>], f => FaceList::filled(f.vertex_number(), Opt::none())
);
impl_component!(
    list Face<FaceConfig>, WedgeTexCoords, wedge_tex_coords, WedgeTexCoords,
    [TexCoord], f => FaceList::filled(f.vertex_number(), TexCoord::default())
);

fn resize_tied<T, L, S>(field: &mut S, table: &mut SideTable<L>, idx: usize, len: usize, value: T)
where
    T: Copy,
    L: FaceList<T>,
    S: FieldStorage<L>,
{
    if let Some(list) = field.get_mut() {
        list.resize(len, value);
    }
    if let Some(list) = table.get_mut(idx) {
        list.resize(len, value);
    }
}

impl<C: FaceConfig> Container<Face<C>> {
    /// Number of vertices of face `f`.
    pub fn vertex_number(&self, f: FaceHandle) -> usize {
        self.elements[f.to_usize()].vertex_number()
    }

    /// The vertex references of `f`. Entries are null only while a face is
    /// being built.
    pub fn vertices(&self, f: FaceHandle) -> &[Opt<VertexHandle>] {
        self.elements[f.to_usize()].vertices.as_ref()
    }

    /// The `i`-th vertex of `f`.
    pub fn vertex(&self, f: FaceHandle, i: usize) -> Option<VertexHandle> {
        self.vertices(f)[i].into_option()
    }

    /// The vertex at position `i` modulo the vertex number. Negative values
    /// count backwards. `None` for faces without vertices.
    pub fn vertex_mod(&self, f: FaceHandle, i: isize) -> Option<VertexHandle> {
        let n = self.vertex_number(f) as isize;
        if n == 0 {
            return None;
        }
        self.vertex(f, i.rem_euclid(n) as usize)
    }

    pub fn set_vertex(&mut self, f: FaceHandle, i: usize, v: VertexHandle) {
        self.elements[f.to_usize()].vertices.as_mut()[i] = Opt::some(v);
    }

    /// Position of `v` in the vertex list of `f`.
    pub fn index_of_vertex(&self, f: FaceHandle, v: VertexHandle) -> Option<usize> {
        self.vertices(f).iter().position(|x| x.into_option() == Some(v))
    }

    /// The edge index `i` such that the edge from vertex `i` to `i + 1`
    /// connects `v0` and `v1` (in any direction).
    pub fn index_of_edge(&self, f: FaceHandle, v0: VertexHandle, v1: VertexHandle) -> Option<usize> {
        let n = self.vertex_number(f);
        (0..n).find(|&i| {
            let a = self.vertex(f, i);
            let b = self.vertex(f, (i + 1) % n);
            (a == Some(v0) && b == Some(v1)) || (a == Some(v1) && b == Some(v0))
        })
    }

    pub fn edge_flags(&self, f: FaceHandle, i: usize) -> EdgeFlags {
        self.elements[f.to_usize()].edge_flags.as_ref()[i]
    }

    pub fn edge_flags_mut(&mut self, f: FaceHandle, i: usize) -> &mut EdgeFlags {
        &mut self.elements[f.to_usize()].edge_flags.as_mut()[i]
    }

    /// Changes the number of vertices of `f`, resizing every per face vertex
    /// list (stored inline or in side tables) along with it. New entries are
    /// null or default.
    pub(crate) fn resize_vertices(&mut self, f: FaceHandle, len: usize) -> Result<()> {
        let i = f.to_usize();
        let Container { elements, side, .. } = self;
        let face = &mut elements[i];
        if !face.vertices.resize(len, Opt::none()) {
            return Err(Error::WrongSize(format!(
                "faces of this mesh have {} vertices, not {}",
                face.vertex_number(),
                len,
            )));
        }

        face.edge_flags.resize(len, EdgeFlags::default());
        resize_tied(&mut face.adj_faces, &mut side.adj_faces, i, len, Opt::<FaceHandle>::none());
        resize_tied(&mut face.adj_edges, &mut side.adj_edges, i, len, Opt::<EdgeHandle>::none());
        resize_tied(&mut face.wedge_tex_coords, &mut side.wedge_tex_coords, i, len, TexCoord::default());
        Ok(())
    }
}

impl<C: FaceConfig> Container<Face<C>>
where
    C::AdjacentFaces: PresentMode,
{
    /// The face adjacent to `f` across edge `i`, `None` on border edges.
    pub fn adj_face(&self, f: FaceHandle, i: usize) -> Result<Option<FaceHandle>> {
        Ok(self.adj_faces(f)?[i].into_option())
    }

    pub fn set_adj_face(&mut self, f: FaceHandle, i: usize, adj: Option<FaceHandle>) -> Result<()> {
        self.adj_faces_mut(f)?[i] = Opt::from(adj);
        Ok(())
    }

    /// The edge index at which `f` stores `adj` as adjacent face.
    pub fn index_of_adj_face(&self, f: FaceHandle, adj: FaceHandle) -> Result<Option<usize>> {
        Ok(self.adj_faces(f)?.iter().position(|x| x.into_option() == Some(adj)))
    }
}


// ===========================================================================
// ===== Edge
// ===========================================================================

/// An explicit edge between two vertices.
pub struct Edge<C: EdgeConfig> {
    pub(crate) flags: ElementFlags,
    pub(crate) vertices: [Opt<VertexHandle>; 2],
    pub(crate) color: Slot<C::Color, Color>,
    pub(crate) quality: Slot<C::Quality, Quality>,
    pub(crate) mark: Slot<C::Mark, Mark>,
    pub(crate) adj_faces: Slot<C::AdjacentFaces, RefList<FaceHandle>>,
    pub(crate) adj_edges: Slot<C::AdjacentEdges, RefList<EdgeHandle>>,
}

element_boilerplate!(Edge<EdgeConfig> {
    flags, vertices, color, quality, mark, adj_faces, adj_edges,
});

impl<C: EdgeConfig> Element for Edge<C> {
    const KIND: ElementKind = ElementKind::Edge;
    type Handle = EdgeHandle;
    type Side = EdgeSide<C>;

    const INLINE_COMPONENTS: u32 = ComponentKind::Flags.bit()
        | ComponentKind::VertexReferences.bit()
        | inline_bit::<C::Color>(ComponentKind::Color)
        | inline_bit::<C::Quality>(ComponentKind::Quality)
        | inline_bit::<C::Mark>(ComponentKind::Mark)
        | inline_bit::<C::AdjacentFaces>(ComponentKind::AdjacentFaces)
        | inline_bit::<C::AdjacentEdges>(ComponentKind::AdjacentEdges);

    fn new() -> Self {
        Self {
            flags: ElementFlags::default(),
            vertices: [Opt::none(); 2],
            color: FieldStorage::from_value(Color::default()),
            quality: FieldStorage::from_value(0.0),
            mark: FieldStorage::from_value(0),
            adj_faces: FieldStorage::from_value(RefList::new()),
            adj_edges: FieldStorage::from_value(RefList::new()),
        }
    }

    fn flags(&self) -> &ElementFlags {
        &self.flags
    }

    fn flags_mut(&mut self) -> &mut ElementFlags {
        &mut self.flags
    }

    fn visit_refs<V: RefVisitor>(&self, v: &mut V) {
        v.visit(ComponentKind::VertexReferences, &self.vertices);
        visit_field(&self.adj_faces, ComponentKind::AdjacentFaces, v);
        visit_field(&self.adj_edges, ComponentKind::AdjacentEdges, v);
    }

    fn visit_refs_mut<V: RefVisitorMut>(&mut self, v: &mut V) {
        v.visit_mut(ComponentKind::VertexReferences, &mut self.vertices);
        visit_field_mut(&mut self.adj_faces, ComponentKind::AdjacentFaces, v);
        visit_field_mut(&mut self.adj_edges, ComponentKind::AdjacentEdges, v);
    }
}

side_storage! {
    /// Side tables of the optional edge components.
    EdgeSide<EdgeConfig> for Edge, |_e| {
        color: Color = Color::default() => Color,
        quality: Quality = 0.0 => Quality,
        mark: Mark = 0 => Mark,
        adj_faces: RefList<FaceHandle> = RefList::new() => AdjacentFaces [refs],
        adj_edges: RefList<EdgeHandle> = RefList::new() => AdjacentEdges [refs],
    }
}

impl_component!(value Edge<EdgeConfig>, Color, color, Color, Color, _e => Color::default());
impl_component!(value Edge<EdgeConfig>, Quality, quality, Quality, Quality, _e => 0.0);
impl_component!(value Edge<EdgeConfig>, Mark, mark, Mark, Mark, _e => 0);
impl_component!(
    list Edge<EdgeConfig>, AdjacentFaces, adj_faces, AdjacentFaces,
    [Opt<FaceHandle>], _e => RefList::new()
);
impl_component!(
    list Edge<EdgeConfig>, AdjacentEdges, adj_edges, AdjacentEdges,
    [Opt<EdgeHandle>], _e => RefList::new()
);

ref_list_ops!(
    Edge<EdgeConfig>, AdjacentFaces, adj_faces, FaceHandle,
    adj_face_list, push_adj_face, remove_adj_face, clear_adj_faces
);
ref_list_ops!(
    Edge<EdgeConfig>, AdjacentEdges, adj_edges, EdgeHandle,
    adj_edge_list, push_adj_edge, remove_adj_edge, clear_adj_edges
);

impl<C: EdgeConfig> Container<Edge<C>> {
    /// The two endpoints of `e`.
    pub fn endpoints(&self, e: EdgeHandle) -> [Option<VertexHandle>; 2] {
        let [a, b] = self.elements[e.to_usize()].vertices;
        [a.into_option(), b.into_option()]
    }

    pub fn set_endpoints(&mut self, e: EdgeHandle, a: VertexHandle, b: VertexHandle) {
        self.elements[e.to_usize()].vertices = [Opt::some(a), Opt::some(b)];
    }
}


#[cfg(test)]
mod tests {
    use crate::{
        comp::{Absent, Horizontal, Optional},
        mesh::{MeshId, Polygon, Triangle},
    };
    use super::*;

    enum TestVertex {}
    impl VertexConfig for TestVertex {
        type Normal = Horizontal;
        type Color = Optional;
        type Quality = Absent;
        type TexCoord = Absent;
        type Mark = Horizontal;
        type AdjacentFaces = Optional;
        type AdjacentVertices = Absent;
        type AdjacentEdges = Absent;
        type HalfEdge = Absent;
    }

    enum TestFace {}
    impl FaceConfig for TestFace {
        type Arity = Polygon;
        type Normal = Absent;
        type Color = Absent;
        type Quality = Optional;
        type Mark = Absent;
        type AdjacentFaces = Optional;
        type AdjacentEdges = Absent;
        type WedgeTexCoords = Horizontal;
    }

    enum TriFace {}
    impl FaceConfig for TriFace {
        type Arity = Triangle;
        type Normal = Absent;
        type Color = Absent;
        type Quality = Absent;
        type Mark = Absent;
        type AdjacentFaces = Horizontal;
        type AdjacentEdges = Absent;
        type WedgeTexCoords = Absent;
    }

    #[test]
    fn optional_component_gating() {
        let mut c = Container::<Vertex<TestVertex>>::new(MeshId::fresh());
        let v = c.add();

        assert!(c.is_normal_enabled());
        assert!(!c.is_color_enabled());
        assert!(matches!(
            c.color(v),
            Err(Error::MissingComponent { element: ElementKind::Vertex, component: ComponentKind::Color })
        ));

        c.enable_color();
        assert!(c.is_color_enabled());
        *c.color_mut(v).unwrap() = Color::BLACK;
        let w = c.add();
        assert_eq!(*c.color(v).unwrap(), Color::BLACK);
        assert_eq!(*c.color(w).unwrap(), Color::WHITE);

        c.disable_color();
        assert!(c.color(v).is_err());
        assert_eq!(c.enabled_components(), 0);
    }

    #[test]
    fn vertex_adjacency_lists() {
        let mut c = Container::<Vertex<TestVertex>>::new(MeshId::fresh());
        let v = c.add();
        let f0 = FaceHandle::new(0);
        let f1 = FaceHandle::new(1);

        assert!(c.push_adj_face(v, f0).is_err());
        c.enable_adj_faces();
        c.push_adj_face(v, f0).unwrap();
        c.push_adj_face(v, f1).unwrap();
        assert!(c.remove_adj_face(v, f0).unwrap());
        assert!(!c.remove_adj_face(v, f0).unwrap());
        assert_eq!(c.adj_faces(v).unwrap(), &[Opt::some(f1)]);
    }

    #[test]
    fn tied_lists_follow_vertex_number() {
        let mut c = Container::<Face<TestFace>>::new(MeshId::fresh());
        let f = c.add();
        assert_eq!(c.vertex_number(f), 0);

        c.enable_adj_faces();
        c.resize_vertices(f, 5).unwrap();
        assert_eq!(c.vertex_number(f), 5);
        assert_eq!(c.adj_faces(f).unwrap().len(), 5);
        assert_eq!(c.wedge_tex_coords(f).unwrap().len(), 5);

        c.resize_vertices(f, 4).unwrap();
        assert_eq!(c.adj_faces(f).unwrap().len(), 4);

        // Enabling after the fact sizes the new table per face.
        c.enable_quality();
        let g = c.add();
        c.resize_vertices(g, 3).unwrap();
        assert_eq!(c.adj_faces(g).unwrap().len(), 3);
    }

    #[test]
    fn fixed_arity_rejects_resize() {
        let mut c = Container::<Face<TriFace>>::new(MeshId::fresh());
        let f = c.add();
        assert_eq!(c.vertex_number(f), 3);
        assert!(c.resize_vertices(f, 3).is_ok());
        assert!(matches!(c.resize_vertices(f, 4), Err(Error::WrongSize(_))));
    }

    #[test]
    fn face_vertex_queries() {
        let mut c = Container::<Face<TriFace>>::new(MeshId::fresh());
        let f = c.add();
        let [a, b, d] = [VertexHandle::new(4), VertexHandle::new(7), VertexHandle::new(9)];
        c.set_vertex(f, 0, a);
        c.set_vertex(f, 1, b);
        c.set_vertex(f, 2, d);

        assert_eq!(c.vertex_mod(f, -1), Some(d));
        assert_eq!(c.vertex_mod(f, 4), Some(b));
        assert_eq!(c.index_of_vertex(f, d), Some(2));
        assert_eq!(c.index_of_edge(f, a, d), Some(2));
        assert_eq!(c.index_of_edge(f, b, a), Some(0));
        assert_eq!(c.adj_face(f, 1).unwrap(), None);
    }

    #[test]
    fn delete_and_compact_keeps_side_tables_in_sync() {
        let mut c = Container::<Vertex<TestVertex>>::new(MeshId::fresh());
        c.enable_color();
        let handles = (0..4).map(|_| c.add()).collect::<Vec<_>>();
        for (i, &v) in handles.iter().enumerate() {
            *c.color_mut(v).unwrap() = Color::rgb(i as u8, 0, 0);
            *c.mark_mut(v).unwrap() = i as i32;
        }

        c.delete(handles[1]);
        assert_eq!(c.num_elements(), 3);
        assert_eq!(c.index_if_compact(handles[3]), Some(VertexHandle::new(2)));

        let remap = c.compact();
        assert_eq!(remap.get(handles[2]), Some(VertexHandle::new(1)));
        assert_eq!(c.container_size(), 3);
        assert_eq!(c.color(VertexHandle::new(1)).unwrap().r, 2);
        assert_eq!(*c.mark(VertexHandle::new(2)).unwrap(), 3);
    }
}
