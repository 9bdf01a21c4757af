//! Mesh data structures: elements, element containers and meshes.
//!
//! # Introduction
//!
//! A mesh is an aggregate of element containers: one for vertices, one for
//! faces and, depending on the mesh type, one for edges or half edges. Each
//! element is a composition of [components][crate::comp] whose presence is
//! configured at compile time. Elements refer to each other via typed
//! [handles][crate::handle], which are plain indices into the container of
//! the referenced kind.
//!
//! Deleting an element only sets its `deleted` flag. The storage (and all
//! references the element holds) stays around until the container is
//! *compacted*. Compacting renumbers the surviving elements (keeping their
//! order) and then rewrites every reference to the compacted kind, in every
//! component of every element of every container of the mesh. That walk is
//! implemented once, generically, on top of [`ElementContainers`] and the
//! reference visitors; no mesh type contains code specific to it.
//!
//!
//! # Available data structures
//!
//! | Name               | Face kind        | Face adjacency | Edges    |
//! | ------------------ | ---------------- | -------------- | -------- |
//! | [`Mesh`]           | *configurable*   | stored         | optional |
//! | [`HalfEdgeMesh`]   | *configurable*   | derived        | half     |
//!
//! Both implement the traits in [`traits`], which is what the topology
//! algorithms are written against.
//!
//!
//! # Compile time configurations
//!
//! Which components each element kind has is decided by a configuration
//! type implementing [`MeshConfig`] (or [`HalfEdgeConfig`]). To create your
//! own configuration, create a new enum type without any variants (e.g.
//! `enum MyConfig {}`) and implement the config traits for it. Ready-made
//! configurations live in [`configs`].

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use smallvec::SmallVec;

use crate::{
    comp::{ElementFlags, IndexRemap, RefVisitor, RefVisitorMut},
    handle::{ElementKind, Handle},
    sealed::Sealed,
};


#[cfg(test)]
#[macro_use]
pub(crate) mod tests;

pub mod configs;
pub mod container;
pub mod elements;
pub mod half_edge;
pub mod mesh_pos;
pub mod shared_vertex;
pub mod traits;

pub use self::{
    container::{Container, ContainerIter, Dense, IterPolicy, JumpDeleted},
    elements::{Edge, EdgeConfig, Face, FaceConfig, Vertex, VertexConfig},
    half_edge::{HalfEdge, HalfEdgeConfig, HalfEdgeMesh, HeFace},
    mesh_pos::MeshPos,
    shared_vertex::{Mesh, MeshConfig},
    traits::{
        ContainerVisitor, ContainerVisitorMut, ElementContainers, FaceAdjMesh,
        FaceAdjMeshMut, FaceMesh, FaceMeshMut,
    },
};


// ===========================================================================
// ===== Face arity
// ===========================================================================

/// The number of vertices of the faces of a mesh: [`Triangle`], [`Quad`] or
/// [`Polygon`].
///
/// Every per-face-vertex component (vertex references, adjacent faces,
/// adjacent edges, wedge texture coordinates, edge flags) is stored as
/// `Arity::List<T>`. As they all use the same list type, their cardinalities
/// cannot disagree.
///
/// This is a sealed trait, meaning you cannot implement it for your own types.
pub trait Arity: Sealed + 'static {
    /// The fixed number of vertices per face, `None` for polygons.
    const VERTEX_NUMBER: Option<usize>;

    type List<T: Copy + fmt::Debug>: FaceList<T>;
}

/// Only triangular faces.
#[allow(missing_debug_implementations)]
pub enum Triangle {}
impl Sealed for Triangle {}
impl Arity for Triangle {
    const VERTEX_NUMBER: Option<usize> = Some(3);
    type List<T: Copy + fmt::Debug> = [T; 3];
}

/// Only quadrilateral faces.
#[allow(missing_debug_implementations)]
pub enum Quad {}
impl Sealed for Quad {}
impl Arity for Quad {
    const VERTEX_NUMBER: Option<usize> = Some(4);
    type List<T: Copy + fmt::Debug> = [T; 4];
}

/// Faces with an arbitrary number of vertices.
#[allow(missing_debug_implementations)]
pub enum Polygon {}
impl Sealed for Polygon {}
impl Arity for Polygon {
    const VERTEX_NUMBER: Option<usize> = None;
    type List<T: Copy + fmt::Debug> = SmallVec<[T; 4]>;
}

/// Number of vertices a new face of arity `A` starts with.
pub(crate) fn initial_vertex_number<A: Arity>() -> usize {
    A::VERTEX_NUMBER.unwrap_or(0)
}

/// A list with one entry per vertex of a face.
pub trait FaceList<T>: Clone + fmt::Debug + AsRef<[T]> + AsMut<[T]> {
    /// Creates a list of `len` times `value`. Fixed size lists ignore `len`.
    fn filled(len: usize, value: T) -> Self;

    /// Changes the length. Returns `false` (and does nothing) if the list has
    /// a fixed size different from `len`.
    fn resize(&mut self, len: usize, value: T) -> bool;

    /// Inserts `value` at position `idx`. Returns `false` for fixed size
    /// lists.
    fn insert(&mut self, idx: usize, value: T) -> bool;

    /// Removes the value at position `idx`. Returns `false` for fixed size
    /// lists.
    fn remove(&mut self, idx: usize) -> bool;
}

impl<T: Copy + fmt::Debug, const N: usize> FaceList<T> for [T; N] {
    fn filled(_: usize, value: T) -> Self {
        [value; N]
    }

    fn resize(&mut self, len: usize, _: T) -> bool {
        len == N
    }

    fn insert(&mut self, _: usize, _: T) -> bool {
        false
    }

    fn remove(&mut self, _: usize) -> bool {
        false
    }
}

impl<T: Copy + fmt::Debug> FaceList<T> for SmallVec<[T; 4]> {
    fn filled(len: usize, value: T) -> Self {
        SmallVec::from_elem(value, len)
    }

    fn resize(&mut self, len: usize, value: T) -> bool {
        SmallVec::resize(self, len, value);
        true
    }

    fn insert(&mut self, idx: usize, value: T) -> bool {
        SmallVec::insert(self, idx, value);
        true
    }

    fn remove(&mut self, idx: usize) -> bool {
        SmallVec::remove(self, idx);
        true
    }
}


// ===========================================================================
// ===== Elements
// ===========================================================================

/// Identity of a mesh. Each container stores the identity of the mesh it
/// belongs to, which `algo::check` verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(u64);

impl MeshId {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        MeshId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A mesh element: vertex, face, edge or half edge.
pub trait Element: Sized + Clone + fmt::Debug + 'static {
    const KIND: ElementKind;

    /// The handle type referring to elements of this type.
    type Handle: Handle;

    /// Storage for the optional components of this element type, owned by
    /// the container.
    type Side: SideStorage<Self>;

    /// Bitset (see `ComponentKind::bit`) of the components stored inside
    /// every element, i.e. flags and all horizontal components.
    const INLINE_COMPONENTS: u32;

    /// Creates an element with all components in their empty state: null
    /// references, zero scalars.
    fn new() -> Self;

    fn flags(&self) -> &ElementFlags;
    fn flags_mut(&mut self) -> &mut ElementFlags;

    /// Passes all references stored inline in this element to the visitor.
    fn visit_refs<V: RefVisitor>(&self, v: &mut V);
    fn visit_refs_mut<V: RefVisitorMut>(&mut self, v: &mut V);

    fn is_deleted(&self) -> bool {
        self.flags().is_deleted()
    }
}

/// The side tables of all optional components of element type `E`.
///
/// Every enabled table has exactly one entry per element slot.
pub trait SideStorage<E>: Clone + fmt::Debug + Default {
    /// Appends the entries for a newly added element.
    fn push_for(&mut self, elem: &E);

    /// Drops the entries of removed slots.
    fn compact<H: Handle>(&mut self, remap: &IndexRemap<H>);

    fn truncate(&mut self, len: usize);

    /// Removes all entries, keeping enabled tables enabled.
    fn clear(&mut self);

    fn reserve(&mut self, additional: usize);

    /// Appends the entries of `other`. Tables enabled in `self` but not in
    /// `other` get initial values computed from `other_elements`.
    fn append(&mut self, other: &Self, other_elements: &[E]);

    /// Bitset (see `ComponentKind::bit`) of all currently enabled tables.
    fn enabled_components(&self) -> u32;

    /// Passes the references of slot `idx` to the visitor.
    fn visit_refs_at<V: RefVisitor>(&self, idx: usize, v: &mut V);

    fn visit_refs_mut<V: RefVisitorMut>(&mut self, v: &mut V);
}

/// Side storage of element types without optional components.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSide;

impl<E> SideStorage<E> for NoSide {
    fn push_for(&mut self, _: &E) {}
    fn compact<H: Handle>(&mut self, _: &IndexRemap<H>) {}
    fn truncate(&mut self, _: usize) {}
    fn clear(&mut self) {}
    fn reserve(&mut self, _: usize) {}
    fn append(&mut self, _: &Self, _: &[E]) {}
    fn enabled_components(&self) -> u32 {
        0
    }
    fn visit_refs_at<V: RefVisitor>(&self, _: usize, _: &mut V) {}
    fn visit_refs_mut<V: RefVisitorMut>(&mut self, _: &mut V) {}
}

// ===========================================================================
// ===== Handle iterators
// ===========================================================================

/// An iterator over the handles of the live elements of a container. Yields
/// handles with increasing index value.
#[derive(Debug, Clone)]
pub struct HandleIter<'a, E: Element> {
    inner: ContainerIter<'a, E, JumpDeleted>,
}

impl<'a, E: Element> HandleIter<'a, E> {
    pub(crate) fn new(inner: ContainerIter<'a, E, JumpDeleted>) -> Self {
        Self { inner }
    }
}

impl<E: Element> Iterator for HandleIter<'_, E> {
    type Item = E::Handle;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(h, _)| h)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<E: Element> DoubleEndedIterator for HandleIter<'_, E> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(h, _)| h)
    }
}
