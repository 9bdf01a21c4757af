//! Traits abstracting over the mesh data structures.
//!
//! The topology algorithms in [`crate::algo`] are written against these
//! traits, so they work with both [`Mesh`][super::Mesh] and
//! [`HalfEdgeMesh`][super::HalfEdgeMesh].

use std::fmt;

use crate::{
    comp::{ComponentKind, Coordinate, IndexRemap},
    comp::refs::{Nullify, Remap, Shift},
    error::{Error, Result},
    handle::{hsize, ElementKind, FaceHandle, Handle, VertexHandle},
};
use super::{Container, Element, MeshId};


// ===========================================================================
// ===== Generic access to all containers
// ===========================================================================

/// Visits containers of a mesh, one element kind after another.
pub trait ContainerVisitor {
    fn visit<E: Element>(&mut self, container: &Container<E>);
}

/// Like [`ContainerVisitor`], but with mutable access.
pub trait ContainerVisitorMut {
    fn visit_mut<E: Element>(&mut self, container: &mut Container<E>);
}

/// Meshes: aggregates of element containers.
///
/// This is all the generic reference rewriting and checking code needs to
/// know about a mesh type.
pub trait ElementContainers {
    fn mesh_id(&self) -> MeshId;

    /// Calls `v.visit` once for every container of this mesh.
    fn visit_containers<V: ContainerVisitor>(&self, v: &mut V);

    /// Calls `v.visit_mut` once for every container of this mesh.
    fn visit_containers_mut<V: ContainerVisitorMut>(&mut self, v: &mut V);
}

/// The size of the container of each element kind, indexed by
/// `ElementKind::index`. `None` for kinds the mesh has no container for.
pub fn container_sizes<M: ElementContainers + ?Sized>(mesh: &M) -> [Option<usize>; 4] {
    struct Sizes([Option<usize>; 4]);

    impl ContainerVisitor for Sizes {
        fn visit<E: Element>(&mut self, container: &Container<E>) {
            self.0[E::KIND.index()] = Some(container.container_size());
        }
    }

    let mut sizes = Sizes([None; 4]);
    mesh.visit_containers(&mut sizes);
    sizes.0
}

struct ApplyMut<V>(V);

impl<V: crate::comp::RefVisitorMut> ContainerVisitorMut for ApplyMut<V> {
    fn visit_mut<E: Element>(&mut self, container: &mut Container<E>) {
        container.visit_refs_mut(&mut self.0);
    }
}

/// Rewrites every reference to kind `H::KIND` in every container according
/// to `remap`.
pub(crate) fn remap_references<M, H>(mesh: &mut M, remap: &IndexRemap<H>)
where
    M: ElementContainers + ?Sized,
    H: Handle,
{
    mesh.visit_containers_mut(&mut ApplyMut(Remap(remap)));
}

/// Sets every reference to elements of `kind` to null.
pub(crate) fn nullify_references<M: ElementContainers + ?Sized>(mesh: &mut M, kind: ElementKind) {
    mesh.visit_containers_mut(&mut ApplyMut(Nullify(kind)));
}

/// Adds `offsets[kind]` to every reference to elements of `kind`.
pub(crate) fn shift_references<M: ElementContainers + ?Sized>(mesh: &mut M, offsets: [hsize; 4]) {
    mesh.visit_containers_mut(&mut ApplyMut(Shift(offsets)));
}

/// Sets the owner of every container to the mesh's id.
pub(crate) fn adopt_containers<M: ElementContainers + ?Sized>(mesh: &mut M) {
    struct Adopt(MeshId);

    impl ContainerVisitorMut for Adopt {
        fn visit_mut<E: Element>(&mut self, container: &mut Container<E>) {
            container.set_owner(self.0);
        }
    }

    let id = mesh.mesh_id();
    mesh.visit_containers_mut(&mut Adopt(id));
}


// ===========================================================================
// ===== Topology
// ===========================================================================

/// A mesh with vertices and faces, where each face is a cyclic sequence of
/// vertices.
///
/// Edge `i` of face `f` is the edge from `face_vertex(f, i)` to
/// `face_vertex_mod(f, i + 1)`.
pub trait FaceMesh: ElementContainers + fmt::Debug {
    /// The number of vertices all faces have, `None` if faces can be
    /// arbitrary polygons.
    const FACE_VERTEX_NUMBER: Option<usize>;

    /// Number of live vertices.
    fn num_vertices(&self) -> usize;

    /// Number of live faces.
    fn num_faces(&self) -> usize;

    /// Number of vertex slots, deleted ones included.
    fn vertex_container_size(&self) -> usize;

    /// Number of face slots, deleted ones included.
    fn face_container_size(&self) -> usize;

    fn is_vertex_deleted(&self, v: VertexHandle) -> bool;
    fn is_face_deleted(&self, f: FaceHandle) -> bool;

    fn vertex_position(&self, v: VertexHandle) -> &Coordinate;

    fn face_vertex_number(&self, f: FaceHandle) -> usize;

    /// The `i`-th vertex of `f`, `None` if the reference is null. References
    /// are null in faces that were created empty and not filled yet, and
    /// after compaction removed the vertex they pointed to.
    ///
    /// Panics if `i` is out of bounds.
    fn try_face_vertex(&self, f: FaceHandle, i: usize) -> Option<VertexHandle>;

    /// The `i`-th vertex of `f`.
    ///
    /// # Panics
    ///
    /// If `i` is out of bounds or the reference is null.
    fn face_vertex(&self, f: FaceHandle, i: usize) -> VertexHandle {
        match self.try_face_vertex(f, i) {
            Some(v) => v,
            None => panic!("vertex {} of face {:?} is null", i, f),
        }
    }

    /// Like `try_face_vertex`, but `i` is taken modulo the vertex number of
    /// `f`. Negative values count backwards. `None` for faces without
    /// vertices.
    fn try_face_vertex_mod(&self, f: FaceHandle, i: isize) -> Option<VertexHandle> {
        let n = self.face_vertex_number(f) as isize;
        if n == 0 {
            return None;
        }
        self.try_face_vertex(f, i.rem_euclid(n) as usize)
    }

    /// Like `face_vertex`, but `i` is taken modulo the vertex number of `f`.
    /// Negative values count backwards.
    ///
    /// # Panics
    ///
    /// If `f` has no vertices or the reference is null.
    fn face_vertex_mod(&self, f: FaceHandle, i: isize) -> VertexHandle {
        match self.try_face_vertex_mod(f, i) {
            Some(v) => v,
            None => panic!(
                "vertex {} (modulo {}) of face {:?} is null",
                i,
                self.face_vertex_number(f),
                f,
            ),
        }
    }

    /// All vertices of `f` in order. Panics like `face_vertex` on null
    /// references.
    fn face_vertices(&self, f: FaceHandle) -> impl Iterator<Item = VertexHandle> + '_ {
        (0..self.face_vertex_number(f)).map(move |i| self.face_vertex(f, i))
    }

    /// The endpoints of edge `i` of `f`, `None` if one of them is null.
    fn face_edge_vertices(&self, f: FaceHandle, i: usize) -> Option<(VertexHandle, VertexHandle)> {
        let a = self.try_face_vertex(f, i)?;
        let b = self.try_face_vertex_mod(f, i as isize + 1)?;
        Some((a, b))
    }

    /// Position of `v` in the vertex list of `f`.
    fn index_of_vertex(&self, f: FaceHandle, v: VertexHandle) -> Option<usize> {
        (0..self.face_vertex_number(f)).find(|&i| self.try_face_vertex(f, i) == Some(v))
    }

    /// The edge index of `f` whose endpoints are `v0` and `v1` (in any
    /// order).
    fn index_of_edge(&self, f: FaceHandle, v0: VertexHandle, v1: VertexHandle) -> Option<usize> {
        (0..self.face_vertex_number(f)).find(|&i| {
            self.face_edge_vertices(f, i)
                .map_or(false, |(a, b)| (a == v0 && b == v1) || (a == v1 && b == v0))
        })
    }

    /// Handles of all live vertices in increasing order.
    fn vertex_handles(&self) -> impl Iterator<Item = VertexHandle> + '_ {
        (0..self.vertex_container_size())
            .map(VertexHandle::from_usize)
            .filter(move |&v| !self.is_vertex_deleted(v))
    }

    /// Handles of all live faces in increasing order.
    fn face_handles(&self) -> impl Iterator<Item = FaceHandle> + '_ {
        (0..self.face_container_size())
            .map(FaceHandle::from_usize)
            .filter(move |&f| !self.is_face_deleted(f))
    }
}

/// Meshes faces can be added to and deleted from.
///
/// This is the construction interface shared by all mesh types; importers
/// and the builders in [`crate::shape`] are written against it.
pub trait FaceMeshMut: FaceMesh + Default {
    fn add_vertex(&mut self, coord: Coordinate) -> VertexHandle;

    /// Adds a face with the given vertices (counter clockwise). Nothing is
    /// added if an error is returned.
    fn add_face(&mut self, vertices: &[VertexHandle]) -> Result<FaceHandle>;

    /// Marks `f` as deleted. References to it are only removed on compaction.
    fn delete_face(&mut self, f: FaceHandle);
}

/// Meshes that can tell, for every edge of every face, which face lies on
/// the other side.
///
/// For [`Mesh`][super::Mesh], this is the (possibly optional) adjacent faces
/// component; for [`HalfEdgeMesh`][super::HalfEdgeMesh], it is derived from
/// the twin half edges.
///
/// On non-manifold edges (more than two incident faces), the faces around
/// the edge form a ring: every face points to the next one. The relation is
/// then not symmetric.
pub trait FaceAdjMesh: FaceMesh {
    /// Whether the adjacency information can currently be accessed.
    fn is_face_adjacency_enabled(&self) -> bool;

    /// Returns `Error::MissingComponent` if the face adjacency is disabled.
    fn require_face_adjacency(&self) -> Result<()> {
        if self.is_face_adjacency_enabled() {
            Ok(())
        } else {
            Err(Error::missing(ElementKind::Face, ComponentKind::AdjacentFaces))
        }
    }

    /// The face across edge `i` of `f`, `None` for border edges.
    ///
    /// Must only be called while `is_face_adjacency_enabled` returns `true`;
    /// otherwise all edges look like border edges.
    fn adj_face(&self, f: FaceHandle, i: usize) -> Option<FaceHandle>;

    /// The edge index at which `f` stores `adj` as adjacent face.
    fn index_of_adj_face(&self, f: FaceHandle, adj: FaceHandle) -> Option<usize> {
        (0..self.face_vertex_number(f)).find(|&i| self.adj_face(f, i) == Some(adj))
    }
}

/// Meshes whose face adjacency can be edited directly.
pub trait FaceAdjMeshMut: FaceAdjMesh {
    fn set_adj_face(&mut self, f: FaceHandle, i: usize, adj: Option<FaceHandle>);

    /// Whether vertices currently track their adjacent faces.
    fn is_vertex_face_adjacency_enabled(&self) -> bool;

    /// Removes `f` from the adjacent faces of `v`. Returns `false` if `f` was
    /// not found or vertices do not track adjacent faces.
    fn remove_vertex_adj_face(&mut self, v: VertexHandle, f: FaceHandle) -> bool;
}
