//! A cursor for walking over the surface of a mesh.

use fxhash::FxHashSet;

use crate::handle::{FaceHandle, VertexHandle};
use super::FaceAdjMesh;


/// A position on a mesh: a face, one of its edges and one endpoint of that
/// edge.
///
/// `MeshPos` is a plain value; all moves take the mesh as argument. Three
/// elementary moves each change one part of the triple while keeping the
/// other two:
///
/// - [`flip_face`][MeshPos::flip_face]: go to the face on the other side of
///   the edge,
/// - [`flip_edge`][MeshPos::flip_edge]: go to the other edge of the face
///   touching the vertex,
/// - [`flip_vertex`][MeshPos::flip_vertex]: go to the other endpoint of the
///   edge.
///
/// Combining them allows walking around a vertex or along a border. All
/// moves need face adjacency information.
///
/// Positions are ordered by face, then edge, then vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshPos {
    face: FaceHandle,
    edge: usize,
    vertex: VertexHandle,
}

impl MeshPos {
    /// Creates a position from all three parts. Returns `None` if `vertex` is
    /// not an endpoint of edge `edge` of `face`.
    pub fn new<M: FaceAdjMesh>(
        mesh: &M,
        face: FaceHandle,
        vertex: VertexHandle,
        edge: usize,
    ) -> Option<Self> {
        let pos = Self { face, edge, vertex };
        if pos.is_valid(mesh) {
            Some(pos)
        } else {
            None
        }
    }

    /// The position on edge `edge` of `face`, at the edge's first vertex.
    ///
    /// Panics if that vertex reference is null.
    pub fn from_edge<M: FaceAdjMesh>(mesh: &M, face: FaceHandle, edge: usize) -> Self {
        Self {
            face,
            edge,
            vertex: mesh.face_vertex(face, edge),
        }
    }

    /// The position at `vertex` of `face`, on the edge starting at `vertex`.
    /// Returns `None` if `vertex` is not part of `face`.
    pub fn from_vertex<M: FaceAdjMesh>(mesh: &M, face: FaceHandle, vertex: VertexHandle) -> Option<Self> {
        mesh.index_of_vertex(face, vertex).map(|edge| Self { face, edge, vertex })
    }

    /// Whether `vertex` is an endpoint of edge `edge` of `face`.
    pub fn is_valid<M: FaceAdjMesh>(&self, mesh: &M) -> bool {
        !mesh.is_face_deleted(self.face)
            && self.edge < mesh.face_vertex_number(self.face)
            && (mesh.try_face_vertex(self.face, self.edge) == Some(self.vertex)
                || mesh.try_face_vertex_mod(self.face, self.edge as isize + 1) == Some(self.vertex))
    }

    pub fn face(&self) -> FaceHandle {
        self.face
    }

    pub fn vertex(&self) -> VertexHandle {
        self.vertex
    }

    pub fn edge(&self) -> usize {
        self.edge
    }

    /// The face on the other side of the current edge.
    pub fn adj_face<M: FaceAdjMesh>(&self, mesh: &M) -> Option<FaceHandle> {
        mesh.adj_face(self.face, self.edge)
    }

    /// The other endpoint of the current edge, `None` if it is null.
    pub fn adj_vertex<M: FaceAdjMesh>(&self, mesh: &M) -> Option<VertexHandle> {
        let mut tmp = *self;
        if tmp.flip_vertex(mesh) {
            Some(tmp.vertex)
        } else {
            None
        }
    }

    /// The other edge of the current face touching the current vertex.
    pub fn adj_edge<M: FaceAdjMesh>(&self, mesh: &M) -> usize {
        let mut tmp = *self;
        tmp.flip_edge(mesh);
        tmp.edge
    }

    /// Whether no face lies on the other side of the current edge. Looks at
    /// the adjacency only, not at border flags.
    pub fn is_edge_on_border<M: FaceAdjMesh>(&self, mesh: &M) -> bool {
        self.adj_face(mesh).is_none()
    }

    /// Whether the current vertex is the first vertex of the current edge.
    /// If so, moves around the vertex go counter clockwise.
    pub fn is_ccw_oriented<M: FaceAdjMesh>(&self, mesh: &M) -> bool {
        mesh.try_face_vertex(self.face, self.edge) == Some(self.vertex)
    }

    /// Moves to the face on the other side of the current edge, keeping the
    /// edge (as seen from the new face) and the vertex.
    ///
    /// Returns `false` and stays put if the edge is on the border. On
    /// non-manifold edges, the adjacent face might not point back; the edge
    /// is then searched by its endpoints.
    pub fn flip_face<M: FaceAdjMesh>(&mut self, mesh: &M) -> bool {
        let next = match mesh.adj_face(self.face, self.edge) {
            Some(f) => f,
            None => return false,
        };

        let edge = match mesh.index_of_adj_face(next, self.face) {
            Some(e) => e,
            None => {
                let edge = mesh.face_edge_vertices(self.face, self.edge)
                    .and_then(|(v0, v1)| mesh.index_of_edge(next, v0, v1));
                match edge {
                    Some(e) => e,
                    // The adjacency is out of date.
                    None => return false,
                }
            }
        };

        self.face = next;
        self.edge = edge;
        true
    }

    /// Moves to the other endpoint of the current edge.
    ///
    /// Returns `false` and stays put if that endpoint is null.
    pub fn flip_vertex<M: FaceAdjMesh>(&mut self, mesh: &M) -> bool {
        let other = if mesh.try_face_vertex(self.face, self.edge) == Some(self.vertex) {
            mesh.try_face_vertex_mod(self.face, self.edge as isize + 1)
        } else {
            mesh.try_face_vertex(self.face, self.edge)
        };

        match other {
            Some(v) => {
                self.vertex = v;
                true
            }
            None => false,
        }
    }

    /// Moves to the other edge of the current face touching the current
    /// vertex.
    pub fn flip_edge<M: FaceAdjMesh>(&mut self, mesh: &M) {
        let n = mesh.face_vertex_number(self.face);
        self.edge = if mesh.try_face_vertex_mod(self.face, self.edge as isize + 1) == Some(self.vertex) {
            (self.edge + 1) % n
        } else {
            (self.edge + n - 1) % n
        };
    }

    /// Moves to the next edge around the current vertex: `flip_edge`
    /// followed by `flip_face`. On a border, only the edge changes and the
    /// walk continues in the opposite direction.
    pub fn next_edge_adjacent_to_v<M: FaceAdjMesh>(&mut self, mesh: &M) {
        self.flip_edge(mesh);
        self.flip_face(mesh);
    }

    /// Rotates around the current vertex until reaching a border edge.
    /// Returns `false` if the rotation came back to the start without finding
    /// another border edge.
    ///
    /// Around non-manifold vertices, the rotation might enter a cycle that
    /// does not contain the start. The walk then stops and `false` is
    /// returned, too.
    pub fn next_edge_on_border_adjacent_to_v<M: FaceAdjMesh>(&mut self, mesh: &M) -> bool {
        let start = *self;
        let mut seen = FxHashSet::default();
        loop {
            self.next_edge_adjacent_to_v(mesh);
            if self.is_edge_on_border(mesh) && *self != start {
                return true;
            }
            if *self == start || !seen.insert(*self) {
                return false;
            }
        }
    }

    /// The number of faces around the current vertex that can be reached by
    /// rotating from this position. For a vertex whose faces form a single
    /// fan, this is the number of faces incident to the vertex.
    pub fn number_of_adjacent_faces_to_v<M: FaceAdjMesh>(&self, mesh: &M) -> usize {
        let mut count = 0;
        let mut on_border = false;
        let mut pos = *self;
        let mut seen = FxHashSet::default();
        loop {
            pos.next_edge_adjacent_to_v(mesh);
            count += 1;
            if pos.is_edge_on_border(mesh) {
                on_border = true;
            }
            if pos == *self || !seen.insert(pos) {
                break;
            }
        }

        // On a border, the walk bounces back and visits every face twice.
        if on_border {
            count / 2
        } else {
            count
        }
    }
}
