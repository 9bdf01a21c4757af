//! Ready-made mesh configurations.
//!
//! Coordinates, normals and marks are always stored; everything else
//! (colors, qualities, texture coordinates, adjacency) is optional and has
//! to be enabled before use.

use crate::comp::{Absent, Horizontal, Optional};
use super::{
    EdgeConfig, FaceConfig, HalfEdgeConfig, MeshConfig, Polygon, Quad, Triangle, VertexConfig,
};


/// Implements `VertexConfig` with the given modes, in declaration order.
macro_rules! vertex_config {
    ($name:ident: $n:ident, $c:ident, $q:ident, $t:ident, $m:ident, $af:ident, $av:ident, $ae:ident, $he:ident) => {
        impl VertexConfig for $name {
            type Normal = $n;
            type Color = $c;
            type Quality = $q;
            type TexCoord = $t;
            type Mark = $m;
            type AdjacentFaces = $af;
            type AdjacentVertices = $av;
            type AdjacentEdges = $ae;
            type HalfEdge = $he;
        }
    };
}

/// Implements `FaceConfig` with the given arity and modes.
macro_rules! face_config {
    ($name:ident<$arity:ident>: $n:ident, $c:ident, $q:ident, $m:ident, $af:ident, $ae:ident, $w:ident) => {
        impl FaceConfig for $name {
            type Arity = $arity;
            type Normal = $n;
            type Color = $c;
            type Quality = $q;
            type Mark = $m;
            type AdjacentFaces = $af;
            type AdjacentEdges = $ae;
            type WedgeTexCoords = $w;
        }
    };
}


// ----- Element configurations ----------------------------------------------

/// Vertices of the shared vertex meshes.
#[allow(missing_debug_implementations)]
pub enum StdVertex {}
vertex_config!(StdVertex:
    Horizontal, Optional, Optional, Optional, Horizontal, Optional, Optional, Absent, Absent);

/// Vertices of meshes with explicit edges: additionally track adjacent edges.
#[allow(missing_debug_implementations)]
pub enum EdgeMeshVertex {}
vertex_config!(EdgeMeshVertex:
    Horizontal, Optional, Optional, Optional, Horizontal, Optional, Optional, Optional, Absent);

/// Vertices of half edge meshes.
#[allow(missing_debug_implementations)]
pub enum HeVertex {}
vertex_config!(HeVertex:
    Horizontal, Optional, Optional, Optional, Horizontal, Absent, Absent, Absent, Horizontal);

#[allow(missing_debug_implementations)]
pub enum TriFace {}
face_config!(TriFace<Triangle>:
    Horizontal, Optional, Optional, Horizontal, Optional, Absent, Optional);

#[allow(missing_debug_implementations)]
pub enum QuadFace {}
face_config!(QuadFace<Quad>:
    Horizontal, Optional, Optional, Horizontal, Optional, Absent, Optional);

#[allow(missing_debug_implementations)]
pub enum PolyFace {}
face_config!(PolyFace<Polygon>:
    Horizontal, Optional, Optional, Horizontal, Optional, Absent, Optional);

/// Triangles that additionally reference their edges.
#[allow(missing_debug_implementations)]
pub enum TriEdgeFace {}
face_config!(TriEdgeFace<Triangle>:
    Horizontal, Optional, Optional, Horizontal, Optional, Optional, Optional);

/// Faces of triangular half edge meshes. The face adjacency is implied by the
/// half edges, so it cannot be stored.
#[allow(missing_debug_implementations)]
pub enum HeTriFace {}
face_config!(HeTriFace<Triangle>:
    Horizontal, Optional, Optional, Horizontal, Absent, Absent, Absent);

#[allow(missing_debug_implementations)]
pub enum HePolyFace {}
face_config!(HePolyFace<Polygon>:
    Horizontal, Optional, Optional, Horizontal, Absent, Absent, Absent);

/// Edges without any components. Used by meshes that do not store edges.
#[allow(missing_debug_implementations)]
pub enum NoEdge {}
impl EdgeConfig for NoEdge {
    type Color = Absent;
    type Quality = Absent;
    type Mark = Absent;
    type AdjacentFaces = Absent;
    type AdjacentEdges = Absent;
}

#[allow(missing_debug_implementations)]
pub enum StdEdge {}
impl EdgeConfig for StdEdge {
    type Color = Optional;
    type Quality = Optional;
    type Mark = Horizontal;
    type AdjacentFaces = Optional;
    type AdjacentEdges = Absent;
}


// ----- Mesh configurations -------------------------------------------------

/// Triangle mesh.
#[allow(missing_debug_implementations)]
pub enum TriMesh {}
impl MeshConfig for TriMesh {
    type Vertex = StdVertex;
    type Face = TriFace;
    type Edge = NoEdge;
}

/// Quad mesh.
#[allow(missing_debug_implementations)]
pub enum QuadMesh {}
impl MeshConfig for QuadMesh {
    type Vertex = StdVertex;
    type Face = QuadFace;
    type Edge = NoEdge;
}

/// Mesh with faces of arbitrary size.
#[allow(missing_debug_implementations)]
pub enum PolyMesh {}
impl MeshConfig for PolyMesh {
    type Vertex = StdVertex;
    type Face = PolyFace;
    type Edge = NoEdge;
}

/// Triangle mesh with an explicit edge container.
#[allow(missing_debug_implementations)]
pub enum TriEdgeMesh {}
impl MeshConfig for TriEdgeMesh {
    type Vertex = EdgeMeshVertex;
    type Face = TriEdgeFace;
    type Edge = StdEdge;
}

/// Triangle half edge mesh.
#[allow(missing_debug_implementations)]
pub enum HalfEdgeTriMesh {}
impl HalfEdgeConfig for HalfEdgeTriMesh {
    type Vertex = HeVertex;
    type Face = HeTriFace;
}

/// Half edge mesh with faces of arbitrary size.
#[allow(missing_debug_implementations)]
pub enum HalfEdgePolyMesh {}
impl HalfEdgeConfig for HalfEdgePolyMesh {
    type Vertex = HeVertex;
    type Face = HePolyFace;
}
