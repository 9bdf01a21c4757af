//! Reexports of the most important types and traits of this library for
//! convenience.
//!
//! As with every prelude, the main usage is to glob import everything from
//! this module:
//!
//! ```
//! use tessel::prelude::*;
//! ```
//!
//! Now you have the mesh types, the handles and all traits the algorithms
//! are written against in scope.

pub use crate::{
    Handle,
    handle::{EdgeHandle, FaceHandle, HalfEdgeHandle, VertexHandle},
    log::Logger,
    mesh::{
        ElementContainers, FaceAdjMesh, FaceAdjMeshMut, FaceMesh, FaceMeshMut,
        HalfEdgeMesh, Mesh, MeshPos,
    },
};
