//! Polygon meshes composed of configurable components, plus topology
//! algorithms working on them.
//!
//! A mesh stores its elements (vertices, faces and optionally edges or half
//! edges) in per kind containers. What data each element carries is decided
//! by a compile time configuration; optional components can additionally be
//! enabled and disabled at runtime. See [`mesh`] for an overview of the data
//! structures and [`comp`] for the component model.
//!
//! Most functionality is available via the traits in [`prelude`]:
//!
//! ```
//! use tessel::prelude::*;
//! use tessel::{algo::update, mesh::configs::TriMesh};
//!
//! let mut mesh = Mesh::<TriMesh>::new();
//! let a = mesh.add_vertex([0.0, 0.0, 0.0].into());
//! let b = mesh.add_vertex([1.0, 0.0, 0.0].into());
//! let c = mesh.add_vertex([0.0, 1.0, 0.0].into());
//! mesh.add_face(&[a, b, c]).unwrap();
//!
//! mesh.faces_mut().enable_adj_faces();
//! update::update_per_face_adjacent_faces(&mut mesh).unwrap();
//! assert_eq!(mesh.faces().adj_faces(FaceHandle::new(0)).unwrap().len(), 3);
//! assert_eq!(mesh.num_faces(), 1);
//! ```

#![deny(missing_debug_implementations)]


#[macro_use]
pub mod comp;

pub mod algo;
pub mod error;
pub mod handle;
pub mod import;
pub mod log;
pub mod map;
pub mod mesh;
pub mod mesh_info;
pub mod prelude;
pub mod shape;


pub use self::{
    error::{Error, Result},
    handle::{EdgeHandle, FaceHandle, HalfEdgeHandle, Handle, VertexHandle},
};


mod sealed {
    /// Supertrait of traits that cannot be implemented outside this crate.
    pub trait Sealed {}
}
