//! Maps from handles to data.
//!
//! Algorithms that compute something per element (e.g. whether a vertex is
//! referenced by any face) return their results in a [`DenseMap`] instead
//! of storing them in the mesh.

mod dense;

pub use self::dense::DenseMap;
