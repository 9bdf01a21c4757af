//! Typed handles referring to mesh elements.
//!
//! A handle is a plain index into the container of its element kind. Every
//! reference stored inside a mesh (face to vertex, face to adjacent face,
//! half edge to twin, ...) is a handle, so there is only one reference
//! representation that the compaction logic needs to rewrite.
//!
//! References that might be unset are stored as `Optioned<H>` (imported as
//! `Opt` throughout this crate). The value `hsize::MAX` is reserved as the
//! null sentinel, which is why no container can hold more than
//! `hsize::MAX - 1` elements.

use std::{fmt, hash::Hash};

use static_assertions::assert_eq_size;


/// The integer type used as index in handles.
///
/// By default this is `u32`, which is sufficient for meshes with up to ~4
/// billion elements per kind. With the `large-handle` feature enabled, this
/// is `u64`.
#[cfg(not(feature = "large-handle"))]
#[allow(non_camel_case_types)]
pub type hsize = u32;

#[cfg(feature = "large-handle")]
#[allow(non_camel_case_types)]
pub type hsize = u64;


/// The kinds of elements a mesh can store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Vertex,
    Face,
    Edge,
    HalfEdge,
}

impl ElementKind {
    pub const ALL: [ElementKind; 4] = [
        ElementKind::Vertex,
        ElementKind::Face,
        ElementKind::Edge,
        ElementKind::HalfEdge,
    ];

    /// Position of this kind in `ALL`. Used to index small per-kind tables.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ElementKind::Vertex => "Vertex",
            ElementKind::Face => "Face",
            ElementKind::Edge => "Edge",
            ElementKind::HalfEdge => "HalfEdge",
        };
        f.write_str(s)
    }
}


/// Types that can be used to refer to some data (like a vertex or a face).
///
/// Handles are tiny copyable values: an index into the container of the
/// element kind `KIND`. They stay valid until the container is compacted.
pub trait Handle: 'static + Copy + fmt::Debug + Eq + Ord + Hash + optional::Noned {
    /// The kind of element this handle refers to.
    const KIND: ElementKind;

    /// Create a handle from the given index. The index must not be
    /// `hsize::MAX` as this value is reserved!
    fn new(idx: hsize) -> Self;

    /// Return the index of the current handle.
    fn idx(&self) -> hsize;

    /// Helper method to create a handle directly from an `usize`.
    ///
    /// If `raw` cannot be represented by `hsize` (or equals the reserved
    /// null value), this function panics.
    #[inline(always)]
    fn from_usize(raw: usize) -> Self {
        assert!(
            raw < hsize::max_value() as usize,
            "handle index {} does not fit into `hsize`",
            raw,
        );
        Self::new(raw as hsize)
    }

    /// Helper method to get the index of this handle as `usize`.
    #[inline(always)]
    fn to_usize(&self) -> usize {
        self.idx() as usize
    }
}

macro_rules! make_handle_type {
    ($(#[$attr:meta])* $name:ident = $short:expr, $kind:ident;) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(hsize);

        impl Handle for $name {
            const KIND: ElementKind = ElementKind::$kind;

            #[inline(always)]
            fn new(id: hsize) -> Self {
                $name(id)
            }

            #[inline(always)]
            fn idx(&self) -> hsize {
                self.0
            }
        }

        impl optional::Noned for $name {
            #[inline(always)]
            fn is_none(&self) -> bool {
                self.0 == hsize::max_value()
            }

            #[inline(always)]
            fn get_none() -> Self {
                $name(hsize::max_value())
            }
        }

        impl optional::OptEq for $name {
            fn opt_eq(&self, other: &Self) -> bool {
                self == other
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}{}", $short, self.idx())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    }
}

make_handle_type!{
    /// A handle that is associated with a face.
    FaceHandle = "F", Face;
}
make_handle_type!{
    /// A handle that is associated with an edge.
    EdgeHandle = "E", Edge;
}
make_handle_type!{
    /// A handle that is associated with a vertex.
    VertexHandle = "V", Vertex;
}
make_handle_type!{
    /// A handle that is associated with a half edge.
    HalfEdgeHandle = "HE", HalfEdge;
}

// The null value is stored in-band, so nullable references cost nothing.
assert_eq_size!(optional::Optioned<VertexHandle>, VertexHandle);
assert_eq_size!(optional::Optioned<FaceHandle>, hsize);
