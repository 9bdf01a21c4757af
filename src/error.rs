//! The error type of this crate.

use failure::Fail;

use crate::{comp::ComponentKind, handle::ElementKind};


/// Why an element index passed by the user was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadIndexReason {
    /// The index is not smaller than the size of the container.
    OutOfRange { container_size: usize },

    /// The element exists but is marked as deleted.
    Deleted,
}

/// Everything that can go wrong when working with meshes of this crate.
///
/// Operations that merely find out that something is not possible (e.g.
/// `check_flip_edge` returning `false`) do not use this type.
#[derive(Debug, Fail)]
pub enum Error {
    /// A component was required that is currently not available: either an
    /// optional component that was not enabled or a component of an element
    /// kind that the mesh has no container for.
    #[fail(display = "missing component: {} has no {} component", element, component)]
    MissingComponent {
        element: ElementKind,
        component: ComponentKind,
    },

    /// The dimensions of some input did not match what was expected.
    #[fail(display = "wrong size: {}", _0)]
    WrongSize(String),

    /// A vertex index referred to a vertex that does not exist.
    #[fail(display = "bad vertex index {}: {}", index, reason)]
    BadVertexIndex {
        index: usize,
        reason: BadIndexReason,
    },

    /// A handle referred to a face, edge or half edge that does not exist.
    #[fail(display = "bad {} handle {}: {}", element, index, reason)]
    BadHandle {
        element: ElementKind,
        index: usize,
        reason: BadIndexReason,
    },

    /// The mesh violates one of its structural invariants. Only returned by
    /// the explicit checks in `algo::check`.
    #[fail(display = "inconsistent mesh: {}", _0)]
    InconsistentMesh(String),

    /// A polygon cannot be stored in faces of the given fixed arity.
    #[fail(
        display = "cannot store a polygon with {} vertices in faces with {} vertices",
        polygon,
        arity
    )]
    UnsupportedArity {
        polygon: usize,
        arity: usize,
    },

    /// A face could not be added as it would break the half edge structure.
    #[fail(display = "invalid face: {}", _0)]
    InvalidFace(String),

    /// No custom component with the given name exists.
    #[fail(display = "no custom component named '{}'", _0)]
    UnknownCustomComponent(String),

    /// A custom component exists, but stores a different type.
    #[fail(display = "custom component '{}' does not store values of type {}", name, expected)]
    BadCustomComponentType {
        name: String,
        expected: &'static str,
    },
}

impl std::fmt::Display for BadIndexReason {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BadIndexReason::OutOfRange { container_size } => {
                write!(f, "out of range (container size {})", container_size)
            }
            BadIndexReason::Deleted => f.write_str("the element is deleted"),
        }
    }
}

impl Error {
    pub(crate) fn missing(element: ElementKind, component: ComponentKind) -> Self {
        Error::MissingComponent { element, component }
    }

    pub(crate) fn bad_index(element: ElementKind, index: usize, reason: BadIndexReason) -> Self {
        match element {
            ElementKind::Vertex => Error::BadVertexIndex { index, reason },
            _ => Error::BadHandle { element, index, reason },
        }
    }
}

/// Shorthand for results with this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
