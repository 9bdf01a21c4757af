//! Components: the pieces of data elements are composed of.
//!
//! An element type (vertex, face, edge, half edge) is a struct with one field
//! per component it *can* have. Which of those components actually exist is
//! decided at compile time by the element's configuration: each component is
//! assigned a [`ComponentMode`]:
//!
//! - [`Horizontal`]: the value is stored inline in every element and is
//!   always available.
//! - [`Optional`]: the element field is zero sized; the values live in a
//!   side table owned by the element container. That table can be enabled
//!   and disabled at runtime and only takes memory while enabled.
//! - [`Absent`]: the component does not exist. All accessors are unavailable
//!   at compile time.
//!
//! Generic code asks for capabilities via the traits in [`capability`]
//! (`HasColor`, `HasOptionalColor`, ...). As an optional component can be
//! disabled at runtime, every accessor returns a `Result` and fails with
//! `Error::MissingComponent` instead of touching unallocated storage.

use std::{fmt, marker::PhantomData};

use cgmath::{Point3, Vector3};
use derive_more::From;

use crate::sealed::Sealed;


#[macro_use]
mod side;
#[macro_use]
pub mod capability;
pub mod custom;
pub mod refs;

pub use self::{
    capability::*,
    custom::{CustomAttributes, CustomComponents, CustomValue},
    refs::{IndexRemap, RefList, RefVisitor, RefVisitorMut},
    side::SideTable,
};


// ===========================================================================
// ===== Component kinds and values
// ===========================================================================

/// All kinds of components an element can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Flags,
    Coordinate,
    Normal,
    Color,
    Quality,
    TexCoord,
    Mark,
    VertexReferences,
    AdjacentFaces,
    AdjacentVertices,
    AdjacentEdges,
    WedgeTexCoords,
    HalfEdgeReferences,
    Custom,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 14] = [
        ComponentKind::Flags,
        ComponentKind::Coordinate,
        ComponentKind::Normal,
        ComponentKind::Color,
        ComponentKind::Quality,
        ComponentKind::TexCoord,
        ComponentKind::Mark,
        ComponentKind::VertexReferences,
        ComponentKind::AdjacentFaces,
        ComponentKind::AdjacentVertices,
        ComponentKind::AdjacentEdges,
        ComponentKind::WedgeTexCoords,
        ComponentKind::HalfEdgeReferences,
        ComponentKind::Custom,
    ];

    pub(crate) const fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

/// The bit of `kind` if mode `M` stores the component inside the element,
/// 0 otherwise.
pub(crate) const fn inline_bit<M: ComponentMode>(kind: ComponentKind) -> u32 {
    if M::PRESENT && !M::OPTIONAL {
        kind.bit()
    } else {
        0
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Position of a vertex.
pub type Coordinate = Point3<f64>;

/// Normal vector of a vertex or face. Not necessarily normalized.
pub type Normal = Vector3<f64>;

/// A scalar value per element (e.g. curvature or some error metric).
pub type Quality = f64;

/// An incremental mark, used by algorithms to tag visited elements without
/// clearing flags afterwards.
pub type Mark = i32;

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// A texture coordinate plus the index of the texture it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TexCoord {
    pub u: f64,
    pub v: f64,
    pub index: u16,
}

impl TexCoord {
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v, index: 0 }
    }
}


// ===========================================================================
// ===== Flags
// ===========================================================================

macro_rules! flag_accessors {
    ($ty:ident: $($bit:ident => $get:ident, $set:ident;)*) => {
        impl $ty {
            $(
                #[inline(always)]
                pub fn $get(&self) -> bool {
                    self.0 & Self::$bit != 0
                }

                #[inline(always)]
                pub fn $set(&mut self, value: bool) {
                    if value {
                        self.0 |= Self::$bit;
                    } else {
                        self.0 &= !Self::$bit;
                    }
                }
            )*
        }
    }
}

/// Status bits every element has.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementFlags(u8);

impl ElementFlags {
    const DELETED: u8 = 1 << 0;
    const SELECTED: u8 = 1 << 1;
    const VISITED: u8 = 1 << 2;
    const BORDER: u8 = 1 << 3;

    /// Resets every bit except `deleted`.
    pub fn reset(&mut self) {
        self.0 &= Self::DELETED;
    }
}

flag_accessors!(ElementFlags:
    DELETED => is_deleted, set_deleted;
    SELECTED => is_selected, set_selected;
    VISITED => is_visited, set_visited;
    BORDER => is_on_border, set_on_border;
);

impl fmt::Debug for ElementFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut list = f.debug_set();
        if self.is_deleted() { list.entry(&"deleted"); }
        if self.is_selected() { list.entry(&"selected"); }
        if self.is_visited() { list.entry(&"visited"); }
        if self.is_on_border() { list.entry(&"border"); }
        list.finish()
    }
}

/// Status bits stored per edge of a face.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeFlags(u8);

impl EdgeFlags {
    const FAUX: u8 = 1 << 0;
    const BORDER: u8 = 1 << 1;
    const SELECTED: u8 = 1 << 2;
}

flag_accessors!(EdgeFlags:
    FAUX => is_faux, set_faux;
    BORDER => is_on_border, set_on_border;
    SELECTED => is_selected, set_selected;
);

impl fmt::Debug for EdgeFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut list = f.debug_set();
        if self.is_faux() { list.entry(&"faux"); }
        if self.is_on_border() { list.entry(&"border"); }
        if self.is_selected() { list.entry(&"selected"); }
        list.finish()
    }
}


// ===========================================================================
// ===== Component modes
// ===========================================================================

/// How a component is stored. Either [`Horizontal`], [`Optional`] or
/// [`Absent`].
///
/// This is a sealed trait, meaning you cannot implement it for your own types.
pub trait ComponentMode: Sealed + 'static {
    /// Whether elements statically have this component.
    const PRESENT: bool;

    /// Whether the component lives in a side table that can be toggled.
    const OPTIONAL: bool;

    /// What is stored inside the element for this component.
    type Storage<T: Clone + fmt::Debug>: FieldStorage<T>;
}

/// Marker for modes with which the component exists (`Horizontal` and
/// `Optional`).
pub trait PresentMode: ComponentMode {}

/// Marker for the `Optional` mode.
pub trait OptionalMode: PresentMode {}

/// The component is always stored inside the element.
#[allow(missing_debug_implementations)]
pub enum Horizontal {}
impl Sealed for Horizontal {}
impl ComponentMode for Horizontal {
    const PRESENT: bool = true;
    const OPTIONAL: bool = false;
    type Storage<T: Clone + fmt::Debug> = StoredField<T>;
}
impl PresentMode for Horizontal {}

/// The component is stored in a side table of the container and can be
/// enabled or disabled at runtime.
#[allow(missing_debug_implementations)]
pub enum Optional {}
impl Sealed for Optional {}
impl ComponentMode for Optional {
    const PRESENT: bool = true;
    const OPTIONAL: bool = true;
    type Storage<T: Clone + fmt::Debug> = OmittedField<T>;
}
impl PresentMode for Optional {}
impl OptionalMode for Optional {}

/// The component does not exist.
#[allow(missing_debug_implementations)]
pub enum Absent {}
impl Sealed for Absent {}
impl ComponentMode for Absent {
    const PRESENT: bool = false;
    const OPTIONAL: bool = false;
    type Storage<T: Clone + fmt::Debug> = OmittedField<T>;
}

/// Storage of one component inside an element.
pub trait FieldStorage<T>: Clone + fmt::Debug {
    fn from_value(value: T) -> Self;
    fn get(&self) -> Option<&T>;
    fn get_mut(&mut self) -> Option<&mut T>;
}

/// A field that is actually stored.
#[derive(Clone, Debug)]
pub struct StoredField<T>(T);

impl<T: Clone + fmt::Debug> FieldStorage<T> for StoredField<T> {
    #[inline(always)]
    fn from_value(value: T) -> Self {
        StoredField(value)
    }

    #[inline(always)]
    fn get(&self) -> Option<&T> {
        Some(&self.0)
    }

    #[inline(always)]
    fn get_mut(&mut self) -> Option<&mut T> {
        Some(&mut self.0)
    }
}

/// A zero sized placeholder for a field that is not stored inline.
pub struct OmittedField<T>(PhantomData<fn() -> T>);

impl<T> Clone for OmittedField<T> {
    fn clone(&self) -> Self {
        OmittedField(PhantomData)
    }
}

impl<T> fmt::Debug for OmittedField<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("-")
    }
}

impl<T> FieldStorage<T> for OmittedField<T> {
    #[inline(always)]
    fn from_value(_: T) -> Self {
        OmittedField(PhantomData)
    }

    #[inline(always)]
    fn get(&self) -> Option<&T> {
        None
    }

    #[inline(always)]
    fn get_mut(&mut self) -> Option<&mut T> {
        None
    }
}

/// Shorthand for the element field type of a component with mode `M`.
pub(crate) type Slot<M, T> = <M as ComponentMode>::Storage<T>;
