//! Capability traits: which components an element type has.
//!
//! For every component kind `X` there are two traits:
//!
//! - `HasX` is implemented by all element types whose configuration stores
//!   `X` (either `Horizontal` or `Optional`). It provides the accessors and
//!   the runtime check `is_x_enabled`.
//! - `HasOptionalX` is additionally implemented if `X` is `Optional`. It
//!   provides `enable_x` and `disable_x`.
//!
//! The accessors are also available as methods on [`Container`], e.g.
//! `mesh.vertices().color(v)`. They return `Error::MissingComponent` if the
//! component is currently disabled.

use optional::Optioned as Opt;

use crate::{
    mesh::{Container, Element},
    error::Result,
    handle::{EdgeHandle, FaceHandle, VertexHandle},
};
use super::{Color, Mark, Normal, Quality, TexCoord};


macro_rules! capability_traits {
    ($($name:ident, $field:ident: $value:ty;)*) => { paste::paste! { $(
        #[doc = concat!("Element types that have the `", stringify!($name), "` component.")]
        pub trait [<Has $name>]: Element {
            fn $field(c: &Container<Self>, h: Self::Handle) -> Result<&$value>;
            fn [<$field _mut>](c: &mut Container<Self>, h: Self::Handle) -> Result<&mut $value>;

            /// Whether the component can currently be accessed. Always
            /// `true` for horizontal components.
            fn [<is_ $field _enabled>](c: &Container<Self>) -> bool;
        }

        #[doc = concat!(
            "Element types that have the `", stringify!($name),
            "` component as optional component.",
        )]
        pub trait [<HasOptional $name>]: [<Has $name>] {
            fn [<enable_ $field>](c: &mut Container<Self>);
            fn [<disable_ $field>](c: &mut Container<Self>);
        }

        impl<E: Element> Container<E> {
            pub fn $field(&self, h: E::Handle) -> Result<&$value>
            where
                E: [<Has $name>],
            {
                E::$field(self, h)
            }

            pub fn [<$field _mut>](&mut self, h: E::Handle) -> Result<&mut $value>
            where
                E: [<Has $name>],
            {
                E::[<$field _mut>](self, h)
            }

            pub fn [<is_ $field _enabled>](&self) -> bool
            where
                E: [<Has $name>],
            {
                E::[<is_ $field _enabled>](self)
            }

            pub fn [<enable_ $field>](&mut self)
            where
                E: [<HasOptional $name>],
            {
                E::[<enable_ $field>](self)
            }

            pub fn [<disable_ $field>](&mut self)
            where
                E: [<HasOptional $name>],
            {
                E::[<disable_ $field>](self)
            }
        }
    )* } }
}

capability_traits! {
    Normal, normal: Normal;
    Color, color: Color;
    Quality, quality: Quality;
    TexCoord, tex_coord: TexCoord;
    Mark, mark: Mark;
    AdjacentFaces, adj_faces: [Opt<FaceHandle>];
    AdjacentVertices, adj_vertices: [Opt<VertexHandle>];
    AdjacentEdges, adj_edges: [Opt<EdgeHandle>];
    WedgeTexCoords, wedge_tex_coords: [TexCoord];
}


/// Implements a capability trait pair for an element type.
///
/// The element struct and its side storage must both have a field called
/// `$field`. The `value` form is for components holding one value, the
/// `list` form for components holding a list (exposed as slice). `$e => $init`
/// computes the initial value for element `$e` when the optional side table
/// gets enabled.
macro_rules! impl_component {
    (value $elem:ident<$cfg:ident>, $name:ident, $field:ident, $mode:ident, $value:ty, $e:ident => $init:expr) => {
        impl_component!(@impl $elem<$cfg>, $name, $field, $mode, $value, $e => $init, |v| v, |v| v);
    };
    (list $elem:ident<$cfg:ident>, $name:ident, $field:ident, $mode:ident, $value:ty, $e:ident => $init:expr) => {
        impl_component!(
            @impl $elem<$cfg>, $name, $field, $mode, $value, $e => $init, |v| v.as_ref(), |v| v.as_mut()
        );
    };
    (@impl $elem:ident<$cfg:ident>, $name:ident, $field:ident, $mode:ident, $value:ty,
        $e:ident => $init:expr, |$r:ident| $proj_ref:expr, |$v:ident| $proj:expr
    ) => { paste::paste! {
        impl<C: $cfg> $crate::comp::[<Has $name>] for $elem<C>
        where
            C::$mode: $crate::comp::PresentMode,
        {
            fn $field(c: &$crate::mesh::Container<Self>, h: Self::Handle) -> $crate::error::Result<&$value> {
                let i = $crate::handle::Handle::to_usize(&h);
                let missing = || $crate::error::Error::missing(
                    <Self as $crate::mesh::Element>::KIND,
                    $crate::comp::ComponentKind::$name,
                );
                match $crate::comp::FieldStorage::get(&c.elements[i].$field) {
                    Some($r) => Ok($proj_ref),
                    None => c.side.$field.get(i).map(|$r| $proj_ref).ok_or_else(missing),
                }
            }

            fn [<$field _mut>](c: &mut $crate::mesh::Container<Self>, h: Self::Handle) -> $crate::error::Result<&mut $value> {
                let i = $crate::handle::Handle::to_usize(&h);
                let missing = || $crate::error::Error::missing(
                    <Self as $crate::mesh::Element>::KIND,
                    $crate::comp::ComponentKind::$name,
                );
                let $crate::mesh::Container { elements, side, .. } = c;
                match $crate::comp::FieldStorage::get_mut(&mut elements[i].$field) {
                    Some($v) => Ok($proj),
                    None => side.$field.get_mut(i).map(|$v| $proj).ok_or_else(missing),
                }
            }

            fn [<is_ $field _enabled>](c: &$crate::mesh::Container<Self>) -> bool {
                if <C::$mode as $crate::comp::ComponentMode>::OPTIONAL {
                    c.side.$field.is_enabled()
                } else {
                    <C::$mode as $crate::comp::ComponentMode>::PRESENT
                }
            }
        }

        impl<C: $cfg> $crate::comp::[<HasOptional $name>] for $elem<C>
        where
            C::$mode: $crate::comp::OptionalMode,
        {
            fn [<enable_ $field>](c: &mut $crate::mesh::Container<Self>) {
                c.side.$field.enable_with(c.elements.iter().map(|$e| $init));
            }

            fn [<disable_ $field>](c: &mut $crate::mesh::Container<Self>) {
                c.side.$field.disable();
            }
        }
    } };
}
