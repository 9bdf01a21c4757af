use std::fmt;

use crate::handle::Handle;
use super::IndexRemap;


/// Storage of an optional component for all elements of a container.
///
/// While disabled, no memory is used. While enabled, the table holds exactly
/// one value per element slot of the container (deleted slots included).
/// Keeping that length in sync is the job of the container.
#[derive(Clone)]
pub struct SideTable<T> {
    data: Option<Vec<T>>,
}

impl<T> Default for SideTable<T> {
    fn default() -> Self {
        Self { data: None }
    }
}

impl<T: Clone> SideTable<T> {
    pub fn is_enabled(&self) -> bool {
        self.data.is_some()
    }

    /// Enables the table with the values produced by `values`. If the table
    /// is already enabled, the existing values are kept.
    pub fn enable_with(&mut self, values: impl Iterator<Item = T>) {
        if self.data.is_none() {
            self.data = Some(values.collect());
        }
    }

    /// Enables the table with `len` copies of `value`.
    pub fn enable(&mut self, len: usize, value: T) {
        self.enable_with(std::iter::repeat(value).take(len));
    }

    /// Disables the table and frees its memory.
    pub fn disable(&mut self) {
        self.data = None;
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.data.as_ref().map(|d| &d[idx])
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.data.as_mut().map(|d| &mut d[idx])
    }

    pub fn as_slice(&self) -> Option<&[T]> {
        self.data.as_deref()
    }

    pub fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        self.data.as_deref_mut()
    }

    pub fn len(&self) -> Option<usize> {
        self.data.as_ref().map(|d| d.len())
    }

    /// Appends a value if the table is enabled.
    pub fn push(&mut self, value: T) {
        if let Some(d) = &mut self.data {
            d.push(value);
        }
    }

    /// Appends the value returned by `value` if the table is enabled. The
    /// closure is not called otherwise.
    pub fn push_with(&mut self, value: impl FnOnce() -> T) {
        if let Some(d) = &mut self.data {
            d.push(value());
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        if let Some(d) = &mut self.data {
            d.reserve(additional);
        }
    }

    /// Removes all values, but keeps the table enabled.
    pub fn clear(&mut self) {
        if let Some(d) = &mut self.data {
            d.clear();
        }
    }

    pub fn truncate(&mut self, len: usize) {
        if let Some(d) = &mut self.data {
            d.truncate(len);
        }
    }

    /// Drops all values of removed slots while preserving the order of the
    /// others.
    pub fn compact<H: Handle>(&mut self, remap: &IndexRemap<H>) {
        if let Some(d) = &mut self.data {
            let mut idx = 0;
            d.retain(|_| {
                let keep = remap.is_kept(idx);
                idx += 1;
                keep
            });
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter().flat_map(|d| d.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut().flat_map(|d| d.iter_mut())
    }
}

impl<T: fmt::Debug> fmt::Debug for SideTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.data {
            None => f.write_str("<disabled>"),
            Some(d) => d.fmt(f),
        }
    }
}


/// Generates the side storage struct and its `SideStorage` impl.
///
/// `$e` names the element for which initial values are computed; fields
/// marked with `refs` hold lists of references that are passed to visitors.
macro_rules! side_storage {
    (
        $(#[$attr:meta])*
        $side:ident<$cfg:ident> for $elem:ident, |$e:ident| {
            $( $field:ident: $ty:ty = $init:expr => $kind:ident $([$refs:ident])?, )*
        }
    ) => {
        $(#[$attr])*
        pub struct $side<C: $cfg> {
            $( pub(crate) $field: $crate::comp::SideTable<$ty>, )*
            _config: std::marker::PhantomData<C>,
        }

        impl<C: $cfg> Default for $side<C> {
            fn default() -> Self {
                Self {
                    $( $field: Default::default(), )*
                    _config: std::marker::PhantomData,
                }
            }
        }

        impl<C: $cfg> Clone for $side<C> {
            fn clone(&self) -> Self {
                Self {
                    $( $field: self.$field.clone(), )*
                    _config: std::marker::PhantomData,
                }
            }
        }

        impl<C: $cfg> std::fmt::Debug for $side<C> {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.debug_struct(stringify!($side))
                    $( .field(stringify!($field), &self.$field) )*
                    .finish()
            }
        }

        impl<C: $cfg> $crate::mesh::SideStorage<$elem<C>> for $side<C> {
            fn push_for(&mut self, $e: &$elem<C>) {
                $( self.$field.push_with(|| $init); )*
            }

            fn compact<H: $crate::handle::Handle>(&mut self, remap: &$crate::comp::IndexRemap<H>) {
                $( self.$field.compact(remap); )*
            }

            fn truncate(&mut self, len: usize) {
                $( self.$field.truncate(len); )*
            }

            fn clear(&mut self) {
                $( self.$field.clear(); )*
            }

            fn reserve(&mut self, additional: usize) {
                $( self.$field.reserve(additional); )*
            }

            fn append(&mut self, other: &Self, other_elements: &[$elem<C>]) {
                $(
                    if self.$field.is_enabled() {
                        match other.$field.as_slice() {
                            Some(values) => values.iter().for_each(|x| self.$field.push(x.clone())),
                            None => other_elements.iter().for_each(|$e| self.$field.push($init)),
                        }
                    }
                )*
            }

            fn enabled_components(&self) -> u32 {
                let mut out = 0;
                $(
                    if self.$field.is_enabled() {
                        out |= $crate::comp::ComponentKind::$kind.bit();
                    }
                )*
                out
            }

            #[allow(unused_variables)]
            fn visit_refs_at<V: $crate::comp::RefVisitor>(&self, idx: usize, v: &mut V) {
                $( side_storage!(@visit self, $field, idx, v, $kind $(, $refs)?); )*
            }

            #[allow(unused_variables)]
            fn visit_refs_mut<V: $crate::comp::RefVisitorMut>(&mut self, v: &mut V) {
                $( side_storage!(@visit_mut self, $field, v, $kind $(, $refs)?); )*
            }
        }
    };
    (@visit $self:ident, $field:ident, $idx:ident, $v:ident, $kind:ident) => {};
    (@visit $self:ident, $field:ident, $idx:ident, $v:ident, $kind:ident, refs) => {
        if let Some(list) = $self.$field.get($idx) {
            $v.visit($crate::comp::ComponentKind::$kind, list.as_ref());
        }
    };
    (@visit_mut $self:ident, $field:ident, $v:ident, $kind:ident) => {};
    (@visit_mut $self:ident, $field:ident, $v:ident, $kind:ident, refs) => {
        for list in $self.$field.iter_mut() {
            $v.visit_mut($crate::comp::ComponentKind::$kind, list.as_mut());
        }
    };
}
