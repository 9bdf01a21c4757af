//! User defined components, identified by name and checked by type at
//! runtime.

use std::{any::{Any, type_name}, fmt};

use fxhash::FxHashMap;

use crate::{
    error::{Error, Result},
    handle::Handle,
};
use super::IndexRemap;


/// Values that can be stored in custom components.
pub trait CustomValue: Any + Clone + Default + fmt::Debug {}
impl<T: Any + Clone + Default + fmt::Debug> CustomValue for T {}

trait Column: fmt::Debug {
    fn len(&self) -> usize;
    fn resize(&mut self, len: usize);
    fn compact(&mut self, kept: &dyn Fn(usize) -> bool);
    fn extend_from(&mut self, other: &dyn Column);
    fn clone_box(&self) -> Box<dyn Column>;
    fn value_type(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[derive(Debug, Clone)]
struct TypedColumn<T>(Vec<T>);

impl<T: CustomValue> Column for TypedColumn<T> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn resize(&mut self, len: usize) {
        self.0.resize(len, T::default());
    }

    fn compact(&mut self, kept: &dyn Fn(usize) -> bool) {
        let mut idx = 0;
        self.0.retain(|_| {
            idx += 1;
            kept(idx - 1)
        });
    }

    fn extend_from(&mut self, other: &dyn Column) {
        match other.as_any().downcast_ref::<TypedColumn<T>>() {
            Some(other) => self.0.extend_from_slice(&other.0),
            None => self.0.resize(self.0.len() + other.len(), T::default()),
        }
    }

    fn clone_box(&self) -> Box<dyn Column> {
        Box::new(self.clone())
    }

    fn value_type(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}


/// Custom per-element components of one container.
///
/// Every component stores exactly one value per element slot; the container
/// keeps all columns in sync when elements are added, removed or compacted.
#[derive(Debug, Default)]
pub struct CustomComponents {
    columns: FxHashMap<String, Box<dyn Column>>,
    len: usize,
}

impl Clone for CustomComponents {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.iter().map(|(k, v)| (k.clone(), v.clone_box())).collect(),
            len: self.len,
        }
    }
}

impl CustomComponents {
    /// Adds a component called `name` storing values of type `T`. All
    /// elements start with `T::default()`. An existing component with the
    /// same name is replaced.
    pub fn add<T: CustomValue>(&mut self, name: &str) {
        let column = TypedColumn(vec![T::default(); self.len]);
        self.columns.insert(name.to_owned(), Box::new(column));
    }

    /// Removes the component, returning whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.columns.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Returns `true` if a component `name` exists and stores `T` values.
    pub fn is_of_type<T: CustomValue>(&self, name: &str) -> bool {
        self.columns.get(name)
            .map(|c| c.as_any().is::<TypedColumn<T>>())
            .unwrap_or(false)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|s| s.as_str())
    }

    /// The name of the value type of component `name` (as returned by
    /// `std::any::type_name`).
    pub fn value_type(&self, name: &str) -> Option<&'static str> {
        self.columns.get(name).map(|c| c.value_type())
    }

    /// The values of component `name`, indexed by element index.
    pub fn get<T: CustomValue>(&self, name: &str) -> Result<&[T]> {
        let column = self.columns.get(name)
            .ok_or_else(|| Error::UnknownCustomComponent(name.into()))?;
        column.as_any()
            .downcast_ref::<TypedColumn<T>>()
            .map(|c| &c.0[..])
            .ok_or_else(|| bad_type::<T>(name))
    }

    pub fn get_mut<T: CustomValue>(&mut self, name: &str) -> Result<&mut [T]> {
        let column = self.columns.get_mut(name)
            .ok_or_else(|| Error::UnknownCustomComponent(name.into()))?;
        column.as_any_mut()
            .downcast_mut::<TypedColumn<T>>()
            .map(|c| &mut c.0[..])
            .ok_or_else(|| bad_type::<T>(name))
    }

    pub(crate) fn resize(&mut self, len: usize) {
        self.len = len;
        for c in self.columns.values_mut() {
            c.resize(len);
        }
    }

    pub(crate) fn push(&mut self) {
        let len = self.len + 1;
        self.resize(len);
    }

    pub(crate) fn compact<H: Handle>(&mut self, remap: &IndexRemap<H>) {
        for c in self.columns.values_mut() {
            c.compact(&|i| remap.is_kept(i));
        }
        self.len = remap.new_len();
    }

    /// Appends the values of `other`. Components that only exist in `self`
    /// get default values; components that only exist in `other` are
    /// ignored.
    pub(crate) fn append(&mut self, other: &CustomComponents) {
        for (name, c) in &mut self.columns {
            match other.columns.get(name) {
                Some(o) => c.extend_from(&**o),
                None => c.resize(self.len + other.len),
            }
        }
        self.len += other.len;
    }
}

fn bad_type<T>(name: &str) -> Error {
    Error::BadCustomComponentType {
        name: name.into(),
        expected: type_name::<T>(),
    }
}


// ===========================================================================
// ===== Per mesh attributes
// ===========================================================================

trait Attribute: fmt::Debug {
    fn clone_box(&self) -> Box<dyn Attribute>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[derive(Debug, Clone)]
struct Value<T>(T);

impl<T: Any + Clone + fmt::Debug> Attribute for Value<T> {
    fn clone_box(&self) -> Box<dyn Attribute> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Named values attached to a whole mesh.
#[derive(Debug, Default)]
pub struct CustomAttributes {
    values: FxHashMap<String, Box<dyn Attribute>>,
}

impl Clone for CustomAttributes {
    fn clone(&self) -> Self {
        Self {
            values: self.values.iter().map(|(k, v)| (k.clone(), v.clone_box())).collect(),
        }
    }
}

impl CustomAttributes {
    /// Sets attribute `name`, replacing any previous value (of any type).
    pub fn set<T: Any + Clone + fmt::Debug>(&mut self, name: &str, value: T) {
        self.values.insert(name.to_owned(), Box::new(Value(value)));
    }

    pub fn get<T: Any>(&self, name: &str) -> Result<&T> {
        self.values.get(name)
            .ok_or_else(|| Error::UnknownCustomComponent(name.into()))?
            .as_any()
            .downcast_ref::<Value<T>>()
            .map(|v| &v.0)
            .ok_or_else(|| bad_type::<T>(name))
    }

    pub fn get_mut<T: Any>(&mut self, name: &str) -> Result<&mut T> {
        self.values.get_mut(name)
            .ok_or_else(|| Error::UnknownCustomComponent(name.into()))?
            .as_any_mut()
            .downcast_mut::<Value<T>>()
            .map(|v| &mut v.0)
            .ok_or_else(|| bad_type::<T>(name))
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.values.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
