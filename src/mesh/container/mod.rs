//! Storage for all elements of one kind.

use std::fmt;

use crate::{
    comp::{ComponentKind, CustomComponents, CustomValue, ElementFlags, IndexRemap, RefVisitor, RefVisitorMut},
    error::{BadIndexReason, Error, Result},
    handle::Handle,
};
use super::{Element, HandleIter, MeshId, SideStorage};

mod iter;

pub use self::iter::{ContainerIter, Dense, IterPolicy, JumpDeleted};


/// A growable sequence of elements of one kind, plus the side tables of
/// their optional components and their custom components.
///
/// Elements are addressed by handle (index). Deleting an element only marks
/// it; its slot stays until the container is compacted, which is done via
/// the owning mesh so that all references can be rewritten.
pub struct Container<E: Element> {
    pub(crate) elements: Vec<E>,
    pub(crate) side: E::Side,
    pub(crate) custom: CustomComponents,
    num_deleted: usize,
    owner: MeshId,
}

impl<E: Element> Container<E> {
    pub(crate) fn new(owner: MeshId) -> Self {
        Self {
            elements: Vec::new(),
            side: Default::default(),
            custom: Default::default(),
            num_deleted: 0,
            owner,
        }
    }

    /// The mesh this container belongs to.
    pub fn owner(&self) -> MeshId {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: MeshId) {
        self.owner = owner;
    }

    /// Number of live (not deleted) elements.
    pub fn num_elements(&self) -> usize {
        self.elements.len() - self.num_deleted
    }

    /// Number of slots, deleted ones included. All handles `< container_size`
    /// are valid indices.
    pub fn container_size(&self) -> usize {
        self.elements.len()
    }

    pub fn num_deleted(&self) -> usize {
        self.num_deleted
    }

    pub fn is_empty(&self) -> bool {
        self.num_elements() == 0
    }

    /// Returns `true` if `h` refers to a live element.
    pub fn contains(&self, h: E::Handle) -> bool {
        self.elements.get(h.to_usize()).map(|e| !e.is_deleted()).unwrap_or(false)
    }

    /// Returns `true` if the slot `h` exists and is marked deleted.
    pub fn is_deleted(&self, h: E::Handle) -> bool {
        self.elements.get(h.to_usize()).map(|e| e.is_deleted()).unwrap_or(false)
    }

    /// Checks that `h` refers to a live element.
    pub fn check_handle(&self, h: E::Handle) -> std::result::Result<(), BadIndexReason> {
        match self.elements.get(h.to_usize()) {
            None => Err(BadIndexReason::OutOfRange { container_size: self.elements.len() }),
            Some(e) if e.is_deleted() => Err(BadIndexReason::Deleted),
            Some(_) => Ok(()),
        }
    }

    pub fn get(&self, h: E::Handle) -> Option<&E> {
        self.elements.get(h.to_usize()).filter(|e| !e.is_deleted())
    }

    pub fn flags(&self, h: E::Handle) -> &ElementFlags {
        self.elements[h.to_usize()].flags()
    }

    pub fn flags_mut(&mut self, h: E::Handle) -> &mut ElementFlags {
        self.elements[h.to_usize()].flags_mut()
    }

    /// Iterates over all live elements.
    pub fn iter(&self) -> ContainerIter<'_, E, JumpDeleted> {
        ContainerIter::new(&self.elements)
    }

    /// Iterates over all slots, including deleted ones.
    pub fn iter_dense(&self) -> ContainerIter<'_, E, Dense> {
        ContainerIter::new(&self.elements)
    }

    /// Handles of all live elements, in increasing order.
    pub fn handles(&self) -> HandleIter<'_, E> {
        HandleIter::new(self.iter())
    }

    /// Bitset of the currently enabled optional components.
    pub fn enabled_components(&self) -> u32 {
        self.side.enabled_components()
    }

    /// Whether the elements currently have component `kind`: it is either
    /// stored inside the elements or an enabled optional component. Custom
    /// components count if at least one exists.
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Custom => self.custom.names().next().is_some(),
            _ => (E::INLINE_COMPONENTS | self.enabled_components()) & kind.bit() != 0,
        }
    }

    pub fn custom_components(&self) -> &CustomComponents {
        &self.custom
    }

    pub fn custom_components_mut(&mut self) -> &mut CustomComponents {
        &mut self.custom
    }

    /// Adds the custom component `name` with value type `T`.
    pub fn add_custom_component<T: CustomValue>(&mut self, name: &str) {
        self.custom.add::<T>(name);
    }

    /// The value of custom component `name` for element `h`.
    pub fn custom<T: CustomValue>(&self, name: &str, h: E::Handle) -> Result<&T> {
        Ok(&self.custom.get::<T>(name)?[h.to_usize()])
    }

    pub fn custom_mut<T: CustomValue>(&mut self, name: &str, h: E::Handle) -> Result<&mut T> {
        Ok(&mut self.custom.get_mut::<T>(name)?[h.to_usize()])
    }

    /// Old index to compact index for every slot, without modifying anything.
    pub fn compact_indices(&self) -> IndexRemap<E::Handle> {
        let kept = self.elements.iter().map(|e| !e.is_deleted()).collect::<Vec<_>>();
        IndexRemap::from_kept(&kept)
    }

    /// The handle `h` would have after compaction. `None` if `h` is deleted
    /// or out of range.
    pub fn index_if_compact(&self, h: E::Handle) -> Option<E::Handle> {
        let idx = h.to_usize();
        if self.elements.get(idx)?.is_deleted() {
            return None;
        }

        let deleted_before = self.elements[..idx].iter().filter(|e| e.is_deleted()).count();
        Some(E::Handle::from_usize(idx - deleted_before))
    }

    /// Passes all references held by elements of this container (live and
    /// deleted) to `v`.
    pub fn visit_refs<V: RefVisitor>(&self, v: &mut V) {
        for idx in 0..self.elements.len() {
            self.visit_element_refs(idx, v);
        }
    }

    /// Passes the references held by the element in slot `idx` to `v`.
    pub fn visit_element_refs<V: RefVisitor>(&self, idx: usize, v: &mut V) {
        self.elements[idx].visit_refs(v);
        self.side.visit_refs_at(idx, v);
    }

    pub(crate) fn visit_refs_mut<V: RefVisitorMut>(&mut self, v: &mut V) {
        for e in &mut self.elements {
            e.visit_refs_mut(v);
        }
        self.side.visit_refs_mut(v);
    }

    // ----- Mutations. These are exposed through the meshes. ----------------

    pub(crate) fn add(&mut self) -> E::Handle {
        self.push(E::new())
    }

    pub(crate) fn push(&mut self, elem: E) -> E::Handle {
        let h = E::Handle::from_usize(self.elements.len());
        self.side.push_for(&elem);
        self.elements.push(elem);
        self.custom.push();
        h
    }

    /// Adds `n` elements, returning the handle of the first one.
    pub(crate) fn add_n(&mut self, n: usize) -> E::Handle {
        let first = E::Handle::from_usize(self.elements.len());
        self.reserve(n);
        for _ in 0..n {
            self.add();
        }
        first
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.elements.reserve(additional);
        self.side.reserve(additional);
    }

    /// Makes the number of live elements equal `n`: new elements are added
    /// at the end, or the last live elements are marked deleted.
    pub(crate) fn resize(&mut self, n: usize) {
        let live = self.num_elements();
        if n > live {
            self.add_n(n - live);
        } else {
            let mut to_delete = live - n;
            let mut idx = self.elements.len();
            while to_delete > 0 {
                idx -= 1;
                if !self.elements[idx].is_deleted() {
                    self.delete(E::Handle::from_usize(idx));
                    to_delete -= 1;
                }
            }
        }
    }

    /// Removes all elements. Enabled optional components stay enabled,
    /// custom components are kept (empty).
    pub(crate) fn clear(&mut self) {
        self.elements.clear();
        self.side.clear();
        self.custom.resize(0);
        self.num_deleted = 0;
    }

    /// Marks the element deleted. Deleting an already deleted element does
    /// nothing.
    pub(crate) fn delete(&mut self, h: E::Handle) {
        let flags = self.elements[h.to_usize()].flags_mut();
        if !flags.is_deleted() {
            flags.set_deleted(true);
            self.num_deleted += 1;
        }
    }

    /// Returns an error if `h` does not refer to a live element.
    pub(crate) fn require(&self, h: E::Handle) -> Result<()> {
        self.check_handle(h).map_err(|reason| Error::bad_index(E::KIND, h.to_usize(), reason))
    }

    /// Removes all deleted slots. Does not touch references; the caller has
    /// to apply the returned remap to every container of the mesh.
    pub(crate) fn compact(&mut self) -> IndexRemap<E::Handle> {
        let remap = self.compact_indices();
        if self.num_deleted == 0 {
            return remap;
        }

        self.side.compact(&remap);
        self.custom.compact(&remap);
        self.elements.retain(|e| !e.is_deleted());
        self.num_deleted = 0;
        remap
    }

    /// Appends all slots of `other`, whose references must already be
    /// shifted to this container's mesh.
    pub(crate) fn append(&mut self, other: Container<E>) {
        self.side.append(&other.side, &other.elements);
        self.custom.append(&other.custom);
        self.num_deleted += other.num_deleted;
        self.elements.extend(other.elements);
    }
}

impl<E: Element> Clone for Container<E> {
    fn clone(&self) -> Self {
        Self {
            elements: self.elements.clone(),
            side: self.side.clone(),
            custom: self.custom.clone(),
            num_deleted: self.num_deleted,
            owner: self.owner,
        }
    }
}

impl<E: Element> fmt::Debug for Container<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Container")
            .field("kind", &E::KIND)
            .field("elements", &self.elements)
            .field("num_deleted", &self.num_deleted)
            .field("side", &self.side)
            .field("custom", &self.custom)
            .finish()
    }
}
