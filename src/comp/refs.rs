//! Reference components and the machinery to rewrite them.
//!
//! Every component that refers to other elements exposes its handles to a
//! visitor. The visitor is generic over the handle type, so one visitor can
//! rewrite e.g. all face references of all components of all element kinds
//! after the face container was compacted, without any code specific to a
//! particular mesh type.

use std::fmt;

use optional::Optioned as Opt;
use smallvec::SmallVec;

use crate::handle::{hsize, ElementKind, Handle};
use super::ComponentKind;


/// A dynamically sized list of references, e.g. the faces adjacent to a
/// vertex.
pub type RefList<H> = SmallVec<[Opt<H>; 6]>;

/// Visits the references stored in components.
pub trait RefVisitor {
    /// Called once per component (or per group of references within a
    /// component) holding references to elements of kind `H::KIND`.
    fn visit<H: Handle>(&mut self, component: ComponentKind, refs: &[Opt<H>]);
}

/// Like [`RefVisitor`], but can modify the references.
pub trait RefVisitorMut {
    fn visit_mut<H: Handle>(&mut self, component: ComponentKind, refs: &mut [Opt<H>]);
}


// ===========================================================================
// ===== IndexRemap
// ===========================================================================

/// The result of compacting a container: maps every old index to its new
/// index, or to nothing if the element was removed.
#[derive(Clone)]
pub struct IndexRemap<H: Handle> {
    new: Vec<Opt<H>>,
}

impl<H: Handle> IndexRemap<H> {
    /// Creates the order-preserving renumbering that keeps exactly the slots
    /// for which `kept` is `true`.
    pub fn from_kept(kept: &[bool]) -> Self {
        let mut next = 0;
        let new = kept.iter()
            .map(|&keep| {
                if keep {
                    next += 1;
                    Opt::some(H::new(next - 1))
                } else {
                    Opt::none()
                }
            })
            .collect();

        Self { new }
    }

    /// A remap with an explicit target (or none) per old slot. Unlike the
    /// remaps created by compaction, several slots may share one target.
    pub(crate) fn from_targets(new: Vec<Opt<H>>) -> Self {
        Self { new }
    }

    /// The remap that keeps every one of `len` slots in place.
    pub fn identity(len: usize) -> Self {
        Self {
            new: (0..len).map(|i| Opt::some(H::from_usize(i))).collect(),
        }
    }

    /// New handle of the element previously referred to by `old`. `None` if
    /// the element was removed or `old` is out of range.
    pub fn get(&self, old: H) -> Option<H> {
        self.new.get(old.to_usize()).and_then(|h| h.into_option())
    }

    pub(crate) fn new_index(&self, old: hsize) -> Option<hsize> {
        self.new.get(old as usize).and_then(|h| h.into_option()).map(|h| h.idx())
    }

    pub fn is_kept(&self, old_idx: usize) -> bool {
        self.new.get(old_idx).map(|h| h.is_some()).unwrap_or(false)
    }

    /// Number of slots before the compaction.
    pub fn old_len(&self) -> usize {
        self.new.len()
    }

    /// Number of elements after the compaction.
    pub fn new_len(&self) -> usize {
        self.new.iter().filter(|h| h.is_some()).count()
    }

    pub fn num_removed(&self) -> usize {
        self.old_len() - self.new_len()
    }

    /// Returns `true` if no element moves.
    pub fn is_identity(&self) -> bool {
        self.new.iter()
            .enumerate()
            .all(|(i, h)| h.into_option().map(|h| h.to_usize()) == Some(i))
    }

    /// The new index per old index, `None` for removed ones.
    pub fn as_slice(&self) -> &[Opt<H>] {
        &self.new
    }
}

impl<H: Handle> fmt::Debug for IndexRemap<H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(self.new.iter().enumerate().map(|(i, h)| (i, h.into_option())))
            .finish()
    }
}


// ===========================================================================
// ===== Visitors used by containers and meshes
// ===========================================================================

/// Rewrites all references to kind `K` according to a remap. References to
/// removed elements become null.
pub(crate) struct Remap<'a, K: Handle>(pub(crate) &'a IndexRemap<K>);

impl<K: Handle> RefVisitorMut for Remap<'_, K> {
    fn visit_mut<H: Handle>(&mut self, _: ComponentKind, refs: &mut [Opt<H>]) {
        if H::KIND != K::KIND {
            return;
        }

        for r in refs {
            if let Some(old) = r.into_option() {
                *r = match self.0.new_index(old.idx()) {
                    Some(new) => Opt::some(H::new(new)),
                    None => Opt::none(),
                };
            }
        }
    }
}

/// Sets all references to elements of the given kind to null.
pub(crate) struct Nullify(pub(crate) ElementKind);

impl RefVisitorMut for Nullify {
    fn visit_mut<H: Handle>(&mut self, _: ComponentKind, refs: &mut [Opt<H>]) {
        if H::KIND == self.0 {
            for r in refs {
                *r = Opt::none();
            }
        }
    }
}

/// Adds a per-kind offset to all references. Used when appending one mesh to
/// another.
pub(crate) struct Shift(pub(crate) [hsize; 4]);

impl RefVisitorMut for Shift {
    fn visit_mut<H: Handle>(&mut self, _: ComponentKind, refs: &mut [Opt<H>]) {
        let offset = self.0[H::KIND.index()];
        if offset == 0 {
            return;
        }

        for r in refs {
            if let Some(h) = r.into_option() {
                *r = Opt::some(H::new(h.idx() + offset));
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use crate::handle::{FaceHandle, VertexHandle};
    use super::*;

    #[test]
    fn remap_from_kept() {
        let remap = IndexRemap::<FaceHandle>::from_kept(&[true, false, false, true, true]);
        assert_eq!(remap.get(FaceHandle::new(0)), Some(FaceHandle::new(0)));
        assert_eq!(remap.get(FaceHandle::new(1)), None);
        assert_eq!(remap.get(FaceHandle::new(3)), Some(FaceHandle::new(1)));
        assert_eq!(remap.get(FaceHandle::new(4)), Some(FaceHandle::new(2)));
        assert_eq!(remap.get(FaceHandle::new(9)), None);
        assert_eq!(remap.num_removed(), 2);
        assert!(!remap.is_identity());
        assert!(IndexRemap::<FaceHandle>::identity(3).is_identity());
    }

    #[test]
    fn remap_visitor_only_touches_its_kind() {
        let remap = IndexRemap::<FaceHandle>::from_kept(&[false, true]);
        let mut faces = [Opt::some(FaceHandle::new(0)), Opt::some(FaceHandle::new(1)), Opt::none()];
        let mut vertices = [Opt::some(VertexHandle::new(1))];

        let mut v = Remap(&remap);
        v.visit_mut(ComponentKind::AdjacentFaces, &mut faces);
        v.visit_mut(ComponentKind::VertexReferences, &mut vertices);

        assert!(faces[0].is_none());
        assert_eq!(faces[1].into_option(), Some(FaceHandle::new(0)));
        assert!(faces[2].is_none());
        assert_eq!(vertices[0].into_option(), Some(VertexHandle::new(1)));
    }

    #[test]
    fn shift_and_nullify() {
        let mut refs = [Opt::some(VertexHandle::new(2)), Opt::none()];
        Shift([10, 0, 0, 0]).visit_mut(ComponentKind::VertexReferences, &mut refs);
        assert_eq!(refs[0].into_option(), Some(VertexHandle::new(12)));
        assert!(refs[1].is_none());

        Nullify(ElementKind::Vertex).visit_mut(ComponentKind::VertexReferences, &mut refs);
        assert!(refs.iter().all(|r| r.is_none()));
    }
}
