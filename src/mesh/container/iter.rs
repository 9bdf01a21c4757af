use std::{cmp::Ordering, fmt, iter::FusedIterator, marker::PhantomData};

use crate::{
    handle::Handle,
    mesh::Element,
    sealed::Sealed,
};


/// Decides whether a [`ContainerIter`] yields deleted elements.
///
/// This is a sealed trait, meaning you cannot implement it for your own types.
pub trait IterPolicy: Sealed + 'static {
    const SKIP_DELETED: bool;
}

/// Skip over deleted elements. Advancing by `n` then takes `O(n)`.
#[allow(missing_debug_implementations)]
pub enum JumpDeleted {}
impl Sealed for JumpDeleted {}
impl IterPolicy for JumpDeleted {
    const SKIP_DELETED: bool = true;
}

/// Yield every slot, deleted or not. Advancing is `O(1)`; the caller has to
/// check the deleted flag itself.
#[allow(missing_debug_implementations)]
pub enum Dense {}
impl Sealed for Dense {}
impl IterPolicy for Dense {
    const SKIP_DELETED: bool = false;
}


/// A cursor over the slots of a container, yielding `(handle, element)`
/// pairs in index order.
///
/// Two cursors compare by position only. Comparing cursors of different
/// containers is meaningless.
pub struct ContainerIter<'a, E: Element, P: IterPolicy> {
    elements: &'a [E],
    front: usize,
    back: usize,
    _policy: PhantomData<P>,
}

impl<'a, E: Element, P: IterPolicy> ContainerIter<'a, E, P> {
    pub(crate) fn new(elements: &'a [E]) -> Self {
        Self {
            elements,
            front: 0,
            back: elements.len(),
            _policy: PhantomData,
        }
    }

    fn is_visible(&self, idx: usize) -> bool {
        !P::SKIP_DELETED || !self.elements[idx].is_deleted()
    }

    /// The slot index the cursor currently points to (the next one returned
    /// by `next`, if any).
    pub fn position(&self) -> usize {
        self.front
    }

    /// The element `next` would return, without moving.
    pub fn peek(&self) -> Option<(E::Handle, &'a E)> {
        self.clone().next()
    }

    /// Moves forward by `n` visible elements, stopping at the end.
    pub fn advance(&mut self, n: usize) {
        if P::SKIP_DELETED {
            for _ in 0..n {
                if self.next().is_none() {
                    break;
                }
            }
        } else {
            self.front = (self.front + n).min(self.back);
        }
    }

    /// Moves backward by `n` visible elements, stopping at the first slot.
    pub fn retreat(&mut self, n: usize) {
        if P::SKIP_DELETED {
            let mut remaining = n;
            let mut pos = self.front;
            while remaining > 0 && pos > 0 {
                pos -= 1;
                if self.is_visible(pos) {
                    remaining -= 1;
                    self.front = pos;
                }
            }
        } else {
            self.front = self.front.saturating_sub(n);
        }
    }

    /// Number of visible elements between this cursor and `other`. Positive
    /// if `other` is further forward.
    pub fn distance_to(&self, other: &Self) -> isize {
        let (lo, hi, sign) = if self.front <= other.front {
            (self.front, other.front, 1)
        } else {
            (other.front, self.front, -1)
        };

        let count = if P::SKIP_DELETED {
            (lo..hi.min(self.elements.len())).filter(|&i| self.is_visible(i)).count()
        } else {
            hi - lo
        };

        sign * count as isize
    }
}

impl<E: Element, P: IterPolicy> Clone for ContainerIter<'_, E, P> {
    fn clone(&self) -> Self {
        Self {
            elements: self.elements,
            front: self.front,
            back: self.back,
            _policy: PhantomData,
        }
    }
}

impl<E: Element, P: IterPolicy> fmt::Debug for ContainerIter<'_, E, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ContainerIter")
            .field("position", &self.front)
            .field("end", &self.back)
            .field("skip_deleted", &P::SKIP_DELETED)
            .finish()
    }
}

impl<E: Element, P: IterPolicy> PartialEq for ContainerIter<'_, E, P> {
    fn eq(&self, other: &Self) -> bool {
        self.front == other.front
    }
}

impl<E: Element, P: IterPolicy> Eq for ContainerIter<'_, E, P> {}

impl<E: Element, P: IterPolicy> PartialOrd for ContainerIter<'_, E, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Element, P: IterPolicy> Ord for ContainerIter<'_, E, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.front.cmp(&other.front)
    }
}

impl<'a, E: Element, P: IterPolicy> Iterator for ContainerIter<'a, E, P> {
    type Item = (E::Handle, &'a E);

    fn next(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            let idx = self.front;
            self.front += 1;
            if self.is_visible(idx) {
                return Some((E::Handle::from_usize(idx), &self.elements[idx]));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        if P::SKIP_DELETED {
            (0, Some(remaining))
        } else {
            (remaining, Some(remaining))
        }
    }
}

impl<E: Element, P: IterPolicy> DoubleEndedIterator for ContainerIter<'_, E, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while self.back > self.front {
            self.back -= 1;
            let idx = self.back;
            if self.is_visible(idx) {
                return Some((E::Handle::from_usize(idx), &self.elements[idx]));
            }
        }

        None
    }
}

impl<E: Element, P: IterPolicy> FusedIterator for ContainerIter<'_, E, P> {}
