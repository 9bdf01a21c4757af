use std::{fmt, marker::PhantomData, ops::Index};

use stable_vec::StableVec;

use crate::handle::Handle;


/// A map from handles to values, stored in a vector indexed by the handle.
///
/// Memory grows with the container size, not with the number of entries.
/// As all containers of this crate hand out sequential handles, this fits
/// per element results of an algorithm, where (almost) every slot gets a
/// value. Slots without value are allowed.
///
/// # Example
///
/// ```
/// use tessel::{VertexHandle, Handle, map::DenseMap};
///
/// let map = DenseMap::<VertexHandle, _>::from_elem("bob", 2);
/// assert_eq!(map.num_elements(), 2);
/// assert_eq!(map.get(VertexHandle::from_usize(1)), Some(&"bob"));
/// assert_eq!(map.get(VertexHandle::from_usize(2)), None);
/// ```
#[derive(Clone)]
pub struct DenseMap<H: Handle, T> {
    vec: StableVec<T>,
    _dummy: PhantomData<H>,
}

impl<H: Handle, T: Clone> DenseMap<H, T> {
    /// A map with `value` for each of the handles `0..count`. Usually called
    /// with the container size of some element kind.
    pub fn from_elem(value: T, count: usize) -> Self {
        let mut vec = StableVec::with_capacity(count);
        for _ in 0..count {
            vec.push(value.clone());
        }

        Self {
            vec,
            _dummy: PhantomData,
        }
    }
}

impl<H: Handle, T> DenseMap<H, T> {
    /// Number of handles with a value.
    pub fn num_elements(&self) -> usize {
        self.vec.num_elements()
    }

    pub fn get(&self, handle: H) -> Option<&T> {
        self.vec.get(handle.to_usize())
    }

    pub fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        self.vec.get_mut(handle.to_usize())
    }
}

impl<H: Handle, T> Index<H> for DenseMap<H, T> {
    type Output = T;
    fn index(&self, handle: H) -> &Self::Output {
        match self.get(handle) {
            None => panic!("no value in map for handle '{:?}'", handle),
            Some(r) => r,
        }
    }
}

impl<H: Handle, T: fmt::Debug> fmt::Debug for DenseMap<H, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(self.vec.iter().map(|(i, value)| (H::from_usize(i), value)))
            .finish()
    }
}
