use std::marker::PhantomData;

use crate::{Access, NArray, RVec, Shape, Storage, StorageView};

/// Row-major walk over every coordinate of a shape, last axis fastest.
#[derive(Debug, Clone)]
pub struct Coords {
    shape: Shape,
    next: RVec<usize>,
    remaining: usize,
}

impl Coords {
    pub fn new(shape: Shape) -> Self {
        let remaining = shape.numel();
        let next = RVec::from_elem(0, shape.rank());
        Self {
            shape,
            next,
            remaining,
        }
    }

    /// Yields nothing, whatever the rank.
    pub fn empty(rank: usize) -> Self {
        Self {
            shape: Shape::empty(rank),
            next: RVec::from_elem(0, rank),
            remaining: 0,
        }
    }
}

impl Iterator for Coords {
    type Item = RVec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next.clone();
        for axis in (0..self.shape.rank()).rev() {
            self.next[axis] += 1;
            if self.next[axis] < self.shape[axis] {
                break;
            }
            self.next[axis] = 0;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Coords {}

/// Clones of the elements of a view in row-major order.
pub struct Elements<'a, T, const N: usize, A: Access> {
    array: &'a NArray<T, N, A>,
    coords: Coords,
}

impl<'a, T, const N: usize, A: Access> Elements<'a, T, N, A> {
    pub(crate) fn new(array: &'a NArray<T, N, A>) -> Self {
        Self {
            array,
            coords: array.coords(),
        }
    }
}

impl<T: Clone, const N: usize, A: Access> Iterator for Elements<'_, T, N, A> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let coord = self.coords.next()?;
        // Coords only yields in-bounds coordinates of a view with storage.
        Some(unsafe { self.array.element_at(&coord) }.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.coords.size_hint()
    }
}

impl<T: Clone, const N: usize, A: Access> ExactSizeIterator for Elements<'_, T, N, A> {}

/// # Subarrays
///
/// Every rank-`K` view obtained by fixing the leading axes of a parent view,
/// in row-major order of those axes. Each item shares the parent's storage.
/// A clone taken before iterating replays the whole sequence.
pub struct Subarrays<T, const K: usize, A: Access> {
    storage: Option<Storage<T>>,
    view: StorageView,
    coords: Coords,
    _access: PhantomData<A>,
}

impl<T, const K: usize, A: Access> Subarrays<T, K, A> {
    pub(crate) fn new(storage: Option<Storage<T>>, view: StorageView) -> Self {
        let split = view.rank() - K;
        let coords = match storage {
            Some(_) => Coords::new(view.shape().slice(0..split)),
            None => Coords::empty(split),
        };
        Self {
            storage,
            view,
            coords,
            _access: PhantomData,
        }
    }
}

impl<T, const K: usize, A: Access> Clone for Subarrays<T, K, A> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            view: self.view.clone(),
            coords: self.coords.clone(),
            _access: PhantomData,
        }
    }
}

impl<T, const K: usize, A: Access> Iterator for Subarrays<T, K, A> {
    type Item = NArray<T, K, A>;

    fn next(&mut self) -> Option<Self::Item> {
        let leading = self.coords.next()?;
        let view = self.view.trailing(&leading);
        Some(NArray::from_parts(self.storage.clone(), view))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.coords.size_hint()
    }
}

impl<T, const K: usize, A: Access> ExactSizeIterator for Subarrays<T, K, A> {}
