use std::marker::PhantomData;
use std::ops::Range;

use derive_new::new;

use crate::{
    cpu, Access, Broadcast, Condense, Coords, Elements, Enforcer, Flip, InvariantError, Operation,
    OperationError, Permute, RVec, RawCPUBuffer, ReadOnly, ReadWrite, Select, Shape, Skip, Slice,
    Storage, Strides, Subarrays, View, Window,
};

#[cfg(feature = "rand")]
use {rand::prelude::*, rand_distr::StandardNormal};

/// Arrays are just a view into their underlying element storage.
///
/// Element `coord` lives at `offset + Σ coord[i] * strides[i]`.
#[derive(new, Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageView {
    shape: Shape,
    strides: Strides,
    offset: isize,
}

impl StorageView {
    /// Row-major layout of `shape` starting at address 0.
    pub fn contiguous(shape: Shape) -> Self {
        let strides = Strides::from(&shape);
        Self::new(shape, strides, 0)
    }

    pub fn empty(rank: usize) -> Self {
        Self::new(Shape::empty(rank), Strides::zeros(rank), 0)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn strides(&self) -> &Strides {
        &self.strides
    }

    pub fn offset(&self) -> isize {
        self.offset
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    pub fn into_parts(self) -> (Shape, Strides, isize) {
        (self.shape, self.strides, self.offset)
    }

    /// Storage address of `coord`. No bounds checking.
    #[inline]
    pub fn address(&self, coord: &[usize]) -> isize {
        coord
            .iter()
            .zip(self.strides.iter())
            .fold(self.offset, |addr, (&c, &s)| addr + c as isize * s)
    }

    /// True if the strides are the row-major strides of the shape. Axes of
    /// extent 0 or 1 never move the address and are not compared.
    pub fn is_contiguous(&self) -> bool {
        let expected = Strides::from(&self.shape);
        let contiguous = self
            .shape
            .iter()
            .zip(self.strides.iter().zip(expected.iter()))
            .all(|(&dim, (s, e))| dim <= 1 || s == e);
        contiguous
    }

    /// The view over the trailing axes left after fixing the leading ones.
    pub fn trailing(&self, leading: &[usize]) -> StorageView {
        let split = leading.len();
        let offset = self.address(leading);
        let shape = self.shape.slice(split..self.rank());
        let strides = Strides::new(self.strides.inner()[split..].iter().copied().collect());
        StorageView::new(shape, strides, offset)
    }
}

/// # NArray
///
/// A rank-`N` strided view over a shared, reference counted block of
/// elements. Cloning the handle shares the storage, view transformations
/// derive new handles over the same storage without touching an element, and
/// [`NArray::deep_clone`] copies the viewed elements into fresh storage.
///
/// The access marker `A` decides whether elements can be written through the
/// handle. Storage is shared through `Rc`, so arrays stay on one thread.
pub struct NArray<T, const N: usize, A: Access = ReadWrite> {
    storage: Option<Storage<T>>,
    view: StorageView,
    _access: PhantomData<A>,
}

impl<T, const N: usize> NArray<T, N, ReadWrite> {
    pub(crate) fn from_raw(raw: RawCPUBuffer<T>, shape: Shape) -> Self {
        debug_assert_eq!(raw.capacity(), shape.numel());
        Self::from_parts(Some(raw.into()), StorageView::contiguous(shape))
    }

    /// Default constructs every element.
    ///
    /// # Panics
    ///
    /// If the element count of `shape` overflows.
    ///
    /// The element type must implement `Default`:
    ///
    /// ```compile_fail
    /// use narray::NArray;
    ///
    /// struct NoDefault;
    /// let _ = NArray::<NoDefault, 1>::new([3]);
    /// ```
    pub fn new(shape: [usize; N]) -> Self
    where
        T: Default,
    {
        let shape = Shape::from(shape);
        Self::from_raw(RawCPUBuffer::from_default(shape.numel()), shape)
    }

    /// Clones `value` into every element.
    ///
    /// # Panics
    ///
    /// If the element count of `shape` overflows.
    pub fn full(shape: [usize; N], value: T) -> Self
    where
        T: Clone,
    {
        let shape = Shape::from(shape);
        Self::from_raw(RawCPUBuffer::from_value(shape.numel(), value), shape)
    }

    /// Fills in row-major order from `elems`.
    ///
    /// At most `size` items are pulled from the iterator. If it runs out
    /// early the remaining elements are default constructed.
    ///
    /// # Panics
    ///
    /// If the element count of `shape` overflows.
    pub fn from_elems<I>(shape: [usize; N], elems: I) -> Self
    where
        T: Default,
        I: IntoIterator<Item = T>,
    {
        let shape = Shape::from(shape);
        let raw = RawCPUBuffer::from_iter_padded(shape.numel(), elems, T::default);
        Self::from_raw(raw, shape)
    }

    /// Like [`NArray::from_elems`], but fails instead of padding a short input.
    pub fn try_from_elems<I>(shape: [usize; N], elems: I) -> Result<Self, InvariantError>
    where
        I: IntoIterator<Item = T>,
    {
        let shape = Shape::from(shape);
        let raw = RawCPUBuffer::try_from_iter(Enforcer::check_numel(&shape)?, elems)?;
        Ok(Self::from_raw(raw, shape))
    }

    /// Builds every element from its coordinate, in row-major order.
    ///
    /// # Panics
    ///
    /// If the element count of `shape` overflows.
    pub fn from_fn<F>(shape: [usize; N], mut f: F) -> Self
    where
        F: FnMut([usize; N]) -> T,
    {
        let shape = Shape::from(shape);
        let raw = RawCPUBuffer::from_fn(shape.numel(), |i| {
            let mut coord = [0; N];
            coord.copy_from_slice(&shape.unravel(i));
            f(coord)
        });
        Self::from_raw(raw, shape)
    }

    /// Standard normal samples.
    #[cfg(feature = "rand")]
    pub fn randn(shape: [usize; N]) -> Self
    where
        T: crate::NDType + num_traits::Float,
    {
        let mut rng = rand::thread_rng();
        Self::from_fn(shape, |_| {
            let sample: f64 = StandardNormal.sample(&mut rng);
            <T as num_traits::NumCast>::from(sample).unwrap_or_else(T::nan)
        })
    }

    /// Writes `value` at `coord`, dropping the element it replaces.
    pub fn set(&self, coord: [usize; N], value: T) -> Result<(), InvariantError> {
        let ptr = self.checked_ptr(&coord)?;
        // No reference to the element is handed out by a safe method.
        drop(unsafe { std::ptr::replace(ptr, value) });
        Ok(())
    }

    /// Writes a clone of `value` into every element of the view.
    pub fn fill(&self, value: T) -> Result<(), InvariantError>
    where
        T: Clone,
    {
        for coord in self.coords() {
            let ptr = self.checked_ptr(&coord)?;
            drop(unsafe { std::ptr::replace(ptr, value.clone()) });
        }
        Ok(())
    }

    /// Mutable reference to the element at `coord`.
    ///
    /// # Safety
    ///
    /// `coord` must be in bounds and the array must have storage. No other
    /// reference to the same element, through this or any other handle
    /// sharing the storage, may be alive while the returned one is.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn get_unchecked_mut(&self, coord: [usize; N]) -> &mut T {
        &mut *self.raw_ptr(&coord)
    }

    pub fn into_read_only(self) -> NArray<T, N, ReadOnly> {
        self.into()
    }
}

impl<T, const N: usize, A: Access> NArray<T, N, A> {
    pub(crate) fn from_parts(storage: Option<Storage<T>>, view: StorageView) -> Self {
        debug_assert_eq!(view.rank(), N);
        Self {
            storage,
            view,
            _access: PhantomData,
        }
    }

    pub fn view(&self) -> &StorageView {
        &self.view
    }

    pub fn storage(&self) -> Option<&Storage<T>> {
        self.storage.as_ref()
    }

    /// Number of elements reachable through the view. An array without
    /// storage has none, whatever its shape.
    pub fn size(&self) -> usize {
        match self.storage {
            Some(_) => self.view.numel(),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn shape(&self) -> &Shape {
        self.view.shape()
    }

    pub fn strides(&self) -> &Strides {
        self.view.strides()
    }

    pub fn offset(&self) -> isize {
        self.view.offset()
    }

    pub fn dims(&self) -> [usize; N] {
        let mut dims = [0; N];
        dims.copy_from_slice(self.view.shape().inner());
        dims
    }

    pub fn rank(&self) -> usize {
        N
    }

    pub fn is_contiguous(&self) -> bool {
        self.view.is_contiguous()
    }

    /// Number of handles sharing the storage, 0 if there is none.
    pub fn use_count(&self) -> usize {
        self.storage.as_ref().map_or(0, Storage::use_count)
    }

    /// True if this is the only handle on its storage.
    pub fn is_unique(&self) -> bool {
        self.use_count() == 1
    }

    /// True if both arrays view the same storage block.
    pub fn shares_storage<B: Access>(&self, other: &NArray<T, N, B>) -> bool {
        match (&self.storage, &other.storage) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// All valid coordinates, row-major.
    pub fn coords(&self) -> Coords {
        match self.storage {
            Some(_) => Coords::new(self.view.shape().clone()),
            None => Coords::empty(N),
        }
    }

    fn checked_ptr(&self, coord: &[usize]) -> Result<*mut T, InvariantError> {
        let storage = self.storage.as_ref().ok_or(InvariantError::NoStorage)?;
        Enforcer::check_coord(self.view.shape(), coord)?;
        Ok(unsafe { storage.element_ptr(self.view.address(coord)) })
    }

    /// # Safety
    ///
    /// The array has storage and `coord` is in bounds.
    #[inline]
    unsafe fn raw_ptr(&self, coord: &[usize]) -> *mut T {
        debug_assert!(self.storage.is_some());
        let storage = self.storage.as_ref().unwrap_unchecked();
        storage.element_ptr(self.view.address(coord))
    }

    /// # Safety
    ///
    /// The array has storage and `coord` is in bounds.
    #[inline]
    pub(crate) unsafe fn element_at(&self, coord: &[usize]) -> &T {
        &*self.raw_ptr(coord)
    }

    /// Clone of the element at `coord`.
    pub fn get(&self, coord: [usize; N]) -> Result<T, InvariantError>
    where
        T: Clone,
    {
        let ptr = self.checked_ptr(&coord)?;
        Ok(unsafe { (*ptr).clone() })
    }

    /// Address of the element at `coord`. Handles sharing storage resolve a
    /// shared element to the same address.
    pub fn element_ptr(&self, coord: [usize; N]) -> Result<*const T, InvariantError> {
        self.checked_ptr(&coord).map(|ptr| ptr as *const T)
    }

    /// Reference to the element at `coord`.
    ///
    /// # Safety
    ///
    /// `coord` must be in bounds and the array must have storage. The element
    /// must not be written through any handle while the reference is alive.
    pub unsafe fn get_unchecked(&self, coord: [usize; N]) -> &T {
        self.element_at(&coord)
    }

    /// Clones of every element, row-major.
    pub fn iter(&self) -> Elements<'_, T, N, A>
    where
        T: Clone,
    {
        Elements::new(self)
    }

    fn derive<const M: usize>(
        &self,
        op: &impl Operation,
    ) -> Result<NArray<T, M, A>, OperationError> {
        let view = op.apply(&self.view)?;
        Enforcer::assert_rank(view.shape(), M)?;
        Ok(NArray::from_parts(self.storage.clone(), view))
    }

    /// The block `origin[i]..origin[i] + extent[i]` of every axis.
    pub fn subarray(&self, origin: [usize; N], extent: [usize; N]) -> Result<Self, OperationError> {
        self.derive(&Slice::from_origin_extent(self.shape(), &origin, &extent)?)
    }

    pub fn slice(&self, ranges: [Range<usize>; N]) -> Result<Self, OperationError> {
        self.derive(&Slice::new(ranges.into_iter().collect()))
    }

    /// `len` elements of `axis` starting at `start`, every other axis whole.
    pub fn range(&self, axis: usize, start: usize, len: usize) -> Result<Self, OperationError> {
        Enforcer::check_axis(self.shape(), axis)?;
        let end = start
            .checked_add(len)
            .ok_or_else(|| InvariantError::OutOfBounds {
                axis,
                index: start,
                dim: self.shape()[axis],
            })?;
        let ranges = self
            .shape()
            .iter()
            .enumerate()
            .map(|(i, &dim)| if i == axis { start..end } else { 0..dim })
            .collect::<RVec<_>>();
        self.derive(&Slice::new(ranges))
    }

    pub fn flip(&self, axis: usize) -> Result<Self, OperationError> {
        self.derive(&Flip::new(axis))
    }

    /// Reverses the order of the axes.
    pub fn transpose(&self) -> Result<Self, OperationError> {
        self.derive(&Permute::reversed(N))
    }

    pub fn permute(&self, dims: [usize; N]) -> Result<Self, OperationError> {
        self.derive(&Permute::new(dims.into_iter().collect()))
    }

    pub fn skip(&self, axis: usize, factor: usize, start: usize) -> Result<Self, OperationError> {
        self.derive(&Skip::new(axis, factor, start))
    }

    /// Sliding windows of `size` along `axis`, as a new trailing axis.
    /// `M` must be `N + 1`.
    pub fn window<const M: usize>(
        &self,
        axis: usize,
        size: usize,
    ) -> Result<NArray<T, M, A>, OperationError> {
        self.derive(&Window::new(axis, size))
    }

    /// Appends a trailing axis of `count` that aliases every element.
    /// `M` must be `N + 1`.
    pub fn repeat<const M: usize>(&self, count: usize) -> Result<NArray<T, M, A>, OperationError> {
        self.derive(&Broadcast::new(count))
    }

    pub fn reshape<const M: usize>(
        &self,
        shape: [usize; M],
    ) -> Result<NArray<T, M, A>, OperationError> {
        self.derive(&View::new(shape.into()))
    }

    pub fn as_condensed(&self) -> Result<Self, OperationError> {
        self.derive(&Condense)
    }

    /// Fixes the first axis at `index`. `M` must be `N - 1`.
    pub fn at<const M: usize>(&self, index: usize) -> Result<NArray<T, M, A>, OperationError> {
        self.slice_axis(0, index)
    }

    /// Fixes `axis` at `index`. `M` must be `N - 1`.
    pub fn slice_axis<const M: usize>(
        &self,
        axis: usize,
        index: usize,
    ) -> Result<NArray<T, M, A>, OperationError> {
        self.derive(&Select::new(axis, index))
    }

    /// Rank-`K` views over the trailing axes, one per coordinate of the
    /// leading `N - K` axes.
    pub fn subarrays<const K: usize>(&self) -> Result<Subarrays<T, K, A>, InvariantError> {
        Enforcer::assert_rank_range(K, 0..=N)?;
        Ok(Subarrays::new(self.storage.clone(), self.view.clone()))
    }

    /// Reduces the trailing `M` axes: `f` maps each rank-`M` subarray to one
    /// element of a fresh rank-`K` array. `K + M` must be `N`.
    pub fn compress<U, const K: usize, const M: usize, F>(
        &self,
        f: F,
    ) -> Result<NArray<U, K>, OperationError>
    where
        F: FnMut(NArray<T, M, A>) -> U,
    {
        cpu::compress(self, f)
    }

    /// Applies `f` to every element into a fresh, row-major array.
    pub fn map<U, F>(&self, mut f: F) -> NArray<U, N>
    where
        F: FnMut(&T) -> U,
    {
        if self.storage.is_none() {
            return NArray::from_parts(None, StorageView::contiguous(self.shape().clone()));
        }
        let shape = self.shape().clone();
        let raw = RawCPUBuffer::from_fn(shape.numel(), |i| {
            f(unsafe { self.element_at(&shape.unravel(i)) })
        });
        NArray::from_raw(raw, shape)
    }

    /// Copies the viewed elements, row-major, into fresh storage with
    /// row-major strides. The copy shares nothing with `self`.
    pub fn deep_clone(&self) -> NArray<T, N>
    where
        T: Clone,
    {
        log::debug!("Deep cloning {:?} ({} elements)", self.shape(), self.size());
        self.map(T::clone)
    }
}

impl<T, const N: usize, A: Access> Default for NArray<T, N, A> {
    fn default() -> Self {
        Self::from_parts(None, StorageView::empty(N))
    }
}

impl<T, const N: usize, A: Access> Clone for NArray<T, N, A> {
    fn clone(&self) -> Self {
        Self::from_parts(self.storage.clone(), self.view.clone())
    }
}

impl<T, const N: usize> From<NArray<T, N, ReadWrite>> for NArray<T, N, ReadOnly> {
    fn from(array: NArray<T, N, ReadWrite>) -> Self {
        NArray::from_parts(array.storage, array.view)
    }
}

impl<T: Clone + std::fmt::Debug, const N: usize, A: Access> std::fmt::Debug for NArray<T, N, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NArray")
            .field("shape", self.shape())
            .field("strides", self.strides())
            .field("offset", &self.offset())
            .field("use_count", &self.use_count())
            .field("data", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<T: PartialEq, const N: usize, A: Access, B: Access> PartialEq<NArray<T, N, B>>
    for NArray<T, N, A>
{
    fn eq(&self, other: &NArray<T, N, B>) -> bool {
        if self.shape() != other.shape() || self.size() != other.size() {
            return false;
        }
        self.coords()
            .all(|coord| unsafe { self.element_at(&coord) == other.element_at(&coord) })
    }
}
