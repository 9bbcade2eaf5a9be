use crate::InvariantError;

use std::{alloc::Layout, fmt::Debug, ptr::NonNull};

/// A single allocation holding up to `capacity` elements of `T`.
///
/// Elements are constructed front to back. `constructed` counts how many are
/// live, so a panic while filling drops exactly the elements built so far.
/// Every public constructor returns with `constructed == capacity`.
pub struct RawCPUBuffer<T> {
    ptr: NonNull<T>,
    capacity: usize,
    constructed: usize,
}

impl<T> RawCPUBuffer<T> {
    fn layout(capacity: usize) -> Layout {
        Layout::array::<T>(capacity).unwrap_or_else(|_| panic!("capacity overflow: {}", capacity))
    }

    fn uninitialized(capacity: usize) -> Self {
        let layout = Self::layout(capacity);
        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            let raw = unsafe { std::alloc::alloc(layout) } as *mut T;
            NonNull::new(raw).unwrap_or_else(|| std::alloc::handle_alloc_error(layout))
        };
        log::trace!("Allocated {} elements: {:p}", capacity, ptr);
        Self {
            ptr,
            capacity,
            constructed: 0,
        }
    }

    #[inline]
    fn push(&mut self, value: T) {
        assert!(self.constructed < self.capacity);
        unsafe { self.ptr.as_ptr().add(self.constructed).write(value) };
        self.constructed += 1;
    }

    /// Builds element `i` with `f(i)`.
    pub fn from_fn<F: FnMut(usize) -> T>(capacity: usize, mut f: F) -> Self {
        let mut raw = Self::uninitialized(capacity);
        for i in 0..capacity {
            raw.push(f(i));
        }
        raw
    }

    pub fn from_default(capacity: usize) -> Self
    where
        T: Default,
    {
        Self::from_fn(capacity, |_| T::default())
    }

    /// Clones `value` exactly `capacity` times.
    pub fn from_value(capacity: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_fn(capacity, |_| value.clone())
    }

    /// Takes at most `capacity` items from `iter`, then fills the rest with `pad`.
    pub fn from_iter_padded<I, F>(capacity: usize, iter: I, mut pad: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: FnMut() -> T,
    {
        let mut raw = Self::uninitialized(capacity);
        for value in iter.into_iter().take(capacity) {
            raw.push(value);
        }
        while raw.constructed < raw.capacity {
            raw.push(pad());
        }
        raw
    }

    /// Takes exactly `capacity` items from `iter`, failing if it runs short.
    pub fn try_from_iter<I>(capacity: usize, iter: I) -> Result<Self, InvariantError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut raw = Self::uninitialized(capacity);
        for value in iter.into_iter().take(capacity) {
            raw.push(value);
        }
        if raw.constructed != raw.capacity {
            return Err(InvariantError::ElementCount {
                expected: raw.capacity,
                actual: raw.constructed,
            });
        }
        Ok(raw)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn constructed(&self) -> usize {
        self.constructed
    }

    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<T> Debug for RawCPUBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawCPUBuffer")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .field("constructed", &self.constructed)
            .finish()
    }
}

impl<T> Drop for RawCPUBuffer<T> {
    fn drop(&mut self) {
        log::trace!("Dropping {} elements: {:p}", self.constructed, self.ptr);
        unsafe {
            std::ptr::drop_in_place(std::ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.constructed,
            ));
        }
        let layout = Self::layout(self.capacity);
        if layout.size() > 0 {
            unsafe { std::alloc::dealloc(self.ptr.as_ptr() as *mut u8, layout) }
        }
    }
}
