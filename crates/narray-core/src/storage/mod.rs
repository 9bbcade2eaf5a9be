mod cpu_buffer;

pub use cpu_buffer::*;

use std::rc::Rc;

/// Shared ownership of one [`RawCPUBuffer`].
///
/// Cloning bumps the (unsynchronized) reference count; the buffer is released
/// when the last handle goes away. `Rc` keeps every holder on one thread.
#[derive(Debug)]
pub struct Storage<T> {
    inner: Rc<RawCPUBuffer<T>>,
}

impl<T> Clone for Storage<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> From<RawCPUBuffer<T>> for Storage<T> {
    fn from(raw: RawCPUBuffer<T>) -> Self {
        Self {
            inner: Rc::new(raw),
        }
    }
}

impl<T> Storage<T> {
    pub fn inner(&self) -> &RawCPUBuffer<T> {
        &self.inner
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Number of handles sharing this buffer.
    pub fn use_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Pointer to the element at linear `address`.
    ///
    /// # Safety
    ///
    /// `address` must lie in `0..capacity`.
    #[inline]
    pub unsafe fn element_ptr(&self, address: isize) -> *mut T {
        debug_assert!(address >= 0 && (address as usize) < self.capacity());
        self.inner.as_ptr().offset(address)
    }
}
