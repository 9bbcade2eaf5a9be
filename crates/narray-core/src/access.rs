mod private {
    pub trait Sealed {}
}

/// Capability marker of an [`NArray`](crate::NArray) handle.
///
/// Only [`ReadWrite`] handles can write elements. A read-write handle converts
/// into a read-only one, never the other way around; `deep_clone` is the way
/// back to a writable array.
pub trait Access: private::Sealed + std::fmt::Debug + 'static {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadWrite;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOnly;

impl private::Sealed for ReadWrite {}
impl private::Sealed for ReadOnly {}

impl Access for ReadWrite {}
impl Access for ReadOnly {}
