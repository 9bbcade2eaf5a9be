use crate::{InvariantError, StorageView};
use std::fmt::Debug;

#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error(transparent)]
    InvariantError(#[from] InvariantError),
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

impl OperationError {
    /// The invariant that was violated, if this error came from one.
    pub fn invariant(&self) -> Option<&InvariantError> {
        match self {
            OperationError::InvariantError(e) => Some(e),
            OperationError::UnknownError(_) => None,
        }
    }
}

/// # OpGuards
///
/// Checks an operation can be applied to `src` before any view is computed.
pub trait OpGuards {
    fn check_shapes(&self, src: &StorageView) -> Result<(), InvariantError>;
}

/// # Operation
///
/// A pure mapping from one `(shape, strides, offset)` triple to another.
/// No element is touched, so every implementor is O(rank).
pub trait Operation: OpGuards + Debug {
    /// Computes the output view. Assumes `check_shapes` has passed.
    fn compute_view(&self, src: &StorageView) -> Result<StorageView, OperationError>;

    #[track_caller]
    fn apply(&self, src: &StorageView) -> Result<StorageView, OperationError> {
        self.check_shapes(src)?;
        let view = self.compute_view(src)?;
        log::trace!("{:?}: {:?} -> {:?}", self, src, view);
        Ok(view)
    }
}
