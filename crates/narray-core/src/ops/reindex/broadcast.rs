use derive_new::new;

use crate::{Enforcer, InvariantError, OpGuards, Operation, OperationError, StorageView};

/// # Broadcast
///
/// Appends a trailing axis of `count` elements with stride 0, so every
/// coordinate along it resolves to the same storage address.
#[derive(new, Debug, Clone)]
pub struct Broadcast {
    count: usize,
}

impl OpGuards for Broadcast {
    fn check_shapes(&self, _src: &StorageView) -> Result<(), InvariantError> {
        Ok(())
    }
}

impl Operation for Broadcast {
    fn compute_view(&self, src: &StorageView) -> Result<StorageView, OperationError> {
        let (mut shape, mut strides, offset) = src.clone().into_parts();
        shape.push(self.count);
        strides.push(0);
        Enforcer::check_numel(&shape)?;
        Ok(StorageView::new(shape, strides, offset))
    }
}
