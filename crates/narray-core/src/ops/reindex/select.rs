use derive_new::new;

use crate::{Enforcer, InvariantError, OpGuards, Operation, OperationError, StorageView};

/// # Select
///
/// Fixes `axis` at `index` and removes it, leaving a view one rank lower.
#[derive(new, Debug, Clone)]
pub struct Select {
    pub axis: usize,
    pub index: usize,
}

impl OpGuards for Select {
    fn check_shapes(&self, src: &StorageView) -> Result<(), InvariantError> {
        Enforcer::check_axis(src.shape(), self.axis)?;
        let dim = src.shape()[self.axis];
        if self.index >= dim {
            return Err(InvariantError::OutOfBounds {
                axis: self.axis,
                index: self.index,
                dim,
            });
        }
        Ok(())
    }
}

impl Operation for Select {
    fn compute_view(&self, src: &StorageView) -> Result<StorageView, OperationError> {
        let (mut shape, mut strides, offset) = src.clone().into_parts();
        shape.remove(self.axis);
        let stride = strides.remove(self.axis);
        Ok(StorageView::new(
            shape,
            strides,
            offset + stride * self.index as isize,
        ))
    }
}
