use crate::{Enforcer, InvariantError, OpGuards, Operation, OperationError, StorageView};

/// # Window
///
/// Exposes every run of `size` consecutive elements along `axis` as a new
/// trailing axis. The output has one more axis than the input, and the
/// windows overlap in storage.
#[derive(derive_new::new, Debug, Clone)]
pub struct Window {
    pub axis: usize,
    pub size: usize,
}

impl OpGuards for Window {
    fn check_shapes(&self, src: &StorageView) -> Result<(), InvariantError> {
        Enforcer::check_axis(src.shape(), self.axis)?;
        let dim = src.shape()[self.axis];
        if self.size == 0 || self.size > dim {
            return Err(InvariantError::InvalidWindow {
                size: self.size,
                dim,
            });
        }
        Ok(())
    }
}

impl Operation for Window {
    fn compute_view(&self, src: &StorageView) -> Result<StorageView, OperationError> {
        let (mut shape, mut strides, offset) = src.clone().into_parts();
        let stride = strides[self.axis];
        shape[self.axis] -= self.size - 1;
        shape.push(self.size);
        strides.push(stride);
        Enforcer::check_numel(&shape)?;
        Ok(StorageView::new(shape, strides, offset))
    }
}
