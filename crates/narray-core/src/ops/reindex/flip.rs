use crate::{Enforcer, InvariantError, OpGuards, Operation, OperationError, StorageView};

/// # Flip
///
/// Reverses the traversal of one axis. Applying it twice restores the view.
#[derive(derive_new::new, Debug, Clone)]
pub struct Flip {
    pub axis: usize,
}

impl OpGuards for Flip {
    fn check_shapes(&self, src: &StorageView) -> Result<(), InvariantError> {
        Enforcer::check_axis(src.shape(), self.axis)
    }
}

impl Operation for Flip {
    fn compute_view(&self, src: &StorageView) -> Result<StorageView, OperationError> {
        let (shape, mut strides, mut offset) = src.clone().into_parts();
        let dim = shape[self.axis];
        if dim > 0 {
            offset += strides[self.axis] * (dim as isize - 1);
        }
        strides[self.axis] = -strides[self.axis];
        Ok(StorageView::new(shape, strides, offset))
    }
}
