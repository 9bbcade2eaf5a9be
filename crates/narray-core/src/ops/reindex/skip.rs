use crate::{Enforcer, InvariantError, OpGuards, Operation, OperationError, StorageView};

/// # Skip
///
/// Keeps every `factor`-th element of one axis, beginning at `start`.
#[derive(derive_new::new, Debug, Clone)]
pub struct Skip {
    pub axis: usize,
    pub factor: usize,
    pub start: usize,
}

impl OpGuards for Skip {
    fn check_shapes(&self, src: &StorageView) -> Result<(), InvariantError> {
        Enforcer::check_axis(src.shape(), self.axis)?;
        if self.factor == 0 {
            return Err(InvariantError::InvalidFactor(self.factor));
        }
        let dim = src.shape()[self.axis];
        if self.start > dim {
            return Err(InvariantError::OutOfBounds {
                axis: self.axis,
                index: self.start,
                dim,
            });
        }
        Ok(())
    }
}

impl Operation for Skip {
    fn compute_view(&self, src: &StorageView) -> Result<StorageView, OperationError> {
        let (mut shape, mut strides, mut offset) = src.clone().into_parts();
        let stride = strides[self.axis];
        offset += stride * self.start as isize;
        shape[self.axis] = (shape[self.axis] - self.start).div_ceil(self.factor);
        // Past isize::MAX the axis keeps at most one element and the stride is never used.
        let factor = isize::try_from(self.factor).unwrap_or(isize::MAX);
        strides[self.axis] = stride.saturating_mul(factor);
        Ok(StorageView::new(shape, strides, offset))
    }
}
