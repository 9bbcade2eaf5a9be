use derive_new::new;

use crate::{
    Enforcer, InvariantError, OpGuards, Operation, OperationError, RVec, Shape, StorageView,
    Strides,
};

/// # Permute
///
/// Output axis `i` is input axis `dims[i]`. Shape and strides move together,
/// the offset is unchanged.
#[derive(new, Debug, Clone)]
pub struct Permute {
    pub dims: RVec<usize>,
}

impl Permute {
    /// The full axis reversal used by `transpose`.
    pub fn reversed(rank: usize) -> Self {
        Self::new((0..rank).rev().collect())
    }
}

impl OpGuards for Permute {
    fn check_shapes(&self, src: &StorageView) -> Result<(), InvariantError> {
        Enforcer::check_permutation(&self.dims, src.rank())
    }
}

impl Operation for Permute {
    fn compute_view(&self, src: &StorageView) -> Result<StorageView, OperationError> {
        let output_shape: Shape = self
            .dims
            .iter()
            .map(|&d| src.shape()[d])
            .collect::<RVec<_>>()
            .into();
        let output_strides = Strides::new(self.dims.iter().map(|&d| src.strides()[d]).collect());
        Ok(StorageView::new(output_shape, output_strides, src.offset()))
    }
}
