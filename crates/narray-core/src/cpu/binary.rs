use crate::{
    Access, BinaryOp, InvariantError, NArray, NDType, OperationError, Promote, Promoted,
    RawCPUBuffer, StorageView,
};

#[inline]
pub(crate) fn binary_map<L, R>(lhs: L, rhs: R, op: BinaryOp) -> Promoted<L, R>
where
    L: Promote<R>,
    R: NDType,
{
    op.apply(lhs.promote_lhs(), L::promote_rhs(rhs))
}

/// Combines two arrays of equal shape element by element into a fresh
/// row-major array. Both inputs are read in their own row-major order, so
/// any strides work.
pub(crate) fn binary_apply<L, R, const N: usize, A: Access, B: Access>(
    lhs: &NArray<L, N, A>,
    rhs: &NArray<R, N, B>,
    op: BinaryOp,
) -> Result<NArray<Promoted<L, R>, N>, OperationError>
where
    L: Promote<R>,
    R: NDType,
{
    let shape = lhs.shape().clone();
    let numel = shape.numel();
    if lhs.size() != numel || rhs.size() != numel {
        if lhs.storage().is_none() && rhs.storage().is_none() {
            return Ok(NArray::from_parts(None, StorageView::contiguous(shape)));
        }
        return Err(InvariantError::NoStorage.into());
    }
    let raw = RawCPUBuffer::from_fn(numel, |i| {
        let coord = shape.unravel(i);
        // Both sizes equal `numel`, so both have storage and `coord` is in bounds.
        let (l, r) = unsafe { (*lhs.element_at(&coord), *rhs.element_at(&coord)) };
        binary_map(l, r, op)
    });
    log::debug!("{} {:?} -> {}", op.kernel_name(), shape, <Promoted<L, R>>::dt());
    Ok(NArray::from_raw(raw, shape))
}
