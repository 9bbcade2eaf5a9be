use crate::{Access, Enforcer, NArray, OperationError, RawCPUBuffer, StorageView};

/// Maps every rank-`M` subarray over the trailing axes of `src` to one element
/// of a fresh array shaped like the leading `K` axes.
pub(crate) fn compress<T, U, const N: usize, const K: usize, const M: usize, A, F>(
    src: &NArray<T, N, A>,
    f: F,
) -> Result<NArray<U, K>, OperationError>
where
    A: Access,
    F: FnMut(NArray<T, M, A>) -> U,
{
    Enforcer::assert_rank_range(K + M, N..=N)?;
    let leading = src.shape().slice(0..K);
    if src.storage().is_none() {
        return Ok(NArray::from_parts(None, StorageView::contiguous(leading)));
    }
    let subarrays = src.subarrays::<M>()?;
    let raw = RawCPUBuffer::try_from_iter(leading.numel(), subarrays.map(f))?;
    log::debug!("Compressed {:?} into {:?}", src.shape(), leading);
    Ok(NArray::from_raw(raw, leading))
}
