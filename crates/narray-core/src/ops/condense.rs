use crate::{InvariantError, OpGuards, Operation, OperationError, RVec, Shape, StorageView, Strides};

/// # Condense
///
/// Normalizes a view to the smallest set of axes that address the same
/// storage elements. Traversal order is not preserved: negative strides are
/// made positive, single-element and broadcast axes are dropped, and the
/// remaining axes are ordered by descending stride before contiguous runs are
/// merged from the innermost axis outward.
///
/// The rank is kept. Merged axes are right-aligned and the leading axes left
/// over have extent 1 with the stride of a row-major outer axis. A view with
/// an empty axis condenses to `[1, .., 1, 0]` with zero strides.
#[derive(Debug, Clone, Default)]
pub struct Condense;

impl OpGuards for Condense {
    fn check_shapes(&self, _src: &StorageView) -> Result<(), InvariantError> {
        Ok(())
    }
}

impl Operation for Condense {
    fn compute_view(&self, src: &StorageView) -> Result<StorageView, OperationError> {
        let rank = src.rank();
        if rank == 0 {
            return Ok(src.clone());
        }

        let mut shape = Shape::new(RVec::from_elem(1, rank));
        if src.numel() == 0 {
            shape[rank - 1] = 0;
            return Ok(StorageView::new(shape, Strides::zeros(rank), src.offset()));
        }

        let mut offset = src.offset();
        let mut axes = RVec::<(usize, isize)>::new();
        for (&dim, &stride) in src.shape().iter().zip(src.strides().iter()) {
            if dim == 1 || stride == 0 {
                continue;
            }
            if stride < 0 {
                offset += stride * (dim as isize - 1);
            }
            axes.push((dim, stride.abs()));
        }
        axes.sort_by(|a, b| b.1.cmp(&a.1));

        // innermost first
        let mut merged = RVec::<(usize, isize)>::new();
        for &(dim, stride) in axes.iter().rev() {
            match merged.last_mut() {
                Some((d, s)) if stride == *s * *d as isize => *d *= dim,
                _ => merged.push((dim, stride)),
            }
        }
        if merged.is_empty() {
            merged.push((1, 1));
        }

        let mut strides = Strides::zeros(rank);
        let mut axis = rank;
        for (dim, stride) in merged {
            axis -= 1;
            shape[axis] = dim;
            strides[axis] = stride;
        }
        for outer in (0..axis).rev() {
            strides[outer] = strides[outer + 1] * shape[outer + 1] as isize;
        }
        Ok(StorageView::new(shape, strides, offset))
    }
}
