use crate::{
    Enforcer, InvariantError, OpGuards, Operation, OperationError, RVec, Shape, StorageView,
};
use std::ops::Range;

/// # Slice
///
/// Restricts every axis to a half-open range. The strides are untouched, the
/// offset moves to the first selected element.
#[derive(derive_new::new, Debug, Clone)]
pub struct Slice {
    indices: RVec<Range<usize>>,
}

impl Slice {
    /// Builds the ranges `origin[i]..origin[i] + extent[i]` over `shape`.
    pub fn from_origin_extent(
        shape: &Shape,
        origin: &[usize],
        extent: &[usize],
    ) -> Result<Self, InvariantError> {
        let indices = origin
            .iter()
            .zip(extent.iter())
            .enumerate()
            .map(|(axis, (&o, &e))| {
                o.checked_add(e)
                    .map(|end| o..end)
                    .ok_or_else(|| InvariantError::OutOfBounds {
                        axis,
                        index: o,
                        dim: shape.inner().get(axis).copied().unwrap_or_default(),
                    })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { indices })
    }
}

impl OpGuards for Slice {
    fn check_shapes(&self, src: &StorageView) -> Result<(), InvariantError> {
        Enforcer::assert_rank_range(self.indices.len(), src.rank()..=src.rank())?;
        for (axis, (range, &dim)) in self.indices.iter().zip(src.shape().iter()).enumerate() {
            if range.start > range.end || range.end > dim {
                return Err(InvariantError::OutOfBounds {
                    axis,
                    index: range.end.max(range.start),
                    dim,
                });
            }
        }
        Ok(())
    }
}

impl Operation for Slice {
    fn compute_view(&self, src: &StorageView) -> Result<StorageView, OperationError> {
        let output_shape = self
            .indices
            .iter()
            .map(|range| range.end - range.start)
            .collect::<RVec<usize>>()
            .into();
        let offset = self
            .indices
            .iter()
            .zip(src.strides().iter())
            .fold(src.offset(), |acc, (range, &stride)| {
                acc + range.start as isize * stride
            });
        Ok(StorageView::new(output_shape, src.strides().clone(), offset))
    }
}

#[cfg(test)]
mod tests {
    use crate::{rvec, shape, strides, InvariantError, Operation, Slice, StorageView};

    #[test]
    fn test_slice_moves_offset() {
        let src = StorageView::contiguous(shape![4, 5]);
        let op = Slice::from_origin_extent(src.shape(), &[1, 2], &[2, 3]).unwrap();
        let dst = op.apply(&src).unwrap();
        assert_eq!(dst.shape(), &shape![2, 3]);
        assert_eq!(dst.strides(), &strides![5, 1]);
        assert_eq!(dst.offset(), 7);
    }

    #[test]
    fn test_slice_full_extent_is_identity() {
        let src = StorageView::contiguous(shape![3, 2]);
        let dst = Slice::new(rvec![0..3, 0..2]).apply(&src).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn test_slice_out_of_bounds() {
        let src = StorageView::contiguous(shape![3, 2]);
        let err = Slice::from_origin_extent(src.shape(), &[2, 0], &[2, 1])
            .unwrap()
            .apply(&src)
            .unwrap_err();
        assert_eq!(
            err.invariant(),
            Some(&InvariantError::OutOfBounds {
                axis: 0,
                index: 4,
                dim: 3
            })
        );
    }

    #[test]
    fn test_extent_past_address_range() {
        let src = StorageView::contiguous(shape![3, 2]);
        let err = Slice::from_origin_extent(src.shape(), &[0, 1], &[3, usize::MAX]).unwrap_err();
        assert_eq!(
            err,
            InvariantError::OutOfBounds {
                axis: 1,
                index: 1,
                dim: 2
            }
        );
    }
}
