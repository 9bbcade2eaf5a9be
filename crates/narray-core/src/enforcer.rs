use std::ops::RangeInclusive;

use crate::{Shape, Strides};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    #[error("Shape mismatch, {lhs:?} != {rhs:?}.")]
    ShapeMismatch { lhs: Shape, rhs: Shape },
    #[error("Rank mismatch. {accepted:?} != {actual}.")]
    RankMismatch {
        accepted: RangeInclusive<usize>,
        actual: usize,
    },
    #[error("Axis {axis} out of range for rank {rank}.")]
    AxisOutOfRange { axis: usize, rank: usize },
    #[error("Index {index} out of bounds for axis {axis} of extent {dim}.")]
    OutOfBounds {
        axis: usize,
        index: usize,
        dim: usize,
    },
    #[error("Element count mismatch, expected {expected}, got {actual}.")]
    ElementCount { expected: usize, actual: usize },
    #[error("Skip factor must be at least 1, got {0}.")]
    InvalidFactor(usize),
    #[error("Window of size {size} does not fit an axis of extent {dim}.")]
    InvalidWindow { size: usize, dim: usize },
    #[error("Duplicate dims in permutation.")]
    DuplicateDims,
    #[error("View {shape:?} with strides {strides:?} has no uniform traversal step.")]
    NotReshapeable { shape: Shape, strides: Strides },
    #[error("View has no storage.")]
    NoStorage,
    #[error("Element count of {0:?} overflows.")]
    SizeOverflow(Shape),
}

/// # Enforcer
///
/// Enforcer enforces common invariants on views.
pub struct Enforcer;

impl Enforcer {
    pub fn check_axis(shape: &Shape, axis: usize) -> Result<(), InvariantError> {
        let rank = shape.rank();
        if axis >= rank {
            return Err(InvariantError::AxisOutOfRange { axis, rank });
        }
        Ok(())
    }

    pub fn assert_rank(shape: &Shape, rank: usize) -> Result<(), InvariantError> {
        Self::assert_rank_range(shape.rank(), rank..=rank)
    }

    pub fn assert_rank_range(
        actual: usize,
        accepted: RangeInclusive<usize>,
    ) -> Result<(), InvariantError> {
        if !accepted.contains(&actual) {
            return Err(InvariantError::RankMismatch { accepted, actual });
        }
        Ok(())
    }

    /// The element count of `shape`, if it fits the address range.
    pub fn check_numel(shape: &Shape) -> Result<usize, InvariantError> {
        shape
            .checked_numel()
            .ok_or_else(|| InvariantError::SizeOverflow(shape.clone()))
    }

    pub fn check_shape_match(lhs: &Shape, rhs: &Shape) -> Result<(), InvariantError> {
        if lhs != rhs {
            return Err(InvariantError::ShapeMismatch {
                lhs: lhs.clone(),
                rhs: rhs.clone(),
            });
        }
        Ok(())
    }

    pub fn check_coord(shape: &Shape, coord: &[usize]) -> Result<(), InvariantError> {
        Self::assert_rank_range(coord.len(), shape.rank()..=shape.rank())?;
        for (axis, (&index, &dim)) in coord.iter().zip(shape.iter()).enumerate() {
            if index >= dim {
                return Err(InvariantError::OutOfBounds { axis, index, dim });
            }
        }
        Ok(())
    }

    pub fn check_permutation(dims: &[usize], rank: usize) -> Result<(), InvariantError> {
        Self::assert_rank_range(dims.len(), rank..=rank)?;
        let mut seen = crate::RVec::from_elem(false, rank);
        for &axis in dims {
            if axis >= rank {
                return Err(InvariantError::AxisOutOfRange { axis, rank });
            }
            if seen[axis] {
                return Err(InvariantError::DuplicateDims);
            }
            seen[axis] = true;
        }
        Ok(())
    }
}
