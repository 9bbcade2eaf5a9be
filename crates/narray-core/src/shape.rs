use crate::{InvariantError, RVec};
use std::ops::Range;

/// Per-axis extents of a view.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape(RVec<usize>);

impl Shape {
    pub fn new(shape: RVec<usize>) -> Self {
        Self(shape)
    }

    /// A shape of `rank` axes, all of extent 0.
    pub fn empty(rank: usize) -> Self {
        Self(RVec::from_elem(0, rank))
    }

    pub fn inner(&self) -> &RVec<usize> {
        &self.0
    }

    pub fn remove(&mut self, index: usize) -> usize {
        self.0.remove(index)
    }

    /// Element count, if it fits the address range of a view.
    pub fn checked_numel(&self) -> Option<usize> {
        if self.has_zero_dim() {
            return Some(0);
        }
        self.0
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
            .filter(|&numel| numel <= isize::MAX as usize)
    }

    /// # Panics
    ///
    /// If the element count overflows, see [`Shape::checked_numel`].
    pub fn numel(&self) -> usize {
        self.checked_numel()
            .unwrap_or_else(|| panic!("element count of {:?} overflows", self))
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.0.to_vec()
    }

    pub fn iter(&self) -> impl Iterator<Item = &usize> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rank(&self) -> usize {
        self.len()
    }

    pub fn push(&mut self, dim: usize) {
        self.0.push(dim);
    }

    /// True if any axis has extent 0.
    pub fn has_zero_dim(&self) -> bool {
        self.0.iter().any(|&d| d == 0)
    }

    pub fn slice(&self, range: Range<usize>) -> Self {
        Shape(self.0[range].to_vec().into())
    }

    /// Coordinate of the `index`-th element in row-major order.
    pub fn unravel(&self, mut index: usize) -> RVec<usize> {
        let mut coord = RVec::from_elem(0, self.rank());
        for (axis, &dim) in self.0.iter().enumerate().rev() {
            if dim == 0 {
                break;
            }
            coord[axis] = index % dim;
            index /= dim;
        }
        coord
    }
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut shape = format!("[{}", self.0.first().unwrap_or(&0));
        for dim in self.0.iter().skip(1) {
            shape.push_str(&format!("x{}", dim));
        }
        write!(f, "{}]", shape)
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl std::ops::Index<usize> for Shape {
    type Output = usize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl std::ops::IndexMut<usize> for Shape {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl From<Vec<usize>> for Shape {
    fn from(shape: Vec<usize>) -> Self {
        Self(shape.into())
    }
}

impl From<&[usize]> for Shape {
    fn from(slice: &[usize]) -> Self {
        Shape(slice.into())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Shape(dims.iter().copied().collect())
    }
}

impl From<RVec<usize>> for Shape {
    fn from(dims: RVec<usize>) -> Self {
        Shape(dims)
    }
}

impl<const N: usize> TryFrom<&Shape> for [usize; N] {
    type Error = InvariantError;

    fn try_from(shape: &Shape) -> Result<[usize; N], Self::Error> {
        if shape.rank() != N {
            return Err(InvariantError::RankMismatch {
                accepted: N..=N,
                actual: shape.rank(),
            });
        }
        let mut arr = [0; N];
        arr.copy_from_slice(&shape.0);
        Ok(arr)
    }
}
