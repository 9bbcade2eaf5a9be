use crate::{rvec, RVec, Shape};

/// Per-axis address deltas of a view. Negative strides walk an axis backwards,
/// zero strides broadcast a single element along it.
#[derive(Clone, PartialEq, Eq, Default, Hash)]
pub struct Strides(RVec<isize>);

impl Strides {
    pub fn new(strides: RVec<isize>) -> Self {
        Self(strides)
    }

    /// All-zero strides for `rank` axes.
    pub fn zeros(rank: usize) -> Self {
        Self(RVec::from_elem(0, rank))
    }

    pub fn inner(&self) -> &RVec<isize> {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<isize> {
        self.0.to_vec()
    }

    pub fn iter(&self) -> impl Iterator<Item = &isize> {
        self.0.iter()
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, stride: isize) {
        self.0.push(stride);
    }

    pub fn remove(&mut self, index: usize) -> isize {
        self.0.remove(index)
    }

    /// Scales every stride by `step`.
    pub fn scaled(&self, step: isize) -> Self {
        Self(self.0.iter().map(|s| s.saturating_mul(step)).collect())
    }
}

impl std::fmt::Debug for Strides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0.as_slice())
    }
}

impl std::ops::Index<usize> for Strides {
    type Output = isize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl std::ops::IndexMut<usize> for Strides {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl From<&Shape> for Strides {
    fn from(shape: &Shape) -> Self {
        let mut strides = rvec![];
        let mut stride: isize = 1;
        for &size in shape.inner().iter().rev() {
            strides.push(stride);
            // Only an empty shape can get here with a product past isize::MAX.
            stride = stride.saturating_mul(isize::try_from(size).unwrap_or(isize::MAX));
        }
        strides.reverse();
        Self(strides)
    }
}

impl From<Vec<isize>> for Strides {
    fn from(strides: Vec<isize>) -> Self {
        Self(strides.into())
    }
}

impl<const N: usize> From<[isize; N]> for Strides {
    fn from(strides: [isize; N]) -> Self {
        Self(strides.iter().copied().collect())
    }
}
