use ndarray::{ArrayD, IxDyn};

use crate::{Access, Enforcer, InvariantError, NArray, NDType};

/// Conversion to and from ndarray arrays, for checking results in tests.
impl<T: Clone, const N: usize, A: Access> NArray<T, N, A> {
    /// Row-major copy of the viewed elements as an owned `ArrayD`.
    pub fn to_ndarray(&self) -> Result<ArrayD<T>, InvariantError> {
        let numel = self.shape().numel();
        if self.size() != numel {
            return Err(InvariantError::NoStorage);
        }
        ArrayD::from_shape_vec(IxDyn(&self.shape().to_vec()), self.iter().collect()).map_err(
            |_| InvariantError::ElementCount {
                expected: numel,
                actual: self.size(),
            },
        )
    }
}

impl<T: Clone, const N: usize> TryFrom<ArrayD<T>> for NArray<T, N> {
    type Error = InvariantError;

    fn try_from(array: ArrayD<T>) -> Result<Self, Self::Error> {
        Enforcer::assert_rank_range(array.ndim(), N..=N)?;
        let mut dims = [0; N];
        dims.copy_from_slice(array.shape());
        NArray::try_from_elems(dims, array.iter().cloned())
    }
}

impl<T: NDType, const N: usize, A: Access> NArray<T, N, A> {
    /// Fails unless every pair satisfies `|a - b| <= atol + rtol * |b|`.
    pub fn all_close<U: NDType, B: Access>(
        &self,
        other: &NArray<U, N, B>,
        atol: f32,
        rtol: f32,
    ) -> anyhow::Result<()> {
        if self.shape() != other.shape() {
            anyhow::bail!("Shape mismatch {:?} != {:?}", self.shape(), other.shape())
        }
        if self.size() != other.size() {
            anyhow::bail!("Size mismatch {} != {}", self.size(), other.size())
        }

        let mut stats = CloseStats::new(atol, rtol);
        for coord in self.coords() {
            let (a, b) = unsafe { (*self.element_at(&coord), *other.element_at(&coord)) };
            let a = a.to_f32().unwrap_or(f32::NAN);
            let b = b.to_f32().unwrap_or(f32::NAN);
            stats.update(&a, &b, IxDyn(&coord));
        }

        if stats.fail_count > 0 {
            anyhow::bail!(
                "{} samples not close - AVGE={} MAE={} at {:?}",
                stats.fail_count,
                stats.avg_error(),
                stats.max_abs_error,
                stats.max_abs_error_idxs,
            );
        }
        log::info!(
            "All close - AVGE={} MAE={} at {:?}",
            stats.avg_error(),
            stats.max_abs_error,
            stats.max_abs_error_idxs
        );
        Ok(())
    }
}

struct CloseStats {
    total_error: f32,
    max_abs_error: f32,
    max_abs_error_idxs: Option<IxDyn>,
    element_count: usize,
    fail_count: usize,
    atol: f32,
    rtol: f32,
}

impl CloseStats {
    fn new(atol: f32, rtol: f32) -> Self {
        Self {
            total_error: 0.0,
            max_abs_error: 0.0,
            max_abs_error_idxs: None,
            element_count: 0,
            fail_count: 0,
            atol,
            rtol,
        }
    }

    fn update(&mut self, a: &f32, b: &f32, index: IxDyn) {
        let abs_diff = (a - b).abs();
        self.total_error += abs_diff;
        self.element_count += 1;

        if abs_diff > self.max_abs_error {
            self.max_abs_error = abs_diff;
            self.max_abs_error_idxs = Some(index);
        }

        if !self.is_close(a, b, abs_diff) {
            self.fail_count += 1;
        }
    }

    fn avg_error(&self) -> f32 {
        if self.element_count == 0 {
            return 0.0;
        }
        self.total_error / self.element_count as f32
    }

    fn is_close(&self, a: &f32, b: &f32, abs_diff: f32) -> bool {
        (a.is_nan() && b.is_nan())
            || (a.is_infinite() && b.is_infinite() && a.signum() == b.signum())
            || abs_diff <= self.atol + self.rtol * b.abs()
    }
}
