use derive_new::new;
use half::{bf16, f16};

use crate::{
    cpu, Access, Enforcer, InvariantError, NArray, NDType, OperationError, Promote, Promoted,
    Shape,
};
#[cfg(test)]
use test_strategy::Arbitrary;

#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn kernel_name(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
        }
    }

    /// Integer division by zero panics, as it does for the primitive.
    #[inline]
    pub fn apply<T: NDType>(self, lhs: T, rhs: T) -> T {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
        }
    }
}

/// Elementwise combination of two arrays of the same shape.
#[derive(new, Debug, Clone)]
pub struct Binary {
    lhs: Shape,
    rhs: Shape,
    op: BinaryOp,
}

impl Binary {
    pub fn op(&self) -> BinaryOp {
        self.op
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        Enforcer::check_shape_match(&self.lhs, &self.rhs)
    }
}

impl<L: NDType, const N: usize, A: Access> NArray<L, N, A> {
    fn binary<R: NDType, B: Access>(
        &self,
        rhs: &NArray<R, N, B>,
        op: BinaryOp,
    ) -> Result<NArray<Promoted<L, R>, N>, OperationError>
    where
        L: Promote<R>,
    {
        let binary = Binary::new(self.shape().clone(), rhs.shape().clone(), op);
        binary.check_invariants()?;
        cpu::binary_apply(self, rhs, binary.op())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add<R: NDType, B: Access>(
        &self,
        rhs: &NArray<R, N, B>,
    ) -> Result<NArray<Promoted<L, R>, N>, OperationError>
    where
        L: Promote<R>,
    {
        self.binary(rhs, BinaryOp::Add)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn sub<R: NDType, B: Access>(
        &self,
        rhs: &NArray<R, N, B>,
    ) -> Result<NArray<Promoted<L, R>, N>, OperationError>
    where
        L: Promote<R>,
    {
        self.binary(rhs, BinaryOp::Sub)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn mul<R: NDType, B: Access>(
        &self,
        rhs: &NArray<R, N, B>,
    ) -> Result<NArray<Promoted<L, R>, N>, OperationError>
    where
        L: Promote<R>,
    {
        self.binary(rhs, BinaryOp::Mul)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn div<R: NDType, B: Access>(
        &self,
        rhs: &NArray<R, N, B>,
    ) -> Result<NArray<Promoted<L, R>, N>, OperationError>
    where
        L: Promote<R>,
    {
        self.binary(rhs, BinaryOp::Div)
    }

    /// `op(element, scalar)` for every element.
    pub fn scalar_rhs<R: NDType>(&self, rhs: R, op: BinaryOp) -> NArray<Promoted<L, R>, N>
    where
        L: Promote<R>,
    {
        let rhs = L::promote_rhs(rhs);
        self.map(|&lhs| op.apply(lhs.promote_lhs(), rhs))
    }

    /// `op(scalar, element)` for every element.
    pub fn scalar_lhs<S: NDType>(&self, lhs: S, op: BinaryOp) -> NArray<Promoted<S, L>, N>
    where
        S: Promote<L>,
    {
        let lhs = lhs.promote_lhs();
        self.map(|&rhs| op.apply(lhs, S::promote_rhs(rhs)))
    }
}

macro_rules! impl_array_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<'a, L, R, const N: usize, A: Access, B: Access> std::ops::$trait<&'a NArray<R, N, B>>
            for &NArray<L, N, A>
        where
            L: Promote<R>,
            R: NDType,
        {
            type Output = Result<NArray<Promoted<L, R>, N>, OperationError>;

            fn $method(self, rhs: &'a NArray<R, N, B>) -> Self::Output {
                self.binary(rhs, $op)
            }
        }
    };
}

impl_array_op!(Add, add, BinaryOp::Add);
impl_array_op!(Sub, sub, BinaryOp::Sub);
impl_array_op!(Mul, mul, BinaryOp::Mul);
impl_array_op!(Div, div, BinaryOp::Div);

macro_rules! impl_scalar_op {
    ($scalar:ty, $trait:ident, $method:ident, $op:expr) => {
        impl<L, const N: usize, A: Access> std::ops::$trait<$scalar> for &NArray<L, N, A>
        where
            L: Promote<$scalar>,
        {
            type Output = NArray<Promoted<L, $scalar>, N>;

            fn $method(self, rhs: $scalar) -> Self::Output {
                self.scalar_rhs(rhs, $op)
            }
        }

        impl<R, const N: usize, A: Access> std::ops::$trait<&NArray<R, N, A>> for $scalar
        where
            R: NDType,
            $scalar: Promote<R>,
        {
            type Output = NArray<Promoted<$scalar, R>, N>;

            fn $method(self, rhs: &NArray<R, N, A>) -> Self::Output {
                rhs.scalar_lhs(self, $op)
            }
        }
    };
}

macro_rules! impl_scalar_ops {
    ($($scalar:ty),*) => {
        $(
            impl_scalar_op!($scalar, Add, add, BinaryOp::Add);
            impl_scalar_op!($scalar, Sub, sub, BinaryOp::Sub);
            impl_scalar_op!($scalar, Mul, mul, BinaryOp::Mul);
            impl_scalar_op!($scalar, Div, div, BinaryOp::Div);
        )*
    };
}

impl_scalar_ops!(f16, bf16, f32, f64, i8, i16, i32, i64, u8, u16, u32, u64);

#[cfg(test)]
mod tests {
    use crate::{BinaryOp, InvariantError, NArray, Shape};
    use proptest::prelude::*;
    use test_strategy::{proptest, Arbitrary};

    #[derive(Arbitrary, Debug)]
    struct BinaryProblem {
        op: BinaryOp,
        #[any(vec![1..=4, 1..=4, 1..=8])]
        shape: Shape,
    }

    fn ground_truth(a: &[f64], b: &[f64], op: BinaryOp) -> Vec<f64> {
        a.iter()
            .zip(b)
            .map(|(&a, &b)| match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
            })
            .collect()
    }

    #[proptest(cases = 16)]
    fn test_binary(prob: BinaryProblem) {
        let BinaryProblem { op, shape } = prob;
        let dims: [usize; 3] = (&shape).try_into().unwrap();
        let a = NArray::<f64, 3>::randn(dims);
        let b = NArray::<f64, 3>::randn(dims).map(|x| x.abs() + 1.0);
        let expected = ground_truth(
            &a.iter().collect::<Vec<_>>(),
            &b.iter().collect::<Vec<_>>(),
            op,
        );
        let c = match op {
            BinaryOp::Add => (&a + &b).unwrap(),
            BinaryOp::Sub => (&a - &b).unwrap(),
            BinaryOp::Mul => (&a * &b).unwrap(),
            BinaryOp::Div => (&a / &b).unwrap(),
        };
        prop_assert_eq!(c.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_shape_mismatch() {
        let a = NArray::<f32, 2>::new([2, 3]);
        let b = NArray::<f32, 2>::new([3, 2]);
        let err = a.add(&b).unwrap_err();
        assert!(matches!(
            err.invariant(),
            Some(InvariantError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_views_are_read_in_row_major() {
        let a = NArray::<i32, 2>::from_elems([2, 3], 0..6);
        let t = a.transpose().unwrap();
        let b = NArray::<i32, 2>::full([3, 2], 100);
        let c = t.add(&b).unwrap();
        assert!(c.is_contiguous());
        assert_eq!(
            c.iter().collect::<Vec<_>>(),
            vec![100, 103, 101, 104, 102, 105]
        );
    }

    #[test]
    fn test_scalar_ops_promote() {
        let a = NArray::<u8, 1>::from_elems([3], [1, 2, 3]);
        let b: NArray<f64, 1> = &a * 0.5f64;
        assert_eq!(b.iter().collect::<Vec<_>>(), vec![0.5, 1.0, 1.5]);
        let c: NArray<i16, 1> = 10i8 - &a;
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![9, 8, 7]);
    }
}
