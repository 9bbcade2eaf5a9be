//! Element type promotion for mixed-type arithmetic.
//!
//! The table is closed: a pair of element types combines only if one of them
//! (or a wider third type) holds every value of both without loss. Pairs such
//! as `i32` and `f32`, or `i64` and `f64`, have no entry and fail to compile.

use half::{bf16, f16};

use crate::NDType;

pub trait Promote<Rhs: NDType>: NDType {
    type Output: NDType;

    fn promote_lhs(self) -> <Self as Promote<Rhs>>::Output;

    fn promote_rhs(rhs: Rhs) -> <Self as Promote<Rhs>>::Output;
}

/// Element type produced by combining `L` and `R`.
pub type Promoted<L, R> = <L as Promote<R>>::Output;

macro_rules! promote_same {
    ($($t:ty),*) => {
        $(
            impl Promote<$t> for $t {
                type Output = $t;

                #[inline]
                fn promote_lhs(self) -> $t {
                    self
                }

                #[inline]
                fn promote_rhs(rhs: $t) -> $t {
                    rhs
                }
            }
        )*
    };
}

macro_rules! promote_pair {
    ($a:ty, $b:ty => $out:ty) => {
        impl Promote<$b> for $a {
            type Output = $out;

            #[inline]
            fn promote_lhs(self) -> $out {
                <$out>::from(self)
            }

            #[inline]
            fn promote_rhs(rhs: $b) -> $out {
                <$out>::from(rhs)
            }
        }

        impl Promote<$a> for $b {
            type Output = $out;

            #[inline]
            fn promote_lhs(self) -> $out {
                <$out>::from(self)
            }

            #[inline]
            fn promote_rhs(rhs: $a) -> $out {
                <$out>::from(rhs)
            }
        }
    };
}

promote_same!(f16, bf16, f32, f64, i8, i16, i32, i64, u8, u16, u32, u64);

// signed widening
promote_pair!(i8, i16 => i16);
promote_pair!(i8, i32 => i32);
promote_pair!(i8, i64 => i64);
promote_pair!(i16, i32 => i32);
promote_pair!(i16, i64 => i64);
promote_pair!(i32, i64 => i64);

// unsigned widening
promote_pair!(u8, u16 => u16);
promote_pair!(u8, u32 => u32);
promote_pair!(u8, u64 => u64);
promote_pair!(u16, u32 => u32);
promote_pair!(u16, u64 => u64);
promote_pair!(u32, u64 => u64);

// mixed signedness
promote_pair!(u8, i16 => i16);
promote_pair!(u8, i32 => i32);
promote_pair!(u8, i64 => i64);
promote_pair!(u16, i32 => i32);
promote_pair!(u16, i64 => i64);
promote_pair!(u32, i64 => i64);
promote_pair!(i8, u8 => i16);
promote_pair!(i8, u16 => i32);
promote_pair!(i8, u32 => i64);
promote_pair!(i16, u16 => i32);
promote_pair!(i16, u32 => i64);
promote_pair!(i32, u32 => i64);

// integer to float
promote_pair!(i8, f32 => f32);
promote_pair!(i16, f32 => f32);
promote_pair!(u8, f32 => f32);
promote_pair!(u16, f32 => f32);
promote_pair!(i8, f64 => f64);
promote_pair!(i16, f64 => f64);
promote_pair!(i32, f64 => f64);
promote_pair!(u8, f64 => f64);
promote_pair!(u16, f64 => f64);
promote_pair!(u32, f64 => f64);

// float widening
promote_pair!(f32, f64 => f64);
promote_pair!(f16, f32 => f32);
promote_pair!(f16, f64 => f64);
promote_pair!(bf16, f32 => f32);
promote_pair!(bf16, f64 => f64);
promote_pair!(f16, bf16 => f32);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DType;

    fn promoted_dt<L: Promote<R>, R: NDType>() -> DType {
        <Promoted<L, R>>::dt()
    }

    #[test]
    fn test_promotion_table() {
        assert_eq!(promoted_dt::<i32, f64>(), DType::F64);
        assert_eq!(promoted_dt::<f64, i32>(), DType::F64);
        assert_eq!(promoted_dt::<u8, i8>(), DType::I16);
        assert_eq!(promoted_dt::<u32, i32>(), DType::I64);
        assert_eq!(promoted_dt::<f16, bf16>(), DType::F32);
        assert_eq!(promoted_dt::<i16, i16>(), DType::I16);
    }

    #[test]
    fn test_promotion_is_lossless() {
        assert_eq!(<i32 as Promote<f64>>::promote_lhs(i32::MAX), 2147483647.0);
        assert_eq!(<u32 as Promote<i32>>::promote_lhs(u32::MAX), 4294967295i64);
        assert_eq!(<f32 as Promote<f16>>::promote_rhs(f16::from_f32(0.5)), 0.5f32);
    }
}
