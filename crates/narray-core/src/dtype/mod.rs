use half::{bf16, f16};

mod promote;

pub use promote::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Hash)]
pub enum DType {
    F16,
    BF16,
    #[default]
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DType::F16 => "f16",
            DType::BF16 => "bf16",
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::I8 => "i8",
            DType::I16 => "i16",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::U8 => "u8",
            DType::U16 => "u16",
            DType::U32 => "u32",
            DType::U64 => "u64",
        };
        write!(f, "{}", name)
    }
}

/// Numeric element types the arithmetic engine works on.
pub trait NDType:
    Copy
    + std::fmt::Debug
    + PartialEq
    + Default
    + 'static
    + num_traits::Zero
    + num_traits::One
    + num_traits::NumOps
    + num_traits::ToPrimitive
{
    fn dt() -> DType;
}

macro_rules! map_type {
    ($t:ty, $v:ident) => {
        impl NDType for $t {
            fn dt() -> DType {
                DType::$v
            }
        }
    };
}

map_type!(f16, F16);
map_type!(bf16, BF16);
map_type!(f32, F32);
map_type!(f64, F64);
map_type!(i8, I8);
map_type!(i16, I16);
map_type!(i32, I32);
map_type!(i64, I64);
map_type!(u8, U8);
map_type!(u16, U16);
map_type!(u32, U32);
map_type!(u64, U64);
