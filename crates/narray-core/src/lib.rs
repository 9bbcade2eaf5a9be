mod access;
mod cpu;
mod dtype;
mod enforcer;
mod iter;
mod narray;
#[cfg(feature = "testing")]
mod ndarray_ext;
mod op;
mod ops;
mod shape;
mod storage;
mod strides;

pub use access::*;
pub use dtype::*;
pub use enforcer::*;
pub use iter::*;
pub use narray::*;
pub use op::*;
pub use ops::*;
pub use shape::*;
pub use storage::*;
pub use strides::*;

use smallvec::SmallVec;
pub type RVec<T> = SmallVec<[T; 4]>;

//https://github.com/sonos/tract/blob/main/data/src/macros.rs#L2
#[macro_export]
macro_rules! rvec {
    (@one $x:expr) => (1usize);
    ($elem:expr; $n:expr) => ({
        $crate::RVec::from_elem($elem, $n)
    });
    ($($x:expr),*$(,)*) => ({
        let count = 0usize $(+ rvec![@one $x])*;
        #[allow(unused_mut)]
        let mut vec = $crate::RVec::new();
        if count <= vec.inline_size() {
            $(vec.push($x);)*
            vec
        } else {
            $crate::RVec::from_vec(vec![$($x,)*])
        }
    });
}

#[macro_export]
macro_rules! shape {
    ($($x:expr),*$(,)*) => ({
        use $crate::rvec;
        $crate::Shape::new(rvec![$($x,)*])
    });
}

#[macro_export]
macro_rules! strides {
    ($($x:expr),*$(,)*) => ({
        use $crate::rvec;
        $crate::Strides::new(rvec![$($x,)*])
    });
}

pub mod prelude {
    pub use crate::{rvec, shape, strides, NArray, ReadOnly, ReadWrite};
}
