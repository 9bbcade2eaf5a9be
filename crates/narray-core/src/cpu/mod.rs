mod binary;
mod compress;

pub(crate) use binary::*;
pub(crate) use compress::*;
