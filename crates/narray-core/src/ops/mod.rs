mod binary;
mod condense;
mod reindex;
mod view;

pub use binary::*;
pub use condense::*;
pub use reindex::*;
pub use view::*;
