mod broadcast;
mod flip;
mod permute;
mod select;
mod skip;
mod slice;
mod window;

pub use broadcast::Broadcast;
pub use flip::Flip;
pub use permute::Permute;
pub use select::Select;
pub use skip::Skip;
pub use slice::Slice;
pub use window::Window;
