mod buffer;
mod groups;

pub use buffer::*;
pub use groups::*;
