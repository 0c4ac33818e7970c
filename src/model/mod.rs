mod paths;
mod ska;
mod skm;

pub use paths::*;
pub use ska::*;
pub use skm::*;
