pub(crate) mod records;
mod ska;
mod skm;

pub use ska::{load_ska, read_ska};
pub use skm::{load_skm, read_skm};
