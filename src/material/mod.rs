mod flags;
mod kinds;
mod material;
mod parser;

pub use flags::*;
pub use kinds::*;
pub use material::*;
pub use parser::*;
