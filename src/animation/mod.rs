// Bone pose math: local transforms, hierarchy traversal, skinning and
// per-vertex influence selection.

pub mod interpolation;
pub mod skeleton;
pub mod weights;

pub use interpolation::*;
pub use skeleton::*;
pub use weights::*;
