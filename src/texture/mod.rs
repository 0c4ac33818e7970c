pub mod cache;
pub mod tga;

pub use cache::{TextureCache, placeholder_texture};
pub use tga::{TgaError, decode_tga, load_tga};
