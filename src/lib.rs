pub mod animation;
pub mod error;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod model;
pub mod parser;
pub mod session;
pub mod settings;
pub mod texture;

pub use error::{ErrorKind, ModelError};
pub use loader::load_model;
pub use mesh::MeshBuffer;
pub use session::{Session, SessionState};
pub use settings::LoaderSettings;
