use crate::error::{KEY_FILE_OPEN, ModelError};
use crate::loader::load_model;
use crate::mesh::{MeshBuffer, PoseState};
use crate::settings::LoaderSettings;
use crate::texture::TextureCache;
use image::RgbaImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unloaded,
    Animated,
    BindPoseOnly,
}

/// Holds at most one loaded model together with the textures it decoded.
///
/// `open` and `reload` replace the model only on success; a failed load
/// leaves the previous model and its textures in place.
#[derive(Debug, Default)]
pub struct Session {
    pub settings: LoaderSettings,
    model: Option<MeshBuffer>,
    textures: TextureCache,
}

impl Session {
    pub fn new(settings: LoaderSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn open(&mut self, path: &str) -> Result<&MeshBuffer, ModelError> {
        let mut textures = TextureCache::new();
        let model = load_model(path, &self.settings, &mut textures)?;
        self.textures = textures;
        Ok(&*self.model.insert(model))
    }

    /// Loads the current model's file again, reusing already decoded textures.
    pub fn reload(&mut self) -> Result<&MeshBuffer, ModelError> {
        let path = match &self.model {
            Some(model) => model.source_path.clone(),
            None => {
                return Err(ModelError::new(KEY_FILE_OPEN).with_arg("reason", "nothing-loaded"));
            }
        };
        let model = load_model(&path, &self.settings, &mut self.textures)?;
        Ok(&*self.model.insert(model))
    }

    pub fn close(&mut self) {
        if let Some(model) = self.model.take() {
            log::info!("Closed '{}'", model.source_path);
        }
        self.textures.clear();
    }

    pub fn state(&self) -> SessionState {
        match self.model.as_ref().and_then(|m| m.pose) {
            None => SessionState::Unloaded,
            Some(PoseState::Animated) => SessionState::Animated,
            Some(PoseState::BindPoseOnly(_)) => SessionState::BindPoseOnly,
        }
    }

    pub fn model(&self) -> Option<&MeshBuffer> {
        self.model.as_ref()
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    /// Decoded image for a texture path of the current model.
    pub fn texture(&self, path: &str) -> Option<&RgbaImage> {
        self.textures.get(path)
    }
}
