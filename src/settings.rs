use serde::{Deserialize, Serialize};

pub const CONFY_APP_NAME: &str = "skmvis-rs";

/// What the loader does when a texture referenced by a material cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TexturePolicy {
    /// Fail the whole load.
    Abort,
    /// Substitute a placeholder image and record the failure on the buffer.
    Placeholder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderSettings {
    /// Asset root used for material and texture paths. Overrides `root_marker` discovery.
    pub data_root: Option<String>,
    /// Path segment located in the mesh path to infer the asset root.
    pub root_marker: String,
    /// Replaces the last character of the mesh extension to name the animation file.
    pub animation_extension_char: char,
    pub max_influences: usize,
    pub missing_texture: TexturePolicy,
    pub load_textures: bool,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            data_root: None,
            root_marker: "/art/".to_string(),
            animation_extension_char: 'a',
            max_influences: 4,
            missing_texture: TexturePolicy::Abort,
            load_textures: true,
        }
    }
}

impl LoaderSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "loader").unwrap_or_default()
    }

    pub fn save(&self) {
        if let Err(e) = confy::store(CONFY_APP_NAME, "loader", self) {
            log::warn!("Failed to store loader settings: {}", e);
        }
    }

    /// Influence limit clamped to what the vertex layout can carry.
    pub fn influence_limit(&self) -> usize {
        self.max_influences.clamp(1, crate::animation::MAX_GPU_INFLUENCES)
    }
}
