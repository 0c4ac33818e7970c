use serde::{Deserialize, Serialize};

/// Shader family selected by the first keyword of a material file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialType {
    #[default]
    Textured, // 0
    General,  // 1
    Clipper,  // 2
}

impl MaterialType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "textured" => Some(Self::Textured),
            "general" => Some(Self::General),
            "clipper" => Some(Self::Clipper),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Textured => "Textured",
            Self::General => "General",
            Self::Clipper => "Clipper",
        }
    }
}

/// Texture coordinate animation applied to a layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UvType {
    #[default]
    Mesh,        // 0
    Environment, // 1
    Drift,       // 2
    Swirl,       // 3
    Wavey,       // 4
}

impl UvType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "mesh" => Some(Self::Mesh),
            "environment" => Some(Self::Environment),
            "drift" => Some(Self::Drift),
            "swirl" => Some(Self::Swirl),
            "wavey" => Some(Self::Wavey),
            _ => None,
        }
    }

    /// Numeric id handed to shaders.
    pub fn to_u8(&self) -> u8 {
        *self as u8
    }
}

/// How a texture layer combines with the layers below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendType {
    #[default]
    Modulate,        // 0
    Add,             // 1
    TextureAlpha,    // 2
    CurrentAlpha,    // 3
    CurrentAlphaAdd, // 4
}

impl BlendType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "modulate" => Some(Self::Modulate),
            "add" => Some(Self::Add),
            "texturealpha" => Some(Self::TextureAlpha),
            "currentalpha" => Some(Self::CurrentAlpha),
            "currentalphaadd" => Some(Self::CurrentAlphaAdd),
            _ => None,
        }
    }

    pub fn to_u8(&self) -> u8 {
        *self as u8
    }
}

/// Framebuffer blending for the whole material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialBlendType {
    #[default]
    None,     // 0
    Alpha,    // 1
    Add,      // 2
    AlphaAdd, // 3
}

impl MaterialBlendType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "alpha" => Some(Self::Alpha),
            "add" => Some(Self::Add),
            "alphaadd" => Some(Self::AlphaAdd),
            _ => None,
        }
    }

    pub fn is_blended(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Alpha => "Alpha",
            Self::Add => "Add",
            Self::AlphaAdd => "AlphaAdd",
        }
    }
}
