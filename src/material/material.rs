use super::{BlendType, MaterialBlendType, MaterialType, RenderFlags, UvType};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_TEXTURE_LAYERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self { r: 0, g: 0, b: 0, a: 255 }
    }
}

impl Rgba8 {
    pub fn to_f32(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureLayer {
    /// Resolved path (asset root + forward-slashed relative path); empty when unassigned.
    pub path: String,
    pub uv_type: UvType,
    pub blend_type: BlendType,
    /// Already multiplied by the 60 fps normalization.
    pub speed_u: f32,
    pub speed_v: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescriptor {
    pub material_type: MaterialType,
    pub layers: [TextureLayer; MAX_TEXTURE_LAYERS],
    /// Highest assigned layer index + 1.
    pub texture_count: u8,
    pub gloss_map: Option<String>,
    pub color: Rgba8,
    pub specular: Rgba8,
    pub specular_power: f32,
    pub material_blend_type: MaterialBlendType,
    pub render_flags: RenderFlags,
}

impl MaterialDescriptor {
    /// Layers `0..texture_count`.
    pub fn active_layers(&self) -> &[TextureLayer] {
        &self.layers[..(self.texture_count as usize).min(MAX_TEXTURE_LAYERS)]
    }

    /// Every texture path this material references, diffuse layers first.
    pub fn texture_paths(&self) -> impl Iterator<Item = &str> {
        self.active_layers()
            .iter()
            .map(|l| l.path.as_str())
            .filter(|p| !p.is_empty())
            .chain(self.gloss_map.as_deref())
    }
}

impl fmt::Display for MaterialDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Material type: {}", self.material_type.name())?;
        for (i, layer) in self.layers.iter().enumerate() {
            writeln!(
                f,
                "Texture{i}: '{}' uv={:?} blend={:?} speed=({}, {})",
                layer.path, layer.uv_type, layer.blend_type, layer.speed_u, layer.speed_v
            )?;
        }
        writeln!(f, "Gloss texture: {}", self.gloss_map.as_deref().unwrap_or("<none>"))?;
        writeln!(
            f,
            "Color: {} {} {} {}",
            self.color.r, self.color.g, self.color.b, self.color.a
        )?;
        writeln!(
            f,
            "Specular: {} {} {} {}",
            self.specular.r, self.specular.g, self.specular.b, self.specular.a
        )?;
        writeln!(f, "Specular power: {}", self.specular_power)?;
        writeln!(f, "Material blend type: {}", self.material_blend_type.name())?;
        let flags: Vec<&str> = self.render_flags.flags().iter().map(|fl| fl.name()).collect();
        writeln!(f, "Render flags: [{}]", flags.join(", "))?;
        write!(f, "Texture count: {}", self.texture_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_paths_skip_empty_layers_and_append_gloss() {
        let mut material = MaterialDescriptor::default();
        material.layers[0].path = "root/art/a.tga".to_string();
        material.layers[2].path = "root/art/c.tga".to_string();
        material.texture_count = 3;
        material.gloss_map = Some("root/art/gloss.tga".to_string());
        let paths: Vec<&str> = material.texture_paths().collect();
        assert_eq!(paths, vec!["root/art/a.tga", "root/art/c.tga", "root/art/gloss.tga"]);
    }

    #[test]
    fn default_color_is_opaque_black() {
        assert_eq!(Rgba8::default().to_f32(), [0.0, 0.0, 0.0, 1.0]);
    }
}
