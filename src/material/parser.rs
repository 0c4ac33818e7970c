// Line-oriented MDF material reader.
//
// Parsing is best effort: a line that cannot be understood is skipped and
// logged, every other line still applies. Only an unreadable file fails.

use super::{
    BlendType, MAX_TEXTURE_LAYERS, MaterialBlendType, MaterialDescriptor, MaterialType, RenderFlag,
    Rgba8, UvType,
};
use crate::error::ModelError;
use crate::model::join_asset_path;

/// Texture scroll speeds are authored per frame at 60 fps.
pub const SPEED_SCALE: f32 = 60.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MdfLineError {
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a number")]
    BadNumber(String),
    #[error("layer {0} is outside 0..4")]
    LayerOutOfRange(i64),
    #[error("unknown value '{0}'")]
    UnknownValue(String),
}

/// Reads `root + material_path` and parses it.
pub fn parse_mdf(root: &str, material_path: &str) -> Result<MaterialDescriptor, ModelError> {
    let full_path = join_asset_path(root, material_path);
    let bytes = std::fs::read(&full_path).map_err(|e| ModelError::file_open(&full_path, e))?;
    let text = String::from_utf8_lossy(&bytes);

    let material = parse_mdf_str(root, &text);
    log::debug!("Material '{}':\n{}", full_path, material);
    Ok(material)
}

/// Parses material text. Texture and gloss paths are prefixed with `root`.
pub fn parse_mdf_str(root: &str, text: &str) -> MaterialDescriptor {
    let mut material = MaterialDescriptor::default();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Err(e) = apply_line(&mut material, root, line) {
            log::debug!("MDF line {} skipped ({}): {}", number + 1, e, line);
        }
    }

    material
}

fn apply_line(material: &mut MaterialDescriptor, root: &str, line: &str) -> Result<(), MdfLineError> {
    let (keyword, rest) = split_keyword(line);
    let keyword = keyword.to_ascii_lowercase();
    let mut args = rest.split_whitespace();

    if let Some(material_type) = MaterialType::from_keyword(&keyword) {
        material.material_type = material_type;
        return Ok(());
    }

    match keyword.as_str() {
        // Section marker only.
        "highquality" => {}
        "texture" => {
            let (layer, path) = if rest.starts_with('"') {
                (0, strip_quotes(rest))
            } else {
                let (token, path) = split_keyword(rest);
                (parse_layer(Some(token))?, strip_quotes(path))
            };
            if path.is_empty() {
                return Err(MdfLineError::MissingArgument("texture path"));
            }
            let slot = &mut material.layers[layer];
            slot.path = join_asset_path(root, path);
            material.texture_count = material.texture_count.max(layer as u8 + 1);
        }
        "uvtype" => {
            let layer = parse_layer(args.next())?;
            let name = args.next().ok_or(MdfLineError::MissingArgument("uv type"))?;
            material.layers[layer].uv_type =
                UvType::from_keyword(name).ok_or_else(|| MdfLineError::UnknownValue(name.to_string()))?;
        }
        "blendtype" => {
            let layer = parse_layer(args.next())?;
            let name = args.next().ok_or(MdfLineError::MissingArgument("blend type"))?;
            material.layers[layer].blend_type = BlendType::from_keyword(name)
                .ok_or_else(|| MdfLineError::UnknownValue(name.to_string()))?;
        }
        "speedu" => {
            let layer = parse_layer(args.next())?;
            material.layers[layer].speed_u = parse_f32(args.next(), "speed")? * SPEED_SCALE;
        }
        "speedv" => {
            let layer = parse_layer(args.next())?;
            material.layers[layer].speed_v = parse_f32(args.next(), "speed")? * SPEED_SCALE;
        }
        "speed" => {
            let first = args.next();
            match args.next() {
                Some(value) => {
                    let layer = parse_layer(first)?;
                    let speed = parse_f32(Some(value), "speed")? * SPEED_SCALE;
                    material.layers[layer].speed_u = speed;
                    material.layers[layer].speed_v = speed;
                }
                None => {
                    let speed = parse_f32(first, "speed")? * SPEED_SCALE;
                    for layer in &mut material.layers {
                        layer.speed_u = speed;
                        layer.speed_v = speed;
                    }
                }
            }
        }
        "glossmap" => {
            let path = first_path(rest);
            if path.is_empty() {
                return Err(MdfLineError::MissingArgument("gloss map path"));
            }
            material.gloss_map = Some(join_asset_path(root, path));
        }
        "materialblendtype" => {
            let name = args.next().ok_or(MdfLineError::MissingArgument("blend type"))?;
            material.material_blend_type = MaterialBlendType::from_keyword(name)
                .ok_or_else(|| MdfLineError::UnknownValue(name.to_string()))?;
        }
        "specularpower" => {
            material.specular_power = parse_f32(args.next(), "specular power")?;
        }
        "color" => material.color = parse_color(&mut args)?,
        "specular" => material.specular = parse_color(&mut args)?,
        other => {
            // Anything else is either a render flag or ignored.
            if let Some(flag) = RenderFlag::from_keyword(other) {
                material.render_flags.insert(flag);
            }
        }
    }

    Ok(())
}

/// Splits off the first whitespace-delimited token, returning it and the trimmed remainder.
fn split_keyword(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.find(char::is_whitespace) {
        Some(idx) => (&line[..idx], line[idx..].trim()),
        None => (line, ""),
    }
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s).trim()
}

/// First path argument: the quoted span if the text opens with a quote, else the first token.
fn first_path(rest: &str) -> &str {
    match rest.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next().unwrap_or_default().trim(),
        None => rest.split_whitespace().next().unwrap_or_default(),
    }
}

fn parse_layer(token: Option<&str>) -> Result<usize, MdfLineError> {
    let token = token.ok_or(MdfLineError::MissingArgument("layer"))?;
    let layer: i64 = token
        .parse()
        .map_err(|_| MdfLineError::BadNumber(token.to_string()))?;
    if (0..MAX_TEXTURE_LAYERS as i64).contains(&layer) {
        Ok(layer as usize)
    } else {
        Err(MdfLineError::LayerOutOfRange(layer))
    }
}

fn parse_f32(token: Option<&str>, what: &'static str) -> Result<f32, MdfLineError> {
    let token = token.ok_or(MdfLineError::MissingArgument(what))?;
    token
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| MdfLineError::BadNumber(token.to_string()))
}

/// A component is either a byte (`255`) or a normalized float (`0.5`).
fn parse_color_component(token: Option<&str>) -> Result<u8, MdfLineError> {
    let token = token.ok_or(MdfLineError::MissingArgument("color component"))?;
    if token.contains('.') {
        let value = parse_f32(Some(token), "color component")?;
        Ok((value.clamp(0.0, 1.0) * 255.0).round() as u8)
    } else {
        token
            .parse::<u8>()
            .map_err(|_| MdfLineError::BadNumber(token.to_string()))
    }
}

fn parse_color<'a>(args: &mut impl Iterator<Item = &'a str>) -> Result<Rgba8, MdfLineError> {
    Ok(Rgba8 {
        r: parse_color_component(args.next())?,
        g: parse_color_component(args.next())?,
        b: parse_color_component(args.next())?,
        a: parse_color_component(args.next())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::RenderFlags;

    #[test]
    fn general_material_with_float_color() {
        let m = parse_mdf_str("", "general\ncolor 1.0 0.5 0.5 1.0\nnotlit");
        assert_eq!(m.material_type, MaterialType::General);
        let [r, g, b, a] = m.color.to_f32();
        assert!((r - 1.0).abs() < 1.0 / 255.0);
        assert!((g - 0.5).abs() < 1.0 / 255.0);
        assert!((b - 0.5).abs() < 1.0 / 255.0);
        assert!((a - 1.0).abs() < 1.0 / 255.0);
        assert_eq!(m.render_flags, RenderFlags(RenderFlag::NotLit as u8));
    }

    #[test]
    fn texture_forms_and_slash_normalization() {
        let text = "Textured\n\
                    Texture \"art\\meshes\\monsters\\bugbear.tga\"\n\
                    texture 2 \"art/meshes/glow map.tga\"\n";
        let m = parse_mdf_str("C:/ToEE/data/", text);
        assert_eq!(m.material_type, MaterialType::Textured);
        assert_eq!(m.layers[0].path, "C:/ToEE/data/art/meshes/monsters/bugbear.tga");
        assert_eq!(m.layers[2].path, "C:/ToEE/data/art/meshes/glow map.tga");
        assert!(m.layers[1].path.is_empty());
        assert_eq!(m.texture_count, 3);
    }

    #[test]
    fn malformed_line_only_skips_itself() {
        let text = "textured\n\
                    texture 0 \"a.tga\"\n\
                    blendtype zero add\n\
                    blendtype 0 texturealpha\n\
                    uvtype 0 drift\n\
                    speedu 0 0.5\n\
                    materialblendtype alpha\n\
                    double\n";
        let m = parse_mdf_str("", text);
        assert_eq!(m.layers[0].blend_type, BlendType::TextureAlpha);
        assert_eq!(m.layers[0].uv_type, UvType::Drift);
        assert_eq!(m.layers[0].speed_u, 30.0);
        assert_eq!(m.layers[0].speed_v, 0.0);
        assert_eq!(m.material_blend_type, MaterialBlendType::Alpha);
        assert!(m.render_flags.contains(RenderFlag::DoubleSided));
        assert_eq!(m.texture_count, 1);
    }

    #[test]
    fn malformed_blendtype_leaves_default() {
        let m = parse_mdf_str("", "blendtype x add\ncolor 255 128 0 255");
        assert_eq!(m.layers[0].blend_type, BlendType::Modulate);
        assert_eq!(m.color, Rgba8 { r: 255, g: 128, b: 0, a: 255 });
    }

    #[test]
    fn global_and_layer_speed() {
        let m = parse_mdf_str("", "speed 0.1\nspeed 1 2");
        assert!((m.layers[0].speed_u - 6.0).abs() < 1e-4);
        assert!((m.layers[3].speed_v - 6.0).abs() < 1e-4);
        assert_eq!(m.layers[1].speed_u, 120.0);
        assert_eq!(m.layers[1].speed_v, 120.0);
    }

    #[test]
    fn out_of_range_layer_is_skipped() {
        let m = parse_mdf_str("", "texture 4 \"x.tga\"\nuvtype -1 swirl");
        assert_eq!(m.texture_count, 0);
        assert!(m.layers.iter().all(|l| l.uv_type == UvType::Mesh));
    }

    #[test]
    fn gloss_specular_and_unknown_keywords() {
        let text = "# comment\n\
                    highquality\n\
                    glossmap \"art\\gloss.tga\"\n\
                    specularpower 25\n\
                    specular 10 20 30 40\n\
                    sparkle\n\
                    ZFillOnly\n\
                    color 1 2 3\n";
        let m = parse_mdf_str("root/", text);
        assert_eq!(m.gloss_map.as_deref(), Some("root/art/gloss.tga"));
        assert_eq!(m.specular_power, 25.0);
        assert_eq!(m.specular, Rgba8 { r: 10, g: 20, b: 30, a: 40 });
        assert_eq!(m.render_flags.flags(), vec![RenderFlag::ZFillOnly]);
        // Incomplete color line leaves the default.
        assert_eq!(m.color, Rgba8::default());
    }

    #[test]
    fn glossmap_takes_only_the_path_argument() {
        let m = parse_mdf_str("root/", "glossmap art/gloss.tga 0.5\n");
        assert_eq!(m.gloss_map.as_deref(), Some("root/art/gloss.tga"));

        let m = parse_mdf_str("root/", "glossmap \"art/shiny gloss.tga\" extra\n");
        assert_eq!(m.gloss_map.as_deref(), Some("root/art/shiny gloss.tga"));

        let m = parse_mdf_str("root/", "glossmap\n");
        assert_eq!(m.gloss_map, None);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_mdf("/nonexistent/", "art/none.mdf").is_err());
    }
}
