// Asset path conventions shared by mesh, animation and material files.

use crate::error::{KEY_MISSING_COMPANION, KEY_MISSING_ROOT, ModelError};

/// Names the animation file sitting next to a mesh file.
///
/// Mesh and animation share a base name and differ only in the last
/// character of the extension (`.SKM` / `.SKA`). The replacement keeps the
/// case of the character it replaces.
pub fn companion_animation_path(mesh_path: &str, replacement: char) -> Result<String, ModelError> {
    let file_start = mesh_path.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let has_extension = mesh_path[file_start..]
        .rfind('.')
        .is_some_and(|dot| file_start + dot + 1 < mesh_path.len());

    let last = match mesh_path.chars().last() {
        Some(c) if has_extension => c,
        _ => {
            return Err(ModelError::new(KEY_MISSING_COMPANION)
                .with_arg("path", mesh_path)
                .with_arg("reason", "no-extension"));
        }
    };

    let swapped = if last.is_ascii_uppercase() {
        replacement.to_ascii_uppercase()
    } else {
        replacement.to_ascii_lowercase()
    };

    let mut out = String::with_capacity(mesh_path.len());
    out.push_str(&mesh_path[..mesh_path.len() - last.len_utf8()]);
    out.push(swapped);
    Ok(out)
}

/// Finds the asset root of `mesh_path` by locating `marker` (case-insensitive).
///
/// Returns everything up to and including the separator that starts the
/// marker, so `C:/game/data/art/meshes/x.skm` with `/art/` gives `C:/game/data/`.
pub fn discover_root(mesh_path: &str, marker: &str) -> Result<String, ModelError> {
    let normalized = normalize_slashes(mesh_path);
    let marker = normalize_slashes(marker);
    let lower = normalized.to_ascii_lowercase();

    match lower.find(&marker.to_ascii_lowercase()) {
        Some(idx) => {
            let keep = if marker.starts_with('/') { idx + 1 } else { idx };
            Ok(normalized[..keep].to_string())
        }
        None => Err(ModelError::new(KEY_MISSING_ROOT)
            .with_arg("path", mesh_path)
            .with_arg("marker", marker)),
    }
}

pub fn normalize_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Joins an asset root and a relative asset path the way the game does: plain concatenation.
pub fn join_asset_path(root: &str, relative: &str) -> String {
    let relative = normalize_slashes(relative);
    if root.is_empty() || root.ends_with('/') {
        format!("{root}{relative}")
    } else {
        format!("{root}/{relative}")
    }
}
