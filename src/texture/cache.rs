use super::{TgaError, load_tga};
use image::{Rgba, RgbaImage};
use std::collections::{HashMap, HashSet};
use std::collections::hash_map::Entry;

/// Decoded textures keyed by resolved path.
#[derive(Debug, Default)]
pub struct TextureCache {
    images: HashMap<String, RgbaImage>,
    /// Paths currently holding a placeholder; decoding is retried for them.
    placeholders: HashSet<String>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached image for `path`, decoding and caching it on first use.
    ///
    /// A decode failure is returned to the caller and nothing is cached.
    /// Placeholder entries are decoded again and replaced once that succeeds.
    pub fn get_or_load(&mut self, path: &str) -> Result<&RgbaImage, TgaError> {
        if self.placeholders.contains(path) {
            let image = load_tga(path)?;
            self.placeholders.remove(path);
            self.images.insert(path.to_string(), image);
        }
        match self.images.entry(path.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let image = load_tga(path)?;
                log::debug!("Decoded texture '{}' ({}x{})", path, image.width(), image.height());
                Ok(e.insert(image))
            }
        }
    }

    pub fn insert(&mut self, path: &str, image: RgbaImage) {
        self.placeholders.remove(path);
        self.images.insert(path.to_string(), image);
    }

    /// Stores the placeholder image under `path` until a later decode succeeds.
    pub fn insert_placeholder(&mut self, path: &str) {
        self.images.insert(path.to_string(), placeholder_texture());
        self.placeholders.insert(path.to_string());
    }

    pub fn is_placeholder(&self, path: &str) -> bool {
        self.placeholders.contains(path)
    }

    pub fn get(&self, path: &str) -> Option<&RgbaImage> {
        self.images.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.images.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.placeholders.clear();
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(String::as_str)
    }
}

/// 1x1 opaque magenta, stands in for textures that failed to decode.
pub fn placeholder_texture() -> RgbaImage {
    RgbaImage::from_pixel(1, 1, Rgba([255, 0, 255, 255]))
}
