use image::RgbaImage;
use std::path::PathBuf;

const TGA_HEADER_SIZE: usize = 18;
const IMAGE_TYPE_TRUE_COLOR: u8 = 2;

#[derive(Debug, thiserror::Error)]
pub enum TgaError {
    #[error("cannot open '{path}'")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("truncated TGA: need {expected} bytes, have {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("unsupported TGA image type {image_type}, only uncompressed true-color (2) is read")]
    UnsupportedImageType { image_type: u8 },
    #[error("unsupported TGA pixel depth {depth}, only 24 and 32 bits are read")]
    UnsupportedPixelDepth { depth: u8 },
}

/// Load and decode a TGA texture from disk
pub fn load_tga(path: &str) -> Result<RgbaImage, TgaError> {
    let data = std::fs::read(path).map_err(|source| TgaError::Open {
        path: PathBuf::from(path),
        source,
    })?;
    decode_tga(&data)
}

/// Decodes an uncompressed 24/32-bit TGA into RGBA8.
///
/// Rows are taken in file order; the origin bit of the descriptor is not consulted.
pub fn decode_tga(data: &[u8]) -> Result<RgbaImage, TgaError> {
    if data.len() < TGA_HEADER_SIZE {
        return Err(TgaError::Truncated {
            expected: TGA_HEADER_SIZE,
            actual: data.len(),
        });
    }

    let id_length = data[0] as usize;
    let color_map_type = data[1];
    let image_type = data[2];
    let color_map_length = u16::from_le_bytes([data[5], data[6]]) as usize;
    let color_map_entry_bits = data[7] as usize;
    let width = u16::from_le_bytes([data[12], data[13]]) as u32;
    let height = u16::from_le_bytes([data[14], data[15]]) as u32;
    let depth = data[16];

    if image_type != IMAGE_TYPE_TRUE_COLOR {
        return Err(TgaError::UnsupportedImageType { image_type });
    }
    let bytes_per_pixel = match depth {
        24 => 3,
        32 => 4,
        _ => return Err(TgaError::UnsupportedPixelDepth { depth }),
    };

    let color_map_size = if color_map_type == 1 {
        color_map_length * color_map_entry_bits.div_ceil(8)
    } else {
        0
    };
    let pixel_start = TGA_HEADER_SIZE + id_length + color_map_size;
    let pixel_count = width as usize * height as usize;
    let expected = pixel_start + pixel_count * bytes_per_pixel;
    if data.len() < expected {
        return Err(TgaError::Truncated {
            expected,
            actual: data.len(),
        });
    }

    let mut rgba = Vec::with_capacity(pixel_count * 4);
    for bgr in data[pixel_start..expected].chunks_exact(bytes_per_pixel) {
        let alpha = if bytes_per_pixel == 4 { bgr[3] } else { 255 };
        rgba.extend_from_slice(&[bgr[2], bgr[1], bgr[0], alpha]);
    }

    RgbaImage::from_raw(width, height, rgba).ok_or(TgaError::Truncated {
        expected,
        actual: data.len(),
    })
}
