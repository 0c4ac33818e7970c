// Little-endian field readers shared by the SKM and SKA parsers.

use crate::error::ModelError;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

/// Reads a NUL-padded fixed-length string field.
pub(crate) fn read_fixed_string<R: Read>(file: &mut R, len: usize) -> Result<String, ModelError> {
    let mut bytes = vec![0u8; len];
    file.read_exact(&mut bytes)?;
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(len);
    Ok(String::from_utf8_lossy(&bytes[..end]).trim().to_string())
}

pub(crate) fn read_f32_array<R: Read, const N: usize>(file: &mut R) -> Result<[f32; N], ModelError> {
    let mut out = [0.0f32; N];
    for v in &mut out {
        *v = file.read_f32::<LittleEndian>()?;
    }
    Ok(out)
}

pub(crate) fn read_u16_array<R: Read, const N: usize>(file: &mut R) -> Result<[u16; N], ModelError> {
    let mut out = [0u16; N];
    for v in &mut out {
        *v = file.read_u16::<LittleEndian>()?;
    }
    Ok(out)
}

/// Three rows of four floats, row-major.
pub(crate) fn read_matrix3x4<R: Read>(file: &mut R) -> Result<[[f32; 4]; 3], ModelError> {
    Ok([
        read_f32_array::<_, 4>(file)?,
        read_f32_array::<_, 4>(file)?,
        read_f32_array::<_, 4>(file)?,
    ])
}

/// Seeks to an absolute offset, refusing offsets past the end of the stream.
pub(crate) fn seek_to<R: Seek>(file: &mut R, offset: u64, section: &'static str) -> Result<(), ModelError> {
    let len = file.seek(SeekFrom::End(0))?;
    if offset > len {
        return Err(ModelError::new(crate::error::KEY_TRUNCATED_READ)
            .in_section(section)
            .with_arg("offset", offset)
            .with_arg("len", len));
    }
    file.seek(SeekFrom::Start(offset))?;
    Ok(())
}

/// Reads `count` fixed-size records, tagging a short read with the section name.
pub(crate) fn read_records<R, T, F>(
    file: &mut R,
    offset: u64,
    count: u32,
    section: &'static str,
    mut read_one: F,
) -> Result<Vec<T>, ModelError>
where
    R: Read + Seek,
    F: FnMut(&mut R) -> Result<T, ModelError>,
{
    if count == 0 {
        return Ok(Vec::new());
    }
    seek_to(file, offset, section)?;
    let mut out = Vec::with_capacity((count as usize).min(1 << 16));
    for index in 0..count {
        let record = read_one(file).map_err(|e| e.in_section(section).with_arg("index", index))?;
        out.push(record);
    }
    Ok(out)
}
