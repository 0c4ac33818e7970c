use crate::error::ModelError;
use crate::model::{
    BONE_NAME_LEN, MATERIAL_PATH_LEN, SkmBone, SkmFace, SkmFile, SkmHeader, SkmVertex,
};
use crate::parser::records::{
    read_f32_array, read_fixed_string, read_matrix3x4, read_records, read_u16_array,
};
use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{BufReader, Read, Seek};

/// Opens and parses a skeletal mesh file.
pub fn load_skm(path: &str) -> Result<SkmFile, ModelError> {
    let file = File::open(path).map_err(|e| ModelError::file_open(path, e))?;
    read_skm(&mut BufReader::new(file)).map_err(|e| e.with_arg("path", path))
}

pub fn read_skm<R: Read + Seek>(file: &mut R) -> Result<SkmFile, ModelError> {
    let header = read_header(file).map_err(|e| e.in_section("header"))?;

    let bones = read_records(
        file,
        header.bone_data_offset as u64,
        header.bone_count,
        "bones",
        read_bone,
    )?;

    let materials = read_records(
        file,
        header.material_data_offset as u64,
        header.material_count,
        "materials",
        |f| read_fixed_string(f, MATERIAL_PATH_LEN),
    )?;

    let vertices = read_records(
        file,
        header.vertex_data_offset as u64,
        header.vertex_count,
        "vertices",
        read_vertex,
    )?;

    let faces = read_records(
        file,
        header.face_data_offset as u64,
        header.face_count,
        "faces",
        read_face,
    )?;

    log::debug!(
        "SKM: {} bones, {} materials, {} vertices, {} faces",
        bones.len(),
        materials.len(),
        vertices.len(),
        faces.len()
    );

    Ok(SkmFile {
        header,
        bones,
        materials,
        vertices,
        faces,
    })
}

fn read_header<R: Read>(file: &mut R) -> Result<SkmHeader, ModelError> {
    Ok(SkmHeader {
        bone_count: file.read_u32::<LittleEndian>()?,
        bone_data_offset: file.read_u32::<LittleEndian>()?,
        material_count: file.read_u32::<LittleEndian>()?,
        material_data_offset: file.read_u32::<LittleEndian>()?,
        vertex_count: file.read_u32::<LittleEndian>()?,
        vertex_data_offset: file.read_u32::<LittleEndian>()?,
        face_count: file.read_u32::<LittleEndian>()?,
        face_data_offset: file.read_u32::<LittleEndian>()?,
    })
}

fn read_bone<R: Read>(file: &mut R) -> Result<SkmBone, ModelError> {
    let flags = file.read_i16::<LittleEndian>()?;
    let parent_bone = file.read_i16::<LittleEndian>()?;
    let name = read_fixed_string(file, BONE_NAME_LEN)?;
    let world_inverse = read_matrix3x4(file)?;

    Ok(SkmBone {
        flags,
        parent_bone,
        name,
        world_inverse,
    })
}

fn read_vertex<R: Read>(file: &mut R) -> Result<SkmVertex, ModelError> {
    Ok(SkmVertex {
        position: read_f32_array::<_, 4>(file)?,
        normal: read_f32_array::<_, 4>(file)?,
        uv: read_f32_array::<_, 2>(file)?,
        unknown: file.read_u16::<LittleEndian>()?,
        weight_count: file.read_u16::<LittleEndian>()?,
        bone_ids: read_u16_array::<_, 6>(file)?,
        bone_weights: read_f32_array::<_, 6>(file)?,
    })
}

fn read_face<R: Read>(file: &mut R) -> Result<SkmFace, ModelError> {
    Ok(SkmFace {
        material_index: file.read_u16::<LittleEndian>()?,
        vertex_indices: read_u16_array::<_, 3>(file)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::{SKM_BONE_SIZE, SKM_FACE_SIZE, SKM_HEADER_SIZE, SKM_VERTEX_SIZE};
    use std::io::Cursor;

    fn put_u32(out: &mut Vec<u8>, v: u32) {
        out.extend_from_slice(&v.to_le_bytes());
    }

    fn put_f32(out: &mut Vec<u8>, v: f32) {
        out.extend_from_slice(&v.to_le_bytes());
    }

    fn single_triangle() -> Vec<u8> {
        let bone_offset = SKM_HEADER_SIZE as u32;
        let material_offset = bone_offset + SKM_BONE_SIZE as u32;
        let vertex_offset = material_offset + MATERIAL_PATH_LEN as u32;
        let face_offset = vertex_offset + 3 * SKM_VERTEX_SIZE as u32;

        let mut out = Vec::new();
        for v in [1, bone_offset, 1, material_offset, 3, vertex_offset, 1, face_offset] {
            put_u32(&mut out, v);
        }

        out.extend_from_slice(&0i16.to_le_bytes());
        out.extend_from_slice(&(-1i16).to_le_bytes());
        let mut name = b"Bip01".to_vec();
        name.resize(BONE_NAME_LEN, 0);
        out.extend_from_slice(&name);
        for row in [[1.0, 0.0, 0.0, 2.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0]] {
            for v in row {
                put_f32(&mut out, v);
            }
        }

        let mut material = b"art\\meshes\\skin.mdf".to_vec();
        material.resize(MATERIAL_PATH_LEN, 0);
        out.extend_from_slice(&material);

        for i in 0..3 {
            for v in [i as f32, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.5, 0.5] {
                put_f32(&mut out, v);
            }
            out.extend_from_slice(&0u16.to_le_bytes());
            out.extend_from_slice(&1u16.to_le_bytes());
            for id in [0u16; 6] {
                out.extend_from_slice(&id.to_le_bytes());
            }
            for w in [1.0f32, 0.0, 0.0, 0.0, 0.0, 0.0] {
                put_f32(&mut out, w);
            }
        }

        for v in [0u16, 0, 1, 2] {
            out.extend_from_slice(&v.to_le_bytes());
        }
        assert_eq!(out.len() as u32, face_offset + SKM_FACE_SIZE as u32);
        out
    }

    #[test]
    fn parses_all_sections() {
        let skm = read_skm(&mut Cursor::new(single_triangle())).unwrap();
        assert_eq!(skm.bones.len(), 1);
        assert_eq!(skm.bones[0].name, "Bip01");
        assert_eq!(skm.bones[0].parent_index(), None);
        assert_eq!(skm.bones[0].world_inverse[0][3], 2.0);
        assert_eq!(skm.materials, vec!["art\\meshes\\skin.mdf".to_string()]);
        assert_eq!(skm.vertices.len(), 3);
        assert_eq!(skm.vertices[2].position[0], 2.0);
        assert_eq!(skm.vertices[1].uv, [0.5, 0.5]);
        assert_eq!(skm.vertices[0].influences().collect::<Vec<_>>(), vec![(0, 1.0)]);
        assert_eq!(skm.faces[0].vertex_indices, [0, 1, 2]);
    }

    #[test]
    fn record_sizes_match_readers() {
        let data = single_triangle();
        let mut cursor = Cursor::new(data);

        cursor.set_position(SKM_HEADER_SIZE);
        read_bone(&mut cursor).unwrap();
        assert_eq!(cursor.stream_position().unwrap(), SKM_HEADER_SIZE + SKM_BONE_SIZE);

        let vertex_offset = SKM_HEADER_SIZE + SKM_BONE_SIZE + MATERIAL_PATH_LEN as u64;
        cursor.set_position(vertex_offset);
        read_vertex(&mut cursor).unwrap();
        assert_eq!(cursor.stream_position().unwrap(), vertex_offset + SKM_VERTEX_SIZE);

        let face_offset = vertex_offset + 3 * SKM_VERTEX_SIZE;
        cursor.set_position(face_offset);
        read_face(&mut cursor).unwrap();
        assert_eq!(cursor.stream_position().unwrap(), face_offset + SKM_FACE_SIZE);
    }

    #[test]
    fn short_header_fails() {
        let err = read_skm(&mut Cursor::new(vec![0u8; 12])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedRead);
        assert_eq!(err.arg("section"), Some("header"));
    }

    #[test]
    fn truncated_face_section_fails() {
        let mut data = single_triangle();
        data.truncate(data.len() - 3);
        let err = read_skm(&mut Cursor::new(data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedRead);
        assert_eq!(err.arg("section"), Some("faces"));
    }

    #[test]
    fn missing_file_is_file_open() {
        let err = load_skm("/nonexistent/dir/mesh.skm").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
    }
}
