// Shared fixture builders: synthetic SKM/SKA/TGA bytes and a temporary art/ tree.
#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use skmvis::model::{
    BONE_NAME_LEN, MATERIAL_PATH_LEN, SKA_ANIMATION_HEADER_SIZE, SKA_BONE_SIZE, SKA_HEADER_SIZE,
    SKM_BONE_SIZE, SKM_FACE_SIZE, SKM_HEADER_SIZE, SKM_VERTEX_SIZE,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const IDENTITY_ROWS: [[f32; 4]; 3] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
];

pub fn translate_rows(x: f32, y: f32, z: f32) -> [[f32; 4]; 3] {
    [
        [1.0, 0.0, 0.0, x],
        [0.0, 1.0, 0.0, y],
        [0.0, 0.0, 1.0, z],
    ]
}

pub struct MeshBone {
    pub parent: i16,
    pub name: &'static str,
    pub world_inverse: [[f32; 4]; 3],
}

pub struct MeshVertex {
    pub position: [f32; 3],
    pub influences: Vec<(u16, f32)>,
}

pub struct AnimBone {
    pub parent: i16,
    pub name: &'static str,
    pub position: [f32; 3],
}

fn write_fixed(out: &mut Vec<u8>, text: &str, len: usize) {
    let mut bytes = text.as_bytes().to_vec();
    bytes.resize(len, 0);
    out.extend_from_slice(&bytes);
}

/// Two-bone mesh with one triangle: bone 0 is an identity root, bone 1 sits at (0, 1, 0).
pub fn two_bone_mesh(material: &str) -> Vec<u8> {
    skm_bytes(
        &[
            MeshBone { parent: -1, name: "Bip01", world_inverse: IDENTITY_ROWS },
            MeshBone { parent: 0, name: "Bip01 Spine", world_inverse: translate_rows(0.0, -1.0, 0.0) },
        ],
        &[material],
        &[
            MeshVertex { position: [0.0, 0.0, 0.0], influences: vec![(0, 1.0)] },
            MeshVertex { position: [1.0, 0.0, 0.0], influences: vec![(0, 0.5), (1, 0.5)] },
            MeshVertex { position: [0.0, 2.0, 0.0], influences: vec![(1, 1.0)] },
        ],
        &[(0, [0, 1, 2])],
    )
}

pub fn skm_bytes(
    bones: &[MeshBone],
    materials: &[&str],
    vertices: &[MeshVertex],
    faces: &[(u16, [u16; 3])],
) -> Vec<u8> {
    let bone_offset = SKM_HEADER_SIZE as u32;
    let material_offset = bone_offset + SKM_BONE_SIZE as u32 * bones.len() as u32;
    let vertex_offset = material_offset + MATERIAL_PATH_LEN as u32 * materials.len() as u32;
    let face_offset = vertex_offset + SKM_VERTEX_SIZE as u32 * vertices.len() as u32;

    let mut out = Vec::new();
    for value in [
        bones.len() as u32,
        bone_offset,
        materials.len() as u32,
        material_offset,
        vertices.len() as u32,
        vertex_offset,
        faces.len() as u32,
        face_offset,
    ] {
        out.write_u32::<LittleEndian>(value).unwrap();
    }

    for bone in bones {
        out.write_i16::<LittleEndian>(0).unwrap();
        out.write_i16::<LittleEndian>(bone.parent).unwrap();
        write_fixed(&mut out, bone.name, BONE_NAME_LEN);
        for row in &bone.world_inverse {
            for v in row {
                out.write_f32::<LittleEndian>(*v).unwrap();
            }
        }
    }

    for material in materials {
        write_fixed(&mut out, material, MATERIAL_PATH_LEN);
    }

    for vertex in vertices {
        for v in vertex.position {
            out.write_f32::<LittleEndian>(v).unwrap();
        }
        out.write_f32::<LittleEndian>(1.0).unwrap();
        for v in [0.0, 0.0, 1.0, 0.0] {
            out.write_f32::<LittleEndian>(v).unwrap();
        }
        out.write_f32::<LittleEndian>(0.5).unwrap();
        out.write_f32::<LittleEndian>(0.5).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(vertex.influences.len() as u16).unwrap();
        for slot in 0..6 {
            let id = vertex.influences.get(slot).map_or(0, |p| p.0);
            out.write_u16::<LittleEndian>(id).unwrap();
        }
        for slot in 0..6 {
            let weight = vertex.influences.get(slot).map_or(0.0, |p| p.1);
            out.write_f32::<LittleEndian>(weight).unwrap();
        }
    }

    for (material, indices) in faces {
        out.write_u16::<LittleEndian>(*material).unwrap();
        for i in indices {
            out.write_u16::<LittleEndian>(*i).unwrap();
        }
    }

    assert_eq!(out.len() as u32, face_offset + SKM_FACE_SIZE as u32 * faces.len() as u32);
    out
}

/// Animation file with identity rotations and unit scales; clips carry no events.
pub fn ska_bytes(bones: &[AnimBone], clips: &[&str]) -> Vec<u8> {
    let clips: Vec<(&str, i16)> = clips.iter().map(|name| (*name, 0)).collect();
    ska_bytes_with_events(bones, &clips)
}

/// Like `ska_bytes`, but each clip declares an event count. No event records are written.
pub fn ska_bytes_with_events(bones: &[AnimBone], clips: &[(&str, i16)]) -> Vec<u8> {
    let bone_offset = SKA_HEADER_SIZE as u32;
    let anim_offset = bone_offset + SKA_BONE_SIZE as u32 * bones.len() as u32;

    let mut out = Vec::new();
    for value in [bones.len() as u32, bone_offset, 0, 0, clips.len() as u32, anim_offset] {
        out.write_u32::<LittleEndian>(value).unwrap();
    }

    for bone in bones {
        out.write_i16::<LittleEndian>(0).unwrap();
        out.write_i16::<LittleEndian>(bone.parent).unwrap();
        write_fixed(&mut out, bone.name, BONE_NAME_LEN);
        for v in [1.0, 1.0, 1.0] {
            out.write_f32::<LittleEndian>(v).unwrap();
        }
        out.write_u32::<LittleEndian>(0).unwrap();
        for v in [0.0, 0.0, 0.0, 1.0] {
            out.write_f32::<LittleEndian>(v).unwrap();
        }
        for v in bone.position {
            out.write_f32::<LittleEndian>(v).unwrap();
        }
        out.write_u32::<LittleEndian>(0).unwrap();
    }

    for (clip, event_count) in clips {
        write_fixed(&mut out, clip, 64);
        out.write_u8(0).unwrap();
        out.write_u8(1).unwrap();
        out.write_i16::<LittleEndian>(*event_count).unwrap();
        out.write_u32::<LittleEndian>(0).unwrap();
        out.write_i16::<LittleEndian>(1).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        for stream in 0..10 {
            let frames = if stream == 0 { 12 } else { 0 };
            out.write_i16::<LittleEndian>(frames).unwrap();
            out.write_i16::<LittleEndian>(-1).unwrap();
            out.write_f32::<LittleEndian>(30.0).unwrap();
            out.write_f32::<LittleEndian>(30.0).unwrap();
            out.write_u32::<LittleEndian>(0).unwrap();
        }
    }

    assert_eq!(
        out.len() as u32,
        anim_offset + SKA_ANIMATION_HEADER_SIZE as u32 * clips.len() as u32
    );
    out
}

/// Uncompressed 32-bit TGA from RGBA pixels.
pub fn tga_bytes(width: u16, height: u16, rgba: &[[u8; 4]]) -> Vec<u8> {
    let mut out = vec![0u8; 18];
    out[2] = 2;
    out[12..14].copy_from_slice(&width.to_le_bytes());
    out[14..16].copy_from_slice(&height.to_le_bytes());
    out[16] = 32;
    for [r, g, b, a] in rgba {
        out.extend_from_slice(&[*b, *g, *r, *a]);
    }
    out
}

/// Temporary game data directory with an `art/` subtree.
pub struct ArtTree {
    dir: TempDir,
}

impl ArtTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// Writes `bytes` at `relative` under the data root and returns the full path.
    pub fn write(&self, relative: &str, bytes: &[u8]) -> String {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, bytes).unwrap();
        path_string(&path)
    }

    pub fn path(&self, relative: &str) -> String {
        path_string(&self.root().join(relative))
    }
}

pub fn path_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
