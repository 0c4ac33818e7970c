use serde::{Deserialize, Serialize};

pub const SKM_HEADER_SIZE: u64 = 32;
pub const SKM_BONE_SIZE: u64 = 100;
pub const SKM_VERTEX_SIZE: u64 = 80;
pub const SKM_FACE_SIZE: u64 = 8;

pub const BONE_NAME_LEN: usize = 48;
pub const MATERIAL_PATH_LEN: usize = 128;
/// Influence slots stored per vertex on disk.
pub const MAX_STORED_INFLUENCES: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkmHeader {
    pub bone_count: u32,
    pub bone_data_offset: u32,
    pub material_count: u32,
    pub material_data_offset: u32,
    pub vertex_count: u32,
    pub vertex_data_offset: u32,
    pub face_count: u32,
    pub face_data_offset: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkmBone {
    pub flags: i16,
    pub parent_bone: i16, // -1 means root
    pub name: String,
    /// Row-major 3x4 affine world-to-bone matrix.
    pub world_inverse: [[f32; 4]; 3],
}

impl SkmBone {
    pub fn parent_index(&self) -> Option<usize> {
        usize::try_from(self.parent_bone).ok()
    }
}

impl Default for SkmBone {
    fn default() -> Self {
        Self {
            flags: 0,
            parent_bone: -1,
            name: String::new(),
            world_inverse: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkmVertex {
    pub position: [f32; 4],
    pub normal: [f32; 4],
    pub uv: [f32; 2],
    pub unknown: u16,
    pub weight_count: u16,
    pub bone_ids: [u16; MAX_STORED_INFLUENCES],
    pub bone_weights: [f32; MAX_STORED_INFLUENCES],
}

impl SkmVertex {
    /// Stored influences as `(bone id, weight)` pairs, clamped to the slot count.
    pub fn influences(&self) -> impl Iterator<Item = (u16, f32)> + '_ {
        let count = (self.weight_count as usize).min(MAX_STORED_INFLUENCES);
        self.bone_ids[..count]
            .iter()
            .copied()
            .zip(self.bone_weights[..count].iter().copied())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkmFace {
    pub material_index: u16,
    pub vertex_indices: [u16; 3],
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkmFile {
    pub header: SkmHeader,
    pub bones: Vec<SkmBone>,
    /// MDF paths relative to the asset root.
    pub materials: Vec<String>,
    pub vertices: Vec<SkmVertex>,
    pub faces: Vec<SkmFace>,
}
