use crate::model::SkmFace;
use serde::Serialize;
use std::collections::HashMap;

/// A run of the combined index buffer drawn with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaterialGroup {
    pub material_index: u16,
    /// First index in the combined index buffer.
    pub offset: u32,
    /// Number of indices (three per face).
    pub count: u32,
}

impl MaterialGroup {
    pub fn face_count(&self) -> u32 {
        self.count / 3
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset as usize..(self.offset + self.count) as usize
    }
}

/// Builds the combined index buffer with faces grouped by material.
///
/// Groups appear in order of each material's first face; faces keep their
/// relative order inside a group.
pub fn partition_faces(faces: &[SkmFace]) -> (Vec<u32>, Vec<MaterialGroup>) {
    let mut slots: HashMap<u16, usize> = HashMap::new();
    let mut runs: Vec<(u16, Vec<u32>)> = Vec::new();

    for face in faces {
        let slot = *slots.entry(face.material_index).or_insert_with(|| {
            runs.push((face.material_index, Vec::new()));
            runs.len() - 1
        });
        runs[slot]
            .1
            .extend(face.vertex_indices.iter().map(|&i| i as u32));
    }

    let mut indices = Vec::with_capacity(faces.len() * 3);
    let mut groups = Vec::with_capacity(runs.len());
    for (material_index, run) in runs {
        groups.push(MaterialGroup {
            material_index,
            offset: indices.len() as u32,
            count: run.len() as u32,
        });
        indices.extend(run);
    }

    (indices, groups)
}
