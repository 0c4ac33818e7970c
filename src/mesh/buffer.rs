use super::groups::MaterialGroup;
use crate::animation::{Influences, translation_of};
use crate::material::MaterialDescriptor;
use crate::model::SkmVertex;
use nalgebra_glm as glm;
use serde::Serialize;

/// Vertex layout handed to the renderer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
    pub bone_ids: [u32; 4],
    pub bone_weights: [f32; 4],
}

impl GpuVertex {
    pub fn new(vertex: &SkmVertex, influences: &Influences) -> Self {
        let [px, py, pz, _] = vertex.position;
        let [nx, ny, nz, _] = vertex.normal;
        Self {
            position: [px, py, pz],
            uv: vertex.uv,
            normal: [nx, ny, nz],
            bone_ids: influences.bone_ids,
            bone_weights: influences.weights,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DegradeReason {
    /// No companion animation file next to the mesh.
    MissingAnimation,
    /// The companion file exists but could not be read.
    AnimationLoadFailed,
    /// Companion skeleton does not match the mesh skeleton.
    BoneMismatch,
}

impl DegradeReason {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MissingAnimation => "missing animation",
            Self::AnimationLoadFailed => "animation failed to load",
            Self::BoneMismatch => "bone mismatch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PoseState {
    Animated,
    BindPoseOnly(DegradeReason),
}

/// Axis-aligned bounds of the vertex positions and the viewer scale derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    pub min: glm::Vec3,
    pub max: glm::Vec3,
    pub center: glm::Vec3,
    pub scale: f32,
}

impl Default for Framing {
    fn default() -> Self {
        Self {
            min: glm::Vec3::zeros(),
            max: glm::Vec3::zeros(),
            center: glm::Vec3::zeros(),
            scale: 1.0,
        }
    }
}

impl Framing {
    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a [f32; 3]>) -> Self {
        let mut min = glm::vec3(f32::MAX, f32::MAX, f32::MAX);
        let mut max = glm::vec3(-f32::MAX, -f32::MAX, -f32::MAX);
        let mut any = false;
        for p in positions {
            let p = glm::vec3(p[0], p[1], p[2]);
            min = glm::min2(&min, &p);
            max = glm::max2(&max, &p);
            any = true;
        }
        if !any {
            return Self::default();
        }

        let extent = glm::comp_min(&min).abs().max(glm::comp_max(&max));
        let scale = if extent > 0.0 && extent.is_finite() { 1.0 / extent } else { 1.0 };
        Self {
            min,
            max,
            center: (min + max) * 0.5,
            scale,
        }
    }

    pub fn model_matrix(&self) -> glm::Mat4 {
        glm::scaling(&glm::vec3(self.scale, self.scale, self.scale))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TextureFailure {
    pub path: String,
    pub error: String,
}

/// Fully resolved model, ready for upload by a graphics backend.
#[derive(Debug, Default)]
pub struct MeshBuffer {
    pub source_path: String,
    pub vertices: Vec<GpuVertex>,
    pub indices: Vec<u32>,
    pub groups: Vec<MaterialGroup>,

    pub bone_names: Vec<String>,
    pub bone_parents: Vec<i16>,
    pub inverse_bind_matrices: Vec<glm::Mat4>,
    pub bind_world_matrices: Vec<glm::Mat4>,
    /// Present only when a matching animation was loaded.
    pub animated_world_matrices: Option<Vec<glm::Mat4>>,
    pub skinning_matrices: Vec<glm::Mat4>,
    pub bind_pose_skinning_matrices: Vec<glm::Mat4>,

    pub material_paths: Vec<String>,
    /// Parallel to `material_paths`.
    pub materials: Vec<MaterialDescriptor>,
    /// Resolved texture paths in material order, without duplicates.
    /// Decoded images live in the session's texture cache.
    pub texture_paths: Vec<String>,
    pub texture_failures: Vec<TextureFailure>,

    pub animation_names: Vec<String>,
    pub pose: Option<PoseState>,
    pub framing: Framing,
}

impl MeshBuffer {
    pub fn is_animated(&self) -> bool {
        matches!(self.pose, Some(PoseState::Animated))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.pose, Some(PoseState::BindPoseOnly(_)))
    }

    pub fn degrade_reason(&self) -> Option<DegradeReason> {
        match self.pose {
            Some(PoseState::BindPoseOnly(reason)) => Some(reason),
            _ => None,
        }
    }

    /// World matrices of the pose being shown; bind pose when not animated.
    pub fn pose_world_matrices(&self) -> &[glm::Mat4] {
        self.animated_world_matrices
            .as_deref()
            .unwrap_or(self.bind_world_matrices.as_slice())
    }

    /// Bone origins for skeleton visualization.
    pub fn bone_positions(&self) -> Vec<glm::Vec3> {
        self.pose_world_matrices().iter().map(translation_of).collect()
    }

    /// Bone connections as `(parent, child)` position pairs.
    pub fn bone_segments(&self) -> Vec<(glm::Vec3, glm::Vec3)> {
        let positions = self.bone_positions();
        self.bone_parents
            .iter()
            .enumerate()
            .filter_map(|(child, &parent)| {
                let parent = usize::try_from(parent).ok()?;
                Some((*positions.get(parent)?, positions[child]))
            })
            .collect()
    }

    pub fn model_matrix(&self) -> glm::Mat4 {
        self.framing.model_matrix()
    }

    pub fn material_for(&self, group: &MaterialGroup) -> Option<&MaterialDescriptor> {
        self.materials.get(group.material_index as usize)
    }

    pub fn group_indices(&self, group: &MaterialGroup) -> &[u32] {
        &self.indices[group.range()]
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Skinning matrices flattened column-major, one 16-float block per bone.
    pub fn skinning_floats(&self) -> Vec<f32> {
        self.skinning_matrices
            .iter()
            .flat_map(|m| m.as_slice().iter().copied())
            .collect()
    }

    pub fn summary(&self) -> MeshSummary {
        MeshSummary {
            path: self.source_path.clone(),
            animated: self.is_animated(),
            degrade_reason: self.degrade_reason(),
            vertex_count: self.vertices.len(),
            index_count: self.indices.len(),
            bones: self
                .bone_names
                .iter()
                .zip(self.bone_parents.iter())
                .zip(self.bone_positions())
                .map(|((name, &parent), p)| BoneSummary {
                    name: name.clone(),
                    parent,
                    position: [p.x, p.y, p.z],
                })
                .collect(),
            materials: self.material_paths.clone(),
            groups: self.groups.clone(),
            animations: self.animation_names.clone(),
            textures: self.texture_paths.clone(),
            texture_failures: self.texture_failures.clone(),
            model_scale: self.framing.scale,
            model_center: [self.framing.center.x, self.framing.center.y, self.framing.center.z],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoneSummary {
    pub name: String,
    pub parent: i16,
    pub position: [f32; 3],
}

/// Serializable overview of a loaded model.
#[derive(Debug, Clone, Serialize)]
pub struct MeshSummary {
    pub path: String,
    pub animated: bool,
    pub degrade_reason: Option<DegradeReason>,
    pub vertex_count: usize,
    pub index_count: usize,
    pub bones: Vec<BoneSummary>,
    pub materials: Vec<String>,
    pub groups: Vec<MaterialGroup>,
    pub animations: Vec<String>,
    pub textures: Vec<String>,
    pub texture_failures: Vec<TextureFailure>,
    pub model_scale: f32,
    pub model_center: [f32; 3],
}
