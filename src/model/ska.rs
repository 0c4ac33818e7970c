use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

pub const SKA_HEADER_SIZE: u64 = 24;
pub const SKA_BONE_SIZE: u64 = 100;
pub const SKA_STREAM_HEADER_SIZE: u64 = 16;
pub const SKA_ANIMATION_HEADER_SIZE: u64 = 64 + 1 + 1 + 2 + 4 + 2 + 2 + 10 * SKA_STREAM_HEADER_SIZE;
pub const SKA_EVENT_SIZE: u64 = 2 + 48 + 128;

pub const ANIMATION_NAME_LEN: usize = 64;
pub const EVENT_TYPE_LEN: usize = 48;
pub const EVENT_ACTION_LEN: usize = 128;
pub const MAX_STREAMS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkaHeader {
    pub bone_count: u32,
    pub bone_data_offset: u32,
    pub deprecated: [u32; 2],
    pub anim_count: u32,
    pub anim_data_offset: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkaBone {
    pub flags: i16,
    pub parent_bone: i16,
    pub name: String,
    pub scale: [f32; 3],
    /// Quaternion in on-disk `x, y, z, w` order.
    pub rotation: [f32; 4],
    pub position: [f32; 3],
}

impl SkaBone {
    pub fn transform(&self) -> BoneTransform {
        let [x, y, z, w] = self.rotation;
        BoneTransform {
            scale: glm::make_vec3(&self.scale),
            rotation: glm::quat(x, y, z, w),
            position: glm::make_vec3(&self.position),
        }
    }
}

/// Local-space pose of one bone in decomposed form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneTransform {
    pub scale: glm::Vec3,
    pub rotation: glm::Quat,
    pub position: glm::Vec3,
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self {
            scale: glm::vec3(1.0, 1.0, 1.0),
            rotation: glm::quat_identity(),
            position: glm::vec3(0.0, 0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriveType {
    Time,
    Distance,
    Rotation,
    Unknown(u8),
}

impl DriveType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Time,
            1 => Self::Distance,
            2 => Self::Rotation,
            other => Self::Unknown(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Time => "Time",
            Self::Distance => "Distance",
            Self::Rotation => "Rotation",
            Self::Unknown(_) => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamHeader {
    pub frame_count: i16,
    pub variation_id: i16,
    pub frame_rate: f32,
    pub drawing_rate: f32,
    pub data_offset: u32,
}

impl Default for StreamHeader {
    fn default() -> Self {
        Self {
            frame_count: 0,
            variation_id: -1,
            frame_rate: 30.0,
            drawing_rate: 0.0,
            data_offset: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationEvent {
    pub frame_id: i16,
    pub event_type: String,
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub drive_type: DriveType,
    pub loopable: bool,
    pub event_count: i16,
    /// Stored as read; events are located by position in the trailing event array.
    pub event_offset: u32,
    pub stream_count: i16,
    /// All ten on-disk stream slots; only the first `stream_count` are meaningful.
    pub streams: Vec<StreamHeader>,
    pub events: Vec<AnimationEvent>,
}

impl AnimationClip {
    pub fn active_streams(&self) -> &[StreamHeader] {
        let count = usize::try_from(self.stream_count).unwrap_or(0).min(self.streams.len());
        &self.streams[..count]
    }

    pub fn frame_count(&self) -> i32 {
        self.active_streams()
            .iter()
            .map(|s| s.frame_count as i32)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkaFile {
    pub header: SkaHeader,
    pub bones: Vec<SkaBone>,
    pub clips: Vec<AnimationClip>,
    pub transforms: Vec<BoneTransform>,
}

impl SkaFile {
    pub fn animation_names(&self) -> Vec<String> {
        self.clips.iter().map(|c| c.name.clone()).collect()
    }

    pub fn event_count(&self) -> usize {
        self.clips.iter().map(|c| c.events.len()).sum()
    }
}
