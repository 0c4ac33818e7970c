use crate::error::ModelError;
use crate::model::{
    ANIMATION_NAME_LEN, AnimationClip, AnimationEvent, BONE_NAME_LEN, DriveType, EVENT_ACTION_LEN,
    EVENT_TYPE_LEN, MAX_STREAMS, SKA_ANIMATION_HEADER_SIZE, SKA_EVENT_SIZE, SkaBone, SkaFile, SkaHeader,
    StreamHeader,
};
use crate::parser::records::{read_f32_array, read_fixed_string, read_records};
use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{BufReader, Read, Seek};

/// Opens and parses a skeletal animation file.
pub fn load_ska(path: &str) -> Result<SkaFile, ModelError> {
    let file = File::open(path).map_err(|e| ModelError::file_open(path, e))?;
    read_ska(&mut BufReader::new(file)).map_err(|e| e.with_arg("path", path))
}

pub fn read_ska<R: Read + Seek>(file: &mut R) -> Result<SkaFile, ModelError> {
    let header = read_header(file).map_err(|e| e.in_section("header"))?;

    let bones = read_records(
        file,
        header.bone_data_offset as u64,
        header.bone_count,
        "bones",
        read_bone,
    )?;

    let mut clips = read_records(
        file,
        header.anim_data_offset as u64,
        header.anim_count,
        "animations",
        read_animation_header,
    )?;

    // Events trail the clip headers; each clip owns the next `event_count` of them.
    let mut event_pos =
        header.anim_data_offset as u64 + clips.len() as u64 * SKA_ANIMATION_HEADER_SIZE;
    for clip in clips.iter_mut() {
        let count = match u32::try_from(clip.event_count) {
            Ok(0) => continue,
            Ok(count) => count,
            Err(_) => {
                log::warn!(
                    "[SKA] Animation '{}' declares {} events, ignoring",
                    clip.name,
                    clip.event_count
                );
                continue;
            }
        };
        match read_records(file, event_pos, count, "events", read_event) {
            Ok(events) => clip.events = events,
            Err(e) => log::warn!("[SKA] Events of animation '{}' unreadable: {}", clip.name, e),
        }
        event_pos += count as u64 * SKA_EVENT_SIZE;
    }

    let transforms = bones.iter().map(SkaBone::transform).collect();

    let ska = SkaFile {
        header,
        bones,
        clips,
        transforms,
    };

    log::debug!(
        "SKA: {} bones, {} animations, {} events",
        ska.bones.len(),
        ska.clips.len(),
        ska.event_count()
    );

    Ok(ska)
}

fn read_header<R: Read>(file: &mut R) -> Result<SkaHeader, ModelError> {
    Ok(SkaHeader {
        bone_count: file.read_u32::<LittleEndian>()?,
        bone_data_offset: file.read_u32::<LittleEndian>()?,
        deprecated: [
            file.read_u32::<LittleEndian>()?,
            file.read_u32::<LittleEndian>()?,
        ],
        anim_count: file.read_u32::<LittleEndian>()?,
        anim_data_offset: file.read_u32::<LittleEndian>()?,
    })
}

fn read_bone<R: Read>(file: &mut R) -> Result<SkaBone, ModelError> {
    let flags = file.read_i16::<LittleEndian>()?;
    let parent_bone = file.read_i16::<LittleEndian>()?;
    let name = read_fixed_string(file, BONE_NAME_LEN)?;
    let scale = read_f32_array::<_, 3>(file)?;
    let _padding = file.read_u32::<LittleEndian>()?;
    let rotation = read_f32_array::<_, 4>(file)?;
    let position = read_f32_array::<_, 3>(file)?;
    let _padding = file.read_u32::<LittleEndian>()?;

    Ok(SkaBone {
        flags,
        parent_bone,
        name,
        scale,
        rotation,
        position,
    })
}

fn read_stream_header<R: Read>(file: &mut R) -> Result<StreamHeader, ModelError> {
    Ok(StreamHeader {
        frame_count: file.read_i16::<LittleEndian>()?,
        variation_id: file.read_i16::<LittleEndian>()?,
        frame_rate: file.read_f32::<LittleEndian>()?,
        drawing_rate: file.read_f32::<LittleEndian>()?,
        data_offset: file.read_u32::<LittleEndian>()?,
    })
}

fn read_animation_header<R: Read>(file: &mut R) -> Result<AnimationClip, ModelError> {
    let name = read_fixed_string(file, ANIMATION_NAME_LEN)?;
    let drive_type = DriveType::from_u8(file.read_u8()?);
    let loopable = file.read_u8()? != 0;
    let event_count = file.read_i16::<LittleEndian>()?;
    let event_offset = file.read_u32::<LittleEndian>()?;
    let stream_count = file.read_i16::<LittleEndian>()?;
    let _padding = file.read_u16::<LittleEndian>()?;

    let mut streams = Vec::with_capacity(MAX_STREAMS);
    for _ in 0..MAX_STREAMS {
        streams.push(read_stream_header(file)?);
    }

    if stream_count < 0 || stream_count as usize > MAX_STREAMS {
        log::warn!(
            "[SKA] Animation '{}' declares {} streams, only {} slots exist",
            name,
            stream_count,
            MAX_STREAMS
        );
    }

    Ok(AnimationClip {
        name,
        drive_type,
        loopable,
        event_count,
        event_offset,
        stream_count,
        streams,
        events: Vec::new(),
    })
}

fn read_event<R: Read>(file: &mut R) -> Result<AnimationEvent, ModelError> {
    Ok(AnimationEvent {
        frame_id: file.read_i16::<LittleEndian>()?,
        event_type: read_fixed_string(file, EVENT_TYPE_LEN)?,
        action: read_fixed_string(file, EVENT_ACTION_LEN)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::{SKA_BONE_SIZE, SKA_HEADER_SIZE};
    use std::io::Cursor;

    fn put_name(out: &mut Vec<u8>, name: &str, len: usize) {
        let mut bytes = name.as_bytes().to_vec();
        bytes.resize(len, 0);
        out.extend_from_slice(&bytes);
    }

    fn put_f32s(out: &mut Vec<u8>, values: &[f32]) {
        for v in values {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    /// One bone, two clips; the second clip owns a single event.
    fn sample() -> Vec<u8> {
        let bone_offset = SKA_HEADER_SIZE as u32;
        let anim_offset = bone_offset + SKA_BONE_SIZE as u32;
        let mut out = Vec::new();
        for v in [1u32, bone_offset, 0, 0, 2, anim_offset] {
            out.extend_from_slice(&v.to_le_bytes());
        }

        out.extend_from_slice(&0i16.to_le_bytes());
        out.extend_from_slice(&(-1i16).to_le_bytes());
        put_name(&mut out, "Bip01", 48);
        put_f32s(&mut out, &[1.0, 1.0, 1.0]);
        out.extend_from_slice(&0u32.to_le_bytes());
        put_f32s(&mut out, &[0.0, 0.0, 0.0, 1.0]);
        put_f32s(&mut out, &[0.0, 3.0, 0.0]);
        out.extend_from_slice(&0u32.to_le_bytes());

        for (name, events) in [("unarmed_unarmed_idle", 0i16), ("unarmed_unarmed_walk", 1)] {
            put_name(&mut out, name, 64);
            out.push(1);
            out.push(1);
            out.extend_from_slice(&events.to_le_bytes());
            out.extend_from_slice(&0u32.to_le_bytes());
            out.extend_from_slice(&1i16.to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes());
            for s in 0..MAX_STREAMS {
                let frames: i16 = if s == 0 { 24 } else { 0 };
                out.extend_from_slice(&frames.to_le_bytes());
                out.extend_from_slice(&(-1i16).to_le_bytes());
                put_f32s(&mut out, &[30.0, 0.0]);
                out.extend_from_slice(&0u32.to_le_bytes());
            }
        }

        out.extend_from_slice(&12i16.to_le_bytes());
        put_name(&mut out, "script", 48);
        put_name(&mut out, "game.sound(4016)", 128);
        assert_eq!(
            out.len() as u64,
            SKA_HEADER_SIZE + SKA_BONE_SIZE + 2 * SKA_ANIMATION_HEADER_SIZE + SKA_EVENT_SIZE
        );
        out
    }

    #[test]
    fn parses_bones_clips_and_events() {
        let ska = read_ska(&mut Cursor::new(sample())).unwrap();
        assert_eq!(ska.bones.len(), 1);
        assert_eq!(ska.transforms.len(), 1);
        assert_eq!(ska.transforms[0].position.y, 3.0);
        assert_eq!(ska.transforms[0].rotation.w, 1.0);

        assert_eq!(
            ska.animation_names(),
            vec!["unarmed_unarmed_idle".to_string(), "unarmed_unarmed_walk".to_string()]
        );
        assert!(ska.clips[0].events.is_empty());
        assert_eq!(ska.clips[1].events.len(), 1);
        assert_eq!(ska.clips[1].events[0].frame_id, 12);
        assert_eq!(ska.clips[1].events[0].event_type, "script");
        assert_eq!(ska.clips[1].events[0].action, "game.sound(4016)");
        assert_eq!(ska.clips[1].frame_count(), 24);
        assert!(ska.clips[1].loopable);
        assert_eq!(ska.event_count(), 1);
    }

    #[test]
    fn short_header_is_reported() {
        let err = read_ska(&mut Cursor::new(vec![0u8; 20])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedRead);
    }

    #[test]
    fn unreadable_events_keep_the_skeleton() {
        let mut data = sample();
        data.truncate(data.len() - 10);
        let ska = read_ska(&mut Cursor::new(data)).unwrap();
        assert_eq!(ska.bones.len(), 1);
        assert_eq!(ska.clips.len(), 2);
        assert_eq!(ska.event_count(), 0);
    }

    #[test]
    fn events_are_handed_out_in_clip_order() {
        let mut data = sample();
        let first_clip = (SKA_HEADER_SIZE + SKA_BONE_SIZE) as usize;
        // first clip: 1 event, second clip: 0 events
        data[first_clip + 66..first_clip + 68].copy_from_slice(&1i16.to_le_bytes());
        let second_clip = first_clip + SKA_ANIMATION_HEADER_SIZE as usize;
        data[second_clip + 66..second_clip + 68].copy_from_slice(&0i16.to_le_bytes());

        let ska = read_ska(&mut Cursor::new(data)).unwrap();
        assert_eq!(ska.clips[0].events.len(), 1);
        assert_eq!(ska.clips[0].events[0].action, "game.sound(4016)");
        assert!(ska.clips[1].events.is_empty());
    }
}
