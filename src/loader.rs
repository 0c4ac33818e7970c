// Skeletal mesh load pipeline.
//
// Mesh, skeleton and face problems fail the load. A missing or mismatched
// animation degrades to the bind pose, a missing material falls back to a
// default descriptor, and texture failures follow `LoaderSettings::missing_texture`.

use crate::animation::{
    animated_world_matrices, bind_world_matrices, identity_matrices, inverse_bind_matrices,
    select_influences, skinning_matrices, validate_hierarchy,
};
use crate::error::{KEY_MALFORMED_RECORD, ModelError};
use crate::material::{MaterialDescriptor, parse_mdf};
use crate::mesh::{
    DegradeReason, Framing, GpuVertex, MeshBuffer, PoseState, TextureFailure, partition_faces,
};
use crate::model::{
    MAX_STORED_INFLUENCES, SkaBone, SkaFile, SkmBone, SkmFile, companion_animation_path,
    discover_root,
};
use crate::parser::{load_ska, load_skm};
use crate::settings::{LoaderSettings, TexturePolicy};
use crate::texture::TextureCache;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Loads a mesh, its companion animation, materials and textures.
///
/// Decoded textures are added to `textures`; images already present are reused.
pub fn load_model(
    path: &str,
    settings: &LoaderSettings,
    textures: &mut TextureCache,
) -> Result<MeshBuffer, ModelError> {
    let skm = load_skm(path)?;

    let parents: Vec<i16> = skm.bones.iter().map(|b| b.parent_bone).collect();
    validate_hierarchy(&parents).map_err(|e| e.with_arg("path", path))?;
    let inverse_bind = inverse_bind_matrices(&skm.bones);
    let bind_world = bind_world_matrices(&skm.bones).map_err(|e| e.with_arg("path", path))?;
    validate_faces(&skm).map_err(|e| e.with_arg("path", path))?;

    let (animation, pose) = match load_animation(path, settings, &skm.bones) {
        Ok(ska) => (Some(ska), PoseState::Animated),
        Err((ska, reason)) => (ska, PoseState::BindPoseOnly(reason)),
    };

    let mut buffer = MeshBuffer {
        source_path: path.to_string(),
        bone_names: skm.bones.iter().map(|b| b.name.clone()).collect(),
        bone_parents: parents,
        bind_pose_skinning_matrices: identity_matrices(skm.bones.len()),
        animation_names: animation.as_ref().map(SkaFile::animation_names).unwrap_or_default(),
        pose: Some(pose),
        ..MeshBuffer::default()
    };

    match (&pose, &animation) {
        (PoseState::Animated, Some(ska)) => {
            let animated = animated_world_matrices(&buffer.bone_parents, &ska.transforms)
                .map_err(|e| e.with_arg("path", path))?;
            buffer.skinning_matrices = skinning_matrices(&animated, &inverse_bind);
            buffer.animated_world_matrices = Some(animated);
        }
        _ => buffer.skinning_matrices = identity_matrices(skm.bones.len()),
    }
    buffer.inverse_bind_matrices = inverse_bind;
    buffer.bind_world_matrices = bind_world;

    buffer.vertices = build_vertices(&skm, settings.influence_limit());
    let (indices, groups) = partition_faces(&skm.faces);
    buffer.indices = indices;
    buffer.groups = groups;
    buffer.framing = Framing::from_positions(buffer.vertices.iter().map(|v| &v.position));

    let root = asset_root(path, settings);
    buffer.material_paths = skm.materials.clone();
    buffer.materials = load_materials(&root, &skm.materials);

    if settings.load_textures {
        load_textures(&mut buffer, settings.missing_texture, textures)?;
    }

    log::info!(
        "Loaded '{}': {} bones, {} vertices, {} faces, {} materials, {} groups, {} ({} clips)",
        path,
        buffer.bone_names.len(),
        buffer.vertices.len(),
        skm.faces.len(),
        buffer.materials.len(),
        buffer.groups.len(),
        match pose {
            PoseState::Animated => "animated",
            PoseState::BindPoseOnly(reason) => reason.name(),
        },
        buffer.animation_names.len()
    );

    Ok(buffer)
}

fn validate_faces(skm: &SkmFile) -> Result<(), ModelError> {
    let vertex_count = skm.vertices.len();
    let material_count = skm.materials.len();

    for (i, face) in skm.faces.iter().enumerate() {
        if face.material_index as usize >= material_count {
            return Err(ModelError::new(KEY_MALFORMED_RECORD)
                .in_section("faces")
                .with_arg("index", i)
                .with_arg("material", face.material_index)
                .with_arg("material_count", material_count));
        }
        if let Some(&bad) = face
            .vertex_indices
            .iter()
            .find(|&&v| v as usize >= vertex_count)
        {
            return Err(ModelError::new(KEY_MALFORMED_RECORD)
                .in_section("faces")
                .with_arg("index", i)
                .with_arg("vertex", bad)
                .with_arg("vertex_count", vertex_count));
        }
    }
    Ok(())
}

/// Loads the companion animation. On failure the parsed file is still handed
/// back when it was readable, so clip names stay available.
fn load_animation(
    mesh_path: &str,
    settings: &LoaderSettings,
    bones: &[SkmBone],
) -> Result<SkaFile, (Option<SkaFile>, DegradeReason)> {
    let ska_path = match companion_animation_path(mesh_path, settings.animation_extension_char) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("No animation for '{}': {}", mesh_path, e);
            return Err((None, DegradeReason::MissingAnimation));
        }
    };

    if !Path::new(&ska_path).exists() {
        log::warn!("Animation file '{}' not found, showing bind pose", ska_path);
        return Err((None, DegradeReason::MissingAnimation));
    }

    let ska = match load_ska(&ska_path) {
        Ok(ska) => ska,
        Err(e) => {
            log::error!("Failed to load animation '{}': {}", ska_path, e);
            return Err((None, DegradeReason::AnimationLoadFailed));
        }
    };

    if let Some(reason) = skeleton_mismatch(bones, &ska.bones) {
        log::warn!("Bind pose only for '{}': bone mismatch ({})", mesh_path, reason);
        return Err((Some(ska), DegradeReason::BoneMismatch));
    }

    Ok(ska)
}

/// Describes the first difference between mesh and animation skeletons.
pub fn skeleton_mismatch(mesh: &[SkmBone], animation: &[SkaBone]) -> Option<String> {
    if mesh.len() != animation.len() {
        return Some(format!("{} mesh bones, {} animation bones", mesh.len(), animation.len()));
    }
    mesh.iter()
        .zip(animation)
        .enumerate()
        .find(|(_, (m, a))| !m.name.eq_ignore_ascii_case(&a.name))
        .map(|(i, (m, a))| format!("bone {i} is '{}' in mesh, '{}' in animation", m.name, a.name))
}

fn build_vertices(skm: &SkmFile, limit: usize) -> Vec<GpuVertex> {
    let bone_name = |id: u16| {
        skm.bones
            .get(id as usize)
            .map_or("<out of range>", |b| b.name.as_str())
    };

    skm.vertices
        .iter()
        .enumerate()
        .map(|(i, vertex)| {
            if vertex.weight_count as usize > MAX_STORED_INFLUENCES {
                log::warn!(
                    "Vertex {} declares {} influences, clamped to {}",
                    i,
                    vertex.weight_count,
                    MAX_STORED_INFLUENCES
                );
            }

            let pairs: Vec<(u16, f32)> = vertex
                .influences()
                .map(|(id, weight)| {
                    if (id as usize) < skm.bones.len() {
                        return (id, weight);
                    }
                    log::warn!(
                        "Vertex {} references bone {} of {}, influence zeroed",
                        i,
                        id,
                        skm.bones.len()
                    );
                    (0, 0.0)
                })
                .collect();
            let selection = select_influences(&pairs, limit);
            if !selection.dropped.is_empty() {
                let names: Vec<String> = selection
                    .dropped
                    .iter()
                    .map(|&id| format!("{id} '{}'", bone_name(id)))
                    .collect();
                log::warn!(
                    "Vertex {} has {} influences, dropped bones [{}] and renormalized",
                    i,
                    pairs.len(),
                    names.join(", ")
                );
            }
            if selection.zero_sum {
                log::error!("Vertex {} kept influences sum to zero, weights left as stored", i);
            }

            GpuVertex::new(vertex, &selection.influences)
        })
        .collect()
}

fn asset_root(mesh_path: &str, settings: &LoaderSettings) -> String {
    if let Some(root) = &settings.data_root {
        return root.clone();
    }
    match discover_root(mesh_path, &settings.root_marker) {
        Ok(root) => root,
        Err(e) => {
            log::warn!("Asset root not found, material paths used as given: {}", e);
            String::new()
        }
    }
}

/// Parses each distinct material once; the result is parallel to `references`.
fn load_materials(root: &str, references: &[String]) -> Vec<MaterialDescriptor> {
    let mut parsed: HashMap<&str, MaterialDescriptor> = HashMap::new();

    references
        .iter()
        .map(|reference| {
            parsed
                .entry(reference.as_str())
                .or_insert_with(|| match parse_mdf(root, reference) {
                    Ok(material) => material,
                    Err(e) => {
                        log::warn!("Material '{}' unavailable, using defaults: {}", reference, e);
                        MaterialDescriptor::default()
                    }
                })
                .clone()
        })
        .collect()
}

fn load_textures(
    buffer: &mut MeshBuffer,
    policy: TexturePolicy,
    cache: &mut TextureCache,
) -> Result<(), ModelError> {
    let mut seen: HashSet<String> = HashSet::new();

    for (index, material) in buffer.materials.iter().enumerate() {
        // The gloss map, when present, is the last path and never fails the load.
        let paths: Vec<&str> = material.texture_paths().collect();
        let required = paths.len() - usize::from(material.gloss_map.is_some());

        for (slot, path) in paths.into_iter().enumerate() {
            if !seen.insert(path.to_string()) {
                continue;
            }
            buffer.texture_paths.push(path.to_string());

            let Err(e) = cache.get_or_load(path) else {
                continue;
            };
            let failure = TextureFailure {
                path: path.to_string(),
                error: e.to_string(),
            };

            if slot >= required {
                log::warn!("Gloss map '{}' unavailable: {}", path, e);
            } else if policy == TexturePolicy::Abort {
                log::error!("Texture '{}' failed to load: {}", path, e);
                return Err(ModelError::from(e)
                    .with_arg("texture", path)
                    .with_arg("material", &buffer.material_paths[index]));
            } else {
                log::error!("Texture '{}' failed to load, using placeholder: {}", path, e);
                cache.insert_placeholder(path);
            }
            buffer.texture_failures.push(failure);
        }
    }
    Ok(())
}
