// Bone hierarchy traversal and skinning matrices

use super::interpolation::{affine_to_mat4, invert, trs_matrix};
use crate::error::{KEY_BAD_HIERARCHY, KEY_MALFORMED_RECORD, ModelError};
use crate::model::{BoneTransform, SkmBone};
use nalgebra_glm as glm;

/// Inverse bind matrices as stored in the mesh file, extended to 4x4.
pub fn inverse_bind_matrices(bones: &[SkmBone]) -> Vec<glm::Mat4> {
    bones.iter().map(|b| affine_to_mat4(&b.world_inverse)).collect()
}

/// Bind-pose world matrices: the numeric inverse of each stored inverse bind matrix.
pub fn bind_world_matrices(bones: &[SkmBone]) -> Result<Vec<glm::Mat4>, ModelError> {
    bones
        .iter()
        .enumerate()
        .map(|(i, bone)| {
            let world = invert(&affine_to_mat4(&bone.world_inverse)).ok_or_else(|| {
                ModelError::new(KEY_MALFORMED_RECORD)
                    .in_section("bones")
                    .with_arg("bone", &bone.name)
                    .with_arg("reason", "singular-inverse-bind")
            })?;
            log::debug!(
                "Bone {} '{}' parent {} bind world {:?}",
                i,
                bone.name,
                bone.parent_bone,
                world
            );
            Ok(world)
        })
        .collect()
}

/// Checks that every parent index points inside the bone array.
pub fn validate_parents(parents: &[i16]) -> Result<(), ModelError> {
    for (i, &parent) in parents.iter().enumerate() {
        if parent >= 0 && parent as usize >= parents.len() {
            return Err(ModelError::new(KEY_BAD_HIERARCHY)
                .with_arg("bone", i)
                .with_arg("parent", parent)
                .with_arg("bone_count", parents.len()));
        }
        if parent >= 0 && parent as usize == i {
            return Err(ModelError::new(KEY_BAD_HIERARCHY)
                .with_arg("bone", i)
                .with_arg("reason", "self-parent"));
        }
    }
    Ok(())
}

/// Parent indices in range and free of cycles.
pub fn validate_hierarchy(parents: &[i16]) -> Result<(), ModelError> {
    validate_parents(parents)?;
    for start in 0..parents.len() {
        let mut bone = start;
        let mut depth = 0;
        while let Ok(parent) = usize::try_from(parents[bone]) {
            depth += 1;
            if depth > parents.len() {
                return Err(ModelError::new(KEY_BAD_HIERARCHY)
                    .with_arg("bone", start)
                    .with_arg("reason", "cycle"));
            }
            bone = parent;
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq)]
enum Slot {
    Pending,
    Visiting,
    Ready,
}

/// World matrices for an animated pose: `world = parent_world * local` and
/// roots use their local matrix directly.
///
/// Parents are resolved on demand before their children, so array order does
/// not matter; a cycle is reported as `bad-hierarchy`.
pub fn animated_world_matrices(
    parents: &[i16],
    locals: &[BoneTransform],
) -> Result<Vec<glm::Mat4>, ModelError> {
    validate_parents(parents)?;
    if parents.len() != locals.len() {
        return Err(ModelError::new(KEY_BAD_HIERARCHY)
            .with_arg("parents", parents.len())
            .with_arg("locals", locals.len()));
    }

    let local_matrices: Vec<glm::Mat4> = locals.iter().map(trs_matrix).collect();
    let mut world = vec![glm::Mat4::identity(); parents.len()];
    let mut slots = vec![Slot::Pending; parents.len()];

    for bone in 0..parents.len() {
        calc_bone(bone, parents, &local_matrices, &mut world, &mut slots)?;
    }

    Ok(world)
}

fn calc_bone(
    bone: usize,
    parents: &[i16],
    locals: &[glm::Mat4],
    world: &mut [glm::Mat4],
    slots: &mut [Slot],
) -> Result<(), ModelError> {
    match slots[bone] {
        Slot::Ready => return Ok(()),
        Slot::Visiting => {
            return Err(ModelError::new(KEY_BAD_HIERARCHY)
                .with_arg("bone", bone)
                .with_arg("reason", "cycle"));
        }
        Slot::Pending => {}
    }

    slots[bone] = Slot::Visiting;
    world[bone] = match usize::try_from(parents[bone]) {
        Ok(parent) => {
            calc_bone(parent, parents, locals, world, slots)?;
            world[parent] * locals[bone]
        }
        Err(_) => locals[bone],
    };
    slots[bone] = Slot::Ready;
    Ok(())
}

/// Per-bone `animated_world * inverse_bind`.
pub fn skinning_matrices(animated_world: &[glm::Mat4], inverse_bind: &[glm::Mat4]) -> Vec<glm::Mat4> {
    animated_world
        .iter()
        .zip(inverse_bind.iter())
        .map(|(world, inverse)| world * inverse)
        .collect()
}

pub fn identity_matrices(count: usize) -> Vec<glm::Mat4> {
    vec![glm::Mat4::identity(); count]
}
