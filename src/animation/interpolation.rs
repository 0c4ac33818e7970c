// Matrix helpers for bone transforms

use crate::model::BoneTransform;
use nalgebra_glm as glm;

/// Extends a row-major 3x4 affine matrix to 4x4.
pub fn affine_to_mat4(rows: &[[f32; 4]; 3]) -> glm::Mat4 {
    let [r0, r1, r2] = rows;
    glm::Mat4::new(
        r0[0], r0[1], r0[2], r0[3], //
        r1[0], r1[1], r1[2], r1[3], //
        r2[0], r2[1], r2[2], r2[3], //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Drops the projective row of a 4x4 matrix.
pub fn mat4_to_affine(m: &glm::Mat4) -> [[f32; 4]; 3] {
    let mut rows = [[0.0f32; 4]; 3];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, v) in row.iter_mut().enumerate() {
            *v = m[(r, c)];
        }
    }
    rows
}

/// Local bone matrix: translation * rotation * scale.
pub fn trs_matrix(transform: &BoneTransform) -> glm::Mat4 {
    let rotation = glm::quat_to_mat4(&glm::quat_normalize(&transform.rotation));
    glm::translation(&transform.position) * rotation * glm::scaling(&transform.scale)
}

/// General 4x4 inverse; `None` when the matrix is singular.
pub fn invert(m: &glm::Mat4) -> Option<glm::Mat4> {
    m.try_inverse()
}

pub fn translation_of(m: &glm::Mat4) -> glm::Vec3 {
    glm::vec3(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}

pub fn approx_eq(a: &glm::Mat4, b: &glm::Mat4, epsilon: f32) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= epsilon)
}
