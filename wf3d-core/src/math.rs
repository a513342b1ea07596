//! Transformation matrices for the standard model/view/projection pipeline.
//!
//! All functions are pure and allocation-free, returning owned
//! [`nalgebra`] values. Composition follows the column-vector convention:
//! `projection * view * model` applies the model matrix first. The
//! elementwise operations (`*` for matrix products and matrix-vector
//! application, `dot`/`cross`/`norm`/`normalize` on vectors) come straight
//! from `nalgebra`; this module provides the constructors and the
//! normal-matrix math.

use nalgebra::{Matrix3, Matrix4, Vector3};

/// Uniform scale on x, y, z.
pub fn scale(s: f32) -> Matrix4<f32> {
    Matrix4::new(
        s, 0.0, 0.0, 0.0, //
        0.0, s, 0.0, 0.0, //
        0.0, 0.0, s, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Translation by `(tx, ty, tz)`.
pub fn translate(tx: f32, ty: f32, tz: f32) -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, tx, //
        0.0, 1.0, 0.0, ty, //
        0.0, 0.0, 1.0, tz, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Right-handed rotation of `theta` radians about the x axis.
pub fn rotate_x(theta: f32) -> Matrix4<f32> {
    let (sin, cos) = theta.sin_cos();
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0, //
        0.0, cos, -sin, 0.0, //
        0.0, sin, cos, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Right-handed rotation of `theta` radians about the y axis.
pub fn rotate_y(theta: f32) -> Matrix4<f32> {
    let (sin, cos) = theta.sin_cos();
    Matrix4::new(
        cos, 0.0, sin, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        -sin, 0.0, cos, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Right-handed rotation of `theta` radians about the z axis.
pub fn rotate_z(theta: f32) -> Matrix4<f32> {
    let (sin, cos) = theta.sin_cos();
    Matrix4::new(
        cos, -sin, 0.0, 0.0, //
        sin, cos, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Right-handed view matrix: maps world space to eye space with `eye` at the
/// origin looking toward `target`.
///
/// `target` must differ from `eye` and `up` must not be parallel to the view
/// direction; degenerate input propagates Inf/NaN into the result.
pub fn look_at(eye: &Vector3<f32>, target: &Vector3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
    let forward = (target - eye).normalize();
    let right = forward.cross(up).normalize();
    let true_up = right.cross(&forward);

    Matrix4::new(
        right.x,
        right.y,
        right.z,
        -right.dot(eye),
        true_up.x,
        true_up.y,
        true_up.z,
        -true_up.dot(eye),
        -forward.x,
        -forward.y,
        -forward.z,
        forward.dot(eye),
        0.0,
        0.0,
        0.0,
        1.0,
    )
}

/// Unit direction vector for the given yaw and pitch (radians).
///
/// Scaling the result by a distance gives an orbiting eye position around
/// the origin.
pub fn euler_direction(yaw: f32, pitch: f32) -> Vector3<f32> {
    Vector3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
}

/// Standard symmetric perspective projection.
///
/// Maps view-space z in `[-z_near, -z_far]` to clip-space `[-1, 1]`.
/// `z_near` must be positive and distinct from `z_far`.
pub fn perspective(fovy: f32, aspect: f32, z_near: f32, z_far: f32) -> Matrix4<f32> {
    let s = 1.0 / (fovy / 2.0).tan();
    Matrix4::new(
        s / aspect,
        0.0,
        0.0,
        0.0,
        0.0,
        s,
        0.0,
        0.0,
        0.0,
        0.0,
        -(z_far + z_near) / (z_far - z_near),
        -(2.0 * z_far * z_near) / (z_far - z_near),
        0.0,
        0.0,
        -1.0,
        0.0,
    )
}

/// Upper-left 3x3 block of a 4x4 matrix (drops translation and the
/// perspective row).
pub fn mat4_to_mat3(m: &Matrix4<f32>) -> Matrix3<f32> {
    m.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Inverse of a 3x3 matrix, transposed, via the cofactor method.
///
/// A singular input divides by a zero determinant; the NaN/Inf values this
/// produces propagate into the result rather than raising an error.
pub fn inverse_transpose(m: &Matrix3<f32>) -> Matrix3<f32> {
    let det = m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)]);

    // Cofactor matrix over the determinant: adjugate-based inverse without
    // the final transpose, which is exactly the inverse-transpose.
    Matrix3::new(
        m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)],
        -(m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)]),
        m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)],
        -(m[(0, 1)] * m[(2, 2)] - m[(0, 2)] * m[(2, 1)]),
        m[(0, 0)] * m[(2, 2)] - m[(0, 2)] * m[(2, 0)],
        -(m[(0, 0)] * m[(2, 1)] - m[(0, 1)] * m[(2, 0)]),
        m[(0, 1)] * m[(1, 2)] - m[(0, 2)] * m[(1, 1)],
        -(m[(0, 0)] * m[(1, 2)] - m[(0, 2)] * m[(1, 0)]),
        m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)],
    ) / det
}

/// Normal matrix for a model-view transform: the inverse-transpose of its
/// upper-left 3x3 block. Transforms surface normals correctly under
/// non-uniform scale.
pub fn normal_matrix(model_view: &Matrix4<f32>) -> Matrix3<f32> {
    inverse_transpose(&mat4_to_mat3(model_view))
}

/// Create a model-view-projection matrix.
pub fn mvp(
    model: &Matrix4<f32>,
    view: &Matrix4<f32>,
    projection: &Matrix4<f32>,
) -> Matrix4<f32> {
    projection * view * model
}
