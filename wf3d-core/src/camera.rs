//! Orbit camera: yaw/pitch/distance around a target point.

use nalgebra::{Matrix4, Vector3};

use crate::math;

/// Camera orbiting a target, with a symmetric perspective projection.
///
/// The eye position is derived from yaw/pitch through
/// [`math::euler_direction`], scaled by `distance` from the target.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    /// Horizontal orbit angle in radians.
    pub yaw: f32,
    /// Vertical orbit angle in radians.
    pub pitch: f32,
    /// Distance from the target.
    pub distance: f32,
    /// Point the camera looks at.
    pub target: Vector3<f32>,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

/// Field-of-view bounds applied by [`OrbitCamera::zoom`].
const FOV_MIN: f32 = std::f32::consts::PI / 32.0;
const FOV_MAX: f32 = std::f32::consts::PI / 4.0;

impl OrbitCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 5.0,
            target: Vector3::zeros(),
            fov: FOV_MAX,
            aspect: width as f32 / height as f32,
            z_near: 0.1,
            z_far: 100.0,
        }
    }

    /// Current eye position in world space.
    pub fn eye(&self) -> Vector3<f32> {
        self.target + math::euler_direction(self.yaw, self.pitch) * self.distance
    }

    /// World-to-eye view matrix.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        math::look_at(&self.eye(), &self.target, &Vector3::y())
    }

    /// Eye-to-clip projection matrix.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        math::perspective(self.fov, self.aspect, self.z_near, self.z_far)
    }

    /// Rotate the eye around the target.
    pub fn orbit(&mut self, dyaw: f32, dpitch: f32) {
        self.yaw += dyaw;
        self.pitch += dpitch;
    }

    /// Move the eye toward or away from the target.
    pub fn dolly(&mut self, ddistance: f32) {
        self.distance += ddistance;
    }

    /// Narrow or widen the field of view, clamped to [pi/32, pi/4].
    pub fn zoom(&mut self, dfov: f32) {
        self.fov = (self.fov + dfov).clamp(FOV_MIN, FOV_MAX);
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
