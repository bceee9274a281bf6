// Particle field and camera motion for the page background.
//
// Pure math only; the wgpu side lives in `render`.

use glam::{Mat4, Vec3};
use rand::Rng;

pub const PARTICLE_COUNT: usize = 4000;
/// Edge length of the cube the particles are scattered in.
pub const PARTICLE_SPREAD: f32 = 15.0;

pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_BASE_Z: f32 = 3.0;
pub const CAMERA_BREATH_AMPLITUDE: f32 = 0.2;
pub const CAMERA_BREATH_RATE: f32 = 0.5;

pub const SPIN_RATE_Y: f32 = 0.05;
pub const SPIN_RATE_X: f32 = 0.02;
pub const POINTER_TILT: f32 = 0.1;

/// Scatter `count` points uniformly in an axis-aligned cube of side `spread`.
pub fn scatter_particles<R: Rng>(rng: &mut R, count: usize, spread: f32) -> Vec<[f32; 3]> {
    (0..count)
        .map(|_| {
            [
                (rng.gen::<f32>() - 0.5) * spread,
                (rng.gen::<f32>() - 0.5) * spread,
                (rng.gen::<f32>() - 0.5) * spread,
            ]
        })
        .collect()
}

/// Map a client-space pointer position to `[-0.5, 0.5]` on both axes.
pub fn pointer_offset(client_x: f32, client_y: f32, viewport_w: f32, viewport_h: f32) -> [f32; 2] {
    if viewport_w <= 0.0 || viewport_h <= 0.0 {
        return [0.0, 0.0];
    }
    [client_x / viewport_w - 0.5, client_y / viewport_h - 0.5]
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldPose {
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub camera_z: f32,
}

impl FieldPose {
    /// Constant spin, pointer tilt and a slow camera "breath".
    pub fn at(elapsed_sec: f32, pointer: [f32; 2]) -> Self {
        Self {
            rotation_y: elapsed_sec * SPIN_RATE_Y + pointer[0] * POINTER_TILT,
            rotation_x: elapsed_sec * SPIN_RATE_X + pointer[1] * POINTER_TILT,
            camera_z: CAMERA_BASE_Z
                + (elapsed_sec * CAMERA_BREATH_RATE).sin() * CAMERA_BREATH_AMPLITUDE,
        }
    }

    /// Euler XYZ order: X applied last in world space.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.rotation_x) * Mat4::from_rotation_y(self.rotation_y)
    }
}

/// Perspective camera on the Z axis looking toward -Z.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(aspect: f32, z: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, z),
            aspect,
            fovy_radians: CAMERA_FOV_DEGREES.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect.max(1e-4), self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.eye + Vec3::NEG_Z, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// `0xRRGGBB` to linear-ish RGBA floats with the given alpha.
pub fn hex_to_rgba(hex: u32, alpha: f32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        alpha,
    ]
}
