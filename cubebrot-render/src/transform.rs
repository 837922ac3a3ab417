use glam::{Mat2, Mat4, Vec3};

/// Vertical field of view of the cube camera.
const FOV_Y_DEGREES: f32 = 45.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;
/// Distance from the camera to the cube's centre.
const CAMERA_DISTANCE: f32 = 4.0;

/// Accumulates the cube's rotation angle.
///
/// While running, the angle grows at `rate` radians per second of frame
/// time; pausing freezes it at its last value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationClock {
    angle: f32,
    rate: f32,
    paused: bool,
}

impl RotationClock {
    pub const DEFAULT_RATE: f32 = 0.4;

    pub fn new(rate: f32) -> Self {
        Self {
            angle: 0.0,
            rate,
            paused: false,
        }
    }

    pub fn advance(&mut self, dt: f64) -> f32 {
        if !self.paused && dt.is_finite() && dt > 0.0 {
            self.angle = (self.angle + self.rate * dt as f32) % std::f32::consts::TAU;
        }
        self.angle
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

impl Default for RotationClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RATE)
    }
}

/// Tumbling rotation of the cube about a fixed tilted axis.
pub fn model_matrix(angle: f32) -> Mat4 {
    let axis = Vec3::new(0.5, 1.0, 0.25).normalize();
    Mat4::from_axis_angle(axis, angle)
}

pub fn view_matrix() -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.0, -CAMERA_DISTANCE))
}

pub fn projection_matrix(aspect_ratio: f32) -> Mat4 {
    Mat4::perspective_rh_gl(FOV_Y_DEGREES.to_radians(), aspect_ratio, Z_NEAR, Z_FAR)
}

/// Combined projection × view × model for the cube.
pub fn model_view_projection(angle: f32, aspect_ratio: f32) -> Mat4 {
    projection_matrix(aspect_ratio) * view_matrix() * model_matrix(angle)
}

/// Decorative 2×2 rotation the fragment shader applies to face coordinates.
pub fn effect_rotation(time: f64, rate: f32) -> Mat2 {
    let angle = ((time * rate as f64) % std::f64::consts::TAU) as f32;
    Mat2::from_angle(angle)
}
