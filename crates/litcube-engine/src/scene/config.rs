use std::time::Duration;

use glam::Vec3;

use crate::paint::Color;

/// Fixed scene parameters.
///
/// Defaults reproduce the classic lighting sample: a 2-unit box spinning
/// about (1, 0, 1) at 30 degrees per second, seen from six units back.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Nominal period of the frame timer.
    pub frame_interval: Duration,

    /// Edge length of the box.
    pub box_size: f32,

    /// Clear color for the color attachment.
    pub clear_color: Color,

    /// Rotation speed in degrees per second of wall-clock time.
    pub degrees_per_second: f64,

    /// Rotation axis (normalized on use).
    pub rotation_axis: Vec3,

    /// Direction towards the light (normalized in the shader).
    pub light_dir: Vec3,

    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,

    /// Vertical field of view, in degrees.
    pub fov_y_degrees: f32,

    /// Projection aspect ratio. Fixed; it does not follow the window size.
    pub aspect: f32,

    pub z_near: f32,
    pub z_far: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(10),
            box_size: 2.0,
            clear_color: Color::from_rgb(0.914, 0.914, 0.914),
            degrees_per_second: 30.0,
            rotation_axis: Vec3::new(1.0, 0.0, 1.0),
            light_dir: Vec3::new(0.0, 1.0, 1.0),
            eye: Vec3::new(0.0, 0.0, 6.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees: 45.0,
            aspect: 640.0 / 480.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}
