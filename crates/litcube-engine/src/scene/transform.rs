use glam::Mat4;

use super::SceneConfig;

/// World, view, and projection matrices for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneTransforms {
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl SceneTransforms {
    /// Builds the frame transforms for a rotation of `angle_degrees`.
    ///
    /// Projection uses wgpu's clip-space depth range (0..1).
    pub fn new(config: &SceneConfig, angle_degrees: f64) -> Self {
        // Whole turns do not change the matrix; folding them keeps f32 precision
        // stable however long the demo has been running.
        let angle = angle_degrees.rem_euclid(360.0) as f32;
        let axis = config.rotation_axis.normalize_or(glam::Vec3::Y);

        let world = Mat4::IDENTITY * Mat4::from_axis_angle(axis, angle.to_radians());
        let view = Mat4::look_at_rh(config.eye, config.target, config.up);
        let projection = Mat4::perspective_rh(
            config.fov_y_degrees.to_radians(),
            config.aspect,
            config.z_near,
            config.z_far,
        );

        Self {
            world,
            view,
            projection,
        }
    }

    /// Projection × view × world.
    pub fn world_view_projection(&self) -> Mat4 {
        self.projection * self.view * self.world
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};

    use super::*;

    #[test]
    fn zero_angle_world_is_identity() {
        let t = SceneTransforms::new(&SceneConfig::default(), 0.0);
        assert_eq!(t.world, Mat4::IDENTITY);
    }

    #[test]
    fn composed_matrix_is_reproducible_bit_for_bit() {
        let config = SceneConfig::default();
        let a = SceneTransforms::new(&config, 0.0).world_view_projection();
        let b = SceneTransforms::new(&config, 0.0).world_view_projection();

        let bits = |m: Mat4| m.to_cols_array().map(f32::to_bits);
        assert_eq!(bits(a), bits(b));
    }

    #[test]
    fn origin_projects_in_front_of_camera() {
        let t = SceneTransforms::new(&SceneConfig::default(), 0.0);
        let clip = t.world_view_projection() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < 1e-6);
        assert!(ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn rotation_preserves_axis() {
        let t = SceneTransforms::new(&SceneConfig::default(), 73.0);
        let axis = Vec3::new(1.0, 0.0, 1.0).normalize();
        let rotated = t.world.transform_vector3(axis);
        assert!(rotated.abs_diff_eq(axis, 1e-6));
    }

    #[test]
    fn full_turns_fold_to_same_matrix() {
        let config = SceneConfig::default();
        let a = SceneTransforms::new(&config, 15.0);
        let b = SceneTransforms::new(&config, 15.0 + 720.0);
        assert_eq!(a, b);
    }
}
