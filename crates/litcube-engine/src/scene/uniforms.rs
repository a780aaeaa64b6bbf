use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::SceneTransforms;

/// Uniform block shared by both cube shader stages.
///
/// Field order and padding follow WGSL uniform layout rules for
/// `struct { uWMatrix: mat4x4<f32>, uWVPMatrix: mat4x4<f32>, uLightDir: vec3<f32> }`.
/// The shader linker checks the shader-side offsets against the constants below.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SceneUniforms {
    pub w_matrix: [[f32; 4]; 4],
    pub wvp_matrix: [[f32; 4]; 4],
    pub light_dir: [f32; 3],
    pub _pad: f32, // 16-byte alignment
}

impl SceneUniforms {
    pub const W_MATRIX_NAME: &'static str = "uWMatrix";
    pub const WVP_MATRIX_NAME: &'static str = "uWVPMatrix";
    pub const LIGHT_DIR_NAME: &'static str = "uLightDir";

    pub const W_MATRIX_OFFSET: u32 = 0;
    pub const WVP_MATRIX_OFFSET: u32 = 64;
    pub const LIGHT_DIR_OFFSET: u32 = 128;

    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub fn new(transforms: &SceneTransforms, light_dir: Vec3) -> Self {
        Self {
            w_matrix: transforms.world.to_cols_array_2d(),
            wvp_matrix: transforms.world_view_projection().to_cols_array_2d(),
            light_dir: light_dir.to_array(),
            _pad: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::mem::offset_of;

    use super::*;
    use crate::scene::SceneConfig;

    #[test]
    fn layout_matches_wgsl_offsets() {
        assert_eq!(offset_of!(SceneUniforms, w_matrix) as u32, SceneUniforms::W_MATRIX_OFFSET);
        assert_eq!(offset_of!(SceneUniforms, wvp_matrix) as u32, SceneUniforms::WVP_MATRIX_OFFSET);
        assert_eq!(offset_of!(SceneUniforms, light_dir) as u32, SceneUniforms::LIGHT_DIR_OFFSET);
        assert_eq!(SceneUniforms::SIZE, 144);
    }

    #[test]
    fn carries_world_and_composed_matrices() {
        let config = SceneConfig::default();
        let t = SceneTransforms::new(&config, 42.0);
        let u = SceneUniforms::new(&t, config.light_dir);

        assert_eq!(u.w_matrix, t.world.to_cols_array_2d());
        assert_eq!(u.wvp_matrix, t.world_view_projection().to_cols_array_2d());
        assert_eq!(u.light_dir, [0.0, 1.0, 1.0]);
    }
}
