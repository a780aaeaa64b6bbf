//! Scene state: the camera/transform pipeline, rotation, and the uniform
//! block fed to the cube shader.

mod config;
mod rotation;
mod transform;
mod uniforms;

pub use config::SceneConfig;
pub use rotation::Rotation;
pub use transform::SceneTransforms;
pub use uniforms::SceneUniforms;
