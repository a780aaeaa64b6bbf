//! Shader loading: tagged WGSL sources, per-stage compilation, and program
//! linking.
//!
//! Compilation and linking run on the CPU through the `naga` front end bundled with
//! wgpu, so every failure carries the compiler diagnostic before any
//! GPU object exists. A [`LinkedProgram`] is the only thing the device layer
//! accepts; a program that failed to link never reaches the GPU.

mod compile;
mod error;
mod link;
mod source;

pub use compile::{compile, CompiledShader};
pub use error::ShaderError;
pub use link::{link, LinkedProgram, UniformBlock, VertexAttributes};
pub use source::{ShaderSource, ShaderSources, ShaderStage};

/// Vertex attribute carrying positions.
pub const POSITION_ATTRIBUTE: &str = "aVertexPosition";

/// Vertex attribute carrying normals.
pub const NORMAL_ATTRIBUTE: &str = "aVertexNormal";
