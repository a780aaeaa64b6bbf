//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue (the rendering context)
//! - creating & configuring the Surface and its depth target
//! - building the cube program and mesh buffers
//! - acquiring frames and recording the single cube draw

mod error;
mod gpu;
mod init;
mod mesh;
mod program;
mod target;

pub use error::{ContextError, SurfaceErrorAction};
pub use gpu::Gpu;
pub use init::GpuInit;
pub use mesh::MeshBuffers;
pub use program::GpuProgram;
