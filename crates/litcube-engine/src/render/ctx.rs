use anyhow::Result;
use winit::dpi::PhysicalSize;

use crate::coords::Viewport;
use crate::geometry::BoxGeometry;
use crate::paint::Color;
use crate::scene::SceneUniforms;
use crate::shader::LinkedProgram;

/// Per-frame inputs for the single draw call.
#[derive(Debug, Copy, Clone)]
pub struct FrameParams {
    pub uniforms: SceneUniforms,
    pub viewport: Viewport,
    pub clear: Color,
}

/// Result of attempting to draw one frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawOutcome {
    /// The frame was drawn and presented.
    Presented,
    /// Nothing was drawn this time (empty surface, transient surface error).
    Skipped,
    /// The surface cannot recover.
    Fatal,
}

/// Rendering context: the GPU operations the renderer needs.
///
/// Programs and meshes are opaque handles owned by the caller; releasing them
/// hands them back so the context can free GPU memory immediately.
pub trait GraphicsContext {
    type Program;
    type Mesh;

    /// Creates the GPU program for a linked shader pair.
    fn create_program(&mut self, program: &LinkedProgram) -> Result<Self::Program>;

    /// Uploads static position, normal, and index buffers.
    fn upload_mesh(&mut self, geometry: &BoxGeometry) -> Result<Self::Mesh>;

    fn release_program(&mut self, program: Self::Program);

    fn release_mesh(&mut self, mesh: Self::Mesh);

    /// Brings the drawable surface to `displayed` if it differs and returns
    /// the viewport (and scissor) to draw with.
    fn sync_viewport(&mut self, displayed: PhysicalSize<u32>) -> Viewport;

    /// Clears color and depth, then issues one indexed triangle-list draw.
    fn draw(&mut self, program: &Self::Program, mesh: &Self::Mesh, frame: &FrameParams)
    -> DrawOutcome;
}
