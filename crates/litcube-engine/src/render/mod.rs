//! Cube rendering.
//!
//! [`Renderer`] owns every piece of per-demo state (program, mesh, rotation,
//! frame timer, FPS counter) and drives it through the context lifecycle.
//! GPU work goes through the [`GraphicsContext`] seam, implemented by
//! [`crate::device::Gpu`].

mod ctx;
mod renderer;

pub use ctx::{DrawOutcome, FrameParams, GraphicsContext};
pub use renderer::{DriverState, Renderer, TickReport};
