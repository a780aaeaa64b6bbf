//! litcube engine crate.
//!
//! Renders a single rotating, diffusely lit box. Shaders are compiled and
//! linked on the CPU, geometry lives in GPU buffers, and a fixed-interval
//! frame driver redraws the scene while a graphics context is available.

pub mod coords;
pub mod device;
pub mod geometry;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod shader;
pub mod time;
pub mod window;
