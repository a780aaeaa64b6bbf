//! Screen-space coordinate types.
//!
//! Everything here is in physical pixels: the cube renderer sizes its
//! viewport and scissor rectangles straight from the surface.

mod viewport;

pub use viewport::Viewport;
