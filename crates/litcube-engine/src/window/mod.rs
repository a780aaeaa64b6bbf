//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, maps platform lifecycle events onto
//! context creation, loss, and restoration, and paces redraws with the
//! renderer's frame timer.

mod lifecycle;
mod runtime;

pub use lifecycle::ContextGeneration;
pub use runtime::{ContextEvent, Runtime, RuntimeConfig};
