//! Time subsystem.
//!
//! Frame scheduling and frame-rate measurement, decoupled from the runtime so
//! both can be driven with synthetic instants in tests:
//! - `FrameTimer` is the single periodic deadline that paces redraws
//! - `FpsCounter` counts presented frames and reports a rate once per window

mod fps;
mod frame_timer;

pub use fps::FpsCounter;
pub use frame_timer::FrameTimer;
