use std::fmt;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// Failure to obtain a rendering context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// No usable graphics API on this system (no surface or no adapter).
    Unavailable(String),

    /// The API exists but context creation failed; carries the status message.
    Creation(String),
}

impl ContextError {
    /// Message shown when the graphics API is missing entirely.
    pub const NOT_SUPPORTED: &'static str = "graphics API not supported";
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(detail) => write!(f, "{}: {detail}", Self::NOT_SUPPORTED),
            Self::Creation(status) => {
                write!(f, "error occurred during graphics context creation: [{status}]")
            }
        }
    }
}

impl std::error::Error for ContextError {}
