use std::fmt;

/// Failure while turning shader sources into a program.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// The source is tagged with a type marker that names no shader stage.
    UnknownStage { marker: String },

    /// A stage failed to compile. `diagnostic` is the compiler's rendered report.
    Compile { label: String, diagnostic: String },

    /// The stages compiled but do not form a usable program.
    Link { reason: String },
}

impl ShaderError {
    pub(crate) fn link(reason: impl Into<String>) -> Self {
        Self::Link { reason: reason.into() }
    }
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownStage { marker } => write!(f, "unknown shader type '{marker}'"),
            Self::Compile { label, diagnostic } => {
                write!(f, "an error occurred compiling shader '{label}':\n{diagnostic}")
            }
            Self::Link { reason } => write!(f, "unable to link the shader program: {reason}"),
        }
    }
}

impl std::error::Error for ShaderError {}
