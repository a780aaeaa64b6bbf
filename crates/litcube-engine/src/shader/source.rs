use std::path::Path;

use anyhow::{Context, Result};
use wgpu::naga;

use super::ShaderError;

/// Comment prefix in front of the stage marker on a source's first line.
const MARKER_PREFIX: &str = "// ";

/// Pipeline stage a shader source targets.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const VERTEX_MARKER: &'static str = "x-shader/x-vertex";
    pub const FRAGMENT_MARKER: &'static str = "x-shader/x-fragment";

    /// Parses a shader type marker such as `x-shader/x-vertex`.
    ///
    /// The match is exact: no trimming, no case folding.
    pub fn from_marker(marker: &str) -> Result<Self, ShaderError> {
        match marker {
            Self::VERTEX_MARKER => Ok(Self::Vertex),
            Self::FRAGMENT_MARKER => Ok(Self::Fragment),
            other => Err(ShaderError::UnknownStage {
                marker: other.to_string(),
            }),
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Self::Vertex => Self::VERTEX_MARKER,
            Self::Fragment => Self::FRAGMENT_MARKER,
        }
    }

    pub(crate) fn to_naga(self) -> naga::ShaderStage {
        match self {
            Self::Vertex => naga::ShaderStage::Vertex,
            Self::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

/// Complete WGSL source for one stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    /// Human-readable name used in diagnostics and GPU labels.
    pub label: String,
    pub text: String,
}

impl ShaderSource {
    pub fn new(stage: ShaderStage, label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            stage,
            label: label.into(),
            text: text.into(),
        }
    }

    /// Builds a source whose first line names its stage, e.g.
    /// `// x-shader/x-fragment`.
    pub fn from_tagged(label: impl Into<String>, text: impl Into<String>) -> Result<Self, ShaderError> {
        let text = text.into();
        let header = text.lines().next().unwrap_or_default();
        let marker = header.strip_prefix(MARKER_PREFIX).unwrap_or(header);
        let stage = ShaderStage::from_marker(marker)?;
        Ok(Self::new(stage, label, text))
    }

    /// Reads a tagged source file; the label is the file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read shader source {}", path.display()))?;
        let source = Self::from_tagged(path.display().to_string(), text)
            .with_context(|| format!("shader source {} does not start with a valid stage marker", path.display()))?;
        Ok(source)
    }
}

/// The vertex + fragment pair that makes up the cube program.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSources {
    pub vertex: ShaderSource,
    pub fragment: ShaderSource,
}

impl ShaderSources {
    /// Loads both stages from tagged files.
    ///
    /// Each file's own marker decides its stage; a pair in the wrong slots is
    /// rejected when the program is linked.
    pub fn from_files(vertex: impl AsRef<Path>, fragment: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            vertex: ShaderSource::from_file(vertex)?,
            fragment: ShaderSource::from_file(fragment)?,
        })
    }
}

impl Default for ShaderSources {
    /// The embedded lit-cube shaders.
    fn default() -> Self {
        Self {
            vertex: ShaderSource::new(
                ShaderStage::Vertex,
                "cube vertex",
                include_str!("wgsl/cube_vertex.wgsl"),
            ),
            fragment: ShaderSource::new(
                ShaderStage::Fragment,
                "cube fragment",
                include_str!("wgsl/cube_fragment.wgsl"),
            ),
        }
    }
}
