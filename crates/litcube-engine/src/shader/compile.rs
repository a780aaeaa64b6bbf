use wgpu::naga;
use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};

use super::{ShaderError, ShaderSource, ShaderStage};

/// A single stage that parsed and validated.
#[derive(Debug, Clone)]
pub struct CompiledShader {
    stage: ShaderStage,
    label: String,
    text: String,
    entry_index: usize,
    module: naga::Module,
}

impl CompiledShader {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// WGSL text that produced this stage; handed to wgpu unchanged.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Name of the entry point for this stage.
    pub fn entry_point(&self) -> &str {
        &self.entry().name
    }

    pub(crate) fn module(&self) -> &naga::Module {
        &self.module
    }

    pub(crate) fn entry(&self) -> &naga::EntryPoint {
        &self.module.entry_points[self.entry_index]
    }
}

/// Parses and validates one stage.
///
/// The module must contain exactly one entry point for the source's stage.
pub fn compile(source: &ShaderSource) -> Result<CompiledShader, ShaderError> {
    let compile_error = |diagnostic: String| ShaderError::Compile {
        label: source.label.clone(),
        diagnostic,
    };

    let module = naga::front::wgsl::parse_str(&source.text)
        .map_err(|e| compile_error(e.emit_to_string(&source.text)))?;

    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| compile_error(e.emit_to_string(&source.text)))?;

    let stage = source.stage.to_naga();
    let mut entries = module
        .entry_points
        .iter()
        .enumerate()
        .filter(|(_, ep)| ep.stage == stage);
    let entry_index = match (entries.next(), entries.next()) {
        (Some((index, _)), None) => index,
        (None, _) => {
            return Err(compile_error(format!(
                "no {:?} entry point in module",
                source.stage
            )));
        }
        (Some(_), Some(_)) => {
            return Err(compile_error(format!(
                "more than one {:?} entry point in module",
                source.stage
            )));
        }
    };

    log::debug!(
        "compiled {} shader '{}' (entry point {})",
        source.stage.marker(),
        source.label,
        module.entry_points[entry_index].name
    );

    Ok(CompiledShader {
        stage: source.stage,
        label: source.label.clone(),
        text: source.text.clone(),
        entry_index,
        module,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::ShaderSources;

    #[test]
    fn embedded_stages_compile() {
        let sources = ShaderSources::default();

        let vs = compile(&sources.vertex).unwrap();
        assert_eq!(vs.stage(), ShaderStage::Vertex);
        assert_eq!(vs.entry_point(), "vs_main");

        let fs = compile(&sources.fragment).unwrap();
        assert_eq!(fs.stage(), ShaderStage::Fragment);
        assert_eq!(fs.entry_point(), "fs_main");
    }

    #[test]
    fn syntax_error_carries_diagnostic() {
        let src = ShaderSource::new(ShaderStage::Vertex, "broken", "fn vs_main( {");
        match compile(&src) {
            Err(ShaderError::Compile { label, diagnostic }) => {
                assert_eq!(label, "broken");
                assert!(!diagnostic.is_empty());
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn type_error_is_a_compile_failure() {
        let src = ShaderSource::new(
            ShaderStage::Fragment,
            "mistyped",
            "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }",
        );
        assert!(matches!(compile(&src), Err(ShaderError::Compile { .. })));
    }

    #[test]
    fn wrong_stage_is_rejected() {
        let mut src = ShaderSources::default().fragment;
        src.stage = ShaderStage::Vertex;

        let err = compile(&src).unwrap_err();
        assert!(err.to_string().contains("no Vertex entry point"));
    }
}
