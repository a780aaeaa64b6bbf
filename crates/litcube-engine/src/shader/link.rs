use wgpu::naga::{AddressSpace, Binding, Handle, Module, Scalar, Type, TypeInner, VectorSize};

use super::{CompiledShader, ShaderError, ShaderStage, NORMAL_ATTRIBUTE, POSITION_ATTRIBUTE};
use crate::scene::SceneUniforms;

/// Shader locations of the two vertex attributes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttributes {
    pub position: u32,
    pub normal: u32,
}

/// Where the scene uniform block is bound.
///
/// The program has a single bind group, so `group` is always 0 after linking.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformBlock {
    pub group: u32,
    pub binding: u32,
}

/// A vertex + fragment pair whose interfaces agree.
///
/// Attribute locations and the uniform binding are resolved here, once, so the
/// device layer never looks anything up by name.
#[derive(Debug, Clone)]
pub struct LinkedProgram {
    pub vertex: CompiledShader,
    pub fragment: CompiledShader,
    pub attributes: VertexAttributes,
    pub uniforms: UniformBlock,
}

/// Links two compiled stages into a program.
///
/// Checks:
/// - stage kinds are vertex and fragment
/// - the vertex stage takes exactly `aVertexPosition` and `aVertexNormal`, both `vec3<f32>`
/// - every fragment input location is written by the vertex stage with the same type
/// - the uniform block has `uWMatrix`, `uWVPMatrix`, `uLightDir` at the offsets of
///   [`SceneUniforms`], and both stages bind it at the same slot in group 0
pub fn link(vertex: CompiledShader, fragment: CompiledShader) -> Result<LinkedProgram, ShaderError> {
    if vertex.stage() != ShaderStage::Vertex {
        return Err(ShaderError::link(format!(
            "'{}' is not a vertex shader",
            vertex.label()
        )));
    }
    if fragment.stage() != ShaderStage::Fragment {
        return Err(ShaderError::link(format!(
            "'{}' is not a fragment shader",
            fragment.label()
        )));
    }

    let attributes = resolve_attributes(&vertex)?;
    check_stage_interface(&vertex, &fragment)?;
    let uniforms = resolve_uniform_block(&vertex, &fragment)?;

    log::debug!(
        "linked '{}' + '{}' (position @{}, normal @{}, uniforms @{}:{})",
        vertex.label(),
        fragment.label(),
        attributes.position,
        attributes.normal,
        uniforms.group,
        uniforms.binding
    );

    Ok(LinkedProgram {
        vertex,
        fragment,
        attributes,
        uniforms,
    })
}

/// A location-bound value crossing a stage boundary.
struct Slot<'a> {
    name: Option<&'a str>,
    location: u32,
    ty: &'a TypeInner,
}

/// Flattens location-bound values, looking one level into structs.
fn collect_slots<'a>(
    module: &'a Module,
    items: impl Iterator<Item = (Option<&'a str>, Handle<Type>, Option<&'a Binding>)>,
) -> Vec<Slot<'a>> {
    let mut slots = Vec::new();
    for (name, ty, binding) in items {
        match binding {
            Some(Binding::Location { location, .. }) => slots.push(Slot {
                name,
                location: *location,
                ty: &module.types[ty].inner,
            }),
            Some(Binding::BuiltIn(_)) => {}
            None => {
                if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                    for m in members {
                        if let Some(Binding::Location { location, .. }) = &m.binding {
                            slots.push(Slot {
                                name: m.name.as_deref(),
                                location: *location,
                                ty: &module.types[m.ty].inner,
                            });
                        }
                    }
                }
            }
        }
    }
    slots
}

fn stage_inputs(shader: &CompiledShader) -> Vec<Slot<'_>> {
    let module = shader.module();
    let args = shader
        .entry()
        .function
        .arguments
        .iter()
        .map(|a| (a.name.as_deref(), a.ty, a.binding.as_ref()));
    collect_slots(module, args)
}

fn stage_outputs(shader: &CompiledShader) -> Vec<Slot<'_>> {
    let module = shader.module();
    let result = shader
        .entry()
        .function
        .result
        .as_ref()
        .map(|r| (None, r.ty, r.binding.as_ref()));
    collect_slots(module, result.into_iter())
}

fn is_vec3_f32(ty: &TypeInner) -> bool {
    matches!(ty, TypeInner::Vector { size: VectorSize::Tri, scalar } if *scalar == Scalar::F32)
}

fn is_mat4_f32(ty: &TypeInner) -> bool {
    matches!(
        ty,
        TypeInner::Matrix { columns: VectorSize::Quad, rows: VectorSize::Quad, scalar }
            if *scalar == Scalar::F32
    )
}

fn resolve_attributes(vertex: &CompiledShader) -> Result<VertexAttributes, ShaderError> {
    let inputs = stage_inputs(vertex);

    let find = |name: &str| -> Result<u32, ShaderError> {
        let slot = inputs
            .iter()
            .find(|s| s.name == Some(name))
            .ok_or_else(|| ShaderError::link(format!("vertex attribute '{name}' not found")))?;
        if !is_vec3_f32(slot.ty) {
            return Err(ShaderError::link(format!(
                "vertex attribute '{name}' must be vec3<f32>"
            )));
        }
        Ok(slot.location)
    };

    let position = find(POSITION_ATTRIBUTE)?;
    let normal = find(NORMAL_ATTRIBUTE)?;

    if inputs.len() != 2 {
        return Err(ShaderError::link(format!(
            "vertex stage declares {} attributes, expected exactly 2",
            inputs.len()
        )));
    }

    Ok(VertexAttributes { position, normal })
}

fn check_stage_interface(
    vertex: &CompiledShader,
    fragment: &CompiledShader,
) -> Result<(), ShaderError> {
    let outputs = stage_outputs(vertex);

    for input in stage_inputs(fragment) {
        let Some(output) = outputs.iter().find(|o| o.location == input.location) else {
            return Err(ShaderError::link(format!(
                "fragment input @location({}) is not written by the vertex stage",
                input.location
            )));
        };
        if output.ty != input.ty {
            return Err(ShaderError::link(format!(
                "type mismatch at @location({}) between vertex output and fragment input",
                input.location
            )));
        }
    }

    Ok(())
}

/// Finds the uniform block in one stage, if the stage declares it.
fn find_uniform_block(shader: &CompiledShader) -> Result<Option<UniformBlock>, ShaderError> {
    let module = shader.module();

    for (_, var) in module.global_variables.iter() {
        if var.space != AddressSpace::Uniform {
            continue;
        }
        let TypeInner::Struct { members, .. } = &module.types[var.ty].inner else {
            continue;
        };
        if !members
            .iter()
            .any(|m| m.name.as_deref() == Some(SceneUniforms::W_MATRIX_NAME))
        {
            continue;
        }

        let expected = [
            (SceneUniforms::W_MATRIX_NAME, SceneUniforms::W_MATRIX_OFFSET, true),
            (SceneUniforms::WVP_MATRIX_NAME, SceneUniforms::WVP_MATRIX_OFFSET, true),
            (SceneUniforms::LIGHT_DIR_NAME, SceneUniforms::LIGHT_DIR_OFFSET, false),
        ];
        for (name, offset, is_matrix) in expected {
            let member = members
                .iter()
                .find(|m| m.name.as_deref() == Some(name))
                .ok_or_else(|| {
                    ShaderError::link(format!(
                        "uniform '{name}' missing in '{}'",
                        shader.label()
                    ))
                })?;

            let ty = &module.types[member.ty].inner;
            let type_ok = if is_matrix { is_mat4_f32(ty) } else { is_vec3_f32(ty) };
            if !type_ok || member.offset != offset {
                return Err(ShaderError::link(format!(
                    "uniform '{name}' in '{}' has an unexpected type or offset",
                    shader.label()
                )));
            }
        }

        let binding = var.binding.as_ref().ok_or_else(|| {
            ShaderError::link(format!("uniform block in '{}' has no binding", shader.label()))
        })?;

        return Ok(Some(UniformBlock {
            group: binding.group,
            binding: binding.binding,
        }));
    }

    Ok(None)
}

fn resolve_uniform_block(
    vertex: &CompiledShader,
    fragment: &CompiledShader,
) -> Result<UniformBlock, ShaderError> {
    let vs_block = find_uniform_block(vertex)?
        .ok_or_else(|| ShaderError::link("vertex stage declares no scene uniform block"))?;
    if vs_block.group != 0 {
        return Err(ShaderError::link("scene uniforms must be bound in group 0"));
    }

    if let Some(fs_block) = find_uniform_block(fragment)? {
        if fs_block != vs_block {
            return Err(ShaderError::link(
                "vertex and fragment stages bind the scene uniforms at different slots",
            ));
        }
    }

    Ok(vs_block)
}
