use crate::scene::SceneUniforms;
use crate::shader::LinkedProgram;

/// Stride of a tightly packed `vec3<f32>` attribute.
const VEC3_STRIDE: u64 = 3 * std::mem::size_of::<f32>() as u64;

/// GPU side of a linked program: pipeline plus its uniform buffer and bind group.
pub struct GpuProgram {
    pipeline: wgpu::RenderPipeline,
    uniform_ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl GpuProgram {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        program: &LinkedProgram,
    ) -> Self {
        let vs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(program.vertex.label()),
            source: wgpu::ShaderSource::Wgsl(program.vertex.text().into()),
        });
        let fs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(program.fragment.label()),
            source: wgpu::ShaderSource::Wgsl(program.fragment.text().into()),
        });

        let min_binding_size = std::num::NonZeroU64::new(SceneUniforms::SIZE);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("litcube scene bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: program.uniforms.binding,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("litcube pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let position_attrs = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: program.attributes.position,
        }];
        let normal_attrs = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: program.attributes.normal,
        }];
        let vertex_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: VEC3_STRIDE,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &position_attrs,
            },
            wgpu::VertexBufferLayout {
                array_stride: VEC3_STRIDE,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &normal_attrs,
            },
        ];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("litcube pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(program.vertex.entry_point()),
                compilation_options: Default::default(),
                buffers: &vertex_buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some(program.fragment.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        let uniform_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("litcube scene ubo"),
            size: SceneUniforms::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("litcube scene bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: program.uniforms.binding,
                resource: uniform_ubo.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            uniform_ubo,
            bind_group,
        }
    }

    pub(crate) fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &SceneUniforms) {
        queue.write_buffer(&self.uniform_ubo, 0, bytemuck::bytes_of(uniforms));
    }

    pub(crate) fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
    }

    /// Frees the uniform buffer; the pipeline goes with the last handle.
    pub fn destroy(self) {
        self.uniform_ubo.destroy();
    }
}
