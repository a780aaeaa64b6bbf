use std::sync::Arc;

use anyhow::Result;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::Viewport;
use crate::geometry::BoxGeometry;
use crate::render::{DrawOutcome, FrameParams, GraphicsContext};
use crate::shader::LinkedProgram;

use super::target::{RenderTarget, TargetFrame};
use super::{ContextError, GpuInit, GpuProgram, MeshBuffers, SurfaceErrorAction};

/// The rendering context for one window.
///
/// Holds the wgpu device and queue together with the window's render target.
/// Dropping it releases the context. A lost context is never reused; a new
/// `Gpu` is created against the same window instead.
pub struct Gpu {
    window: Arc<Window>,
    _instance: wgpu::Instance,
    _adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    target: RenderTarget,
}

impl Gpu {
    /// Creates a rendering context bound to a window.
    ///
    /// A missing surface or adapter means the graphics API is unavailable;
    /// anything failing after that is a creation error. A minimized (zero-size)
    /// window is fine: the surface is configured once it has area.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self, ContextError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(|e| ContextError::Unavailable(format!("failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| ContextError::Unavailable(format!("no suitable GPU adapter: {e}")))?;

        let info = adapter.get_info();
        log::info!("using adapter '{}' ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("litcube device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone().using_resolution(adapter.limits()),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| ContextError::Creation(e.to_string()))?;

        let target = RenderTarget::new(surface, &adapter, &device, size, &init)?;

        Ok(Self {
            window,
            _instance: instance,
            _adapter: adapter,
            device,
            queue,
            target,
        })
    }

    /// Registers a callback for unexpected device loss.
    ///
    /// Intentional destruction (dropping the `Gpu`) is filtered out. The callback
    /// may run on any thread.
    pub fn on_device_lost<F>(&self, callback: F)
    where
        F: Fn(String) + Send + 'static,
    {
        self.device.set_device_lost_callback(move |reason, message| {
            if matches!(reason, wgpu::DeviceLostReason::Destroyed) {
                return;
            }
            callback(format!("{reason:?}: {message}"));
        });
    }

    fn present(&self, frame: TargetFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        self.window.pre_present_notify();
        frame.texture.present();
    }
}

impl GraphicsContext for Gpu {
    type Program = GpuProgram;
    type Mesh = MeshBuffers;

    fn create_program(&mut self, program: &LinkedProgram) -> Result<GpuProgram> {
        Ok(GpuProgram::new(
            &self.device,
            self.target.format(),
            self.target.depth_format(),
            program,
        ))
    }

    fn upload_mesh(&mut self, geometry: &BoxGeometry) -> Result<MeshBuffers> {
        Ok(MeshBuffers::new(&self.device, geometry))
    }

    fn release_program(&mut self, program: GpuProgram) {
        program.destroy();
    }

    fn release_mesh(&mut self, mesh: MeshBuffers) {
        mesh.destroy();
    }

    fn sync_viewport(&mut self, displayed: PhysicalSize<u32>) -> Viewport {
        self.target.resize(&self.device, displayed);
        Viewport::from(self.target.size())
    }

    fn draw(&mut self, program: &GpuProgram, mesh: &MeshBuffers, frame: &FrameParams) -> DrawOutcome {
        program.write_uniforms(&self.queue, &frame.uniforms);

        let Some(depth_view) = self.target.depth_view() else {
            return DrawOutcome::Skipped;
        };

        let mut target_frame = match self.target.acquire(&self.device) {
            Ok(f) => f,
            Err(err) => {
                log::warn!("failed to acquire surface texture: {err}");
                return match self.target.recover(&self.device, err) {
                    SurfaceErrorAction::Fatal => DrawOutcome::Fatal,
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        DrawOutcome::Skipped
                    }
                };
            }
        };

        {
            let mut rpass = target_frame
                .encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("litcube cube pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &target_frame.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(frame.clear.into()),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: depth_view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                    multiview_mask: None,
                });

            let vp = frame.viewport;
            rpass.set_viewport(0.0, 0.0, vp.width as f32, vp.height as f32, 0.0, 1.0);
            rpass.set_scissor_rect(0, 0, vp.width, vp.height);

            program.bind(&mut rpass);
            mesh.bind(&mut rpass);
            rpass.draw_indexed(0..mesh.index_count(), 0, 0..1);
        }

        self.present(target_frame);
        DrawOutcome::Presented
    }
}
