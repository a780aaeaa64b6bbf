use winit::dpi::PhysicalSize;

use super::{ContextError, GpuInit, SurfaceErrorAction};

/// Colour surface plus the depth buffer drawn alongside it.
///
/// Both always share one size. A zero-area size is tracked but never
/// configured; the next non-empty size configures both again. The depth view
/// exists exactly when the surface is configured for the tracked size.
pub(crate) struct RenderTarget {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    depth_format: wgpu::TextureFormat,
    depth: Option<wgpu::TextureView>,
}

/// What a new drawable size requires of the target.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum SizeChange {
    /// Same size as before.
    Unchanged,
    /// No area; track it and wait.
    Deferred,
    /// Configure surface and depth at the new size.
    Configure,
}

fn size_change(current: PhysicalSize<u32>, new: PhysicalSize<u32>) -> SizeChange {
    if new == current {
        SizeChange::Unchanged
    } else if is_empty(new) {
        SizeChange::Deferred
    } else {
        SizeChange::Configure
    }
}

/// One acquired swapchain image and the encoder recording into it.
pub(crate) struct TargetFrame {
    pub(crate) texture: wgpu::SurfaceTexture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) encoder: wgpu::CommandEncoder,
}

impl RenderTarget {
    pub(crate) fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        size: PhysicalSize<u32>,
        init: &GpuInit,
    ) -> Result<Self, ContextError> {
        let caps = surface.get_capabilities(adapter);
        let format = choose_color_format(&caps.formats, init.prefer_srgb)
            .ok_or_else(|| ContextError::Creation("no supported surface formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: init.present_mode,
            alpha_mode: choose_alpha_mode(&caps.alpha_modes, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        let mut target = Self {
            surface,
            config,
            size: PhysicalSize::new(0, 0),
            depth_format: init.depth_format,
            depth: None,
        };
        if !target.resize(device, size) {
            log::debug!("surface deferred until the window has area ({:?})", format);
        }
        Ok(target)
    }

    pub(crate) fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub(crate) fn depth_format(&self) -> wgpu::TextureFormat {
        self.depth_format
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// `None` while the tracked size has no area.
    pub(crate) fn depth_view(&self) -> Option<&wgpu::TextureView> {
        self.depth.as_ref()
    }

    /// Tracks `new_size`, reconfiguring colour and depth when it has area.
    ///
    /// Returns `true` if anything was reconfigured.
    pub(crate) fn resize(&mut self, device: &wgpu::Device, new_size: PhysicalSize<u32>) -> bool {
        match size_change(self.size, new_size) {
            SizeChange::Unchanged => false,
            SizeChange::Deferred => {
                self.size = new_size;
                self.depth = None;
                false
            }
            SizeChange::Configure => {
                self.size = new_size;
                self.config.width = new_size.width;
                self.config.height = new_size.height;
                self.surface.configure(device, &self.config);
                self.depth = Some(create_depth(device, self.depth_format, new_size));
                log::debug!(
                    "surface configured: {}x{} {:?}",
                    new_size.width,
                    new_size.height,
                    self.config.format
                );
                true
            }
        }
    }

    pub(crate) fn acquire(
        &self,
        device: &wgpu::Device,
    ) -> Result<TargetFrame, wgpu::SurfaceError> {
        let texture = self.surface.get_current_texture()?;
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("litcube frame encoder"),
        });

        Ok(TargetFrame {
            texture,
            view,
            encoder,
        })
    }

    /// Decides how to continue after a failed acquire.
    pub(crate) fn recover(
        &self,
        device: &wgpu::Device,
        err: wgpu::SurfaceError,
    ) -> SurfaceErrorAction {
        let action = action_for(&err);
        if action == SurfaceErrorAction::Reconfigured && !is_empty(self.size) {
            self.surface.configure(device, &self.config);
        }
        action
    }
}

fn is_empty(size: PhysicalSize<u32>) -> bool {
    size.width == 0 || size.height == 0
}

fn create_depth(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    size: PhysicalSize<u32>,
) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("litcube depth"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

/// sRGB BGRA/RGBA first when requested, else whatever the surface lists first.
fn choose_color_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    const SRGB: [wgpu::TextureFormat; 2] = [
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ];

    prefer_srgb
        .then(|| SRGB.into_iter().find(|f| formats.contains(f)))
        .flatten()
        .or_else(|| formats.first().copied())
}

fn choose_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| modes.contains(m))
        .or_else(|| modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

fn action_for(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}
