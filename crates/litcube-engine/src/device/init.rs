/// Parameters used when a rendering context is (re)created.
///
/// The same value is reused on every restoration, so a restored context comes
/// back with an identical surface and depth setup.
#[derive(Debug, Clone)]
pub struct GpuInit {
    // ── device ──
    /// Features the cube pipeline relies on. None beyond core WebGL2.
    pub required_features: wgpu::Features,
    /// Starting point for device limits; raised to the adapter's texture
    /// resolution so large windows still configure.
    pub required_limits: wgpu::Limits,

    // ── colour surface ──
    /// Pick an sRGB swapchain format when the surface offers one.
    pub prefer_srgb: bool,
    /// Vsync-style presentation; redraw pacing comes from the frame timer.
    pub present_mode: wgpu::PresentMode,
    /// Requested compositing mode, `None` for the surface's first choice.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub desired_maximum_frame_latency: u32,

    // ── depth ──
    /// Depth buffer format. Cleared to 1.0 and tested with `LessEqual`.
    pub depth_format: wgpu::TextureFormat,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            desired_maximum_frame_latency: 2,
            depth_format: wgpu::TextureFormat::Depth32Float,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fit_webgl2_class_hardware() {
        let init = GpuInit::default();
        assert!(init.required_features.is_empty());
        assert_eq!(
            init.required_limits.max_bind_groups,
            wgpu::Limits::downlevel_webgl2_defaults().max_bind_groups
        );
        assert!(!init.depth_format.has_stencil_aspect());
        assert!(init.depth_format.has_depth_aspect());
    }
}
