use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuInit};
use crate::render::Renderer;

use super::lifecycle::{Acquire, ContextGeneration, ContextLifecycle};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "litcube".to_string(),
            initial_size: LogicalSize::new(640.0, 480.0),
        }
    }
}

/// Events posted to the loop from outside the main thread.
#[derive(Debug, Clone)]
pub enum ContextEvent {
    /// wgpu reported the device of context `generation` as lost.
    DeviceLost {
        generation: ContextGeneration,
        reason: String,
    },
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and drives `renderer` until the window closes or a
    /// fatal error occurs. The fatal error is returned.
    pub fn run(config: RuntimeConfig, gpu_init: GpuInit, renderer: Renderer<Gpu>) -> Result<()> {
        let event_loop = EventLoop::<ContextEvent>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;
        let proxy = event_loop.create_proxy();

        let mut state = AppState::new(config, gpu_init, renderer, proxy);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct AppState {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    proxy: EventLoopProxy<ContextEvent>,

    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    renderer: Renderer<Gpu>,

    lifecycle: ContextLifecycle,
    fatal: Option<anyhow::Error>,
}

impl AppState {
    fn new(
        config: RuntimeConfig,
        gpu_init: GpuInit,
        renderer: Renderer<Gpu>,
        proxy: EventLoopProxy<ContextEvent>,
    ) -> Self {
        Self {
            config,
            gpu_init,
            proxy,
            window: None,
            gpu: None,
            renderer,
            lifecycle: ContextLifecycle::new(),
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        event_loop.exit();
    }

    fn ensure_window(&mut self, event_loop: &ActiveEventLoop) -> Result<Arc<Window>> {
        if let Some(window) = &self.window {
            return Ok(Arc::clone(window));
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );
        self.window = Some(Arc::clone(&window));
        Ok(window)
    }

    /// Creates a fresh context and hands it to the renderer.
    fn acquire_context(&mut self, event_loop: &ActiveEventLoop, mode: Acquire) {
        let window = match self.ensure_window(event_loop) {
            Ok(w) => w,
            Err(e) => return self.fail(event_loop, e),
        };

        let mut gpu = match pollster::block_on(Gpu::new(window, self.gpu_init.clone())) {
            Ok(gpu) => gpu,
            Err(e) => return self.fail(event_loop, anyhow::Error::new(e)),
        };

        let generation = self.lifecycle.begin_acquire();
        let proxy = self.proxy.clone();
        gpu.on_device_lost(move |reason| {
            // The loop may already be gone during shutdown.
            let _ = proxy.send_event(ContextEvent::DeviceLost { generation, reason });
        });

        let now = Instant::now();
        let result = match mode {
            Acquire::Create => self.renderer.on_context_created(&mut gpu, now),
            Acquire::Restore => self.renderer.on_context_restored(&mut gpu, now),
        };

        match result {
            Ok(()) => {
                self.lifecycle.acquired(generation);
                self.gpu = Some(gpu);
                log::debug!("context {generation} in use");
            }
            Err(e) => self.fail(event_loop, e.context("failed to set up rendering")),
        }
    }

    /// Releases every GPU resource, then drops the context.
    ///
    /// Callers first let `lifecycle` decide whether the event concerns the
    /// live context.
    fn lose_context(&mut self) {
        if let Some(mut gpu) = self.gpu.take() {
            self.renderer.on_context_lost(&mut gpu);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu)) = (self.window.as_ref(), self.gpu.as_mut()) else {
            return;
        };

        match self.renderer.tick(gpu, window.inner_size(), Instant::now()) {
            Ok(Some(report)) => {
                if let Some(fps) = report.fps {
                    window.set_title(&fps_title(&self.config.title, fps));
                    log::info!("{fps:.1} FPS");
                }
            }
            Ok(None) => {}
            Err(e) => {
                if self.lifecycle.closed() {
                    self.lose_context();
                }
                self.fail(event_loop, e);
            }
        }
    }
}

impl ApplicationHandler<ContextEvent> for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mode) = self.lifecycle.resumed() {
            self.acquire_context(event_loop, mode);
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        // The surface may be destroyed while suspended; treat it as a lost context.
        log::info!("suspended");
        if self.lifecycle.suspended() {
            self.lose_context();
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: ContextEvent) {
        match event {
            ContextEvent::DeviceLost { generation, reason } => {
                if self.lifecycle.device_lost(generation) {
                    log::warn!("device lost ({reason})");
                    self.lose_context();
                } else {
                    log::debug!("ignoring loss of stale context {generation} ({reason})");
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.fatal.is_some() {
            event_loop.exit();
            return;
        }

        if let Some(mode) = self.lifecycle.take_restore() {
            self.acquire_context(event_loop, mode);
        }

        if self.renderer.poll_timer(Instant::now()) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }

        match self.renderer.next_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window.as_ref().map(|w| w.id()) != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                if self.lifecycle.closed() {
                    self.lose_context();
                }
                self.window = None;
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            // Size changes are picked up by the per-frame poll.
            _ => {}
        }
    }
}

/// Window title carrying the latest frame rate.
fn fps_title(title: &str, fps: f32) -> String {
    format!("{title} - {fps:.0} FPS")
}
