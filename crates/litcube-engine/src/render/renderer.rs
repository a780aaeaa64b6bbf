use std::time::Instant;

use anyhow::{bail, Result};
use winit::dpi::PhysicalSize;

use crate::coords::Viewport;
use crate::geometry::BoxGeometry;
use crate::scene::{Rotation, SceneConfig, SceneTransforms, SceneUniforms};
use crate::shader::{self, ShaderSources};
use crate::time::{FpsCounter, FrameTimer};

use super::{DrawOutcome, FrameParams, GraphicsContext};

/// Frame driver state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DriverState {
    /// No GPU resources, timer disarmed.
    Idle,
    /// Resources live, timer armed.
    Running,
}

/// What one tick did.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TickReport {
    pub outcome: DrawOutcome,
    pub viewport: Viewport,
    /// Set when the FPS counter closed a reporting window on this tick.
    pub fps: Option<f32>,
}

/// Program and mesh live and die together.
struct GpuResources<P, M> {
    program: P,
    mesh: M,
}

/// Owns the demo: shader sources, geometry, GPU handles, rotation, timer.
///
/// Lifecycle:
/// - `on_context_created` / `on_context_restored` build everything from scratch
///   and move Idle → Running
/// - `on_context_lost` cancels the timer first, then releases the mesh and the
///   program, and moves Running → Idle
pub struct Renderer<C: GraphicsContext> {
    config: SceneConfig,
    shaders: ShaderSources,
    geometry: BoxGeometry,

    state: DriverState,
    resources: Option<GpuResources<C::Program, C::Mesh>>,

    rotation: Rotation,
    timer: FrameTimer,
    fps: FpsCounter,
}

impl<C: GraphicsContext> Renderer<C> {
    pub fn new(config: SceneConfig, shaders: ShaderSources) -> Self {
        let geometry = BoxGeometry::new(config.box_size);
        let rotation = Rotation::new(config.degrees_per_second);
        let timer = FrameTimer::new(config.frame_interval);

        Self {
            config,
            shaders,
            geometry,
            state: DriverState::Idle,
            resources: None,
            rotation,
            timer,
            fps: FpsCounter::new(),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn rotation(&self) -> &Rotation {
        &self.rotation
    }

    #[cfg(test)]
    fn has_resources(&self) -> bool {
        self.resources.is_some()
    }

    /// Next time the frame timer wants a tick, if armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Returns `true` if a tick is due and re-schedules the timer.
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        self.timer.poll(now)
    }

    /// First successful context: build resources and start the frame timer.
    ///
    /// On error the renderer stays Idle with nothing allocated.
    pub fn on_context_created(&mut self, ctx: &mut C, now: Instant) -> Result<()> {
        if self.state == DriverState::Running {
            log::debug!("context created while running; ignored");
            return Ok(());
        }
        self.start(ctx, now)?;
        log::info!("rendering started");
        Ok(())
    }

    /// Rebuilds everything after a loss.
    pub fn on_context_restored(&mut self, ctx: &mut C, now: Instant) -> Result<()> {
        if self.state == DriverState::Running {
            log::debug!("context restored while running; ignored");
            return Ok(());
        }
        self.start(ctx, now)?;
        log::info!("context restored; rendering resumed");
        Ok(())
    }

    /// Tears down all GPU state. Completes before returning; `ctx` may be
    /// dropped immediately afterwards.
    pub fn on_context_lost(&mut self, ctx: &mut C) {
        if self.state == DriverState::Idle {
            log::debug!("context lost while idle; nothing to release");
            return;
        }

        self.timer.cancel();
        self.fps.stop();

        if let Some(GpuResources { program, mesh }) = self.resources.take() {
            ctx.release_mesh(mesh);
            ctx.release_program(program);
        }

        self.state = DriverState::Idle;
        log::info!("context lost; rendering stopped");
    }

    /// Runs one frame: viewport sync, clear + draw, rotation, frame counter.
    ///
    /// Returns `None` while Idle (no GPU work is issued).
    pub fn tick(
        &mut self,
        ctx: &mut C,
        displayed: PhysicalSize<u32>,
        now: Instant,
    ) -> Result<Option<TickReport>> {
        if self.state == DriverState::Idle {
            return Ok(None);
        }
        let Some(resources) = self.resources.as_ref() else {
            return Ok(None);
        };

        let viewport = ctx.sync_viewport(displayed);

        let outcome = if viewport.is_empty() {
            DrawOutcome::Skipped
        } else {
            let transforms = SceneTransforms::new(&self.config, self.rotation.degrees());
            let frame = FrameParams {
                uniforms: SceneUniforms::new(&transforms, self.config.light_dir),
                viewport,
                clear: self.config.clear_color,
            };
            ctx.draw(&resources.program, &resources.mesh, &frame)
        };

        if outcome == DrawOutcome::Fatal {
            bail!("surface is unrecoverable");
        }
        if outcome == DrawOutcome::Skipped {
            log::trace!("frame skipped (viewport {}x{})", viewport.width, viewport.height);
        }

        self.rotation.advance(now);
        let fps = self.fps.increment(now);

        Ok(Some(TickReport {
            outcome,
            viewport,
            fps,
        }))
    }

    fn start(&mut self, ctx: &mut C, now: Instant) -> Result<()> {
        self.resources = Some(self.build_resources(ctx)?);
        self.timer.arm(now);
        self.fps.run(now);
        self.state = DriverState::Running;
        Ok(())
    }

    fn build_resources(&self, ctx: &mut C) -> Result<GpuResources<C::Program, C::Mesh>> {
        let vertex = shader::compile(&self.shaders.vertex)?;
        let fragment = shader::compile(&self.shaders.fragment)?;
        let linked = shader::link(vertex, fragment)?;

        let program = ctx.create_program(&linked)?;
        let mesh = match ctx.upload_mesh(&self.geometry) {
            Ok(mesh) => mesh,
            Err(e) => {
                ctx.release_program(program);
                return Err(e);
            }
        };

        log::debug!(
            "GPU resources built ({} vertices, {} indices)",
            self.geometry.vertex_count(),
            self.geometry.index_count()
        );

        Ok(GpuResources { program, mesh })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::anyhow;

    use super::*;
    use crate::geometry::BOX_INDEX_COUNT;
    use crate::shader::{LinkedProgram, ShaderError, ShaderSource, ShaderStage};

    /// Records GPU operations instead of performing them.
    #[derive(Default)]
    struct FakeContext {
        next_id: u32,
        live_programs: Vec<u32>,
        live_buffers: Vec<u32>,
        surface: PhysicalSize<u32>,
        draws: Vec<FrameParams>,
        fail_upload: bool,
        next_outcome: Option<DrawOutcome>,
    }

    struct FakeMesh {
        buffers: [u32; 3],
        index_count: usize,
        max_index: u16,
    }

    impl FakeContext {
        fn id(&mut self) -> u32 {
            self.next_id += 1;
            self.next_id
        }
    }

    impl GraphicsContext for FakeContext {
        type Program = u32;
        type Mesh = FakeMesh;

        fn create_program(&mut self, program: &LinkedProgram) -> Result<u32> {
            assert_eq!(program.attributes.position, 0);
            let id = self.id();
            self.live_programs.push(id);
            Ok(id)
        }

        fn upload_mesh(&mut self, geometry: &BoxGeometry) -> Result<FakeMesh> {
            if self.fail_upload {
                return Err(anyhow!("out of memory"));
            }
            let buffers = [self.id(), self.id(), self.id()];
            self.live_buffers.extend(buffers);
            Ok(FakeMesh {
                buffers,
                index_count: geometry.indices().len(),
                max_index: geometry.indices().iter().copied().max().unwrap_or(0),
            })
        }

        fn release_program(&mut self, program: u32) {
            self.live_programs.retain(|&p| p != program);
        }

        fn release_mesh(&mut self, mesh: FakeMesh) {
            self.live_buffers.retain(|b| !mesh.buffers.contains(b));
        }

        fn sync_viewport(&mut self, displayed: PhysicalSize<u32>) -> Viewport {
            self.surface = displayed;
            Viewport::from(displayed)
        }

        fn draw(&mut self, _program: &u32, mesh: &FakeMesh, frame: &FrameParams) -> DrawOutcome {
            assert_eq!(mesh.index_count, BOX_INDEX_COUNT);
            self.draws.push(*frame);
            self.next_outcome.take().unwrap_or(DrawOutcome::Presented)
        }
    }

    const SIZE: PhysicalSize<u32> = PhysicalSize {
        width: 640,
        height: 480,
    };

    fn renderer() -> Renderer<FakeContext> {
        Renderer::new(SceneConfig::default(), ShaderSources::default())
    }

    fn started(ctx: &mut FakeContext, t0: Instant) -> Renderer<FakeContext> {
        let mut r = renderer();
        r.on_context_created(ctx, t0).unwrap();
        r
    }

    // ── creation ──────────────────────────────────────────────────────────

    #[test]
    fn creation_builds_one_program_and_three_buffers() {
        let mut ctx = FakeContext::default();
        let r = started(&mut ctx, Instant::now());

        assert_eq!(r.state(), DriverState::Running);
        assert_eq!(ctx.live_programs.len(), 1);
        assert_eq!(ctx.live_buffers.len(), 3);
        assert!(r.next_deadline().is_some());
    }

    #[test]
    fn compile_failure_aborts_setup() {
        let mut ctx = FakeContext::default();
        let mut sources = ShaderSources::default();
        sources.fragment = ShaderSource::new(ShaderStage::Fragment, "bad", "not wgsl");

        let mut r = Renderer::<FakeContext>::new(SceneConfig::default(), sources);
        let err = r.on_context_created(&mut ctx, Instant::now()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ShaderError>(),
            Some(ShaderError::Compile { .. })
        ));
        assert_eq!(r.state(), DriverState::Idle);
        assert!(ctx.live_programs.is_empty());
        assert!(r.next_deadline().is_none());
    }

    #[test]
    fn link_failure_is_fatal() {
        let mut ctx = FakeContext::default();
        let mut sources = ShaderSources::default();
        sources.vertex.text = sources.vertex.text.replace("aVertexNormal", "aNormal");

        let mut r = Renderer::<FakeContext>::new(SceneConfig::default(), sources);
        let err = r.on_context_created(&mut ctx, Instant::now()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ShaderError>(),
            Some(ShaderError::Link { .. })
        ));
        assert_eq!(r.state(), DriverState::Idle);
        assert!(ctx.live_programs.is_empty());
        assert!(ctx.live_buffers.is_empty());
    }

    #[test]
    fn failed_upload_releases_program() {
        let mut ctx = FakeContext {
            fail_upload: true,
            ..Default::default()
        };
        let mut r = renderer();

        assert!(r.on_context_created(&mut ctx, Instant::now()).is_err());
        assert!(ctx.live_programs.is_empty());
        assert!(!r.has_resources());
    }

    // ── ticking ───────────────────────────────────────────────────────────

    #[test]
    fn tick_draws_once_and_syncs_viewport() {
        let t0 = Instant::now();
        let mut ctx = FakeContext::default();
        let mut r = started(&mut ctx, t0);

        let report = r
            .tick(&mut ctx, PhysicalSize::new(800, 600), t0)
            .unwrap()
            .unwrap();

        assert_eq!(report.outcome, DrawOutcome::Presented);
        assert_eq!(report.viewport, Viewport::new(800, 600));
        assert_eq!(ctx.draws.len(), 1);
        assert_eq!(ctx.draws[0].viewport, Viewport::new(800, 600));
        assert_eq!(ctx.draws[0].clear, r.config().clear_color);
    }

    #[test]
    fn viewport_follows_every_resize() {
        let t0 = Instant::now();
        let mut ctx = FakeContext::default();
        let mut r = started(&mut ctx, t0);

        for (i, (w, h)) in [(640, 480), (1024, 300), (1, 1), (640, 480)].into_iter().enumerate() {
            let now = t0 + Duration::from_millis(10 * i as u64);
            let report = r.tick(&mut ctx, PhysicalSize::new(w, h), now).unwrap().unwrap();
            assert_eq!(report.viewport, Viewport::new(w, h));
            assert_eq!(ctx.surface, PhysicalSize::new(w, h));
        }
    }

    #[test]
    fn rotation_advances_with_wall_clock() {
        let t0 = Instant::now();
        let mut ctx = FakeContext::default();
        let mut r = started(&mut ctx, t0);

        r.tick(&mut ctx, SIZE, t0).unwrap();
        assert_eq!(r.rotation().degrees(), 0.0);

        r.tick(&mut ctx, SIZE, t0 + Duration::from_millis(1000)).unwrap();
        assert_eq!(r.rotation().degrees(), 30.0);
    }

    #[test]
    fn draw_uses_angle_from_before_the_tick() {
        let t0 = Instant::now();
        let mut ctx = FakeContext::default();
        let mut r = started(&mut ctx, t0);

        r.tick(&mut ctx, SIZE, t0).unwrap();
        r.tick(&mut ctx, SIZE, t0 + Duration::from_millis(1000)).unwrap();
        r.tick(&mut ctx, SIZE, t0 + Duration::from_millis(1010)).unwrap();

        let config = SceneConfig::default();
        let at = |deg| SceneUniforms::new(&SceneTransforms::new(&config, deg), config.light_dir);
        assert_eq!(ctx.draws[0].uniforms, at(0.0));
        assert_eq!(ctx.draws[1].uniforms, at(0.0));
        assert_eq!(ctx.draws[2].uniforms, at(30.0));
    }

    #[test]
    fn empty_window_skips_draw_but_keeps_time() {
        let t0 = Instant::now();
        let mut ctx = FakeContext::default();
        let mut r = started(&mut ctx, t0);

        r.tick(&mut ctx, SIZE, t0).unwrap();
        let report = r
            .tick(&mut ctx, PhysicalSize::new(0, 0), t0 + Duration::from_millis(500))
            .unwrap()
            .unwrap();

        assert_eq!(report.outcome, DrawOutcome::Skipped);
        assert_eq!(ctx.draws.len(), 1);
        assert_eq!(r.rotation().degrees(), 15.0);
    }

    #[test]
    fn fatal_surface_error_propagates() {
        let t0 = Instant::now();
        let mut ctx = FakeContext::default();
        let mut r = started(&mut ctx, t0);
        ctx.next_outcome = Some(DrawOutcome::Fatal);

        assert!(r.tick(&mut ctx, SIZE, t0).is_err());
    }

    #[test]
    fn fps_reported_after_one_second() {
        let t0 = Instant::now();
        let mut ctx = FakeContext::default();
        let mut r = started(&mut ctx, t0);

        let mut reported = None;
        for i in 1..=100u64 {
            let report = r
                .tick(&mut ctx, SIZE, t0 + Duration::from_millis(i * 10))
                .unwrap()
                .unwrap();
            reported = reported.or(report.fps);
        }
        assert!((reported.unwrap() - 100.0).abs() < 1e-3);
    }

    // ── loss / restore ────────────────────────────────────────────────────

    #[test]
    fn loss_releases_everything_and_stops_drawing() {
        let t0 = Instant::now();
        let mut ctx = FakeContext::default();
        let mut r = started(&mut ctx, t0);
        r.tick(&mut ctx, SIZE, t0).unwrap();

        r.on_context_lost(&mut ctx);

        assert_eq!(r.state(), DriverState::Idle);
        assert!(r.next_deadline().is_none());
        assert!(!r.poll_timer(t0 + Duration::from_secs(1)));
        assert!(ctx.live_programs.is_empty());
        assert!(ctx.live_buffers.is_empty());

        let draws = ctx.draws.len();
        assert!(r.tick(&mut ctx, SIZE, t0 + Duration::from_secs(1)).unwrap().is_none());
        assert_eq!(ctx.draws.len(), draws);
    }

    #[test]
    fn restore_rebuilds_exactly_one_set() {
        let t0 = Instant::now();
        let mut ctx = FakeContext::default();
        let mut r = started(&mut ctx, t0);

        r.on_context_lost(&mut ctx);
        r.on_context_restored(&mut ctx, t0 + Duration::from_secs(1)).unwrap();

        assert_eq!(r.state(), DriverState::Running);
        assert_eq!(ctx.live_programs.len(), 1);
        assert_eq!(ctx.live_buffers.len(), 3);
        assert_eq!(
            r.next_deadline(),
            Some(t0 + Duration::from_secs(1) + r.config().frame_interval)
        );

        let report = r.tick(&mut ctx, SIZE, t0 + Duration::from_secs(1)).unwrap();
        assert!(report.is_some());
    }

    #[test]
    fn restored_mesh_matches_original_geometry() {
        let mut ctx = FakeContext::default();
        let mut r = started(&mut ctx, Instant::now());
        r.on_context_lost(&mut ctx);
        r.on_context_restored(&mut ctx, Instant::now()).unwrap();

        let resources = r.resources.as_ref().unwrap();
        assert_eq!(resources.mesh.index_count, 36);
        assert!(resources.mesh.max_index <= 7);
    }

    #[test]
    fn repeated_loss_is_harmless() {
        let mut ctx = FakeContext::default();
        let mut r = started(&mut ctx, Instant::now());

        r.on_context_lost(&mut ctx);
        r.on_context_lost(&mut ctx);
        assert_eq!(r.state(), DriverState::Idle);
    }

    #[test]
    fn restore_while_running_does_not_duplicate() {
        let mut ctx = FakeContext::default();
        let mut r = started(&mut ctx, Instant::now());

        r.on_context_restored(&mut ctx, Instant::now()).unwrap();
        assert_eq!(ctx.live_programs.len(), 1);
        assert_eq!(ctx.live_buffers.len(), 3);
    }

    #[test]
    fn rotation_survives_loss() {
        let t0 = Instant::now();
        let mut ctx = FakeContext::default();
        let mut r = started(&mut ctx, t0);
        r.tick(&mut ctx, SIZE, t0).unwrap();
        r.tick(&mut ctx, SIZE, t0 + Duration::from_millis(1000)).unwrap();

        r.on_context_lost(&mut ctx);
        r.on_context_restored(&mut ctx, t0 + Duration::from_millis(1500)).unwrap();

        assert_eq!(r.rotation().degrees(), 30.0);
    }
}
