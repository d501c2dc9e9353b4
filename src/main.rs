//! Wavesim - an animated water surface you can poke.
//!
//! CPU mode draws a perspective grid in software; GPU mode displaces a mesh
//! in the vertex shader under an orbiting camera. Both tick at a fixed rate
//! and redraw only after a tick.

use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use wavesim::cli::{Args, Mode};
use wavesim::controls::{action_for_key, status_line, CONTROLS_HELP};
use wavesim::demo::{render_snapshot, CpuSurface, GpuScene};
use wavesim::params::{MeshLayout, OrbitCamera, RenderConfig, SurfaceLayout};
use wavesim::rendering::{FramePresenter, GpuContext, WaveRenderer};
use wavesim::wave::{WaveField, WaveMesh};

/// Mode-specific state and its GPU resources
enum Demo {
    Cpu {
        surface: CpuSurface,
        presenter: Option<FramePresenter>,
    },
    Gpu {
        scene: GpuScene,
        renderer: Option<WaveRenderer>,
    },
}

impl Demo {
    fn field(&self) -> &WaveField {
        match self {
            Demo::Cpu { surface, .. } => &surface.field,
            Demo::Gpu { scene, .. } => &scene.field,
        }
    }

    fn field_mut(&mut self) -> &mut WaveField {
        match self {
            Demo::Cpu { surface, .. } => &mut surface.field,
            Demo::Gpu { scene, .. } => &mut scene.field,
        }
    }

    fn tick(&mut self, dt: f32) {
        match self {
            Demo::Cpu { surface, .. } => surface.tick(dt),
            Demo::Gpu { scene, .. } => scene.tick(dt),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Demo::Cpu { .. } => "CPU",
            Demo::Gpu { .. } => "GPU",
        }
    }
}

/// Main application state
struct App {
    args: Args,
    render_config: RenderConfig,

    // Window and rendering
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,

    demo: Demo,

    // Input
    cursor: PhysicalPosition<f64>,

    // Fixed-rate ticking
    next_tick: Instant,
    redraw_pending: bool,

    exit_code: i32,
}

impl App {
    fn new(args: Args) -> Self {
        let render_config = RenderConfig::default();
        let demo = match args.mode {
            Mode::Cpu => Demo::Cpu {
                surface: CpuSurface::new(
                    SurfaceLayout::default(),
                    render_config.window_width,
                    render_config.window_height,
                ),
                presenter: None,
            },
            Mode::Gpu => Demo::Gpu {
                scene: GpuScene::new(OrbitCamera::default()),
                renderer: None,
            },
        };

        Self {
            args,
            render_config,
            window: None,
            gpu: None,
            demo,
            cursor: PhysicalPosition::new(0.0, 0.0),
            next_tick: Instant::now(),
            redraw_pending: true,
            exit_code: 0,
        }
    }

    /// Create the GPU context and the mode's renderer
    fn init_graphics(&mut self, window: Arc<Window>) -> Result<(), String> {
        let gpu = pollster::block_on(GpuContext::new(Arc::clone(&window)))?;

        match &mut self.demo {
            Demo::Cpu { surface, presenter } => {
                let (width, height) = surface.frame_size();
                *presenter = Some(pollster::block_on(FramePresenter::new(&gpu, width, height))?);
            }
            Demo::Gpu { renderer, .. } => {
                let mesh = WaveMesh::new(&MeshLayout::default());
                let wave_renderer =
                    pollster::block_on(WaveRenderer::new(&gpu, &mesh, &self.args.shader_dir))?;
                log::info!("Using shaders: {}", wave_renderer.shader_origin());
                *renderer = Some(wave_renderer);
            }
        }

        self.gpu = Some(gpu);
        Ok(())
    }

    fn refresh_title(&self) {
        if let Some(window) = &self.window {
            window.set_title(&format!(
                "Wave Simulation ({}) - {}",
                self.demo.label(),
                status_line(self.demo.field())
            ));
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, message: &str) {
        log::error!("{}", message);
        self.exit_code = 1;
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key_code: KeyCode) {
        if key_code == KeyCode::Escape {
            event_loop.exit();
            return;
        }
        if let Some(action) = action_for_key(key_code) {
            action.apply(self.demo.field_mut());
            self.refresh_title();
        }
    }

    fn handle_cursor(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = position;
        let Some(window) = &self.window else {
            return;
        };
        let size = window.inner_size();

        if let Demo::Gpu { scene, .. } = &mut self.demo {
            scene.cursor_moved(
                position.x as f32,
                position.y as f32,
                size.width as f32,
                size.height as f32,
            );
        }
    }

    fn handle_mouse_button(&mut self, state: ElementState, button: MouseButton) {
        let pressed = state == ElementState::Pressed;
        let Some(window) = &self.window else {
            return;
        };
        let size = window.inner_size();
        let aspect_ratio = self
            .gpu
            .as_ref()
            .map_or(self.render_config.aspect_ratio(), GpuContext::aspect_ratio);

        match (&mut self.demo, button) {
            (Demo::Cpu { surface, .. }, MouseButton::Left) if pressed => {
                // Window pixels to frame pixels
                let (frame_w, frame_h) = surface.frame_size();
                let x = self.cursor.x as f32 * frame_w as f32 / size.width.max(1) as f32;
                let y = self.cursor.y as f32 * frame_h as f32 / size.height.max(1) as f32;
                surface.click(x, y);
            }
            (Demo::Gpu { scene, .. }, MouseButton::Left) => {
                scene.set_pressed(pressed);
                if pressed && scene.click(&self.render_config, aspect_ratio).is_none() {
                    log::debug!("Click missed the water plane");
                }
            }
            (Demo::Gpu { scene, .. }, MouseButton::Right) => {
                if pressed {
                    scene.begin_drag(self.cursor.x as f32);
                } else {
                    scene.end_drag();
                }
            }
            _ => {}
        }
    }

    /// Draw the current state; called only on redraw requests
    fn render_frame(&mut self) {
        let Some(gpu) = &self.gpu else {
            return;
        };

        match &mut self.demo {
            Demo::Cpu { surface, presenter } => {
                let Some(presenter) = presenter else {
                    return;
                };
                let frame = surface.redraw();
                presenter.upload(gpu, frame);
                presenter.render(gpu);
            }
            Demo::Gpu { scene, renderer } => {
                let Some(renderer) = renderer else {
                    return;
                };
                let uniforms = scene.uniforms(&self.render_config, gpu.aspect_ratio());
                renderer.update_uniforms(gpu, &uniforms);
                renderer.render(gpu);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause {
            let tick = self.render_config.tick_seconds();
            self.demo.tick(tick);
            self.redraw_pending = true;

            let now = Instant::now();
            self.next_tick += Duration::from_secs_f32(tick);
            // Don't try to catch up after a stall
            if self.next_tick < now {
                self.next_tick = now + Duration::from_secs_f32(tick);
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if !self.redraw_pending {
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Wave Simulation")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, &format!("Failed to create window: {}", e));
                return;
            }
        };

        if let Err(e) = self.init_graphics(Arc::clone(&window)) {
            self.fail(event_loop, &format!("Failed to initialize rendering: {}", e));
            return;
        }

        log::info!("Wave simulation running ({} mode)", self.demo.label());
        for line in CONTROLS_HELP {
            log::info!("  {}", line);
        }

        self.window = Some(window);
        self.refresh_title();

        self.next_tick = Instant::now() + Duration::from_secs_f32(self.render_config.tick_seconds());
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key_code),
            WindowEvent::CursorMoved { position, .. } => self.handle_cursor(position),
            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_mouse_button(state, button)
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                    if let Demo::Gpu {
                        renderer: Some(renderer),
                        ..
                    } = &mut self.demo
                    {
                        renderer.resize(gpu);
                    }
                }
                self.redraw_pending = true;
            }
            WindowEvent::RedrawRequested => {
                self.redraw_pending = false;
                self.render_frame();
            }
            _ => {}
        }
    }
}

/// Headless CPU render to a PNG
fn write_snapshot(args: &Args) -> Result<(), String> {
    let Some(path) = &args.snapshot else {
        return Ok(());
    };
    if args.mode == Mode::Gpu {
        log::warn!("Snapshots always use the CPU renderer");
    }

    let frame = render_snapshot(
        SurfaceLayout::default(),
        &RenderConfig::default(),
        args.time,
        args.ripple,
    );
    frame
        .save(path)
        .map_err(|e| format!("Failed to write snapshot {}: {}", path.display(), e))?;
    log::info!("Snapshot written to {}", path.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.snapshot.is_some() {
        if let Err(e) = write_snapshot(&args) {
            log::error!("{}", e);
            std::process::exit(1);
        }
        return;
    }

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };

    let mut app = App::new(args);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        std::process::exit(1);
    }
    if app.exit_code != 0 {
        std::process::exit(app.exit_code);
    }
}
