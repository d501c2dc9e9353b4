//! Per-mode simulation state driven by the event loop.
//!
//! Nothing here touches the window or the GPU, so the input handling and
//! frame production can be exercised headlessly.

use glam::{Mat4, Vec2};
use image::RgbaImage;

use crate::camera::{cursor_to_ndc, pick_surface_point, CameraSystem};
use crate::params::{OrbitCamera, RenderConfig, SurfaceLayout, WaveParams};
use crate::raster::SurfaceRaster;
use crate::rendering::{PointerState, WaveUniforms};
use crate::wave::{SampleGrid, WaveField};

/// Longest simulated time a snapshot may cover (seconds)
pub const MAX_SNAPSHOT_SECONDS: f32 = 3600.0;

/// CPU mode: sample grid, software raster, and the frame it draws into
pub struct CpuSurface {
    pub field: WaveField,
    grid: SampleGrid,
    raster: SurfaceRaster,
    frame: RgbaImage,
}

impl CpuSurface {
    pub fn new(layout: SurfaceLayout, frame_width: u32, frame_height: u32) -> Self {
        let field = WaveField::new(WaveParams::screen());
        let mut grid = SampleGrid::new(&layout, frame_width, frame_height);
        grid.refresh(&field);

        Self {
            field,
            grid,
            raster: SurfaceRaster::new(layout),
            frame: RgbaImage::new(frame_width, frame_height),
        }
    }

    /// Advance the field and resample the whole grid
    pub fn tick(&mut self, dt: f32) {
        self.field.update(dt);
        self.grid.refresh(&self.field);
    }

    /// Advance the field `ticks` times, resampling the grid once at the end
    pub fn fast_forward(&mut self, dt: f32, ticks: u32) {
        for _ in 0..ticks {
            self.field.update(dt);
        }
        self.grid.refresh(&self.field);
    }

    /// Rasterize the current grid into the frame
    pub fn redraw(&mut self) -> &RgbaImage {
        self.raster.render(&self.grid, &mut self.frame);
        &self.frame
    }

    /// Start a ripple at a frame pixel position
    pub fn click(&mut self, x: f32, y: f32) {
        self.field.trigger_ripple(x, y);
        self.grid.refresh(&self.field);
    }

    pub fn frame_size(&self) -> (u32, u32) {
        self.frame.dimensions()
    }
}

/// GPU mode: wave field, orbiting camera, and pointer state
pub struct GpuScene {
    pub field: WaveField,
    pub camera: CameraSystem,
    pointer: PointerState,
    /// Unscaled seconds since start; drives the camera orbit
    render_time: f32,
    /// Last cursor x while the right button is held
    drag_anchor: Option<f32>,
}

impl GpuScene {
    pub fn new(camera: OrbitCamera) -> Self {
        Self {
            field: WaveField::new(WaveParams::unit()),
            camera: CameraSystem::new(camera),
            pointer: PointerState::default(),
            render_time: 0.0,
            drag_anchor: None,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.field.update(dt);
        self.render_time += dt;
    }

    /// Track the cursor (pixels) and orbit the camera while dragging
    pub fn cursor_moved(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.pointer.ndc = cursor_to_ndc(x, y, width, height);
        if let Some(anchor) = self.drag_anchor {
            self.camera.drag(x - anchor);
            self.drag_anchor = Some(x);
        }
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.pointer.pressed = pressed;
    }

    pub fn begin_drag(&mut self, x: f32) {
        self.drag_anchor = Some(x);
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    pub fn view_proj(&self, config: &RenderConfig, aspect_ratio: f32) -> Mat4 {
        self.camera
            .create_view_proj_matrix(self.render_time, config, aspect_ratio)
            .0
    }

    /// Ripple at the water point under the cursor; returns the hit, if any
    pub fn click(&mut self, config: &RenderConfig, aspect_ratio: f32) -> Option<Vec2> {
        let view_proj = self.view_proj(config, aspect_ratio);
        let hit = pick_surface_point(view_proj, self.pointer.ndc)?;
        self.field.trigger_ripple(hit.x, hit.y);
        Some(hit)
    }

    pub fn uniforms(&self, config: &RenderConfig, aspect_ratio: f32) -> WaveUniforms {
        let (view_proj, eye) =
            self.camera
                .create_view_proj_matrix(self.render_time, config, aspect_ratio);
        WaveUniforms::new(
            &self.field,
            view_proj,
            eye,
            self.camera.light_position(),
            self.pointer,
            aspect_ratio,
        )
    }
}

/// Fixed ticks covering `time_s`, limited to `MAX_SNAPSHOT_SECONDS`
pub fn snapshot_ticks(time_s: f32, dt: f32) -> u32 {
    if !time_s.is_finite() || dt <= 0.0 {
        return 0;
    }
    (time_s.clamp(0.0, MAX_SNAPSHOT_SECONDS) / dt).round() as u32
}

/// Render the CPU surface headlessly after `time_s` seconds of fixed ticks.
///
/// `ripple` is triggered before the first tick.
pub fn render_snapshot(
    layout: SurfaceLayout,
    config: &RenderConfig,
    time_s: f32,
    ripple: Option<(f32, f32)>,
) -> RgbaImage {
    let mut surface = CpuSurface::new(layout, config.window_width, config.window_height);
    if let Some((x, y)) = ripple {
        surface.click(x, y);
    }

    let dt = config.tick_seconds();
    let ticks = snapshot_ticks(time_s, dt);
    surface.fast_forward(dt, ticks);
    log::debug!("Snapshot after {} ticks", ticks);

    surface.redraw().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_surface_tick_and_redraw() {
        let mut surface = CpuSurface::new(SurfaceLayout::default(), 320, 240);
        assert_eq!(surface.frame_size(), (320, 240));

        surface.tick(1.0 / 60.0);
        assert!(surface.field.elapsed_time() > 0.0);

        let background = SurfaceLayout::default().background;
        let frame = surface.redraw();
        let bg = image::Rgba([background[0], background[1], background[2], 255]);
        assert!(frame.pixels().any(|p| *p != bg));
    }

    #[test]
    fn test_cpu_click_starts_ripple() {
        let mut surface = CpuSurface::new(SurfaceLayout::default(), 1280, 720);
        surface.click(640.0, 360.0);
        let ripple = surface.field.ripple();
        assert!(ripple.active);
        assert_eq!((ripple.origin_x, ripple.origin_y), (640.0, 360.0));
    }

    #[test]
    fn test_snapshot_is_reproducible() {
        let config = RenderConfig {
            window_width: 200,
            window_height: 150,
            ..RenderConfig::default()
        };
        let a = render_snapshot(SurfaceLayout::default(), &config, 0.5, Some((100.0, 75.0)));
        let b = render_snapshot(SurfaceLayout::default(), &config, 0.5, Some((100.0, 75.0)));
        assert_eq!(a.dimensions(), (200, 150));
        assert_eq!(a.as_raw(), b.as_raw());

        let calm = render_snapshot(SurfaceLayout::default(), &config, 0.5, None);
        assert_ne!(a.as_raw(), calm.as_raw());
    }

    #[test]
    fn test_fast_forward_matches_ticking() {
        let mut stepped = CpuSurface::new(SurfaceLayout::default(), 200, 150);
        let mut skipped = CpuSurface::new(SurfaceLayout::default(), 200, 150);
        for _ in 0..30 {
            stepped.tick(1.0 / 60.0);
        }
        skipped.fast_forward(1.0 / 60.0, 30);
        assert_eq!(stepped.redraw().as_raw(), skipped.redraw().as_raw());
    }

    #[test]
    fn test_snapshot_ticks_are_bounded() {
        let dt = 1.0 / 60.0;
        let max_ticks = (MAX_SNAPSHOT_SECONDS * 60.0).round() as u32;
        assert_eq!(snapshot_ticks(0.5, dt), 30);
        assert_eq!(snapshot_ticks(MAX_SNAPSHOT_SECONDS, dt), max_ticks);
        assert_eq!(snapshot_ticks(1e9, dt), max_ticks);
        assert_eq!(snapshot_ticks(-5.0, dt), 0);
        assert_eq!(snapshot_ticks(f32::NAN, dt), 0);
        assert_eq!(snapshot_ticks(f32::INFINITY, dt), 0);
    }

    #[test]
    fn test_snapshot_at_max_time() {
        let config = RenderConfig {
            window_width: 64,
            window_height: 48,
            ..RenderConfig::default()
        };
        let frame = render_snapshot(
            SurfaceLayout::default(),
            &config,
            MAX_SNAPSHOT_SECONDS,
            Some((32.0, 24.0)),
        );
        assert_eq!(frame.dimensions(), (64, 48));
    }

    #[test]
    fn test_gpu_click_center_ripples_near_origin() {
        let mut scene = GpuScene::new(OrbitCamera::default());
        let config = RenderConfig::default();
        scene.cursor_moved(640.0, 360.0, 1280.0, 720.0);

        let hit = scene
            .click(&config, config.aspect_ratio())
            .expect("center should hit the water");
        assert!(hit.length() < 1e-3);
        assert!(scene.field.ripple().active);
    }

    #[test]
    fn test_gpu_drag_orbits_camera() {
        let mut scene = GpuScene::new(OrbitCamera::default());
        let before = scene.camera.eye_position(0.0);

        scene.begin_drag(100.0);
        scene.cursor_moved(160.0, 300.0, 1280.0, 720.0);
        scene.end_drag();
        scene.cursor_moved(400.0, 300.0, 1280.0, 720.0);

        let after = scene.camera.eye_position(0.0);
        let expected_angle = 60.0 * OrbitCamera::default().drag_sensitivity;
        assert!((after.x - expected_angle.sin() * 3.0).abs() < 1e-4);
        assert!(before.distance(after) > 0.1);
    }

    #[test]
    fn test_gpu_uniforms_follow_pointer() {
        let mut scene = GpuScene::new(OrbitCamera::default());
        let config = RenderConfig::default();
        scene.cursor_moved(0.0, 0.0, 1280.0, 720.0);
        scene.set_pressed(true);
        scene.tick(0.5);

        let uniforms = scene.uniforms(&config, config.aspect_ratio());
        assert_eq!(uniforms.mouse_pos, [-1.0, 1.0]);
        assert_eq!(uniforms.mouse_pressed, 1.0);
        assert!((uniforms.time - 0.5).abs() < 1e-6);
    }
}
