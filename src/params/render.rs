//! Window, projection, and frame-loop configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,

    /// Simulation tick rate (Hz)
    pub tick_rate_hz: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 45.0,
            near_plane: 0.1,
            far_plane: 100.0,
            tick_rate_hz: 60.0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }

    /// Fixed simulation step (seconds)
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate_hz
    }
}

/// CPU surface grid layout and software raster settings
#[derive(Debug, Clone)]
pub struct SurfaceLayout {
    /// Points per side of the sample grid
    pub grid_size: usize,

    /// Distance between neighbouring points (pixels)
    pub spacing: f32,

    /// Height-to-depth factor of the one-point perspective
    pub perspective: f32,

    /// Frame clear color (8-bit RGB)
    pub background: [u8; 3],

    /// Wireframe line opacity
    pub wire_alpha: f32,
}

impl Default for SurfaceLayout {
    fn default() -> Self {
        Self {
            grid_size: 50,
            spacing: 15.0,
            perspective: 0.002,
            background: [20, 30, 50],
            wire_alpha: 0.2,
        }
    }
}

/// Static GPU mesh resolution
#[derive(Debug, Clone)]
pub struct MeshLayout {
    /// Vertices per side; the mesh spans `[-1, 1]` on x and z
    pub vertices_per_side: usize,
}

impl Default for MeshLayout {
    fn default() -> Self {
        Self {
            vertices_per_side: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_seconds() {
        let config = RenderConfig::default();
        assert!((config.tick_seconds() - 1.0 / 60.0).abs() < 1e-7);
    }

    #[test]
    fn test_aspect_ratio() {
        let config = RenderConfig::default();
        assert!((config.aspect_ratio() - 16.0 / 9.0).abs() < 1e-5);
    }
}
