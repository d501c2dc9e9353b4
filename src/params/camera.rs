//! Orbiting camera configuration for the GPU renderer.

/// Camera circling the water mesh at a fixed height, looking at the origin
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Horizontal distance from the look-at target (world units)
    pub radius: f32,

    /// Eye height above the water plane (world units)
    pub height: f32,

    /// Orbit angular speed (radians per second of render time)
    pub angular_speed: f32,

    /// Look-at target
    pub target: [f32; 3],

    /// Radians of yaw per pixel of right-button drag
    pub drag_sensitivity: f32,

    /// Point light position used for shading (world units)
    pub light_position: [f32; 3],
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            radius: 3.0,
            height: 2.0,
            angular_speed: 0.1,
            target: [0.0, 0.0, 0.0],
            drag_sensitivity: 0.01,
            light_position: [2.0, 5.0, 2.0],
        }
    }
}
