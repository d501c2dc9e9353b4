//! Orbiting camera for the GPU renderer, plus cursor picking on the water plane.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::params::{OrbitCamera, RenderConfig};

/// Below this squared length a camera basis vector counts as degenerate
const BASIS_EPSILON: f32 = 1e-8;

/// Camera circling the water at fixed height, steered by right-button drags
pub struct CameraSystem {
    params: OrbitCamera,
    yaw_offset: f32,
}

impl CameraSystem {
    pub fn new(params: OrbitCamera) -> Self {
        Self {
            params,
            yaw_offset: 0.0,
        }
    }

    /// Eye position after `time_s` seconds of render time
    pub fn eye_position(&self, time_s: f32) -> Vec3 {
        let angle = time_s * self.params.angular_speed + self.yaw_offset;
        Vec3::new(
            angle.sin() * self.params.radius,
            self.params.height,
            angle.cos() * self.params.radius,
        )
    }

    pub fn target(&self) -> Vec3 {
        Vec3::from_array(self.params.target)
    }

    pub fn light_position(&self) -> Vec3 {
        Vec3::from_array(self.params.light_position)
    }

    /// Rotate the orbit by a horizontal drag of `dx` pixels
    pub fn drag(&mut self, dx: f32) {
        self.yaw_offset += dx * self.params.drag_sensitivity;
    }

    /// Create view-projection matrix for rendering
    ///
    /// # Returns
    /// Tuple of (view_proj_matrix, camera_position)
    pub fn create_view_proj_matrix(
        &self,
        time_s: f32,
        render_config: &RenderConfig,
        aspect_ratio: f32,
    ) -> (Mat4, Vec3) {
        let eye = self.eye_position(time_s);
        let view = look_at(eye, self.target(), Vec3::Y);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            aspect_ratio.max(f32::EPSILON),
            render_config.near_plane,
            render_config.far_plane,
        );
        (proj * view, eye)
    }
}

/// Right-handed look-at that never divides by a zero-length basis vector.
///
/// When the eye sits on the target, or looks straight along `up`, there is no
/// well-defined orientation; the view degrades to a plain translation.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let forward = target - eye;
    if forward.length_squared() < BASIS_EPSILON
        || forward.cross(up).length_squared() < BASIS_EPSILON * forward.length_squared()
    {
        log::trace!("Degenerate camera basis at eye {:?}", eye);
        return Mat4::from_translation(-eye);
    }
    Mat4::look_at_rh(eye, target, up)
}

/// Convert a cursor position in pixels to normalized device coordinates
/// (`[-1, 1]`, y up)
pub fn cursor_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        (x / width.max(1.0)) * 2.0 - 1.0,
        (1.0 - y / height.max(1.0)) * 2.0 - 1.0,
    )
}

/// Intersect the ray under `ndc` with the `y = 0` plane.
///
/// Returns the hit as `(x, z)`, or `None` when the ray runs parallel to or
/// away from the plane.
pub fn pick_surface_point(view_proj: Mat4, ndc: Vec2) -> Option<Vec2> {
    let inverse = view_proj.inverse();
    let near = inverse * ndc.extend(0.0).extend(1.0);
    let far = inverse * ndc.extend(1.0).extend(1.0);
    if near.w.abs() < f32::EPSILON || far.w.abs() < f32::EPSILON {
        return None;
    }
    let near = near.xyz() / near.w;
    let far = far.xyz() / far.w;

    let direction = far - near;
    if direction.y.abs() < f32::EPSILON {
        return None;
    }
    let t = -near.y / direction.y;
    if !t.is_finite() || t < 0.0 {
        return None;
    }
    let hit = near + direction * t;
    Some(Vec2::new(hit.x, hit.z))
}
