//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (pixels, world units, seconds, Hz)
//! - Documented ranges and meanings

mod camera;
mod render;
mod wave;

// Re-export all types
pub use camera::OrbitCamera;
pub use render::{MeshLayout, RenderConfig, SurfaceLayout};
pub use wave::{ParamRange, RippleConfig, WaveParams};
