//! wgpu plumbing: device/surface context, the CPU frame presenter, and the
//! GPU wave mesh pipeline.

mod context;
mod frame_blit;
mod shaders;
mod wave_pipeline;

pub use context::GpuContext;
pub use frame_blit::FramePresenter;
pub use shaders::{ShaderPair, FRAGMENT_FILE, VERTEX_FILE};
pub use wave_pipeline::{PointerState, WaveRenderer, WaveUniforms};
