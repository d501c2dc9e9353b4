//! Water surface simulation: the wave field and the geometry built on it.

mod field;
mod grid;
mod mesh;

pub use field::{Rgb, Ripple, SurfaceSample, WaveField};
pub use grid::{GridPoint, SampleGrid};
pub use mesh::{Vertex, WaveMesh};
