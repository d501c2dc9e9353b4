//! Static water mesh for the GPU renderer.
//!
//! The mesh is a flat XZ plane; the vertex shader displaces it every frame,
//! so it is generated and uploaded exactly once.

use bytemuck::{Pod, Zeroable};

use crate::params::MeshLayout;

/// Vertex data for the water mesh (position + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Flat grid spanning `[-1, 1]` on x and z
pub struct WaveMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    vertices_per_side: usize,
}

impl WaveMesh {
    pub fn new(layout: &MeshLayout) -> Self {
        let n = layout.vertices_per_side.max(2);
        let step = 2.0 / (n - 1) as f32;
        let last = (n - 1) as f32;

        let mut vertices = Vec::with_capacity(n * n);
        for z in 0..n {
            for x in 0..n {
                vertices.push(Vertex {
                    position: [x as f32 * step - 1.0, 0.0, z as f32 * step - 1.0],
                    uv: [x as f32 / last, z as f32 / last],
                });
            }
        }

        // Two triangles per cell, counter-clockwise seen from above
        let mut indices = Vec::with_capacity((n - 1) * (n - 1) * 6);
        for z in 0..n - 1 {
            for x in 0..n - 1 {
                let top_left = (z * n + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * n + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self {
            vertices,
            indices,
            vertices_per_side: n,
        }
    }

    pub fn vertices_per_side(&self) -> usize {
        self.vertices_per_side
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}
