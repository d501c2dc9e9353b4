//! CPU sample grid, re-evaluated from the wave field every tick.

use super::field::{Rgb, WaveField};
use crate::params::SurfaceLayout;

/// One cached grid point in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub x: f32,
    pub y: f32,
    pub height: f32,
    pub color: Rgb,
}

/// Square grid of surface samples centered in the frame
pub struct SampleGrid {
    points: Vec<GridPoint>,
    size: usize,
}

impl SampleGrid {
    /// Lay out a flat grid centered on a `frame_width × frame_height` frame
    pub fn new(layout: &SurfaceLayout, frame_width: u32, frame_height: u32) -> Self {
        let size = layout.grid_size;
        let extent = size as f32 * layout.spacing;
        let start_x = (frame_width / 2) as f32 - extent / 2.0;
        let start_y = (frame_height / 2) as f32 - extent / 2.0;

        let mut points = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                points.push(GridPoint {
                    x: start_x + col as f32 * layout.spacing,
                    y: start_y + row as f32 * layout.spacing,
                    height: 0.0,
                    color: Rgb::default(),
                });
            }
        }

        Self { points, size }
    }

    /// Overwrite every cached height and color from the field
    pub fn refresh(&mut self, field: &WaveField) {
        for point in &mut self.points {
            let sample = field.sample(point.x, point.y);
            point.height = sample.height;
            point.color = sample.color;
        }
    }

    /// Points per side
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn point(&self, row: usize, col: usize) -> &GridPoint {
        &self.points[row * self.size + col]
    }

    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::WaveParams;

    #[test]
    fn test_grid_layout_is_centered() {
        let layout = SurfaceLayout::default();
        let grid = SampleGrid::new(&layout, 1280, 720);

        assert_eq!(grid.size(), 50);
        assert_eq!(grid.points().len(), 2500);

        let first = grid.point(0, 0);
        assert_eq!((first.x, first.y), (265.0, -15.0));

        let last = grid.point(49, 49);
        assert_eq!((last.x, last.y), (265.0 + 49.0 * 15.0, -15.0 + 49.0 * 15.0));
    }

    #[test]
    fn test_refresh_matches_field_samples() {
        let layout = SurfaceLayout::default();
        let mut grid = SampleGrid::new(&layout, 1280, 720);
        let mut field = WaveField::new(WaveParams::screen());
        field.trigger_ripple(640.0, 360.0);
        field.update(0.25);

        grid.refresh(&field);

        for point in grid.points() {
            let expected = field.sample(point.x, point.y);
            assert_eq!(point.height, expected.height);
            assert_eq!(point.color, expected.color);
        }
    }
}
