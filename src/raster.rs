//! Software rasterizer for the CPU renderer.
//!
//! Each grid cell is projected with a one-point perspective and drawn as two
//! flat-colored triangles plus two faint wireframe edges into an RGBA frame.

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::params::SurfaceLayout;
use crate::wave::{GridPoint, Rgb, SampleGrid};

/// Triangle in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    pub points: [Vec2; 3],
    pub color: Rgb,
}

/// Project a displaced grid point onto the frame.
///
/// Higher points are pulled toward the frame origin and lifted by their
/// height: `scale = 1 / (1 + height * perspective)`.
pub fn project(point: &GridPoint, perspective: f32) -> Vec2 {
    let scale = 1.0 / (1.0 + point.height * perspective);
    Vec2::new(point.x * scale, (point.y - point.height) * scale)
}

/// Convert a `[0, 1]` color to 8-bit RGBA
pub fn to_rgba8(color: Rgb, alpha: u8) -> Rgba<u8> {
    let c = color.clamped();
    Rgba([
        (c.r * 255.0).round() as u8,
        (c.g * 255.0).round() as u8,
        (c.b * 255.0).round() as u8,
        alpha,
    ])
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Fill every pixel whose center lies inside the triangle (either winding)
pub fn fill_triangle(frame: &mut RgbaImage, points: [Vec2; 3], color: Rgba<u8>) {
    let [a, b, c] = points;
    let area = edge(a, b, c);
    if area == 0.0 || !area.is_finite() {
        return;
    }

    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let min = a.min(b).min(c).floor().max(Vec2::ZERO);
    let max = a
        .max(b)
        .max(c)
        .ceil()
        .min(Vec2::new((width - 1) as f32, (height - 1) as f32));
    if min.x > max.x || min.y > max.y {
        return;
    }

    for py in min.y as u32..=max.y as u32 {
        for px in min.x as u32..=max.x as u32 {
            let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
            let w0 = edge(b, c, p);
            let w1 = edge(c, a, p);
            let w2 = edge(a, b, p);

            let inside = if area > 0.0 {
                w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
            } else {
                w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0
            };
            if inside {
                frame.put_pixel(px, py, color);
            }
        }
    }
}

fn blend_pixel(frame: &mut RgbaImage, x: i64, y: i64, color: Rgb, alpha: f32) {
    let (width, height) = frame.dimensions();
    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
        return;
    }
    let dst = frame.get_pixel_mut(x as u32, y as u32);
    let src = to_rgba8(color, 255);
    for channel in 0..3 {
        let mixed = src[channel] as f32 * alpha + dst[channel] as f32 * (1.0 - alpha);
        dst[channel] = mixed.round().clamp(0.0, 255.0) as u8;
    }
}

/// Alpha-blend a one-pixel line from `from` to `to`
pub fn blend_line(frame: &mut RgbaImage, from: Vec2, to: Vec2, color: Rgb, alpha: f32) {
    let delta = to - from;
    let steps = delta.x.abs().max(delta.y.abs()).ceil();
    if !steps.is_finite() {
        return;
    }
    let steps = steps.max(1.0) as u32;

    for i in 0..=steps {
        let p = from + delta * (i as f32 / steps as f32);
        blend_pixel(frame, p.x.floor() as i64, p.y.floor() as i64, color, alpha);
    }
}

/// Draws a `SampleGrid` into an RGBA frame
pub struct SurfaceRaster {
    layout: SurfaceLayout,
}

impl SurfaceRaster {
    pub fn new(layout: SurfaceLayout) -> Self {
        Self { layout }
    }

    /// The two triangles covering cell `(row, col)`, colored with the mean of
    /// the cell's four corners
    pub fn cell_triangles(&self, grid: &SampleGrid, row: usize, col: usize) -> [ScreenTriangle; 2] {
        let p1 = grid.point(row, col);
        let p2 = grid.point(row, col + 1);
        let p3 = grid.point(row + 1, col);
        let p4 = grid.point(row + 1, col + 1);

        let color = Rgb::average(&[p1.color, p2.color, p3.color, p4.color]);
        let [s1, s2, s3, s4] = [p1, p2, p3, p4].map(|p| project(p, self.layout.perspective));

        [
            ScreenTriangle {
                points: [s1, s2, s3],
                color,
            },
            ScreenTriangle {
                points: [s2, s3, s4],
                color,
            },
        ]
    }

    /// Clear the frame and draw the whole surface
    pub fn render(&self, grid: &SampleGrid, frame: &mut RgbaImage) {
        let [r, g, b] = self.layout.background;
        for pixel in frame.pixels_mut() {
            *pixel = Rgba([r, g, b, 255]);
        }

        let size = grid.size();
        if size < 2 {
            return;
        }
        let wire = Rgb::new(1.0, 1.0, 1.0);

        for row in 0..size - 1 {
            for col in 0..size - 1 {
                let triangles = self.cell_triangles(grid, row, col);
                for triangle in &triangles {
                    fill_triangle(frame, triangle.points, to_rgba8(triangle.color, 255));
                }

                // Wireframe: top and left edges of the cell
                let [s1, s2, s3] = triangles[0].points;
                blend_line(frame, s1, s2, wire, self.layout.wire_alpha);
                blend_line(frame, s1, s3, wire, self.layout.wire_alpha);
            }
        }
    }
}
