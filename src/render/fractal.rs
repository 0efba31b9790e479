//! Escape-time Julia renderer with a slowly breathing zoom.
//!
//! Each frame is computed from scratch; the renderer itself is immutable.

use crate::error::RenderError;

/// Iteration cap for the escape-time loop
pub const MAX_ITERATIONS: u32 = 45;

/// Fixed Julia constant `c = -0.745 + 0.1i`
pub const JULIA_C: (f64, f64) = (-0.745, 0.1);

/// Squared escape radius
const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// Zoom breathing divisor in milliseconds (period ≈ 2π·1200 ms ≈ 7.5 s)
const ZOOM_PERIOD_DIVISOR_MS: f64 = 1200.0;
const ZOOM_AMPLITUDE: f64 = 0.2;

/// An RGBA pixel grid with dimensions fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    /// Create an opaque black buffer
    pub fn new(width: usize, height: usize) -> Self {
        let mut pixels = vec![0u8; width * height * 4];
        for px in pixels.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// RGBA at (x, y). Panics if out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let idx = (x + y * self.width) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        let idx = (x + y * self.width) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Row-major RGBA bytes, 4 per pixel
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        self.pixels.chunks_exact_mut(4)
    }

    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.pixels.chunks_exact(4)
    }
}

/// Zoom factor at `elapsed_ms`: `1 + 0.2·sin(t / 1200)`
pub fn zoom_at(elapsed_ms: f64) -> f64 {
    1.0 + ZOOM_AMPLITUDE * (elapsed_ms / ZOOM_PERIOD_DIVISOR_MS).sin()
}

/// Number of iterations of `z ← z² + c` performed before `|z|² ≥ 4`,
/// capped at [`MAX_ITERATIONS`] for points that never escape.
pub fn escape_iterations(mut zx: f64, mut zy: f64) -> u32 {
    let (cx, cy) = JULIA_C;
    let mut i = 0;
    while zx * zx + zy * zy < ESCAPE_RADIUS_SQ && i < MAX_ITERATIONS {
        let tmp = zx * zx - zy * zy + cx;
        zy = 2.0 * zx * zy + cy;
        zx = tmp;
        i += 1;
    }
    i
}

/// Map an iteration count to RGBA. Channels saturate at 255 instead of
/// wrapping, so interior points (`i = 45`) are solid white.
pub fn iteration_color(i: u32) -> [u8; 4] {
    let channel = |k: u32| i.saturating_mul(k).min(255) as u8;
    [channel(22), channel(8), channel(45), 255]
}

/// Computes one frame per call; holds only its fixed surface size.
#[derive(Clone, Debug)]
pub struct FractalRenderer {
    width: usize,
    height: usize,
}

impl FractalRenderer {
    /// Fails when the drawing surface has no area
    pub fn new(width: usize, height: usize) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSurface { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Map a screen pixel to its starting point in the complex plane
    pub fn screen_to_plane(&self, x: usize, y: usize, zoom: f64) -> (f64, f64) {
        let w = self.width as f64;
        let h = self.height as f64;
        let zx = 1.5 * (x as f64 - w / 2.0) / (0.55 * zoom * w);
        let zy = (y as f64 - h / 2.0) / (0.55 * zoom * h);
        (zx, zy)
    }

    /// Render a fresh frame for the given elapsed time
    pub fn render(&self, elapsed_ms: f64) -> FrameBuffer {
        let zoom = zoom_at(elapsed_ms);
        let mut frame = FrameBuffer::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let (zx, zy) = self.screen_to_plane(x, y, zoom);
                frame.set_pixel(x, y, iteration_color(escape_iterations(zx, zy)));
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mapping_is_clamped() {
        assert_eq!(iteration_color(45), [255, 255, 255, 255]);
        assert_eq!(iteration_color(1), [22, 8, 45, 255]);
        assert_eq!(iteration_color(0), [0, 0, 0, 255]);
        // 6·45 = 270 saturates blue, 12·22 = 264 saturates red
        assert_eq!(iteration_color(6), [132, 48, 255, 255]);
        assert_eq!(iteration_color(12), [255, 96, 255, 255]);
    }

    #[test]
    fn test_color_never_wraps() {
        for i in 0..=MAX_ITERATIONS {
            let [r, g, b, a] = iteration_color(i);
            assert_eq!(a, 255);
            assert!(r as u32 <= 255 && g as u32 <= 255 && b as u32 <= 255);
            assert_eq!(r as u32, (i * 22).min(255));
            assert_eq!(g as u32, (i * 8).min(255));
            assert_eq!(b as u32, (i * 45).min(255));
        }
    }

    #[test]
    fn test_escape_iterations_bounds() {
        // Far outside the escape radius: no iterations at all
        assert_eq!(escape_iterations(3.0, 3.0), 0);
        // Just inside: exactly one step before escaping
        assert_eq!(escape_iterations(1.9, 0.0), 1);
        // The origin's orbit outlasts the iteration cap
        assert_eq!(escape_iterations(0.0, 0.0), MAX_ITERATIONS);
    }

    #[test]
    fn test_zoom_breathes_between_bounds() {
        assert!((zoom_at(0.0) - 1.0).abs() < 1e-12);
        let peak = zoom_at(1200.0 * std::f64::consts::FRAC_PI_2);
        assert!((peak - 1.2).abs() < 1e-12);
        let trough = zoom_at(1200.0 * 3.0 * std::f64::consts::FRAC_PI_2);
        assert!((trough - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_renderer_rejects_empty_surface() {
        assert!(FractalRenderer::new(0, 10).is_err());
        assert!(FractalRenderer::new(10, 0).is_err());
        assert!(FractalRenderer::new(1, 1).is_ok());
    }

    #[test]
    fn test_center_pixel_is_interior_white() {
        let renderer = FractalRenderer::new(40, 30).unwrap();
        let frame = renderer.render(0.0);
        assert_eq!(frame.width(), 40);
        assert_eq!(frame.height(), 30);
        assert_eq!(frame.as_rgba().len(), 40 * 30 * 4);
        // Screen center maps to the origin, whose orbit outlasts the cap
        assert_eq!(frame.pixel(20, 15), [255, 255, 255, 255]);
    }

    #[test]
    fn test_render_is_deterministic_for_same_time() {
        let renderer = FractalRenderer::new(16, 12).unwrap();
        assert_eq!(renderer.render(500.0), renderer.render(500.0));
    }
}
