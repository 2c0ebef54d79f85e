//! Core path tracing integrator and pixel output.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative bounce loop with configurable depth
//! - Sky gradient background
//! - Gamma 2 encoding into RGBA8

use crate::Hittable;
use image::RgbaImage;
use rand::RngCore;
use tessera_math::{unit, Color, Interval, Ray};

/// Lower bound on hit distance; avoids self-intersection acne.
const SHADOW_EPSILON: f64 = 0.001;

/// Compute the color seen by a ray.
///
/// Follows the path for at most `max_depth` bounces, multiplying the
/// attenuation of every surface it scatters off. A path that escapes picks
/// up the sky; one that is absorbed or runs out of bounces is black.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, max_depth: u32, rng: &mut dyn RngCore) -> Color {
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..max_depth {
        let Some(rec) = world.hit(&ray, Interval::new(SHADOW_EPSILON, f64::INFINITY)) else {
            return throughput * sky_gradient(&ray);
        };

        match rec.material.scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= result.attenuation;
                ray = result.scattered;
            }
            None => return Color::ZERO,
        }
    }

    Color::ZERO
}

/// Linear white-to-blue gradient on the ray's vertical direction.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = unit(ray.direction());
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-encoded 8-bit RGBA (alpha 255).
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let intensity = Interval::new(0.0, 0.999);
    let encode = |c: f64| (intensity.clamp(linear_to_gamma(c)) * 254.999).round() as u8;

    [encode(color.x), encode(color.y), encode(color.z), 255]
}

/// A rectangle of pixels in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// X coordinate of the top-left corner
    pub x: u32,
    /// Y coordinate of the top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// The whole image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Get the total number of pixels in this rectangle.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True if the two rectangles share at least one pixel.
    pub fn overlaps(&self, other: &PixelRect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Row-major RGBA8 pixel buffer.
///
/// Byte offset of local pixel `(x, y)` channel `c` is `y * width * 4 + x * 4 + c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a new buffer filled with opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        let data = [0, 0, 0, 255].repeat(width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Buffer sized to hold `rect`.
    pub fn for_rect(rect: PixelRect) -> Self {
        Self::new(rect.width, rect.height)
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Copy `src` into this buffer with its top-left corner at `(x, y)`.
    ///
    /// Rows or columns falling outside this buffer are dropped.
    pub fn blit(&mut self, src: &PixelBuffer, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let cols = src.width.min(self.width - x) as usize;
        let rows = src.height.min(self.height - y);

        for row in 0..rows {
            let from = src.offset(0, row);
            let to = self.offset(x, y + row);
            self.data[to..to + cols * 4].copy_from_slice(&src.data[from..from + cols * 4]);
        }
    }

    /// Convert to an `image` buffer (for saving).
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }
}
