//! Textures: spatially varying albedo for materials.

use std::sync::Arc;

use crate::Hittable;
use tessera_core::RgbaImage;
use tessera_math::{Color, Vec2, Vec3};

/// A color lookup over a surface.
pub trait Texture: Send + Sync {
    /// Color at surface coordinates `(u, v)` and world point `p`.
    ///
    /// `object` is the primitive that was hit, for textures that need its
    /// per-vertex data.
    fn value(&self, u: f64, v: f64, p: Vec3, object: Option<&dyn Hittable>) -> Color;
}

/// Constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Vec3, _object: Option<&dyn Hittable>) -> Color {
        self.albedo
    }
}

/// 3-D checker pattern selected by the sign of `sin(sx) sin(sy) sin(sz)`.
#[derive(Debug, Clone, Copy)]
pub struct CheckerTexture {
    scale: f64,
    odd: Color,
    even: Color,
}

impl CheckerTexture {
    pub fn new(scale: f64, odd: Color, even: Color) -> Self {
        Self { scale, odd, even }
    }
}

impl Texture for CheckerTexture {
    fn value(&self, _u: f64, _v: f64, p: Vec3, _object: Option<&dyn Hittable>) -> Color {
        let s = self.scale;
        let sines = (s * p.x).sin() * (s * p.y).sin() * (s * p.z).sin();

        if sines < 0.0 {
            self.odd
        } else {
            self.even
        }
    }
}

/// Nearest-pixel lookup into a decoded RGBA image.
///
/// Triangles map their barycentric `(u, v)` through the per-vertex UVs;
/// other primitives use `(u, v)` directly. Row 0 of the image is the top,
/// so `v` is flipped. Lookups outside the image are white.
#[derive(Clone)]
pub struct ImageTexture {
    image: Arc<RgbaImage>,
}

impl ImageTexture {
    pub fn new(image: Arc<RgbaImage>) -> Self {
        Self { image }
    }

    fn texel(&self, uv: Vec2) -> Color {
        let width = self.image.width() as f64;
        let height = self.image.height() as f64;

        let i = (uv.x * width).floor();
        let j = ((1.0 - uv.y) * height - 0.001).floor();

        // Also rejects NaN
        if !(0.0..width).contains(&i) || !(0.0..height).contains(&j) {
            return Color::ONE;
        }

        let [r, g, b, _] = self.image.get_pixel(i as u32, j as u32).0;
        Color::new(r as f64, g as f64, b as f64) / 255.0
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Vec3, object: Option<&dyn Hittable>) -> Color {
        let uv = match object.and_then(|o| o.vertex_uvs()) {
            Some([uv0, uv1, uv2]) => uv0 * (1.0 - u - v) + uv1 * u + uv2 * v,
            None => Vec2::new(u, v),
        };

        self.texel(uv)
    }
}
