//! Tessera Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over spheres, triangles and a ground plane,
//! with diffuse, metal and glass materials. Images are split into tiles
//! that render on independent worker threads and are composited as they
//! finish.

mod camera;
mod error;
mod hittable;
mod material;
mod plane;
mod renderer;
mod sphere;
mod texture;
mod tile;
mod triangle;
mod world;

pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use plane::InfinitePlane;
pub use renderer::{
    color_to_rgba, linear_to_gamma, ray_color, sky_gradient, PixelBuffer, PixelRect,
};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, SolidColor, Texture};
pub use tile::{
    generate_tiles, render_tile, RenderConfig, Tile, TileRenderer, TileRequest, TileResult,
    DEFAULT_TILE_GRID,
};
pub use triangle::{Triangle, DEFAULT_UVS};
pub use world::build_world;

/// Re-export the math types used throughout the public API
pub use tessera_math::{Color, Interval, Ray, Vec2, Vec3};
