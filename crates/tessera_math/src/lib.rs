//! Tessera math: vectors, intervals and rays shared by the renderer.
//!
//! Vectors are double precision (`glam::DVec3`). Points, directions and
//! linear colors all use the same type.

pub use glam;

mod interval;
mod ray;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{
    gen_f64, near_zero, random_on_hemisphere, random_unit_vector, reflect, refract, unit,
};

/// 3-component double precision vector.
pub type Vec3 = glam::DVec3;

/// 2-component double precision vector (texture coordinates).
pub type Vec2 = glam::DVec2;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;
