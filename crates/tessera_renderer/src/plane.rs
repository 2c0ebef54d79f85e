//! Unbounded horizontal ground plane.
//!
//! Cheaper than approximating the ground with a huge sphere.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use tessera_math::{Interval, Ray, Vec3};

/// Horizontal plane `y = height` with normal +Y.
pub struct InfinitePlane<M: Material> {
    height: f64,
    material: M,
}

impl<M: Material> InfinitePlane<M> {
    /// Create a new plane at the given height.
    pub fn new(height: f64, material: M) -> Self {
        Self { height, material }
    }
}

impl<M: Material + 'static> Hittable for InfinitePlane<M> {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let dy = ray.direction().y;
        if dy == 0.0 {
            return None;
        }

        let t = (self.height - ray.origin().y) / dy;
        if t <= 0.0 || !ray_t.contains(t) {
            return None;
        }

        // Unit tiling across the plane
        let p = ray.at(t);
        let uv = (p.x.rem_euclid(1.0), p.z.rem_euclid(1.0));

        Some(HitRecord::new(ray, t, Vec3::Y, uv, &self.material, self))
    }
}
