//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use tessera_math::{unit, Interval, Ray, Vec2, Vec3};

/// Determinants smaller than this mean the ray is parallel to the triangle.
const PARALLEL_EPSILON: f64 = 1e-8;

/// Texture coordinates used when none are given.
pub const DEFAULT_UVS: [Vec2; 3] = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)];

/// A triangle primitive.
pub struct Triangle<M: Material> {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length, from the winding order)
    normal: Vec3,
    /// Per-vertex texture coordinates
    uvs: [Vec2; 3],
    /// Material
    material: M,
}

impl<M: Material> Triangle<M> {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: M) -> Self {
        Self::with_uvs(v0, v1, v2, DEFAULT_UVS, material)
    }

    /// Create a triangle with per-vertex texture coordinates.
    pub fn with_uvs(v0: Vec3, v1: Vec3, v2: Vec3, uvs: [Vec2; 3], material: M) -> Self {
        let normal = unit((v1 - v0).cross(v2 - v0));

        Self {
            v0,
            v1,
            v2,
            normal,
            uvs,
            material,
        }
    }

    /// Outward face normal.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl<M: Material + 'static> Hittable for Triangle<M> {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle (or the triangle is degenerate)
        if a.abs() < PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);

        // Edges and vertices do not count as hits
        if u <= 0.0 || u >= 1.0 {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);

        if v <= 0.0 || u + v >= 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.contains(t) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            self.normal,
            (u, v),
            &self.material,
            self,
        ))
    }

    fn vertex_uvs(&self) -> Option<[Vec2; 3]> {
        Some(self.uvs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;

    const FORWARD: Interval = Interval::new(0.001, f64::INFINITY);

    fn grey() -> Lambertian {
        Lambertian::new(Vec3::splat(0.5))
    }

    /// Triangle in XY plane at z=-1, counter-clockwise seen from the origin
    fn facing_triangle() -> Triangle<Lambertian> {
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            grey(),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = facing_triangle();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = tri.hit(&ray, FORWARD).unwrap();
        assert!((rec.t - 1.0).abs() < 1e-9);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-9);

        // Barycentrics of the hit point
        assert!((rec.u - 0.25).abs() < 1e-9);
        assert!((rec.v - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = facing_triangle();

        // Ray pointing away
        let away = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(tri.hit(&away, FORWARD).is_none());

        // Ray outside the edges
        let outside = Ray::new(Vec3::new(0.9, 0.9, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(tri.hit(&outside, FORWARD).is_none());
    }

    #[test]
    fn test_triangle_edges_and_vertices_miss() {
        let tri = facing_triangle();
        let down_z = Vec3::new(0.0, 0.0, -1.0);

        // Through vertex v0
        let corner = Ray::new(Vec3::new(-1.0, -1.0, 0.0), down_z);
        assert!(tri.hit(&corner, FORWARD).is_none());

        // Through the middle of the bottom edge (v = 0)
        let bottom = Ray::new(Vec3::new(0.0, -1.0, 0.0), down_z);
        assert!(tri.hit(&bottom, FORWARD).is_none());

        // Through the middle of the right edge (u + v = 1)
        let right = Ray::new(Vec3::new(0.5, 0.0, 0.0), down_z);
        assert!(tri.hit(&right, FORWARD).is_none());

        // Just inside the bottom edge still hits
        let inside = Ray::new(Vec3::new(0.0, -0.99, 0.0), down_z);
        assert!(tri.hit(&inside, FORWARD).is_some());
    }

    #[test]
    fn test_triangle_parallel_ray() {
        let tri = facing_triangle();
        let ray = Ray::new(Vec3::new(-2.0, 0.0, -1.0), Vec3::X);

        assert!(tri.hit(&ray, FORWARD).is_none());
    }

    #[test]
    fn test_triangle_interval() {
        let tri = facing_triangle();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        assert!(tri.hit(&ray, Interval::new(0.001, 0.5)).is_none());
    }

    #[test]
    fn test_winding_flips_normal_not_outcome() {
        let ccw = facing_triangle();
        let cw = Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            grey(),
        );

        assert!((ccw.normal() + cw.normal()).length() < 1e-9);

        let ray = Ray::new(Vec3::new(0.1, -0.2, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let a = ccw.hit(&ray, FORWARD).unwrap();
        let b = cw.hit(&ray, FORWARD).unwrap();

        assert!((a.t - b.t).abs() < 1e-9);
        assert!(a.front_face);
        assert!(!b.front_face);
        // Stored normal faces the ray either way
        assert!((a.normal - b.normal).length() < 1e-9);
    }

    #[test]
    fn test_degenerate_triangle() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0, grey());
        let ray = Ray::new(Vec3::new(0.5, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));

        assert_eq!(tri.normal(), Vec3::ZERO);
        assert!(tri.hit(&ray, FORWARD).is_none());
    }

    #[test]
    fn test_vertex_uvs() {
        let uvs = [Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0), Vec2::new(0.5, 0.0)];
        let tri = Triangle::with_uvs(Vec3::ZERO, Vec3::X, Vec3::Y, uvs, grey());

        assert_eq!(tri.vertex_uvs(), Some(uvs));
        assert_eq!(facing_triangle().vertex_uvs(), Some(DEFAULT_UVS));
    }
}
