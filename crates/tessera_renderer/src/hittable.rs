//! Hittable trait and HitRecord for ray-object intersection.

use crate::Material;
use tessera_math::{Interval, Ray, Vec2, Vec3};

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// The primitive that was hit (triangles carry per-vertex UVs)
    pub object: &'a dyn Hittable,
    /// Surface coordinates: spherical UV for spheres, barycentrics for triangles
    pub u: f64,
    pub v: f64,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record at parameter `t`, facing the normal against the ray.
    pub fn new(
        ray: &Ray,
        t: f64,
        outward_normal: Vec3,
        (u, v): (f64, f64),
        material: &'a dyn Material,
        object: &'a dyn Hittable,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            object,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the given interval.
    ///
    /// Returns the intersection record, or `None` on a miss.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>>;

    /// Per-vertex texture coordinates, for primitives that interpolate them.
    fn vertex_uvs(&self) -> Option<[Vec2; 3]> {
        None
    }
}

/// A list of hittable objects, searched linearly.
///
/// This is the scene root. It owns its children.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) else {
                continue;
            };

            // Strictly closer only: on a tie the earlier object keeps the hit
            if closest.is_none() || rec.t < closest_so_far {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Metal, Sphere, Triangle};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FORWARD: Interval = Interval::new(0.001, f64::INFINITY);

    fn red_metal() -> Metal {
        Metal::new(Vec3::new(1.0, 0.0, 0.0))
    }

    fn green_metal() -> Metal {
        Metal::new(Vec3::new(0.0, 1.0, 0.0))
    }

    /// Attenuation of whatever material the ray hit.
    fn hit_color(list: &HittableList, ray: &Ray) -> Vec3 {
        let rec = list.hit(ray, FORWARD).expect("ray should hit");
        let mut rng = StdRng::seed_from_u64(0);
        rec.material
            .scatter(ray, &rec, &mut rng)
            .expect("metal always scatters")
            .attenuation
    }

    #[test]
    fn test_closest_hit_wins_regardless_of_order() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let mut far_first = HittableList::new();
        far_first.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 0.5, red_metal())));
        far_first.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, green_metal())));

        let mut near_first = HittableList::new();
        near_first.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, green_metal())));
        near_first.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 0.5, red_metal())));

        for list in [&far_first, &near_first] {
            let rec = list.hit(&ray, FORWARD).unwrap();
            assert!((rec.t - 1.5).abs() < 1e-9);
            assert_eq!(hit_color(list, &ray), Vec3::new(0.0, 1.0, 0.0));
        }
    }

    #[test]
    fn test_farther_object_added_later_does_not_change_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let mut list = HittableList::new();
        list.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, green_metal())));
        let before = list.hit(&ray, FORWARD).unwrap().t;

        list.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -8.0), 1.0, red_metal())));
        let after = list.hit(&ray, FORWARD).unwrap().t;

        assert_eq!(before, after);
        assert_eq!(hit_color(&list, &ray), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_tie_keeps_first_object() {
        let ray = Ray::new(Vec3::new(0.1, 0.1, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let vertices = [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
        ];

        let mut list = HittableList::new();
        list.add(Box::new(Triangle::new(vertices[0], vertices[1], vertices[2], red_metal())));
        list.add(Box::new(Triangle::new(vertices[0], vertices[1], vertices[2], green_metal())));

        assert_eq!(hit_color(&list, &ray), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_list_misses() {
        let list = HittableList::default();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        assert!(list.is_empty());
        assert!(list.hit(&ray, FORWARD).is_none());
    }

    #[test]
    fn test_interval_bounds_respected() {
        let mut list = HittableList::new();
        list.add(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            0.5,
            Lambertian::new(Vec3::splat(0.5)),
        )));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        assert!(list.hit(&ray, Interval::new(0.001, 2.0)).is_none());
        assert!(list.hit(&ray, Interval::new(0.001, 3.0)).is_some());
    }

    #[test]
    fn test_face_normal_against_ray() {
        let mat = Lambertian::new(Vec3::ONE);
        let sphere = Sphere::new(Vec3::ZERO, 1.0, Lambertian::new(Vec3::ONE));

        let inward = Ray::new(Vec3::ZERO, Vec3::X);
        let rec = HitRecord::new(&inward, 1.0, Vec3::X, (0.0, 0.0), &mat, &sphere);

        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::X);
        assert_eq!(rec.p, Vec3::X);
    }
}
