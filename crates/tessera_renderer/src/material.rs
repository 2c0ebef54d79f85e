//! Material trait for surface scattering.

use std::sync::Arc;

use crate::{
    hittable::HitRecord,
    texture::{SolidColor, Texture},
};
use rand::RngCore;
use tessera_math::{gen_f64, near_zero, random_unit_vector, reflect, refract, unit, Color, Ray};

/// Result of a successful scatter: how much light survives and where it goes next.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;
}

/// Shared materials (many triangles of one mesh use the same material).
impl<M: Material + ?Sized> Material for Arc<M> {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        (**self).scatter(ray_in, rec, rng)
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::with_texture(SolidColor::new(albedo))
    }

    /// Create a Lambertian material whose albedo comes from a texture.
    pub fn with_texture(texture: impl Texture + 'static) -> Self {
        Self {
            albedo: Arc::new(texture),
        }
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p, Some(rec.object)),
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (perfect mirror) material.
#[derive(Debug, Clone, Copy)]
pub struct Metal {
    albedo: Color,
}

impl Metal {
    /// Create a new Metal material with the given reflectance color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction(), rec.normal);

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, reflected),
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy)]
pub struct Dielectric {
    /// Index of refraction
    refraction_index: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `refraction_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn new(refraction_index: f64) -> Self {
        Self { refraction_index }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f64, refraction_index: f64) -> f64 {
        // Matched indices: there is no interface to reflect from
        if refraction_index == 1.0 {
            return 0.0;
        }

        let r0 = ((1.0 - refraction_index) / (1.0 + refraction_index)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let ri = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = unit(ray_in.direction());
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection
        let cannot_refract = ri * sin_theta > 1.0;

        let direction = if cannot_refract || Self::reflectance(cos_theta, ri) > gen_f64(rng) {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, ri)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}
