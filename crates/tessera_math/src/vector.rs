//! Vector helpers the scattering code needs on top of glam.

use crate::Vec3;
use rand::{Rng, RngCore};

/// Squared lengths below this count as zero.
const NEAR_ZERO: f64 = 1e-8;

/// Uniform random number in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Normalize `v`, returning zero for (near) zero-length input instead of NaN.
#[inline]
pub fn unit(v: Vec3) -> Vec3 {
    if v.length_squared() < NEAR_ZERO * NEAR_ZERO {
        Vec3::ZERO
    } else {
        v / v.length()
    }
}

/// True if every component of `v` is close to zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    let s = NEAR_ZERO;
    v.x.abs() < s && v.y.abs() < s && v.z.abs() < s
}

/// Reflect `v` about the normal `n`: `v - 2 (v . n) n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with normal `n`.
///
/// `eta_ratio` is the ratio of refractive indices (incident over transmitted).
/// Total internal reflection must be ruled out by the caller.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, eta_ratio: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = eta_ratio * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Uniformly distributed unit vector.
///
/// Rejection samples the unit cube until a point falls inside the unit ball
/// (and away from the origin), then projects it onto the sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f64(rng) * 2.0 - 1.0,
            gen_f64(rng) * 2.0 - 1.0,
            gen_f64(rng) * 2.0 - 1.0,
        );
        let len_sq = p.length_squared();
        if 1e-160 < len_sq && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Random unit vector in the hemisphere around `normal`.
pub fn random_on_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let on_unit_sphere = random_unit_vector(rng);
    if on_unit_sphere.dot(normal) > 0.0 {
        on_unit_sphere
    } else {
        -on_unit_sphere
    }
}
