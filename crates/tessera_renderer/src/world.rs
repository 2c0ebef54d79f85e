//! Turn a scene description into renderable primitives.

use std::sync::Arc;

use crate::{
    CheckerTexture, Dielectric, HittableList, ImageTexture, InfinitePlane, Lambertian, Material,
    Metal, RenderResult, Sphere, Triangle,
};
use tessera_core::{
    MaterialDescription, ObjectDescription, SceneDescription, TextureCache, TextureDescription,
};
use tessera_math::{Color, Vec2, Vec3};

/// Build the scene root from a description.
///
/// Image textures are loaded through `textures`, so objects sharing an
/// image share one decoded buffer.
pub fn build_world(scene: &SceneDescription, textures: &mut TextureCache) -> RenderResult<HittableList> {
    let mut world = HittableList::new();

    for object in &scene.objects {
        match object {
            ObjectDescription::Sphere {
                center,
                radius,
                material,
            } => {
                let material = build_material(material, textures)?;
                world.add(Box::new(Sphere::new(
                    Vec3::from_array(*center),
                    *radius,
                    material,
                )));
            }
            ObjectDescription::Triangle {
                vertices: [v0, v1, v2],
                uvs,
                material,
            } => {
                let material = build_material(material, textures)?;
                let triangle = match uvs {
                    Some(uvs) => Triangle::with_uvs(
                        Vec3::from_array(*v0),
                        Vec3::from_array(*v1),
                        Vec3::from_array(*v2),
                        uvs.map(Vec2::from_array),
                        material,
                    ),
                    None => Triangle::new(
                        Vec3::from_array(*v0),
                        Vec3::from_array(*v1),
                        Vec3::from_array(*v2),
                        material,
                    ),
                };
                world.add(Box::new(triangle));
            }
            ObjectDescription::Plane { height, material } => {
                let material = build_material(material, textures)?;
                world.add(Box::new(InfinitePlane::new(*height, material)));
            }
        }
    }

    log::debug!("Built world with {} objects", world.len());
    Ok(world)
}

fn build_material(
    desc: &MaterialDescription,
    textures: &mut TextureCache,
) -> RenderResult<Arc<dyn Material>> {
    let material: Arc<dyn Material> = match desc {
        MaterialDescription::Lambertian { texture } => Arc::new(build_lambertian(texture, textures)?),
        MaterialDescription::Metal { albedo } => Arc::new(Metal::new(Color::from_array(*albedo))),
        MaterialDescription::Dielectric { refraction_index } => {
            Arc::new(Dielectric::new(*refraction_index))
        }
    };

    Ok(material)
}

fn build_lambertian(desc: &TextureDescription, textures: &mut TextureCache) -> RenderResult<Lambertian> {
    let lambertian = match desc {
        TextureDescription::Solid { color } => Lambertian::new(Color::from_array(*color)),
        TextureDescription::Checker { scale, odd, even } => Lambertian::with_texture(
            CheckerTexture::new(*scale, Color::from_array(*odd), Color::from_array(*even)),
        ),
        TextureDescription::Image { path } => {
            Lambertian::with_texture(ImageTexture::new(textures.load(path)?))
        }
    };

    Ok(lambertian)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hittable, RenderError};
    use tessera_core::{demo, RgbaImage};
    use tessera_math::{Interval, Ray};

    #[test]
    fn test_build_three_spheres() {
        let world = build_world(&demo::three_spheres(), &mut TextureCache::new()).unwrap();
        assert_eq!(world.len(), 4);

        // Straight down from above the centre sphere hits its top
        let ray = Ray::new(Vec3::new(0.0, 5.0, -1.2), Vec3::new(0.0, -1.0, 0.0));
        let rec = world.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.p.y - 0.5).abs() < 1e-9);

        // Beside the spheres the ray reaches the ground plane
        let ray = Ray::new(Vec3::new(3.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let rec = world.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.p.y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_cube_with_cached_image() {
        let mut textures = TextureCache::new();
        textures.insert("crate.png", RgbaImage::new(4, 4));

        let world = build_world(&demo::textured_cube(Some("crate.png")), &mut textures).unwrap();
        assert_eq!(world.len(), 9);
        assert_eq!(textures.len(), 1);
    }

    #[test]
    fn test_missing_texture_is_an_error() {
        let scene = demo::textured_cube(Some("/nonexistent/texture.png"));
        let Err(err) = build_world(&scene, &mut TextureCache::new()) else {
            panic!("expected a texture error");
        };

        assert!(matches!(err, RenderError::Texture(_)));
    }
}
