//! Built-in demo scenes.

use crate::scene::{
    CameraSettings, MaterialDescription, ObjectDescription, SceneDescription, TextureDescription,
};

const LOWER_RIGHT: [[f64; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];
const UPPER_LEFT: [[f64; 2]; 3] = [[0.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Three spheres (diffuse, glass, metal) over a yellow ground plane.
pub fn three_spheres() -> SceneDescription {
    let sphere = |center: [f64; 3], material: MaterialDescription| ObjectDescription::Sphere {
        center,
        radius: 0.5,
        material,
    };

    SceneDescription {
        camera: CameraSettings::default(),
        objects: vec![
            sphere([0.0, 0.0, -1.2], MaterialDescription::lambertian([0.7, 0.3, 0.3])),
            sphere(
                [-1.0, 0.0, -1.0],
                MaterialDescription::Dielectric {
                    refraction_index: 1.5,
                },
            ),
            sphere(
                [1.0, 0.0, -1.0],
                MaterialDescription::Metal {
                    albedo: [0.8, 0.8, 0.8],
                },
            ),
            ObjectDescription::Plane {
                height: -1.0,
                material: MaterialDescription::lambertian([0.8, 0.8, 0.0]),
            },
        ],
    }
}

/// A small textured cube over a checkered ground plane.
///
/// Without an image the cube faces fall back to a solid grey.
pub fn textured_cube(image_path: Option<&str>) -> SceneDescription {
    let texture = match image_path {
        Some(path) => TextureDescription::Image {
            path: path.to_string(),
        },
        None => TextureDescription::Solid {
            color: [0.7, 0.7, 0.7],
        },
    };
    let material = MaterialDescription::Lambertian { texture };

    // (vertices, uvs) for two triangles per visible face
    let faces: [([[f64; 3]; 3], [[f64; 2]; 3]); 8] = [
        // front
        ([[-0.2, -0.2, -0.2], [0.2, -0.2, -0.2], [0.2, 0.2, -0.2]], LOWER_RIGHT),
        ([[-0.2, -0.2, -0.2], [0.2, 0.2, -0.2], [-0.2, 0.2, -0.2]], UPPER_LEFT),
        // left
        ([[-0.2, -0.2, -0.4], [-0.2, -0.2, -0.2], [-0.2, 0.2, -0.2]], LOWER_RIGHT),
        ([[-0.2, -0.2, -0.4], [-0.2, 0.2, -0.2], [-0.2, 0.2, -0.4]], UPPER_LEFT),
        // top
        ([[-0.2, 0.2, -0.2], [0.2, 0.2, -0.2], [0.2, 0.2, -0.4]], LOWER_RIGHT),
        ([[-0.2, 0.2, -0.2], [0.2, 0.2, -0.4], [-0.2, 0.2, -0.4]], UPPER_LEFT),
        // back
        ([[-0.2, -0.2, -0.4], [0.2, -0.2, -0.4], [0.2, 0.2, -0.4]], LOWER_RIGHT),
        ([[-0.2, -0.2, -0.4], [0.2, 0.2, -0.4], [-0.2, 0.2, -0.4]], UPPER_LEFT),
    ];

    let mut objects: Vec<ObjectDescription> = faces
        .into_iter()
        .map(|(vertices, uvs)| ObjectDescription::Triangle {
            vertices,
            uvs: Some(uvs),
            material: material.clone(),
        })
        .collect();

    objects.push(ObjectDescription::Plane {
        height: -0.2,
        material: MaterialDescription::Lambertian {
            texture: TextureDescription::Checker {
                scale: 10.0,
                odd: [0.8, 0.8, 0.0],
                even: [0.2, 0.2, 0.0],
            },
        },
    });

    SceneDescription {
        camera: CameraSettings {
            look_from: [0.6, 0.3, 0.6],
            look_at: [0.0, 0.0, -0.3],
            ..CameraSettings::default()
        },
        objects,
    }
}
