//! Scene description types.
//!
//! A scene description is plain data: it can be serialized, sent to a
//! worker, and turned into renderable primitives by the renderer crate.
//! Vectors are stored as `[f64; 3]` so the JSON format stays flat.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Camera placement and sampling settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Camera position
    pub look_from: [f64; 3],

    /// Point the camera looks at
    pub look_at: [f64; 3],

    /// Camera-relative "up" direction
    pub vup: [f64; 3],

    /// Vertical field of view in degrees
    pub vfov: f64,

    /// Samples per pixel for batch rendering
    pub samples_per_pixel: u32,

    /// Maximum number of bounces per path
    pub max_depth: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: [0.0, 0.0, 0.2],
            look_at: [0.0, 0.0, -1.0],
            vup: [0.0, 1.0, 0.0],
            vfov: 65.0,
            samples_per_pixel: 10,
            max_depth: 10,
        }
    }
}

/// Surface color lookup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextureDescription {
    Solid {
        color: [f64; 3],
    },
    Checker {
        scale: f64,
        odd: [f64; 3],
        even: [f64; 3],
    },
    /// Image file, resolved relative to the scene file's directory.
    Image {
        path: String,
    },
}

/// How a surface scatters light.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDescription {
    Lambertian { texture: TextureDescription },
    Metal { albedo: [f64; 3] },
    Dielectric { refraction_index: f64 },
}

impl MaterialDescription {
    /// Lambertian material with a constant albedo.
    pub fn lambertian(color: [f64; 3]) -> Self {
        MaterialDescription::Lambertian {
            texture: TextureDescription::Solid { color },
        }
    }
}

/// A renderable primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDescription {
    Sphere {
        center: [f64; 3],
        radius: f64,
        material: MaterialDescription,
    },
    Triangle {
        vertices: [[f64; 3]; 3],
        /// Per-vertex texture coordinates (defaults to (0,0), (1,0), (1,1))
        #[serde(default, skip_serializing_if = "Option::is_none")]
        uvs: Option<[[f64; 2]; 3]>,
        material: MaterialDescription,
    },
    /// Horizontal plane at `height`, unbounded.
    Plane {
        height: f64,
        material: MaterialDescription,
    },
}

/// A complete scene: camera plus objects.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraSettings,

    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

impl SceneDescription {
    /// Create an empty scene with default camera settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the scene.
    pub fn push(&mut self, object: ObjectDescription) {
        self.objects.push(object);
    }

    /// Parse a scene from a JSON string.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the scene to pretty-printed JSON.
    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a scene from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let scene = Self::from_json(&json)?;

        log::debug!(
            "Loaded scene {} ({} objects)",
            path.display(),
            scene.objects.len()
        );

        Ok(scene)
    }
}
