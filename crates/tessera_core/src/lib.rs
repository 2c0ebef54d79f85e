//! Tessera Core - renderer-agnostic scene descriptions and texture loading.
//!
//! This crate provides:
//!
//! - **Scene description**: `SceneDescription` and its serde data model
//!   (camera settings, objects, materials, textures), loadable from JSON
//! - **Demo scenes**: the built-in scenes the CLI renders without a file
//! - **Textures**: image decoding into RGBA8 buffers and a path cache
//!
//! # Example
//!
//! ```ignore
//! use tessera_core::SceneDescription;
//!
//! let scene = SceneDescription::load("scene.json")?;
//! println!("Loaded {} objects", scene.objects.len());
//! ```

pub mod demo;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use scene::{
    CameraSettings, MaterialDescription, ObjectDescription, SceneDescription, SceneError,
    SceneResult, TextureDescription,
};
pub use texture::{load_rgba, RgbaImage, TextureCache, TextureError, TextureResult};
