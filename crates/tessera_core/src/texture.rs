//! Texture loading and caching.
//!
//! Images are decoded once into 8-bit RGBA buffers. The renderer samples
//! those buffers directly (nearest pixel), so no color conversion happens
//! here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

pub use image::RgbaImage;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture {0} has no pixels")]
    Empty(PathBuf),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Decode an image file into an RGBA8 buffer.
pub fn load_rgba(path: impl AsRef<Path>) -> TextureResult<RgbaImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| TextureError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    let rgba = img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(TextureError::Empty(path.to_path_buf()));
    }

    Ok(rgba)
}

/// Cache for decoded textures.
///
/// Scenes often reuse one image across many triangles; each path is
/// decoded once and shared.
#[derive(Default)]
pub struct TextureCache {
    /// Cached textures by path as written in the scene
    textures: HashMap<String, Arc<RgbaImage>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<RgbaImage>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = Arc::new(load_rgba(&full_path)?);

        log::debug!(
            "Loaded texture: {} ({}x{})",
            full_path.display(),
            texture.width(),
            texture.height()
        );

        self.textures.insert(path.to_string(), texture.clone());
        Ok(texture)
    }

    /// Insert an already decoded texture under `path`.
    pub fn insert(&mut self, path: impl Into<String>, texture: RgbaImage) -> Arc<RgbaImage> {
        let texture = Arc::new(texture);
        self.textures.insert(path.into(), texture.clone());
        texture
    }

    /// Check if a texture is cached.
    pub fn is_cached(&self, path: &str) -> bool {
        self.textures.contains_key(path)
    }

    /// Get the number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}
