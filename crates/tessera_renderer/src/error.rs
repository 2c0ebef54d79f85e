use tessera_core::{SceneError, TextureError};
use thiserror::Error;

/// Errors that can occur while building or rendering a scene.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("Failed to start tile workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Worker for tile {tile} exited without returning its pixels")]
    WorkerLost { tile: usize },

    #[error("Image size {width}x{height} has no pixels")]
    EmptyImage { width: u32, height: u32 },
}

pub type RenderResult<T> = Result<T, RenderError>;
