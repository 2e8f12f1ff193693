//! Errors raised while setting up or running a render session.

use thiserror::Error;

/// Errors that can occur before or while rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Sphere {index} has invalid radius {radius}")]
    InvalidSphere { index: usize, radius: f32 },

    #[error("Scene contains no spheres")]
    EmptyScene,

    #[error("Failed to spawn render worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Render worker {0} panicked")]
    WorkerPanicked(usize),
}

pub type RenderResult<T> = Result<T, RenderError>;
