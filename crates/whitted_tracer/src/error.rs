//! Error types for scene setup and rendering.

use thiserror::Error;

/// Errors that can occur when configuring or running a render.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("BVH has not been built for the current primitives; call Scene::build_bvh first")]
    BvhNotBuilt,

    #[error("invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("failed to parse render settings: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;
