//! # Rendering System
//!
//! Geometry generation and renderer-facing abstractions for billboard
//! chains. The library owns the CPU side of rendering (element storage,
//! vertex/index regeneration, render-state selection) and hands finished
//! buffers to a host renderer through the [`RenderBackend`] trait.
//!
//! ## Architecture
//!
//! - **api**: backend abstraction (buffers, uniforms, draw submission)
//! - **primitives**: camera and bounding-volume types
//! - **state**: the depth/cull/winding/blend block applied around draws
//! - **systems::chain**: the billboard-chain system itself

pub mod api;
pub mod primitives;
pub mod state;
pub mod systems;

pub use api::{
    BackendResult, BufferHandle, BufferKind, BufferUsage, ChainFrameData, MeshDraw,
    ProgramHandle, RenderBackend, TextureHandle, UniformLocation,
};
pub use primitives::{Camera, AABB};
pub use state::{BlendFactor, BlendFunc, CullMode, StateBlock, Winding};
pub use systems::chain::{
    BillboardChain, ChainConfig, ChainElement, ChainError, TexCoordDirection,
};

use thiserror::Error;

/// High-level rendering error types
///
/// Failures crossing the backend boundary, abstracted from any concrete
/// graphics API so host renderers can map their own error types into them.
#[derive(Error, Debug)]
pub enum RenderError {
    /// GPU buffer creation failed
    #[error("buffer creation failed: {0}")]
    BufferCreationFailed(String),

    /// GPU buffer content update failed
    #[error("buffer update failed: {0}")]
    BufferUpdateFailed(String),

    /// Draw submission was rejected by the backend
    #[error("draw submission failed: {0}")]
    DrawSubmissionFailed(String),

    /// Backend-specific error occurred
    #[error("backend error: {0}")]
    BackendError(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
