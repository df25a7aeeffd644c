//! Renderer-facing API boundary
//!
//! Everything the library needs from a host renderer, and everything it
//! hands back per frame, crosses through this module.

pub mod frame_data;
pub mod render_backend;

pub use frame_data::ChainFrameData;
pub use render_backend::{
    BackendResult, BufferHandle, BufferKind, BufferUsage, MeshDraw, ProgramHandle,
    RenderBackend, TextureHandle, UniformLocation,
};
