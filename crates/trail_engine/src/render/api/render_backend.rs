//! Backend abstraction traits for the rendering system
//!
//! The billboard-chain renderer never talks to a graphics API directly.
//! A host renderer implements [`RenderBackend`] and the chain drives it:
//! buffer lifecycle, uniform updates, state application, and exactly one
//! indexed draw per `render()` invocation.

use crate::foundation::math::Mat4;
use crate::render::state::StateBlock;
use crate::render::RenderError;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Handle to a GPU buffer owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Handle to a texture resource created by the host renderer
///
/// The chain stores the handle but never creates or destroys the texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Handle to a shader program state created by the host renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u64);

/// Resolved location of a named uniform within a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// What a GPU buffer stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// Vertex data
    Vertex,
    /// 16-bit index data
    Index,
}

/// Update-frequency hint supplied at buffer creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Contents are written once and drawn many times
    Static,
    /// Contents are rewritten frequently, possibly every frame
    Dynamic,
}

/// Parameters for one indexed mesh draw
#[derive(Debug, Clone, Copy)]
pub struct MeshDraw {
    /// Vertex buffer to source attributes from
    pub vertex_buffer: BufferHandle,
    /// Index buffer holding 16-bit triangle indices
    pub index_buffer: BufferHandle,
    /// Number of indices to draw from the start of the index buffer
    pub index_count: usize,
    /// Program state to draw with
    pub program: ProgramHandle,
}

/// Main rendering backend trait
///
/// Implemented by the host renderer. All methods are synchronous and must be
/// called from the thread that owns the GPU context; the chain performs no
/// internal locking.
pub trait RenderBackend {
    /// Create a GPU buffer of `size_bytes`, returning an opaque handle
    fn create_buffer(
        &mut self,
        kind: BufferKind,
        usage: BufferUsage,
        size_bytes: usize,
    ) -> BackendResult<BufferHandle>;

    /// Replace buffer contents starting at offset zero
    ///
    /// `data` never exceeds the size the buffer was created with.
    fn update_buffer(&mut self, buffer: BufferHandle, data: &[u8]) -> BackendResult<()>;

    /// Destroy a buffer previously returned by [`Self::create_buffer`]
    fn destroy_buffer(&mut self, buffer: BufferHandle);

    /// Resolve a named uniform on a program, if the program declares it
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;

    /// Set a vec4 uniform
    fn set_uniform_vec4(
        &mut self,
        program: ProgramHandle,
        location: UniformLocation,
        value: [f32; 4],
    );

    /// Set a mat4 uniform
    fn set_uniform_mat4(&mut self, program: ProgramHandle, location: UniformLocation, value: &Mat4);

    /// Bind a texture to a sampler uniform
    fn bind_texture(
        &mut self,
        program: ProgramHandle,
        location: UniformLocation,
        texture: TextureHandle,
    );

    /// Apply a render-state block, returning the block it displaced
    ///
    /// The returned block lets callers bracket a draw: apply their own state
    /// before submission and restore the previous state afterwards.
    fn apply_state(&mut self, state: &StateBlock) -> StateBlock;

    /// Submit exactly one indexed mesh draw
    fn draw_indexed(&mut self, draw: &MeshDraw) -> BackendResult<()>;
}
