//! Render-state block
//!
//! The fixed-function state a chain applies around its draw: depth
//! test/write, face culling, winding order, and blending. The backend
//! returns the displaced block from [`apply_state`] so the previous state
//! can be restored after submission.
//!
//! [`apply_state`]: crate::render::api::RenderBackend::apply_state

/// Face culling modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// No culling
    None,
    /// Cull front faces
    Front,
    /// Cull back faces
    Back,
}

/// Front-face winding order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Clockwise triangles are front-facing
    Clockwise,
    /// Counter-clockwise triangles are front-facing
    CounterClockwise,
}

/// Source/destination blend factors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    /// Factor of zero
    Zero,
    /// Factor of one
    One,
    /// Source alpha
    SrcAlpha,
    /// One minus source alpha
    OneMinusSrcAlpha,
    /// Destination alpha
    DstAlpha,
    /// One minus destination alpha
    OneMinusDstAlpha,
}

/// A source/destination blend factor pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendFunc {
    /// Factor applied to the fragment being written
    pub src: BlendFactor,
    /// Factor applied to the framebuffer contents
    pub dst: BlendFactor,
}

impl BlendFunc {
    /// Standard alpha blending for non-premultiplied textures
    pub const ALPHA_NON_PREMULTIPLIED: Self = Self {
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::OneMinusSrcAlpha,
    };

    /// Additive blending for glowing trails and beams
    pub const ADDITIVE: Self = Self {
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::One,
    };

    /// Blending disabled
    pub const DISABLE: Self = Self {
        src: BlendFactor::One,
        dst: BlendFactor::Zero,
    };
}

/// Fixed-function state applied around a chain draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateBlock {
    /// Enable depth testing
    pub depth_test: bool,
    /// Enable depth writes
    pub depth_write: bool,
    /// Face culling mode
    pub cull_mode: CullMode,
    /// Front-face winding order
    pub winding: Winding,
    /// Blend function
    pub blend: BlendFunc,
}

impl Default for StateBlock {
    /// Transparent-geometry defaults: depth-tested but not depth-written,
    /// back faces culled, counter-clockwise front faces, alpha blending
    fn default() -> Self {
        Self {
            depth_test: true,
            depth_write: false,
            cull_mode: CullMode::Back,
            winding: Winding::CounterClockwise,
            blend: BlendFunc::ALPHA_NON_PREMULTIPLIED,
        }
    }
}
