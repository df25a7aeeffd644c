//! # Trail Engine
//!
//! A billboard-chain rendering library: ribbons of connected quads driven
//! by caller-supplied control points, for motion trails, light beams, and
//! sword-swing effects.
//!
//! ## Features
//!
//! - **Shared storage**: multiple independent chains in one pre-sized
//!   element pool, drawn with a single draw call
//! - **Ring-buffer chains**: fixed-capacity per-chain rings that evict the
//!   oldest element instead of reallocating
//! - **Camera-facing or fixed-orientation billboards**: tube-like trails or
//!   planar ribbons with caller-controlled twist
//! - **Dirty-state tracking**: layout, buffers, contents, and bounds are
//!   rebuilt only when stale
//! - **Backend-agnostic**: GPU work crosses a small [`RenderBackend`] trait
//!   implemented by the host renderer
//!
//! ## Quick Start
//!
//! ```
//! use trail_engine::prelude::*;
//!
//! # fn main() -> Result<(), trail_engine::render::ChainError> {
//! let config = ChainConfig {
//!     name: "exhaust".to_string(),
//!     max_elements: 32,
//!     number_of_chains: 2,
//!     ..Default::default()
//! };
//! let mut chain = BillboardChain::new(config)?;
//!
//! // Feed the trail head each simulation tick; the ring evicts the tail.
//! chain.add_chain_element(
//!     0,
//!     ChainElement::new(
//!         Vec3::new(0.0, 1.0, 0.0),
//!         0.5,
//!         0.0,
//!         Vec4::new(1.0, 0.8, 0.2, 1.0),
//!     ),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! Each frame, after all mutations, call
//! [`BillboardChain::render`](render::BillboardChain::render) with the host's
//! [`RenderBackend`] implementation, the world transform, and the frame data.
//!
//! [`RenderBackend`]: render::RenderBackend

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for library users
pub mod prelude {
    pub use crate::config::{Config, ConfigError};
    pub use crate::foundation::math::{Mat4, Quat, Vec2, Vec3, Vec4};
    pub use crate::render::{
        BillboardChain, BlendFunc, Camera, ChainConfig, ChainElement, ChainError, ChainFrameData,
        CullMode, RenderBackend, StateBlock, TexCoordDirection, AABB,
    };
}
