//! Billboard-chain rendering system
//!
//! A billboard chain is a ribbon of connected quads generated from an
//! ordered list of control points, the standard technique for motion
//! trails, light beams, and sword-swing effects. Several independent chains
//! share one pre-sized element store and are drawn with a single draw call.
//!
//! Elements live in a fixed-capacity ring per chain: adding past capacity
//! evicts the oldest element rather than reallocating, so steady-state
//! trails never touch the allocator.

pub mod dirty;
pub mod geometry;
pub mod renderer;
pub mod store;
pub mod types;

pub use dirty::DirtyFlags;
pub use renderer::BillboardChain;
pub use store::{ChainSegment, ChainStore};
pub use types::{
    AttributeFormat, AttributeSemantic, ChainConfig, ChainElement, ChainVertex,
    TexCoordDirection, VertexAttribute, VertexLayout,
};

use thiserror::Error;

/// Highest number of vertices addressable with 16-bit indices
pub const INDEX_CEILING: usize = 65536;

/// Chain precondition violations
///
/// All variants are fail-fast caller errors; the chain has no transient
/// failure modes of its own since it performs no I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// Invalid chain or element index passed to an accessor or mutator
    #[error("{context} index {index} out of range (valid range 0..{limit})")]
    IndexOutOfRange {
        /// What kind of index was out of range ("chain" or "element")
        context: &'static str,
        /// The offending index
        index: usize,
        /// Exclusive upper bound at the time of the call
        limit: usize,
    },

    /// Both texture coordinates and vertex colours are disabled
    ///
    /// Chain vertices carry no normals, so without at least one of the two
    /// there is no source of colour at all. Rejected rather than silently
    /// rendering colourless geometry.
    #[error("either texture coordinates or vertex colours must be enabled")]
    ConfigurationConflict,

    /// Configured capacity cannot be addressed with 16-bit indices
    ///
    /// Also raised for zero-capacity configurations, which could never
    /// accept an element.
    #[error("invalid chain capacity: {vertices} addressable vertices (must be 1..=65536)")]
    CapacityExceeded {
        /// Total vertices the configuration would address
        /// (`max_elements × number_of_chains × 2`)
        vertices: usize,
    },
}
