//! Deferred-recompute flags for derived chain state
//!
//! Derived state (vertex layout, GPU buffers, buffer contents, bounds) is
//! rebuilt lazily: mutations raise flags, and the next `render()` or bounds
//! query re-evaluates exactly the stale parts.

use bitflags::bitflags;

bitflags! {
    /// Stale derived state that must be rebuilt before the next use
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// Vertex layout must be rebuilt (tex-coord/colour usage toggled)
        const VERTEX_DECL = 1 << 0;
        /// GPU buffers must be destroyed and recreated, not just rewritten
        /// (capacity, chain count, or the dynamic hint changed)
        const BUFFERS = 1 << 1;
        /// Vertex buffer content must be rewritten
        const VERTEX_CONTENT = 1 << 2;
        /// Index buffer content must be rewritten (topology changed)
        const INDEX_CONTENT = 1 << 3;
        /// Bounding volume must be recomputed on the next query
        const BOUNDS = 1 << 4;
    }
}

impl DirtyFlags {
    /// Flags raised when an element's stored value changes in place
    pub const ELEMENT_MUTATION: Self = Self::VERTEX_CONTENT.union(Self::BOUNDS);

    /// Flags raised when the element count of any chain changes
    pub const TOPOLOGY_CHANGE: Self = Self::ELEMENT_MUTATION.union(Self::INDEX_CONTENT);
}
