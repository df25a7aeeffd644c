//! Chain element, vertex, layout, and configuration types

use serde::{Deserialize, Serialize};

use super::{ChainError, INDEX_CEILING};
use crate::config::Config;
use crate::foundation::math::{Quat, Vec3, Vec4};

/// One control point of a billboard chain
///
/// Immutable once stored except through an explicit update.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainElement {
    /// World-space position of the ribbon's center line at this point
    pub position: Vec3,

    /// Full width of the ribbon at this point (half extends to each side)
    pub width: f32,

    /// U or V texture coordinate depending on the configured direction
    pub tex_coord: f32,

    /// RGBA colour copied through to both emitted vertices
    pub color: Vec4,

    /// Only used when the chain is not camera-facing
    pub orientation: Quat,
}

impl ChainElement {
    /// Create an element with identity orientation
    pub fn new(position: Vec3, width: f32, tex_coord: f32, color: Vec4) -> Self {
        Self {
            position,
            width,
            tex_coord,
            color,
            orientation: Quat::identity(),
        }
    }

    /// Set the orientation used by fixed-orientation chains
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }
}

impl Default for ChainElement {
    fn default() -> Self {
        Self::new(Vec3::zeros(), 1.0, 0.0, Vec4::new(1.0, 1.0, 1.0, 1.0))
    }
}

/// Which texture axis the per-element scalar coordinate runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TexCoordDirection {
    /// Element coordinates are treated as the 'u' texture coordinate
    U,
    /// Element coordinates are treated as the 'v' texture coordinate
    V,
}

/// GPU vertex record for chain geometry
///
/// The layout is fixed regardless of which attributes are enabled; the
/// vertex declaration decides what the shader reads.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChainVertex {
    /// Position in world space
    pub position: [f32; 3],

    /// Texture coordinates
    pub uv: [f32; 2],

    /// RGBA colour
    pub color: [f32; 4],
}

unsafe impl bytemuck::Pod for ChainVertex {}
unsafe impl bytemuck::Zeroable for ChainVertex {}

/// Meaning of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeSemantic {
    /// World-space position
    Position,
    /// Texture coordinates
    TexCoord,
    /// Vertex colour
    Color,
}

/// Component layout of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeFormat {
    /// Two 32-bit floats
    Float2,
    /// Three 32-bit floats
    Float3,
    /// Four 32-bit floats
    Float4,
}

/// One attribute within a vertex layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// What the attribute means
    pub semantic: AttributeSemantic,
    /// Component format
    pub format: AttributeFormat,
    /// Byte offset from the start of the vertex
    pub offset: usize,
}

/// Backend-agnostic vertex declaration
///
/// Describes which [`ChainVertex`] fields the shader should consume; the
/// stride always spans the full vertex so disabled attributes are simply
/// skipped over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    /// Attributes in declaration order
    pub attributes: Vec<VertexAttribute>,
    /// Byte distance between consecutive vertices
    pub stride: usize,
}

impl VertexLayout {
    /// Build the declaration for the given attribute toggles
    pub fn for_chain(use_texture_coords: bool, use_vertex_colours: bool) -> Self {
        let mut attributes = vec![VertexAttribute {
            semantic: AttributeSemantic::Position,
            format: AttributeFormat::Float3,
            offset: 0,
        }];
        if use_texture_coords {
            attributes.push(VertexAttribute {
                semantic: AttributeSemantic::TexCoord,
                format: AttributeFormat::Float2,
                offset: 12,
            });
        }
        if use_vertex_colours {
            attributes.push(VertexAttribute {
                semantic: AttributeSemantic::Color,
                format: AttributeFormat::Float4,
                offset: 20,
            });
        }
        Self {
            attributes,
            stride: std::mem::size_of::<ChainVertex>(),
        }
    }
}

/// Construction configuration for a [`BillboardChain`]
///
/// Every field is serde-defaulted so partial TOML/RON files parse.
///
/// [`BillboardChain`]: super::BillboardChain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Identifier for logging and debugging
    pub name: String,

    /// Texture asset path; empty means untextured
    ///
    /// The chain never loads this itself; the host resolves it to a
    /// texture handle and attaches it.
    pub tex_file: String,

    /// Maximum number of elements per chain
    pub max_elements: usize,

    /// Number of separate chains sharing this object's storage
    pub number_of_chains: usize,

    /// Include texture coordinates in the generated buffers
    pub use_texture_coords: bool,

    /// Include vertex colours in the generated buffers
    pub use_vertex_colours: bool,

    /// Create GPU buffers with the intention of frequent updates
    pub dynamic: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            tex_file: String::new(),
            max_elements: 20,
            number_of_chains: 1,
            use_texture_coords: true,
            use_vertex_colours: true,
            dynamic: true,
        }
    }
}

impl Config for ChainConfig {}

impl ChainConfig {
    /// Check the configuration-time invariants
    ///
    /// Rejects zero-capacity storage, vertex counts beyond the 16-bit index
    /// ceiling, and geometry with no colour source at all.
    pub fn validate(&self) -> Result<(), ChainError> {
        validate_capacity(self.max_elements, self.number_of_chains)?;
        if !self.use_texture_coords && !self.use_vertex_colours {
            return Err(ChainError::ConfigurationConflict);
        }
        Ok(())
    }
}

/// Shared capacity check for construction and later reconfiguration
pub(crate) fn validate_capacity(
    max_elements: usize,
    number_of_chains: usize,
) -> Result<(), ChainError> {
    let vertices = max_elements * number_of_chains * 2;
    if vertices == 0 || vertices > INDEX_CEILING {
        return Err(ChainError::CapacityExceeded { vertices });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ChainConfig::default();
        assert_eq!(config.max_elements, 20);
        assert_eq!(config.number_of_chains, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_no_colour_source_is_rejected() {
        let config = ChainConfig {
            use_texture_coords: false,
            use_vertex_colours: false,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ChainError::ConfigurationConflict));
    }

    #[test]
    fn test_capacity_ceiling_is_enforced() {
        // 16_385 * 2 * 2 = 65_540 vertices, just past the 16-bit ceiling
        let config = ChainConfig {
            max_elements: 16_385,
            number_of_chains: 2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ChainError::CapacityExceeded { vertices: 65_540 })
        ));

        // one element fewer fits exactly
        let config = ChainConfig {
            max_elements: 16_384,
            number_of_chains: 2,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_is_a_configuration_error() {
        let config = ChainConfig {
            max_elements: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ChainError::CapacityExceeded { vertices: 0 })
        ));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ChainConfig =
            toml::from_str("name = \"smoke-trail\"\nmax_elements = 64\n").unwrap();
        assert_eq!(config.name, "smoke-trail");
        assert_eq!(config.max_elements, 64);
        assert_eq!(config.number_of_chains, 1);
        assert!(config.use_texture_coords);
        assert!(config.dynamic);
    }

    #[test]
    fn test_layout_tracks_attribute_toggles() {
        let full = VertexLayout::for_chain(true, true);
        assert_eq!(full.attributes.len(), 3);
        assert_eq!(full.stride, std::mem::size_of::<ChainVertex>());

        let no_uv = VertexLayout::for_chain(false, true);
        assert_eq!(no_uv.attributes.len(), 2);
        assert!(no_uv
            .attributes
            .iter()
            .all(|a| a.semantic != AttributeSemantic::TexCoord));
        // stride spans the whole vertex even when attributes are skipped
        assert_eq!(no_uv.stride, full.stride);
    }
}
