//! Math types for 3D geometry generation
//!
//! Thin aliases over nalgebra so the rest of the crate reads in graphics
//! vocabulary rather than linear-algebra vocabulary.

pub use nalgebra::{Quaternion, Unit};

/// 2D vector type
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector type
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector type
pub type Vec4 = nalgebra::Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = nalgebra::Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = nalgebra::UnitQuaternion<f32>;
