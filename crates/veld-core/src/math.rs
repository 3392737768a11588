//! Vector math based on the SIMD-accelerated [`glam`] crate.
//!
//! The common 2D types used throughout the engine are re-exported at the
//! module root:
//!
//! - [`Vec2`]: 2D vector (x, y) for positions, sizes and offsets
//! - [`Vec4`]: 4D vector for packed four-component values
//!
//! # Examples
//!
//! ```
//! use veld_core::math::Vec2;
//!
//! let position = Vec2::new(10.0, 20.0);
//! let velocity = Vec2::new(1.0, 0.5);
//! let moved = position + velocity * 0.016;
//! assert!(moved.x > position.x);
//! ```
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::{Vec2, Vec3, Vec4, vec2, vec3, vec4};

/// Full access to the underlying math crate for callers that need
/// matrices, quaternions, or the integer vector types.
pub mod fast {
    pub use glam::*;
}
