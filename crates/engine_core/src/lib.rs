//! Core engine types for the serpent creature pipeline.
//!
//! This crate provides the foundational types used across the animation and
//! mesh generation crates:
//! - Transform and spatial utilities
//! - Frame time management

pub mod time;
pub mod transform;

pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
