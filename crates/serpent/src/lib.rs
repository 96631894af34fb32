//! Procedural serpent creature: body chain animation and tube mesh generation.
//!
//! The per-frame pipeline runs three stages in strict order:
//! 1. [`ChainFollower`] propagates head motion through the segment chain,
//! 2. [`IntersectionResolver`] lifts the visual offset layer of segments whose
//!    probe sphere is crossed by a later span of the body,
//! 3. [`TubeMeshBuilder`] rebuilds the triangulated tube around the visual
//!    positions.
//!
//! [`Snake`] ties the stages together behind a single `update` call driven by
//! the externally controlled head position.

pub mod chain;
pub mod follower;
pub mod intersection;
pub mod mesh;
pub mod snake;

pub use chain::{BodyChain, ChainError, Segment};
pub use follower::{ChainFollower, MoveDirection};
pub use intersection::{segment_intersects_sphere, IntersectionResolver};
pub use mesh::{taper_modifier, MeshData, TubeMeshBuilder, TubeVertex, RING_VERTEX_COUNT};
pub use snake::{Snake, SnakeParams};
