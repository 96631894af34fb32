//! Frame pipeline façade: follow, resolve, rebuild mesh.

use crate::chain::{BodyChain, ChainError};
use crate::follower::{ChainFollower, MoveDirection};
use crate::intersection::IntersectionResolver;
use crate::mesh::{MeshData, TubeMeshBuilder};
use engine_core::Transform;
use glam::Vec3;

/// Construction parameters, fixed for the creature's lifetime.
#[derive(Debug, Clone, Copy)]
pub struct SnakeParams {
    /// Initial head position; the head stays externally driven afterwards.
    pub head_position: Vec3,
    /// Axis the body extends along at spawn.
    pub axis: Vec3,
    /// Target spacing between neighboring segments.
    pub separation: f32,
    /// Total number of segments, head proxy included.
    pub segment_count: usize,
}

impl Default for SnakeParams {
    fn default() -> Self {
        Self {
            head_position: Vec3::ZERO,
            axis: Vec3::Z,
            separation: 1.0,
            segment_count: 40,
        }
    }
}

/// A complete creature: body chain plus the three per-frame stages.
///
/// Callers drive the head position once per frame via [`Snake::update`]; the
/// snake derives the displacement magnitude from successive head positions,
/// advances the chain, resolves self-intersections, and rebuilds the tube
/// mesh, in that order.
#[derive(Debug)]
pub struct Snake {
    chain: BodyChain,
    follower: ChainFollower,
    resolver: IntersectionResolver,
    mesh_builder: TubeMeshBuilder,
    head_prev: Vec3,
    mesh: MeshData,
}

impl Snake {
    pub fn new(params: &SnakeParams) -> Result<Self, ChainError> {
        let chain = BodyChain::new(
            params.head_position,
            params.axis,
            params.separation,
            params.segment_count,
        )?;
        log::info!(
            "spawned snake: {} segments, separation {}",
            params.segment_count,
            params.separation
        );
        Ok(Self {
            chain,
            follower: ChainFollower::new(),
            resolver: IntersectionResolver::new(),
            mesh_builder: TubeMeshBuilder::default(),
            head_prev: params.head_position,
            mesh: MeshData::new(),
        })
    }

    /// Step one frame: mirror the externally driven head, propagate its
    /// displacement through the chain, resolve self-intersections, and
    /// rebuild the mesh.
    pub fn update(&mut self, head_position: Vec3, dt: f32) {
        let displacement = (head_position - self.head_prev).length();
        self.head_prev = head_position;
        self.chain.set_head_position(head_position);

        self.follower.advance(&mut self.chain, displacement);
        self.resolver.resolve(&mut self.chain, dt);

        let mut mesh = std::mem::take(&mut self.mesh);
        self.mesh_builder.build_into(&mut self.chain, &mut mesh);
        self.mesh = mesh;
    }

    /// External trigger (key press and the like): flip travel direction.
    pub fn reverse_direction(&mut self) {
        self.follower.reverse(&mut self.chain);
    }

    pub fn direction(&self) -> MoveDirection {
        self.follower.direction()
    }

    /// The mesh built by the most recent [`Snake::update`], for GPU upload.
    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn chain(&self) -> &BodyChain {
        &self.chain
    }

    /// Displayed pose of every segment (visual position and orientation),
    /// for instance upload or diagnostics.
    pub fn segment_transforms(&self) -> impl Iterator<Item = Transform> + '_ {
        self.chain.segments().iter().map(|segment| Transform {
            position: segment.visual_position(),
            rotation: segment.visual.rotation,
            scale: Vec3::ONE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::RING_VERTEX_COUNT;

    #[test]
    fn update_rebuilds_mesh_every_frame() {
        let mut snake = Snake::new(&SnakeParams {
            segment_count: 12,
            ..Default::default()
        })
        .unwrap();

        snake.update(Vec3::new(0.0, 0.0, -0.1), 1.0 / 60.0);
        assert_eq!(snake.mesh().vertices.len(), 10 * RING_VERTEX_COUNT);

        snake.update(Vec3::new(0.0, 0.0, -0.2), 1.0 / 60.0);
        assert_eq!(snake.mesh().vertices.len(), 10 * RING_VERTEX_COUNT);
    }

    #[test]
    fn stationary_head_leaves_the_path_alone() {
        let mut snake = Snake::new(&SnakeParams::default()).unwrap();
        let before: Vec<Vec3> = snake
            .chain()
            .segments()
            .iter()
            .map(|s| s.logical_position())
            .collect();

        snake.update(Vec3::ZERO, 1.0 / 60.0);

        for (segment, before) in snake.chain().segments().iter().zip(&before) {
            assert!((segment.logical_position() - *before).length() < 1e-6);
        }
    }

    #[test]
    fn head_segment_mirrors_driven_position() {
        let mut snake = Snake::new(&SnakeParams::default()).unwrap();
        let head = Vec3::new(3.0, 0.0, -2.0);
        snake.update(head, 1.0 / 60.0);
        assert_eq!(snake.chain().head_position(), head);
    }

    #[test]
    fn reverse_twice_round_trips() {
        let mut snake = Snake::new(&SnakeParams::default()).unwrap();
        assert_eq!(snake.direction(), MoveDirection::Forward);
        snake.reverse_direction();
        assert_eq!(snake.direction(), MoveDirection::Backward);
        snake.reverse_direction();
        assert_eq!(snake.direction(), MoveDirection::Forward);
    }

    #[test]
    fn segment_transforms_report_visual_pose() {
        let snake = Snake::new(&SnakeParams::default()).unwrap();
        let transforms: Vec<Transform> = snake.segment_transforms().collect();
        assert_eq!(transforms.len(), 40);
        assert_eq!(transforms[0].position, snake.chain().segments()[0].visual_position());
    }
}
