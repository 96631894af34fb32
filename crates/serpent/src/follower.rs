//! Follow-the-leader propagation of head motion through the chain.

use crate::chain::BodyChain;
use engine_core::look_rotation;
use glam::Vec3;

/// How far past itself the tail extrapolates its virtual target while the
/// chain is backing up.
const TAIL_EXTRAPOLATION: f32 = 3.0;

/// Which way the chain is traveling relative to the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveDirection {
    #[default]
    Forward,
    Backward,
}

/// Moves every segment toward (or away from) a remembered snapshot of its
/// chain neighbor by up to the head's displacement this frame.
///
/// Chasing the stale snapshot instead of the neighbor's live position keeps
/// spacing approximately constant without arc-length reparameterization: each
/// step is clamped to the remaining distance, so nothing ever overshoots.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainFollower {
    direction: MoveDirection,
}

impl ChainFollower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(&self) -> MoveDirection {
        self.direction
    }

    /// Flip travel direction. Snapshots immediately so segments do not snap
    /// toward targets remembered from the old direction.
    pub fn reverse(&mut self, chain: &mut BodyChain) {
        self.direction = match self.direction {
            MoveDirection::Forward => MoveDirection::Backward,
            MoveDirection::Backward => MoveDirection::Forward,
        };
        log::debug!("chain direction reversed: {:?}", self.direction);
        chain.snapshot();
    }

    /// Propagate one frame of head movement (`movement_amount` is the head's
    /// displacement magnitude) through every trailing segment, then refresh
    /// the visual look directions used by mesh construction.
    pub fn advance(&mut self, chain: &mut BodyChain, movement_amount: f32) {
        match self.direction {
            MoveDirection::Forward => Self::move_forward(chain, movement_amount),
            MoveDirection::Backward => Self::move_backward(chain, movement_amount),
        }
        chain.accumulate_movement(movement_amount);
        Self::update_look_directions(chain);
    }

    /// Move every segment from its current position toward the remembered
    /// position of the next segment up the chain.
    fn move_forward(chain: &mut BodyChain, movement_amount: f32) {
        for i in 1..chain.len() {
            let target = chain.prev_position(i - 1);
            let segment = &mut chain.segments_mut()[i];

            let to_target = target - segment.transform.position;
            let direction = to_target.normalize_or_zero();
            let amount = to_target.length().min(movement_amount);

            segment.transform.position += direction * amount;
        }
    }

    /// The head is still driving, but instead of pulling everything toward
    /// its position it pushes everything away.
    fn move_backward(chain: &mut BodyChain, movement_amount: f32) {
        let count = chain.len();
        for i in 1..count {
            let target = if i != count - 1 {
                chain.prev_position(i + 1)
            } else {
                // The tail has no trailing neighbor: extrapolate a virtual
                // target along the direction it already points away from its
                // predecessor.
                let position = chain.segments()[i].logical_position();
                let away = position - chain.segments()[i - 1].logical_position();
                position + away * TAIL_EXTRAPOLATION
            };

            let segment = &mut chain.segments_mut()[i];
            let to_target = target - segment.transform.position;
            let direction = to_target.normalize_or_zero();
            let amount = to_target.length().min(movement_amount);

            segment.transform.position += direction * amount;

            // Tail-first posture: face away from the movement direction.
            let back = segment.transform.position - direction;
            segment.transform.look_at(back, Vec3::Y);
        }
    }

    /// Orient each visual layer from one displayed position to the next. The
    /// ring frame of mesh construction reads these rotations, so they track
    /// the visual curve rather than the raw path.
    fn update_look_directions(chain: &mut BodyChain) {
        for i in 1..chain.len() {
            let to_prev = chain.segments()[i - 1].visual_position()
                - chain.segments()[i].visual_position();
            let eye = chain.segments()[i].visual_position();
            let target = chain.segments()[i].logical_position() - to_prev;
            if let Some(rotation) = look_rotation(eye, target, Vec3::Y) {
                chain.segments_mut()[i].visual.rotation = rotation;
            }
        }
    }
}
