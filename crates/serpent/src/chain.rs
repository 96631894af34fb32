//! Body segment chain: the ordered sequence of segments the whole pipeline
//! operates on.

use engine_core::Transform;
use glam::Vec3;
use thiserror::Error;

/// Errors raised when constructing a [`BodyChain`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    /// A chain needs a head and at least one trailing segment.
    #[error("body chain needs at least 2 segments, got {0}")]
    NotEnoughSegments(usize),
}

/// One body unit of the creature.
///
/// The `transform` always follows the exact path of the head; `visual` is a
/// separate offset layer (local to the segment) that self-intersection
/// handling may lift without disturbing the path. Mesh construction reads the
/// visual layer only.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Authoritative path-following pose.
    pub transform: Transform,
    /// Visual offset layer, local to the segment. Only the intersection pass
    /// moves it (vertically); mesh construction orients it.
    pub visual: Transform,
    /// Tube radius at this segment, written back during mesh construction.
    pub thickness: f32,
    /// Set while the segment is being held up by the intersection pass this
    /// frame; cleared at the start of every resolution pass.
    pub pushed_up_this_frame: bool,
}

impl Segment {
    fn at(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            visual: Transform::default(),
            thickness: 0.0,
            pushed_up_this_frame: false,
        }
    }

    /// Path-following position.
    pub fn logical_position(&self) -> Vec3 {
        self.transform.position
    }

    /// Displayed position: the path position plus the visual offset.
    pub fn visual_position(&self) -> Vec3 {
        self.transform.position + self.visual.position
    }
}

/// Ordered chain of body segments, head first.
///
/// Segment 0 is a proxy for the externally driven head and never moves under
/// its own rules. Alongside the live positions the chain keeps a stale
/// snapshot of every segment's position (`prev_positions`); followers chase
/// those snapshots rather than live neighbors, which bounds per-step movement
/// and gives the body its periodic catch-up look. The snapshot refreshes only
/// once accumulated head movement reaches the separation distance, or
/// immediately on a direction reversal.
#[derive(Debug, Clone)]
pub struct BodyChain {
    segments: Vec<Segment>,
    prev_positions: Vec<Vec3>,
    movement_tracker: f32,
    separation: f32,
}

impl BodyChain {
    /// Build a chain of `count` segments spaced `separation` apart along
    /// `axis`, starting at `head_position`.
    pub fn new(
        head_position: Vec3,
        axis: Vec3,
        separation: f32,
        count: usize,
    ) -> Result<Self, ChainError> {
        if count < 2 {
            return Err(ChainError::NotEnoughSegments(count));
        }

        let segments: Vec<Segment> = (0..count)
            .map(|i| Segment::at(head_position + axis * (separation * i as f32)))
            .collect();
        let prev_positions = segments.iter().map(|s| s.transform.position).collect();

        Ok(Self {
            segments,
            prev_positions,
            movement_tracker: 0.0,
            separation,
        })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Target spacing between neighboring segments.
    pub fn separation(&self) -> f32 {
        self.separation
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    /// The head proxy's current position.
    pub fn head_position(&self) -> Vec3 {
        self.segments[0].transform.position
    }

    /// Mirror the externally driven head into segment 0.
    pub fn set_head_position(&mut self, position: Vec3) {
        self.segments[0].transform.position = position;
    }

    /// The remembered position of segment `index` from the last snapshot.
    pub fn prev_position(&self, index: usize) -> Vec3 {
        self.prev_positions[index]
    }

    /// Refresh every remembered position to the segment's live position and
    /// reset the movement accumulator.
    pub fn snapshot(&mut self) {
        self.movement_tracker = 0.0;
        for (prev, segment) in self.prev_positions.iter_mut().zip(&self.segments) {
            *prev = segment.transform.position;
        }
    }

    /// Track head movement; once a full separation's worth has accumulated,
    /// resynchronize the snapshots.
    pub(crate) fn accumulate_movement(&mut self, amount: f32) {
        self.movement_tracker += amount;
        if self.movement_tracker >= self.separation {
            self.snapshot();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_places_segments_along_axis() {
        let chain = BodyChain::new(Vec3::new(1.0, 0.0, 0.0), Vec3::Z, 2.0, 4).unwrap();
        assert_eq!(chain.len(), 4);
        for (i, segment) in chain.segments().iter().enumerate() {
            let expected = Vec3::new(1.0, 0.0, 2.0 * i as f32);
            assert!((segment.logical_position() - expected).length() < 1e-6);
            assert_eq!(chain.prev_position(i), segment.logical_position());
        }
    }

    #[test]
    fn new_rejects_short_chains() {
        assert_eq!(
            BodyChain::new(Vec3::ZERO, Vec3::Z, 1.0, 1).unwrap_err(),
            ChainError::NotEnoughSegments(1)
        );
        assert!(BodyChain::new(Vec3::ZERO, Vec3::Z, 1.0, 2).is_ok());
    }

    #[test]
    fn snapshot_copies_live_positions() {
        let mut chain = BodyChain::new(Vec3::ZERO, Vec3::Z, 1.0, 3).unwrap();
        chain.segments_mut()[1].transform.position = Vec3::new(5.0, 0.0, 5.0);
        assert_ne!(chain.prev_position(1), Vec3::new(5.0, 0.0, 5.0));
        chain.snapshot();
        for i in 0..chain.len() {
            assert_eq!(chain.prev_position(i), chain.segments()[i].logical_position());
        }
    }

    #[test]
    fn accumulate_snapshots_at_separation() {
        let mut chain = BodyChain::new(Vec3::ZERO, Vec3::Z, 2.0, 3).unwrap();
        chain.segments_mut()[2].transform.position = Vec3::new(0.0, 0.0, 9.0);
        chain.accumulate_movement(1.0);
        // Not enough movement yet: snapshot still stale.
        assert_eq!(chain.prev_position(2), Vec3::new(0.0, 0.0, 4.0));
        chain.accumulate_movement(1.0);
        assert_eq!(chain.prev_position(2), Vec3::new(0.0, 0.0, 9.0));
    }

    #[test]
    fn visual_position_adds_offset() {
        let mut chain = BodyChain::new(Vec3::ZERO, Vec3::Z, 1.0, 2).unwrap();
        chain.segments_mut()[1].visual.position.y = 2.5;
        let segment = &chain.segments()[1];
        assert_eq!(
            segment.visual_position(),
            segment.logical_position() + Vec3::new(0.0, 2.5, 0.0)
        );
    }
}
