//! Self-intersection resolution: lifts the visual offset layer wherever a
//! later span of the body crosses a segment's probe sphere.

use crate::chain::BodyChain;
use glam::Vec3;

/// How many segments toward the tail a push-up bleeds into.
const SMOOTH_STEPS: usize = 4;
/// Denominator of the backtrack falloff: step k gets weight `1 - (k-1)/3`.
const SMOOTH_FALLOFF_SPAN: f32 = 3.0;
/// Base climb rate (units/sec) of the smoothing nudge.
const SMOOTH_SPEED: f32 = 5.0;
/// Extra allowance above the scaled height cap for smoothed segments.
const SMOOTH_HEADROOM: f32 = 0.2;

/// Per-frame pass that keeps the displayed body from passing through itself.
///
/// Runs four ordered phases over the chain: reset flags, detect and push up,
/// backward smoothing, relax. Only the visual offset layer and the per-frame
/// flags are mutated; path positions are read-only here, so detection always
/// sees one coherent snapshot of the path.
///
/// Detection is O(N^2) in the segment count (every probe tests every far
/// edge). Fine at the expected chain lengths, but this is the first place to
/// look if long chains get expensive; probes are independent and could run in
/// parallel over a read-only chain.
#[derive(Debug, Clone, Copy)]
pub struct IntersectionResolver {
    /// Radius of the probe sphere centered on every segment's path position.
    pub probe_radius: f32,
    /// Minimum chain distance before an edge counts as "far": prevents a
    /// segment from flagging its own near neighbors.
    pub neighbor_gap: usize,
    /// Climb rate (units/sec) applied to intersecting segments.
    pub raise_speed: f32,
    /// Hard cap on the visual lift height.
    pub max_lift: f32,
    /// Descent rate (units/sec) for segments that are clear this frame.
    pub relax_speed: f32,
}

impl Default for IntersectionResolver {
    fn default() -> Self {
        Self {
            probe_radius: 4.0,
            neighbor_gap: 10,
            raise_speed: 20.0,
            max_lift: 3.0,
            relax_speed: 5.0,
        }
    }
}

impl IntersectionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one resolution pass. `dt` is the frame delta time in seconds.
    pub fn resolve(&self, chain: &mut BodyChain, dt: f32) {
        let segments = chain.segments_mut();
        let count = segments.len();

        // Phase 1: reset per-frame flags.
        for segment in segments.iter_mut() {
            segment.pushed_up_this_frame = false;
        }

        // Phase 2: probe every segment against every far edge of the path
        // and push intersecting segments' visual layer up.
        for i in 0..count {
            let center = segments[i].transform.position;

            let mut intersecting = false;
            for j in (i + self.neighbor_gap)..count.saturating_sub(1) {
                let p1 = segments[j].transform.position;
                let p2 = segments[j + 1].transform.position;
                if segment_intersects_sphere(p1, p2, center, self.probe_radius) {
                    intersecting = true;
                }
            }

            if intersecting {
                let segment = &mut segments[i];
                let lifted = segment.visual.position.y + self.raise_speed * dt;
                segment.visual.position.y = lifted.min(self.max_lift);
                segment.pushed_up_this_frame = true;
            }
        }

        // Phase 3: backward smoothing, tail to head. Every pushed-up segment
        // bleeds a decaying nudge into the next few tailward segments so the
        // lift does not start as a step. First writer wins per segment per
        // frame, so this order must not change.
        for i in (0..count).rev() {
            if !segments[i].pushed_up_this_frame {
                continue;
            }
            for step in 1..=SMOOTH_STEPS {
                let index = i + step;
                if index >= count || segments[index].pushed_up_this_frame {
                    continue;
                }

                let falloff = 1.0 - (step - 1) as f32 / SMOOTH_FALLOFF_SPAN;
                let limit = self.max_lift * falloff + SMOOTH_HEADROOM;

                let segment = &mut segments[index];
                let nudged = segment.visual.position.y + falloff * SMOOTH_SPEED * dt;
                segment.visual.position.y = nudged.min(limit);
                segment.pushed_up_this_frame = true;
            }
        }

        // Phase 4: relax everything that was not held up this frame back
        // toward the ground.
        for segment in segments.iter_mut() {
            if !segment.pushed_up_this_frame {
                let lowered = segment.visual.position.y - self.relax_speed * dt;
                segment.visual.position.y = lowered.max(0.0);
            }
        }
    }
}

/// Line segment vs. sphere test used by the detection phase.
///
/// Solves `‖p1 + t·dir − center‖ = radius` for the normalized edge direction
/// and accepts roots in [0, 1]. The root range is expressed in units of the
/// normalized direction (not the edge length); edges starting inside or
/// within one unit of the sphere surface are the ones that register, which
/// matches the short-edge chains this runs against.
pub fn segment_intersects_sphere(p1: Vec3, p2: Vec3, center: Vec3, radius: f32) -> bool {
    let direction = (p2 - p1).normalize_or_zero();
    let to_p1 = p1 - center;

    let alpha = direction.dot(to_p1);
    let theta = alpha * alpha - (to_p1.length_squared() - radius * radius);
    if theta < 0.0 {
        return false;
    }

    let root = theta.sqrt();
    let d1 = -alpha + root;
    let d2 = -alpha - root;
    let in_range = |d: f32| (0.0..=1.0).contains(&d);

    // If one root is out of range there is only an intersection if the other
    // is in range; two in-range roots always intersect.
    if !in_range(d1) {
        return in_range(d2);
    }
    if !in_range(d2) {
        return in_range(d1);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_leaving_sphere_interior_intersects() {
        // p1 inside the unit sphere: the near root is in range.
        assert!(segment_intersects_sphere(
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::ZERO,
            1.0,
        ));
    }

    #[test]
    fn edge_entering_sphere_intersects() {
        // p1 just outside the surface, pointing in: the far root branch.
        assert!(segment_intersects_sphere(
            Vec3::new(1.5, 0.0, 0.0),
            Vec3::new(-10.0, 0.0, 0.0),
            Vec3::ZERO,
            1.0,
        ));
    }

    #[test]
    fn edge_entirely_outside_does_not_intersect() {
        assert!(!segment_intersects_sphere(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(20.0, 0.0, 0.0),
            Vec3::ZERO,
            1.0,
        ));
    }

    #[test]
    fn edge_missing_sphere_does_not_intersect() {
        // Passes beside the sphere: discriminant negative.
        assert!(!segment_intersects_sphere(
            Vec3::new(-1.0, 5.0, 0.0),
            Vec3::new(1.0, 5.0, 0.0),
            Vec3::ZERO,
            1.0,
        ));
    }

    #[test]
    fn degenerate_edge_inside_sphere_intersects() {
        // Zero-length edge normalizes to a zero direction; alpha = 0, and the
        // point's own distance decides.
        assert!(segment_intersects_sphere(
            Vec3::new(0.2, 0.0, 0.0),
            Vec3::new(0.2, 0.0, 0.0),
            Vec3::ZERO,
            1.0,
        ));
    }

    fn straight_chain(count: usize) -> BodyChain {
        BodyChain::new(Vec3::ZERO, Vec3::Z, 1.0, count).unwrap()
    }

    /// Fold the chain so the tail end passes right through segment 2's probe
    /// sphere while staying more than `neighbor_gap` links away.
    fn folded_chain() -> BodyChain {
        let mut chain = straight_chain(20);
        for i in 15..20 {
            let t = (i - 15) as f32;
            chain.segments_mut()[i].transform.position = Vec3::new(0.0, 0.0, t - 2.0);
        }
        chain
    }

    #[test]
    fn clear_chain_relaxes_toward_zero_without_going_negative() {
        let mut chain = straight_chain(30);
        for segment in chain.segments_mut() {
            segment.visual.position.y = 0.05;
        }

        let resolver = IntersectionResolver::new();
        resolver.resolve(&mut chain, 1.0 / 60.0);
        for segment in chain.segments() {
            assert!(segment.visual.position.y < 0.05);
            assert!(segment.visual.position.y >= 0.0);
        }

        // A second pass bottoms out at exactly zero.
        resolver.resolve(&mut chain, 1.0);
        for segment in chain.segments() {
            assert_eq!(segment.visual.position.y, 0.0);
        }
    }

    #[test]
    fn folded_chain_pushes_probe_segment_up() {
        let mut chain = folded_chain();
        let resolver = IntersectionResolver::new();
        resolver.resolve(&mut chain, 1.0 / 60.0);

        let probed = &chain.segments()[2];
        assert!(probed.pushed_up_this_frame);
        assert!(probed.visual.position.y > 0.0);
    }

    #[test]
    fn lift_clamps_at_max_height() {
        let mut chain = folded_chain();
        let resolver = IntersectionResolver::new();
        // Far more frames than needed to reach the cap.
        for _ in 0..120 {
            resolver.resolve(&mut chain, 1.0 / 30.0);
        }
        for segment in chain.segments() {
            assert!(segment.visual.position.y <= resolver.max_lift + SMOOTH_HEADROOM + 1e-5);
        }
        assert!((chain.segments()[2].visual.position.y - resolver.max_lift).abs() < 1e-5);
    }

    #[test]
    fn smoothing_marks_tailward_neighbors() {
        let mut chain = folded_chain();
        let resolver = IntersectionResolver::new();
        resolver.resolve(&mut chain, 1.0 / 60.0);

        // Segments 2 through 6 all have a folded edge touching their probe
        // sphere and get the full direct push; the smoothing phase bleeds
        // into the segments just past them.
        let segments = chain.segments();
        for i in 2..=6 {
            assert!(segments[i].pushed_up_this_frame);
            assert!(segments[i].visual.position.y > 0.0);
        }
        assert!(segments[7].pushed_up_this_frame);
        assert!(segments[7].visual.position.y > 0.0);
        // Smoothed nudge is weaker than the direct push.
        assert!(segments[7].visual.position.y < segments[2].visual.position.y);
        // The last backtrack step has zero falloff weight but is still
        // claimed for the frame.
        assert!(segments[10].pushed_up_this_frame);
        assert_eq!(segments[10].visual.position.y, 0.0);
        // Past the smoothing reach nothing is held up.
        assert!(!segments[11].pushed_up_this_frame);
    }

    #[test]
    fn pushed_up_segment_is_not_relaxed_same_frame() {
        let mut chain = folded_chain();
        let resolver = IntersectionResolver::new();
        let dt = 1.0 / 60.0;

        resolver.resolve(&mut chain, dt);
        let lift_after_first = chain.segments()[2].visual.position.y;
        resolver.resolve(&mut chain, dt);
        // Still intersecting: the lift keeps growing, no relax was applied.
        assert!(chain.segments()[2].visual.position.y > lift_after_first);
    }
}
