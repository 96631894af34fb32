//! Waypoint patrol: the path source that feeds the creature's head.

use glam::Vec3;

/// Cycles through a fixed list of patrol points, advancing whenever the
/// follower gets close enough to the current target.
#[derive(Debug, Clone)]
pub struct WaypointPatrol {
    points: Vec<Vec3>,
    current: usize,
    reach_distance: f32,
}

impl WaypointPatrol {
    pub fn new(points: Vec<Vec3>, reach_distance: f32) -> Self {
        Self {
            points,
            current: 0,
            reach_distance,
        }
    }

    /// The waypoint currently being traveled toward.
    pub fn target(&self) -> Option<Vec3> {
        self.points.get(self.current).copied()
    }

    /// Advance to the next waypoint (wrapping) once `position` is within
    /// reach of the current one. Returns true when the target changed.
    pub fn update(&mut self, position: Vec3) -> bool {
        let Some(target) = self.target() else {
            return false;
        };
        if position.distance(target) < self.reach_distance {
            self.current = (self.current + 1) % self.points.len();
            log::debug!("waypoint reached, next target {:?}", self.target());
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_waypoints() {
        let mut patrol = WaypointPatrol::new(
            vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)],
            5.0,
        );
        assert_eq!(patrol.target(), Some(Vec3::ZERO));

        // Too far: stays on the first target.
        assert!(!patrol.update(Vec3::new(20.0, 0.0, 0.0)));
        assert_eq!(patrol.target(), Some(Vec3::ZERO));

        assert!(patrol.update(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(patrol.target(), Some(Vec3::new(10.0, 0.0, 0.0)));

        // Wraps back around.
        assert!(patrol.update(Vec3::new(9.0, 0.0, 0.0)));
        assert_eq!(patrol.target(), Some(Vec3::ZERO));
    }

    #[test]
    fn empty_patrol_has_no_target() {
        let mut patrol = WaypointPatrol::new(Vec::new(), 5.0);
        assert_eq!(patrol.target(), None);
        assert!(!patrol.update(Vec3::ZERO));
    }
}
