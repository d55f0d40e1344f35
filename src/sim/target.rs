//! Circular goal

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::segment_circle_intersect;
use crate::consts::DEFAULT_GOAL_RADIUS;

/// The goal the ray must reach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub pos: DVec2,
    pub radius: f64,
    /// Player may drag it
    pub movable: bool,
    /// Set by the most recent trace; never persisted
    ///
    /// When active, the path ends on the circle, except when the final
    /// segment starts inside it: the path then stops at that start point.
    #[serde(skip)]
    pub active: bool,
}

impl Target {
    pub fn new(pos: DVec2, radius: f64) -> Self {
        Self {
            pos,
            radius,
            movable: false,
            active: false,
        }
    }

    /// Default goal for a field: a third of the way in, radius 15
    pub fn default_for_field(width: f64, height: f64) -> Self {
        Self {
            movable: true,
            ..Self::new(DVec2::new(width / 3.0, height / 3.0), DEFAULT_GOAL_RADIUS)
        }
    }

    /// Where `start`-`end` first enters the goal, if it does
    #[inline]
    pub fn query_collision(&self, start: DVec2, end: DVec2) -> Option<DVec2> {
        segment_circle_intersect(start, end, self.pos, self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_collision() {
        let target = Target::new(DVec2::new(100.0, 100.0), 15.0);
        let hit = target.query_collision(DVec2::new(100.0, 300.0), DVec2::new(100.0, -300.0));
        assert!((hit.unwrap() - DVec2::new(100.0, 115.0)).length() < 1e-9);

        assert!(target
            .query_collision(DVec2::new(200.0, 300.0), DVec2::new(200.0, -300.0))
            .is_none());
    }

    #[test]
    fn test_active_not_serialized() {
        let mut target = Target::default_for_field(300.0, 600.0);
        target.active = true;
        let json = serde_json::to_string(&target).unwrap();
        let back: Target = serde_json::from_str(&json).unwrap();
        assert!(!back.active);
        assert_eq!(back.pos, DVec2::new(100.0, 200.0));
    }
}
