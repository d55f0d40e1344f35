//! Multi-bounce ray tracing
//!
//! The emitter casts a straight segment, finds the nearest thing it strikes,
//! and either reflects (reflective obstacle), stops (absorptive obstacle or
//! goal), or runs out of bounces. Each trace builds a fresh [`Trace`] from
//! scratch; nothing is cached between calls.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::reflect;
use super::obstacle::Obstacle;
use super::target::Target;
use crate::consts::*;
use crate::{heading, ray_length_for_field, wrap_angle};

/// How a trace ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceStatus {
    /// The ray reached the goal
    HitTarget,
    /// The ray struck a non-reflective obstacle
    Absorbed,
    /// The bounce budget ran out while the ray was still reflecting
    Exhausted,
    /// The ray left without striking any obstacle
    Escaped,
    /// Idle stub, nothing was queried
    Resting,
}

/// Result of one trace
///
/// `points` are relative to `origin` (the emitter position at trace time);
/// consecutive points are straight segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub origin: DVec2,
    pub points: Vec<DVec2>,
    pub status: TraceStatus,
    /// Number of reflections in the path
    pub bounces: u32,
}

impl Trace {
    /// Whether this trace activated the goal
    #[inline]
    pub fn target_hit(&self) -> bool {
        self.status == TraceStatus::HitTarget
    }

    /// Path points in world space
    pub fn world_points(&self) -> Vec<DVec2> {
        self.points.iter().map(|&p| p + self.origin).collect()
    }

    /// Final point in world space
    pub fn end(&self) -> DVec2 {
        self.points.last().copied().unwrap_or(DVec2::ZERO) + self.origin
    }
}

/// Nearest obstacle crossing on a segment
#[derive(Debug, Clone, Copy)]
struct NearestHit {
    point: DVec2,
    edge: DVec2,
    distance: f64,
    reflective: bool,
}

/// The laser emitter and its tracing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RayTracer {
    pub pos: DVec2,
    /// Direction (radians)
    pub angle: f64,
    /// Maximum reflections per trace
    pub max_bounces: u32,
    /// Length of every cast segment before clipping
    pub max_length: f64,
    /// Player may drag/rotate it
    pub movable: bool,
}

impl RayTracer {
    pub fn new(pos: DVec2, angle: f64, max_bounces: u32, max_length: f64) -> Self {
        Self {
            pos,
            angle,
            max_bounces,
            max_length,
            movable: false,
        }
    }

    /// Default emitter for a field: centred, pointing along +x, 5 bounces
    pub fn default_for_field(width: f64, height: f64) -> Self {
        Self {
            movable: true,
            ..Self::new(
                DVec2::new(width / 2.0, height / 2.0),
                0.0,
                DEFAULT_BOUNCES,
                ray_length_for_field(width, height),
            )
        }
    }

    /// Rotate by `delta` radians, keeping the angle in [0, 2π)
    pub fn rotate(&mut self, delta: f64) {
        self.angle = wrap_angle(self.angle + delta);
    }

    /// Run a full trace against `obstacles` and `target`
    ///
    /// `obstacles` is iterated once per query; its order decides exact
    /// distance ties (first wins).
    pub fn trace<'a, I>(&self, obstacles: I, target: &Target) -> Trace
    where
        I: Iterator<Item = &'a Obstacle> + Clone,
    {
        let mut points = vec![DVec2::ZERO, heading(self.angle) * self.max_length];
        let mut bounce = 0u32;
        let mut last = None;

        while bounce < self.max_bounces {
            let i = bounce as usize;
            let start = points[i] + self.pos;
            let end = points[i + 1] + self.pos;

            match strike(obstacles.clone(), target, start, end) {
                Strike::Obstacle(hit) if hit.reflective => {
                    points[i + 1] = hit.point - self.pos;
                    let reflected = reflect(end - start, hit.edge);
                    points.push(points[i + 1] + reflected);
                    bounce += 1;
                }
                other => {
                    last = Some(other);
                    break;
                }
            }
        }

        // Out of bounces (or never started): the last segment is still unclipped
        let n = points.len();
        let last = last.unwrap_or_else(|| {
            strike(obstacles, target, points[n - 2] + self.pos, points[n - 1] + self.pos)
        });

        let status = match last {
            Strike::Goal(point) => {
                points[n - 1] = point - self.pos;
                TraceStatus::HitTarget
            }
            Strike::Obstacle(hit) => {
                points[n - 1] = hit.point - self.pos;
                if hit.reflective {
                    TraceStatus::Exhausted
                } else {
                    TraceStatus::Absorbed
                }
            }
            Strike::Clear => TraceStatus::Escaped,
        };

        log::debug!(
            "Trace from ({:.1}, {:.1}): {:?} after {} bounces, {} points",
            self.pos.x,
            self.pos.y,
            status,
            bounce,
            points.len()
        );

        Trace {
            origin: self.pos,
            points,
            status,
            bounces: bounce,
        }
    }

    /// Short stub along the current heading, with no collision queries
    ///
    /// Shown while something is being dragged or rotated and no shot has
    /// been fired.
    pub fn rest(&self, length: f64) -> Trace {
        Trace {
            origin: self.pos,
            points: vec![DVec2::ZERO, heading(self.angle) * length],
            status: TraceStatus::Resting,
            bounces: 0,
        }
    }
}

/// What a single segment runs into first
#[derive(Debug, Clone, Copy)]
enum Strike {
    Goal(DVec2),
    Obstacle(NearestHit),
    Clear,
}

/// Nearest strike on `start`-`end`; the goal only wins when strictly closer
fn strike<'a, I>(obstacles: I, target: &Target, start: DVec2, end: DVec2) -> Strike
where
    I: Iterator<Item = &'a Obstacle>,
{
    let hit = nearest_obstacle_hit(obstacles, start, end);
    match (target.query_collision(start, end), hit) {
        (Some(goal), Some(hit)) if goal.distance(start) < hit.distance => Strike::Goal(goal),
        (Some(goal), None) => Strike::Goal(goal),
        (_, Some(hit)) => Strike::Obstacle(hit),
        (None, None) => Strike::Clear,
    }
}

/// Closest obstacle crossing to `start` over all obstacles and edges
fn nearest_obstacle_hit<'a, I>(obstacles: I, start: DVec2, end: DVec2) -> Option<NearestHit>
where
    I: Iterator<Item = &'a Obstacle>,
{
    let mut nearest: Option<NearestHit> = None;

    for obstacle in obstacles {
        for hit in obstacle.query_collisions(start, end) {
            let distance = hit.point.distance(start);
            if nearest.is_none_or(|n| distance < n.distance) {
                nearest = Some(NearestHit {
                    point: hit.point,
                    edge: hit.edge,
                    distance,
                    reflective: obstacle.reflective,
                });
            }
        }
    }

    nearest
}
