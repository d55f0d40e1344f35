//! Scene: everything the ray can interact with
//!
//! The scene owns the boundary wall, the movable obstacles, the goal and the
//! emitter. Every mutation goes through a method that refreshes the current
//! trace, so the emitted path is never stale.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::obstacle::{Obstacle, ObstacleId, boundary_vertices, default_square};
use super::target::Target;
use super::tracer::{RayTracer, Trace};
use crate::consts::*;
use crate::ray_length_for_field;
use crate::settings::FireMode;

/// A movable obstacle with its handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObstacle {
    pub id: ObstacleId,
    pub obstacle: Obstacle,
}

/// What the player can pick up and move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Emitter,
    Target,
    Obstacle(ObstacleId),
}

/// Complete puzzle state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    width: f64,
    height: f64,
    /// Play-field outline; never serialized into levels, never deletable
    boundary: Obstacle,
    /// Movable obstacles (kept in insertion order)
    obstacles: Vec<SceneObstacle>,
    pub target: Target,
    tracer: RayTracer,
    pub mode: FireMode,
    /// Length of the idle stub shown in discrete mode
    pub rest_length: f64,
    /// Last trace result (rebuilt from scratch on every refresh)
    #[serde(skip)]
    trace: Option<Trace>,
    next_id: u32,
}

impl Scene {
    /// Empty field with the default emitter and goal
    pub fn new(width: f64, height: f64) -> Self {
        let tracer = RayTracer::default_for_field(width, height);
        let target = Target::default_for_field(width, height);
        Self::with_parts(width, height, tracer, target, Vec::new())
    }

    /// Build a scene from pre-validated parts
    ///
    /// The emitter's ray length is reset to fit the field.
    pub fn with_parts(
        width: f64,
        height: f64,
        mut tracer: RayTracer,
        target: Target,
        obstacles: Vec<Obstacle>,
    ) -> Self {
        tracer.max_length = ray_length_for_field(width, height);
        let mut scene = Self {
            width,
            height,
            boundary: Obstacle::boundary(width, height),
            obstacles: Vec::with_capacity(obstacles.len()),
            target,
            tracer,
            mode: FireMode::Continuous,
            rest_length: REST_LENGTH,
            trace: None,
            next_id: 1,
        };
        for obstacle in obstacles {
            let id = scene.next_obstacle_id();
            scene.obstacles.push(SceneObstacle { id, obstacle });
        }
        scene.refresh();
        scene
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn boundary(&self) -> &Obstacle {
        &self.boundary
    }

    pub fn tracer(&self) -> &RayTracer {
        &self.tracer
    }

    /// Movable obstacles in insertion order
    pub fn obstacles(&self) -> &[SceneObstacle] {
        &self.obstacles
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles
            .iter()
            .find(|o| o.id == id)
            .map(|o| &o.obstacle)
    }

    /// Every obstacle the ray can strike: movables first, then the boundary
    pub fn all_obstacles(&self) -> impl Iterator<Item = &Obstacle> + Clone {
        self.obstacles
            .iter()
            .map(|o| &o.obstacle)
            .chain(std::iter::once(&self.boundary))
    }

    /// Current path (trace or rest stub)
    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    fn next_obstacle_id(&mut self) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Run a full trace and update the goal's activation
    pub fn fire(&mut self) -> &Trace {
        let trace = self.tracer.trace(self.all_obstacles(), &self.target);
        self.target.active = trace.target_hit();
        self.trace.insert(trace)
    }

    /// Show the idle stub and clear the goal's activation
    pub fn rest(&mut self) -> &Trace {
        self.target.active = false;
        self.trace.insert(self.tracer.rest(self.rest_length))
    }

    /// Recompute the path after a change, according to the fire mode
    pub fn refresh(&mut self) {
        match self.mode {
            FireMode::Continuous => {
                self.fire();
            }
            FireMode::Discrete => {
                self.rest();
            }
        }
    }

    /// Switch fire mode and refresh
    pub fn set_mode(&mut self, mode: FireMode) {
        self.mode = mode;
        self.refresh();
    }

    /// Add a movable obstacle, returning its handle
    pub fn add_obstacle(&mut self, obstacle: Obstacle) -> ObstacleId {
        let id = self.next_obstacle_id();
        log::info!("Added obstacle {:?} at ({:.1}, {:.1})", id, obstacle.pos.x, obstacle.pos.y);
        self.obstacles.push(SceneObstacle { id, obstacle });
        self.refresh();
        id
    }

    /// Remove an obstacle; the boundary has no handle and cannot be removed
    ///
    /// Clears `selection` when it referred to the removed obstacle.
    pub fn remove_obstacle(
        &mut self,
        id: ObstacleId,
        selection: &mut Option<Selection>,
    ) -> Option<Obstacle> {
        let index = self.obstacles.iter().position(|o| o.id == id)?;
        let removed = self.obstacles.remove(index);
        if *selection == Some(Selection::Obstacle(id)) {
            *selection = None;
        }
        log::info!("Removed obstacle {:?}", id);
        self.refresh();
        Some(removed.obstacle)
    }

    /// Translate a selected object by `delta`
    ///
    /// Fixed emitters/goals and non-editable obstacles are left alone.
    /// Returns whether anything moved.
    pub fn drag(&mut self, selection: Selection, delta: DVec2) -> bool {
        let moved = match selection {
            Selection::Emitter if self.tracer.movable => {
                self.tracer.pos += delta;
                true
            }
            Selection::Target if self.target.movable => {
                self.target.pos += delta;
                true
            }
            Selection::Obstacle(id) => match self.obstacle_mut(id) {
                Some(obstacle) if obstacle.editable => {
                    obstacle.pos += delta;
                    true
                }
                _ => false,
            },
            _ => false,
        };
        if moved {
            self.refresh();
        }
        moved
    }

    /// Rotate a selected emitter or obstacle by `delta` radians
    pub fn rotate(&mut self, selection: Selection, delta: f64) -> bool {
        let rotated = match selection {
            Selection::Emitter if self.tracer.movable => {
                self.tracer.rotate(delta);
                true
            }
            Selection::Obstacle(id) => match self.obstacle_mut(id) {
                Some(obstacle) if obstacle.editable => {
                    obstacle.rotate(delta);
                    true
                }
                _ => false,
            },
            _ => false,
        };
        if rotated {
            self.refresh();
        }
        rotated
    }

    fn obstacle_mut(&mut self, id: ObstacleId) -> Option<&mut Obstacle> {
        self.obstacles
            .iter_mut()
            .find(|o| o.id == id)
            .map(|o| &mut o.obstacle)
    }

    /// Set the emitter's bounce budget (callers clamp first)
    pub fn set_max_bounces(&mut self, max_bounces: u32) {
        self.tracer.max_bounces = max_bounces;
        self.refresh();
    }

    /// Set the goal radius (callers clamp first)
    pub fn set_target_radius(&mut self, radius: f64) {
        self.target.radius = radius;
        self.refresh();
    }

    /// Resize the play field
    ///
    /// The boundary outline and the ray length change together.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.boundary.vertices = boundary_vertices(width, height);
        self.tracer.max_length = ray_length_for_field(width, height);
        log::info!("Field resized to {}x{}", width, height);
        self.refresh();
    }

    /// Place `count` random default squares, reproducible from `seed`
    pub fn scatter(&mut self, count: usize, seed: u64) -> Vec<ObstacleId> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ids = Vec::with_capacity(count);

        for _ in 0..count {
            let pos = DVec2::new(
                rng.random_range(0.0..=self.width.max(0.0)),
                rng.random_range(0.0..=self.height.max(0.0)),
            );
            let angle = rng.random_range(0.0..std::f64::consts::TAU);
            let reflective = rng.random_bool(0.5);
            let obstacle = Obstacle::new(default_square(), pos, angle, reflective).with_editable(true);

            let id = self.next_obstacle_id();
            self.obstacles.push(SceneObstacle { id, obstacle });
            ids.push(id);
        }

        log::info!("Scattered {} obstacles (seed {})", count, seed);
        self.refresh();
        ids
    }

    /// Pick the topmost object under `point`: emitter, then goal, then the
    /// most recently added obstacle containing the point
    pub fn pick(&self, point: DVec2, emitter_radius: f64) -> Option<Selection> {
        if self.tracer.pos.distance(point) <= emitter_radius {
            return Some(Selection::Emitter);
        }
        if self.target.pos.distance(point) <= self.target.radius {
            return Some(Selection::Target);
        }
        self.obstacles
            .iter()
            .rev()
            .find(|o| contains_point(&o.obstacle.world_vertices(), point))
            .map(|o| Selection::Obstacle(o.id))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT)
    }
}

/// Even-odd point-in-polygon test
fn contains_point(polygon: &[DVec2], point: DVec2) -> bool {
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
