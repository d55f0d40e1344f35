//! Polygon obstacles
//!
//! An obstacle is a closed polygon in local space, placed in the world by a
//! position and a rotation. Reflective obstacles bounce the ray; absorptive
//! ones stop it.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::segment_intersect;
use crate::consts::*;
use crate::wrap_angle;

/// Stable handle for a movable obstacle in a [`Scene`](super::Scene)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u32);

/// Display colours carried through the level format (not used by tracing)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleStyle {
    pub color: u32,
    pub line_color: u32,
    pub fill_alpha: f32,
}

impl Default for ObstacleStyle {
    fn default() -> Self {
        Self {
            color: BOX_COLOR,
            line_color: BOX_LINE_COLOR,
            fill_alpha: BOX_FILL_ALPHA,
        }
    }
}

/// One edge crossing found by [`Obstacle::query_collisions`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeHit {
    /// World-space crossing point
    pub point: DVec2,
    /// Edge vector (next vertex - current vertex), used for reflection
    pub edge: DVec2,
}

/// A transformed polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Local-space vertices; edges join consecutive vertices and wrap last -> first
    pub vertices: Vec<DVec2>,
    pub pos: DVec2,
    /// Rotation (radians)
    pub angle: f64,
    /// Bounces the ray when true, absorbs it when false
    pub reflective: bool,
    /// Player may drag/rotate/delete it
    pub editable: bool,
    #[serde(default)]
    pub style: ObstacleStyle,
}

impl Obstacle {
    /// Create an obstacle from local vertices (at least 3)
    pub fn new(vertices: Vec<DVec2>, pos: DVec2, angle: f64, reflective: bool) -> Self {
        debug_assert!(vertices.len() >= 3, "polygon needs at least 3 vertices");
        Self {
            vertices,
            pos,
            angle,
            reflective,
            editable: false,
            style: ObstacleStyle::default(),
        }
    }

    /// The default 100x100 square centred on its position
    pub fn square(pos: DVec2, angle: f64, reflective: bool) -> Self {
        Self::new(default_square(), pos, angle, reflective)
    }

    /// Axis-aligned rectangle `(0,0)-(w,0)-(w,h)-(0,h)` at the origin, always reflective
    pub fn boundary(width: f64, height: f64) -> Self {
        Self::new(boundary_vertices(width, height), DVec2::ZERO, 0.0, true)
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_style(mut self, style: ObstacleStyle) -> Self {
        self.style = style;
        self
    }

    /// Rotate by `delta` radians, keeping the angle in [0, 2π)
    pub fn rotate(&mut self, delta: f64) {
        self.angle = wrap_angle(self.angle + delta);
    }

    /// Vertices after rotation then translation
    pub fn world_vertices(&self) -> Vec<DVec2> {
        let rotation = DVec2::from_angle(self.angle);
        self.vertices
            .iter()
            .map(|&v| self.pos + rotation.rotate(v))
            .collect()
    }

    /// Every edge crossed by `start`-`end`, in edge order
    pub fn query_collisions(&self, start: DVec2, end: DVec2) -> Vec<EdgeHit> {
        let world = self.world_vertices();
        let count = world.len();

        (0..count)
            .filter_map(|i| {
                let current = world[i];
                let next = world[(i + 1) % count];
                segment_intersect(start, end, current, next).map(|point| EdgeHit {
                    point,
                    edge: next - current,
                })
            })
            .collect()
    }
}

/// Local vertices of the default square
pub fn default_square() -> Vec<DVec2> {
    let h = BOX_HALF_EXTENT;
    vec![
        DVec2::new(-h, -h),
        DVec2::new(-h, h),
        DVec2::new(h, h),
        DVec2::new(h, -h),
    ]
}

/// Vertices of the play-field outline
pub fn boundary_vertices(width: f64, height: f64) -> Vec<DVec2> {
    vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(width, 0.0),
        DVec2::new(width, height),
        DVec2::new(0.0, height),
    ]
}

/// Templates for newly placed obstacles (the creation strip in the editor)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstaclePalette {
    /// White mirror square
    Reflective,
    /// Black absorbing square
    Absorptive,
}

impl ObstaclePalette {
    /// A movable default square of this kind at `pos`
    pub fn create(self, pos: DVec2) -> Obstacle {
        let (color, reflective) = match self {
            ObstaclePalette::Reflective => (PALETTE_MIRROR_COLOR, true),
            ObstaclePalette::Absorptive => (PALETTE_ABSORBER_COLOR, false),
        };
        Obstacle::square(pos, 0.0, reflective)
            .with_editable(true)
            .with_style(ObstacleStyle {
                color,
                line_color: PALETTE_LINE_COLOR,
                fill_alpha: BOX_FILL_ALPHA,
            })
    }
}
