//! Deterministic simulation module
//!
//! All puzzle logic lives here. This module must be pure and deterministic:
//! - Every trace recomputes from scratch
//! - Seeded RNG only
//! - Stable iteration order (insertion order, boundary last)
//! - No rendering or platform dependencies

pub mod geometry;
pub mod obstacle;
pub mod scene;
pub mod target;
pub mod tick;
pub mod tracer;

pub use geometry::{point_on_segment, reflect, segment_circle_intersect, segment_intersect};
pub use obstacle::{EdgeHit, Obstacle, ObstacleId, ObstaclePalette, ObstacleStyle};
pub use scene::{Scene, SceneObstacle, Selection};
pub use target::Target;
pub use tick::{PointerState, TickInput, tick};
pub use tracer::{RayTracer, Trace, TraceStatus};
