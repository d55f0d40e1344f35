//! Laser Bounce - A 2D light-ray reflection puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry kernel, obstacles, ray tracer, scene)
//! - `level`: Level text format (decode/encode)
//! - `persistence`: Named level slots
//! - `settings`: Player preferences and editor clamp ranges
//! - `web`: Browser bindings (wasm32 only)

pub mod level;
pub mod persistence;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use level::{ExportMode, Level};
pub use persistence::LevelStore;
pub use settings::{FireMode, Limits, Settings};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Play field used when a level does not specify one
    pub const DEFAULT_FIELD_WIDTH: f64 = 500.0;
    pub const DEFAULT_FIELD_HEIGHT: f64 = 500.0;

    /// Added to the field diagonal so a ray always leaves the boundary wall
    pub const RAY_LENGTH_MARGIN: f64 = 10.0;

    /// Emitter defaults
    pub const DEFAULT_BOUNCES: u32 = 5;
    /// Length of the stub drawn while the emitter is idle (not firing)
    pub const REST_LENGTH: f64 = 50.0;

    /// Goal defaults
    pub const DEFAULT_GOAL_RADIUS: f64 = 15.0;

    /// Default obstacle half extent (100x100 square)
    pub const BOX_HALF_EXTENT: f64 = 50.0;
    pub const BOX_COLOR: u32 = 0xffffff;
    pub const BOX_LINE_COLOR: u32 = 0x7a7a7a;
    pub const BOX_FILL_ALPHA: f32 = 0.3;

    /// Editor creation strip
    pub const PALETTE_MIRROR_COLOR: u32 = 0xffffff;
    pub const PALETTE_ABSORBER_COLOR: u32 = 0x000000;
    pub const PALETTE_LINE_COLOR: u32 = 0x111111;

    /// Open interval margin for segment/segment parameters (10 ulp at 1.0)
    pub const SEGMENT_EPSILON: f64 = f64::EPSILON * 10.0;
    /// Absolute tolerance (world units) for the point-on-segment test
    pub const ON_SEGMENT_TOLERANCE: f64 = 0.001;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(std::f64::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f64::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Unit direction for an angle (radians, y axis pointing down the screen)
#[inline]
pub fn heading(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}

/// Length of the ray needed to cross a `width` x `height` field
#[inline]
pub fn ray_length_for_field(width: f64, height: f64) -> f64 {
    (width * width + height * height).sqrt() + consts::RAY_LENGTH_MARGIN
}
