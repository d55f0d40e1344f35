//! Player preferences and editor limits
//!
//! Preferences are persisted separately from levels in LocalStorage.
//! The limits are the documented valid ranges: callers clamp editor input
//! with them before handing values to the scene.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// When the laser is traced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FireMode {
    /// Trace every frame and after every change
    #[default]
    Continuous,
    /// Show the idle stub until the player fires
    Discrete,
}

impl FireMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FireMode::Continuous => "Continuous",
            FireMode::Discrete => "Discrete",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "continuous" | "edit" => Some(FireMode::Continuous),
            "discrete" | "play" => Some(FireMode::Discrete),
            _ => None,
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub fire_mode: FireMode,
    /// Rotation speed for held rotate buttons (radians/sec)
    pub rotate_speed: f64,
    /// Length of the idle stub
    pub rest_length: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fire_mode: FireMode::Continuous,
            // 0.01 rad per frame at 60 Hz
            rotate_speed: 0.6,
            rest_length: REST_LENGTH,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "laser_bounce_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Stored settings unreadable ({}), using defaults", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Valid ranges for editor-controlled values
pub struct Limits;

impl Limits {
    pub const FIELD_MIN: f64 = 100.0;
    pub const FIELD_MAX: f64 = 10000.0;
    pub const BOUNCES_MAX: u32 = 10000;
    pub const GOAL_RADIUS_MIN: f64 = 1.0;
    pub const GOAL_RADIUS_MAX: f64 = 100.0;

    /// Clamp a field width or height
    pub fn field_dimension(value: f64) -> f64 {
        if value.is_nan() {
            return DEFAULT_FIELD_WIDTH;
        }
        value.clamp(Self::FIELD_MIN, Self::FIELD_MAX)
    }

    /// Clamp a bounce budget
    pub fn bounces(value: f64) -> u32 {
        if value.is_nan() {
            return DEFAULT_BOUNCES;
        }
        value.clamp(0.0, Self::BOUNCES_MAX as f64) as u32
    }

    /// Clamp a goal radius
    pub fn goal_radius(value: f64) -> f64 {
        if value.is_nan() {
            return DEFAULT_GOAL_RADIUS;
        }
        value.clamp(Self::GOAL_RADIUS_MIN, Self::GOAL_RADIUS_MAX)
    }

    /// Editor text box -> clamped field dimension (default when not a number)
    pub fn parse_field_dimension(text: &str) -> f64 {
        Self::field_dimension(parse_number(text))
    }

    pub fn parse_bounces(text: &str) -> u32 {
        Self::bounces(parse_number(text))
    }

    pub fn parse_goal_radius(text: &str) -> f64 {
        Self::goal_radius(parse_number(text))
    }
}

/// Parse a number the way a text box reads: blank is 0, junk is NaN
pub(crate) fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    text.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_mode_from_str() {
        assert_eq!(FireMode::from_str("Discrete"), Some(FireMode::Discrete));
        assert_eq!(FireMode::from_str("play"), Some(FireMode::Discrete));
        assert_eq!(FireMode::from_str("nope"), None);
        assert_eq!(FireMode::Continuous.as_str(), "Continuous");
    }

    #[test]
    fn test_field_dimension_limits() {
        assert_eq!(Limits::parse_field_dimension("50"), 100.0);
        assert_eq!(Limits::parse_field_dimension("20000"), 10000.0);
        assert_eq!(Limits::parse_field_dimension(" 640 "), 640.0);
        assert_eq!(Limits::parse_field_dimension("wide"), 500.0);
        // Blank reads as 0, clamped up
        assert_eq!(Limits::parse_field_dimension(""), 100.0);
    }

    #[test]
    fn test_bounce_limits() {
        assert_eq!(Limits::parse_bounces("-3"), 0);
        assert_eq!(Limits::parse_bounces("7"), 7);
        assert_eq!(Limits::parse_bounces("99999"), 10000);
        assert_eq!(Limits::parse_bounces("x"), 5);
    }

    #[test]
    fn test_goal_radius_limits() {
        assert_eq!(Limits::parse_goal_radius("0"), 1.0);
        assert_eq!(Limits::parse_goal_radius("250"), 100.0);
        assert_eq!(Limits::parse_goal_radius("?"), 15.0);
    }

    #[test]
    fn test_settings_json_roundtrip() {
        let settings = Settings {
            fire_mode: FireMode::Discrete,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fire_mode, FireMode::Discrete);
        assert_eq!(back.rest_length, REST_LENGTH);
    }
}
