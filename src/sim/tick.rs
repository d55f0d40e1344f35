//! Per-frame input handling
//!
//! The front end collects pointer/keyboard state into a [`TickInput`] and
//! calls [`tick`] once per frame. The current selection is owned by the
//! caller and passed in explicitly.

use glam::DVec2;

use super::obstacle::ObstaclePalette;
use super::scene::{Scene, Selection};
use crate::settings::{FireMode, Settings};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer pressed at this world point (selects what is under it)
    pub press_at: Option<DVec2>,
    /// Pointer released (ends the drag, keeps the selection)
    pub release: bool,
    /// Pointer movement since the last frame, in world units
    pub drag_delta: DVec2,
    /// Rotate the selection counter-clockwise (held)
    pub rotate_left: bool,
    /// Rotate the selection clockwise (held)
    pub rotate_right: bool,
    /// Delete the selected obstacle
    pub delete: bool,
    /// Fire the laser (discrete mode)
    pub fire: bool,
    /// Place a new obstacle from the palette at this world point
    pub place: Option<(ObstaclePalette, DVec2)>,
}

/// Pointer state carried between frames
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Current selection (the last thing pressed)
    pub selection: Option<Selection>,
    /// Pointer held down on the selection
    pub dragging: bool,
}

/// Pick radius around the emitter
pub const EMITTER_PICK_RADIUS: f64 = 10.0;

/// Apply one frame of input to the scene
///
/// `dt` is the frame time in seconds.
pub fn tick(scene: &mut Scene, pointer: &mut PointerState, input: &TickInput, settings: &Settings, dt: f64) {
    scene.rest_length = settings.rest_length;
    if scene.mode != settings.fire_mode {
        scene.set_mode(settings.fire_mode);
    }

    if let Some(point) = input.press_at {
        pointer.selection = scene.pick(point, EMITTER_PICK_RADIUS);
        pointer.dragging = pointer.selection.is_some();
    }

    if let Some((palette, pos)) = input.place {
        let id = scene.add_obstacle(palette.create(pos));
        pointer.selection = Some(Selection::Obstacle(id));
    }

    if let Some(selection) = pointer.selection {
        if pointer.dragging && input.drag_delta != DVec2::ZERO {
            scene.drag(selection, input.drag_delta);
        }

        let step = settings.rotate_speed * dt;
        if input.rotate_left {
            scene.rotate(selection, -step);
        }
        if input.rotate_right {
            scene.rotate(selection, step);
        }
    }

    if input.delete {
        match pointer.selection {
            Some(Selection::Obstacle(id)) => {
                let mut selection = pointer.selection;
                scene.remove_obstacle(id, &mut selection);
                pointer.selection = selection;
                pointer.dragging = false;
            }
            _ => log::warn!("Delete ignored: no obstacle selected"),
        }
    }

    if input.release {
        pointer.dragging = false;
    }

    match settings.fire_mode {
        FireMode::Continuous => {
            scene.fire();
        }
        FireMode::Discrete => {
            if input.fire {
                scene.fire();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Obstacle, RayTracer, Target, TraceStatus};
    use std::f64::consts::FRAC_PI_2;

    fn scene() -> Scene {
        let mut tracer = RayTracer::new(DVec2::new(250.0, 400.0), -FRAC_PI_2, 5, 0.0);
        tracer.movable = true;
        let target = Target::new(DVec2::new(50.0, 50.0), 15.0);
        let square = Obstacle::square(DVec2::new(250.0, 250.0), 0.0, true).with_editable(true);
        Scene::with_parts(500.0, 500.0, tracer, target, vec![square])
    }

    #[test]
    fn test_press_and_drag() {
        let mut scene = scene();
        let mut pointer = PointerState::default();
        let settings = Settings::default();

        let press = TickInput {
            press_at: Some(DVec2::new(250.0, 250.0)),
            ..Default::default()
        };
        tick(&mut scene, &mut pointer, &press, &settings, 1.0 / 60.0);
        let id = scene.obstacles()[0].id;
        assert_eq!(pointer.selection, Some(Selection::Obstacle(id)));
        assert!(pointer.dragging);

        let drag = TickInput {
            drag_delta: DVec2::new(-20.0, 5.0),
            ..Default::default()
        };
        tick(&mut scene, &mut pointer, &drag, &settings, 1.0 / 60.0);
        assert_eq!(scene.obstacle(id).unwrap().pos, DVec2::new(230.0, 255.0));

        let release = TickInput {
            release: true,
            ..Default::default()
        };
        tick(&mut scene, &mut pointer, &release, &settings, 1.0 / 60.0);
        assert!(!pointer.dragging);
        // Selection survives release so the rotate/delete buttons still apply
        assert_eq!(pointer.selection, Some(Selection::Obstacle(id)));

        tick(&mut scene, &mut pointer, &drag, &settings, 1.0 / 60.0);
        assert_eq!(scene.obstacle(id).unwrap().pos, DVec2::new(230.0, 255.0));
    }

    #[test]
    fn test_rotate_emitter() {
        let mut scene = scene();
        let mut pointer = PointerState {
            selection: Some(Selection::Emitter),
            dragging: false,
        };
        let settings = Settings::default();
        let input = TickInput {
            rotate_right: true,
            ..Default::default()
        };
        let before = scene.tracer().angle;
        tick(&mut scene, &mut pointer, &input, &settings, 1.0);
        let expected = crate::wrap_angle(before + settings.rotate_speed);
        assert!((scene.tracer().angle - expected).abs() < 1e-9);
    }

    #[test]
    fn test_delete_selected_obstacle() {
        let mut scene = scene();
        let id = scene.obstacles()[0].id;
        let mut pointer = PointerState {
            selection: Some(Selection::Obstacle(id)),
            dragging: true,
        };
        let input = TickInput {
            delete: true,
            ..Default::default()
        };
        tick(&mut scene, &mut pointer, &input, &Settings::default(), 1.0 / 60.0);
        assert!(scene.obstacles().is_empty());
        assert_eq!(pointer, PointerState::default());
    }

    #[test]
    fn test_delete_without_obstacle_selected() {
        let mut scene = scene();
        let mut pointer = PointerState {
            selection: Some(Selection::Emitter),
            dragging: false,
        };
        let input = TickInput {
            delete: true,
            ..Default::default()
        };
        tick(&mut scene, &mut pointer, &input, &Settings::default(), 1.0 / 60.0);
        assert_eq!(scene.obstacles().len(), 1);
        assert_eq!(pointer.selection, Some(Selection::Emitter));
    }

    #[test]
    fn test_discrete_fire() {
        let mut scene = scene();
        let mut pointer = PointerState::default();
        let settings = Settings {
            fire_mode: FireMode::Discrete,
            ..Default::default()
        };

        tick(&mut scene, &mut pointer, &TickInput::default(), &settings, 1.0 / 60.0);
        assert_eq!(scene.trace().unwrap().status, TraceStatus::Resting);

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut scene, &mut pointer, &fire, &settings, 1.0 / 60.0);
        assert_eq!(scene.trace().unwrap().status, TraceStatus::Exhausted);
    }

    #[test]
    fn test_place_from_palette() {
        let mut scene = scene();
        let mut pointer = PointerState::default();
        let input = TickInput {
            place: Some((ObstaclePalette::Absorptive, DVec2::new(100.0, 400.0))),
            ..Default::default()
        };
        tick(&mut scene, &mut pointer, &input, &Settings::default(), 1.0 / 60.0);
        assert_eq!(scene.obstacles().len(), 2);
        let placed = scene.obstacles()[1].id;
        assert_eq!(pointer.selection, Some(Selection::Obstacle(placed)));
        assert!(!scene.obstacle(placed).unwrap().reflective);
    }
}
