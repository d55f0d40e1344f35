//! Level text format
//!
//! A level is a flat list of `key=value` entries, written URL-query style:
//!
//! ```text
//! &size=500,500&laser=250,400,-1.5707963267948966,5,true&goal=100,100,15,true
//! &box=16777215,8026746,0.3,250,250,0,true,true,-50,-50,-50,50,50,50,50,-50
//! ```
//!
//! - `size`: `width,height`
//! - `laser`: `x,y,angle,maxBounces,movable`
//! - `goal`: `x,y,radius,movable`
//! - `box` (repeatable): `color,lineColor,fillAlpha,x,y,angle,editable,reflective,vx0,vy0,vx1,vy1,...`
//!
//! Decoding never fails. Unreadable numbers fall back to documented defaults
//! and out-of-range sizes, bounce budgets and goal radii are clamped into
//! [`Limits`] (both logged as warnings); the rest of the level still loads.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::{Limits, parse_number};
use crate::sim::obstacle::default_square;
use crate::sim::{Obstacle, ObstacleStyle, RayTracer, Scene, Target};

/// Which flags an encoded level carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportMode {
    /// Everything movable/editable, for sharing an editable draft
    Editor,
    /// Emitter, goal and boxes fixed, for sharing a puzzle to play
    Play,
    /// Emitter and goal keep their flags, boxes are written fixed
    Plain,
}

/// Emitter entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserSpec {
    pub pos: DVec2,
    pub angle: f64,
    pub max_bounces: u32,
    pub movable: bool,
}

/// Goal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSpec {
    pub pos: DVec2,
    pub radius: f64,
    pub movable: bool,
}

/// Decoded level; missing entries are `None` and get scene defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub size: Option<(f64, f64)>,
    pub laser: Option<LaserSpec>,
    pub goal: Option<GoalSpec>,
    pub boxes: Vec<Obstacle>,
}

impl Level {
    /// Parse level text
    ///
    /// Entries may be separated by `&`, newlines, or a leading `?`. `%2C` is
    /// accepted for commas.
    pub fn decode(text: &str) -> Self {
        let mut level = Level::default();

        for entry in text.split(['&', '\n', '?']) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let Some((key, value)) = entry.split_once('=') else {
                log::warn!("Skipping level entry without a value: {:?}", entry);
                continue;
            };
            let value = value.replace("%2C", ",").replace("%2c", ",");
            let fields = Fields::new(key, &value);

            match key {
                "size" => level.size = Some(decode_size(&fields)),
                "laser" => level.laser = Some(decode_laser(&fields)),
                "goal" => level.goal = Some(decode_goal(&fields)),
                "box" => level.boxes.push(decode_box(&fields)),
                _ => log::warn!("Skipping unknown level key {:?}", key),
            }
        }

        log::info!(
            "Decoded level: size={:?}, {} boxes, laser={}, goal={}",
            level.size,
            level.boxes.len(),
            level.laser.is_some(),
            level.goal.is_some()
        );
        level
    }

    /// Write level text (leading `&` on every entry)
    pub fn encode(&self) -> String {
        let mut out = String::new();

        if let Some((w, h)) = self.size {
            out.push_str(&format!("&size={},{}", w, h));
        }
        if let Some(laser) = &self.laser {
            out.push_str(&format!(
                "&laser={},{},{},{},{}",
                laser.pos.x, laser.pos.y, laser.angle, laser.max_bounces, laser.movable
            ));
        }
        if let Some(goal) = &self.goal {
            out.push_str(&format!(
                "&goal={},{},{},{}",
                goal.pos.x, goal.pos.y, goal.radius, goal.movable
            ));
        }
        for obstacle in &self.boxes {
            let style = obstacle.style;
            out.push_str(&format!(
                "&box={},{},{},{},{},{},{},{}",
                style.color,
                style.line_color,
                style.fill_alpha,
                obstacle.pos.x,
                obstacle.pos.y,
                obstacle.angle,
                obstacle.editable,
                obstacle.reflective
            ));
            for v in &obstacle.vertices {
                out.push_str(&format!(",{},{}", v.x, v.y));
            }
        }

        out
    }

    /// Snapshot a scene (the boundary is never included)
    pub fn from_scene(scene: &Scene, mode: ExportMode) -> Self {
        let tracer = scene.tracer();
        let (laser_movable, goal_movable, boxes_editable) = match mode {
            ExportMode::Editor => (true, true, true),
            ExportMode::Play => (false, false, false),
            ExportMode::Plain => (tracer.movable, scene.target.movable, false),
        };

        Level {
            size: Some((scene.width(), scene.height())),
            laser: Some(LaserSpec {
                pos: tracer.pos,
                angle: tracer.angle,
                max_bounces: tracer.max_bounces,
                movable: laser_movable,
            }),
            goal: Some(GoalSpec {
                pos: scene.target.pos,
                radius: scene.target.radius,
                movable: goal_movable,
            }),
            boxes: scene
                .obstacles()
                .iter()
                .map(|o| o.obstacle.clone().with_editable(boxes_editable))
                .collect(),
        }
    }

    /// Build a scene, filling anything missing with defaults
    ///
    /// Size, bounce budget and goal radius are clamped into [`Limits`] here
    /// too, so a hand-built level cannot produce an unbounded trace.
    pub fn to_scene(&self) -> Scene {
        let (width, height) = self
            .size
            .unwrap_or((DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT));
        let (width, height) = (Limits::field_dimension(width), Limits::field_dimension(height));

        let tracer = match &self.laser {
            Some(laser) => RayTracer {
                movable: laser.movable,
                ..RayTracer::new(
                    laser.pos,
                    laser.angle,
                    Limits::bounces(laser.max_bounces as f64),
                    0.0,
                )
            },
            None => RayTracer::default_for_field(width, height),
        };
        let target = match &self.goal {
            Some(goal) => Target {
                movable: goal.movable,
                ..Target::new(goal.pos, Limits::goal_radius(goal.radius))
            },
            None => Target::default_for_field(width, height),
        };

        Scene::with_parts(width, height, tracer, target, self.boxes.clone())
    }
}

/// Comma-separated values of one entry, with default substitution
struct Fields<'a> {
    key: &'a str,
    values: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn new(key: &'a str, value: &'a str) -> Self {
        Self {
            key,
            values: value.split(',').map(str::trim).collect(),
        }
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    /// Number at `index`, or `default` when missing or unreadable
    fn number(&self, index: usize, default: f64) -> f64 {
        let value = self
            .values
            .get(index)
            .map(|s| parse_number(s))
            .unwrap_or(f64::NAN);
        if value.is_finite() {
            value
        } else {
            log::warn!(
                "{}: field {} ({:?}) is not a number, using {}",
                self.key,
                index,
                self.values.get(index),
                default
            );
            default
        }
    }

    /// Flags are true only when spelled `true`
    fn flag(&self, index: usize) -> bool {
        self.values.get(index).is_some_and(|s| *s == "true")
    }
}

/// Keep `applied`, warning when a limit changed `raw`
fn limited(fields: &Fields, name: &str, raw: f64, applied: f64) -> f64 {
    if raw != applied {
        log::warn!("{}: {} {} is out of range, using {}", fields.key, name, raw, applied);
    }
    applied
}

fn decode_size(fields: &Fields) -> (f64, f64) {
    let width = fields.number(0, DEFAULT_FIELD_WIDTH);
    let height = fields.number(1, DEFAULT_FIELD_HEIGHT);
    (
        limited(fields, "width", width, Limits::field_dimension(width)),
        limited(fields, "height", height, Limits::field_dimension(height)),
    )
}

fn decode_laser(fields: &Fields) -> LaserSpec {
    let bounces = fields.number(3, DEFAULT_BOUNCES as f64);
    let max_bounces = Limits::bounces(bounces);
    limited(fields, "bounces", bounces, max_bounces as f64);
    LaserSpec {
        pos: DVec2::new(
            fields.number(0, DEFAULT_FIELD_WIDTH / 2.0),
            fields.number(1, DEFAULT_FIELD_HEIGHT / 2.0),
        ),
        angle: fields.number(2, 0.0),
        max_bounces,
        movable: fields.flag(4),
    }
}

fn decode_goal(fields: &Fields) -> GoalSpec {
    let radius = fields.number(2, DEFAULT_GOAL_RADIUS);
    GoalSpec {
        pos: DVec2::new(
            fields.number(0, DEFAULT_FIELD_WIDTH / 3.0),
            fields.number(1, DEFAULT_FIELD_HEIGHT / 3.0),
        ),
        radius: limited(fields, "radius", radius, Limits::goal_radius(radius)),
        movable: fields.flag(3),
    }
}

/// Index of the first vertex coordinate in a `box` entry
const BOX_VERTEX_OFFSET: usize = 8;

fn decode_box(fields: &Fields) -> Obstacle {
    let defaults = ObstacleStyle::default();
    let style = ObstacleStyle {
        color: fields.number(0, defaults.color as f64) as u32,
        line_color: fields.number(1, defaults.line_color as f64) as u32,
        fill_alpha: fields.number(2, defaults.fill_alpha as f64) as f32,
    };
    let pos = DVec2::new(fields.number(3, 0.0), fields.number(4, 0.0));
    let angle = fields.number(5, 0.0);
    let editable = fields.flag(6);
    let reflective = fields.flag(7);

    // Complete (x, y) pairs only; a dangling coordinate is dropped
    let pairs = fields.len().saturating_sub(BOX_VERTEX_OFFSET) / 2;
    let mut vertices: Vec<DVec2> = (0..pairs)
        .map(|i| {
            let base = BOX_VERTEX_OFFSET + i * 2;
            DVec2::new(fields.number(base, 0.0), fields.number(base + 1, 0.0))
        })
        .collect();

    if vertices.len() < 3 {
        log::warn!(
            "box at ({}, {}) has {} vertices, using the default square",
            pos.x,
            pos.y,
            vertices.len()
        );
        vertices = default_square();
    }

    Obstacle::new(vertices, pos, angle, reflective)
        .with_editable(editable)
        .with_style(style)
}
