//! Renderer bridge: turns a snapshot into primitive draw calls.
//!
//! The simulation knows nothing about canvases or GPUs. A host implements
//! `RenderSink` over whatever it draws with, or records a `DrawList` and
//! ships it elsewhere. Drawing only reads the snapshot.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use chroma_core::constants::{CELL_SIZE, GRID_COLUMNS, GRID_ROWS, WORLD_HEIGHT, WORLD_WIDTH};
use chroma_core::enums::{Hue, Shape};
use chroma_core::state::{EnemyView, GameStateSnapshot, TowerView};
use chroma_core::types::Vector2;

use crate::map::GameMap;

/// Straight RGBA color, components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }
}

const BACKGROUND: Rgba = Rgba::rgb(0.055, 0.067, 0.086);
const GRID_LINE: Rgba = Rgba::rgb(0.184, 0.212, 0.255);
const PATH: Rgba = Rgba::rgb(0.35, 0.31, 0.24);
const RANGE_RING: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
const PROJECTILE: Rgba = Rgba::rgb(1.0, 0.98, 0.8);
const HEALTH_BACK: Rgba = Rgba::rgb(0.2, 0.2, 0.2);
const HEALTH_FILL: Rgba = Rgba::rgb(0.2, 0.85, 0.3);

const PATH_WIDTH: f32 = 24.0;
const TOWER_MARGIN: f32 = 6.0;
const PROJECTILE_RADIUS: f32 = 3.0;
const RING_SEGMENTS: usize = 48;
const HEALTH_BAR_HEIGHT: f32 = 3.0;

/// Display color of a hue.
pub fn hue_color(hue: Hue) -> Rgba {
    match hue {
        Hue::Red => Rgba::rgb(0.97, 0.32, 0.29),
        Hue::Green => Rgba::rgb(0.18, 0.63, 0.26),
        Hue::Blue => Rgba::rgb(0.35, 0.65, 1.0),
    }
}

/// Primitive drawing surface.
pub trait RenderSink {
    fn clear(&mut self, color: Rgba);
    fn line(&mut self, from: Vector2, to: Vector2, color: Rgba, thickness: f32);
    fn fill_rect(&mut self, min: Vector2, size: Vector2, color: Rgba);
    fn fill_circle(&mut self, center: Vector2, radius: f32, color: Rgba);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum DrawCommand {
    Clear {
        color: Rgba,
    },
    Line {
        from: Vector2,
        to: Vector2,
        color: Rgba,
        thickness: f32,
    },
    FillRect {
        min: Vector2,
        size: Vector2,
        color: Rgba,
    },
    FillCircle {
        center: Vector2,
        radius: f32,
        color: Rgba,
    },
}

/// A `RenderSink` that records every call in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl RenderSink for DrawList {
    fn clear(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Clear { color });
    }

    fn line(&mut self, from: Vector2, to: Vector2, color: Rgba, thickness: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            thickness,
        });
    }

    fn fill_rect(&mut self, min: Vector2, size: Vector2, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { min, size, color });
    }

    fn fill_circle(&mut self, center: Vector2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }
}

/// Draw one frame: background, grid, path, towers, projectiles, enemies,
/// then death markers on top.
pub fn draw_frame(map: &GameMap, snapshot: &GameStateSnapshot, sink: &mut dyn RenderSink) {
    sink.clear(BACKGROUND);
    draw_grid(sink);

    for pair in map.path().waypoints().windows(2) {
        sink.line(pair[0], pair[1], PATH, PATH_WIDTH);
    }

    for tower in &snapshot.towers {
        draw_tower(tower, snapshot.selected_tower == Some(tower.cell), sink);
    }
    for tower in &snapshot.towers {
        for projectile in &tower.projectiles {
            sink.fill_circle(projectile.position, PROJECTILE_RADIUS, PROJECTILE);
        }
    }

    for enemy in &snapshot.enemies {
        draw_enemy(enemy, sink);
    }

    for marker in &snapshot.death_markers {
        sink.fill_circle(marker.position, marker.radius, hue_color(marker.color).with_alpha(marker.alpha * 0.5));
    }
}

fn draw_grid(sink: &mut dyn RenderSink) {
    for x in 0..=GRID_COLUMNS {
        let px = x as f32 * CELL_SIZE;
        sink.line(Vec2::new(px, 0.0), Vec2::new(px, WORLD_HEIGHT), GRID_LINE, 1.0);
    }
    for y in 0..=GRID_ROWS {
        let py = y as f32 * CELL_SIZE;
        sink.line(Vec2::new(0.0, py), Vec2::new(WORLD_WIDTH, py), GRID_LINE, 1.0);
    }
}

fn draw_tower(tower: &TowerView, selected: bool, sink: &mut dyn RenderSink) {
    let min = tower.cell.origin() + Vec2::splat(TOWER_MARGIN);
    let size = Vec2::splat(CELL_SIZE - 2.0 * TOWER_MARGIN);
    sink.fill_rect(min, size, hue_color(tower.color));

    if selected {
        let radius = tower.range.value;
        let ring = RANGE_RING.with_alpha(0.4);
        for i in 0..RING_SEGMENTS {
            let a0 = i as f32 / RING_SEGMENTS as f32 * std::f32::consts::TAU;
            let a1 = (i + 1) as f32 / RING_SEGMENTS as f32 * std::f32::consts::TAU;
            let p0 = tower.position + Vec2::from_angle(a0) * radius;
            let p1 = tower.position + Vec2::from_angle(a1) * radius;
            sink.line(p0, p1, ring, 1.0);
        }
    }
}

fn draw_enemy(enemy: &EnemyView, sink: &mut dyn RenderSink) {
    let color = hue_color(enemy.color);
    let r = enemy.radius;
    let c = enemy.position;
    match enemy.shape {
        Shape::Circle => sink.fill_circle(c, r, color),
        Shape::Triangle => {
            let top = c + Vec2::new(0.0, -r);
            let left = c + Vec2::new(-r, r);
            let right = c + Vec2::new(r, r);
            sink.line(top, right, color, 2.0);
            sink.line(right, left, color, 2.0);
            sink.line(left, top, color, 2.0);
        }
        Shape::Square => sink.fill_rect(c - Vec2::splat(r), Vec2::splat(2.0 * r), color),
    }

    // Health bar above the enemy.
    let width = 2.0 * r;
    let min = c + Vec2::new(-r, -r - 2.0 * HEALTH_BAR_HEIGHT);
    sink.fill_rect(min, Vec2::new(width, HEALTH_BAR_HEIGHT), HEALTH_BACK);
    let fraction = if enemy.max_health > 0.0 {
        (enemy.health / enemy.max_health).clamp(0.0, 1.0)
    } else {
        0.0
    };
    if fraction > 0.0 {
        sink.fill_rect(min, Vec2::new(width * fraction, HEALTH_BAR_HEIGHT), HEALTH_FILL);
    }
}
