//! Scene Renderer
//!
//! Objects are turned into primitives (`RectPrimitive`, `CirclePrimitive`)
//! in pixel space, then handed to a `DrawSurface`. `MacroquadSurface` draws
//! them on screen; tests collect them instead.
//!
//! Rendering only reads object state. It runs after the physics step so
//! what is drawn matches the bodies.

use std::f32::consts::PI;

use macroquad::color::Color;
use macroquad::math::{vec2, Vec2};
use macroquad::prelude::{draw_circle, draw_circle_lines, draw_line, draw_rectangle, draw_text, draw_triangle};

use crate::physics::PhysicsWorld;
use super::components::Component;
use super::object::{Animation, GameObject, Shape};
use super::runtime::FrameTimings;
use super::world::GameWorld;

pub const RAD_TO_DEG: f32 = 180.0 / PI;

/// Rotated rectangle, origin at its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub center: Vec2,
    pub size: Vec2,
    /// Degrees, clockwise on screen
    pub rotation: f32,
    pub fill: Color,
    pub outline: Color,
    pub outline_thickness: f32,
}

impl RectPrimitive {
    /// Corners in screen space: top-left, top-right, bottom-right,
    /// bottom-left before rotation.
    pub fn corners(&self) -> [Vec2; 4] {
        let half = self.size / 2.0;
        let (sin, cos) = (self.rotation / RAD_TO_DEG).sin_cos();
        let rotate = |p: Vec2| vec2(p.x * cos - p.y * sin, p.x * sin + p.y * cos) + self.center;
        [
            rotate(vec2(-half.x, -half.y)),
            rotate(vec2(half.x, -half.y)),
            rotate(vec2(half.x, half.y)),
            rotate(vec2(-half.x, half.y)),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirclePrimitive {
    pub center: Vec2,
    pub radius: f32,
    pub fill: Color,
    pub outline: Color,
}

/// Something primitives can be drawn onto.
pub trait DrawSurface {
    fn draw_rect(&mut self, rect: &RectPrimitive);
    fn draw_circle(&mut self, circle: &CirclePrimitive);
}

/// Draws straight to the macroquad window.
#[derive(Debug, Default, Clone, Copy)]
pub struct MacroquadSurface;

impl DrawSurface for MacroquadSurface {
    fn draw_rect(&mut self, rect: &RectPrimitive) {
        let [a, b, c, d] = rect.corners();
        draw_triangle(a, b, c, rect.fill);
        draw_triangle(a, c, d, rect.fill);
        if rect.outline_thickness > 0.0 {
            for (from, to) in [(a, b), (b, c), (c, d), (d, a)] {
                draw_line(from.x, from.y, to.x, to.y, rect.outline_thickness, rect.outline);
            }
        }
    }

    fn draw_circle(&mut self, circle: &CirclePrimitive) {
        draw_circle(circle.center.x, circle.center.y, circle.radius, circle.fill);
        draw_circle_lines(circle.center.x, circle.center.y, circle.radius, 2.0, circle.outline);
    }
}

/// Draw every object, in slot order.
pub fn render_world<P: PhysicsWorld>(world: &GameWorld<P>, surface: &mut dyn DrawSurface) {
    for (_, object) in world.objects() {
        render_object(object, surface);
    }
}

pub fn render_object(object: &GameObject, surface: &mut dyn DrawSurface) {
    let state = object.state();
    match *object.shape() {
        Shape::Box { fill, outline, outline_thickness } => {
            surface.draw_rect(&RectPrimitive {
                center: state.position,
                size: state.dimensions(),
                rotation: state.angle * RAD_TO_DEG,
                fill,
                outline,
                outline_thickness,
            });
        }
        Shape::Capsule { fill, outline, foot_radius } => {
            let size = state.dimensions();
            let upper = RectPrimitive {
                center: state.position + state.body_offset(),
                size: vec2(size.x, size.y - foot_radius),
                rotation: state.angle * RAD_TO_DEG,
                fill,
                outline,
                outline_thickness: 2.0,
            };
            surface.draw_rect(&upper);
            surface.draw_circle(&CirclePrimitive {
                center: state.position + vec2(0.0, size.y / 2.0 - foot_radius),
                radius: foot_radius,
                fill,
                outline,
            });
            surface.draw_rect(&visor(&upper, current_animation(object), outline));
        }
    }
}

fn current_animation(object: &GameObject) -> Animation {
    let from_graphics = object.components().iter().find_map(|c| match c {
        Component::Graphics(g) => g.animation().map(|player| player.clip()),
        _ => None,
    });
    from_graphics
        .or_else(|| object.state().control().map(|c| c.animation))
        .unwrap_or_default()
}

/// A small band near the top of the body showing which way the character
/// faces.
fn visor(upper: &RectPrimitive, animation: Animation, color: Color) -> RectPrimitive {
    let facing = match animation {
        Animation::WalkRight | Animation::IdleRight => 1.0,
        Animation::WalkLeft | Animation::IdleLeft => -1.0,
        Animation::Idle | Animation::Air => 0.0,
    };
    let size = vec2(upper.size.x * 0.5, upper.size.y * 0.12);
    RectPrimitive {
        center: upper.center + vec2(facing * upper.size.x * 0.25, -upper.size.y * 0.25),
        size,
        rotation: upper.rotation,
        fill: color,
        outline: color,
        outline_thickness: 0.0,
    }
}

/// Frame stats and player state in the top-left corner.
pub fn draw_debug_overlay<P: PhysicsWorld>(world: &GameWorld<P>, timings: &FrameTimings, fps_label: &str) {
    let lines = overlay_lines(world, timings, macroquad::time::get_fps(), fps_label);
    draw_rectangle(8.0, 8.0, 300.0, 12.0 + lines.len() as f32 * 20.0, Color::from_rgba(0, 0, 0, 160));
    for (i, line) in lines.iter().enumerate() {
        draw_text(line, 16.0, 28.0 + i as f32 * 20.0, 18.0, Color::from_rgba(230, 230, 230, 255));
    }
}

fn overlay_lines<P: PhysicsWorld>(
    world: &GameWorld<P>,
    timings: &FrameTimings,
    fps: i32,
    fps_label: &str,
) -> Vec<String> {
    let mut lines = vec![
        format!("fps {} (limit {})", fps, fps_label),
        format!(
            "input {:.2} ms  logic {:.2} ms  render {:.2} ms",
            timings.input_ms, timings.logic_ms, timings.render_ms
        ),
        format!("frame {:.2} ms", timings.total_ms),
        format!(
            "objects {}  bodies {}  joints {}",
            world.object_count(),
            world.physics().body_count(),
            world.physics().joint_count()
        ),
    ];
    if let Some((_, player)) = world.player() {
        let state = player.state();
        let flags = state.flags;
        lines.push(format!(
            "ground {}  slope {}  on box {}",
            flags.on_ground, flags.on_slope, flags.on_dynamic_body
        ));
        lines.push(format!("anim {}", current_animation(player).label()));
    }
    lines
}
