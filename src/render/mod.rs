//! Drawing surface boundary
//!
//! The kernel describes a frame as a list of [`DrawCall`]s and hands them to
//! a host-provided [`DrawSurface`]. This module is READ-ONLY - it never
//! modifies simulation state.

pub mod colors;

use crate::core::types::{FieldId, Tick, Vec2};
use crate::ecs::world::World;
use crate::entity::Kind;
use crate::force::{FieldKind, ForceLaw};

pub use colors::Color;

/// What a draw call depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Entity(Kind),
    Well(FieldId),
    Damping(FieldId),
    Pulse(FieldId),
    GridPoint,
}

/// One object to draw this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub position: Vec2,
    pub heading: f32,
    /// Drawn size multiplier; objects shrink as they sink into a field
    pub scale: f32,
    pub radius: f32,
    pub shape: Shape,
    pub color: Color,
    pub alt_space: bool,
}

/// Host-side drawing target
pub trait DrawSurface {
    fn begin_frame(&mut self, tick: Tick);
    fn draw(&mut self, call: &DrawCall);
    fn end_frame(&mut self);
}

fn dimmed(color: Color, alt_space: bool) -> Color {
    if alt_space {
        color.darken(colors::ALT_SPACE_DIM)
    } else {
        color
    }
}

/// Snapshot every live entity and active field into `buffer`. Call once per
/// frame with the same buffer to avoid allocations.
pub fn collect_draw_calls(world: &World, buffer: &mut Vec<DrawCall>) {
    buffer.clear();

    for field in world.fields.iter().filter(|f| !f.dead) {
        let (shape, color) = match &field.kind {
            FieldKind::Well(_) => (Shape::Well(field.id), colors::WELL),
            FieldKind::Damping(_) => (Shape::Damping(field.id), colors::DAMPING),
            FieldKind::Pulse(_) => (Shape::Pulse(field.id), colors::PULSE),
        };
        buffer.push(DrawCall {
            position: field.position,
            heading: 0.0,
            scale: 1.0,
            radius: field.law().max_radius(),
            shape,
            color: dimmed(color, field.alt_space),
            alt_space: field.alt_space,
        });
    }

    for entity in world.entities().filter(|e| e.is_alive()) {
        let kind = entity.kind();
        buffer.push(DrawCall {
            position: entity.body.position,
            heading: entity.heading(),
            scale: entity.body.gravity_potential.clamp(0.0, 1.0),
            radius: entity.body.radius,
            shape: Shape::Entity(kind),
            color: dimmed(colors::entity_color(kind, entity.faction()), entity.body.alt_space),
            alt_space: entity.body.alt_space,
        });
    }
}

/// Background lattice points, displaced by recent field activity
pub fn collect_grid(world: &World, buffer: &mut Vec<DrawCall>) {
    let (width, height) = world.grid.dimensions();
    for y in 0..height {
        for x in 0..width {
            buffer.push(DrawCall {
                position: world.grid.point(&world.torus, x, y),
                heading: 0.0,
                scale: 1.0,
                radius: 0.0,
                shape: Shape::GridPoint,
                color: colors::GRID,
                alt_space: false,
            });
        }
    }
}

/// Draw one frame of `world` onto `surface`
pub fn draw_world(world: &World, surface: &mut dyn DrawSurface) {
    let mut calls = Vec::with_capacity(world.entity_count() + world.fields.len());
    collect_draw_calls(world, &mut calls);

    surface.begin_frame(world.clock.id());
    for call in &calls {
        surface.draw(call);
    }
    surface.end_frame();
}
