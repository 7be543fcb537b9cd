//! Entity spawning
//!
//! Notes, obstacles and ambient particles run on time accumulators; power-ups
//! roll a fixed chance once per frame, so their rate follows the frame rate.

use glam::Vec2;
use rand::Rng;

use super::state::{Collectible, Hue, NOTE_SCALE, Note, Obstacle, Particle, PowerUpKind, World};
use crate::consts::*;

/// Advance spawn accumulators by `dt_ms` and create whatever is due
pub fn spawn_objects(world: &mut World, dt_ms: f32) {
    world.timers.note_ms += dt_ms;
    world.timers.obstacle_ms += dt_ms;
    world.timers.particle_ms += dt_ms;

    if world.timers.note_ms > NOTE_SPAWN_INTERVAL_MS / world.game_speed {
        spawn_note(world);
        world.timers.note_ms = 0.0;
    }

    if world.timers.obstacle_ms > OBSTACLE_SPAWN_INTERVAL_MS / world.game_speed {
        spawn_obstacle(world);
        world.timers.obstacle_ms = 0.0;
    }

    if world.rng.random_bool(POWERUP_SPAWN_CHANCE) {
        let kind = PowerUpKind::ALL[world.rng.random_range(0..PowerUpKind::ALL.len())];
        spawn_power_up(world, kind);
    }

    if world.timers.particle_ms > AMBIENT_SPAWN_INTERVAL_MS {
        spawn_ambient_particle(world);
        world.timers.particle_ms = 0.0;
    }
}

/// New note at the right edge, 50px clear of top and bottom
pub fn spawn_note(world: &mut World) {
    let field = world.playfield;
    let rng = &mut world.rng;
    let y = rng.random::<f32>() * (field.height - 100.0) + 50.0;
    let note = Note {
        pos: Vec2::new(field.width, y),
        radius: NOTE_RADIUS,
        color: Hue::pick(&Hue::NOTE_PALETTE, rng),
        frequency: NOTE_SCALE[rng.random_range(0..NOTE_SCALE.len())],
        collected: false,
        pulse: 0.0,
    };
    world.notes.push(note);
}

/// New obstacle at the right edge moving slightly faster than the game
pub fn spawn_obstacle(world: &mut World) {
    let field = world.playfield;
    let rng = &mut world.rng;
    let y = rng.random::<f32>() * (field.height - 60.0) + 30.0;
    let speed = world.game_speed + rng.random::<f32>() * 2.0;
    world.obstacles.push(Obstacle {
        pos: Vec2::new(field.width, y),
        size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
        speed,
        rotation: 0.0,
    });
}

/// Put a pickup of `kind` in flight unless one is already flying.
///
/// Returns true if a collectible was created.
pub fn spawn_power_up(world: &mut World, kind: PowerUpKind) -> bool {
    if world.power_ups.slot(kind).collectible.is_some() {
        return false;
    }
    let field = world.playfield;
    let y = world.rng.random::<f32>() * (field.height - 60.0) + 30.0;
    world.power_ups.slot_mut(kind).collectible = Some(Collectible {
        pos: Vec2::new(field.width, y),
        size: COLLECTIBLE_SIZE,
    });
    log::debug!("Power-up {:?} spawned at y={:.0}", kind, y);
    true
}

pub fn spawn_ambient_particle(world: &mut World) {
    let particle = Particle::ambient(&world.playfield, &mut world.rng);
    world.particles.push(particle);
}
