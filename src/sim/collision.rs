//! Collision detection and response
//!
//! Notes and pickups use circle distance; obstacles use an axis-aligned box
//! around the player. An obstacle stays alive after a hit and damages again
//! on every frame the boxes still overlap.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::powerup::activate_power_up;
use super::state::{GameEvent, Hue, Note, Particle, PowerUpKind, World};
use crate::consts::*;

/// Circle-circle overlap test
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// Resolve every player contact for this frame
pub fn check_collisions(world: &mut World) {
    collect_notes(world);
    hit_obstacles(world);
    collect_power_ups(world);
}

fn collect_notes(world: &mut World) {
    let player_pos = world.player.pos;
    let player_radius = world.player.radius;
    let notes = std::mem::take(&mut world.notes);
    let mut kept = Vec::with_capacity(notes.len());
    for mut note in notes {
        if !note.collected && circles_overlap(player_pos, player_radius, note.pos, note.radius) {
            collect_note(world, &mut note);
        } else {
            kept.push(note);
        }
    }
    // Anything spawned while resolving (none today) goes after the survivors
    kept.append(&mut world.notes);
    world.notes = kept;
}

/// Award a note: score, heal, melody, tone and burst. The caller drops the note.
pub fn collect_note(world: &mut World, note: &mut Note) {
    note.collected = true;
    let mut points = NOTE_POINTS;
    world.health = (world.health + NOTE_HEAL).min(MAX_HEALTH);
    world.melody.push(note.frequency);
    world.longest_melody = world.longest_melody.max(world.melody.len());
    world.notes_collected += 1;

    world.emit(GameEvent::PlayTone {
        frequency: note.frequency,
        duration: NOTE_TONE_SECS,
    });
    collection_burst(world, note.pos);

    // Chain bonus
    if world.melody.len() > MELODY_BONUS_THRESHOLD {
        points += world.melody.len() as u64 * MELODY_BONUS_PER_NOTE;
    }
    world.score += points;
    world.emit(GameEvent::NoteCollected {
        points,
        melody_len: world.melody.len(),
    });
}

fn hit_obstacles(world: &mut World) {
    let center = world.player.pos;
    let half = world.player.radius;
    let hits = world
        .obstacles
        .iter()
        .filter(|o| o.overlaps_square(center, half))
        .count();
    for _ in 0..hits {
        hit_obstacle(world);
    }
}

/// Take a hit: lose health, break the melody, shake
pub fn hit_obstacle(world: &mut World) {
    world.health = world.health.saturating_sub(OBSTACLE_DAMAGE);
    world.melody.clear();
    let at = world.player.pos;
    damage_burst(world, at);
    let shake = world.start_shake();
    log::debug!("Obstacle hit, health now {}", world.health);
    world.emit(GameEvent::ObstacleHit {
        health: world.health,
        shake,
    });
}

fn collect_power_ups(world: &mut World) {
    let player_pos = world.player.pos;
    let player_radius = world.player.radius;
    for kind in PowerUpKind::ALL {
        let Some(collectible) = world.power_ups.slot(kind).collectible else {
            continue;
        };
        if circles_overlap(player_pos, player_radius, collectible.pos, collectible.size) {
            world.power_ups.slot_mut(kind).collectible = None;
            activate_power_up(world, kind);
        } else if collectible.pos.x < -collectible.size {
            world.power_ups.slot_mut(kind).collectible = None;
        }
    }
}

// === Effect bursts ===

fn scatter(rng: &mut Pcg32, spread: f32) -> Vec2 {
    Vec2::new(
        (rng.random::<f32>() - 0.5) * spread,
        (rng.random::<f32>() - 0.5) * spread,
    )
}

fn collection_burst(world: &mut World, at: Vec2) {
    for _ in 0..COLLECT_BURST {
        let particle = Particle {
            pos: at,
            vel: scatter(&mut world.rng, 10.0),
            size: world.rng.random::<f32>() * 5.0 + 2.0,
            color: Hue::Aqua,
            life: 1.0,
            opacity: 1.0,
        };
        world.particles.push(particle);
    }
}

fn damage_burst(world: &mut World, at: Vec2) {
    for _ in 0..DAMAGE_BURST {
        let particle = Particle {
            pos: at,
            vel: scatter(&mut world.rng, 15.0),
            size: world.rng.random::<f32>() * 3.0 + 1.0,
            color: Hue::Coral,
            life: 1.0,
            opacity: 1.0,
        };
        world.particles.push(particle);
    }
}

/// Evenly spaced ring of particles around the player
pub(crate) fn power_up_burst(world: &mut World, kind: PowerUpKind) {
    let at = world.player.pos;
    for i in 0..POWERUP_BURST {
        let angle = std::f32::consts::TAU * i as f32 / POWERUP_BURST as f32;
        let particle = Particle {
            pos: at,
            vel: Vec2::from_angle(angle) * 5.0,
            size: world.rng.random::<f32>() * 3.0 + 2.0,
            color: kind.color(),
            life: 1.0,
            opacity: 1.0,
        };
        world.particles.push(particle);
    }
}
