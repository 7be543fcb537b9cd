//! Per-frame movement
//!
//! Speeds are pixels per frame, so nothing here scales by elapsed time.

use rand::Rng;

use super::state::{PowerUpKind, World};
use crate::consts::*;

/// Movement keys held this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    /// Track a keyboard key (arrows or WASD, any case).
    ///
    /// Returns false for keys that do not steer.
    pub fn set_key(&mut self, key: &str, down: bool) -> bool {
        let slot = match key.to_lowercase().as_str() {
            "arrowup" | "w" => &mut self.up,
            "arrowdown" | "s" => &mut self.down,
            "arrowleft" | "a" => &mut self.left,
            "arrowright" | "d" => &mut self.right,
            _ => return false,
        };
        *slot = down;
        true
    }
}

/// Move every entity category by one frame
pub fn step_all(world: &mut World, keys: HeldKeys) {
    move_player(world, keys);
    move_stars(world);
    move_notes(world);
    move_obstacles(world);
    move_particles(world);
    move_collectibles(world);
}

/// Apply held directions (axes independent, diagonals not normalized)
pub fn move_player(world: &mut World, keys: HeldKeys) {
    let player = &mut world.player;
    let step = player.speed;
    if keys.up {
        player.pos.y -= step;
    }
    if keys.down {
        player.pos.y += step;
    }
    if keys.left {
        player.pos.x -= step;
    }
    if keys.right {
        player.pos.x += step;
    }
    player.clamp_to(&world.playfield);

    if world.settings.trails {
        player.record_trail();
    }
}

/// Parallax scroll; stars wrap to the right edge at a fresh height
pub fn move_stars(world: &mut World) {
    let field = world.playfield;
    for star in world.stars.iter_mut() {
        star.pos.x -= star.speed * world.game_speed;
        if star.pos.x < 0.0 {
            star.pos.x = field.width;
            star.pos.y = world.rng.random::<f32>() * field.height;
        }
    }
}

pub fn move_notes(world: &mut World) {
    let dx = world.game_speed * 2.0;
    world.notes.retain_mut(|note| {
        note.pos.x -= dx;
        note.pulse += NOTE_PULSE_STEP;
        note.pos.x >= -note.radius
    });
}

pub fn move_obstacles(world: &mut World) {
    world.obstacles.retain_mut(|obstacle| {
        obstacle.pos.x -= obstacle.speed;
        obstacle.rotation += OBSTACLE_SPIN_STEP;
        obstacle.pos.x >= -obstacle.size.x
    });
}

pub fn move_particles(world: &mut World) {
    world.particles.retain_mut(|p| p.step());
}

/// In-flight pickups drift with the notes; leaving the screen is resolved by
/// the collision pass
pub fn move_collectibles(world: &mut World) {
    let dx = world.game_speed * 2.0;
    for kind in PowerUpKind::ALL {
        if let Some(collectible) = world.power_ups.slot_mut(kind).collectible.as_mut() {
            collectible.pos.x -= dx;
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::{Collectible, Hue, Note, Obstacle, Particle, Playfield};

    fn playing() -> World {
        let mut w = World::new(Playfield::default(), Settings::default(), 3);
        w.start_game();
        w
    }

    #[test]
    fn test_wasd_and_arrows_steer() {
        let mut keys = HeldKeys::default();
        assert!(keys.set_key("w", true));
        assert!(keys.set_key("ArrowLeft", true));
        assert!(keys.set_key("D", true));
        assert!(!keys.set_key("Escape", true));
        assert_eq!(
            keys,
            HeldKeys {
                up: true,
                down: false,
                left: true,
                right: true,
            }
        );
        keys.set_key("W", false);
        keys.set_key("arrowdown", true);
        assert!(!keys.up);
        assert!(keys.down);
    }

    #[test]
    fn test_diagonal_moves_full_speed_per_axis() {
        let mut w = playing();
        let start = w.player.pos;
        move_player(
            &mut w,
            HeldKeys {
                down: true,
                right: true,
                ..Default::default()
            },
        );
        assert_eq!(w.player.pos, start + Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_player_clamped_to_field() {
        let mut w = playing();
        let keys = HeldKeys {
            up: true,
            left: true,
            ..Default::default()
        };
        for _ in 0..500 {
            move_player(&mut w, keys);
        }
        assert_eq!(w.player.pos, Vec2::splat(PLAYER_RADIUS));
    }

    #[test]
    fn test_trails_toggle() {
        let mut w = playing();
        w.settings.trails = false;
        move_player(&mut w, HeldKeys::default());
        assert!(w.player.trail.is_empty());
        w.settings.trails = true;
        move_player(&mut w, HeldKeys::default());
        assert_eq!(w.player.trail.len(), 1);
    }

    #[test]
    fn test_notes_scroll_and_leave() {
        let mut w = playing();
        w.notes.push(Note {
            pos: Vec2::new(-12.0, 100.0),
            radius: NOTE_RADIUS,
            color: Hue::Gold,
            frequency: 392.0,
            collected: false,
            pulse: 0.0,
        });
        move_notes(&mut w);
        // -12 - 4 = -16 < -15
        assert!(w.notes.is_empty());

        w.notes.push(Note {
            pos: Vec2::new(300.0, 100.0),
            radius: NOTE_RADIUS,
            color: Hue::Gold,
            frequency: 392.0,
            collected: false,
            pulse: 0.0,
        });
        move_notes(&mut w);
        assert_eq!(w.notes[0].pos.x, 296.0);
        assert!((w.notes[0].pulse - NOTE_PULSE_STEP).abs() < 1e-6);
    }

    #[test]
    fn test_obstacles_use_own_speed() {
        let mut w = playing();
        w.obstacles.push(Obstacle {
            pos: Vec2::new(200.0, 50.0),
            size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            speed: 3.5,
            rotation: 0.0,
        });
        move_obstacles(&mut w);
        assert_eq!(w.obstacles[0].pos.x, 196.5);
        assert!((w.obstacles[0].rotation - OBSTACLE_SPIN_STEP).abs() < 1e-6);
    }

    #[test]
    fn test_particles_expire() {
        let mut w = playing();
        w.particles.push(Particle {
            pos: Vec2::new(500.0, 100.0),
            vel: Vec2::new(-1.0, 0.0),
            size: 2.0,
            color: Hue::Sky,
            life: 0.015,
            opacity: 0.5,
        });
        w.particles.push(Particle {
            pos: Vec2::new(0.5, 100.0),
            vel: Vec2::new(-1.0, 0.0),
            size: 2.0,
            color: Hue::Sky,
            life: 1.0,
            opacity: 0.5,
        });
        move_particles(&mut w);
        assert_eq!(w.particles.len(), 1);
        move_particles(&mut w);
        assert!(w.particles.is_empty());
    }

    #[test]
    fn test_stars_wrap() {
        let mut w = playing();
        w.stars[0].pos.x = 0.1;
        w.stars[0].speed = 1.0;
        move_stars(&mut w);
        assert_eq!(w.stars[0].pos.x, w.playfield.width);
    }

    #[test]
    fn test_collectibles_drift() {
        let mut w = playing();
        w.power_ups.multiplier.collectible = Some(Collectible {
            pos: Vec2::new(100.0, 100.0),
            size: COLLECTIBLE_SIZE,
        });
        move_collectibles(&mut w);
        assert_eq!(w.power_ups.multiplier.collectible.unwrap().pos.x, 96.0);
    }
}
