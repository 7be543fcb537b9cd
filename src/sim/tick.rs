//! Frame update
//!
//! One call per displayed frame. Outside `Playing` the world is left untouched.

use super::collision::check_collisions;
use super::difficulty::update_difficulty;
use super::movement::{HeldKeys, step_all};
use super::powerup::update_power_ups;
use super::spawn::spawn_objects;
use super::state::{GameMode, World};
use crate::clamp_delta;

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Movement keys currently held
    pub held: HeldKeys,
    /// Milliseconds since the previous frame (0 on the first frame)
    pub delta_ms: f32,
}

/// Advance the world by one frame.
///
/// Order: spawn, move, collide, power-up timers, difficulty, then the
/// game-over check.
pub fn tick(world: &mut World, input: &FrameInput) {
    if world.mode != GameMode::Playing {
        return;
    }

    let dt = clamp_delta(input.delta_ms);
    world.frame += 1;

    spawn_objects(world, dt);
    step_all(world, input.held);
    check_collisions(world);
    update_power_ups(world, dt);
    update_difficulty(world);

    if let Some(shake) = world.shake.as_mut() {
        shake.remaining_ms -= dt;
        if shake.remaining_ms <= 0.0 {
            world.shake = None;
        }
    }

    world.check_game_over();
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::consts::*;
    use crate::settings::Settings;
    use crate::sim::state::{Collectible, GameEvent, Obstacle, Playfield};

    const FRAME_MS: f32 = 1000.0 / 60.0;

    fn playing() -> World {
        let mut w = World::new(Playfield::default(), Settings::default(), 12345);
        w.start_game();
        w
    }

    fn frame() -> FrameInput {
        FrameInput {
            delta_ms: FRAME_MS,
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_is_noop_outside_playing() {
        let mut w = World::new(Playfield::default(), Settings::default(), 1);
        let before = serde_json::to_string(&w).unwrap();
        for _ in 0..10 {
            tick(&mut w, &frame());
        }
        assert_eq!(before, serde_json::to_string(&w).unwrap());
    }

    #[test]
    fn test_tick_spawns_over_time() {
        let mut w = playing();
        for _ in 0..120 {
            tick(&mut w, &frame());
        }
        assert_eq!(w.frame, 120);
        assert!(!w.particles.is_empty());
        assert!(!w.stars.is_empty());
    }

    #[test]
    fn test_stalled_frame_is_clamped() {
        let mut w = playing();
        tick(
            &mut w,
            &FrameInput {
                delta_ms: 60_000.0,
                ..Default::default()
            },
        );
        assert!(w.notes.len() <= 1);
        assert!(w.timers.note_ms <= MAX_FRAME_DELTA_MS);
    }

    #[test]
    fn test_game_over_transition() {
        let mut w = playing();
        w.health = OBSTACLE_DAMAGE;
        w.obstacles.push(Obstacle {
            pos: w.player.pos - Vec2::splat(10.0),
            size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            speed: 0.0,
            rotation: 0.0,
        });
        tick(&mut w, &frame());
        assert_eq!(w.health, 0);
        assert_eq!(w.mode, GameMode::GameOver);

        let frame_count = w.frame;
        tick(&mut w, &frame());
        assert_eq!(w.frame, frame_count);
        let overs = w
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver(_)))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_shake_expires() {
        let mut w = playing();
        w.start_shake();
        // Nothing spawned at the right edge can reach the player in 31 frames
        for _ in 0..29 {
            tick(&mut w, &frame());
        }
        assert!(w.is_shaking());
        for _ in 0..2 {
            tick(&mut w, &frame());
        }
        assert!(!w.is_shaking());
        assert_eq!(w.health, MAX_HEALTH);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing();
        let mut b = playing();
        let inputs = [
            FrameInput {
                held: HeldKeys {
                    right: true,
                    ..Default::default()
                },
                delta_ms: FRAME_MS,
            },
            frame(),
            FrameInput {
                held: HeldKeys {
                    up: true,
                    ..Default::default()
                },
                delta_ms: 33.0,
            },
        ];
        for _ in 0..200 {
            for input in &inputs {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_power_up_counts_down_in_pickup_frame() {
        let mut w = playing();
        w.power_ups.shield.collectible = Some(Collectible {
            pos: w.player.pos,
            size: COLLECTIBLE_SIZE,
        });
        tick(
            &mut w,
            &FrameInput {
                delta_ms: 16.0,
                ..Default::default()
            },
        );
        assert!(w.power_ups.shield.active);
        assert!(w.player.shielded);
        assert_eq!(w.power_ups.shield.remaining_ms, POWERUP_DURATION_MS - 16.0);
    }
}
