//! Timed power-up effects

use super::collision::power_up_burst;
use super::state::{GameEvent, PowerUpKind, World};
use crate::consts::*;

/// Switch a power-up on for its full duration and apply its effect.
///
/// Re-activating a running speed boost compounds the multiplier.
pub fn activate_power_up(world: &mut World, kind: PowerUpKind) {
    let slot = world.power_ups.slot_mut(kind);
    slot.active = true;
    slot.remaining_ms = POWERUP_DURATION_MS;

    match kind {
        PowerUpKind::Shield => world.player.shielded = true,
        PowerUpKind::Speed => world.player.speed *= SPEED_BOOST,
        PowerUpKind::Multiplier => world.power_ups.multiplier_value = MULTIPLIER_VALUE,
    }

    power_up_burst(world, kind);
    log::debug!("Power-up {:?} activated", kind);
    world.emit(GameEvent::PowerUpActivated(kind));
}

/// Switch a power-up off and undo its effect
pub fn deactivate_power_up(world: &mut World, kind: PowerUpKind) {
    let slot = world.power_ups.slot_mut(kind);
    slot.active = false;
    slot.remaining_ms = 0.0;

    match kind {
        PowerUpKind::Shield => world.player.shielded = false,
        PowerUpKind::Speed => {
            world.player.speed = world.settings.difficulty.base_player_speed();
        }
        PowerUpKind::Multiplier => world.power_ups.multiplier_value = 1,
    }

    log::debug!("Power-up {:?} expired", kind);
    world.emit(GameEvent::PowerUpExpired(kind));
}

/// Count active power-ups down by `dt_ms`, expiring those that run out
pub fn update_power_ups(world: &mut World, dt_ms: f32) {
    for kind in PowerUpKind::ALL {
        let slot = world.power_ups.slot_mut(kind);
        if !slot.active {
            continue;
        }
        slot.remaining_ms -= dt_ms;
        if slot.remaining_ms <= 0.0 {
            deactivate_power_up(world, kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::settings::{Difficulty, Settings};
    use crate::sim::state::{Collectible, Playfield};

    fn playing(difficulty: Difficulty) -> World {
        let mut settings = Settings::default();
        settings.difficulty = difficulty;
        let mut w = World::new(Playfield::default(), settings, 5);
        w.start_game();
        w
    }

    #[test]
    fn test_speed_boost_and_expiry() {
        let mut w = playing(Difficulty::Easy);
        activate_power_up(&mut w, PowerUpKind::Speed);
        assert_eq!(w.player.speed, 9.0);
        assert_eq!(w.power_ups.speed.remaining_ms, POWERUP_DURATION_MS);

        update_power_ups(&mut w, 9_999.0);
        assert!(w.power_ups.speed.active);
        update_power_ups(&mut w, 1.0);
        assert!(!w.power_ups.speed.active);
        assert_eq!(w.player.speed, 6.0);
        assert!(w
            .pending_events()
            .contains(&GameEvent::PowerUpExpired(PowerUpKind::Speed)));
    }

    #[test]
    fn test_multiplier_value() {
        let mut w = playing(Difficulty::Normal);
        assert_eq!(w.power_ups.multiplier_value, 1);
        activate_power_up(&mut w, PowerUpKind::Multiplier);
        assert_eq!(w.power_ups.multiplier_value, 2);
        deactivate_power_up(&mut w, PowerUpKind::Multiplier);
        assert_eq!(w.power_ups.multiplier_value, 1);
    }

    #[test]
    fn test_shield_flag() {
        let mut w = playing(Difficulty::Normal);
        activate_power_up(&mut w, PowerUpKind::Shield);
        assert!(w.player.shielded);
        update_power_ups(&mut w, POWERUP_DURATION_MS);
        assert!(!w.player.shielded);
    }

    #[test]
    fn test_active_and_in_flight_are_independent() {
        let mut w = playing(Difficulty::Normal);
        activate_power_up(&mut w, PowerUpKind::Shield);
        w.power_ups.shield.collectible = Some(Collectible {
            pos: Vec2::new(900.0, 100.0),
            size: COLLECTIBLE_SIZE,
        });
        update_power_ups(&mut w, POWERUP_DURATION_MS + 1.0);
        assert!(!w.power_ups.shield.active);
        assert!(w.power_ups.shield.collectible.is_some());
    }

    #[test]
    fn test_inactive_slots_do_not_tick() {
        let mut w = playing(Difficulty::Normal);
        update_power_ups(&mut w, 500.0);
        assert!(w.pending_events().is_empty());
    }
}
