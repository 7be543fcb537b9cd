//! Level progression and difficulty presets
//!
//! A run's baseline comes from [`apply_difficulty_at_start`]; switching the
//! preset mid-session goes through [`apply_difficulty_change`], which scales
//! the current speed instead of resetting it.

use super::state::{GameEvent, World};
use crate::consts::*;
use crate::settings::Difficulty;

/// Level implied by a score
#[inline]
pub fn level_for_score(score: u64) -> u32 {
    (score / POINTS_PER_LEVEL) as u32 + 1
}

/// Raise the level when the score crosses a threshold.
///
/// Game speed grows by one step per level gained, so a jump over several
/// thresholds in one frame applies every step.
pub fn update_difficulty(world: &mut World) {
    let new_level = level_for_score(world.score);
    if new_level <= world.level {
        return;
    }
    let gained = new_level - world.level;
    world.level = new_level;
    world.game_speed += SPEED_PER_LEVEL * gained as f32;
    log::info!("Level {} reached, speed {}", world.level, world.game_speed);
    world.emit(GameEvent::LevelUp {
        level: world.level,
        game_speed: world.game_speed,
    });
}

/// Hard reset of game and player speed to the preset baseline
pub fn apply_difficulty_at_start(world: &mut World) {
    let difficulty = world.settings.difficulty;
    world.game_speed = difficulty.base_game_speed();
    world.player.base_speed = difficulty.base_player_speed();
    world.player.speed = world.player.base_speed;
}

/// Preset switched mid-session: scale the current game speed, floor it at
/// the baseline, and reset player speed
pub fn apply_difficulty_change(world: &mut World) {
    let difficulty = world.settings.difficulty;
    world.game_speed = match difficulty {
        Difficulty::Easy => (world.game_speed * 0.8).max(difficulty.base_game_speed()),
        Difficulty::Normal => world.game_speed.max(difficulty.base_game_speed()),
        Difficulty::Hard => (world.game_speed * 1.2).max(difficulty.base_game_speed()),
    };
    world.player.base_speed = difficulty.base_player_speed();
    world.player.speed = world.player.base_speed;
    log::info!(
        "Difficulty set to {} (speed {})",
        difficulty.as_str(),
        world.game_speed
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::Playfield;

    fn playing() -> World {
        let mut w = World::new(Playfield::default(), Settings::default(), 9);
        w.start_game();
        w
    }

    #[test]
    fn test_level_for_score() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(999), 1);
        assert_eq!(level_for_score(1000), 2);
        assert_eq!(level_for_score(2500), 3);
    }

    #[test]
    fn test_two_levels_in_one_update() {
        let mut w = playing();
        assert_eq!(w.game_speed, 2.0);
        w.score = 2500;
        update_difficulty(&mut w);
        assert_eq!(w.level, 3);
        assert_eq!(w.game_speed, 3.0);
    }

    #[test]
    fn test_stepwise_levels() {
        let mut w = playing();
        w.score = 1000;
        update_difficulty(&mut w);
        assert_eq!(w.game_speed, 2.5);
        update_difficulty(&mut w);
        assert_eq!(w.game_speed, 2.5);
        w.score = 2000;
        update_difficulty(&mut w);
        assert_eq!((w.level, w.game_speed), (3, 3.0));
    }

    #[test]
    fn test_change_scales_current_speed() {
        let mut w = playing();
        w.game_speed = 5.0;
        w.settings.difficulty = Difficulty::Hard;
        apply_difficulty_change(&mut w);
        assert!((w.game_speed - 6.0).abs() < 1e-5);
        assert_eq!(w.player.speed, 4.0);

        w.settings.difficulty = Difficulty::Easy;
        apply_difficulty_change(&mut w);
        assert!((w.game_speed - 4.8).abs() < 1e-5);

        w.game_speed = 1.0;
        w.settings.difficulty = Difficulty::Normal;
        apply_difficulty_change(&mut w);
        assert_eq!(w.game_speed, 2.0);
    }

    #[test]
    fn test_start_is_a_hard_reset() {
        let mut w = playing();
        w.game_speed = 7.0;
        w.settings.difficulty = Difficulty::Easy;
        apply_difficulty_at_start(&mut w);
        assert_eq!(w.game_speed, 1.5);
        assert_eq!(w.player.speed, 6.0);
    }
}
