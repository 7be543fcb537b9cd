//! Driving loop
//!
//! Owns the world, the audio sink and the menu backdrop. Each displayed frame
//! runs one update (simulation plus event dispatch) and then builds a render
//! frame from a shared borrow of the world.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::achievements::{self, Achievement};
use crate::audio::ToneSink;
use crate::consts::MENU_PARTICLE_CHANCE;
use crate::renderer::{RenderFrame, build_frame};
use crate::settings::Settings;
use crate::sim::{
    Command, FrameInput, GameEvent, GameMode, HeldKeys, Particle, Playfield, ShakeToken, World,
    apply_command, tick,
};

/// Drifting particles behind the menus.
///
/// Kept outside the world so non-playing modes leave it untouched.
#[derive(Debug, Clone)]
pub struct MenuBackdrop {
    pub particles: Vec<Particle>,
    rng: Pcg32,
}

impl MenuBackdrop {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn update(&mut self, field: &Playfield) {
        if self.rng.random_bool(MENU_PARTICLE_CHANCE) {
            let particle = Particle::ambient(field, &mut self.rng);
            self.particles.push(particle);
        }
        self.particles.retain_mut(|p| p.step());
    }
}

/// Game instance holding all state
pub struct Game {
    world: World,
    audio: Box<dyn ToneSink>,
    backdrop: MenuBackdrop,
    last_time: Option<f64>,
    achievements: Vec<Achievement>,
}

impl Game {
    pub fn new(playfield: Playfield, settings: Settings, seed: u64, mut audio: Box<dyn ToneSink>) -> Self {
        audio.set_volume(settings.music_gain());
        log::info!("Game initialized with seed: {}", seed);
        Self {
            world: World::new(playfield, settings, seed),
            audio,
            backdrop: MenuBackdrop::new(seed.wrapping_add(1)),
            last_time: None,
            achievements: Vec::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn backdrop(&self) -> &MenuBackdrop {
        &self.backdrop
    }

    /// Achievements of the last finished run
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    /// Forward a menu/settings command
    pub fn command(&mut self, command: Command) {
        if command == Command::StartRun {
            self.achievements.clear();
        }
        apply_command(&mut self.world, command);
        if let Command::SetMusicVolume(_) = command {
            self.audio.set_volume(self.world.settings.music_gain());
        }
    }

    /// Canvas resized
    pub fn resize(&mut self, playfield: Playfield) {
        self.world.resize(playfield);
    }

    /// Deferred shake clear from the presentation layer's own timer
    pub fn clear_shake(&mut self, token: ShakeToken) -> bool {
        self.world.clear_shake(token)
    }

    /// Update then render one displayed frame at `now_ms`
    pub fn frame(&mut self, now_ms: f64, held: HeldKeys) -> RenderFrame {
        let delta_ms = self
            .last_time
            .map(|last| (now_ms - last) as f32)
            .unwrap_or(0.0);
        self.last_time = Some(now_ms);

        self.update(&FrameInput { held, delta_ms });
        self.render()
    }

    /// Advance the simulation and react to its events
    pub fn update(&mut self, input: &FrameInput) {
        tick(&mut self.world, input);

        for event in self.world.drain_events() {
            match event {
                GameEvent::PlayTone {
                    frequency,
                    duration,
                } => self.audio.play_tone(frequency, duration),
                GameEvent::GameOver(summary) => {
                    self.achievements = achievements::earned(&summary);
                    for achievement in &self.achievements {
                        log::info!("Achievement: {}", achievement);
                    }
                }
                GameEvent::LevelUp { level, .. } => log::debug!("Level up: {}", level),
                _ => {}
            }
        }

        if self.world.mode != GameMode::Playing {
            self.backdrop.update(&self.world.playfield);
        }
    }

    /// Read-only view for drawing
    pub fn render(&self) -> RenderFrame {
        build_frame(&self.world, &self.backdrop.particles)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::sim::{Hue, Note};

    /// Shares its log with the test after being boxed into the game
    #[derive(Clone, Default)]
    struct SharedLog(Rc<RefCell<Vec<f32>>>);

    impl ToneSink for SharedLog {
        fn play_tone(&mut self, frequency: f32, _duration: f32) {
            self.0.borrow_mut().push(frequency);
        }

        fn set_volume(&mut self, _volume: f32) {}
    }

    fn game_with_log() -> (Game, SharedLog) {
        let log = SharedLog::default();
        let game = Game::new(
            Playfield::default(),
            Settings::default(),
            2024,
            Box::new(log.clone()),
        );
        (game, log)
    }

    #[test]
    fn test_collected_note_reaches_audio() {
        let (mut game, log) = game_with_log();
        game.command(Command::StartRun);
        let at = game.world.player.pos;
        game.world.notes.push(Note {
            pos: at,
            radius: 15.0,
            color: Hue::Plum,
            frequency: 349.23,
            collected: false,
            pulse: 0.0,
        });
        game.frame(0.0, HeldKeys::default());
        assert_eq!(*log.0.borrow(), vec![349.23]);
    }

    #[test]
    fn test_menu_backdrop_leaves_world_alone() {
        let (mut game, _) = game_with_log();
        let before = serde_json::to_string(game.world()).unwrap();
        for i in 0..200 {
            game.frame(i as f64 * 16.0, HeldKeys::default());
        }
        assert_eq!(before, serde_json::to_string(game.world()).unwrap());
        assert!(!game.backdrop().particles.is_empty());
    }

    #[test]
    fn test_first_frame_has_zero_delta() {
        let (mut game, _) = game_with_log();
        game.command(Command::StartRun);
        game.frame(50_000.0, HeldKeys::default());
        assert_eq!(game.world().timers.note_ms, 0.0);
        game.frame(50_016.0, HeldKeys::default());
        assert_eq!(game.world().timers.note_ms, 16.0);
    }

    #[test]
    fn test_game_over_awards_achievements() {
        let (mut game, _) = game_with_log();
        game.command(Command::StartRun);
        game.world.score = 3500;
        game.world.level = 4;
        game.world.health = 0;
        game.frame(0.0, HeldKeys::default());
        assert_eq!(game.world().mode, GameMode::GameOver);
        assert!(game.achievements().contains(&Achievement::HarmonyMaster));
        assert!(game
            .achievements()
            .contains(&Achievement::CosmicExplorer { level: 4 }));

        game.command(Command::StartRun);
        assert!(game.achievements().is_empty());
        assert_eq!(game.world().player.pos, game.world().playfield.spawn_point());
    }
}
