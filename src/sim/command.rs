//! Commands the presentation layer issues into the simulation

use super::difficulty::apply_difficulty_change;
use super::state::World;
use crate::settings::{Difficulty, Effect, Theme};

/// Input from menus and settings forms
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    StartRun,
    ShowMenu,
    ShowInstructions,
    ShowSettings,
    SetDifficulty(Difficulty),
    SetEffect(Effect, bool),
    SetTheme(Theme),
    /// Slider value, clamped to 0 - 100
    SetParticleDensity(u32),
    /// Slider value, clamped to 0 - 100
    SetMusicVolume(u32),
}

impl Command {
    /// Parse a settings form field; unknown names or values yield `None`
    pub fn from_setting(name: &str, value: &str) -> Option<Self> {
        let value = value.trim();
        match name {
            "difficulty" => Difficulty::from_str(value).map(Command::SetDifficulty),
            "theme" => Theme::from_str(value).map(Command::SetTheme),
            "particleDensity" => value.parse().ok().map(Command::SetParticleDensity),
            "musicVolume" => value.parse().ok().map(Command::SetMusicVolume),
            _ => {
                let effect = Effect::from_str(name.trim_end_matches("Toggle"))?;
                let enabled = value.parse().ok()?;
                Some(Command::SetEffect(effect, enabled))
            }
        }
    }
}

/// Apply a command to the world
pub fn apply_command(world: &mut World, command: Command) {
    match command {
        Command::StartRun => world.start_game(),
        Command::ShowMenu => world.show_menu(),
        Command::ShowInstructions => world.show_instructions(),
        Command::ShowSettings => world.show_settings(),
        Command::SetDifficulty(difficulty) => {
            world.settings.difficulty = difficulty;
            apply_difficulty_change(world);
        }
        Command::SetEffect(effect, enabled) => world.settings.set_effect(effect, enabled),
        Command::SetTheme(theme) => world.settings.theme = theme,
        Command::SetParticleDensity(value) => world.settings.set_particle_density(value),
        Command::SetMusicVolume(value) => world.settings.set_music_volume(value),
    }
}
