//! Game settings and preferences
//!
//! Only `difficulty` and `trails` feed the simulation; the rest is read by the
//! renderer and the audio sink.

use serde::{Deserialize, Serialize};

use crate::GameError;

/// Upper bound of the density and volume sliders
pub const SLIDER_MAX: u32 = 100;

/// Visual theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Cosmic,
    Neon,
    Sunset,
    Ocean,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Cosmic => "cosmic",
            Theme::Neon => "neon",
            Theme::Sunset => "sunset",
            Theme::Ocean => "ocean",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cosmic" => Some(Theme::Cosmic),
            "neon" => Some(Theme::Neon),
            "sunset" => Some(Theme::Sunset),
            "ocean" => Some(Theme::Ocean),
            _ => None,
        }
    }

    /// Shadow color used when glow is enabled
    pub fn glow_color(&self) -> [f32; 4] {
        match self {
            Theme::Cosmic => [0.392, 1.0, 0.855, 1.0],
            Theme::Neon => [1.0, 0.0, 1.0, 1.0],
            Theme::Sunset => [1.0, 0.851, 0.239, 1.0],
            Theme::Ocean => [0.0, 1.0, 1.0, 1.0],
        }
    }

    /// Radial background gradient (center, edge)
    pub fn background(&self) -> ([f32; 4], [f32; 4]) {
        match self {
            Theme::Cosmic => ([0.114, 0.153, 0.490, 0.1], [0.008, 0.004, 0.102, 0.3]),
            Theme::Neon => ([1.0, 0.0, 1.0, 0.1], [0.0, 0.0, 0.0, 0.3]),
            Theme::Sunset => ([1.0, 0.420, 0.420, 0.1], [0.176, 0.106, 0.306, 0.3]),
            Theme::Ocean => ([0.0, 0.306, 0.573, 0.1], [0.0, 0.016, 0.157, 0.3]),
        }
    }
}

/// Difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Game speed a run starts at
    pub fn base_game_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.5,
            Difficulty::Normal => 2.0,
            Difficulty::Hard => 3.0,
        }
    }

    /// Player speed without any power-up
    pub fn base_player_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 6.0,
            Difficulty::Normal => 5.0,
            Difficulty::Hard => 4.0,
        }
    }
}

/// Toggleable visual effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Trails,
    Glow,
    Shake,
}

impl Effect {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trails" => Some(Effect::Trails),
            "glow" => Some(Effect::Glow),
            "shake" => Some(Effect::Shake),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    /// Particle density slider (0 - 100)
    pub particle_density: u32,
    /// Music volume slider (0 - 100)
    pub music_volume: u32,
    pub difficulty: Difficulty,

    // === Visual Effects ===
    /// Player trail recording
    pub trails: bool,
    /// Glow around shapes
    pub glow: bool,
    /// Screen shake on damage
    pub screen_shake: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Cosmic,
            particle_density: 50,
            music_volume: 70,
            difficulty: Difficulty::Normal,

            // Visual effects - all on by default
            trails: true,
            glow: true,
            screen_shake: true,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take defaults, sliders are clamped
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        log::info!(
            "Loaded settings (theme={}, difficulty={})",
            settings.theme.as_str(),
            settings.difficulty.as_str()
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Clamp out-of-range slider values
    pub fn sanitize(&mut self) {
        self.particle_density = self.particle_density.min(SLIDER_MAX);
        self.music_volume = self.music_volume.min(SLIDER_MAX);
    }

    pub fn set_particle_density(&mut self, value: u32) {
        self.particle_density = value.min(SLIDER_MAX);
    }

    pub fn set_music_volume(&mut self, value: u32) {
        self.music_volume = value.min(SLIDER_MAX);
    }

    pub fn set_effect(&mut self, effect: Effect, enabled: bool) {
        match effect {
            Effect::Trails => self.trails = enabled,
            Effect::Glow => self.glow = enabled,
            Effect::Shake => self.screen_shake = enabled,
        }
    }

    pub fn effect_enabled(&self, effect: Effect) -> bool {
        match effect {
            Effect::Trails => self.trails,
            Effect::Glow => self.glow,
            Effect::Shake => self.screen_shake,
        }
    }

    /// Music volume as a gain factor (0.0 - 1.0)
    pub fn music_gain(&self) -> f32 {
        self.music_volume.min(SLIDER_MAX) as f32 / SLIDER_MAX as f32
    }
}
