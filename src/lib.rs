//! Stellar Harmony - collect falling notes, dodge obstacles, build melodies
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (spawning, movement, collisions, power-ups)
//! - `renderer`: Read-only frame building for a drawing surface
//! - `audio`: Procedural tone playback
//! - `game`: Driving loop tying simulation, audio and rendering together
//! - `settings`: Player preferences and their JSON form

pub mod achievements;
pub mod audio;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use achievements::Achievement;
pub use game::Game;
pub use settings::{Difficulty, Effect, Settings, Theme};

/// Game configuration constants
///
/// Distances are in canvas pixels and speeds in pixels per frame; durations
/// are in milliseconds.
pub mod consts {
    /// Upper bound on a single frame's delta (a stalled tab must not flood the spawner)
    pub const MAX_FRAME_DELTA_MS: f32 = 100.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const MAX_HEALTH: u32 = 100;
    pub const TRAIL_LENGTH: usize = 20;
    pub const TRAIL_DECAY: f32 = 0.05;

    /// Spawn cadence (divided by game speed for notes and obstacles)
    pub const NOTE_SPAWN_INTERVAL_MS: f32 = 1000.0;
    pub const OBSTACLE_SPAWN_INTERVAL_MS: f32 = 2000.0;
    pub const AMBIENT_SPAWN_INTERVAL_MS: f32 = 100.0;
    /// Evaluated once per frame, not per millisecond
    pub const POWERUP_SPAWN_CHANCE: f64 = 0.001;
    /// Menu backdrop particle chance per frame
    pub const MENU_PARTICLE_CHANCE: f64 = 0.1;

    /// Entity sizes
    pub const NOTE_RADIUS: f32 = 15.0;
    pub const OBSTACLE_WIDTH: f32 = 30.0;
    pub const OBSTACLE_HEIGHT: f32 = 60.0;
    pub const COLLECTIBLE_SIZE: f32 = 20.0;
    pub const STAR_COUNT: usize = 100;

    /// Per-frame animation steps
    pub const NOTE_PULSE_STEP: f32 = 0.1;
    pub const OBSTACLE_SPIN_STEP: f32 = 0.05;
    pub const PARTICLE_DECAY: f32 = 0.01;

    /// Scoring
    pub const NOTE_POINTS: u64 = 100;
    pub const NOTE_HEAL: u32 = 5;
    pub const MELODY_BONUS_THRESHOLD: usize = 5;
    pub const MELODY_BONUS_PER_NOTE: u64 = 10;

    /// Damage
    pub const OBSTACLE_DAMAGE: u32 = 20;
    pub const SHAKE_DURATION_MS: f32 = 500.0;

    /// Power-ups
    pub const POWERUP_DURATION_MS: f32 = 10_000.0;
    pub const SPEED_BOOST: f32 = 1.5;
    pub const MULTIPLIER_VALUE: u32 = 2;

    /// Difficulty progression
    pub const POINTS_PER_LEVEL: u64 = 1000;
    pub const SPEED_PER_LEVEL: f32 = 0.5;

    /// Effect burst sizes
    pub const COLLECT_BURST: usize = 10;
    pub const DAMAGE_BURST: usize = 15;
    pub const POWERUP_BURST: usize = 20;

    /// Tone length for collected notes (seconds)
    pub const NOTE_TONE_SECS: f32 = 0.2;
}

/// Errors surfaced while bringing the game up
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// The drawing surface could not be found
    #[error("Game canvas not found: {0}")]
    MissingCanvas(String),

    /// Canvas exists but its dimensions cannot hold the player
    #[error("Invalid playfield {width}x{height}")]
    InvalidPlayfield { width: f32, height: f32 },

    /// A required presentation element is absent
    #[error("Missing required UI element: {0}")]
    MissingElement(String),

    /// Settings could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Settings file could not be read
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}

/// Sanitize an untrusted frame delta into `[0, MAX_FRAME_DELTA_MS]`
#[inline]
pub fn clamp_delta(delta_ms: f32) -> f32 {
    if delta_ms.is_finite() {
        delta_ms.clamp(0.0, consts::MAX_FRAME_DELTA_MS)
    } else {
        0.0
    }
}
