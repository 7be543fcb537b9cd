//! Simulation core
//!
//! All gameplay logic lives here and operates on one owned [`World`]:
//! - Seeded RNG only
//! - Per-frame steps in a fixed order (see [`tick`])
//! - No rendering or platform dependencies

pub mod collision;
pub mod command;
pub mod difficulty;
pub mod movement;
pub mod powerup;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{check_collisions, circles_overlap, collect_note, hit_obstacle};
pub use command::{Command, apply_command};
pub use difficulty::{
    apply_difficulty_at_start, apply_difficulty_change, level_for_score, update_difficulty,
};
pub use movement::HeldKeys;
pub use powerup::{activate_power_up, deactivate_power_up, update_power_ups};
pub use spawn::spawn_objects;
pub use state::{
    Collectible, GameEvent, GameMode, Hue, NOTE_SCALE, Note, Obstacle, Particle, Player,
    Playfield, PowerUpKind, PowerUpSlot, PowerUps, RunSummary, Shake, ShakeToken, Star,
    TrailPoint, World,
};
pub use tick::{FrameInput, tick};
