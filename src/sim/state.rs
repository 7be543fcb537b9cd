//! World state and core simulation types
//!
//! Everything a run touches lives in [`World`]. Components in sibling modules
//! are free functions over `&mut World`; nothing here is global.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::*;
use crate::settings::Settings;
use crate::GameError;

/// Coarse UI/simulation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameMode {
    /// Title screen
    Menu,
    /// Active gameplay (the only mode that simulates)
    Playing,
    /// How-to-play screen
    Instructions,
    /// Run ended
    GameOver,
    /// Settings form
    Settings,
}

/// Closed palette for every colored entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Hue {
    Aqua,
    Gold,
    Rose,
    Mint,
    Plum,
    Sky,
    Coral,
    ShieldBlue,
    SpeedRed,
    MultiplierGold,
}

impl Hue {
    /// Colors a note can take
    pub const NOTE_PALETTE: [Hue; 5] = [Hue::Aqua, Hue::Gold, Hue::Rose, Hue::Mint, Hue::Plum];
    /// Colors an ambient particle can take
    pub const AMBIENT_PALETTE: [Hue; 6] =
        [Hue::Aqua, Hue::Gold, Hue::Rose, Hue::Mint, Hue::Plum, Hue::Sky];

    pub fn rgba(&self) -> [f32; 4] {
        match self {
            Hue::Aqua => [0.392, 1.0, 0.855, 1.0],
            Hue::Gold => [1.0, 0.851, 0.239, 1.0],
            Hue::Rose => [1.0, 0.541, 0.584, 1.0],
            Hue::Mint => [0.659, 0.902, 0.812, 1.0],
            Hue::Plum => [0.867, 0.627, 0.867, 1.0],
            Hue::Sky => [0.529, 0.808, 0.922, 1.0],
            Hue::Coral => [1.0, 0.420, 0.420, 1.0],
            Hue::ShieldBlue => [0.290, 0.620, 1.0, 1.0],
            Hue::SpeedRed => [1.0, 0.290, 0.290, 1.0],
            Hue::MultiplierGold => [1.0, 0.8, 0.0, 1.0],
        }
    }

    pub(crate) fn pick(palette: &[Hue], rng: &mut Pcg32) -> Hue {
        palette[rng.random_range(0..palette.len())]
    }
}

/// C4..C5, equal temperament (Hz)
pub const NOTE_SCALE: [f32; 8] = [261.63, 293.66, 329.63, 349.23, 392.00, 440.00, 493.88, 523.25];

/// Drawing surface dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    /// Validate a canvas size; it must at least fit the player
    pub fn new(width: f32, height: f32) -> Result<Self, GameError> {
        let min = PLAYER_RADIUS * 2.0;
        if !width.is_finite() || !height.is_finite() || width < min || height < min {
            return Err(GameError::InvalidPlayfield { width, height });
        }
        Ok(Self { width, height })
    }

    /// Where the player starts a run
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.width * 0.1, self.height / 2.0)
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Trail point behind the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    /// 1.0 when recorded, fades to 0
    pub life: f32,
}

/// The player's avatar
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Speed without power-ups, set by difficulty
    pub base_speed: f32,
    /// Current speed (pixels per frame per held direction)
    pub speed: f32,
    pub shielded: bool,
    /// Oldest first
    pub trail: VecDeque<TrailPoint>,
}

impl Player {
    pub fn new(spawn: Vec2, base_speed: f32) -> Self {
        Self {
            pos: spawn,
            radius: PLAYER_RADIUS,
            base_speed,
            speed: base_speed,
            shielded: false,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Keep the whole avatar on screen
    pub fn clamp_to(&mut self, field: &Playfield) {
        self.pos.x = self.pos.x.clamp(self.radius, field.width - self.radius);
        self.pos.y = self.pos.y.clamp(self.radius, field.height - self.radius);
    }

    /// Record current position and fade older points
    pub fn record_trail(&mut self) {
        self.trail.push_back(TrailPoint {
            pos: self.pos,
            life: 1.0,
        });
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
        for point in self.trail.iter_mut() {
            point.life -= TRAIL_DECAY;
        }
        self.trail.retain(|p| p.life > 0.0);
    }
}

/// A collectible musical note
#[derive(Debug, Clone, Serialize)]
pub struct Note {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Hue,
    /// Tone played on collection (Hz)
    pub frequency: f32,
    pub collected: bool,
    /// Glow animation phase
    pub pulse: f32,
}

/// A rectangular hazard
#[derive(Debug, Clone, Serialize)]
pub struct Obstacle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// Radians (drawing only, the hitbox stays axis-aligned)
    pub rotation: f32,
}

impl Obstacle {
    /// AABB test against a centered square of half-extent `half`
    pub fn overlaps_square(&self, center: Vec2, half: f32) -> bool {
        center.x + half > self.pos.x
            && center.x - half < self.pos.x + self.size.x
            && center.y + half > self.pos.y
            && center.y - half < self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    pub size: f32,
    pub color: Hue,
    /// 0-1, decreases over time
    pub life: f32,
    pub opacity: f32,
}

impl Particle {
    /// Drifting background particle entering from the right edge
    pub fn ambient(field: &Playfield, rng: &mut Pcg32) -> Self {
        Self {
            pos: Vec2::new(field.width, rng.random::<f32>() * field.height),
            vel: Vec2::new(-(rng.random::<f32>() * 3.0 + 1.0), 0.0),
            size: rng.random::<f32>() * 3.0 + 1.0,
            color: Hue::pick(&Hue::AMBIENT_PALETTE, rng),
            life: 1.0,
            opacity: rng.random::<f32>() * 0.5 + 0.2,
        }
    }

    /// Advance one frame; returns false once the particle is spent
    pub fn step(&mut self) -> bool {
        self.pos += self.vel;
        self.life -= PARTICLE_DECAY;
        self.life > 0.0 && self.pos.x >= 0.0
    }
}

/// Background star (parallax only, never collides)
#[derive(Debug, Clone, Serialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub opacity: f32,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PowerUpKind {
    Shield,
    Speed,
    Multiplier,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Shield, PowerUpKind::Speed, PowerUpKind::Multiplier];

    pub fn color(&self) -> Hue {
        match self {
            PowerUpKind::Shield => Hue::ShieldBlue,
            PowerUpKind::Speed => Hue::SpeedRed,
            PowerUpKind::Multiplier => Hue::MultiplierGold,
        }
    }
}

/// An in-flight power-up pickup
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Collectible {
    pub pos: Vec2,
    pub size: f32,
}

/// Activation state and pickup for one power-up kind
#[derive(Debug, Clone, Default, Serialize)]
pub struct PowerUpSlot {
    pub active: bool,
    pub remaining_ms: f32,
    /// Independent of `active`
    pub collectible: Option<Collectible>,
}

/// One slot per power-up kind
#[derive(Debug, Clone, Serialize)]
pub struct PowerUps {
    pub shield: PowerUpSlot,
    pub speed: PowerUpSlot,
    pub multiplier: PowerUpSlot,
    /// 1 when the multiplier is idle
    pub multiplier_value: u32,
}

impl Default for PowerUps {
    fn default() -> Self {
        Self {
            shield: PowerUpSlot::default(),
            speed: PowerUpSlot::default(),
            multiplier: PowerUpSlot::default(),
            multiplier_value: 1,
        }
    }
}

impl PowerUps {
    pub fn slot(&self, kind: PowerUpKind) -> &PowerUpSlot {
        match kind {
            PowerUpKind::Shield => &self.shield,
            PowerUpKind::Speed => &self.speed,
            PowerUpKind::Multiplier => &self.multiplier,
        }
    }

    pub fn slot_mut(&mut self, kind: PowerUpKind) -> &mut PowerUpSlot {
        match kind {
            PowerUpKind::Shield => &mut self.shield,
            PowerUpKind::Speed => &mut self.speed,
            PowerUpKind::Multiplier => &mut self.multiplier,
        }
    }
}

/// Spawn accumulators (ms since last spawn)
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpawnTimers {
    pub note_ms: f32,
    pub obstacle_ms: f32,
    pub particle_ms: f32,
}

/// Identifies one shake within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShakeToken {
    pub run_id: u64,
    pub seq: u32,
}

/// Transient screen shake
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Shake {
    pub token: ShakeToken,
    pub remaining_ms: f32,
}

/// Final numbers of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub score: u64,
    pub level: u32,
    pub longest_melody: usize,
    pub notes_collected: u32,
}

/// Things the presentation layer reacts to, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// Fire-and-forget tone request
    PlayTone { frequency: f32, duration: f32 },
    NoteCollected { points: u64, melody_len: usize },
    /// The token clears the shake when an external timer fires
    ObstacleHit { health: u32, shake: ShakeToken },
    PowerUpActivated(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    LevelUp { level: u32, game_speed: f32 },
    GameOver(RunSummary),
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize)]
pub struct World {
    pub mode: GameMode,
    pub playfield: Playfield,
    pub settings: Settings,
    /// Seed the RNG was created from
    pub seed: u64,
    pub player: Player,
    pub notes: Vec<Note>,
    pub obstacles: Vec<Obstacle>,
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
    pub power_ups: PowerUps,
    pub score: u64,
    /// 0 - 100
    pub health: u32,
    pub level: u32,
    pub game_speed: f32,
    /// Tone frequencies collected since the last hit
    pub melody: Vec<f32>,
    pub longest_melody: usize,
    pub notes_collected: u32,
    pub timers: SpawnTimers,
    pub shake: Option<Shake>,
    /// Incremented by every `start_game`
    pub run_id: u64,
    /// Frames simulated this run
    pub frame: u64,
    shake_seq: u32,
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
}

impl World {
    /// Create a world sitting at the menu
    pub fn new(playfield: Playfield, settings: Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = create_star_field(&playfield, &mut rng);
        let difficulty = settings.difficulty;
        Self {
            mode: GameMode::Menu,
            player: Player::new(playfield.spawn_point(), difficulty.base_player_speed()),
            playfield,
            settings,
            seed,
            notes: Vec::new(),
            obstacles: Vec::new(),
            particles: Vec::new(),
            stars,
            power_ups: PowerUps::default(),
            score: 0,
            health: MAX_HEALTH,
            level: 1,
            game_speed: difficulty.base_game_speed(),
            melody: Vec::new(),
            longest_melody: 0,
            notes_collected: 0,
            timers: SpawnTimers::default(),
            shake: None,
            run_id: 0,
            frame: 0,
            shake_seq: 0,
            events: Vec::new(),
            rng,
        }
    }

    // === Mode controller ===

    /// Reset every per-run value and enter `Playing`
    pub fn start_game(&mut self) {
        self.run_id += 1;
        self.score = 0;
        self.health = MAX_HEALTH;
        self.level = 1;
        self.notes.clear();
        self.obstacles.clear();
        self.particles.clear();
        self.melody.clear();
        self.longest_melody = 0;
        self.notes_collected = 0;
        self.power_ups = PowerUps::default();
        self.timers = SpawnTimers::default();
        self.shake = None;
        self.shake_seq = 0;
        self.frame = 0;
        self.events.clear();

        self.player = Player::new(
            self.playfield.spawn_point(),
            self.settings.difficulty.base_player_speed(),
        );
        super::difficulty::apply_difficulty_at_start(self);

        self.mode = GameMode::Playing;
        log::info!(
            "Run {} started (difficulty={}, speed={})",
            self.run_id,
            self.settings.difficulty.as_str(),
            self.game_speed
        );
    }

    pub fn show_menu(&mut self) {
        self.set_mode(GameMode::Menu);
    }

    pub fn show_instructions(&mut self) {
        self.set_mode(GameMode::Instructions);
    }

    pub fn show_settings(&mut self) {
        self.set_mode(GameMode::Settings);
    }

    fn set_mode(&mut self, mode: GameMode) {
        if self.mode != mode {
            log::info!("Mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Enter `GameOver` if health ran out; true on the transition frame only
    pub(crate) fn check_game_over(&mut self) -> bool {
        if self.mode != GameMode::Playing || self.health > 0 {
            return false;
        }
        self.mode = GameMode::GameOver;
        let summary = self.summary();
        log::info!(
            "Run {} over: score={} level={}",
            self.run_id,
            summary.score,
            summary.level
        );
        self.emit(GameEvent::GameOver(summary));
        true
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.score,
            level: self.level,
            longest_melody: self.longest_melody,
            notes_collected: self.notes_collected,
        }
    }

    /// Canvas resized: adopt the new size and recentre the player
    pub fn resize(&mut self, playfield: Playfield) {
        self.playfield = playfield;
        self.player.pos = playfield.spawn_point();
        self.player.clamp_to(&playfield);
    }

    // === Shake ===

    /// Start a shake owned by the current run
    pub(crate) fn start_shake(&mut self) -> ShakeToken {
        self.shake_seq = self.shake_seq.wrapping_add(1);
        let token = ShakeToken {
            run_id: self.run_id,
            seq: self.shake_seq,
        };
        self.shake = Some(Shake {
            token,
            remaining_ms: SHAKE_DURATION_MS,
        });
        token
    }

    /// Clear the shake a deferred timer was scheduled for.
    ///
    /// Returns false (and changes nothing) when the token belongs to an older
    /// shake or a previous run.
    pub fn clear_shake(&mut self, token: ShakeToken) -> bool {
        match self.shake {
            Some(shake) if shake.token == token => {
                self.shake = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_some()
    }

    // === Events ===

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take this frame's events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events queued since the last drain
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}

fn create_star_field(field: &Playfield, rng: &mut Pcg32) -> Vec<Star> {
    (0..STAR_COUNT)
        .map(|_| Star {
            pos: Vec2::new(
                rng.random::<f32>() * field.width,
                rng.random::<f32>() * field.height,
            ),
            size: rng.random::<f32>() * 2.0,
            speed: rng.random::<f32>() * 2.0 + 0.5,
            opacity: rng.random::<f32>() * 0.8 + 0.2,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;

    fn world() -> World {
        World::new(Playfield::default(), Settings::default(), 7)
    }

    #[test]
    fn test_new_world_sits_at_menu() {
        let w = world();
        assert_eq!(w.mode, GameMode::Menu);
        assert_eq!(w.stars.len(), STAR_COUNT);
        assert_eq!(w.health, MAX_HEALTH);
        assert_eq!(w.level, 1);
    }

    #[test]
    fn test_playfield_validation() {
        assert!(Playfield::new(800.0, 600.0).is_ok());
        assert!(Playfield::new(10.0, 600.0).is_err());
        assert!(Playfield::new(f32::NAN, 600.0).is_err());
        assert!(Playfield::new(800.0, 0.0).is_err());
    }

    #[test]
    fn test_start_game_resets_run() {
        let mut w = world();
        w.start_game();
        w.score = 4200;
        w.health = 10;
        w.level = 5;
        w.game_speed = 9.0;
        w.melody = vec![261.63; 4];
        w.notes.push(Note {
            pos: Vec2::new(10.0, 10.0),
            radius: NOTE_RADIUS,
            color: Hue::Aqua,
            frequency: 440.0,
            collected: false,
            pulse: 0.0,
        });
        w.power_ups.shield.collectible = Some(Collectible {
            pos: Vec2::ZERO,
            size: COLLECTIBLE_SIZE,
        });
        w.power_ups.speed.active = true;
        w.mode = GameMode::GameOver;

        w.start_game();
        assert_eq!(w.mode, GameMode::Playing);
        assert_eq!((w.score, w.health, w.level), (0, 100, 1));
        assert_eq!(w.game_speed, 2.0);
        assert!(w.notes.is_empty() && w.obstacles.is_empty() && w.particles.is_empty());
        assert!(w.melody.is_empty());
        assert!(w.power_ups.shield.collectible.is_none());
        assert!(!w.power_ups.speed.active);
        assert_eq!(w.player.pos, w.playfield.spawn_point());
        assert_eq!(w.run_id, 2);
    }

    #[test]
    fn test_start_game_uses_difficulty_baseline() {
        let mut settings = Settings::default();
        settings.difficulty = Difficulty::Hard;
        let mut w = World::new(Playfield::default(), settings, 1);
        w.start_game();
        assert_eq!(w.game_speed, 3.0);
        assert_eq!(w.player.speed, 4.0);
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut w = world();
        w.start_game();
        w.health = 0;
        assert!(w.check_game_over());
        assert!(!w.check_game_over());
        assert_eq!(w.mode, GameMode::GameOver);
        let overs = w
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver(_)))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_stale_shake_token_is_ignored() {
        let mut w = world();
        w.start_game();
        let old = w.start_shake();
        w.start_game();
        let current = w.start_shake();
        assert_ne!(old, current);
        assert!(!w.clear_shake(old));
        assert!(w.is_shaking());
        assert!(w.clear_shake(current));
        assert!(!w.is_shaking());
    }

    #[test]
    fn test_trail_is_bounded_and_fades() {
        let mut player = Player::new(Vec2::new(100.0, 100.0), 5.0);
        for _ in 0..50 {
            player.record_trail();
        }
        assert!(player.trail.len() <= TRAIL_LENGTH);
        let newest = player.trail.back().unwrap();
        assert!((newest.life - (1.0 - TRAIL_DECAY)).abs() < 1e-6);
        assert!(player.trail.iter().all(|p| p.life > 0.0));
    }

    #[test]
    fn test_obstacle_overlap() {
        let obstacle = Obstacle {
            pos: Vec2::new(100.0, 100.0),
            size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            speed: 2.0,
            rotation: 0.0,
        };
        assert!(obstacle.overlaps_square(Vec2::new(90.0, 120.0), 20.0));
        assert!(!obstacle.overlaps_square(Vec2::new(60.0, 120.0), 20.0));
        assert!(!obstacle.overlaps_square(Vec2::new(115.0, 180.0), 20.0));
    }

    #[test]
    fn test_resize_recentres_player() {
        let mut w = world();
        let field = Playfield::new(400.0, 300.0).unwrap();
        w.resize(field);
        assert_eq!(w.player.pos, Vec2::new(40.0, 150.0));
    }
}
