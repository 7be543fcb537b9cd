//! Frame building
//!
//! Turns a `&World` into the flat list of instances a drawing surface needs.
//! Building a frame never touches the world, so it can run any number of
//! times between two updates.

use serde::Serialize;

use super::vertex::{Instance, Shape, colors, with_alpha};
use crate::consts::POWERUP_DURATION_MS;
use crate::sim::{GameMode, Particle, PowerUpKind, World};

/// Health bar styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthBand {
    /// Below 30
    Critical,
    /// Below 60
    Warning,
    Healthy,
}

impl HealthBand {
    pub fn for_health(health: u32) -> Self {
        if health < 30 {
            HealthBand::Critical
        } else if health < 60 {
            HealthBand::Warning
        } else {
            HealthBand::Healthy
        }
    }

    pub fn color(&self) -> [f32; 4] {
        match self {
            HealthBand::Critical => colors::HEALTH_CRITICAL,
            HealthBand::Warning => colors::HEALTH_WARNING,
            HealthBand::Healthy => colors::HEALTH_GOOD,
        }
    }
}

/// HUD indicator for an active power-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerUpStatus {
    pub kind: PowerUpKind,
    /// Remaining duration, 1.0 when freshly activated
    pub progress: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub mode: GameMode,
    pub score: u64,
    pub health: u32,
    pub health_band: HealthBand,
    pub level: u32,
    pub game_speed: f32,
    /// Radial gradient (center, edge)
    pub background: ([f32; 4], [f32; 4]),
    /// Shadow color, `None` when glow is off
    pub glow: Option<[f32; 4]>,
    /// Shake the container this frame
    pub shake: bool,
    /// Back to front
    pub instances: Vec<Instance>,
    pub power_ups: Vec<PowerUpStatus>,
}

/// Build the frame for the current world.
///
/// `backdrop` holds menu particles drawn when no run is in progress.
pub fn build_frame(world: &World, backdrop: &[Particle]) -> RenderFrame {
    let settings = &world.settings;
    let mut instances = Vec::with_capacity(
        world.stars.len()
            + world.particles.len()
            + world.player.trail.len()
            + world.notes.len()
            + world.obstacles.len()
            + 8,
    );

    push_stars(world, &mut instances);

    let mut power_ups = Vec::new();
    if world.mode == GameMode::Playing {
        push_particles(&world.particles, &mut instances);
        push_player(world, &mut instances);
        push_notes(world, &mut instances);
        push_obstacles(world, &mut instances);
        push_collectibles(world, &mut instances);
        power_ups = power_up_status(world);
    } else {
        push_particles(backdrop, &mut instances);
    }

    RenderFrame {
        mode: world.mode,
        score: world.score,
        health: world.health,
        health_band: HealthBand::for_health(world.health),
        level: world.level,
        game_speed: world.game_speed,
        background: settings.theme.background(),
        glow: settings.glow.then(|| settings.theme.glow_color()),
        shake: world.is_shaking() && settings.screen_shake,
        instances,
        power_ups,
    }
}

fn push_stars(world: &World, out: &mut Vec<Instance>) {
    for star in &world.stars {
        out.push(Instance::circle(
            star.pos.to_array(),
            star.size,
            with_alpha(colors::STAR, star.opacity),
        ));
    }
}

fn push_particles(particles: &[Particle], out: &mut Vec<Instance>) {
    for p in particles {
        out.push(Instance::circle(
            p.pos.to_array(),
            p.size,
            with_alpha(p.color.rgba(), p.life * p.opacity),
        ));
    }
}

fn push_player(world: &World, out: &mut Vec<Instance>) {
    let player = &world.player;
    for point in &player.trail {
        out.push(Instance::circle(
            point.pos.to_array(),
            player.radius * point.life * 0.5,
            with_alpha(colors::PLAYER, point.life * 0.5),
        ));
    }
    out.push(Instance::circle(player.pos.to_array(), player.radius, colors::PLAYER).with_shape(Shape::Orb));
    if player.shielded {
        out.push(
            Instance::circle(
                player.pos.to_array(),
                player.radius * 1.5,
                with_alpha(PowerUpKind::Shield.color().rgba(), 0.4),
            )
            .with_shape(Shape::Halo),
        );
    }
}

fn push_notes(world: &World, out: &mut Vec<Instance>) {
    for note in &world.notes {
        // Pulsing glow
        let radius = note.radius + note.pulse.sin() * 5.0;
        out.push(Instance::circle(note.pos.to_array(), radius, note.color.rgba()));
    }
}

fn push_obstacles(world: &World, out: &mut Vec<Instance>) {
    for obstacle in &world.obstacles {
        out.push(Instance::rect(
            obstacle.center().to_array(),
            obstacle.size.to_array(),
            obstacle.rotation,
            colors::OBSTACLE,
        ));
    }
}

fn push_collectibles(world: &World, out: &mut Vec<Instance>) {
    for kind in PowerUpKind::ALL {
        if let Some(c) = world.power_ups.slot(kind).collectible {
            out.push(
                Instance::circle(c.pos.to_array(), c.size, kind.color().rgba())
                    .with_shape(Shape::Halo),
            );
        }
    }
}

fn power_up_status(world: &World) -> Vec<PowerUpStatus> {
    PowerUpKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let slot = world.power_ups.slot(kind);
            slot.active.then(|| PowerUpStatus {
                kind,
                progress: (slot.remaining_ms / POWERUP_DURATION_MS).clamp(0.0, 1.0),
            })
        })
        .collect()
}
