#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player gun that fires slightly scattered bullets while the trigger is held.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use strafe_core::{Command, ConfigError, Event, PlayerSnapshot, ProjectileKind};
use tracing::trace;

/// Configuration parameters required to construct the player weapon.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between two shots.
    pub cooldown: f32,
    /// Bullet speed.
    pub velocity: f32,
    /// Forward component of the aim vector before normalisation.
    pub forward_reach: f32,
    /// Largest vertical component of the aim vector before normalisation.
    pub max_deviation: f32,
    /// Seed for the scatter.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cooldown: 0.33,
            velocity: 125.0,
            forward_reach: 100.0,
            max_deviation: 6.0,
            seed: 0x9a11_e7f1_2e5e_ed01,
        }
    }
}

impl Config {
    /// Rejects parameters the weapon cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("player_weapon.cooldown", self.cooldown)?;
        ConfigError::require_positive("player_weapon.velocity", self.velocity)?;
        ConfigError::require_positive("player_weapon.forward_reach", self.forward_reach)?;
        if self.max_deviation < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "player_weapon.max_deviation",
                value: self.max_deviation,
            });
        }
        Ok(())
    }
}

/// Pure system that converts a held trigger into bullet commands.
#[derive(Debug)]
pub struct PlayerWeapon {
    config: Config,
    cooldown: f32,
    rng: ChaCha8Rng,
    shots: u64,
}

impl PlayerWeapon {
    /// Creates a new weapon using the supplied configuration.
    ///
    /// The first shot is available once a full cooldown has elapsed.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            cooldown: config.cooldown,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            shots: 0,
            config,
        }
    }

    /// Number of bullets fired so far.
    #[must_use]
    pub const fn shots(&self) -> u64 {
        self.shots
    }

    /// Consumes the frame's events and fires when the trigger is held and the gun is ready.
    pub fn handle(
        &mut self,
        events: &[Event],
        trigger_held: bool,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.cooldown = (self.cooldown - dt.as_secs_f32()).max(0.0);
            }
        }

        if !trigger_held || !player.alive || self.cooldown > 0.0 {
            return;
        }

        let deviation = self
            .rng
            .gen_range(-self.config.max_deviation..=self.config.max_deviation);
        let direction = Vec2::new(self.config.forward_reach, deviation).normalize_or_zero();
        self.cooldown = self.config.cooldown;
        self.shots += 1;
        trace!(shot = self.shots, deviation, "player fired");
        out.push(Command::FireProjectile {
            origin: player.position,
            kind: ProjectileKind::PlayerBullet,
            direction,
            velocity: self.config.velocity,
        });
    }
}
