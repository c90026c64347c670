#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawn director emitting enemy activations on jittered per-kind cooldowns.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use strafe_core::{Command, ConfigError, EnemyKind, Event};
use tracing::trace;

/// Cooldown cadence of a single enemy kind.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Schedule {
    /// Kind of enemy spawned by the entry.
    pub kind: EnemyKind,
    /// Average number of seconds between spawns.
    pub interval: f32,
}

/// Configuration parameters required to construct the spawn director.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-kind cadences, evaluated in order every frame.
    pub schedules: Vec<Schedule>,
    /// Each reset draws uniformly within `interval * (1 ± jitter)`.
    pub jitter: f32,
    /// Seed for the cooldown jitter.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schedules: vec![
                Schedule {
                    kind: EnemyKind::Mine,
                    interval: 4.0,
                },
                Schedule {
                    kind: EnemyKind::Turret,
                    interval: 8.0,
                },
            ],
            jitter: 0.5,
            seed: 0x4d59_5df4_d0f3_3173,
        }
    }
}

impl Config {
    /// Creates a new configuration using the provided cadences, jitter and seed.
    #[must_use]
    pub fn new(schedules: Vec<Schedule>, jitter: f32, seed: u64) -> Self {
        Self {
            schedules,
            jitter,
            seed,
        }
    }

    /// Rejects cadences the director cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for schedule in &self.schedules {
            ConfigError::require_positive("spawning.schedules.interval", schedule.interval)?;
        }
        ConfigError::require_fraction("spawning.jitter", self.jitter)
    }
}

/// Cooldown state of one enemy kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnEntry {
    kind: EnemyKind,
    interval: f32,
    cooldown: f32,
    spawned: u64,
}

impl SpawnEntry {
    /// Kind of enemy spawned by the entry.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Seconds remaining until the next spawn; the spawn fires once this drops below zero.
    #[must_use]
    pub const fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Number of spawns issued so far.
    #[must_use]
    pub const fn spawned(&self) -> u64 {
        self.spawned
    }
}

/// Pure system that emits spawn commands when per-kind cooldowns lapse.
#[derive(Debug)]
pub struct SpawnDirector {
    entries: Vec<SpawnEntry>,
    jitter: f32,
    rng: ChaCha8Rng,
}

impl SpawnDirector {
    /// Creates a new director using the supplied configuration.
    ///
    /// Every cooldown starts at its base interval. Configurations that fail
    /// [`Config::validate`] are rejected, since their jitter band cannot be sampled.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let entries = config
            .schedules
            .iter()
            .map(|schedule| SpawnEntry {
                kind: schedule.kind,
                interval: schedule.interval,
                cooldown: schedule.interval,
                spawned: 0,
            })
            .collect();
        Ok(Self {
            entries,
            jitter: config.jitter,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        })
    }

    /// Read-only access to the per-kind cooldown state.
    #[must_use]
    pub fn entries(&self) -> &[SpawnEntry] {
        &self.entries
    }

    /// Consumes the frame's events and emits at most one spawn per kind.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let mut elapsed = 0.0_f32;
        let mut ticked = false;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                elapsed += dt.as_secs_f32();
                ticked = true;
            }
        }
        if !ticked {
            return;
        }

        let jitter = self.jitter;
        for entry in &mut self.entries {
            if entry.cooldown < 0.0 {
                out.push(Command::SpawnEnemy { kind: entry.kind });
                entry.cooldown = rearm(&mut self.rng, entry.interval, jitter);
                entry.spawned += 1;
                trace!(kind = ?entry.kind, next = entry.cooldown, "spawn issued");
            }
            entry.cooldown -= elapsed;
        }
    }
}

fn rearm(rng: &mut ChaCha8Rng, interval: f32, jitter: f32) -> f32 {
    let spread = interval * jitter;
    interval + rng.gen_range(-spread..=spread)
}
