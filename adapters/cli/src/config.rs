//! TOML session configuration.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use strafe_presentation::ClipDurations;
use strafe_simulation::Config as SimulationConfig;

use crate::pilot::PilotConfig;

/// Everything a headless session needs, loaded from a single TOML file.
///
/// Simulation sections (`[world]`, `[terrain]`, `[spawning]`,
/// `[player_weapon]`) sit at the top level next to the adapter sections.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct GameConfig {
    #[serde(flatten)]
    pub(crate) simulation: SimulationConfig,
    pub(crate) animation: ClipDurations,
    pub(crate) pilot: PilotConfig,
    pub(crate) run: RunConfig,
}

/// Session length and pacing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct RunConfig {
    pub(crate) seconds: f32,
    pub(crate) fps: u32,
    pub(crate) seed: Option<u64>,
    pub(crate) stop_on_lose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seconds: 60.0,
            fps: 60,
            seed: None,
            stop_on_lose: true,
        }
    }
}

impl RunConfig {
    /// Number of fixed steps the session runs for.
    pub(crate) fn frames(&self) -> u64 {
        (self.seconds * self.fps as f32).ceil() as u64
    }
}

impl GameConfig {
    /// Reads and validates the configuration stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config at {}", path.display()))
    }

    /// Parses and validates TOML contents.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse config toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects sessions that cannot run.
    pub(crate) fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        if self.run.seconds.is_nan() || self.run.seconds <= 0.0 {
            bail!("run.seconds must be positive, got {}", self.run.seconds);
        }
        if self.run.fps == 0 {
            bail!("run.fps must be positive");
        }
        self.pilot.validate()
    }
}

#[cfg(test)]
mod tests {
    use strafe_core::EnemyKind;

    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = GameConfig::parse("").expect("empty config is valid");

        assert_eq!(config, GameConfig::default());
        assert_eq!(config.run.frames(), 3600);
    }

    #[test]
    fn sections_override_their_fields_only() {
        let config = GameConfig::parse(
            r#"
            [world.mine]
            health = 1

            [spawning]
            jitter = 0.0
            schedules = [{ kind = "Mine", interval = 2.0 }]

            [animation]
            explode = 0.25

            [run]
            seconds = 5.0
            seed = 9
            "#,
        )
        .expect("config is valid");

        assert_eq!(config.simulation.world.mine.health, 1);
        assert_eq!(config.simulation.world.mine.speed, 60.0);
        assert_eq!(config.simulation.spawning.schedules.len(), 1);
        assert_eq!(config.simulation.spawning.schedules[0].kind, EnemyKind::Mine);
        assert_eq!(config.animation.explode, 0.25);
        assert_eq!(config.animation.charge, 0.6);
        assert_eq!(config.run.seed, Some(9));
        assert_eq!(config.run.frames(), 300);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(GameConfig::parse("[run]\nfps = 0").is_err());
        assert!(GameConfig::parse("[world]\nenemy_pool_size = 0").is_err());
        assert!(GameConfig::parse("[spawning]\njitter = 2.0").is_err());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(GameConfig::parse("[run\nseconds = ").is_err());
    }
}
