//! Scripted stand-in for a human pilot.

use std::f32::consts::TAU;

use anyhow::{bail, Result};
use glam::Vec2;
use serde::Deserialize;

/// Flight pattern of the scripted pilot.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct PilotConfig {
    /// Horizontal position held throughout the run.
    pub(crate) x: f32,
    /// Height of the hover centre line.
    pub(crate) y: f32,
    /// Vertical swing either side of the centre line.
    pub(crate) amplitude: f32,
    /// Seconds per full swing.
    pub(crate) period: f32,
    /// Whether the trigger stays held.
    pub(crate) autofire: bool,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            x: 80.0,
            y: 0.0,
            amplitude: 40.0,
            period: 6.0,
            autofire: true,
        }
    }
}

impl PilotConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.period.is_nan() || self.period <= 0.0 {
            bail!("pilot.period must be positive, got {}", self.period);
        }
        Ok(())
    }
}

/// Hovers up and down in front of the terrain, firing when allowed.
#[derive(Debug)]
pub(crate) struct Pilot {
    config: PilotConfig,
    elapsed: f32,
}

impl Pilot {
    pub(crate) fn new(config: PilotConfig) -> Self {
        Self {
            config,
            elapsed: 0.0,
        }
    }

    /// Advances the flight by `dt` seconds and returns the ship position and trigger.
    pub(crate) fn steer(&mut self, dt: f32) -> (Vec2, bool) {
        self.elapsed += dt;
        let phase = TAU * self.elapsed / self.config.period;
        let position = Vec2::new(
            self.config.x,
            self.config.y + self.config.amplitude * phase.sin(),
        );
        (position, self.config.autofire)
    }
}
