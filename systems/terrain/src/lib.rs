#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural terrain generator that recycles ground tiles at the spawn edge.
//!
//! Every few frames the generator picks the next surface height and asks the
//! world to reclaim a pooled tile at that height. Heights follow a clamped
//! random walk, occasionally interrupted by hills, and can be frozen for a
//! while when an enemy needs level ground to stand on.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use strafe_core::{Command, ConfigError, Event, TilePlacement};
use tracing::{debug, trace};

/// Configuration parameters required to construct the terrain generator.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed for height rolls and hill triggers.
    pub seed: u64,
    /// Height of the first tile.
    pub start_height: i32,
    /// Lowest height the random walk may reach.
    pub min_height: i32,
    /// Highest height the random walk may reach.
    pub max_height: i32,
    /// Lowest height a hill descends to.
    pub hill_min: i32,
    /// Highest height a hill climbs to.
    pub hill_max: i32,
    /// Number of frames between two tiles.
    pub frames_per_tile: u32,
    /// A hill starts when a roll over this many sides comes up zero.
    pub hill_roll_sides: u32,
    /// Base hill duration in seconds.
    pub hill_duration: f32,
    /// Inclusive lower bound of the whole-second offset added to the hill duration.
    pub hill_duration_offset_min: i32,
    /// Exclusive upper bound of the whole-second offset added to the hill duration.
    pub hill_duration_offset_max: i32,
    /// Hills climb while more than this many seconds remain and descend afterwards.
    pub hill_descent_after: f32,
    /// Inclusive lower bound of a hill step.
    pub hill_step_min: i32,
    /// Exclusive upper bound of a hill step.
    pub hill_step_max: i32,
    /// Flat stretch used when a request names no duration.
    pub default_flat_duration: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 0x7e55_a1d0_5eed_0001,
            start_height: -90,
            min_height: -150,
            max_height: -60,
            hill_min: -130,
            hill_max: -70,
            frames_per_tile: 5,
            hill_roll_sides: 101,
            hill_duration: 8.0,
            hill_duration_offset_min: -2,
            hill_duration_offset_max: 5,
            hill_descent_after: 4.0,
            hill_step_min: -1,
            hill_step_max: 4,
            default_flat_duration: 0.5,
        }
    }
}

impl Config {
    /// Rejects parameters the generator cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounds = |lower, upper, min: i32, max: i32| {
            ConfigError::require_ordered(lower, upper, min as f32, max as f32)
        };
        bounds("terrain.min_height", "terrain.max_height", self.min_height, self.max_height)?;
        bounds("terrain.min_height", "terrain.start_height", self.min_height, self.start_height)?;
        bounds("terrain.start_height", "terrain.max_height", self.start_height, self.max_height)?;
        bounds("terrain.hill_min", "terrain.hill_max", self.hill_min, self.hill_max)?;
        bounds("terrain.min_height", "terrain.hill_min", self.min_height, self.hill_min)?;
        bounds("terrain.hill_max", "terrain.max_height", self.hill_max, self.max_height)?;
        bounds(
            "terrain.hill_step_min",
            "terrain.hill_step_max",
            self.hill_step_min,
            self.hill_step_max - 1,
        )?;
        bounds(
            "terrain.hill_duration_offset_min",
            "terrain.hill_duration_offset_max",
            self.hill_duration_offset_min,
            self.hill_duration_offset_max - 1,
        )?;
        ConfigError::require_capacity("terrain.frames_per_tile", self.frames_per_tile as usize)?;
        ConfigError::require_capacity("terrain.hill_roll_sides", self.hill_roll_sides as usize)?;
        ConfigError::require_positive("terrain.hill_duration", self.hill_duration)?;
        ConfigError::require_positive(
            "terrain.default_flat_duration",
            self.default_flat_duration,
        )
    }
}

/// Rule currently shaping the terrain height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerrainMode {
    /// Heights are frozen.
    Flat,
    /// A hill is climbing.
    HillAscent,
    /// A hill is descending.
    HillDescent,
    /// Heights wander by at most one unit per tile.
    RandomWalk,
}

/// Pure system that emits tile placement commands.
#[derive(Debug)]
pub struct TerrainGenerator {
    config: Config,
    rng: ChaCha8Rng,
    height: i32,
    frames_until_tile: u32,
    flat_timer: f32,
    hill_timer: f32,
}

impl TerrainGenerator {
    /// Creates a new generator using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            height: config.start_height,
            frames_until_tile: config.frames_per_tile,
            flat_timer: 0.0,
            hill_timer: 0.0,
            config,
        }
    }

    /// Height of the most recently generated tile.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Rule that will shape the next tile.
    #[must_use]
    pub fn mode(&self) -> TerrainMode {
        if self.flat_timer > 0.0 {
            TerrainMode::Flat
        } else if self.hill_timer > 0.0 {
            if self.hill_timer > self.config.hill_descent_after {
                TerrainMode::HillAscent
            } else {
                TerrainMode::HillDescent
            }
        } else {
            TerrainMode::RandomWalk
        }
    }

    /// Freezes the height for `duration` seconds, or the default stretch when `None`.
    ///
    /// A new request replaces any stretch still running.
    pub fn generate_flat_terrain(&mut self, duration: Option<f32>) {
        let duration = duration.unwrap_or(self.config.default_flat_duration);
        debug!(duration, height = self.height, "flat terrain requested");
        self.flat_timer = duration;
    }

    /// Starts a hill lasting `duration` seconds, replacing any hill in progress.
    pub fn start_hill(&mut self, duration: f32) {
        self.hill_timer = duration;
    }

    /// Emits placements covering the ground from the left edge, one tile per column.
    pub fn prefill(&mut self, columns: u32, out: &mut Vec<Command>) {
        for index in 0..columns {
            self.next_height();
            out.push(Command::PlaceTerrainTile {
                height: self.height as f32,
                placement: TilePlacement::Prefill { index },
            });
        }
    }

    /// Consumes the frame's events and emits tile placements.
    ///
    /// Flat requests are honoured before the time that follows them in `events`.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::FlatTerrainRequested { duration } => {
                    self.generate_flat_terrain(Some(*duration));
                }
                Event::TimeAdvanced { dt } => {
                    if let Some(height) = self.advance_frame(dt.as_secs_f32()) {
                        out.push(Command::PlaceTerrainTile {
                            height,
                            placement: TilePlacement::SpawnEdge,
                        });
                    }
                }
                _ => {}
            }
        }
    }

    /// Advances one frame, returning the height of the tile due this frame, if any.
    pub fn advance_frame(&mut self, dt: f32) -> Option<f32> {
        self.frames_until_tile = self.frames_until_tile.saturating_sub(1);
        let placed = if self.frames_until_tile == 0 {
            self.frames_until_tile = self.config.frames_per_tile;
            if self.rng.gen_range(0..self.config.hill_roll_sides) == 0 {
                let offset = self.rng.gen_range(
                    self.config.hill_duration_offset_min..self.config.hill_duration_offset_max,
                );
                let duration = self.config.hill_duration + offset as f32;
                trace!(duration, "hill started");
                self.start_hill(duration);
            }
            self.next_height();
            Some(self.height as f32)
        } else {
            None
        };

        self.flat_timer = (self.flat_timer - dt).max(0.0);
        self.hill_timer = (self.hill_timer - dt).max(0.0);
        placed
    }

    fn next_height(&mut self) {
        let config = &self.config;
        match self.mode() {
            TerrainMode::Flat => {}
            TerrainMode::HillAscent => {
                if self.height < config.hill_max {
                    let step = self.rng.gen_range(config.hill_step_min..config.hill_step_max);
                    self.height = (self.height + step).clamp(config.min_height, config.hill_max);
                }
            }
            TerrainMode::HillDescent => {
                if self.height > config.hill_min {
                    let step = self.rng.gen_range(config.hill_step_min..config.hill_step_max);
                    self.height = (self.height - step).clamp(config.hill_min, config.max_height);
                }
            }
            TerrainMode::RandomWalk => self.random_walk(),
        }
    }

    fn random_walk(&mut self) {
        match self.rng.gen_range(0..6) {
            0 if self.height > self.config.min_height => self.height -= 1,
            5 if self.height < self.config.max_height => self.height += 1,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_are_due_every_configured_frame() {
        let mut generator = TerrainGenerator::new(Config::default());

        let due: Vec<usize> = (1..=15)
            .filter(|_| generator.advance_frame(1.0 / 60.0).is_some())
            .collect();

        assert_eq!(due, vec![5, 10, 15]);
    }

    #[test]
    fn random_walk_moves_at_most_one_unit() {
        let mut generator = TerrainGenerator::new(Config {
            hill_roll_sides: u32::MAX,
            ..Config::default()
        });
        let mut previous = generator.height();

        for _ in 0..1_000 {
            generator.random_walk();
            assert!((generator.height() - previous).abs() <= 1);
            previous = generator.height();
        }
    }

    #[test]
    fn hill_phases_follow_remaining_time() {
        let mut generator = TerrainGenerator::new(Config::default());

        generator.start_hill(7.0);
        assert_eq!(generator.mode(), TerrainMode::HillAscent);

        generator.start_hill(4.0);
        assert_eq!(generator.mode(), TerrainMode::HillDescent);

        generator.generate_flat_terrain(None);
        assert_eq!(generator.mode(), TerrainMode::Flat);
    }

    #[test]
    fn ascent_stops_at_hill_ceiling() {
        let mut generator = TerrainGenerator::new(Config {
            start_height: -72,
            ..Config::default()
        });
        generator.start_hill(1_000.0);

        for _ in 0..100 {
            generator.next_height();
            assert!(generator.height() <= -70);
        }
    }

    #[test]
    fn invalid_bands_are_rejected() {
        let config = Config {
            hill_min: -200,
            ..Config::default()
        };

        assert!(config.validate().is_err());
        assert_eq!(Config::default().validate(), Ok(()));
    }
}
