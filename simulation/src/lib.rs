#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver that wires the world and its systems together.
//!
//! One call to [`Simulation::step`] runs a complete frame in a fixed order:
//! adapter input, the clock tick, terrain generation, spawning, the player
//! gun and finally contact resolution. Every event produced along the way is
//! handed back to the caller so presentation collaborators can react.

use std::time::Duration;

use glam::Vec2;
use serde::Deserialize;
use strafe_core::{Command, ConfigError, Event};
use strafe_system_contacts::Contacts;
use strafe_system_player_weapon::{Config as WeaponConfig, PlayerWeapon};
use strafe_system_spawning::{Config as SpawnConfig, SpawnDirector};
use strafe_system_terrain::{Config as TerrainConfig, TerrainGenerator};
use strafe_world::{self as world, query, World, WorldConfig};
use tracing::{debug, trace};

const SEED_STRIDE: u64 = 0x9e37_79b9_7f4a_7c15;

/// Tuning for the world and every system.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// World tuning.
    pub world: WorldConfig,
    /// Terrain generator tuning.
    pub terrain: TerrainConfig,
    /// Spawn director tuning.
    pub spawning: SpawnConfig,
    /// Player gun tuning.
    pub player_weapon: WeaponConfig,
}

impl Config {
    /// Rejects configurations that cannot drive a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.terrain.validate()?;
        self.spawning.validate()?;
        self.player_weapon.validate()
    }

    /// Derives a distinct seed for every random stream from a single run seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        let stream = |index: u64| seed.wrapping_add(SEED_STRIDE.wrapping_mul(index));
        self.world.seed = stream(1);
        self.terrain.seed = stream(2);
        self.spawning.seed = stream(3);
        self.player_weapon.seed = stream(4);
        self
    }
}

/// Adapter input for a single frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Where the pilot moved the ship, if it moved.
    pub player_position: Option<Vec2>,
    /// Whether the fire button is held.
    pub trigger_held: bool,
    /// Commands from collaborators, such as finished animations, applied before the tick.
    pub commands: Vec<Command>,
}

/// World plus systems, advanced one frame at a time.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    terrain: TerrainGenerator,
    spawning: SpawnDirector,
    weapon: PlayerWeapon,
    contacts: Contacts,
    carried: Vec<Event>,
    frame: u64,
}

impl Simulation {
    /// Builds the world and systems, covering the ground with tiles up front.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let Config {
            world: world_config,
            terrain,
            spawning,
            player_weapon,
        } = config;

        let mut simulation = Self {
            world: World::with_config(world_config)?,
            terrain: TerrainGenerator::new(terrain),
            spawning: SpawnDirector::new(spawning)?,
            weapon: PlayerWeapon::new(player_weapon),
            contacts: Contacts::new(),
            carried: Vec::new(),
            frame: 0,
        };

        let columns = query::terrain_capacity(&simulation.world) as u32;
        let mut commands = Vec::new();
        simulation.terrain.prefill(columns, &mut commands);
        let mut events = Vec::new();
        simulation.apply_commands(&mut commands, &mut events);
        debug!(tiles = events.len(), "terrain prefilled");
        Ok(simulation)
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the terrain generator.
    #[must_use]
    pub fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    /// Read-only access to the spawn director.
    #[must_use]
    pub fn spawning(&self) -> &SpawnDirector {
        &self.spawning
    }

    /// Read-only access to the player gun.
    #[must_use]
    pub fn weapon(&self) -> &PlayerWeapon {
        &self.weapon
    }

    /// Number of frames stepped so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Keeps the upcoming terrain level for `duration` seconds, or the default stretch.
    pub fn request_flat_terrain(&mut self, duration: Option<f32>) {
        self.terrain.generate_flat_terrain(duration);
    }

    /// Runs one frame and appends every event it produced to `out`.
    pub fn step(&mut self, dt: Duration, input: FrameInput, out: &mut Vec<Event>) {
        self.frame = self.frame.saturating_add(1);
        let FrameInput {
            player_position,
            trigger_held,
            commands: mut pending,
        } = input;

        let mut events = Vec::new();
        if let Some(position) = player_position {
            pending.insert(0, Command::MovePlayer { position });
        }
        pending.push(Command::Tick { dt });
        self.apply_commands(&mut pending, &mut events);

        let mut terrain_events = std::mem::take(&mut self.carried);
        terrain_events.extend(events.iter().cloned());
        self.terrain.handle(&terrain_events, &mut pending);
        self.apply_commands(&mut pending, &mut events);

        let carried_from = events.len();
        self.spawning.handle(&events, &mut pending);
        self.apply_commands(&mut pending, &mut events);

        let player = query::player(&self.world);
        self.weapon
            .handle(&events, trigger_held, &player, &mut pending);
        self.apply_commands(&mut pending, &mut events);

        self.contacts
            .handle(&query::colliders(&self.world), &mut pending);
        self.apply_commands(&mut pending, &mut events);

        self.carried = events.get(carried_from..).map(<[Event]>::to_vec).unwrap_or_default();
        trace!(frame = self.frame, events = events.len(), "frame complete");
        out.extend(events);
    }

    fn apply_commands(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }
}

#[cfg(test)]
mod tests {
    use strafe_core::EnemyKind;
    use strafe_system_terrain::TerrainMode;

    use super::*;

    #[test]
    fn construction_prefills_every_tile() {
        let simulation = Simulation::new(Config::default()).expect("default config is valid");

        let tiles = query::terrain_tiles(simulation.world());
        assert_eq!(tiles.len(), query::terrain_capacity(simulation.world()));
        assert_eq!(tiles.first().map(|tile| tile.position.x), Some(0.0));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = Config::default();
        config.world.enemy_pool_size = 0;

        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn seeds_differ_per_stream() {
        let config = Config::default().with_seed(42);

        assert_ne!(config.world.seed, config.terrain.seed);
        assert_ne!(config.spawning.seed, config.player_weapon.seed);
    }

    #[test]
    fn turret_from_input_flattens_terrain_in_the_same_frame() {
        let mut simulation = Simulation::new(Config::default()).expect("default config is valid");
        let mut events = Vec::new();
        let input = FrameInput {
            commands: vec![Command::SpawnEnemy {
                kind: EnemyKind::Turret,
            }],
            ..FrameInput::default()
        };

        simulation.step(Duration::from_millis(16), input, &mut events);

        assert!(events.contains(&Event::FlatTerrainRequested { duration: 1.0 }));
        assert_eq!(simulation.terrain().mode(), TerrainMode::Flat);
    }

    #[test]
    fn events_are_reported_once_per_frame() {
        let mut simulation = Simulation::new(Config::default()).expect("default config is valid");
        let mut events = Vec::new();

        for _ in 0..30 {
            simulation.step(Duration::from_millis(16), FrameInput::default(), &mut events);
        }

        let ticks = events
            .iter()
            .filter(|event| matches!(event, Event::TimeAdvanced { .. }))
            .count();
        assert_eq!(ticks, 30);
        assert_eq!(simulation.frame(), 30);
    }

    #[test]
    fn manual_flat_request_holds_the_generator() {
        let mut simulation = Simulation::new(Config::default()).expect("default config is valid");

        simulation.request_flat_terrain(Some(2.0));

        assert_eq!(simulation.terrain().mode(), TerrainMode::Flat);
    }
}
