use std::time::Duration;

use strafe_core::{Command, EnemyKind, Event, TilePlacement};
use strafe_system_terrain::{Config, TerrainGenerator, TerrainMode};
use strafe_world::{self as world, query, World};

fn frame(seconds: f32) -> Event {
    Event::TimeAdvanced {
        dt: Duration::from_secs_f32(seconds),
    }
}

fn heights(commands: &[Command]) -> Vec<f32> {
    commands
        .iter()
        .filter_map(|command| match command {
            Command::PlaceTerrainTile { height, .. } => Some(*height),
            _ => None,
        })
        .collect()
}

#[test]
fn flat_request_freezes_height_for_its_duration() {
    let mut generator = TerrainGenerator::new(Config {
        frames_per_tile: 1,
        hill_roll_sides: u32::MAX,
        hill_step_min: 1,
        hill_step_max: 2,
        ..Config::default()
    });
    generator.start_hill(100.0);
    let start = generator.height() as f32;
    let mut commands = Vec::new();

    generator.handle(
        &[Event::FlatTerrainRequested { duration: 0.5 }, frame(0.125)],
        &mut commands,
    );
    for _ in 0..4 {
        generator.handle(&[frame(0.125)], &mut commands);
    }

    assert_eq!(heights(&commands), vec![start, start, start, start, start + 1.0]);
    assert_eq!(generator.mode(), TerrainMode::HillAscent);
}

#[test]
fn heights_stay_within_bounds() {
    let config = Config {
        frames_per_tile: 1,
        hill_roll_sides: 3,
        ..Config::default()
    };
    let (min, max) = (config.min_height as f32, config.max_height as f32);
    let mut generator = TerrainGenerator::new(config);

    for _ in 0..100_000 {
        if let Some(height) = generator.advance_frame(1.0 / 60.0) {
            assert!((min..=max).contains(&height), "height {height} escaped bounds");
        }
    }
}

#[test]
fn prefill_covers_the_ground_from_the_left_edge() {
    let mut world = World::new();
    let mut generator = TerrainGenerator::new(Config::default());
    let mut commands = Vec::new();

    generator.prefill(4, &mut commands);
    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let xs: Vec<f32> = query::terrain_tiles(&world)
        .iter()
        .map(|tile| tile.position.x)
        .collect();
    assert_eq!(xs, vec![0.0, 4.5, 9.0, 13.5]);
}

#[test]
fn new_tiles_appear_at_the_spawn_edge() {
    let mut world = World::new();
    let mut generator = TerrainGenerator::new(Config {
        frames_per_tile: 1,
        ..Config::default()
    });
    let mut commands = Vec::new();
    generator.handle(&[frame(1.0 / 60.0)], &mut commands);

    assert!(matches!(
        commands.as_slice(),
        [Command::PlaceTerrainTile {
            placement: TilePlacement::SpawnEdge,
            ..
        }]
    ));

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    let placed = events.iter().find_map(|event| match event {
        Event::TerrainTilePlaced { position, .. } => Some(*position),
        _ => None,
    });
    assert_eq!(placed.map(|position| position.x), Some(550.0));
}

#[test]
fn turret_spawn_flattens_upcoming_terrain() {
    let mut world = World::new();
    let mut generator = TerrainGenerator::new(Config::default());
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Turret,
        },
        &mut events,
    );

    let mut commands = Vec::new();
    generator.handle(&events, &mut commands);

    assert!(events.contains(&Event::FlatTerrainRequested { duration: 1.0 }));
    assert_eq!(generator.mode(), TerrainMode::Flat);
}
