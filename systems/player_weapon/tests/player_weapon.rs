use std::time::Duration;

use strafe_core::{Command, Event, ProjectileKind};
use strafe_system_player_weapon::{Config, PlayerWeapon};
use strafe_world::{self as world, query, World};

fn step(world: &mut World, weapon: &mut PlayerWeapon, trigger_held: bool) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(100),
        },
        &mut events,
    );
    let mut commands = Vec::new();
    weapon.handle(&events, trigger_held, &query::player(world), &mut commands);
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn held_trigger_fires_bullets_from_the_ship() {
    let mut world = World::new();
    let mut weapon = PlayerWeapon::new(Config::default());
    let mut fired = Vec::new();

    for _ in 0..20 {
        for event in step(&mut world, &mut weapon, true) {
            if let Event::ProjectileFired {
                projectile,
                position,
                direction,
                velocity,
            } = event
            {
                fired.push((projectile, position, direction, velocity));
            }
        }
    }

    assert_eq!(fired.len(), 5, "one shot per 0.4s of held trigger");
    let ship = query::player(&world).position;
    for (projectile, position, direction, velocity) in fired {
        assert_eq!(projectile.kind(), ProjectileKind::PlayerBullet);
        assert!(position.distance(ship) <= 0.25 + 1e-4);
        assert!(direction.x > 0.99);
        assert_eq!(velocity, 125.0);
    }
}

#[test]
fn bullets_fly_right_and_leave_the_view() {
    let mut world = World::new();
    let mut weapon = PlayerWeapon::new(Config::default());
    let _ = step(&mut world, &mut weapon, true);
    let _ = step(&mut world, &mut weapon, true);
    let _ = step(&mut world, &mut weapon, true);
    let _ = step(&mut world, &mut weapon, true);
    assert_eq!(query::projectiles(&world).len(), 1);
    let start = query::projectiles(&world)[0].position;

    let _ = step(&mut world, &mut weapon, false);
    let moved = query::projectiles(&world)[0].position;
    assert!(moved.x > start.x);
    assert!((moved - start).length() > 12.0);

    let mut retired = false;
    for _ in 0..60 {
        retired |= step(&mut world, &mut weapon, false)
            .iter()
            .any(|event| matches!(event, Event::ProjectileRetired { .. }));
    }
    assert!(retired);
    assert!(query::projectiles(&world).is_empty());
}
