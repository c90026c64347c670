use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use strafe_core::{
    Acquisition, EnemyId, EnemyKind, EnemyState, Event, ObjectPool, ProjectileKind,
};

use crate::{config::WorldConfig, timers::Timers};

/// Delayed per-enemy actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EnemyTimer {
    /// Hides the hurt overlay.
    ClearHurt,
    /// Drops the enemy onto the ground below it.
    Settle,
}

/// Rotating gun mounted on an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Gun {
    pub(crate) angle: f32,
    pub(crate) has_fired: bool,
}

/// Pooled enemy instance.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) state: EnemyState,
    pub(crate) hurt: bool,
    pub(crate) health: i32,
    pub(crate) position: Vec2,
    pub(crate) radius: f32,
    pub(crate) gun: Option<Gun>,
    /// Explosion finished but the remains stay on screen without a collider.
    pub(crate) wrecked: bool,
    pub(crate) timers: Timers<EnemyTimer>,
}

impl Enemy {
    fn parked() -> Self {
        Self {
            state: EnemyState::Inactive,
            hurt: false,
            health: 0,
            position: Vec2::ZERO,
            radius: 0.0,
            gun: None,
            wrecked: false,
            timers: Timers::default(),
        }
    }
}

/// Per-kind constants resolved from the configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Stats {
    pub(crate) max_health: i32,
    pub(crate) speed: f32,
    pub(crate) score: u32,
    pub(crate) radius: f32,
    pub(crate) terrain_safe: bool,
    pub(crate) ground_offset: f32,
}

/// Where and how a freshly activated enemy starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Spawn {
    pub(crate) state: EnemyState,
    pub(crate) flat_terrain: Option<f32>,
}

/// Projectile released by a completed attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Shot {
    pub(crate) origin: Vec2,
    pub(crate) kind: ProjectileKind,
    pub(crate) direction: Vec2,
    pub(crate) velocity: f32,
}

/// What becomes of an enemy once its explosion animation completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AfterExplosion {
    /// Returns to the pool.
    Deactivate,
    /// Stays behind as a wreck until it scrolls off.
    PersistWreck,
}

/// Behaviour hooks shared by every enemy of one kind.
pub(crate) struct Behavior {
    pub(crate) stats: fn(&WorldConfig) -> Stats,
    pub(crate) activate: fn(&mut Enemy, &WorldConfig, &mut ChaCha8Rng, Vec2) -> Spawn,
    /// Runs every frame while active; returns `true` to start charging an attack.
    pub(crate) update: fn(&mut Enemy, &WorldConfig, Vec2) -> bool,
    pub(crate) release: fn(&Enemy, &WorldConfig, Vec2) -> Option<Shot>,
    pub(crate) explode: fn(&mut Enemy, &WorldConfig),
    pub(crate) after_explosion: AfterExplosion,
}

static MINE: Behavior = Behavior {
    stats: mine_stats,
    activate: activate_mine,
    update: idle,
    release: no_shot,
    explode: explode_mine,
    after_explosion: AfterExplosion::Deactivate,
};

static TURRET: Behavior = Behavior {
    stats: turret_stats,
    activate: activate_turret,
    update: update_turret,
    release: release_turret,
    explode: explode_turret,
    after_explosion: AfterExplosion::PersistWreck,
};

pub(crate) fn behavior(kind: EnemyKind) -> &'static Behavior {
    match kind {
        EnemyKind::Mine => &MINE,
        EnemyKind::Turret => &TURRET,
    }
}

fn mine_stats(config: &WorldConfig) -> Stats {
    Stats {
        max_health: config.mine.health,
        speed: config.mine.speed,
        score: config.mine.score,
        radius: config.mine.radius,
        terrain_safe: false,
        ground_offset: 0.0,
    }
}

fn activate_mine(
    enemy: &mut Enemy,
    config: &WorldConfig,
    rng: &mut ChaCha8Rng,
    player: Vec2,
) -> Spawn {
    let mine = &config.mine;
    let y = if rng.gen_bool(f64::from(mine.player_align_chance)) {
        player.y + rng.gen_range(-mine.player_align_jitter..=mine.player_align_jitter)
    } else {
        rng.gen_range(mine.min_y..=mine.max_y)
    };
    enemy.position = Vec2::new(mine.spawn_x, y);
    enemy.gun = None;
    Spawn {
        state: EnemyState::Active,
        flat_terrain: None,
    }
}

fn idle(_enemy: &mut Enemy, _config: &WorldConfig, _player: Vec2) -> bool {
    false
}

fn no_shot(_enemy: &Enemy, _config: &WorldConfig, _player: Vec2) -> Option<Shot> {
    None
}

fn explode_mine(enemy: &mut Enemy, config: &WorldConfig) {
    enemy.radius = config.mine.blast_radius;
}

fn turret_stats(config: &WorldConfig) -> Stats {
    Stats {
        max_health: config.turret.health,
        speed: config.turret.speed,
        score: config.turret.score,
        radius: config.turret.radius,
        terrain_safe: true,
        ground_offset: config.turret.ground_offset,
    }
}

fn activate_turret(
    enemy: &mut Enemy,
    config: &WorldConfig,
    _rng: &mut ChaCha8Rng,
    _player: Vec2,
) -> Spawn {
    let turret = &config.turret;
    enemy.position = Vec2::new(turret.spawn_x, turret.spawn_y);
    enemy.gun = Some(Gun {
        angle: 0.0,
        has_fired: false,
    });
    enemy.timers.schedule(EnemyTimer::Settle, turret.settle_delay);
    Spawn {
        state: EnemyState::Spawning,
        flat_terrain: Some(turret.flat_terrain),
    }
}

fn gun_origin(enemy: &Enemy, config: &WorldConfig) -> Vec2 {
    enemy.position + Vec2::new(0.0, config.turret.gun_height)
}

fn update_turret(enemy: &mut Enemy, config: &WorldConfig, player: Vec2) -> bool {
    if enemy.state != EnemyState::Active {
        return false;
    }
    let origin = gun_origin(enemy, config);
    let in_range = enemy.position.distance(player) < config.turret.fire_range;
    let Some(gun) = enemy.gun.as_mut() else {
        return false;
    };
    if gun.has_fired {
        return false;
    }

    let to_player = player - origin;
    gun.angle = to_player.y.atan2(to_player.x);
    if in_range {
        gun.has_fired = true;
    }
    in_range
}

fn release_turret(enemy: &Enemy, config: &WorldConfig, player: Vec2) -> Option<Shot> {
    let origin = gun_origin(enemy, config);
    Some(Shot {
        origin,
        kind: config.turret.projectile,
        direction: (player - origin).try_normalize().unwrap_or(Vec2::NEG_X),
        velocity: config.turret.projectile_velocity,
    })
}

fn explode_turret(enemy: &mut Enemy, _config: &WorldConfig) {
    if let Some(gun) = enemy.gun.as_mut() {
        gun.has_fired = true;
    }
}

/// One pool per enemy kind, addressed by [`EnemyKind::index`].
#[derive(Debug)]
pub(crate) struct EnemyPools {
    pools: Vec<ObjectPool<Enemy>>,
}

impl EnemyPools {
    pub(crate) fn new(capacity: usize) -> Self {
        let pools = EnemyKind::ALL
            .iter()
            .map(|_| ObjectPool::build(capacity, |_| Enemy::parked()))
            .collect();
        Self { pools }
    }

    pub(crate) fn capacity(&self, kind: EnemyKind) -> usize {
        self.pools
            .get(kind.index())
            .map_or(0, |pool| pool.capacity())
    }

    pub(crate) fn pointer(&self, kind: EnemyKind) -> usize {
        self.pools.get(kind.index()).map_or(0, |pool| pool.pointer())
    }

    pub(crate) fn acquire(&mut self, kind: EnemyKind) -> Option<Acquisition> {
        self.pools.get_mut(kind.index())?.acquire()
    }

    /// Slot of the identified enemy, whether or not it is live.
    pub(crate) fn slot_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.pools
            .get_mut(id.kind().index())?
            .get_mut(id.slot() as usize)
            .map(|slot| slot.payload_mut())
    }

    pub(crate) fn live(&self, id: EnemyId) -> Option<&Enemy> {
        self.pools
            .get(id.kind().index())?
            .get(id.slot() as usize)
            .map(|slot| slot.payload())
            .filter(|enemy| enemy.state.is_live())
    }

    pub(crate) fn live_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.slot_mut(id).filter(|enemy| enemy.state.is_live())
    }

    /// Returns a live enemy to its pool.
    pub(crate) fn despawn(&mut self, id: EnemyId, out: &mut Vec<Event>) {
        let Some(pool) = self.pools.get_mut(id.kind().index()) else {
            return;
        };
        let _ = pool.deactivate(id.slot() as usize);
        let Some(enemy) = pool.get_mut(id.slot() as usize).map(|slot| slot.payload_mut()) else {
            return;
        };
        if !enemy.state.is_live() {
            return;
        }
        let from = enemy.state;
        enemy.state = EnemyState::Inactive;
        enemy.hurt = false;
        enemy.timers.clear();
        out.push(Event::EnemyStateChanged {
            enemy: id,
            from,
            to: EnemyState::Inactive,
        });
        out.push(Event::EnemyDespawned { enemy: id });
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = EnemyId> + '_ {
        EnemyKind::ALL
            .iter()
            .zip(self.pools.iter())
            .flat_map(|(kind, pool)| {
                pool.iter()
                    .filter(|slot| slot.payload().state.is_live())
                    .map(move |slot| EnemyId::new(*kind, slot.index() as u32))
            })
    }
}

/// Records a state transition, reporting it when the state actually changes.
pub(crate) fn transition(enemy: &mut Enemy, id: EnemyId, to: EnemyState, out: &mut Vec<Event>) {
    let from = std::mem::replace(&mut enemy.state, to);
    if from != to {
        out.push(Event::EnemyStateChanged {
            enemy: id,
            from,
            to,
        });
    }
}
