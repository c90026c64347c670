#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Strafe.
//!
//! The world owns every pooled entity (terrain tiles, enemies, projectiles) and
//! the player ship. It mutates only through [`apply`], reports every change as
//! an [`Event`], and exposes read-only state through [`query`].

pub mod collision;
pub mod config;
mod enemies;
mod projectiles;
mod terrain;
mod timers;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use strafe_core::{
    AnimationClip, Command, ConfigError, ContactRejection, EnemyId, EnemyKind, EnemyState,
    EntityRef, Event, GroundProbe, OwnerClass, ProjectileId, Scene,
};
use tracing::{debug, info, trace, warn};

use collision::{CenterWindow, DamageAmount, EnemyReaction, ProjectileEffect, ProjectileReaction};
pub use config::WorldConfig;
use enemies::{AfterExplosion, EnemyPools, EnemyTimer};
use projectiles::ProjectilePools;
use terrain::TerrainField;

#[derive(Clone, Copy, Debug)]
struct Player {
    position: Vec2,
    health: i32,
    radius: f32,
    alive: bool,
}

/// Represents the authoritative Strafe world state.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    rng: ChaCha8Rng,
    player: Player,
    enemies: EnemyPools,
    projectiles: ProjectilePools,
    terrain: TerrainField,
    score_total: u64,
    tick_index: u64,
}

impl World {
    /// Creates a new world using the default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::build(WorldConfig::default())
    }

    /// Creates a new world using the provided tuning.
    pub fn with_config(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: WorldConfig) -> Self {
        let player = Player {
            position: Vec2::new(config.player.start_x, config.player.start_y),
            health: config.player.health,
            radius: config.player.radius,
            alive: true,
        };
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            player,
            enemies: EnemyPools::new(config.enemy_pool_size),
            projectiles: ProjectilePools::new(config.projectiles.clone()),
            terrain: TerrainField::new(config.terrain.clone()),
            score_total: 0,
            tick_index: 0,
            config,
        }
    }

    fn advance(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        self.advance_enemies(dt, out_events);
        self.projectiles.advance(dt, &self.config.view, out_events);
        self.terrain.advance(dt, out_events);
    }

    fn advance_enemies(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        let player = self.player.position;
        let mut fired = Vec::new();
        let mut departed = Vec::new();
        for kind in EnemyKind::ALL {
            let behavior = enemies::behavior(kind);
            let stats = (behavior.stats)(&self.config);
            for slot in 0..self.enemies.capacity(kind) {
                let id = EnemyId::new(kind, slot as u32);
                let Some(enemy) = self.enemies.live_mut(id) else {
                    continue;
                };

                fired.clear();
                enemy.timers.tick(dt, &mut fired);
                for action in fired.drain(..) {
                    match action {
                        EnemyTimer::ClearHurt => {
                            if std::mem::replace(&mut enemy.hurt, false) {
                                out_events.push(Event::HurtOverlayChanged {
                                    enemy: id,
                                    visible: false,
                                });
                            }
                        }
                        EnemyTimer::Settle => {
                            if enemy.state != EnemyState::Spawning {
                                continue;
                            }
                            match self.terrain.ground_height(enemy.position) {
                                Some(ground) => {
                                    enemy.position.y = ground + stats.ground_offset;
                                    out_events.push(Event::EnemyGrounded {
                                        enemy: id,
                                        position: enemy.position,
                                    });
                                }
                                None => warn!(?id, "no ground below enemy; settling in place"),
                            }
                            enemies::transition(enemy, id, EnemyState::Active, out_events);
                        }
                    }
                }

                enemy.position.x -= stats.speed * dt;

                if (behavior.update)(enemy, &self.config, player) {
                    enemies::transition(enemy, id, EnemyState::Charging, out_events);
                    out_events.push(Event::AnimationRequested {
                        enemy: id,
                        clip: AnimationClip::Charge,
                    });
                }

                let view = &self.config.view;
                if !view.contains(enemy.position, enemy.radius)
                    && enemy.position.x < view.enemy_despawn_x
                {
                    departed.push(id);
                }
            }
        }

        for id in departed {
            trace!(?id, "enemy left the view");
            self.enemies.despawn(id, out_events);
        }
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, out_events: &mut Vec<Event>) {
        let Some(acquired) = self.enemies.acquire(kind) else {
            return;
        };
        let id = EnemyId::new(kind, acquired.index as u32);
        if acquired.evicted_live {
            debug!(?id, "enemy pool exhausted; recycling a live enemy");
        }
        let behavior = enemies::behavior(kind);
        let stats = (behavior.stats)(&self.config);
        let player = self.player.position;
        let Some(enemy) = self.enemies.slot_mut(id) else {
            return;
        };

        enemy.health = stats.max_health;
        enemy.radius = stats.radius;
        enemy.hurt = false;
        enemy.wrecked = false;
        enemy.timers.clear();
        let spawn = (behavior.activate)(enemy, &self.config, &mut self.rng, player);

        out_events.push(Event::EnemySpawned {
            enemy: id,
            position: enemy.position,
        });
        enemies::transition(enemy, id, spawn.state, out_events);
        if let Some(duration) = spawn.flat_terrain {
            out_events.push(Event::FlatTerrainRequested { duration });
        }
    }

    fn damage_enemy(&mut self, id: EnemyId, amount: i32, out_events: &mut Vec<Event>) {
        let hurt_overlay = self.config.hurt_overlay;
        let Some(enemy) = self.enemies.live_mut(id) else {
            trace!(?id, "damage for inactive enemy ignored");
            return;
        };
        if enemy.state == EnemyState::Exploding {
            return;
        }

        enemy.health = enemy.health.saturating_sub(amount);
        out_events.push(Event::EnemyDamaged {
            enemy: id,
            amount,
            remaining: enemy.health,
        });
        if enemy.health > 0 {
            enemy.timers.cancel(EnemyTimer::ClearHurt);
            enemy.timers.schedule(EnemyTimer::ClearHurt, hurt_overlay);
            if !std::mem::replace(&mut enemy.hurt, true) {
                out_events.push(Event::HurtOverlayChanged {
                    enemy: id,
                    visible: true,
                });
            }
            return;
        }

        self.explode_enemy(id, out_events);
    }

    fn explode_enemy(&mut self, id: EnemyId, out_events: &mut Vec<Event>) {
        let behavior = enemies::behavior(id.kind());
        let stats = (behavior.stats)(&self.config);
        let Some(enemy) = self.enemies.live_mut(id) else {
            return;
        };
        if enemy.state == EnemyState::Exploding {
            return;
        }

        (behavior.explode)(enemy, &self.config);
        enemy.timers.clear();
        if std::mem::replace(&mut enemy.hurt, false) {
            out_events.push(Event::HurtOverlayChanged {
                enemy: id,
                visible: false,
            });
        }
        enemies::transition(enemy, id, EnemyState::Exploding, out_events);

        self.score_total = self.score_total.saturating_add(u64::from(stats.score));
        debug!(?id, score = stats.score, total = self.score_total, "enemy destroyed");
        out_events.push(Event::ScoreReported {
            enemy: id,
            amount: stats.score,
            position: enemy.position,
            total: self.score_total,
        });
        out_events.push(Event::AnimationRequested {
            enemy: id,
            clip: AnimationClip::Explode,
        });
    }

    fn finish_animation(&mut self, id: EnemyId, clip: AnimationClip, out_events: &mut Vec<Event>) {
        let behavior = enemies::behavior(id.kind());
        let player = self.player.position;
        let Some(enemy) = self.enemies.live_mut(id) else {
            trace!(?id, ?clip, "animation finished on inactive enemy");
            return;
        };

        match clip {
            AnimationClip::Charge => {
                if enemy.state != EnemyState::Charging {
                    return;
                }
                let shot = (behavior.release)(enemy, &self.config, player);
                enemies::transition(enemy, id, EnemyState::Active, out_events);
                out_events.push(Event::AnimationRequested {
                    enemy: id,
                    clip: AnimationClip::Fire,
                });
                if let Some(shot) = shot {
                    self.projectiles.fire(
                        shot.origin,
                        shot.kind,
                        shot.direction,
                        shot.velocity,
                        out_events,
                    );
                }
            }
            AnimationClip::Explode => {
                if enemy.state != EnemyState::Exploding {
                    return;
                }
                match behavior.after_explosion {
                    AfterExplosion::Deactivate => self.enemies.despawn(id, out_events),
                    AfterExplosion::PersistWreck => {
                        enemy.wrecked = true;
                        debug!(?id, "wreck left behind");
                    }
                }
            }
            AnimationClip::Fire => {}
        }
    }

    fn damage_player(&mut self, amount: i32, out_events: &mut Vec<Event>) {
        if !self.player.alive {
            return;
        }
        self.player.health = self.player.health.saturating_sub(amount);
        out_events.push(Event::PlayerDamaged {
            amount,
            remaining: self.player.health,
        });
        if self.player.health <= 0 {
            self.player.alive = false;
            info!(score = self.score_total, "player destroyed");
            out_events.push(Event::SceneRequested {
                scene: Scene::LoseGame,
            });
        }
    }

    fn participant(&self, entity: EntityRef) -> Option<Participant> {
        match entity {
            EntityRef::Player => self.player.alive.then_some(Participant::Player),
            EntityRef::Enemy(id) => {
                let enemy = self.enemies.live(id).filter(|enemy| !enemy.wrecked)?;
                let stats = (enemies::behavior(id.kind()).stats)(&self.config);
                Some(Participant::Enemy {
                    id,
                    exploding: enemy.state == EnemyState::Exploding,
                    terrain_safe: stats.terrain_safe,
                    x: enemy.position.x,
                })
            }
            EntityRef::Projectile(id) => {
                let projectile = self.projectiles.active(id)?;
                projectile.collider_enabled().then_some(Participant::Projectile {
                    id,
                    owner: id.kind().owner_class(),
                })
            }
            EntityRef::Terrain(tile) => self
                .terrain
                .is_active(tile)
                .then_some(Participant::Terrain),
        }
    }

    fn reaction(
        &self,
        participant: Participant,
        other: Participant,
        other_ref: EntityRef,
    ) -> Reaction {
        let other_tag = other_ref.tag();
        match participant {
            Participant::Player => match other {
                Participant::Enemy { exploding: true, .. } => Reaction::None,
                _ if collision::player_hurt_by(other_tag) => Reaction::PlayerHurt,
                _ => Reaction::None,
            },
            Participant::Enemy { exploding: true, .. } | Participant::Terrain => Reaction::None,
            Participant::Enemy {
                id,
                terrain_safe,
                x,
                ..
            } => {
                let window = CenterWindow {
                    min: self.config.collision.center_window_min,
                    max: self.config.collision.center_window_max,
                };
                Reaction::Enemy {
                    id,
                    reaction: collision::enemy_reaction(other_tag, terrain_safe, x, window),
                }
            }
            Participant::Projectile { id, owner } => Reaction::Projectile {
                id,
                reaction: collision::projectile_reaction(owner, other_tag),
            },
        }
    }

    fn resolve_contact(&mut self, first: EntityRef, second: EntityRef, out_events: &mut Vec<Event>) {
        let outcome = if first == second {
            Err(ContactRejection::SelfContact)
        } else {
            match (self.participant(first), self.participant(second)) {
                (Some(Participant::Terrain), Some(Participant::Terrain)) => {
                    Err(ContactRejection::UnhandledPairing)
                }
                (Some(a), Some(b)) => Ok((a, b)),
                _ => Err(ContactRejection::StaleEntity),
            }
        };

        let (a, b) = match outcome {
            Ok(participants) => participants,
            Err(reason) => {
                warn!(?first, ?second, ?reason, "contact rejected");
                out_events.push(Event::ContactRejected {
                    first,
                    second,
                    reason,
                });
                return;
            }
        };

        let first_reaction = self.reaction(a, b, second);
        let second_reaction = self.reaction(b, a, first);
        self.react(first_reaction, second, out_events);
        self.react(second_reaction, first, out_events);
    }

    fn react(&mut self, reaction: Reaction, other: EntityRef, out_events: &mut Vec<Event>) {
        let unit = self.config.collision.unit_damage;
        match reaction {
            Reaction::None => {}
            Reaction::PlayerHurt => self.damage_player(unit, out_events),
            Reaction::Enemy { id, reaction } => match reaction {
                EnemyReaction::Ignore => {}
                EnemyReaction::Explode => self.explode_enemy(id, out_events),
                EnemyReaction::ExplodeBoth => {
                    self.explode_enemy(id, out_events);
                    if let EntityRef::Enemy(other) = other {
                        self.explode_enemy(other, out_events);
                    }
                }
            },
            Reaction::Projectile { id, reaction } => {
                match (reaction.effect, other) {
                    (ProjectileEffect::DamagePlayer, EntityRef::Player) => {
                        self.damage_player(unit, out_events);
                    }
                    (ProjectileEffect::DamageEnemy(amount), EntityRef::Enemy(enemy)) => {
                        let amount = match amount {
                            DamageAmount::Unit => unit,
                            DamageAmount::Lethal => self.config.collision.lethal_damage,
                        };
                        self.damage_enemy(enemy, amount, out_events);
                    }
                    (ProjectileEffect::RetireOther, EntityRef::Projectile(target)) => {
                        if collision::retired_by_projectiles(target.kind().owner_class()) {
                            let _ = self.projectiles.retire(target, out_events);
                        }
                    }
                    _ => {}
                }
                if reaction.retire_self {
                    let _ = self.projectiles.retire(id, out_events);
                }
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl GroundProbe for World {
    fn ground_height(&self, from: Vec2) -> Option<f32> {
        self.terrain.ground_height(from)
    }
}

/// State of a contact participant captured before any reaction is applied.
#[derive(Clone, Copy, Debug)]
enum Participant {
    Player,
    Enemy {
        id: EnemyId,
        exploding: bool,
        terrain_safe: bool,
        x: f32,
    },
    Projectile {
        id: ProjectileId,
        owner: OwnerClass,
    },
    Terrain,
}

#[derive(Clone, Copy, Debug)]
enum Reaction {
    None,
    PlayerHurt,
    Enemy {
        id: EnemyId,
        reaction: EnemyReaction,
    },
    Projectile {
        id: ProjectileId,
        reaction: ProjectileReaction,
    },
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.advance(dt.as_secs_f32(), out_events);
        }
        Command::MovePlayer { position } => {
            if world.player.alive {
                world.player.position = position;
            }
        }
        Command::PlaceTerrainTile { height, placement } => {
            world.terrain.place(height, placement, out_events);
        }
        Command::SpawnEnemy { kind } => world.spawn_enemy(kind, out_events),
        Command::FireProjectile {
            origin,
            kind,
            direction,
            velocity,
        } => world
            .projectiles
            .fire(origin, kind, direction, velocity, out_events),
        Command::DamageEnemy { enemy, amount } => world.damage_enemy(enemy, amount, out_events),
        Command::Contact { first, second } => world.resolve_contact(first, second, out_events),
        Command::AnimationFinished { enemy, clip } => {
            world.finish_animation(enemy, clip, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use strafe_core::{
        ColliderShape, ColliderSnapshot, ColliderView, EnemyId, EnemyKind, EnemySnapshot,
        EnemyView, EntityRef, PlayerSnapshot, ProjectileKind, ProjectileSnapshot,
        TerrainTileSnapshot,
    };

    use super::{enemies, World, WorldConfig};

    /// Provides read-only access to the configuration the world runs with.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Running score total.
    #[must_use]
    pub fn score_total(world: &World) -> u64 {
        world.score_total
    }

    /// Captures the player ship.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            health: world.player.health,
            alive: world.player.alive,
        }
    }

    /// Captures a single enemy if it is live.
    #[must_use]
    pub fn enemy(world: &World, id: EnemyId) -> Option<EnemySnapshot> {
        let enemy = world.enemies.live(id)?;
        let stats = (enemies::behavior(id.kind()).stats)(&world.config);
        Some(EnemySnapshot {
            id,
            state: enemy.state,
            hurt: enemy.hurt,
            health: enemy.health,
            max_health: stats.max_health,
            speed: stats.speed,
            score_on_death: stats.score,
            terrain_safe: stats.terrain_safe,
            position: enemy.position,
            radius: enemy.radius,
            gun_angle: enemy.gun.map(|gun| gun.angle),
        })
    }

    /// Captures a read-only view of every live enemy.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots = world
            .enemies
            .ids()
            .filter_map(|id| enemy(world, id))
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Slot the next spawn of `kind` will reuse.
    #[must_use]
    pub fn enemy_pool_pointer(world: &World, kind: EnemyKind) -> usize {
        world.enemies.pointer(kind)
    }

    /// Slot the next projectile of `kind` will reuse.
    #[must_use]
    pub fn projectile_pool_pointer(world: &World, kind: ProjectileKind) -> usize {
        world.projectiles.pointer(kind)
    }

    /// Captures every projectile in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world.projectiles.snapshots().collect()
    }

    /// Captures every active terrain tile in slot order.
    #[must_use]
    pub fn terrain_tiles(world: &World) -> Vec<TerrainTileSnapshot> {
        world.terrain.snapshots().collect()
    }

    /// Number of pooled terrain tiles.
    #[must_use]
    pub fn terrain_capacity(world: &World) -> usize {
        world.terrain.capacity()
    }

    /// Captures every armed collider.
    #[must_use]
    pub fn colliders(world: &World) -> ColliderView {
        let mut snapshots = Vec::new();
        if world.player.alive {
            snapshots.push(ColliderSnapshot {
                entity: EntityRef::Player,
                shape: circle(world.player.position, world.player.radius),
            });
        }
        for id in world.enemies.ids() {
            if let Some(enemy) = world.enemies.live(id).filter(|enemy| !enemy.wrecked) {
                snapshots.push(ColliderSnapshot {
                    entity: EntityRef::Enemy(id),
                    shape: circle(enemy.position, enemy.radius),
                });
            }
        }
        let radius = world.projectiles.radius();
        for projectile in world.projectiles.snapshots() {
            if projectile.collider_enabled {
                snapshots.push(ColliderSnapshot {
                    entity: EntityRef::Projectile(projectile.id),
                    shape: circle(projectile.position, radius),
                });
            }
        }
        for tile in world.terrain.snapshots() {
            snapshots.push(ColliderSnapshot {
                entity: EntityRef::Terrain(tile.id),
                shape: world.terrain.collider(tile.position),
            });
        }
        ColliderView::from_snapshots(snapshots)
    }

    fn circle(center: Vec2, radius: f32) -> ColliderShape {
        ColliderShape::Circle { center, radius }
    }
}
