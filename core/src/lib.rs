#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Strafe simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that systems and presentation collaborators react to deterministically.
//! Collaborators outside the simulation (animation playback, score display,
//! scene loading) are only ever reached through events and answer through
//! commands, so no part of the simulation looks anything up by name.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

mod config;
pub mod pool;

pub use config::ConfigError;
pub use pool::{Acquisition, ObjectPool, PoolSlot};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one frame of the provided duration.
    Tick {
        /// Duration of simulated time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Moves the player ship to the provided position.
    MovePlayer {
        /// Desired player position in world units.
        position: Vec2,
    },
    /// Reclaims the next terrain tile from the pool and places it at the provided height.
    PlaceTerrainTile {
        /// Height of the tile surface in world units.
        height: f32,
        /// Horizontal placement of the reclaimed tile.
        placement: TilePlacement,
    },
    /// Activates the next pooled enemy of the provided kind.
    SpawnEnemy {
        /// Kind of enemy to activate.
        kind: EnemyKind,
    },
    /// Fires a pooled projectile.
    FireProjectile {
        /// Position of the firer; the projectile appears slightly ahead of it.
        origin: Vec2,
        /// Kind of projectile, which selects the pool and the owner class.
        kind: ProjectileKind,
        /// Direction of travel. Normalised by the world before use.
        direction: Vec2,
        /// Speed of travel in world units per second.
        velocity: f32,
    },
    /// Applies damage to an enemy.
    DamageEnemy {
        /// Enemy receiving the damage.
        enemy: EnemyId,
        /// Amount of health removed.
        amount: i32,
    },
    /// Reports that two entities started touching.
    Contact {
        /// First participant of the contact.
        first: EntityRef,
        /// Second participant of the contact.
        second: EntityRef,
    },
    /// Reports that an animation requested through [`Event::AnimationRequested`] finished.
    AnimationFinished {
        /// Enemy whose animation completed.
        enemy: EnemyId,
        /// Clip that completed.
        clip: AnimationClip,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the frame.
        dt: Duration,
    },
    /// Confirms that a terrain tile was (re)placed.
    TerrainTilePlaced {
        /// Identifier of the reclaimed tile.
        tile: TileId,
        /// Position of the tile surface.
        position: Vec2,
    },
    /// Confirms that a terrain tile scrolled past the left boundary.
    TerrainTileRetired {
        /// Identifier of the retired tile.
        tile: TileId,
    },
    /// Requests that the terrain generator keep the ground level for a while.
    FlatTerrainRequested {
        /// Duration of the flat stretch in seconds.
        duration: f32,
    },
    /// Confirms that a pooled enemy was activated.
    EnemySpawned {
        /// Identifier of the activated enemy.
        enemy: EnemyId,
        /// Position the enemy starts from.
        position: Vec2,
    },
    /// Reports that an enemy settled on the ground beneath it.
    EnemyGrounded {
        /// Identifier of the settled enemy.
        enemy: EnemyId,
        /// Position after settling.
        position: Vec2,
    },
    /// Reports that an enemy took damage.
    EnemyDamaged {
        /// Identifier of the damaged enemy.
        enemy: EnemyId,
        /// Amount of damage applied.
        amount: i32,
        /// Health remaining after the damage.
        remaining: i32,
    },
    /// Toggles the hurt overlay drawn on top of an enemy.
    HurtOverlayChanged {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Whether the overlay should be shown.
        visible: bool,
    },
    /// Reports a lifecycle transition of an enemy.
    EnemyStateChanged {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// State before the transition.
        from: EnemyState,
        /// State after the transition.
        to: EnemyState,
    },
    /// Reports that an enemy was returned to its pool.
    EnemyDespawned {
        /// Identifier of the deactivated enemy.
        enemy: EnemyId,
    },
    /// Asks the animation collaborator to play a clip on an enemy.
    AnimationRequested {
        /// Identifier of the animated enemy.
        enemy: EnemyId,
        /// Clip to play.
        clip: AnimationClip,
    },
    /// Reports score awarded for destroying an enemy.
    ScoreReported {
        /// Enemy that awarded the score.
        enemy: EnemyId,
        /// Score awarded.
        amount: u32,
        /// Position where the floating score should appear.
        position: Vec2,
        /// Running score total after this award.
        total: u64,
    },
    /// Confirms that a projectile was fired.
    ProjectileFired {
        /// Identifier of the pooled projectile.
        projectile: ProjectileId,
        /// Position the projectile starts from.
        position: Vec2,
        /// Normalised direction of travel.
        direction: Vec2,
        /// Speed of travel in world units per second.
        velocity: f32,
    },
    /// Reports that a projectile was deactivated.
    ProjectileRetired {
        /// Identifier of the deactivated projectile.
        projectile: ProjectileId,
    },
    /// Reports that the player took damage.
    PlayerDamaged {
        /// Amount of damage applied.
        amount: i32,
        /// Health remaining after the damage.
        remaining: i32,
    },
    /// Asks the scene collaborator to load a scene.
    SceneRequested {
        /// Scene to load.
        scene: Scene,
    },
    /// Reports that a contact could not be resolved and was ignored.
    ContactRejected {
        /// First participant of the rejected contact.
        first: EntityRef,
        /// Second participant of the rejected contact.
        second: EntityRef,
        /// Reason the contact was ignored.
        reason: ContactRejection,
    },
}

/// Kinds of enemies managed by the enemy pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Floating mine that drifts left and detonates on contact.
    Mine,
    /// Ground turret that fires a single aimed shot at the player.
    Turret,
}

impl EnemyKind {
    /// Every enemy kind in pool order.
    pub const ALL: [EnemyKind; 2] = [EnemyKind::Mine, EnemyKind::Turret];

    /// Dense index of the kind, used to address per-kind pools.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Mine => 0,
            Self::Turret => 1,
        }
    }
}

/// Lifecycle states of a pooled enemy.
///
/// The transient hurt flash is not a state of its own: it overlays whichever
/// state the enemy is in and is reported through [`Event::HurtOverlayChanged`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    /// Parked in the pool.
    Inactive,
    /// Activated but still settling into its final spawn position.
    Spawning,
    /// Moving and attacking normally.
    Active,
    /// Winding up an attack; released when the charge animation completes.
    Charging,
    /// Destroyed and playing its explosion; collision responses are disabled.
    Exploding,
}

impl EnemyState {
    /// Reports whether the enemy currently occupies its pool slot.
    #[must_use]
    pub const fn is_live(self) -> bool {
        !matches!(self, Self::Inactive)
    }
}

/// Kinds of pooled projectiles. Each kind owns a separate pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Bullet fired by the player's gun.
    PlayerBullet,
    /// Aimed shot fired by turrets.
    TurretBullet,
    /// Heavy turret shell that other projectiles cannot stop.
    TurretShell,
}

impl ProjectileKind {
    /// Every projectile kind in pool order.
    pub const ALL: [ProjectileKind; 3] = [
        ProjectileKind::PlayerBullet,
        ProjectileKind::TurretBullet,
        ProjectileKind::TurretShell,
    ];

    /// Dense index of the kind, used to address per-kind pools.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::PlayerBullet => 0,
            Self::TurretBullet => 1,
            Self::TurretShell => 2,
        }
    }

    /// Owner class that selects the collision response of this kind.
    #[must_use]
    pub const fn owner_class(self) -> OwnerClass {
        match self {
            Self::PlayerBullet => OwnerClass::PlayerProjectile,
            Self::TurretBullet => OwnerClass::EnemyProjectile,
            Self::TurretShell => OwnerClass::EnemyIndestructibleProjectile,
        }
    }
}

/// Collision response family of a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerClass {
    /// Fired by the player.
    PlayerProjectile,
    /// Fired by an enemy.
    EnemyProjectile,
    /// Fired by an enemy and immune to projectile-versus-projectile contacts.
    EnemyIndestructibleProjectile,
}

impl OwnerClass {
    /// Tag other entities observe when touching a projectile of this class.
    #[must_use]
    pub const fn tag(self) -> CollisionTag {
        match self {
            Self::PlayerProjectile => CollisionTag::PlayerProjectile,
            Self::EnemyProjectile | Self::EnemyIndestructibleProjectile => {
                CollisionTag::EnemyProjectile
            }
        }
    }
}

/// Tags carried by every collidable entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CollisionTag {
    /// The player ship.
    Player,
    /// A projectile fired by the player.
    PlayerProjectile,
    /// Any enemy.
    Enemy,
    /// A projectile fired by an enemy.
    EnemyProjectile,
    /// A ground tile.
    Terrain,
}

/// Identifier of a pooled enemy: its kind plus its slot within the kind's pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId {
    kind: EnemyKind,
    slot: u32,
}

impl EnemyId {
    /// Creates a new enemy identifier.
    #[must_use]
    pub const fn new(kind: EnemyKind, slot: u32) -> Self {
        Self { kind, slot }
    }

    /// Kind of the identified enemy.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Slot index inside the kind's pool.
    #[must_use]
    pub const fn slot(&self) -> u32 {
        self.slot
    }
}

/// Identifier of a pooled projectile: its kind plus its slot within the kind's pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId {
    kind: ProjectileKind,
    slot: u32,
}

impl ProjectileId {
    /// Creates a new projectile identifier.
    #[must_use]
    pub const fn new(kind: ProjectileKind, slot: u32) -> Self {
        Self { kind, slot }
    }

    /// Kind of the identified projectile.
    #[must_use]
    pub const fn kind(&self) -> ProjectileKind {
        self.kind
    }

    /// Slot index inside the kind's pool.
    #[must_use]
    pub const fn slot(&self) -> u32 {
        self.slot
    }
}

/// Identifier of a pooled terrain tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u32);

impl TileId {
    /// Creates a new tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Reference to any collidable entity in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityRef {
    /// The player ship.
    Player,
    /// A pooled enemy.
    Enemy(EnemyId),
    /// A pooled projectile.
    Projectile(ProjectileId),
    /// A pooled terrain tile.
    Terrain(TileId),
}

impl EntityRef {
    /// Collision tag carried by the referenced entity.
    #[must_use]
    pub const fn tag(self) -> CollisionTag {
        match self {
            Self::Player => CollisionTag::Player,
            Self::Enemy(_) => CollisionTag::Enemy,
            Self::Projectile(id) => id.kind().owner_class().tag(),
            Self::Terrain(_) => CollisionTag::Terrain,
        }
    }
}

/// Named animation clips the simulation asks collaborators to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnimationClip {
    /// Destruction animation; completion may return the enemy to its pool.
    Explode,
    /// Attack wind-up; completion releases the attack.
    Charge,
    /// Muzzle flash played when the attack is released.
    Fire,
}

/// Scenes the simulation may ask the scene collaborator to load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scene {
    /// Shown after the player ship is destroyed.
    LoseGame,
}

/// Horizontal placement of a reclaimed terrain tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TilePlacement {
    /// At the right-hand spawn edge, just outside the view.
    SpawnEdge,
    /// At a column counted from the left edge, used to populate the ground at start.
    Prefill {
        /// Zero-based column; the tile is centred at `index * tile_width`.
        index: u32,
    },
}

/// Reasons a contact may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactRejection {
    /// An entity touched itself.
    SelfContact,
    /// A participant is no longer active.
    StaleEntity,
    /// Neither participant has a response for the other's tag.
    UnhandledPairing,
}

/// Downward ground query used by enemies that sit on the terrain.
pub trait GroundProbe {
    /// Casts a ray straight down from `from` and returns the height of the first
    /// ground surface it meets, if any.
    fn ground_height(&self, from: Vec2) -> Option<f32>;
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Current position.
    pub position: Vec2,
    /// Remaining health.
    pub health: i32,
    /// Whether the ship is still flying.
    pub alive: bool,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Lifecycle state.
    pub state: EnemyState,
    /// Whether the hurt overlay is currently shown.
    pub hurt: bool,
    /// Remaining health.
    pub health: i32,
    /// Health restored on activation.
    pub max_health: i32,
    /// Leftward speed in world units per second.
    pub speed: f32,
    /// Score awarded when destroyed.
    pub score_on_death: u32,
    /// Whether terrain contact leaves the enemy unharmed.
    pub terrain_safe: bool,
    /// Current position.
    pub position: Vec2,
    /// Current collision radius.
    pub radius: f32,
    /// Rotation of the mounted gun in radians, for enemies that carry one.
    pub gun_angle: Option<f32>,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single active projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Current position.
    pub position: Vec2,
    /// Normalised direction of travel.
    pub direction: Vec2,
    /// Speed of travel in world units per second.
    pub velocity: f32,
    /// Whether the collider is armed; it stays off during the launch grace window.
    pub collider_enabled: bool,
}

/// Immutable representation of a single active terrain tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainTileSnapshot {
    /// Identifier of the tile.
    pub id: TileId,
    /// Centre of the tile's top surface.
    pub position: Vec2,
}

/// Shape of a collider in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColliderShape {
    /// Circle around a centre point.
    Circle {
        /// Centre of the circle.
        center: Vec2,
        /// Radius of the circle.
        radius: f32,
    },
    /// Axis-aligned rectangle.
    Rect {
        /// Lower-left corner.
        min: Vec2,
        /// Upper-right corner.
        max: Vec2,
    },
}

/// Collider of a single entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColliderSnapshot {
    /// Entity that owns the collider.
    pub entity: EntityRef,
    /// Shape of the collider.
    pub shape: ColliderShape,
}

/// Read-only snapshot of every armed collider in the world.
#[derive(Clone, Debug, Default)]
pub struct ColliderView {
    snapshots: Vec<ColliderSnapshot>,
}

impl ColliderView {
    /// Creates a new collider view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ColliderSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.entity);
        Self { snapshots }
    }

    /// Iterator over the captured colliders in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ColliderSnapshot> {
        self.snapshots.iter()
    }

    /// Number of colliders in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no colliders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projectile_tags_follow_owner_class() {
        let bullet = EntityRef::Projectile(ProjectileId::new(ProjectileKind::PlayerBullet, 3));
        let turret = EntityRef::Projectile(ProjectileId::new(ProjectileKind::TurretBullet, 0));
        let shell = EntityRef::Projectile(ProjectileId::new(ProjectileKind::TurretShell, 9));

        assert_eq!(bullet.tag(), CollisionTag::PlayerProjectile);
        assert_eq!(turret.tag(), CollisionTag::EnemyProjectile);
        assert_eq!(shell.tag(), CollisionTag::EnemyProjectile);
    }

    #[test]
    fn kind_indices_are_dense() {
        for (expected, kind) in EnemyKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), expected);
        }
        for (expected, kind) in ProjectileKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), expected);
        }
    }

    #[test]
    fn enemy_view_orders_by_identifier() {
        let snapshot = |kind, slot| EnemySnapshot {
            id: EnemyId::new(kind, slot),
            state: EnemyState::Active,
            hurt: false,
            health: 1,
            max_health: 1,
            speed: 0.0,
            score_on_death: 0,
            terrain_safe: false,
            position: Vec2::ZERO,
            radius: 1.0,
            gun_angle: None,
        };
        let view = EnemyView::from_snapshots(vec![
            snapshot(EnemyKind::Turret, 0),
            snapshot(EnemyKind::Mine, 4),
            snapshot(EnemyKind::Mine, 1),
        ]);

        let ids: Vec<EnemyId> = view.iter().map(|snapshot| snapshot.id).collect();
        assert_eq!(
            ids,
            vec![
                EnemyId::new(EnemyKind::Mine, 1),
                EnemyId::new(EnemyKind::Mine, 4),
                EnemyId::new(EnemyKind::Turret, 0),
            ]
        );
    }

    #[test]
    fn only_inactive_is_not_live() {
        assert!(!EnemyState::Inactive.is_live());
        assert!(EnemyState::Spawning.is_live());
        assert!(EnemyState::Exploding.is_live());
    }
}
