//! Tuning parameters consumed by the authoritative world.

use glam::Vec2;
use serde::Deserialize;
use strafe_core::{ConfigError, ProjectileKind};

/// Complete world configuration. Every section falls back to its defaults when omitted.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for the world's random stream (enemy spawn heights).
    pub seed: u64,
    /// Visible play area and off-screen culling.
    pub view: ViewConfig,
    /// Terrain tile pool and scrolling.
    pub terrain: TerrainLayout,
    /// Player ship tuning.
    pub player: PlayerConfig,
    /// Number of pooled instances per enemy kind.
    pub enemy_pool_size: usize,
    /// Seconds the hurt overlay stays visible after a non-lethal hit.
    pub hurt_overlay: f32,
    /// Mine tuning.
    pub mine: MineConfig,
    /// Turret tuning.
    pub turret: TurretConfig,
    /// Projectile pools and flight.
    pub projectiles: ProjectileConfig,
    /// Damage and contact rules.
    pub collision: CollisionConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_0f_57_4a_fe,
            view: ViewConfig::default(),
            terrain: TerrainLayout::default(),
            player: PlayerConfig::default(),
            enemy_pool_size: 16,
            hurt_overlay: 0.05,
            mine: MineConfig::default(),
            turret: TurretConfig::default(),
            projectiles: ProjectileConfig::default(),
            collision: CollisionConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Rejects configurations the world cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.view.validate()?;
        self.terrain.validate()?;
        self.player.validate()?;
        ConfigError::require_capacity("enemy_pool_size", self.enemy_pool_size)?;
        ConfigError::require_positive("hurt_overlay", self.hurt_overlay)?;
        self.mine.validate()?;
        self.turret.validate()?;
        self.projectiles.validate()?;
        self.collision.validate()
    }
}

/// Visible play area. Entities leaving it are culled.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Left edge of the view.
    pub min_x: f32,
    /// Right edge of the view.
    pub max_x: f32,
    /// Bottom edge of the view.
    pub min_y: f32,
    /// Top edge of the view.
    pub max_y: f32,
    /// Off-screen enemies are only returned to their pool once left of this line,
    /// so enemies waiting beyond the right edge survive.
    pub enemy_despawn_x: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            max_x: 500.0,
            min_y: -170.0,
            max_y: 110.0,
            enemy_despawn_x: 35.0,
        }
    }
}

impl ViewConfig {
    /// Reports whether `point` lies inside the view grown by `margin` on every side.
    #[must_use]
    pub fn contains(&self, point: Vec2, margin: f32) -> bool {
        point.x >= self.min_x - margin
            && point.x <= self.max_x + margin
            && point.y >= self.min_y - margin
            && point.y <= self.max_y + margin
    }

    fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_ordered("view.min_x", "view.max_x", self.min_x, self.max_x)?;
        ConfigError::require_ordered("view.min_y", "view.max_y", self.min_y, self.max_y)
    }
}

/// Terrain tile pool and scrolling.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerrainLayout {
    /// Number of pooled tiles.
    pub pool_size: usize,
    /// Width of a single tile.
    pub tile_width: f32,
    /// Depth of the solid part below a tile's surface.
    pub tile_depth: f32,
    /// X position new tiles appear at.
    pub spawn_x: f32,
    /// Tiles are retired once their centre passes left of this line.
    pub retire_x: f32,
    /// Leftward scroll speed in world units per second.
    pub scroll_speed: f32,
}

impl Default for TerrainLayout {
    fn default() -> Self {
        Self {
            pool_size: 128,
            tile_width: 4.5,
            tile_depth: 8.0,
            spawn_x: 550.0,
            retire_x: 0.0,
            scroll_speed: 54.0,
        }
    }
}

impl TerrainLayout {
    fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_capacity("terrain.pool_size", self.pool_size)?;
        ConfigError::require_positive("terrain.tile_width", self.tile_width)?;
        ConfigError::require_positive("terrain.tile_depth", self.tile_depth)?;
        ConfigError::require_positive("terrain.scroll_speed", self.scroll_speed)
    }
}

/// Player ship tuning.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Health at the start of a run.
    pub health: i32,
    /// Collision radius.
    pub radius: f32,
    /// Starting x position.
    pub start_x: f32,
    /// Starting y position.
    pub start_y: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            health: 3,
            radius: 6.0,
            start_x: 80.0,
            start_y: 0.0,
        }
    }
}

impl PlayerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("player.health", self.health as f32)?;
        ConfigError::require_positive("player.radius", self.radius)
    }
}

/// Mine tuning.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MineConfig {
    /// Health restored on activation.
    pub health: i32,
    /// Leftward speed.
    pub speed: f32,
    /// Score awarded when destroyed.
    pub score: u32,
    /// Collision radius while drifting.
    pub radius: f32,
    /// Collision radius while exploding.
    pub blast_radius: f32,
    /// X position mines appear at.
    pub spawn_x: f32,
    /// Lowest random spawn height.
    pub min_y: f32,
    /// Highest random spawn height.
    pub max_y: f32,
    /// Chance that a mine spawns level with the player instead of at a random height.
    pub player_align_chance: f32,
    /// Maximum vertical offset from the player when aligning.
    pub player_align_jitter: f32,
}

impl Default for MineConfig {
    fn default() -> Self {
        Self {
            health: 10,
            speed: 60.0,
            score: 100,
            radius: 6.0,
            blast_radius: 24.0,
            spawn_x: 510.0,
            min_y: -40.0,
            max_y: 90.0,
            player_align_chance: 0.5,
            player_align_jitter: 10.0,
        }
    }
}

impl MineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("mine.health", self.health as f32)?;
        ConfigError::require_positive("mine.speed", self.speed)?;
        ConfigError::require_positive("mine.radius", self.radius)?;
        ConfigError::require_positive("mine.blast_radius", self.blast_radius)?;
        ConfigError::require_ordered("mine.min_y", "mine.max_y", self.min_y, self.max_y)?;
        ConfigError::require_unit("mine.player_align_chance", self.player_align_chance)?;
        if self.player_align_jitter < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "mine.player_align_jitter",
                value: self.player_align_jitter,
            });
        }
        Ok(())
    }
}

/// Turret tuning.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TurretConfig {
    /// Health restored on activation.
    pub health: i32,
    /// Leftward speed; matches the terrain scroll so the turret stays on its tile.
    pub speed: f32,
    /// Score awarded when destroyed.
    pub score: u32,
    /// Collision radius.
    pub radius: f32,
    /// X position turrets appear at.
    pub spawn_x: f32,
    /// Height turrets drop from.
    pub spawn_y: f32,
    /// Seconds of flat terrain requested on activation.
    pub flat_terrain: f32,
    /// Seconds before the turret settles onto the ground below it.
    pub settle_delay: f32,
    /// Height above the ground surface the turret rests at.
    pub ground_offset: f32,
    /// Player distance that triggers the attack.
    pub fire_range: f32,
    /// Projectile kind fired by the attack.
    pub projectile: ProjectileKind,
    /// Speed of the fired projectile.
    pub projectile_velocity: f32,
    /// Height of the gun above the turret body.
    pub gun_height: f32,
}

impl Default for TurretConfig {
    fn default() -> Self {
        Self {
            health: 10,
            speed: 54.0,
            score: 1000,
            radius: 6.0,
            spawn_x: 577.0,
            spawn_y: 60.0,
            flat_terrain: 1.0,
            settle_delay: 1.0,
            ground_offset: 5.0,
            fire_range: 100.0,
            projectile: ProjectileKind::TurretBullet,
            projectile_velocity: 150.0,
            gun_height: 3.0,
        }
    }
}

impl TurretConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("turret.health", self.health as f32)?;
        ConfigError::require_positive("turret.speed", self.speed)?;
        ConfigError::require_positive("turret.radius", self.radius)?;
        ConfigError::require_positive("turret.flat_terrain", self.flat_terrain)?;
        ConfigError::require_positive("turret.settle_delay", self.settle_delay)?;
        ConfigError::require_positive("turret.fire_range", self.fire_range)?;
        ConfigError::require_positive("turret.projectile_velocity", self.projectile_velocity)
    }
}

/// Projectile pools and flight.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Pool size for player bullets.
    pub player_bullets: usize,
    /// Pool size for turret bullets.
    pub turret_bullets: usize,
    /// Pool size for turret shells.
    pub turret_shells: usize,
    /// Collision radius of every projectile.
    pub radius: f32,
    /// Distance ahead of the firer, along the direction of travel, a projectile appears at.
    pub muzzle_offset: f32,
    /// Seconds a fresh projectile's collider stays disarmed.
    pub collider_grace: f32,
    /// Distance beyond the view a projectile may travel before it is retired.
    pub view_margin: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            player_bullets: 64,
            turret_bullets: 32,
            turret_shells: 16,
            radius: 2.0,
            muzzle_offset: 0.25,
            collider_grace: 0.1,
            view_margin: 8.0,
        }
    }
}

impl ProjectileConfig {
    /// Pool size for the provided projectile kind.
    #[must_use]
    pub const fn pool_size(&self, kind: ProjectileKind) -> usize {
        match kind {
            ProjectileKind::PlayerBullet => self.player_bullets,
            ProjectileKind::TurretBullet => self.turret_bullets,
            ProjectileKind::TurretShell => self.turret_shells,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_capacity("projectiles.player_bullets", self.player_bullets)?;
        ConfigError::require_capacity("projectiles.turret_bullets", self.turret_bullets)?;
        ConfigError::require_capacity("projectiles.turret_shells", self.turret_shells)?;
        ConfigError::require_positive("projectiles.radius", self.radius)?;
        ConfigError::require_positive("projectiles.collider_grace", self.collider_grace)
    }
}

/// Damage and contact rules.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Enemies only explode on mutual contact while their x lies strictly inside
    /// `(center_window_min, center_window_max)`.
    pub center_window_min: f32,
    /// Upper bound of the mutual-contact window.
    pub center_window_max: f32,
    /// Damage dealt by player projectiles and by touching the player.
    pub unit_damage: i32,
    /// Damage dealt by enemy projectiles to enemies.
    pub lethal_damage: i32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            center_window_min: -50.0,
            center_window_max: 350.0,
            unit_damage: 1,
            lethal_damage: i32::MAX,
        }
    }
}

impl CollisionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_ordered(
            "collision.center_window_min",
            "collision.center_window_max",
            self.center_window_min,
            self.center_window_max,
        )?;
        ConfigError::require_positive("collision.unit_damage", self.unit_damage as f32)?;
        ConfigError::require_positive("collision.lethal_damage", self.lethal_damage as f32)
    }
}
