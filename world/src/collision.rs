//! Tag-based contact rules.
//!
//! Each participant of a contact reacts to the other participant's tag. The
//! functions here only decide the reaction; the world applies it.

use strafe_core::{CollisionTag, OwnerClass};

/// Effect a projectile has on the entity it touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileEffect {
    /// Leaves the other entity alone.
    None,
    /// Damages the player by one unit.
    DamagePlayer,
    /// Damages the enemy.
    DamageEnemy(DamageAmount),
    /// Deactivates the other projectile.
    RetireOther,
}

/// Damage dealt to an enemy by a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageAmount {
    /// A single unit; player fire chips enemies down.
    Unit,
    /// Enough to destroy any enemy outright.
    Lethal,
}

/// Full reaction of a projectile to a contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectileReaction {
    /// Whether the projectile deactivates itself.
    pub retire_self: bool,
    /// What happens to the other participant.
    pub effect: ProjectileEffect,
}

impl ProjectileReaction {
    const IGNORE: Self = Self {
        retire_self: false,
        effect: ProjectileEffect::None,
    };

    const fn retire(effect: ProjectileEffect) -> Self {
        Self {
            retire_self: true,
            effect,
        }
    }
}

/// Reaction of a projectile of class `owner` touching an entity tagged `other`.
#[must_use]
pub const fn projectile_reaction(owner: OwnerClass, other: CollisionTag) -> ProjectileReaction {
    match owner {
        OwnerClass::PlayerProjectile => match other {
            CollisionTag::Player | CollisionTag::PlayerProjectile => ProjectileReaction::IGNORE,
            CollisionTag::Enemy => {
                ProjectileReaction::retire(ProjectileEffect::DamageEnemy(DamageAmount::Unit))
            }
            CollisionTag::EnemyProjectile => {
                ProjectileReaction::retire(ProjectileEffect::RetireOther)
            }
            CollisionTag::Terrain => ProjectileReaction::retire(ProjectileEffect::None),
        },
        OwnerClass::EnemyProjectile => enemy_projectile_reaction(other),
        OwnerClass::EnemyIndestructibleProjectile => match other {
            CollisionTag::PlayerProjectile | CollisionTag::EnemyProjectile => ProjectileReaction {
                retire_self: false,
                effect: ProjectileEffect::RetireOther,
            },
            _ => enemy_projectile_reaction(other),
        },
    }
}

const fn enemy_projectile_reaction(other: CollisionTag) -> ProjectileReaction {
    match other {
        CollisionTag::Player => ProjectileReaction::retire(ProjectileEffect::DamagePlayer),
        CollisionTag::PlayerProjectile | CollisionTag::EnemyProjectile => {
            ProjectileReaction::retire(ProjectileEffect::RetireOther)
        }
        CollisionTag::Enemy => {
            ProjectileReaction::retire(ProjectileEffect::DamageEnemy(DamageAmount::Lethal))
        }
        CollisionTag::Terrain => ProjectileReaction::retire(ProjectileEffect::None),
    }
}

/// Whether a projectile of class `owner` can be deactivated by another projectile.
#[must_use]
pub const fn retired_by_projectiles(owner: OwnerClass) -> bool {
    !matches!(owner, OwnerClass::EnemyIndestructibleProjectile)
}

/// Reaction of a non-exploding enemy to a contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyReaction {
    /// Nothing happens.
    Ignore,
    /// The enemy explodes.
    Explode,
    /// The enemy and the enemy it touched both explode.
    ExplodeBoth,
}

/// Horizontal band inside which enemies destroy each other on contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CenterWindow {
    /// Exclusive lower bound.
    pub min: f32,
    /// Exclusive upper bound.
    pub max: f32,
}

impl CenterWindow {
    /// Reports whether `x` lies strictly inside the window.
    #[must_use]
    pub fn contains(&self, x: f32) -> bool {
        x > self.min && x < self.max
    }
}

/// Reaction of an enemy at horizontal position `x` touching an entity tagged `other`.
///
/// Projectiles are handled from the projectile's side, so enemies ignore them here.
#[must_use]
pub fn enemy_reaction(
    other: CollisionTag,
    terrain_safe: bool,
    x: f32,
    window: CenterWindow,
) -> EnemyReaction {
    match other {
        CollisionTag::Player => EnemyReaction::Explode,
        CollisionTag::Terrain if terrain_safe => EnemyReaction::Ignore,
        CollisionTag::Terrain => EnemyReaction::Explode,
        CollisionTag::Enemy if window.contains(x) => EnemyReaction::ExplodeBoth,
        CollisionTag::Enemy => EnemyReaction::Ignore,
        CollisionTag::PlayerProjectile | CollisionTag::EnemyProjectile => EnemyReaction::Ignore,
    }
}

/// Whether the player takes a unit of damage from touching an entity tagged `other`.
///
/// Enemy projectiles damage the player from their own side of the contact.
#[must_use]
pub const fn player_hurt_by(other: CollisionTag) -> bool {
    matches!(other, CollisionTag::Enemy)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: CenterWindow = CenterWindow {
        min: -50.0,
        max: 350.0,
    };

    #[test]
    fn player_bullets_chip_enemies() {
        let reaction = projectile_reaction(OwnerClass::PlayerProjectile, CollisionTag::Enemy);

        assert!(reaction.retire_self);
        assert_eq!(
            reaction.effect,
            ProjectileEffect::DamageEnemy(DamageAmount::Unit)
        );
    }

    #[test]
    fn player_bullets_pass_through_friendly_entities() {
        for other in [CollisionTag::Player, CollisionTag::PlayerProjectile] {
            let reaction = projectile_reaction(OwnerClass::PlayerProjectile, other);
            assert_eq!(reaction, ProjectileReaction::IGNORE);
        }
    }

    #[test]
    fn enemy_projectiles_destroy_enemies_outright() {
        let reaction = projectile_reaction(OwnerClass::EnemyProjectile, CollisionTag::Enemy);

        assert!(reaction.retire_self);
        assert_eq!(
            reaction.effect,
            ProjectileEffect::DamageEnemy(DamageAmount::Lethal)
        );
    }

    #[test]
    fn enemy_projectiles_stop_on_terrain_and_player() {
        let terrain = projectile_reaction(OwnerClass::EnemyProjectile, CollisionTag::Terrain);
        let player = projectile_reaction(OwnerClass::EnemyProjectile, CollisionTag::Player);

        assert!(terrain.retire_self);
        assert_eq!(terrain.effect, ProjectileEffect::None);
        assert!(player.retire_self);
        assert_eq!(player.effect, ProjectileEffect::DamagePlayer);
    }

    #[test]
    fn indestructible_projectiles_survive_projectile_contacts() {
        let reaction = projectile_reaction(
            OwnerClass::EnemyIndestructibleProjectile,
            CollisionTag::PlayerProjectile,
        );

        assert!(!reaction.retire_self);
        assert_eq!(reaction.effect, ProjectileEffect::RetireOther);
        assert!(!retired_by_projectiles(
            OwnerClass::EnemyIndestructibleProjectile
        ));
        assert!(retired_by_projectiles(OwnerClass::EnemyProjectile));
    }

    #[test]
    fn terrain_spares_terrain_safe_enemies() {
        assert_eq!(
            enemy_reaction(CollisionTag::Terrain, true, 100.0, WINDOW),
            EnemyReaction::Ignore
        );
        assert_eq!(
            enemy_reaction(CollisionTag::Terrain, false, 100.0, WINDOW),
            EnemyReaction::Explode
        );
    }

    #[test]
    fn enemies_only_collide_inside_center_window() {
        assert_eq!(
            enemy_reaction(CollisionTag::Enemy, false, 100.0, WINDOW),
            EnemyReaction::ExplodeBoth
        );
        assert_eq!(
            enemy_reaction(CollisionTag::Enemy, false, 400.0, WINDOW),
            EnemyReaction::Ignore
        );
        assert_eq!(
            enemy_reaction(CollisionTag::Enemy, false, 350.0, WINDOW),
            EnemyReaction::Ignore
        );
    }

    #[test]
    fn only_enemy_bodies_hurt_the_player_directly() {
        assert!(player_hurt_by(CollisionTag::Enemy));
        assert!(!player_hurt_by(CollisionTag::EnemyProjectile));
        assert!(!player_hurt_by(CollisionTag::Terrain));
    }
}
