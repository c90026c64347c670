use glam::Vec2;
use strafe_core::{Event, ObjectPool, ProjectileId, ProjectileKind, ProjectileSnapshot};
use tracing::debug;

use crate::{
    config::{ProjectileConfig, ViewConfig},
    timers::Timers,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProjectileTimer {
    ArmCollider,
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    position: Vec2,
    direction: Vec2,
    velocity: f32,
    collider_enabled: bool,
    timers: Timers<ProjectileTimer>,
}

impl Projectile {
    fn parked() -> Self {
        Self {
            position: Vec2::ZERO,
            direction: Vec2::X,
            velocity: 0.0,
            collider_enabled: false,
            timers: Timers::default(),
        }
    }

    pub(crate) fn collider_enabled(&self) -> bool {
        self.collider_enabled
    }
}

/// One pool per projectile kind, addressed by [`ProjectileKind::index`].
#[derive(Debug)]
pub(crate) struct ProjectilePools {
    config: ProjectileConfig,
    pools: Vec<ObjectPool<Projectile>>,
}

impl ProjectilePools {
    pub(crate) fn new(config: ProjectileConfig) -> Self {
        let pools = ProjectileKind::ALL
            .iter()
            .map(|kind| ObjectPool::build(config.pool_size(*kind), |_| Projectile::parked()))
            .collect();
        Self { config, pools }
    }

    pub(crate) fn radius(&self) -> f32 {
        self.config.radius
    }

    /// Reuses the next projectile of `kind`, launching it from just ahead of `origin`.
    pub(crate) fn fire(
        &mut self,
        origin: Vec2,
        kind: ProjectileKind,
        direction: Vec2,
        velocity: f32,
        out: &mut Vec<Event>,
    ) {
        let Some(pool) = self.pools.get_mut(kind.index()) else {
            return;
        };
        let Some(acquired) = pool.acquire() else {
            return;
        };
        let id = ProjectileId::new(kind, acquired.index as u32);
        if acquired.evicted_live {
            debug!(?id, "projectile pool exhausted; recycling a projectile in flight");
        }

        let direction = direction.try_normalize().unwrap_or(Vec2::X);
        let position = origin + direction * self.config.muzzle_offset;
        let Some(slot) = pool.get_mut(acquired.index) else {
            return;
        };
        let projectile = slot.payload_mut();
        projectile.position = position;
        projectile.direction = direction;
        projectile.velocity = velocity;
        projectile.collider_enabled = false;
        projectile.timers.clear();
        projectile
            .timers
            .schedule(ProjectileTimer::ArmCollider, self.config.collider_grace);

        out.push(Event::ProjectileFired {
            projectile: id,
            position,
            direction,
            velocity,
        });
    }

    /// Moves every projectile in flight and retires those that left the view.
    pub(crate) fn advance(&mut self, dt: f32, view: &ViewConfig, out: &mut Vec<Event>) {
        let margin = self.config.view_margin;
        let mut fired = Vec::new();
        for (kind, pool) in ProjectileKind::ALL.iter().zip(self.pools.iter_mut()) {
            let mut departed = Vec::new();
            for slot in pool.iter_mut().filter(|slot| slot.is_active()) {
                let index = slot.index();
                let projectile = slot.payload_mut();
                fired.clear();
                projectile.timers.tick(dt, &mut fired);
                if fired.contains(&ProjectileTimer::ArmCollider) {
                    projectile.collider_enabled = true;
                }
                projectile.position += projectile.direction * projectile.velocity * dt;
                if !view.contains(projectile.position, margin) {
                    departed.push(index);
                }
            }

            for index in departed {
                if pool.deactivate(index) {
                    out.push(Event::ProjectileRetired {
                        projectile: ProjectileId::new(*kind, index as u32),
                    });
                }
            }
        }
    }

    /// Deactivates a projectile; returns whether it was in flight.
    pub(crate) fn retire(&mut self, id: ProjectileId, out: &mut Vec<Event>) -> bool {
        let retired = self
            .pools
            .get_mut(id.kind().index())
            .is_some_and(|pool| pool.deactivate(id.slot() as usize));
        if retired {
            out.push(Event::ProjectileRetired { projectile: id });
        }
        retired
    }

    /// Projectile in flight with the provided identifier.
    pub(crate) fn active(&self, id: ProjectileId) -> Option<&Projectile> {
        self.pools
            .get(id.kind().index())
            .and_then(|pool| pool.get(id.slot() as usize))
            .filter(|slot| slot.is_active())
            .map(|slot| slot.payload())
    }

    pub(crate) fn pointer(&self, kind: ProjectileKind) -> usize {
        self.pools.get(kind.index()).map_or(0, |pool| pool.pointer())
    }

    pub(crate) fn snapshots(&self) -> impl Iterator<Item = ProjectileSnapshot> + '_ {
        ProjectileKind::ALL
            .iter()
            .zip(self.pools.iter())
            .flat_map(|(kind, pool)| {
                pool.iter_active().map(move |slot| {
                    let projectile = slot.payload();
                    ProjectileSnapshot {
                        id: ProjectileId::new(*kind, slot.index() as u32),
                        position: projectile.position,
                        direction: projectile.direction,
                        velocity: projectile.velocity,
                        collider_enabled: projectile.collider_enabled,
                    }
                })
            })
    }
}
