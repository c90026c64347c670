//! End-of-run report.

use std::fmt;

use serde::Serialize;
use strafe_core::{EnemyKind, Event, Scene};

/// Outcome of a headless session.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub(crate) struct Summary {
    pub(crate) frames: u64,
    pub(crate) seconds: f32,
    pub(crate) score: u64,
    pub(crate) player_health: i32,
    pub(crate) player_alive: bool,
    pub(crate) mines_spawned: u32,
    pub(crate) turrets_spawned: u32,
    pub(crate) enemies_destroyed: u32,
    pub(crate) projectiles_fired: u32,
    pub(crate) hits_taken: u32,
    pub(crate) scenes: Vec<Scene>,
}

impl Summary {
    /// Folds a frame's events into the running totals.
    pub(crate) fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemySpawned { enemy, .. } => match enemy.kind() {
                    EnemyKind::Mine => self.mines_spawned += 1,
                    EnemyKind::Turret => self.turrets_spawned += 1,
                },
                Event::ScoreReported { total, .. } => {
                    self.enemies_destroyed += 1;
                    self.score = *total;
                }
                Event::ProjectileFired { .. } => self.projectiles_fired += 1,
                Event::PlayerDamaged { .. } => self.hits_taken += 1,
                Event::SceneRequested { scene } => self.scenes.push(*scene),
                _ => {}
            }
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frames:      {} ({:.1}s)", self.frames, self.seconds)?;
        writeln!(f, "score:       {}", self.score)?;
        writeln!(
            f,
            "pilot:       {} ({} health, {} hits taken)",
            if self.player_alive { "alive" } else { "destroyed" },
            self.player_health,
            self.hits_taken
        )?;
        writeln!(
            f,
            "enemies:     {} mines, {} turrets, {} destroyed",
            self.mines_spawned, self.turrets_spawned, self.enemies_destroyed
        )?;
        write!(f, "projectiles: {}", self.projectiles_fired)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use strafe_core::EnemyId;

    use super::*;

    #[test]
    fn tallies_spawns_and_kills() {
        let mine = EnemyId::new(EnemyKind::Mine, 0);
        let turret = EnemyId::new(EnemyKind::Turret, 0);
        let mut summary = Summary::default();

        summary.observe(&[
            Event::EnemySpawned {
                enemy: mine,
                position: Vec2::ZERO,
            },
            Event::EnemySpawned {
                enemy: turret,
                position: Vec2::ZERO,
            },
            Event::ScoreReported {
                enemy: turret,
                amount: 1000,
                position: Vec2::ZERO,
                total: 1000,
            },
            Event::PlayerDamaged {
                amount: 1,
                remaining: 2,
            },
        ]);

        assert_eq!(summary.mines_spawned, 1);
        assert_eq!(summary.turrets_spawned, 1);
        assert_eq!(summary.enemies_destroyed, 1);
        assert_eq!(summary.score, 1000);
        assert_eq!(summary.hits_taken, 1);
    }

    #[test]
    fn serialises_to_json() {
        let summary = Summary {
            scenes: vec![Scene::LoseGame],
            ..Summary::default()
        };

        let json = serde_json::to_value(&summary).expect("summary serialises");

        assert_eq!(json["scenes"][0], "LoseGame");
        assert_eq!(json["score"], 0);
    }
}
