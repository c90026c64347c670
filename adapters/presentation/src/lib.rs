#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Presentation contracts for Strafe adapters.
//!
//! The simulation never plays animations, draws score labels or swaps scenes
//! itself. It emits requests as events; [`present`] routes each of them to the
//! collaborator responsible, and collaborators report completions back as
//! commands for the next frame.

mod animator;
mod scores;

use anyhow::Result as AnyResult;
use glam::Vec2;
use strafe_core::{AnimationClip, EnemyId, Event, Scene};
use tracing::info;

pub use animator::{ClipDurations, ScriptedAnimator};
pub use scores::{FloatingScores, ScoreLabel};

/// Plays enemy animations and reports when they finish.
pub trait AnimationPlayer {
    /// Starts `clip` on `enemy`, replacing whatever the enemy was playing.
    fn play(&mut self, enemy: EnemyId, clip: AnimationClip);

    /// Shows or hides the hurt overlay drawn over `enemy`.
    fn show_hurt(&mut self, _enemy: EnemyId, _visible: bool) {}

    /// Drops any clip still playing on an enemy that left the world.
    fn stop(&mut self, _enemy: EnemyId) {}
}

/// Displays awarded points.
pub trait ScoreDisplay {
    /// Shows `amount` near `position`; `total` is the running score.
    fn show(&mut self, position: Vec2, amount: u32, total: u64);
}

/// Loads scenes on request.
pub trait SceneLoader {
    /// Switches to `scene`.
    fn load(&mut self, scene: Scene) -> AnyResult<()>;
}

/// Routes a frame's events to the collaborators that act on them.
///
/// Events that have no presentation counterpart are skipped.
pub fn present<A, S, L>(
    events: &[Event],
    animations: &mut A,
    scores: &mut S,
    scenes: &mut L,
) -> AnyResult<()>
where
    A: AnimationPlayer + ?Sized,
    S: ScoreDisplay + ?Sized,
    L: SceneLoader + ?Sized,
{
    for event in events {
        match event {
            Event::AnimationRequested { enemy, clip } => animations.play(*enemy, *clip),
            Event::HurtOverlayChanged { enemy, visible } => animations.show_hurt(*enemy, *visible),
            Event::EnemyDespawned { enemy } => animations.stop(*enemy),
            Event::ScoreReported {
                amount,
                position,
                total,
                ..
            } => scores.show(*position, *amount, *total),
            Event::SceneRequested { scene } => scenes.load(*scene)?,
            _ => {}
        }
    }
    Ok(())
}

/// Scene loader that records every request.
#[derive(Debug, Default)]
pub struct SceneLog {
    requested: Vec<Scene>,
}

impl SceneLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scenes requested so far, oldest first.
    #[must_use]
    pub fn requested(&self) -> &[Scene] {
        &self.requested
    }
}

impl SceneLoader for SceneLog {
    fn load(&mut self, scene: Scene) -> AnyResult<()> {
        info!(?scene, "scene requested");
        self.requested.push(scene);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;
    use strafe_core::EnemyKind;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        played: Vec<(EnemyId, AnimationClip)>,
        hurt: Vec<bool>,
        stopped: Vec<EnemyId>,
        shown: Vec<(Vec2, u32, u64)>,
    }

    impl AnimationPlayer for Recorder {
        fn play(&mut self, enemy: EnemyId, clip: AnimationClip) {
            self.played.push((enemy, clip));
        }

        fn show_hurt(&mut self, _enemy: EnemyId, visible: bool) {
            self.hurt.push(visible);
        }

        fn stop(&mut self, enemy: EnemyId) {
            self.stopped.push(enemy);
        }
    }

    impl ScoreDisplay for Recorder {
        fn show(&mut self, position: Vec2, amount: u32, total: u64) {
            self.shown.push((position, amount, total));
        }
    }

    struct Refusing;

    impl SceneLoader for Refusing {
        fn load(&mut self, scene: Scene) -> AnyResult<()> {
            bail!("cannot load {scene:?}")
        }
    }

    #[test]
    fn routes_each_request_to_its_collaborator() {
        let mine = EnemyId::new(EnemyKind::Mine, 2);
        let events = vec![
            Event::AnimationRequested {
                enemy: mine,
                clip: AnimationClip::Explode,
            },
            Event::HurtOverlayChanged {
                enemy: mine,
                visible: true,
            },
            Event::ScoreReported {
                enemy: mine,
                amount: 100,
                position: Vec2::new(200.0, 10.0),
                total: 1100,
            },
            Event::EnemyDespawned { enemy: mine },
            Event::SceneRequested {
                scene: Scene::LoseGame,
            },
        ];
        let mut animations = Recorder::default();
        let mut scores = Recorder::default();
        let mut scenes = SceneLog::new();

        present(&events, &mut animations, &mut scores, &mut scenes).expect("scene log accepts");

        assert_eq!(animations.played, vec![(mine, AnimationClip::Explode)]);
        assert_eq!(animations.hurt, vec![true]);
        assert_eq!(animations.stopped, vec![mine]);
        assert_eq!(scores.shown, vec![(Vec2::new(200.0, 10.0), 100, 1100)]);
        assert_eq!(scenes.requested(), &[Scene::LoseGame]);
    }

    #[test]
    fn scene_failures_surface_to_the_caller() {
        let events = [Event::SceneRequested {
            scene: Scene::LoseGame,
        }];
        let mut recorder = Recorder::default();
        let mut scores = Recorder::default();

        let result = present(&events, &mut recorder, &mut scores, &mut Refusing);

        assert!(result.is_err());
    }
}
