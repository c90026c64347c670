//! Timer-driven stand-in for an animation engine.

use serde::Deserialize;
use strafe_core::{AnimationClip, Command, EnemyId};
use tracing::trace;

use crate::AnimationPlayer;

/// Remaining time below which a clip counts as finished, so frame steps that
/// sum to a clip length end it on the expected frame despite `f32` rounding.
const FINISH_TOLERANCE: f32 = 1e-4;

/// Length of each clip in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClipDurations {
    /// Explosion length.
    pub explode: f32,
    /// Turret charge-up length.
    pub charge: f32,
    /// Turret muzzle flash length.
    pub fire: f32,
}

impl Default for ClipDurations {
    fn default() -> Self {
        Self {
            explode: 0.5,
            charge: 0.6,
            fire: 0.2,
        }
    }
}

impl ClipDurations {
    /// Length of `clip`.
    #[must_use]
    pub const fn of(&self, clip: AnimationClip) -> f32 {
        match clip {
            AnimationClip::Explode => self.explode,
            AnimationClip::Charge => self.charge,
            AnimationClip::Fire => self.fire,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Playing {
    enemy: EnemyId,
    clip: AnimationClip,
    remaining: f32,
}

/// Plays every clip for a fixed duration and reports completion as a command.
#[derive(Debug, Default)]
pub struct ScriptedAnimator {
    durations: ClipDurations,
    playing: Vec<Playing>,
}

impl ScriptedAnimator {
    /// Creates an animator with the provided clip lengths.
    #[must_use]
    pub fn new(durations: ClipDurations) -> Self {
        Self {
            durations,
            playing: Vec::new(),
        }
    }

    /// Number of clips still running.
    #[must_use]
    pub fn playing(&self) -> usize {
        self.playing.len()
    }

    /// Advances every clip by `dt` seconds and emits a finish command for each that ended.
    pub fn advance(&mut self, dt: f32, out: &mut Vec<Command>) {
        self.playing.retain_mut(|playing| {
            playing.remaining -= dt;
            if playing.remaining > FINISH_TOLERANCE {
                return true;
            }
            trace!(enemy = ?playing.enemy, clip = ?playing.clip, "clip finished");
            out.push(Command::AnimationFinished {
                enemy: playing.enemy,
                clip: playing.clip,
            });
            false
        });
    }
}

impl AnimationPlayer for ScriptedAnimator {
    fn play(&mut self, enemy: EnemyId, clip: AnimationClip) {
        self.stop(enemy);
        self.playing.push(Playing {
            enemy,
            clip,
            remaining: self.durations.of(clip),
        });
    }

    fn stop(&mut self, enemy: EnemyId) {
        self.playing.retain(|playing| playing.enemy != enemy);
    }
}

#[cfg(test)]
mod tests {
    use strafe_core::EnemyKind;

    use super::*;

    fn turret() -> EnemyId {
        EnemyId::new(EnemyKind::Turret, 0)
    }

    #[test]
    fn clip_finishes_after_its_duration() {
        let mut animator = ScriptedAnimator::new(ClipDurations::default());
        let mut commands = Vec::new();
        animator.play(turret(), AnimationClip::Charge);

        animator.advance(0.5, &mut commands);
        assert!(commands.is_empty());

        animator.advance(0.1, &mut commands);
        assert_eq!(
            commands,
            vec![Command::AnimationFinished {
                enemy: turret(),
                clip: AnimationClip::Charge,
            }]
        );
        assert_eq!(animator.playing(), 0);
    }

    #[test]
    fn explosion_ends_on_its_thirtieth_frame_at_sixty_fps() {
        let mut animator = ScriptedAnimator::new(ClipDurations::default());
        let mut commands = Vec::new();
        animator.play(turret(), AnimationClip::Explode);

        for _ in 0..29 {
            animator.advance(1.0 / 60.0, &mut commands);
        }
        assert!(commands.is_empty());

        animator.advance(1.0 / 60.0, &mut commands);
        assert_eq!(commands.len(), 1);
        assert_eq!(animator.playing(), 0);
    }

    #[test]
    fn new_clip_replaces_the_running_one() {
        let mut animator = ScriptedAnimator::new(ClipDurations::default());
        let mut commands = Vec::new();
        animator.play(turret(), AnimationClip::Charge);
        animator.play(turret(), AnimationClip::Explode);

        animator.advance(1.0, &mut commands);

        assert_eq!(
            commands,
            vec![Command::AnimationFinished {
                enemy: turret(),
                clip: AnimationClip::Explode,
            }]
        );
    }

    #[test]
    fn stopped_enemy_never_reports() {
        let mut animator = ScriptedAnimator::new(ClipDurations::default());
        let mut commands = Vec::new();
        animator.play(turret(), AnimationClip::Fire);

        animator.stop(turret());
        animator.advance(1.0, &mut commands);

        assert!(commands.is_empty());
    }
}
