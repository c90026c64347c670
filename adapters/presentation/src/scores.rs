//! Pooled floating labels that show awarded points.

use glam::Vec2;
use strafe_core::ObjectPool;
use tracing::trace;

use crate::ScoreDisplay;

const LABEL_POOL: usize = 8;
const LABEL_RISE: Vec2 = Vec2::new(0.0, 10.0);
const LABEL_LIFETIME: f32 = 1.0;

/// A score label drifting above the point where it was awarded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreLabel {
    /// Where the label is drawn.
    pub position: Vec2,
    /// Text shown, the awarded amount.
    pub text: String,
    /// Seconds until the label disappears.
    pub remaining: f32,
}

/// Score display backed by a small ring of reusable labels.
#[derive(Debug)]
pub struct FloatingScores {
    labels: ObjectPool<ScoreLabel>,
    total: u64,
}

impl Default for FloatingScores {
    fn default() -> Self {
        Self::new()
    }
}

impl FloatingScores {
    /// Creates the display with every label hidden.
    #[must_use]
    pub fn new() -> Self {
        Self {
            labels: ObjectPool::build(LABEL_POOL, |_| ScoreLabel::default()),
            total: 0,
        }
    }

    /// Running score last reported.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Labels currently on screen.
    pub fn labels(&self) -> impl Iterator<Item = &ScoreLabel> {
        self.labels.iter_active().map(|slot| slot.payload())
    }

    /// Ages every label by `dt` seconds and hides expired ones.
    pub fn advance(&mut self, dt: f32) {
        let mut expired = Vec::new();
        for slot in self.labels.iter_mut().filter(|slot| slot.is_active()) {
            let index = slot.index();
            let label = slot.payload_mut();
            label.remaining -= dt;
            if label.remaining <= 0.0 {
                expired.push(index);
            }
        }
        for index in expired {
            let _ = self.labels.deactivate(index);
        }
    }
}

impl ScoreDisplay for FloatingScores {
    fn show(&mut self, position: Vec2, amount: u32, total: u64) {
        self.total = total;
        let Some(acquired) = self.labels.acquire() else {
            return;
        };
        if acquired.evicted_live {
            trace!(slot = acquired.index, "score label recycled while visible");
        }
        if let Some(slot) = self.labels.get_mut(acquired.index) {
            *slot.payload_mut() = ScoreLabel {
                position: position + LABEL_RISE,
                text: amount.to_string(),
                remaining: LABEL_LIFETIME,
            };
        }
    }
}
