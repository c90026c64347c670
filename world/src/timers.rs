/// Remaining time below which an action counts as expired.
///
/// Absorbs the rounding left over when frame steps that sum to a delay are
/// subtracted one by one in `f32`.
const EXPIRY_TOLERANCE: f32 = 1e-4;

/// Delayed actions owned by a single pooled entity.
///
/// Pending actions die with the entity: reactivating a pooled slot clears them.
#[derive(Clone, Debug)]
pub(crate) struct Timers<A> {
    pending: Vec<Scheduled<A>>,
}

#[derive(Clone, Debug)]
struct Scheduled<A> {
    action: A,
    remaining: f32,
}

impl<A> Default for Timers<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<A: Copy> Timers<A> {
    /// Queues `action` to fire once `delay` seconds have elapsed.
    pub(crate) fn schedule(&mut self, action: A, delay: f32) {
        self.pending.push(Scheduled {
            action,
            remaining: delay,
        });
    }

    /// Drops every pending action.
    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }

    /// Drops pending occurrences of `action`.
    pub(crate) fn cancel(&mut self, action: A)
    where
        A: PartialEq,
    {
        self.pending.retain(|scheduled| scheduled.action != action);
    }

    /// Advances all pending actions, appending those that expired in scheduling order.
    pub(crate) fn tick(&mut self, dt: f32, fired: &mut Vec<A>) {
        self.pending.retain_mut(|scheduled| {
            scheduled.remaining -= dt;
            if scheduled.remaining <= EXPIRY_TOLERANCE {
                fired.push(scheduled.action);
                false
            } else {
                true
            }
        });
    }
}
