#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Overlap detection that reports contacts as they begin.
//!
//! The system compares every pair of armed colliders once per frame and emits
//! a [`Command::Contact`] only on the frame a pair starts overlapping. Pairs
//! that keep touching stay silent until they separate and meet again.

use std::collections::BTreeSet;

use glam::Vec2;
use strafe_core::{ColliderShape, ColliderView, Command, EntityRef};
use tracing::trace;

/// Pure system that emits contact commands for newly overlapping colliders.
#[derive(Debug, Default)]
pub struct Contacts {
    touching: BTreeSet<(EntityRef, EntityRef)>,
}

impl Contacts {
    /// Creates a new contact tracker with no remembered overlaps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pairs currently overlapping.
    #[must_use]
    pub fn touching(&self) -> usize {
        self.touching.len()
    }

    /// Compares every pair of colliders and emits contacts for new overlaps.
    pub fn handle(&mut self, colliders: &ColliderView, out: &mut Vec<Command>) {
        let snapshots: Vec<_> = colliders.iter().collect();
        let mut current = BTreeSet::new();

        for (index, first) in snapshots.iter().enumerate() {
            for second in snapshots.iter().skip(index + 1) {
                if matches!(
                    (first.entity, second.entity),
                    (EntityRef::Terrain(_), EntityRef::Terrain(_))
                ) {
                    continue;
                }
                if !overlaps(&first.shape, &second.shape) {
                    continue;
                }
                let pair = ordered(first.entity, second.entity);
                if !self.touching.contains(&pair) {
                    trace!(first = ?pair.0, second = ?pair.1, "contact began");
                    out.push(Command::Contact {
                        first: pair.0,
                        second: pair.1,
                    });
                }
                let _ = current.insert(pair);
            }
        }

        self.touching = current;
    }
}

fn ordered(a: EntityRef, b: EntityRef) -> (EntityRef, EntityRef) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Reports whether two collider shapes intersect. Touching edges count as overlap.
#[must_use]
pub fn overlaps(first: &ColliderShape, second: &ColliderShape) -> bool {
    match (*first, *second) {
        (
            ColliderShape::Circle {
                center: a,
                radius: ra,
            },
            ColliderShape::Circle {
                center: b,
                radius: rb,
            },
        ) => a.distance_squared(b) <= (ra + rb) * (ra + rb),
        (ColliderShape::Circle { center, radius }, ColliderShape::Rect { min, max })
        | (ColliderShape::Rect { min, max }, ColliderShape::Circle { center, radius }) => {
            let closest = center.clamp(min, max);
            center.distance_squared(closest) <= radius * radius
        }
        (
            ColliderShape::Rect {
                min: min_a,
                max: max_a,
            },
            ColliderShape::Rect {
                min: min_b,
                max: max_b,
            },
        ) => rects_overlap(min_a, max_a, min_b, max_b),
    }
}

fn rects_overlap(min_a: Vec2, max_a: Vec2, min_b: Vec2, max_b: Vec2) -> bool {
    min_a.x <= max_b.x && min_b.x <= max_a.x && min_a.y <= max_b.y && min_b.y <= max_a.y
}
