//! Fixed-capacity ring-buffer pool used for every reusable entity.
//!
//! Slots are built once up front and recycled in strict rotation. Acquiring a
//! slot never checks whether the slot under the cursor is still in use: the
//! oldest instance is handed out again regardless, so pools must be sized above
//! the peak number of concurrently live instances. [`Acquisition::evicted_live`]
//! reports when that happened.

/// Reusable entity instance owned by an [`ObjectPool`].
#[derive(Clone, Debug, PartialEq)]
pub struct PoolSlot<T> {
    index: usize,
    active: bool,
    payload: T,
}

impl<T> PoolSlot<T> {
    /// Position of the slot inside its pool.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Reports whether the slot is currently handed out.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Shared access to the entity stored in the slot.
    #[must_use]
    pub const fn payload(&self) -> &T {
        &self.payload
    }

    /// Exclusive access to the entity stored in the slot.
    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }
}

/// Outcome of [`ObjectPool::acquire`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Acquisition {
    /// Index of the slot that was handed out.
    pub index: usize,
    /// Whether the slot was still active and its previous occupant was discarded.
    pub evicted_live: bool,
}

/// Fixed-size ring of pre-built entity instances.
#[derive(Clone, Debug)]
pub struct ObjectPool<T> {
    slots: Vec<PoolSlot<T>>,
    pointer: usize,
}

impl<T> ObjectPool<T> {
    /// Builds `capacity` inactive instances using `factory`, which receives the slot index.
    pub fn build<F>(capacity: usize, mut factory: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        let slots = (0..capacity)
            .map(|index| PoolSlot {
                index,
                active: false,
                payload: factory(index),
            })
            .collect();
        Self { slots, pointer: 0 }
    }

    /// Number of slots in the pool.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the slot the next acquisition will hand out.
    #[must_use]
    pub const fn pointer(&self) -> usize {
        self.pointer
    }

    /// Hands out the slot under the cursor, marks it active and advances the cursor.
    ///
    /// The payload is left as the previous occupant left it; callers reset it.
    /// Returns `None` only for a pool built with zero capacity.
    pub fn acquire(&mut self) -> Option<Acquisition> {
        let capacity = self.slots.len();
        let index = self.pointer;
        let slot = self.slots.get_mut(index)?;
        let evicted_live = slot.active;
        slot.active = true;
        self.pointer = (index + 1) % capacity;
        Some(Acquisition {
            index,
            evicted_live,
        })
    }

    /// Marks the slot inactive, returning whether it was active beforehand.
    pub fn deactivate(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => std::mem::replace(&mut slot.active, false),
            None => false,
        }
    }

    /// Shared access to a slot.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PoolSlot<T>> {
        self.slots.get(index)
    }

    /// Exclusive access to a slot.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut PoolSlot<T>> {
        self.slots.get_mut(index)
    }

    /// Iterator over every slot, active or not, in index order.
    pub fn iter(&self) -> impl Iterator<Item = &PoolSlot<T>> {
        self.slots.iter()
    }

    /// Mutable iterator over every slot, active or not, in index order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PoolSlot<T>> {
        self.slots.iter_mut()
    }

    /// Iterator over the active slots in index order.
    pub fn iter_active(&self) -> impl Iterator<Item = &PoolSlot<T>> {
        self.slots.iter().filter(|slot| slot.active)
    }

    /// Number of slots currently handed out.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.active).count()
    }
}
