//! Generational arena for renderer handles.
//!
//! Every live renderer owned by a reconciler sits in a slot of a
//! [`HandleArena`]. Releasing a handle bumps the slot generation, so a stale
//! handle that outlived its renderer resolves to `None` instead of aliasing
//! whatever reuses the slot.

use crate::profiling::profile_function;
use std::num::NonZeroU64;

/// Opaque generational handle into a [`HandleArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(NonZeroU64);

impl Handle {
    pub fn new(generation: u32, idx: u32) -> Self {
        // The low half stores idx + 1, which keeps the packed value non-zero.
        let packed = ((generation as u64) << 32) | (idx as u64 + 1);
        Self(NonZeroU64::new(packed).unwrap_or(NonZeroU64::MIN))
    }

    pub fn generation(&self) -> u32 {
        (self.0.get() >> 32) as u32
    }

    pub fn index(&self) -> u32 {
        (self.0.get() & u32::MAX as u64) as u32 - 1
    }
}

struct Slot<T> {
    generation: u32,
    data: Option<T>,
}

/// Slot storage with free-list reuse and generation checks.
pub struct HandleArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Default for HandleArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandleArena<T> {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store a value and return its handle. Freed slots are reused first.
    pub fn insert(&mut self, data: T) -> Handle {
        profile_function!();
        if let Some(idx) = self.free.pop()
            && let Some(slot) = self.slots.get_mut(idx as usize)
        {
            slot.data = Some(data);
            return Handle::new(slot.generation, idx);
        }

        let idx = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            data: Some(data),
        });
        Handle::new(0, idx)
    }

    fn slot(&self, handle: Handle) -> Option<&Slot<T>> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slot(handle).and_then(|slot| slot.data.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.data.as_mut())
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Release a handle, returning the stored value.
    ///
    /// Returns `None` for stale or already released handles.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        profile_function!();
        let index = handle.index();
        let slot = self
            .slots
            .get_mut(index as usize)
            .filter(|slot| slot.generation == handle.generation())?;
        let data = slot.data.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        Some(data)
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate live values together with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.data
                .as_ref()
                .map(|data| (Handle::new(slot.generation, idx as u32), data))
        })
    }
}

static_assertions::assert_eq_size!(Handle, Option<Handle>);
