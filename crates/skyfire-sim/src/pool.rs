//! Fixed-capacity slot allocator with generation-checked handles.
//!
//! A freed slot bumps its generation, so a handle kept past its object's
//! reclamation resolves to `None` instead of aliasing the slot's next occupant.

use skyfire_core::error::SimError;

/// Stable reference to a pooled object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    pub index: u32,
    pub generation: u32,
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}g{}", self.index, self.generation)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    free_indices: Vec<u32>,
    live: usize,
}

impl<T> Pool<T> {
    /// Pre-allocate `capacity` slots. The pool never grows.
    pub fn with_capacity(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| Slot {
                generation: 0,
                value: None,
            })
            .collect();
        // Reversed so allocation hands out low indices first.
        let free_indices = (0..capacity as u32).rev().collect();
        Self {
            slots,
            free_indices,
            live: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Place `value` in a free slot.
    pub fn alloc(&mut self, value: T) -> Result<Handle, SimError> {
        let index = self.free_indices.pop().ok_or(SimError::PoolExhausted {
            capacity: self.capacity(),
        })?;
        let slot = &mut self.slots[index as usize];
        debug_assert!(slot.value.is_none(), "free slot {index} still occupied");
        slot.value = Some(value);
        self.live += 1;
        Ok(Handle {
            index,
            generation: slot.generation,
        })
    }

    /// Remove the object behind `handle` and free its slot for immediate reuse.
    ///
    /// Returns `None` for stale or already-freed handles.
    pub fn dealloc(&mut self, handle: Handle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_indices.push(handle.index);
        self.live -= 1;
        Some(value)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }
}
