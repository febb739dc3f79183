//! Active list + garbage list over a fixed-capacity pool.
//!
//! Dead objects are not freed on the tick they die. They move to the
//! garbage list with a countdown of `GARBAGE_TTL` ticks and are freed when
//! it reaches zero, so anything that enumerated the active list during the
//! tick of death never observes a recycled slot.

use skyfire_core::constants::GARBAGE_TTL;
use skyfire_core::error::SimError;

use crate::object::SimObject;
use crate::pool::{Handle, Pool};

#[derive(Debug, Clone, Copy)]
struct Garbage {
    handle: Handle,
    ttl: u32,
}

pub struct EntityList<T> {
    pool: Pool<T>,
    active: Vec<Handle>,
    garbage: Vec<Garbage>,
    ttl: u32,
}

impl<T: SimObject> EntityList<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_ttl(capacity, GARBAGE_TTL)
    }

    pub fn with_ttl(capacity: usize, ttl: u32) -> Self {
        Self {
            pool: Pool::with_capacity(capacity),
            active: Vec::with_capacity(capacity),
            garbage: Vec::new(),
            ttl: ttl.max(1),
        }
    }

    /// Allocate a slot for `value` and add it to the active list.
    pub fn spawn(&mut self, value: T) -> Result<Handle, SimError> {
        let handle = self.pool.alloc(value)?;
        self.active.push(handle);
        Ok(handle)
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.pool.get(handle)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.pool.get_mut(handle)
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn garbage_len(&self) -> usize {
        self.garbage.len()
    }

    /// Occupied pool slots (active + garbage).
    pub fn live_slots(&self) -> usize {
        self.pool.live()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn is_garbage(&self, handle: Handle) -> bool {
        self.garbage.iter().any(|g| g.handle == handle)
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.active
            .iter()
            .filter_map(move |&h| self.pool.get(h).map(|v| (h, v)))
    }

    pub fn for_each_active_mut(&mut self, mut f: impl FnMut(Handle, &mut T)) {
        for &handle in &self.active {
            if let Some(value) = self.pool.get_mut(handle) {
                f(handle, value);
            }
        }
    }

    /// Move every non-alive object from the active list to the garbage list.
    /// Returns how many were retired.
    pub fn retire_dead(&mut self) -> usize {
        let pool = &self.pool;
        let ttl = self.ttl;
        let garbage = &mut self.garbage;
        let before = self.active.len();
        self.active.retain(|&handle| match pool.get(handle) {
            Some(value) if value.is_alive() => true,
            Some(_) => {
                garbage.push(Garbage { handle, ttl });
                false
            }
            None => false,
        });
        before - self.active.len()
    }

    /// Count down every garbage entry; free the slots that reach zero.
    /// Returns how many slots were freed.
    pub fn age_garbage(&mut self) -> usize {
        let pool = &mut self.pool;
        let before = self.garbage.len();
        self.garbage.retain_mut(|entry| {
            entry.ttl -= 1;
            if entry.ttl == 0 {
                drop(pool.dealloc(entry.handle));
                false
            } else {
                true
            }
        });
        before - self.garbage.len()
    }

    /// Push every active object to garbage regardless of status.
    pub fn retire_all(&mut self) {
        let ttl = self.ttl;
        self.garbage
            .extend(self.active.drain(..).map(|handle| Garbage { handle, ttl }));
    }

    /// Free every garbage slot now.
    pub fn drain_garbage(&mut self) -> usize {
        let count = self.garbage.len();
        for entry in self.garbage.drain(..) {
            drop(self.pool.dealloc(entry.handle));
        }
        count
    }

    /// Retire everything and free it immediately.
    pub fn clear(&mut self) {
        self.retire_all();
        self.drain_garbage();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use skyfire_core::enums::{ObjectKind, Team};

    use crate::object::Vitals;

    struct Dummy {
        vitals: Vitals,
    }

    impl Dummy {
        fn new() -> Self {
            Self {
                vitals: Vitals::new(),
            }
        }
    }

    impl SimObject for Dummy {
        fn kind(&self) -> ObjectKind {
            ObjectKind::Enemy
        }
        fn vitals(&self) -> &Vitals {
            &self.vitals
        }
        fn vitals_mut(&mut self) -> &mut Vitals {
            &mut self.vitals
        }
        fn position(&self) -> Vec3 {
            Vec3::ZERO
        }
        fn direction(&self) -> Vec3 {
            Vec3::Z
        }
        fn speed(&self) -> f32 {
            0.0
        }
        fn collision_radius(&self) -> f32 {
            1.0
        }
        fn team(&self) -> Team {
            Team::Enemy
        }
    }

    #[test]
    fn dead_objects_move_to_garbage() {
        let mut list = EntityList::with_capacity(8);
        let a = list.spawn(Dummy::new()).unwrap();
        let b = list.spawn(Dummy::new()).unwrap();
        list.get_mut(a).unwrap().vitals.kill();

        assert_eq!(list.retire_dead(), 1);
        assert_eq!(list.active_len(), 1);
        assert!(list.is_garbage(a));
        assert!(!list.is_garbage(b));
        assert!(list.get(a).is_some(), "garbage is not freed immediately");
    }

    #[test]
    fn garbage_freed_exactly_after_ttl_ticks() {
        let ttl = 5;
        let mut list = EntityList::with_ttl(4, ttl);
        let h = list.spawn(Dummy::new()).unwrap();

        // Tick T: dies and is retired (aging runs first within a tick).
        list.age_garbage();
        list.get_mut(h).unwrap().vitals.kill();
        list.retire_dead();

        for tick in 1..ttl {
            list.age_garbage();
            list.retire_dead();
            assert!(list.get(h).is_some(), "freed early at T+{tick}");
        }
        assert!(list.get(h).is_some(), "still present at T+{}", ttl - 1);

        list.age_garbage();
        assert!(list.get(h).is_none(), "not freed by T+{ttl}");
        assert_eq!(list.live_slots(), 0);
    }

    #[test]
    fn slot_is_never_both_active_and_garbage() {
        let mut list = EntityList::with_ttl(4, 2);
        let handles: Vec<Handle> = (0..4).map(|_| list.spawn(Dummy::new()).unwrap()).collect();
        list.get_mut(handles[1]).unwrap().vitals.kill();
        list.get_mut(handles[3]).unwrap().vitals.kill();
        list.retire_dead();

        for (h, _) in list.iter_active() {
            assert!(!list.is_garbage(h));
        }
        assert_eq!(list.active_len() + list.garbage_len(), list.live_slots());
    }

    #[test]
    fn clear_frees_everything() {
        let mut list = EntityList::with_capacity(4);
        for _ in 0..4 {
            list.spawn(Dummy::new()).unwrap();
        }
        assert!(list.spawn(Dummy::new()).is_err());
        list.clear();
        assert_eq!(list.live_slots(), 0);
        assert_eq!(list.garbage_len(), 0);
        assert!(list.spawn(Dummy::new()).is_ok());
    }
}
