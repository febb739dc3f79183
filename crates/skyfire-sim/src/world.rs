//! Entity collections shared between the update thread and the render thread.
//!
//! Each collection has its own mutex. Both threads take one lock at a time
//! and release it before taking the next; no code path holds two.

use std::sync::{Mutex, MutexGuard, PoisonError};

use skyfire_core::constants::{BULLET_POOL_CAPACITY, ENEMY_POOL_CAPACITY};

use crate::bullet::Bullet;
use crate::enemy::Enemy;
use crate::entity_list::EntityList;
use crate::object::SimObject;
use crate::player::Player;
use crate::render::{DrawSink, ViewContext};

/// Lock `mutex`, recovering the data if a previous holder panicked.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SharedWorld {
    player: Mutex<Option<Player>>,
    player_bullets: Mutex<EntityList<Bullet>>,
    enemy_bullets: Mutex<EntityList<Bullet>>,
    enemies: Mutex<EntityList<Enemy>>,
}

impl SharedWorld {
    pub fn new() -> Self {
        Self::with_capacity(BULLET_POOL_CAPACITY, ENEMY_POOL_CAPACITY)
    }

    pub fn with_capacity(bullets: usize, enemies: usize) -> Self {
        Self {
            player: Mutex::new(None),
            player_bullets: Mutex::new(EntityList::with_capacity(bullets)),
            enemy_bullets: Mutex::new(EntityList::with_capacity(bullets)),
            enemies: Mutex::new(EntityList::with_capacity(enemies)),
        }
    }

    pub fn player(&self) -> MutexGuard<'_, Option<Player>> {
        lock(&self.player)
    }

    pub fn player_bullets(&self) -> MutexGuard<'_, EntityList<Bullet>> {
        lock(&self.player_bullets)
    }

    pub fn enemy_bullets(&self) -> MutexGuard<'_, EntityList<Bullet>> {
        lock(&self.enemy_bullets)
    }

    pub fn enemies(&self) -> MutexGuard<'_, EntityList<Enemy>> {
        lock(&self.enemies)
    }

    /// Draw every live object. Called from the render thread.
    pub fn render(&self, ctx: &ViewContext, sink: &mut dyn DrawSink) {
        for (_, enemy) in self.enemies().iter_active() {
            enemy.render(ctx, sink);
        }
        for (_, bullet) in self.player_bullets().iter_active() {
            bullet.render(ctx, sink);
        }
        for (_, bullet) in self.enemy_bullets().iter_active() {
            bullet.render(ctx, sink);
        }
        if let Some(player) = self.player().as_ref() {
            player.render(ctx, sink);
        }
    }

    /// Retire every entity, free all slots and drop the player.
    pub fn clear(&self) {
        self.player_bullets().clear();
        self.enemy_bullets().clear();
        self.enemies().clear();
        *self.player() = None;
    }

    /// Occupied slots across all pools.
    pub fn live_slots(&self) -> usize {
        let player_bullets = self.player_bullets().live_slots();
        let enemy_bullets = self.enemy_bullets().live_slots();
        player_bullets + enemy_bullets + self.enemies().live_slots()
    }
}

impl Default for SharedWorld {
    fn default() -> Self {
        Self::new()
    }
}
