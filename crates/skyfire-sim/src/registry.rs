//! Per-tick contact registry.
//!
//! Targets are referenced by `Signal` (a snapshot), never by handle into
//! another thread's collection. Whoever needs a live position looks the
//! callsign up here, against the contacts that were alive this tick.

use glam::Vec3;

use skyfire_core::enums::Team;
use skyfire_core::math::angle_between;
use skyfire_core::types::Signal;

use crate::entity_list::EntityList;
use crate::guidance;
use crate::object::SimObject;
use crate::pool::Handle;

/// A targetable object as seen at the start of the tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub signal: Signal,
    /// Pool handle of the object; `None` for the player, who is not pooled.
    pub handle: Option<Handle>,
    pub velocity: Vec3,
    pub radius: f32,
}

impl Contact {
    /// Snapshot `object`. Returns `None` for objects without a callsign.
    pub fn of<T: SimObject>(handle: Option<Handle>, object: &T) -> Option<Self> {
        let signal = object.signal();
        if !signal.is_valid() {
            return None;
        }
        Some(Self {
            signal,
            handle,
            velocity: object.velocity(),
            radius: object.collision_radius(),
        })
    }

    pub fn position(&self) -> Vec3 {
        self.signal.position
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    contacts: Vec<Contact>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    pub fn push(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    /// Add every alive object of `list` that has a callsign.
    pub fn extend_from<T: SimObject>(&mut self, list: &EntityList<T>) {
        self.contacts.extend(
            list.iter_active()
                .filter(|(_, obj)| obj.is_alive())
                .filter_map(|(h, obj)| Contact::of(Some(h), obj)),
        );
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Resolve a signal to this tick's contact with the same callsign and team.
    pub fn resolve(&self, signal: &Signal) -> Option<&Contact> {
        if !signal.is_valid() {
            return None;
        }
        self.contacts
            .iter()
            .find(|c| c.signal.callsign == signal.callsign && c.signal.team == signal.team)
    }

    pub fn of_team(&self, team: Team) -> impl Iterator<Item = &Contact> + '_ {
        self.contacts.iter().filter(move |c| c.signal.team == team)
    }

    /// The contact of `team` closest in bearing to `facing`, inside the aim cone.
    pub fn best_in_cone(&self, team: Team, position: Vec3, facing: Vec3) -> Option<&Contact> {
        self.of_team(team)
            .filter(|c| guidance::matches(facing, position, c.position()))
            .min_by(|a, b| {
                let angle_a = angle_between(facing, a.position() - position);
                let angle_b = angle_between(facing, b.position() - position);
                angle_a.total_cmp(&angle_b)
            })
    }
}
