//! Simulation engine: screen state machine and the per-tick update.
//!
//! `SimulationEngine` owns the mission state and a handle to the
//! `SharedWorld` the render thread reads. It processes queued commands at
//! tick boundaries, steps the world while the Game screen is up and
//! produces a `HudSnapshot` every tick. Headless and deterministic for a
//! given seed.

use std::collections::VecDeque;
use std::sync::Arc;

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skyfire_core::commands::{Action, PlayerCommand};
use skyfire_core::config::Roster;
use skyfire_core::constants::MAX_HEALTH;
use skyfire_core::enums::{Screen, Team};
use skyfire_core::error::SimError;
use skyfire_core::events::AudioEvent;
use skyfire_core::state::{HudSnapshot, MissionStats};
use skyfire_core::types::SimTime;

use crate::bullet::Bullet;
use crate::collision;
use crate::enemy::Enemy;
use crate::entity_list::EntityList;
use crate::object::SimObject;
use crate::player::Player;
use crate::registry::{Contact, Registry};
use crate::world::SharedWorld;

/// Configuration for a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for enemy placement. Same seed = same simulation.
    pub seed: u64,
    /// Initially selected mission index.
    pub mission: usize,
    /// Initially selected jet index.
    pub jet: usize,
    pub roster: Roster,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            mission: 0,
            jet: 0,
            roster: Roster::default(),
        }
    }
}

pub struct SimulationEngine {
    world: Arc<SharedWorld>,
    roster: Roster,
    time: SimTime,
    screen: Screen,
    rng: ChaCha8Rng,
    mission: usize,
    jet: usize,
    command_queue: VecDeque<PlayerCommand>,
    audio_events: Vec<AudioEvent>,
    registry: Registry,
    stats: MissionStats,
    map_loaded: bool,
}

impl SimulationEngine {
    pub fn new(config: SimConfig) -> Self {
        Self::with_world(config, Arc::new(SharedWorld::new()))
    }

    /// Create an engine stepping an existing world.
    pub fn with_world(config: SimConfig, world: Arc<SharedWorld>) -> Self {
        let mission = clamp_index(config.mission, config.roster.missions().len(), "mission");
        let jet = clamp_index(config.jet, config.roster.jets().len(), "jet");
        Self {
            world,
            roster: config.roster,
            time: SimTime::default(),
            screen: Screen::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            mission,
            jet,
            command_queue: VecDeque::new(),
            audio_events: Vec::new(),
            registry: Registry::new(),
            stats: MissionStats::default(),
            map_loaded: false,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> HudSnapshot {
        self.process_commands();

        if self.screen == Screen::Game && !self.check_mission_end() {
            self.step();
            self.time.advance();
        }

        self.build_snapshot()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn stats(&self) -> MissionStats {
        self.stats
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn selected_mission(&self) -> usize {
        self.mission
    }

    pub fn selected_jet(&self) -> usize {
        self.jet
    }

    /// Shared handle to the entity collections, for the render thread.
    pub fn world(&self) -> Arc<SharedWorld> {
        Arc::clone(&self.world)
    }

    /// Build the player and the mission's enemies. Replaces any existing map.
    pub fn create_map_data(&mut self) {
        if self.map_loaded {
            self.clear_map_data();
        }
        let jet = self.roster.jet(self.jet).clone();
        let mission = self.roster.mission(self.mission).clone();
        log::info!(
            "creating map: mission '{}' ({} enemies), jet '{}'",
            mission.name,
            mission.enemy_count,
            jet.name
        );

        let origin = Vec3::ZERO;
        *self.world.player() = Some(Player::new(&jet, origin, Vec3::Z));

        let mut spawned = 0;
        {
            let mut enemies = self.world.enemies();
            for i in 0..mission.enemy_count {
                let callsign = i as u32 + 1;
                let enemy = Enemy::spawn_around(&mut self.rng, callsign, origin, &mission);
                match enemies.spawn(enemy) {
                    Ok(_) => spawned += 1,
                    Err(e) => {
                        log::warn!("enemy {callsign} not spawned: {e}");
                        break;
                    }
                }
            }
        }

        self.stats = MissionStats {
            enemies_total: spawned,
            ..MissionStats::default()
        };
        self.time = SimTime::default();
        self.registry.clear();
        self.map_loaded = true;
    }

    /// Retire every entity, free its slot and destroy the player.
    pub fn clear_map_data(&mut self) {
        self.world.clear();
        self.registry.clear();
        if self.map_loaded {
            log::info!("map cleared");
        }
        self.map_loaded = false;
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command. Commands invalid for the current
    /// screen are ignored.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::OpenMissionSelect => {
                if matches!(self.screen, Screen::MainMenu | Screen::Customize) {
                    self.set_screen(Screen::MissionSelect);
                }
            }
            PlayerCommand::OpenCustomize => {
                if matches!(self.screen, Screen::MainMenu | Screen::MissionSelect) {
                    self.set_screen(Screen::Customize);
                }
            }
            PlayerCommand::SelectJet { index } => {
                if self.screen == Screen::Customize {
                    self.jet = clamp_index(index, self.roster.jets().len(), "jet");
                }
            }
            PlayerCommand::SelectMission { index } => {
                if self.screen == Screen::MissionSelect {
                    self.mission = clamp_index(index, self.roster.missions().len(), "mission");
                    self.set_screen(Screen::GameBriefing);
                }
            }
            PlayerCommand::StartMission => {
                if self.screen == Screen::GameBriefing {
                    self.create_map_data();
                    self.set_screen(Screen::Game);
                }
            }
            PlayerCommand::Pause => {
                if self.screen == Screen::Game {
                    self.set_screen(Screen::GamePaused);
                }
            }
            PlayerCommand::Resume => {
                if self.screen == Screen::GamePaused {
                    self.set_screen(Screen::Game);
                }
            }
            PlayerCommand::ReturnToMissionSelect => {
                if self.screen.has_map_data() || self.screen == Screen::GameBriefing {
                    self.clear_map_data();
                    self.set_screen(Screen::MissionSelect);
                }
            }
            PlayerCommand::ReturnToMenu => {
                self.clear_map_data();
                self.set_screen(Screen::MainMenu);
            }
            PlayerCommand::Input { action } => self.handle_input(action),
        }
    }

    fn handle_input(&mut self, action: Action) {
        if action == Action::Pause {
            match self.screen {
                Screen::Game => self.set_screen(Screen::GamePaused),
                Screen::GamePaused => self.set_screen(Screen::Game),
                _ => {}
            }
            return;
        }
        if !matches!(self.screen, Screen::Game | Screen::GamePaused) {
            return;
        }
        match self.world.player().as_mut() {
            Some(player) => player.apply_action(action),
            None => log::warn!("input dropped: {}", SimError::NoMapData),
        }
    }

    fn set_screen(&mut self, screen: Screen) {
        if self.screen == screen {
            return;
        }
        log::info!("screen {:?} -> {:?}", self.screen, screen);
        self.screen = screen;
        self.audio_events.push(AudioEvent::ScreenChanged { screen });
    }

    /// Top-of-tick end conditions. Returns true if the mission ended.
    fn check_mission_end(&mut self) -> bool {
        let player_dead = self
            .world
            .player()
            .as_ref()
            .map_or(true, |p| p.health() <= 0.0);
        if player_dead {
            self.set_screen(Screen::Dead);
            return true;
        }
        if self.world.enemies().is_empty() {
            self.set_screen(Screen::Win);
            return true;
        }
        false
    }

    /// Run one simulation step.
    fn step(&mut self) {
        let dt = self.time.dt();

        // Step 1: Snapshot every targetable object
        self.build_registry();

        // Step 2: Player flies and fires
        let fired = match self.world.player().as_mut() {
            Some(player) => {
                let tick = player.update(dt, &self.registry);
                if let Some(callsign) = tick.locked {
                    self.audio_events.push(AudioEvent::TargetLocked { callsign });
                }
                tick.bullets
            }
            None => Vec::new(),
        };
        self.stats.shots_fired += fired.len() as u32;
        self.spawn_bullets(Team::Player, fired);

        // Step 3: Enemies pursue and fire
        let mut fired = Vec::new();
        self.world.enemies().for_each_active_mut(|_, enemy| {
            if let Some(bullet) = enemy.update(dt, &self.registry) {
                fired.push(bullet);
            }
        });
        self.spawn_bullets(Team::Enemy, fired);

        // Step 4: Bullets move
        let registry = &self.registry;
        self.world
            .player_bullets()
            .for_each_active_mut(|_, b| b.update(dt, registry));
        self.world
            .enemy_bullets()
            .for_each_active_mut(|_, b| b.update(dt, registry));

        // Step 5: Collisions
        self.collide_player_bullets(dt);
        self.collide_enemy_bullets(dt);

        // Step 6: Free expired garbage, then retire this tick's dead
        self.world.player_bullets().age_garbage();
        self.world.enemy_bullets().age_garbage();
        self.world.enemies().age_garbage();

        self.world.player_bullets().retire_dead();
        self.world.enemy_bullets().retire_dead();
        let retired = self.world.enemies().retire_dead();
        if retired > 0 {
            log::trace!("retired {retired} enemies");
        }
    }

    fn build_registry(&mut self) {
        self.registry.clear();
        if let Some(contact) = self
            .world
            .player()
            .as_ref()
            .filter(|p| p.is_alive())
            .and_then(|p| Contact::of(None, p))
        {
            self.registry.push(contact);
        }
        self.registry.extend_from(&self.world.enemies());
    }

    fn spawn_bullets(&mut self, team: Team, bullets: Vec<Bullet>) {
        if bullets.is_empty() {
            return;
        }
        let mut list = match team {
            Team::Enemy => self.world.enemy_bullets(),
            Team::Player | Team::Invalid => self.world.player_bullets(),
        };
        for bullet in bullets {
            let kind = bullet.bullet_kind();
            match list.spawn(bullet) {
                Ok(_) => self.audio_events.push(AudioEvent::WeaponFired { kind, team }),
                Err(e) => log::warn!("{team:?} bullet dropped: {e}"),
            }
        }
    }

    fn collide_player_bullets(&mut self, dt: f32) {
        let targets = contacts_of(&self.world.enemies());
        if targets.is_empty() {
            return;
        }
        let hits = collision::sweep(&mut self.world.player_bullets(), &targets, dt);
        if hits.is_empty() {
            return;
        }
        let report = collision::apply_hits(&mut self.world.enemies(), &hits);

        self.stats.hits += report.landed;
        self.stats.kills += report.kills.len() as u32;
        if let Some(player) = self.world.player().as_mut() {
            player.add_score(report.score);
        }
        for callsign in report.kills {
            log::debug!("enemy {callsign} destroyed");
            self.audio_events.push(AudioEvent::EnemyDestroyed { callsign });
        }
    }

    fn collide_enemy_bullets(&mut self, dt: f32) {
        let Some(target) = self
            .world
            .player()
            .as_ref()
            .filter(|p| p.is_alive())
            .and_then(|p| Contact::of(None, p))
        else {
            return;
        };
        let hits = collision::sweep(&mut self.world.enemy_bullets(), &[target], dt);
        if hits.is_empty() {
            return;
        }
        let Some(report) = self
            .world
            .player()
            .as_mut()
            .map(|p| collision::apply_hits_to(p, &hits))
        else {
            return;
        };
        for hit in hits.iter().take(report.landed as usize) {
            self.audio_events
                .push(AudioEvent::PlayerHit { damage: hit.damage });
        }
        if !report.kills.is_empty() {
            log::debug!("player destroyed");
        }
    }

    fn build_snapshot(&mut self) -> HudSnapshot {
        let mut snapshot = HudSnapshot {
            time: self.time,
            screen: self.screen,
            stats: self.stats,
            enemies_remaining: self.world.enemies().active_len(),
            audio_events: std::mem::take(&mut self.audio_events),
            ..HudSnapshot::default()
        };
        if let Some(player) = self.world.player().as_ref() {
            snapshot.hp_fraction = player.health() / MAX_HEALTH;
            snapshot.speed = player.speed();
            snapshot.energy_fraction = player.energy().fraction();
            snapshot.score = player.score();
            snapshot.weapons = player.weapons().iter().map(|w| w.view()).collect();
            let target = player.target();
            snapshot.locked_target = target.is_valid().then_some(target.callsign);
        }
        snapshot
    }

    /// Replace the mission's enemies (for tests).
    #[cfg(test)]
    pub fn replace_enemies(&mut self, enemies: impl IntoIterator<Item = Enemy>) {
        let mut list = self.world.enemies();
        list.clear();
        for enemy in enemies {
            if let Err(e) = list.spawn(enemy) {
                log::warn!("test enemy not spawned: {e}");
            }
        }
        self.stats.enemies_total = list.active_len() as u32;
    }
}

/// Alive, targetable objects of `list` as a contact snapshot.
fn contacts_of<T: SimObject>(list: &EntityList<T>) -> Vec<Contact> {
    let mut registry = Registry::new();
    registry.extend_from(list);
    registry.contacts().to_vec()
}

fn clamp_index(index: usize, len: usize, what: &str) -> usize {
    if index < len {
        index
    } else {
        log::warn!("{what} index {index} out of range ({len}), using 0");
        0
    }
}
