//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems once per frame, and produces `GameStateSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use orson_core::commands::PlayerCommand;
use orson_core::config::{ConfigError, GameConfig};
use orson_core::enums::{Difficulty, RunStatus};
use orson_core::events::{Notification, ShotRejected, Volley};
use orson_core::state::GameStateSnapshot;
use orson_core::types::{Position, SimTime};

use crate::progress::{ComboState, LevelState, ScheduledLevelStart, ScoreState};
use crate::publisher::Publisher;
use crate::systems;
use crate::systems::snapshot::SnapshotContext;
use crate::world_setup::{self, IdAllocator};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub game: GameConfig,
    /// Initial difficulty preset.
    pub difficulty: Difficulty,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            game: GameConfig::default(),
            difficulty: Difficulty::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    config: GameConfig,
    time: SimTime,
    status: RunStatus,
    difficulty: Difficulty,
    rng: ChaCha8Rng,
    ids: IdAllocator,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    notifications: Vec<Notification>,
    publisher: Publisher,

    level: LevelState,
    score: ScoreState,
    combo: ComboState,
    scheduled_start: Option<ScheduledLevelStart>,
    /// Bumped on every reset; stale scheduled starts compare against it.
    epoch: u64,
}

impl SimulationEngine {
    /// Create a new simulation engine on the title screen with a fresh game
    /// prepared.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.game.validate()?;

        let mut engine = Self {
            world: World::new(),
            config: config.game,
            time: SimTime::default(),
            status: RunStatus::Start,
            difficulty: config.difficulty,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            ids: IdAllocator::default(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            notifications: Vec::new(),
            publisher: Publisher::default(),
            level: LevelState::default(),
            score: ScoreState::default(),
            combo: ComboState::default(),
            scheduled_start: None,
            epoch: 0,
        };
        engine.reset_game();
        Ok(engine)
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation to frame timestamp `now` and return the
    /// resulting snapshot. The world only moves while the run is playing.
    pub fn tick(&mut self, now: f64) -> GameStateSnapshot {
        self.process_commands();

        if self.status == RunStatus::Playing {
            self.time.advance(now);
            self.run_systems(now);
        } else {
            self.time.now = now;
        }

        self.publish();
        let notifications = std::mem::take(&mut self.notifications);
        self.build_snapshot(notifications)
    }

    /// Handle a pointer click at field coordinates.
    pub fn fire(&mut self, x: f64, y: f64) -> Result<Volley, ShotRejected> {
        if self.status != RunStatus::Playing {
            return Err(ShotRejected::NotPlaying);
        }

        let volley = systems::input::fire(
            &mut self.world,
            &self.config,
            &mut self.ids,
            Position::new(x, y),
        )?;
        self.score.interceptors_fired += volley.interceptors.len() as u32;
        log::debug!(
            "volley from battery {}: {} interceptors toward ({x:.0}, {y:.0}), tracking {:?}",
            volley.battery,
            volley.interceptors.len(),
            volley.tracking
        );
        self.publish();
        Ok(volley)
    }

    /// Request a run status transition. Returns false if the transition is
    /// not allowed from the current status.
    ///
    /// Entering `Start` resets the whole game. `Won` and `Lost` can only be
    /// left by returning to `Start`.
    pub fn set_status(&mut self, status: RunStatus) -> bool {
        if status == self.status {
            return false;
        }
        let allowed = match (self.status, status) {
            (_, RunStatus::Start) => true,
            (RunStatus::Start, RunStatus::Playing) => true,
            (RunStatus::Playing, RunStatus::Won | RunStatus::Lost) => true,
            _ => false,
        };
        if !allowed {
            log::debug!("ignored status change {:?} -> {:?}", self.status, status);
            return false;
        }

        let from = self.status;
        self.status = status;
        log::info!("status {from:?} -> {status:?} (score {})", self.score.score);
        self.notifications
            .push(Notification::StatusChanged { from, to: status });

        if status == RunStatus::Start {
            self.reset_game();
        }
        self.publish();
        true
    }

    /// Discard the current game and prepare a fresh one at level 1.
    /// Any pending level start from the discarded game is invalidated.
    pub fn reset_game(&mut self) {
        self.epoch += 1;
        self.world = World::new();
        world_setup::setup_game(&mut self.world, &self.config);
        self.level = LevelState::default();
        self.score = ScoreState::default();
        self.combo = ComboState::default();
        self.scheduled_start = None;
        self.despawn_buffer.clear();

        systems::level::start_level(
            &mut self.world,
            &mut self.level,
            &mut self.combo,
            &self.config,
            self.difficulty,
            &mut self.notifications,
        );
        log::info!(
            "game reset (difficulty {}, epoch {})",
            self.difficulty.as_str(),
            self.epoch
        );
    }

    /// Take the notifications raised since the last tick or drain.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Snapshot of the current state without advancing or draining.
    pub fn snapshot(&self) -> GameStateSnapshot {
        self.build_snapshot(self.notifications.clone())
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score.score
    }

    /// Current 1-based level number.
    pub fn level(&self) -> u32 {
        self.level.number
    }

    /// Ammo per battery in fixed battery order.
    pub fn ammo(&self) -> Vec<u32> {
        world_setup::batteries_in_order(&self.world)
            .into_iter()
            .map(|(battery, _)| battery.ammo)
            .collect()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Run statistics (kills, impacts, interceptors fired).
    pub fn stats(&self) -> &ScoreState {
        &self.score
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Spawn a threat aimed at `target` (for testing).
    #[cfg(test)]
    pub fn spawn_test_threat(&mut self, origin: Position, target: Position, speed: f64) -> u32 {
        world_setup::spawn_threat(&mut self.world, &mut self.ids, origin, target, speed)
    }

    /// Spawn an explosion at `center` (for testing).
    #[cfg(test)]
    pub fn spawn_test_explosion(&mut self, center: Position) -> u32 {
        world_setup::spawn_explosion(&mut self.world, &mut self.ids, center, &self.config)
    }

    /// Mark a battery destroyed (for testing).
    #[cfg(test)]
    pub fn destroy_battery(&mut self, index: usize) {
        for (_entity, battery) in self.world.query_mut::<&mut orson_core::components::Battery>() {
            if battery.index == index {
                battery.destroyed = true;
            }
        }
    }

    /// Overwrite a battery's ammo (for testing).
    #[cfg(test)]
    pub fn set_ammo(&mut self, index: usize, ammo: u32) {
        for (_entity, battery) in self.world.query_mut::<&mut orson_core::components::Battery>() {
            if battery.index == index {
                battery.ammo = ammo;
            }
        }
    }

    #[cfg(test)]
    pub fn set_score(&mut self, score: u32) {
        self.score.score = score;
    }

    #[cfg(test)]
    pub fn level_state(&self) -> &LevelState {
        &self.level
    }

    #[cfg(test)]
    pub fn level_state_mut(&mut self) -> &mut LevelState {
        &mut self.level
    }

    #[cfg(test)]
    pub fn scheduled_start(&self) -> Option<ScheduledLevelStart> {
        self.scheduled_start
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartMission => {
                self.set_status(RunStatus::Playing);
            }
            PlayerCommand::ReturnToMenu => {
                self.set_status(RunStatus::Start);
            }
            PlayerCommand::SetDifficulty { difficulty } => {
                if self.status == RunStatus::Start {
                    self.difficulty = difficulty;
                    self.reset_game();
                } else {
                    log::debug!("difficulty change ignored while {:?}", self.status);
                }
            }
            PlayerCommand::Fire { x, y } => {
                if let Err(reason) = self.fire(x, y) {
                    log::debug!("click at ({x:.0}, {y:.0}) rejected: {reason}");
                }
            }
        }
    }

    /// Run all systems in order for one frame.
    fn run_systems(&mut self, now: f64) {
        // 1. Deferred level start
        self.poll_scheduled_start(now);

        // 2. Spawning
        if let Some(id) = systems::spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.level,
            &self.config,
            &mut self.ids,
            now,
        ) {
            log::debug!(
                "threat {id} spawned ({}/{})",
                self.level.spawned,
                self.level.quota
            );
        }

        // 3. Threat motion and impacts
        for arrival in systems::movement::advance_threats(&mut self.world) {
            systems::impact::resolve(
                &mut self.world,
                arrival.point,
                self.config.impact_tolerance,
                &mut self.notifications,
            );
            self.combo.reset();
            self.score.threats_impacted += 1;
        }

        // Loss takes precedence over a win reached later in the frame.
        if systems::level::destroyed_batteries(&self.world) >= self.config.loss_destroyed_batteries
        {
            self.set_status(RunStatus::Lost);
        }

        // 4. Interceptor motion and detonation
        systems::movement::advance_interceptors(&mut self.world, &self.config, &mut self.ids);

        // 5. Explosions and kills
        let kills = systems::collision::run(
            &mut self.world,
            &mut self.score,
            &mut self.combo,
            &self.config,
            now,
            &mut self.notifications,
        );
        if kills > 0 {
            self.check_win();
        }

        // 6. Level end
        if self.status == RunStatus::Playing
            && systems::level::level_complete(&self.world, &self.level)
        {
            self.finish_level(now);
        }

        // 7. Combo banner expiry
        self.combo.expire(now, self.config.combo_message_duration);

        // 8. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }

    fn finish_level(&mut self, now: f64) {
        let bonus = systems::level::end_level(&self.world, &mut self.level, &self.config);
        self.score.score += bonus;
        self.notifications.push(Notification::LevelCompleted {
            level: self.level.number,
            ammo_bonus: bonus,
        });
        log::info!(
            "level {} complete: ammo bonus {bonus}, score {}",
            self.level.number,
            self.score.score
        );

        self.check_win();
        if self.status == RunStatus::Playing {
            self.level.number += 1;
            self.scheduled_start = Some(ScheduledLevelStart {
                fire_at: now + self.config.level_start_delay,
                epoch: self.epoch,
            });
        }
    }

    fn poll_scheduled_start(&mut self, now: f64) {
        let Some(pending) = self.scheduled_start else {
            return;
        };
        if pending.epoch != self.epoch {
            self.scheduled_start = None;
            return;
        }
        if now < pending.fire_at {
            return;
        }
        self.scheduled_start = None;
        systems::level::start_level(
            &mut self.world,
            &mut self.level,
            &mut self.combo,
            &self.config,
            self.difficulty,
            &mut self.notifications,
        );
    }

    fn check_win(&mut self) {
        if self.score.score >= self.config.win_score {
            self.set_status(RunStatus::Won);
        }
    }

    fn publish(&mut self) {
        let ammo = self.ammo();
        self.publisher
            .publish(self.score.score, ammo, self.level.number, &mut self.notifications);
    }

    fn build_snapshot(&self, notifications: Vec<Notification>) -> GameStateSnapshot {
        let ctx = SnapshotContext {
            time: self.time,
            status: self.status,
            difficulty: self.difficulty,
            level: &self.level,
            score: self.score.score,
            combo: &self.combo,
        };
        systems::snapshot::build_snapshot(&self.world, &ctx, notifications)
    }
}
