//! The tick engine.
//!
//! [`Engine`] owns one episode of one game: the actor, the slot arena, the
//! difficulty ramp and the seeded generator every random draw comes from.
//!
//! # Tick order
//!
//! Each [`Engine::step`] runs the same phases:
//!
//! 1. **Validate**: the action id is checked before anything changes.
//! 2. **Shots**: live player shots advance and destroy what they reach.
//! 3. **Actor**: the pre-move cell is recorded, then the action is applied.
//! 4. **Slots**: every slot, in order, either ticks its cooldown (respawning
//!    when it expires), or fires/advances its turret shot and then waits or
//!    moves cell by cell. The first contact with the actor ends this phase.
//! 5. **Difficulty**: a lethal contact resets the level and refills the board;
//!    otherwise the elapsed-tick trigger may level up.
//! 6. **Observe**: the board is encoded.
//!
//! # Determinism
//!
//! Given the same ruleset, config, seed and action sequence, every observation
//! and event is identical across runs. All randomness comes from a single
//! `ChaCha8Rng` seeded on reset; slots are visited in a fixed order.
//!
//! # Example
//!
//! ```
//! use gridlane_core::engine::Engine;
//! use gridlane_core::rules::Ruleset;
//! use tessera::GridSize;
//!
//! let rules = Ruleset::asterix();
//! let config = rules.default_config(GridSize::new(10, 10));
//! let mut engine = Engine::new(rules, config, 42).unwrap();
//!
//! for _ in 0..10 {
//!     let outcome = engine.step(0).unwrap();
//!     assert_eq!(outcome.board.nonzero_count(0), 1);
//! }
//! assert_eq!(engine.tick(), 10);
//! assert!(engine.step(5).is_err()); // asterix has no Shoot
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use tessera::{BoardState, Cell};

use crate::action::Action;
use crate::arena::{PlayerShot, SlotArena};
use crate::collision::{contact_outcome, Actor, ContactOutcome};
use crate::config::EngineConfig;
use crate::difficulty::DifficultyRamp;
use crate::entity::{Capabilities, Direction};
use crate::error::{ConfigError, StepError};
use crate::event::{CollisionEvent, LevelChange, StepOutcome};
use crate::observation::Scene;
use crate::rules::Ruleset;
use crate::spawner::{KindTable, Spawner};
use crate::speed::SpeedModel;

// =============================================================================
// Engine
// =============================================================================

/// One running game.
#[derive(Debug, Clone)]
pub struct Engine {
    ruleset: Ruleset,
    config: EngineConfig,
    speed: SpeedModel,
    spawner: Spawner,
    ramp: DifficultyRamp,
    rng: ChaCha8Rng,
    seed: u64,
    tick: u64,
    actor: Actor,
    arena: SlotArena,
    shoot_timer: u32,
}

/// Config-derived components, built together so a bad config changes nothing.
struct Parts {
    speed: SpeedModel,
    spawner: Spawner,
    ramp: DifficultyRamp,
}

impl Parts {
    fn build(ruleset: &Ruleset, config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate(ruleset)?;
        let weights = config.kind_weights(ruleset)?;
        let kinds = KindTable::new(&weights)
            .ok_or_else(|| ConfigError::WeightsDoNotSum(weights.iter().sum()))?;
        Ok(Self {
            speed: SpeedModel::new(config.slowest_speed()),
            spawner: Spawner::new(config.grid, config.speed_range, kinds),
            ramp: DifficultyRamp::new(
                config.base_speed,
                config.spawn_cooldown,
                config.resolved_max_speed(),
                config.level_up_interval,
            ),
        })
    }
}

impl Engine {
    /// Creates an engine and resets it with `seed`.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if `config` cannot run `ruleset`.
    pub fn new(ruleset: Ruleset, config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        let Parts {
            speed,
            spawner,
            ramp,
        } = Parts::build(&ruleset, &config)?;
        let mut engine = Self {
            ruleset,
            config,
            speed,
            spawner,
            ramp,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            tick: 0,
            actor: Actor::new(Cell::new(0, 0), Direction::Right, 1),
            arena: SlotArena::from_slots(Vec::new()),
            shoot_timer: 0,
        };
        engine.reset(seed);
        Ok(engine)
    }

    /// Start a new episode from `seed`.
    ///
    /// Resetting twice with the same seed yields identical state.
    pub fn reset(&mut self, seed: u64) -> BoardState {
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.tick = 0;
        self.ramp.level_reset();
        self.repopulate();
        debug!(game = %self.ruleset.name, seed, slots = self.arena.len(), "reset");
        self.observe()
    }

    /// Swap in a new config and start a new episode.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] and leaves the engine untouched if `config`
    /// cannot run this engine's ruleset.
    pub fn reset_with_config(&mut self, seed: u64, config: EngineConfig) -> Result<BoardState, ConfigError> {
        let Parts {
            speed,
            spawner,
            ramp,
        } = Parts::build(&self.ruleset, &config)?;
        self.config = config;
        self.speed = speed;
        self.spawner = spawner;
        self.ramp = ramp;
        Ok(self.reset(seed))
    }

    /// Check that `id` is an action this game accepts.
    ///
    /// # Errors
    /// Returns a [`StepError`] for unknown ids and for actions outside the
    /// ruleset's action set.
    pub fn parse_action(&self, id: u8) -> Result<Action, StepError> {
        let action = Action::try_from(id)?;
        if !self.ruleset.actions.allows(action) {
            return Err(StepError::ActionNotAllowed {
                action,
                game: self.ruleset.name.clone(),
            });
        }
        Ok(action)
    }

    /// Advance one tick.
    ///
    /// # Errors
    /// Returns a [`StepError`] for an invalid action; the engine is not
    /// modified in that case.
    pub fn step(&mut self, action_id: u8) -> Result<StepOutcome, StepError> {
        let action = self.parse_action(action_id)?;

        self.tick += 1;
        self.shoot_timer = self.shoot_timer.saturating_sub(1);
        let mut events = Vec::new();

        self.advance_player_shots(&mut events);

        self.actor.begin_tick();
        self.apply_action(action, &mut events);

        let terminated = self.advance_slots(action.is_lateral(), &mut events);

        let level = if terminated {
            debug!(tick = self.tick, level = self.ramp.level(), "actor killed, restarting level");
            self.level_reset();
            self.repopulate();
            Some(LevelChange::Reset)
        } else if self.ramp.on_tick() {
            Some(LevelChange::Up {
                level: self.ramp.level(),
            })
        } else {
            None
        };

        Ok(StepOutcome {
            board: self.observe(),
            events,
            terminated,
            level,
            tick: self.tick,
        })
    }

    /// Encode the current state.
    #[must_use]
    pub fn observe(&self) -> BoardState {
        Scene {
            ruleset: &self.ruleset,
            speed: &self.speed,
            actor: &self.actor,
            arena: &self.arena,
        }
        .encode(self.config.grid)
    }

    // =========================================================================
    // Rule-layer hooks
    // =========================================================================

    /// Raise the difficulty one level. Returns the new level.
    pub fn level_up(&mut self) -> u32 {
        self.ramp.level_up();
        self.ramp.level()
    }

    /// Return the difficulty to its initial level.
    ///
    /// Entities already on the board keep their speeds.
    pub fn level_reset(&mut self) {
        self.ramp.level_reset();
    }

    /// Take slot `index` off the board with the current cooldown.
    ///
    /// Returns `false` if there is no such slot or it is already cooling.
    pub fn despawn_slot(&mut self, index: usize) -> bool {
        match self.arena.slots.get_mut(index) {
            Some(slot) if slot.is_active() => {
                slot.despawn(self.ramp.cooldown());
                true
            }
            _ => false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The game being played.
    #[must_use]
    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    /// The active config.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ticks since the last reset.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Seed of the last reset.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The actor.
    #[must_use]
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Slots and player shots.
    #[must_use]
    pub fn arena(&self) -> &SlotArena {
        &self.arena
    }

    /// Difficulty state.
    #[must_use]
    pub fn ramp(&self) -> &DifficultyRamp {
        &self.ramp
    }

    /// Ticks until the actor may shoot again.
    #[must_use]
    pub fn shoot_timer(&self) -> u32 {
        self.shoot_timer
    }

    /// Hash of the full simulation state, for determinism checks.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        self.tick.hash(&mut hasher);
        self.actor.hash(&mut hasher);
        self.arena.hash(&mut hasher);
        self.ramp.hash(&mut hasher);
        self.shoot_timer.hash(&mut hasher);
        hasher.finish()
    }

    #[cfg(test)]
    pub(crate) fn arena_mut(&mut self) -> &mut SlotArena {
        &mut self.arena
    }

    #[cfg(test)]
    pub(crate) fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    // =========================================================================
    // Tick phases
    // =========================================================================

    /// Place a fresh actor and refill every slot.
    fn repopulate(&mut self) {
        self.shoot_timer = 0;
        self.actor = self.ruleset.actor.place(self.config.grid, &mut self.rng);
        self.arena = SlotArena::fill(
            &self.ruleset,
            self.config.grid,
            &self.spawner,
            &self.ramp,
            &mut self.rng,
        );
    }

    fn apply_action(&mut self, action: Action, events: &mut Vec<CollisionEvent>) {
        let grid = self.config.grid;
        match action {
            Action::Noop => {}
            Action::Left => self.actor.move_lateral(Direction::Left, grid),
            Action::Right => self.actor.move_lateral(Direction::Right, grid),
            Action::Up | Action::Down => {
                let Some((top, bottom)) = self.ruleset.actor.band(grid) else {
                    unreachable!("actor band outside validated grid {grid:?}");
                };
                self.actor.move_vertical(action == Action::Up, top, bottom);
            }
            Action::Shoot => self.fire(events),
        }
    }

    /// Fire a player shot from the cell ahead of the actor.
    ///
    /// A shot spawned onto a shootable entity destroys it immediately.
    fn fire(&mut self, events: &mut Vec<CollisionEvent>) {
        if self.shoot_timer > 0 {
            return;
        }
        self.shoot_timer = self.config.shoot_cooldown;
        let facing = self.actor.facing;
        let Some(col) = facing.advance(self.actor.cell.col, 1, self.config.grid) else {
            return;
        };
        let cell = Cell::new(self.actor.cell.row, col);
        if let Some(index) = self.arena.shootable_at(cell, &self.ruleset) {
            events.push(self.destroy(index));
            return;
        }
        trace!(row = cell.row, col, %facing, "player shot fired");
        self.arena.shots.push(PlayerShot {
            cell,
            direction: facing,
        });
    }

    fn advance_player_shots(&mut self, events: &mut Vec<CollisionEvent>) {
        let Some(projectile) = self.ruleset.player_projectile else {
            return;
        };
        let grid = self.config.grid;
        for mut shot in std::mem::take(&mut self.arena.shots) {
            let mut alive = true;
            for _ in 0..projectile.speed {
                let Some(col) = shot.direction.advance(shot.cell.col, 1, grid) else {
                    alive = false;
                    break;
                };
                shot.cell.col = col;
                if let Some(index) = self.arena.shootable_at(shot.cell, &self.ruleset) {
                    events.push(self.destroy(index));
                    alive = false;
                    break;
                }
            }
            if alive {
                self.arena.shots.push(shot);
            }
        }
    }

    /// Despawn slot `index` after a player shot reached it.
    fn destroy(&mut self, index: usize) -> CollisionEvent {
        let slot = &mut self.arena.slots[index];
        let Some(mover) = slot.mover() else {
            unreachable!("destroyed slot {index} is not on the board");
        };
        let cell = Cell::new(slot.row(), mover.col);
        let kind = mover.kind;
        slot.despawn(self.ramp.cooldown());
        trace!(slot = index, %kind, row = cell.row, col = cell.col, "destroyed");
        CollisionEvent {
            slot: index,
            kind,
            cell,
            outcome: ContactOutcome::Destroyed,
            by_shot: true,
        }
    }

    /// Run every slot in order. Returns `true` if the actor was killed.
    fn advance_slots(&mut self, lateral: bool, events: &mut Vec<CollisionEvent>) -> bool {
        for index in 0..self.arena.len() {
            let Some(event) = self.advance_slot(index, lateral, events) else {
                continue;
            };
            trace!(
                slot = index,
                kind = %event.kind,
                row = event.cell.row,
                col = event.cell.col,
                outcome = ?event.outcome,
                "contact"
            );
            if event.outcome == ContactOutcome::Collected {
                self.arena.slots[index].despawn(self.ramp.cooldown());
            }
            events.push(event);
            return event.outcome == ContactOutcome::Lethal;
        }
        false
    }

    /// Advance one slot. Returns the contact with the actor, if any.
    ///
    /// Shots destroying this slot's entity are pushed to `events` directly
    /// since they do not stop the slot loop.
    fn advance_slot(
        &mut self,
        index: usize,
        lateral: bool,
        events: &mut Vec<CollisionEvent>,
    ) -> Option<CollisionEvent> {
        let grid = self.config.grid;
        let cooldown = self.ramp.cooldown();
        let bound = self.ramp.speed_bound();
        let Self {
            ruleset,
            spawner,
            rng,
            arena,
            actor,
            ..
        } = self;
        let slot = &mut arena.slots[index];
        let row = slot.row();

        if !slot.is_active() {
            if !slot.try_tick_cooldown() {
                slot.respawn(spawner.draw(rng, bound));
            }
            return None;
        }
        let Some(mover) = slot.mover_mut() else {
            unreachable!("active slot {index} has no mover");
        };

        let kind = mover.kind;
        let caps = ruleset.kind(kind).capabilities;
        let direction = mover.direction;
        let contact = |col: usize, outcome: ContactOutcome, by_shot: bool| CollisionEvent {
            slot: index,
            kind,
            cell: Cell::new(row, col),
            outcome,
            by_shot,
        };
        let hits = |col: usize| actor.is_hit(Cell::new(row, col), lateral);

        // Turret shot: fire if none is live (and skip moving), else advance it
        if caps.contains(Capabilities::SHOOTS) {
            match mover.shot {
                None => {
                    if let Some(col) = direction.advance(mover.col, 1, grid) {
                        mover.shot = Some(col);
                        trace!(slot = index, row, col, "turret fired");
                        return hits(col).then(|| contact(col, ContactOutcome::Lethal, true));
                    }
                }
                Some(col) => {
                    let steps = mover.speed.max(0).unsigned_abs() as usize + 1;
                    let mut live = Some(col);
                    for _ in 0..steps {
                        live = live.and_then(|c| direction.advance(c, 1, grid));
                        let Some(col) = live else {
                            break;
                        };
                        if hits(col) {
                            mover.shot = live;
                            return Some(contact(col, ContactOutcome::Lethal, true));
                        }
                    }
                    mover.shot = live;
                }
            }
        }

        if SpeedModel::is_delaying(mover.speed, mover.timer) {
            mover.timer = SpeedModel::tick_timer(mover.timer);
            if hits(mover.col) {
                return contact_outcome(caps).map(|outcome| contact(mover.col, outcome, false));
            }
            return None;
        }

        mover.timer = 0;
        for _ in 0..SpeedModel::advance_steps(mover.speed) {
            let Some(col) = direction.advance(mover.col, 1, grid) else {
                slot.despawn(cooldown);
                return None;
            };
            mover.col = col;
            if hits(col) {
                if let Some(outcome) = contact_outcome(caps) {
                    return Some(contact(col, outcome, false));
                }
            }
            if caps.contains(Capabilities::SHOOTABLE) {
                let cell = Cell::new(row, col);
                if let Some(shot) = arena.shots.iter().position(|s| s.cell == cell) {
                    arena.shots.remove(shot);
                    slot.despawn(cooldown);
                    trace!(slot = index, %kind, row, col, "destroyed");
                    events.push(contact(col, ContactOutcome::Destroyed, true));
                    return None;
                }
            }
        }
        None
    }
}

// =============================================================================
// Tests
// =============================================================================
