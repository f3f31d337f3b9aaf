//! Test helper functions for setting up engines and placing entities.
//!
//! Scenario tests start from a "quiet" engine, where every slot is parked on a
//! long cooldown, and then place exactly the entities they need.

use tessera::{Cell, GridSize};

use crate::collision::Actor;
use crate::engine::Engine;
use crate::entity::{Direction, EntitySlot, KindId};
use crate::rules::Ruleset;
use crate::spawner::SpawnDraw;

/// Cooldown long enough that parked slots never respawn during a test.
pub const QUIET_COOLDOWN: u32 = 10_000;

// =============================================================================
// Engine Setup
// =============================================================================

/// A 10x10 engine with the ruleset's default config.
pub fn engine(ruleset: Ruleset, seed: u64) -> Engine {
    let config = ruleset.default_config(GridSize::new(10, 10));
    Engine::new(ruleset, config, seed).expect("preset config is valid")
}

/// A 10x10 engine with every slot parked off the board.
pub fn quiet_engine(ruleset: Ruleset, seed: u64) -> Engine {
    let mut engine = engine(ruleset, seed);
    for slot in &mut engine.arena_mut().slots {
        *slot = EntitySlot::cooling(slot.row(), QUIET_COOLDOWN);
    }
    engine
}

// =============================================================================
// Placement
// =============================================================================

/// Slot index of the `nth` slot in lane `row`.
pub fn slot_index(engine: &Engine, row: usize, nth: usize) -> usize {
    (row - 1) * engine.ruleset().slots_per_lane + nth
}

/// Put an entity on the board in slot `index`.
pub fn place(engine: &mut Engine, index: usize, col: usize, direction: Direction, speed: i32, kind: u8) {
    let slot = &mut engine.arena_mut().slots[index];
    *slot = EntitySlot::active(
        slot.row(),
        SpawnDraw {
            col,
            direction,
            speed,
            kind: KindId::new(kind),
        },
    );
}

/// Move the actor, keeping its length.
pub fn place_actor(engine: &mut Engine, cell: Cell, facing: Direction) {
    let actor = engine.actor_mut();
    *actor = Actor::new(cell, facing, actor.length);
}

/// Column of slot `index`, if active.
pub fn col_of(engine: &Engine, index: usize) -> Option<usize> {
    engine.arena().get(index).and_then(EntitySlot::col)
}

/// Step `n` times with the same action, returning the last outcome's tick.
pub fn step_n(engine: &mut Engine, action: u8, n: usize) -> u64 {
    let mut tick = engine.tick();
    for _ in 0..n {
        tick = engine.step(action).expect("valid action").tick;
    }
    tick
}
