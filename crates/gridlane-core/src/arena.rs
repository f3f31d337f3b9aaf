//! Storage for everything on the board except the actor.
//!
//! The [`SlotArena`] owns a fixed number of [`EntitySlot`]s, allocated once
//! per episode and reused across spawns, plus the live player shots.
//!
//! # Ordering
//!
//! Slots are kept in a `Vec` in lane order (top lane first, then slot order
//! within a lane). Every pass over the slots uses this order, which is what
//! makes collision tie-breaks deterministic: when two slots could touch the
//! actor in the same tick, the lower index is resolved first.

use rand::Rng;
use serde::{Deserialize, Serialize};

use tessera::{Cell, GridSize};

use crate::difficulty::DifficultyRamp;
use crate::entity::{Capabilities, Direction, EntitySlot};
use crate::rules::{InitialFill, Ruleset};
use crate::spawner::Spawner;

/// A projectile fired by the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerShot {
    /// Current cell
    pub cell: Cell,
    /// Travel direction
    pub direction: Direction,
}

/// Entity slots and player shots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotArena {
    pub(crate) slots: Vec<EntitySlot>,
    pub(crate) shots: Vec<PlayerShot>,
}

impl SlotArena {
    /// Allocate and fill the slots for a fresh episode.
    ///
    /// [`InitialFill::Populated`] puts every slot on the board at a random
    /// column; [`InitialFill::Staggered`] starts every slot cooling with a
    /// cooldown drawn below the ramp's current cooldown.
    pub fn fill<R: Rng + ?Sized>(
        ruleset: &Ruleset,
        grid: GridSize,
        spawner: &Spawner,
        ramp: &DifficultyRamp,
        rng: &mut R,
    ) -> Self {
        let slots = (0..ruleset.slot_count(grid))
            .map(|index| {
                let row = ruleset.slot_row(index);
                match ruleset.initial_fill {
                    InitialFill::Populated => {
                        EntitySlot::active(row, spawner.draw_anywhere(rng, ramp.speed_bound()))
                    }
                    InitialFill::Staggered => {
                        let cooldown = match ramp.cooldown() {
                            0 => 0,
                            n => rng.gen_range(0..n),
                        };
                        EntitySlot::cooling(row, cooldown)
                    }
                }
            })
            .collect();
        Self {
            slots,
            shots: Vec::new(),
        }
    }

    /// An arena with explicit slots and no shots.
    #[must_use]
    pub fn from_slots(slots: Vec<EntitySlot>) -> Self {
        Self {
            slots,
            shots: Vec::new(),
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the arena has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in resolution order.
    #[must_use]
    pub fn slots(&self) -> &[EntitySlot] {
        &self.slots
    }

    /// A slot by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&EntitySlot> {
        self.slots.get(index)
    }

    /// Live player shots.
    #[must_use]
    pub fn shots(&self) -> &[PlayerShot] {
        &self.shots
    }

    /// Number of slots on the board.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    /// First active slot at `cell` whose kind player shots can destroy.
    #[must_use]
    pub fn shootable_at(&self, cell: Cell, ruleset: &Ruleset) -> Option<usize> {
        self.slots.iter().position(|slot| {
            slot.cell() == Some(cell)
                && slot
                    .mover()
                    .is_some_and(|m| ruleset.kind(m.kind).can(Capabilities::SHOOTABLE))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::KindId;
    use crate::spawner::{KindTable, SpawnDraw};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn spawner(grid: GridSize, weights: &[f64]) -> Spawner {
        Spawner::new(grid, 2, KindTable::new(weights).unwrap())
    }

    #[test]
    fn populated_fill_puts_every_slot_on_board() {
        let rules = Ruleset::asterix();
        let grid = GridSize::new(10, 10);
        let ramp = DifficultyRamp::new(0, 3, 7, None);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let arena = SlotArena::fill(&rules, grid, &spawner(grid, &[0.5, 0.5]), &ramp, &mut rng);
        assert_eq!(arena.len(), 8);
        assert_eq!(arena.active_count(), 8);
        let rows: Vec<usize> = arena.slots().iter().map(EntitySlot::row).collect();
        assert_eq!(rows, (1..9).collect::<Vec<_>>());
    }

    #[test]
    fn staggered_fill_starts_cooling_below_cooldown() {
        let rules = Ruleset::seaquest();
        let grid = GridSize::new(10, 10);
        let ramp = DifficultyRamp::new(-2, 3, 7, None);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let arena = SlotArena::fill(
            &rules,
            grid,
            &spawner(grid, &[0.5, 0.15, 0.35]),
            &ramp,
            &mut rng,
        );
        assert_eq!(arena.active_count(), 0);
        assert!(arena.slots().iter().all(|s| s.cooldown().is_some_and(|c| c < 3)));
    }

    #[test]
    fn staggered_fill_with_zero_cooldown() {
        let rules = Ruleset::seaquest();
        let grid = GridSize::new(5, 5);
        let ramp = DifficultyRamp::new(-2, 0, 2, None);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let arena = SlotArena::fill(&rules, grid, &spawner(grid, &[1.0, 0.0, 0.0]), &ramp, &mut rng);
        assert!(arena.slots().iter().all(|s| s.cooldown() == Some(0)));
    }

    #[test]
    fn shootable_lookup_skips_divers() {
        let rules = Ruleset::seaquest();
        let draw = |col, kind| SpawnDraw {
            col,
            direction: Direction::Left,
            speed: 0,
            kind: KindId::new(kind),
        };
        let arena = SlotArena::from_slots(vec![
            EntitySlot::active(1, draw(4, 2)),
            EntitySlot::active(2, draw(4, 0)),
        ]);
        assert_eq!(arena.shootable_at(Cell::new(1, 4), &rules), None);
        assert_eq!(arena.shootable_at(Cell::new(2, 4), &rules), Some(1));
        assert_eq!(arena.shootable_at(Cell::new(2, 5), &rules), None);
    }
}
