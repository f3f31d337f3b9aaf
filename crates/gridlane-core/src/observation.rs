//! Rendering engine state into a [`BoardState`].
//!
//! Values on entity channels are signed by travel direction. An entity's own
//! cell holds `±1`; the cells behind it (its trail) hold
//! `±fraction(timer, speed)`, so a slow entity's trail brightens as it gets
//! closer to its next move. Fast entities leave a trail as long as their speed;
//! every other entity leaves a one-cell trail. Projectiles have no trail.
//!
//! Writes happen in a fixed order and later writes win: actor, player shots,
//! then slots in resolution order (shot, body, trail).

use tessera::{BoardState, Cell, GridSize};

use crate::arena::SlotArena;
use crate::collision::Actor;
use crate::entity::Capabilities;
use crate::rules::{Ruleset, ACTOR_CHANNEL};
use crate::speed::SpeedModel;

/// Borrowed view of everything an observation is drawn from.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// Game being drawn
    pub ruleset: &'a Ruleset,
    /// Progress table for trails
    pub speed: &'a SpeedModel,
    /// The actor
    pub actor: &'a Actor,
    /// Slots and player shots
    pub arena: &'a SlotArena,
}

impl Scene<'_> {
    /// Encode onto a fresh board.
    #[must_use]
    pub fn encode(&self, grid: GridSize) -> BoardState {
        let mut board = BoardState::new(grid, self.ruleset.channels.clone());
        self.encode_into(&mut board);
        board
    }

    /// Encode into an existing board, clearing it first.
    pub fn encode_into(&self, board: &mut BoardState) {
        board.clear();
        let grid = board.size();

        let value = if self.actor.length >= 2 {
            self.actor.facing.sign()
        } else {
            1.0
        };
        for cell in self.actor.body() {
            board.set(cell, ACTOR_CHANNEL, value);
        }

        if let Some(projectile) = self.ruleset.player_projectile {
            for shot in self.arena.shots() {
                board.set(shot.cell, projectile.channel, shot.direction.sign());
            }
        }

        for slot in self.arena.slots() {
            let Some(mover) = slot.mover() else {
                continue;
            };
            let kind = self.ruleset.kind(mover.kind);
            let sign = mover.direction.sign();
            let row = slot.row();

            if let Some(col) = mover.shot {
                board.set(Cell::new(row, col), kind.channel, sign);
            }
            board.set(Cell::new(row, mover.col), kind.channel, sign);

            if kind.can(Capabilities::IS_PROJECTILE) {
                continue;
            }
            let trail = sign * self.speed.fraction(mover.timer, mover.speed);
            let behind = mover.direction.reversed();
            let length = SpeedModel::advance_steps(mover.speed) as usize;
            for step in 1..=length {
                let Some(col) = behind.advance(mover.col, step, grid) else {
                    break;
                };
                board.set(Cell::new(row, col), kind.channel, trail);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::PlayerShot;
    use crate::entity::{Direction, EntitySlot, KindId};
    use crate::spawner::SpawnDraw;

    fn draw(col: usize, direction: Direction, speed: i32, kind: u8) -> SpawnDraw {
        SpawnDraw {
            col,
            direction,
            speed,
            kind: KindId::new(kind),
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn actor_and_slow_trail() {
        let rules = Ruleset::asterix();
        let grid = GridSize::new(10, 10);
        let speed = SpeedModel::new(-2);
        let actor = Actor::new(Cell::new(9, 5), Direction::Right, 1);
        let arena = SlotArena::from_slots(vec![
            EntitySlot::active(1, draw(4, Direction::Left, -2, 0)),
            EntitySlot::cooling(2, 3),
        ]);
        let board = Scene {
            ruleset: &rules,
            speed: &speed,
            actor: &actor,
            arena: &arena,
        }
        .encode(grid);

        assert_eq!(board.nonzero_count(0), 1);
        assert!(approx(board.get(Cell::new(9, 5), 0), 1.0));
        assert!(approx(board.get(Cell::new(1, 4), 1), -1.0));
        // Fresh slow entity: timer 0, speed -2 reads the smallest bin
        assert!(approx(board.get(Cell::new(1, 5), 1), -1.0 / 3.0));
        assert_eq!(board.nonzero_count(1), 2);
        assert_eq!(board.nonzero_count(2), 0);
    }

    #[test]
    fn fast_trail_is_speed_long_and_clipped() {
        let rules = Ruleset::asterix();
        let grid = GridSize::new(10, 10);
        let speed = SpeedModel::new(0);
        let actor = Actor::new(Cell::new(9, 5), Direction::Right, 1);
        let arena = SlotArena::from_slots(vec![
            EntitySlot::active(1, draw(5, Direction::Right, 3, 1)),
            EntitySlot::active(2, draw(1, Direction::Right, 3, 1)),
        ]);
        let board = Scene {
            ruleset: &rules,
            speed: &speed,
            actor: &actor,
            arena: &arena,
        }
        .encode(grid);

        for col in 2..=4 {
            assert!(approx(board.get(Cell::new(1, col), 2), 1.0));
        }
        // Second entity's trail stops at the board edge
        assert!(approx(board.get(Cell::new(2, 0), 2), 1.0));
        assert_eq!(board.nonzero_count(2), 4 + 2);
    }

    #[test]
    fn two_cell_actor_shots_and_turret_shot() {
        let rules = Ruleset::seaquest();
        let grid = GridSize::new(10, 10);
        let speed = SpeedModel::new(-4);
        let actor = Actor::new(Cell::new(8, 4), Direction::Left, 2);
        let mut slot = EntitySlot::active(3, draw(6, Direction::Left, 0, 1));
        if let Some(mover) = slot.mover_mut() {
            mover.shot = Some(5);
        }
        let mut arena = SlotArena::from_slots(vec![slot]);
        arena.shots.push(PlayerShot {
            cell: Cell::new(8, 2),
            direction: Direction::Left,
        });
        let board = Scene {
            ruleset: &rules,
            speed: &speed,
            actor: &actor,
            arena: &arena,
        }
        .encode(grid);

        assert!(approx(board.get(Cell::new(8, 4), 0), -1.0));
        assert!(approx(board.get(Cell::new(8, 5), 0), -1.0));
        assert!(approx(board.get(Cell::new(8, 2), 0), -1.0));
        assert_eq!(board.nonzero_count(0), 3);
        assert!(approx(board.get(Cell::new(3, 6), 2), -1.0));
        // Trail overwrites nothing here; turret shot sits ahead of the body
        assert!(approx(board.get(Cell::new(3, 5), 2), -1.0));
        assert!(approx(board.get(Cell::new(3, 7), 2), -1.0));
    }

    #[test]
    fn projectile_kinds_have_no_trail() {
        let mut rules = Ruleset::asterix();
        rules.kinds[0].capabilities |= Capabilities::IS_PROJECTILE;
        let grid = GridSize::new(5, 5);
        let speed = SpeedModel::new(0);
        let actor = Actor::new(Cell::new(4, 2), Direction::Right, 1);
        let arena = SlotArena::from_slots(vec![EntitySlot::active(1, draw(3, Direction::Right, 1, 0))]);
        let board = Scene {
            ruleset: &rules,
            speed: &speed,
            actor: &actor,
            arena: &arena,
        }
        .encode(grid);
        assert_eq!(board.nonzero_count(1), 1);
    }
}
