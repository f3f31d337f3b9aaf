//! Game variants described as data.
//!
//! A [`Ruleset`] tells the engine everything that differs between games:
//! which channels the observation has, which entity kinds exist and what
//! they can do, which actions are legal, how the actor is shaped and placed,
//! and how a fresh board is filled. The engine has no per-game branches.
//!
//! # Presets
//!
//! - [`Ruleset::asterix`]: collect treasures, dodge enemies, every lane starts
//!   populated and difficulty rises every 100 ticks.
//! - [`Ruleset::seaquest`]: a two-cell submarine that shoots fish and enemy
//!   submarines (which shoot back) and collects divers; lanes fill gradually.
//!
//! # Lanes
//!
//! The first and last rows never hold entities. Every row in between is a
//! lane with `slots_per_lane` slots, visited in row order and then slot order.

use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use tessera::{Cell, ChannelId, ChannelSpec, GridSize};

use crate::action::ActionSet;
use crate::collision::Actor;
use crate::config::EngineConfig;
use crate::entity::{Capabilities, Direction, EntityKind, KindId};

/// Where the actor's head starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartColumn {
    /// Middle column, facing right
    Center,
    /// Random facing and a random column that keeps the body on the board
    Random,
}

/// Shape, placement and movement band of the actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSpec {
    /// Body length in cells (1 or 2)
    pub length: usize,
    /// Start row, counted up from the bottom row
    pub start_from_bottom: usize,
    /// Start column rule
    pub start_col: StartColumn,
    /// Rows below the movement band that the actor may not enter
    pub bottom_margin: usize,
}

impl ActorSpec {
    /// Movement band as `(top, bottom)` rows, if it fits the grid.
    #[must_use]
    pub fn band(&self, grid: GridSize) -> Option<(usize, usize)> {
        let bottom = grid.last_row().checked_sub(self.bottom_margin)?;
        Some((0, bottom))
    }

    /// Start row, if it fits the grid.
    #[must_use]
    pub fn start_row(&self, grid: GridSize) -> Option<usize> {
        grid.last_row().checked_sub(self.start_from_bottom)
    }

    /// Place a fresh actor.
    ///
    /// # Panics
    /// Panics if the actor does not fit the grid. Configs are validated before
    /// an engine ever places an actor.
    pub fn place<R: Rng + ?Sized>(&self, grid: GridSize, rng: &mut R) -> Actor {
        let row = self
            .start_row(grid)
            .unwrap_or_else(|| unreachable!("actor start row outside {grid:?}"));
        let (col, facing) = match self.start_col {
            StartColumn::Center => (grid.cols / 2, Direction::Right),
            StartColumn::Random => {
                let facing = if rng.gen_bool(0.5) {
                    Direction::Right
                } else {
                    Direction::Left
                };
                let tail_room = self.length.saturating_sub(1);
                let col = match facing {
                    Direction::Right => rng.gen_range(tail_room..grid.cols),
                    Direction::Left => rng.gen_range(0..grid.cols - tail_room),
                };
                (col, facing)
            }
        };
        Actor::new(Cell::new(row, col), facing, self.length)
    }
}

/// How lanes are filled on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitialFill {
    /// Every slot starts on the board at a random column
    Populated,
    /// Every slot starts cooling with a random cooldown below `spawn_cooldown`
    Staggered,
}

/// Player projectiles fired with the Shoot action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    /// Cells advanced per tick
    pub speed: usize,
    /// Observation channel
    pub channel: ChannelId,
}

/// Default tuning constants of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuning {
    /// Initial upper speed bound
    pub base_speed: i32,
    /// Spread of drawn speeds below the bound
    pub speed_range: i32,
    /// Initial respawn cooldown
    pub spawn_cooldown: u32,
    /// Ticks between player shots
    pub shoot_cooldown: u32,
    /// Ticks between automatic level-ups
    pub level_up_interval: Option<u32>,
}

/// A game variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    /// Game name
    pub name: String,
    /// Observation channels; channel 0 is the actor
    pub channels: Vec<ChannelSpec>,
    /// Entity kinds, indexed by [`KindId`]
    pub kinds: Vec<EntityKind>,
    /// Legal actions
    pub actions: ActionSet,
    /// Actor description
    pub actor: ActorSpec,
    /// Fill rule on reset
    pub initial_fill: InitialFill,
    /// Slots in each lane
    pub slots_per_lane: usize,
    /// Player projectile, if the game has shooting
    pub player_projectile: Option<ProjectileSpec>,
    /// Default tuning
    pub tuning: Tuning,
}

/// Channel the actor is drawn on.
pub const ACTOR_CHANNEL: ChannelId = 0;

impl Ruleset {
    /// Collect treasures while avoiding enemies.
    #[must_use]
    pub fn asterix() -> Self {
        Self {
            name: "asterix".to_string(),
            channels: vec![
                ChannelSpec::unit("player"),
                ChannelSpec::signed("enemy"),
                ChannelSpec::signed("treasure"),
            ],
            kinds: vec![
                EntityKind::new("enemy", 1, 2.0 / 3.0, Capabilities::BLOCKS_PLAYER),
                EntityKind::new("treasure", 2, 1.0 / 3.0, Capabilities::COLLECTIBLE),
            ],
            actions: ActionSet::MOVE,
            actor: ActorSpec {
                length: 1,
                start_from_bottom: 0,
                start_col: StartColumn::Center,
                bottom_margin: 0,
            },
            initial_fill: InitialFill::Populated,
            slots_per_lane: 1,
            player_projectile: None,
            tuning: Tuning {
                base_speed: 0,
                speed_range: 2,
                spawn_cooldown: 3,
                shoot_cooldown: 0,
                level_up_interval: Some(100),
            },
        }
    }

    /// Shoot fish and submarines, collect divers.
    #[must_use]
    pub fn seaquest() -> Self {
        let hostile = Capabilities::BLOCKS_PLAYER | Capabilities::SHOOTABLE;
        Self {
            name: "seaquest".to_string(),
            channels: vec![
                ChannelSpec::signed("player"),
                ChannelSpec::signed("fish"),
                ChannelSpec::signed("submarine"),
                ChannelSpec::signed("diver"),
            ],
            kinds: vec![
                EntityKind::new("fish", 1, 0.5, hostile),
                EntityKind::new("submarine", 2, 0.15, hostile | Capabilities::SHOOTS),
                EntityKind::new("diver", 3, 0.35, Capabilities::COLLECTIBLE),
            ],
            actions: ActionSet::MOVE | ActionSet::SHOOT,
            actor: ActorSpec {
                length: 2,
                start_from_bottom: 1,
                start_col: StartColumn::Random,
                bottom_margin: 1,
            },
            initial_fill: InitialFill::Staggered,
            slots_per_lane: 1,
            player_projectile: Some(ProjectileSpec {
                speed: 2,
                channel: ACTOR_CHANNEL,
            }),
            tuning: Tuning {
                base_speed: -2,
                speed_range: 2,
                spawn_cooldown: 3,
                shoot_cooldown: 3,
                level_up_interval: None,
            },
        }
    }

    /// The game's default config for a grid.
    #[must_use]
    pub fn default_config(&self, grid: GridSize) -> EngineConfig {
        EngineConfig {
            grid,
            base_speed: self.tuning.base_speed,
            speed_range: self.tuning.speed_range,
            max_speed: None,
            spawn_cooldown: self.tuning.spawn_cooldown,
            shoot_cooldown: self.tuning.shoot_cooldown,
            level_up_interval: self.tuning.level_up_interval,
            kind_probabilities: std::collections::BTreeMap::new(),
        }
    }

    /// Look up a kind.
    ///
    /// # Panics
    /// Panics if the id was not issued by this ruleset.
    #[must_use]
    pub fn kind(&self, id: KindId) -> &EntityKind {
        &self.kinds[id.index()]
    }

    /// Find a kind by name.
    #[must_use]
    pub fn kind_id(&self, name: &str) -> Option<KindId> {
        self.kinds
            .iter()
            .position(|k| k.name == name)
            .and_then(|i| u8::try_from(i).ok())
            .map(KindId::new)
    }

    /// Rows that hold entity lanes.
    #[must_use]
    pub fn lane_rows(&self, grid: GridSize) -> Range<usize> {
        1..grid.last_row()
    }

    /// Total number of entity slots on a grid.
    #[must_use]
    pub fn slot_count(&self, grid: GridSize) -> usize {
        self.lane_rows(grid).len() * self.slots_per_lane
    }

    /// Lane row of slot `index`.
    #[must_use]
    pub fn slot_row(&self, index: usize) -> usize {
        1 + index / self.slots_per_lane.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn asterix_preset() {
        let rules = Ruleset::asterix();
        assert_eq!(rules.channels.len(), 3);
        assert!(!rules.actions.allows(Action::Shoot));
        assert_eq!(rules.kind_id("treasure"), Some(KindId::new(1)));
        assert!(rules.kind(KindId::new(0)).can(Capabilities::BLOCKS_PLAYER));
        let total: f64 = rules.kinds.iter().map(|k| k.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn seaquest_preset() {
        let rules = Ruleset::seaquest();
        assert!(rules.actions.allows(Action::Shoot));
        assert!(rules.player_projectile.is_some());
        let sub = rules.kind(rules.kind_id("submarine").unwrap());
        assert!(sub.can(Capabilities::SHOOTS | Capabilities::SHOOTABLE));
        let diver = rules.kind(rules.kind_id("diver").unwrap());
        assert!(!diver.can(Capabilities::SHOOTABLE));
    }

    #[test]
    fn lanes_skip_first_and_last_rows() {
        let rules = Ruleset::asterix();
        let grid = GridSize::new(10, 10);
        assert_eq!(rules.lane_rows(grid), 1..9);
        assert_eq!(rules.slot_count(grid), 8);
        assert_eq!(rules.slot_row(0), 1);
        assert_eq!(rules.slot_row(7), 8);
    }

    #[test]
    fn slots_per_lane_share_rows() {
        let mut rules = Ruleset::asterix();
        rules.slots_per_lane = 2;
        let grid = GridSize::new(5, 10);
        assert_eq!(rules.slot_count(grid), 6);
        assert_eq!(rules.slot_row(0), 1);
        assert_eq!(rules.slot_row(1), 1);
        assert_eq!(rules.slot_row(2), 2);
    }

    #[test]
    fn centered_actor_starts_bottom_middle() {
        let rules = Ruleset::asterix();
        let grid = GridSize::new(10, 10);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let actor = rules.actor.place(grid, &mut rng);
        assert_eq!(actor.cell, Cell::new(9, 5));
        assert_eq!(rules.actor.band(grid), Some((0, 9)));
    }

    #[test]
    fn random_actor_keeps_body_on_board() {
        let rules = Ruleset::seaquest();
        let grid = GridSize::new(10, 6);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let actor = rules.actor.place(grid, &mut rng);
            assert_eq!(actor.cell.row, 8);
            for cell in actor.body() {
                assert!(grid.contains(cell));
            }
        }
        assert_eq!(rules.actor.band(grid), Some((0, 8)));
    }

    #[test]
    fn default_config_uses_tuning() {
        let config = Ruleset::seaquest().default_config(GridSize::new(10, 10));
        assert_eq!(config.base_speed, -2);
        assert_eq!(config.shoot_cooldown, 3);
        assert_eq!(config.level_up_interval, None);
        assert!(config.kind_probabilities.is_empty());
    }
}
