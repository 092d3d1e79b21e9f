use crate::{EconomyRule, GameConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    /// Transient: the round is being set up and advances on its own.
    Drawing,
    Deciding,
    Shopping,
    PackOpening,
    GameOver,
}

/// Counters of the current run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: Phase,
    pub round_level: u32,
    pub target_score: i64,
    pub score_total: i64,
    pub coins: i64,
    pub hands_played: u8,
    pub hands_max: u8,
    pub discards_left: u8,
    pub discards_max: u8,
    /// Cards discarded over the whole run. Only a restart resets it.
    pub run_discards: u32,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: Phase::Drawing,
            round_level: 1,
            target_score: config.run.base_target,
            score_total: 0,
            coins: config.run.starting_coins,
            hands_played: 0,
            hands_max: config.run.base_hands,
            discards_left: config.run.base_discards,
            discards_max: config.run.base_discards,
            run_discards: 0,
        }
    }

    pub fn hands_left(&self) -> u8 {
        self.hands_max.saturating_sub(self.hands_played)
    }

    pub fn no_discards_used(&self) -> bool {
        self.discards_left == self.discards_max
    }

    pub fn target_reached(&self) -> bool {
        self.score_total >= self.target_score
    }

    /// Payout for resources left unused when a round is cleared.
    pub fn unused_reward(&self, economy: &EconomyRule) -> i64 {
        economy.per_hand_reward * self.hands_left() as i64
            + economy.per_discard_reward * self.discards_left as i64
    }
}
