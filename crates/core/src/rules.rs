use serde::{Deserialize, Serialize};
use std::fmt;

/// Running chips and multiplier of a hand being scored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Score {
    pub chips: i64,
    pub mult: i64,
}

impl Default for Score {
    fn default() -> Self {
        Self { chips: 0, mult: 1 }
    }
}

impl Score {
    pub fn total(&self) -> i64 {
        self.chips.saturating_mul(self.mult)
    }

    /// Coin effects do not touch the score. Arithmetic saturates so oversized
    /// joker amounts clamp instead of overflowing.
    pub fn apply(&mut self, effect: &RuleEffect) {
        match *effect {
            RuleEffect::AddChips(value) => self.chips = self.chips.saturating_add(value),
            RuleEffect::AddMult(value) => self.mult = self.mult.saturating_add(value),
            RuleEffect::MultiplyMult(value) => self.mult = self.mult.saturating_mul(value),
            RuleEffect::AddCoins(_) => {}
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RuleEffect {
    AddChips(i64),
    AddMult(i64),
    MultiplyMult(i64),
    AddCoins(i64),
}

/// One labelled line of a score breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreStep {
    pub source: String,
    pub effect: RuleEffect,
}

impl fmt::Display for ScoreStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.effect {
            RuleEffect::AddChips(value) => write!(f, "{}(+{} chips)", self.source, value),
            RuleEffect::AddMult(value) => write!(f, "{}(+{})", self.source, value),
            RuleEffect::MultiplyMult(value) => write!(f, "{}(x{})", self.source, value),
            RuleEffect::AddCoins(value) => write!(f, "{}(+${})", self.source, value),
        }
    }
}
