use crate::{has_all_suits, suit_count, Card, HandKind, RuleEffect, Suit};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    AddChips,
    AddMult,
    MultiplyMult,
    AddCoins,
}

/// What an effect's amount is multiplied by.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    #[default]
    Flat,
    PerSuit(Suit),
    /// Cards whose numeric value is in the set. Aces count as 14.
    PerValueIn(Vec<u8>),
    /// One step per `per` discards made over the whole run.
    RunDiscards { per: u32 },
    DrawPileCards,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    HandIn(Vec<HandKind>),
    MaxCards(usize),
    AllSuits,
}

/// Run counters a joker may read while scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreContext {
    pub run_discards: u32,
    pub draw_pile_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JokerEffect {
    pub kind: EffectKind,
    pub amount: i64,
    #[serde(default)]
    pub scale: Scale,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Passive modifiers applied outside scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundBonus {
    #[serde(default)]
    pub extra_hands: u8,
    #[serde(default)]
    pub extra_discards: u8,
    /// Paid per owned joker when a round ends with no discards used.
    #[serde(default)]
    pub clean_round_coins_per_joker: i64,
}

impl Condition {
    pub fn holds(&self, cards: &[Card], hand: HandKind) -> bool {
        match self {
            Condition::HandIn(kinds) => kinds.contains(&hand),
            Condition::MaxCards(max) => cards.len() <= *max,
            Condition::AllSuits => has_all_suits(cards),
        }
    }
}

impl Scale {
    pub fn steps(&self, cards: &[Card], ctx: ScoreContext) -> i64 {
        match self {
            Scale::Flat => 1,
            Scale::PerSuit(suit) => suit_count(cards, *suit) as i64,
            Scale::PerValueIn(values) => cards
                .iter()
                .filter(|card| values.contains(&card.value()))
                .count() as i64,
            Scale::RunDiscards { per } => (ctx.run_discards / (*per).max(1)) as i64,
            Scale::DrawPileCards => ctx.draw_pile_size as i64,
        }
    }
}

impl JokerEffect {
    pub fn is_multiplicative(&self) -> bool {
        self.kind == EffectKind::MultiplyMult
    }

    /// The concrete rule effect this joker contributes, or `None` when its
    /// conditions fail or it scales to nothing.
    pub fn resolve(&self, cards: &[Card], hand: HandKind, ctx: ScoreContext) -> Option<RuleEffect> {
        if !self.conditions.iter().all(|cond| cond.holds(cards, hand)) {
            return None;
        }
        let steps = self.scale.steps(cards, ctx);
        if steps <= 0 {
            return None;
        }
        let value = self.amount.saturating_mul(steps);
        match self.kind {
            EffectKind::AddChips => Some(RuleEffect::AddChips(value)),
            EffectKind::AddMult => Some(RuleEffect::AddMult(value)),
            EffectKind::AddCoins => Some(RuleEffect::AddCoins(value)),
            EffectKind::MultiplyMult => {
                let exp = u32::try_from(steps).unwrap_or(u32::MAX);
                Some(RuleEffect::MultiplyMult(self.amount.saturating_pow(exp)))
            }
        }
    }
}
