use crate::{
    default_hand_base, evaluate_hand, Card, CardModifier, GameConfig, HandKind, JokerInstance,
    RuleEffect, Score, ScoreContext, ScoreStep,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ScoreTables {
    hand_rules: HashMap<HandKind, (i64, i64)>,
    hand_names: HashMap<HandKind, String>,
    modifier_rules: HashMap<CardModifier, (String, i64, i64)>,
}

impl ScoreTables {
    pub fn from_config(config: &GameConfig) -> Self {
        let mut hand_rules = HashMap::new();
        let mut hand_names = HashMap::new();
        for hand in &config.hands {
            hand_rules.insert(hand.kind, (hand.chips, hand.mult));
            hand_names.insert(hand.kind, hand.display_name.clone());
        }
        let mut modifier_rules = HashMap::new();
        for rule in &config.modifiers {
            modifier_rules.insert(
                rule.modifier,
                (rule.display_name.clone(), rule.chips, rule.mult),
            );
        }
        Self {
            hand_rules,
            hand_names,
            modifier_rules,
        }
    }

    pub fn hand_base(&self, kind: HandKind) -> (i64, i64) {
        self.hand_rules
            .get(&kind)
            .copied()
            .unwrap_or_else(|| default_hand_base(kind))
    }

    pub fn hand_name(&self, kind: HandKind) -> &str {
        self.hand_names
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.display_name())
    }

    /// (label, chips, mult) granted by a card modifier.
    pub fn modifier_bonus(&self, modifier: CardModifier) -> (&str, i64, i64) {
        match self.modifier_rules.get(&modifier) {
            Some((name, chips, mult)) => (name.as_str(), *chips, *mult),
            None => match modifier {
                CardModifier::BonusChips => ("Bonus", 10, 0),
                CardModifier::MultPlus => ("Mult", 0, 4),
                CardModifier::Destroy => ("Destroy", 0, 0),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// `None` only for an empty hand.
    pub hand: Option<HandKind>,
    /// Sum of the cards' face values.
    pub card_chips: i64,
    /// Additive multiplier before any multiplicative joker.
    pub additive_mult: i64,
    /// Product of every multiplicative joker.
    pub mult_factor: i64,
    /// Final chips and multiplier.
    pub total: Score,
    pub steps: Vec<ScoreStep>,
    pub coins: i64,
}

impl ScoreBreakdown {
    pub fn total_score(&self) -> i64 {
        self.total.total()
    }

    pub fn labels(&self) -> Vec<String> {
        self.steps.iter().map(ToString::to_string).collect()
    }
}

/// Scores a hand against the owned jokers. Pure: the same inputs always give
/// the same breakdown, step order included.
pub fn score_hand(
    cards: &[Card],
    jokers: &[JokerInstance],
    ctx: ScoreContext,
    tables: &ScoreTables,
) -> ScoreBreakdown {
    if cards.is_empty() {
        return ScoreBreakdown {
            hand: None,
            card_chips: 0,
            additive_mult: 1,
            mult_factor: 1,
            total: Score::default(),
            steps: Vec::new(),
            coins: 0,
        };
    }

    let hand = evaluate_hand(cards);
    let card_chips: i64 = cards.iter().map(|card| card.value() as i64).sum();
    let mut score = Score {
        chips: card_chips,
        mult: 1,
    };
    let mut steps = Vec::new();
    let mut coins = 0i64;
    let mut apply = |score: &mut Score, source: &str, effect: RuleEffect| {
        score.apply(&effect);
        if let RuleEffect::AddCoins(value) = effect {
            coins = coins.saturating_add(value);
        }
        steps.push(ScoreStep {
            source: source.to_string(),
            effect,
        });
    };

    let (hand_chips, hand_mult) = tables.hand_base(hand);
    let hand_label = tables.hand_name(hand).to_string();
    apply(&mut score, &hand_label, RuleEffect::AddChips(hand_chips));
    apply(&mut score, &hand_label, RuleEffect::AddMult(hand_mult));

    for card in cards {
        let Some(modifier) = card.modifier else {
            continue;
        };
        let (label, chips, mult) = tables.modifier_bonus(modifier);
        if chips != 0 {
            apply(&mut score, label, RuleEffect::AddChips(chips));
        }
        if mult != 0 {
            apply(&mut score, label, RuleEffect::AddMult(mult));
        }
    }

    for joker in jokers {
        for effect in joker.effects.iter().filter(|e| !e.is_multiplicative()) {
            if let Some(resolved) = effect.resolve(cards, hand, ctx) {
                apply(&mut score, &joker.name, resolved);
            }
        }
    }
    let additive_mult = score.mult;

    let mut mult_factor = 1i64;
    for joker in jokers {
        for effect in joker.effects.iter().filter(|e| e.is_multiplicative()) {
            if let Some(resolved) = effect.resolve(cards, hand, ctx) {
                if let RuleEffect::MultiplyMult(factor) = resolved {
                    mult_factor = mult_factor.saturating_mul(factor);
                }
                apply(&mut score, &joker.name, resolved);
            }
        }
    }

    ScoreBreakdown {
        hand: Some(hand),
        card_chips,
        additive_mult,
        mult_factor,
        total: score,
        steps,
        coins,
    }
}
