use crate::{CardModifier, HandKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandRule {
    pub kind: HandKind,
    pub display_name: String,
    pub chips: i64,
    pub mult: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModifierRule {
    pub modifier: CardModifier,
    pub display_name: String,
    pub description: String,
    #[serde(default)]
    pub chips: i64,
    #[serde(default)]
    pub mult: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunRule {
    pub max_hand_size: usize,
    pub base_hands: u8,
    pub base_discards: u8,
    pub base_target: i64,
    /// Target growth per level as a fraction, applied with floor division.
    pub target_growth_num: i64,
    pub target_growth_den: i64,
    pub starting_coins: i64,
    pub max_jokers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EconomyRule {
    pub per_hand_reward: i64,
    pub per_discard_reward: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SlotKind {
    Pack,
    Joker,
    /// Coin flip between a pack and a joker.
    Random,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShopRule {
    pub slots: Vec<SlotKind>,
    pub pack_cost: i64,
    pub pack_cards: usize,
    pub pack_modifier_choices: usize,
    pub pack_picks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    pub run: RunRule,
    pub hands: Vec<HandRule>,
    pub modifiers: Vec<ModifierRule>,
    pub economy: EconomyRule,
    pub shop: ShopRule,
}

impl GameConfig {
    pub fn next_target(&self, current: i64) -> i64 {
        let den = self.run.target_growth_den.max(1);
        current.saturating_mul(self.run.target_growth_num) / den
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let hands = HandKind::ALL
            .iter()
            .map(|kind| {
                let (chips, mult) = default_hand_base(*kind);
                HandRule {
                    kind: *kind,
                    display_name: kind.display_name().to_string(),
                    chips,
                    mult,
                }
            })
            .collect();
        Self {
            run: RunRule {
                max_hand_size: 5,
                base_hands: 3,
                base_discards: 5,
                base_target: 300,
                target_growth_num: 3,
                target_growth_den: 2,
                starting_coins: 5,
                max_jokers: 3,
            },
            hands,
            modifiers: vec![
                ModifierRule {
                    modifier: CardModifier::BonusChips,
                    display_name: "Bonus".to_string(),
                    description: "+10 chips when scored".to_string(),
                    chips: 10,
                    mult: 0,
                },
                ModifierRule {
                    modifier: CardModifier::MultPlus,
                    display_name: "Mult".to_string(),
                    description: "+4 mult when scored".to_string(),
                    chips: 0,
                    mult: 4,
                },
                ModifierRule {
                    modifier: CardModifier::Destroy,
                    display_name: "Destroy".to_string(),
                    description: "Remove the card from the deck".to_string(),
                    chips: 0,
                    mult: 0,
                },
            ],
            economy: EconomyRule {
                per_hand_reward: 2,
                per_discard_reward: 1,
            },
            shop: ShopRule {
                slots: vec![SlotKind::Pack, SlotKind::Joker, SlotKind::Random],
                pack_cost: 4,
                pack_cards: 8,
                pack_modifier_choices: 2,
                pack_picks: 2,
            },
        }
    }
}

pub fn default_hand_base(kind: HandKind) -> (i64, i64) {
    match kind {
        HandKind::HighCard => (5, 1),
        HandKind::Pair => (10, 2),
        HandKind::TwoPair => (20, 2),
        HandKind::Trips => (30, 3),
        HandKind::Straight => (30, 4),
        HandKind::Flush => (35, 4),
        HandKind::FullHouse => (40, 4),
        HandKind::Quads => (60, 7),
        HandKind::StraightFlush => (100, 8),
    }
}
