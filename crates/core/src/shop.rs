use crate::{CardId, CardModifier, Content, Deck, JokerDef, RngState, ShopRule, SlotKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JokerOffer {
    pub def: JokerDef,
    pub price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackOffer {
    pub price: i64,
    pub cards: usize,
    pub picks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShopItem {
    Joker(JokerOffer),
    Pack(PackOffer),
}

impl ShopItem {
    pub fn price(&self) -> i64 {
        match self {
            ShopItem::Joker(offer) => offer.price,
            ShopItem::Pack(offer) => offer.price,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ShopItem::Joker(offer) => &offer.def.name,
            ShopItem::Pack(_) => "Card Pack",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopState {
    pub items: Vec<ShopItem>,
}

impl ShopState {
    /// Fills the slots in order. A joker slot with nothing left to offer stays
    /// empty; packs are never limited.
    pub fn generate(
        rule: &ShopRule,
        content: &Content,
        rng: &mut RngState,
        owned: &HashSet<String>,
    ) -> Self {
        let mut items = Vec::with_capacity(rule.slots.len());
        let mut offered = HashSet::new();
        for slot in &rule.slots {
            let kind = match slot {
                SlotKind::Random if rng.coin_flip() => SlotKind::Pack,
                SlotKind::Random => SlotKind::Joker,
                other => *other,
            };
            match kind {
                SlotKind::Pack => items.push(ShopItem::Pack(PackOffer {
                    price: rule.pack_cost,
                    cards: rule.pack_cards,
                    picks: rule.pack_picks,
                })),
                _ => {
                    if let Some(def) = content.pick_joker(owned, &offered, rng) {
                        offered.insert(def.key.clone());
                        items.push(ShopItem::Joker(JokerOffer {
                            def: def.clone(),
                            price: def.cost,
                        }));
                    }
                }
            }
        }
        Self { items }
    }

    pub fn price(&self, index: usize) -> Option<i64> {
        self.items.get(index).map(ShopItem::price)
    }

    pub fn item(&self, index: usize) -> Option<&ShopItem> {
        self.items.get(index)
    }

    pub fn take(&mut self, index: usize) -> Option<ShopItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PackError {
    #[error("card {0} is not in this pack")]
    NotInPack(CardId),
    #[error("at most {0} cards can be selected")]
    TooManyPicks(usize),
    #[error("select at least one card")]
    NothingSelected,
    #[error("invalid modifier choice {0}")]
    InvalidChoice(usize),
}

/// An opened pack: a sample of live deck cards and the modifiers on offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackOpen {
    pub cards: Vec<CardId>,
    pub modifiers: Vec<CardModifier>,
    pub selected: Vec<CardId>,
    pub picks: usize,
}

impl PackOpen {
    pub fn open(rule: &ShopRule, deck: &Deck, rng: &mut RngState) -> Self {
        let pool = deck.live_ids();
        let cards = rng
            .sample_indices(pool.len(), rule.pack_cards)
            .into_iter()
            .map(|idx| pool[idx])
            .collect();
        let modifiers = rng
            .sample_indices(CardModifier::ALL.len(), rule.pack_modifier_choices)
            .into_iter()
            .map(|idx| CardModifier::ALL[idx])
            .collect();
        Self {
            cards,
            modifiers,
            selected: Vec::new(),
            picks: rule.pack_picks,
        }
    }

    /// Toggles each id in turn. Validated as a whole: on error nothing changes.
    pub fn toggle(&mut self, ids: &[CardId]) -> Result<(), PackError> {
        let mut next = self.selected.clone();
        for id in ids {
            if !self.cards.contains(id) {
                return Err(PackError::NotInPack(*id));
            }
            if let Some(pos) = next.iter().position(|sel| sel == id) {
                next.remove(pos);
            } else {
                next.push(*id);
            }
        }
        if next.len() > self.picks {
            return Err(PackError::TooManyPicks(self.picks));
        }
        self.selected = next;
        Ok(())
    }

    pub fn choice(&self, index: usize) -> Result<CardModifier, PackError> {
        if self.selected.is_empty() {
            return Err(PackError::NothingSelected);
        }
        self.modifiers
            .get(index)
            .copied()
            .ok_or(PackError::InvalidChoice(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameConfig, JokerDef};

    fn content(keys: &[&str]) -> Content {
        Content {
            jokers: keys
                .iter()
                .map(|key| JokerDef {
                    key: key.to_string(),
                    name: key.to_string(),
                    cost: 4,
                    description: String::new(),
                    effects: Vec::new(),
                    round: Default::default(),
                })
                .collect(),
        }
    }

    #[test]
    fn shop_leads_with_pack_then_joker() {
        let rule = GameConfig::default().shop;
        let content = content(&["a", "b", "c", "d"]);
        for seed in 0..20 {
            let mut rng = RngState::from_seed(seed);
            let shop = ShopState::generate(&rule, &content, &mut rng, &HashSet::new());
            assert_eq!(shop.items.len(), 3);
            assert!(matches!(shop.items[0], ShopItem::Pack(_)));
            assert!(matches!(shop.items[1], ShopItem::Joker(_)));
        }
    }

    #[test]
    fn shop_never_offers_owned_or_repeated_jokers() {
        let rule = GameConfig::default().shop;
        let content = content(&["a", "b", "c"]);
        let owned: HashSet<String> = ["a".to_string()].into_iter().collect();
        for seed in 0..30 {
            let mut rng = RngState::from_seed(seed);
            let shop = ShopState::generate(&rule, &content, &mut rng, &owned);
            let keys: Vec<&str> = shop
                .items
                .iter()
                .filter_map(|item| match item {
                    ShopItem::Joker(offer) => Some(offer.def.key.as_str()),
                    ShopItem::Pack(_) => None,
                })
                .collect();
            assert!(!keys.contains(&"a"));
            let unique: HashSet<&str> = keys.iter().copied().collect();
            assert_eq!(unique.len(), keys.len());
        }
    }

    #[test]
    fn joker_slots_are_skipped_when_pool_is_empty() {
        let rule = GameConfig::default().shop;
        let content = content(&["a"]);
        let owned: HashSet<String> = ["a".to_string()].into_iter().collect();
        let mut rng = RngState::from_seed(3);
        let shop = ShopState::generate(&rule, &content, &mut rng, &owned);
        assert!(shop
            .items
            .iter()
            .all(|item| matches!(item, ShopItem::Pack(_))));
        assert!(!shop.items.is_empty());
    }

    #[test]
    fn pack_samples_distinct_live_cards() {
        let rule = GameConfig::default().shop;
        let mut deck = Deck::standard52();
        let mut rng = RngState::from_seed(5);
        deck.start_round(&mut rng);
        let pack = PackOpen::open(&rule, &deck, &mut rng);
        assert_eq!(pack.cards.len(), 8);
        let unique: HashSet<CardId> = pack.cards.iter().copied().collect();
        assert_eq!(unique.len(), 8);
        assert_eq!(pack.modifiers.len(), 2);
        assert_ne!(pack.modifiers[0], pack.modifiers[1]);
    }

    #[test]
    fn third_pick_is_rejected_without_change() {
        let rule = GameConfig::default().shop;
        let deck = Deck::standard52();
        let mut rng = RngState::from_seed(9);
        let mut pack = PackOpen::open(&rule, &deck, &mut rng);
        let (a, b, c) = (pack.cards[0], pack.cards[1], pack.cards[2]);
        pack.toggle(&[a, b]).expect("two picks");
        assert_eq!(pack.toggle(&[c]), Err(PackError::TooManyPicks(2)));
        assert_eq!(pack.selected, vec![a, b]);
        pack.toggle(&[a]).expect("unselect");
        assert_eq!(pack.selected, vec![b]);
    }
}
