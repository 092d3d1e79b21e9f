use crate::*;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JokerView {
    pub key: String,
    pub name: String,
    pub description: String,
    pub sell_price: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShopItemView {
    pub slot: usize,
    pub label: String,
    pub price: i64,
    pub affordable: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PackView {
    pub cards: Vec<Card>,
    pub selected: Vec<CardId>,
    pub modifiers: Vec<CardModifier>,
    pub picks: usize,
}

/// Everything a front-end needs to draw the table after a command.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunSnapshot {
    pub phase: Phase,
    pub level: u32,
    pub score: i64,
    pub target: i64,
    pub coins: i64,
    pub hands_left: u8,
    pub discards_left: u8,
    pub run_discards: u32,
    pub hand: Vec<Card>,
    pub pending: Option<Card>,
    pub jokers: Vec<JokerView>,
    pub shop: Vec<ShopItemView>,
    pub pack: Option<PackView>,
    pub deck: DeckCounts,
    pub breakdown: Vec<String>,
    pub message: String,
}

impl RunState {
    pub fn snapshot(&self) -> RunSnapshot {
        let jokers = self
            .inventory
            .jokers
            .iter()
            .map(|joker| JokerView {
                key: joker.key.clone(),
                name: joker.name.clone(),
                description: joker.description.clone(),
                sell_price: joker.sell_price(),
            })
            .collect();
        let shop = self
            .shop
            .iter()
            .flat_map(|shop| shop.items.iter().enumerate())
            .map(|(slot, item)| ShopItemView {
                slot,
                label: item.label().to_string(),
                price: item.price(),
                affordable: item.price() <= self.state.coins,
            })
            .collect();
        let pack = self.pack.as_ref().map(|pack| PackView {
            cards: self.deck.resolve(&pack.cards),
            selected: pack.selected.clone(),
            modifiers: pack.modifiers.clone(),
            picks: pack.picks,
        });
        RunSnapshot {
            phase: self.state.phase,
            level: self.state.round_level,
            score: self.state.score_total,
            target: self.state.target_score,
            coins: self.state.coins,
            hands_left: self.state.hands_left(),
            discards_left: self.state.discards_left,
            run_discards: self.state.run_discards,
            hand: self.hand_cards(),
            pending: self.pending_card(),
            jokers,
            shop,
            pack,
            deck: self.deck.counts(),
            breakdown: self
                .last_breakdown
                .as_ref()
                .map(ScoreBreakdown::labels)
                .unwrap_or_default(),
            message: self.message.clone(),
        }
    }
}
