use crate::{CardId, CardModifier, HandKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    RoundStarted {
        level: u32,
        target: i64,
        hands: u8,
        discards: u8,
    },
    CardDrawn { card: CardId },
    DeckRecycled { cards: usize },
    DeckExhausted,
    CardTaken { card: CardId },
    CardsDiscarded {
        cards: Vec<CardId>,
        discards_left: u8,
        run_discards: u32,
    },
    HandScored {
        hand: HandKind,
        chips: i64,
        mult: i64,
        total: i64,
        coins: i64,
    },
    RoundCleared {
        score: i64,
        reward: i64,
        bonus: i64,
        coins: i64,
    },
    GameOver { level: u32, score: i64 },
    ShopEntered { items: usize },
    ShopBought {
        item: String,
        cost: i64,
        coins: i64,
    },
    JokerSold {
        key: String,
        sell_price: i64,
        coins: i64,
    },
    PackOpened {
        cards: usize,
        modifiers: Vec<CardModifier>,
    },
    PackModifierApplied {
        modifier: CardModifier,
        cards: Vec<CardId>,
    },
    PackSkipped,
    RunRestarted { seed: u64 },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}
