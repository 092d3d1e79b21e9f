use crate::{
    CardId, Content, Deck, DeckError, GameConfig, GameState, Inventory, InventoryError, PackError,
    PackOpen, Phase, RngState, ScoreBreakdown, ScoreTables, ShopState,
};
use thiserror::Error;

mod hand;
mod pack;
mod shop;
mod state;
mod view;

pub use view::*;

/// A rejected command. Rejections never change run state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("not available while {0:?}")]
    InvalidPhase(Phase),
    #[error("no discards left")]
    NoDiscardsLeft,
    #[error("hand is full")]
    HandFull,
    #[error("hand is empty")]
    EmptyHand,
    #[error("no card waiting to be taken")]
    NoPendingCard,
    #[error("card {0} is not in hand")]
    CardNotInHand(CardId),
    #[error("invalid card selection")]
    InvalidSelection,
    #[error("need ${needed}, have ${available}")]
    InsufficientFunds { needed: i64, available: i64 },
    #[error("joker inventory full")]
    InventoryFull,
    #[error("invalid shop slot {0}")]
    InvalidOfferIndex(usize),
    #[error("invalid joker index {0}")]
    InvalidJokerIndex(usize),
    #[error("pack: {0}")]
    Pack(#[from] PackError),
    #[error("inventory: {0}")]
    Inventory(#[from] InventoryError),
    #[error("deck: {0}")]
    Deck(#[from] DeckError),
}

#[derive(Debug)]
pub struct RunState {
    pub config: GameConfig,
    pub tables: ScoreTables,
    pub content: Content,
    pub inventory: Inventory,
    pub rng: RngState,
    pub deck: Deck,
    pub hand: Vec<CardId>,
    pub pending: Option<CardId>,
    pub state: GameState,
    pub shop: Option<ShopState>,
    pub pack: Option<PackOpen>,
    pub last_breakdown: Option<ScoreBreakdown>,
    /// Last user-facing message, rejections included.
    pub message: String,
}
