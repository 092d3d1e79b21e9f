use crate::{JokerDef, JokerEffect, RoundBonus};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JokerInstance {
    pub key: String,
    pub name: String,
    pub description: String,
    pub buy_price: i64,
    #[serde(default)]
    pub effects: Vec<JokerEffect>,
    #[serde(default)]
    pub round: RoundBonus,
}

impl JokerInstance {
    pub fn from_def(def: &JokerDef) -> Self {
        Self {
            key: def.key.clone(),
            name: def.name.clone(),
            description: def.description.clone(),
            buy_price: def.cost,
            effects: def.effects.clone(),
            round: def.round.clone(),
        }
    }

    pub fn sell_price(&self) -> i64 {
        self.buy_price.max(0) / 2
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub joker_slots: usize,
    pub jokers: Vec<JokerInstance>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("no joker slots")]
    NoJokerSlots,
    #[error("joker {0} already owned")]
    AlreadyOwned(String),
}

impl Inventory {
    pub fn with_slots(joker_slots: usize) -> Self {
        Self {
            joker_slots,
            jokers: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.jokers.len() >= self.joker_slots
    }

    pub fn add_joker(&mut self, joker: JokerInstance) -> Result<(), InventoryError> {
        if self.is_full() {
            return Err(InventoryError::NoJokerSlots);
        }
        if self.jokers.iter().any(|owned| owned.key == joker.key) {
            return Err(InventoryError::AlreadyOwned(joker.key));
        }
        self.jokers.push(joker);
        Ok(())
    }

    pub fn remove_joker(&mut self, index: usize) -> Option<JokerInstance> {
        if index < self.jokers.len() {
            Some(self.jokers.remove(index))
        } else {
            None
        }
    }

    pub fn owned_keys(&self) -> HashSet<String> {
        self.jokers.iter().map(|joker| joker.key.clone()).collect()
    }

    pub fn extra_hands(&self) -> u8 {
        self.jokers
            .iter()
            .fold(0u8, |acc, joker| acc.saturating_add(joker.round.extra_hands))
    }

    pub fn extra_discards(&self) -> u8 {
        self.jokers
            .iter()
            .fold(0u8, |acc, joker| acc.saturating_add(joker.round.extra_discards))
    }

    /// Coins paid for finishing a round without discarding.
    pub fn clean_round_bonus(&self) -> i64 {
        let count = self.jokers.len() as i64;
        self.jokers
            .iter()
            .map(|joker| joker.round.clean_round_coins_per_joker * count)
            .sum()
    }

    pub fn clear(&mut self) {
        self.jokers.clear();
    }
}
