use crate::{JokerEffect, RngState, RoundBonus};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JokerDef {
    pub key: String,
    pub name: String,
    pub cost: i64,
    pub description: String,
    #[serde(default)]
    pub effects: Vec<JokerEffect>,
    #[serde(default)]
    pub round: RoundBonus,
}

impl JokerDef {
    pub fn sell_price(&self) -> i64 {
        self.cost.max(0) / 2
    }
}

/// Everything the shop can offer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    pub jokers: Vec<JokerDef>,
}

impl Content {
    pub fn joker(&self, key: &str) -> Option<&JokerDef> {
        self.jokers.iter().find(|joker| joker.key == key)
    }

    /// Picks a joker whose key is in neither exclusion set.
    pub fn pick_joker<'a>(
        &'a self,
        owned: &HashSet<String>,
        offered: &HashSet<String>,
        rng: &mut RngState,
    ) -> Option<&'a JokerDef> {
        let pool: Vec<&JokerDef> = self
            .jokers
            .iter()
            .filter(|joker| !owned.contains(&joker.key) && !offered.contains(&joker.key))
            .collect();
        rng.pick_index(pool.len()).map(|idx| pool[idx])
    }
}
