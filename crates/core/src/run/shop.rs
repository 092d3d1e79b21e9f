use crate::*;

impl RunState {
    pub(super) fn enter_shop(&mut self, events: &mut EventBus) {
        let owned = self.inventory.owned_keys();
        let shop = ShopState::generate(&self.config.shop, &self.content, &mut self.rng, &owned);
        events.push(Event::ShopEntered {
            items: shop.items.len(),
        });
        self.shop = Some(shop);
        self.pack = None;
        self.state.phase = Phase::Shopping;
    }

    pub fn can_afford(&self, slot: usize) -> bool {
        self.shop
            .as_ref()
            .and_then(|shop| shop.price(slot))
            .map(|price| price <= self.state.coins)
            .unwrap_or(false)
    }

    /// Buys the item in `slot`. All checks run before coins move, so a
    /// rejected purchase leaves the shop and inventory as they were.
    pub fn buy_shop_item(
        &mut self,
        slot: usize,
        events: &mut EventBus,
    ) -> Result<ShopItem, RunError> {
        self.require_phase(Phase::Shopping)?;
        let offer = self.shop.as_ref().and_then(|shop| shop.item(slot)).map(|item| {
            let key = match item {
                ShopItem::Joker(offer) => Some(offer.def.key.clone()),
                ShopItem::Pack(_) => None,
            };
            (item.price(), key)
        });
        let Some((price, joker_key)) = offer else {
            return self.reject(RunError::InvalidOfferIndex(slot));
        };
        if price > self.state.coins {
            return self.reject(RunError::InsufficientFunds {
                needed: price,
                available: self.state.coins,
            });
        }
        if let Some(key) = joker_key {
            if self.inventory.is_full() {
                return self.reject(RunError::InventoryFull);
            }
            if self.inventory.owned_keys().contains(&key) {
                return self.reject(InventoryError::AlreadyOwned(key).into());
            }
        }

        let Some(item) = self.shop.as_mut().and_then(|shop| shop.take(slot)) else {
            return self.reject(RunError::InvalidOfferIndex(slot));
        };
        self.state.coins -= price;
        events.push(Event::ShopBought {
            item: item.label().to_string(),
            cost: price,
            coins: self.state.coins,
        });
        match &item {
            ShopItem::Joker(offer) => {
                self.inventory.add_joker(JokerInstance::from_def(&offer.def))?;
                self.message = format!("Bought {}", offer.def.name);
            }
            ShopItem::Pack(_) => {
                let pack = PackOpen::open(&self.config.shop, &self.deck, &mut self.rng);
                events.push(Event::PackOpened {
                    cards: pack.cards.len(),
                    modifiers: pack.modifiers.clone(),
                });
                self.message = format!("Select up to {} cards", pack.picks);
                self.pack = Some(pack);
                self.state.phase = Phase::PackOpening;
            }
        }
        Ok(item)
    }

    /// Shopping → Drawing → Deciding at the next level with a raised target.
    pub fn advance_round(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.require_phase(Phase::Shopping)?;
        self.state.round_level = self.state.round_level.saturating_add(1);
        self.state.target_score = self.config.next_target(self.state.target_score);
        self.state.phase = Phase::Drawing;
        self.start_round(events)
    }

    pub fn joker_sell_value(&self, index: usize) -> Option<i64> {
        self.inventory.jokers.get(index).map(JokerInstance::sell_price)
    }

    /// Sells an owned joker for half its price. Allowed in every phase.
    pub fn sell_joker(&mut self, index: usize, events: &mut EventBus) -> Result<i64, RunError> {
        let Some(joker) = self.inventory.remove_joker(index) else {
            return self.reject(RunError::InvalidJokerIndex(index));
        };
        let refund = joker.sell_price();
        self.state.coins = self.state.coins.saturating_add(refund);
        self.message = format!("Sold {} for ${}", joker.name, refund);
        events.push(Event::JokerSold {
            key: joker.key,
            sell_price: refund,
            coins: self.state.coins,
        });
        Ok(refund)
    }
}
