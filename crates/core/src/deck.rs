use crate::{Card, CardId, CardModifier, Rank, RngState, Suit};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which collection currently owns a card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CardLocation {
    DrawPile,
    DiscardPile,
    Pending,
    Hand,
    Destroyed,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("unknown card {0}")]
    UnknownCard(CardId),
    #[error("card {id} is tagged {found:?} but held in {expected:?}")]
    LocationMismatch {
        id: CardId,
        expected: CardLocation,
        found: CardLocation,
    },
    #[error("{location:?} holds {listed} cards but {tagged} are tagged there")]
    CountMismatch {
        location: CardLocation,
        listed: usize,
        tagged: usize,
    },
    #[error("card {0} cannot be modified while in play")]
    CardInPlay(CardId),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckCounts {
    /// Cards still in the draw or discard pile.
    pub remaining: usize,
    /// Every card that has not been destroyed.
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drawn {
    pub id: CardId,
    pub recycled: bool,
}

/// Master deck of a run. Cards live in an arena indexed by id; the piles only
/// hold ids and every card carries a location tag.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    locations: Vec<CardLocation>,
    draw: Vec<CardId>,
    discard: Vec<CardId>,
}

impl Deck {
    pub fn standard52() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                let mut card = Card::standard(suit, rank);
                card.id = cards.len() as CardId;
                cards.push(card);
            }
        }
        let draw = cards.iter().map(|card| card.id).collect();
        let locations = vec![CardLocation::DrawPile; cards.len()];
        Self {
            cards,
            locations,
            draw,
            discard: Vec::new(),
        }
    }

    /// Rebuilds the draw pile from every live card and empties the discard pile.
    pub fn start_round(&mut self, rng: &mut RngState) {
        self.discard.clear();
        self.draw.clear();
        for (idx, card) in self.cards.iter().enumerate() {
            if card.is_destroyed() {
                self.locations[idx] = CardLocation::Destroyed;
            } else {
                self.locations[idx] = CardLocation::DrawPile;
                self.draw.push(card.id);
            }
        }
        rng.shuffle(&mut self.draw);
    }

    /// Pops the top of the draw pile, recycling the discard pile first if the
    /// draw pile ran dry. `None` means both piles are empty.
    pub fn draw_card(&mut self, rng: &mut RngState) -> Option<Drawn> {
        let mut recycled = false;
        if self.draw.is_empty() && !self.discard.is_empty() {
            self.recycle(rng);
            recycled = true;
        }
        let id = self.draw.pop()?;
        self.locations[id as usize] = CardLocation::Pending;
        Some(Drawn { id, recycled })
    }

    pub fn recycle(&mut self, rng: &mut RngState) {
        if self.discard.is_empty() {
            return;
        }
        for id in &self.discard {
            self.locations[*id as usize] = CardLocation::DrawPile;
        }
        self.draw.append(&mut self.discard);
        rng.shuffle(&mut self.draw);
    }

    pub fn discard(&mut self, ids: &[CardId]) {
        for id in ids {
            if let Some(location) = self.locations.get_mut(*id as usize) {
                *location = CardLocation::DiscardPile;
                self.discard.push(*id);
            }
        }
    }

    pub(crate) fn move_to_hand(&mut self, id: CardId) {
        if let Some(location) = self.locations.get_mut(id as usize) {
            *location = CardLocation::Hand;
        }
    }

    /// Modifiers only reach cards resting in a pile.
    pub fn check_modifiable(&self, id: CardId) -> Result<CardLocation, DeckError> {
        let location = self.location(id).ok_or(DeckError::UnknownCard(id))?;
        if matches!(location, CardLocation::Hand | CardLocation::Pending) {
            return Err(DeckError::CardInPlay(id));
        }
        Ok(location)
    }

    /// Sets a card's permanent modifier, overwriting any previous one. A destroy
    /// modifier pulls the card out of both piles for the rest of the run.
    pub fn apply_modifier(&mut self, id: CardId, modifier: CardModifier) -> Result<(), DeckError> {
        let location = self.check_modifiable(id)?;
        if location == CardLocation::Destroyed {
            return Ok(());
        }
        self.cards[id as usize].modifier = Some(modifier);
        if modifier == CardModifier::Destroy {
            self.draw.retain(|card| *card != id);
            self.discard.retain(|card| *card != id);
            self.locations[id as usize] = CardLocation::Destroyed;
        }
        Ok(())
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id as usize)
    }

    pub fn location(&self, id: CardId) -> Option<CardLocation> {
        self.locations.get(id as usize).copied()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn resolve(&self, ids: &[CardId]) -> Vec<Card> {
        ids.iter().filter_map(|id| self.card(*id).copied()).collect()
    }

    pub fn draw_pile(&self) -> &[CardId] {
        &self.draw
    }

    pub fn discard_pile(&self) -> &[CardId] {
        &self.discard
    }

    /// Ids of every card that has not been destroyed, in master order.
    pub fn live_ids(&self) -> Vec<CardId> {
        self.cards
            .iter()
            .filter(|card| !card.is_destroyed())
            .map(|card| card.id)
            .collect()
    }

    pub fn destroyed_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_destroyed()).count()
    }

    pub fn counts(&self) -> DeckCounts {
        DeckCounts {
            remaining: self.draw.len() + self.discard.len(),
            total: self.cards.len() - self.destroyed_count(),
        }
    }

    /// Verifies that piles, hand and pending card agree with the location tags
    /// and together account for every card.
    pub fn check_conservation(
        &self,
        hand: &[CardId],
        pending: Option<CardId>,
    ) -> Result<(), DeckError> {
        let held: Vec<CardId> = pending.into_iter().collect();
        let lists: [(&[CardId], CardLocation); 4] = [
            (self.draw.as_slice(), CardLocation::DrawPile),
            (self.discard.as_slice(), CardLocation::DiscardPile),
            (hand, CardLocation::Hand),
            (held.as_slice(), CardLocation::Pending),
        ];
        for (ids, expected) in lists {
            for id in ids {
                let found = self.location(*id).ok_or(DeckError::UnknownCard(*id))?;
                if found != expected {
                    return Err(DeckError::LocationMismatch {
                        id: *id,
                        expected,
                        found,
                    });
                }
            }
            let tagged = self.locations.iter().filter(|loc| **loc == expected).count();
            if tagged != ids.len() {
                return Err(DeckError::CountMismatch {
                    location: expected,
                    listed: ids.len(),
                    tagged,
                });
            }
        }
        for (idx, card) in self.cards.iter().enumerate() {
            let destroyed_tag = self.locations[idx] == CardLocation::Destroyed;
            if card.is_destroyed() != destroyed_tag {
                return Err(DeckError::LocationMismatch {
                    id: card.id,
                    expected: CardLocation::Destroyed,
                    found: self.locations[idx],
                });
            }
        }
        Ok(())
    }
}
