use crate::{Card, Rank, Suit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Poker hand categories, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HandKind {
    HighCard,
    Pair,
    TwoPair,
    Trips,
    Straight,
    Flush,
    FullHouse,
    Quads,
    StraightFlush,
}

impl HandKind {
    pub const ALL: [HandKind; 9] = [
        HandKind::HighCard,
        HandKind::Pair,
        HandKind::TwoPair,
        HandKind::Trips,
        HandKind::Straight,
        HandKind::Flush,
        HandKind::FullHouse,
        HandKind::Quads,
        HandKind::StraightFlush,
    ];

    pub fn id(self) -> &'static str {
        match self {
            HandKind::HighCard => "high_card",
            HandKind::Pair => "pair",
            HandKind::TwoPair => "two_pair",
            HandKind::Trips => "trips",
            HandKind::Straight => "straight",
            HandKind::Flush => "flush",
            HandKind::FullHouse => "full_house",
            HandKind::Quads => "quads",
            HandKind::StraightFlush => "straight_flush",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            HandKind::HighCard => "High Card",
            HandKind::Pair => "Pair",
            HandKind::TwoPair => "Two Pair",
            HandKind::Trips => "Three of a Kind",
            HandKind::Straight => "Straight",
            HandKind::Flush => "Flush",
            HandKind::FullHouse => "Full House",
            HandKind::Quads => "Four of a Kind",
            HandKind::StraightFlush => "Straight Flush",
        }
    }
}

const FLUSH_LEN: usize = 5;
const STRAIGHT_LEN: usize = 5;
const WHEEL: [u8; 5] = [2, 3, 4, 5, 14];

/// Classifies a hand of any size, strongest structure first.
pub fn evaluate_hand(cards: &[Card]) -> HandKind {
    if cards.is_empty() {
        return HandKind::HighCard;
    }

    let mut rank_counts: HashMap<Rank, usize> = HashMap::new();
    let mut suit_counts: HashMap<Suit, usize> = HashMap::new();
    for card in cards {
        *rank_counts.entry(card.rank).or_insert(0) += 1;
        *suit_counts.entry(card.suit).or_insert(0) += 1;
    }

    let mut counts: Vec<usize> = rank_counts.values().copied().collect();
    counts.sort_by(|a, b| b.cmp(a));
    let top = counts.first().copied().unwrap_or(0);
    let second = counts.get(1).copied().unwrap_or(0);

    let flush_suit = suit_counts
        .iter()
        .find(|(_, count)| **count == FLUSH_LEN)
        .map(|(suit, _)| *suit);
    let is_straight = has_straight(cards);

    if let Some(suit) = flush_suit {
        let suited: Vec<Card> = cards.iter().copied().filter(|c| c.suit == suit).collect();
        if has_straight(&suited) {
            return HandKind::StraightFlush;
        }
    }
    if top >= 4 {
        return HandKind::Quads;
    }
    if top == 3 && second == 2 {
        return HandKind::FullHouse;
    }
    if flush_suit.is_some() {
        return HandKind::Flush;
    }
    if is_straight {
        return HandKind::Straight;
    }
    if top >= 3 {
        return HandKind::Trips;
    }
    if top == 2 && second == 2 {
        return HandKind::TwoPair;
    }
    if top >= 2 {
        return HandKind::Pair;
    }
    HandKind::HighCard
}

/// Five consecutive distinct values anywhere in the cards, with the A-2-3-4-5
/// wheel as the only wraparound.
pub fn has_straight(cards: &[Card]) -> bool {
    if cards.len() < STRAIGHT_LEN {
        return false;
    }
    let mut values: Vec<u8> = cards.iter().map(|card| card.value()).collect();
    values.sort_unstable();
    values.dedup();
    if WHEEL.iter().all(|value| values.contains(value)) {
        return true;
    }
    let mut run = 1usize;
    for pair in values.windows(2) {
        if pair[1] == pair[0] + 1 {
            run += 1;
            if run >= STRAIGHT_LEN {
                return true;
            }
        } else {
            run = 1;
        }
    }
    false
}

/// How many cards of each suit the hand holds.
pub fn suit_count(cards: &[Card], suit: Suit) -> usize {
    cards.iter().filter(|card| card.suit == suit).count()
}

pub fn has_all_suits(cards: &[Card]) -> bool {
    Suit::ALL.iter().all(|suit| suit_count(cards, *suit) > 0)
}
