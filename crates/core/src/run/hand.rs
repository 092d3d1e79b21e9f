use crate::*;

impl RunState {
    /// With no selection, moves the pending card into the hand for free. With a
    /// selection, spends one discard to throw those cards away first.
    pub fn take_or_discard(
        &mut self,
        selected: &[CardId],
        events: &mut EventBus,
    ) -> Result<(), RunError> {
        self.require_phase(Phase::Deciding)?;
        if selected.is_empty() {
            self.take_card(events)
        } else {
            self.discard_and_take(selected, events)
        }
    }

    pub fn take_card(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.require_phase(Phase::Deciding)?;
        if self.hand_is_full() {
            return self.reject(RunError::HandFull);
        }
        let Some(card) = self.pending else {
            return self.reject(RunError::NoPendingCard);
        };
        self.move_pending_to_hand(card, events);
        self.draw_next(events);
        Ok(())
    }

    pub fn discard_and_take(
        &mut self,
        selected: &[CardId],
        events: &mut EventBus,
    ) -> Result<(), RunError> {
        self.require_phase(Phase::Deciding)?;
        if selected.is_empty() {
            return self.reject(RunError::InvalidSelection);
        }
        for (pos, id) in selected.iter().enumerate() {
            if selected[..pos].contains(id) {
                return self.reject(RunError::InvalidSelection);
            }
            if !self.hand.contains(id) {
                return self.reject(RunError::CardNotInHand(*id));
            }
        }
        if self.state.discards_left == 0 {
            return self.reject(RunError::NoDiscardsLeft);
        }

        self.state.discards_left -= 1;
        self.hand.retain(|id| !selected.contains(id));
        self.deck.discard(selected);
        self.state.run_discards = self
            .state
            .run_discards
            .saturating_add(selected.len() as u32);
        self.message = format!("Discarded {} card(s)", selected.len());
        events.push(Event::CardsDiscarded {
            cards: selected.to_vec(),
            discards_left: self.state.discards_left,
            run_discards: self.state.run_discards,
        });
        if let Some(card) = self.pending {
            self.move_pending_to_hand(card, events);
        }
        self.draw_next(events);
        Ok(())
    }

    /// Scores the held hand and discards it. Reaching the target ends the round
    /// and opens the shop; running out of hands ends the run.
    pub fn score_hand(&mut self, events: &mut EventBus) -> Result<ScoreBreakdown, RunError> {
        self.require_phase(Phase::Deciding)?;
        if self.hand.is_empty() {
            return self.reject(RunError::EmptyHand);
        }

        let cards = self.hand_cards();
        let ctx = ScoreContext {
            run_discards: self.state.run_discards,
            draw_pile_size: self.deck.draw_pile().len(),
        };
        let breakdown = score_hand(&cards, &self.inventory.jokers, ctx, &self.tables);
        let total = breakdown.total_score();
        self.state.score_total = self.state.score_total.saturating_add(total);
        self.state.coins = self.state.coins.saturating_add(breakdown.coins);
        let scored: Vec<CardId> = self.hand.drain(..).collect();
        self.deck.discard(&scored);
        if let Some(hand) = breakdown.hand {
            events.push(Event::HandScored {
                hand,
                chips: breakdown.total.chips,
                mult: breakdown.total.mult,
                total,
                coins: breakdown.coins,
            });
        }
        self.message = format!(
            "Scored {}! ({} x {})",
            total, breakdown.total.chips, breakdown.total.mult
        );
        self.last_breakdown = Some(breakdown.clone());

        if self.state.target_reached() {
            self.finish_round(events);
            return Ok(breakdown);
        }
        self.state.hands_played = self.state.hands_played.saturating_add(1);
        if self.state.hands_played >= self.state.hands_max {
            self.clear_table();
            self.state.phase = Phase::GameOver;
            self.message = format!("Game over at level {}", self.state.round_level);
            events.push(Event::GameOver {
                level: self.state.round_level,
                score: self.state.score_total,
            });
            return Ok(breakdown);
        }
        self.draw_next(events);
        Ok(breakdown)
    }

    fn move_pending_to_hand(&mut self, card: CardId, events: &mut EventBus) {
        self.pending = None;
        self.deck.move_to_hand(card);
        self.hand.push(card);
        events.push(Event::CardTaken { card });
    }

    /// Pays out unused resources, then opens the shop.
    fn finish_round(&mut self, events: &mut EventBus) {
        self.clear_table();
        let reward = self.state.unused_reward(&self.config.economy);
        let bonus = if self.state.no_discards_used() {
            self.inventory.clean_round_bonus()
        } else {
            0
        };
        self.state.coins = self.state.coins.saturating_add(reward.saturating_add(bonus));
        events.push(Event::RoundCleared {
            score: self.state.score_total,
            reward,
            bonus,
            coins: self.state.coins,
        });
        self.enter_shop(events);
        self.message = format!("Round Cleared! Earned ${} for unused resources.", reward + bonus);
    }
}
