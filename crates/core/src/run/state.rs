use crate::*;

impl RunState {
    /// Builds a run in the `Drawing` phase; call [`RunState::start_round`] to deal.
    pub fn new(config: GameConfig, content: Content, seed: u64) -> Self {
        let tables = ScoreTables::from_config(&config);
        let state = GameState::new(&config);
        let inventory = Inventory::with_slots(config.run.max_jokers);
        Self {
            config,
            tables,
            content,
            inventory,
            rng: RngState::from_seed(seed),
            deck: Deck::standard52(),
            hand: Vec::new(),
            pending: None,
            state,
            shop: None,
            pack: None,
            last_breakdown: None,
            message: String::new(),
        }
    }

    /// Drawing → Deciding. Resets the round counters, reshuffles the live deck
    /// and draws the first card. Owned jokers carry over.
    pub fn start_round(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.require_phase(Phase::Drawing)?;
        let run = &self.config.run;
        self.state.hands_max = run.base_hands.saturating_add(self.inventory.extra_hands());
        self.state.discards_max = run
            .base_discards
            .saturating_add(self.inventory.extra_discards());
        self.state.hands_played = 0;
        self.state.discards_left = self.state.discards_max;
        self.state.score_total = 0;
        self.hand.clear();
        self.pending = None;
        self.shop = None;
        self.pack = None;
        self.last_breakdown = None;
        self.deck.start_round(&mut self.rng);
        self.message = format!("Level {} Start!", self.state.round_level);
        events.push(Event::RoundStarted {
            level: self.state.round_level,
            target: self.state.target_score,
            hands: self.state.hands_max,
            discards: self.state.discards_max,
        });
        self.state.phase = Phase::Deciding;
        self.draw_next(events);
        Ok(())
    }

    /// GameOver → Drawing → Deciding with a fresh run: base counters, no jokers
    /// and a new unmodified 52-card deck.
    pub fn restart_run(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.require_phase(Phase::GameOver)?;
        self.state = GameState::new(&self.config);
        self.inventory.clear();
        self.deck = Deck::standard52();
        self.hand.clear();
        self.pending = None;
        events.push(Event::RunRestarted {
            seed: self.rng.seed(),
        });
        self.start_round(events)
    }

    pub fn check_conservation(&self) -> Result<(), DeckError> {
        self.deck.check_conservation(&self.hand, self.pending)
    }

    pub fn hand_cards(&self) -> Vec<Card> {
        self.deck.resolve(&self.hand)
    }

    pub fn pending_card(&self) -> Option<Card> {
        self.pending.and_then(|id| self.deck.card(id).copied())
    }

    pub fn hand_is_full(&self) -> bool {
        self.hand.len() >= self.config.run.max_hand_size
    }

    pub(super) fn require_phase(&mut self, phase: Phase) -> Result<(), RunError> {
        if self.state.phase != phase {
            return self.reject(RunError::InvalidPhase(self.state.phase));
        }
        Ok(())
    }

    /// Records the rejection message and hands the error back unchanged.
    pub(super) fn reject<T>(&mut self, err: RunError) -> Result<T, RunError> {
        self.message = err.to_string();
        Err(err)
    }

    /// Fills the pending slot if it is empty. An exhausted deck is reported,
    /// not treated as an error.
    pub(super) fn draw_next(&mut self, events: &mut EventBus) {
        if self.pending.is_some() {
            return;
        }
        let recycle_size = self.deck.discard_pile().len();
        match self.deck.draw_card(&mut self.rng) {
            Some(drawn) => {
                if drawn.recycled {
                    events.push(Event::DeckRecycled {
                        cards: recycle_size,
                    });
                }
                self.pending = Some(drawn.id);
                events.push(Event::CardDrawn { card: drawn.id });
            }
            None => {
                self.message = "Deck empty!".to_string();
                events.push(Event::DeckExhausted);
            }
        }
    }

    /// Puts any card still on the table back into the discard pile.
    pub(super) fn clear_table(&mut self) {
        let mut table: Vec<CardId> = self.hand.drain(..).collect();
        table.extend(self.pending.take());
        self.deck.discard(&table);
    }
}
