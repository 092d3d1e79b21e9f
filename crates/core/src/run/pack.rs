use crate::*;

impl RunState {
    pub fn select_pack_cards(&mut self, ids: &[CardId]) -> Result<(), RunError> {
        self.require_phase(Phase::PackOpening)?;
        let Some(pack) = self.pack.as_mut() else {
            return self.reject(RunError::InvalidPhase(Phase::PackOpening));
        };
        match pack.toggle(ids) {
            Ok(()) => {
                self.message = format!("{} card(s) selected", pack.selected.len());
                Ok(())
            }
            Err(err) => self.reject(err.into()),
        }
    }

    /// Applies the chosen modifier to every selected card and closes the pack.
    pub fn apply_pack_modifier(
        &mut self,
        choice: usize,
        events: &mut EventBus,
    ) -> Result<CardModifier, RunError> {
        self.require_phase(Phase::PackOpening)?;
        let (modifier, selected) = match self.pack.as_ref() {
            Some(pack) => match pack.choice(choice) {
                Ok(modifier) => (modifier, pack.selected.clone()),
                Err(err) => return self.reject(err.into()),
            },
            None => return self.reject(RunError::InvalidSelection),
        };
        for id in &selected {
            if let Err(err) = self.deck.check_modifiable(*id) {
                return self.reject(err.into());
            }
        }
        for id in &selected {
            self.deck.apply_modifier(*id, modifier)?;
        }
        self.message = format!("Applied {} to {} card(s)", modifier.id(), selected.len());
        events.push(Event::PackModifierApplied {
            modifier,
            cards: selected,
        });
        self.pack = None;
        self.state.phase = Phase::Shopping;
        Ok(modifier)
    }

    pub fn skip_pack(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.require_phase(Phase::PackOpening)?;
        self.pack = None;
        self.message = "Pack skipped".to_string();
        events.push(Event::PackSkipped);
        self.state.phase = Phase::Shopping;
        Ok(())
    }
}
