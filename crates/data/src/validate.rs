use anyhow::{bail, ensure};
use std::collections::HashSet;
use warlatro_core::{Condition, Content, GameConfig, HandKind, JokerEffect, Scale};

pub fn validate_config(config: &GameConfig) -> anyhow::Result<()> {
    let run = &config.run;
    ensure!(run.max_hand_size > 0, "max_hand_size must be positive");
    ensure!(run.base_hands > 0, "base_hands must be positive");
    ensure!(run.base_target > 0, "base_target must be positive");
    ensure!(
        run.target_growth_num > 0 && run.target_growth_den > 0,
        "target growth must be a positive fraction"
    );
    ensure!(run.starting_coins >= 0, "starting_coins cannot be negative");

    for kind in HandKind::ALL {
        let count = config.hands.iter().filter(|rule| rule.kind == kind).count();
        ensure!(count == 1, "hand {:?} listed {} times", kind, count);
    }
    for rule in &config.hands {
        ensure!(
            rule.chips >= 0 && rule.mult >= 0,
            "hand {:?} has a negative base",
            rule.kind
        );
    }

    let economy = &config.economy;
    ensure!(
        economy.per_hand_reward >= 0 && economy.per_discard_reward >= 0,
        "rewards cannot be negative"
    );

    let shop = &config.shop;
    ensure!(!shop.slots.is_empty(), "shop needs at least one slot");
    ensure!(shop.pack_cost >= 0, "pack_cost cannot be negative");
    ensure!(shop.pack_cards > 0, "pack_cards must be positive");
    ensure!(shop.pack_picks > 0, "pack_picks must be positive");
    ensure!(
        shop.pack_modifier_choices > 0 && shop.pack_modifier_choices <= config.modifiers.len(),
        "pack_modifier_choices must be between 1 and {}",
        config.modifiers.len()
    );
    Ok(())
}

pub fn validate_content(content: &Content) -> anyhow::Result<()> {
    let mut keys = HashSet::new();
    for joker in &content.jokers {
        ensure!(!joker.key.is_empty(), "joker key cannot be empty");
        if !keys.insert(joker.key.as_str()) {
            bail!("duplicate joker {}", joker.key);
        }
        ensure!(joker.cost >= 0, "joker {} has a negative cost", joker.key);
        for effect in &joker.effects {
            validate_effect(&joker.key, effect)?;
        }
    }
    Ok(())
}

fn validate_effect(key: &str, effect: &JokerEffect) -> anyhow::Result<()> {
    match &effect.scale {
        Scale::PerValueIn(values) => {
            if let Some(value) = values.iter().find(|value| !(2..=14).contains(*value)) {
                bail!("joker {} counts card value {} outside 2..=14", key, value);
            }
        }
        Scale::RunDiscards { per } => {
            ensure!(*per > 0, "joker {} scales per zero discards", key);
        }
        Scale::Flat | Scale::PerSuit(_) | Scale::DrawPileCards => {}
    }
    for condition in &effect.conditions {
        if let Condition::HandIn(kinds) = condition {
            ensure!(!kinds.is_empty(), "joker {} has an empty hand_in", key);
        }
    }
    if effect.is_multiplicative() {
        ensure!(effect.amount >= 1, "joker {} multiplies by {}", key, effect.amount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use warlatro_core::{EffectKind, JokerDef, RoundBonus};

    fn joker(key: &str, effects: Vec<JokerEffect>) -> JokerDef {
        JokerDef {
            key: key.to_string(),
            name: key.to_string(),
            cost: 4,
            description: String::new(),
            effects,
            round: RoundBonus::default(),
        }
    }

    #[test]
    fn default_config_is_valid() {
        validate_config(&GameConfig::default()).expect("valid");
    }

    #[test]
    fn missing_hand_rule_is_rejected() {
        let mut config = GameConfig::default();
        config.hands.retain(|rule| rule.kind != HandKind::Flush);
        let err = validate_config(&config).expect_err("missing flush");
        assert!(err.to_string().contains("Flush"));
    }

    #[test]
    fn duplicate_joker_keys_are_rejected() {
        let content = Content {
            jokers: vec![joker("a", Vec::new()), joker("a", Vec::new())],
        };
        assert!(validate_content(&content).is_err());
    }

    #[test]
    fn out_of_range_card_values_are_rejected() {
        let effect = JokerEffect {
            kind: EffectKind::AddMult,
            amount: 1,
            scale: Scale::PerValueIn(vec![1]),
            conditions: Vec::new(),
        };
        let content = Content {
            jokers: vec![joker("low", vec![effect])],
        };
        assert!(validate_content(&content).is_err());
    }
}
