use warlatro_core::{
    CardLocation, CardModifier, Content, Event, EventBus, GameConfig, JokerDef, JokerInstance,
    JokerOffer, PackError, Phase, RoundBonus, RunError, RunState, ShopItem, ShopState,
};

fn def(key: &str, cost: i64) -> JokerDef {
    JokerDef {
        key: key.to_string(),
        name: key.to_string(),
        cost,
        description: String::new(),
        effects: Vec::new(),
        round: RoundBonus::default(),
    }
}

fn content() -> Content {
    Content {
        jokers: vec![def("a", 4), def("b", 5), def("c", 6), def("d", 7)],
    }
}

fn started(config: GameConfig, seed: u64) -> (RunState, EventBus) {
    let mut events = EventBus::default();
    let mut run = RunState::new(config, content(), seed);
    run.start_round(&mut events).expect("start round");
    (run, events)
}

fn easy_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.run.base_target = 1;
    config
}

fn hard_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.run.base_target = 1_000_000;
    config
}

fn reach_shop(run: &mut RunState, events: &mut EventBus) {
    run.take_or_discard(&[], events).expect("take");
    run.score_hand(events).expect("score");
    assert_eq!(run.state.phase, Phase::Shopping);
}

fn cleared_reward(events: &mut EventBus) -> Option<i64> {
    events.drain().find_map(|event| match event {
        Event::RoundCleared { reward, .. } => Some(reward),
        _ => None,
    })
}

#[test]
fn new_round_deals_one_pending_card() {
    let (run, _) = started(GameConfig::default(), 1);
    assert_eq!(run.state.phase, Phase::Deciding);
    assert!(run.pending.is_some());
    assert!(run.hand.is_empty());
    assert_eq!(run.state.hands_left(), 3);
    assert_eq!(run.state.discards_left, 5);
    assert_eq!(run.deck.counts().remaining, 51);
    run.check_conservation().expect("conserved");
}

#[test]
fn taking_fills_the_hand_until_full() {
    let (mut run, mut events) = started(GameConfig::default(), 2);
    for expected in 1..=5 {
        run.take_or_discard(&[], &mut events).expect("take");
        assert_eq!(run.hand.len(), expected);
        run.check_conservation().expect("conserved");
    }
    let before = run.hand.clone();
    assert_eq!(
        run.take_or_discard(&[], &mut events),
        Err(RunError::HandFull)
    );
    assert_eq!(run.hand, before);
    assert_eq!(run.message, RunError::HandFull.to_string());
}

#[test]
fn discarding_spends_one_discard_and_takes_the_pending_card() {
    let (mut run, mut events) = started(GameConfig::default(), 3);
    run.take_or_discard(&[], &mut events).expect("take");
    run.take_or_discard(&[], &mut events).expect("take");
    let thrown = vec![run.hand[0], run.hand[1]];
    let pending = run.pending.expect("pending card");
    run.take_or_discard(&thrown, &mut events).expect("discard");
    assert_eq!(run.hand, vec![pending]);
    assert_eq!(run.state.discards_left, 4);
    assert_eq!(run.state.run_discards, 2);
    for id in &thrown {
        assert_eq!(run.deck.location(*id), Some(CardLocation::DiscardPile));
    }
    run.check_conservation().expect("conserved");
}

#[test]
fn discarding_rejects_cards_outside_the_hand() {
    let (mut run, mut events) = started(GameConfig::default(), 4);
    run.take_or_discard(&[], &mut events).expect("take");
    let stranger = run.pending.expect("pending card");
    assert_eq!(
        run.take_or_discard(&[stranger], &mut events),
        Err(RunError::CardNotInHand(stranger))
    );
    let held = run.hand[0];
    assert_eq!(
        run.take_or_discard(&[held, held], &mut events),
        Err(RunError::InvalidSelection)
    );
    assert_eq!(run.state.discards_left, 5);
}

#[test]
fn discarding_without_discards_is_rejected() {
    let (mut run, mut events) = started(GameConfig::default(), 5);
    run.take_or_discard(&[], &mut events).expect("take");
    run.state.discards_left = 0;
    let held = run.hand.clone();
    assert_eq!(
        run.take_or_discard(&held, &mut events),
        Err(RunError::NoDiscardsLeft)
    );
    assert_eq!(run.hand, held);
    assert_eq!(run.state.run_discards, 0);
}

#[test]
fn scoring_an_empty_hand_is_rejected() {
    let (mut run, mut events) = started(GameConfig::default(), 6);
    assert_eq!(run.score_hand(&mut events), Err(RunError::EmptyHand));
    assert_eq!(run.state.hands_played, 0);
}

#[test]
fn commands_outside_their_phase_are_rejected() {
    let (mut run, mut events) = started(GameConfig::default(), 7);
    assert_eq!(
        run.buy_shop_item(0, &mut events),
        Err(RunError::InvalidPhase(Phase::Deciding))
    );
    assert_eq!(
        run.skip_pack(&mut events),
        Err(RunError::InvalidPhase(Phase::Deciding))
    );
    assert_eq!(
        run.restart_run(&mut events),
        Err(RunError::InvalidPhase(Phase::Deciding))
    );
}

#[test]
fn round_reward_counts_unused_hands_and_discards() {
    let (mut run, mut events) = started(hard_config(), 8);
    run.take_or_discard(&[], &mut events).expect("take");
    run.score_hand(&mut events).expect("first hand");
    assert_eq!(run.state.hands_played, 1);
    for _ in 0..2 {
        run.take_or_discard(&[], &mut events).expect("take");
        let held = vec![run.hand[0]];
        run.take_or_discard(&held, &mut events).expect("discard");
    }
    assert_eq!(run.state.discards_left, 3);
    events.drain().for_each(drop);

    run.state.target_score = 1;
    let coins = run.state.coins;
    let breakdown = run.score_hand(&mut events).expect("clearing hand");
    assert_eq!(run.state.phase, Phase::Shopping);
    assert_eq!(cleared_reward(&mut events), Some(2 * 2 + 3));
    assert_eq!(run.state.coins, coins + 7 + breakdown.coins);
    run.check_conservation().expect("conserved");
    assert!(run.hand.is_empty());
    assert!(run.pending.is_none());
}

#[test]
fn clean_round_bonus_pays_per_owned_joker() {
    let (mut run, mut events) = started(easy_config(), 9);
    let mut pockets = def("deep_pockets", 6);
    pockets.round.clean_round_coins_per_joker = 3;
    run.inventory
        .add_joker(JokerInstance::from_def(&pockets))
        .expect("slot");
    run.inventory
        .add_joker(JokerInstance::from_def(&def("a", 4)))
        .expect("slot");
    reach_shop(&mut run, &mut events);
    let bonus = events.drain().find_map(|event| match event {
        Event::RoundCleared { bonus, .. } => Some(bonus),
        _ => None,
    });
    assert_eq!(bonus, Some(6));
}

#[test]
fn shop_lists_pack_then_joker() {
    let (mut run, mut events) = started(easy_config(), 10);
    reach_shop(&mut run, &mut events);
    let shop = run.shop.as_ref().expect("shop");
    assert!(matches!(shop.items[0], ShopItem::Pack(_)));
    assert!(matches!(shop.items[1], ShopItem::Joker(_)));
}

#[test]
fn unaffordable_joker_changes_nothing() {
    let (mut run, mut events) = started(easy_config(), 11);
    reach_shop(&mut run, &mut events);
    run.shop = Some(ShopState {
        items: vec![ShopItem::Joker(JokerOffer {
            def: def("d", 7),
            price: 7,
        })],
    });
    run.state.coins = 5;
    assert_eq!(
        run.buy_shop_item(0, &mut events),
        Err(RunError::InsufficientFunds {
            needed: 7,
            available: 5
        })
    );
    assert_eq!(run.state.coins, 5);
    assert!(run.inventory.jokers.is_empty());
    assert_eq!(run.shop.as_ref().map(|shop| shop.items.len()), Some(1));
    assert!(!run.can_afford(0));
}

#[test]
fn full_inventory_blocks_joker_purchase() {
    let (mut run, mut events) = started(easy_config(), 12);
    reach_shop(&mut run, &mut events);
    for key in ["a", "b", "c"] {
        run.inventory
            .add_joker(JokerInstance::from_def(&def(key, 4)))
            .expect("slot");
    }
    run.shop = Some(ShopState {
        items: vec![ShopItem::Joker(JokerOffer {
            def: def("d", 7),
            price: 7,
        })],
    });
    run.state.coins = 50;
    assert_eq!(
        run.buy_shop_item(0, &mut events),
        Err(RunError::InventoryFull)
    );
    assert_eq!(run.state.coins, 50);
    assert_eq!(run.inventory.jokers.len(), 3);
}

#[test]
fn buying_a_joker_moves_it_into_the_inventory() {
    let (mut run, mut events) = started(easy_config(), 13);
    reach_shop(&mut run, &mut events);
    run.state.coins = 20;
    let price = run.shop.as_ref().and_then(|shop| shop.price(1)).expect("joker slot");
    let item = run.buy_shop_item(1, &mut events).expect("buy");
    assert!(matches!(item, ShopItem::Joker(_)));
    assert_eq!(run.state.coins, 20 - price);
    assert_eq!(run.inventory.jokers.len(), 1);
    assert_eq!(run.state.phase, Phase::Shopping);
}

#[test]
fn selling_refunds_half_the_price() {
    let (mut run, mut events) = started(GameConfig::default(), 14);
    run.inventory
        .add_joker(JokerInstance::from_def(&def("c", 6)))
        .expect("slot");
    let coins = run.state.coins;
    assert_eq!(run.joker_sell_value(0), Some(3));
    assert_eq!(run.sell_joker(0, &mut events), Ok(3));
    assert_eq!(run.state.coins, coins + 3);
    assert!(run.inventory.jokers.is_empty());
    assert_eq!(
        run.sell_joker(0, &mut events),
        Err(RunError::InvalidJokerIndex(0))
    );
}

#[test]
fn destroyed_cards_never_return() {
    let (mut run, mut events) = started(easy_config(), 15);
    reach_shop(&mut run, &mut events);
    run.state.coins = 20;
    run.buy_shop_item(0, &mut events).expect("buy pack");
    assert_eq!(run.state.phase, Phase::PackOpening);

    let target = {
        let pack = run.pack.as_mut().expect("open pack");
        pack.modifiers = vec![CardModifier::Destroy];
        pack.cards[0]
    };
    assert_eq!(
        run.apply_pack_modifier(0, &mut events),
        Err(RunError::Pack(PackError::NothingSelected))
    );
    run.select_pack_cards(&[target]).expect("select");
    run.apply_pack_modifier(0, &mut events).expect("apply");
    assert_eq!(run.state.phase, Phase::Shopping);
    assert_eq!(run.deck.counts().total, 51);
    assert_eq!(run.deck.location(target), Some(CardLocation::Destroyed));
    run.check_conservation().expect("conserved");

    for _ in 0..3 {
        run.advance_round(&mut events).expect("next round");
        for _ in 0..40 {
            assert_ne!(run.pending, Some(target));
            assert!(!run.deck.draw_pile().contains(&target));
            assert!(!run.deck.discard_pile().contains(&target));
            if run.hand_is_full() {
                let held = vec![run.hand[0]];
                if run.take_or_discard(&held, &mut events).is_err() {
                    break;
                }
            } else if run.take_or_discard(&[], &mut events).is_err() {
                break;
            }
        }
        run.state.target_score = 1;
        run.score_hand(&mut events).expect("clear round");
        assert_eq!(run.state.phase, Phase::Shopping);
    }
}

#[test]
fn third_pack_pick_is_rejected() {
    let (mut run, mut events) = started(easy_config(), 16);
    reach_shop(&mut run, &mut events);
    run.state.coins = 20;
    run.buy_shop_item(0, &mut events).expect("buy pack");
    let cards = run.pack.as_ref().expect("pack").cards.clone();
    run.select_pack_cards(&cards[..2]).expect("two picks");
    assert_eq!(
        run.select_pack_cards(&cards[2..3]),
        Err(RunError::Pack(PackError::TooManyPicks(2)))
    );
    run.skip_pack(&mut events).expect("skip");
    assert_eq!(run.state.phase, Phase::Shopping);
    assert!(run.pack.is_none());
    assert!(run.deck.cards().iter().all(|card| card.modifier.is_none()));
}

#[test]
fn next_level_raises_the_target_and_keeps_jokers() {
    let (mut run, mut events) = started(GameConfig::default(), 17);
    run.inventory
        .add_joker(JokerInstance::from_def(&def("a", 4)))
        .expect("slot");
    run.state.target_score = 1;
    reach_shop(&mut run, &mut events);
    run.advance_round(&mut events).expect("advance");
    assert_eq!(run.state.round_level, 2);
    assert_eq!(run.state.target_score, 1);
    assert_eq!(run.state.score_total, 0);
    assert_eq!(run.inventory.jokers.len(), 1);
    assert_eq!(run.state.phase, Phase::Deciding);

    run.state.target_score = 300;
    run.state.phase = Phase::Shopping;
    run.shop = Some(ShopState::default());
    run.advance_round(&mut events).expect("advance");
    assert_eq!(run.state.target_score, 450);
}

#[test]
fn extra_hand_jokers_widen_the_round() {
    let mut helping = def("helping_hand", 5);
    helping.round.extra_hands = 1;
    let mut events = EventBus::default();
    let mut run = RunState::new(GameConfig::default(), content(), 18);
    run.inventory
        .add_joker(JokerInstance::from_def(&helping))
        .expect("slot");
    run.start_round(&mut events).expect("start");
    assert_eq!(run.state.hands_max, 4);
}

#[test]
fn running_out_of_hands_ends_the_run_and_restart_resets_it() {
    let (mut run, mut events) = started(hard_config(), 19);
    run.inventory
        .add_joker(JokerInstance::from_def(&def("a", 4)))
        .expect("slot");
    run.take_or_discard(&[], &mut events).expect("take");
    let held = vec![run.hand[0]];
    run.take_or_discard(&held, &mut events).expect("discard");
    for _ in 0..3 {
        let _ = run.take_or_discard(&[], &mut events);
        run.score_hand(&mut events).expect("score");
    }
    assert_eq!(run.state.phase, Phase::GameOver);
    assert!(events
        .drain()
        .any(|event| matches!(event, Event::GameOver { .. })));
    run.check_conservation().expect("conserved");

    run.restart_run(&mut events).expect("restart");
    assert_eq!(run.state.phase, Phase::Deciding);
    assert_eq!(run.state.round_level, 1);
    assert_eq!(run.state.run_discards, 0);
    assert_eq!(run.state.coins, 5);
    assert!(run.inventory.jokers.is_empty());
    assert_eq!(run.deck.counts().total, 52);
}

#[test]
fn run_discards_only_grow_within_a_run() {
    let (mut run, mut events) = started(easy_config(), 20);
    let mut last = 0;
    for _ in 0..3 {
        run.take_or_discard(&[], &mut events).expect("take");
        let held = vec![run.hand[0]];
        run.take_or_discard(&held, &mut events).expect("discard");
        assert!(run.state.run_discards > last);
        last = run.state.run_discards;
        run.score_hand(&mut events).expect("score");
        assert_eq!(run.state.run_discards, last);
        run.advance_round(&mut events).expect("advance");
        assert_eq!(run.state.run_discards, last);
    }
}

#[test]
fn conservation_holds_through_a_seeded_session() {
    for seed in 0..12 {
        let (mut run, mut events) = started(GameConfig::default(), seed);
        for step in 0..200 {
            match run.state.phase {
                Phase::Deciding if run.hand_is_full() => {
                    if step % 3 == 0 && run.state.discards_left > 0 {
                        let held = vec![run.hand[0], run.hand[1]];
                        run.take_or_discard(&held, &mut events).expect("discard");
                    } else {
                        run.score_hand(&mut events).expect("score");
                    }
                }
                Phase::Deciding => {
                    if run.take_or_discard(&[], &mut events).is_err() {
                        run.score_hand(&mut events).expect("score short hand");
                    }
                }
                Phase::Shopping => {
                    let _ = run.buy_shop_item(0, &mut events);
                    if run.state.phase == Phase::Shopping {
                        run.advance_round(&mut events).expect("advance");
                    }
                }
                Phase::PackOpening => {
                    let first = run.pack.as_ref().and_then(|pack| pack.cards.first().copied());
                    if let Some(id) = first {
                        run.select_pack_cards(&[id]).expect("select");
                        run.apply_pack_modifier(0, &mut events).expect("apply");
                    } else {
                        run.skip_pack(&mut events).expect("skip");
                    }
                }
                Phase::GameOver => run.restart_run(&mut events).expect("restart"),
                Phase::Drawing => unreachable!("drawing never persists"),
            }
            run.check_conservation()
                .unwrap_or_else(|err| panic!("seed {seed} step {step}: {err}"));
        }
    }
}

#[test]
fn same_seed_same_run() {
    let play = |seed| {
        let (mut run, mut events) = started(easy_config(), seed);
        for _ in 0..4 {
            run.take_or_discard(&[], &mut events).expect("take");
        }
        run.score_hand(&mut events).expect("score");
        let log: Vec<Event> = events.drain().collect();
        (log, run.snapshot())
    };
    assert_eq!(play(21), play(21));
}
