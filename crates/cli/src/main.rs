use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use warlatro_core::{
    score_hand, Card, CardId, CardModifier, Event, EventBus, Phase, RunError, RunSnapshot,
    RunState, ScoreContext, ShopItem,
};
use warlatro_data::load_assets;

const DEFAULT_RUN_SEED: u64 = 0xC0FFEE;
const AUTO_LEVEL_CAP: u32 = 8;
const AUTO_STEP_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Default)]
struct CliOptions {
    auto: bool,
    events_json: bool,
    seed: Option<u64>,
    assets: Option<PathBuf>,
}

/// One JSON line per event in `--events-json` mode.
#[derive(Serialize)]
struct EventLine<'a> {
    seq: u64,
    level: u32,
    event: &'a Event,
}

struct EventPrinter {
    json: bool,
    seq: u64,
}

impl EventPrinter {
    fn new(json: bool) -> Self {
        Self { json, seq: 0 }
    }

    fn drain(&mut self, run: &RunState, events: &mut EventBus) {
        for event in events.drain() {
            self.seq += 1;
            if self.json {
                let line = EventLine {
                    seq: self.seq,
                    level: run.state.round_level,
                    event: &event,
                };
                match serde_json::to_string(&line) {
                    Ok(text) => println!("{text}"),
                    Err(err) => eprintln!("event encode error: {err}"),
                }
            } else {
                println!("event: {}", format_event(run, &event));
            }
        }
    }
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--auto" => options.auto = true,
            "--events-json" => options.events_json = true,
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    options.seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    options.assets = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    options
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    let (config, content) = match load_assets(options.assets.as_deref()) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("asset load error: {err:#}");
            std::process::exit(1);
        }
    };
    let seed = options.seed.unwrap_or(DEFAULT_RUN_SEED);
    let mut run = RunState::new(config, content, seed);
    let mut events = EventBus::default();
    let mut printer = EventPrinter::new(options.events_json);
    if let Err(err) = run.start_round(&mut events) {
        eprintln!("start error: {err}");
        std::process::exit(1);
    }
    printer.drain(&run, &mut events);

    if options.auto {
        run_auto(&mut run, &mut events, &mut printer);
    } else {
        run_repl(&mut run, &mut events, &mut printer);
    }
}

fn run_repl(run: &mut RunState, events: &mut EventBus, printer: &mut EventPrinter) {
    print_help();
    print_state(run);
    print_hand(run);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", phase_short(run.state.phase));
        let _ = io::stdout().flush();
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(err)) => {
                eprintln!("read error: {err}");
                break;
            }
            None => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();
        let result = match cmd {
            "help" | "h" | "?" => {
                print_help();
                continue;
            }
            "quit" | "exit" | "q" => break,
            "state" | "s" => {
                if args.first() == Some(&"--json") {
                    print_json(&run.snapshot());
                } else {
                    print_state(run);
                }
                continue;
            }
            "hand" => {
                print_hand(run);
                continue;
            }
            "shop" => {
                print_shop(run);
                continue;
            }
            "deck" => {
                print_deck(run);
                continue;
            }
            "take" | "t" => run.take_or_discard(&[], events),
            "discard" | "d" => match parse_indices_result(&args) {
                Ok(indices) => match hand_ids(run, &indices) {
                    Ok(ids) => run.take_or_discard(&ids, events),
                    Err(err) => Err(err),
                },
                Err(err) => {
                    println!("error: {err}");
                    continue;
                }
            },
            "score" | "play" | "p" => run.score_hand(events).map(|breakdown| {
                print_breakdown(&breakdown.labels());
            }),
            "buy" | "b" => match parse_index(&args) {
                Ok(slot) => run.buy_shop_item(slot, events).map(|item| {
                    println!("bought: {}", item.label());
                }),
                Err(err) => {
                    println!("error: {err}");
                    continue;
                }
            },
            "next" | "n" => run.advance_round(events),
            "pick" => match parse_indices_result(&args) {
                Ok(indices) => match pack_ids(run, &indices) {
                    Ok(ids) => run.select_pack_cards(&ids),
                    Err(err) => Err(err),
                },
                Err(err) => {
                    println!("error: {err}");
                    continue;
                }
            },
            "apply" => match parse_index(&args) {
                Ok(choice) => run.apply_pack_modifier(choice, events).map(|modifier| {
                    println!("applied: {}", modifier_label(modifier));
                }),
                Err(err) => {
                    println!("error: {err}");
                    continue;
                }
            },
            "skip" => run.skip_pack(events),
            "sell" => match parse_index(&args) {
                Ok(index) => run.sell_joker(index, events).map(|refund| {
                    println!("sold for ${refund}");
                }),
                Err(err) => {
                    println!("error: {err}");
                    continue;
                }
            },
            "restart" => run.restart_run(events),
            _ => {
                println!("unknown command: {cmd} (try 'help')");
                continue;
            }
        };
        printer.drain(run, events);
        match result {
            Ok(()) => print_after_command(run),
            Err(err) => println!("error: {err}"),
        }
    }
}

fn print_after_command(run: &RunState) {
    if !run.message.is_empty() {
        println!("{}", run.message);
    }
    match run.state.phase {
        Phase::Deciding => print_hand(run),
        Phase::Shopping => {
            print_state(run);
            print_shop(run);
        }
        Phase::PackOpening => print_pack(run),
        Phase::GameOver => println!("game over. type 'restart' to play again"),
        Phase::Drawing => {}
    }
}

/// Greedy self-play: keep the best five cards seen, buy what is affordable.
fn run_auto(run: &mut RunState, events: &mut EventBus, printer: &mut EventPrinter) {
    for _ in 0..AUTO_STEP_LIMIT {
        let result = match run.state.phase {
            Phase::Deciding => auto_decide(run, events),
            Phase::Shopping if run.state.round_level >= AUTO_LEVEL_CAP => break,
            Phase::Shopping => auto_shop(run, events),
            Phase::PackOpening => auto_pack(run, events),
            Phase::GameOver | Phase::Drawing => break,
        };
        printer.drain(run, events);
        if let Err(err) = result {
            eprintln!("auto: {err}");
            break;
        }
    }
    if !printer.json {
        print_state(run);
    }
}

fn auto_decide(run: &mut RunState, events: &mut EventBus) -> Result<(), RunError> {
    let Some(pending) = run.pending_card() else {
        return run.score_hand(events).map(|_| ());
    };
    if !run.hand_is_full() {
        return run.take_or_discard(&[], events);
    }
    let hand = run.hand_cards();
    let current = estimate(run, &hand);
    let needed = run.state.target_score - run.state.score_total;
    if current >= needed || run.state.discards_left == 0 {
        return run.score_hand(events).map(|_| ());
    }
    let mut best: Option<(CardId, i64)> = None;
    for (pos, card) in hand.iter().enumerate() {
        let mut swapped = hand.clone();
        swapped[pos] = pending;
        let value = estimate(run, &swapped);
        if value > best.map(|(_, v)| v).unwrap_or(current) {
            best = Some((card.id, value));
        }
    }
    match best {
        Some((id, _)) => run.take_or_discard(&[id], events),
        None => run.score_hand(events).map(|_| ()),
    }
}

fn estimate(run: &RunState, cards: &[Card]) -> i64 {
    let ctx = ScoreContext {
        run_discards: run.state.run_discards,
        draw_pile_size: run.deck.draw_pile().len(),
    };
    score_hand(cards, &run.inventory.jokers, ctx, &run.tables).total_score()
}

fn auto_shop(run: &mut RunState, events: &mut EventBus) -> Result<(), RunError> {
    let items: Vec<(usize, bool)> = run
        .shop
        .iter()
        .flat_map(|shop| shop.items.iter().enumerate())
        .map(|(slot, item)| (slot, matches!(item, ShopItem::Joker(_))))
        .collect();
    let joker_slot = items
        .iter()
        .find(|(slot, is_joker)| *is_joker && run.can_afford(*slot))
        .map(|(slot, _)| *slot);
    if let Some(slot) = joker_slot {
        if !run.inventory.is_full() {
            return run.buy_shop_item(slot, events).map(|_| ());
        }
    }
    let pack_slot = items
        .iter()
        .find(|(slot, is_joker)| !*is_joker && run.can_afford(*slot))
        .map(|(slot, _)| *slot);
    if let Some(slot) = pack_slot {
        return run.buy_shop_item(slot, events).map(|_| ());
    }
    run.advance_round(events)
}

fn auto_pack(run: &mut RunState, events: &mut EventBus) -> Result<(), RunError> {
    let Some(pack) = run.pack.as_ref() else {
        return run.skip_pack(events);
    };
    let choice = pack
        .modifiers
        .iter()
        .position(|modifier| *modifier == CardModifier::MultPlus)
        .or_else(|| {
            pack.modifiers
                .iter()
                .position(|modifier| *modifier != CardModifier::Destroy)
        });
    let Some(choice) = choice else {
        return run.skip_pack(events);
    };
    let mut cards = run.deck.resolve(&pack.cards);
    cards.sort_by(|a, b| b.value().cmp(&a.value()));
    let picks: Vec<CardId> = cards
        .iter()
        .filter(|card| card.modifier.is_none())
        .take(pack.picks)
        .map(|card| card.id)
        .collect();
    if picks.is_empty() {
        return run.skip_pack(events);
    }
    run.select_pack_cards(&picks)?;
    run.apply_pack_modifier(choice, events).map(|_| ())
}

fn hand_ids(run: &RunState, indices: &[usize]) -> Result<Vec<CardId>, RunError> {
    indices
        .iter()
        .map(|idx| run.hand.get(*idx).copied().ok_or(RunError::InvalidSelection))
        .collect()
}

fn pack_ids(run: &RunState, indices: &[usize]) -> Result<Vec<CardId>, RunError> {
    let Some(pack) = run.pack.as_ref() else {
        return Err(RunError::InvalidPhase(run.state.phase));
    };
    indices
        .iter()
        .map(|idx| pack.cards.get(*idx).copied().ok_or(RunError::InvalidSelection))
        .collect()
}

fn parse_index(args: &[&str]) -> Result<usize, String> {
    let Some(first) = args.first() else {
        return Err("missing index".to_string());
    };
    first
        .parse::<usize>()
        .map_err(|_| format!("invalid index '{first}'"))
}

fn parse_indices_result(args: &[&str]) -> Result<Vec<usize>, String> {
    if args.is_empty() {
        return Err("missing indices".to_string());
    }
    let mut indices = Vec::new();
    for arg in args {
        for part in arg.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some((start, end)) = part.split_once('-') {
                let start = start
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| "invalid range start".to_string())?;
                let end = end
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| "invalid range end".to_string())?;
                if start > end {
                    return Err("range start larger than end".to_string());
                }
                indices.extend(start..=end);
            } else {
                let idx = part
                    .parse::<usize>()
                    .map_err(|_| format!("invalid index '{part}'"))?;
                indices.push(idx);
            }
        }
    }
    if indices.is_empty() {
        return Err("missing indices".to_string());
    }
    Ok(indices)
}

fn print_help() {
    println!("== Commands ==");
    println!("  take                 take the drawn card into your hand");
    println!("  discard <idx..>      discard hand cards (spends a discard), then take");
    println!("  score                score the current hand");
    println!("  buy <slot>           buy a shop item");
    println!("  next                 leave the shop and start the next level");
    println!("  pick <idx..>         toggle pack cards (up to the pack limit)");
    println!("  apply <choice>       apply a pack modifier to the picked cards");
    println!("  skip                 close the pack without applying anything");
    println!("  sell <joker>         sell an owned joker for half its price");
    println!("  restart              start a new run after game over");
    println!("  state [--json] | hand | shop | deck | help | quit");
}

fn print_state(run: &RunState) {
    let view = run.snapshot();
    println!("== State ==");
    println!(
        "Level {} | Phase {} | Score {}/{}",
        view.level,
        phase_label(view.phase),
        view.score,
        view.target
    );
    println!(
        "Coins ${} | Hands {} | Discards {} | Run discards {}",
        view.coins, view.hands_left, view.discards_left, view.run_discards
    );
    print_jokers(&view);
}

fn print_jokers(view: &RunSnapshot) {
    if view.jokers.is_empty() {
        println!("Jokers: none");
        return;
    }
    println!("Jokers:");
    for (idx, joker) in view.jokers.iter().enumerate() {
        println!(
            "  {idx}: {} (sell ${}) - {}",
            joker.name, joker.sell_price, joker.description
        );
    }
}

fn print_hand(run: &RunState) {
    let hand = run.hand_cards();
    println!("== Hand ({}/{}) ==", hand.len(), run.config.run.max_hand_size);
    for (idx, card) in hand.iter().enumerate() {
        println!("  {idx}: {}", format_card(card));
    }
    match run.pending_card() {
        Some(card) => println!("Drawn: {}", format_card(&card)),
        None => println!("Drawn: none"),
    }
}

fn print_shop(run: &RunState) {
    let view = run.snapshot();
    if view.shop.is_empty() {
        println!("Shop: empty");
        return;
    }
    println!("== Shop (${}) ==", view.coins);
    for item in &view.shop {
        println!(
            "  {}: {} ${}{}",
            item.slot,
            item.label,
            item.price,
            if item.affordable { "" } else { " (can't afford)" }
        );
    }
}

fn print_pack(run: &RunState) {
    let Some(pack) = run.snapshot().pack else {
        return;
    };
    println!("== Pack (pick up to {}) ==", pack.picks);
    for (idx, card) in pack.cards.iter().enumerate() {
        let mark = if pack.selected.contains(&card.id) { "*" } else { " " };
        println!("  {mark}{idx}: {}", format_card(card));
    }
    for (idx, modifier) in pack.modifiers.iter().enumerate() {
        println!("  choice {idx}: {}", modifier_label(*modifier));
    }
}

fn print_deck(run: &RunState) {
    let counts = run.deck.counts();
    println!(
        "Deck: {} remaining / {} total | draw {} | discard {}",
        counts.remaining,
        counts.total,
        run.deck.draw_pile().len(),
        run.deck.discard_pile().len()
    );
}

fn print_breakdown(labels: &[String]) {
    for label in labels {
        println!("  {label}");
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("encode error: {err}"),
    }
}

fn format_card(card: &Card) -> String {
    match card.modifier {
        Some(modifier) => format!("{card} [{}]", modifier_label(modifier)),
        None => card.to_string(),
    }
}

fn modifier_label(modifier: CardModifier) -> &'static str {
    match modifier {
        CardModifier::BonusChips => "+10 chips",
        CardModifier::MultPlus => "+4 mult",
        CardModifier::Destroy => "destroy",
    }
}

fn phase_short(phase: Phase) -> &'static str {
    match phase {
        Phase::Drawing => "draw",
        Phase::Deciding => "play",
        Phase::Shopping => "shop",
        Phase::PackOpening => "pack",
        Phase::GameOver => "over",
    }
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Drawing => "Drawing",
        Phase::Deciding => "Deciding",
        Phase::Shopping => "Shopping",
        Phase::PackOpening => "Opening Pack",
        Phase::GameOver => "Game Over",
    }
}

fn card_label(run: &RunState, id: CardId) -> String {
    run.deck
        .card(id)
        .map(format_card)
        .unwrap_or_else(|| format!("#{id}"))
}

fn format_event(run: &RunState, event: &Event) -> String {
    match event {
        Event::RoundStarted {
            level,
            target,
            hands,
            discards,
        } => format!("round started: level {level} target {target} hands {hands} discards {discards}"),
        Event::CardDrawn { card } => format!("card drawn: {}", card_label(run, *card)),
        Event::DeckRecycled { cards } => format!("deck recycled: {cards} cards"),
        Event::DeckExhausted => "deck exhausted".to_string(),
        Event::CardTaken { card } => format!("card taken: {}", card_label(run, *card)),
        Event::CardsDiscarded {
            cards,
            discards_left,
            run_discards,
        } => {
            let labels: Vec<String> = cards.iter().map(|id| card_label(run, *id)).collect();
            format!(
                "discarded: {} (discards left {discards_left}, run total {run_discards})",
                labels.join(" ")
            )
        }
        Event::HandScored {
            hand,
            chips,
            mult,
            total,
            coins,
        } => format!(
            "hand scored: {} {chips}x{mult} = {total}{}",
            hand.display_name(),
            if *coins > 0 {
                format!(" (+${coins})")
            } else {
                String::new()
            }
        ),
        Event::RoundCleared {
            score,
            reward,
            bonus,
            coins,
        } => format!("round cleared: score {score} reward {reward} bonus {bonus} coins {coins}"),
        Event::GameOver { level, score } => format!("game over: level {level} score {score}"),
        Event::ShopEntered { items } => format!("shop entered: {items} items"),
        Event::ShopBought { item, cost, coins } => {
            format!("shop bought: {item} cost {cost} coins {coins}")
        }
        Event::JokerSold {
            key,
            sell_price,
            coins,
        } => format!("joker sold: {key} for {sell_price} coins {coins}"),
        Event::PackOpened { cards, modifiers } => {
            let labels: Vec<&str> = modifiers.iter().map(|m| modifier_label(*m)).collect();
            format!("pack opened: {cards} cards, choices {}", labels.join(" / "))
        }
        Event::PackModifierApplied { modifier, cards } => format!(
            "pack applied: {} to {} card(s)",
            modifier_label(*modifier),
            cards.len()
        ),
        Event::PackSkipped => "pack skipped".to_string(),
        Event::RunRestarted { seed } => format!("run restarted (seed {seed})"),
    }
}
