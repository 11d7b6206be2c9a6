use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use parlor_engine::blackjack::BlackjackRound;
use parlor_engine::engine::Engine;
use parlor_engine::errors::GameError;
use parlor_engine::roulette::{BetSpot, RouletteTable};
use parlor_engine::rules::{BlackjackRules, GameKind, SlotRules, TableRules};
use parlor_engine::slots::SlotMachine;
use parlor_engine::table::Table;

#[test]
fn leaving_reports_balance_minus_buy_in_plus_chips() {
    let table = Table::open(TableRules::for_game(GameKind::Slots), 700, 200).unwrap();
    let mut engine = Engine::new(table, Some(11));
    let machine = SlotMachine::new(SlotRules::default());
    for _ in 0..25 {
        if !engine.table().can_continue() {
            break;
        }
        let (table, rng) = engine.table_and_rng();
        machine.spin(table, 5, rng).unwrap();
    }
    let chips = engine.table().chips();
    let mut calls = 0;
    let balance = engine.leave(|_| calls += 1);
    assert_eq!(calls, 1);
    assert_eq!(balance, 700 - 200 + u64::from(chips));
}

#[test]
fn session_net_matches_sum_of_deltas() {
    let mut table = Table::open(TableRules::for_game(GameKind::Roulette), 5_000, 1_000).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(8);
    let mut layout = RouletteTable::new();
    let mut total = 0i64;
    for i in 0..200u32 {
        let spot = if i % 3 == 0 {
            BetSpot::Dozen((i % 9 / 3) as u8)
        } else {
            BetSpot::Odd
        };
        layout.place_bet(&mut table, spot, 5).unwrap();
        total += layout.spin(&mut table, &mut rng).unwrap().settlement.delta();
    }
    assert_eq!(table.net(), total);
    assert_eq!(table.rounds_settled(), 200);
}

#[test]
fn repeated_settle_is_rejected_for_card_rounds() {
    let table = Table::open(TableRules::for_game(GameKind::Blackjack), 500, 100).unwrap();
    let mut engine = Engine::new(table, Some(21));
    let mut round = BlackjackRound::new(BlackjackRules::default());
    let (table, rng) = engine.table_and_rng();
    round.deal(table, 20, rng).unwrap();
    if round.outcome().is_none() {
        round.stand().unwrap();
    }
    let first = engine.settle(&mut round).unwrap();
    for _ in 0..3 {
        assert_eq!(engine.settle(&mut round), Err(GameError::AlreadySettled));
    }
    assert_eq!(engine.table().chips(), first.chips_after);
    assert_eq!(engine.table().net(), first.delta());
}
