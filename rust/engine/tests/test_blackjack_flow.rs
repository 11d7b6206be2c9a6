use parlor_engine::blackjack::{BlackjackOutcome, BlackjackPhase, BlackjackRound};
use parlor_engine::cards::{Card, Rank as R, Suit as S};
use parlor_engine::deck::Deck;
use parlor_engine::errors::GameError;
use parlor_engine::rules::{BlackjackRules, GameKind, TableRules};
use parlor_engine::settlement::Round;
use parlor_engine::table::Table;

fn c(r: R) -> Card {
    Card::new(r, S::Diamonds)
}

fn open(balance: u64, buy_in: u32) -> Table {
    Table::open(TableRules::for_game(GameKind::Blackjack), balance, buy_in).unwrap()
}

#[test]
fn win_by_hitting_to_21_then_leave() {
    let mut table = open(100, 100);
    let mut round = BlackjackRound::new(BlackjackRules::default());
    // player K 5, dealer 9 8, next card 6
    let deck = Deck::stacked(vec![c(R::King), c(R::Five), c(R::Nine), c(R::Eight), c(R::Six)]);
    round.deal_from(&mut table, 20, deck).unwrap();
    assert_eq!(table.chips(), 80);
    assert_eq!(round.dealer_visible().len(), 1);

    assert_eq!(round.hit().unwrap(), BlackjackPhase::Ended);
    assert_eq!(round.outcome(), Some(BlackjackOutcome::Win));
    let settlement = table.settle(&mut round).unwrap();
    assert_eq!(settlement.payout.winnings, 40);
    assert_eq!(table.chips(), 120);

    let mut reported = 0;
    let balance = table.leave(|b| reported = b);
    assert_eq!(balance, 120);
    assert_eq!(reported, 120);
}

#[test]
fn push_returns_the_stake() {
    let mut table = open(500, 100);
    let mut round = BlackjackRound::new(BlackjackRules::default());
    let deck = Deck::stacked(vec![c(R::King), c(R::Eight), c(R::Ten), c(R::Eight)]);
    round.deal_from(&mut table, 25, deck).unwrap();
    round.stand().unwrap();
    assert_eq!(round.outcome(), Some(BlackjackOutcome::Push));
    table.settle(&mut round).unwrap();
    assert_eq!(table.chips(), 100);
}

#[test]
fn dealer_draws_to_seventeen_and_busts() {
    let mut table = open(500, 100);
    let mut round = BlackjackRound::new(BlackjackRules::default());
    // dealer 10 6 draws the queen
    let deck = Deck::stacked(vec![
        c(R::Ten),
        c(R::Two),
        c(R::Ten),
        c(R::Six),
        c(R::Queen),
    ]);
    round.deal_from(&mut table, 20, deck).unwrap();
    round.stand().unwrap();
    assert_eq!(round.outcome(), Some(BlackjackOutcome::DealerBust));
    assert_eq!(round.dealer_value(), 26);
    assert_eq!(round.winnings(), Some(40));
}

#[test]
fn dealer_stands_on_soft_seventeen() {
    let mut table = open(500, 100);
    let mut round = BlackjackRound::new(BlackjackRules::default());
    let deck = Deck::stacked(vec![c(R::Ten), c(R::Eight), c(R::Ace), c(R::Six), c(R::Five)]);
    round.deal_from(&mut table, 20, deck).unwrap();
    round.stand().unwrap();
    assert_eq!(round.dealer_value(), 17);
    assert_eq!(round.outcome(), Some(BlackjackOutcome::Win));
}

#[test]
fn natural_pays_even_money_without_dealer_drawing() {
    let mut table = open(500, 100);
    let mut round = BlackjackRound::new(BlackjackRules::default());
    let deck = Deck::stacked(vec![c(R::Ace), c(R::Queen), c(R::Two), c(R::Three), c(R::Four)]);
    assert_eq!(
        round.deal_from(&mut table, 20, deck).unwrap(),
        BlackjackPhase::Ended
    );
    assert_eq!(round.dealer_visible().len(), 2);
    table.settle(&mut round).unwrap();
    assert_eq!(table.chips(), 120);
}

#[test]
fn stake_beyond_chips_is_rejected() {
    let mut table = open(500, 30);
    let mut round = BlackjackRound::new(BlackjackRules::default());
    let err = round.deal(&mut table, 40, &mut rand::rng()).unwrap_err();
    assert_eq!(
        err,
        GameError::InsufficientChips {
            needed: 40,
            available: 30
        }
    );
    assert_eq!(round.phase(), BlackjackPhase::Betting);
}

#[test]
fn unfinished_round_cannot_settle() {
    let mut table = open(500, 100);
    let mut round = BlackjackRound::new(BlackjackRules::default());
    let deck = Deck::stacked(vec![c(R::Ten), c(R::Two), c(R::Ten), c(R::Six)]);
    round.deal_from(&mut table, 20, deck).unwrap();
    assert_eq!(table.settle(&mut round), Err(GameError::RoundInProgress));
    assert_eq!(table.chips(), 80);
}
