use parlor_engine::cards::{Card, Rank as R, Suit as S};
use parlor_engine::deck::Deck;
use parlor_engine::errors::GameError;
use parlor_engine::hand::ScoringMode;
use parlor_engine::player::PlayerAction;
use parlor_engine::poker::{PokerEnding, PokerPhase, PokerRound, HUMAN_SEAT};
use parlor_engine::rules::{GameKind, OpponentSeat, PokerRules, TableRules};
use parlor_engine::settlement::Round;
use parlor_engine::table::Table;

fn open(buy_in: u32) -> Table {
    Table::open(TableRules::for_game(GameKind::Poker), 10_000, buy_in).unwrap()
}

fn heads_up(scoring: ScoringMode) -> PokerRules {
    PokerRules {
        opponents: vec![OpponentSeat::new("CPU 1", 1_000)],
        scoring,
        ..PokerRules::default()
    }
}

/// Human gets `human`, the single opponent gets `cpu`, then the board.
fn stacked(human: [Card; 2], cpu: [Card; 2], board: [Card; 5]) -> Deck {
    let mut order = vec![human[0], cpu[0], human[1], cpu[1]];
    order.extend(board);
    Deck::stacked(order)
}

fn check_down(round: &mut PokerRound, table: &mut Table) {
    while round.phase() != PokerPhase::Ended {
        round.act(table, PlayerAction::Check).unwrap();
        while let Some(seat) = round.next_to_act() {
            round.apply_opponent(seat, PlayerAction::Check).unwrap();
        }
    }
}

#[test]
fn check_facing_a_bet_is_illegal_and_changes_nothing() {
    let mut table = open(500);
    let mut round = PokerRound::new(heads_up(ScoringMode::Simplified)).unwrap();
    round.place_stake(&mut table, 25, &mut rand::rng()).unwrap();
    round.act(&mut table, PlayerAction::Check).unwrap();
    round.apply_opponent(1, PlayerAction::Raise(40)).unwrap();
    assert_eq!(round.phase(), PokerPhase::Flop);

    let chips = table.chips();
    let pot = round.pot();
    let err = round.act(&mut table, PlayerAction::Check).unwrap_err();
    assert!(matches!(err, GameError::IllegalAction(_)));
    assert_eq!(table.chips(), chips);
    assert_eq!(round.pot(), pot);
    assert_eq!(round.to_call(HUMAN_SEAT), 40);
}

#[test]
fn raise_beyond_chips_is_rejected() {
    let mut table = open(90);
    let mut round = PokerRound::new(heads_up(ScoringMode::Simplified)).unwrap();
    round.place_stake(&mut table, 50, &mut rand::rng()).unwrap();
    let err = round.act(&mut table, PlayerAction::Raise(50)).unwrap_err();
    assert_eq!(
        err,
        GameError::InsufficientChips {
            needed: 50,
            available: 40
        }
    );
    assert_eq!(table.chips(), 40);
}

#[test]
fn human_raise_is_fixed_at_the_table_increment() {
    let mut table = open(5_000);
    let mut round = PokerRound::new(heads_up(ScoringMode::Simplified)).unwrap();
    round.place_stake(&mut table, 25, &mut rand::rng()).unwrap();
    let chips = table.chips();

    for amount in [10, 49, 51, 1_000] {
        assert!(
            matches!(
                round.act(&mut table, PlayerAction::Raise(amount)),
                Err(GameError::IllegalAction(_))
            ),
            "raise {amount}"
        );
        assert_eq!(round.current_bet(), 25);
        assert_eq!(table.chips(), chips);
        assert_eq!(round.phase(), PokerPhase::Preflop);
    }

    round.act(&mut table, PlayerAction::Raise(50)).unwrap();
    assert_eq!(round.current_bet(), 75);
    assert_eq!(table.chips(), chips - 50);
}

#[test]
fn folding_forfeits_everything_committed() {
    let mut table = open(500);
    let mut round = PokerRound::new(PokerRules::default()).unwrap();
    round.place_stake(&mut table, 25, &mut rand::rng()).unwrap();
    round.act(&mut table, PlayerAction::Raise(50)).unwrap();
    while let Some(seat) = round.next_to_act() {
        round.apply_opponent(seat, PlayerAction::Call).unwrap();
    }
    round.act(&mut table, PlayerAction::Fold).unwrap();

    let outcome = round.outcome().unwrap();
    assert_eq!(outcome.ending, PokerEnding::HumanFolded);
    assert!(!outcome.winners.contains(&HUMAN_SEAT));
    let settlement = table.settle(&mut round).unwrap();
    assert_eq!(settlement.payout.stake, 75);
    assert_eq!(settlement.delta(), -75);
    assert_eq!(table.chips(), 425);
}

#[test]
fn best_hand_takes_the_pot_at_showdown() {
    let mut table = open(500);
    let mut round = PokerRound::new(heads_up(ScoringMode::Simplified)).unwrap();
    let deck = stacked(
        [Card::new(R::King, S::Hearts), Card::new(R::King, S::Spades)],
        [Card::new(R::Two, S::Clubs), Card::new(R::Seven, S::Diamonds)],
        [
            Card::new(R::Ace, S::Clubs),
            Card::new(R::Nine, S::Hearts),
            Card::new(R::Five, S::Spades),
            Card::new(R::Four, S::Diamonds),
            Card::new(R::Jack, S::Clubs),
        ],
    );
    round.place_stake_with_deck(&mut table, 25, deck).unwrap();
    check_down(&mut round, &mut table);

    assert_eq!(round.community().len(), 5);
    assert_eq!(round.outcome().unwrap().winners, vec![HUMAN_SEAT]);
    assert_eq!(round.winnings(), Some(50));
    table.settle(&mut round).unwrap();
    assert_eq!(table.chips(), 525);
}

#[test]
fn scoring_modes_can_disagree() {
    // the human makes a straight, the opponent a pair of aces
    let board = [
        Card::new(R::Seven, S::Clubs),
        Card::new(R::Eight, S::Hearts),
        Card::new(R::Nine, S::Spades),
        Card::new(R::Ace, S::Diamonds),
        Card::new(R::Two, S::Clubs),
    ];
    let human = [Card::new(R::Five, S::Hearts), Card::new(R::Six, S::Spades)];
    let cpu = [Card::new(R::Ace, S::Hearts), Card::new(R::Queen, S::Spades)];

    let mut winners = Vec::new();
    for mode in [ScoringMode::Simplified, ScoringMode::Canonical] {
        let mut table = open(500);
        let mut round = PokerRound::new(heads_up(mode)).unwrap();
        round
            .place_stake_with_deck(&mut table, 25, stacked(human, cpu, board))
            .unwrap();
        check_down(&mut round, &mut table);
        winners.push(round.outcome().unwrap().winners.clone());
    }
    assert_eq!(winners, vec![vec![1], vec![HUMAN_SEAT]]);
}

#[test]
fn opponent_stacks_carry_into_rematch() {
    let mut table = open(500);
    let mut round = PokerRound::new(heads_up(ScoringMode::Simplified)).unwrap();
    round.place_stake(&mut table, 25, &mut rand::rng()).unwrap();
    round.act(&mut table, PlayerAction::Fold).unwrap();
    table.settle(&mut round).unwrap();
    assert_eq!(round.players()[1].chips(), 1_025);

    let next = round.rematch().unwrap();
    assert_eq!(next.phase(), PokerPhase::Betting);
    assert_eq!(next.players()[1].chips(), 1_025);
    assert!(next.players()[1].hand().is_empty());
}

#[test]
fn single_settlement_per_round() {
    let mut table = open(500);
    let mut round = PokerRound::new(heads_up(ScoringMode::Simplified)).unwrap();
    round.place_stake(&mut table, 25, &mut rand::rng()).unwrap();
    assert_eq!(table.settle(&mut round), Err(GameError::RoundInProgress));
    round.act(&mut table, PlayerAction::Fold).unwrap();
    table.settle(&mut round).unwrap();
    assert_eq!(table.settle(&mut round), Err(GameError::AlreadySettled));
    assert_eq!(table.chips(), 475);
}
