//! Hold'em-style poker round: one human at seat 0 against house-controlled
//! opponents.
//!
//! Phases run `Betting -> Preflop -> Flop -> Turn -> River -> Showdown -> Ended`.
//! On every street the human acts once through [`PokerRound::act`], then each
//! opponent still in the hand acts once through [`PokerRound::apply_opponent`]
//! in seat order. When the last queued opponent has acted the next street is
//! dealt, or the hand goes to showdown after the river.
//!
//! Every participant commits the opening stake. Commitments are cumulative for
//! the whole round: a player may check only when their commitment equals the
//! table bet.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::hand::ShowdownScore;
use crate::logger::{ActionRecord, RoundRecord};
use crate::player::{Player, PlayerAction};
use crate::rules::{validate_action, GameKind, PokerRules, ValidatedAction};
use crate::settlement::{Ledger, Recordable, Round};
use crate::table::Table;

pub const HUMAN_SEAT: usize = 0;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum PokerPhase {
    Betting,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Ended,
}

impl PokerPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            PokerPhase::Betting => "betting",
            PokerPhase::Preflop => "preflop",
            PokerPhase::Flop => "flop",
            PokerPhase::Turn => "turn",
            PokerPhase::River => "river",
            PokerPhase::Showdown => "showdown",
            PokerPhase::Ended => "ended",
        }
    }

    pub fn is_street(self) -> bool {
        matches!(
            self,
            PokerPhase::Preflop | PokerPhase::Flop | PokerPhase::Turn | PokerPhase::River
        )
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PokerEnding {
    Showdown,
    HumanFolded,
    OpponentsFolded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokerOutcome {
    pub ending: PokerEnding,
    pub pot: u32,
    /// Seats that shared the pot, lowest seat first.
    pub winners: Vec<usize>,
    /// Chips paid to each winning seat.
    pub shares: Vec<(usize, u32)>,
    /// Scores of every contender when the hand was compared.
    pub scores: Vec<(usize, ShowdownScore)>,
}

impl PokerOutcome {
    pub fn share_of(&self, seat: usize) -> u32 {
        self.shares
            .iter()
            .find(|(s, _)| *s == seat)
            .map(|(_, amount)| *amount)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct PokerRound {
    rules: PokerRules,
    phase: PokerPhase,
    players: Vec<Player>,
    community: Vec<Card>,
    deck: Deck,
    pot: u32,
    current_bet: u32,
    pending: VecDeque<usize>,
    outcome: Option<PokerOutcome>,
    ledger: Ledger,
    actions: Vec<ActionRecord>,
}

impl PokerRound {
    /// Seats the human and one house player per configured opponent.
    pub fn new(rules: PokerRules) -> Result<Self, GameError> {
        rules.validate()?;
        let mut players = Vec::with_capacity(rules.opponents.len() + 1);
        players.push(Player::human("You"));
        players.extend(
            rules
                .opponents
                .iter()
                .map(|o| Player::house(o.name.clone(), o.chips)),
        );
        Ok(Self::with_players(rules, players))
    }

    fn with_players(rules: PokerRules, players: Vec<Player>) -> Self {
        Self {
            rules,
            phase: PokerPhase::Betting,
            players,
            community: Vec::with_capacity(5),
            deck: Deck::stacked(Vec::new()),
            pot: 0,
            current_bet: 0,
            pending: VecDeque::new(),
            outcome: None,
            ledger: Ledger::default(),
            actions: Vec::new(),
        }
    }

    /// Fresh round at the same table; opponents keep their stacks.
    pub fn rematch(&self) -> Result<PokerRound, GameError> {
        if self.phase != PokerPhase::Ended {
            return Err(GameError::RoundInProgress);
        }
        let mut players = self.players.clone();
        for p in &mut players {
            p.reset_for_round();
        }
        Ok(Self::with_players(self.rules.clone(), players))
    }

    /// Opens the round: every seat commits `stake`, then two hole cards each
    /// are dealt from a freshly shuffled deck.
    pub fn place_stake<R: Rng + ?Sized>(
        &mut self,
        table: &mut Table,
        stake: u32,
        rng: &mut R,
    ) -> Result<PokerPhase, GameError> {
        self.place_stake_with_deck(table, stake, Deck::shuffled(rng))
    }

    /// As [`PokerRound::place_stake`] with a caller-supplied deck.
    ///
    /// Opponents who cannot cover the stake sit the round out.
    pub fn place_stake_with_deck(
        &mut self,
        table: &mut Table,
        stake: u32,
        deck: Deck,
    ) -> Result<PokerPhase, GameError> {
        if self.phase != PokerPhase::Betting {
            return Err(GameError::illegal("stake already placed"));
        }
        if stake < self.rules.min_stake {
            return Err(GameError::BelowMinimum {
                amount: stake,
                minimum: self.rules.min_stake,
            });
        }
        let seated = 1 + self.players[1..].iter().filter(|p| p.chips() >= stake).count();
        if deck.remaining() < seated * 2 + 5 {
            return Err(GameError::EmptyDeck);
        }
        // every opponent chip could end up in a pot the human takes
        let opponents: u64 = self.players[1..].iter().map(|p| u64::from(p.chips())).sum();
        table.ensure_payout_fits(stake, u64::from(stake) + opponents)?;
        table.commit(stake)?;
        self.ledger.add_stake(stake);
        self.deck = deck;

        let human = &mut self.players[HUMAN_SEAT];
        human.set_chips(table.chips());
        human.record_commit(stake);
        self.pot += stake;
        for p in self.players.iter_mut().skip(1) {
            if p.commit(stake).is_ok() {
                self.pot += stake;
            } else {
                p.fold();
            }
        }
        self.current_bet = stake;
        self.actions
            .push(ActionRecord::new(HUMAN_SEAT, "betting", format!("stake {stake}")));

        for _ in 0..2 {
            for p in self.players.iter_mut().filter(|p| !p.folded()) {
                p.give_card(self.deck.draw()?);
            }
        }
        self.phase = PokerPhase::Preflop;
        tracing::debug!(stake, pot = self.pot, seated, "poker hole cards dealt");

        if self.active_opponents().next().is_none() {
            self.award(PokerEnding::OpponentsFolded);
        }
        Ok(self.phase)
    }

    /// Applies the human decision for the current street and queues the
    /// opponents. Rejected actions leave the round and the table unchanged.
    pub fn act(&mut self, table: &mut Table, action: PlayerAction) -> Result<PokerPhase, GameError> {
        if !self.phase.is_street() {
            return Err(GameError::illegal(format!(
                "no betting street in progress ({})",
                self.phase.as_str()
            )));
        }
        if !self.pending.is_empty() {
            return Err(GameError::illegal("waiting for opponents to act"));
        }

        let to_call = self.to_call(HUMAN_SEAT);
        let validated = validate_action(table.chips(), to_call, self.rules.raise_increment, action)?;
        match validated {
            ValidatedAction::Fold => {
                self.players[HUMAN_SEAT].fold();
                self.record(HUMAN_SEAT, action);
                self.award(PokerEnding::HumanFolded);
                return Ok(self.phase);
            }
            ValidatedAction::Check => {}
            ValidatedAction::Call(amount) => self.commit_human(table, amount)?,
            ValidatedAction::Raise { total, increment } => {
                self.commit_human(table, total)?;
                self.current_bet += increment;
            }
        }
        self.record(HUMAN_SEAT, action);

        self.pending = self.active_opponents().collect();
        if self.pending.is_empty() {
            self.advance_street()?;
        }
        Ok(self.phase)
    }

    fn commit_human(&mut self, table: &mut Table, amount: u32) -> Result<(), GameError> {
        table.commit(amount)?;
        self.ledger.add_stake(amount);
        self.pot += amount;
        let human = &mut self.players[HUMAN_SEAT];
        human.set_chips(table.chips());
        human.record_commit(amount);
        Ok(())
    }

    /// Seat of the opponent whose decision is awaited, if any.
    pub fn next_to_act(&self) -> Option<usize> {
        self.pending.front().copied()
    }

    /// Applies a scripted opponent decision and returns the action actually
    /// taken. An opponent short of chips for a call folds; short for a raise
    /// it calls instead.
    pub fn apply_opponent(
        &mut self,
        seat: usize,
        action: PlayerAction,
    ) -> Result<PlayerAction, GameError> {
        if self.next_to_act() != Some(seat) {
            return Err(GameError::illegal(format!("seat {seat} is not due to act")));
        }
        let to_call = self.to_call(seat);
        let chips = self.players[seat].chips();

        let effective = match action {
            PlayerAction::Fold => PlayerAction::Fold,
            PlayerAction::Check if to_call == 0 => PlayerAction::Check,
            PlayerAction::Raise(amount) if amount > 0 && chips >= to_call + amount => {
                PlayerAction::Raise(amount)
            }
            _ if chips >= to_call => PlayerAction::Call,
            _ => PlayerAction::Fold,
        };

        let player = &mut self.players[seat];
        match effective {
            PlayerAction::Fold => player.fold(),
            PlayerAction::Check => {}
            PlayerAction::Call => {
                player.commit(to_call)?;
                self.pot += to_call;
            }
            PlayerAction::Raise(amount) => {
                player.commit(to_call + amount)?;
                self.pot += to_call + amount;
                self.current_bet += amount;
            }
        }
        self.record(seat, effective);
        self.pending.pop_front();

        if self.active_opponents().next().is_none() {
            self.pending.clear();
            self.award(PokerEnding::OpponentsFolded);
        } else if self.pending.is_empty() {
            self.advance_street()?;
        }
        Ok(effective)
    }

    fn advance_street(&mut self) -> Result<(), GameError> {
        let (next, cards) = match self.phase {
            PokerPhase::Preflop => (PokerPhase::Flop, 3),
            PokerPhase::Flop => (PokerPhase::Turn, 1),
            PokerPhase::Turn => (PokerPhase::River, 1),
            PokerPhase::River => {
                self.phase = PokerPhase::Showdown;
                self.award(PokerEnding::Showdown);
                return Ok(());
            }
            other => {
                return Err(GameError::illegal(format!(
                    "cannot advance from {}",
                    other.as_str()
                )))
            }
        };
        let dealt = self.deck.draw_n(cards)?;
        self.community.extend(dealt);
        self.phase = next;
        tracing::debug!(phase = next.as_str(), pot = self.pot, "poker street dealt");
        Ok(())
    }

    /// Distributes the whole pot among the best contenders and ends the round.
    fn award(&mut self, ending: PokerEnding) {
        let contenders: Vec<usize> = (0..self.players.len())
            .filter(|&s| !self.players[s].folded())
            .collect();

        let scores: Vec<(usize, ShowdownScore)> = contenders
            .iter()
            .map(|&s| {
                (
                    s,
                    self.rules
                        .scoring
                        .score(self.players[s].hand(), &self.community),
                )
            })
            .collect();

        let winners: Vec<usize> = match scores.iter().map(|(_, sc)| sc).max() {
            Some(best) => scores
                .iter()
                .filter(|(_, sc)| sc == best)
                .map(|(s, _)| *s)
                .collect(),
            // nobody left in the hand: the first opponent collects
            None => vec![1],
        };

        let share = self.pot / winners.len() as u32;
        let remainder = self.pot % winners.len() as u32;
        let mut shares = Vec::with_capacity(winners.len());
        for (i, &seat) in winners.iter().enumerate() {
            let amount = if i == 0 { share + remainder } else { share };
            if seat != HUMAN_SEAT {
                self.players[seat].add_chips(amount);
            }
            shares.push((seat, amount));
        }

        tracing::debug!(
            ending = ?ending,
            pot = self.pot,
            winners = ?winners,
            "poker round resolved"
        );
        self.outcome = Some(PokerOutcome {
            ending,
            pot: self.pot,
            winners,
            shares,
            scores,
        });
        self.phase = PokerPhase::Ended;
    }

    fn active_opponents(&self) -> impl Iterator<Item = usize> + '_ {
        (1..self.players.len()).filter(move |&s| !self.players[s].folded())
    }

    fn record(&mut self, seat: usize, action: PlayerAction) {
        self.actions
            .push(ActionRecord::new(seat, self.phase.as_str(), action.label()));
    }

    /// Chips `seat` must add to match the table bet.
    pub fn to_call(&self, seat: usize) -> u32 {
        self.current_bet
            .saturating_sub(self.players[seat].current_bet())
    }

    /// True when the human may check.
    pub fn can_check(&self) -> bool {
        self.phase.is_street() && self.pending.is_empty() && self.to_call(HUMAN_SEAT) == 0
    }

    pub fn phase(&self) -> PokerPhase {
        self.phase
    }
    pub fn rules(&self) -> &PokerRules {
        &self.rules
    }
    pub fn pot(&self) -> u32 {
        self.pot
    }
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }
    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn human(&self) -> &Player {
        &self.players[HUMAN_SEAT]
    }
    pub fn community(&self) -> &[Card] {
        &self.community
    }
    pub fn outcome(&self) -> Option<&PokerOutcome> {
        self.outcome.as_ref()
    }
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }
}

impl Round for PokerRound {
    fn game(&self) -> GameKind {
        GameKind::Poker
    }
    fn ledger(&self) -> &Ledger {
        &self.ledger
    }
    fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }
    fn winnings(&self) -> Option<u32> {
        self.outcome.as_ref().map(|o| o.share_of(HUMAN_SEAT))
    }
}

impl Recordable for PokerRound {
    fn to_record(&self) -> RoundRecord {
        let mut rec = RoundRecord::unstamped(
            GameKind::Poker,
            self.ledger.stake(),
            self.winnings().unwrap_or(0),
        );
        rec.actions = self.actions.clone();
        rec.cards = self.community.clone();
        if let Some(o) = &self.outcome {
            rec.result = Some(format!(
                "{} winners={:?}",
                match o.ending {
                    PokerEnding::Showdown => "showdown",
                    PokerEnding::HumanFolded => "folded",
                    PokerEnding::OpponentsFolded => "uncontested",
                },
                o.winners
            ));
            rec.meta = Some(serde_json::json!({
                "pot": o.pot,
                "scoring": self.rules.scoring.as_str(),
                "hole": self.human().hand(),
            }));
        }
        rec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank as R, Suit as S};
    use crate::rules::{OpponentSeat, TableRules};

    fn heads_up() -> PokerRules {
        PokerRules {
            opponents: vec![OpponentSeat::new("CPU", 500)],
            ..PokerRules::default()
        }
    }

    fn table(buy_in: u32) -> Table {
        Table::open(TableRules::for_game(GameKind::Poker), 1_000, buy_in).unwrap()
    }

    fn committed(round: &PokerRound) -> u32 {
        round.players().iter().map(|p| p.current_bet()).sum()
    }

    #[test]
    fn stake_refused_when_the_pot_could_overflow_the_table() {
        let rules = PokerRules {
            opponents: vec![OpponentSeat::new("CPU", 2_000_000_000)],
            ..PokerRules::default()
        };
        let mut t = Table::open(TableRules::for_game(GameKind::Poker), 3_000_000_000, 3_000_000_000)
            .unwrap();
        let mut round = PokerRound::new(rules).unwrap();
        assert_eq!(
            round.place_stake(&mut t, 25, &mut rand::rng()),
            Err(GameError::PayoutOverflow { stake: 25 })
        );
        assert_eq!(t.chips(), 3_000_000_000);
        assert_eq!(round.phase(), PokerPhase::Betting);
        assert_eq!(round.pot(), 0);
    }

    #[test]
    fn pot_tracks_every_commitment() {
        let mut t = table(500);
        let mut round = PokerRound::new(PokerRules::default()).unwrap();
        round.place_stake(&mut t, 50, &mut rand::rng()).unwrap();
        assert_eq!(round.pot(), 200);
        round.act(&mut t, PlayerAction::Raise(50)).unwrap();
        assert_eq!(round.next_to_act(), Some(1));
        round.apply_opponent(1, PlayerAction::Call).unwrap();
        round.apply_opponent(2, PlayerAction::Raise(30)).unwrap();
        round.apply_opponent(3, PlayerAction::Fold).unwrap();
        assert_eq!(round.phase(), PokerPhase::Flop);
        assert_eq!(round.pot(), committed(&round));
        assert_eq!(round.to_call(HUMAN_SEAT), 30);
        assert!(!round.can_check());
    }

    #[test]
    fn out_of_turn_opponent_rejected() {
        let mut t = table(500);
        let mut round = PokerRound::new(PokerRules::default()).unwrap();
        round.place_stake(&mut t, 25, &mut rand::rng()).unwrap();
        round.act(&mut t, PlayerAction::Check).unwrap();
        assert!(round.apply_opponent(2, PlayerAction::Call).is_err());
        assert!(round.act(&mut t, PlayerAction::Check).is_err());
    }

    #[test]
    fn short_opponent_sits_out() {
        let mut t = table(500);
        let rules = PokerRules {
            opponents: vec![OpponentSeat::new("Rich", 500), OpponentSeat::new("Poor", 10)],
            ..PokerRules::default()
        };
        let mut round = PokerRound::new(rules).unwrap();
        round.place_stake(&mut t, 25, &mut rand::rng()).unwrap();
        assert!(round.players()[2].folded());
        assert!(round.players()[2].hand().is_empty());
        assert_eq!(round.pot(), 50);
    }

    #[test]
    fn opponent_raise_beyond_stack_is_scaled_back() {
        let mut t = table(500);
        let rules = PokerRules {
            opponents: vec![OpponentSeat::new("Mid", 100), OpponentSeat::new("Short", 60)],
            ..PokerRules::default()
        };
        let mut round = PokerRound::new(rules).unwrap();
        round.place_stake(&mut t, 25, &mut rand::rng()).unwrap();
        round.act(&mut t, PlayerAction::Raise(50)).unwrap();
        // Mid holds 75 and owes 50: the raise shrinks to a call
        assert_eq!(
            round.apply_opponent(1, PlayerAction::Raise(40)).unwrap(),
            PlayerAction::Call
        );
        // Short holds 35 and cannot even call
        assert_eq!(
            round.apply_opponent(2, PlayerAction::Raise(40)).unwrap(),
            PlayerAction::Fold
        );
        assert_eq!(round.phase(), PokerPhase::Flop);
        assert_eq!(round.pot(), committed(&round));
    }

    #[test]
    fn last_opponent_folding_hands_pot_to_human() {
        let mut t = table(500);
        let mut round = PokerRound::new(heads_up()).unwrap();
        round.place_stake(&mut t, 25, &mut rand::rng()).unwrap();
        round.act(&mut t, PlayerAction::Check).unwrap();
        round.apply_opponent(1, PlayerAction::Fold).unwrap();
        assert_eq!(round.outcome().unwrap().ending, PokerEnding::OpponentsFolded);
        assert_eq!(round.winnings(), Some(50));
        t.settle(&mut round).unwrap();
        assert_eq!(t.chips(), 525);
    }

    #[test]
    fn showdown_tie_splits_pot() {
        let mut t = table(200);
        let mut round = PokerRound::new(heads_up()).unwrap();
        let c = Card::new;
        // human, cpu, human, cpu, then the board
        let deck = Deck::stacked(vec![
            c(R::Two, S::Clubs),
            c(R::Two, S::Diamonds),
            c(R::Three, S::Clubs),
            c(R::Three, S::Diamonds),
            c(R::Ace, S::Spades),
            c(R::King, S::Hearts),
            c(R::Queen, S::Spades),
            c(R::Jack, S::Hearts),
            c(R::Nine, S::Spades),
        ]);
        round.place_stake_with_deck(&mut t, 25, deck).unwrap();
        for _ in 0..4 {
            round.act(&mut t, PlayerAction::Check).unwrap();
            round.apply_opponent(1, PlayerAction::Check).unwrap();
        }
        let outcome = round.outcome().unwrap();
        assert_eq!(outcome.ending, PokerEnding::Showdown);
        assert_eq!(outcome.winners, vec![0, 1]);
        assert_eq!(round.winnings(), Some(25));
    }
}
