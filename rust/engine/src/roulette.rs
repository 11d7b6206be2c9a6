//! Single-zero roulette.
//!
//! Bets are committed from the table as they are placed and may be cleared
//! for a refund until the wheel spins. A spin resolves and settles every bet
//! at once, then the layout is emptied for the next spin.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::logger::{ActionRecord, RoundRecord};
use crate::rules::GameKind;
use crate::settlement::{Ledger, Recordable, Round, Settlement};
use crate::table::Table;

pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Pocket order around a European wheel, clockwise from zero.
pub const WHEEL_ORDER: [u8; 37] = [
    0, 32, 15, 19, 4, 21, 2, 25, 17, 34, 6, 27, 13, 36, 11, 30, 8, 23, 10, 5, 24, 16, 33, 1, 20,
    14, 31, 9, 22, 18, 29, 7, 28, 12, 35, 3, 26,
];

const HISTORY_LEN: usize = 20;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Red,
    Black,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Green => "green",
            Color::Red => "red",
            Color::Black => "black",
        }
    }
}

pub fn color_of(n: u8) -> Color {
    if n == 0 {
        Color::Green
    } else if RED_NUMBERS.contains(&n) {
        Color::Red
    } else {
        Color::Black
    }
}

/// Index of `n` on the wheel, used to animate the ball.
pub fn wheel_position(n: u8) -> Option<usize> {
    WHEEL_ORDER.iter().position(|&p| p == n)
}

/// A region of the layout. Columns and dozens are numbered from 0.
///
/// Column 0 holds 1, 4, 7 .. 34; column 2 holds 3, 6, 9 .. 36. Zero belongs
/// to no outside bet.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetSpot {
    Straight(u8),
    Column(u8),
    Dozen(u8),
    Red,
    Black,
    Even,
    Odd,
    Low,
    High,
}

impl BetSpot {
    pub fn validate(self) -> Result<Self, GameError> {
        let ok = match self {
            BetSpot::Straight(n) => n <= 36,
            BetSpot::Column(c) => c <= 2,
            BetSpot::Dozen(d) => d <= 2,
            _ => true,
        };
        if ok {
            Ok(self)
        } else {
            Err(GameError::InvalidBet(format!("no such spot: {self}")))
        }
    }

    pub fn covers(self, n: u8) -> bool {
        if n == 0 {
            return self == BetSpot::Straight(0);
        }
        match self {
            BetSpot::Straight(k) => k == n,
            BetSpot::Column(c) => (n - 1) % 3 == c,
            BetSpot::Dozen(d) => (n - 1) / 12 == d,
            BetSpot::Red => color_of(n) == Color::Red,
            BetSpot::Black => color_of(n) == Color::Black,
            BetSpot::Even => n % 2 == 0,
            BetSpot::Odd => n % 2 == 1,
            BetSpot::Low => n <= 18,
            BetSpot::High => n >= 19,
        }
    }

    /// Chips returned per chip staked on a hit, stake included.
    pub fn multiplier(self) -> u32 {
        match self {
            BetSpot::Straight(_) => 36,
            BetSpot::Column(_) | BetSpot::Dozen(_) => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for BetSpot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetSpot::Straight(n) => write!(f, "{n}"),
            BetSpot::Column(c) => write!(f, "col{}", c + 1),
            BetSpot::Dozen(d) => write!(f, "dozen{}", d + 1),
            BetSpot::Red => f.write_str("red"),
            BetSpot::Black => f.write_str("black"),
            BetSpot::Even => f.write_str("even"),
            BetSpot::Odd => f.write_str("odd"),
            BetSpot::Low => f.write_str("low"),
            BetSpot::High => f.write_str("high"),
        }
    }
}

impl FromStr for BetSpot {
    type Err = GameError;

    /// Accepts the labels [`Display`](fmt::Display) writes plus a few table
    /// aliases such as `1-18` or `2nd12`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let spot = match s.as_str() {
            "red" => BetSpot::Red,
            "black" => BetSpot::Black,
            "even" => BetSpot::Even,
            "odd" => BetSpot::Odd,
            "low" | "1-18" => BetSpot::Low,
            "high" | "19-36" => BetSpot::High,
            "1st12" => BetSpot::Dozen(0),
            "2nd12" => BetSpot::Dozen(1),
            "3rd12" => BetSpot::Dozen(2),
            other => {
                let indexed = |prefix: &str| {
                    other
                        .strip_prefix(prefix)
                        .and_then(|rest| rest.parse::<u8>().ok())
                        .filter(|i| (1..=3).contains(i))
                        .map(|i| i - 1)
                };
                if let Some(c) = indexed("col") {
                    BetSpot::Column(c)
                } else if let Some(d) = indexed("dozen") {
                    BetSpot::Dozen(d)
                } else if let Ok(n) = other.parse::<u8>() {
                    BetSpot::Straight(n)
                } else {
                    return Err(GameError::InvalidBet(format!("unknown bet spot: {other}")));
                }
            }
        };
        spot.validate()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub spot: BetSpot,
    pub stake: u32,
}

impl Bet {
    pub fn returns(&self, outcome: u8) -> Result<u32, GameError> {
        if !self.spot.covers(outcome) {
            return Ok(0);
        }
        self.stake
            .checked_mul(self.spot.multiplier())
            .ok_or(GameError::PayoutOverflow { stake: self.stake })
    }

    /// Largest amount this bet can return on any pocket.
    fn max_return(&self) -> u64 {
        u64::from(self.stake) * u64::from(self.spot.multiplier())
    }
}

/// Total returned by `bets` when the ball lands on `outcome`.
pub fn payout(bets: &[Bet], outcome: u8) -> Result<u32, GameError> {
    bets.iter().try_fold(0u32, |total, b| {
        total
            .checked_add(b.returns(outcome)?)
            .ok_or(GameError::PayoutOverflow { stake: b.stake })
    })
}

/// All bets of one spin, resolved once the pocket is known.
struct WheelRound {
    bets: Vec<Bet>,
    winnings: u32,
    ledger: Ledger,
}

impl Round for WheelRound {
    fn game(&self) -> GameKind {
        GameKind::Roulette
    }
    fn ledger(&self) -> &Ledger {
        &self.ledger
    }
    fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }
    fn winnings(&self) -> Option<u32> {
        Some(self.winnings)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinResult {
    pub outcome: u8,
    pub color: Color,
    pub bets: Vec<Bet>,
    /// Bets that covered the outcome.
    pub winning: Vec<Bet>,
    pub settlement: Settlement,
}

impl SpinResult {
    pub fn stake(&self) -> u32 {
        self.settlement.payout.stake
    }
    pub fn winnings(&self) -> u32 {
        self.settlement.payout.winnings
    }
}

impl Recordable for SpinResult {
    fn to_record(&self) -> RoundRecord {
        let mut rec = RoundRecord::unstamped(GameKind::Roulette, self.stake(), self.winnings());
        rec.actions = self
            .bets
            .iter()
            .map(|b| ActionRecord::new(0, "betting", format!("bet {} {}", b.spot, b.stake)))
            .collect();
        rec.result = Some(format!("{} {}", self.outcome, self.color.as_str()));
        rec.meta = Some(serde_json::json!({
            "wheel_position": wheel_position(self.outcome),
            "winning_bets": self.winning.len(),
        }));
        rec
    }
}

/// Betting layout of a roulette table plus the recent results board.
#[derive(Debug, Clone, Default)]
pub struct RouletteTable {
    bets: Vec<Bet>,
    history: Vec<u8>,
}

impl RouletteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits `stake` on `spot`. Repeated bets on one spot accumulate.
    /// Returns the total now riding on the spot.
    pub fn place_bet(
        &mut self,
        table: &mut Table,
        spot: BetSpot,
        stake: u32,
    ) -> Result<u32, GameError> {
        let spot = spot.validate()?;
        let minimum = table.rules().min_bet;
        if stake < minimum {
            return Err(GameError::BelowMinimum {
                amount: stake,
                minimum,
            });
        }
        let riding: u64 = self.bets.iter().map(Bet::max_return).sum();
        let added = Bet { spot, stake }.max_return();
        table.ensure_payout_fits(stake, riding + added)?;
        table.commit(stake)?;
        let total = match self.bets.iter_mut().find(|b| b.spot == spot) {
            Some(bet) => {
                bet.stake += stake;
                bet.stake
            }
            None => {
                self.bets.push(Bet { spot, stake });
                stake
            }
        };
        tracing::debug!(spot = %spot, stake, total, "roulette bet placed");
        Ok(total)
    }

    /// Refunds every open bet and returns the amount refunded.
    pub fn clear_bets(&mut self, table: &mut Table) -> u32 {
        let refund = self.total_staked();
        table.refund(refund);
        self.bets.clear();
        refund
    }

    pub fn spin<R: Rng + ?Sized>(
        &mut self,
        table: &mut Table,
        rng: &mut R,
    ) -> Result<SpinResult, GameError> {
        if self.bets.is_empty() {
            return Err(GameError::illegal("place a bet before spinning"));
        }
        let outcome = rng.random_range(0..=36u8);
        self.spin_with_outcome(table, outcome)
    }

    /// Resolves the open bets against a known pocket and settles them.
    pub fn spin_with_outcome(
        &mut self,
        table: &mut Table,
        outcome: u8,
    ) -> Result<SpinResult, GameError> {
        if outcome > 36 {
            return Err(GameError::InvalidBet(format!("no pocket {outcome}")));
        }
        if self.bets.is_empty() {
            return Err(GameError::illegal("place a bet before spinning"));
        }
        let winnings = payout(&self.bets, outcome)?;
        let mut round = WheelRound {
            bets: std::mem::take(&mut self.bets),
            winnings,
            ledger: Ledger::default(),
        };
        let staked = round.bets.iter().map(|b| b.stake).sum();
        round.ledger.add_stake(staked);
        let settlement = table.settle(&mut round)?;

        self.history.push(outcome);
        if self.history.len() > HISTORY_LEN {
            self.history.remove(0);
        }
        let winning = round
            .bets
            .iter()
            .filter(|b| b.spot.covers(outcome))
            .copied()
            .collect();
        Ok(SpinResult {
            outcome,
            color: color_of(outcome),
            bets: round.bets,
            winning,
            settlement,
        })
    }

    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }

    pub fn total_staked(&self) -> u32 {
        self.bets.iter().map(|b| b.stake).sum()
    }

    /// Most recent results, oldest first.
    pub fn history(&self) -> &[u8] {
        &self.history
    }
}
