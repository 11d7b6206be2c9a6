//! Three-reel slot machine with a single pay line.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::logger::{ActionRecord, RoundRecord};
use crate::rules::{GameKind, SlotRules};
use crate::settlement::{Ledger, Recordable, Round, Settlement};
use crate::table::Table;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Cherry,
    Lemon,
    Orange,
    Grape,
    Bell,
    Diamond,
    Seven,
}

/// Every reel carries each symbol once, so all stops are equally likely.
pub const SYMBOLS: [Symbol; 7] = [
    Symbol::Cherry,
    Symbol::Lemon,
    Symbol::Orange,
    Symbol::Grape,
    Symbol::Bell,
    Symbol::Diamond,
    Symbol::Seven,
];

impl Symbol {
    /// Stake multiple paid for three of a kind.
    pub fn multiplier(self) -> u32 {
        match self {
            Symbol::Cherry => 2,
            Symbol::Lemon => 3,
            Symbol::Orange => 4,
            Symbol::Grape => 5,
            Symbol::Bell => 10,
            Symbol::Diamond => 20,
            Symbol::Seven => 50,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Cherry => "🍒",
            Symbol::Lemon => "🍋",
            Symbol::Orange => "🍊",
            Symbol::Grape => "🍇",
            Symbol::Bell => "🔔",
            Symbol::Diamond => "💎",
            Symbol::Seven => "7️⃣",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Symbol::Cherry => "cherry",
            Symbol::Lemon => "lemon",
            Symbol::Orange => "orange",
            Symbol::Grape => "grape",
            Symbol::Bell => "bell",
            Symbol::Diamond => "diamond",
            Symbol::Seven => "seven",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

pub type Reels = [Symbol; 3];

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineWin {
    Triple(Symbol),
    Pair(Symbol),
    Nothing,
}

pub fn classify(reels: &Reels) -> LineWin {
    let [a, b, c] = *reels;
    if a == b && b == c {
        LineWin::Triple(a)
    } else if a == b || a == c {
        LineWin::Pair(a)
    } else if b == c {
        LineWin::Pair(b)
    } else {
        LineWin::Nothing
    }
}

/// Chips returned for `stake` on the line, stake included.
///
/// ```
/// use parlor_engine::rules::SlotRules;
/// use parlor_engine::slots::{payout, Symbol};
///
/// let rules = SlotRules::default();
/// assert_eq!(payout(&[Symbol::Seven; 3], 10, &rules), Ok(500));
/// assert_eq!(payout(&[Symbol::Bell, Symbol::Lemon, Symbol::Bell], 10, &rules), Ok(20));
/// assert_eq!(payout(&[Symbol::Bell, Symbol::Lemon, Symbol::Grape], 10, &rules), Ok(0));
/// ```
pub fn payout(reels: &Reels, stake: u32, rules: &SlotRules) -> Result<u32, GameError> {
    let multiplier = match classify(reels) {
        LineWin::Triple(s) => s.multiplier(),
        LineWin::Pair(_) => rules.pair_multiplier,
        LineWin::Nothing => 0,
    };
    stake
        .checked_mul(multiplier)
        .ok_or(GameError::PayoutOverflow { stake })
}

/// Best multiplier any line can hit.
fn top_multiplier(rules: &SlotRules) -> u32 {
    SYMBOLS
        .iter()
        .map(|s| s.multiplier())
        .max()
        .unwrap_or(0)
        .max(rules.pair_multiplier)
}

struct ReelRound {
    winnings: u32,
    ledger: Ledger,
}

impl Round for ReelRound {
    fn game(&self) -> GameKind {
        GameKind::Slots
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
pub struct SlotSpin {
    pub reels: Reels,
    pub line: LineWin,
    pub settlement: Settlement,
}

impl SlotSpin {
    pub fn stake(&self) -> u32 {
        self.settlement.payout.stake
    }
    pub fn winnings(&self) -> u32 {
        self.settlement.payout.winnings
    }
}

impl Recordable for SlotSpin {
    fn to_record(&self) -> RoundRecord {
        let mut rec = RoundRecord::unstamped(GameKind::Slots, self.stake(), self.winnings());
        rec.actions = vec![ActionRecord::new(0, "betting", format!("spin {}", self.stake()))];
        rec.result = Some(
            self.reels
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join(" "),
        );
        rec
    }
}

#[derive(Debug, Clone, Default)]
pub struct SlotMachine {
    rules: SlotRules,
}

impl SlotMachine {
    pub fn new(rules: SlotRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &SlotRules {
        &self.rules
    }

    /// Commits `stake`, stops each reel on a uniformly drawn symbol and
    /// settles the line.
    pub fn spin<R: Rng + ?Sized>(
        &self,
        table: &mut Table,
        stake: u32,
        rng: &mut R,
    ) -> Result<SlotSpin, GameError> {
        self.check_stake(table, stake)?;
        let reels = [0; 3].map(|_| SYMBOLS[rng.random_range(0..SYMBOLS.len())]);
        self.spin_with_reels(table, stake, reels)
    }

    /// As [`SlotMachine::spin`] with the reel stops given.
    pub fn spin_with_reels(
        &self,
        table: &mut Table,
        stake: u32,
        reels: Reels,
    ) -> Result<SlotSpin, GameError> {
        self.check_stake(table, stake)?;
        let winnings = payout(&reels, stake, &self.rules)?;
        table.commit(stake)?;
        let mut round = ReelRound {
            winnings,
            ledger: Ledger::default(),
        };
        round.ledger.add_stake(stake);
        let settlement = table.settle(&mut round)?;
        Ok(SlotSpin {
            reels,
            line: classify(&reels),
            settlement,
        })
    }

    fn check_stake(&self, table: &Table, stake: u32) -> Result<(), GameError> {
        if stake < self.rules.min_bet {
            return Err(GameError::BelowMinimum {
                amount: stake,
                minimum: self.rules.min_bet,
            });
        }
        if stake > table.chips() {
            return Err(GameError::InsufficientChips {
                needed: stake,
                available: table.chips(),
            });
        }
        let max_return = u64::from(stake) * u64::from(top_multiplier(&self.rules));
        table.ensure_payout_fits(stake, max_return)
    }
}
