//! Payout contract shared by every game.
//!
//! A round debits its stake from the table when chips are committed and
//! credits its winnings once it resolves, so the table moves by
//! `winnings - stake` per round. The [`Ledger`] carried by each round makes
//! that credit happen exactly once.

use serde::{Deserialize, Serialize};

use crate::logger::RoundRecord;
use crate::rules::GameKind;

/// Stake and settlement state of one round instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    stake: u32,
    settled: bool,
}

impl Ledger {
    pub fn stake(&self) -> u32 {
        self.stake
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub(crate) fn add_stake(&mut self, amount: u32) {
        self.stake += amount;
    }

    pub(crate) fn mark_settled(&mut self) {
        self.settled = true;
    }
}

/// What a resolved round returns to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub stake: u32,
    /// Chips returned, stake included: 0 on a loss, the stake on a push.
    pub winnings: u32,
}

impl Payout {
    pub fn delta(&self) -> i64 {
        self.winnings as i64 - self.stake as i64
    }
}

/// Receipt of an applied payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub game: GameKind,
    pub payout: Payout,
    /// Table chips after the credit.
    pub chips_after: u32,
}

impl Settlement {
    pub fn delta(&self) -> i64 {
        self.payout.delta()
    }
}

/// A round that can be settled against a [`crate::table::Table`].
pub trait Round {
    fn game(&self) -> GameKind;

    fn ledger(&self) -> &Ledger;

    fn ledger_mut(&mut self) -> &mut Ledger;

    /// Chips owed to the player, or `None` while the round is unresolved.
    fn winnings(&self) -> Option<u32>;

    fn payout(&self) -> Option<Payout> {
        self.winnings().map(|winnings| Payout {
            stake: self.ledger().stake(),
            winnings,
        })
    }
}

/// A finished round or spin that can be written to the round log.
pub trait Recordable {
    /// Log entry without id, seed or timestamp; [`crate::engine::Engine`]
    /// fills those in.
    fn to_record(&self) -> RoundRecord;
}
