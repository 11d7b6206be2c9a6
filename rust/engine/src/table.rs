use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::rules::{GameKind, TableRules};
use crate::settlement::{Round, Settlement};

/// Chip escrow for one visit to a game table.
///
/// The buy-in is taken from the external points balance when the table is
/// opened. Rounds commit stakes out of the table chips and are credited their
/// winnings through [`Table::settle`]. Leaving hands
/// `external_balance - buy_in + chips` back to the caller exactly once.
///
/// # Examples
///
/// ```
/// use parlor_engine::rules::{GameKind, TableRules};
/// use parlor_engine::table::Table;
///
/// let table = Table::open(TableRules::for_game(GameKind::Slots), 300, 100).unwrap();
/// assert_eq!(table.chips(), 100);
///
/// let mut new_balance = None;
/// table.leave(|balance| new_balance = Some(balance));
/// assert_eq!(new_balance, Some(300));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    rules: TableRules,
    external_balance: u64,
    buy_in: u32,
    chips: u32,
    rounds_settled: u64,
}

impl Table {
    pub fn open(rules: TableRules, external_balance: u64, buy_in: u32) -> Result<Self, GameError> {
        if buy_in < rules.min_buy_in {
            return Err(GameError::BelowMinimum {
                amount: buy_in,
                minimum: rules.min_buy_in,
            });
        }
        if u64::from(buy_in) > external_balance {
            return Err(GameError::InsufficientChips {
                needed: buy_in,
                available: u32::try_from(external_balance).unwrap_or(u32::MAX),
            });
        }
        tracing::debug!(game = %rules.game, buy_in, external_balance, "table opened");
        Ok(Self {
            rules,
            external_balance,
            buy_in,
            chips: buy_in,
            rounds_settled: 0,
        })
    }

    pub fn game(&self) -> GameKind {
        self.rules.game
    }
    pub fn rules(&self) -> &TableRules {
        &self.rules
    }
    pub fn chips(&self) -> u32 {
        self.chips
    }
    pub fn buy_in(&self) -> u32 {
        self.buy_in
    }
    pub fn external_balance(&self) -> u64 {
        self.external_balance
    }
    pub fn rounds_settled(&self) -> u64 {
        self.rounds_settled
    }

    /// True while the chips cover the smallest stake this game accepts.
    pub fn can_continue(&self) -> bool {
        self.chips >= self.rules.min_bet
    }

    /// Net table result so far, positive when the player is ahead.
    pub fn net(&self) -> i64 {
        i64::from(self.chips) - i64::from(self.buy_in)
    }

    /// Balance the player would hold after leaving now.
    pub fn balance_on_leave(&self) -> u64 {
        (self.external_balance - u64::from(self.buy_in)) + u64::from(self.chips)
    }

    /// Moves chips from the table into a round. Fails without touching the
    /// table when `amount` exceeds the chips.
    pub(crate) fn commit(&mut self, amount: u32) -> Result<(), GameError> {
        if amount > self.chips {
            return Err(GameError::InsufficientChips {
                needed: amount,
                available: self.chips,
            });
        }
        self.chips -= amount;
        Ok(())
    }

    /// Fails unless the chips left after committing `stake` can absorb a
    /// return of `max_return`. Checked before any chips move.
    pub(crate) fn ensure_payout_fits(&self, stake: u32, max_return: u64) -> Result<(), GameError> {
        let after = u64::from(self.chips.saturating_sub(stake)) + max_return;
        if after > u64::from(u32::MAX) {
            return Err(GameError::PayoutOverflow { stake });
        }
        Ok(())
    }

    /// Returns chips that were committed but never played, e.g. cleared bets.
    pub(crate) fn refund(&mut self, amount: u32) {
        self.chips = self.chips.saturating_add(amount);
    }

    /// Credits a resolved round's winnings. Each round instance settles once.
    ///
    /// # Errors
    ///
    /// - [`GameError::AlreadySettled`] - the round was settled before
    /// - [`GameError::RoundInProgress`] - the round has no outcome yet
    /// - [`GameError::PayoutOverflow`] - the credit does not fit; nothing changes
    pub fn settle<R: Round + ?Sized>(&mut self, round: &mut R) -> Result<Settlement, GameError> {
        if round.ledger().is_settled() {
            return Err(GameError::AlreadySettled);
        }
        let payout = round.payout().ok_or(GameError::RoundInProgress)?;
        self.chips = self
            .chips
            .checked_add(payout.winnings)
            .ok_or(GameError::PayoutOverflow {
                stake: payout.stake,
            })?;
        round.ledger_mut().mark_settled();
        self.rounds_settled += 1;
        tracing::debug!(
            game = %round.game(),
            stake = payout.stake,
            winnings = payout.winnings,
            chips = self.chips,
            "round settled"
        );
        Ok(Settlement {
            game: round.game(),
            payout,
            chips_after: self.chips,
        })
    }

    /// Closes the table and reports the new external balance once. Chips
    /// committed to an unsettled round are forfeited.
    pub fn leave<F: FnOnce(u64)>(self, on_balance: F) -> u64 {
        let balance = self.balance_on_leave();
        tracing::debug!(game = %self.rules.game, balance, net = self.net(), "table closed");
        on_balance(balance);
        balance
    }
}
