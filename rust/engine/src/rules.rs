use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::hand::ScoringMode;
use crate::player::PlayerAction as A;

/// The four mini-games a table can host.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Blackjack,
    Poker,
    Roulette,
    Slots,
}

impl GameKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GameKind::Blackjack => "blackjack",
            GameKind::Poker => "poker",
            GameKind::Roulette => "roulette",
            GameKind::Slots => "slots",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blackjack" | "bj" => Ok(GameKind::Blackjack),
            "poker" | "holdem" => Ok(GameKind::Poker),
            "roulette" => Ok(GameKind::Roulette),
            "slots" => Ok(GameKind::Slots),
            other => Err(format!("unknown game: {other}")),
        }
    }
}

/// Escrow limits shared by every game: the smallest buy-in a table accepts
/// and the smallest stake a round can be played for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRules {
    pub game: GameKind,
    pub min_buy_in: u32,
    pub min_bet: u32,
}

impl TableRules {
    pub fn for_game(game: GameKind) -> Self {
        let (min_buy_in, min_bet) = match game {
            GameKind::Blackjack => (20, BlackjackRules::default().min_bet),
            GameKind::Poker => (25, PokerRules::default().min_stake),
            GameKind::Roulette => (10, 5),
            GameKind::Slots => (5, SlotRules::default().min_bet),
        };
        Self {
            game,
            min_buy_in,
            min_bet,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackjackRules {
    pub min_bet: u32,
    /// Dealer keeps drawing while below this total.
    pub dealer_stands_on: u32,
    /// Returned per unit staked on a win, stake included.
    pub win_multiplier: u32,
}

impl Default for BlackjackRules {
    fn default() -> Self {
        Self {
            min_bet: 20,
            dealer_stands_on: 17,
            win_multiplier: 2,
        }
    }
}

/// A house-controlled poker seat and its starting stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentSeat {
    pub name: String,
    pub chips: u32,
}

impl OpponentSeat {
    pub fn new(name: impl Into<String>, chips: u32) -> Self {
        Self {
            name: name.into(),
            chips,
        }
    }
}

/// Most opponents a single deck can deal hole cards and a board to.
pub const MAX_OPPONENTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokerRules {
    pub min_stake: u32,
    /// Amount a human raise lifts the table bet by.
    pub raise_increment: u32,
    pub opponents: Vec<OpponentSeat>,
    pub scoring: ScoringMode,
}

impl Default for PokerRules {
    fn default() -> Self {
        Self {
            min_stake: 25,
            raise_increment: 50,
            opponents: vec![
                OpponentSeat::new("CPU 1", 500),
                OpponentSeat::new("CPU 2", 800),
                OpponentSeat::new("CPU 3", 600),
            ],
            scoring: ScoringMode::Simplified,
        }
    }
}

impl PokerRules {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.opponents.is_empty() || self.opponents.len() > MAX_OPPONENTS {
            return Err(GameError::InvalidBet(format!(
                "a poker table seats 1 to {MAX_OPPONENTS} opponents, got {}",
                self.opponents.len()
            )));
        }
        if self.raise_increment == 0 || self.min_stake == 0 {
            return Err(GameError::InvalidBet(
                "stake and raise increment must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRules {
    pub min_bet: u32,
    /// Paid on any two matching reels.
    pub pair_multiplier: u32,
}

impl Default for SlotRules {
    fn default() -> Self {
        Self {
            min_bet: 5,
            pair_multiplier: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    /// Chips moved in to match the table bet.
    Call(u32),
    /// `total` chips moved in, lifting the table bet by `increment`.
    Raise { total: u32, increment: u32 },
}

/// Validates a human poker action against the player's chips.
///
/// # Arguments
///
/// * `chips` - Chips the player can still commit
/// * `to_call` - Chips needed to match the table bet
/// * `raise_increment` - The only amount a raise may lift the table bet by
/// * `action` - The requested action
///
/// # Errors
///
/// - [`GameError::IllegalAction`] - Check while a bet is outstanding, or a
///   raise of any amount other than `raise_increment`
/// - [`GameError::InsufficientChips`] - Call or raise the player cannot cover
///
/// # Examples
///
/// ```
/// use parlor_engine::rules::{validate_action, ValidatedAction};
/// use parlor_engine::player::PlayerAction;
/// use parlor_engine::errors::GameError;
///
/// let result = validate_action(1000, 50, 50, PlayerAction::Raise(50));
/// assert_eq!(result, Ok(ValidatedAction::Raise { total: 100, increment: 50 }));
///
/// let result = validate_action(1000, 50, 50, PlayerAction::Check);
/// assert!(matches!(result, Err(GameError::IllegalAction(_))));
///
/// let result = validate_action(1000, 50, 50, PlayerAction::Raise(1000));
/// assert!(matches!(result, Err(GameError::IllegalAction(_))));
/// ```
pub fn validate_action(
    chips: u32,
    to_call: u32,
    raise_increment: u32,
    action: A,
) -> Result<ValidatedAction, GameError> {
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Check => {
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Err(GameError::IllegalAction(format!(
                    "cannot check facing a bet of {to_call}"
                )))
            }
        }
        A::Call => {
            if chips < to_call {
                Err(GameError::InsufficientChips {
                    needed: to_call,
                    available: chips,
                })
            } else {
                Ok(ValidatedAction::Call(to_call))
            }
        }
        A::Raise(amount) => {
            if amount != raise_increment {
                return Err(GameError::IllegalAction(format!(
                    "raises are fixed at {raise_increment}, got {amount}"
                )));
            }
            let total = to_call.saturating_add(amount);
            if chips < total {
                Err(GameError::InsufficientChips {
                    needed: total,
                    available: chips,
                })
            } else {
                Ok(ValidatedAction::Raise {
                    total,
                    increment: amount,
                })
            }
        }
    }
}
