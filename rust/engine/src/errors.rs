use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Insufficient chips: need {needed}, have {available}")]
    InsufficientChips { needed: u32, available: u32 },
    #[error("Amount {amount} is below the table minimum of {minimum}")]
    BelowMinimum { amount: u32, minimum: u32 },
    #[error("Illegal action: {0}")]
    IllegalAction(String),
    #[error("Invalid bet: {0}")]
    InvalidBet(String),
    /// A round drew more cards than one deck holds. Never expected in a
    /// well-formed round.
    #[error("Deck exhausted")]
    EmptyDeck,
    #[error("Round already settled")]
    AlreadySettled,
    #[error("Round is still in progress")]
    RoundInProgress,
    /// Winning this stake would leave more chips than a table can hold.
    #[error("Stake {stake} could pay out more than the table can hold")]
    PayoutOverflow { stake: u32 },
}

impl GameError {
    pub(crate) fn illegal(msg: impl Into<String>) -> Self {
        GameError::IllegalAction(msg.into())
    }
}
