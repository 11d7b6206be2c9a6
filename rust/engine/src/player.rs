use crate::cards::Card;
use serde::{Deserialize, Serialize};

/// Represents a player action during a poker street.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Fold and forfeit everything committed this round
    Fold,
    /// Check (only valid when nothing is owed)
    Check,
    /// Match the table bet
    Call,
    /// Match the table bet and lift it by the given amount
    Raise(u32),
}

impl PlayerAction {
    pub fn label(&self) -> String {
        match self {
            PlayerAction::Fold => "fold".to_string(),
            PlayerAction::Check => "check".to_string(),
            PlayerAction::Call => "call".to_string(),
            PlayerAction::Raise(n) => format!("raise {n}"),
        }
    }
}

/// A participant at a card table: the human at seat 0 or a house-controlled
/// opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    chips: u32,
    hand: Vec<Card>,
    folded: bool,
    /// Chips committed since the round began
    current_bet: u32,
}

impl Player {
    /// The human seat. Its chips mirror the table and are set on the stake.
    pub fn human(name: impl Into<String>) -> Self {
        Self::seat(name, 0)
    }

    pub fn house(name: impl Into<String>, chips: u32) -> Self {
        Self::seat(name, chips)
    }

    fn seat(name: impl Into<String>, chips: u32) -> Self {
        Self {
            name: name.into(),
            chips,
            hand: Vec::with_capacity(2),
            folded: false,
            current_bet: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn chips(&self) -> u32 {
        self.chips
    }
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }
    pub fn folded(&self) -> bool {
        self.folded
    }
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }

    pub fn give_card(&mut self, c: Card) {
        self.hand.push(c);
    }

    pub fn fold(&mut self) {
        self.folded = true;
    }

    pub(crate) fn set_chips(&mut self, chips: u32) {
        self.chips = chips;
    }

    pub fn add_chips(&mut self, amount: u32) {
        self.chips = self.chips.saturating_add(amount);
    }

    /// Moves chips from the stack into the round. Nothing changes when the
    /// stack cannot cover `amount`.
    pub fn commit(&mut self, amount: u32) -> Result<(), crate::errors::GameError> {
        if amount > self.chips {
            return Err(crate::errors::GameError::InsufficientChips {
                needed: amount,
                available: self.chips,
            });
        }
        self.chips -= amount;
        self.current_bet += amount;
        Ok(())
    }

    /// Records chips the table already debited for this seat.
    pub(crate) fn record_commit(&mut self, amount: u32) {
        self.current_bet += amount;
    }

    /// Empties the hand and clears per-round state, keeping the stack.
    pub fn reset_for_round(&mut self) {
        self.hand.clear();
        self.folded = false;
        self.current_bet = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GameError;

    #[test]
    fn commit_rejects_overbet_without_mutation() {
        let mut p = Player::house("CPU", 100);
        assert_eq!(
            p.commit(150),
            Err(GameError::InsufficientChips {
                needed: 150,
                available: 100
            })
        );
        assert_eq!(p.chips(), 100);
        assert_eq!(p.current_bet(), 0);
        p.commit(40).unwrap();
        assert_eq!(p.chips(), 60);
        assert_eq!(p.current_bet(), 40);
    }
}
