use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// A dealing shoe of one standard deck. Cards are drawn from the end of the
/// vector and never put back; a new round builds a new deck.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Uniformly shuffled 52-card deck drawn from the given random source.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards = full_deck();
        cards.shuffle(rng);
        Self { cards }
    }

    pub fn new_with_seed(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// Unshuffled deck in canonical order.
    pub fn ordered() -> Self {
        Self { cards: full_deck() }
    }

    /// Deck whose successive draws return `draw_order` front to back.
    pub fn stacked(draw_order: Vec<Card>) -> Self {
        let mut cards = draw_order;
        cards.reverse();
        Self { cards }
    }

    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::EmptyDeck)
    }

    /// Draws `n` cards, or none at all when fewer remain.
    pub fn draw_n(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        if n > self.cards.len() {
            return Err(GameError::EmptyDeck);
        }
        Ok((0..n).filter_map(|_| self.cards.pop()).collect())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    #[test]
    fn stacked_deck_draws_in_listed_order() {
        let a = Card::new(Rank::Ace, Suit::Spades);
        let k = Card::new(Rank::King, Suit::Hearts);
        let mut deck = Deck::stacked(vec![a, k]);
        assert_eq!(deck.draw(), Ok(a));
        assert_eq!(deck.draw(), Ok(k));
        assert!(deck.is_empty());
        assert_eq!(deck.draw(), Err(GameError::EmptyDeck));
    }

    #[test]
    fn draw_n_fails_when_short() {
        let mut deck = Deck::stacked(vec![Card::new(Rank::Two, Suit::Clubs)]);
        assert_eq!(deck.draw_n(2), Err(GameError::EmptyDeck));
    }
}
