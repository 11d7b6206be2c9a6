use std::collections::HashSet;

use parlor_engine::cards::{full_deck, Card};
use parlor_engine::deck::Deck;
use parlor_engine::errors::GameError;

/// Draws the whole deck and checks it holds each canonical card exactly once.
fn assert_full_permutation(mut deck: Deck) {
    let canonical: HashSet<Card> = full_deck().into_iter().collect();
    let mut seen = HashSet::new();
    for i in 0..52 {
        let c = deck.draw().expect("should have 52 cards");
        assert!(canonical.contains(&c), "card {:?} is not in the canonical deck", c);
        assert!(seen.insert(c), "card {:?} duplicated at position {}", c, i);
    }
    assert_eq!(deck.draw(), Err(GameError::EmptyDeck));
}

#[test]
fn seeded_decks_are_permutations_of_52() {
    for seed in 0..500 {
        assert_full_permutation(Deck::new_with_seed(seed));
    }
}

#[test]
fn thread_rng_shuffles_are_permutations_of_52() {
    let mut rng = rand::rng();
    for _ in 0..200 {
        assert_full_permutation(Deck::shuffled(&mut rng));
    }
}

#[test]
fn shuffle_is_deterministic_with_same_seed() {
    let mut d1 = Deck::new_with_seed(12345);
    let mut d2 = Deck::new_with_seed(12345);
    let a: Vec<Card> = d1.draw_n(10).unwrap();
    let b: Vec<Card> = d2.draw_n(10).unwrap();
    assert_eq!(a, b, "same seed must yield identical order");
}

#[test]
fn shuffle_differs_with_different_seed() {
    let mut d1 = Deck::new_with_seed(1);
    let mut d2 = Deck::new_with_seed(2);
    assert_ne!(
        d1.draw_n(10).unwrap(),
        d2.draw_n(10).unwrap(),
        "different seeds should produce different orders (high probability)"
    );
}

#[test]
fn drawing_past_the_end_fails_without_losing_cards() {
    let mut deck = Deck::new_with_seed(9);
    deck.draw_n(50).unwrap();
    assert_eq!(deck.remaining(), 2);
    assert_eq!(deck.draw_n(3), Err(GameError::EmptyDeck));
    assert_eq!(deck.remaining(), 2);
}
