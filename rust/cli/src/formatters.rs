//! Terminal formatting for cards, actions and results.
//!
//! Suits use Unicode symbols (♥ ♦ ♣ ♠) where the terminal supports them and
//! fall back to `h d c s` otherwise.
//!
//! ## Example
//!
//! ```rust
//! use parlor_engine::cards::{Card, Rank, Suit};
//! use parlor_cli::formatters::{format_card, format_cards};
//!
//! let ace_spades = Card::new(Rank::Ace, Suit::Spades);
//! assert!(format_card(&ace_spades) == "A♠" || format_card(&ace_spades) == "As");
//! assert!(format_cards(&[ace_spades]).starts_with("[A"));
//! ```

use parlor_engine::cards::{Card, Suit};
use parlor_engine::hand::ShowdownScore;
use parlor_engine::player::PlayerAction;
use parlor_engine::slots::Reels;

/// On Windows only modern terminals are trusted with Unicode.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_card(card: &Card) -> String {
    if supports_unicode() {
        return card.to_string();
    }
    let suit = match card.suit {
        Suit::Hearts => 'h',
        Suit::Diamonds => 'd',
        Suit::Clubs => 'c',
        Suit::Spades => 's',
    };
    format!("{}{}", card.rank, suit)
}

/// Cards in brackets, e.g. `[K♥ 5♣]`.
pub fn format_cards(cards: &[Card]) -> String {
    let inner: Vec<String> = cards.iter().map(format_card).collect();
    format!("[{}]", inner.join(" "))
}

pub fn format_action(action: &PlayerAction) -> String {
    match action {
        PlayerAction::Fold => "folds".to_string(),
        PlayerAction::Check => "checks".to_string(),
        PlayerAction::Call => "calls".to_string(),
        PlayerAction::Raise(n) => format!("raises {n}"),
    }
}

/// Signed chip change, e.g. `+20`, `-15`, `0`.
pub fn format_delta(delta: i64) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

/// Showdown score as shown at the table: the points total, or the hand
/// category under canonical ranking.
pub fn format_score(score: &ShowdownScore) -> String {
    match score {
        ShowdownScore::Simplified(points) => format!("{points} pts"),
        ShowdownScore::Canonical(strength) => format!("{:?}", strength.category),
    }
}

pub fn format_reels(reels: &Reels) -> String {
    if supports_unicode() {
        let glyphs: Vec<&str> = reels.iter().map(|s| s.glyph()).collect();
        format!("| {} |", glyphs.join(" | "))
    } else {
        let names: Vec<&str> = reels.iter().map(|s| s.name()).collect();
        format!("| {} |", names.join(" | "))
    }
}
