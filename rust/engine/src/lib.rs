//! # parlor-engine: Round Engine for Points Mini-Games
//!
//! Rules, state machines and chip settlement for four table games played
//! against the house with loyalty points: blackjack, a simplified hold'em,
//! single-zero roulette and a three-reel slot machine.
//!
//! A player buys chips into a [`table::Table`] from an external points
//! balance, plays any number of rounds, and leaves with
//! `balance - buy_in + chips`. Every round debits its stake when chips are
//! committed and is credited its winnings exactly once.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card)
//! - [`deck`] - 52-card deck with seeded shuffling
//! - [`hand`] - Blackjack totals and poker showdown scoring
//! - [`rules`] - Per-game limits and poker action validation
//! - [`player`] - Poker seats and actions
//! - [`table`] - Chip escrow and idempotent settlement
//! - [`settlement`] - Payout contract shared by all rounds
//! - [`blackjack`], [`poker`], [`roulette`], [`slots`] - Game rounds
//! - [`engine`] - Session wrapper owning the table, RNG and round log
//! - [`logger`] - JSONL round records
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use parlor_engine::cards::{Card, Rank, Suit};
//! use parlor_engine::hand::blackjack_value;
//!
//! let hand = [
//!     Card::new(Rank::Ace, Suit::Spades),
//!     Card::new(Rank::Ace, Suit::Hearts),
//!     Card::new(Rank::Nine, Suit::Clubs),
//! ];
//! assert_eq!(blackjack_value(&hand), 21);
//! ```
//!
//! ## A Blackjack Round
//!
//! ```rust
//! use parlor_engine::blackjack::{BlackjackPhase, BlackjackRound};
//! use parlor_engine::cards::{Card, Rank, Suit};
//! use parlor_engine::deck::Deck;
//! use parlor_engine::rules::{BlackjackRules, GameKind, TableRules};
//! use parlor_engine::table::Table;
//!
//! let mut table = Table::open(TableRules::for_game(GameKind::Blackjack), 500, 100).unwrap();
//! let c = |r| Card::new(r, Suit::Hearts);
//! // player K 5, dealer 9 8, then the player's hit
//! let deck = Deck::stacked(vec![c(Rank::King), c(Rank::Five), c(Rank::Nine), c(Rank::Eight), c(Rank::Six)]);
//!
//! let mut round = BlackjackRound::new(BlackjackRules::default());
//! round.deal_from(&mut table, 20, deck).unwrap();
//! assert_eq!(round.hit().unwrap(), BlackjackPhase::Ended);
//!
//! table.settle(&mut round).unwrap();
//! assert_eq!(table.chips(), 120);
//! ```
//!
//! ## Deterministic Play
//!
//! ```rust
//! use parlor_engine::deck::Deck;
//!
//! let mut a = Deck::new_with_seed(42);
//! let mut b = Deck::new_with_seed(42);
//! assert_eq!(a.draw_n(52), b.draw_n(52));
//! ```

pub mod blackjack;
pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod hand;
pub mod logger;
pub mod player;
pub mod poker;
pub mod roulette;
pub mod rules;
pub mod settlement;
pub mod slots;
pub mod table;
