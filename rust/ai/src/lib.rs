//! # parlor-ai: Scripted Poker Opponents
//!
//! House-controlled poker seats decide through a [`ScriptedOpponent`]. A
//! policy sees the round read-only and draws from an injected random source,
//! so a seeded session replays the same decisions.
//!
//! ## Core Components
//!
//! - [`ScriptedOpponent`] - Trait every opponent policy implements
//! - [`fixed_odds`] - The house policy: fold, call or raise with fixed odds
//! - [`create_opponent`] - Factory selecting a policy by name
//! - [`step_opponent`] - Plays out the next pending opponent decision
//! - [`resolve_opponents`] - Plays out every pending opponent decision
//!
//! ## Quick Start
//!
//! ```rust
//! use parlor_ai::{create_opponent, resolve_opponents};
//! use parlor_engine::player::PlayerAction;
//! use parlor_engine::poker::PokerRound;
//! use parlor_engine::rules::{GameKind, PokerRules, TableRules};
//! use parlor_engine::table::Table;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut table = Table::open(TableRules::for_game(GameKind::Poker), 1_000, 500).unwrap();
//! let mut round = PokerRound::new(PokerRules::default()).unwrap();
//! round.place_stake(&mut table, 25, &mut rng).unwrap();
//! round.act(&mut table, PlayerAction::Check).unwrap();
//!
//! let house = create_opponent("house").unwrap();
//! let decisions = resolve_opponents(&mut round, house.as_ref(), &mut rng).unwrap();
//! assert!(!decisions.is_empty());
//! assert!(round.next_to_act().is_none());
//! ```

use parlor_engine::errors::GameError;
use parlor_engine::player::PlayerAction;
use parlor_engine::poker::PokerRound;
use rand::RngCore;

pub mod fixed_odds;

/// Decision policy for a house-controlled poker seat.
///
/// # Example Implementation
///
/// ```rust
/// use parlor_ai::ScriptedOpponent;
/// use parlor_engine::player::PlayerAction;
/// use parlor_engine::poker::PokerRound;
/// use rand::RngCore;
///
/// struct AlwaysCall;
///
/// impl ScriptedOpponent for AlwaysCall {
///     fn decide(&self, _round: &PokerRound, _seat: usize, _rng: &mut dyn RngCore) -> PlayerAction {
///         PlayerAction::Call
///     }
///
///     fn name(&self) -> &str {
///         "AlwaysCall"
///     }
/// }
/// ```
pub trait ScriptedOpponent: Send + Sync {
    /// Chooses the action for `seat`, which is due to act in `round`. The
    /// round turns actions the seat cannot afford into a call or a fold.
    fn decide(&self, round: &PokerRound, seat: usize, rng: &mut dyn RngCore) -> PlayerAction;

    fn name(&self) -> &str;
}

/// Never folds, never raises.
#[derive(Debug, Clone, Default)]
pub struct PassiveOpponent;

impl ScriptedOpponent for PassiveOpponent {
    fn decide(&self, round: &PokerRound, seat: usize, _rng: &mut dyn RngCore) -> PlayerAction {
        if round.to_call(seat) == 0 {
            PlayerAction::Check
        } else {
            PlayerAction::Call
        }
    }

    fn name(&self) -> &str {
        "Passive"
    }
}

/// Opponent policy by name: `house` (alias `fixed-odds`) or `passive`.
///
/// ```rust
/// use parlor_ai::create_opponent;
///
/// assert_eq!(create_opponent("house").unwrap().name(), "FixedOdds");
/// assert!(create_opponent("shark").is_err());
/// ```
pub fn create_opponent(kind: &str) -> Result<Box<dyn ScriptedOpponent>, String> {
    match kind {
        "house" | "fixed-odds" => Ok(Box::new(fixed_odds::FixedOddsPolicy::default())),
        "passive" => Ok(Box::new(PassiveOpponent)),
        other => Err(format!("Unknown opponent policy: {other}")),
    }
}

/// Asks `policy` for the next queued opponent decision and applies it.
/// Returns the seat with the action actually taken, or `None` when no
/// opponent is due.
pub fn step_opponent(
    round: &mut PokerRound,
    policy: &dyn ScriptedOpponent,
    rng: &mut dyn RngCore,
) -> Result<Option<(usize, PlayerAction)>, GameError> {
    let Some(seat) = round.next_to_act() else {
        return Ok(None);
    };
    let wanted = policy.decide(round, seat, rng);
    let taken = round.apply_opponent(seat, wanted)?;
    Ok(Some((seat, taken)))
}

/// Applies every queued opponent decision until the human is due again or
/// the round ends. Returns each seat with the action actually applied.
pub fn resolve_opponents(
    round: &mut PokerRound,
    policy: &dyn ScriptedOpponent,
    rng: &mut dyn RngCore,
) -> Result<Vec<(usize, PlayerAction)>, GameError> {
    let mut applied = Vec::new();
    while let Some(step) = step_opponent(round, policy, rng)? {
        applied.push(step);
    }
    Ok(applied)
}
