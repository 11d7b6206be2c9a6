//! The house poker policy: every decision is an independent roll with fixed
//! odds, blind to the cards.

use crate::ScriptedOpponent;
use parlor_engine::player::PlayerAction;
use parlor_engine::poker::PokerRound;
use rand::{Rng, RngCore};

/// Folds with probability `fold_p`, calls with `call_p`, otherwise raises by
/// a uniform amount in `raise_min..=raise_max`.
///
/// A fold roll with nothing owed checks instead.
///
/// # Example
///
/// ```rust
/// use parlor_ai::fixed_odds::FixedOddsPolicy;
/// use parlor_engine::player::PlayerAction;
///
/// let policy = FixedOddsPolicy::default();
/// assert_eq!(policy.choose(0.1, 0.0, 30), PlayerAction::Fold);
/// assert_eq!(policy.choose(0.1, 0.0, 0), PlayerAction::Check);
/// assert_eq!(policy.choose(0.3, 0.0, 30), PlayerAction::Call);
/// assert_eq!(policy.choose(0.9, 0.0, 30), PlayerAction::Raise(25));
/// assert_eq!(policy.choose(0.9, 0.999, 30), PlayerAction::Raise(74));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FixedOddsPolicy {
    pub fold_p: f64,
    pub call_p: f64,
    pub raise_min: u32,
    pub raise_max: u32,
}

impl Default for FixedOddsPolicy {
    fn default() -> Self {
        Self {
            fold_p: 0.2,
            call_p: 0.3,
            raise_min: 25,
            raise_max: 74,
        }
    }
}

impl FixedOddsPolicy {
    /// Maps two uniform rolls in `[0, 1)` to an action: `roll` picks the
    /// kind, `size` the raise amount.
    pub fn choose(&self, roll: f64, size: f64, to_call: u32) -> PlayerAction {
        if roll < self.fold_p {
            if to_call == 0 {
                PlayerAction::Check
            } else {
                PlayerAction::Fold
            }
        } else if roll < self.fold_p + self.call_p {
            if to_call == 0 {
                PlayerAction::Check
            } else {
                PlayerAction::Call
            }
        } else {
            let span = f64::from(self.raise_max - self.raise_min + 1);
            let extra = ((size * span).floor() as u32).min(self.raise_max - self.raise_min);
            PlayerAction::Raise(self.raise_min + extra)
        }
    }
}

impl ScriptedOpponent for FixedOddsPolicy {
    fn decide(&self, round: &PokerRound, seat: usize, rng: &mut dyn RngCore) -> PlayerAction {
        let roll: f64 = rng.random();
        let size: f64 = rng.random();
        self.choose(roll, size, round.to_call(seat))
    }

    fn name(&self) -> &str {
        "FixedOdds"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn frequencies_follow_the_configured_odds() {
        let policy = FixedOddsPolicy::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let (mut folds, mut calls, mut raises) = (0u32, 0u32, 0u32);
        let n = 20_000;
        for _ in 0..n {
            let roll: f64 = rng.random();
            let size: f64 = rng.random();
            match policy.choose(roll, size, 10) {
                PlayerAction::Fold => folds += 1,
                PlayerAction::Call => calls += 1,
                PlayerAction::Raise(r) => {
                    assert!((25..=74).contains(&r));
                    raises += 1;
                }
                PlayerAction::Check => panic!("check while owing chips"),
            }
        }
        let share = |k: u32| f64::from(k) / f64::from(n);
        assert!((share(folds) - 0.2).abs() < 0.02);
        assert!((share(calls) - 0.3).abs() < 0.02);
        assert!((share(raises) - 0.5).abs() < 0.02);
    }

    #[test]
    fn never_folds_when_checking_is_free() {
        let policy = FixedOddsPolicy::default();
        for i in 0..100 {
            let roll = f64::from(i) / 100.0;
            assert_ne!(policy.choose(roll, 0.5, 0), PlayerAction::Fold);
        }
    }
}
