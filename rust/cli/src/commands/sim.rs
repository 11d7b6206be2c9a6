//! Simulation command handler.
//!
//! Plays automated rounds at one table and reports how much of the staked
//! amount came back. Each game follows a fixed strategy:
//!
//! - roulette: a straight bet on 17 every spin
//! - slots: a flat stake every spin
//! - blackjack: hit below 17, stand otherwise
//!
//! # Environment Variables
//!
//! - `PARLOR_SIM_BREAK_AFTER`: Stop after N rounds (for testing)
//!
//! # Examples
//!
//! ```no_run
//! use std::io;
//!
//! let code = parlor_cli::run(
//!     ["parlor", "sim", "roulette", "--rounds", "1000", "--seed", "42"],
//!     &mut io::stdout(),
//!     &mut io::stderr(),
//! );
//! assert_eq!(code, 0);
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use parlor_engine::blackjack::{BlackjackPhase, BlackjackRound};
use parlor_engine::engine::Engine;
use parlor_engine::errors::GameError;
use parlor_engine::roulette::{BetSpot, RouletteTable};
use parlor_engine::rules::{BlackjackRules, GameKind, SlotRules, TableRules};
use parlor_engine::slots::SlotMachine;
use parlor_engine::table::Table;
use std::io::Write;

const ROULETTE_NUMBER: u8 = 17;
const BLACKJACK_STAND_ON: u32 = 17;

/// Totals over a simulation run.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct SimTotals {
    rounds: u64,
    staked: u64,
    returned: u64,
}

impl SimTotals {
    fn record(&mut self, stake: u32, winnings: u32) {
        self.rounds += 1;
        self.staked += u64::from(stake);
        self.returned += u64::from(winnings);
    }

    fn rtp(&self) -> f64 {
        if self.staked == 0 {
            0.0
        } else {
            self.returned as f64 / self.staked as f64
        }
    }

    fn net(&self) -> i64 {
        self.returned as i64 - self.staked as i64
    }
}

/// One automated player per game. Each call plays and settles one round.
enum Autoplayer {
    Roulette(RouletteTable),
    Slots(SlotMachine),
    Blackjack(BlackjackRules),
}

impl Autoplayer {
    fn for_game(game: GameKind) -> Result<Self, CliError> {
        match game {
            GameKind::Roulette => Ok(Autoplayer::Roulette(RouletteTable::new())),
            GameKind::Slots => Ok(Autoplayer::Slots(SlotMachine::new(SlotRules::default()))),
            GameKind::Blackjack => Ok(Autoplayer::Blackjack(BlackjackRules::default())),
            GameKind::Poker => Err(CliError::InvalidInput(
                "sim supports roulette, slots and blackjack".to_string(),
            )),
        }
    }

    /// Returns the chips the round paid back.
    fn play_round(&mut self, engine: &mut Engine, stake: u32) -> Result<u32, GameError> {
        match self {
            Autoplayer::Roulette(wheel) => {
                wheel.place_bet(engine.table_mut(), BetSpot::Straight(ROULETTE_NUMBER), stake)?;
                let (table, rng) = engine.table_and_rng();
                let result = wheel.spin(table, rng)?;
                Ok(result.winnings())
            }
            Autoplayer::Slots(machine) => {
                let (table, rng) = engine.table_and_rng();
                let spin = machine.spin(table, stake, rng)?;
                Ok(spin.winnings())
            }
            Autoplayer::Blackjack(rules) => {
                let mut round = BlackjackRound::new(*rules);
                let (table, rng) = engine.table_and_rng();
                round.deal(table, stake, rng)?;
                while round.phase() == BlackjackPhase::Playing {
                    if round.player_value() < BLACKJACK_STAND_ON {
                        round.hit()?;
                    } else {
                        round.stand()?;
                    }
                }
                let settlement = engine.settle(&mut round)?;
                Ok(settlement.payout.winnings)
            }
        }
    }
}

/// Handle the sim command: play `rounds` automated rounds of `game`.
///
/// The table is bought in for `stake * rounds`, so the run can never be
/// short of chips.
///
/// # Errors
///
/// - `CliError::InvalidInput` for zero rounds, poker, or a bankroll beyond
///   the table's chip range
/// - `CliError::Interrupted` when `PARLOR_SIM_BREAK_AFTER` stops the run
pub fn handle_sim_command(
    game: GameKind,
    rounds: u64,
    seed: Option<u64>,
    stake: Option<u32>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if rounds == 0 {
        ui::write_error(err, "rounds must be >= 1")?;
        return Err(CliError::InvalidInput("rounds must be >= 1".to_string()));
    }
    let mut player = Autoplayer::for_game(game)?;
    let cfg = config::load()?;

    let rules = TableRules::for_game(game);
    let stake = stake.unwrap_or(rules.min_bet);
    let bankroll = u32::try_from(u64::from(stake) * rounds)
        .map_err(|_| CliError::InvalidInput(format!("{rounds} rounds of {stake} is too large")))?
        .max(rules.min_buy_in);
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);

    let table = Table::open(rules, u64::from(bankroll), bankroll)?;
    let mut engine = Engine::new(table, Some(seed));

    let break_after = std::env::var("PARLOR_SIM_BREAK_AFTER")
        .ok()
        .and_then(|v| v.parse::<u64>().ok());

    writeln!(
        out,
        "sim: game={} rounds={} seed={} stake={}",
        game, rounds, seed, stake
    )?;

    let mut totals = SimTotals::default();
    for _ in 0..rounds {
        if let Some(limit) = break_after
            && totals.rounds >= limit
        {
            write_summary(out, &totals)?;
            writeln!(out, "Interrupted: played {}/{}", totals.rounds, rounds)?;
            return Err(CliError::Interrupted(format!(
                "played {}/{}",
                totals.rounds, rounds
            )));
        }
        let winnings = player.play_round(&mut engine, stake)?;
        totals.record(stake, winnings);
    }

    tracing::info!(
        game = %game,
        rounds = totals.rounds,
        rtp = totals.rtp(),
        "simulation finished"
    );
    write_summary(out, &totals)?;
    Ok(())
}

fn write_summary(out: &mut dyn Write, totals: &SimTotals) -> Result<(), CliError> {
    writeln!(out, "Rounds: {}", totals.rounds)?;
    writeln!(out, "Staked: {}", totals.staked)?;
    writeln!(out, "Returned: {}", totals.returned)?;
    writeln!(out, "Net: {}", totals.net())?;
    writeln!(out, "RTP: {:.2}%", totals.rtp() * 100.0)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn totals_compute_return_to_player() {
        let mut t = SimTotals::default();
        t.record(10, 0);
        t.record(10, 20);
        assert_eq!(t.rounds, 2);
        assert_eq!(t.net(), 0);
        assert!((t.rtp() - 1.0).abs() < f64::EPSILON);
        assert_eq!(SimTotals::default().rtp(), 0.0);
    }

    #[test]
    #[serial]
    fn zero_rounds_is_rejected() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = handle_sim_command(GameKind::Slots, 0, Some(1), None, &mut out, &mut err);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
        assert!(String::from_utf8(err).unwrap().contains("rounds must be >= 1"));
    }

    #[test]
    #[serial]
    fn poker_cannot_be_simulated() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = handle_sim_command(GameKind::Poker, 10, Some(1), None, &mut out, &mut err);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    #[serial]
    fn blackjack_strategy_settles_every_round() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        handle_sim_command(GameKind::Blackjack, 200, Some(5), Some(20), &mut out, &mut err).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Rounds: 200"));
        assert!(text.contains("Staked: 4000"));
    }
}
