//! # Play Command
//!
//! Interactive play at one table. The session buys chips in from the points
//! balance, reads commands from stdin until `q`, `quit` or end of input, then
//! leaves the table and prints the new balance.
//!
//! Leaving in the middle of a round never strands committed chips: an open
//! blackjack hand stands, an open poker hand folds, and open roulette bets are
//! refunded.

use crate::config::{self, Config};
use crate::error::CliError;
use crate::formatters::{format_action, format_cards, format_delta, format_reels, format_score};
use crate::io_utils::read_stdin_line;
use crate::ui;
use crate::validation::{
    BlackjackInput, ParseResult, PokerInput, RouletteInput, SlotsInput, parse_blackjack_input,
    parse_poker_input, parse_roulette_input, parse_slots_input,
};
use parlor_ai::{ScriptedOpponent, create_opponent, step_opponent};
use parlor_engine::blackjack::{BlackjackPhase, BlackjackRound};
use parlor_engine::engine::Engine;
use parlor_engine::logger::RoundLogger;
use parlor_engine::player::PlayerAction;
use parlor_engine::poker::{HUMAN_SEAT, PokerEnding, PokerPhase, PokerRound};
use parlor_engine::roulette::RouletteTable;
use parlor_engine::rules::{BlackjackRules, GameKind, PokerRules, SlotRules, TableRules};
use parlor_engine::settlement::Settlement;
use parlor_engine::slots::{LineWin, SlotMachine};
use parlor_engine::table::Table;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

/// Handle the play command: one interactive session at a `game` table.
///
/// Command-line values override the resolved configuration. Without a seed
/// one is drawn at random and printed so the session can be replayed.
///
/// # Errors
///
/// Returns `CliError::Config` for an invalid configuration,
/// `CliError::Engine` when the table cannot be opened, and `CliError::Io`
/// when the round log cannot be created or output cannot be written.
#[allow(clippy::too_many_arguments)]
pub fn handle_play_command(
    game: GameKind,
    seed: Option<u64>,
    buy_in: Option<u32>,
    balance: Option<u64>,
    log: Option<PathBuf>,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let mut cfg = config::load()?;
    if let Some(b) = balance {
        cfg.balance = b;
    }
    if let Some(b) = buy_in {
        cfg.buy_in = b;
    }
    if seed.is_some() {
        cfg.seed = seed;
    }
    config::validate(&cfg)?;

    let seed = cfg.seed.unwrap_or_else(rand::random);
    let table = Table::open(TableRules::for_game(game), cfg.balance, cfg.buy_in)?;
    let mut engine = Engine::new(table, Some(seed));
    if let Some(path) = log {
        engine = engine.with_logger(RoundLogger::create(&path)?);
    }
    tracing::info!(game = %game, seed, buy_in = cfg.buy_in, "session started");

    writeln!(
        out,
        "play: game={} seed={} buy_in={} balance={}",
        game, seed, cfg.buy_in, cfg.balance
    )?;

    match game {
        GameKind::Blackjack => play_blackjack(&mut engine, stdin, out, err)?,
        GameKind::Poker => play_poker(&mut engine, &cfg, stdin, out, err)?,
        GameKind::Roulette => play_roulette(&mut engine, stdin, out, err)?,
        GameKind::Slots => play_slots(&mut engine, stdin, out, err)?,
    }

    let rounds = engine.table().rounds_settled();
    let chips = engine.table().chips();
    let net = engine.table().net();
    let new_balance = engine.leave(|b| tracing::info!(balance = b, "session closed"));
    writeln!(
        out,
        "Left the table after {} rounds with {} chips ({})",
        rounds,
        chips,
        format_delta(net)
    )?;
    writeln!(out, "Balance: {}", new_balance)?;
    Ok(())
}

fn report_result(out: &mut dyn Write, settlement: &Settlement) -> Result<(), CliError> {
    writeln!(
        out,
        "Returned {} ({}). Chips: {}",
        settlement.payout.winnings,
        format_delta(settlement.delta()),
        settlement.chips_after
    )?;
    Ok(())
}

fn reject(err: &mut dyn Write, game: GameKind, e: &dyn std::fmt::Display) -> Result<(), CliError> {
    tracing::warn!(game = %game, error = %e, "action rejected");
    ui::write_error(err, &e.to_string())?;
    Ok(())
}

fn out_of_chips(out: &mut dyn Write, engine: &Engine) -> Result<bool, CliError> {
    if engine.table().can_continue() {
        return Ok(false);
    }
    writeln!(
        out,
        "Out of chips: {} left, table minimum is {}.",
        engine.table().chips(),
        engine.table().rules().min_bet
    )?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Blackjack
// ---------------------------------------------------------------------------

fn play_blackjack(
    engine: &mut Engine,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let rules = BlackjackRules::default();
    loop {
        if out_of_chips(out, engine)? {
            return Ok(());
        }
        ui::prompt(
            out,
            &format!(
                "Chips: {}. Bet (min {}) or q: ",
                engine.table().chips(),
                rules.min_bet
            ),
        )?;
        let Some(line) = read_stdin_line(stdin) else {
            return Ok(());
        };
        let stake = match parse_blackjack_input(&line) {
            ParseResult::Quit => return Ok(()),
            ParseResult::Invalid(msg) => {
                ui::write_error(err, &msg)?;
                continue;
            }
            ParseResult::Action(BlackjackInput::Bet(n)) => n,
            ParseResult::Action(_) => {
                ui::write_error(err, "No hand in progress; place a bet first")?;
                continue;
            }
        };

        let mut round = BlackjackRound::new(rules);
        let (table, rng) = engine.table_and_rng();
        if let Err(e) = round.deal(table, stake, rng) {
            reject(err, GameKind::Blackjack, &e)?;
            continue;
        }
        let leaving = play_blackjack_hand(&mut round, stdin, out, err)?;

        writeln!(
            out,
            "Dealer: {} = {}",
            format_cards(round.dealer_visible()),
            round.dealer_value()
        )?;
        if let Some(outcome) = round.outcome() {
            writeln!(out, "Outcome: {}", outcome.as_str())?;
        }
        let settlement = engine.settle(&mut round)?;
        report_result(out, &settlement)?;
        if leaving {
            return Ok(());
        }
    }
}

/// Plays hit/stand decisions until the hand resolves. Returns true when the
/// player asked to leave, in which case the hand stands.
fn play_blackjack_hand(
    round: &mut BlackjackRound,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<bool, CliError> {
    let mut leaving = false;
    while round.phase() == BlackjackPhase::Playing {
        writeln!(
            out,
            "You: {} = {}   Dealer shows: {}",
            format_cards(round.player_hand()),
            round.player_value(),
            format_cards(round.dealer_visible())
        )?;
        ui::prompt(out, "Hit or stand (h/s): ")?;
        let input = match read_stdin_line(stdin) {
            Some(line) => parse_blackjack_input(&line),
            None => ParseResult::Quit,
        };
        let result = match input {
            ParseResult::Action(BlackjackInput::Hit) => round.hit(),
            ParseResult::Action(BlackjackInput::Stand) => round.stand(),
            ParseResult::Quit => {
                leaving = true;
                round.stand()
            }
            ParseResult::Action(BlackjackInput::Bet(_)) => {
                ui::write_error(err, "Hand in progress; hit or stand")?;
                continue;
            }
            ParseResult::Invalid(msg) => {
                ui::write_error(err, &msg)?;
                continue;
            }
        };
        if let Err(e) = result {
            reject(err, GameKind::Blackjack, &e)?;
        }
    }
    writeln!(
        out,
        "You: {} = {}",
        format_cards(round.player_hand()),
        round.player_value()
    )?;
    Ok(leaving)
}

// ---------------------------------------------------------------------------
// Poker
// ---------------------------------------------------------------------------

fn play_poker(
    engine: &mut Engine,
    cfg: &Config,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let policy = create_opponent(&cfg.opponent).map_err(CliError::Config)?;
    let rules = PokerRules {
        scoring: cfg.scoring,
        ..PokerRules::default()
    };
    let delay = Duration::from_millis(cfg.ai_delay_ms);
    let mut round = PokerRound::new(rules)?;
    writeln!(
        out,
        "Opponents: {} ({} policy, {} scoring)",
        round.players()[1..]
            .iter()
            .map(|p| format!("{} [{}]", p.name(), p.chips()))
            .collect::<Vec<_>>()
            .join(", "),
        policy.name(),
        cfg.scoring.as_str()
    )?;

    loop {
        if round.phase() == PokerPhase::Ended {
            round = round.rematch()?;
        }
        if out_of_chips(out, engine)? {
            return Ok(());
        }
        ui::prompt(
            out,
            &format!(
                "Chips: {}. Stake (min {}) or q: ",
                engine.table().chips(),
                round.rules().min_stake
            ),
        )?;
        let Some(line) = read_stdin_line(stdin) else {
            return Ok(());
        };
        let stake = match parse_poker_input(&line) {
            ParseResult::Quit => return Ok(()),
            ParseResult::Invalid(msg) => {
                ui::write_error(err, &msg)?;
                continue;
            }
            ParseResult::Action(PokerInput::Stake(n)) => n,
            ParseResult::Action(_) => {
                ui::write_error(err, "No hand in progress; place a stake first")?;
                continue;
            }
        };

        let (table, rng) = engine.table_and_rng();
        if let Err(e) = round.place_stake(table, stake, rng) {
            reject(err, GameKind::Poker, &e)?;
            continue;
        }
        for p in round.players()[1..].iter().filter(|p| p.folded()) {
            writeln!(out, "{} sits out", p.name())?;
        }
        writeln!(out, "Your cards: {}", format_cards(round.human().hand()))?;

        let leaving = play_poker_hand(engine, &mut round, policy.as_ref(), delay, stdin, out, err)?;
        report_poker_outcome(&round, out)?;
        let settlement = engine.settle(&mut round)?;
        report_result(out, &settlement)?;
        if leaving {
            return Ok(());
        }
    }
}

/// Runs betting streets until the round ends. Returns true when the player
/// asked to leave, in which case the hand is folded.
fn play_poker_hand(
    engine: &mut Engine,
    round: &mut PokerRound,
    policy: &dyn ScriptedOpponent,
    delay: Duration,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<bool, CliError> {
    let mut leaving = false;
    let mut shown_phase = PokerPhase::Betting;
    while round.phase() != PokerPhase::Ended {
        if round.phase() != shown_phase {
            shown_phase = round.phase();
            writeln!(
                out,
                "-- {} -- Board: {} Pot: {}",
                shown_phase.as_str(),
                format_cards(round.community()),
                round.pot()
            )?;
        }

        let to_call = round.to_call(HUMAN_SEAT);
        let options = if round.can_check() {
            "check/raise/fold"
        } else {
            "call/raise/fold"
        };
        ui::prompt(out, &format!("To call: {to_call}. Action ({options}/q): "))?;
        let input = match read_stdin_line(stdin) {
            Some(line) => parse_poker_input(&line),
            None => ParseResult::Quit,
        };
        let action = match input {
            ParseResult::Action(PokerInput::Act(a)) => a,
            ParseResult::Action(PokerInput::Raise) => {
                PlayerAction::Raise(round.rules().raise_increment)
            }
            ParseResult::Quit => {
                leaving = true;
                PlayerAction::Fold
            }
            ParseResult::Action(PokerInput::Stake(_)) => {
                ui::write_error(err, "Stake already placed for this hand")?;
                continue;
            }
            ParseResult::Invalid(msg) => {
                ui::write_error(err, &msg)?;
                continue;
            }
        };

        if let Err(e) = round.act(engine.table_mut(), action) {
            reject(err, GameKind::Poker, &e)?;
            continue;
        }
        writeln!(out, "You: {}", action.label())?;

        while round.next_to_act().is_some() {
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
            let Some((seat, taken)) = step_opponent(round, policy, engine.rng_mut())? else {
                break;
            };
            writeln!(
                out,
                "{} {}",
                round.players()[seat].name(),
                format_action(&taken)
            )?;
        }
    }
    Ok(leaving)
}

fn report_poker_outcome(round: &PokerRound, out: &mut dyn Write) -> Result<(), CliError> {
    let Some(outcome) = round.outcome() else {
        return Ok(());
    };
    if outcome.ending == PokerEnding::Showdown {
        writeln!(out, "Board: {}", format_cards(round.community()))?;
        for (seat, score) in &outcome.scores {
            let p = &round.players()[*seat];
            writeln!(
                out,
                "  {}: {} {}",
                p.name(),
                format_cards(p.hand()),
                format_score(score)
            )?;
        }
    }
    let names: Vec<String> = outcome
        .shares
        .iter()
        .map(|(seat, amount)| format!("{} ({})", round.players()[*seat].name(), amount))
        .collect();
    let how = match outcome.ending {
        PokerEnding::Showdown => "at showdown",
        PokerEnding::HumanFolded => "after you folded",
        PokerEnding::OpponentsFolded => "uncontested",
    };
    writeln!(out, "Pot {} won {} by {}", outcome.pot, how, names.join(", "))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Roulette
// ---------------------------------------------------------------------------

fn play_roulette(
    engine: &mut Engine,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let mut wheel = RouletteTable::new();
    loop {
        if wheel.bets().is_empty() && out_of_chips(out, engine)? {
            return Ok(());
        }
        ui::prompt(
            out,
            &format!(
                "Chips: {} (on the layout: {}). bet <spot> <amount>, spin, clear, bets or q: ",
                engine.table().chips(),
                wheel.total_staked()
            ),
        )?;
        let input = match read_stdin_line(stdin) {
            Some(line) => parse_roulette_input(&line),
            None => ParseResult::Quit,
        };
        match input {
            ParseResult::Quit => break,
            ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
            ParseResult::Action(RouletteInput::Bet(spot, stake)) => {
                match wheel.place_bet(engine.table_mut(), spot, stake) {
                    Ok(total) => writeln!(out, "Bet {}: {}", spot, total)?,
                    Err(e) => reject(err, GameKind::Roulette, &e)?,
                }
            }
            ParseResult::Action(RouletteInput::Clear) => {
                let refund = wheel.clear_bets(engine.table_mut());
                writeln!(out, "Bets cleared, {} refunded", refund)?;
            }
            ParseResult::Action(RouletteInput::ShowBets) => {
                if wheel.bets().is_empty() {
                    writeln!(out, "No bets")?;
                }
                for bet in wheel.bets() {
                    writeln!(out, "  {} {}", bet.spot, bet.stake)?;
                }
            }
            ParseResult::Action(RouletteInput::Spin) => {
                let (table, rng) = engine.table_and_rng();
                let result = match wheel.spin(table, rng) {
                    Ok(r) => r,
                    Err(e) => {
                        reject(err, GameKind::Roulette, &e)?;
                        continue;
                    }
                };
                engine.log(&result);
                writeln!(
                    out,
                    "Ball lands on {} {}",
                    result.outcome,
                    result.color.as_str()
                )?;
                for bet in &result.winning {
                    let returned = bet.returns(result.outcome)?;
                    writeln!(out, "  {} {} wins {}", bet.spot, bet.stake, returned)?;
                }
                report_result(out, &result.settlement)?;
                let recent: Vec<String> = wheel.history().iter().map(|n| n.to_string()).collect();
                writeln!(out, "Recent: {}", recent.join(" "))?;
            }
        }
    }

    let refund = wheel.clear_bets(engine.table_mut());
    if refund > 0 {
        writeln!(out, "Open bets refunded: {}", refund)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

fn play_slots(
    engine: &mut Engine,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let machine = SlotMachine::new(SlotRules::default());
    let mut last_stake = machine.rules().min_bet;
    loop {
        if out_of_chips(out, engine)? {
            return Ok(());
        }
        ui::prompt(
            out,
            &format!(
                "Chips: {}. spin [amount] (enter repeats {}) or q: ",
                engine.table().chips(),
                last_stake
            ),
        )?;
        let Some(line) = read_stdin_line(stdin) else {
            return Ok(());
        };
        let stake = match parse_slots_input(&line) {
            ParseResult::Quit => return Ok(()),
            ParseResult::Invalid(msg) => {
                ui::write_error(err, &msg)?;
                continue;
            }
            ParseResult::Action(SlotsInput::Spin(stake)) => stake.unwrap_or(last_stake),
        };

        let (table, rng) = engine.table_and_rng();
        let spin = match machine.spin(table, stake, rng) {
            Ok(s) => s,
            Err(e) => {
                reject(err, GameKind::Slots, &e)?;
                continue;
            }
        };
        last_stake = stake;
        engine.log(&spin);
        let line = match spin.line {
            LineWin::Triple(s) => format!("three {}s", s.name()),
            LineWin::Pair(s) => format!("pair of {}s", s.name()),
            LineWin::Nothing => "no line".to_string(),
        };
        writeln!(out, "{} {}", format_reels(&spin.reels), line)?;
        report_result(out, &spin.settlement)?;
    }
}
