//! # Parlor CLI Library
//!
//! Command-line front end for the parlor round engine. A session buys chips
//! into one table from a points balance, plays rounds, and prints the balance
//! it leaves with.
//!
//! ## Main Entry Point
//!
//! [`run`] parses arguments and executes a subcommand, reading table input
//! from stdin. [`run_with_input`] takes the input stream explicitly.
//!
//! ## Example Usage
//!
//! ```
//! use std::io::Cursor;
//!
//! let mut out = Vec::new();
//! let mut err = Vec::new();
//! let args = ["parlor", "play", "slots", "--seed", "1", "--balance", "100", "--buy-in", "50"];
//! let code = parlor_cli::run_with_input(args, &mut Cursor::new("spin 5\nq\n"), &mut out, &mut err);
//! assert_eq!(code, 0);
//! assert!(String::from_utf8(out).unwrap().contains("Balance:"));
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Interactive blackjack, poker, roulette or slots
//! - `sim`: Automated rounds with a return-to-player report
//! - `cfg`: Display current configuration settings

use clap::Parser;
use std::io::{BufRead, Write};
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod logging;
pub mod ui;
pub mod validation;

use cli::{Commands, ParlorCli};
use commands::{handle_cfg_command, handle_play_command, handle_sim_command};

pub use error::CliError;

const COMMANDS: &[&str] = &["play", "sim", "cfg"];

/// Main entry point for the CLI application.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors, `130` for interruptions
///
/// ```no_run
/// use std::io;
/// let code = parlor_cli::run(["parlor", "play", "blackjack"], &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stdin = std::io::stdin();
    let mut stdin_lock = stdin.lock();
    run_with_input(args, &mut stdin_lock, out, err)
}

/// As [`run`], with table input read from `input`.
pub fn run_with_input<I, S>(
    args: I,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match ParlorCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_usage_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Play {
            game,
            seed,
            buy_in,
            balance,
            log,
        } => handle_play_command(game, seed, buy_in, balance, log, input, out, err),
        Commands::Sim {
            game,
            rounds,
            seed,
            stake,
        } => handle_sim_command(game, rounds, seed, stake, out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(CliError::Interrupted(msg)) => {
            tracing::info!(reason = %msg, "command interrupted");
            exit_code::INTERRUPTED
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            if writeln!(err, "Error: {}", e).is_err() {
                return exit_code::ERROR;
            }
            exit_code::ERROR
        }
    }
}

fn report_usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        if write!(out, "{}", e).is_err() {
            return exit_code::ERROR;
        }
        return exit_code::SUCCESS;
    }

    let mut usage = || -> std::io::Result<()> {
        writeln!(err, "{}", e)?;
        writeln!(err)?;
        writeln!(err, "Parlor Points Tables")?;
        writeln!(err, "Usage: parlor <command> [options]\n")?;
        writeln!(err, "Commands:")?;
        for c in COMMANDS {
            writeln!(err, "  {}", c)?;
        }
        writeln!(err, "\nFor full help, run: parlor --help")
    };
    let _ = usage();
    exit_code::ERROR
}
