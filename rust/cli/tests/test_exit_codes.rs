//! Exit codes: 0 on success (help included), 2 on usage, configuration or
//! engine errors, 130 on interruption. Errors go to stderr only.

mod helpers;

use helpers::{EnvGuard, run_cli};
use parlor_cli::exit_code;
use serial_test::serial;

#[test]
fn help_returns_zero_on_stdout() {
    let res = run_cli(&["--help"], "");
    assert_eq!(res.exit_code, exit_code::SUCCESS);
    assert!(res.stdout.contains("Usage"));
    assert!(res.stderr.is_empty());
}

#[test]
fn missing_subcommand_prints_the_command_list() {
    let res = run_cli(&[], "");
    assert_eq!(res.exit_code, exit_code::ERROR);
    assert!(res.stderr.contains("Commands:"));
    assert!(res.stderr.contains("  play"));
    assert!(res.stderr.contains("  sim"));
    assert!(res.stderr.contains("  cfg"));
    assert!(res.stdout.is_empty());
}

#[test]
fn unknown_game_is_a_usage_error() {
    let res = run_cli(&["play", "baccarat"], "");
    assert_eq!(res.exit_code, exit_code::ERROR);
    assert!(res.stderr.contains("unknown game: baccarat"));
}

#[test]
#[serial]
fn end_of_input_is_a_clean_exit() {
    let _env = EnvGuard::clean();
    let res = run_cli(&["play", "roulette", "--seed", "4"], "");
    assert_eq!(res.exit_code, exit_code::SUCCESS);
    assert!(res.stdout.contains("Balance: 1000"));
}

#[test]
#[serial]
fn unwritable_log_path_is_an_error() {
    let _env = EnvGuard::clean();
    let dir = tempfile::tempdir().unwrap();
    // a directory cannot be opened as the log file
    let res = run_cli(
        &["play", "slots", "--log", dir.path().to_str().unwrap()],
        "q\n",
    );
    assert_eq!(res.exit_code, exit_code::ERROR);
    assert!(res.stderr.contains("I/O error"));
}
