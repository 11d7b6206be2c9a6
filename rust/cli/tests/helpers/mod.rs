//! Shared helpers for CLI integration tests.
//!
//! `run_cli` drives `parlor_cli::run_with_input` in-process with scripted
//! stdin and captures both streams. `EnvGuard` sets `PARLOR_*` variables for
//! one test and restores the previous values on drop; tests using it must be
//! `#[serial]`.

use std::io::Cursor;

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct CliResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

pub fn run_cli(args: &[&str], stdin: &str) -> CliResult {
    let mut argv = vec!["parlor"];
    argv.extend_from_slice(args);
    let mut out = Vec::new();
    let mut err = Vec::new();
    let exit_code =
        parlor_cli::run_with_input(argv, &mut Cursor::new(stdin.to_string()), &mut out, &mut err);
    CliResult {
        exit_code,
        stdout: String::from_utf8(out).expect("stdout is utf-8"),
        stderr: String::from_utf8(err).expect("stderr is utf-8"),
    }
}

pub const PARLOR_VARS: [&str; 8] = [
    "PARLOR_CONFIG",
    "PARLOR_SEED",
    "PARLOR_BALANCE",
    "PARLOR_BUY_IN",
    "PARLOR_AI_DELAY_MS",
    "PARLOR_SCORING",
    "PARLOR_OPPONENT",
    "PARLOR_SIM_BREAK_AFTER",
];

pub struct EnvGuard {
    restores: Vec<(String, Option<String>)>,
}

#[allow(dead_code)]
impl EnvGuard {
    /// Clears every `PARLOR_*` variable, then applies `pairs`.
    pub fn apply(pairs: &[(&str, &str)]) -> Self {
        let mut restores = Vec::new();
        for key in PARLOR_VARS {
            restores.push((key.to_string(), std::env::var(key).ok()));
            unsafe { std::env::remove_var(key) };
        }
        for (key, value) in pairs {
            if !PARLOR_VARS.contains(key) {
                restores.push((key.to_string(), std::env::var(key).ok()));
            }
            unsafe { std::env::set_var(key, value) };
        }
        EnvGuard { restores }
    }

    pub fn clean() -> Self {
        Self::apply(&[])
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, previous) in self.restores.iter().rev() {
            match previous {
                Some(val) => unsafe { std::env::set_var(key, val) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}
