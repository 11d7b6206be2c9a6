//! Error types for the CLI application.

use std::fmt;

use parlor_engine::errors::GameError;

use crate::config::ConfigError;

/// Every failure a subcommand can report. Each maps to one exit code in
/// [`crate::run`].
#[derive(Debug)]
pub enum CliError {
    /// I/O error (stdin, stdout/stderr writes, round log)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Rejected by the game engine
    Engine(GameError),

    /// Operation stopped before completing
    Interrupted(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(e) => write!(f, "Engine error: {}", e),
            CliError::Interrupted(msg) => write!(f, "Interrupted: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            CliError::Engine(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<GameError> for CliError {
    fn from(error: GameError) -> Self {
        CliError::Engine(error)
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_keep_their_message() {
        let e: CliError = GameError::BelowMinimum {
            amount: 5,
            minimum: 20,
        }
        .into();
        assert_eq!(
            e.to_string(),
            "Engine error: Amount 5 is below the table minimum of 20"
        );
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn config_errors_convert() {
        let e: CliError = ConfigError::Invalid("buy_in must be >0".into()).into();
        assert!(matches!(e, CliError::Config(ref m) if m.contains("buy_in")));
    }
}
