//! Configuration command handler.
//!
//! Prints the resolved session settings with the source of each value
//! (default, file or env).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "balance": {
//!     "value": 1000,
//!     "source": "default"
//!   },
//!   "buy_in": {
//!     "value": 100,
//!     "source": "env"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

/// Handle the cfg command.
///
/// # Errors
///
/// Returns `CliError::Config` if configuration loading fails.
/// Returns `CliError::Io` if writing to output stream fails.
pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::display_warning(err, "fix the value or unset the variable, then rerun")?;
            return Err(e.into());
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "balance": {
            "value": config.balance,
            "source": sources.balance,
        },
        "buy_in": {
            "value": config.buy_in,
            "source": sources.buy_in,
        },
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "ai_delay_ms": {
            "value": config.ai_delay_ms,
            "source": sources.ai_delay_ms,
        },
        "scoring": {
            "value": config.scoring,
            "source": sources.scoring,
        },
        "opponent": {
            "value": config.opponent,
            "source": sources.opponent,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
