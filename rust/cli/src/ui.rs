//! Consistent error and warning lines for every subcommand.

use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Prompt without a trailing newline, flushed so it shows before input.
pub fn prompt(out: &mut dyn Write, text: &str) -> std::io::Result<()> {
    write!(out, "{}", text)?;
    out.flush()
}
