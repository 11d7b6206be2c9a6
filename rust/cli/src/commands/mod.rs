//! Command handler modules for the parlor CLI.
//!
//! Each subcommand lives in its own module with one public handler,
//! `handle_COMMAND_command(...) -> Result<(), CliError>`. Output streams and
//! table input are passed in as `&mut dyn Write` / `&mut dyn BufRead`.

pub mod cfg;
pub mod play;
pub mod sim;

pub use cfg::handle_cfg_command;
pub use play::handle_play_command;
pub use sim::handle_sim_command;
