//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use parlor_engine::rules::GameKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "parlor",
    version,
    about = "Parlor points tables: blackjack, poker, roulette and slots"
)]
pub struct ParlorCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sit down at a table and play interactively on stdin
    Play {
        /// blackjack, poker, roulette or slots
        game: GameKind,
        #[arg(long)]
        seed: Option<u64>,
        /// Chips bought in from the points balance
        #[arg(long)]
        buy_in: Option<u32>,
        /// External points balance to draw the buy-in from
        #[arg(long)]
        balance: Option<u64>,
        /// Append settled rounds to this JSONL file
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Play automated rounds and report the return to player
    Sim {
        /// roulette, slots or blackjack
        game: GameKind,
        #[arg(long)]
        rounds: u64,
        #[arg(long)]
        seed: Option<u64>,
        /// Stake per round (defaults to the table minimum)
        #[arg(long)]
        stake: Option<u32>,
    },
    /// Print the resolved configuration with value sources
    Cfg,
}
