use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::rules::GameKind;

/// Records a single decision made during a round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Seat index (0 is the human player)
    pub seat: usize,
    /// Round phase when this action occurred
    pub phase: String,
    /// Human readable action, e.g. `hit`, `raise 50`, `bet red 10`
    pub action: String,
}

impl ActionRecord {
    pub fn new(seat: usize, phase: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            seat,
            phase: phase.into(),
            action: action.into(),
        }
    }
}

/// Complete record of a settled round or spin.
/// Serialized to JSONL format for round history storage.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Unique identifier for this round (format: YYYYMMDD-NNNNNN)
    pub round_id: String,
    pub game: GameKind,
    /// Seed of the session RNG
    pub seed: Option<u64>,
    /// Chronological list of actions
    pub actions: Vec<ActionRecord>,
    /// Cards visible at the end of the round (empty for wheel and reel games)
    #[serde(default)]
    pub cards: Vec<Card>,
    pub stake: u32,
    pub winnings: u32,
    /// Outcome summary (e.g. `dealer-bust`, `17`, `cherry cherry bell`)
    pub result: Option<String>,
    /// Timestamp when the round was settled (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
    /// Additional metadata (extensible JSON object)
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

impl RoundRecord {
    /// Record for `game` with no id, seed or timestamp yet.
    pub fn unstamped(game: GameKind, stake: u32, winnings: u32) -> Self {
        Self {
            round_id: String::new(),
            game,
            seed: None,
            actions: Vec::new(),
            cards: Vec::new(),
            stake,
            winnings,
            result: None,
            ts: None,
            meta: None,
        }
    }

    pub fn net(&self) -> i64 {
        self.winnings as i64 - self.stake as i64
    }
}

pub fn format_round_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct RoundLogger {
    writer: Option<BufWriter<std::fs::File>>,
    date: String,
    seq: u32,
}

impl RoundLogger {
    /// Opens `path` for appending, creating parent directories as needed.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// Logger that only hands out ids; nothing is written.
    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_round_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
