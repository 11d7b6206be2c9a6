use std::fs;
use std::path::PathBuf;

use parlor_engine::engine::Engine;
use parlor_engine::logger::{format_round_id, RoundLogger, RoundRecord};
use parlor_engine::roulette::{BetSpot, RouletteTable};
use parlor_engine::rules::{GameKind, TableRules};
use parlor_engine::table::Table;

fn tmp_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("target");
    p.push(format!("{}_{}.jsonl", name, std::process::id()));
    p
}

#[test]
fn writes_jsonl_with_lf_only() {
    let path = tmp_path("roundlog");
    let mut logger = RoundLogger::create(&path).expect("create logger");
    let mut rec = RoundRecord::unstamped(GameKind::Slots, 5, 10);
    rec.round_id = "20250102-000001".to_string();
    logger.write(&rec).expect("write");
    let bytes = fs::read(&path).expect("read file");
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
    let _ = fs::remove_file(&path);
}

#[test]
fn ts_is_generated_when_missing_and_preserved_when_present() {
    let path = tmp_path("roundlog_ts");
    let mut logger = RoundLogger::create(&path).expect("create logger");
    let generated = RoundRecord::unstamped(GameKind::Blackjack, 20, 0);
    let mut fixed = RoundRecord::unstamped(GameKind::Blackjack, 20, 40);
    fixed.ts = Some("2025-01-02T03:04:05Z".to_string());
    logger.write(&generated).unwrap();
    logger.write(&fixed).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<RoundRecord> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ts.is_some());
    assert_eq!(lines[1].ts.as_deref(), Some("2025-01-02T03:04:05Z"));
    let _ = fs::remove_file(&path);
}

#[test]
fn round_ids_are_zero_padded() {
    assert_eq!(format_round_id("20251231", 42), "20251231-000042");
    let mut logger = RoundLogger::with_seq_for_test("20251231");
    assert_eq!(logger.next_id(), "20251231-000001");
    assert_eq!(logger.next_id(), "20251231-000002");
}

#[test]
fn engine_logs_each_spin_with_seed() {
    let path = tmp_path("roundlog_engine");
    let table = Table::open(TableRules::for_game(GameKind::Roulette), 1_000, 100).unwrap();
    let mut engine =
        Engine::new(table, Some(4242)).with_logger(RoundLogger::create(&path).unwrap());
    let mut layout = RouletteTable::new();
    for _ in 0..3 {
        let (table, rng) = engine.table_and_rng();
        layout.place_bet(table, BetSpot::Red, 10).unwrap();
        let result = layout.spin(table, rng).unwrap();
        engine.log(&result);
    }

    let content = fs::read_to_string(&path).unwrap();
    let records: Vec<RoundRecord> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), 3);
    for rec in &records {
        assert_eq!(rec.game, GameKind::Roulette);
        assert_eq!(rec.seed, Some(4242));
        assert_eq!(rec.stake, 10);
        assert!(rec.winnings == 0 || rec.winnings == 20);
        assert_eq!(rec.actions[0].action, "bet red 10");
    }
    assert!(records[2].round_id.ends_with("-000003"));
    let _ = fs::remove_file(&path);
}
