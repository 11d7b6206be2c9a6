use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::errors::GameError;
use crate::logger::{RoundLogger, RoundRecord};
use crate::settlement::{Recordable, Round, Settlement};
use crate::table::Table;

/// One player session at one table: the chip escrow, the RNG every shuffle
/// and spin draws from, and an optional JSONL round log.
///
/// A seeded session replays the same cards and pockets for the same inputs.
///
/// # Examples
///
/// ```
/// use parlor_engine::engine::Engine;
/// use parlor_engine::rules::{GameKind, SlotRules, TableRules};
/// use parlor_engine::slots::SlotMachine;
/// use parlor_engine::table::Table;
///
/// let table = Table::open(TableRules::for_game(GameKind::Slots), 500, 100).unwrap();
/// let mut engine = Engine::new(table, Some(7));
///
/// let machine = SlotMachine::new(SlotRules::default());
/// let (table, rng) = engine.table_and_rng();
/// let spin = machine.spin(table, 10, rng).unwrap();
/// engine.log(&spin);
///
/// assert_eq!(engine.table().rounds_settled(), 1);
/// let balance = engine.leave(|_| {});
/// assert_eq!(balance as i64, 500 + spin.settlement.delta());
/// ```
pub struct Engine {
    table: Table,
    rng: ChaCha20Rng,
    seed: Option<u64>,
    logger: Option<RoundLogger>,
}

impl Engine {
    /// Without a seed the RNG is seeded from the operating system.
    pub fn new(table: Table, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha20Rng::seed_from_u64(s),
            None => ChaCha20Rng::from_rng(&mut rand::rng()),
        };
        Self {
            table,
            rng,
            seed,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: RoundLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn table(&self) -> &Table {
        &self.table
    }
    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }
    pub fn rng_mut(&mut self) -> &mut ChaCha20Rng {
        &mut self.rng
    }
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Borrows the table and the RNG together for calls that need both.
    pub fn table_and_rng(&mut self) -> (&mut Table, &mut ChaCha20Rng) {
        (&mut self.table, &mut self.rng)
    }

    /// Settles a resolved card round and appends it to the log.
    pub fn settle<R>(&mut self, round: &mut R) -> Result<Settlement, GameError>
    where
        R: Round + Recordable,
    {
        let settlement = self.table.settle(round)?;
        self.log(round);
        Ok(settlement)
    }

    /// Stamps and writes the record of a settled round. Returns the round id,
    /// empty when no log is attached. Write failures are reported through
    /// tracing and never interrupt play.
    pub fn log<T: Recordable + ?Sized>(&mut self, round: &T) -> String {
        let mut rec: RoundRecord = round.to_record();
        rec.seed = self.seed;
        let Some(logger) = self.logger.as_mut() else {
            return rec.round_id;
        };
        rec.round_id = logger.next_id();
        if let Err(e) = logger.write(&rec) {
            tracing::warn!(error = %e, round_id = %rec.round_id, "failed to write round record");
        }
        rec.round_id
    }

    /// Ends the session, handing the new external balance to `on_balance`.
    pub fn leave<F: FnOnce(u64)>(self, on_balance: F) -> u64 {
        self.table.leave(on_balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blackjack::BlackjackRound;
    use crate::rules::{BlackjackRules, GameKind, TableRules};

    fn table() -> Table {
        Table::open(TableRules::for_game(GameKind::Blackjack), 1_000, 200).unwrap()
    }

    #[test]
    fn same_seed_deals_same_cards() {
        let mut a = Engine::new(table(), Some(99));
        let mut b = Engine::new(table(), Some(99));
        let mut ra = BlackjackRound::new(BlackjackRules::default());
        let mut rb = BlackjackRound::new(BlackjackRules::default());
        let (t, rng) = a.table_and_rng();
        ra.deal(t, 20, rng).unwrap();
        let (t, rng) = b.table_and_rng();
        rb.deal(t, 20, rng).unwrap();
        assert_eq!(ra.player_hand(), rb.player_hand());
        assert_eq!(ra.dealer_upcard(), rb.dealer_upcard());
    }

    #[test]
    fn settle_twice_through_engine_fails() {
        let mut engine = Engine::new(table(), Some(3));
        let mut round = BlackjackRound::new(BlackjackRules::default());
        let (t, rng) = engine.table_and_rng();
        round.deal(t, 20, rng).unwrap();
        if round.outcome().is_none() {
            round.stand().unwrap();
        }
        engine.settle(&mut round).unwrap();
        let chips = engine.table().chips();
        assert_eq!(engine.settle(&mut round), Err(GameError::AlreadySettled));
        assert_eq!(engine.table().chips(), chips);
    }

    #[test]
    fn ids_come_from_the_logger() {
        let mut engine = Engine::new(table(), None)
            .with_logger(RoundLogger::with_seq_for_test("20260101"));
        let mut round = BlackjackRound::new(BlackjackRules::default());
        let (t, rng) = engine.table_and_rng();
        round.deal(t, 20, rng).unwrap();
        if round.outcome().is_none() {
            round.stand().unwrap();
        }
        assert_eq!(engine.log(&round), "20260101-000001");
        assert_eq!(engine.log(&round), "20260101-000002");
    }
}
