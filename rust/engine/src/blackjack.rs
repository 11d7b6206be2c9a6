//! Single-hand blackjack against a dealer who draws to 17.
//!
//! Phases run `Betting -> Playing -> Ended`. The round commits its stake on
//! [`BlackjackRound::deal`] and resolves on a bust, a stand, an automatic stand
//! at 21 or a natural. Settlement is applied by [`crate::table::Table::settle`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::hand::{blackjack_value, is_bust, is_natural};
use crate::logger::{ActionRecord, RoundRecord};
use crate::rules::{BlackjackRules, GameKind};
use crate::settlement::{Ledger, Recordable, Round};
use crate::table::Table;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum BlackjackPhase {
    Betting,
    Playing,
    Ended,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlackjackOutcome {
    Win,
    DealerBust,
    Push,
    Lose,
    Bust,
}

impl BlackjackOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            BlackjackOutcome::Win => "win",
            BlackjackOutcome::DealerBust => "dealer-bust",
            BlackjackOutcome::Push => "push",
            BlackjackOutcome::Lose => "lose",
            BlackjackOutcome::Bust => "bust",
        }
    }

    /// Chips returned for `stake`, stake included.
    pub fn winnings(self, stake: u32, rules: &BlackjackRules) -> Result<u32, GameError> {
        match self {
            BlackjackOutcome::Win | BlackjackOutcome::DealerBust => stake
                .checked_mul(rules.win_multiplier)
                .ok_or(GameError::PayoutOverflow { stake }),
            BlackjackOutcome::Push => Ok(stake),
            BlackjackOutcome::Lose | BlackjackOutcome::Bust => Ok(0),
        }
    }
}

/// Compares two finished hands. Player bust loses before the dealer's hand is
/// looked at.
pub fn compare(player: &[Card], dealer: &[Card]) -> BlackjackOutcome {
    let p = blackjack_value(player);
    let d = blackjack_value(dealer);
    if is_bust(player) {
        BlackjackOutcome::Bust
    } else if is_bust(dealer) {
        BlackjackOutcome::DealerBust
    } else if p > d {
        BlackjackOutcome::Win
    } else if p < d {
        BlackjackOutcome::Lose
    } else {
        BlackjackOutcome::Push
    }
}

#[derive(Debug, Clone)]
pub struct BlackjackRound {
    rules: BlackjackRules,
    phase: BlackjackPhase,
    player: Vec<Card>,
    dealer: Vec<Card>,
    deck: Deck,
    outcome: Option<BlackjackOutcome>,
    winnings: Option<u32>,
    ledger: Ledger,
    actions: Vec<ActionRecord>,
}

impl BlackjackRound {
    pub fn new(rules: BlackjackRules) -> Self {
        Self {
            rules,
            phase: BlackjackPhase::Betting,
            player: Vec::with_capacity(5),
            dealer: Vec::with_capacity(5),
            deck: Deck::stacked(Vec::new()),
            outcome: None,
            winnings: None,
            ledger: Ledger::default(),
            actions: Vec::new(),
        }
    }

    /// Commits `stake` and deals from a freshly shuffled deck.
    pub fn deal<R: Rng + ?Sized>(
        &mut self,
        table: &mut Table,
        stake: u32,
        rng: &mut R,
    ) -> Result<BlackjackPhase, GameError> {
        self.deal_from(table, stake, Deck::shuffled(rng))
    }

    /// Commits `stake` and deals two cards to the player, then two to the
    /// dealer. A player natural resolves at once against the dealer's two
    /// cards.
    pub fn deal_from(
        &mut self,
        table: &mut Table,
        stake: u32,
        deck: Deck,
    ) -> Result<BlackjackPhase, GameError> {
        if self.phase != BlackjackPhase::Betting {
            return Err(GameError::illegal("cards are already dealt"));
        }
        if stake < self.rules.min_bet {
            return Err(GameError::BelowMinimum {
                amount: stake,
                minimum: self.rules.min_bet,
            });
        }
        if deck.remaining() < 4 {
            return Err(GameError::EmptyDeck);
        }
        let max_return = u64::from(stake) * u64::from(self.rules.win_multiplier.max(1));
        table.ensure_payout_fits(stake, max_return)?;
        table.commit(stake)?;
        self.ledger.add_stake(stake);
        self.deck = deck;
        self.actions
            .push(ActionRecord::new(0, "betting", format!("bet {stake}")));

        for _ in 0..2 {
            let c = self.deck.draw()?;
            self.player.push(c);
        }
        for _ in 0..2 {
            let c = self.deck.draw()?;
            self.dealer.push(c);
        }
        self.phase = BlackjackPhase::Playing;
        tracing::debug!(player = blackjack_value(&self.player), "blackjack dealt");

        if is_natural(&self.player) {
            self.resolve()?;
        }
        Ok(self.phase)
    }

    /// Draws one card. A bust ends the round; reaching 21 stands.
    pub fn hit(&mut self) -> Result<BlackjackPhase, GameError> {
        self.require_playing()?;
        let c = self.deck.draw()?;
        self.player.push(c);
        self.actions.push(ActionRecord::new(0, "playing", "hit"));

        if is_bust(&self.player) {
            self.finish(BlackjackOutcome::Bust)?;
        } else if blackjack_value(&self.player) == 21 {
            self.play_dealer()?;
        }
        Ok(self.phase)
    }

    /// Ends the player's turn; the dealer draws and the hands are compared.
    pub fn stand(&mut self) -> Result<BlackjackPhase, GameError> {
        self.require_playing()?;
        self.actions.push(ActionRecord::new(0, "playing", "stand"));
        self.play_dealer()?;
        Ok(self.phase)
    }

    fn play_dealer(&mut self) -> Result<(), GameError> {
        while blackjack_value(&self.dealer) < self.rules.dealer_stands_on {
            let c = self.deck.draw()?;
            self.dealer.push(c);
        }
        self.resolve()
    }

    fn resolve(&mut self) -> Result<(), GameError> {
        let outcome = compare(&self.player, &self.dealer);
        self.finish(outcome)
    }

    fn finish(&mut self, outcome: BlackjackOutcome) -> Result<(), GameError> {
        self.winnings = Some(outcome.winnings(self.ledger.stake(), &self.rules)?);
        self.outcome = Some(outcome);
        self.phase = BlackjackPhase::Ended;
        tracing::debug!(
            outcome = outcome.as_str(),
            player = blackjack_value(&self.player),
            dealer = blackjack_value(&self.dealer),
            "blackjack resolved"
        );
        Ok(())
    }

    fn require_playing(&self) -> Result<(), GameError> {
        match self.phase {
            BlackjackPhase::Playing => Ok(()),
            BlackjackPhase::Betting => Err(GameError::illegal("no cards dealt yet")),
            BlackjackPhase::Ended => Err(GameError::illegal("round is over")),
        }
    }

    pub fn phase(&self) -> BlackjackPhase {
        self.phase
    }
    pub fn rules(&self) -> &BlackjackRules {
        &self.rules
    }
    pub fn player_hand(&self) -> &[Card] {
        &self.player
    }
    pub fn player_value(&self) -> u32 {
        blackjack_value(&self.player)
    }
    pub fn outcome(&self) -> Option<BlackjackOutcome> {
        self.outcome
    }
    pub fn stake(&self) -> u32 {
        self.ledger.stake()
    }

    /// Dealer's face-up card.
    pub fn dealer_upcard(&self) -> Option<Card> {
        self.dealer.first().copied()
    }

    /// Dealer cards the player may see: only the upcard while playing.
    pub fn dealer_visible(&self) -> &[Card] {
        match self.phase {
            BlackjackPhase::Playing => &self.dealer[..1],
            _ => &self.dealer,
        }
    }

    pub fn dealer_value(&self) -> u32 {
        blackjack_value(self.dealer_visible())
    }
}

impl Round for BlackjackRound {
    fn game(&self) -> GameKind {
        GameKind::Blackjack
    }
    fn ledger(&self) -> &Ledger {
        &self.ledger
    }
    fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }
    fn winnings(&self) -> Option<u32> {
        self.winnings
    }
}

impl Recordable for BlackjackRound {
    fn to_record(&self) -> RoundRecord {
        let mut rec = RoundRecord::unstamped(
            GameKind::Blackjack,
            self.ledger.stake(),
            self.winnings().unwrap_or(0),
        );
        rec.actions = self.actions.clone();
        rec.cards = self.player.iter().chain(self.dealer.iter()).copied().collect();
        rec.result = self.outcome.map(|o| {
            format!(
                "{} {}-{}",
                o.as_str(),
                blackjack_value(&self.player),
                blackjack_value(&self.dealer)
            )
        });
        rec.meta = Some(serde_json::json!({
            "player_cards": self.player.len(),
            "dealer_cards": self.dealer.len(),
        }));
        rec
    }
}
