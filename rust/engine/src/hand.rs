
use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank, Suit};

// ---------------------------------------------------------------------------
// Blackjack
// ---------------------------------------------------------------------------

/// Blackjack total of a hand. Aces count 11 and drop to 1, one at a time,
/// while the total is over 21. A result above 21 is a bust.
pub fn blackjack_value(cards: &[Card]) -> u32 {
    let (total, _) = blackjack_total(cards);
    total
}

/// Returns the reduced total and how many aces still count as 11.
fn blackjack_total(cards: &[Card]) -> (u32, u32) {
    let mut total: u32 = cards.iter().map(|c| c.rank.blackjack_value() as u32).sum();
    let mut soft_aces = cards.iter().filter(|c| c.rank == Rank::Ace).count() as u32;
    while total > 21 && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    (total, soft_aces)
}

pub fn is_bust(cards: &[Card]) -> bool {
    blackjack_value(cards) > 21
}

/// True when at least one ace is still counted as 11.
pub fn is_soft(cards: &[Card]) -> bool {
    let (total, soft_aces) = blackjack_total(cards);
    total <= 21 && soft_aces > 0
}

/// Two-card 21.
pub fn is_natural(cards: &[Card]) -> bool {
    cards.len() == 2 && blackjack_value(cards) == 21
}

// ---------------------------------------------------------------------------
// Poker: simplified table scoring
// ---------------------------------------------------------------------------

pub const FOUR_OF_A_KIND_BONUS: u32 = 10_000;
pub const FULL_HOUSE_BONUS: u32 = 7_000;
pub const FLUSH_BONUS: u32 = 6_000;
pub const THREE_OF_A_KIND_BONUS: u32 = 4_000;
pub const TWO_PAIR_BONUS: u32 = 3_000;
pub const ONE_PAIR_BONUS: u32 = 2_000;

/// Table score for a poker pool: the sum of the five highest card values plus
/// a bonus for the best category found by rank and suit frequency over the
/// whole pool.
///
/// This is not a best-five-card evaluation. A flush only requires five cards
/// of one suit somewhere in the pool, a full house only requires a triple and
/// a separate pair anywhere, and straights earn nothing. Use
/// [`ScoringMode::Canonical`] for true hand ranking.
///
/// # Examples
///
/// ```
/// use parlor_engine::cards::{Card, Rank, Suit};
/// use parlor_engine::hand::poker_score;
///
/// let hole = [Card::new(Rank::Ace, Suit::Spades), Card::new(Rank::Ace, Suit::Hearts)];
/// let board = [
///     Card::new(Rank::Two, Suit::Clubs),
///     Card::new(Rank::Seven, Suit::Diamonds),
///     Card::new(Rank::Nine, Suit::Clubs),
/// ];
/// // one pair bonus + 14 + 14 + 9 + 7 + 2
/// assert_eq!(poker_score(&hole, &board), 2_000 + 46);
/// ```
pub fn poker_score(hole: &[Card], community: &[Card]) -> u32 {
    let pool: Vec<Card> = hole.iter().chain(community.iter()).copied().collect();

    let mut values: Vec<u32> = pool.iter().map(|c| c.rank.poker_value() as u32).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));
    let top_five: u32 = values.iter().take(5).sum();

    let mut rank_counts = [0u8; 15];
    let mut suit_counts = [0u8; 4];
    for c in &pool {
        rank_counts[c.rank.poker_value() as usize] += 1;
        suit_counts[suit_index(c.suit)] += 1;
    }

    let pairs = rank_counts.iter().filter(|&&n| n == 2).count();
    let trips = rank_counts.iter().any(|&n| n == 3);
    let quads = rank_counts.iter().any(|&n| n == 4);
    let flush = suit_counts.iter().any(|&n| n >= 5);

    let bonus = if quads {
        FOUR_OF_A_KIND_BONUS
    } else if trips && pairs > 0 {
        FULL_HOUSE_BONUS
    } else if flush {
        FLUSH_BONUS
    } else if trips {
        THREE_OF_A_KIND_BONUS
    } else if pairs >= 2 {
        TWO_PAIR_BONUS
    } else if pairs == 1 {
        ONE_PAIR_BONUS
    } else {
        0
    };
    top_five + bonus
}

/// Selects how a poker showdown is scored.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// Frequency-based table scoring, see [`poker_score`].
    #[default]
    Simplified,
    /// Best hand out of the pool, see [`evaluate_hand`].
    Canonical,
}

impl ScoringMode {
    pub fn score(self, hole: &[Card], community: &[Card]) -> ShowdownScore {
        match self {
            ScoringMode::Simplified => ShowdownScore::Simplified(poker_score(hole, community)),
            ScoringMode::Canonical => {
                let pool: Vec<Card> = hole.iter().chain(community.iter()).copied().collect();
                ShowdownScore::Canonical(evaluate_hand(&pool))
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoringMode::Simplified => "simplified",
            ScoringMode::Canonical => "canonical",
        }
    }
}

impl std::str::FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simplified" => Ok(ScoringMode::Simplified),
            "canonical" => Ok(ScoringMode::Canonical),
            other => Err(format!("unknown scoring mode: {other}")),
        }
    }
}

/// Comparable showdown result. Scores are only compared within one mode.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum ShowdownScore {
    Simplified(u32),
    Canonical(HandStrength),
}

// ---------------------------------------------------------------------------
// Poker: canonical ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

/// Field order matters: the derived `Ord` compares category first, then
/// kickers.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct HandStrength {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks
    pub kickers: [u8; 5],
}

/// Best poker hand that can be formed from up to seven cards.
pub fn evaluate_hand(cards: &[Card]) -> HandStrength {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut suit_counts = [0u8; 4];
    let mut by_suit: [Vec<u8>; 4] = [vec![], vec![], vec![], vec![]];
    for &c in cards.iter() {
        let r = c.rank.poker_value();
        rank_counts[r as usize] += 1;
        let s = suit_index(c.suit);
        suit_counts[s] += 1;
        by_suit[s].push(r);
    }

    let flush_suit = suit_counts.iter().position(|&count| count >= 5);

    if let Some(s) = flush_suit {
        let mut suited = by_suit[s].clone();
        suited.sort_unstable();
        suited.dedup();
        if let Some(high) = detect_straight_high(&suited) {
            return HandStrength {
                category: Category::StraightFlush,
                kickers: [high, 0, 0, 0, 0],
            };
        }
    }

    if let Some((quad, kicker)) = detect_quads(&rank_counts) {
        return HandStrength {
            category: Category::FourOfAKind,
            kickers: [quad, kicker, 0, 0, 0],
        };
    }

    if let Some((trip, pair)) = detect_full_house(&rank_counts) {
        return HandStrength {
            category: Category::FullHouse,
            kickers: [trip, pair, 0, 0, 0],
        };
    }

    if let Some(s) = flush_suit {
        let mut ranks = by_suit[s].clone();
        ranks.sort_unstable_by(|a, b| b.cmp(a));
        let mut k = [0u8; 5];
        k.copy_from_slice(&ranks[..5]);
        return HandStrength {
            category: Category::Flush,
            kickers: k,
        };
    }

    let uniq: Vec<u8> = (2..=14u8).filter(|&r| rank_counts[r as usize] > 0).collect();
    if let Some(high) = detect_straight_high(&uniq) {
        return HandStrength {
            category: Category::Straight,
            kickers: [high, 0, 0, 0, 0],
        };
    }

    let (trip_ranks, pair_ranks, singles) = classify_multiples(&rank_counts);
    if let Some(&t) = trip_ranks.last() {
        let mut rest: Vec<u8> = pair_ranks.iter().chain(singles.iter()).copied().collect();
        rest.sort_unstable_by(|a, b| b.cmp(a));
        return HandStrength {
            category: Category::ThreeOfAKind,
            kickers: [t, kicker_at(&rest, 0), kicker_at(&rest, 1), 0, 0],
        };
    }
    if pair_ranks.len() >= 2 {
        let mut prs = pair_ranks.clone();
        prs.sort_unstable_by(|a, b| b.cmp(a));
        // a third pair can still play as the kicker
        let mut rest: Vec<u8> = prs[2..].iter().chain(singles.iter()).copied().collect();
        rest.sort_unstable_by(|a, b| b.cmp(a));
        return HandStrength {
            category: Category::TwoPair,
            kickers: [prs[0], prs[1], kicker_at(&rest, 0), 0, 0],
        };
    }
    if let Some(&p) = pair_ranks.first() {
        let mut rest = singles.clone();
        rest.sort_unstable_by(|a, b| b.cmp(a));
        return HandStrength {
            category: Category::OnePair,
            kickers: [p, kicker_at(&rest, 0), kicker_at(&rest, 1), kicker_at(&rest, 2), 0],
        };
    }

    let mut highs = singles;
    highs.sort_unstable_by(|a, b| b.cmp(a));
    let mut k = [0u8; 5];
    for (i, item) in k.iter_mut().enumerate() {
        *item = kicker_at(&highs, i);
    }
    HandStrength {
        category: Category::HighCard,
        kickers: k,
    }
}

fn kicker_at(sorted_desc: &[u8], i: usize) -> u8 {
    sorted_desc.get(i).copied().unwrap_or(0)
}

fn suit_index(s: Suit) -> usize {
    match s {
        Suit::Clubs => 0,
        Suit::Diamonds => 1,
        Suit::Hearts => 2,
        Suit::Spades => 3,
    }
}

fn detect_straight_high(sorted_unique_ranks: &[u8]) -> Option<u8> {
    let mut w = sorted_unique_ranks.to_vec();
    w.sort_unstable();
    // Ace also plays low
    if w.last() == Some(&14) {
        w.insert(0, 1);
    }

    let mut run = 1;
    let mut best_high = None;
    for i in 1..w.len() {
        if w[i] == w[i - 1] + 1 {
            run += 1;
            if run >= 5 {
                best_high = Some(w[i]);
            }
        } else if w[i] != w[i - 1] {
            run = 1;
        }
    }
    best_high
}

fn detect_quads(rank_counts: &[u8; 15]) -> Option<(u8, u8)> {
    let quad = (2..=14u8).rev().find(|&r| rank_counts[r as usize] == 4)?;
    let kicker = (2..=14u8)
        .rev()
        .find(|&r| r != quad && rank_counts[r as usize] > 0)
        .unwrap_or(0);
    Some((quad, kicker))
}

fn detect_full_house(rank_counts: &[u8; 15]) -> Option<(u8, u8)> {
    let mut trips: Vec<u8> = vec![];
    let mut pairs: Vec<u8> = vec![];
    for r in (2..=14u8).rev() {
        match rank_counts[r as usize] {
            3 => trips.push(r),
            2 => pairs.push(r),
            _ => {}
        }
    }
    let top = *trips.first()?;
    // a second triple plays as the pair
    let pair = match (trips.get(1), pairs.first()) {
        (Some(&t), Some(&p)) => t.max(p),
        (Some(&t), None) => t,
        (None, Some(&p)) => p,
        (None, None) => return None,
    };
    Some((top, pair))
}

fn classify_multiples(rank_counts: &[u8; 15]) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let mut trips = vec![];
    let mut pairs = vec![];
    let mut singles = vec![];
    for r in 2..=14u8 {
        match rank_counts[r as usize] {
            3 => trips.push(r),
            2 => pairs.push(r),
            1 => singles.push(r),
            _ => {}
        }
    }
    (trips, pairs, singles)
}
