//! Parsing of interactive table input.
//!
//! Each game has its own command vocabulary. All of them accept `q` or `quit`
//! to leave the table. Parsing never touches game state: amounts and spots are
//! only checked for shape here and validated by the engine when applied.

use parlor_engine::player::PlayerAction;
use parlor_engine::roulette::BetSpot;

/// Outcome of parsing one input line.
#[derive(Debug, PartialEq)]
pub enum ParseResult<T> {
    /// Valid command for the current game
    Action(T),
    /// User entered quit command (q or quit)
    Quit,
    /// Invalid input with error message
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlackjackInput {
    Bet(u32),
    Hit,
    Stand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PokerInput {
    /// Opening stake for a new hand
    Stake(u32),
    /// Fold, check or call on the current street.
    Act(PlayerAction),
    /// Lift the table bet by the table's raise increment.
    Raise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouletteInput {
    Bet(BetSpot, u32),
    Clear,
    Spin,
    ShowBets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotsInput {
    /// Spin with the given stake, or the previous one
    Spin(Option<u32>),
}

fn split_lower(input: &str) -> Vec<String> {
    input
        .split_whitespace()
        .map(|p| p.to_ascii_lowercase())
        .collect()
}

fn is_quit(word: &str) -> bool {
    word == "q" || word == "quit"
}

fn parse_amount(word: &str, what: &str) -> Result<u32, String> {
    match word.parse::<u32>() {
        Ok(0) => Err(format!("{what} must be positive")),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("Invalid {what}: {word}")),
    }
}

/// Blackjack: `bet <n>` (or a bare number), `hit`/`h`, `stand`/`s`.
///
/// ```rust
/// use parlor_cli::validation::{parse_blackjack_input, BlackjackInput, ParseResult};
///
/// assert_eq!(parse_blackjack_input("bet 20"), ParseResult::Action(BlackjackInput::Bet(20)));
/// assert_eq!(parse_blackjack_input("H"), ParseResult::Action(BlackjackInput::Hit));
/// assert_eq!(parse_blackjack_input("quit"), ParseResult::Quit);
/// ```
pub fn parse_blackjack_input(input: &str) -> ParseResult<BlackjackInput> {
    let parts = split_lower(input);
    let Some(first) = parts.first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };
    if is_quit(first) {
        return ParseResult::Quit;
    }
    match first.as_str() {
        "hit" | "h" => ParseResult::Action(BlackjackInput::Hit),
        "stand" | "s" => ParseResult::Action(BlackjackInput::Stand),
        "bet" | "deal" => match parts.get(1) {
            Some(n) => match parse_amount(n, "bet") {
                Ok(n) => ParseResult::Action(BlackjackInput::Bet(n)),
                Err(msg) => ParseResult::Invalid(msg),
            },
            None => ParseResult::Invalid("Bet requires an amount (e.g., 'bet 20')".to_string()),
        },
        word => match word.parse::<u32>() {
            Ok(n) if n > 0 => ParseResult::Action(BlackjackInput::Bet(n)),
            _ => ParseResult::Invalid(format!(
                "Unrecognized command '{word}'. Valid commands: bet <amount>, hit, stand, q"
            )),
        },
    }
}

/// Poker: `stake <n>` before the deal, then `fold`, `check`, `call`,
/// `raise`. Raises are always the table increment, so `raise` takes no amount.
///
/// ```rust
/// use parlor_cli::validation::{parse_poker_input, ParseResult, PokerInput};
/// use parlor_engine::player::PlayerAction;
///
/// assert_eq!(parse_poker_input("raise"), ParseResult::Action(PokerInput::Raise));
/// assert!(matches!(parse_poker_input("raise 75"), ParseResult::Invalid(_)));
/// assert_eq!(parse_poker_input("k"), ParseResult::Action(PokerInput::Act(PlayerAction::Check)));
/// ```
pub fn parse_poker_input(input: &str) -> ParseResult<PokerInput> {
    let parts = split_lower(input);
    let Some(first) = parts.first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };
    if is_quit(first) {
        return ParseResult::Quit;
    }
    match first.as_str() {
        "fold" | "f" => ParseResult::Action(PokerInput::Act(PlayerAction::Fold)),
        "check" | "k" => ParseResult::Action(PokerInput::Act(PlayerAction::Check)),
        "call" | "c" => ParseResult::Action(PokerInput::Act(PlayerAction::Call)),
        "raise" | "r" => match parts.get(1) {
            None => ParseResult::Action(PokerInput::Raise),
            Some(n) => ParseResult::Invalid(format!(
                "Raises are fixed at the table increment; type 'raise' without '{n}'"
            )),
        },
        "stake" | "bet" => match parts.get(1) {
            Some(n) => match parse_amount(n, "stake") {
                Ok(n) => ParseResult::Action(PokerInput::Stake(n)),
                Err(msg) => ParseResult::Invalid(msg),
            },
            None => ParseResult::Invalid("Stake requires an amount (e.g., 'stake 25')".to_string()),
        },
        word => match word.parse::<u32>() {
            Ok(n) if n > 0 => ParseResult::Action(PokerInput::Stake(n)),
            _ => ParseResult::Invalid(format!(
                "Unrecognized action '{word}'. Valid actions: stake <amount>, fold, check, call, raise, q"
            )),
        },
    }
}

/// Roulette: `bet <spot> <n>`, `clear`, `spin`, `bets`.
///
/// ```rust
/// use parlor_cli::validation::{parse_roulette_input, ParseResult, RouletteInput};
/// use parlor_engine::roulette::BetSpot;
///
/// assert_eq!(
///     parse_roulette_input("bet red 10"),
///     ParseResult::Action(RouletteInput::Bet(BetSpot::Red, 10))
/// );
/// assert_eq!(
///     parse_roulette_input("bet 17 5"),
///     ParseResult::Action(RouletteInput::Bet(BetSpot::Straight(17), 5))
/// );
/// ```
pub fn parse_roulette_input(input: &str) -> ParseResult<RouletteInput> {
    let parts = split_lower(input);
    let Some(first) = parts.first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };
    if is_quit(first) {
        return ParseResult::Quit;
    }
    match first.as_str() {
        "spin" => ParseResult::Action(RouletteInput::Spin),
        "clear" => ParseResult::Action(RouletteInput::Clear),
        "bets" => ParseResult::Action(RouletteInput::ShowBets),
        "bet" | "b" => {
            let (Some(spot), Some(amount)) = (parts.get(1), parts.get(2)) else {
                return ParseResult::Invalid(
                    "Bet requires a spot and an amount (e.g., 'bet red 10')".to_string(),
                );
            };
            let spot = match spot.parse::<BetSpot>() {
                Ok(s) => s,
                Err(e) => return ParseResult::Invalid(e.to_string()),
            };
            match parse_amount(amount, "bet") {
                Ok(n) => ParseResult::Action(RouletteInput::Bet(spot, n)),
                Err(msg) => ParseResult::Invalid(msg),
            }
        }
        word => ParseResult::Invalid(format!(
            "Unrecognized command '{word}'. Valid commands: bet <spot> <amount>, spin, clear, bets, q"
        )),
    }
}

/// Slots: `spin [n]`, a bare number, or an empty line to repeat the last
/// stake.
pub fn parse_slots_input(input: &str) -> ParseResult<SlotsInput> {
    let parts = split_lower(input);
    let Some(first) = parts.first() else {
        return ParseResult::Action(SlotsInput::Spin(None));
    };
    if is_quit(first) {
        return ParseResult::Quit;
    }
    let amount = match first.as_str() {
        "spin" | "s" => parts.get(1),
        _ => Some(first),
    };
    match amount {
        None => ParseResult::Action(SlotsInput::Spin(None)),
        Some(n) => match parse_amount(n, "stake") {
            Ok(n) => ParseResult::Action(SlotsInput::Spin(Some(n))),
            Err(_) => ParseResult::Invalid(format!(
                "Unrecognized command '{n}'. Valid commands: spin [amount], q"
            )),
        },
    }
}
