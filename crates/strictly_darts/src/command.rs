//! Text commands typed at the scorekeeping console.

use std::str::FromStr;
use strictly_cricket::{Action, Multiplier, ParticipantId, Target};
use tracing::instrument;

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// An engine action.
    Play(Action),
    /// Reprint the scoreboard.
    Show,
    /// List the commands.
    Help,
    /// Leave the console.
    Quit,
}

/// Why a line could not be read as a command.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum CommandError {
    /// Blank line.
    #[display("Empty command")]
    Empty,
    /// Word not recognized.
    #[display("Unknown command: {}", _0)]
    Unknown(String),
    /// Command needs an argument it did not get.
    #[display("{} needs a participant id", _0)]
    MissingParticipant(&'static str),
    /// Multiplier suffix not one of x1, x2, x3.
    #[display("Invalid multiplier: {}", _0)]
    BadMultiplier(String),
    /// Extra words after a complete command.
    #[display("Unexpected input: {}", _0)]
    Trailing(String),
}

impl std::error::Error for CommandError {}

impl Command {
    /// Help text listing every command.
    pub const HELP: &'static str = "\
t20 d19 s18 17   score a dart (treble, double, single)
bull / db        single or double bull
tr / dr          triple or double ring slot
miss             dart missed the board
skip <id>        spend a dart to skip a participant
ko <id> [x2|x3]  KO dart on a participant's number
pin              push the PIN counter
undo             revert the last dart
show             reprint the scoreboard
quit             leave";

    /// Parses one line of input.
    #[instrument]
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let keyword = head.to_lowercase();

        let command = match keyword.as_str() {
            "miss" | "m" | "0" => Command::Play(Action::Miss),
            "pin" => Command::Play(Action::Pin),
            "undo" | "u" => Command::Play(Action::Undo),
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "skip" => {
                let id = words.next().ok_or(CommandError::MissingParticipant("skip"))?;
                Command::Play(Action::Skip(ParticipantId::new(id)))
            }
            "ko" => {
                let id = words.next().ok_or(CommandError::MissingParticipant("ko"))?;
                let multiplier = match words.next() {
                    Some(word) => parse_multiplier(word)?,
                    None => Multiplier::Single,
                };
                Command::Play(Action::Ko {
                    victim: ParticipantId::new(id),
                    multiplier,
                })
            }
            other => {
                let (target, multiplier) =
                    parse_dart(other).ok_or_else(|| CommandError::Unknown(head.to_string()))?;
                Command::Play(Action::Score { target, multiplier })
            }
        };

        match words.next() {
            Some(extra) => Err(CommandError::Trailing(extra.to_string())),
            None => Ok(command),
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_multiplier(word: &str) -> Result<Multiplier, CommandError> {
    word.strip_prefix(['x', 'X'])
        .and_then(|n| n.parse::<u8>().ok())
        .and_then(Multiplier::from_value)
        .ok_or_else(|| CommandError::BadMultiplier(word.to_string()))
}

/// Reads a dart like `t20`, `d19`, `s18`, `17`, `bull`, `db`, `tr` or `dr`.
fn parse_dart(word: &str) -> Option<(Target, Multiplier)> {
    match word {
        "bull" | "b" | "sb" | "25" => return Some((Target::Bull, Multiplier::Single)),
        "db" | "dbull" | "d25" => return Some((Target::Bull, Multiplier::Double)),
        "tr" | "triple" => return Some((Target::Triple, Multiplier::Single)),
        "dr" | "double" => return Some((Target::Double, Multiplier::Single)),
        _ => {}
    }

    let (multiplier, number) = match word.split_at_checked(1)? {
        ("t", rest) => (Multiplier::Triple, rest),
        ("d", rest) => (Multiplier::Double, rest),
        ("s", rest) => (Multiplier::Single, rest),
        _ => (Multiplier::Single, word),
    };

    // Numbers only; the bull and ring slots have their own words.
    if !number.chars().all(|c| c.is_ascii_digit()) || number == "25" {
        return None;
    }
    Target::from_label(number).map(|target| (target, multiplier))
}
