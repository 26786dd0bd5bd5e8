//! Commands typed at the terminal.

use ludo_core::PieceIndex;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}', type 'help'")]
    Unknown(String),

    #[error("Pieces are numbered 1-4")]
    BadPiece,
}

/// A single line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Roll the die
    Roll,

    /// Move one of the highlighted pieces (0-based)
    Move(PieceIndex),

    /// Start a new game
    Reset,

    /// Print every piece's position
    Show,

    /// Print the game state as JSON
    Dump,

    Help,

    Quit,
}

impl Command {
    pub const HELP: &'static str = "\
commands:
  roll | r | <enter>   roll the die
  1-4 | move <n>       move a highlighted piece
  show                 list piece positions
  state                dump the game state as JSON
  reset                start over
  quit                 leave";
}

fn parse_piece(s: &str) -> Result<PieceIndex, CommandError> {
    match s.parse::<u8>() {
        Ok(n @ 1..=4) => Ok(n - 1),
        _ => Err(CommandError::BadPiece),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Command::Roll);
        };
        match head.to_ascii_lowercase().as_str() {
            "roll" | "r" => Ok(Command::Roll),
            "move" | "m" => words
                .next()
                .ok_or(CommandError::BadPiece)
                .and_then(parse_piece)
                .map(Command::Move),
            "reset" => Ok(Command::Reset),
            "show" | "s" => Ok(Command::Show),
            "state" => Ok(Command::Dump),
            "help" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other if other.chars().all(|c| c.is_ascii_digit()) => {
                parse_piece(other).map(Command::Move)
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
