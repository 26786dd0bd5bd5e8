//! Player colors and piece identifiers.
//!
//! This module contains:
//! - The four fixed player colors of the board
//! - Piece identifiers (color + index)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::game::GameError;

/// Number of pieces each player owns
pub const PIECES_PER_PLAYER: usize = 4;

/// Index of a piece within its owner's set (0-3)
pub type PieceIndex = u8;

/// Player color; also the player's identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Blue,
    Red,
    Green,
    Yellow,
}

impl Color {
    /// All colors in seating order around the board
    pub const ALL: [Color; 4] = [Color::Blue, Color::Red, Color::Green, Color::Yellow];

    /// Short label used by text frontends
    pub fn label(&self) -> &'static str {
        match self {
            Color::Blue => "Blue",
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Yellow => "Yellow",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Color {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" | "b" => Ok(Color::Blue),
            "red" | "r" => Ok(Color::Red),
            "green" | "g" => Ok(Color::Green),
            "yellow" | "y" => Ok(Color::Yellow),
            other => Err(GameError::InvalidConfig(format!("unknown color '{}'", other))),
        }
    }
}

/// A single piece on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceId {
    pub color: Color,
    pub index: PieceIndex,
}

impl PieceId {
    /// Create a piece identifier, rejecting indices outside 0-3
    pub fn new(color: Color, index: PieceIndex) -> Result<Self, GameError> {
        if (index as usize) < PIECES_PER_PLAYER {
            Ok(Self { color, index })
        } else {
            Err(GameError::NoSuchPiece { color, index })
        }
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.color, self.index)
    }
}
