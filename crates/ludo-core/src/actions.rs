//! Player intents and engine notifications as data.
//!
//! This module defines everything a presentation layer can ask of the engine
//! and the events the engine reports back.

use crate::board::{Board, Position};
use crate::game::MoveTicket;
use crate::player::{Color, PieceIndex};
use serde::{Deserialize, Serialize};

/// Everything a presentation layer can ask the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Roll the die for the active player
    RollRequested,
    /// Throw the current game away and start over
    ResetRequested,
    /// A highlighted piece was clicked or chosen
    PieceInteraction { color: Color, piece: PieceIndex },
    /// Timer tick for an animated move
    Step { ticket: MoveTicket },
}

/// Notifications issued by the engine, in the order they happen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The die shows a new value (`None` after a reset)
    DiceValueChanged { value: Option<u8> },

    /// Turn passed to, or was reset to, a player
    ActivePlayerChanged { color: Color },

    /// A piece moved, including each intermediate step
    PiecePositionChanged {
        color: Color,
        piece: PieceIndex,
        position: Position,
        /// Board cell id of `position`, for coordinate lookups
        cell: u16,
    },

    /// These pieces may be selected
    PiecesEligible {
        color: Color,
        pieces: Vec<PieceIndex>,
    },

    /// No piece is selectable any more
    PiecesUnhighlighted,

    /// Rolling became possible or impossible
    DiceEnabled { enabled: bool },

    /// A player brought all pieces home; a reset follows
    PlayerWon { color: Color },
}

impl GameEvent {
    /// Build a position event, filling in the cell id
    pub fn piece_moved(color: Color, piece: PieceIndex, position: Position) -> Self {
        GameEvent::PiecePositionChanged {
            color,
            piece,
            position,
            cell: Board::cell_id(color, position),
        }
    }
}
