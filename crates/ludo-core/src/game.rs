//! Passive game state.
//!
//! This module contains the `GameState` snapshot, the phase enum and the
//! error type. State changes are made by the rules engine in
//! [`crate::engine`]; nothing here issues notifications.

use crate::board::{Board, Position};
use crate::player::{Color, PieceId, PieceIndex, PIECES_PER_PLAYER};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies one in-flight move; outlives resets so old tickets stay stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoveTicket(u64);

impl MoveTicket {
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// A step-wise move that has been started but not completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMove {
    pub ticket: MoveTicket,
    pub piece: PieceId,
    /// Single-cell advances still to perform
    pub steps_remaining: u8,
}

/// Game phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the active player to roll
    AwaitingRoll,

    /// Die value known, waiting for a piece selection
    RollResolved {
        /// Pieces of the active player that may move
        eligible: Vec<PieceIndex>,
    },

    /// A piece is being advanced one cell at a time
    MoveInProgress(PendingMove),
}

/// Errors that can occur when driving the engine
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Invalid action for current phase")]
    InvalidPhase,

    #[error("Not your turn")]
    NotYourTurn,

    #[error("{0} is not seated in this game")]
    UnknownPlayer(Color),

    #[error("No piece {index} for {color}")]
    NoSuchPiece { color: Color, index: PieceIndex },

    #[error("Piece {0} cannot move with this roll")]
    PieceNotEligible(PieceId),

    #[error("Die value {0} is outside 1-6")]
    InvalidDieValue(u8),

    #[error("Move ticket is no longer current")]
    StaleMove,

    #[error("Cell {cell} is not on {color}'s route")]
    InvalidCell { color: Color, cell: u16 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal invariant violated: {0}")]
    InvariantViolated(String),
}

impl GameError {
    /// Whether the engine can no longer be trusted after this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, GameError::InvariantViolated(_))
    }
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Seated colors in turn order
    pub players: Vec<Color>,
    /// Piece positions, indexed like `players`
    pub positions: Vec<[Position; PIECES_PER_PLAYER]>,
    /// Seat index of the active player
    pub turn: usize,
    /// Last rolled die value, cleared on reset
    pub dice_value: Option<u8>,
    /// Current game phase
    pub phase: GamePhase,
}

impl GameState {
    /// Fresh game: every piece in its own base slot, first seat to roll
    pub fn new(players: Vec<Color>) -> Self {
        let home_bases = [0, 1, 2, 3].map(Board::base_slot);
        let positions = vec![home_bases; players.len()];
        Self {
            players,
            positions,
            turn: 0,
            dice_value: None,
            phase: GamePhase::AwaitingRoll,
        }
    }

    /// Get the number of players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Color whose turn it is
    pub fn current_player(&self) -> Color {
        self.players[self.turn]
    }

    /// Seat index of a color
    pub fn seat_of(&self, color: Color) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|&c| c == color)
            .ok_or(GameError::UnknownPlayer(color))
    }

    /// All four positions of a color
    pub fn pieces(&self, color: Color) -> Result<&[Position; PIECES_PER_PLAYER], GameError> {
        let seat = self.seat_of(color)?;
        Ok(&self.positions[seat])
    }

    /// Current position of a single piece
    pub fn position(&self, piece: PieceId) -> Result<Position, GameError> {
        let pieces = self.pieces(piece.color)?;
        pieces
            .get(piece.index as usize)
            .copied()
            .ok_or(GameError::NoSuchPiece {
                color: piece.color,
                index: piece.index,
            })
    }

    pub(crate) fn set_position(&mut self, piece: PieceId, pos: Position) -> Result<(), GameError> {
        let seat = self.seat_of(piece.color)?;
        let slot = self.positions[seat]
            .get_mut(piece.index as usize)
            .ok_or(GameError::NoSuchPiece {
                color: piece.color,
                index: piece.index,
            })?;
        *slot = pos;
        Ok(())
    }

    /// The in-flight move, if any
    pub fn pending_move(&self) -> Option<&PendingMove> {
        match &self.phase {
            GamePhase::MoveInProgress(pending) => Some(pending),
            _ => None,
        }
    }

    /// Pieces of `color` that may legally move with `die`
    pub fn eligible_pieces(&self, color: Color, die: u8) -> Result<Vec<PieceIndex>, GameError> {
        let pieces = self.pieces(color)?;
        Ok(pieces
            .iter()
            .enumerate()
            .filter(|(_, pos)| match pos {
                Position::Home => false,
                Position::Base(_) => die == 6,
                Position::Lane(_) => pos.remaining_to_home().is_some_and(|left| die <= left),
                Position::Track(_) => true,
            })
            .map(|(i, _)| i as PieceIndex)
            .collect())
    }

    /// Whether every piece of `color` is home
    pub fn has_won(&self, color: Color) -> bool {
        self.pieces(color)
            .map(|pieces| pieces.iter().all(Position::is_home))
            .unwrap_or(false)
    }

    /// Opponent pieces resting on the given track cell
    pub fn opponents_at(&self, mover: Color, pos: Position) -> Vec<PieceId> {
        if !pos.is_track() {
            // Lanes and bases are private
            return Vec::new();
        }
        self.players
            .iter()
            .zip(&self.positions)
            .filter(|(color, _)| **color != mover)
            .flat_map(|(&color, pieces)| {
                pieces
                    .iter()
                    .enumerate()
                    .filter(move |(_, p)| **p == pos)
                    .map(move |(i, _)| PieceId {
                        color,
                        index: i as PieceIndex,
                    })
            })
            .collect()
    }

    /// Pass the turn to the next seat
    pub(crate) fn advance_turn(&mut self) {
        self.turn = (self.turn + 1) % self.players.len();
    }

    /// Check that a hand-built snapshot is consistent
    pub fn validate(&self) -> Result<(), GameError> {
        if self.positions.len() != self.players.len() {
            return Err(GameError::InvariantViolated(format!(
                "{} seats but {} position sets",
                self.players.len(),
                self.positions.len()
            )));
        }
        if self.turn >= self.players.len() {
            return Err(GameError::InvariantViolated(format!(
                "turn {} out of range",
                self.turn
            )));
        }
        for (color, pieces) in self.players.iter().zip(&self.positions) {
            for (index, pos) in pieces.iter().enumerate() {
                if !pos.is_well_formed() {
                    return Err(GameError::InvariantViolated(format!(
                        "{}#{} at malformed {:?}",
                        color, index, pos
                    )));
                }
                if let Position::Base(slot) = pos {
                    if *slot as usize != index {
                        return Err(GameError::InvariantViolated(format!(
                            "{}#{} sits in base slot {}",
                            color, index, slot
                        )));
                    }
                }
            }
        }

        // Only the piece in flight may pass over an opponent
        let moving = self.pending_move().map(|m| m.piece);
        let resting = |color: Color, pieces: &[Position; PIECES_PER_PLAYER]| {
            pieces
                .iter()
                .enumerate()
                .filter(move |(i, _)| {
                    moving != Some(PieceId {
                        color,
                        index: *i as PieceIndex,
                    })
                })
                .map(|(_, pos)| *pos)
                .filter(|pos| pos.is_track() && !Board::is_safe(*pos))
                .collect::<Vec<_>>()
        };
        for (i, (a, a_pieces)) in self.players.iter().zip(&self.positions).enumerate() {
            let a_cells = resting(*a, a_pieces);
            for (b, b_pieces) in self.players.iter().zip(&self.positions).skip(i + 1) {
                if let Some(pos) = resting(*b, b_pieces)
                    .into_iter()
                    .find(|pos| a_cells.contains(pos))
                {
                    return Err(GameError::InvariantViolated(format!(
                        "{} and {} share unsafe {}",
                        a, b, pos
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blue(index: PieceIndex) -> PieceId {
        PieceId {
            color: Color::Blue,
            index,
        }
    }

    #[test]
    fn test_new_game_starts_in_base() {
        let state = GameState::new(vec![Color::Blue, Color::Green]);
        assert_eq!(state.turn, 0);
        assert_eq!(state.dice_value, None);
        assert_eq!(state.phase, GamePhase::AwaitingRoll);
        for pieces in &state.positions {
            for (i, pos) in pieces.iter().enumerate() {
                assert_eq!(*pos, Position::Base(i as u8));
            }
        }
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_base_pieces_need_a_six() {
        let state = GameState::new(vec![Color::Blue, Color::Green]);
        assert!(state.eligible_pieces(Color::Blue, 5).unwrap().is_empty());
        assert_eq!(
            state.eligible_pieces(Color::Blue, 6).unwrap(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_lane_overshoot_not_eligible() {
        let mut state = GameState::new(vec![Color::Blue, Color::Green]);
        state.set_position(blue(0), Position::Lane(3)).unwrap(); // 2 from home
        state.set_position(blue(1), Position::Home).unwrap();
        state.set_position(blue(2), Position::Track(10)).unwrap();

        assert_eq!(state.eligible_pieces(Color::Blue, 2).unwrap(), vec![0, 2]);
        assert_eq!(state.eligible_pieces(Color::Blue, 3).unwrap(), vec![2]);
    }

    #[test]
    fn test_opponents_only_on_shared_track() {
        let mut state = GameState::new(vec![Color::Blue, Color::Green]);
        let green = PieceId {
            color: Color::Green,
            index: 2,
        };
        state.set_position(green, Position::Track(30)).unwrap();
        state.set_position(blue(0), Position::Track(30)).unwrap();

        assert_eq!(
            state.opponents_at(Color::Blue, Position::Track(30)),
            vec![green]
        );
        assert!(state.opponents_at(Color::Green, Position::Track(31)).is_empty());
        // Both colors have a lane 0 but they are different cells
        state.set_position(green, Position::Lane(0)).unwrap();
        assert!(state.opponents_at(Color::Blue, Position::Lane(0)).is_empty());
    }

    #[test]
    fn test_unknown_color_rejected() {
        let state = GameState::new(vec![Color::Blue, Color::Green]);
        assert_eq!(
            state.pieces(Color::Red).unwrap_err(),
            GameError::UnknownPlayer(Color::Red)
        );
        assert!(!state.has_won(Color::Red));
    }

    #[test]
    fn test_validate_catches_misplaced_base_slot() {
        let mut state = GameState::new(vec![Color::Blue, Color::Green]);
        state.positions[0][0] = Position::Base(2);
        assert!(matches!(
            state.validate(),
            Err(GameError::InvariantViolated(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unsafe_coresting() {
        let mut state = GameState::new(vec![Color::Blue, Color::Green]);
        state.positions[0][0] = Position::Track(5);
        state.positions[1][0] = Position::Track(5);
        assert!(matches!(
            state.validate(),
            Err(GameError::InvariantViolated(_))
        ));

        // Safe cells and same-color stacks are fine
        state.positions[0][0] = Position::Track(8);
        state.positions[1][0] = Position::Track(8);
        state.positions[1][1] = Position::Track(5);
        state.positions[1][2] = Position::Track(5);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_validate_allows_piece_in_flight_over_opponent() {
        let mut state = GameState::new(vec![Color::Blue, Color::Green]);
        state.positions[0][0] = Position::Track(5);
        state.positions[1][0] = Position::Track(5);
        state.phase = GamePhase::MoveInProgress(PendingMove {
            ticket: MoveTicket::from_raw(1),
            piece: blue(0),
            steps_remaining: 2,
        });
        assert!(state.validate().is_ok());
    }
}
