//! Fixed board topology.
//!
//! This module contains:
//! - The `Position` of a piece (base slot, shared track, home lane, home)
//! - Per-color layout: start cell, turning point, lane and base numbering
//! - The set of capture-immune safe cells
//! - The single-step successor rule
//!
//! Nothing here is mutable; the board is consulted, never modified.

use crate::game::GameError;
use crate::player::{Color, PieceIndex, PIECES_PER_PLAYER};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cells on the shared circular track
pub const TRACK_LEN: u8 = 52;

/// Number of cells in a private home lane (home cell excluded)
pub const LANE_LEN: u8 = 5;

/// Track cells where captures cannot happen: the four start cells plus four stars
pub const SAFE_CELLS: [u8; 8] = [0, 8, 13, 21, 26, 34, 39, 47];

/// Where a piece currently is
///
/// The four variants partition the position space, so a piece is always in
/// exactly one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "at")]
pub enum Position {
    /// Waiting in the owner's base, in the given slot (0-3)
    Base(u8),
    /// On the shared track (0-51)
    Track(u8),
    /// In the owner's private home lane (0-4, 0 is the lane entry)
    Lane(u8),
    /// Finished
    Home,
}

impl Position {
    pub fn is_base(&self) -> bool {
        matches!(self, Position::Base(_))
    }

    pub fn is_track(&self) -> bool {
        matches!(self, Position::Track(_))
    }

    pub fn is_lane(&self) -> bool {
        matches!(self, Position::Lane(_))
    }

    pub fn is_home(&self) -> bool {
        matches!(self, Position::Home)
    }

    /// Whether the payload lies inside its domain
    pub fn is_well_formed(&self) -> bool {
        match *self {
            Position::Base(slot) => (slot as usize) < PIECES_PER_PLAYER,
            Position::Track(cell) => cell < TRACK_LEN,
            Position::Lane(step) => step < LANE_LEN,
            Position::Home => true,
        }
    }

    /// Cells left before Home, for pieces already inside the home lane
    pub fn remaining_to_home(&self) -> Option<u8> {
        match *self {
            Position::Lane(step) => Some(LANE_LEN - step),
            Position::Home => Some(0),
            _ => None,
        }
    }

    /// Decode a numeric cell id for the given color
    pub fn from_cell(color: Color, id: u16) -> Result<Self, GameError> {
        let layout = ColorLayout::of(color);
        let pos = match id {
            0..=51 => Position::Track(id as u8),
            _ if id == layout.lane_block + LANE_LEN as u16 => Position::Home,
            _ if (layout.lane_block..layout.lane_block + LANE_LEN as u16).contains(&id) => {
                Position::Lane((id - layout.lane_block) as u8)
            }
            _ if (layout.base_block..layout.base_block + PIECES_PER_PLAYER as u16).contains(&id) => {
                Position::Base((id - layout.base_block) as u8)
            }
            _ => return Err(GameError::InvalidCell { color, cell: id }),
        };
        Ok(pos)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Base(slot) => write!(f, "base {}", slot),
            Position::Track(cell) => write!(f, "track {}", cell),
            Position::Lane(step) => write!(f, "lane {}", step),
            Position::Home => f.write_str("home"),
        }
    }
}

/// Per-color board geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorLayout {
    /// Track cell a piece enters on leaving base
    pub start: u8,
    /// Last shared cell before the private lane
    pub turning_point: u8,
    /// Cell id of the first lane cell; home is `lane_block + LANE_LEN`
    pub lane_block: u16,
    /// Cell id of base slot 0
    pub base_block: u16,
}

impl ColorLayout {
    /// Layout of the standard four-color board
    pub const fn of(color: Color) -> Self {
        match color {
            Color::Blue => Self {
                start: 0,
                turning_point: 50,
                lane_block: 100,
                base_block: 500,
            },
            Color::Red => Self {
                start: 13,
                turning_point: 11,
                lane_block: 300,
                base_block: 700,
            },
            Color::Green => Self {
                start: 26,
                turning_point: 24,
                lane_block: 200,
                base_block: 600,
            },
            Color::Yellow => Self {
                start: 39,
                turning_point: 37,
                lane_block: 400,
                base_block: 800,
            },
        }
    }
}

/// Static lookups over the standard board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board;

impl Board {
    /// Base slot assigned to a piece; captures always send a piece back here
    pub fn base_slot(index: PieceIndex) -> Position {
        Position::Base(index)
    }

    /// Track cell where this color's pieces enter play
    pub fn start_cell(color: Color) -> Position {
        Position::Track(ColorLayout::of(color).start)
    }

    /// Last track cell before this color's home lane
    pub fn turning_point(color: Color) -> Position {
        Position::Track(ColorLayout::of(color).turning_point)
    }

    /// Ordered home lane cells, entry first; every color's lane has this shape
    pub fn home_lane() -> impl Iterator<Item = Position> {
        (0..LANE_LEN).map(Position::Lane)
    }

    /// Whether captures are suppressed on this position
    pub fn is_safe(pos: Position) -> bool {
        match pos {
            Position::Track(cell) => SAFE_CELLS.contains(&cell),
            _ => false,
        }
    }

    /// The position one cell further along this color's route
    ///
    /// Returns `None` for positions that never advance step-wise (base and home).
    pub fn next_position(color: Color, pos: Position) -> Option<Position> {
        match pos {
            Position::Track(cell) if cell == ColorLayout::of(color).turning_point => {
                Some(Position::Lane(0))
            }
            Position::Track(cell) if cell == TRACK_LEN - 1 => Some(Position::Track(0)),
            Position::Track(cell) => Some(Position::Track(cell + 1)),
            Position::Lane(step) if step + 1 >= LANE_LEN => Some(Position::Home),
            Position::Lane(step) => Some(Position::Lane(step + 1)),
            Position::Base(_) | Position::Home => None,
        }
    }

    /// Numeric cell id of a position, as used by presentation layers
    pub fn cell_id(color: Color, pos: Position) -> u16 {
        let layout = ColorLayout::of(color);
        match pos {
            Position::Track(cell) => cell as u16,
            Position::Lane(step) => layout.lane_block + step as u16,
            Position::Home => layout.lane_block + LANE_LEN as u16,
            Position::Base(slot) => layout.base_block + slot as u16,
        }
    }
}
