//! The presentation port: how the engine talks to whatever renders the game.

use crate::actions::GameEvent;
use crate::board::Position;
use crate::player::{Color, PieceIndex};

/// Receiver of engine notifications
///
/// Implementations must not call back into the engine; every method is a
/// pure notification issued after the state change it describes.
pub trait PresentationPort {
    fn dice_value_changed(&mut self, value: Option<u8>);

    fn active_player_changed(&mut self, color: Color);

    fn piece_position_changed(&mut self, color: Color, piece: PieceIndex, position: Position);

    fn pieces_eligible(&mut self, color: Color, pieces: &[PieceIndex]);

    fn pieces_unhighlighted(&mut self);

    fn dice_enabled(&mut self, enabled: bool);

    /// All of `color`'s pieces reached home. The game resets right after.
    fn player_won(&mut self, color: Color);
}

impl<P: PresentationPort + ?Sized> PresentationPort for &mut P {
    fn dice_value_changed(&mut self, value: Option<u8>) {
        (**self).dice_value_changed(value)
    }

    fn active_player_changed(&mut self, color: Color) {
        (**self).active_player_changed(color)
    }

    fn piece_position_changed(&mut self, color: Color, piece: PieceIndex, position: Position) {
        (**self).piece_position_changed(color, piece, position)
    }

    fn pieces_eligible(&mut self, color: Color, pieces: &[PieceIndex]) {
        (**self).pieces_eligible(color, pieces)
    }

    fn pieces_unhighlighted(&mut self) {
        (**self).pieces_unhighlighted()
    }

    fn dice_enabled(&mut self, enabled: bool) {
        (**self).dice_enabled(enabled)
    }

    fn player_won(&mut self, color: Color) {
        (**self).player_won(color)
    }
}

/// Port that records every notification as a [`GameEvent`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all recorded events, leaving the log empty
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl PresentationPort for EventLog {
    fn dice_value_changed(&mut self, value: Option<u8>) {
        self.events.push(GameEvent::DiceValueChanged { value });
    }

    fn active_player_changed(&mut self, color: Color) {
        self.events.push(GameEvent::ActivePlayerChanged { color });
    }

    fn piece_position_changed(&mut self, color: Color, piece: PieceIndex, position: Position) {
        self.events
            .push(GameEvent::piece_moved(color, piece, position));
    }

    fn pieces_eligible(&mut self, color: Color, pieces: &[PieceIndex]) {
        self.events.push(GameEvent::PiecesEligible {
            color,
            pieces: pieces.to_vec(),
        });
    }

    fn pieces_unhighlighted(&mut self) {
        self.events.push(GameEvent::PiecesUnhighlighted);
    }

    fn dice_enabled(&mut self, enabled: bool) {
        self.events.push(GameEvent::DiceEnabled { enabled });
    }

    fn player_won(&mut self, color: Color) {
        self.events.push(GameEvent::PlayerWon { color });
    }
}
