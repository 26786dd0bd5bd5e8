//! Text presentation of the game.

use ludo_core::{Board, Color, GameState, PieceIndex, Position, PresentationPort};
use std::fmt::Display;
use std::io::Write;
use tracing::warn;

/// Port that prints notifications as lines of text.
///
/// Pieces are numbered from 1 for humans. The port remembers which pieces it
/// was told to highlight so that only those selections are forwarded.
pub struct TerminalPort<W: Write> {
    out: W,
    highlighted: Option<(Color, Vec<PieceIndex>)>,
    dice_enabled: bool,
}

impl<W: Write> TerminalPort<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            highlighted: None,
            dice_enabled: false,
        }
    }

    /// Write one line, logging instead of failing
    pub fn say(&mut self, line: impl Display) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            warn!("terminal write failed: {}", e);
        }
    }

    /// Whether `piece` of `color` is currently highlighted
    pub fn can_select(&self, color: Color, piece: PieceIndex) -> bool {
        matches!(&self.highlighted, Some((c, pieces)) if *c == color && pieces.contains(&piece))
    }

    pub fn is_dice_enabled(&self) -> bool {
        self.dice_enabled
    }

    /// Print every seated player's pieces
    pub fn render(&mut self, state: &GameState) {
        let lines: Vec<String> = state
            .players
            .iter()
            .zip(&state.positions)
            .map(|(color, pieces)| {
                let cells: Vec<String> = pieces
                    .iter()
                    .enumerate()
                    .map(|(i, pos)| format!("{}:{}", i + 1, describe(*color, *pos)))
                    .collect();
                format!("{:>6}  {}", color, cells.join("  "))
            })
            .collect();
        for line in lines {
            self.say(line);
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn describe(color: Color, pos: Position) -> String {
    let marker = if Board::is_safe(pos) { "*" } else { "" };
    format!("{}{} [{}]", pos, marker, Board::cell_id(color, pos))
}

impl<W: Write> PresentationPort for TerminalPort<W> {
    fn dice_value_changed(&mut self, value: Option<u8>) {
        if let Some(value) = value {
            self.say(format!("rolled a {}", value));
        }
    }

    fn active_player_changed(&mut self, color: Color) {
        self.say(format!("-- {} to play --", color));
    }

    fn piece_position_changed(&mut self, color: Color, piece: PieceIndex, position: Position) {
        self.say(format!(
            "{} piece {} -> {}",
            color,
            piece + 1,
            describe(color, position)
        ));
    }

    fn pieces_eligible(&mut self, color: Color, pieces: &[PieceIndex]) {
        let names: Vec<String> = pieces.iter().map(|p| (p + 1).to_string()).collect();
        self.say(format!("{} may move: {}", color, names.join(", ")));
        self.highlighted = Some((color, pieces.to_vec()));
    }

    fn pieces_unhighlighted(&mut self) {
        self.highlighted = None;
    }

    fn dice_enabled(&mut self, enabled: bool) {
        self.dice_enabled = enabled;
    }

    fn player_won(&mut self, color: Color) {
        self.say(format!("*** {} wins! ***", color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_tracking() {
        let mut port = TerminalPort::new(Vec::new());
        port.pieces_eligible(Color::Blue, &[0, 2]);
        assert!(port.can_select(Color::Blue, 2));
        assert!(!port.can_select(Color::Blue, 1));
        assert!(!port.can_select(Color::Green, 0));

        port.pieces_unhighlighted();
        assert!(!port.can_select(Color::Blue, 2));

        let text = String::from_utf8(port.into_inner()).unwrap();
        assert_eq!(text, "Blue may move: 1, 3\n");
    }

    #[test]
    fn test_position_lines_show_cell_ids() {
        let mut port = TerminalPort::new(Vec::new());
        port.piece_position_changed(Color::Green, 1, Position::Lane(2));
        port.piece_position_changed(Color::Green, 1, Position::Track(26));
        let text = String::from_utf8(port.into_inner()).unwrap();
        assert_eq!(
            text,
            "Green piece 2 -> lane 2 [202]\nGreen piece 2 -> track 26* [26]\n"
        );
    }
}
