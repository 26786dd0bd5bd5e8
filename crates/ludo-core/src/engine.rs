//! The rules engine.
//!
//! `Engine` owns the [`GameState`], an injected random source for the die and an
//! injected [`PresentationPort`]. It is the only thing that mutates the state,
//! and it notifies the port after each mutation.
//!
//! A normal turn looks like:
//!
//! 1. [`Engine::roll`] draws a die value and computes the eligible pieces.
//!    With nothing to move, the turn passes immediately.
//! 2. [`Engine::select`] picks an eligible piece. Leaving base is a single
//!    jump; anything else becomes a [`PendingMove`] identified by a
//!    [`MoveTicket`].
//! 3. The driver calls [`Engine::step`] once per animation tick (or
//!    [`Engine::finish_move`] to run the move synchronously). The last step
//!    resolves win, captures and who rolls next.
//!
//! [`Engine::reset`] may be called at any point. Tickets handed out before a
//! reset are stale forever afterwards.

use crate::actions::Intent;
use crate::board::{Board, Position};
use crate::config::GameConfig;
use crate::game::{GameError, GamePhase, GameState, MoveTicket, PendingMove};
use crate::player::{Color, PieceId, PieceIndex};
use crate::port::PresentationPort;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Result of a roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollOutcome {
    /// At least one piece can move; waiting for a selection
    Eligible {
        value: u8,
        pieces: Vec<PieceIndex>,
    },
    /// Nothing could move, the turn went to `next`
    TurnPassed { value: u8, next: Color },
}

impl RollOutcome {
    pub fn value(&self) -> u8 {
        match self {
            RollOutcome::Eligible { value, .. } | RollOutcome::TurnPassed { value, .. } => *value,
        }
    }
}

/// How a finished move ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub piece: PieceId,
    /// Where the piece came to rest
    pub landed: Position,
    /// Opponent pieces sent back to base
    pub captured: Vec<PieceId>,
    /// The same player rolls again
    pub extra_roll: bool,
    /// Set when this move won the game; the engine has already reset
    pub winner: Option<Color>,
}

/// Progress of a selected move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveProgress {
    /// More steps to go; call [`Engine::step`] with `ticket`
    InFlight {
        ticket: MoveTicket,
        position: Position,
        remaining: u8,
    },
    /// The move is complete
    Completed(MoveOutcome),
}

/// The Ludo rules engine
#[derive(Debug)]
pub struct Engine<P: PresentationPort, R: Rng = StdRng> {
    config: GameConfig,
    state: GameState,
    port: P,
    rng: R,
    /// Next ticket id; never rewinds, so tickets from before a reset stay stale
    next_ticket: u64,
}

impl<P: PresentationPort> Engine<P, StdRng> {
    /// Create an engine, seeding the die from the config or from entropy
    pub fn new(config: GameConfig, port: P) -> Result<Self, GameError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, port, rng)
    }
}

impl<P: PresentationPort, R: Rng> Engine<P, R> {
    /// Create an engine with an explicit random source and start a fresh game
    pub fn with_rng(config: GameConfig, port: P, rng: R) -> Result<Self, GameError> {
        config.validate()?;
        let state = GameState::new(config.players.clone());
        let mut engine = Self {
            config,
            state,
            port,
            rng,
            next_ticket: 0,
        };
        engine.reset();
        Ok(engine)
    }

    /// Create an engine that continues from a prepared snapshot
    ///
    /// The snapshot must be at rest (awaiting a roll) and seat the same
    /// players as `config`. The port receives the full snapshot.
    pub fn from_state(
        config: GameConfig,
        state: GameState,
        port: P,
        rng: R,
    ) -> Result<Self, GameError> {
        config.validate()?;
        state.validate()?;
        if state.players != config.players {
            return Err(GameError::InvalidConfig(
                "snapshot seats different players".into(),
            ));
        }
        if state.phase != GamePhase::AwaitingRoll {
            return Err(GameError::InvalidPhase);
        }
        let mut engine = Self {
            config,
            state,
            port,
            rng,
            next_ticket: 0,
        };
        engine.publish_snapshot();
        Ok(engine)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only view of the game state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Dispatch an intent from the presentation layer
    ///
    /// Rejected intents are logged and leave the state untouched.
    pub fn handle(&mut self, intent: Intent) -> Result<(), GameError> {
        let result = match intent {
            Intent::RollRequested => self.roll().map(|_| ()),
            Intent::ResetRequested => {
                self.reset();
                Ok(())
            }
            Intent::PieceInteraction { color, piece } => self.select(color, piece).map(|_| ()),
            Intent::Step { ticket } => self.step(ticket).map(|_| ()),
        };
        if let Err(e) = &result {
            if e.is_fatal() {
                error!(?intent, error = %e, "engine invariant broken");
            } else {
                warn!(?intent, error = %e, "intent rejected");
            }
        }
        result
    }

    /// Start a new game, abandoning any move in flight
    pub fn reset(&mut self) {
        info!("game reset");
        self.state = GameState::new(self.config.players.clone());
        self.publish_snapshot();
    }

    /// Roll the die for the active player
    pub fn roll(&mut self) -> Result<RollOutcome, GameError> {
        if self.state.phase != GamePhase::AwaitingRoll {
            return Err(GameError::InvalidPhase);
        }
        let value = self.rng.gen_range(1..=6);
        self.resolve_roll(value)
    }

    /// Resolve a roll whose value was drawn elsewhere (replays, physical dice)
    pub fn apply_roll(&mut self, value: u8) -> Result<RollOutcome, GameError> {
        if !(1..=6).contains(&value) {
            return Err(GameError::InvalidDieValue(value));
        }
        if self.state.phase != GamePhase::AwaitingRoll {
            return Err(GameError::InvalidPhase);
        }
        self.resolve_roll(value)
    }

    /// Eligible pieces of the active player for the current die value
    pub fn eligible_pieces(&self) -> Vec<PieceIndex> {
        match &self.state.phase {
            GamePhase::RollResolved { eligible } => eligible.clone(),
            _ => Vec::new(),
        }
    }

    /// Select an eligible piece of the active player
    pub fn select(&mut self, color: Color, index: PieceIndex) -> Result<MoveProgress, GameError> {
        let piece = PieceId::new(color, index)?;
        self.state.seat_of(color)?;

        let eligible = match &self.state.phase {
            GamePhase::RollResolved { eligible } => eligible,
            _ => return Err(GameError::InvalidPhase),
        };
        if color != self.state.current_player() {
            return Err(GameError::NotYourTurn);
        }
        if !eligible.contains(&index) {
            return Err(GameError::PieceNotEligible(piece));
        }
        let die = self
            .state
            .dice_value
            .ok_or_else(|| self.invariant("roll resolved without a die value"))?;

        let from = self.state.position(piece)?;
        if from.is_base() {
            // Leaving base is one jump with no capture or win check.
            // The same player keeps the turn.
            let start = Board::start_cell(color);
            self.move_piece(piece, start)?;
            debug!(%piece, "left base");
            self.state.phase = GamePhase::AwaitingRoll;
            self.port.pieces_unhighlighted();
            self.port.dice_enabled(true);
            return Ok(MoveProgress::Completed(MoveOutcome {
                piece,
                landed: start,
                captured: Vec::new(),
                extra_roll: true,
                winner: None,
            }));
        }

        let ticket = MoveTicket::from_raw(self.next_ticket);
        self.next_ticket += 1;
        debug!(%piece, %from, die, ticket = ticket.id(), "move started");
        self.state.phase = GamePhase::MoveInProgress(PendingMove {
            ticket,
            piece,
            steps_remaining: die,
        });
        self.port.pieces_unhighlighted();
        Ok(MoveProgress::InFlight {
            ticket,
            position: from,
            remaining: die,
        })
    }

    /// Advance the in-flight move by one cell
    pub fn step(&mut self, ticket: MoveTicket) -> Result<MoveProgress, GameError> {
        let pending = match &self.state.phase {
            GamePhase::MoveInProgress(pending) if pending.ticket == ticket => pending.clone(),
            _ => return Err(GameError::StaleMove),
        };
        let piece = pending.piece;
        let from = self.state.position(piece)?;
        let next = Board::next_position(piece.color, from).ok_or_else(|| {
            self.invariant(&format!("{} cannot advance from {}", piece, from))
        })?;
        self.move_piece(piece, next)?;

        let remaining = pending.steps_remaining.saturating_sub(1);
        if remaining > 0 {
            self.state.phase = GamePhase::MoveInProgress(PendingMove {
                steps_remaining: remaining,
                ..pending
            });
            return Ok(MoveProgress::InFlight {
                ticket,
                position: next,
                remaining,
            });
        }
        self.finalize_move(piece, next).map(MoveProgress::Completed)
    }

    /// Run the rest of an in-flight move synchronously
    pub fn finish_move(&mut self, ticket: MoveTicket) -> Result<MoveOutcome, GameError> {
        loop {
            if let MoveProgress::Completed(outcome) = self.step(ticket)? {
                return Ok(outcome);
            }
        }
    }

    /// Select a piece and complete its move without animation
    pub fn play(&mut self, color: Color, index: PieceIndex) -> Result<MoveOutcome, GameError> {
        match self.select(color, index)? {
            MoveProgress::Completed(outcome) => Ok(outcome),
            MoveProgress::InFlight { ticket, .. } => self.finish_move(ticket),
        }
    }

    fn resolve_roll(&mut self, value: u8) -> Result<RollOutcome, GameError> {
        let color = self.state.current_player();
        self.state.dice_value = Some(value);
        self.port.dice_value_changed(Some(value));

        let pieces = self.state.eligible_pieces(color, value)?;
        debug!(%color, value, ?pieces, "rolled");

        if pieces.is_empty() {
            self.pass_turn();
            self.state.phase = GamePhase::AwaitingRoll;
            self.port.pieces_unhighlighted();
            self.port.dice_enabled(true);
            return Ok(RollOutcome::TurnPassed {
                value,
                next: self.state.current_player(),
            });
        }

        self.state.phase = GamePhase::RollResolved {
            eligible: pieces.clone(),
        };
        self.port.dice_enabled(false);
        self.port.pieces_unhighlighted();
        self.port.pieces_eligible(color, &pieces);
        Ok(RollOutcome::Eligible { value, pieces })
    }

    fn finalize_move(&mut self, piece: PieceId, landed: Position) -> Result<MoveOutcome, GameError> {
        let color = piece.color;
        let die = self
            .state
            .dice_value
            .ok_or_else(|| self.invariant("move finished without a die value"))?;

        if self.state.has_won(color) {
            info!(%color, "player won");
            self.port.player_won(color);
            self.reset();
            return Ok(MoveOutcome {
                piece,
                landed,
                captured: Vec::new(),
                extra_roll: false,
                winner: Some(color),
            });
        }

        let captured = if Board::is_safe(landed) {
            Vec::new()
        } else {
            self.state.opponents_at(color, landed)
        };
        for victim in &captured {
            info!(%piece, %victim, %landed, "captured");
            self.move_piece(*victim, Board::base_slot(victim.index))?;
        }

        let extra_roll = !captured.is_empty() || die == 6;
        if !extra_roll {
            self.pass_turn();
        }
        self.state.phase = GamePhase::AwaitingRoll;
        self.port.pieces_unhighlighted();
        self.port.dice_enabled(true);

        Ok(MoveOutcome {
            piece,
            landed,
            captured,
            extra_roll,
            winner: None,
        })
    }

    fn pass_turn(&mut self) {
        self.state.advance_turn();
        let next = self.state.current_player();
        debug!(%next, "turn passed");
        self.port.active_player_changed(next);
    }

    fn move_piece(&mut self, piece: PieceId, pos: Position) -> Result<(), GameError> {
        self.state.set_position(piece, pos)?;
        self.port.piece_position_changed(piece.color, piece.index, pos);
        Ok(())
    }

    /// Tell the port about every field of the current state
    fn publish_snapshot(&mut self) {
        for (color, pieces) in self.state.players.iter().zip(&self.state.positions) {
            for (index, pos) in pieces.iter().enumerate() {
                self.port
                    .piece_position_changed(*color, index as PieceIndex, *pos);
            }
        }
        self.port.dice_value_changed(self.state.dice_value);
        self.port.active_player_changed(self.state.current_player());
        self.port.pieces_unhighlighted();
        self.port.dice_enabled(true);
    }

    fn invariant(&self, what: &str) -> GameError {
        error!(what, "invariant violated");
        GameError::InvariantViolated(what.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::GameEvent;
    use crate::port::EventLog;

    fn two_player() -> Engine<EventLog> {
        let config = GameConfig::default().with_seed(7);
        let mut engine = Engine::new(config, EventLog::new()).unwrap();
        engine.port_mut().clear();
        engine
    }

    fn place(engine: &mut Engine<EventLog>, color: Color, index: PieceIndex, pos: Position) {
        let piece = PieceId::new(color, index).unwrap();
        engine.state.set_position(piece, pos).unwrap();
    }

    #[test]
    fn test_new_engine_publishes_initial_state() {
        let engine = Engine::new(GameConfig::default().with_seed(1), EventLog::new()).unwrap();
        let events = engine.port().events();
        let moves = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PiecePositionChanged { .. }))
            .count();
        assert_eq!(moves, 8);
        assert!(events.contains(&GameEvent::ActivePlayerChanged { color: Color::Blue }));
        assert_eq!(events.last(), Some(&GameEvent::DiceEnabled { enabled: true }));
    }

    #[test]
    fn test_seeded_rolls_are_reproducible() {
        let mut a = two_player();
        let mut b = two_player();
        for _ in 0..20 {
            let ra = a.roll().unwrap();
            let rb = b.roll().unwrap();
            assert_eq!(ra, rb);
            assert!((1..=6).contains(&ra.value()));
            a.reset();
            b.reset();
        }
    }

    #[test]
    fn test_wasted_roll_passes_turn() {
        let mut engine = two_player();
        let outcome = engine.apply_roll(3).unwrap();
        assert_eq!(
            outcome,
            RollOutcome::TurnPassed {
                value: 3,
                next: Color::Green
            }
        );
        assert_eq!(engine.state().turn, 1);
        assert_eq!(engine.state().phase, GamePhase::AwaitingRoll);
    }

    #[test]
    fn test_roll_rejected_while_resolved() {
        let mut engine = two_player();
        engine.apply_roll(6).unwrap();
        assert_eq!(engine.roll(), Err(GameError::InvalidPhase));
        assert_eq!(engine.apply_roll(9), Err(GameError::InvalidDieValue(9)));
    }

    #[test]
    fn test_base_exit_lands_on_start_and_keeps_turn() {
        let mut engine = two_player();
        engine.apply_roll(6).unwrap();
        let outcome = engine.play(Color::Blue, 2).unwrap();
        assert_eq!(outcome.landed, Position::Track(0));
        assert!(outcome.extra_roll);
        assert_eq!(engine.state().turn, 0);
        assert_eq!(engine.state().phase, GamePhase::AwaitingRoll);
    }

    #[test]
    fn test_select_rejects_bad_requests_without_change() {
        let mut engine = two_player();
        engine.apply_roll(6).unwrap();
        let before = engine.state().clone();

        assert_eq!(
            engine.select(Color::Green, 0),
            Err(GameError::NotYourTurn)
        );
        assert_eq!(
            engine.select(Color::Blue, 7),
            Err(GameError::NoSuchPiece {
                color: Color::Blue,
                index: 7
            })
        );
        assert_eq!(
            engine.select(Color::Red, 0),
            Err(GameError::UnknownPlayer(Color::Red))
        );
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_ineligible_piece_rejected() {
        let mut engine = two_player();
        place(&mut engine, Color::Blue, 0, Position::Track(5));
        engine.apply_roll(4).unwrap();
        assert_eq!(engine.eligible_pieces(), vec![0]);
        let err = engine.select(Color::Blue, 1).unwrap_err();
        assert!(matches!(err, GameError::PieceNotEligible(_)));
    }

    #[test]
    fn test_stepwise_move_and_stale_ticket() {
        let mut engine = two_player();
        place(&mut engine, Color::Blue, 0, Position::Track(5));
        engine.apply_roll(3).unwrap();

        let ticket = match engine.select(Color::Blue, 0).unwrap() {
            MoveProgress::InFlight { ticket, remaining, .. } => {
                assert_eq!(remaining, 3);
                ticket
            }
            other => panic!("expected in-flight move, got {:?}", other),
        };
        assert_eq!(engine.roll(), Err(GameError::InvalidPhase));
        assert!(matches!(
            engine.step(ticket).unwrap(),
            MoveProgress::InFlight {
                position: Position::Track(6),
                remaining: 2,
                ..
            }
        ));

        engine.reset();
        assert_eq!(engine.step(ticket), Err(GameError::StaleMove));
        assert_eq!(
            engine.state().pieces(Color::Blue).unwrap()[0],
            Position::Base(0)
        );
    }

    #[test]
    fn test_turn_passes_without_six_or_capture() {
        let mut engine = two_player();
        place(&mut engine, Color::Blue, 0, Position::Track(5));
        engine.apply_roll(2).unwrap();
        let outcome = engine.play(Color::Blue, 0).unwrap();
        assert_eq!(outcome.landed, Position::Track(7));
        assert!(!outcome.extra_roll);
        assert_eq!(engine.state().current_player(), Color::Green);
    }

    #[test]
    fn test_six_grants_another_roll() {
        let mut engine = two_player();
        place(&mut engine, Color::Blue, 0, Position::Track(5));
        engine.apply_roll(6).unwrap();
        let outcome = engine.play(Color::Blue, 0).unwrap();
        assert_eq!(outcome.landed, Position::Track(11));
        assert!(outcome.extra_roll);
        assert_eq!(engine.state().current_player(), Color::Blue);
    }

    #[test]
    fn test_capture_on_safe_cell_is_suppressed() {
        let mut engine = two_player();
        place(&mut engine, Color::Blue, 0, Position::Track(4));
        place(&mut engine, Color::Green, 1, Position::Track(8));
        engine.apply_roll(4).unwrap();
        let outcome = engine.play(Color::Blue, 0).unwrap();
        assert!(outcome.captured.is_empty());
        assert_eq!(
            engine.state().pieces(Color::Green).unwrap()[1],
            Position::Track(8)
        );
        assert_eq!(engine.state().current_player(), Color::Green);
    }

    #[test]
    fn test_win_resets_game() {
        let mut engine = two_player();
        for i in 0..3 {
            place(&mut engine, Color::Blue, i, Position::Home);
        }
        place(&mut engine, Color::Blue, 3, Position::Lane(3));
        engine.apply_roll(2).unwrap();
        let outcome = engine.play(Color::Blue, 3).unwrap();

        assert_eq!(outcome.winner, Some(Color::Blue));
        assert_eq!(engine.state(), &GameState::new(vec![Color::Blue, Color::Green]));
        assert!(engine
            .port()
            .events()
            .contains(&GameEvent::PlayerWon { color: Color::Blue }));
    }

    #[test]
    fn test_handle_ignores_invalid_reference() {
        let mut engine = two_player();
        let before = engine.state().clone();
        let result = engine.handle(Intent::PieceInteraction {
            color: Color::Yellow,
            piece: 9,
        });
        assert!(result.is_err());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_from_state_rejects_mismatched_seating() {
        let state = GameState::new(vec![Color::Red, Color::Yellow]);
        let result = Engine::from_state(
            GameConfig::default(),
            state,
            EventLog::new(),
            StdRng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));
    }
}
