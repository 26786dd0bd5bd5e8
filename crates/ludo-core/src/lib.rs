//! Ludo rules engine
//!
//! This crate provides the game logic for a two-to-four player Ludo game:
//! - Fixed board topology with a shared track and private home lanes
//! - Passive game state with piece positions, turn and die value
//! - A rules engine that rolls, validates selections, advances pieces
//!   step by step, resolves captures and detects victory
//! - A presentation port through which the engine reports every change
//!
//! # Architecture
//!
//! The engine never renders anything. A presentation layer implements
//! [`PresentationPort`], forwards player intents, and drives animated moves
//! by calling [`Engine::step`] on a timer. It can be compiled to:
//! - Native Rust for terminal frontends and tests
//! - WebAssembly for a browser frontend (`wasm` feature)
//!
//! # Modules
//!
//! - [`board`]: Positions and the fixed four-color board
//! - [`player`]: Colors and piece identifiers
//! - [`game`]: Game state, phases and errors
//! - [`engine`]: The rules engine state machine
//! - [`port`]: Notification trait and an event-recording implementation
//! - [`actions`]: Intents and events as serializable data
//! - [`config`]: Game configuration

pub mod actions;
pub mod board;
pub mod config;
pub mod engine;
pub mod game;
pub mod player;
pub mod port;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameEvent, Intent};
pub use board::{Board, ColorLayout, Position, LANE_LEN, SAFE_CELLS, TRACK_LEN};
pub use config::GameConfig;
pub use engine::{Engine, MoveOutcome, MoveProgress, RollOutcome};
pub use game::{GameError, GamePhase, GameState, MoveTicket, PendingMove};
pub use player::{Color, PieceId, PieceIndex, PIECES_PER_PLAYER};
pub use port::{EventLog, PresentationPort};
