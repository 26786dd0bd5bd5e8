//! Terminal game session: input loop and step animation.

use crate::command::Command;
use crate::terminal::TerminalPort;
use ludo_core::{Engine, GameConfig, GameError, Intent, MoveTicket};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

/// Whether the input loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Timer for the move in flight.
#[derive(Debug, Clone, Copy)]
struct StepTimer {
    ticket: MoveTicket,
    next_at: Instant,
    period: Duration,
}

/// One game played at the terminal.
pub struct Session<W: Write> {
    engine: Engine<TerminalPort<W>>,
    timer: Option<StepTimer>,
}

impl<W: Write> Session<W> {
    pub fn new(config: GameConfig, out: W) -> anyhow::Result<Self> {
        let mut engine = Engine::new(config, TerminalPort::new(out))?;
        engine.port_mut().say(Command::HELP);
        Ok(Self {
            engine,
            timer: None,
        })
    }

    pub fn engine(&self) -> &Engine<TerminalPort<W>> {
        &self.engine
    }

    /// Ticket of the animated move the timer is driving
    pub fn animating(&self) -> Option<MoveTicket> {
        self.timer.map(|t| t.ticket)
    }

    /// Apply one typed command
    pub fn apply(&mut self, command: Command) -> anyhow::Result<Flow> {
        let result = match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => {
                self.engine.port_mut().say(Command::HELP);
                Ok(())
            }
            Command::Show => {
                let state = self.engine.state().clone();
                self.engine.port_mut().render(&state);
                Ok(())
            }
            Command::Dump => {
                let json = serde_json::to_string_pretty(self.engine.state())?;
                self.engine.port_mut().say(json);
                Ok(())
            }
            Command::Roll => {
                if self.engine.port().is_dice_enabled() {
                    self.engine.handle(Intent::RollRequested)
                } else {
                    self.engine.port_mut().say("the die is not available right now");
                    Ok(())
                }
            }
            Command::Move(piece) => {
                let color = self.engine.state().current_player();
                if self.engine.port().can_select(color, piece) {
                    self.engine.handle(Intent::PieceInteraction { color, piece })
                } else {
                    self.engine
                        .port_mut()
                        .say(format!("piece {} cannot move now", piece + 1));
                    Ok(())
                }
            }
            Command::Reset => self.engine.handle(Intent::ResetRequested),
        };
        self.check(result)?;
        self.sync_timer();
        Ok(Flow::Continue)
    }

    /// Advance the animated move by one cell
    pub fn tick(&mut self) -> anyhow::Result<()> {
        let Some(timer) = self.timer.as_mut() else {
            return Ok(());
        };
        let ticket = timer.ticket;
        timer.next_at = Instant::now() + timer.period;
        let result = self.engine.handle(Intent::Step { ticket });
        self.check(result)?;
        self.sync_timer();
        Ok(())
    }

    /// Read commands until input ends or the player quits
    pub async fn run<R: AsyncBufRead + Unpin>(mut self, input: R) -> anyhow::Result<()> {
        let mut lines = input.lines();
        loop {
            let deadline = self.timer.map(|t| t.next_at);
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    match line.parse::<Command>() {
                        Ok(command) => {
                            if self.apply(command)? == Flow::Quit {
                                break;
                            }
                        }
                        Err(e) => self.engine.port_mut().say(e),
                    }
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.tick()?;
                }
            }
        }
        info!("session ended");
        Ok(())
    }

    /// Only invariant violations end the session
    fn check(&mut self, result: Result<(), GameError>) -> anyhow::Result<()> {
        match result {
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                self.engine.port_mut().say(e);
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }

    /// Follow the engine's pending move; a reset leaves nothing to follow
    fn sync_timer(&mut self) {
        let pending = self.engine.state().pending_move().map(|m| m.ticket);
        match (pending, self.timer) {
            (None, Some(old)) => {
                debug!(ticket = old.ticket.id(), "animation stopped");
                self.timer = None;
            }
            (Some(ticket), current) if current.map(|t| t.ticket) != Some(ticket) => {
                let period = self.engine.config().step_interval();
                self.timer = Some(StepTimer {
                    ticket,
                    next_at: Instant::now() + period,
                    period,
                });
            }
            _ => {}
        }
    }
}
