//! Capabilities the controller drives: the visible board and tone output
//!
//! Front ends implement these; the controller never renders or synthesizes
//! anything itself.

use std::time::Duration;

use super::tile::{Tile, TileClass};

/// Status line shown under the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Hello,
    /// Sequence is being presented
    Look,
    /// Player's turn
    Play,
    GameOver,
}

impl Status {
    pub fn text(self) -> &'static str {
        match self {
            Status::Hello => "Hello",
            Status::Look => "Look",
            Status::Play => "Play",
            Status::GameOver => "Game over",
        }
    }

    /// Highlight colour, if the status has one
    pub fn color(self) -> Option<&'static str> {
        match self {
            Status::GameOver => Some("#A33"),
            _ => None,
        }
    }
}

/// Rendering side of the game board.
pub trait BoardSurface {
    fn show_round(&mut self, round: usize);

    /// `ready` toggles the board's accepting-input look
    fn show_status(&mut self, status: Status, ready: bool);

    fn add_class(&mut self, tile: Tile, class: TileClass);

    fn remove_class(&mut self, tile: Tile, class: TileClass);
}

/// Identifies one started tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToneId(pub u64);

/// Square-wave tone source.
pub trait ToneOutput {
    /// Start a tone immediately.
    fn start(&mut self, frequency: f64) -> ToneId;

    /// Stop the tone `after` from now; the output schedules this itself.
    fn stop(&mut self, tone: ToneId, after: Duration);

    /// Release the tone; silences it if still playing.
    fn disconnect(&mut self, tone: ToneId);
}
