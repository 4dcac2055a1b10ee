//! Terminal front end for the board and tone capabilities
//!
//! The board prints what a player would see; tones are only logged.

use std::time::Duration;

use simon_core::{BoardSurface, Status, Tile, TileClass, ToneId, ToneOutput};

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Prints round, status and tile changes to stdout.
#[derive(Debug, Default)]
pub struct TerminalBoard {
    lit: [bool; 4],
    down: [bool; 4],
}

impl TerminalBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-line picture of the four tiles: lit tiles in capitals, pressed in brackets.
    pub fn render(&self) -> String {
        Tile::ALL
            .iter()
            .map(|tile| {
                let i = tile.index();
                let name = if self.lit[i] {
                    tile.name().to_uppercase()
                } else {
                    tile.name().to_string()
                };
                if self.down[i] { format!("[{name}]") } else { format!(" {name} ") }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn set(&mut self, tile: Tile, class: TileClass, on: bool) -> bool {
        let slot = match class {
            TileClass::Lit => &mut self.lit[tile.index()],
            TileClass::Down => &mut self.down[tile.index()],
            TileClass::Smooth => return false,
        };
        let changed = *slot != on;
        *slot = on;
        changed
    }
}

impl BoardSurface for TerminalBoard {
    fn show_round(&mut self, round: usize) {
        println!("\nround {round}");
    }

    fn show_status(&mut self, status: Status, ready: bool) {
        let text = match status.color() {
            Some(_) => format!("{RED}{}{RESET}", status.text()),
            None => status.text().to_string(),
        };
        if ready {
            println!("{text} (press, release or tap a tile)");
        } else {
            println!("{text}");
        }
    }

    fn add_class(&mut self, tile: Tile, class: TileClass) {
        if self.set(tile, class, true) {
            println!("  {}", self.render());
        }
    }

    fn remove_class(&mut self, tile: Tile, class: TileClass) {
        if self.set(tile, class, false) {
            tracing::trace!(%tile, ?class, "tile class removed");
        }
    }
}

/// Allocates tone ids and logs tone lifetimes.
#[derive(Debug, Default)]
pub struct TerminalTones {
    last_id: u64,
}

impl TerminalTones {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ToneOutput for TerminalTones {
    fn start(&mut self, frequency: f64) -> ToneId {
        self.last_id += 1;
        let tone = ToneId(self.last_id);
        tracing::debug!(tone = tone.0, frequency, "tone started");
        tone
    }

    fn stop(&mut self, tone: ToneId, after: Duration) {
        tracing::debug!(tone = tone.0, ?after, "tone stop scheduled");
    }

    fn disconnect(&mut self, tone: ToneId) {
        tracing::debug!(tone = tone.0, "tone disconnected");
    }
}
