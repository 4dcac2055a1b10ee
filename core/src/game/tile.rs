//! Board tiles

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One of the four coloured tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Green,
    Red,
    Yellow,
    Blue,
}

impl Tile {
    /// Board order: top-left, top-right, bottom-left, bottom-right
    pub const ALL: [Tile; 4] = [Tile::Green, Tile::Red, Tile::Yellow, Tile::Blue];

    pub fn name(self) -> &'static str {
        match self {
            Tile::Green => "green",
            Tile::Red => "red",
            Tile::Yellow => "yellow",
            Tile::Blue => "blue",
        }
    }

    /// Tone played while the tile is lit or held, in Hz
    pub fn frequency(self) -> f64 {
        match self {
            Tile::Green => 415.305,
            Tile::Red => 311.127,
            Tile::Yellow => 246.942,
            Tile::Blue => 207.652,
        }
    }

    /// Colour of the tile while lit or held down
    pub fn lit_color(self) -> &'static str {
        match self {
            Tile::Green => "#9F4",
            Tile::Red => "#F44",
            Tile::Yellow => "#FF4",
            Tile::Blue => "#49F",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tile '{0}' (expected green, red, yellow or blue)")]
pub struct TileParseError(pub String);

impl FromStr for Tile {
    type Err = TileParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" | "g" => Ok(Tile::Green),
            "red" | "r" => Ok(Tile::Red),
            "yellow" | "y" => Ok(Tile::Yellow),
            "blue" | "b" => Ok(Tile::Blue),
            _ => Err(TileParseError(s.to_string())),
        }
    }
}

/// Visual state toggled on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileClass {
    /// Shown during playback or as the timeout hint
    Lit,
    /// Held by the player
    Down,
    /// Animated transition; mouse presses only
    Smooth,
}
