//! The Simon game: tiles, front-end capabilities and the controller

mod controller;
mod surface;
mod tile;


pub use controller::{Phase, PressKind, Simon};
pub use surface::{BoardSurface, Status, ToneId, ToneOutput};
pub use tile::{Tile, TileClass, TileParseError};
