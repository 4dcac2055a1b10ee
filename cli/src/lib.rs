pub mod commands;
pub mod context;
pub mod logging;
pub mod repl;
pub mod terminal;

pub use context::CliContext;
pub use repl::readline;
pub use terminal::{TerminalBoard, TerminalTones};
