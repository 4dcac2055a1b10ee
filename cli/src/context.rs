use simon_core::{GameConfig, GameHandle};
use std::path::PathBuf;

/// Holds all shared state for the CLI application.
#[derive(Clone)]
pub struct CliContext {
    pub config: GameConfig,
    /// Explicit config file, or None when using the confy default location
    pub config_path: Option<PathBuf>,
    pub game: GameHandle,
}

impl CliContext {
    pub fn new(config: GameConfig, config_path: Option<PathBuf>, game: GameHandle) -> Self {
        Self {
            config,
            config_path,
            game,
        }
    }
}
