mod config;
mod error;

pub use config::{CONFIG_NAME, GameConfig, GameConfigExt, PROGRAM_NAME};
pub use error::{ConfigError, ServiceError};
