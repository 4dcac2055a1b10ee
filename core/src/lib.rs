pub mod context;
pub mod game;
pub mod service;
pub mod task;
pub mod timers;

// Re-exports for convenience
pub use context::{ConfigError, GameConfig, GameConfigExt, ServiceError};
pub use game::{BoardSurface, Phase, PressKind, Simon, Status, Tile, TileClass, ToneId, ToneOutput};
pub use service::{GameHandle, GameInput, GameService};
pub use task::{Task, TaskHost, do_all_pending};
pub use timers::{TimerCommand, TimerFired, TimerId, TimerService, TimerWorker};
