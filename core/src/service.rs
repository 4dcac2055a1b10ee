//! Game service: the single thread of game control
//!
//! Owns the [`Simon`] controller and multiplexes player input from any number of
//! [`GameHandle`]s with firing notifications from the timer worker. Every
//! handler runs to completion before the next message is taken, so game state
//! needs no locks.

use simon_types::GameConfig;
use tokio::sync::mpsc;

use crate::context::ServiceError;
use crate::game::{BoardSurface, PressKind, Simon, Tile, ToneOutput};
use crate::timers::{FiredReceiver, TimerWorker};

/// Player input forwarded to the game service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInput {
    Start,
    Press { tile: Tile, kind: PressKind },
    Release,
    Shutdown,
}

/// Cloneable sender used by front ends.
#[derive(Debug, Clone)]
pub struct GameHandle {
    input_tx: mpsc::Sender<GameInput>,
}

impl GameHandle {
    /// Start button
    pub async fn start(&self) -> Result<(), ServiceError> {
        self.send(GameInput::Start).await
    }

    pub async fn press(&self, tile: Tile, kind: PressKind) -> Result<(), ServiceError> {
        self.send(GameInput::Press { tile, kind }).await
    }

    pub async fn release(&self) -> Result<(), ServiceError> {
        self.send(GameInput::Release).await
    }

    /// Ask the service to stop; it returns the controller from `run`.
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        self.send(GameInput::Shutdown).await
    }

    async fn send(&self, input: GameInput) -> Result<(), ServiceError> {
        self.input_tx
            .send(input)
            .await
            .map_err(|_| ServiceError::Stopped)
    }
}

pub struct GameService<B, A> {
    game: Simon<B, A>,
    input_rx: mpsc::Receiver<GameInput>,
    fired_rx: FiredReceiver,
    worker: TimerWorker,
}

impl<B, A> GameService<B, A>
where
    B: BoardSurface + Send + 'static,
    A: ToneOutput + Send + 'static,
{
    pub fn new(config: GameConfig, board: B, tones: A) -> (Self, GameHandle) {
        let (input_tx, input_rx) = mpsc::channel(32);
        let (worker, commands, fired_rx) = TimerWorker::new();
        let game = Simon::new(config, board, tones, commands);

        let service = Self {
            game,
            input_rx,
            fired_rx,
            worker,
        };
        (service, GameHandle { input_tx })
    }

    /// Run until shutdown or until every handle is dropped.
    ///
    /// Returns the controller so callers can inspect where the game ended.
    pub async fn run(self) -> Simon<B, A> {
        let Self {
            mut game,
            mut input_rx,
            mut fired_rx,
            worker,
        } = self;

        let worker_handle = tokio::spawn(worker.run());
        tracing::debug!("game service started");

        loop {
            tokio::select! {
                input = input_rx.recv() => match input {
                    Some(GameInput::Shutdown) | None => break,
                    Some(input) => handle_input(&mut game, input),
                },
                Some(fired) = fired_rx.recv() => game.on_timer(fired),
            }
        }

        worker_handle.abort();
        let _ = worker_handle.await;
        tracing::debug!(phase = ?game.phase(), round = game.round(), "game service stopped");
        game
    }
}

fn handle_input<B, A>(game: &mut Simon<B, A>, input: GameInput)
where
    B: BoardSurface + 'static,
    A: ToneOutput + 'static,
{
    tracing::trace!(?input, "game input");
    match input {
        GameInput::Start => game.start(),
        GameInput::Press { tile, kind } => game.press(tile, kind),
        GameInput::Release => game.release(),
        GameInput::Shutdown => {}
    }
}
