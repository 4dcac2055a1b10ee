//! Simon game controller
//!
//! Drives round presentation, the player's input window and the
//! timeout/game-over logic entirely through timers and tasks:
//!
//! ```text
//! Idle ──start──▶ Presenting ──last tile shown──▶ AwaitingInput
//!                     ▲                              │   │
//!                     └──── whole sequence replayed ─┘   │ wrong tile / 3s idle
//!                                                        ▼
//!            Idle ◀──reset delay── GameOver ◀────────────┘
//! ```
//!
//! Every piece of deferred cleanup (un-lighting, un-pressing, silencing tones,
//! cancelling the idle timeout) is a pending [`Task`], so draining the registry
//! leaves the board quiet and no stale timer can reach the next round.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simon_types::GameConfig;

use super::surface::{BoardSurface, Status, ToneId, ToneOutput};
use super::tile::{Tile, TileClass};
use crate::task::{Task, TaskHost, TaskRegistry, do_all_pending};
use crate::timers::{CommandSender, TimerFired, TimerHost, TimerId, TimerService, dispatch};

/// Where the game currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No game running
    Idle,
    /// Sequence playback; input is ignored
    Presenting,
    /// Player must replay the sequence
    AwaitingInput,
    /// Lost; returns to Idle after the reset delay
    GameOver,
}

/// How a press was made. Touch presses skip the transition effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressKind {
    #[default]
    Mouse,
    Touch,
}

pub struct Simon<B, A> {
    config: GameConfig,
    timers: TimerService<Simon<B, A>>,
    tasks: TaskRegistry<Simon<B, A>>,
    board: B,
    tones: A,
    rng: StdRng,

    // ─── Sequence ───────────────────────────────────────────────────────────
    sequence: Vec<Tile>,
    seq_index: usize,
    board_ready: bool,
    phase: Phase,

    // ─── Pending work ───────────────────────────────────────────────────────
    /// Stops the current round's playback timer
    playback_stop: Option<Task>,
    /// Un-presses the held tile; set while a correct press awaits release
    release_task: Option<Task>,
    /// Disconnects the most recent tone
    stop_beep_task: Option<Task>,
    /// Armed idle timeout during the input window
    waste_timer: Option<TimerId>,
}

impl<B: BoardSurface + 'static, A: ToneOutput + 'static> TimerHost for Simon<B, A> {
    fn timers(&mut self) -> &mut TimerService<Self> {
        &mut self.timers
    }
}

impl<B: BoardSurface + 'static, A: ToneOutput + 'static> TaskHost for Simon<B, A> {
    fn tasks(&mut self) -> &mut TaskRegistry<Self> {
        &mut self.tasks
    }
}

impl<B: BoardSurface + 'static, A: ToneOutput + 'static> Simon<B, A> {
    pub fn new(config: GameConfig, mut board: B, tones: A, commands: CommandSender) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        board.show_status(Status::Hello, false);

        Self {
            config,
            timers: TimerService::new(commands),
            tasks: TaskRegistry::new(),
            board,
            tones,
            rng,
            sequence: Vec::new(),
            seq_index: 0,
            board_ready: false,
            phase: Phase::Idle,
            playback_stop: None,
            release_task: None,
            stop_beep_task: None,
            waste_timer: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Player Input
    // ─────────────────────────────────────────────────────────────────────────

    /// Start button: flush everything pending and begin a fresh sequence.
    pub fn start(&mut self) {
        tracing::info!("new game");
        do_all_pending(self);
        self.sequence.clear();
        self.next_round();
    }

    /// Engaged press on a tile.
    ///
    /// Ignored unless the board is ready and no earlier press awaits release.
    pub fn press(&mut self, tile: Tile, kind: PressKind) {
        if !self.board_ready || self.release_task.is_some() {
            tracing::trace!(%tile, ready = self.board_ready, "press ignored");
            return;
        }

        do_all_pending(self);
        self.board.add_class(tile, TileClass::Down);
        if kind == PressKind::Mouse {
            self.board.add_class(tile, TileClass::Smooth);
        }

        let expected = self.sequence.get(self.seq_index).copied();
        self.seq_index += 1;

        if expected == Some(tile) {
            tracing::debug!(%tile, step = self.seq_index, "correct tile");
            let tone = self.start_beep(tile.frequency());
            let release_tone = ms(self.config.input.release_tone_ms);
            let release = Task::create(self, move |game: &mut Self| {
                game.board.remove_class(tile, TileClass::Down);
                game.board.remove_class(tile, TileClass::Smooth);
                game.tones.stop(tone, release_tone);
                game.release_task = None;
            });
            self.release_task = Some(release);
        } else {
            tracing::info!(%tile, ?expected, round = self.round(), "wrong tile");
            Task::create(self, move |game: &mut Self| {
                game.board.remove_class(tile, TileClass::Down);
                game.board.remove_class(tile, TileClass::Smooth);
            });
            self.game_over();
        }
    }

    /// Mouse up, touch end, or the pointer leaving the held tile.
    pub fn release(&mut self) {
        let Some(release) = self.release_task else {
            return;
        };
        release.do_now(self);

        if self.seq_index < self.sequence.len() {
            self.start_waste_of_time();
        } else {
            tracing::info!(round = self.round(), "round complete");
            self.next_round();
        }
    }

    /// Route a timer worker notification to its callback.
    pub fn on_timer(&mut self, fired: TimerFired) {
        dispatch(self, fired);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current round number (sequence length)
    pub fn round(&self) -> usize {
        self.sequence.len()
    }

    pub fn sequence(&self) -> &[Tile] {
        &self.sequence
    }

    pub fn seq_index(&self) -> usize {
        self.seq_index
    }

    pub fn board_ready(&self) -> bool {
        self.board_ready
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn tones(&self) -> &A {
        &self.tones
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn outstanding_timers(&self) -> usize {
        self.timers.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Round Flow
    // ─────────────────────────────────────────────────────────────────────────

    fn next_round(&mut self) {
        self.seq_index = 0;
        self.phase = Phase::Presenting;
        self.set_board_status(false, Status::Look);

        let tile = self.random_tile();
        self.sequence.push(tile);
        let round = self.sequence.len();
        self.board.show_round(round);

        let interval = self.config.playback.interval_for_round(round);
        let initial_delay = ms(self.config.playback.initial_delay_ms);
        tracing::info!(round, interval_ms = interval, "presenting round");

        let timer = self.timers.schedule_repeating(
            initial_delay,
            ms(interval),
            move |game: &mut Self| game.present_step(round, interval),
        );
        let stop = Task::create(self, move |game: &mut Self| game.timers.cancel(timer));
        self.playback_stop = Some(stop);
    }

    /// One playback tick: show the next tile, or open the input window.
    fn present_step(&mut self, round: usize, interval: u64) {
        let next = self.sequence.get(self.seq_index).copied();
        match next {
            Some(tile) if self.seq_index < round => {
                self.seq_index += 1;
                tracing::trace!(%tile, step = self.seq_index, "showing tile");

                let tone = self.start_beep(tile.frequency());
                let tone_lead = self.config.playback.tone_lead_ms;
                self.tones.stop(tone, ms(interval.saturating_sub(tone_lead)));

                self.board.add_class(tile, TileClass::Lit);
                let unlight_after = ms(interval.saturating_sub(self.config.playback.unlight_lead_ms));
                let unlight = Task::create(self, move |game: &mut Self| {
                    game.board.remove_class(tile, TileClass::Lit);
                });
                unlight.do_after(self, unlight_after);
            }
            _ => {
                if let Some(stop) = self.playback_stop.take() {
                    stop.do_now(self);
                }
                self.open_input_window();
            }
        }
    }

    fn open_input_window(&mut self) {
        self.seq_index = 0;
        self.phase = Phase::AwaitingInput;
        self.start_waste_of_time();
        self.set_board_status(true, Status::Play);
    }

    /// Arm the idle timeout; any press drains its cancel task.
    fn start_waste_of_time(&mut self) {
        let delay = ms(self.config.input.waste_of_time_ms);
        let timer = self.timers.schedule_once(delay, |game: &mut Self| {
            game.waste_timer = None;
            game.waste_of_time_elapsed();
        });
        self.waste_timer = Some(timer);

        Task::create(self, move |game: &mut Self| {
            if game.waste_timer == Some(timer) {
                game.waste_timer = None;
                game.timers.cancel(timer);
            }
        });
    }

    fn waste_of_time_elapsed(&mut self) {
        tracing::info!(round = self.round(), step = self.seq_index, "player timed out");
        if let Some(&tile) = self.sequence.get(self.seq_index) {
            self.board.add_class(tile, TileClass::Lit);
            Task::create(self, move |game: &mut Self| {
                game.board.remove_class(tile, TileClass::Lit);
            });
        }
        self.game_over();
    }

    fn game_over(&mut self) {
        tracing::info!(round = self.round(), "game over");
        self.start_beep(self.config.game_over.beep_frequency);
        self.phase = Phase::GameOver;
        self.set_board_status(false, Status::GameOver);

        let reset_delay = ms(self.config.game_over.reset_delay_ms);
        let reset = Task::create(self, |game: &mut Self| {
            do_all_pending(game);
            game.phase = Phase::Idle;
        });
        reset.do_after(self, reset_delay);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Start a tone, disconnecting the previous one first.
    fn start_beep(&mut self, frequency: f64) -> ToneId {
        if let Some(previous) = self.stop_beep_task {
            previous.do_now(self);
        }
        let tone = self.tones.start(frequency);
        let disconnect = Task::create(self, move |game: &mut Self| {
            game.tones.disconnect(tone);
            game.stop_beep_task = None;
        });
        self.stop_beep_task = Some(disconnect);
        tone
    }

    fn set_board_status(&mut self, ready: bool, status: Status) {
        self.board_ready = ready;
        self.board.show_status(status, ready);
    }

    fn random_tile(&mut self) -> Tile {
        Tile::ALL[self.rng.random_range(0..Tile::ALL.len())]
    }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
