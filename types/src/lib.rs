//! Shared configuration types for Simon
//!
//! This crate contains serializable configuration types that are shared between
//! the game kernel (simon-core) and the terminal front end (simon-cli).
//! Every field has a default so partial config files load cleanly.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Game Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration for a game session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Round playback timing
    pub playback: PlaybackConfig,

    /// Player input window timing
    pub input: InputConfig,

    /// Game-over beep and reset
    pub game_over: GameOverConfig,

    /// Fixed RNG seed for reproducible sequences (random when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Timing of the sequence presentation.
///
/// Longer sequences play faster: rounds below `medium_from_round` use the slow
/// interval, rounds from `fast_from_round` on use the fast one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Pause before the first tile of a round lights up
    pub initial_delay_ms: u64,
    pub slow_interval_ms: u64,
    pub medium_interval_ms: u64,
    pub fast_interval_ms: u64,
    /// First round played at the medium interval
    pub medium_from_round: usize,
    /// First round played at the fast interval
    pub fast_from_round: usize,
    /// A lit tile goes dark this long before the next step
    pub unlight_lead_ms: u64,
    /// A tile's tone stops this long before the next step
    pub tone_lead_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 800,
            slow_interval_ms: 470,
            medium_interval_ms: 370,
            fast_interval_ms: 270,
            medium_from_round: 6,
            fast_from_round: 14,
            unlight_lead_ms: 100,
            tone_lead_ms: 50,
        }
    }
}

impl PlaybackConfig {
    /// Step interval for a round (1-based round number = sequence length).
    pub fn interval_for_round(&self, round: usize) -> u64 {
        if round >= self.fast_from_round {
            self.fast_interval_ms
        } else if round >= self.medium_from_round {
            self.medium_interval_ms
        } else {
            self.slow_interval_ms
        }
    }
}

/// Timing of the player's input window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Grace period before an idle player loses ("waste of time")
    pub waste_of_time_ms: u64,
    /// How long a correctly pressed tile keeps sounding after release
    pub release_tone_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            waste_of_time_ms: 3000,
            release_tone_ms: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOverConfig {
    /// Delay before pending visuals and tones are flushed after a loss
    pub reset_delay_ms: u64,
    /// Frequency of the game-over buzz in Hz
    pub beep_frequency: f64,
}

impl Default for GameOverConfig {
    fn default() -> Self {
        Self {
            reset_delay_ms: 1500,
            beep_frequency: 42.0,
        }
    }
}
