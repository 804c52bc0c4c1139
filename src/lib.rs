//! Robo Blitz - a timed target-elimination arcade game
//!
//! Core modules:
//! - `sim`: Deterministic game logic (spawning, scoring, session clock)
//! - `quiz`: Pre-mission quiz session (question bank + scoring)
//! - `audio`: Web Audio synthesized sound effects

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod quiz;
pub mod sim;

pub use quiz::QuizSession;

/// Game configuration constants
pub mod consts {
    /// Period of the target spawn/expiry tick (ms)
    pub const SPAWN_TICK_MS: u64 = 600;
    /// Period of the power-up spawn roll (ms)
    pub const POWERUP_TICK_MS: u64 = 5_000;
    /// Period of the session countdown (ms)
    pub const CLOCK_TICK_MS: u64 = 1_000;
    /// Period of the cosmetic cleanup pass (ms)
    pub const CLEANUP_TICK_MS: u64 = 100;

    /// Session countdown starting value (seconds)
    pub const SESSION_SECONDS: u32 = 20;
    /// Score needed to win the session
    pub const SCORE_TARGET: u32 = 20;
    /// Seconds granted by a time-bonus power-up
    pub const TIME_BONUS_SECONDS: u32 = 5;

    /// Maximum concurrent targets after a spawn tick
    pub const MAX_TARGETS: usize = 10;
    /// Targets seeded when a session starts
    pub const INITIAL_TARGETS: usize = 3;
    /// Target lifespan range (ms), half-open
    pub const TARGET_LIFESPAN_MIN_MS: u64 = 4_000;
    pub const TARGET_LIFESPAN_MAX_MS: u64 = 6_000;

    /// Chance of a power-up appearing on each power-up tick
    pub const POWERUP_CHANCE: f64 = 0.15;
    /// At most this many power-ups on screen
    pub const MAX_POWERUPS: usize = 1;
    /// Power-ups despawn after this long (ms)
    pub const POWERUP_LIFESPAN_MS: u64 = 5_000;

    /// Combo streak window: a new elimination must land within this (ms)
    pub const COMBO_WINDOW_MS: u64 = 2_000;
    /// Combo size at which the 1.5x reward tier starts
    pub const COMBO_TIER_ONE: u32 = 5;
    /// Combo size at which the 2x reward tier starts
    pub const COMBO_TIER_TWO: u32 = 10;

    /// Double-points power-up duration (ms)
    pub const DOUBLE_POINTS_MS: u64 = 8_000;
    /// Slow-time power-up duration (ms)
    pub const SLOW_TIME_MS: u64 = 5_000;
    /// Animation speed factor while slow-time is active
    pub const SLOW_TIME_FACTOR: f32 = 0.3;

    /// Explosion markers linger this long (ms)
    pub const EXPLOSION_LIFESPAN_MS: u64 = 1_000;
    /// Delay between hitting the score target and the success screen (ms)
    pub const SUCCESS_DELAY_MS: u64 = 100;

    /// Play-field safe margins (percent coordinates)
    pub const FIELD_X_MIN: f32 = 7.5;
    pub const FIELD_X_MAX: f32 = 92.5;
    pub const FIELD_Y_MIN: f32 = 12.5;
    pub const FIELD_Y_MAX: f32 = 87.5;

    /// Countdown alarm repeat period while playing (ms)
    pub const ALARM_PERIOD_MS: f64 = 1_800.0;
}
