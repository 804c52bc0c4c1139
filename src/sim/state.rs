//! Game session state and core types
//!
//! Everything the presentation layer reads lives here. All mutation goes
//! through the reducers in `score` and `tick`; the shell only ever holds a
//! `&mut GameState` and drains the event queue after each frame.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::schedule::Scheduler;
use crate::consts::*;

/// Current phase of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Briefing screen, waiting for the start action
    Ready,
    /// Active gameplay
    Playing,
    /// Session won (score target reached)
    Success,
    /// Session lost (countdown expired short of the target)
    Failed,
}

/// Target types, in spawn-table order (rarest first)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Boss,
    Golden,
    Fast,
    Normal,
}

impl TargetKind {
    /// CSS class suffix for the DOM renderer
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Boss => "boss",
            TargetKind::Golden => "golden",
            TargetKind::Fast => "fast",
            TargetKind::Normal => "normal",
        }
    }
}

/// A clickable, time-limited target
///
/// Immutable after creation; the slow-time effect is session-global (see
/// [`GameState::animation_speed`]), so removal and respawn never leak
/// per-entity effect state.
#[derive(Debug, Clone)]
pub struct Target {
    pub id: u64,
    /// Play-field position, percent coordinates on each axis
    pub pos: Vec2,
    pub kind: TargetKind,
    /// Base point value, before combo/double-points multipliers
    pub reward: u32,
    /// Rendered diameter (px). Normal targets get random jitter.
    pub visual_size: f32,
    /// Idle animation period (s); lower is faster
    pub animation_speed: f32,
    pub spawned_at_ms: u64,
    /// Self-expires when age reaches this
    pub lifespan_ms: u64,
}

impl Target {
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.spawned_at_ms)
    }

    pub fn expired(&self, now_ms: u64) -> bool {
        self.age_ms(now_ms) >= self.lifespan_ms
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    TimeBonus,
    DoublePoints,
    SlowTime,
}

impl PowerUpKind {
    /// Effect label shown under the pickup
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::TimeBonus => "Time +5s",
            PowerUpKind::DoublePoints => "2x Points",
            PowerUpKind::SlowTime => "Slow Motion",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::TimeBonus => "time-bonus",
            PowerUpKind::DoublePoints => "double-points",
            PowerUpKind::SlowTime => "slow-time",
        }
    }
}

/// A clickable, time-limited power-up
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub id: u64,
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub spawned_at_ms: u64,
}

impl PowerUp {
    pub fn expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.spawned_at_ms) >= POWERUP_LIFESPAN_MS
    }
}

/// Transient elimination marker (cosmetic, pruned by the cleanup tick)
#[derive(Debug, Clone)]
pub struct Explosion {
    pub id: u64,
    pub pos: Vec2,
    pub kind: TargetKind,
    /// Points actually granted, for the score pop-up
    pub reward: u32,
    pub spawned_at_ms: u64,
}

/// Fire-and-forget notifications for the audio/logging collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    TargetDestroyed { kind: TargetKind, reward: u32 },
    PowerUpCollected(PowerUpKind),
    CountdownTick(u32),
    Success,
    Failed,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Single source of truth for which view renders
    pub phase: GamePhase,
    pub score: u32,
    /// Countdown, whole seconds
    pub time_left: u32,
    /// Consecutive eliminations within the combo window
    pub combo: u32,
    /// High-water mark of `combo`, for the results screen
    pub max_combo: u32,
    /// Double-points power-up in effect
    pub double_points: bool,
    /// Slow-time power-up in effect
    pub slow_time: bool,
    pub targets: Vec<Target>,
    pub power_ups: Vec<PowerUp>,
    pub explosions: Vec<Explosion>,
    /// Monotonic session clock (ms), advanced by the shell
    pub clock_ms: u64,
    /// Pending timer tasks; emptied whenever `Playing` is left
    pub scheduler: Scheduler,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u64,
}

impl GameState {
    /// Create a session in the `Ready` phase
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Ready,
            score: 0,
            time_left: SESSION_SECONDS,
            combo: 0,
            max_combo: 0,
            double_points: false,
            slow_time: false,
            targets: Vec::new(),
            power_ups: Vec::new(),
            explosions: Vec::new(),
            clock_ms: 0,
            scheduler: Scheduler::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Effective animation period for a target, honoring slow-time
    pub fn animation_speed(&self, target: &Target) -> f32 {
        if self.slow_time {
            target.animation_speed * SLOW_TIME_FACTOR
        } else {
            target.animation_speed
        }
    }

    /// Take all pending events (shell calls this once per frame)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
