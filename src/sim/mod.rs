//! Deterministic game logic
//!
//! All gameplay rules live here. This module must stay pure and testable:
//! - Seeded RNG only
//! - Time is an explicit millisecond clock advanced by the caller
//! - No rendering, DOM, or audio dependencies

pub mod schedule;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;

pub use schedule::{Scheduler, Task};
pub use score::{collect, combo_multiplier, eliminate};
pub use spawn::{SPAWN_TABLE, SpawnEntry, generate_power_up, generate_target, weighted_choice};
pub use state::{
    Explosion, GameEvent, GamePhase, GameState, PowerUp, PowerUpKind, Target, TargetKind,
};
pub use tick::{advance, start};
