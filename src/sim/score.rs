//! Score and combo engine
//!
//! Click events land here. Both entry points are idempotent: a click on an
//! entity that already expired or was already destroyed is silently ignored,
//! which covers double-clicks racing the cleanup timers.

use super::schedule::Task;
use super::state::{Explosion, GameEvent, GamePhase, GameState, PowerUpKind};
use crate::consts::*;

/// Reward multiplier for the current streak. The streak counter has already
/// been incremented for the elimination being scored, so the boundary
/// elimination (5th, 10th) gets the new tier.
pub fn combo_multiplier(combo: u32) -> f32 {
    if combo >= COMBO_TIER_TWO {
        2.0
    } else if combo >= COMBO_TIER_ONE {
        1.5
    } else {
        1.0
    }
}

/// Destroy a target by id: bump the combo, grant the multiplied reward,
/// and pre-empt the countdown if the score target is reached.
pub fn eliminate(state: &mut GameState, target_id: u64) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let Some(idx) = state.targets.iter().position(|t| t.id == target_id) else {
        return;
    };

    state.combo += 1;
    state.max_combo = state.max_combo.max(state.combo);
    let now = state.clock_ms;
    state.scheduler.once(Task::ComboDecay, now, COMBO_WINDOW_MS);

    let target = state.targets.remove(idx);
    let double = if state.double_points { 2.0 } else { 1.0 };
    let reward =
        (target.reward as f32 * double * combo_multiplier(state.combo)).floor() as u32;

    let explosion_id = state.next_entity_id();
    state.explosions.push(Explosion {
        id: explosion_id,
        pos: target.pos,
        kind: target.kind,
        reward,
        spawned_at_ms: now,
    });

    state.score += reward;
    state.events.push(GameEvent::TargetDestroyed {
        kind: target.kind,
        reward,
    });

    // Win is detected here, not on the next clock tick, so it always beats
    // the countdown. Short delay lets the last explosion play out.
    if state.score >= SCORE_TARGET && !state.scheduler.is_scheduled(Task::SuccessDelay) {
        state.scheduler.once(Task::SuccessDelay, now, SUCCESS_DELAY_MS);
    }
}

/// Collect a power-up by id and apply its session-wide effect.
pub fn collect(state: &mut GameState, power_up_id: u64) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let Some(idx) = state.power_ups.iter().position(|p| p.id == power_up_id) else {
        return;
    };

    let power_up = state.power_ups.remove(idx);
    let now = state.clock_ms;
    match power_up.kind {
        PowerUpKind::TimeBonus => {
            state.time_left += TIME_BONUS_SECONDS;
        }
        PowerUpKind::DoublePoints => {
            state.double_points = true;
            state
                .scheduler
                .once(Task::DoublePointsExpiry, now, DOUBLE_POINTS_MS);
        }
        PowerUpKind::SlowTime => {
            state.slow_time = true;
            state
                .scheduler
                .once(Task::SlowTimeRestore, now, SLOW_TIME_MS);
        }
    }

    state.events.push(GameEvent::PowerUpCollected(power_up.kind));
}
