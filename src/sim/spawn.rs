//! Entity generation
//!
//! Targets are drawn from a data-driven weighted spawn table; positions are
//! uniform within the play-field safe margins so everything stays clickable.
//! Generators are pure functions of the RNG, which keeps the whole spawn
//! path reproducible under a fixed seed.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{PowerUp, PowerUpKind, Target, TargetKind};
use crate::consts::*;

/// One row of the target spawn table
#[derive(Debug, Clone, Copy)]
pub struct SpawnEntry {
    pub kind: TargetKind,
    /// Relative draw probability; the table sums to 1.0
    pub weight: f32,
    pub reward: u32,
    /// Rendered diameter (px)
    pub size: f32,
    /// Idle animation period (s)
    pub speed: f32,
}

/// Target spawn table, rarest first
pub const SPAWN_TABLE: &[SpawnEntry] = &[
    SpawnEntry {
        kind: TargetKind::Boss,
        weight: 0.02,
        reward: 15,
        size: 60.0,
        speed: 1.5,
    },
    SpawnEntry {
        kind: TargetKind::Golden,
        weight: 0.08,
        reward: 8,
        size: 55.0,
        speed: 2.5,
    },
    SpawnEntry {
        kind: TargetKind::Fast,
        weight: 0.30,
        reward: 3,
        size: 45.0,
        speed: 3.0,
    },
    SpawnEntry {
        kind: TargetKind::Normal,
        weight: 0.60,
        reward: 1,
        size: 50.0,
        speed: 2.0,
    },
];

/// Map a uniform roll in [0,1) to a spawn-table row by cumulative weight
pub fn weighted_choice(table: &[SpawnEntry], roll: f32) -> &SpawnEntry {
    let mut cumulative = 0.0;
    for entry in table {
        cumulative += entry.weight;
        if roll < cumulative {
            return entry;
        }
    }
    // Weights sum to 1.0; only float rounding can land here
    table.last().expect("spawn table is non-empty")
}

/// Uniform position within the play-field safe margins
pub fn random_position(rng: &mut Pcg32) -> Vec2 {
    Vec2::new(
        rng.random_range(FIELD_X_MIN..FIELD_X_MAX),
        rng.random_range(FIELD_Y_MIN..FIELD_Y_MAX),
    )
}

/// Generate a fresh target: weighted kind draw, randomized lifespan,
/// position within margins. Normal targets get size/speed jitter.
pub fn generate_target(rng: &mut Pcg32, id: u64, now_ms: u64) -> Target {
    let roll = rng.random_range(0.0..1.0f32);
    let entry = weighted_choice(SPAWN_TABLE, roll);

    let (visual_size, animation_speed) = if entry.kind == TargetKind::Normal {
        (
            entry.size + rng.random_range(0.0..15.0f32),
            entry.speed + rng.random_range(0.0..2.0f32),
        )
    } else {
        (entry.size, entry.speed)
    };

    Target {
        id,
        pos: random_position(rng),
        kind: entry.kind,
        reward: entry.reward,
        visual_size,
        animation_speed,
        spawned_at_ms: now_ms,
        lifespan_ms: rng.random_range(TARGET_LIFESPAN_MIN_MS..TARGET_LIFESPAN_MAX_MS),
    }
}

/// Generate a power-up: uniform draw among the three kinds, fixed lifespan
pub fn generate_power_up(rng: &mut Pcg32, id: u64, now_ms: u64) -> PowerUp {
    let kind = match rng.random_range(0..3u8) {
        0 => PowerUpKind::TimeBonus,
        1 => PowerUpKind::DoublePoints,
        _ => PowerUpKind::SlowTime,
    };

    PowerUp {
        id,
        pos: random_position(rng),
        kind,
        spawned_at_ms: now_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_table_weights_sum_to_one() {
        let total: f32 = SPAWN_TABLE.iter().map(|e| e.weight).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_weighted_choice_boundaries() {
        assert_eq!(weighted_choice(SPAWN_TABLE, 0.0).kind, TargetKind::Boss);
        assert_eq!(weighted_choice(SPAWN_TABLE, 0.019).kind, TargetKind::Boss);
        assert_eq!(weighted_choice(SPAWN_TABLE, 0.02).kind, TargetKind::Golden);
        assert_eq!(weighted_choice(SPAWN_TABLE, 0.099).kind, TargetKind::Golden);
        assert_eq!(weighted_choice(SPAWN_TABLE, 0.1).kind, TargetKind::Fast);
        assert_eq!(weighted_choice(SPAWN_TABLE, 0.399).kind, TargetKind::Fast);
        assert_eq!(weighted_choice(SPAWN_TABLE, 0.4).kind, TargetKind::Normal);
        assert_eq!(weighted_choice(SPAWN_TABLE, 0.999).kind, TargetKind::Normal);
    }

    #[test]
    fn test_rewards_match_kind() {
        for entry in SPAWN_TABLE {
            let expected = match entry.kind {
                TargetKind::Boss => 15,
                TargetKind::Golden => 8,
                TargetKind::Fast => 3,
                TargetKind::Normal => 1,
            };
            assert_eq!(entry.reward, expected);
        }
    }

    #[test]
    fn test_determinism_under_fixed_seed() {
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        for i in 0..50 {
            let ta = generate_target(&mut a, i, 0);
            let tb = generate_target(&mut b, i, 0);
            assert_eq!(ta.kind, tb.kind);
            assert_eq!(ta.pos, tb.pos);
            assert_eq!(ta.lifespan_ms, tb.lifespan_ms);
        }
    }

    proptest! {
        #[test]
        fn prop_target_within_margins(seed: u64) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let target = generate_target(&mut rng, 1, 0);
            prop_assert!(target.pos.x >= FIELD_X_MIN && target.pos.x < FIELD_X_MAX);
            prop_assert!(target.pos.y >= FIELD_Y_MIN && target.pos.y < FIELD_Y_MAX);
        }

        #[test]
        fn prop_target_lifespan_in_range(seed: u64) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let target = generate_target(&mut rng, 1, 0);
            prop_assert!(target.lifespan_ms >= TARGET_LIFESPAN_MIN_MS);
            prop_assert!(target.lifespan_ms < TARGET_LIFESPAN_MAX_MS);
        }

        #[test]
        fn prop_power_up_within_margins(seed: u64) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let power_up = generate_power_up(&mut rng, 1, 0);
            prop_assert!(power_up.pos.x >= FIELD_X_MIN && power_up.pos.x < FIELD_X_MAX);
            prop_assert!(power_up.pos.y >= FIELD_Y_MIN && power_up.pos.y < FIELD_Y_MAX);
        }
    }
}
