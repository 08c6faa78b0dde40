//! Spawn director
//!
//! Difficulty is a pure function of survival time. An external director may
//! replace the population/toughness/cadence numbers; the local formula is
//! always the fallback.

use glam::Vec2;
use rand::Rng;

use super::state::{Adversary, Direction, GameEvent, GameState};
use crate::consts::*;
use crate::director::WaveConfig;

/// Spawn parameters in force for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    pub target_population: usize,
    pub ground_hp: u32,
    /// Minimum seconds between spawn attempts
    pub spawn_interval: f64,
    /// Multiplier on ground chase speed
    pub speed_scale: f32,
}

impl Difficulty {
    /// Local deterministic formula
    pub fn at(t: f64) -> Self {
        Self {
            target_population: target_population(t),
            ground_hp: base_toughness(t),
            spawn_interval: SPAWN_INTERVAL,
            speed_scale: 1.0,
        }
    }

    /// Apply a director proposal (already sanitized)
    pub fn with_override(self, config: &WaveConfig) -> Self {
        Self {
            target_population: config.enemy_count as usize,
            ground_hp: config.enemy_hp,
            spawn_interval: config.spawn_interval_ms as f64 / 1000.0,
            speed_scale: config.enemy_speed,
        }
    }

    /// Parameters for the current state
    pub fn for_state(state: &GameState) -> Self {
        let local = Self::at(state.survival_time);
        match &state.director_override {
            Some(config) => local.with_override(config),
            None => local,
        }
    }
}

/// `1 + floor(t / 15)`
pub fn target_population(t: f64) -> usize {
    1 + (t.max(0.0) / POPULATION_STEP_SECS).floor() as usize
}

/// `min(1 + floor(t / 10), 3)`
pub fn base_toughness(t: f64) -> u32 {
    (1 + (t.max(0.0) / TOUGHNESS_STEP_SECS).floor() as u32).min(GROUND_HP_CAP)
}

/// Survival time at which ground toughness reaches its cap
pub fn toughness_cap_time() -> f64 {
    (GROUND_HP_CAP - 1) as f64 * TOUGHNESS_STEP_SECS
}

/// Flyers are only mixed in once toughness is capped
pub fn flyers_unlocked(t: f64) -> bool {
    base_toughness(t) >= GROUND_HP_CAP
}

/// Passes a new flyer gets; grows past the cap point, clamped
pub fn flying_passes(t: f64) -> u32 {
    let past_cap = (t - toughness_cap_time()).max(0.0);
    let extra = (past_cap / FLYING_PASS_GROWTH_SECS).floor() as u32;
    (FLYING_BASE_PASSES + extra).min(FLYING_MAX_PASSES)
}

/// Random X at least `SPAWN_MIN_DISTANCE` from the actor, reflected across
/// the midpoint when too close
pub fn ground_spawn_x(roll_x: f32, actor_x: f32) -> f32 {
    let mut x = roll_x;
    if (x - actor_x).abs() < SPAWN_MIN_DISTANCE {
        x = (x + WORLD_WIDTH / 2.0) % WORLD_WIDTH;
    }
    x.min(WORLD_WIDTH - GROUND_SIZE)
}

/// Maybe add one adversary this tick
pub fn update_spawns<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    let now = state.survival_time;
    let difficulty = Difficulty::for_state(state);

    if state.adversaries.len() >= difficulty.target_population {
        return;
    }
    if now - state.last_spawn_at <= difficulty.spawn_interval {
        return;
    }
    state.last_spawn_at = now;

    let id = state.ids.next();
    let cooldown = SPAWN_COOLDOWN_MIN + rng.random::<f32>() * SPAWN_COOLDOWN_JITTER;

    let adversary = if flyers_unlocked(now) && rng.random_bool(FLYING_CHANCE) {
        let (x, direction) = if rng.random_bool(0.5) {
            (-FLYING_SIZE, Direction::Right)
        } else {
            (WORLD_WIDTH, Direction::Left)
        };
        let y = rng.random_range(FLYING_ALTITUDE_MIN..FLYING_ALTITUDE_MAX);
        Adversary::flying(id, Vec2::new(x, y), direction, flying_passes(now), cooldown)
    } else {
        let x = ground_spawn_x(rng.random::<f32>() * WORLD_WIDTH, state.actor.pos.x);
        Adversary::ground(
            id,
            Vec2::new(x, GROUND_SPAWN_Y),
            difficulty.ground_hp,
            GROUND_CHASE_SPEED * difficulty.speed_scale,
            cooldown,
        )
    };

    log::debug!(
        "Spawned {:?} adversary {:?} at t={:.1}s (hp {})",
        adversary.archetype,
        adversary.id,
        now,
        adversary.hp
    );
    state.events.push(GameEvent::AdversarySpawned {
        id,
        archetype: adversary.archetype,
    });
    state.adversaries.push(adversary);
}
