//! Per-tick orchestration
//!
//! Runs every subsystem in a fixed order and evaluates the terminal
//! condition. Once the run is over, ticks are no-ops.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState, RunSummary};
use super::{actor, adversary, pickup, projectile, spawn};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Jump (and jetpack while held in the air)
    pub jump: bool,
    /// Aim target in world space
    pub aim_point: Vec2,
    /// Edge-triggered; cleared by `tick` once consumed
    pub fire: bool,
}

/// Time covered by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Tick length in reference frames (physics scale)
    pub dt: f32,
    /// Real elapsed seconds (timers and survival clock)
    pub elapsed_secs: f32,
}

impl Step {
    /// Exactly one reference frame
    pub const REFERENCE: Step = Step {
        dt: 1.0,
        elapsed_secs: REFERENCE_FRAME_MS / 1000.0,
    };

    /// Build from a wall-clock delta, clamping long stalls
    pub fn from_millis(ms: f32) -> Self {
        let ms = ms.clamp(0.0, MAX_FRAME_GAP_MS);
        Self {
            dt: ms / REFERENCE_FRAME_MS,
            elapsed_secs: ms / 1000.0,
        }
    }
}

/// Advance the run by one tick
///
/// Returns the run summary exactly once, on the tick the actor runs out of
/// lives.
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    input: &mut TickInput,
    step: Step,
    rng: &mut R,
) -> Option<RunSummary> {
    let fire = std::mem::take(&mut input.fire);
    if state.over {
        return None;
    }

    state.events.clear();
    state.survival_time += step.elapsed_secs as f64;

    actor::update_actor(state, input, fire, step);
    actor::update_camera(state);
    projectile::update_projectiles(state, step);
    spawn::update_spawns(state, rng);
    adversary::update_adversaries(state, step, rng);
    pickup::update_pickups(state, step, rng);

    check_terminal(state)
}

/// Flag the run as over when the actor has no lives left
///
/// Idempotent: only the first transition produces a summary.
pub fn check_terminal(state: &mut GameState) -> Option<RunSummary> {
    if state.over || state.actor.lives > 0 {
        return None;
    }
    let summary = RunSummary {
        survival_time_secs: state.survival_time,
        kills: state.actor.kills,
        score: state.actor.score,
    };
    state.over = true;
    state.summary = Some(summary);
    state.events.push(GameEvent::GameOver);
    log::info!(
        "Game over: survived {:.1}s, {} kills, score {}",
        summary.survival_time_secs,
        summary.kills,
        summary.score
    );
    Some(summary)
}
