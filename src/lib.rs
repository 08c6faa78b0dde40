//! Rift Survival - side-scrolling survival combat simulation
//!
//! Core modules:
//! - `sim`: Per-tick simulation (physics, collisions, adversaries, pickups)
//! - `director`: Optional difficulty override handoff
//! - `platform`: Host-side plumbing (input mailbox, frame clock)
//! - `settings`: Run configuration

pub mod director;
pub mod platform;
pub mod settings;
pub mod sim;

pub use director::{DirectorMailbox, WaveConfig};
pub use settings::{DifficultyPreset, Settings};

use glam::Vec2;

/// Game configuration constants
///
/// Physics quantities are expressed per reference frame (dt = 1.0 is one
/// 60 Hz frame). Timers are in seconds.
pub mod consts {
    use glam::Vec2;

    /// Reference frame duration in milliseconds (dt normalisation)
    pub const REFERENCE_FRAME_MS: f32 = 16.67;
    /// Largest wall-clock gap folded into a single tick
    pub const MAX_FRAME_GAP_MS: f32 = 100.0;

    /// World extent
    pub const WORLD_WIDTH: f32 = 2000.0;
    pub const WORLD_HEIGHT: f32 = 1000.0;

    pub const GRAVITY: f32 = 0.6;
    /// Multiplicative horizontal damping per frame
    pub const FRICTION: f32 = 0.92;
    /// Horizontal acceleration while a move intent is held
    pub const MOVE_ACCEL: f32 = 0.8;
    pub const MAX_SPEED: f32 = 9.0;
    /// Upward impulse (negative y is up)
    pub const JUMP_IMPULSE: f32 = -19.5;
    /// Minimum landing tolerance below a platform's top edge
    pub const CATCH_THRESHOLD_MIN: f32 = 30.0;

    /// Jetpack thrust and fuel (fuel is in milliseconds of burn)
    pub const JETPACK_ACCEL: f32 = 0.67;
    pub const JETPACK_MAX_FUEL: f32 = 500.0;
    pub const JETPACK_RECHARGE_RATE: f32 = 0.5;

    /// Actor defaults
    pub const ACTOR_SIZE: f32 = 32.0;
    pub const ACTOR_SPAWN: Vec2 = Vec2::new(100.0, 700.0);
    pub const MAX_AMMO: u32 = 20;
    pub const INVINCIBILITY_DURATION: f64 = 3.0;
    pub const HOMING_DURATION: f64 = 3.0;
    /// Knockback applied on adversary contact
    pub const CONTACT_KNOCKBACK_X: f32 = 10.0;
    pub const CONTACT_KNOCKBACK_Y: f32 = -5.0;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 15.0;
    pub const PROJECTILE_SIZE: f32 = 10.0;
    pub const ADVERSARY_PROJECTILE_SPEED: f32 = 8.0;
    pub const ADVERSARY_PROJECTILE_SIZE: f32 = 8.0;
    /// Fraction of the angular error removed per reference frame
    pub const HOMING_TURN_RATE: f32 = 0.1;

    /// Ground adversaries
    pub const GROUND_SIZE: f32 = 32.0;
    pub const GROUND_CHASE_SPEED: f32 = 2.0;
    pub const GROUND_DEADZONE: f32 = 10.0;
    /// Actor must be this far above (negative dy) before a jump is considered
    pub const GROUND_JUMP_DY: f32 = -80.0;
    pub const GROUND_JUMP_CHANCE: f64 = 0.05;
    pub const GROUND_FIRE_RATE: f32 = 2.5;
    pub const GROUND_SPAWN_Y: f32 = 100.0;
    pub const GROUND_HP_CAP: u32 = 3;

    /// Flying adversaries
    pub const FLYING_SIZE: f32 = 40.0;
    pub const FLYING_SPEED: f32 = 5.0;
    pub const FLYING_FIRE_RATE: f32 = 2.0;
    pub const FLYING_HP: u32 = 2;
    pub const FLYING_ALTITUDE_MIN: f32 = 440.0;
    pub const FLYING_ALTITUDE_MAX: f32 = 480.0;
    /// How far past the world edge a flyer travels before a pass ends
    pub const FLYING_EXIT_MARGIN: f32 = 100.0;
    pub const FLYING_CHANCE: f64 = 0.3;
    pub const FLYING_BASE_PASSES: u32 = 2;
    pub const FLYING_MAX_PASSES: u32 = 4;
    /// Seconds past the toughness cap per extra pass
    pub const FLYING_PASS_GROWTH_SECS: f64 = 30.0;

    /// Spawn director
    pub const POPULATION_STEP_SECS: f64 = 15.0;
    pub const TOUGHNESS_STEP_SECS: f64 = 10.0;
    pub const SPAWN_INTERVAL: f64 = 2.0;
    pub const SPAWN_MIN_DISTANCE: f32 = 400.0;
    /// Initial attack cooldown is drawn from [min, min + jitter)
    pub const SPAWN_COOLDOWN_MIN: f32 = 1.0;
    pub const SPAWN_COOLDOWN_JITTER: f32 = 2.0;

    /// Scoring
    pub const KILL_SCORE: u64 = 100;

    /// Pickups
    pub const PICKUP_SIZE: f32 = 20.0;
    pub const PICKUP_LIFETIME: f64 = 10.0;
    pub const PICKUP_WAVE_INTERVAL: f64 = 10.0;
    pub const PICKUP_RANDOM_CHANCE: f64 = 0.002;
    pub const DROP_CHANCE: f64 = 0.35;
    pub const AMMO_PICKUP_VALUE: u32 = 5;
    pub const HEALTH_PICKUP_VALUE: u32 = 1;

    /// Camera easing per tick
    pub const CAMERA_EASE: f32 = 0.1;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Bearing (radians) of the vector from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle, scaled
#[inline]
pub fn from_angle(theta: f32, length: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin()) * length
}
