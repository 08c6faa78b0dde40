//! Kinematics shared by the actor, ground adversaries and pickups
//!
//! Velocities are in pixels per reference frame; `dt` is the tick length in
//! reference frames.

use glam::Vec2;

use super::collision::Rect;
use super::state::Platform;
use crate::consts::*;

/// Horizontal input acceleration, multiplicative friction, speed clamp
pub fn apply_move_intent(vel: &mut Vec2, left: bool, right: bool, dt: f32) {
    if left {
        vel.x -= MOVE_ACCEL * dt;
    }
    if right {
        vel.x += MOVE_ACCEL * dt;
    }
    apply_friction(vel, dt);
    vel.x = vel.x.clamp(-MAX_SPEED, MAX_SPEED);
}

/// Exponential horizontal decay (one FRICTION factor per reference frame)
#[inline]
pub fn apply_friction(vel: &mut Vec2, dt: f32) {
    vel.x *= FRICTION.powf(dt);
}

#[inline]
pub fn apply_gravity(vel: &mut Vec2, dt: f32) {
    vel.y += GRAVITY * dt;
}

/// Jump impulse, only from the ground. Returns whether it fired.
pub fn try_jump(vel: &mut Vec2, grounded: &mut bool) -> bool {
    if !*grounded {
        return false;
    }
    vel.y = JUMP_IMPULSE;
    *grounded = false;
    true
}

#[inline]
pub fn integrate(pos: &mut Vec2, vel: Vec2, dt: f32) {
    *pos += vel * dt;
}

/// Landing tolerance below a platform's top edge for this tick
#[inline]
pub fn catch_threshold(platform: &Platform, vel_y: f32, dt: f32) -> f32 {
    CATCH_THRESHOLD_MIN.max(platform.height) + (vel_y * dt).max(0.0)
}

/// First platform the body is landing on this tick, if any
///
/// Called after integration: the bottom edge must sit within the catch band
/// under the platform's top while moving downward (or at rest) with the
/// horizontal extents overlapping.
pub fn find_landing<'a>(
    pos: Vec2,
    vel: Vec2,
    size: Vec2,
    platforms: &'a [Platform],
    dt: f32,
) -> Option<&'a Platform> {
    if vel.y < 0.0 {
        return None;
    }
    let body = Rect::from_pos_size(pos, size);
    let feet = body.bottom();
    platforms.iter().find(|plat| {
        feet >= plat.y
            && feet < plat.y + catch_threshold(plat, vel.y, dt)
            && body.overlaps_x(&plat.rect())
    })
}

/// Resolve landings: snap onto the surface and zero vertical velocity.
/// Returns the new grounded flag.
pub fn land_on_platforms(
    pos: &mut Vec2,
    vel: &mut Vec2,
    size: Vec2,
    platforms: &[Platform],
    dt: f32,
) -> bool {
    match find_landing(*pos, *vel, size, platforms, dt) {
        Some(plat) => {
            vel.y = 0.0;
            pos.y = plat.y - size.y;
            true
        }
        None => false,
    }
}

/// Keep the body inside the world horizontally
pub fn clamp_to_world_x(pos: &mut Vec2, width: f32) {
    pos.x = pos.x.clamp(0.0, (WORLD_WIDTH - width).max(0.0));
}

/// Below the world's lower bound
#[inline]
pub fn fell_out(pos: Vec2) -> bool {
    pos.y > WORLD_HEIGHT
}
