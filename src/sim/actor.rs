//! Actor controller
//!
//! Turns one tick of input into movement, aim, shots and jetpack thrust, and
//! applies the fall-death rule.

use glam::Vec2;

use super::physics;
use super::state::{Actor, EntityId, GameEvent, GameState, Projectile, ProjectileSource, palette};
use super::tick::{Step, TickInput};
use crate::consts::*;
use crate::{angle_to, from_angle};

/// Advance the actor by one tick. `fire` is the already-consumed edge.
pub fn update_actor(state: &mut GameState, input: &TickInput, fire: bool, step: Step) {
    let now = state.survival_time;
    let dt = step.dt;
    let GameState {
        actor,
        projectiles,
        platforms,
        ids,
        events,
        jetpack_enabled,
        ..
    } = state;

    actor.refresh_status(now);
    if actor.lives == 0 {
        return;
    }

    let airborne = !actor.grounded;

    physics::apply_move_intent(&mut actor.vel, input.move_left, input.move_right, dt);
    physics::apply_gravity(&mut actor.vel, dt);
    if input.jump {
        physics::try_jump(&mut actor.vel, &mut actor.grounded);
    }
    if *jetpack_enabled {
        update_jetpack(actor, input.jump && airborne, step);
    }

    physics::integrate(&mut actor.pos, actor.vel, dt);

    actor.facing = angle_to(actor.center(), input.aim_point);

    if fire {
        if let Some(projectile) = fire_projectile(actor, ids.next()) {
            projectiles.push(projectile);
        }
    }

    let size = actor.size();
    actor.grounded = physics::land_on_platforms(&mut actor.pos, &mut actor.vel, size, platforms, dt);

    if physics::fell_out(actor.pos) {
        actor.lives = actor.lives.saturating_sub(1);
        actor.respawn();
        log::debug!("Actor fell out, {} lives left", actor.lives);
        events.push(GameEvent::FellOut { lives: actor.lives });
    }
    physics::clamp_to_world_x(&mut actor.pos, actor.width);
}

/// Spend one round along the facing angle. Empty magazine fires nothing.
pub fn fire_projectile(actor: &mut Actor, id: EntityId) -> Option<Projectile> {
    if actor.ammo == 0 {
        return None;
    }
    actor.ammo -= 1;

    let vel = from_angle(actor.facing, PROJECTILE_SPEED);
    let mut projectile = Projectile::new(
        id,
        actor.id,
        ProjectileSource::Actor,
        actor.center(),
        vel,
        PROJECTILE_SIZE,
    );
    if actor.is_homing {
        projectile.homing = true;
        projectile.color = palette::PROJECTILE_HOMING;
    }
    Some(projectile)
}

/// Thrust while held in the air, recharge at a slower rate otherwise
fn update_jetpack(actor: &mut Actor, wants_thrust: bool, step: Step) {
    let elapsed_ms = step.elapsed_secs * 1000.0;
    if wants_thrust && actor.jetpack_fuel > 0.0 {
        actor.vel.y -= JETPACK_ACCEL * step.dt;
        actor.jetpack_fuel = (actor.jetpack_fuel - elapsed_ms).max(0.0);
        actor.is_thrusting = true;
    } else {
        actor.is_thrusting = false;
        actor.jetpack_fuel =
            (actor.jetpack_fuel + elapsed_ms * JETPACK_RECHARGE_RATE).min(JETPACK_MAX_FUEL);
    }
}

/// Ease the camera toward centering the actor, clamped to the world
pub fn update_camera(state: &mut GameState) {
    let target = state.actor.pos - state.viewport / 2.0;
    state.camera += (target - state.camera) * CAMERA_EASE;
    let max = (Vec2::new(WORLD_WIDTH, WORLD_HEIGHT) - state.viewport).max(Vec2::ZERO);
    state.camera = state.camera.clamp(Vec2::ZERO, max);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn empty_world() -> GameState {
        let mut state = GameState::with_platforms(&Settings::default(), Vec::new());
        state.jetpack_enabled = false;
        state
    }

    #[test]
    fn test_fire_spends_ammo() {
        let mut actor = Actor::new(EntityId(1), 3);
        actor.facing = 0.0;
        let p = fire_projectile(&mut actor, EntityId(9)).unwrap();
        assert_eq!(actor.ammo, MAX_AMMO - 1);
        assert_eq!(p.owner, actor.id);
        assert_eq!(p.source, ProjectileSource::Actor);
        assert!((p.vel.x - PROJECTILE_SPEED).abs() < 1e-4);
        assert!(!p.homing);
    }

    #[test]
    fn test_fire_empty_magazine() {
        let mut actor = Actor::new(EntityId(1), 3);
        actor.ammo = 0;
        assert!(fire_projectile(&mut actor, EntityId(9)).is_none());
        assert_eq!(actor.ammo, 0);
    }

    #[test]
    fn test_homing_shot_flagged() {
        let mut actor = Actor::new(EntityId(1), 3);
        actor.grant_homing(0.0);
        let p = fire_projectile(&mut actor, EntityId(9)).unwrap();
        assert!(p.homing);
        assert_eq!(p.color, palette::PROJECTILE_HOMING);
    }

    #[test]
    fn test_facing_follows_aim() {
        let mut state = empty_world();
        let center = state.actor.center();
        let input = TickInput {
            aim_point: center + Vec2::new(0.0, -100.0),
            ..Default::default()
        };
        update_actor(&mut state, &input, false, Step::REFERENCE);
        // Aim straight up (y grows downward), measured after the actor moved
        assert!(state.actor.facing < 0.0);
    }

    #[test]
    fn test_fall_death_respawns() {
        let mut state = empty_world();
        state.actor.pos = Vec2::new(500.0, WORLD_HEIGHT - 1.0);
        state.actor.vel = Vec2::new(3.0, 10.0);
        update_actor(&mut state, &TickInput::default(), false, Step::REFERENCE);
        assert_eq!(state.actor.lives, 19);
        assert_eq!(state.actor.pos, ACTOR_SPAWN);
        assert_eq!(state.actor.vel, Vec2::ZERO);
        assert_eq!(state.events, vec![GameEvent::FellOut { lives: 19 }]);
    }

    #[test]
    fn test_dead_actor_is_frozen() {
        let mut state = empty_world();
        state.actor.lives = 0;
        let before = state.actor.pos;
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        update_actor(&mut state, &input, true, Step::REFERENCE);
        assert_eq!(state.actor.pos, before);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_jetpack_burns_and_recharges() {
        let mut state = empty_world();
        state.jetpack_enabled = true;
        state.actor.grounded = false;
        let hold = TickInput {
            jump: true,
            ..Default::default()
        };
        update_actor(&mut state, &hold, false, Step::REFERENCE);
        assert!(state.actor.is_thrusting);
        let burned = state.actor.jetpack_fuel;
        assert!(burned < JETPACK_MAX_FUEL);

        update_actor(&mut state, &TickInput::default(), false, Step::REFERENCE);
        assert!(!state.actor.is_thrusting);
        assert!(state.actor.jetpack_fuel > burned);
    }

    #[test]
    fn test_camera_stays_in_world() {
        let mut state = empty_world();
        state.actor.pos = Vec2::new(-500.0, -500.0);
        for _ in 0..50 {
            update_camera(&mut state);
        }
        assert_eq!(state.camera, Vec2::ZERO);
    }
}
