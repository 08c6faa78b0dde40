//! Pickup generation, settling, expiry and collection

use glam::Vec2;
use rand::Rng;

use super::physics;
use super::state::{Actor, GameEvent, GameState, Pickup, PickupKind};
use super::tick::Step;
use crate::consts::*;

/// Weighted table: top slice invincibility, then homing, then health, rest ammo
pub fn kind_for_roll(roll: f32) -> PickupKind {
    if roll > 0.9 {
        PickupKind::Invincibility
    } else if roll > 0.75 {
        PickupKind::Homing
    } else if roll > 0.5 {
        PickupKind::Health
    } else {
        PickupKind::Ammo
    }
}

pub fn spawn_pickup(state: &mut GameState, kind: PickupKind, pos: Vec2) {
    let id = state.ids.next();
    state
        .pickups
        .push(Pickup::new(id, kind, pos, state.survival_time));
}

/// The single drop roll made when an adversary is defeated
pub fn roll_kill_drop<R: Rng + ?Sized>(
    state: &mut GameState,
    center: Vec2,
    rng: &mut R,
) -> Option<PickupKind> {
    let dropped = rng
        .random_bool(DROP_CHANCE)
        .then(|| kind_for_roll(rng.random::<f32>()));
    if let Some(kind) = dropped {
        spawn_pickup(state, kind, center - Vec2::splat(PICKUP_SIZE / 2.0));
    }
    state.events.push(GameEvent::DropRolled { dropped });
    dropped
}

/// Apply a collected pickup's effect to the actor
pub fn apply_pickup(actor: &mut Actor, kind: PickupKind, value: u32, now: f64, max_lives: u32) {
    match kind {
        PickupKind::Ammo => {
            actor.ammo = actor.ammo.saturating_add(value).min(actor.max_ammo);
        }
        PickupKind::Health => {
            actor.lives = actor.lives.saturating_add(value).min(max_lives);
        }
        PickupKind::Invincibility => actor.grant_invincibility(now),
        PickupKind::Homing => actor.grant_homing(now),
    }
}

fn random_drop_x<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>() * (WORLD_WIDTH - PICKUP_SIZE)
}

pub fn update_pickups<R: Rng + ?Sized>(state: &mut GameState, step: Step, rng: &mut R) {
    let now = state.survival_time;

    // Periodic wave: one of each kind
    if now - state.last_wave_drop_at >= PICKUP_WAVE_INTERVAL {
        state.last_wave_drop_at = now;
        for kind in PickupKind::ALL {
            let x = random_drop_x(rng);
            spawn_pickup(state, kind, Vec2::new(x, 0.0));
        }
        log::info!("Pickup wave at t={:.1}s", now);
        state.events.push(GameEvent::WaveDrop);
    }

    // Rare ambient drop
    if rng.random_bool(PICKUP_RANDOM_CHANCE) {
        let kind = kind_for_roll(rng.random::<f32>());
        let x = random_drop_x(rng);
        spawn_pickup(state, kind, Vec2::new(x, 0.0));
    }

    let GameState {
        actor,
        pickups,
        platforms,
        events,
        max_lives,
        ..
    } = state;

    pickups.retain_mut(|pickup| {
        if now > pickup.expires_at {
            return false;
        }

        if !pickup.settled {
            physics::apply_gravity(&mut pickup.vel, step.dt);
            physics::apply_friction(&mut pickup.vel, step.dt);
            physics::integrate(&mut pickup.pos, pickup.vel, step.dt);

            let rect = pickup.rect();
            if let Some(plat) = platforms.iter().find(|p| p.rect().overlaps(&rect)) {
                pickup.pos.y = plat.y - pickup.height;
                pickup.vel = Vec2::ZERO;
                pickup.settled = true;
            }
            if physics::fell_out(pickup.pos) {
                return false;
            }
        }

        if actor.lives > 0 && pickup.rect().overlaps(&actor.rect()) {
            apply_pickup(actor, pickup.kind, pickup.value, now, *max_lives);
            events.push(GameEvent::PickupCollected { kind: pickup.kind });
            return false;
        }
        true
    });
}
