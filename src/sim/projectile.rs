//! Projectile advance, homing and hit resolution
//!
//! A projectile resolves at most once: the first qualifying overlap consumes
//! it. Actor shots deal one point of damage regardless of `damage`.

use glam::Vec2;

use super::collision::out_of_world;
use super::state::{Adversary, GameEvent, GameState, Projectile, ProjectileSource};
use super::tick::Step;
use crate::consts::*;
use crate::{angle_to, from_angle, normalize_angle};

/// What a projectile did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Flying,
    OutOfWorld,
    Hit,
}

pub fn update_projectiles(state: &mut GameState, step: Step) {
    let GameState {
        actor,
        adversaries,
        projectiles,
        events,
        ..
    } = state;

    // Targets are picked relative to the actor, not the shot
    let anchor = actor.center();

    projectiles.retain_mut(|projectile| {
        if projectile.homing && projectile.source == ProjectileSource::Actor {
            // Re-resolved per shot: an earlier shot this tick may have killed it
            if let Some(target) = nearest_living(adversaries, anchor).map(Adversary::center) {
                steer_toward(projectile, target, step.dt);
            }
        }
        projectile.pos += projectile.vel * step.dt;

        let resolution = if out_of_world(projectile.pos, WORLD_WIDTH, WORLD_HEIGHT) {
            Resolution::OutOfWorld
        } else {
            match projectile.source {
                ProjectileSource::Actor => {
                    let rect = projectile.rect();
                    match adversaries
                        .iter_mut()
                        .find(|adv| adv.is_alive() && adv.rect().overlaps(&rect))
                    {
                        Some(adv) => {
                            adv.hp = adv.hp.saturating_sub(1);
                            Resolution::Hit
                        }
                        None => Resolution::Flying,
                    }
                }
                ProjectileSource::Adversary => {
                    if actor.lives > 0 && projectile.rect().overlaps(&actor.rect()) {
                        if !actor.is_invincible {
                            actor.lives = actor.lives.saturating_sub(1);
                            events.push(GameEvent::ActorHit { lives: actor.lives });
                        }
                        Resolution::Hit
                    } else {
                        Resolution::Flying
                    }
                }
            }
        };
        resolution == Resolution::Flying
    });
}

/// Living adversary whose center is closest to `point`
pub fn nearest_living(adversaries: &[Adversary], point: Vec2) -> Option<&Adversary> {
    adversaries
        .iter()
        .filter(|adv| adv.is_alive())
        .min_by(|a, b| {
            a.center()
                .distance_squared(point)
                .partial_cmp(&b.center().distance_squared(point))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// New heading after turning a fixed fraction of the way to `bearing`
pub fn turn_toward(heading: f32, bearing: f32, dt: f32) -> f32 {
    let diff = normalize_angle(bearing - heading);
    let fraction = (HOMING_TURN_RATE * dt).clamp(0.0, 1.0);
    normalize_angle(heading + diff * fraction)
}

/// Rotate the velocity toward `target`, keeping its speed
pub fn steer_toward(projectile: &mut Projectile, target: Vec2, dt: f32) {
    let speed = projectile.vel.length();
    if speed == 0.0 {
        return;
    }
    let heading = projectile.vel.y.atan2(projectile.vel.x);
    let bearing = angle_to(projectile.center(), target);
    projectile.vel = from_angle(turn_toward(heading, bearing, dt), speed);
}
