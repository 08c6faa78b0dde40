//! Adversary behavior
//!
//! One pass moves and fires every living adversary, then a sweep removes the
//! defeated (crediting the actor) and the flyers that used up their passes.

use glam::Vec2;
use rand::Rng;

use super::physics;
use super::pickup;
use super::state::{
    Actor, Adversary, Archetype, Direction, EntityId, GameEvent, GameState, Platform, Projectile,
    ProjectileSource,
};
use super::tick::Step;
use crate::consts::*;
use crate::{angle_to, from_angle};

/// -1, 0 or 1
#[inline]
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Outcome of moving a flyer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    Continue,
    Reversed,
    Exhausted,
}

pub fn update_adversaries<R: Rng + ?Sized>(state: &mut GameState, step: Step, rng: &mut R) {
    let mut escaped: Vec<EntityId> = Vec::new();
    {
        let GameState {
            actor,
            adversaries,
            projectiles,
            platforms,
            ids,
            ..
        } = state;

        for adversary in adversaries.iter_mut().filter(|a| a.is_alive()) {
            match adversary.archetype {
                Archetype::Ground => move_ground(adversary, actor, platforms, step.dt, rng),
                Archetype::Flying { .. } => {
                    if sweep_flyer(adversary, step.dt) == Sweep::Exhausted {
                        escaped.push(adversary.id);
                        continue;
                    }
                }
            }

            adversary.attack_cooldown -= step.elapsed_secs;
            if adversary.attack_cooldown <= 0.0 {
                projectiles.push(attack(adversary, actor, ids.next()));
            }

            if actor.lives > 0 && adversary.rect().overlaps(&actor.rect()) {
                contact(adversary, actor);
            }
        }
    }

    remove_finished(state, &escaped, rng);
}

/// Gravity, chase, opportunistic jump, landing
fn move_ground<R: Rng + ?Sized>(
    adversary: &mut Adversary,
    actor: &Actor,
    platforms: &[Platform],
    dt: f32,
    rng: &mut R,
) {
    physics::apply_gravity(&mut adversary.vel, dt);

    let dx = actor.center().x - adversary.center().x;
    let dy = actor.center().y - adversary.center().y;
    adversary.vel.x = if dx.abs() > GROUND_DEADZONE {
        sign(dx) * adversary.speed
    } else {
        0.0
    };

    if adversary.grounded && dy < GROUND_JUMP_DY && rng.random_bool(GROUND_JUMP_CHANCE) {
        physics::try_jump(&mut adversary.vel, &mut adversary.grounded);
    }

    physics::integrate(&mut adversary.pos, adversary.vel, dt);
    let size = adversary.size();
    adversary.grounded =
        physics::land_on_platforms(&mut adversary.pos, &mut adversary.vel, size, platforms, dt);
    physics::clamp_to_world_x(&mut adversary.pos, adversary.width);
}

/// Horizontal sweep; a pass ends once the flyer is fully past an edge
pub fn sweep_flyer(adversary: &mut Adversary, dt: f32) -> Sweep {
    let Archetype::Flying {
        direction,
        passes_remaining,
    } = adversary.archetype
    else {
        return Sweep::Continue;
    };

    adversary.vel = Vec2::new(direction.sign() * adversary.speed, 0.0);
    physics::integrate(&mut adversary.pos, adversary.vel, dt);

    let exited = match direction {
        Direction::Right => adversary.pos.x > WORLD_WIDTH + FLYING_EXIT_MARGIN,
        Direction::Left => adversary.pos.x + adversary.width < -FLYING_EXIT_MARGIN,
    };
    if !exited {
        return Sweep::Continue;
    }

    let passes_remaining = passes_remaining.saturating_sub(1);
    if passes_remaining == 0 {
        adversary.archetype = Archetype::Flying {
            direction,
            passes_remaining,
        };
        return Sweep::Exhausted;
    }
    adversary.archetype = Archetype::Flying {
        direction: direction.reversed(),
        passes_remaining,
    };
    Sweep::Reversed
}

/// Fire and reset the cooldown. Ground shots aim at the actor, flyers drop.
fn attack(adversary: &mut Adversary, actor: &Actor, id: EntityId) -> Projectile {
    let (origin, vel, fire_rate) = match adversary.archetype {
        Archetype::Ground => {
            let origin = adversary.center();
            let angle = angle_to(origin, actor.center());
            (
                origin,
                from_angle(angle, ADVERSARY_PROJECTILE_SPEED),
                GROUND_FIRE_RATE,
            )
        }
        Archetype::Flying { .. } => (
            Vec2::new(adversary.center().x, adversary.pos.y + adversary.height),
            Vec2::new(0.0, ADVERSARY_PROJECTILE_SPEED),
            FLYING_FIRE_RATE,
        ),
    };
    adversary.attack_cooldown = fire_rate;
    Projectile::new(
        id,
        adversary.id,
        ProjectileSource::Adversary,
        origin,
        vel,
        ADVERSARY_PROJECTILE_SIZE,
    )
}

/// Touching the actor: knockback only, or an instant kill if invincible
pub fn contact(adversary: &mut Adversary, actor: &mut Actor) {
    if actor.is_invincible {
        adversary.hp = 0;
        actor.vel.y = CONTACT_KNOCKBACK_Y;
    } else {
        actor.vel.x = sign(actor.pos.x - adversary.pos.x) * CONTACT_KNOCKBACK_X;
        actor.vel.y = CONTACT_KNOCKBACK_Y;
    }
}

/// Drop defeated and escaped adversaries; defeats score and roll a drop
fn remove_finished<R: Rng + ?Sized>(state: &mut GameState, escaped: &[EntityId], rng: &mut R) {
    let mut defeated: Vec<(EntityId, Vec2)> = Vec::new();
    state.adversaries.retain(|adv| {
        if !adv.is_alive() {
            defeated.push((adv.id, adv.center()));
            false
        } else {
            !escaped.contains(&adv.id)
        }
    });

    for &id in escaped {
        log::debug!("Flyer {:?} left the field", id);
        state.events.push(GameEvent::AdversaryEscaped { id });
    }

    for (id, center) in defeated {
        state.actor.score += KILL_SCORE;
        state.actor.kills += 1;
        state.events.push(GameEvent::AdversaryDefeated { id });
        pickup::roll_kill_drop(state, center, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::DEFAULT_PLATFORMS;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn world() -> GameState {
        GameState::new(&Settings::default())
    }

    /// Rng that yields the same word forever: 0 passes every chance roll,
    /// `u64::MAX` fails them all
    struct FixedRoll(u64);

    impl rand::RngCore for FixedRoll {
        fn next_u32(&mut self) -> u32 {
            self.0 as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(self.0 as u8);
        }
    }

    /// Grounded ground adversary on the floor, with the actor at `actor_y`
    fn jump_setup(actor_y: f32) -> (Adversary, Actor) {
        let mut adversary = Adversary::ground(EntityId(50), Vec2::new(1000.0, 768.0), 1, 2.0, 10.0);
        adversary.grounded = true;
        let mut actor = Actor::new(EntityId(1), 3);
        actor.pos = Vec2::new(500.0, actor_y);
        (adversary, actor)
    }

    fn flyer(direction: Direction, x: f32, passes: u32) -> Adversary {
        Adversary::flying(EntityId(50), Vec2::new(x, 460.0), direction, passes, 10.0)
    }

    #[test]
    fn test_ground_chases_actor() {
        let mut state = world();
        let mut rng = Pcg32::seed_from_u64(1);
        state
            .adversaries
            .push(Adversary::ground(EntityId(50), Vec2::new(1000.0, 768.0), 1, 2.0, 10.0));
        update_adversaries(&mut state, Step::REFERENCE, &mut rng);
        let adv = &state.adversaries[0];
        assert_eq!(adv.vel.x, -2.0);
        assert_eq!(adv.pos.x, 998.0);
        // Standing on the ground slab
        assert!(adv.grounded);
        assert_eq!(adv.pos.y, 768.0);
    }

    #[test]
    fn test_ground_deadzone() {
        let mut state = world();
        let mut rng = Pcg32::seed_from_u64(1);
        let x = state.actor.pos.x + 5.0;
        state
            .adversaries
            .push(Adversary::ground(EntityId(50), Vec2::new(x, 300.0), 1, 2.0, 10.0));
        update_adversaries(&mut state, Step::REFERENCE, &mut rng);
        assert_eq!(state.adversaries[0].vel.x, 0.0);
    }

    #[test]
    fn test_ground_jumps_when_actor_above() {
        let (mut adversary, actor) = jump_setup(500.0);
        assert!(actor.center().y - adversary.center().y < GROUND_JUMP_DY);

        move_ground(&mut adversary, &actor, &DEFAULT_PLATFORMS, 1.0, &mut FixedRoll(0));
        assert_eq!(adversary.vel.y, JUMP_IMPULSE);
        assert!(!adversary.grounded);
    }

    #[test]
    fn test_ground_jump_needs_the_roll() {
        let (mut adversary, actor) = jump_setup(500.0);
        move_ground(&mut adversary, &actor, &DEFAULT_PLATFORMS, 1.0, &mut FixedRoll(u64::MAX));
        assert_eq!(adversary.vel.y, 0.0);
        assert!(adversary.grounded);
    }

    #[test]
    fn test_ground_no_jump_when_level() {
        // Same footing as the adversary: no jump even on a winning roll
        let (mut adversary, actor) = jump_setup(768.0);
        move_ground(&mut adversary, &actor, &DEFAULT_PLATFORMS, 1.0, &mut FixedRoll(0));
        assert_ne!(adversary.vel.y, JUMP_IMPULSE);
        assert_eq!(adversary.vel.y, 0.0);
        assert!(adversary.grounded);
    }

    #[test]
    fn test_ground_fires_at_actor() {
        let mut state = world();
        let mut rng = Pcg32::seed_from_u64(1);
        state
            .adversaries
            .push(Adversary::ground(EntityId(50), Vec2::new(1000.0, 768.0), 1, 2.0, 0.01));
        update_adversaries(&mut state, Step::REFERENCE, &mut rng);

        assert_eq!(state.projectiles.len(), 1);
        let shot = &state.projectiles[0];
        assert_eq!(shot.source, ProjectileSource::Adversary);
        assert_eq!(shot.owner, EntityId(50));
        // Actor is to the left
        assert!(shot.vel.x < 0.0);
        assert!((shot.vel.length() - ADVERSARY_PROJECTILE_SPEED).abs() < 1e-3);
        assert_eq!(state.adversaries[0].attack_cooldown, GROUND_FIRE_RATE);
    }

    #[test]
    fn test_flyer_drops_straight_down() {
        let mut state = world();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut adv = flyer(Direction::Right, 800.0, 2);
        adv.attack_cooldown = 0.0;
        state.adversaries.push(adv);
        update_adversaries(&mut state, Step::REFERENCE, &mut rng);

        let shot = &state.projectiles[0];
        assert_eq!(shot.vel, Vec2::new(0.0, ADVERSARY_PROJECTILE_SPEED));
        assert_eq!(state.adversaries[0].attack_cooldown, FLYING_FIRE_RATE);
        // Ignores gravity
        assert_eq!(state.adversaries[0].pos.y, 460.0);
    }

    #[test]
    fn test_flyer_reverses_then_exhausts() {
        let mut adv = flyer(Direction::Right, WORLD_WIDTH + FLYING_EXIT_MARGIN, 2);
        assert_eq!(sweep_flyer(&mut adv, 1.0), Sweep::Reversed);
        assert_eq!(
            adv.archetype,
            Archetype::Flying {
                direction: Direction::Left,
                passes_remaining: 1
            }
        );

        adv.pos.x = -FLYING_EXIT_MARGIN - adv.width;
        assert_eq!(sweep_flyer(&mut adv, 1.0), Sweep::Exhausted);
    }

    #[test]
    fn test_exhausted_flyer_leaves_without_reward() {
        let mut state = world();
        let mut rng = Pcg32::seed_from_u64(1);
        state
            .adversaries
            .push(flyer(Direction::Left, -FLYING_EXIT_MARGIN - FLYING_SIZE, 1));
        update_adversaries(&mut state, Step::REFERENCE, &mut rng);

        assert!(state.adversaries.is_empty());
        assert_eq!(state.actor.kills, 0);
        assert_eq!(state.actor.score, 0);
        assert!(state.pickups.is_empty());
        assert_eq!(
            state.events,
            vec![GameEvent::AdversaryEscaped { id: EntityId(50) }]
        );
    }

    #[test]
    fn test_contact_knockback_only() {
        let mut actor = Actor::new(EntityId(1), 5);
        let mut adv = Adversary::ground(EntityId(2), actor.pos + Vec2::new(10.0, 0.0), 2, 2.0, 5.0);
        contact(&mut adv, &mut actor);
        assert_eq!(actor.lives, 5);
        assert_eq!(actor.vel, Vec2::new(-CONTACT_KNOCKBACK_X, CONTACT_KNOCKBACK_Y));
        assert_eq!(adv.hp, 2);
    }

    #[test]
    fn test_contact_while_invincible_kills() {
        let mut actor = Actor::new(EntityId(1), 5);
        actor.grant_invincibility(0.0);
        let mut adv = Adversary::ground(EntityId(2), actor.pos, 3, 2.0, 5.0);
        contact(&mut adv, &mut actor);
        assert_eq!(adv.hp, 0);
        assert_eq!(actor.vel.y, CONTACT_KNOCKBACK_Y);
        assert_eq!(actor.lives, 5);
    }

    #[test]
    fn test_defeat_credits_actor_once() {
        let mut state = world();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut adv = Adversary::ground(EntityId(50), Vec2::new(1500.0, 768.0), 2, 2.0, 10.0);
        adv.hp = 0;
        state.adversaries.push(adv);

        update_adversaries(&mut state, Step::REFERENCE, &mut rng);

        assert!(state.adversaries.is_empty());
        assert_eq!(state.actor.kills, 1);
        assert_eq!(state.actor.score, KILL_SCORE);
        let rolls = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::DropRolled { .. }))
            .count();
        assert_eq!(rolls, 1);
        assert!(state.projectiles.is_empty());
    }
}
