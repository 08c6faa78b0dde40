//! Run state and core simulation types
//!
//! Everything the tick mutates lives here. Entities refer to each other by
//! `EntityId` only, so removal never leaves a dangling link.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::director::{DEFAULT_DIRECTOR_MESSAGE, WaveConfig};
use crate::settings::Settings;

/// Display colors (0xRRGGBB). Passed through to the renderer untouched.
pub mod palette {
    pub const ACTOR: u32 = 0x3b82f6;
    pub const ACTOR_INVINCIBLE: u32 = 0xf59e0b;
    pub const ACTOR_HOMING: u32 = 0xec4899;
    pub const GROUND: u32 = 0x10b981;
    pub const FLYING: u32 = 0xef4444;
    pub const PROJECTILE: u32 = 0xf59e0b;
    pub const PROJECTILE_HOMING: u32 = 0xec4899;
    pub const PROJECTILE_ADVERSARY: u32 = 0xd946ef;
    pub const AMMO: u32 = 0xeab308;
    pub const HEALTH: u32 = 0xf43f5e;
    pub const INVINCIBILITY: u32 = 0x8b5cf6;
    pub const HOMING: u32 = 0xec4899;
}

/// Opaque, stable entity handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Monotonic handle allocator
///
/// Ids are unique until `u32::MAX` allocations, then wrap back to 1 (0 is
/// never handed out).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.checked_add(1).unwrap_or(1);
        id
    }
}

/// The locally controlled actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub color: u32,
    pub lives: u32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub grounded: bool,
    /// Aim direction (radians)
    pub facing: f32,
    pub score: u64,
    pub kills: u32,
    /// Absolute expiry (survival seconds) of the invincibility status
    pub invincible_until: f64,
    pub is_invincible: bool,
    /// Absolute expiry (survival seconds) of the homing-ammo status
    pub homing_until: f64,
    pub is_homing: bool,
    /// Remaining jetpack burn (ms)
    pub jetpack_fuel: f32,
    pub is_thrusting: bool,
}

impl Actor {
    pub fn new(id: EntityId, lives: u32) -> Self {
        Self {
            id,
            pos: ACTOR_SPAWN,
            vel: Vec2::ZERO,
            width: ACTOR_SIZE,
            height: ACTOR_SIZE,
            color: palette::ACTOR,
            lives,
            ammo: MAX_AMMO,
            max_ammo: MAX_AMMO,
            grounded: false,
            facing: 0.0,
            score: 0,
            kills: 0,
            invincible_until: 0.0,
            is_invincible: false,
            homing_until: 0.0,
            is_homing: false,
            jetpack_fuel: JETPACK_MAX_FUEL,
            is_thrusting: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) / 2.0
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Resolve both timed statuses against the current time
    pub fn refresh_status(&mut self, now: f64) {
        self.is_invincible = now < self.invincible_until;
        self.is_homing = now < self.homing_until;
        self.color = if self.is_invincible {
            palette::ACTOR_INVINCIBLE
        } else if self.is_homing {
            palette::ACTOR_HOMING
        } else {
            palette::ACTOR
        };
    }

    /// Refresh (not stack) the invincibility timer
    pub fn grant_invincibility(&mut self, now: f64) {
        self.invincible_until = now + INVINCIBILITY_DURATION;
        self.refresh_status(now);
    }

    /// Refresh (not stack) the homing-ammo timer
    pub fn grant_homing(&mut self, now: f64) {
        self.homing_until = now + HOMING_DURATION;
        self.refresh_status(now);
    }

    /// Back to the spawn point at rest
    pub fn respawn(&mut self) {
        self.pos = ACTOR_SPAWN;
        self.vel = Vec2::ZERO;
        self.grounded = false;
    }
}

/// Horizontal sweep direction of a flyer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Behavioral category of an adversary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Archetype {
    /// Walks toward the actor, jumps, fires aimed shots
    Ground,
    /// Sweeps across the world, drops shots straight down
    Flying {
        direction: Direction,
        passes_remaining: u32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adversary {
    pub id: EntityId,
    pub archetype: Archetype,
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub color: u32,
    pub hp: u32,
    pub max_hp: u32,
    /// Seconds until the next shot
    pub attack_cooldown: f32,
    pub grounded: bool,
    /// Horizontal speed (chase speed for ground, sweep speed for flyers)
    pub speed: f32,
}

impl Adversary {
    pub fn ground(id: EntityId, pos: Vec2, hp: u32, speed: f32, attack_cooldown: f32) -> Self {
        let hp = hp.max(1);
        Self {
            id,
            archetype: Archetype::Ground,
            pos,
            vel: Vec2::ZERO,
            width: GROUND_SIZE,
            height: GROUND_SIZE,
            color: palette::GROUND,
            hp,
            max_hp: hp,
            attack_cooldown,
            grounded: false,
            speed,
        }
    }

    pub fn flying(
        id: EntityId,
        pos: Vec2,
        direction: Direction,
        passes: u32,
        attack_cooldown: f32,
    ) -> Self {
        Self {
            id,
            archetype: Archetype::Flying {
                direction,
                passes_remaining: passes.max(1),
            },
            pos,
            vel: Vec2::new(direction.sign() * FLYING_SPEED, 0.0),
            width: FLYING_SIZE,
            height: FLYING_SIZE,
            color: palette::FLYING,
            hp: FLYING_HP,
            max_hp: FLYING_HP,
            attack_cooldown,
            grounded: false,
            speed: FLYING_SPEED,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) / 2.0
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// HP fraction for health bars
    pub fn health_ratio(&self) -> f32 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f32 / self.max_hp as f32
    }
}

impl Archetype {
    pub fn is_flying(&self) -> bool {
        matches!(self, Archetype::Flying { .. })
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileSource {
    Actor,
    Adversary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub owner: EntityId,
    pub source: ProjectileSource,
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub color: u32,
    /// Nominal damage (hits always deal one point)
    pub damage: u32,
    pub homing: bool,
}

impl Projectile {
    /// Spawn centered on `center`
    pub fn new(
        id: EntityId,
        owner: EntityId,
        source: ProjectileSource,
        center: Vec2,
        vel: Vec2,
        size: f32,
    ) -> Self {
        let color = match source {
            ProjectileSource::Actor => palette::PROJECTILE,
            ProjectileSource::Adversary => palette::PROJECTILE_ADVERSARY,
        };
        Self {
            id,
            owner,
            source,
            pos: center - Vec2::splat(size / 2.0),
            vel,
            width: size,
            height: size,
            color,
            damage: 1,
            homing: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) / 2.0
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Ammo,
    Health,
    Invincibility,
    Homing,
}

impl PickupKind {
    pub const ALL: [PickupKind; 4] = [
        PickupKind::Ammo,
        PickupKind::Health,
        PickupKind::Invincibility,
        PickupKind::Homing,
    ];

    /// Effect magnitude (unused by the two status kinds)
    pub fn value(self) -> u32 {
        match self {
            PickupKind::Ammo => AMMO_PICKUP_VALUE,
            PickupKind::Health => HEALTH_PICKUP_VALUE,
            PickupKind::Invincibility | PickupKind::Homing => 0,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            PickupKind::Ammo => palette::AMMO,
            PickupKind::Health => palette::HEALTH,
            PickupKind::Invincibility => palette::INVINCIBILITY,
            PickupKind::Homing => palette::HOMING,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: EntityId,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub color: u32,
    pub value: u32,
    /// Absolute expiry (survival seconds)
    pub expires_at: f64,
    /// Resting on a platform
    pub settled: bool,
}

impl Pickup {
    pub fn new(id: EntityId, kind: PickupKind, pos: Vec2, now: f64) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            width: PICKUP_SIZE,
            height: PICKUP_SIZE,
            color: kind.color(),
            value: kind.value(),
            expires_at: now + PICKUP_LIFETIME,
            settled: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }
}

/// Static level geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Ground slab plus two layers of floating ledges
pub const DEFAULT_PLATFORMS: [Platform; 8] = [
    Platform::new(0.0, 800.0, 2000.0, 200.0),
    Platform::new(300.0, 650.0, 200.0, 20.0),
    Platform::new(600.0, 500.0, 200.0, 20.0),
    Platform::new(900.0, 650.0, 200.0, 20.0),
    Platform::new(1200.0, 500.0, 200.0, 20.0),
    Platform::new(1500.0, 650.0, 200.0, 20.0),
    Platform::new(50.0, 400.0, 150.0, 20.0),
    Platform::new(1800.0, 400.0, 150.0, 20.0),
];

/// Things that happened during the last tick (for audio/HUD collaborators)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    AdversarySpawned { id: EntityId, archetype: Archetype },
    AdversaryDefeated { id: EntityId },
    /// A flyer ran out of passes and left without reward
    AdversaryEscaped { id: EntityId },
    DropRolled { dropped: Option<PickupKind> },
    WaveDrop,
    PickupCollected { kind: PickupKind },
    ActorHit { lives: u32 },
    FellOut { lives: u32 },
    GameOver,
}

/// Result delivered once when the run ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub survival_time_secs: f64,
    pub kills: u32,
    pub score: u64,
}

/// Complete run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub actor: Actor,
    /// Active adversaries (spawn order)
    pub adversaries: Vec<Adversary>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    /// Fixed for the lifetime of the run
    pub platforms: Arc<[Platform]>,
    /// Render-only camera offset (top-left of the view)
    pub camera: Vec2,
    pub viewport: Vec2,
    /// Seconds survived
    pub survival_time: f64,
    pub over: bool,
    /// Captured at the terminal transition
    pub summary: Option<RunSummary>,
    /// HEALTH pickups clamp to this
    pub max_lives: u32,
    pub jetpack_enabled: bool,
    /// Survival time of the last spawn attempt
    pub last_spawn_at: f64,
    /// Survival time of the last periodic pickup drop
    pub last_wave_drop_at: f64,
    /// Difficulty proposed by an external director, if any
    pub director_override: Option<WaveConfig>,
    pub director_message: String,
    /// Events raised during the most recent tick
    pub events: Vec<GameEvent>,
    pub ids: IdAllocator,
}

impl GameState {
    /// Create a new run on the default platform layout
    pub fn new(settings: &Settings) -> Self {
        Self::with_platforms(settings, DEFAULT_PLATFORMS.to_vec())
    }

    pub fn with_platforms(settings: &Settings, platforms: Vec<Platform>) -> Self {
        let mut ids = IdAllocator::default();
        let lives = settings.difficulty.initial_lives();
        let actor = Actor::new(ids.next(), lives);
        log::info!(
            "New run: difficulty={} lives={} seed={}",
            settings.difficulty.as_str(),
            lives,
            settings.seed
        );
        Self {
            actor,
            adversaries: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            platforms: platforms.into(),
            camera: Vec2::ZERO,
            viewport: Vec2::new(settings.viewport_width, settings.viewport_height),
            survival_time: 0.0,
            over: false,
            summary: None,
            max_lives: lives,
            jetpack_enabled: settings.jetpack,
            last_spawn_at: 0.0,
            last_wave_drop_at: 0.0,
            director_override: None,
            director_message: String::from(DEFAULT_DIRECTOR_MESSAGE),
            events: Vec::new(),
            ids,
        }
    }

    /// Immutable copy for the renderer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            actor: self.actor.clone(),
            adversaries: self.adversaries.clone(),
            projectiles: self.projectiles.clone(),
            pickups: self.pickups.clone(),
            platforms: Arc::clone(&self.platforms),
            camera: self.camera,
            survival_time: self.survival_time,
            is_over: self.over,
            director_message: self.director_message.clone(),
            events: self.events.clone(),
        }
    }
}

/// Read-only view of one tick's outcome
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub actor: Actor,
    pub adversaries: Vec<Adversary>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub platforms: Arc<[Platform]>,
    pub camera: Vec2,
    pub survival_time: f64,
    pub is_over: bool,
    pub director_message: String,
    pub events: Vec<GameEvent>,
}
