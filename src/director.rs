//! Difficulty override boundary
//!
//! A remote director may propose wave parameters. Proposals arrive as JSON,
//! get sanitized, and are handed to the tick loop through a single-slot
//! mailbox that is only drained between ticks. The local spawn formula stays
//! in force until a proposal is applied.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

pub const MIN_ENEMY_COUNT: u32 = 1;
pub const MAX_ENEMY_COUNT: u32 = 12;
pub const MIN_ENEMY_HP: u32 = 1;
pub const MAX_ENEMY_HP: u32 = 10;
pub const MIN_SPAWN_INTERVAL_MS: u32 = 500;
pub const MIN_ENEMY_SPEED: f32 = 0.1;
pub const MAX_ENEMY_SPEED: f32 = 2.0;
/// Shown while the local formula is in force
pub const DEFAULT_DIRECTOR_MESSAGE: &str = "Survive.";

/// One wave proposal, in the director's camelCase wire format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveConfig {
    pub enemy_count: u32,
    /// Multiplier on ground chase speed
    pub enemy_speed: f32,
    pub enemy_hp: u32,
    #[serde(rename = "spawnInterval")]
    pub spawn_interval_ms: u32,
    /// Short message shown to the player
    pub flavor_text: String,
}

#[derive(Debug)]
pub enum DirectorError {
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for DirectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "malformed wave config: {err}"),
            Self::Invalid(reason) => write!(f, "invalid wave config: {reason}"),
        }
    }
}

impl std::error::Error for DirectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for DirectorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl WaveConfig {
    /// Parse and sanitize a director payload
    pub fn from_json(json: &str) -> Result<Self, DirectorError> {
        let config: WaveConfig = serde_json::from_str(json)?;
        if !config.enemy_speed.is_finite() {
            return Err(DirectorError::Invalid("enemySpeed is not finite"));
        }
        Ok(config.sanitized())
    }

    /// Clamp every field into the range the spawner accepts
    pub fn sanitized(self) -> Self {
        Self {
            enemy_count: self.enemy_count.clamp(MIN_ENEMY_COUNT, MAX_ENEMY_COUNT),
            enemy_speed: self.enemy_speed.clamp(MIN_ENEMY_SPEED, MAX_ENEMY_SPEED),
            enemy_hp: self.enemy_hp.clamp(MIN_ENEMY_HP, MAX_ENEMY_HP),
            spawn_interval_ms: self.spawn_interval_ms.max(MIN_SPAWN_INTERVAL_MS),
            flavor_text: self.flavor_text.trim().to_string(),
        }
    }

    /// Stand-in proposal on the remote director's own scale
    ///
    /// Hosts that want escalating waves without a live director can post
    /// this. It is not the local fallback: with no override installed the
    /// spawner follows its time-based formula.
    pub fn fallback(wave: u32) -> Self {
        Self {
            enemy_count: 3 + wave,
            enemy_speed: 0.5 + wave as f32 * 0.1,
            enemy_hp: 20 + wave * 5,
            spawn_interval_ms: 3000u32.saturating_sub(wave * 200).max(MIN_SPAWN_INTERVAL_MS),
            flavor_text: String::from("Director offline. Escalating."),
        }
    }
}

/// What the director callback hands to the tick loop
#[derive(Debug, Clone, PartialEq)]
pub enum Proposal {
    /// Replace the local difficulty formula
    Wave(WaveConfig),
    /// The director is gone (failed call, timeout); go back to the local formula
    Withdrawn,
}

/// Single-slot handoff between the director callback and the tick loop
///
/// A newer proposal replaces an unread one. Neither side ever waits on the
/// other beyond the slot lock.
#[derive(Debug, Default)]
pub struct DirectorMailbox {
    slot: Mutex<Option<Proposal>>,
}

impl DirectorMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn post(&self, proposal: Proposal) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.replace(proposal).is_some()
    }

    /// Post a proposal; returns true if it replaced an unread one
    pub fn offer(&self, config: WaveConfig) -> bool {
        self.post(Proposal::Wave(config.sanitized()))
    }

    /// Parse a raw payload and post it. Rejected payloads leave the slot alone.
    pub fn offer_json(&self, json: &str) -> Result<(), DirectorError> {
        let config = WaveConfig::from_json(json).inspect_err(|err| {
            log::warn!("Director proposal rejected: {err}");
        })?;
        self.offer(config);
        Ok(())
    }

    /// Report a failed director call; the local formula takes over again
    pub fn withdraw(&self) -> bool {
        self.post(Proposal::Withdrawn)
    }

    pub fn take(&self) -> Option<Proposal> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Install a proposal as the active override
///
/// Called between ticks only.
pub fn apply_wave_config(state: &mut GameState, config: WaveConfig) {
    let config = config.sanitized();
    log::info!(
        "Director override: {} enemies, hp {}, every {}ms, speed x{:.2}",
        config.enemy_count,
        config.enemy_hp,
        config.spawn_interval_ms,
        config.enemy_speed
    );
    if !config.flavor_text.is_empty() {
        state.director_message = config.flavor_text.clone();
    }
    state.director_override = Some(config);
}

/// Drop any override so spawning follows the local time-based formula
pub fn clear_override(state: &mut GameState) {
    if state.director_override.take().is_some() {
        log::info!("Director override cleared, back to the local formula");
    }
    state.director_message = String::from(DEFAULT_DIRECTOR_MESSAGE);
}

/// Drain the mailbox into the state, if anything is waiting
pub fn drain_mailbox(state: &mut GameState, mailbox: &DirectorMailbox) -> bool {
    match mailbox.take() {
        Some(Proposal::Wave(config)) => apply_wave_config(state, config),
        Some(Proposal::Withdrawn) => clear_override(state),
        None => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::Difficulty;

    const PAYLOAD: &str = r#"{
        "enemyCount": 5,
        "enemySpeed": 1.2,
        "enemyHp": 3,
        "spawnInterval": 1500,
        "flavorText": "They smell fear."
    }"#;

    #[test]
    fn test_parse_camel_case() {
        let config = WaveConfig::from_json(PAYLOAD).unwrap();
        assert_eq!(config.enemy_count, 5);
        assert_eq!(config.enemy_hp, 3);
        assert_eq!(config.spawn_interval_ms, 1500);
        assert_eq!(config.flavor_text, "They smell fear.");
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let json = r#"{"enemyCount":0,"enemySpeed":9.0,"enemyHp":80,"spawnInterval":10,"flavorText":""}"#;
        let config = WaveConfig::from_json(json).unwrap();
        assert_eq!(config.enemy_count, MIN_ENEMY_COUNT);
        assert_eq!(config.enemy_speed, MAX_ENEMY_SPEED);
        assert_eq!(config.enemy_hp, MAX_ENEMY_HP);
        assert_eq!(config.spawn_interval_ms, MIN_SPAWN_INTERVAL_MS);
    }

    #[test]
    fn test_malformed_rejected() {
        assert!(matches!(
            WaveConfig::from_json("{\"enemyCount\": -3}"),
            Err(DirectorError::Parse(_))
        ));
        assert!(WaveConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_fallback_formula() {
        let wave = WaveConfig::fallback(2);
        assert_eq!(wave.enemy_count, 5);
        assert!((wave.enemy_speed - 0.7).abs() < 1e-6);
        assert_eq!(wave.enemy_hp, 30);
        assert_eq!(wave.spawn_interval_ms, 2600);

        assert_eq!(WaveConfig::fallback(40).spawn_interval_ms, MIN_SPAWN_INTERVAL_MS);
    }

    #[test]
    fn test_mailbox_keeps_latest() {
        let mailbox = DirectorMailbox::new();
        assert!(mailbox.take().is_none());

        assert!(!mailbox.offer(WaveConfig::fallback(1)));
        assert!(mailbox.offer(WaveConfig::fallback(2)));
        assert!(matches!(mailbox.take(), Some(Proposal::Wave(c)) if c.enemy_count == 5));
        assert!(mailbox.take().is_none());
    }

    #[test]
    fn test_rejected_payload_leaves_slot() {
        let mailbox = DirectorMailbox::new();
        mailbox.offer(WaveConfig::fallback(0));
        assert!(mailbox.offer_json("{").is_err());
        assert!(matches!(mailbox.take(), Some(Proposal::Wave(c)) if c.enemy_count == 3));
    }

    #[test]
    fn test_drain_applies_override() {
        let mut state = GameState::new(&Settings::default());
        let mailbox = DirectorMailbox::new();
        assert!(!drain_mailbox(&mut state, &mailbox));
        assert_eq!(state.director_message, "Survive.");

        mailbox.offer_json(PAYLOAD).unwrap();
        assert!(drain_mailbox(&mut state, &mailbox));
        assert_eq!(state.director_message, "They smell fear.");

        let difficulty = Difficulty::for_state(&state);
        assert_eq!(difficulty.target_population, 5);
        assert_eq!(difficulty.ground_hp, 3);
        assert_eq!(difficulty.spawn_interval, 1.5);
    }

    #[test]
    fn test_withdraw_restores_local_formula() {
        let mut state = GameState::new(&Settings::default());
        let mailbox = DirectorMailbox::new();
        state.survival_time = 31.0;

        mailbox.offer(WaveConfig::fallback(1));
        drain_mailbox(&mut state, &mailbox);
        assert_ne!(Difficulty::for_state(&state), Difficulty::at(31.0));

        assert!(!mailbox.withdraw());
        assert!(drain_mailbox(&mut state, &mailbox));
        assert!(state.director_override.is_none());
        assert_eq!(state.director_message, DEFAULT_DIRECTOR_MESSAGE);
        assert_eq!(Difficulty::for_state(&state), Difficulty::at(31.0));
    }

    #[test]
    fn test_withdraw_supersedes_unread_offer() {
        let mailbox = DirectorMailbox::new();
        mailbox.offer(WaveConfig::fallback(3));
        assert!(mailbox.withdraw());
        assert_eq!(mailbox.take(), Some(Proposal::Withdrawn));
    }
}
