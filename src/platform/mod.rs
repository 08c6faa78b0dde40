//! Platform abstraction layer
//!
//! Host-side plumbing between the outside world and the tick loop:
//! - Time (wall-clock timestamps to tick steps)
//! - Input (latest intent snapshot, handed off between ticks)

use std::sync::{Mutex, PoisonError};

use glam::Vec2;

use crate::consts::*;
use crate::sim::{Step, TickInput};

/// Converts host frame timestamps into tick steps
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step covering the time since the previous call
    ///
    /// The first call yields one reference frame. Backwards jumps count as
    /// zero and long stalls are clamped.
    pub fn advance(&mut self, now_ms: f64) -> Step {
        let step = match self.last_ms {
            Some(last) => Step::from_millis((now_ms - last) as f32),
            None => Step::REFERENCE,
        };
        self.last_ms = Some(now_ms);
        step
    }

    /// Forget the last timestamp (e.g. after the host was paused)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Latest input intent, written by the input callback and read once per tick
///
/// Movement flags are level-triggered. Fire is latched until the next
/// snapshot so a press between ticks is never lost.
#[derive(Debug, Default)]
pub struct InputMailbox {
    current: Mutex<TickInput>,
}

impl InputMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<F: FnOnce(&mut TickInput)>(&self, f: F) {
        let mut input = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut input);
    }

    pub fn set_move_left(&self, held: bool) {
        self.with(|input| input.move_left = held);
    }

    pub fn set_move_right(&self, held: bool) {
        self.with(|input| input.move_right = held);
    }

    pub fn set_jump(&self, held: bool) {
        self.with(|input| input.jump = held);
    }

    /// Aim at a point given in screen space, offset by the camera
    pub fn set_aim(&self, screen: Vec2, camera: Vec2) {
        self.with(|input| input.aim_point = screen + camera);
    }

    pub fn press_fire(&self) {
        self.with(|input| input.fire = true);
    }

    /// Consistent copy for the next tick; clears the fire latch
    pub fn snapshot(&self) -> TickInput {
        let mut input = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = input.clone();
        input.fire = false;
        snapshot
    }
}

/// Frame timestamps (ms) at a fixed rate, for headless hosts
pub fn synthetic_timestamps(hz: f64) -> impl Iterator<Item = f64> {
    let frame_ms = 1000.0 / hz.max(1.0);
    (0u64..).map(move |i| i as f64 * frame_ms)
}

/// Reference frames per second implied by the dt normalisation
pub fn reference_hz() -> f64 {
    1000.0 / REFERENCE_FRAME_MS as f64
}
