//! Rift Survival headless runner
//!
//! Drives one run with a scripted pilot until the actor runs out of lives
//! (or a time cap is hit) and prints the run summary as JSON.
//!
//! Usage: `rift-survival [settings.json] [max-seconds] [--difficulty NAME] [--director-fallback]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use rift_survival::consts::*;
    use rift_survival::director::{self, DirectorMailbox, WaveConfig};
    use rift_survival::platform::{self, FrameClock, InputMailbox};
    use rift_survival::settings::{DifficultyPreset, Settings};
    use rift_survival::sim::projectile::nearest_living;
    use rift_survival::sim::{GameState, RunSummary, tick};

    const DEFAULT_TIME_CAP_SECS: f64 = 600.0;
    /// Survival seconds between stand-in director proposals (`--director-fallback`)
    const DIRECTOR_PERIOD_SECS: f64 = 30.0;
    /// Ticks between pilot trigger pulls
    const FIRE_EVERY: u64 = 12;

    /// Scripted pilot: kites toward pickups, jumps onto ledges, shoots the
    /// nearest adversary
    fn pilot(state: &GameState, frame: u64, input: &InputMailbox) {
        let actor = &state.actor;
        let center = actor.center();

        let goal = state
            .pickups
            .iter()
            .min_by(|a, b| {
                let dist_a = a.pos.distance_squared(center);
                let dist_b = b.pos.distance_squared(center);
                dist_a
                    .partial_cmp(&dist_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|p| p.pos.x)
            .unwrap_or(WORLD_WIDTH / 2.0);

        let dx = goal - center.x;
        input.set_move_left(dx < -20.0);
        input.set_move_right(dx > 20.0);
        input.set_jump(frame % 45 == 0 || (actor.grounded && dx.abs() > 200.0));

        if let Some(target) = nearest_living(&state.adversaries, center) {
            // The pilot sees the screen like a player would
            let on_screen = target.center() - state.camera;
            input.set_aim(on_screen, state.camera);
            if frame % FIRE_EVERY == 0 {
                input.press_fire();
            }
        }
    }

    /// Command line: `[settings.json] [max-seconds] [--difficulty NAME] [--director-fallback]`
    #[derive(Debug, Default)]
    struct Args {
        settings_path: Option<PathBuf>,
        time_cap: Option<f64>,
        difficulty: Option<DifficultyPreset>,
        /// Post `WaveConfig::fallback` proposals as if a director were running
        director_fallback: bool,
    }

    fn parse_args() -> Args {
        let mut args = Args::default();
        let mut raw = std::env::args().skip(1);
        while let Some(arg) = raw.next() {
            match arg.as_str() {
                "--director-fallback" => args.director_fallback = true,
                "--difficulty" => {
                    let name = raw.next().unwrap_or_default();
                    args.difficulty = DifficultyPreset::from_str(&name);
                    if args.difficulty.is_none() {
                        log::warn!("Unknown difficulty {name:?}, keeping the configured one");
                    }
                }
                _ => match arg.parse::<f64>() {
                    Ok(secs) if secs > 0.0 => args.time_cap = Some(secs),
                    _ => args.settings_path = Some(PathBuf::from(arg)),
                },
            }
        }
        args
    }

    pub fn run() {
        let args = parse_args();
        let time_cap = args.time_cap.unwrap_or(DEFAULT_TIME_CAP_SECS);
        let mut settings = Settings::load(args.settings_path.as_deref());
        if let Some(difficulty) = args.difficulty {
            settings.difficulty = difficulty;
        }

        let mut state = GameState::new(&settings);
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let mut clock = FrameClock::new();
        let input = InputMailbox::new();
        let mailbox = DirectorMailbox::new();

        let mut wave = 0u32;
        let mut summary: Option<RunSummary> = None;

        for (frame, now_ms) in platform::synthetic_timestamps(platform::reference_hz()).enumerate() {
            let frame = frame as u64;

            // Director proposals land between ticks only. Without the flag the
            // mailbox stays empty and the time-based spawn formula runs.
            if args.director_fallback
                && state.survival_time >= (wave + 1) as f64 * DIRECTOR_PERIOD_SECS
            {
                wave += 1;
                mailbox.offer(WaveConfig::fallback(wave));
            }
            director::drain_mailbox(&mut state, &mailbox);

            pilot(&state, frame, &input);
            let mut tick_input = input.snapshot();
            let step = clock.advance(now_ms);
            if let Some(result) = tick(&mut state, &mut tick_input, step, &mut rng) {
                summary = Some(result);
                break;
            }

            if frame % 600 == 0 {
                log::debug!(
                    "t={:.0}s lives={} ammo={} adversaries={} score={}",
                    state.survival_time,
                    state.actor.lives,
                    state.actor.ammo,
                    state.adversaries.len(),
                    state.actor.score
                );
            }
            if state.survival_time >= time_cap {
                log::info!("Time cap of {time_cap:.0}s reached");
                break;
            }
        }

        let summary = summary.unwrap_or(RunSummary {
            survival_time_secs: state.survival_time,
            kills: state.actor.kills,
            score: state.actor.score,
        });
        match serde_json::to_string(&summary) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("Failed to encode run summary: {err}"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Rift Survival (headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on the web; nothing to run here
}
