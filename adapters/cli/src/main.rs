#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Strafe session.

mod config;
mod pilot;
mod summary;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use strafe_presentation::{present, FloatingScores, SceneLog, ScriptedAnimator};
use strafe_simulation::{FrameInput, Simulation};
use strafe_world::query;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{config::GameConfig, pilot::Pilot, summary::Summary};

/// Runs the side-scrolling simulation with a scripted pilot and reports the outcome.
#[derive(Debug, Parser)]
#[command(name = "strafe", version)]
struct Args {
    /// TOML file with world, system and run settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Session length in seconds; overrides `run.seconds`.
    #[arg(long)]
    seconds: Option<f32>,
    /// Fixed steps per second; overrides `run.fps`.
    #[arg(long)]
    fps: Option<u32>,
    /// Run seed; overrides `run.seed`.
    #[arg(long)]
    seed: Option<u64>,
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log: String,
    /// Print the summary as JSON instead of text.
    #[arg(long)]
    summary_json: bool,
}

/// Entry point for the Strafe command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log)?;

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seconds) = args.seconds {
        config.run.seconds = seconds;
    }
    if let Some(fps) = args.fps {
        config.run.fps = fps;
    }
    if args.seed.is_some() {
        config.run.seed = args.seed;
    }
    config.validate()?;

    let summary = play(config)?;
    if args.summary_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("failed to encode summary")?
        );
    } else {
        println!("{summary}");
    }
    Ok(())
}

fn init_logging(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("invalid log filter `{default_filter}`"))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .context("failed to install tracing subscriber")
}

/// Runs a complete session and returns its summary.
fn play(config: GameConfig) -> Result<Summary> {
    let GameConfig {
        simulation,
        animation,
        pilot,
        run,
    } = config;
    let simulation = match run.seed {
        Some(seed) => simulation.with_seed(seed),
        None => simulation,
    };

    let mut simulation = Simulation::new(simulation).context("invalid simulation config")?;
    let mut animator = ScriptedAnimator::new(animation);
    let mut scores = FloatingScores::new();
    let mut scenes = SceneLog::new();
    let mut pilot = Pilot::new(pilot);
    let mut summary = Summary::default();

    let dt = Duration::from_secs_f64(1.0 / f64::from(run.fps));
    let step = dt.as_secs_f32();
    let frames = run.frames();
    info!(frames, fps = run.fps, "session started");

    let mut finished = Vec::new();
    let mut events = Vec::new();
    for _ in 0..frames {
        let (position, trigger_held) = pilot.steer(step);
        simulation.step(
            dt,
            FrameInput {
                player_position: Some(position),
                trigger_held,
                commands: std::mem::take(&mut finished),
            },
            &mut events,
        );
        present(&events, &mut animator, &mut scores, &mut scenes)?;
        animator.advance(step, &mut finished);
        scores.advance(step);
        summary.observe(&events);
        events.clear();

        if run.stop_on_lose && !scenes.requested().is_empty() {
            info!(frame = simulation.frame(), "lose scene requested; ending session");
            break;
        }
    }

    let player = query::player(simulation.world());
    summary.frames = simulation.frame();
    summary.seconds = simulation.frame() as f32 * step;
    summary.score = query::score_total(simulation.world());
    summary.player_health = player.health;
    summary.player_alive = player.alive;
    debug!(labels = scores.labels().count(), "score labels still visible");
    info!(score = summary.score, frames = summary.frames, "session finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_run(seconds: f32, seed: u64) -> GameConfig {
        let mut config = GameConfig::default();
        config.run.seconds = seconds;
        config.run.fps = 30;
        config.run.seed = Some(seed);
        config
    }

    #[test]
    fn session_runs_for_the_requested_frames() {
        let summary = play(short_run(2.0, 3)).expect("session runs");

        assert_eq!(summary.frames, 60);
        assert!(summary.player_alive);
        assert!(summary.projectiles_fired > 0);
    }

    #[test]
    fn seeded_sessions_repeat() {
        let first = play(short_run(20.0, 11)).expect("session runs");
        let second = play(short_run(20.0, 11)).expect("session runs");

        assert_eq!(first, second);
    }

    #[test]
    fn fragile_pilot_ends_the_session_early() {
        let mut config = short_run(120.0, 5);
        config.simulation.world.player.health = 1;
        config.pilot.autofire = false;
        config.pilot.amplitude = 0.0;
        config.simulation.world.mine.player_align_chance = 1.0;
        config.simulation.world.mine.player_align_jitter = 0.0;

        let summary = play(config).expect("session runs");

        assert!(!summary.player_alive);
        assert_eq!(summary.scenes.len(), 1);
        assert!(summary.frames < 120 * 30);
    }

    #[test]
    fn arguments_parse() {
        let args = Args::try_parse_from([
            "strafe",
            "--seconds",
            "5",
            "--seed",
            "4",
            "--summary-json",
        ])
        .expect("arguments parse");

        assert_eq!(args.seconds, Some(5.0));
        assert_eq!(args.seed, Some(4));
        assert!(args.summary_json);
        assert!(args.config.is_none());
        assert_eq!(args.log, "info");
    }
}
