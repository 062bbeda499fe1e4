#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Echo Defence session.
//!
//! An autopilot starts waves whenever the arena is idle and lands hits on
//! the oldest enemy at a configurable rate. Once the requested ticks have run the
//! score is submitted to the leaderboard and the ranking is printed.

mod autopilot;
mod tuning;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use echo_defence_audio::{SilentBackend, SoundBank, SoundCue};
use echo_defence_leaderboard::HighScoreManager;
use echo_defence_session::{query, Session};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::autopilot::Autopilot;

#[derive(Debug, Parser)]
#[command(name = "echo-defence")]
#[command(version, about = "Headless Echo Defence simulation")]
struct Args {
    /// Seed for every random draw of the run
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Number of fixed ticks to simulate
    #[arg(long, default_value_t = 3_600)]
    ticks: u32,

    /// Probability that the autopilot lands a hit on a given tick
    #[arg(long, default_value_t = 0.05, value_parser = parse_probability)]
    hit_chance: f64,

    /// Name recorded on the leaderboard
    #[arg(long, default_value = "Anonymous")]
    name: String,

    /// Leaderboard file
    #[arg(long, default_value = "high_scores.json")]
    scores: PathBuf,

    /// TOML file overriding the default tuning
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Versioned TOML sound manifest
    #[arg(long)]
    sounds: Option<PathBuf>,
}

/// Entry point for the Echo Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let tuning = tuning::load(args.tuning.as_deref())?;
    let mut session = Session::new(tuning, args.seed).context("failed to create session")?;
    let mut sounds = args.sounds.as_ref().map(|path| {
        SoundBank::from_manifest_path(path, SilentBackend).unwrap_or_else(|error| {
            warn!(error = %format!("{error:#}"), "sound manifest unusable, running silent");
            SoundBank::empty(SilentBackend)
        })
    });
    let mut autopilot = Autopilot::new(args.seed, args.hit_chance);

    println!("{}", query::welcome_banner(&session));

    let mut events = Vec::new();
    for _ in 0..args.ticks {
        events.clear();
        if autopilot.step(&mut session, &mut events) {
            play(&mut sounds, SoundCue::EchoBurst);
        }
        let _ = session.shake_offset();
        for event in &events {
            if let Some(cue) = SoundCue::for_event(event) {
                play(&mut sounds, cue);
            }
        }
    }
    play(&mut sounds, SoundCue::GameOver);

    let wave = query::wave_state(&session).current_wave;
    let score = query::score(&session);
    info!(wave, score, ticks = args.ticks, "run finished");
    println!("Reached wave {wave} with a score of {score}.");

    let mut high_scores = HighScoreManager::open(&args.scores);
    session
        .submit_score(&args.name, &mut high_scores)
        .with_context(|| format!("failed to save score to {}", args.scores.display()))?;

    println!("Leaderboard:");
    for (rank, entry) in high_scores.leaderboard().iter().enumerate() {
        println!("{:>2}. {:<16} {:>8}", rank + 1, entry.name, entry.score);
    }
    Ok(())
}

fn play(sounds: &mut Option<SoundBank<SilentBackend>>, cue: SoundCue) {
    if let Some(bank) = sounds {
        bank.play(cue);
    }
}

fn parse_probability(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|error| format!("`{raw}` is not a number: {error}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is outside [0, 1]"))
    }
}
