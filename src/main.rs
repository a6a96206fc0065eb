//! Headless driver binary for the palmtide gesture physics engine.
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use log::info;
use palmtide::replay::{HandKeyframe, HandTrack, HeadlessSurface, ScriptedDetector, SyntheticCamera};
use palmtide::{init_logging, EngineConfig, Session, SessionParts, Viewport, VoiceCommand};

/// Headless run of the gesture physics engine against a scripted hand
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file overriding engine tuning
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 6.0)]
    seconds: f64,
    /// Seed for reproducible spawns
    #[arg(long)]
    seed: Option<u64>,
    /// Bodies spawned before the hand appears
    #[arg(long, default_value_t = 4)]
    bodies: usize,
    /// Install the hoop rig
    #[arg(long)]
    hoop: bool,
    /// Voice transcripts applied at start-up, in order
    #[arg(long)]
    say: Vec<String>,
    /// Print the final render snapshot as JSON
    #[arg(long)]
    dump: bool,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

const TICK: f64 = 1.0 / 60.0;
const DETECTOR_LATENCY: f64 = 0.03;

fn keyframe(at: f64, x: f32, y: f32, pinched: bool) -> HandKeyframe {
    HandKeyframe {
        at,
        center: Vec2::new(x, y),
        pinched,
    }
}

/// One hand scoops near the floor and throws up and left; a second swats
/// across the middle of the screen.
fn demo_tracks() -> Vec<HandTrack> {
    vec![
        HandTrack::new(vec![
            keyframe(1.0, 0.5, 0.4, false),
            keyframe(1.8, 0.5, 0.82, false),
            keyframe(2.0, 0.5, 0.84, true),
            keyframe(2.6, 0.65, 0.35, true),
            keyframe(2.7, 0.7, 0.3, false),
            keyframe(3.2, 0.7, 0.3, false),
        ]),
        HandTrack::new(vec![
            keyframe(3.5, 0.9, 0.6, false),
            keyframe(4.2, 0.1, 0.7, false),
        ]),
    ]
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let viewport = Viewport::default();
    let parts = SessionParts {
        surface: Some(HeadlessSurface::new(viewport)),
        video: Some(SyntheticCamera::new(640, 480)),
        detector: Some(ScriptedDetector::new(demo_tracks(), DETECTOR_LATENCY)),
    };
    let mut session = Session::mount(parts, config, args.seed, || info!("first hand result"))
        .context("mounting session")?;

    let engine = session.engine_mut();
    engine.set_hoop_enabled(args.hoop);
    for _ in 0..args.bodies {
        engine.spawn_random_body();
    }
    for transcript in &args.say {
        match VoiceCommand::parse(transcript) {
            Some(command) => info!("voice {transcript:?}: {:?}", command.apply(engine)),
            None => info!("voice {transcript:?}: not a command"),
        }
    }

    let mut now = 0.0;
    while now <= args.seconds {
        session.tick(now);
        now += TICK;
    }

    let snapshot = session.engine().snapshot();
    info!(
        "{} bodies after {:.1}s, score {}",
        snapshot.bodies.len(),
        args.seconds,
        snapshot.score
    );
    if args.dump {
        let json = snapshot.to_json().context("serialising snapshot")?;
        writeln!(std::io::stdout().lock(), "{json}").context("writing snapshot")?;
    }
    session.unmount();
    Ok(())
}
