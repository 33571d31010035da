//! Horde Survivor headless runner
//!
//! Plays one run with the autopilot at the default fixed step and prints the
//! run summary as JSON.

use std::path::PathBuf;

use clap::Parser;
use horde_survivor::audio::AudioManager;
use horde_survivor::consts::SIM_DT;
use horde_survivor::platform::Autopilot;
use horde_survivor::{Session, Settings, SettingsError, logging};

/// Simulate a survive-the-horde run without a window
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RNG seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many simulated seconds
    #[arg(long, default_value_t = 600.0)]
    seconds: f64,

    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the final world snapshot as JSON
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<(), SettingsError> {
    let args = Args::parse();
    logging::init(args.verbose);
    log::info!("Horde Survivor starting...");

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }

    let mut audio = AudioManager::new();
    settings.apply_audio(&mut audio);

    let mut session = Session::new(settings);
    let mut pilot = Autopilot::new();
    session.init(&mut audio);
    session.render(&mut pilot);

    let mut elapsed = 0.0f64;
    while !session.is_over() && elapsed < args.seconds {
        session.update(SIM_DT, &mut pilot, &mut audio);
        session.render(&mut pilot);
        elapsed += f64::from(SIM_DT);
    }

    let summary = session.summary();
    log::info!(
        "Survived {:.1}s, level {}, {} kills, score {}",
        summary.survived_secs,
        summary.level,
        summary.kills,
        summary.score
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    if args.dump {
        println!("{}", serde_json::to_string_pretty(&session.view())?);
    }
    Ok(())
}
