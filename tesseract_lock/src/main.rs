//! Headless Dimensional Lock session
//!
//! Drives a session tick by tick with synthetic drags, so the rotation
//! policy, slicing and carving can be exercised without a display.
//!
//! Example:
//!   RUST_LOG=debug tesseract_lock --shape 16-cell --ticks 600 \
//!       --key-file key.json --carve --export carved_object.obj

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tesseract_lock::config::SessionConfig;
use tesseract_lock::credential::TrainingKeyVerifier;
use tesseract_lock::polytope::Shape;
use tesseract_lock::{Result, Session};

/// Ticks per W-modifier toggle
const W_MODE_PERIOD: u64 = 40;

#[derive(Parser, Debug)]
#[command(name = "tesseract_lock")]
#[command(about = "Run a scripted 4D rotation session with dimensional access control")]
struct Args {
    /// JSON session config; CLI flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Polytope: 8-cell or 16-cell
    #[arg(long)]
    shape: Option<Shape>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 300)]
    ticks: u64,

    /// Seed for the synthetic drag generator
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Fixed slice position; enables slicing
    #[arg(long, allow_hyphen_values = true)]
    slice_w: Option<f32>,

    /// Sweep the slice through the shape and carve the path
    #[arg(long)]
    carve: bool,

    /// Key file presented halfway through the session
    #[arg(long)]
    key_file: Option<PathBuf>,

    /// Write the carved path as OBJ vertices
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct Tally {
    accepted: usize,
    denied: usize,
    hidden_accepted: usize,
    hidden_denied: usize,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn build_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(shape) = args.shape {
        config.shape = shape;
    }
    if let Some(w) = args.slice_w {
        config.slice_w = w;
        config.slicing = true;
    }
    if args.carve {
        config.slicing = true;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> Result<()> {
    let config = build_config(args)?;
    let mut session = Session::new(&config)?;
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut tally = Tally::default();

    log::info!(
        "session: {} with key {}, {} ticks",
        session.polytope().name(),
        session.key_spec().id,
        args.ticks
    );

    if args.carve {
        session.start_carving();
    }

    for tick in 0..args.ticks {
        if tick == args.ticks / 2 {
            if let Some(path) = &args.key_file {
                let bytes = std::fs::read(path)?;
                let outcome = session.present_key_file(&TrainingKeyVerifier, &bytes, Some("application/json"));
                log::info!("key file {}: {:?}", path.display(), outcome);
            }
        }

        session.set_w_mode((tick / W_MODE_PERIOD) % 2 == 1);
        let dx: f32 = rng.gen_range(-20.0..20.0);
        let dy: f32 = rng.gen_range(-20.0..20.0);
        for decision in session.drag(dx, dy) {
            match (decision.accepted, decision.hidden_axis()) {
                (true, true) => tally.hidden_accepted += 1,
                (true, false) => tally.accepted += 1,
                (false, true) => tally.hidden_denied += 1,
                (false, false) => tally.denied += 1,
            }
        }

        if args.carve && args.slice_w.is_none() {
            // sweep w across [-2, 2] once over the session
            let t = tick as f32 / args.ticks.max(1) as f32;
            session.set_slice_w(-2.0 + 4.0 * t);
        }
        session.tick();
    }

    if args.carve {
        session.stop_carving();
    }

    log::info!(
        "decisions: 3D {} allowed / {} denied, W {} allowed / {} denied",
        tally.accepted,
        tally.denied,
        tally.hidden_accepted,
        tally.hidden_denied
    );
    log::info!(
        "final rotation {:?}, carved {} slices",
        session.rotation(),
        session.carver().len()
    );

    if let Some(path) = &args.export {
        std::fs::write(path, session.export_obj())?;
        log::info!("wrote {} points to {}", session.carver().export().len(), path.display());
    }
    Ok(())
}
