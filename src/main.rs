//! Journey of Unity headless runner
//!
//! Plays a scripted input sequence through the kernel, prints every event
//! message and dumps the final world snapshot as JSON.
//!
//! Usage: `journey-of-unity [levels.json] [tuning.json]`

use journey_of_unity::platform::{EdgeTracker, MessageSink, PresentationSink, drive_frame};
use journey_of_unity::sim::{Control, ControlSet, GamePhase, WorldState};
use journey_of_unity::{BuiltinLevels, JsonLevels, LevelProvider, Tuning};

/// Prints messages to stdout
struct ConsoleMessages;

impl MessageSink for ConsoleMessages {
    fn show(&mut self, text: &str, duration_ms: u32) {
        println!("[{:>5} ms] {}", duration_ms, text);
    }
}

/// Logs phase and level changes instead of drawing
#[derive(Default)]
struct PhaseTrace {
    last: Option<(u32, GamePhase)>,
}

impl PresentationSink for PhaseTrace {
    fn present(&mut self, world: &WorldState) {
        let now = (world.level, world.phase);
        if self.last != Some(now) {
            log::info!(
                "tick {}: level {} \"{}\" {:?}",
                world.time_ticks,
                world.level,
                world.level_name,
                world.phase
            );
            self.last = Some(now);
        }
    }
}

/// (frames, controls held) pairs played in order
fn script() -> Vec<(u32, Vec<Control>)> {
    use Control::*;
    vec![
        (60, vec![MoveRight]),
        (1, vec![MoveRight, Jump]),
        (40, vec![MoveRight]),
        (20, vec![CreatePlatform]),
        (10, vec![Break]),
        (1, vec![SelectSkyTender]),
        (1, vec![Illuminate]),
        (30, vec![MoveRight]),
        (1, vec![Jump]),
        (8, vec![]),
        (1, vec![Jump]),
        (60, vec![MoveRight]),
        (1, vec![Pause]),
        (30, vec![]),
        (1, vec![Pause]),
        (1, vec![SelectEarthBound]),
        (120, vec![MoveLeft]),
        (1, vec![Restart]),
        (60, vec![]),
    ]
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let levels: Box<dyn LevelProvider> = match args.next() {
        Some(path) => {
            log::info!("loading levels from {}", path);
            Box::new(JsonLevels::from_path(path)?)
        }
        None => Box::new(BuiltinLevels::new()),
    };
    let tuning = match args.next() {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    let mut world = WorldState::new(tuning, levels.as_ref())?;
    let mut tracker = EdgeTracker::new();
    let mut trace = PhaseTrace::default();
    let mut console = ConsoleMessages;

    for (frames, controls) in script() {
        let held: ControlSet = controls.into_iter().collect();
        for _ in 0..frames {
            tracker.update(held);
            drive_frame(&mut world, &tracker, levels.as_ref(), &mut trace, &mut console)?;
        }
    }

    println!("{}", serde_json::to_string_pretty(&world)?);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Journey of Unity (headless) starting...");

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
