//! Headless session -- an autopilot swipes past incoming enemies.
//!
//! Run with:
//!   cargo run --example headless_run -p runner-engine [-- CONFIG.json [FRAMES]]
//!
//! Set `RUST_LOG=runner_engine=debug` to watch spawns and contacts.

use anyhow::Context;
use runner_engine::config::{RUNNER_WIDTH, RUNNER_X};
use runner_engine::prelude::*;

const FRAME: f64 = 1.0 / 60.0;
const DEFAULT_FRAMES: u64 = 60 * 30;

/// Gap (world units) between the runner's front and an enemy at which the
/// autopilot swipes. A jump needs a head start to clear tall enemies; a dodge
/// must outlast the whole crossing.
const JUMP_DISTANCE: f32 = 2.0;
const DODGE_DISTANCE: f32 = 1.0;

// ---------------------------------------------------------------------------
// Autopilot
// ---------------------------------------------------------------------------

/// Swipes the way a player would: a short drag up or down, then release.
struct Autopilot {
    /// Screen-space point where the current gesture started.
    touch: (f32, f32),
}

impl Autopilot {
    fn new() -> Self {
        Self {
            touch: (400.0, 240.0),
        }
    }

    fn swipe(&self, stage: &mut GameStage, dy: f32) {
        let (x, y) = self.touch;
        stage.on_pointer_down(x, y);
        stage.on_pointer_drag(x, y + dy);
        stage.on_pointer_up(x, y + dy);
    }

    fn react(&self, stage: &mut GameStage) {
        let runner = stage.runner();
        if runner.is_hit() || runner.is_jumping() || runner.is_dodging() {
            return;
        }

        let world = stage.world();
        let threat = world.bodies().into_iter().find_map(|body| {
            let meta = world.metadata(body)?;
            let variant = meta.variant()?;
            let pos = world.position(body)?;
            let gap = pos.x - meta.width() / 2.0 - (RUNNER_X + RUNNER_WIDTH / 2.0);
            let reach = if variant.is_flying() {
                DODGE_DISTANCE
            } else {
                JUMP_DISTANCE
            };
            (gap > 0.0 && gap < reach).then_some(variant)
        });

        match threat {
            Some(variant) if variant.is_flying() => self.swipe(stage, 20.0),
            Some(_) => self.swipe(stage, -20.0),
            None => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            StageConfig::from_json(&json).with_context(|| format!("parsing config {path}"))?
        }
        None => StageConfig::default(),
    };
    let frames = match args.next() {
        Some(n) => n.parse::<u64>().context("FRAMES must be an integer")?,
        None => DEFAULT_FRAMES,
    };

    let mut stage = GameStage::try_new(config).context("building stage")?;
    let autopilot = Autopilot::new();

    for _ in 0..frames {
        autopilot.react(&mut stage);
        stage.act(FRAME);

        if stage.frame_count() % 60 == 0 {
            let snapshot = stage.snapshot();
            tracing::info!(
                frame = snapshot.frame,
                sim_time = snapshot.sim_time,
                state = ?snapshot.runner.state,
                spawned = stage.enemies_spawned(),
                "tick"
            );
        }
        if stage.is_game_over() {
            break;
        }
    }

    let snapshot = stage.snapshot();
    println!("{}", snapshot.to_json()?);
    tracing::info!(
        frames = stage.frame_count(),
        enemies = stage.enemies_spawned(),
        game_over = stage.is_game_over(),
        "session finished"
    );
    Ok(())
}
