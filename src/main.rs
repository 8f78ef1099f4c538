//! Dino Runner entry point
//!
//! Headless attract mode: the autopilot plays one run against the on-disk
//! high score, at simulation speed, and logs what happened. A windowed host
//! drives the same `advance()` loop from its timer and paints `Scene`s.

use std::time::{SystemTime, UNIX_EPOCH};

use dino_runner::consts::TICK_HZ;
use dino_runner::sim::{
    AlphaMask, GameEvent, GamePhase, GameState, SpawnChoice, SpriteId, SpriteMasks, advance,
    apply_command, autopilot, count_spawns,
};
use dino_runner::{FileHighScores, Tuning};

/// Give up after ten simulated minutes
const MAX_TICKS: u64 = 10 * 60 * TICK_HZ as u64;

const TUNING_FILE: &str = "dino-runner.json";

/// Rough silhouettes standing in for the bundled artwork
fn demo_sprites() -> SpriteMasks {
    let mut masks = SpriteMasks::new();

    // Dino: head up front over a body on two legs
    for sprite in [
        SpriteId::DinoStart,
        SpriteId::DinoRun1,
        SpriteId::DinoRun2,
        SpriteId::DinoJump,
        SpriteId::DinoDead,
    ] {
        let (w, h) = sprite.native_size();
        let mask = AlphaMask::from_fn(w as u32, h as u32, |x, y| {
            let (x, y) = (x as i32, y as i32);
            let head = x > w / 2 && y < h / 3;
            let body = x > w / 5 && x < w * 4 / 5 && y >= h / 3 && y < h * 4 / 5;
            let legs = (x - w / 3).abs() < w / 10 || (x - w * 3 / 5).abs() < w / 10;
            if head || body || (legs && y >= h * 4 / 5) { 255 } else { 0 }
        });
        if let Some(mask) = mask {
            masks.insert(sprite, mask);
        }
    }

    // Ducking dino: a long low body
    for sprite in [SpriteId::DinoDuck1, SpriteId::DinoDuck2] {
        let (w, h) = sprite.native_size();
        if let Some(mask) = AlphaMask::from_fn(w as u32, h as u32, |_, y| if (y as i32) > h / 4 { 255 } else { 0 }) {
            masks.insert(sprite, mask);
        }
    }

    // Cacti: trunk plus two arms
    for sprite in [
        SpriteId::SmallCactus1,
        SpriteId::SmallCactus2,
        SpriteId::SmallCactus3,
        SpriteId::LargeCactus1,
        SpriteId::LargeCactus2,
        SpriteId::LargeCactus3,
    ] {
        let (w, h) = sprite.native_size();
        let mask = AlphaMask::from_fn(w as u32, h as u32, |x, y| {
            let (x, y) = (x as i32, y as i32);
            let trunk = (x - w / 2).abs() < w / 6;
            let arms = y > h / 4 && y < h / 2;
            if trunk || arms { 255 } else { 0 }
        });
        if let Some(mask) = mask {
            masks.insert(sprite, mask);
        }
    }

    // Birds: an ellipse
    for sprite in [SpriteId::Bird1, SpriteId::Bird2] {
        let (w, h) = sprite.native_size();
        let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
        let mask = AlphaMask::from_fn(w as u32, h as u32, |x, y| {
            let dx = (x as f32 - cx) / cx;
            let dy = (y as f32 - cy) / cy;
            if dx * dx + dy * dy <= 1.0 { 255 } else { 0 }
        });
        if let Some(mask) = mask {
            masks.insert(sprite, mask);
        }
    }

    masks
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dino Runner (headless) starting...");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let tuning = Tuning::load_or_default(TUNING_FILE);
    let mut store = FileHighScores::per_user().unwrap_or_else(|| {
        log::warn!("No per-user data directory, keeping the high score in the working directory");
        FileHighScores::in_dir(".")
    });
    let sprites = demo_sprites();

    let mut state = GameState::with_store(seed, tuning, &store);
    let (mut ground, mut flying) = (0, 0);

    while state.time_ticks < MAX_TICKS && state.phase != GamePhase::Over {
        if let Some(command) = autopilot(&state) {
            apply_command(&mut state, command);
        }
        let events = advance(&mut state, &sprites, &mut store);
        ground += count_spawns(&events, SpawnChoice::Ground);
        flying += count_spawns(&events, SpawnChoice::Flying);
        for event in events {
            if let GameEvent::NewHighScore { score } = event {
                println!("New high score: {score}");
            }
        }
    }

    let seconds = state.time_ticks as f64 / TICK_HZ as f64;
    log::info!(
        "Run (seed {}) finished after {:.1}s: {} ground and {} flying obstacles spawned",
        state.seed,
        seconds,
        ground,
        flying
    );
    println!("Score {:05}  HI {:05}", state.score, state.high_score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library; there is no standalone web binary
}
