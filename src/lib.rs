//! Dino Runner - A side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Simulation (player physics, spawning, day/night, collisions, game state)
//! - `highscores`: High score persistence in the legacy obfuscated format
//! - `tuning`: Data-driven game balance
//!
//! Window, painting, input devices and asset decoding are left to the host.
//! The host calls [`sim::advance`] at a fixed cadence and draws [`sim::Scene`].

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::{FileHighScores, HighScoreError, HighScoreStore, MemoryHighScores};
pub use tuning::{Tuning, TuningError};

/// Fixed viewport and sprite geometry
pub mod consts {
    /// Viewport dimensions
    pub const VIEWPORT_WIDTH: i32 = 800;
    pub const VIEWPORT_HEIGHT: i32 = 300;

    /// Ground baseline used by obstacles and the track
    pub const GROUND_Y: i32 = 264;
    /// Track texture / obstacle bottom alignment tweak
    pub const GROUND_ALIGN_OFFSET: i32 = 5;

    /// Player anchor: fixed x, y of the sprite top while standing
    pub const PLAYER_X: i32 = 50;
    pub const PLAYER_GROUND_Y: i32 = 220;

    /// Player sprite box
    pub const PLAYER_WIDTH: i32 = 44;
    pub const PLAYER_HEIGHT: i32 = 44;
    pub const PLAYER_DUCK_HEIGHT: i32 = 24;
    pub const PLAYER_DUCK_Y_OFFSET: i32 = 20;

    /// Collision rectangle insets (per side)
    pub const COLLISION_INSET_X: i32 = 6;
    pub const COLLISION_INSET_Y: i32 = 10;

    /// Jump physics (pixels/tick, pixels/tick²)
    pub const JUMP_SPEED: i32 = -16;
    pub const GRAVITY: i32 = 1;

    /// Ticks between run/duck animation frame flips
    pub const PLAYER_ANIM_TICKS: u32 = 8;

    /// Nominal tick rate the host should drive `advance()` at
    pub const TICK_HZ: u32 = 60;
}

/// Linear interpolation between two colour channels, exact at both endpoints
#[inline]
pub fn lerp_channel(a: u8, b: u8, t: f32) -> u8 {
    let t = t.clamp(0.0, 1.0);
    (a as f32 + (b as f32 - a as f32) * t).round() as u8
}
