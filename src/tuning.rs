//! Data-driven game balance
//!
//! Every knob that shapes a run (speed, spawn cadence, obstacle scale ranges,
//! flying obstacle rules, day/night timing) lives here so it can be loaded
//! from JSON. Missing fields fall back to the shipped defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{GROUND_Y, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

/// Allowed obstacle scale range; keeps scaled sprites within a few
/// viewports so screen coordinates stay far from `i32` limits
pub const SCALE_MIN: f64 = 0.05;
pub const SCALE_MAX: f64 = 4.0;

/// Errors loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// An RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    /// Ground and obstacle scroll speed (pixels/tick)
    pub speed: i32,
    /// Score added per running tick
    pub score_per_tick: u64,

    // === Spawning ===
    /// Spawn interval range (ticks, inclusive)
    pub spawn_interval_min: i32,
    pub spawn_interval_max: i32,
    /// Small cactus scale range
    pub cactus_scale_small_min: f64,
    pub cactus_scale_small_max: f64,
    /// Large cactus scale range
    pub cactus_scale_large_min: f64,
    pub cactus_scale_large_max: f64,
    /// Extra cap for the widest large cactus
    pub cactus_scale_large3_cap: f64,

    // === Flying obstacles ===
    /// Score at which flying obstacles may appear
    pub flying_score_threshold: u64,
    /// Chance (percent, 0-100) that a spawn past the threshold is flying
    pub flying_spawn_percent: u32,
    /// Height of the flight centre above the ground for each band
    pub flying_altitude_low: i32,
    pub flying_altitude_high: i32,
    /// Flying obstacle scale range
    pub flying_scale_min: f64,
    pub flying_scale_max: f64,
    /// Ticks between wing frames
    pub flying_anim_ticks: u32,

    // === Clouds ===
    pub cloud_count: usize,
    pub cloud_y_min: i32,
    pub cloud_y_max: i32,
    /// Cloud speed = speed / divisor
    pub cloud_speed_divisor: i32,

    // === Day/night ===
    pub day_ticks: u64,
    pub to_night_ticks: u64,
    pub night_ticks: u64,
    pub to_day_ticks: u64,
    pub day_color: Rgb,
    pub night_color: Rgb,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            speed: 6,
            score_per_tick: 1,

            spawn_interval_min: 70,
            spawn_interval_max: 130,
            cactus_scale_small_min: 0.72,
            cactus_scale_small_max: 0.9,
            cactus_scale_large_min: 0.58,
            cactus_scale_large_max: 0.75,
            cactus_scale_large3_cap: 0.62,

            flying_score_threshold: 500,
            flying_spawn_percent: 30,
            flying_altitude_low: 20,
            flying_altitude_high: 44,
            flying_scale_min: 0.5,
            flying_scale_max: 0.6,
            flying_anim_ticks: 10,

            cloud_count: 5,
            cloud_y_min: 40,
            cloud_y_max: 140,
            cloud_speed_divisor: 3,

            // 25s day, 3s fades, 15s night at 60 Hz
            day_ticks: 1500,
            to_night_ticks: 180,
            night_ticks: 900,
            to_day_ticks: 180,
            day_color: Rgb(255, 255, 255),
            night_color: Rgb(32, 33, 36),
        }
    }
}

impl Tuning {
    /// Parse from JSON; unspecified fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate();
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a tuning file, falling back to defaults if it is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Repair values that would break the simulation (inverted ranges,
    /// zero periods, out-of-range percentages and scales)
    pub fn validate(&mut self) {
        fn clamp_scale(scale: &mut f64) {
            // f64::max maps NaN to the bound
            *scale = scale.max(SCALE_MIN).min(SCALE_MAX);
        }
        fn order_i32(min: &mut i32, max: &mut i32) {
            if *min > *max {
                std::mem::swap(min, max);
            }
        }
        fn order_f64(min: &mut f64, max: &mut f64) {
            if *min > *max {
                std::mem::swap(min, max);
            }
        }

        self.spawn_interval_min = self.spawn_interval_min.max(1);
        self.spawn_interval_max = self.spawn_interval_max.max(1);
        order_i32(&mut self.spawn_interval_min, &mut self.spawn_interval_max);
        self.cloud_y_min = self.cloud_y_min.clamp(0, VIEWPORT_HEIGHT);
        self.cloud_y_max = self.cloud_y_max.clamp(0, VIEWPORT_HEIGHT);
        order_i32(&mut self.cloud_y_min, &mut self.cloud_y_max);
        for scale in [
            &mut self.cactus_scale_small_min,
            &mut self.cactus_scale_small_max,
            &mut self.cactus_scale_large_min,
            &mut self.cactus_scale_large_max,
            &mut self.cactus_scale_large3_cap,
            &mut self.flying_scale_min,
            &mut self.flying_scale_max,
        ] {
            clamp_scale(scale);
        }
        order_f64(&mut self.cactus_scale_small_min, &mut self.cactus_scale_small_max);
        order_f64(&mut self.cactus_scale_large_min, &mut self.cactus_scale_large_max);
        order_f64(&mut self.flying_scale_min, &mut self.flying_scale_max);

        self.flying_spawn_percent = self.flying_spawn_percent.min(100);
        self.flying_anim_ticks = self.flying_anim_ticks.max(1);
        self.cloud_speed_divisor = self.cloud_speed_divisor.max(1);
        self.speed = self.speed.clamp(0, VIEWPORT_WIDTH);
        self.flying_altitude_low = self.flying_altitude_low.clamp(0, GROUND_Y);
        self.flying_altitude_high = self.flying_altitude_high.clamp(0, GROUND_Y);
        // At least one tick per segment keeps the cycle length non-zero
        self.day_ticks = self.day_ticks.max(1);
        self.to_night_ticks = self.to_night_ticks.max(1);
        self.night_ticks = self.night_ticks.max(1);
        self.to_day_ticks = self.to_day_ticks.max(1);
    }

    /// Cloud drift per tick
    pub fn cloud_speed(&self) -> i32 {
        self.speed / self.cloud_speed_divisor.max(1)
    }
}
