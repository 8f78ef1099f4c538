//! Day/night cycle
//!
//! A single tick counter drives everything; segment, progress, colour and
//! opacity are derived from `counter % cycle_length`.

use serde::{Deserialize, Serialize};

use crate::lerp_channel;
use crate::tuning::{Rgb, Tuning};

/// Contiguous slices of one cycle, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleSegment {
    Day,
    TransitionToNight,
    Night,
    TransitionToDay,
}

/// Logical time of day. Transitions report the phase they are leaving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPhase {
    Day,
    Night,
}

/// Elapsed-tick counter for the cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayNight {
    ticks: u64,
}

impl DayNight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, tuning: &Tuning) {
        self.ticks = (self.ticks + 1) % Self::cycle_length(tuning);
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }

    pub fn cycle_length(tuning: &Tuning) -> u64 {
        (tuning.day_ticks + tuning.to_night_ticks + tuning.night_ticks + tuning.to_day_ticks).max(1)
    }

    /// Position inside the current cycle
    pub fn position(&self, tuning: &Tuning) -> u64 {
        self.ticks % Self::cycle_length(tuning)
    }

    /// Current segment and ticks elapsed inside it
    fn locate(&self, tuning: &Tuning) -> (CycleSegment, u64, u64) {
        let mut t = self.position(tuning);
        let segments = [
            (CycleSegment::Day, tuning.day_ticks),
            (CycleSegment::TransitionToNight, tuning.to_night_ticks),
            (CycleSegment::Night, tuning.night_ticks),
            (CycleSegment::TransitionToDay, tuning.to_day_ticks),
        ];
        for (segment, len) in segments {
            if t < len {
                return (segment, t, len);
            }
            t -= len;
        }
        (CycleSegment::Day, 0, tuning.day_ticks)
    }

    pub fn segment(&self, tuning: &Tuning) -> CycleSegment {
        self.locate(tuning).0
    }

    pub fn phase(&self, tuning: &Tuning) -> DayPhase {
        match self.segment(tuning) {
            CycleSegment::Day | CycleSegment::TransitionToNight => DayPhase::Day,
            CycleSegment::Night | CycleSegment::TransitionToDay => DayPhase::Night,
        }
    }

    /// Blend toward night: 0 in full day, 1 in full night
    pub fn progress(&self, tuning: &Tuning) -> f32 {
        let (segment, elapsed, len) = self.locate(tuning);
        let t = elapsed as f32 / len.max(1) as f32;
        match segment {
            CycleSegment::Day => 0.0,
            CycleSegment::TransitionToNight => t,
            CycleSegment::Night => 1.0,
            CycleSegment::TransitionToDay => 1.0 - t,
        }
    }

    pub fn background(&self, tuning: &Tuning) -> Rgb {
        blend(tuning.day_color, tuning.night_color, self.progress(tuning))
    }

    /// Opacity of decorations; they fade out toward night
    pub fn foreground_opacity(&self, tuning: &Tuning) -> f32 {
        1.0 - self.progress(tuning)
    }
}

/// Per-channel linear blend between two colours
pub fn blend(day: Rgb, night: Rgb, t: f32) -> Rgb {
    Rgb(
        lerp_channel(day.0, night.0, t),
        lerp_channel(day.1, night.1, t),
        lerp_channel(day.2, night.2, t),
    )
}
