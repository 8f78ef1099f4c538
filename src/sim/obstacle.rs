//! Obstacles and the spawn scheduler
//!
//! Ground cacti sit flush on the track. Flying obstacles hover at one of two
//! altitude bands and flap between two frames; their frames differ in size,
//! so width/height are re-derived on every flap around a fixed centre.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::sprite::SpriteId;
use crate::consts::*;
use crate::tuning::Tuning;

/// Cactus size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CactusClass {
    Small,
    Large,
}

impl CactusClass {
    pub const fn variants(self) -> [SpriteId; 3] {
        match self {
            CactusClass::Small => [
                SpriteId::SmallCactus1,
                SpriteId::SmallCactus2,
                SpriteId::SmallCactus3,
            ],
            CactusClass::Large => [
                SpriteId::LargeCactus1,
                SpriteId::LargeCactus2,
                SpriteId::LargeCactus3,
            ],
        }
    }
}

/// Flight band of a flying obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Altitude {
    /// Low enough to hit a ducking dino; jump over it
    Low,
    /// Clears a ducking dino; duck under it
    High,
}

impl Altitude {
    /// Height of the flight centre above the ground
    pub fn offset(self, tuning: &Tuning) -> i32 {
        match self {
            Altitude::Low => tuning.flying_altitude_low,
            Altitude::High => tuning.flying_altitude_high,
        }
    }
}

/// Kind-specific obstacle payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Ground {
        class: CactusClass,
    },
    Flying {
        altitude: Altitude,
        /// Wing frame, 0 or 1
        frame: u8,
        anim_counter: u32,
        /// Scale chosen at spawn, reused for both frames
        scale: f64,
        /// Vertical centre of the sprite
        center_y: i32,
    },
}

/// Which kind of obstacle the scheduler decided to spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnChoice {
    Ground,
    Flying,
}

/// A live obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub sprite: SpriteId,
    /// Top-left corner
    pub pos: IVec2,
    pub w: i32,
    pub h: i32,
    pub kind: ObstacleKind,
}

/// Scale a native sprite size, never collapsing below one pixel
fn scaled_size(sprite: SpriteId, scale: f64) -> (i32, i32) {
    let (w, h) = sprite.native_size();
    let w = ((w as f64 * scale) as i32).max(1);
    let h = ((h as f64 * scale) as i32).max(1);
    (w, h)
}

fn uniform_scale(rng: &mut impl Rng, min: f64, max: f64) -> f64 {
    if min >= max {
        return min;
    }
    rng.random_range(min..max)
}

const fn bird_frame(frame: u8) -> SpriteId {
    if frame == 0 {
        SpriteId::Bird1
    } else {
        SpriteId::Bird2
    }
}

impl Obstacle {
    /// A cactus of random class, variant and scale at the right edge
    pub fn spawn_ground(id: u32, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let class = if rng.random_bool(0.5) {
            CactusClass::Large
        } else {
            CactusClass::Small
        };
        let variants = class.variants();
        let sprite = variants[rng.random_range(0..variants.len())];

        let (min, max) = match class {
            CactusClass::Small => (tuning.cactus_scale_small_min, tuning.cactus_scale_small_max),
            CactusClass::Large => (tuning.cactus_scale_large_min, tuning.cactus_scale_large_max),
        };
        let mut scale = uniform_scale(rng, min, max);
        if sprite == SpriteId::LargeCactus3 {
            scale = scale.min(tuning.cactus_scale_large3_cap);
        }

        let (w, h) = scaled_size(sprite, scale);
        Self {
            id,
            sprite,
            pos: IVec2::new(VIEWPORT_WIDTH, GROUND_Y - h + GROUND_ALIGN_OFFSET),
            w,
            h,
            kind: ObstacleKind::Ground { class },
        }
    }

    /// A flying obstacle centred on a random altitude band at the right edge
    pub fn spawn_flying(id: u32, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let altitude = if rng.random_bool(0.5) {
            Altitude::High
        } else {
            Altitude::Low
        };
        let scale = uniform_scale(rng, tuning.flying_scale_min, tuning.flying_scale_max);
        let center_y = GROUND_Y - altitude.offset(tuning);
        let sprite = bird_frame(0);
        let (w, h) = scaled_size(sprite, scale);
        Self {
            id,
            sprite,
            pos: IVec2::new(VIEWPORT_WIDTH, center_y - h / 2),
            w,
            h,
            kind: ObstacleKind::Flying {
                altitude,
                frame: 0,
                anim_counter: 0,
                scale,
                center_y,
            },
        }
    }

    /// Full on-screen bounds
    pub fn bounds(&self) -> Rect {
        Rect::at(self.pos, self.w, self.h)
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> i32 {
        self.pos.x + self.w
    }

    /// Fully past the left edge of the viewport
    pub fn is_off_screen(&self) -> bool {
        self.right() < 0
    }

    /// Scroll left and advance the wing animation
    pub fn tick(&mut self, speed: i32, tuning: &Tuning) {
        self.pos.x -= speed;

        if let ObstacleKind::Flying {
            ref mut frame,
            ref mut anim_counter,
            scale,
            center_y,
            ..
        } = self.kind
        {
            *anim_counter += 1;
            if *anim_counter >= tuning.flying_anim_ticks {
                *anim_counter = 0;
                *frame ^= 1;
                self.sprite = bird_frame(*frame);
                let (w, h) = scaled_size(self.sprite, scale);
                self.w = w;
                self.h = h;
                self.pos.y = center_y - h / 2;
            }
        }
    }
}

/// Countdown that decides when and what to spawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnScheduler {
    /// Ticks until the next spawn
    pub countdown: i32,
}

impl SpawnScheduler {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            countdown: tuning.spawn_interval_min,
        }
    }

    pub fn reset(&mut self, tuning: &Tuning) {
        self.countdown = tuning.spawn_interval_min;
    }

    /// Count down one tick. Returns true when a spawn is due, after
    /// resampling the next interval.
    pub fn tick(&mut self, tuning: &Tuning, rng: &mut impl Rng) -> bool {
        self.countdown -= 1;
        if self.countdown > 0 {
            return false;
        }
        self.countdown = rng.random_range(tuning.spawn_interval_min..=tuning.spawn_interval_max);
        true
    }

    /// Ground below the score threshold; past it, a weighted coin flip
    pub fn choose(score: u64, tuning: &Tuning, rng: &mut impl Rng) -> SpawnChoice {
        if score < tuning.flying_score_threshold {
            return SpawnChoice::Ground;
        }
        let roll: u32 = rng.random_range(0..100);
        if roll < tuning.flying_spawn_percent {
            SpawnChoice::Flying
        } else {
            SpawnChoice::Ground
        }
    }
}
