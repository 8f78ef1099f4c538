//! The player-controlled dino
//!
//! Modes are mutually exclusive. Vertical velocity only exists while
//! jumping, so a grounded dino can never carry stale momentum.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::sprite::SpriteId;
use crate::consts::*;

/// What the dino is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerMode {
    /// Standing on the start screen
    Idle,
    Running,
    Jumping {
        /// Pixels per tick, negative is upward
        velocity: i32,
        /// Duck was requested mid-air; land straight into a duck
        duck_on_land: bool,
    },
    Ducking,
    Dead,
}

/// The dino
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the standing sprite box
    pub pos: IVec2,
    pub mode: PlayerMode,
    /// Duck input is currently pressed, whatever the mode
    duck_held: bool,
    /// Alternates run/duck frames
    anim_toggle: bool,
    anim_counter: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: IVec2::new(PLAYER_X, PLAYER_GROUND_Y),
            mode: PlayerMode::Idle,
            duck_held: false,
            anim_toggle: false,
            anim_counter: 0,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current vertical velocity (zero unless jumping)
    pub fn velocity(&self) -> i32 {
        match self.mode {
            PlayerMode::Jumping { velocity, .. } => velocity,
            _ => 0,
        }
    }

    pub fn is_jumping(&self) -> bool {
        matches!(self.mode, PlayerMode::Jumping { .. })
    }

    pub fn is_dead(&self) -> bool {
        self.mode == PlayerMode::Dead
    }

    pub fn is_ducking_held(&self) -> bool {
        self.duck_held
    }

    /// Leave the start pose and begin running, or ducking if duck is held
    pub fn start(&mut self) {
        if self.mode == PlayerMode::Idle {
            self.mode = if self.duck_held {
                PlayerMode::Ducking
            } else {
                PlayerMode::Running
            };
        }
    }

    /// Launch upward. Ignored while airborne or dead.
    pub fn jump(&mut self) {
        match self.mode {
            PlayerMode::Idle | PlayerMode::Running | PlayerMode::Ducking => {
                self.mode = PlayerMode::Jumping {
                    velocity: JUMP_SPEED,
                    duck_on_land: self.duck_held,
                };
            }
            PlayerMode::Jumping { .. } | PlayerMode::Dead => {}
        }
    }

    /// Press or release duck. Remembered while idle or airborne.
    pub fn set_ducking(&mut self, ducking: bool) {
        if self.is_dead() {
            return;
        }
        self.duck_held = ducking;
        self.mode = match self.mode {
            PlayerMode::Running if ducking => PlayerMode::Ducking,
            PlayerMode::Ducking if !ducking => PlayerMode::Running,
            PlayerMode::Jumping { velocity, .. } => PlayerMode::Jumping {
                velocity,
                duck_on_land: ducking,
            },
            other => other,
        };
    }

    /// Freeze in the dead pose
    pub fn die(&mut self) {
        self.mode = PlayerMode::Dead;
    }

    /// Back to the start pose on the ground
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Integrate one tick of jump physics and advance the run animation
    pub fn tick(&mut self) {
        if let PlayerMode::Jumping {
            velocity,
            duck_on_land,
        } = self.mode
        {
            self.pos.y += velocity;
            let velocity = velocity + GRAVITY;
            if self.pos.y >= PLAYER_GROUND_Y {
                self.pos.y = PLAYER_GROUND_Y;
                self.mode = if duck_on_land {
                    PlayerMode::Ducking
                } else {
                    PlayerMode::Running
                };
            } else {
                self.mode = PlayerMode::Jumping {
                    velocity,
                    duck_on_land,
                };
            }
        }

        if !matches!(self.mode, PlayerMode::Idle | PlayerMode::Dead) {
            self.anim_counter += 1;
            if self.anim_counter >= PLAYER_ANIM_TICKS {
                self.anim_counter = 0;
                self.anim_toggle = !self.anim_toggle;
            }
        }
    }

    /// Sprite to draw and the exact on-screen box it is drawn into
    pub fn current_frame(&self) -> (SpriteId, Rect) {
        let full = Rect::at(self.pos, PLAYER_WIDTH, PLAYER_HEIGHT);
        match self.mode {
            PlayerMode::Dead => (SpriteId::DinoDead, full),
            PlayerMode::Idle => (SpriteId::DinoStart, full),
            PlayerMode::Jumping { .. } => (SpriteId::DinoJump, full),
            PlayerMode::Ducking => {
                let sprite = if self.anim_toggle {
                    SpriteId::DinoDuck2
                } else {
                    SpriteId::DinoDuck1
                };
                (sprite, self.duck_rect())
            }
            PlayerMode::Running => {
                let sprite = if self.anim_toggle {
                    SpriteId::DinoRun2
                } else {
                    SpriteId::DinoRun1
                };
                (sprite, full)
            }
        }
    }

    /// On-screen draw box
    pub fn draw_rect(&self) -> Rect {
        self.current_frame().1
    }

    /// Inset hit box used by the broad phase
    pub fn collision_rect(&self) -> Rect {
        let body = if self.mode == PlayerMode::Ducking {
            self.duck_rect()
        } else {
            Rect::at(self.pos, PLAYER_WIDTH, PLAYER_HEIGHT)
        };
        body.inset(COLLISION_INSET_X, COLLISION_INSET_Y)
    }

    fn duck_rect(&self) -> Rect {
        Rect::new(
            self.pos.x,
            self.pos.y + PLAYER_DUCK_Y_OFFSET,
            PLAYER_WIDTH,
            PLAYER_DUCK_HEIGHT,
        )
    }
}
