//! Render snapshot
//!
//! Everything the host needs to paint one frame, as plain data. The host
//! never reads simulation internals.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::sprite::SpriteId;
use super::state::{GamePhase, GameState};
use crate::tuning::Rgb;

/// A sprite drawn into a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteDraw {
    pub sprite: SpriteId,
    pub rect: Rect,
}

/// One frame's worth of drawing state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub background: Rgb,
    /// Opacity for clouds and other decorations (0-1)
    pub decoration_opacity: f32,
    pub clouds: Vec<IVec2>,
    /// Ground scroll for tiling the track texture
    pub scroll_offset: i64,
    pub obstacles: Vec<SpriteDraw>,
    pub player: SpriteDraw,
    pub score: u64,
    pub high_score: u64,
    pub show_start_prompt: bool,
    pub show_game_over: bool,
    /// Game over screen offers a clickable reset button
    pub show_reset_target: bool,
}

impl Scene {
    pub fn capture(state: &GameState) -> Self {
        let (sprite, rect) = state.player.current_frame();
        let over = state.phase == GamePhase::Over;
        Self {
            background: state.day_night.background(&state.tuning),
            decoration_opacity: state.day_night.foreground_opacity(&state.tuning),
            clouds: state.clouds.iter().map(|c| c.pos).collect(),
            scroll_offset: state.scroll_offset,
            obstacles: state
                .obstacles
                .iter()
                .map(|o| SpriteDraw {
                    sprite: o.sprite,
                    rect: o.bounds(),
                })
                .collect(),
            player: SpriteDraw { sprite, rect },
            score: state.score,
            high_score: state.high_score,
            show_start_prompt: state.phase == GamePhase::NotStarted,
            show_game_over: over,
            show_reset_target: over,
        }
    }
}

impl GameState {
    /// Snapshot for the renderer
    pub fn scene(&self) -> Scene {
        Scene::capture(self)
    }
}
