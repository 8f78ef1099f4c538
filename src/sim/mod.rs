//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed tick only, no clocks
//! - One seeded random source per session
//! - Pixel data only through `SpriteSource`
//! - No rendering or platform dependencies

pub mod collision;
pub mod daynight;
pub mod obstacle;
pub mod player;
pub mod rect;
pub mod scene;
pub mod sprite;
pub mod state;
pub mod tick;

pub use collision::{detect_collision, pixels_overlap, player_hits_obstacle};
pub use daynight::{CycleSegment, DayNight, DayPhase};
pub use obstacle::{Altitude, CactusClass, Obstacle, ObstacleKind, SpawnChoice, SpawnScheduler};
pub use player::{Player, PlayerMode};
pub use rect::Rect;
pub use scene::{Scene, SpriteDraw};
pub use sprite::{AlphaMask, SpriteId, SpriteMasks, SpriteSource};
pub use state::{Cloud, GameEvent, GamePhase, GameState};
pub use tick::{Command, advance, apply_command, autopilot, count_spawns};
