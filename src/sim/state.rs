//! Game session state
//!
//! One owned aggregate per session: the player, obstacles, clouds, spawn
//! scheduler, day/night counter, score and the shared random source.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::daynight::DayNight;
use super::obstacle::{Obstacle, SpawnChoice, SpawnScheduler};
use super::player::Player;
use super::sprite::SpriteId;
use crate::consts::*;
use crate::highscores::HighScoreStore;
use crate::tuning::Tuning;

/// Run state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, waiting for the start command
    NotStarted,
    /// Active gameplay
    Running,
    /// Collided; waiting for reset
    Over,
}

/// Things that happened during a tick or command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Spawned { id: u32, kind: SpawnChoice },
    GameOver { score: u64 },
    NewHighScore { score: u64 },
    Reset,
}

/// A background cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: IVec2,
}

impl Cloud {
    pub const fn width() -> i32 {
        SpriteId::Cloud.native_size().0
    }

    /// Drift left; re-enter from the right edge at a new height once gone
    pub fn tick(&mut self, tuning: &Tuning, rng: &mut impl Rng) {
        self.pos.x -= tuning.cloud_speed();
        if self.pos.x + Self::width() < 0 {
            self.pos.x = VIEWPORT_WIDTH;
            self.pos.y = rng.random_range(tuning.cloud_y_min..=tuning.cloud_y_max);
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the random source was created from
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    /// Best score known to the persistence collaborator
    pub high_score: u64,
    /// Ticks spent running this session
    pub time_ticks: u64,
    /// Cumulative ground scroll, for tiling the track
    pub scroll_offset: i64,
    pub player: Player,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub clouds: Vec<Cloud>,
    pub spawner: SpawnScheduler,
    pub day_night: DayNight,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a session with the given seed and starting high score
    pub fn new(seed: u64, mut tuning: Tuning, high_score: u64) -> Self {
        tuning.validate();
        let mut rng = Pcg32::seed_from_u64(seed);
        let clouds = (0..tuning.cloud_count)
            .map(|_| Cloud {
                pos: IVec2::new(
                    rng.random_range(0..VIEWPORT_WIDTH),
                    rng.random_range(tuning.cloud_y_min..=tuning.cloud_y_max),
                ),
            })
            .collect();

        log::info!("Session created with seed {} (high score {})", seed, high_score);

        Self {
            seed,
            spawner: SpawnScheduler::new(&tuning),
            tuning,
            phase: GamePhase::NotStarted,
            score: 0,
            high_score,
            time_ticks: 0,
            scroll_offset: 0,
            player: Player::new(),
            obstacles: Vec::new(),
            clouds,
            day_night: DayNight::new(),
            rng,
            next_id: 1,
        }
    }

    /// Create a session, reading the starting high score from `store`
    pub fn with_store(seed: u64, tuning: Tuning, store: &impl HighScoreStore) -> Self {
        Self::new(seed, tuning, store.load_high_score())
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn an obstacle of the given kind at the right edge
    pub fn spawn(&mut self, kind: SpawnChoice) -> u32 {
        let id = self.next_entity_id();
        let obstacle = match kind {
            SpawnChoice::Ground => Obstacle::spawn_ground(id, &self.tuning, &mut self.rng),
            SpawnChoice::Flying => Obstacle::spawn_flying(id, &self.tuning, &mut self.rng),
        };
        log::debug!(
            "Spawned {:?} #{} ({:?}, {}x{}) at score {}",
            kind,
            id,
            obstacle.sprite,
            obstacle.w,
            obstacle.h,
            self.score
        );
        self.obstacles.push(obstacle);
        id
    }

    /// Back to the start screen. Clouds and the high score survive.
    pub fn reset(&mut self) {
        self.phase = GamePhase::NotStarted;
        self.score = 0;
        self.time_ticks = 0;
        self.scroll_offset = 0;
        self.obstacles.clear();
        self.spawner.reset(&self.tuning);
        self.day_night.reset();
        self.player.reset();
    }

    /// Day/night cycle position
    pub fn cycle_position(&self) -> u64 {
        self.day_night.position(&self.tuning)
    }
}
