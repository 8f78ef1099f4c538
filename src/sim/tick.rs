//! Fixed-step game loop
//!
//! The host calls [`advance`] at a steady cadence (nominally 60 Hz) and
//! forwards input as [`Command`]s. Nothing here reads a clock.

use super::collision::detect_collision;
use super::obstacle::{Altitude, ObstacleKind, SpawnChoice, SpawnScheduler};
use super::player::PlayerMode;
use super::sprite::SpriteSource;
use super::state::{GameEvent, GamePhase, GameState};
use crate::highscores::HighScoreStore;

/// Discrete input from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Jump,
    /// Duck pressed (`true`) or released (`false`)
    Duck(bool),
    Reset,
    /// Single-button play: start, jump, or reset depending on the phase
    Action,
}

/// Apply one command. Commands that make no sense in the current phase are
/// ignored.
pub fn apply_command(state: &mut GameState, command: Command) -> Option<GameEvent> {
    match (command, state.phase) {
        (Command::Action, GamePhase::NotStarted) | (Command::Start, GamePhase::NotStarted) => {
            state.phase = GamePhase::Running;
            state.player.start();
            log::info!("Run started");
            Some(GameEvent::Started)
        }
        (Command::Action, GamePhase::Running) | (Command::Jump, GamePhase::Running) => {
            state.player.jump();
            None
        }
        (Command::Duck(ducking), GamePhase::NotStarted | GamePhase::Running) => {
            state.player.set_ducking(ducking);
            None
        }
        (Command::Action, GamePhase::Over) | (Command::Reset, _) => {
            state.reset();
            log::info!("Session reset");
            Some(GameEvent::Reset)
        }
        _ => None,
    }
}

/// Advance the session by one tick.
///
/// While running: scroll, score, day/night, player, spawner and obstacles,
/// clouds, then collision. A hit ends the run and, if the score beats the
/// known best, saves it through `store`. Outside a run nothing moves.
pub fn advance(
    state: &mut GameState,
    sprites: &impl SpriteSource,
    store: &mut impl HighScoreStore,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }

    state.time_ticks += 1;
    state.scroll_offset += state.tuning.speed as i64;
    state.score += state.tuning.score_per_tick;
    state.day_night.tick(&state.tuning);
    state.player.tick();

    // Spawn, then move everything (the newcomer included), then prune
    if state.spawner.tick(&state.tuning, &mut state.rng) {
        let kind = SpawnScheduler::choose(state.score, &state.tuning, &mut state.rng);
        let id = state.spawn(kind);
        events.push(GameEvent::Spawned { id, kind });
    }
    let speed = state.tuning.speed;
    for obstacle in &mut state.obstacles {
        obstacle.tick(speed, &state.tuning);
    }
    state.obstacles.retain(|o| !o.is_off_screen());

    for cloud in &mut state.clouds {
        cloud.tick(&state.tuning, &mut state.rng);
    }

    if detect_collision(&state.player, &state.obstacles, sprites) {
        end_run(state, store, &mut events);
    }

    events
}

fn end_run(state: &mut GameState, store: &mut impl HighScoreStore, events: &mut Vec<GameEvent>) {
    state.phase = GamePhase::Over;
    state.player.die();
    log::info!("Game over at score {}", state.score);
    events.push(GameEvent::GameOver { score: state.score });

    if state.score > state.high_score {
        state.high_score = state.score;
        store.save_high_score(state.score);
        log::info!("New high score: {}", state.score);
        events.push(GameEvent::NewHighScore { score: state.score });
    }
}

/// Gap (pixels) between the dino's hit box and an obstacle at which the
/// autopilot reacts
const AUTOPILOT_REACT_GAP: i32 = 40;

/// Attract-mode player: starts the run, jumps ground and low flying
/// obstacles, ducks under high ones.
pub fn autopilot(state: &GameState) -> Option<Command> {
    match state.phase {
        GamePhase::NotStarted => return Some(Command::Start),
        GamePhase::Over => return None,
        GamePhase::Running => {}
    }

    let hit_box = state.player.collision_rect();
    let next = state
        .obstacles
        .iter()
        .filter(|o| o.right() > hit_box.left())
        .min_by_key(|o| o.pos.x);

    let ducking = state.player.mode == PlayerMode::Ducking;
    let Some(obstacle) = next else {
        return ducking.then_some(Command::Duck(false));
    };

    let gap = obstacle.pos.x - hit_box.right();
    let duck_under = matches!(
        obstacle.kind,
        ObstacleKind::Flying {
            altitude: Altitude::High,
            ..
        }
    );

    if duck_under {
        (gap <= AUTOPILOT_REACT_GAP && !ducking && !state.player.is_jumping())
            .then_some(Command::Duck(true))
    } else if ducking {
        Some(Command::Duck(false))
    } else if gap <= AUTOPILOT_REACT_GAP && gap >= 0 && !state.player.is_jumping() {
        Some(Command::Jump)
    } else {
        None
    }
}

/// Spawn decisions this tick, for logging
pub fn count_spawns(events: &[GameEvent], kind: SpawnChoice) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::Spawned { kind: k, .. } if *k == kind))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryHighScores;
    use crate::sim::sprite::SpriteMasks;
    use crate::tuning::Tuning;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default(), 0);
        apply_command(&mut state, Command::Start);
        state
    }

    /// Run until the first collision, with no player input
    fn run_to_collision(state: &mut GameState, store: &mut MemoryHighScores) -> Vec<GameEvent> {
        let sprites = SpriteMasks::new();
        for _ in 0..10_000 {
            let events = advance(state, &sprites, store);
            if state.phase == GamePhase::Over {
                return events;
            }
        }
        panic!("no collision in 10000 ticks");
    }

    #[test]
    fn test_nothing_moves_before_start() {
        let mut state = GameState::new(1, Tuning::default(), 0);
        let clouds = state.clouds.clone();
        let mut store = MemoryHighScores::default();
        for _ in 0..100 {
            assert!(advance(&mut state, &SpriteMasks::new(), &mut store).is_empty());
        }
        assert_eq!(state.score, 0);
        assert_eq!(state.scroll_offset, 0);
        assert_eq!(state.clouds, clouds);
        assert_eq!(state.cycle_position(), 0);
    }

    #[test]
    fn test_start_command() {
        let mut state = GameState::new(1, Tuning::default(), 0);
        assert_eq!(apply_command(&mut state, Command::Jump), None);
        assert_eq!(state.player.mode, PlayerMode::Idle);
        assert_eq!(apply_command(&mut state, Command::Start), Some(GameEvent::Started));
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.player.mode, PlayerMode::Running);
        // Start while running is a no-op
        assert_eq!(apply_command(&mut state, Command::Start), None);
    }

    #[test]
    fn test_duck_held_on_start_screen_carries_into_run() {
        let mut state = GameState::new(1, Tuning::default(), 0);
        assert_eq!(apply_command(&mut state, Command::Duck(true)), None);
        assert_eq!(state.player.mode, PlayerMode::Idle);
        apply_command(&mut state, Command::Start);
        assert_eq!(state.player.mode, PlayerMode::Ducking);
        apply_command(&mut state, Command::Duck(false));
        assert_eq!(state.player.mode, PlayerMode::Running);
    }

    #[test]
    fn test_score_increments_per_tick() {
        let mut state = running(2);
        let mut store = MemoryHighScores::default();
        let sprites = SpriteMasks::new();
        // First spawn is 70 ticks out and needs time to arrive
        for tick in 1..=60u64 {
            advance(&mut state, &sprites, &mut store);
            assert_eq!(state.phase, GamePhase::Running);
            assert_eq!(state.score, tick * state.tuning.score_per_tick);
            assert_eq!(state.scroll_offset, tick as i64 * state.tuning.speed as i64);
            assert_eq!(state.cycle_position(), tick);
        }
    }

    #[test]
    fn test_score_freezes_at_collision() {
        let mut state = running(3);
        let mut store = MemoryHighScores::default();
        let events = run_to_collision(&mut state, &mut store);
        let final_score = state.score;
        assert!(events.contains(&GameEvent::GameOver { score: final_score }));
        assert_eq!(final_score, state.time_ticks * state.tuning.score_per_tick);
        assert_eq!(state.player.mode, PlayerMode::Dead);

        let obstacles = state.obstacles.clone();
        for _ in 0..50 {
            advance(&mut state, &SpriteMasks::new(), &mut store);
        }
        assert_eq!(state.score, final_score);
        assert_eq!(state.obstacles, obstacles);
        // Ignored while over
        apply_command(&mut state, Command::Jump);
        assert_eq!(state.player.mode, PlayerMode::Dead);
    }

    #[test]
    fn test_new_high_score_saved_once() {
        let mut state = running(4);
        let mut store = MemoryHighScores::default();
        let events = run_to_collision(&mut state, &mut store);
        assert!(events.contains(&GameEvent::NewHighScore { score: state.score }));
        assert_eq!(store.score, state.score);
        assert_eq!(store.saves, 1);
        assert_eq!(state.high_score, state.score);
    }

    #[test]
    fn test_lower_score_not_saved() {
        let mut state = GameState::new(4, Tuning::default(), 1_000_000);
        apply_command(&mut state, Command::Start);
        let mut store = MemoryHighScores::new(1_000_000);
        let events = run_to_collision(&mut state, &mut store);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::NewHighScore { .. })));
        assert_eq!(store.saves, 0);
        assert_eq!(state.high_score, 1_000_000);
    }

    #[test]
    fn test_reset_after_over() {
        let mut state = running(5);
        let mut store = MemoryHighScores::default();
        run_to_collision(&mut state, &mut store);
        let high = state.high_score;

        assert_eq!(apply_command(&mut state, Command::Reset), Some(GameEvent::Reset));
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.player.mode, PlayerMode::Idle);
        assert_eq!(state.cycle_position(), 0);
        assert_eq!(state.scroll_offset, 0);
        assert_eq!(state.spawner.countdown, state.tuning.spawn_interval_min);
        assert_eq!(state.high_score, high);
    }

    #[test]
    fn test_action_cycles_phases() {
        let mut state = GameState::new(6, Tuning::default(), 0);
        assert_eq!(apply_command(&mut state, Command::Action), Some(GameEvent::Started));
        apply_command(&mut state, Command::Action);
        assert!(state.player.is_jumping());

        let mut store = MemoryHighScores::default();
        run_to_collision(&mut state, &mut store);
        assert_eq!(apply_command(&mut state, Command::Action), Some(GameEvent::Reset));
        assert_eq!(state.phase, GamePhase::NotStarted);
    }

    #[test]
    fn test_obstacles_scroll_and_prune() {
        let tuning = Tuning {
            flying_score_threshold: u64::MAX,
            ..Default::default()
        };
        let mut state = GameState::new(7, tuning, 0);
        apply_command(&mut state, Command::Start);
        let mut store = MemoryHighScores::default();
        let sprites = SpriteMasks::new();
        // Park the dino out of reach so the run never ends
        state.player.pos.x = -10_000;

        let speed = state.tuning.speed;
        let mut removed = 0;
        for _ in 0..3000 {
            let before: Vec<_> = state.obstacles.iter().map(|o| (o.id, o.pos.x, o.w)).collect();
            advance(&mut state, &sprites, &mut store);
            for (id, x, w) in before {
                match state.obstacles.iter().find(|o| o.id == id) {
                    Some(o) => {
                        assert_eq!(o.pos.x, x - speed);
                        assert!(o.right() >= 0);
                    }
                    None => {
                        assert!(x - speed + w < 0);
                        removed += 1;
                    }
                }
            }
        }
        assert!(removed > 0);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_flying_obstacles_appear_past_threshold() {
        let tuning = Tuning {
            flying_score_threshold: 0,
            flying_spawn_percent: 100,
            ..Default::default()
        };
        let mut state = GameState::new(8, tuning, 0);
        apply_command(&mut state, Command::Start);
        state.player.pos.x = -10_000;
        let mut store = MemoryHighScores::default();
        let mut flying = 0;
        for _ in 0..1000 {
            let events = advance(&mut state, &SpriteMasks::new(), &mut store);
            flying += count_spawns(&events, SpawnChoice::Flying);
            assert_eq!(count_spawns(&events, SpawnChoice::Ground), 0);
        }
        assert!(flying > 0);
    }

    #[test]
    fn test_no_flying_before_threshold_in_play() {
        let mut state = running(9);
        state.player.pos.x = -10_000;
        let mut store = MemoryHighScores::default();
        while state.score < state.tuning.flying_score_threshold - 1 {
            let events = advance(&mut state, &SpriteMasks::new(), &mut store);
            assert_eq!(count_spawns(&events, SpawnChoice::Flying), 0);
        }
    }

    #[test]
    fn test_autopilot_starts_and_jumps() {
        let mut state = GameState::new(10, Tuning::default(), 0);
        assert_eq!(autopilot(&state), Some(Command::Start));
        apply_command(&mut state, Command::Start);
        assert_eq!(autopilot(&state), None);

        state.spawn(SpawnChoice::Ground);
        let hit_right = state.player.collision_rect().right();
        state.obstacles[0].pos.x = hit_right + AUTOPILOT_REACT_GAP;
        assert_eq!(autopilot(&state), Some(Command::Jump));
    }
}
