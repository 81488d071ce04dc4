use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{COIN_VALUE, FALL_LIMIT_Y};
use crate::countdown::format_run_time;
use crate::track::Position;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    GameOver,
    Won,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    GameOver,
    Won,
    /// Player quit to the lobby before the run ended.
    Abandoned,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub score: u64,
    pub coins: u64,
    pub elapsed: Duration,
    pub outcome: RunOutcome,
}

/// Bookkeeping for one gameplay run: distance score, timer, coins, end state.
///
/// Collisions, falls and pickups are detected by the host and reported here.
#[derive(Debug, Clone)]
pub struct RunSession {
    start_z: f32,
    finish_z: Option<f32>,
    fall_limit_y: f32,
    state: RunState,
    elapsed: Duration,
    score: u64,
    coins: u64,
}

impl RunSession {
    pub fn new(start_z: f32, finish_z: Option<f32>) -> Self {
        Self {
            start_z,
            finish_z,
            fall_limit_y: FALL_LIMIT_Y,
            state: RunState::Running,
            elapsed: Duration::ZERO,
            score: 0,
            coins: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, RunState::GameOver | RunState::Won)
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Advances the run by one frame. Returns the outcome if the run ended on this frame.
    pub fn tick(&mut self, dt: Duration, player: Position) -> Option<RunOutcome> {
        if self.state != RunState::Running {
            return None;
        }

        self.elapsed += dt;
        let distance = (player.z - self.start_z).max(0.0);
        self.score = distance.floor() as u64;

        if player.y < self.fall_limit_y {
            return self.end(RunState::GameOver);
        }
        if let Some(finish_z) = self.finish_z {
            if player.z >= finish_z {
                return self.end(RunState::Won);
            }
        }
        None
    }

    pub fn hit_obstacle(&mut self) -> Option<RunOutcome> {
        if self.state != RunState::Running {
            return None;
        }
        self.end(RunState::GameOver)
    }

    pub fn collect_coin(&mut self) -> u64 {
        self.collect_coins(COIN_VALUE)
    }

    pub fn collect_coins(&mut self, value: u64) -> u64 {
        if self.state == RunState::Running {
            self.coins = self.coins.saturating_add(value);
        }
        self.coins
    }

    /// Flips between running and paused. Finished runs stay finished.
    pub fn toggle_pause(&mut self) -> RunState {
        self.state = match self.state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
            finished => finished,
        };
        self.state
    }

    /// Leaves the run, unpausing first. Unfinished runs count as abandoned.
    pub fn quit_to_lobby(&mut self) -> RunSummary {
        if self.state == RunState::Paused {
            self.state = RunState::Running;
        }
        self.summary()
    }

    pub fn summary(&self) -> RunSummary {
        let outcome = match self.state {
            RunState::GameOver => RunOutcome::GameOver,
            RunState::Won => RunOutcome::Won,
            RunState::Running | RunState::Paused => RunOutcome::Abandoned,
        };
        RunSummary {
            score: self.score,
            coins: self.coins,
            elapsed: self.elapsed,
            outcome,
        }
    }

    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn time_text(&self) -> String {
        format_run_time(self.elapsed)
    }

    pub fn banner_text(&self) -> Option<String> {
        match self.state {
            RunState::GameOver => Some("GAME OVER!".to_string()),
            RunState::Won => Some(format!("YOU WIN!\n{}", self.time_text())),
            _ => None,
        }
    }

    fn end(&mut self, state: RunState) -> Option<RunOutcome> {
        self.state = state;
        Some(self.summary().outcome)
    }
}

/// Forward speed that creeps up over time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedRamp {
    pub base: f32,
    pub rate: f32,
    pub max: f32,
    current: f32,
}

impl Default for SpeedRamp {
    fn default() -> Self {
        Self::new(10.0, 0.3, 25.0)
    }
}

impl SpeedRamp {
    pub fn new(base: f32, rate: f32, max: f32) -> Self {
        Self { base, rate, max, current: base }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Ramps for one step and returns the effective speed for the given forward input.
    /// Letting go of the throttle slows to 20% instead of stopping.
    pub fn step(&mut self, dt: Duration, forward_input: f32) -> f32 {
        self.current = (self.current + self.rate * dt.as_secs_f32()).clamp(self.base, self.max.max(self.base));
        self.current * forward_input.max(0.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: f32, z: f32) -> Position {
        Position { x: 0.0, y, z }
    }

    const FRAME: Duration = Duration::from_millis(100);

    #[test]
    fn test_score_tracks_distance() {
        let mut run = RunSession::new(2.0, None);
        assert_eq!(run.tick(FRAME, at(0.0, 14.7)), None);
        assert_eq!(run.score(), 12);
        assert_eq!(run.score_text(), "Score: 12");
        assert_eq!(run.time_text(), "Time: 0.1s");
    }

    #[test]
    fn test_fall_ends_run() {
        let mut run = RunSession::new(0.0, None);
        assert_eq!(run.tick(FRAME, at(-5.5, 40.0)), Some(RunOutcome::GameOver));
        assert_eq!(run.banner_text().as_deref(), Some("GAME OVER!"));
        // Terminal states are sticky.
        assert_eq!(run.tick(FRAME, at(0.0, 80.0)), None);
        assert_eq!(run.score(), 40);
        assert_eq!(run.elapsed(), FRAME);
    }

    #[test]
    fn test_finish_line_wins() {
        let mut run = RunSession::new(0.0, Some(185.0));
        assert_eq!(run.tick(FRAME, at(0.0, 184.9)), None);
        assert_eq!(run.tick(FRAME, at(0.0, 185.0)), Some(RunOutcome::Won));
        assert!(run.is_finished());
        assert_eq!(run.hit_obstacle(), None);
        assert_eq!(run.state(), RunState::Won);
    }

    #[test]
    fn test_obstacle_and_coins() {
        let mut run = RunSession::new(0.0, None);
        run.collect_coin();
        run.collect_coin();
        assert_eq!(run.hit_obstacle(), Some(RunOutcome::GameOver));
        assert_eq!(run.collect_coin(), 20);
        let summary = run.summary();
        assert_eq!(summary.coins, 20);
        assert_eq!(summary.outcome, RunOutcome::GameOver);
    }

    #[test]
    fn test_pause_freezes_run() {
        let mut run = RunSession::new(0.0, None);
        assert_eq!(run.toggle_pause(), RunState::Paused);
        assert_eq!(run.tick(FRAME, at(0.0, 50.0)), None);
        assert_eq!(run.elapsed(), Duration::ZERO);
        assert_eq!(run.hit_obstacle(), None);
        assert_eq!(run.toggle_pause(), RunState::Running);
        run.tick(FRAME, at(0.0, 50.0));
        assert_eq!(run.score(), 50);
    }

    #[test]
    fn test_quit_while_paused() {
        let mut run = RunSession::new(0.0, None);
        run.toggle_pause();
        let summary = run.quit_to_lobby();
        assert_eq!(run.state(), RunState::Running);
        assert_eq!(summary.outcome, RunOutcome::Abandoned);
    }

    #[test]
    fn test_speed_ramp() {
        let mut ramp = SpeedRamp::default();
        let speed = ramp.step(Duration::from_secs(10), 1.0);
        assert!((speed - 13.0).abs() < 1e-4);

        let coasting = ramp.step(Duration::ZERO, 0.0);
        assert!((coasting - 13.0 * 0.2).abs() < 1e-4);

        ramp.step(Duration::from_secs(1000), 1.0);
        assert_eq!(ramp.current(), 25.0);
    }
}
