use std::time::{Duration, Instant};

use shared::constants::RETURN_TO_LOBBY_DELAY;
use shared::run::{RunSession, RunState, RunSummary, SpeedRamp};
use shared::scheduler::Scheduler;
use shared::track::{Position, SpawnKind, TrackSettings, TrackSpawner};
use tracing::{debug, info};

/// Half the car's width, used for the stand-in collision check.
const CAR_HALF_WIDTH: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameplayEvent {
    ReturnToLobby,
}

/// Headless stand-in for the gameplay scene: drives a car straight down the
/// middle of the track and reports hits and pickups to the run session.
pub struct AutoRun {
    session: RunSession,
    track: TrackSpawner,
    ramp: SpeedRamp,
    scheduler: Scheduler<GameplayEvent>,
    player: Position,
}

impl AutoRun {
    pub fn new(finish_z: Option<f32>) -> Self {
        Self::with_track(TrackSpawner::new(TrackSettings::default()), finish_z)
    }

    pub fn with_track(track: TrackSpawner, finish_z: Option<f32>) -> Self {
        Self {
            session: RunSession::new(0.0, finish_z),
            track,
            ramp: SpeedRamp::default(),
            scheduler: Scheduler::new(),
            player: Position { x: 0.0, y: 0.0, z: 0.0 },
        }
    }

    pub fn session(&self) -> &RunSession {
        &self.session
    }

    pub fn toggle_pause(&mut self) -> RunState {
        self.session.toggle_pause()
    }

    /// Leaves immediately, dropping any pending return timer.
    pub fn quit(&mut self) -> RunSummary {
        self.scheduler.clear();
        self.session.quit_to_lobby()
    }

    /// Advances one frame. Returns the summary once the post-run pause is over.
    pub fn step(&mut self, dt: Duration, now: Instant) -> Option<RunSummary> {
        if self.session.state() == RunState::Running {
            self.drive(dt, now);
        }

        let due = self.scheduler.drain_due(now);
        if due.contains(&GameplayEvent::ReturnToLobby) {
            return Some(self.session.summary());
        }
        None
    }

    fn drive(&mut self, dt: Duration, now: Instant) {
        let speed = self.ramp.step(dt, 1.0);
        let from_z = self.player.z;
        self.player.z += speed * dt.as_secs_f32();

        // Check the swept span before the track recycles the segment behind us.
        let mut crashed = false;
        for spawn in self.track.spawns() {
            let passed = spawn.position.z > from_z && spawn.position.z <= self.player.z;
            if !passed || (spawn.position.x - self.player.x).abs() > CAR_HALF_WIDTH {
                continue;
            }
            match spawn.kind {
                SpawnKind::Coin => {
                    self.session.collect_coin();
                }
                SpawnKind::Obstacle => crashed = true,
            }
        }

        let update = self.track.tick(self.player.z);
        if !update.relocated.is_empty() {
            debug!("Track advanced to z={}", self.track.leading_edge());
        }

        let mut ended = self.session.tick(dt, self.player);
        if crashed && ended.is_none() {
            ended = self.session.hit_obstacle();
        }

        if let Some(outcome) = ended {
            info!("Run ended with {:?} at {} ({})", outcome, self.session.score_text(), self.session.time_text());
            self.scheduler.schedule(now, RETURN_TO_LOBBY_DELAY, GameplayEvent::ReturnToLobby);
        }
    }
}
