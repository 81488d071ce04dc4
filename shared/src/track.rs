use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Obstacle,
    Coin,
}

/// Something the host should instantiate on the track.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub segment: usize,
    pub kind: SpawnKind,
    pub position: Position,
    pub yaw_degrees: f32,
}

/// One reusable piece of road. `id` is stable across relocations.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Segment {
    pub id: usize,
    pub start_z: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackSettings {
    pub segment_count: usize,
    pub segment_length: f32,
    pub obstacles_per_segment: usize,
    pub coins_per_segment: usize,
    pub lane_half_width: f32,
    /// Longitudinal offset range, measured from a segment's start.
    pub ahead_range: (f32, f32),
    pub obstacle_y: f32,
    pub coin_y: f32,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            segment_count: 3,
            segment_length: 30.0,
            obstacles_per_segment: 2,
            coins_per_segment: 3,
            lane_half_width: 3.0,
            ahead_range: (0.0, 30.0),
            obstacle_y: 0.5,
            coin_y: 1.0,
        }
    }
}

/// Result of a single tick: which segments moved and what the host must spawn or remove.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TrackUpdate {
    pub relocated: Vec<Segment>,
    pub despawned: Vec<Spawn>,
    pub spawned: Vec<Spawn>,
}

impl TrackUpdate {
    pub fn is_empty(&self) -> bool {
        self.relocated.is_empty() && self.despawned.is_empty() && self.spawned.is_empty()
    }
}

/// Keeps a fixed ring of segments ahead of the player.
pub struct TrackSpawner {
    settings: TrackSettings,
    segments: VecDeque<Segment>,
    spawns: Vec<Spawn>,
    current_max_z: f32,
    rng: StdRng,
}

impl TrackSpawner {
    pub fn new(settings: TrackSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    pub fn with_seed(settings: TrackSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut settings: TrackSettings, rng: StdRng) -> Self {
        // A zero-length or empty window would never advance.
        settings.segment_count = settings.segment_count.max(1);
        if settings.segment_length <= 0.0 {
            settings.segment_length = TrackSettings::default().segment_length;
        }

        let segments: VecDeque<Segment> = (0..settings.segment_count)
            .map(|id| Segment { id, start_z: id as f32 * settings.segment_length })
            .collect();
        let current_max_z = segments.back().map(|s| s.start_z).unwrap_or(0.0);

        let mut spawner = Self {
            settings,
            segments,
            spawns: Vec::new(),
            current_max_z,
            rng,
        };

        // The player starts on the first segment, so keep it clear.
        let ahead: Vec<Segment> = spawner.segments.iter().skip(1).copied().collect();
        for segment in ahead {
            let rolled = spawner.roll_spawns(segment);
            spawner.spawns.extend(rolled);
        }
        spawner
    }

    /// Segments from oldest (trailing) to newest (leading).
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn spawns(&self) -> &[Spawn] {
        &self.spawns
    }

    pub fn current_max_z(&self) -> f32 {
        self.current_max_z
    }

    /// Far edge of the covered track.
    pub fn leading_edge(&self) -> f32 {
        self.current_max_z + self.settings.segment_length
    }

    pub fn tick(&mut self, player_z: f32) -> TrackUpdate {
        let mut update = TrackUpdate::default();
        if !player_z.is_finite() {
            return update;
        }
        if player_z > self.leading_edge() + self.settings.segment_length {
            self.rebase(player_z, &mut update);
            return update;
        }

        // Within one window length of the leading edge, so each segment moves at most once.
        let length = self.settings.segment_length;
        for _ in 0..self.segments.len() {
            let Some(oldest) = self.segments.front().copied() else {
                break;
            };
            if player_z <= oldest.start_z + length {
                break;
            }
            self.segments.pop_front();
            update.despawned.extend(self.take_spawns(oldest.id));

            self.current_max_z += length;
            let moved = Segment { id: oldest.id, start_z: self.current_max_z };
            self.segments.push_back(moved);
            update.relocated.push(moved);

            let rolled = self.roll_spawns(moved);
            self.spawns.extend(rolled.iter().copied());
            update.spawned.extend(rolled);
        }

        update
    }

    /// The player jumped further than one full pass of the window: lay it out
    /// again starting at the segment the player is on, which is left clear.
    fn rebase(&mut self, player_z: f32, update: &mut TrackUpdate) {
        let length = self.settings.segment_length;
        let base = (player_z / length).floor() * length;

        update.despawned.append(&mut self.spawns);

        let ids: Vec<usize> = self.segments.drain(..).map(|segment| segment.id).collect();
        for (slot, id) in ids.into_iter().enumerate() {
            let moved = Segment { id, start_z: base + slot as f32 * length };
            self.segments.push_back(moved);
            update.relocated.push(moved);
            if slot > 0 {
                let rolled = self.roll_spawns(moved);
                self.spawns.extend(rolled.iter().copied());
                update.spawned.extend(rolled);
            }
        }
        self.current_max_z = self.segments.back().map(|s| s.start_z).unwrap_or(base);
    }

    fn take_spawns(&mut self, segment: usize) -> Vec<Spawn> {
        let (gone, kept): (Vec<Spawn>, Vec<Spawn>) =
            self.spawns.drain(..).partition(|spawn| spawn.segment == segment);
        self.spawns = kept;
        gone
    }

    fn roll_spawns(&mut self, segment: Segment) -> Vec<Spawn> {
        let mut rolled = Vec::with_capacity(
            self.settings.obstacles_per_segment + self.settings.coins_per_segment,
        );
        for _ in 0..self.settings.obstacles_per_segment {
            rolled.push(self.roll_one(segment, SpawnKind::Obstacle));
        }
        for _ in 0..self.settings.coins_per_segment {
            rolled.push(self.roll_one(segment, SpawnKind::Coin));
        }
        rolled
    }

    fn roll_one(&mut self, segment: Segment, kind: SpawnKind) -> Spawn {
        let half_width = self.settings.lane_half_width.abs();
        let x = self.rng.gen_range(-half_width..=half_width);

        let (near, far) = self.settings.ahead_range;
        let offset = if far > near { self.rng.gen_range(near..far) } else { near };

        let (y, yaw_degrees) = match kind {
            SpawnKind::Obstacle => (self.settings.obstacle_y, self.rng.gen_range(0.0..360.0)),
            SpawnKind::Coin => (self.settings.coin_y, 0.0),
        };

        Spawn {
            segment: segment.id,
            kind,
            position: Position { x, y, z: segment.start_z + offset },
            yaw_degrees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawner() -> TrackSpawner {
        TrackSpawner::with_seed(TrackSettings::default(), 7)
    }

    #[test]
    fn test_initial_window() {
        let track = spawner();
        let starts: Vec<f32> = track.segments().map(|s| s.start_z).collect();
        assert_eq!(starts, vec![0.0, 30.0, 60.0]);
        assert_eq!(track.current_max_z(), 60.0);
        assert_eq!(track.leading_edge(), 90.0);
        // Segment 0 is left clear for the player.
        assert!(track.spawns().iter().all(|s| s.segment != 0));
        assert_eq!(track.spawns().len(), 2 * 5);
    }

    #[test]
    fn test_no_relocation_inside_oldest_segment() {
        let mut track = spawner();
        assert!(track.tick(15.0).is_empty());
        assert!(track.tick(30.0).is_empty());
    }

    #[test]
    fn test_oldest_segment_moves_to_front() {
        let mut track = spawner();
        let update = track.tick(30.5);
        assert_eq!(update.relocated, vec![Segment { id: 0, start_z: 90.0 }]);
        assert_eq!(track.current_max_z(), 90.0);
        let ids: Vec<usize> = track.segments().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
        assert_eq!(update.spawned.len(), 5);
        assert!(update.despawned.is_empty());
    }

    #[test]
    fn test_recycled_segment_despawns_its_objects() {
        let mut track = spawner();
        track.tick(31.0);
        let update = track.tick(61.0);
        assert_eq!(update.relocated, vec![Segment { id: 1, start_z: 120.0 }]);
        assert_eq!(update.despawned.len(), 5);
        assert!(update.despawned.iter().all(|s| s.segment == 1));
        assert_eq!(track.spawns().len(), 15);
    }

    #[test]
    fn test_large_jump_rebases_window() {
        let mut track = spawner();
        let update = track.tick(200.0);
        assert_eq!(update.relocated.len(), 3);
        assert_eq!(update.despawned.len(), 10);
        assert_eq!(update.spawned.len(), 10);
        let starts: Vec<f32> = track.segments().map(|s| s.start_z).collect();
        assert_eq!(starts, vec![180.0, 210.0, 240.0]);
        assert_eq!(track.current_max_z(), 240.0);
        // The player's own segment is clear.
        assert!(track.spawns().iter().all(|s| s.position.z >= 210.0));
        assert!(track.tick(205.0).is_empty());
    }

    #[test]
    fn test_jump_to_leading_edge_moves_each_segment_once() {
        let mut track = spawner();
        let update = track.tick(90.0);
        assert_eq!(update.relocated.len(), 2);
        let starts: Vec<f32> = track.segments().map(|s| s.start_z).collect();
        assert_eq!(starts, vec![60.0, 90.0, 120.0]);
    }

    #[test]
    fn test_non_finite_position_is_ignored() {
        let mut track = spawner();
        assert!(track.tick(f32::NAN).is_empty());
        assert!(track.tick(f32::INFINITY).is_empty());
        assert!(track.tick(f32::NEG_INFINITY).is_empty());
        assert_eq!(track.current_max_z(), 60.0);
    }

    #[test]
    fn test_huge_position_returns() {
        let mut track = spawner();
        let update = track.tick(1.0e9);
        assert_eq!(update.relocated.len(), 3);
        assert_eq!(track.segments().count(), 3);
        track.tick(1.0e9 + 64.0);
        track.tick(4.0e9);
        assert_eq!(track.segments().count(), 3);
    }

    #[test]
    fn test_spawns_stay_in_ranges() {
        let mut track = spawner();
        for step in 1..50 {
            track.tick(step as f32 * 25.0);
        }
        let starts: Vec<(usize, f32)> = track.segments().map(|s| (s.id, s.start_z)).collect();
        for spawn in track.spawns() {
            assert!(spawn.position.x >= -3.0 && spawn.position.x <= 3.0);
            let start = starts.iter().find(|(id, _)| *id == spawn.segment).unwrap().1;
            assert!(spawn.position.z >= start && spawn.position.z < start + 30.0);
            match spawn.kind {
                SpawnKind::Obstacle => {
                    assert_eq!(spawn.position.y, 0.5);
                    assert!(spawn.yaw_degrees >= 0.0 && spawn.yaw_degrees < 360.0);
                }
                SpawnKind::Coin => assert_eq!(spawn.position.y, 1.0),
            }
        }
    }

    #[test]
    fn test_same_seed_same_track() {
        let mut a = spawner();
        let mut b = spawner();
        assert_eq!(a.spawns(), b.spawns());
        assert_eq!(a.tick(95.0), b.tick(95.0));
    }

    #[test]
    fn test_degenerate_settings() {
        let settings = TrackSettings {
            segment_count: 0,
            segment_length: 0.0,
            ahead_range: (5.0, 5.0),
            ..TrackSettings::default()
        };
        let mut track = TrackSpawner::with_seed(settings, 1);
        assert_eq!(track.segments().count(), 1);
        let update = track.tick(31.0);
        assert_eq!(update.relocated.len(), 1);
        assert!(update.spawned.iter().all(|s| s.position.z == 35.0));
    }
}
