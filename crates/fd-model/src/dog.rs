use super::*;
use fd_core::DOG_WIDTH;
use fd_core::DogId;
use fd_core::LootId;
use fd_core::LootType;
use fd_core::LootValue;
use fd_core::Real;
use fd_core::Score;
use fd_geom::Gatherer;
use fd_geom::Point2;
use fd_geom::Rect2;
use fd_geom::Vec2;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

/// Facing of a dog. `Stop` zeroes the velocity but keeps the facing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
    #[default]
    #[serde(rename = "U")]
    Up,
    #[serde(rename = "D")]
    Down,
    #[serde(rename = "")]
    Stop,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Right => "R",
            Self::Up => "U",
            Self::Down => "D",
            Self::Stop => "",
        }
    }
}

/// Loot traits carried in a dog's bag after pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagItem {
    pub id: LootId,
    #[serde(rename = "type")]
    pub kind: LootType,
    pub value: LootValue,
}

/// Player avatar. Lives on the roads of exactly one map.
#[derive(Debug, Clone, PartialEq)]
pub struct Dog {
    id: DogId,
    name: String,
    position: Point2,
    velocity: Vec2,
    facing: Direction,
    bag: Vec<BagItem>,
    score: Score,
    max_speed: Real,
    bag_capacity: usize,
    play_time: Duration,
    idle_time: Duration,
}

impl Dog {
    pub fn new(id: DogId, name: &str, position: Point2, max_speed: Real, bag_capacity: usize) -> Self {
        Self {
            id,
            name: name.to_string(),
            position,
            velocity: Vec2::ZERO,
            facing: Direction::Up,
            bag: Vec::new(),
            score: 0,
            max_speed,
            bag_capacity,
            play_time: Duration::ZERO,
            idle_time: Duration::ZERO,
        }
    }
    /// Reconstructs a dog from a persisted snapshot.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: DogId,
        name: String,
        position: Point2,
        velocity: Vec2,
        facing: Direction,
        bag: Vec<BagItem>,
        score: Score,
        max_speed: Real,
        bag_capacity: usize,
        play_time: Duration,
        idle_time: Duration,
    ) -> Self {
        Self {
            id,
            name,
            position,
            velocity,
            facing,
            bag,
            score,
            max_speed,
            bag_capacity,
            play_time,
            idle_time,
        }
    }
    pub fn id(&self) -> DogId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn position(&self) -> Point2 {
        self.position
    }
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
    pub fn facing(&self) -> Direction {
        self.facing
    }
    pub fn bag(&self) -> &[BagItem] {
        &self.bag
    }
    pub fn score(&self) -> Score {
        self.score
    }
    pub fn max_speed(&self) -> Real {
        self.max_speed
    }
    pub fn bag_capacity(&self) -> usize {
        self.bag_capacity
    }
    pub fn play_time(&self) -> Duration {
        self.play_time
    }
    pub fn idle_time(&self) -> Duration {
        self.idle_time
    }
}

impl Dog {
    /// Applies a steering command.
    ///
    /// Any command, including `Stop`, clears accumulated idle time. The
    /// reset firing on `Stop` too is contractual: conformance suites poke
    /// a dog with stop commands to keep it from retiring.
    pub fn change_dir(&mut self, dir: Direction) {
        if dir != Direction::Stop {
            self.facing = dir;
        }
        if !self.idle_time.is_zero() {
            self.idle_time = Duration::ZERO;
        }
        self.velocity = match dir {
            Direction::Left => Vec2::new(-self.max_speed, 0.0),
            Direction::Right => Vec2::new(self.max_speed, 0.0),
            Direction::Up => Vec2::new(0.0, -self.max_speed),
            Direction::Down => Vec2::new(0.0, self.max_speed),
            Direction::Stop => Vec2::ZERO,
        };
    }
    /// Tries to stash a picked-up item. Fails when the bag is full.
    pub fn try_stash(&mut self, item: BagItem) -> bool {
        if self.bag.len() < self.bag_capacity {
            self.bag.push(item);
            return true;
        }
        false
    }
    /// Unloads the bag at an office, converting item values into score.
    pub fn deposit(&mut self) {
        for item in self.bag.drain(..) {
            self.score += item.value;
        }
    }
    /// Advances the dog by `dt` along its road and reports the swept
    /// segment for collision detection.
    ///
    /// A motionless dog accrues idle time and sweeps nothing. A moving dog
    /// that would leave its road is clamped to the boundary in its facing
    /// direction and stopped.
    pub fn advance(&mut self, roads: &[Road], dt: Duration) -> Gatherer<DogId> {
        self.play_time += dt;
        if self.velocity.is_zero() {
            self.idle_time += dt;
            return self.sweep(self.position);
        }
        let rect = active_road(roads, self.position, self.velocity);
        let next = self.position.translated(self.velocity, fd_core::seconds(dt));
        if rect.contains(next) {
            let from = std::mem::replace(&mut self.position, next);
            return Gatherer {
                start: from,
                end: next,
                width: DOG_WIDTH,
                id: self.id,
            };
        }
        let edge = boundary(rect, self.position, self.facing);
        let from = std::mem::replace(&mut self.position, edge);
        self.velocity = Vec2::ZERO;
        Gatherer {
            start: from,
            end: self.position,
            width: DOG_WIDTH,
            id: self.id,
        }
    }
    fn sweep(&self, to: Point2) -> Gatherer<DogId> {
        Gatherer {
            start: self.position,
            end: to,
            width: DOG_WIDTH,
            id: self.id,
        }
    }
}

/// Picks the road under `position`. At intersections the road whose
/// orientation matches the velocity wins.
fn active_road(roads: &[Road], position: Point2, velocity: Vec2) -> Rect2 {
    let mut fallback = Rect2::default();
    for road in roads {
        let rect = road.rect();
        if !rect.contains(position) {
            continue;
        }
        if velocity.is_horizontal() == rect.is_horizontal() {
            return rect;
        }
        fallback = rect;
    }
    fallback
}

/// Edge of the road in the facing direction, keeping the cross coordinate.
fn boundary(rect: Rect2, position: Point2, facing: Direction) -> Point2 {
    match facing {
        Direction::Right => Point2::new(rect.right, position.y),
        Direction::Left => Point2::new(rect.left, position.y),
        Direction::Up => Point2::new(position.x, rect.top),
        Direction::Down => Point2::new(position.x, rect.bottom),
        Direction::Stop => position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_road() -> Vec<Road> {
        vec![Road::horizontal(GridPoint::new(0, 0), 10)]
    }

    #[test]
    fn idle_dog_accrues_idle_time_only() {
        let mut dog = Dog::new(1, "Rex", Point2::new(0.0, 0.0), 2.0, 3);
        let sweep = dog.advance(&straight_road(), Duration::from_millis(500));
        assert!(sweep.is_stationary());
        assert_eq!(dog.idle_time(), Duration::from_millis(500));
        assert_eq!(dog.play_time(), Duration::from_millis(500));
        assert_eq!(dog.position(), Point2::new(0.0, 0.0));
    }

    #[test]
    fn moving_dog_travels_speed_times_dt() {
        let mut dog = Dog::new(1, "Rex", Point2::new(0.0, 0.0), 2.0, 3);
        dog.change_dir(Direction::Right);
        let sweep = dog.advance(&straight_road(), Duration::from_millis(1500));
        assert_eq!(dog.position(), Point2::new(3.0, 0.0));
        assert_eq!(sweep.start, Point2::new(0.0, 0.0));
        assert_eq!(sweep.end, Point2::new(3.0, 0.0));
        assert_eq!(dog.velocity(), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn dog_clamps_at_road_boundary_and_stops() {
        let mut dog = Dog::new(1, "Rex", Point2::new(9.0, 0.0), 2.0, 3);
        dog.change_dir(Direction::Right);
        dog.advance(&straight_road(), Duration::from_secs(5));
        assert_eq!(dog.position(), Point2::new(10.4, 0.0));
        assert!(dog.velocity().is_zero());
        assert_eq!(dog.facing(), Direction::Right);
    }

    #[test]
    fn intersection_prefers_matching_orientation() {
        let roads = vec![
            Road::horizontal(GridPoint::new(0, 0), 10),
            Road::vertical(GridPoint::new(5, 0), 10),
        ];
        let mut dog = Dog::new(1, "Rex", Point2::new(5.0, 0.0), 1.0, 3);
        dog.change_dir(Direction::Down);
        dog.advance(&roads, Duration::from_secs(3));
        assert_eq!(dog.position(), Point2::new(5.0, 3.0));
        assert_eq!(dog.velocity(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn stop_preserves_facing_and_resets_idle() {
        let mut dog = Dog::new(1, "Rex", Point2::new(0.0, 0.0), 1.0, 3);
        dog.change_dir(Direction::Left);
        dog.advance(&straight_road(), Duration::from_secs(1));
        dog.change_dir(Direction::Stop);
        dog.advance(&straight_road(), Duration::from_secs(2));
        assert_eq!(dog.idle_time(), Duration::from_secs(2));
        dog.change_dir(Direction::Stop);
        assert_eq!(dog.idle_time(), Duration::ZERO);
        assert_eq!(dog.facing(), Direction::Left);
        assert!(dog.velocity().is_zero());
    }

    #[test]
    fn full_bag_rejects_pickup() {
        let mut dog = Dog::new(1, "Rex", Point2::new(0.0, 0.0), 1.0, 1);
        assert!(dog.try_stash(BagItem { id: 1, kind: 0, value: 10 }));
        assert!(!dog.try_stash(BagItem { id: 2, kind: 0, value: 20 }));
        assert_eq!(dog.bag().len(), 1);
    }

    #[test]
    fn deposit_moves_values_to_score() {
        let mut dog = Dog::new(1, "Rex", Point2::new(0.0, 0.0), 1.0, 3);
        dog.try_stash(BagItem { id: 1, kind: 0, value: 10 });
        dog.try_stash(BagItem { id: 2, kind: 1, value: 5 });
        dog.deposit();
        assert_eq!(dog.score(), 15);
        assert!(dog.bag().is_empty());
    }
}
