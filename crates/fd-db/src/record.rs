use fd_core::Score;
use std::time::Duration;

/// Final statistics of a retired player. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetiredRecord {
    pub name: String,
    pub score: Score,
    pub play_time: Duration,
}

impl RetiredRecord {
    pub fn new(name: String, score: Score, play_time: Duration) -> Self {
        Self {
            name,
            score,
            play_time,
        }
    }
    pub fn play_time_ms(&self) -> i32 {
        self.play_time.as_millis() as i32
    }
    /// Ranking key: score descending, play time ascending, name ascending.
    pub fn rank(&self) -> (std::cmp::Reverse<Score>, Duration, &str) {
        (std::cmp::Reverse(self.score), self.play_time, &self.name)
    }
}
