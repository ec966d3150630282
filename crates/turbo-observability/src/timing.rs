//! Stage timing.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Timing context for one request.
///
/// Records named marks relative to creation, so stage durations can be
/// reported after the request completes.
#[derive(Debug, Clone)]
pub struct TimingContext {
    start: Instant,
    marks: HashMap<String, Instant>,
}

impl TimingContext {
    /// Start timing now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            marks: HashMap::new(),
        }
    }

    /// Record a timing mark. Re-marking a name overwrites it.
    pub fn mark(&mut self, name: &str) {
        self.marks.insert(name.to_string(), Instant::now());
    }

    /// Time from start to a mark.
    pub fn since_start(&self, name: &str) -> Option<Duration> {
        self.marks.get(name).map(|t| t.duration_since(self.start))
    }

    /// Time between two marks. `None` if either is missing or they are out of order.
    pub fn between(&self, from: &str, to: &str) -> Option<Duration> {
        let from = self.marks.get(from)?;
        let to = self.marks.get(to)?;
        to.checked_duration_since(*from)
    }

    /// Time since the context was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// All marks as microseconds since start, sorted by time.
    pub fn marks_us(&self) -> Vec<(String, u64)> {
        let mut marks: Vec<(String, u64)> = self
            .marks
            .iter()
            .map(|(name, t)| (name.clone(), t.duration_since(self.start).as_micros() as u64))
            .collect();
        marks.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        marks
    }
}

impl Default for TimingContext {
    fn default() -> Self {
        Self::new()
    }
}
