//! Bounded rolling log of recent turn summaries.

use std::collections::VecDeque;

use singularity_types::TurnSummary;

/// The last few resolved turns, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsLog {
    capacity: usize,
    entries: VecDeque<TurnSummary>,
}

impl NewsLog {
    /// Create an empty log that keeps at most `capacity` entries.
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a summary, evicting the oldest entry when full.
    pub fn push(&mut self, summary: TurnSummary) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(summary);
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TurnSummary> {
        self.entries.iter()
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&TurnSummary> {
        self.entries.back()
    }

    /// One headline per entry, oldest first.
    pub fn headlines(&self) -> Vec<String> {
        self.entries.iter().map(TurnSummary::headline).collect()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum retained entries.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
