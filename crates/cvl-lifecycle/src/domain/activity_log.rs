//! Bounded history of user-visible actions

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub at: DateTime<Utc>,
    pub action: String,
}

impl fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.at.format("%H:%M:%S"), self.action)
    }
}

/// Keeps the most recent `capacity` entries, oldest first.
#[derive(Debug)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn append(&mut self, action: impl Into<String>) -> ActivityEntry {
        self.append_at(Utc::now(), action)
    }

    pub fn append_at(&mut self, at: DateTime<Utc>, action: impl Into<String>) -> ActivityEntry {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        let entry = ActivityEntry {
            at,
            action: action.into(),
        };
        self.entries.push_back(entry.clone());
        entry
    }

    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
