//! In-memory undo for deletions.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::models::{Collection, Task};

pub const DEFAULT_UNDO_LIMIT: usize = 20;

/// Snapshot of a deleted task and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedTask {
    pub origin: Collection,
    pub task: Task,
    pub deleted_at: DateTime<Utc>,
}

/// Bounded LIFO of deletions. When full, the oldest entry is dropped.
#[derive(Debug)]
pub struct UndoStack {
    entries: VecDeque<DeletedTask>,
    capacity: usize,
}

impl UndoStack {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a snapshot, returning the entry evicted to make room, if any.
    pub fn push(&mut self, entry: DeletedTask) -> Option<DeletedTask> {
        // 满了就丢弃最早的记录
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        if let Some(old) = &evicted {
            tracing::debug!(id = old.task.id, origin = %old.origin, "undo entry evicted");
        }
        self.entries.push_back(entry);
        evicted
    }

    pub fn pop(&mut self) -> Option<DeletedTask> {
        self.entries.pop_back()
    }

    pub fn peek(&self) -> Option<&DeletedTask> {
        self.entries.back()
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

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}
