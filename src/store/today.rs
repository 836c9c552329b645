use super::{LAST_RESET_KEY, TaskStore};
use crate::day::{Clock, Day};
use crate::models::{Collection, Task, TaskPatch};
use crate::storage::KeyValueStore;

/// Result of a star toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarOutcome {
    Starred,
    Unstarred,
    /// The focus list already holds the maximum; nothing changed.
    FocusFull,
    NotFound,
}

/// Result of a manual reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    Moved,
    /// Same task, or already at the edge of its partition.
    Unchanged,
    /// The two tasks sit on different sides of the starred boundary.
    CrossPartition,
    NotFound,
}

/// 带星任务数量，已完成但仍带星的任务同样占用 focus 名额
pub fn focus_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| t.starred).count()
}

/// Where the non-starred partition begins.
fn partition_point(tasks: &[Task]) -> usize {
    tasks.iter().position(|t| !t.starred).unwrap_or(tasks.len())
}

/// Flip the star on `tasks[index]` and reposition it so that starred tasks
/// stay in front.
pub fn toggle_star_at(tasks: &mut Vec<Task>, index: usize, max_focus: usize) -> StarOutcome {
    let Some(task) = tasks.get(index) else {
        return StarOutcome::NotFound;
    };
    let was_starred = task.starred;

    // 只有加星需要检查上限，取消星标总是允许
    if !was_starred && focus_count(tasks) >= max_focus {
        return StarOutcome::FocusFull;
    }

    let mut task = tasks.remove(index);
    task.starred = !was_starred;

    if task.starred {
        tasks.insert(0, task);
        StarOutcome::Starred
    } else {
        // 放到非星标区的开头
        let at = partition_point(tasks);
        tasks.insert(at, task);
        StarOutcome::Unstarred
    }
}

/// Move the task at `from` to the index `to` held before the move.
pub fn reorder_within(tasks: &mut Vec<Task>, from: usize, to: usize) -> ReorderOutcome {
    if from >= tasks.len() || to >= tasks.len() {
        return ReorderOutcome::NotFound;
    }
    if from == to {
        return ReorderOutcome::Unchanged;
    }
    // 不允许跨越星标分界线
    if tasks[from].starred != tasks[to].starred {
        return ReorderOutcome::CrossPartition;
    }
    let task = tasks.remove(from);
    tasks.insert(to, task);
    ReorderOutcome::Moved
}

impl<S: KeyValueStore, C: Clock> TaskStore<S, C> {
    /// Every Today task in storage order.
    pub fn today(&self) -> Vec<Task> {
        self.load(Collection::Today)
    }

    /// Starred active tasks, in order.
    pub fn focus_tasks(&self) -> Vec<Task> {
        self.today().into_iter().filter(|t| t.is_focus()).collect()
    }

    /// Non-starred active tasks, in order.
    pub fn other_tasks(&self) -> Vec<Task> {
        self.today()
            .into_iter()
            .filter(|t| t.is_active() && !t.starred)
            .collect()
    }

    pub fn focus_count(&self) -> usize {
        focus_count(&self.today())
    }

    pub fn can_add_focus(&self) -> bool {
        self.focus_count() < self.settings().max_focus_tasks
    }

    pub fn find_today(&self, id: u64) -> Option<Task> {
        self.today().into_iter().find(|t| t.id == id)
    }

    /// Append a new unstarred task. Blank text adds nothing.
    pub fn add_task(&mut self, text: &str) -> Option<Task> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let mut tasks = self.today();
        let id = self.next_id(&tasks);
        let task = Task::new(id, text, self.clock().now());
        tasks.push(task.clone());
        self.save(Collection::Today, &tasks);

        tracing::debug!(id, "task added");
        Some(task)
    }

    /// Merge `patch` into a Today task. A star change goes through the same
    /// cap check and repositioning as [`TaskStore::toggle_star`]. A status
    /// patch that leaves the task inactive also drops its star.
    pub fn update_task(&mut self, id: u64, patch: TaskPatch) -> Option<Task> {
        let mut tasks = self.today();
        let index = tasks.iter().position(|t| t.id == id)?;

        // 星标变化单独处理，其余字段直接合并
        let star_request = patch.starred;
        let mut rest = patch;
        rest.starred = None;
        tasks[index].apply(&rest);

        // 非 active 的任务不再保留星标，释放 focus 名额
        let star_request = if tasks[index].is_active() {
            star_request
        } else {
            Some(false)
        };

        if let Some(starred) = star_request {
            if starred != tasks[index].starred {
                let outcome = toggle_star_at(&mut tasks, index, self.settings().max_focus_tasks);
                if outcome == StarOutcome::FocusFull {
                    tracing::info!(id, "star change rejected, focus is full");
                }
            }
        }

        self.save(Collection::Today, &tasks);
        tasks.into_iter().find(|t| t.id == id)
    }

    /// Remove a Today task and hand back what was removed.
    pub fn delete_task(&mut self, id: u64) -> Option<Task> {
        let mut tasks = self.today();
        let index = tasks.iter().position(|t| t.id == id);
        let removed = index.map(|i| tasks.remove(i));
        self.save(Collection::Today, &tasks);

        if removed.is_some() {
            tracing::debug!(id, "task deleted");
        }
        removed
    }

    pub fn toggle_star(&mut self, id: u64) -> StarOutcome {
        let mut tasks = self.today();
        let Some(index) = tasks.iter().position(|t| t.id == id) else {
            return StarOutcome::NotFound;
        };

        let outcome = toggle_star_at(&mut tasks, index, self.settings().max_focus_tasks);
        match outcome {
            StarOutcome::Starred | StarOutcome::Unstarred => {
                self.save(Collection::Today, &tasks);
                tracing::debug!(id, ?outcome, "star toggled");
            }
            StarOutcome::FocusFull => {
                tracing::info!(id, max = self.settings().max_focus_tasks, "focus is full");
            }
            StarOutcome::NotFound => {}
        }
        outcome
    }

    /// Move `moving` to the position held by `target`. Both must be on the
    /// same side of the starred boundary.
    pub fn reorder(&mut self, moving: u64, target: u64) -> ReorderOutcome {
        let mut tasks = self.today();
        let from = tasks.iter().position(|t| t.id == moving);
        let to = tasks.iter().position(|t| t.id == target);
        let (Some(from), Some(to)) = (from, to) else {
            return ReorderOutcome::NotFound;
        };

        let outcome = reorder_within(&mut tasks, from, to);
        if outcome == ReorderOutcome::Moved {
            self.save(Collection::Today, &tasks);
            tracing::debug!(moving, target, "order updated");
        }
        outcome
    }

    pub fn move_up(&mut self, id: u64) -> ReorderOutcome {
        self.move_by(id, -1)
    }

    pub fn move_down(&mut self, id: u64) -> ReorderOutcome {
        self.move_by(id, 1)
    }

    /// Swap with the neighbour in the same partition; the partition edge
    /// stops the move.
    fn move_by(&mut self, id: u64, step: isize) -> ReorderOutcome {
        let tasks = self.today();
        let Some(index) = tasks.iter().position(|t| t.id == id) else {
            return ReorderOutcome::NotFound;
        };
        let Some(neighbour) = index.checked_add_signed(step).and_then(|i| tasks.get(i)) else {
            return ReorderOutcome::Unchanged;
        };
        if neighbour.starred != tasks[index].starred {
            return ReorderOutcome::Unchanged;
        }
        let target = neighbour.id;
        self.reorder(id, target)
    }

    /// Drop every non-starred Today task. Returns how many were removed.
    pub fn delete_non_starred(&mut self) -> usize {
        let tasks = self.today();
        let before = tasks.len();
        let kept: Vec<Task> = tasks.into_iter().filter(|t| t.starred).collect();
        let removed = before - kept.len();
        self.save(Collection::Today, &kept);
        tracing::info!(removed, "non-starred tasks deleted");
        removed
    }

    /// Clear every star ("new day"). Returns how many were cleared.
    pub fn clear_all_stars(&mut self) -> usize {
        let mut tasks = self.today();
        let mut cleared = 0;
        for task in tasks.iter_mut().filter(|t| t.starred) {
            task.starred = false;
            cleared += 1;
        }
        self.save(Collection::Today, &tasks);
        cleared
    }

    /// Once per calendar day, when enabled, clear the focus list.
    /// Returns the number of stars cleared; a repeat call on the same day
    /// returns 0.
    pub fn auto_reset_focus(&mut self) -> usize {
        if !self.settings().auto_reset_focus {
            return 0;
        }

        let today = self.today_date();
        let last_reset = self
            .get_scalar(LAST_RESET_KEY)
            .and_then(|raw| raw.parse::<Day>().ok());
        if last_reset == Some(today) {
            return 0;
        }

        // 即使没有星标可清，也记下今天，避免同一天重复执行
        let cleared = self.clear_all_stars();
        self.set_scalar(LAST_RESET_KEY, &today.to_string());
        tracing::info!(cleared, %today, "daily focus reset");
        cleared
    }
}
