use super::TaskStore;
use super::today::focus_count;
use crate::day::Clock;
use crate::models::{Collection, Task, TaskPatch, TaskStatus};
use crate::storage::KeyValueStore;
use crate::undo::DeletedTask;

impl<S: KeyValueStore, C: Clock> TaskStore<S, C> {
    pub fn backlog(&self) -> Vec<Task> {
        self.load(Collection::Backlog)
    }

    /// Archive, newest first.
    pub fn archive(&self) -> Vec<Task> {
        let mut archive = self.load(Collection::Archive);
        archive.sort_by(|a, b| b.archived_at.cmp(&a.archived_at));
        archive
    }

    /// Remove `id` from `from`, adjust it, append it to `to`. The destination
    /// is written first so a failed write cannot lose the task.
    fn transfer(
        &mut self,
        id: u64,
        from: Collection,
        to: Collection,
        adjust: impl FnOnce(&mut Task),
    ) -> Option<Task> {
        let mut source = self.load(from);
        let index = source.iter().position(|t| t.id == id)?;
        let mut task = source.remove(index);
        adjust(&mut task);

        // 先写目标集合，失败时源集合保持不变
        let mut dest = self.load(to);
        dest.push(task.clone());
        if !self.save(to, &dest) {
            tracing::warn!(id, %from, %to, "move aborted, destination not saved");
            return None;
        }
        if !self.save(from, &source) {
            // 此时任务在两个集合里各有一份
            tracing::warn!(id, %from, %to, "source not saved, task is duplicated");
        }

        tracing::debug!(id, %from, %to, "task moved");
        Some(task)
    }

    /// Complete a Today task: it leaves Today and lands in the archive,
    /// and the streak is updated.
    pub fn archive_task(&mut self, id: u64) -> Option<Task> {
        let now = self.clock().now();
        let archived = self.transfer(id, Collection::Today, Collection::Archive, |task| {
            task.status = TaskStatus::Done;
            task.completed_at = Some(now);
            task.archived_at = Some(now);
        })?;
        self.update_streak();
        Some(archived)
    }

    pub fn move_to_backlog(&mut self, id: u64) -> bool {
        let now = self.clock().now();
        self.transfer(id, Collection::Today, Collection::Backlog, |task| {
            task.moved_to_backlog_at = Some(now);
        })
        .is_some()
    }

    pub fn restore_from_backlog(&mut self, id: u64) -> bool {
        self.transfer(id, Collection::Backlog, Collection::Today, Task::reset_for_today)
            .is_some()
    }

    pub fn restore_from_archive(&mut self, id: u64) -> bool {
        self.transfer(id, Collection::Archive, Collection::Today, Task::reset_for_today)
            .is_some()
    }

    /// Look in the backlog, then the archive.
    pub fn restore(&mut self, id: u64) -> Option<Collection> {
        if self.restore_from_backlog(id) {
            Some(Collection::Backlog)
        } else if self.restore_from_archive(id) {
            Some(Collection::Archive)
        } else {
            None
        }
    }

    fn update_in(&mut self, collection: Collection, id: u64, patch: &TaskPatch) -> Option<Task> {
        let mut tasks = self.load(collection);
        let task = tasks.iter_mut().find(|t| t.id == id)?;
        task.apply(patch);
        let updated = task.clone();
        self.save(collection, &tasks);
        Some(updated)
    }

    pub fn update_backlog_task(&mut self, id: u64, patch: TaskPatch) -> Option<Task> {
        self.update_in(Collection::Backlog, id, &patch)
    }

    pub fn update_archive_task(&mut self, id: u64, patch: TaskPatch) -> Option<Task> {
        self.update_in(Collection::Archive, id, &patch)
    }

    fn delete_in(&mut self, collection: Collection, id: u64) -> Option<Task> {
        let mut tasks = self.load(collection);
        let index = tasks.iter().position(|t| t.id == id);
        let removed = index.map(|i| tasks.remove(i));
        self.save(collection, &tasks);
        removed
    }

    pub fn delete_backlog_task(&mut self, id: u64) -> Option<Task> {
        self.delete_in(Collection::Backlog, id)
    }

    pub fn delete_archive_task(&mut self, id: u64) -> Option<Task> {
        self.delete_in(Collection::Archive, id)
    }

    /// Delete from whichever collection is named, returning an undo snapshot.
    pub fn delete_from(&mut self, collection: Collection, id: u64) -> Option<DeletedTask> {
        let task = match collection {
            Collection::Today => self.delete_task(id),
            Collection::Backlog => self.delete_backlog_task(id),
            Collection::Archive => self.delete_archive_task(id),
        }?;
        Some(DeletedTask {
            origin: collection,
            task,
            deleted_at: self.clock().now(),
        })
    }

    pub fn clear_backlog(&mut self) -> bool {
        self.save(Collection::Backlog, &[])
    }

    pub fn clear_archive(&mut self) -> bool {
        self.save(Collection::Archive, &[])
    }

    /// Undo a deletion: append the snapshot to the end of its origin.
    ///
    /// A starred Today task goes to the end of the starred partition while
    /// focus has room, and is unstarred otherwise. A snapshot whose id was
    /// taken in the meantime gets a fresh one.
    pub fn restore_deleted(&mut self, deleted: DeletedTask) -> Option<Task> {
        let DeletedTask { origin, mut task, .. } = deleted;

        let mut tasks = self.load(origin);
        // 删除后同一个 id 可能已被新任务占用
        if self.id_in_use(task.id) {
            let today = self.load(Collection::Today);
            let fresh = self.next_id(&today);
            tracing::info!(old = task.id, new = fresh, "restored task re-numbered");
            task.id = fresh;
        }

        if origin == Collection::Today && task.starred {
            if focus_count(&tasks) < self.settings().max_focus_tasks {
                let at = tasks.iter().position(|t| !t.starred).unwrap_or(tasks.len());
                tasks.insert(at, task.clone());
            } else {
                // focus 已满，以普通任务恢复
                task.starred = false;
                tasks.push(task.clone());
            }
        } else {
            tasks.push(task.clone());
        }

        if !self.save(origin, &tasks) {
            return None;
        }
        tracing::debug!(id = task.id, %origin, "deletion undone");
        Some(task)
    }
}
