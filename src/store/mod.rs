//! The task list store: Today, Backlog and Archive over a key-value substrate.
//!
//! Every operation loads the collections it touches, mutates an in-memory copy
//! and writes the full collections back. Storage failures never reach the
//! caller: reads fall back to empty documents and writes log and report `false`.

mod streak;
mod today;
mod transfer;

#[cfg(test)]
mod tests;

pub use today::{ReorderOutcome, StarOutcome};

use std::collections::HashSet;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::day::{Clock, Day, SystemClock};
use crate::models::{Collection, Settings, Task};
use crate::storage::KeyValueStore;

pub const TASKS_KEY: &str = "focusTasks_v1";
pub const BACKLOG_KEY: &str = "focusBacklog_v1";
pub const ARCHIVE_KEY: &str = "focusArchive_v1";
pub const SETTINGS_KEY: &str = "focusSettings_v1";
pub const STREAK_KEY: &str = "streakData";
pub const LAST_RESET_KEY: &str = "lastFocusReset";
pub const ONBOARDING_KEY: &str = "hasSeenOnboarding";

pub struct TaskStore<S, C = SystemClock> {
    storage: S,
    clock: C,
    settings: Settings,
}

impl<S: KeyValueStore, C: Clock> TaskStore<S, C> {
    pub fn new(storage: S, clock: C) -> Self {
        let mut store = Self {
            storage,
            clock,
            settings: Settings::default(),
        };
        // 设置在构造时读取一次，之后以内存副本为准
        store.settings = store.load_json::<Settings>(SETTINGS_KEY).normalized();
        store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn today_date(&self) -> Day {
        self.clock.today()
    }

    // ------------------------------------------------------------------
    // 设置与标记
    // ------------------------------------------------------------------

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Takes effect immediately for the focus cap and the daily reset.
    pub fn save_settings(&mut self, settings: Settings) -> bool {
        self.settings = settings.normalized();
        let settings = self.settings;
        tracing::info!(
            max_focus_tasks = settings.max_focus_tasks,
            auto_reset_focus = settings.auto_reset_focus,
            "settings updated"
        );
        self.save_json(SETTINGS_KEY, &settings)
    }

    pub fn onboarding_seen(&self) -> bool {
        self.get_scalar(ONBOARDING_KEY).as_deref() == Some("true")
    }

    pub fn mark_onboarding_seen(&mut self) -> bool {
        self.set_scalar(ONBOARDING_KEY, "true")
    }

    // ------------------------------------------------------------------
    // 集合读写
    // ------------------------------------------------------------------

    fn key_for(collection: Collection) -> &'static str {
        match collection {
            Collection::Today => TASKS_KEY,
            Collection::Backlog => BACKLOG_KEY,
            Collection::Archive => ARCHIVE_KEY,
        }
    }

    pub(crate) fn load(&self, collection: Collection) -> Vec<Task> {
        self.load_json::<Vec<Task>>(Self::key_for(collection))
    }

    pub(crate) fn save(&mut self, collection: Collection, tasks: &[Task]) -> bool {
        self.save_json(Self::key_for(collection), tasks)
    }

    /// Next id: the creation timestamp in milliseconds, bumped past every id
    /// still present in any collection. Once the largest live id is
    /// `u64::MAX` the smallest free id is handed out instead.
    pub(crate) fn next_id(&self, today: &[Task]) -> u64 {
        let now_ms = self.clock.now().timestamp_millis().max(0) as u64;
        let live = self.live_ids(today);
        let Some(&max_live) = live.iter().max() else {
            return now_ms;
        };

        match max_live.checked_add(1) {
            Some(next) => now_ms.max(next),
            None => {
                // 导入的数据可能带有 u64::MAX，不能再往上加
                let free = (1..=u64::MAX).find(|id| !live.contains(id)).unwrap_or(now_ms);
                tracing::warn!(id = free, "id space exhausted above the largest id, reusing a free id");
                free
            }
        }
    }

    fn live_ids(&self, today: &[Task]) -> HashSet<u64> {
        let backlog = self.load(Collection::Backlog);
        let archive = self.load(Collection::Archive);
        today
            .iter()
            .chain(backlog.iter())
            .chain(archive.iter())
            .map(|t| t.id)
            .collect()
    }

    pub(crate) fn id_in_use(&self, id: u64) -> bool {
        [Collection::Today, Collection::Backlog, Collection::Archive]
            .into_iter()
            .any(|c| self.load(c).iter().any(|t| t.id == id))
    }

    // ------------------------------------------------------------------
    // 原始 JSON 文档
    // ------------------------------------------------------------------

    fn load_json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.storage.get(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                // 损坏的文档当作空文档，不向调用方报错
                Err(e) => {
                    tracing::error!(key, error = %e, "corrupt document, using empty default");
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(e) => {
                tracing::error!(key, error = %e, "failed to read document");
                T::default()
            }
        }
    }

    fn save_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(key, error = %e, "failed to serialize document");
                return false;
            }
        };
        match self.storage.set(key, &raw) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key, error = %e, "failed to save document");
                false
            }
        }
    }

    pub(crate) fn get_scalar(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(key, error = %e, "failed to read flag");
                None
            }
        }
    }

    pub(crate) fn set_scalar(&mut self, key: &str, value: &str) -> bool {
        match self.storage.set(key, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key, error = %e, "failed to save flag");
                false
            }
        }
    }
}
