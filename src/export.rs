//! Whole-data export and import.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::day::Clock;
use crate::models::{Collection, Settings, Task};
use crate::storage::KeyValueStore;
use crate::store::TaskStore;

pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub max_focus_tasks: usize,
    pub auto_reset_focus: bool,
}

impl From<Settings> for ExportSettings {
    fn from(s: Settings) -> Self {
        Self {
            max_focus_tasks: s.max_focus_tasks,
            auto_reset_focus: s.auto_reset_focus,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub tasks: Vec<Task>,
    pub archive: Vec<Task>,
    pub settings: ExportSettings,
}

/// An import document. Only presence is checked: missing lists are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportData {
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
    #[serde(default)]
    pub archive: Option<Vec<Task>>,
}

/// What an import replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub tasks: Option<usize>,
    pub archive: Option<usize>,
}

impl<S: KeyValueStore, C: Clock> TaskStore<S, C> {
    pub fn export_data(&self) -> ExportData {
        ExportData {
            version: EXPORT_VERSION.to_string(),
            exported_at: self.clock().now(),
            tasks: self.today(),
            archive: self.load(Collection::Archive),
            settings: self.settings().into(),
        }
    }

    /// Replace the lists present in `data`. Imported Today tasks are
    /// stable-sorted so starred ones lead.
    pub fn import_data(&mut self, data: ImportData) -> ImportSummary {
        let mut summary = ImportSummary::default();
        if let Some(mut tasks) = data.tasks {
            // 星标任务排在前面，保持各自原有顺序
            tasks.sort_by_key(|t| !t.starred);
            if self.save(Collection::Today, &tasks) {
                summary.tasks = Some(tasks.len());
            }
        }
        // 没有出现的列表保持不变
        if let Some(archive) = data.archive {
            if self.save(Collection::Archive, &archive) {
                summary.archive = Some(archive.len());
            }
        }
        tracing::info!(?summary, "data imported");
        summary
    }
}

/// Default download name, e.g. `daily-focus-2025-12-08.json`.
pub fn export_file_name(exported_at: DateTime<Utc>) -> String {
    format!("daily-focus-{}.json", exported_at.format("%Y-%m-%d"))
}
