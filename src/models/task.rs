use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Active,
    Done,
}

/// The three disjoint task collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Today,
    Backlog,
    Archive,
}

impl Collection {
    pub fn label(&self) -> &'static str {
        match self {
            Collection::Today => "today",
            Collection::Backlog => "backlog",
            Collection::Archive => "archive",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64, // 创建时间的毫秒时间戳
    pub text: String,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved_to_backlog_at: Option<DateTime<Utc>>,
    /// Position hint written by older versions; storage order wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl Task {
    pub fn new(id: u64, text: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.trim().to_string(),
            starred: false,
            status: TaskStatus::Active,
            created_at,
            completed_at: None,
            archived_at: None,
            moved_to_backlog_at: None,
            order: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == TaskStatus::Active
    }

    /// Shown in the Focus panel.
    pub fn is_focus(&self) -> bool {
        self.starred && self.is_active()
    }

    /// Reset to a fresh unstarred active Today task.
    pub fn reset_for_today(&mut self) {
        self.starred = false;
        self.status = TaskStatus::Active;
        self.completed_at = None;
        self.archived_at = None;
        self.moved_to_backlog_at = None;
    }

    /// Merge the fields present in `patch`. Blank text is ignored.
    pub fn apply(&mut self, patch: &TaskPatch) {
        // 空白文本不覆盖原内容
        if let Some(text) = patch.text.as_deref() {
            let text = text.trim();
            if !text.is_empty() {
                self.text = text.to_string();
            }
        }
        if let Some(starred) = patch.starred {
            self.starred = starred;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(completed_at) = patch.completed_at {
            self.completed_at = completed_at;
        }
    }
}

/// Partial update for [`Task::apply`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub starred: Option<bool>,
    pub status: Option<TaskStatus>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}
