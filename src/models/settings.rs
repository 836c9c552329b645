use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_FOCUS_TASKS: usize = 6;

/// User-editable store settings, persisted next to the task lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_max_focus_tasks")]
    pub max_focus_tasks: usize, // focus 列表上限
    #[serde(default)]
    pub auto_reset_focus: bool,
}

fn default_max_focus_tasks() -> usize {
    DEFAULT_MAX_FOCUS_TASKS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_focus_tasks: DEFAULT_MAX_FOCUS_TASKS,
            auto_reset_focus: false,
        }
    }
}

impl Settings {
    /// The focus cap is at least one.
    pub fn normalized(mut self) -> Self {
        self.max_focus_tasks = self.max_focus_tasks.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"showSwipeHints": true}"#).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_zero_cap_is_raised_to_one() {
        let settings = Settings {
            max_focus_tasks: 0,
            auto_reset_focus: true,
        }
        .normalized();
        assert_eq!(settings.max_focus_tasks, 1);
    }
}
