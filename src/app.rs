use crate::config::Config;
use crate::ui::dialogs::{ConfirmAction, DialogType, InputPurpose};
use crate::ui::text_input::TaskInput;
use ivyfocus::day::Clock;
use ivyfocus::models::{Collection, DailyProgress, Task, TaskPatch};
use ivyfocus::storage::KeyValueStore;
use ivyfocus::store::{ReorderOutcome, StarOutcome, TaskStore};
use ivyfocus::undo::UndoStack;
use std::time::Instant;

/// The store as the app sees it: any backend, the system clock.
pub type Store = TaskStore<Box<dyn KeyValueStore>, Box<dyn Clock>>;

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// 通知消息
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
}

impl Notification {
    /// 检查通知是否已过期（3秒后自动消失）
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= 3
    }
}

/// 应用模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 正常模式 - 导航和操作任务
    Normal,
    /// 对话框模式
    Dialog,
    /// 帮助模式 - 显示快捷键
    Help,
}

/// 应用状态
pub struct App {
    pub store: Store,
    /// 本次会话的删除记录
    pub undo: UndoStack,
    /// 当前视图
    pub view: Collection,
    /// 当前视图的任务（每次操作后刷新）
    pub tasks: Vec<Task>,
    /// 选中的任务索引
    pub selected: usize,
    pub mode: Mode,
    /// 当前显示的对话框
    pub dialog: Option<DialogType>,
    /// 是否显示首次运行欢迎对话框
    pub show_welcome_dialog: bool,
    pub notification: Option<Notification>,
    pub streak: u32,
    pub progress: DailyProgress,
}

impl App {
    /// 创建新的应用实例
    pub fn new(store: Store, config: &Config) -> Self {
        let streak = store.effective_streak();
        let progress = store.daily_progress();
        let show_welcome_dialog = !store.onboarding_seen();

        let mut app = Self {
            store,
            undo: UndoStack::new(config.undo_limit),
            view: Collection::Today,
            tasks: Vec::new(),
            selected: 0,
            mode: Mode::Normal,
            dialog: None,
            show_welcome_dialog,
            notification: None,
            streak,
            progress,
        };

        let cleared = app.store.auto_reset_focus();
        if cleared > 0 {
            app.show_notification(
                format!("New day! {} focus task{} cleared", cleared, plural(cleared)),
                NotificationLevel::Info,
            );
        }

        app.refresh();
        app
    }

    /// 重新加载当前视图和统计
    pub fn refresh(&mut self) {
        self.tasks = match self.view {
            Collection::Today => self.store.today(),
            Collection::Backlog => self.store.backlog(),
            Collection::Archive => self.store.archive(),
        };
        self.streak = self.store.effective_streak();
        self.progress = self.store.daily_progress();

        if self.tasks.is_empty() {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(self.tasks.len() - 1);
        }
    }

    /// Number of leading starred tasks in the Today view.
    pub fn focus_len(&self) -> usize {
        if self.view != Collection::Today {
            return 0;
        }
        self.tasks.iter().take_while(|t| t.starred).count()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected)
    }

    fn selected_id(&self) -> Option<u64> {
        self.selected_task().map(|t| t.id)
    }

    fn select_id(&mut self, id: u64) {
        if let Some(index) = self.tasks.iter().position(|t| t.id == id) {
            self.selected = index;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.tasks.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn switch_view(&mut self, view: Collection) {
        if self.view != view {
            self.view = view;
            self.selected = 0;
        }
        self.refresh();
    }

    pub fn next_view(&mut self) {
        let next = match self.view {
            Collection::Today => Collection::Backlog,
            Collection::Backlog => Collection::Archive,
            Collection::Archive => Collection::Today,
        };
        self.switch_view(next);
    }

    pub fn dismiss_welcome(&mut self) {
        self.show_welcome_dialog = false;
        self.store.mark_onboarding_seen();
    }

    // ------------------------------------------------------------------
    // Dialogs
    // ------------------------------------------------------------------

    pub fn open_add_dialog(&mut self) {
        self.dialog = Some(DialogType::Input {
            title: "New task".to_string(),
            prompt: "What needs doing today?".to_string(),
            input: TaskInput::new(""),
            purpose: InputPurpose::Add,
        });
        self.mode = Mode::Dialog;
    }

    pub fn open_edit_dialog(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let (id, text) = (task.id, task.text.clone());
        self.dialog = Some(DialogType::Input {
            title: "Edit task".to_string(),
            prompt: format!("Editing a {} task", self.view),
            input: TaskInput::new(&text),
            purpose: InputPurpose::Edit(id),
        });
        self.mode = Mode::Dialog;
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
        self.mode = Mode::Normal;
    }

    fn open_confirm(&mut self, title: &str, message: String, action: ConfirmAction) {
        self.dialog = Some(DialogType::Confirm {
            title: title.to_string(),
            message,
            yes_selected: false,
            action,
        });
        self.mode = Mode::Dialog;
    }

    pub fn request_new_day(&mut self) {
        let stars = self.store.focus_count();
        self.open_confirm(
            "Start a new day",
            format!("Clear all {} focus star{}?", stars, plural(stars)),
            ConfirmAction::NewDay,
        );
    }

    /// Ask before emptying the current list (non-starred tasks in Today).
    pub fn request_clear(&mut self) {
        match self.view {
            Collection::Today => self.open_confirm(
                "Delete tasks",
                "Delete every task that is not in today's focus?".to_string(),
                ConfirmAction::DeleteUnstarred,
            ),
            Collection::Backlog => self.open_confirm(
                "Clear backlog",
                "Delete every task in the backlog? This cannot be undone.".to_string(),
                ConfirmAction::ClearBacklog,
            ),
            Collection::Archive => self.open_confirm(
                "Clear archive",
                "Delete every completed task? This cannot be undone.".to_string(),
                ConfirmAction::ClearArchive,
            ),
        }
    }

    pub fn submit_input(&mut self, purpose: InputPurpose, text: &str) {
        if text.trim().is_empty() {
            self.show_notification("Task text cannot be empty".into(), NotificationLevel::Warning);
            return;
        }

        match purpose {
            InputPurpose::Add => {
                let Some(task) = self.store.add_task(text) else {
                    return;
                };
                self.view = Collection::Today;
                self.refresh();
                self.select_id(task.id);
                self.show_notification("Task added".into(), NotificationLevel::Success);
            }
            InputPurpose::Edit(id) => {
                let patch = TaskPatch::text(text.trim());
                let updated = match self.view {
                    Collection::Today => self.store.update_task(id, patch),
                    Collection::Backlog => self.store.update_backlog_task(id, patch),
                    Collection::Archive => self.store.update_archive_task(id, patch),
                };
                self.refresh();
                match updated {
                    Some(_) => self.show_notification("Task updated".into(), NotificationLevel::Success),
                    None => self.show_notification("Task not found".into(), NotificationLevel::Error),
                }
            }
        }
    }

    pub fn confirm(&mut self, action: ConfirmAction) {
        let message = match action {
            ConfirmAction::NewDay => {
                let cleared = self.store.clear_all_stars();
                format!("New day! {} focus task{} cleared", cleared, plural(cleared))
            }
            ConfirmAction::DeleteUnstarred => {
                let removed = self.store.delete_non_starred();
                format!("Deleted {} task{}", removed, plural(removed))
            }
            ConfirmAction::ClearBacklog => {
                self.store.clear_backlog();
                "Backlog cleared".to_string()
            }
            ConfirmAction::ClearArchive => {
                self.store.clear_archive();
                "Archive cleared".to_string()
            }
        };
        self.refresh();
        self.show_notification(message, NotificationLevel::Success);
    }

    // ------------------------------------------------------------------
    // Task actions
    // ------------------------------------------------------------------

    /// Today-only actions report where the task has to be first.
    fn require_today(&mut self) -> Option<u64> {
        if self.view != Collection::Today {
            self.show_notification(
                "Restore the task to today first (r)".into(),
                NotificationLevel::Info,
            );
            return None;
        }
        self.selected_id()
    }

    pub fn toggle_star_selected(&mut self) {
        let Some(id) = self.require_today() else {
            return;
        };
        let outcome = self.store.toggle_star(id);
        self.refresh();
        self.select_id(id);

        match outcome {
            StarOutcome::Starred => {
                self.show_notification("★ Added to today's focus".into(), NotificationLevel::Success)
            }
            StarOutcome::Unstarred => {
                self.show_notification("Moved back to tasks".into(), NotificationLevel::Info)
            }
            StarOutcome::FocusFull => self.show_notification(
                format!(
                    "Focus is full (max {} tasks)",
                    self.store.settings().max_focus_tasks
                ),
                NotificationLevel::Warning,
            ),
            StarOutcome::NotFound => {
                self.show_notification("Task not found".into(), NotificationLevel::Error)
            }
        }
    }

    pub fn complete_selected(&mut self) {
        let Some(id) = self.require_today() else {
            return;
        };
        let done = self.store.archive_task(id);
        self.refresh();
        if done.is_some() {
            self.show_notification(
                format!(
                    "✓ Task completed! Streak: {} day{}",
                    self.streak,
                    plural(self.streak as usize)
                ),
                NotificationLevel::Success,
            );
        }
    }

    pub fn backlog_selected(&mut self) {
        let Some(id) = self.require_today() else {
            return;
        };
        if self.store.move_to_backlog(id) {
            self.refresh();
            self.show_notification("Moved to backlog".into(), NotificationLevel::Info);
        }
    }

    pub fn restore_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let restored = match self.view {
            Collection::Today => {
                self.show_notification("Task is already in today".into(), NotificationLevel::Info);
                return;
            }
            Collection::Backlog => self.store.restore_from_backlog(id),
            Collection::Archive => self.store.restore_from_archive(id),
        };
        self.refresh();
        if restored {
            self.show_notification("Restored to today".into(), NotificationLevel::Success);
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(deleted) = self.store.delete_from(self.view, id) else {
            return;
        };
        self.undo.push(deleted);
        self.refresh();
        self.show_notification("Task deleted (u to undo)".into(), NotificationLevel::Info);
    }

    pub fn undo_delete(&mut self) {
        let Some(entry) = self.undo.pop() else {
            self.show_notification("Nothing to undo".into(), NotificationLevel::Info);
            return;
        };

        let origin = entry.origin;
        match self.store.restore_deleted(entry.clone()) {
            Some(task) => {
                self.refresh();
                if self.view == origin {
                    self.select_id(task.id);
                }
                self.show_notification(format!("Task restored to {}", origin), NotificationLevel::Success);
            }
            None => {
                self.undo.push(entry);
                self.show_notification("Could not restore task".into(), NotificationLevel::Error);
            }
        }
    }

    pub fn move_selected(&mut self, up: bool) {
        let Some(id) = self.require_today() else {
            return;
        };
        let outcome = if up {
            self.store.move_up(id)
        } else {
            self.store.move_down(id)
        };
        if outcome == ReorderOutcome::Moved {
            self.refresh();
            self.select_id(id);
            self.show_notification("✓ Order updated".into(), NotificationLevel::Success);
        }
    }

    /// 复制选中任务到剪贴板
    pub fn copy_selected(&mut self) {
        let Some(text) = self.selected_task().map(|t| t.text.clone()) else {
            return;
        };

        #[cfg(feature = "clipboard")]
        {
            let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
            match result {
                Ok(()) => self.show_notification("Copied to clipboard".into(), NotificationLevel::Success),
                Err(e) => {
                    tracing::warn!(error = %e, "clipboard unavailable");
                    self.show_notification(format!("Copy failed: {}", e), NotificationLevel::Error);
                }
            }
        }

        #[cfg(not(feature = "clipboard"))]
        {
            let _ = text;
            self.show_notification(
                "Clipboard support is not enabled".into(),
                NotificationLevel::Warning,
            );
        }
    }

    /// 显示通知消息
    pub fn show_notification(&mut self, message: String, level: NotificationLevel) {
        self.notification = Some(Notification {
            message,
            level,
            created_at: Instant::now(),
        });
    }

    /// 清除已过期的通知
    pub fn clear_expired_notification(&mut self) {
        if let Some(ref notification) = self.notification {
            if notification.is_expired() {
                self.notification = None;
            }
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
