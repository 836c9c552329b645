use super::{STREAK_KEY, TaskStore};
use crate::day::Clock;
use crate::models::{Collection, DailyProgress, StreakData};
use crate::storage::KeyValueStore;

impl<S: KeyValueStore, C: Clock> TaskStore<S, C> {
    pub fn streak(&self) -> StreakData {
        self.load_json(STREAK_KEY)
    }

    /// The streak to display: 0 once a day has been skipped.
    pub fn effective_streak(&self) -> u32 {
        self.streak().effective(self.today_date())
    }

    /// Count today's completion toward the streak. Only the first completion
    /// of a calendar day changes anything.
    pub(crate) fn update_streak(&mut self) {
        let today = self.today_date();
        let mut streak = self.streak();
        if streak.record_completion(today) {
            tracing::info!(current = streak.current_streak, %today, "streak updated");
            self.save_json(STREAK_KEY, &streak);
        }
    }

    /// Archive entries whose archive time falls on today, against the focus cap.
    pub fn daily_progress(&self) -> DailyProgress {
        let today = self.today_date();
        let completed_today = self
            .load(Collection::Archive)
            .iter()
            .filter_map(|t| t.archived_at)
            // 用时钟所在时区的日期比较
            .filter(|at| self.clock().day_of(*at) == today)
            .count();
        DailyProgress {
            completed_today,
            target: self.settings().max_focus_tasks,
        }
    }
}
