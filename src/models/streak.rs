use serde::{Deserialize, Serialize};

use crate::day::Day;

/// Persisted completion streak.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakData {
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub last_streak_date: Option<Day>,
    #[serde(default)]
    pub last_completion_date: Option<Day>,
    /// Number of days with at least one completion.
    #[serde(default)]
    pub total_completed: u32,
}

impl StreakData {
    /// Record a completion on `today`. Returns false if today was already counted.
    pub fn record_completion(&mut self, today: Day) -> bool {
        if self.last_completion_date == Some(today) {
            return false;
        }
        self.last_completion_date = Some(today);

        // 昨天有完成记录则连续，否则从 1 重新开始
        if self.last_streak_date == Some(today.yesterday()) || self.current_streak == 0 {
            self.current_streak += 1;
            self.last_streak_date = Some(today);
        } else if self.last_streak_date != Some(today) {
            self.current_streak = 1;
            self.last_streak_date = Some(today);
        }

        self.total_completed += 1;
        true
    }

    /// The streak as shown to the user: a streak whose last day is older
    /// than yesterday has lapsed.
    pub fn effective(&self, today: Day) -> u32 {
        match self.last_streak_date {
            Some(last) if last == today || last == today.yesterday() => self.current_streak,
            _ => 0,
        }
    }
}

/// Tasks archived today against the daily target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyProgress {
    pub completed_today: usize,
    pub target: usize,
}

impl DailyProgress {
    pub fn percent(&self) -> u16 {
        if self.target == 0 {
            return 100;
        }
        let pct = self.completed_today * 100 / self.target;
        pct.min(100) as u16
    }

    pub fn message(&self) -> String {
        if self.completed_today == 0 {
            "No tasks completed yet - let's get started!".to_string()
        } else if self.completed_today >= self.target {
            format!("{} tasks completed - amazing work!", self.completed_today)
        } else {
            format!("{} of {} tasks completed today", self.completed_today, self.target)
        }
    }
}
