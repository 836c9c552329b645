pub mod settings;
pub mod streak;
pub mod task;

pub use settings::Settings;
pub use streak::{DailyProgress, StreakData};
pub use task::{Collection, Task, TaskPatch, TaskStatus};
