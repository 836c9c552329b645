use ivyfocus::models::Collection;

/// 应用命令枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    ShowHelp,

    // ===== 导航 =====
    /// 选择下一个任务
    TaskDown,
    /// 选择上一个任务
    TaskUp,
    /// 切换到下一个视图
    NextView,
    /// 切换到指定视图
    ShowView(Collection),

    // ===== 任务操作 =====
    NewTask,
    EditTask,
    /// 加星 / 取消加星
    ToggleStar,
    /// 完成任务（移到归档）
    CompleteTask,
    MoveToBacklog,
    /// 从 Backlog / Archive 恢复到今天
    RestoreTask,
    DeleteTask,
    /// 撤销最近一次删除
    Undo,
    /// 任务在分区内上移
    MoveTaskUp,
    /// 任务在分区内下移
    MoveTaskDown,
    /// 复制任务到剪贴板
    CopyTask,

    // ===== 批量操作（需确认）=====
    NewDay,
    ClearList,
}
