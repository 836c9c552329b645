use super::list::render_panel;
use crate::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

/// 渲染 Today 视图：上方 Focus 面板，下方其余任务
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let max_focus = app.store.settings().max_focus_tasks;
    let focus_len = app.focus_len();
    let (focus, others) = app.tasks.split_at(focus_len);

    // Focus 面板按上限留出高度，避免加星时布局跳动
    let focus_height = (max_focus.max(1) as u16).saturating_add(2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(focus_height), Constraint::Min(3)])
        .split(area);

    let (focus_selected, others_selected) = if app.selected < focus_len {
        (Some(app.selected), None)
    } else if others.is_empty() {
        (None, None)
    } else {
        (None, Some(app.selected - focus_len))
    };

    let focus_title = format!("Focus ({}/{})", app.store.focus_count(), max_focus);
    let focus_hint = format!("Star up to {} tasks to focus on today (s)", max_focus);
    render_panel(
        f,
        chunks[0],
        &focus_title,
        focus,
        focus_selected,
        |_| None,
        &focus_hint,
    );

    let others_title = format!("Tasks ({})", others.len());
    render_panel(
        f,
        chunks[1],
        &others_title,
        others,
        others_selected,
        |_| None,
        "No tasks yet. Press a to add one.",
    );
}
