use crate::app::App;
use chrono::{DateTime, Local, Utc};
use ivyfocus::models::{Collection, Task};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

/// 渲染 Backlog / Archive 视图
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let (title, empty) = match app.view {
        Collection::Backlog => ("Backlog", "Backlog is empty. Press b on a task to park it here."),
        _ => ("Archive", "Nothing completed yet."),
    };
    let title = format!("{} ({})", title, app.tasks.len());

    let detail = |task: &Task| match app.view {
        Collection::Backlog => task.moved_to_backlog_at.map(|at| format!("moved {}", short_date(at))),
        _ => task.archived_at.map(|at| format!("done {}", short_date(at))),
    };

    render_panel(
        f,
        area,
        &title,
        &app.tasks,
        Some(app.selected),
        detail,
        empty,
    );
}

/// 渲染一个任务面板，`selected` 是面板内的索引
pub(super) fn render_panel(
    f: &mut Frame,
    area: Rect,
    title: &str,
    tasks: &[Task],
    selected: Option<usize>,
    detail: impl Fn(&Task) -> Option<String>,
    empty_message: &str,
) {
    let (border_color, title_style) = if selected.is_some() {
        (Color::White, Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
    } else {
        (Color::DarkGray, Style::default().fg(Color::Gray))
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .title_alignment(Alignment::Left)
        .title_style(title_style)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .border_type(ratatui::widgets::BorderType::Rounded);

    if tasks.is_empty() {
        let paragraph = Paragraph::new(empty_message)
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| task_item(task, selected == Some(i), detail(task)))
        .collect();

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(selected);
    f.render_stateful_widget(list, area, &mut state);
}

fn task_item(task: &Task, is_selected: bool, detail: Option<String>) -> ListItem<'_> {
    // 只有选中的任务高亮
    let style = if is_selected {
        Style::default()
            .bg(Color::Rgb(41, 98, 218))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let selection_indicator = if is_selected {
        Span::styled("▶ ", Style::default().fg(Color::White))
    } else {
        Span::raw("  ")
    };

    let star = if task.starred {
        Span::styled("★ ", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("  ")
    };

    let mut spans = vec![Span::raw(" "), selection_indicator, star, Span::raw(task.text.as_str())];
    if let Some(detail) = detail {
        spans.push(Span::styled(
            format!("  {}", detail),
            Style::default().fg(Color::DarkGray),
        ));
    }

    ListItem::new(Line::from(spans)).style(style)
}

fn short_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%b %d").to_string()
}
