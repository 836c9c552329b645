use super::{centered_rect, render_backdrop};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const NAVIGATION: &[(&str, &str)] = &[
    ("j, ↓", "Next task"),
    ("k, ↑", "Previous task"),
    ("Tab", "Next view"),
    ("1 2 3", "Today / Backlog / Archive"),
    ("?", "Toggle this help"),
    ("q", "Quit"),
];

const TASKS: &[(&str, &str)] = &[
    ("a", "Add a task"),
    ("e", "Edit selected task"),
    ("s", "Star / unstar (focus)"),
    ("d, Enter", "Complete task"),
    ("b", "Move to backlog"),
    ("r", "Restore to today"),
    ("x", "Delete task"),
    ("u", "Undo last delete"),
    ("J / K", "Move down / up"),
    ("y", "Copy task text"),
];

const DAY: &[(&str, &str)] = &[
    ("N", "New day: clear all stars"),
    ("C", "Clear the current list"),
];

/// 渲染帮助面板
pub fn render(f: &mut Frame, area: Rect) {
    render_backdrop(f, area);

    let popup_area = centered_rect(70, 70, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keyboard shortcuts (Esc or ? to close) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Black));

    f.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let mut left = section("Navigation", NAVIGATION);
    left.push(Line::from(""));
    left.extend(section("Day", DAY));
    left.push(Line::from(""));
    left.push(Line::from(Span::styled(
        "Star up to your focus limit, then work top-down.",
        Style::default().fg(Color::DarkGray),
    )));

    let left_widget = Paragraph::new(left)
        .block(Block::default().borders(Borders::RIGHT))
        .wrap(Wrap { trim: false });
    let right_widget = Paragraph::new(section("Tasks", TASKS)).wrap(Wrap { trim: false });

    f.render_widget(left_widget, columns[0]);
    f.render_widget(right_widget, columns[1]);
}

fn section(title: &str, keys: &[(&'static str, &'static str)]) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(keys.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::styled(format!(" {:<10}", key), Style::default().fg(Color::Cyan)),
            Span::raw(*desc),
        ])
    }));
    lines
}
