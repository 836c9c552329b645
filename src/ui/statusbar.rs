use crate::app::{App, Mode};
use ivyfocus::models::Collection;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
};

/// 渲染顶部视图标签
pub fn render_tabs(f: &mut Frame, area: Rect, app: &App) {
    let views = [Collection::Today, Collection::Backlog, Collection::Archive];
    let titles: Vec<Line> = views
        .iter()
        .enumerate()
        .map(|(i, view)| {
            let label = match view {
                Collection::Today => "Today",
                Collection::Backlog => "Backlog",
                Collection::Archive => "Archive",
            };
            Line::from(format!("{} {}", i + 1, label))
        })
        .collect();
    let selected = views.iter().position(|v| *v == app.view).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider("│");

    f.render_widget(tabs, area);
}

/// 渲染状态栏（模式、连续天数、今日进度）
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mode_text = match app.mode {
        Mode::Normal => ("NORMAL", Color::Green),
        Mode::Dialog => ("INPUT", Color::Magenta),
        Mode::Help => ("HELP", Color::Blue),
    };

    let streak = if app.streak > 0 {
        format!(" 🔥 {} day streak ", app.streak)
    } else {
        " No streak yet ".to_string()
    };

    let progress = format!(
        " {}% {} ",
        app.progress.percent(),
        app.progress.message()
    );

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode_text.0),
            Style::default()
                .fg(Color::Black)
                .bg(mode_text.1)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(streak, Style::default().fg(Color::Yellow)),
        Span::raw("|"),
        Span::styled(progress, Style::default().fg(Color::Green)),
        Span::raw("|"),
        Span::styled(
            format!(" {} ", app.store.today_date()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(" ? help  q quit ", Style::default().fg(Color::DarkGray)),
    ]);

    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));

    f.render_widget(paragraph, area);
}
