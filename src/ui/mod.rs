pub mod dialogs;
mod help;
mod list;
mod statusbar;
pub mod text_input;
mod today;
mod welcome;

use crate::app::{App, Mode, Notification, NotificationLevel};
use ivyfocus::models::Collection;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// 主渲染函数
pub fn render(f: &mut Frame, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // 视图标签
            Constraint::Min(0),    // 主内容区域
            Constraint::Length(1), // 状态栏
        ])
        .split(f.area());

    statusbar::render_tabs(f, main_chunks[0], app);

    match app.view {
        Collection::Today => today::render(f, main_chunks[1], app),
        Collection::Backlog | Collection::Archive => list::render(f, main_chunks[1], app),
    }

    statusbar::render(f, main_chunks[2], app);

    // 渲染对话框（如果有）
    if let Some(dialog) = &app.dialog {
        dialogs::render_dialog(f, dialog);
    }

    // 渲染帮助面板（如果处于帮助模式）
    if app.mode == Mode::Help {
        help::render(f, f.area());
    }

    // 渲染欢迎对话框（如果是首次运行）
    if app.show_welcome_dialog {
        welcome::render(f, f.area(), app.store.settings().max_focus_tasks);
    }

    // 渲染通知栏（如果有通知）
    if let Some(ref notification) = app.notification {
        render_notification(f, f.area(), notification);
    }
}

/// 渲染通知栏
fn render_notification(f: &mut Frame, area: Rect, notification: &Notification) {
    // 通知栏占据底部 3 行，状态栏之上
    let height = 3.min(area.height);
    let notification_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(height + 1),
        width: area.width,
        height,
    };

    // 根据级别选择颜色
    let (bg_color, fg_color, prefix) = match notification.level {
        NotificationLevel::Info => (Color::Blue, Color::White, "ℹ"),
        NotificationLevel::Success => (Color::Green, Color::White, "✓"),
        NotificationLevel::Warning => (Color::Yellow, Color::Black, "⚠"),
        NotificationLevel::Error => (Color::Red, Color::White, "✗"),
    };

    let content = Line::from(vec![
        Span::styled(
            format!(" {} ", prefix),
            Style::default()
                .fg(fg_color)
                .bg(bg_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(&notification.message, Style::default().fg(fg_color)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(bg_color))
        .style(Style::default().bg(bg_color));

    let paragraph = Paragraph::new(content).block(block);

    f.render_widget(ratatui::widgets::Clear, notification_area);
    f.render_widget(paragraph, notification_area);
}

/// 渲染半透明背景遮罩
fn render_backdrop(f: &mut Frame, area: Rect) {
    let block = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    f.render_widget(block, area);
}

/// 创建一个居中的矩形区域
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ivyfocus::day::{Clock, FixedClock};
    use ivyfocus::storage::{KeyValueStore, MemoryStore};
    use ivyfocus::store::TaskStore;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        let storage: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        let clock: Box<dyn Clock> = Box::new(FixedClock::at_day(2025, 12, 8));
        let mut app = App::new(TaskStore::new(storage, clock), &Config::default());
        app.dismiss_welcome();
        app
    }

    #[test]
    fn test_today_view_shows_both_panels() {
        let mut app = app();
        app.store.add_task("Write report");
        app.refresh();

        let text = screen(&app);
        assert!(text.contains("Focus (0/6)"));
        assert!(text.contains("Tasks (1)"));
        assert!(text.contains("Write report"));
    }

    #[test]
    fn test_backlog_view_title() {
        let mut app = app();
        app.switch_view(Collection::Backlog);
        let text = screen(&app);
        assert!(text.contains("Backlog (0)"));
    }

    #[test]
    fn test_welcome_overlay_on_first_run() {
        let storage: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        let clock: Box<dyn Clock> = Box::new(FixedClock::at_day(2025, 12, 8));
        let app = App::new(TaskStore::new(storage, clock), &Config::default());
        assert!(screen(&app).contains("Welcome to IvyFocus"));
    }
}
