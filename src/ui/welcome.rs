use super::{centered_rect, render_backdrop};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// 渲染首次运行欢迎对话框
pub fn render(f: &mut Frame, area: Rect, max_focus: usize) {
    render_backdrop(f, area);

    let popup_area = centered_rect(70, 60, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Welcome to IvyFocus ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Black));

    f.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let key = Style::default().fg(Color::Yellow);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "One short list. Done in order.",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("How it works", heading)),
        Line::from(""),
        Line::from(format!(
            "1. Write down everything you could do today, then star the {} that matter most.",
            max_focus
        )),
        Line::from("2. Work through your focus list from the top. Finish one before starting the next."),
        Line::from("3. Park what can wait in the backlog. Finished tasks go to the archive."),
        Line::from("4. Complete at least one task a day to keep your streak going."),
        Line::from(""),
        Line::from(Span::styled("Keys to start with", heading)),
        Line::from(""),
        Line::from(vec![Span::styled("  a", key), Span::raw("   add a task")]),
        Line::from(vec![Span::styled("  s", key), Span::raw("   star it for today")]),
        Line::from(vec![Span::styled("  d", key), Span::raw("   mark it done")]),
        Line::from(vec![Span::styled("  ?", key), Span::raw("   all shortcuts")]),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to start",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, inner);
}
