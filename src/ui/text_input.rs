use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
};
use tui_textarea::{CursorMove, TextArea};

/// 输入动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// 继续编辑
    Continue,
    /// 提交内容
    Submit,
    /// 取消对话框
    Cancel,
}

/// Single-line task text input.
///
/// Keys are mapped by hand onto the textarea so that the crossterm event type
/// used by the app never has to match the one tui-textarea was built against.
pub struct TaskInput {
    textarea: TextArea<'static>,
}

impl TaskInput {
    pub fn new(initial_value: &str) -> Self {
        let mut textarea = TextArea::new(vec![initial_value.to_string()]);
        textarea.move_cursor(CursorMove::End);

        // Nord 配色
        textarea.set_style(
            Style::default()
                .fg(Color::Rgb(236, 239, 244))
                .bg(Color::Rgb(46, 52, 64)),
        );
        textarea.set_cursor_style(
            Style::default()
                .bg(Color::Rgb(136, 192, 208))
                .fg(Color::Rgb(46, 52, 64)),
        );
        textarea.set_cursor_line_style(Style::default());
        textarea.set_placeholder_text("Type a task and press Enter");

        Self { textarea }
    }

    pub fn content(&self) -> String {
        self.textarea.lines().join(" ")
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Enter => return InputAction::Submit,
            KeyCode::Esc => return InputAction::Cancel,
            KeyCode::Char('c') if ctrl => return InputAction::Cancel,
            KeyCode::Char('u') if ctrl => {
                self.textarea.delete_line_by_head();
            }
            KeyCode::Char('a') if ctrl => self.textarea.move_cursor(CursorMove::Head),
            KeyCode::Char('e') if ctrl => self.textarea.move_cursor(CursorMove::End),
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => self.textarea.insert_char(c),
            KeyCode::Backspace => {
                self.textarea.delete_char();
            }
            KeyCode::Delete => {
                self.textarea.delete_next_char();
            }
            KeyCode::Left => self.textarea.move_cursor(CursorMove::Back),
            KeyCode::Right => self.textarea.move_cursor(CursorMove::Forward),
            KeyCode::Home => self.textarea.move_cursor(CursorMove::Head),
            KeyCode::End => self.textarea.move_cursor(CursorMove::End),
            _ => {}
        }
        InputAction::Continue
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        f.render_widget(&self.textarea, area);
    }
}
