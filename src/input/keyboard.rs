use crate::app::{App, Mode};
use crate::input::Command;
use crate::ui::dialogs::DialogType;
use crate::ui::text_input::InputAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ivyfocus::models::Collection;

/// 处理键盘输入
/// 返回 false 表示应该退出应用
pub fn handle_key_input(app: &mut App, key: KeyEvent) -> bool {
    // Windows 上会同时收到按下和释放事件
    if key.kind == KeyEventKind::Release {
        return true;
    }

    // 如果显示欢迎对话框，任意按键都关闭它
    if app.show_welcome_dialog {
        app.dismiss_welcome();
        return true;
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Dialog => handle_dialog_mode(app, key),
        Mode::Help => handle_help_mode(app, key),
    }
}

/// 处理正常模式的按键
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> bool {
    let Some(cmd) = match_key(key) else {
        return true;
    };

    if cmd == Command::Quit {
        return false;
    }

    execute_command(app, cmd);
    true
}

/// 处理对话框模式的按键
fn handle_dialog_mode(app: &mut App, key: KeyEvent) -> bool {
    let Some(dialog) = app.dialog.as_mut() else {
        app.mode = Mode::Normal;
        return true;
    };

    match dialog {
        DialogType::Input { input, purpose, .. } => match input.handle_key(key) {
            InputAction::Continue => {}
            InputAction::Submit => {
                let text = input.content();
                let purpose = *purpose;
                app.close_dialog();
                app.submit_input(purpose, &text);
            }
            InputAction::Cancel => app.close_dialog(),
        },
        DialogType::Confirm {
            yes_selected,
            action,
            ..
        } => match key.code {
            KeyCode::Esc | KeyCode::Char('n') => app.close_dialog(),
            KeyCode::Char('y') => {
                let action = *action;
                app.close_dialog();
                app.confirm(action);
            }
            KeyCode::Enter => {
                let (confirmed, action) = (*yes_selected, *action);
                app.close_dialog();
                if confirmed {
                    app.confirm(action);
                }
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                *yes_selected = !*yes_selected;
            }
            _ => {}
        },
    }
    true
}

/// 处理帮助模式的按键
fn handle_help_mode(app: &mut App, key: KeyEvent) -> bool {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
        app.mode = Mode::Normal;
    }
    true
}

/// 将按键映射为命令
pub fn match_key(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    // Shift 组合键以大写字符到达，不单独匹配修饰键
    match key.code {
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char('?') => Some(Command::ShowHelp),

        KeyCode::Char('j') | KeyCode::Down => Some(Command::TaskDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Command::TaskUp),
        KeyCode::Tab => Some(Command::NextView),
        KeyCode::Char('1') => Some(Command::ShowView(Collection::Today)),
        KeyCode::Char('2') => Some(Command::ShowView(Collection::Backlog)),
        KeyCode::Char('3') => Some(Command::ShowView(Collection::Archive)),

        KeyCode::Char('a') => Some(Command::NewTask),
        KeyCode::Char('e') => Some(Command::EditTask),
        KeyCode::Char('s') => Some(Command::ToggleStar),
        KeyCode::Char('d') | KeyCode::Enter => Some(Command::CompleteTask),
        KeyCode::Char('b') => Some(Command::MoveToBacklog),
        KeyCode::Char('r') => Some(Command::RestoreTask),
        KeyCode::Char('x') | KeyCode::Delete => Some(Command::DeleteTask),
        KeyCode::Char('u') => Some(Command::Undo),
        KeyCode::Char('J') => Some(Command::MoveTaskDown),
        KeyCode::Char('K') => Some(Command::MoveTaskUp),
        KeyCode::Char('y') => Some(Command::CopyTask),

        KeyCode::Char('N') => Some(Command::NewDay),
        KeyCode::Char('C') => Some(Command::ClearList),
        _ => None,
    }
}

/// 执行命令
fn execute_command(app: &mut App, cmd: Command) {
    match cmd {
        Command::Quit => {}
        Command::ShowHelp => app.mode = Mode::Help,
        Command::TaskDown => app.select_next(),
        Command::TaskUp => app.select_prev(),
        Command::NextView => app.next_view(),
        Command::ShowView(view) => app.switch_view(view),
        Command::NewTask => app.open_add_dialog(),
        Command::EditTask => app.open_edit_dialog(),
        Command::ToggleStar => app.toggle_star_selected(),
        Command::CompleteTask => app.complete_selected(),
        Command::MoveToBacklog => app.backlog_selected(),
        Command::RestoreTask => app.restore_selected(),
        Command::DeleteTask => app.delete_selected(),
        Command::Undo => app.undo_delete(),
        Command::MoveTaskUp => app.move_selected(true),
        Command::MoveTaskDown => app.move_selected(false),
        Command::CopyTask => app.copy_selected(),
        Command::NewDay => app.request_new_day(),
        Command::ClearList => app.request_clear(),
    }
}
