use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;

mod app;
mod cli;
mod config;
mod input;
mod logging;
mod ui;

use app::{App, Store};
use config::Config;
use ivyfocus::day::{Clock, SystemClock};
use ivyfocus::storage::{FileStore, KeyValueStore};
use ivyfocus::store::TaskStore;

fn main() -> Result<()> {
    let config = config::load_config()?;
    let _log_guard = logging::init_logging(&config.resolve_data_dir(), &config.log_level);

    // 处理 CLI 命令
    let should_run_tui = cli::handle_cli(&config)?;

    // 如果 CLI 命令已处理，直接退出
    if !should_run_tui {
        return Ok(());
    }

    // 先打开存储，失败时终端还未进入 raw 模式
    let store = open_store(&config)?;
    let mut app = App::new(store, &config);

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 运行应用
    let res = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "tui exited with an error");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Open the task store in the configured data directory.
pub fn open_store(config: &Config) -> Result<Store> {
    let data_dir = config.resolve_data_dir();
    let storage: Box<dyn KeyValueStore> = Box::new(FileStore::open(&data_dir)?);
    let clock: Box<dyn Clock> = Box::new(SystemClock);
    tracing::debug!(data_dir = %data_dir.display(), "store opened");
    Ok(TaskStore::new(storage, clock))
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.clear_expired_notification();
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if !input::handle_key_input(app, key) {
                    return Ok(()); // 退出应用
                }
            }
        }
    }
}
