use anyhow::Result;
use std::env;
use std::path::PathBuf;

use crate::config::Config;
use ivyfocus::day::Clock;
use ivyfocus::export::{ImportData, export_file_name};
use ivyfocus::models::{Collection, Settings, Task, TaskPatch};
use ivyfocus::storage::KeyValueStore;
use ivyfocus::store::{ReorderOutcome, StarOutcome, TaskStore};

/// 处理 CLI 命令
/// 返回 true 表示应该继续进入 TUI，false 表示已处理完毕应该退出
pub fn handle_cli(config: &Config) -> Result<bool> {
    let args: Vec<String> = env::args().collect();

    // 如果没有参数，进入 TUI 模式
    if args.len() < 2 {
        return Ok(true);
    }

    match args[1].as_str() {
        "--help" | "-h" | "help" => {
            print_help();
            Ok(false)
        }
        "--version" | "-V" | "-v" => {
            print_version();
            Ok(false)
        }
        "config" => {
            if let Err(e) = handle_config_command(config, &args[1..]) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            Ok(false)
        }
        _ => {
            let mut store = crate::open_store(config)?;
            let cleared = store.auto_reset_focus();
            if cleared > 0 {
                println!("New day! {} focus task{} cleared", cleared, plural(cleared));
            }
            if let Err(e) = run_command(&mut store, &args[1..]) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            Ok(false)
        }
    }
}

/// Run one store command. `args[0]` is the command name.
pub fn run_command<S: KeyValueStore, C: Clock>(
    store: &mut TaskStore<S, C>,
    args: &[String],
) -> Result<(), String> {
    match args[0].as_str() {
        "add" => {
            if args.len() < 2 {
                return Err("Missing task text\nUsage: ivy add <text>".to_string());
            }
            let task = store
                .add_task(&args[1..].join(" "))
                .ok_or("Task text cannot be empty".to_string())?;
            println!("Added task #{}: {}", task.id, task.text);
            Ok(())
        }
        "list" | "ls" => {
            let which = args.get(1).map(String::as_str).unwrap_or("today");
            list(store, which)
        }
        "edit" => {
            if args.len() < 3 {
                return Err("Missing arguments\nUsage: ivy edit <id> <text>".to_string());
            }
            let id = parse_id(&args[1])?;
            edit(store, id, &args[2..].join(" "))
        }
        "star" => {
            let id = parse_id(required(args, 1, "ivy star <id>")?)?;
            match store.toggle_star(id) {
                StarOutcome::Starred => println!("Added #{} to today's focus", id),
                StarOutcome::Unstarred => println!("Moved #{} back to tasks", id),
                StarOutcome::FocusFull => {
                    return Err(format!(
                        "Focus is full (max {} tasks)",
                        store.settings().max_focus_tasks
                    ));
                }
                StarOutcome::NotFound => return Err(not_found(id)),
            }
            Ok(())
        }
        "done" => {
            let id = parse_id(required(args, 1, "ivy done <id>")?)?;
            let task = store.archive_task(id).ok_or_else(|| not_found(id))?;
            println!("✓ Task completed: {}", task.text);
            println!("Streak: {} day{}", store.effective_streak(), plural(store.effective_streak() as usize));
            Ok(())
        }
        "later" | "backlog" => {
            let id = parse_id(required(args, 1, "ivy later <id>")?)?;
            if !store.move_to_backlog(id) {
                return Err(not_found(id));
            }
            println!("Moved #{} to backlog", id);
            Ok(())
        }
        "restore" => {
            let id = parse_id(required(args, 1, "ivy restore <id>")?)?;
            let from = store.restore(id).ok_or_else(|| not_found(id))?;
            println!("Restored #{} from {} to today", id, from);
            Ok(())
        }
        "delete" | "rm" => {
            let id = parse_id(required(args, 1, "ivy delete <id>")?)?;
            delete(store, id)
        }
        "reorder" => {
            if args.len() < 3 {
                return Err("Missing arguments\nUsage: ivy reorder <id> <target-id>".to_string());
            }
            let moving = parse_id(&args[1])?;
            let target = parse_id(&args[2])?;
            report_reorder(store.reorder(moving, target))
        }
        "up" => {
            let id = parse_id(required(args, 1, "ivy up <id>")?)?;
            report_reorder(store.move_up(id))
        }
        "down" => {
            let id = parse_id(required(args, 1, "ivy down <id>")?)?;
            report_reorder(store.move_down(id))
        }
        "new-day" => {
            let cleared = store.clear_all_stars();
            println!("New day! {} focus task{} cleared", cleared, plural(cleared));
            Ok(())
        }
        "clear" => {
            let what = required(args, 1, "ivy clear <backlog|archive|unstarred>")?;
            match what {
                "backlog" => {
                    store.clear_backlog();
                    println!("Backlog cleared");
                }
                "archive" => {
                    store.clear_archive();
                    println!("Archive cleared");
                }
                "unstarred" => {
                    let removed = store.delete_non_starred();
                    println!("Deleted {} non-starred task{}", removed, plural(removed));
                }
                other => return Err(format!("Unknown list: {}", other)),
            }
            Ok(())
        }
        "stats" => {
            print_stats(store);
            Ok(())
        }
        "export" => {
            let data = store.export_data();
            let path = args
                .get(1)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(export_file_name(data.exported_at)));
            let json = serde_json::to_string_pretty(&data).map_err(|e| e.to_string())?;
            std::fs::write(&path, json).map_err(|e| e.to_string())?;
            println!("✓ Data exported to {}", path.display());
            Ok(())
        }
        "import" => {
            let path = required(args, 1, "ivy import <path>")?;
            let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
            let data: ImportData = serde_json::from_str(&content).map_err(|e| e.to_string())?;
            if data.tasks.is_none() && data.archive.is_none() {
                return Err("Nothing to import: no 'tasks' or 'archive' found".to_string());
            }
            let summary = store.import_data(data);
            if let Some(n) = summary.tasks {
                println!("Imported {} task{}", n, plural(n));
            }
            if let Some(n) = summary.archive {
                println!("Imported {} archived task{}", n, plural(n));
            }
            Ok(())
        }
        "settings" => handle_settings_command(store, &args[1..]),
        cmd => Err(format!("Unknown command: {}\nRun 'ivy --help' for usage", cmd)),
    }
}

fn required<'a>(args: &'a [String], index: usize, usage: &str) -> Result<&'a str, String> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing arguments\nUsage: {}", usage))
}

fn parse_id(raw: &str) -> Result<u64, String> {
    raw.trim_start_matches('#')
        .parse()
        .map_err(|_| "Invalid task ID (must be a number)".to_string())
}

fn not_found(id: u64) -> String {
    format!("Task {} not found", id)
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn edit<S: KeyValueStore, C: Clock>(
    store: &mut TaskStore<S, C>,
    id: u64,
    text: &str,
) -> Result<(), String> {
    if text.trim().is_empty() {
        return Err("Task text cannot be empty".to_string());
    }
    let patch = TaskPatch::text(text);
    let updated = store
        .update_task(id, patch.clone())
        .or_else(|| store.update_backlog_task(id, patch.clone()))
        .or_else(|| store.update_archive_task(id, patch))
        .ok_or_else(|| not_found(id))?;
    println!("Updated task #{}: {}", updated.id, updated.text);
    Ok(())
}

fn delete<S: KeyValueStore, C: Clock>(store: &mut TaskStore<S, C>, id: u64) -> Result<(), String> {
    for collection in [Collection::Today, Collection::Backlog, Collection::Archive] {
        if let Some(deleted) = store.delete_from(collection, id) {
            println!("Deleted task #{} from {}", id, deleted.origin);
            return Ok(());
        }
    }
    Err(not_found(id))
}

fn report_reorder(outcome: ReorderOutcome) -> Result<(), String> {
    match outcome {
        ReorderOutcome::Moved => {
            println!("✓ Order updated");
            Ok(())
        }
        ReorderOutcome::Unchanged => {
            println!("Order unchanged");
            Ok(())
        }
        ReorderOutcome::CrossPartition => {
            Err("Tasks must both be in focus or both outside it".to_string())
        }
        ReorderOutcome::NotFound => Err("Task not found".to_string()),
    }
}

fn list<S: KeyValueStore, C: Clock>(store: &TaskStore<S, C>, which: &str) -> Result<(), String> {
    match which {
        "today" => {
            print_focus(store);
            println!();
            print_section(&format!("Tasks ({})", store.other_tasks().len()), &store.other_tasks());
        }
        "focus" => print_focus(store),
        "backlog" => print_section(&format!("Backlog ({})", store.backlog().len()), &store.backlog()),
        "archive" => print_section(&format!("Archive ({})", store.archive().len()), &store.archive()),
        "all" => {
            for which in ["today", "backlog", "archive"] {
                list(store, which)?;
                println!();
            }
        }
        other => {
            return Err(format!(
                "Unknown list: {}\nUsage: ivy list [today|focus|backlog|archive|all]",
                other
            ));
        }
    }
    Ok(())
}

fn print_focus<S: KeyValueStore, C: Clock>(store: &TaskStore<S, C>) {
    let focus = store.focus_tasks();
    let title = format!("Focus ({}/{})", focus.len(), store.settings().max_focus_tasks);
    print_section(&title, &focus);
}

fn print_section(title: &str, tasks: &[Task]) {
    println!("{}", title);
    if tasks.is_empty() {
        println!("  (none)");
        return;
    }

    println!("ID             ★  TEXT");
    println!("-------------  -  ----------------------------------------");
    for task in tasks {
        println!(
            "{:<13}  {}  {}",
            task.id,
            if task.starred { "★" } else { " " },
            truncate(&task.text, 60)
        );
    }
}

fn print_stats<S: KeyValueStore, C: Clock>(store: &TaskStore<S, C>) {
    let streak = store.streak();
    let progress = store.daily_progress();
    println!("Today:          {}", store.today_date());
    println!("Streak:         {} day{}", store.effective_streak(), plural(store.effective_streak() as usize));
    println!("Active days:    {}", streak.total_completed);
    println!("Progress:       {}% ({})", progress.percent(), progress.message());
    println!("Focus:          {}/{}", store.focus_count(), store.settings().max_focus_tasks);
    println!("Backlog:        {}", store.backlog().len());
    println!("Archive:        {}", store.archive().len());
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len - 3).collect::<String>())
    }
}

// ============================================================================
// Settings & Config Commands
// ============================================================================

fn handle_settings_command<S: KeyValueStore, C: Clock>(
    store: &mut TaskStore<S, C>,
    args: &[String],
) -> Result<(), String> {
    let current = store.settings();
    match args.get(1).map(String::as_str) {
        None | Some("show") => {
            println!("Settings:");
            println!("  max-focus:   {}", current.max_focus_tasks);
            println!("  auto-reset:  {}", if current.auto_reset_focus { "on" } else { "off" });
            Ok(())
        }
        Some("max-focus") => {
            let raw = required(args, 2, "ivy settings max-focus <n>")?;
            let max: usize = raw
                .parse()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or("max-focus must be a number >= 1".to_string())?;
            store.save_settings(Settings {
                max_focus_tasks: max,
                ..current
            });
            println!("✓ Settings saved: max-focus = {}", max);
            Ok(())
        }
        Some("auto-reset") => {
            let raw = required(args, 2, "ivy settings auto-reset <on|off>")?;
            let enabled = match raw {
                "on" | "true" | "yes" => true,
                "off" | "false" | "no" => false,
                other => return Err(format!("Expected on/off, got: {}", other)),
            };
            store.save_settings(Settings {
                auto_reset_focus: enabled,
                ..current
            });
            println!("✓ Settings saved: auto-reset = {}", raw);
            Ok(())
        }
        Some(cmd) => Err(format!("Unknown settings option: {}\nAvailable: show, max-focus, auto-reset", cmd)),
    }
}

fn handle_config_command(config: &Config, args: &[String]) -> Result<(), String> {
    match args.get(1).map(String::as_str) {
        None | Some("show") => {
            crate::config::show_config(config);
            Ok(())
        }
        Some("data-dir") => {
            let dir = required(args, 2, "ivy config data-dir <path>")?;
            crate::config::set_data_dir(PathBuf::from(dir)).map_err(|e| e.to_string())
        }
        Some("undo-limit") => {
            let raw = required(args, 2, "ivy config undo-limit <n>")?;
            let limit: usize = raw.parse().map_err(|_| "undo-limit must be a number".to_string())?;
            crate::config::set_undo_limit(limit).map_err(|e| e.to_string())
        }
        Some(cmd) => Err(format!("Unknown config option: {}\nAvailable: show, data-dir, undo-limit", cmd)),
    }
}

/// 打印帮助信息
fn print_help() {
    println!("IvyFocus (ivy) - daily focus planner for the terminal\n");
    println!("USAGE:");
    println!("    ivy                         Start the TUI");
    println!("    ivy <COMMAND> [ARGS]        Run a single command\n");

    println!("TASKS:");
    println!("    add <text>                  Add a task to today's list");
    println!("    list [today|focus|backlog|archive|all]");
    println!("                                List tasks (default: today)");
    println!("    edit <id> <text>            Change a task's text");
    println!("    star <id>                   Toggle a task in/out of today's focus");
    println!("    done <id>                   Complete a task (moves it to the archive)");
    println!("    later <id>                  Move a task to the backlog");
    println!("    restore <id>                Bring a task back from backlog or archive");
    println!("    delete <id>                 Delete a task");
    println!("    reorder <id> <target-id>    Move a task to another task's position");
    println!("    up <id> / down <id>         Move a task one place up or down\n");

    println!("DAY:");
    println!("    new-day                     Clear every focus star");
    println!("    clear <backlog|archive|unstarred>");
    println!("    stats                       Show streak and today's progress\n");

    println!("DATA:");
    println!("    export [path]               Export tasks and archive as JSON");
    println!("    import <path>               Import a previous export");
    println!("    settings [show|max-focus <n>|auto-reset <on|off>]");
    println!("    config [show|data-dir <path>|undo-limit <n>]\n");

    println!("EXAMPLES:");
    println!("    ivy add \"Write the quarterly report\"");
    println!("    ivy star 1733650200000");
    println!("    ivy done 1733650200000");
    println!("    ivy settings max-focus 4");
}

/// 打印版本信息
fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const NAME: &str = env!("CARGO_PKG_NAME");
    println!("{} {}", NAME, VERSION);
}
