//! Application configuration (where data lives, logging, undo depth).
//!
//! Store settings such as the focus cap are not kept here: they live in the
//! data directory next to the task lists.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use ivyfocus::undo::DEFAULT_UNDO_LIMIT;

/// Overrides `data_dir` from the config file.
pub const DATA_DIR_ENV: &str = "IVYFOCUS_DATA_DIR";

const APP_DIR: &str = "ivyfocus";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory override
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// How many deletions can be undone in one session
    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,
    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_undo_limit() -> usize {
    DEFAULT_UNDO_LIMIT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            undo_limit: default_undo_limit(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Resolve the data directory: environment, then config file, then the
    /// platform data directory.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        default_data_dir()
    }
}

/// 获取配置文件路径
/// Linux: ~/.config/ivyfocus/config.toml
/// macOS: ~/Library/Application Support/ivyfocus/config.toml
/// Windows: %APPDATA%\ivyfocus\config.toml
pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// 加载配置
pub fn load_config() -> Result<Config> {
    let config_path = get_config_path();

    if !config_path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(config_path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}

/// 保存配置
pub fn save_config(config: &Config) -> Result<()> {
    let config_path = get_config_path();

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(config_path, content)?;

    Ok(())
}

/// 更新数据目录
pub fn set_data_dir(dir: PathBuf) -> Result<()> {
    let mut config = load_config()?;
    config.data_dir = Some(dir);
    save_config(&config)?;
    println!("✓ Data directory set to: {}", config.resolve_data_dir().display());
    Ok(())
}

/// 更新撤销深度
pub fn set_undo_limit(limit: usize) -> Result<()> {
    let mut config = load_config()?;
    config.undo_limit = limit.max(1);
    save_config(&config)?;
    println!("✓ Undo limit set to: {}", config.undo_limit);
    Ok(())
}

/// 显示当前配置
pub fn show_config(config: &Config) {
    println!("Current configuration:");
    println!("  Data directory: {}", config.resolve_data_dir().display());
    println!("  Undo limit:     {}", config.undo_limit);
    println!("  Log level:      {}", config.log_level);
    println!();
    println!("Config file: {}", get_config_path().display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config("undo_limit = 5\n").unwrap();
        assert_eq!(config.undo_limit, 5);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn test_parse_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/ivy")),
            undo_limit: 3,
            log_level: "debug".into(),
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(parse_config(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(parse_config("undo_limit = \"many\"").is_err());
    }
}
