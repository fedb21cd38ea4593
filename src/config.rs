use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::package_manager::runner::DEFAULT_OUTPUT_LIMIT;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 写入桌面文件、自启动项和 systemd 服务的可执行文件路径
    pub exec_path: PathBuf,
    pub icon_path: PathBuf,
    /// 终端启动前缀，后面追加 `bash -c <脚本>`
    pub terminal: Vec<String>,
    /// 单条查询命令的输出上限（字节）
    pub output_limit: usize,
    pub boot_delay: String,
    pub check_interval: String,
    /// 启动时是否安装定时检查
    pub schedule_checks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exec_path: PathBuf::from("/opt/package-updater/updater"),
            icon_path: PathBuf::from("/opt/package-updater/icon.png"),
            terminal: vec!["ptyxis".to_string(), "--new-window".to_string()],
            output_limit: DEFAULT_OUTPUT_LIMIT,
            boot_delay: "5min".to_string(),
            check_interval: "1h".to_string(),
            schedule_checks: true,
        }
    }
}

impl Config {
    pub fn load_or_default() -> Result<Self> {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let config_path = PathBuf::from(home).join(".config/package-updater/config.toml");
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .with_context(|| format!("读取配置文件 {} 失败", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("解析配置文件 {} 失败", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }
}
