//! 启动检查和桌面集成：zenity、定时检查、桌面文件、自启动项

use anyhow::{Context, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::InitError;
use crate::package_manager::{detect_available, CommandRunner};

pub const APP_FILE_STEM: &str = "package-updater";
const DIALOG_PROGRAM: &str = "zenity";

/// 安装 zenity 时按顺序尝试的包管理器
const ZENITY_INSTALLERS: [(&str, &[&str]); 3] = [
    ("dnf", &["dnf", "install", "-y", "zenity"]),
    ("apt-get", &["apt-get", "install", "-y", "zenity"]),
    ("pacman", &["pacman", "-S", "--noconfirm", "zenity"]),
];

pub fn home_dir() -> Result<PathBuf, InitError> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .ok_or(InitError::HomeNotSet)
}

/// 除 `--help` 外的所有模式都先经过这里
pub fn initialize(config: &Config, runner: &dyn CommandRunner) -> Result<(), InitError> {
    println!("Initializing Package Update Checker...");

    if !runner.program_exists(DIALOG_PROGRAM) {
        println!("Zenity is required for the GUI interface.");
        if !install_zenity(runner) {
            println!("Please install zenity manually and try again.");
            return Err(InitError::DialogUnavailable);
        }
    }

    let available = detect_available(runner);
    println!("\nDetected package managers:");
    for kind in &available {
        println!("✓ {}", kind.label());
    }
    if available.is_empty() {
        println!("\n❌ No supported package managers found.");
        println!("The updater will not be able to check for updates.");
        return Err(InitError::NoPackageManager);
    }

    if config.schedule_checks {
        println!("\nSetting up automatic update checks...");
        match home_dir()
            .map_err(anyhow::Error::from)
            .and_then(|home| schedule_checks(config, &home))
        {
            Ok(Schedule::Systemd) => {
                println!("✓ Automatic update checks configured successfully.")
            }
            Ok(Schedule::Autostart) => {
                println!("Warning: Failed to setup automatic update checks.");
                println!("You can still run the updater manually.");
            }
            Err(e) => {
                log::warn!("配置定时检查失败: {:#}", e);
                println!("Warning: Failed to setup automatic update checks.");
                println!("You can still run the updater manually.");
            }
        }
    }

    println!("\nInitialization complete!");
    Ok(())
}

/// 询问后用系统包管理器安装 zenity，拒绝或非交互终端都视为失败
fn install_zenity(runner: &dyn CommandRunner) -> bool {
    let accepted = dialoguer::Confirm::new()
        .with_prompt("Zenity is required but not installed. Would you like to install it?")
        .default(false)
        .interact()
        .unwrap_or_else(|e| {
            log::warn!("无法读取确认输入: {}", e);
            false
        });
    if !accepted {
        println!("Zenity installation declined. The updater will not function properly.");
        return false;
    }

    let Some((_, argv)) = ZENITY_INSTALLERS
        .iter()
        .find(|(program, _)| runner.program_exists(program))
    else {
        println!("Could not determine package manager to install zenity.");
        return false;
    };

    match duct::cmd("sudo", argv.iter()).unchecked().run() {
        Ok(output) => output.status.success(),
        Err(e) => {
            log::error!("安装 zenity 失败: {}", e);
            false
        }
    }
}

/// 导出图形会话需要的环境变量
pub fn export_session_env() {
    // SAFETY: getuid 不会失败，也没有副作用
    let uid = unsafe { libc::getuid() };
    std::env::set_var("XDG_RUNTIME_DIR", format!("/run/user/{}", uid));
    std::env::set_var("DISPLAY", ":0");
}

// ===== 桌面文件 =====

fn desktop_entry(config: &Config, autostart: bool) -> String {
    let exec = if autostart {
        format!("{} --notify-only", config.exec_path.display())
    } else {
        config.exec_path.display().to_string()
    };
    let mut entry = format!(
        "[Desktop Entry]\n\
         Version=1.0\n\
         Name=Package Updater\n\
         Comment=Check for package updates\n\
         Exec={}\n\
         Icon={}\n\
         Terminal=false\n\
         Type=Application\n\
         Categories=System;Utility;\n\
         Keywords=update;package;system;\n",
        exec,
        config.icon_path.display()
    );
    if autostart {
        entry.push_str("X-GNOME-Autostart-enabled=true\n");
    }
    entry
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("无法创建目录 {}", dir.display()))?;
    }
    fs::write(path, content).with_context(|| format!("无法写入 {}", path.display()))
}

/// `--install-desktop`：写入应用菜单里的桌面文件
pub fn install_desktop_file(config: &Config, home: &Path) -> Result<PathBuf> {
    let path = home
        .join(".local/share/applications")
        .join(format!("{}.desktop", APP_FILE_STEM));
    write_file(&path, &desktop_entry(config, false))?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("无法设置 {} 的权限", path.display()))?;
    Ok(path)
}

/// `--setup-autostart`：写入登录自启动项
pub fn setup_autostart(config: &Config, home: &Path) -> Result<PathBuf> {
    let path = home
        .join(".config/autostart")
        .join(format!("{}.desktop", APP_FILE_STEM));
    write_file(&path, &desktop_entry(config, true))?;
    Ok(path)
}

// ===== 定时检查 =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Systemd,
    /// systemd 不可用，只写了自启动项
    Autostart,
}

pub fn systemd_available() -> bool {
    Path::new("/run/systemd/system").exists() || Path::new("/var/run/systemd/system").exists()
}

fn service_unit(config: &Config, home: &Path) -> String {
    format!(
        "[Unit]\n\
         Description=Package Update Checker\n\
         After=network.target\n\
         \n\
         [Service]\n\
         Type=oneshot\n\
         ExecStart={} --notify-only\n\
         Environment=DISPLAY=:0\n\
         Environment=XAUTHORITY={}\n",
        config.exec_path.display(),
        home.join(".Xauthority").display()
    )
}

fn timer_unit(config: &Config) -> String {
    format!(
        "[Unit]\n\
         Description=Package Update Checker Timer\n\
         \n\
         [Timer]\n\
         OnBootSec={}\n\
         OnUnitActiveSec={}\n\
         Unit={}.service\n\
         \n\
         [Install]\n\
         WantedBy=timers.target\n",
        config.boot_delay, config.check_interval, APP_FILE_STEM
    )
}

/// 内容相同时不重写，返回是否有改动
fn write_if_changed(path: &Path, content: &str) -> Result<bool> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == content) {
        return Ok(false);
    }
    write_file(path, content)?;
    Ok(true)
}

/// 写入 systemd 用户服务和定时器，返回是否有文件被更新
pub fn write_systemd_units(config: &Config, home: &Path) -> Result<bool> {
    let dir = home.join(".config/systemd/user");
    let service = write_if_changed(
        &dir.join(format!("{}.service", APP_FILE_STEM)),
        &service_unit(config, home),
    )?;
    let timer = write_if_changed(
        &dir.join(format!("{}.timer", APP_FILE_STEM)),
        &timer_unit(config),
    )?;
    Ok(service || timer)
}

fn systemctl_user(args: &[&str]) {
    let mut argv = vec!["--user"];
    argv.extend_from_slice(args);
    match duct::cmd("systemctl", &argv).stdout_null().unchecked().run() {
        Ok(output) if output.status.success() => {}
        Ok(output) => log::warn!(
            "systemctl {} 退出码 {:?}",
            argv.join(" "),
            output.status.code()
        ),
        Err(e) => log::warn!("无法运行 systemctl: {}", e),
    }
}

/// 有 systemd 时安装定时器，否则退回到自启动项
pub fn schedule_checks(config: &Config, home: &Path) -> Result<Schedule> {
    if !systemd_available() {
        println!("Systemd is not available on this system. Using autostart instead.");
        let path = setup_autostart(config, home)?;
        println!("Autostart entry created at: {}", path.display());
        return Ok(Schedule::Autostart);
    }

    if write_systemd_units(config, home)? {
        let timer = format!("{}.timer", APP_FILE_STEM);
        systemctl_user(&["daemon-reload"]);
        systemctl_user(&["enable", &timer]);
        systemctl_user(&["start", &timer]);
    } else {
        log::debug!("systemd 定时器未变化");
    }
    Ok(Schedule::Systemd)
}
