use clap::{ArgGroup, Parser};

/// Package Update Notification Program
///
/// With no options, runs the interactive update dialog.
#[derive(Debug, Parser)]
#[command(name = "updater", about)]
#[command(group(ArgGroup::new("mode").args(["install_desktop", "setup_autostart", "notify_only"])))]
pub struct Cli {
    /// Create desktop file in applications menu
    #[arg(long)]
    pub install_desktop: bool,

    /// Configure program to run at startup
    #[arg(long)]
    pub setup_autostart: bool,

    /// Show notification if updates available
    #[arg(long)]
    pub notify_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    UpdateDialog,
    InstallDesktop,
    SetupAutostart,
    NotifyOnly,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.install_desktop {
            Mode::InstallDesktop
        } else if self.setup_autostart {
            Mode::SetupAutostart
        } else if self.notify_only {
            Mode::NotifyOnly
        } else {
            Mode::UpdateDialog
        }
    }
}

/// 解析命令行；`--help` 以 0 退出，其他解析错误以 1 退出
pub fn parse() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    }
}
