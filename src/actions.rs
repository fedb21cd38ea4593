//! 对话框触发的外部操作：终端批量更新、打开软件中心

use crate::error::ActionError;
use crate::package_manager::{CommandRunner, SourceKind, BULK_UPDATE_ORDER};

/// 按优先级探测的软件中心
pub const SOFTWARE_CENTERS: [&str; 2] = ["gnome-software", "plasma-discover"];

pub trait UpdateActions {
    /// 打开终端依次运行各包管理器的升级命令，阻塞到终端关闭
    fn run_bulk_update(&self, available: &[SourceKind]) -> Result<(), ActionError>;

    /// 以更新模式打开软件中心，阻塞到其退出
    fn open_software_center(&self) -> Result<(), ActionError>;
}

/// 生成终端里执行的更新脚本
pub fn bulk_update_script(available: &[SourceKind]) -> String {
    let mut script = String::new();
    for kind in BULK_UPDATE_ORDER {
        if !available.contains(&kind) {
            continue;
        }
        if let Some(upgrade) = kind.upgrade_script() {
            let label = match kind {
                SourceKind::Snap | SourceKind::Flatpak => format!("{} packages", kind.label()),
                _ => kind.label().to_string(),
            };
            script.push_str(&format!("echo \"Updating {}...\";", label));
            script.push_str(upgrade);
            script.push(';');
        }
    }
    script.push_str("echo \"Updates complete. Press Enter to close.\";");
    script.push_str("read;");
    script
}

pub struct SystemActions<'a> {
    terminal: Vec<String>,
    runner: &'a dyn CommandRunner,
}

impl<'a> SystemActions<'a> {
    pub fn new(terminal: Vec<String>, runner: &'a dyn CommandRunner) -> Self {
        Self { terminal, runner }
    }

    /// 按优先级返回第一个已安装的软件中心
    fn find_software_center(&self) -> Option<&'static str> {
        SOFTWARE_CENTERS
            .into_iter()
            .find(|program| self.runner.program_exists(program))
    }

    fn run_blocking(&self, program: &str, args: Vec<String>) -> Result<(), ActionError> {
        log::info!("运行 {} {}", program, args.join(" "));
        let output = duct::cmd(program, args)
            .unchecked()
            .run()
            .map_err(|source| ActionError::Launch {
                program: program.to_string(),
                source,
            })?;
        if !output.status.success() {
            log::warn!("{} 退出码 {:?}", program, output.status.code());
        }
        Ok(())
    }
}

impl UpdateActions for SystemActions<'_> {
    fn run_bulk_update(&self, available: &[SourceKind]) -> Result<(), ActionError> {
        let Some((program, prefix)) = self.terminal.split_first() else {
            return Err(ActionError::Launch {
                program: String::new(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "未配置终端"),
            });
        };
        let mut args = prefix.to_vec();
        args.extend([
            "bash".to_string(),
            "-c".to_string(),
            bulk_update_script(available),
        ]);
        self.run_blocking(program, args)
    }

    fn open_software_center(&self) -> Result<(), ActionError> {
        let center = self
            .find_software_center()
            .ok_or(ActionError::NoSoftwareCenter)?;
        self.run_blocking(center, vec!["--mode=updates".to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::ScriptedRunner;

    #[test]
    fn test_script_runs_available_managers_in_order() {
        let script = bulk_update_script(&SourceKind::ALL);
        let brew = script.find("brew update && brew upgrade").unwrap();
        let snap = script.find("sudo snap refresh").unwrap();
        let flatpak = script.find("flatpak update").unwrap();
        assert!(brew < snap && snap < flatpak);
        assert!(!script.contains("dnf"));
        assert!(script.ends_with("echo \"Updates complete. Press Enter to close.\";read;"));
    }

    #[test]
    fn test_script_skips_missing_managers() {
        let script = bulk_update_script(&[SourceKind::Flatpak]);
        assert!(script.starts_with("echo \"Updating Flatpak packages...\";flatpak update;"));
        assert!(!script.contains("brew"));
        assert!(!script.contains("snap"));
    }

    #[test]
    fn test_gnome_software_preferred_over_discover() {
        let terminal = vec!["ptyxis".to_string()];

        let both = ScriptedRunner::new()
            .installed("plasma-discover")
            .installed("gnome-software");
        let actions = SystemActions::new(terminal.clone(), &both);
        assert_eq!(actions.find_software_center(), Some("gnome-software"));

        let discover = ScriptedRunner::new().installed("plasma-discover");
        let actions = SystemActions::new(terminal.clone(), &discover);
        assert_eq!(actions.find_software_center(), Some("plasma-discover"));

        let none = ScriptedRunner::new();
        let actions = SystemActions::new(terminal, &none);
        assert_eq!(actions.find_software_center(), None);
    }

    #[test]
    fn test_no_software_center_found() {
        let runner = ScriptedRunner::new();
        let actions = SystemActions::new(vec!["ptyxis".to_string()], &runner);
        assert!(matches!(
            actions.open_software_center(),
            Err(ActionError::NoSoftwareCenter)
        ));
    }

    #[test]
    fn test_empty_terminal_is_launch_error() {
        let runner = ScriptedRunner::new();
        let actions = SystemActions::new(Vec::new(), &runner);
        assert!(matches!(
            actions.run_bulk_update(&[SourceKind::Brew]),
            Err(ActionError::Launch { .. })
        ));
    }
}
