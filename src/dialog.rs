//! 图形对话框（zenity）
//!
//! 所有参数都以 argv 形式传递，包名里的引号或空格不会破坏命令行。

use crate::error::DialogError;

pub const BULK_UPDATE_LABEL: &str = "Brew, Snap & Flatpak";
pub const SOFTWARE_CENTER_LABEL: &str = "Open Software Manager";
pub const RECHECK_LABEL: &str = "Check for updates again";

/// 用户在列表对话框中的选择
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogChoice {
    BulkUpdate,
    OpenSoftwareCenter,
    Recheck,
    Package(String),
    /// 关闭或取消了对话框
    Cancelled,
}

impl DialogChoice {
    /// 解析列表对话框输出的第一行。空选择按重新检查处理。
    pub fn from_selection(selection: &str) -> Self {
        match selection.trim_end_matches(['\r', '\n']) {
            BULK_UPDATE_LABEL => DialogChoice::BulkUpdate,
            SOFTWARE_CENTER_LABEL => DialogChoice::OpenSoftwareCenter,
            RECHECK_LABEL | "" => DialogChoice::Recheck,
            name => DialogChoice::Package(name.to_string()),
        }
    }
}

/// 固定操作行，排在包名前面
pub fn action_rows() -> [&'static str; 3] {
    [BULK_UPDATE_LABEL, SOFTWARE_CENTER_LABEL, RECHECK_LABEL]
}

/// 对话框工具需要提供的四种交互
pub trait Dialog {
    /// 被动通知，不等待用户
    fn notify(&self, text: &str) -> Result<(), DialogError>;

    /// 是/否确认，返回 true 表示“是”
    fn confirm(&self, text: &str) -> Result<bool, DialogError>;

    /// 单选列表，`summary` 作为标题说明，`packages` 排在固定操作之后
    fn select(&self, summary: &str, packages: &[String]) -> Result<DialogChoice, DialogError>;

    fn info(&self, title: &str, text: &str) -> Result<(), DialogError>;

    fn error(&self, text: &str) -> Result<(), DialogError>;
}

pub struct Zenity {
    program: String,
}

impl Default for Zenity {
    fn default() -> Self {
        Self {
            program: "zenity".to_string(),
        }
    }
}

impl Zenity {
    fn run(&self, args: Vec<String>) -> Result<std::process::Output, DialogError> {
        duct::cmd(self.program.as_str(), args)
            .stdout_capture()
            .stderr_null()
            .unchecked()
            .run()
            .map_err(|source| DialogError {
                program: self.program.clone(),
                source,
            })
    }
}

pub fn notification_args(text: &str) -> Vec<String> {
    vec![
        "--notification".to_string(),
        format!("--text={}", text),
        "--window-icon=system-software-update".to_string(),
    ]
}

pub fn list_args(summary: &str, packages: &[String]) -> Vec<String> {
    let mut args = vec![
        "--list".to_string(),
        "--title=Package Updates Available".to_string(),
        format!(
            "--text=The following packages have updates available:\n{}",
            summary
        ),
        "--column=Action or Package".to_string(),
    ];
    args.extend(action_rows().iter().map(|s| s.to_string()));
    args.extend(packages.iter().cloned());
    args.extend([
        "--ok-label=Select".to_string(),
        "--cancel-label=Exit".to_string(),
        "--width=400".to_string(),
        "--height=300".to_string(),
    ]);
    args
}

impl Dialog for Zenity {
    fn notify(&self, text: &str) -> Result<(), DialogError> {
        self.run(notification_args(text)).map(|_| ())
    }

    fn confirm(&self, text: &str) -> Result<bool, DialogError> {
        let output = self.run(vec!["--question".to_string(), format!("--text={}", text)])?;
        Ok(output.status.success())
    }

    fn select(&self, summary: &str, packages: &[String]) -> Result<DialogChoice, DialogError> {
        let output = self.run(list_args(summary, packages))?;
        if !output.status.success() {
            log::debug!("列表对话框退出码 {:?}", output.status.code());
            return Ok(DialogChoice::Cancelled);
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(DialogChoice::from_selection(
            stdout.lines().next().unwrap_or_default(),
        ))
    }

    fn info(&self, title: &str, text: &str) -> Result<(), DialogError> {
        self.run(vec![
            "--info".to_string(),
            format!("--title={}", title),
            format!("--text={}", text),
            "--width=400".to_string(),
            "--height=200".to_string(),
        ])
        .map(|_| ())
    }

    fn error(&self, text: &str) -> Result<(), DialogError> {
        self.run(vec!["--error".to_string(), format!("--text={}", text)])
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_from_fixed_labels() {
        assert_eq!(
            DialogChoice::from_selection("Brew, Snap & Flatpak\n"),
            DialogChoice::BulkUpdate
        );
        assert_eq!(
            DialogChoice::from_selection("Open Software Manager"),
            DialogChoice::OpenSoftwareCenter
        );
        assert_eq!(
            DialogChoice::from_selection("Check for updates again\n"),
            DialogChoice::Recheck
        );
    }

    #[test]
    fn test_choice_package_and_empty() {
        assert_eq!(
            DialogChoice::from_selection("org.app.Foo\n"),
            DialogChoice::Package("org.app.Foo".to_string())
        );
        assert_eq!(DialogChoice::from_selection(""), DialogChoice::Recheck);
    }

    #[test]
    fn test_list_args_put_actions_before_packages() {
        let args = list_args("Homebrew: 1 packages\n", &["git \"quoted\"".to_string()]);
        let column = args.iter().position(|a| a == "--column=Action or Package").unwrap();
        assert_eq!(args[column + 1], BULK_UPDATE_LABEL);
        assert_eq!(args[column + 2], SOFTWARE_CENTER_LABEL);
        assert_eq!(args[column + 3], RECHECK_LABEL);
        assert_eq!(args[column + 4], "git \"quoted\"");
        assert!(args[2].ends_with("available:\nHomebrew: 1 packages\n"));
        assert_eq!(args.last().map(String::as_str), Some("--height=300"));
    }
}
