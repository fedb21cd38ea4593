//! 包管理器模块：对 brew / dnf / flatpak / snap 的封装

pub mod parser;
pub mod runner;
pub mod types;

// 重新导出常用类型
pub use runner::{CommandOutput, CommandRunner, ExitPolicy, ProcessRunner, QueryCommand};
pub use types::{PackageUpdate, SourceKind, UpdateReport};

use parser::{
    parse_brew_outdated, parse_dnf_check_update, parse_flatpak_dry_run, parse_snap_refresh_list,
    strip_terminal_codes,
};

/// 一个更新来源。
///
/// 只要求两件事：后端是否存在、当前有哪些待更新的包。
/// 将来换成结构化输出的实现时，聚合器和对话框循环不需要改动。
pub trait UpdateSource {
    fn kind(&self) -> SourceKind;

    fn is_available(&self) -> bool;

    /// 待更新的包名列表；查询失败视为没有更新
    fn query_updates(&self) -> Vec<String>;
}

impl SourceKind {
    /// 列出待更新包的命令
    pub fn query_command(self) -> QueryCommand {
        match self {
            SourceKind::Brew => QueryCommand::new("brew", ["outdated"]),
            // 有可用更新时 dnf 以 100 退出
            SourceKind::Dnf => QueryCommand::new("dnf", ["check-update"])
                .exit_policy(ExitPolicy::Codes(&[0, 100])),
            SourceKind::Flatpak => QueryCommand::new("flatpak", ["update", "--dry-run"])
                .merge_stderr()
                .exit_policy(ExitPolicy::Any),
            SourceKind::Snap => QueryCommand::new("snap", ["refresh", "--list"]),
        }
    }

    pub fn parse_updates(self, raw: &str) -> Vec<String> {
        let cleaned = strip_terminal_codes(raw);
        if cleaned.trim().is_empty() {
            return Vec::new();
        }
        match self {
            SourceKind::Brew => parse_brew_outdated(&cleaned),
            SourceKind::Dnf => parse_dnf_check_update(&cleaned),
            SourceKind::Flatpak => parse_flatpak_dry_run(&cleaned),
            SourceKind::Snap => parse_snap_refresh_list(&cleaned),
        }
    }

    /// 批量更新终端里执行的 shell 片段，DNF 不参与批量更新
    pub fn upgrade_script(self) -> Option<&'static str> {
        match self {
            SourceKind::Brew => Some("brew update && brew upgrade"),
            SourceKind::Snap => Some("sudo snap refresh"),
            SourceKind::Flatpak => Some("flatpak update"),
            SourceKind::Dnf => None,
        }
    }
}

/// 批量更新的执行顺序
pub const BULK_UPDATE_ORDER: [SourceKind; 3] =
    [SourceKind::Brew, SourceKind::Snap, SourceKind::Flatpak];

/// 通过外部命令查询的更新来源
pub struct ManagerSource<'a> {
    kind: SourceKind,
    runner: &'a dyn CommandRunner,
}

impl<'a> ManagerSource<'a> {
    pub fn new(kind: SourceKind, runner: &'a dyn CommandRunner) -> Self {
        Self { kind, runner }
    }

    /// 按声明顺序为所有支持的包管理器创建来源
    pub fn all(runner: &'a dyn CommandRunner) -> Vec<Box<dyn UpdateSource + 'a>> {
        SourceKind::ALL
            .iter()
            .map(|&kind| Box::new(ManagerSource::new(kind, runner)) as Box<dyn UpdateSource + 'a>)
            .collect()
    }
}

impl UpdateSource for ManagerSource<'_> {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        self.runner.program_exists(self.kind.program())
    }

    fn query_updates(&self) -> Vec<String> {
        let output = self.runner.run(&self.kind.query_command());
        if output == CommandOutput::Unavailable {
            log::warn!("{} 查询无法执行，按无更新处理", self.kind);
        }
        self.kind.parse_updates(output.text())
    }
}

/// 检测系统中存在的包管理器
pub fn detect_available(runner: &dyn CommandRunner) -> Vec<SourceKind> {
    SourceKind::ALL
        .iter()
        .copied()
        .filter(|kind| runner.program_exists(kind.program()))
        .collect()
}
