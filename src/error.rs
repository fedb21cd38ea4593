use thiserror::Error;

/// 对话框工具无法启动
#[derive(Debug, Error)]
#[error("无法启动对话框 `{program}`: {source}")]
pub struct DialogError {
    pub program: String,
    #[source]
    pub source: std::io::Error,
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("未找到软件更新管理器 (gnome-software / plasma-discover)")]
    NoSoftwareCenter,

    #[error("无法启动 `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// 启动阶段的致命错误，进程以状态 1 退出
#[derive(Debug, Error)]
pub enum InitError {
    #[error("zenity 不可用，图形界面无法工作")]
    DialogUnavailable,

    #[error("未找到受支持的包管理器 (brew/dnf/flatpak/snap)")]
    NoPackageManager,

    #[error("未设置 HOME 环境变量")]
    HomeNotSet,
}
