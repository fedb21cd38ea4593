//! 更新源相关数据类型定义

use std::collections::BTreeMap;
use std::fmt;

/// 支持的包管理器，声明顺序即汇总顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceKind {
    Brew,
    Dnf,
    Flatpak,
    Snap,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Brew,
        SourceKind::Dnf,
        SourceKind::Flatpak,
        SourceKind::Snap,
    ];

    /// 用户可见的名称
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Brew => "Homebrew",
            SourceKind::Dnf => "DNF",
            SourceKind::Flatpak => "Flatpak",
            SourceKind::Snap => "Snap",
        }
    }

    /// 后端可执行文件名，用于存在性探测
    pub fn program(self) -> &'static str {
        match self {
            SourceKind::Brew => "brew",
            SourceKind::Dnf => "dnf",
            SourceKind::Flatpak => "flatpak",
            SourceKind::Snap => "snap",
        }
    }

    /// 汇总行，DNF 的措辞是 "system packages"
    pub fn summary_line(self, count: usize) -> String {
        match self {
            SourceKind::Dnf => format!("{}: {} system packages\n", self.label(), count),
            _ => format!("{}: {} packages\n", self.label(), count),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 单个待更新条目，名称原样取自工具输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUpdate {
    pub source: SourceKind,
    pub name: String,
}

impl PackageUpdate {
    pub fn new(source: SourceKind, name: impl Into<String>) -> Self {
        Self {
            source,
            name: name.into(),
        }
    }
}

/// 一次检查的汇总结果。
///
/// 计数由条目列表推导，构造后不可修改，因此每个出现在
/// 汇总中的来源都至少对应一个条目。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    packages: Vec<PackageUpdate>,
    counts: BTreeMap<SourceKind, usize>,
}

impl UpdateReport {
    /// 空结果（没有任何更新）
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_packages(packages: Vec<PackageUpdate>) -> Self {
        let mut counts = BTreeMap::new();
        for pkg in &packages {
            *counts.entry(pkg.source).or_insert(0) += 1;
        }
        Self { packages, counts }
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn packages(&self) -> &[PackageUpdate] {
        &self.packages
    }

    #[cfg(test)]
    pub fn count(&self, source: SourceKind) -> usize {
        self.counts.get(&source).copied().unwrap_or(0)
    }

    pub fn package_names(&self) -> Vec<String> {
        self.packages.iter().map(|p| p.name.clone()).collect()
    }

    /// 按来源声明顺序拼接的汇总文本，空结果为空字符串
    pub fn summary(&self) -> String {
        self.counts
            .iter()
            .map(|(source, count)| source.summary_line(*count))
            .collect()
    }
}
