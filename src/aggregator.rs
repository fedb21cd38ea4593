//! 汇总所有来源的待更新列表

use crate::package_manager::{PackageUpdate, SourceKind, UpdateReport, UpdateSource};

/// 检查更新的接口，对话框循环和通知模式都通过它获取最新结果
pub trait UpdateChecker {
    /// 每次调用都重新查询，不缓存
    fn check(&self) -> UpdateReport;

    /// 当前可用的包管理器
    fn available(&self) -> Vec<SourceKind>;
}

pub struct Aggregator<'a> {
    sources: Vec<Box<dyn UpdateSource + 'a>>,
}

impl<'a> Aggregator<'a> {
    pub fn new(sources: Vec<Box<dyn UpdateSource + 'a>>) -> Self {
        Self { sources }
    }

    /// 依次查询每个来源并合并结果。
    ///
    /// 不可用或没有更新的来源直接跳过；不去重，
    /// 不同包管理器里的同名包是两个独立安装。
    pub fn aggregate(&self) -> UpdateReport {
        let mut packages = Vec::new();

        for source in &self.sources {
            let kind = source.kind();
            if !source.is_available() {
                log::debug!("{} 未安装，跳过", kind);
                continue;
            }
            let names = source.query_updates();
            log::info!("{}: {} 个待更新", kind, names.len());
            packages.extend(names.into_iter().map(|name| PackageUpdate::new(kind, name)));
        }

        if packages.is_empty() {
            return UpdateReport::empty();
        }
        UpdateReport::from_packages(packages)
    }
}

impl UpdateChecker for Aggregator<'_> {
    fn check(&self) -> UpdateReport {
        self.aggregate()
    }

    fn available(&self) -> Vec<SourceKind> {
        self.sources
            .iter()
            .filter(|s| s.is_available())
            .map(|s| s.kind())
            .collect()
    }
}
