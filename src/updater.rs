//! 更新选择对话框循环
//!
//! 状态机：Prompting → Dispatching → Prompting | Exited。
//! 每次进入 Prompting 都重新检查更新，循环之间不保留任何结果。

use crate::actions::UpdateActions;
use crate::aggregator::UpdateChecker;
use crate::dialog::{Dialog, DialogChoice};
use crate::error::ActionError;

pub const NO_UPDATES_TITLE: &str = "Package Updates";
pub const NO_UPDATES_TEXT: &str = "No updates available.";
pub const NO_SOFTWARE_CENTER_TEXT: &str = "No software update manager found.";
pub const BULK_UPDATE_FAILED_TEXT: &str = "Unable to open a terminal for the update.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoopState {
    Prompting,
    Dispatching(DialogChoice),
    Exited(LoopExit),
}

/// 循环结束的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    NoUpdates,
    Cancelled,
    DialogFailed,
}

pub struct UpdateDialog<'a> {
    checker: &'a dyn UpdateChecker,
    dialog: &'a dyn Dialog,
    actions: &'a dyn UpdateActions,
}

impl<'a> UpdateDialog<'a> {
    pub fn new(
        checker: &'a dyn UpdateChecker,
        dialog: &'a dyn Dialog,
        actions: &'a dyn UpdateActions,
    ) -> Self {
        Self {
            checker,
            dialog,
            actions,
        }
    }

    /// 运行到用户取消、对话框无法启动或没有更新为止
    pub fn run(&self) -> LoopExit {
        let mut state = LoopState::Prompting;
        loop {
            state = match state {
                LoopState::Prompting => self.prompt(),
                LoopState::Dispatching(choice) => self.dispatch(choice),
                LoopState::Exited(exit) => {
                    log::debug!("更新对话框结束: {:?}", exit);
                    return exit;
                }
            };
        }
    }

    fn prompt(&self) -> LoopState {
        let report = self.checker.check();
        if report.is_empty() {
            if let Err(e) = self.dialog.info(NO_UPDATES_TITLE, NO_UPDATES_TEXT) {
                log::warn!("{}", e);
            }
            return LoopState::Exited(LoopExit::NoUpdates);
        }
        log::debug!("共 {} 个待更新", report.packages().len());

        match self.dialog.select(&report.summary(), &report.package_names()) {
            Ok(choice) => LoopState::Dispatching(choice),
            Err(e) => {
                log::error!("{}", e);
                LoopState::Exited(LoopExit::DialogFailed)
            }
        }
    }

    fn dispatch(&self, choice: DialogChoice) -> LoopState {
        match choice {
            DialogChoice::Cancelled => return LoopState::Exited(LoopExit::Cancelled),
            // 选中单个包和批量更新走同一条路径
            DialogChoice::BulkUpdate | DialogChoice::Package(_) => {
                let available = self.checker.available();
                if let Err(e) = self.actions.run_bulk_update(&available) {
                    log::error!("批量更新失败: {}", e);
                    self.show_error(BULK_UPDATE_FAILED_TEXT);
                }
            }
            DialogChoice::OpenSoftwareCenter => match self.actions.open_software_center() {
                Ok(()) => {}
                Err(ActionError::NoSoftwareCenter) => self.show_error(NO_SOFTWARE_CENTER_TEXT),
                Err(e) => {
                    log::error!("{}", e);
                    self.show_error(&e.to_string());
                }
            },
            DialogChoice::Recheck => {}
        }
        LoopState::Prompting
    }

    fn show_error(&self, text: &str) {
        if let Err(e) = self.dialog.error(text) {
            log::warn!("{}", e);
        }
    }
}
