//! 通知模式（--notify-only），供定时任务和自启动调用
//!
//! 没有更新时不弹出任何窗口。

use crate::actions::UpdateActions;
use crate::aggregator::UpdateChecker;
use crate::dialog::Dialog;
use crate::updater::UpdateDialog;

pub const NOTIFICATION_TEXT: &str = "Package updates available. Click to manage updates.";
pub const CONFIRM_TEXT: &str = "Open update manager?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    NothingToReport,
    Dismissed,
    OpenedDialog,
}

pub fn run_notify(
    checker: &dyn UpdateChecker,
    dialog: &dyn Dialog,
    actions: &dyn UpdateActions,
) -> NotifyOutcome {
    let report = checker.check();
    if report.is_empty() {
        log::info!("没有可用更新");
        return NotifyOutcome::NothingToReport;
    }

    if let Err(e) = dialog.notify(NOTIFICATION_TEXT) {
        log::warn!("{}", e);
    }

    match dialog.confirm(CONFIRM_TEXT) {
        Ok(true) => {
            UpdateDialog::new(checker, dialog, actions).run();
            NotifyOutcome::OpenedDialog
        }
        Ok(false) => NotifyOutcome::Dismissed,
        Err(e) => {
            log::warn!("{}", e);
            NotifyOutcome::Dismissed
        }
    }
}
