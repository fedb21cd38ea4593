//! 测试替身

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use crate::actions::UpdateActions;
use crate::aggregator::UpdateChecker;
use crate::dialog::{Dialog, DialogChoice};
use crate::error::{ActionError, DialogError};
use crate::package_manager::{
    CommandOutput, CommandRunner, QueryCommand, SourceKind, UpdateReport, UpdateSource,
};

fn launch_error() -> DialogError {
    DialogError {
        program: "zenity".to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
    }
}

/// 按程序名返回预设输出
#[derive(Default)]
pub struct ScriptedRunner {
    installed: HashSet<String>,
    outputs: HashMap<String, String>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn installed(mut self, program: &str) -> Self {
        self.installed.insert(program.to_string());
        self
    }

    pub fn output(mut self, program: &str, text: &str) -> Self {
        self.outputs.insert(program.to_string(), text.to_string());
        self
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &QueryCommand) -> CommandOutput {
        match self.outputs.get(&command.program) {
            Some(text) => CommandOutput::Text(text.clone()),
            None => CommandOutput::Unavailable,
        }
    }

    fn program_exists(&self, program: &str) -> bool {
        self.installed.contains(program)
    }
}

pub struct FakeSource {
    kind: SourceKind,
    available: bool,
    names: Vec<String>,
    queries: Rc<Cell<usize>>,
}

impl FakeSource {
    pub fn new(kind: SourceKind, names: &[&str]) -> Self {
        Self {
            kind,
            available: true,
            names: names.iter().map(|n| n.to_string()).collect(),
            queries: Rc::new(Cell::new(0)),
        }
    }

    pub fn missing(kind: SourceKind) -> Self {
        Self {
            available: false,
            ..Self::new(kind, &[])
        }
    }

    pub fn query_count(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.queries)
    }
}

impl UpdateSource for FakeSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn query_updates(&self) -> Vec<String> {
        self.queries.set(self.queries.get() + 1);
        self.names.clone()
    }
}

/// 依次返回预设结果，用完后重复最后一个
pub struct FakeChecker {
    reports: Vec<UpdateReport>,
    checks: Cell<usize>,
}

impl FakeChecker {
    pub fn new(reports: Vec<UpdateReport>) -> Self {
        Self {
            reports,
            checks: Cell::new(0),
        }
    }

    pub fn checks(&self) -> usize {
        self.checks.get()
    }
}

impl UpdateChecker for FakeChecker {
    fn check(&self) -> UpdateReport {
        let n = self.checks.get();
        self.checks.set(n + 1);
        let idx = n.min(self.reports.len().saturating_sub(1));
        self.reports.get(idx).cloned().unwrap_or_default()
    }

    fn available(&self) -> Vec<SourceKind> {
        vec![SourceKind::Brew]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Notify,
    Confirm,
    Select(Vec<String>),
    Info(String),
    Error(String),
}

/// 记录调用的对话框；列表选择用完后按取消处理
pub struct FakeDialog {
    selections: RefCell<VecDeque<Result<DialogChoice, ()>>>,
    confirm: Option<bool>,
    calls: RefCell<Vec<Call>>,
}

impl FakeDialog {
    pub fn new(selections: Vec<Result<DialogChoice, ()>>) -> Self {
        Self {
            selections: RefCell::new(selections.into()),
            confirm: Some(false),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// `None` 表示确认对话框无法启动
    pub fn answering(mut self, confirm: Option<bool>) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl Dialog for FakeDialog {
    fn notify(&self, _text: &str) -> Result<(), DialogError> {
        self.calls.borrow_mut().push(Call::Notify);
        Ok(())
    }

    fn confirm(&self, _text: &str) -> Result<bool, DialogError> {
        self.calls.borrow_mut().push(Call::Confirm);
        self.confirm.ok_or_else(launch_error)
    }

    fn select(&self, _summary: &str, packages: &[String]) -> Result<DialogChoice, DialogError> {
        self.calls.borrow_mut().push(Call::Select(packages.to_vec()));
        match self.selections.borrow_mut().pop_front() {
            Some(Ok(choice)) => Ok(choice),
            Some(Err(())) => Err(launch_error()),
            None => Ok(DialogChoice::Cancelled),
        }
    }

    fn info(&self, _title: &str, text: &str) -> Result<(), DialogError> {
        self.calls.borrow_mut().push(Call::Info(text.to_string()));
        Ok(())
    }

    fn error(&self, text: &str) -> Result<(), DialogError> {
        self.calls.borrow_mut().push(Call::Error(text.to_string()));
        Ok(())
    }
}

pub struct FakeActions {
    software_center: bool,
    terminal: bool,
    calls: RefCell<Vec<&'static str>>,
}

impl Default for FakeActions {
    fn default() -> Self {
        Self {
            software_center: true,
            terminal: true,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl FakeActions {
    pub fn without_software_center() -> Self {
        Self {
            software_center: false,
            ..Self::default()
        }
    }

    pub fn without_terminal() -> Self {
        Self {
            terminal: false,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }
}

impl UpdateActions for FakeActions {
    fn run_bulk_update(&self, _available: &[SourceKind]) -> Result<(), ActionError> {
        if !self.terminal {
            return Err(ActionError::Launch {
                program: "ptyxis".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }
        self.calls.borrow_mut().push("bulk");
        Ok(())
    }

    fn open_software_center(&self) -> Result<(), ActionError> {
        if !self.software_center {
            return Err(ActionError::NoSoftwareCenter);
        }
        self.calls.borrow_mut().push("software-center");
        Ok(())
    }
}
