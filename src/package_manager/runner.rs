//! 外部命令执行器
//!
//! 同步启动子进程并读完标准输出，输出长度有硬上限。
//! 任何失败都不会向上抛出：无法启动返回 `Unavailable`，
//! 退出码不被接受时返回空文本。

use std::io::Read;

/// 默认输出上限（字节）
pub const DEFAULT_OUTPUT_LIMIT: usize = 8192;

/// 标准错误的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StderrMode {
    Discard,
    /// 合并到标准输出一起解析
    Merge,
}

/// 哪些退出码视为查询成功
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPolicy {
    Success,
    Codes(&'static [i32]),
    Any,
}

impl ExitPolicy {
    fn accepts(self, code: Option<i32>) -> bool {
        match self {
            ExitPolicy::Success => code == Some(0),
            ExitPolicy::Codes(codes) => code.is_some_and(|c| codes.contains(&c)),
            ExitPolicy::Any => true,
        }
    }
}

/// 一条查询命令（argv 形式，不经过 shell）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCommand {
    pub program: String,
    pub args: Vec<String>,
    pub stderr: StderrMode,
    pub exit_policy: ExitPolicy,
}

impl QueryCommand {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            stderr: StderrMode::Discard,
            exit_policy: ExitPolicy::Success,
        }
    }

    pub fn merge_stderr(mut self) -> Self {
        self.stderr = StderrMode::Merge;
        self
    }

    pub fn exit_policy(mut self, policy: ExitPolicy) -> Self {
        self.exit_policy = policy;
        self
    }

    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// 命令输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Text(String),
    /// 进程无法启动
    Unavailable,
}

impl CommandOutput {
    /// 把 `Unavailable` 当作空输出
    pub fn text(&self) -> &str {
        match self {
            CommandOutput::Text(s) => s,
            CommandOutput::Unavailable => "",
        }
    }
}

/// 进程执行接口，方便替换为并发实现或测试替身
pub trait CommandRunner {
    fn run(&self, command: &QueryCommand) -> CommandOutput;

    /// 通过 PATH 查找判断可执行文件是否存在，不执行查询本身
    fn program_exists(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// 基于 duct 的阻塞式执行器
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    limit: usize,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_LIMIT)
    }
}

impl ProcessRunner {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &QueryCommand) -> CommandOutput {
        let expr = duct::cmd(command.program.as_str(), &command.args)
            .stdin_null()
            .unchecked();
        let expr = match command.stderr {
            StderrMode::Discard => expr.stderr_null(),
            StderrMode::Merge => expr.stderr_to_stdout(),
        };

        let mut reader = match expr.reader() {
            Ok(r) => r,
            Err(e) => {
                log::warn!("无法启动 `{}`: {}", command.display(), e);
                return CommandOutput::Unavailable;
            }
        };

        let mut captured: Vec<u8> = Vec::new();
        let mut buffer = [0u8; 1024];
        let mut truncated = false;

        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("读取 `{}` 输出失败: {}", command.display(), e);
                    break;
                }
            };
            let room = self.limit - captured.len();
            if n > room {
                captured.extend_from_slice(&buffer[..room]);
                truncated = true;
                break;
            }
            captured.extend_from_slice(&buffer[..n]);
        }

        if truncated {
            // 超出上限：杀掉子进程，丢弃最后一个不完整的行
            if let Err(e) = reader.kill() {
                log::debug!("终止 `{}` 失败: {}", command.display(), e);
            }
            let keep = captured
                .iter()
                .rposition(|&b| b == b'\n')
                .map_or(0, |pos| pos + 1);
            captured.truncate(keep);
            log::warn!(
                "`{}` 输出超过 {} 字节，已截断",
                command.display(),
                self.limit
            );
            return CommandOutput::Text(String::from_utf8_lossy(&captured).into_owned());
        }

        let code = match reader.try_wait() {
            Ok(Some(output)) => output.status.code(),
            Ok(None) => None,
            Err(e) => {
                log::warn!("等待 `{}` 退出失败: {}", command.display(), e);
                None
            }
        };

        if !command.exit_policy.accepts(code) {
            log::debug!("`{}` 退出码 {:?}，按无输出处理", command.display(), code);
            return CommandOutput::Text(String::new());
        }

        CommandOutput::Text(String::from_utf8_lossy(&captured).into_owned())
    }
}
