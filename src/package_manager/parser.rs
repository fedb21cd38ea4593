//! 各包管理器的输出解析函数
//!
//! 每个函数只处理对应工具在标准输出上的文本约定，
//! 空白行或缺少目标字段的行不产生条目。

/// 去掉 ANSI 转义序列和除换行、制表符以外的控制字符。
///
/// 不合并空行，行结构保持不变，表头行数判断依赖这一点。
pub fn strip_terminal_codes(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' => {
                if chars.peek() == Some(&'[') {
                    chars.next();
                    while let Some(&next) = chars.peek() {
                        chars.next();
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
            }
            // 单独的 \r 是进度覆盖，按换行处理
            '\r' => {
                if chars.peek() != Some(&'\n') && !result.ends_with('\n') {
                    result.push('\n');
                }
            }
            c if c.is_control() && c != '\n' && c != '\t' => {}
            _ => result.push(c),
        }
    }

    result
}

/// `brew outdated`：每一行就是一个包名，没有表头
pub fn parse_brew_outdated(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// `dnf check-update`：跳过前两行（元数据时间戳和空行），取每行第一个字段
pub fn parse_dnf_check_update(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(2)
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// `flatpak update --dry-run`：只保留以两个空格开头的行，取第二个字段
pub fn parse_flatpak_dry_run(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.starts_with("  "))
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
        .collect()
}

/// `snap refresh --list`：跳过第一行表头，取每行第一个字段
pub fn parse_snap_refresh_list(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}
