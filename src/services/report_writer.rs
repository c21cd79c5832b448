//! 结果导出服务 - 业务能力层
//!
//! 只负责"把运行结果写成 CSV"能力，不关心流程

use std::fs;

use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::RunResult;

/// CSV 表头，列顺序与外部展示层的结果表一致
const CSV_HEADER: &str = "Job Link,Job Title,Status,Time Applied";

/// 结果导出服务
///
/// 职责：
/// - 渲染结果表为 CSV 文本（标准 CSV 引号转义）
/// - 写入目标文件
pub struct ReportWriter {
    output_path: String,
}

impl ReportWriter {
    /// 创建新的导出服务
    pub fn new(output_path: impl Into<String>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// 把运行结果写入 CSV 文件
    ///
    /// # 返回
    /// 返回写入的文件路径
    pub fn write(&self, result: &RunResult) -> AppResult<String> {
        let csv = render_csv(result);
        debug!("写入结果表: {} ({} 行)", self.output_path, result.total() + 1);

        fs::write(&self.output_path, csv)
            .map_err(|e| AppError::file_write_failed(&self.output_path, e))?;

        Ok(self.output_path.clone())
    }
}

/// 渲染结果表为 CSV 文本：表头 + 每个结果一行
pub fn render_csv(result: &RunResult) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for outcome in result.outcomes() {
        out.push_str(&csv_field(outcome.link.as_str()));
        out.push(',');
        out.push_str(&csv_field(&outcome.title));
        out.push(',');
        out.push_str(&csv_field(outcome.status.as_str()));
        out.push(',');
        out.push_str(&csv_field(&outcome.applied_at_text()));
        out.push('\n');
    }

    out
}

/// 标准 CSV 引号转义：包含逗号、引号或换行时加引号，内部引号翻倍
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApplicationOutcome, ApplyStatus, ListingLink};

    fn outcome(link: &str, title: &str, status: ApplyStatus) -> ApplicationOutcome {
        ApplicationOutcome::new(ListingLink(link.to_string()), title, status, 1)
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_render_csv_header_and_rows() {
        let mut result = RunResult::new();
        result.record(outcome(
            "https://www.dice.com/job-detail/aaa",
            "rust developer",
            ApplyStatus::Succeeded,
        ));
        result.record(outcome(
            "https://www.dice.com/job-detail/bbb",
            "rust developer",
            ApplyStatus::Failed,
        ));

        let csv = render_csv(&result);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Job Link,Job Title,Status,Time Applied");
        assert!(lines[1].starts_with("https://www.dice.com/job-detail/aaa,rust developer,Successful,"));
        assert!(lines[2].contains(",Failed,"));
    }

    #[test]
    fn test_render_csv_twenty_rows() {
        // 20 个结果 ⇒ 表头 + 20 行
        let mut result = RunResult::new();
        for i in 0..20 {
            let status = if i % 3 == 0 {
                ApplyStatus::Failed
            } else {
                ApplyStatus::Succeeded
            };
            result.record(outcome(
                &format!("https://www.dice.com/job-detail/{}", i),
                "data engineer",
                status,
            ));
        }

        let csv = render_csv(&result);
        assert_eq!(csv.lines().count(), 21);
        assert_eq!(result.succeeded() + result.failed(), 20);
    }

    #[test]
    fn test_write_to_file() {
        let dir = std::env::temp_dir().join("dice_auto_apply_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("report.csv");

        let mut result = RunResult::new();
        result.record(outcome(
            "https://www.dice.com/job-detail/aaa",
            "rust developer",
            ApplyStatus::Succeeded,
        ));

        let writer = ReportWriter::new(path.to_string_lossy().to_string());
        let written = writer.write(&result).unwrap();

        let content = std::fs::read_to_string(&written).unwrap();
        assert!(content.starts_with("Job Link,"));
        assert_eq!(content.lines().count(), 2);

        std::fs::remove_file(&path).ok();
    }
}
