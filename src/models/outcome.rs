//! 申请结果数据模型
//!
//! 单个职位的申请结果（ApplicationOutcome）以及整次运行的
//! 结果汇总（RunResult），由编排层持有并在运行结束时定稿

use chrono::{DateTime, Local};

use crate::models::job::ListingLink;

/// 单个职位的申请状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStatus {
    /// 申请成功
    Succeeded,
    /// 重试次数用尽后失败
    Failed,
}

impl ApplyStatus {
    /// 结果表中显示的状态文本
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyStatus::Succeeded => "Successful",
            ApplyStatus::Failed => "Failed",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApplyStatus::Succeeded)
    }
}

/// 单个职位的申请结果
///
/// 由申请执行器创建，一旦产生不可变更，追加到运行结果日志
#[derive(Debug, Clone)]
pub struct ApplicationOutcome {
    /// 职位详情页链接
    pub link: ListingLink,
    /// 职位标题（结果表中记录搜索关键词）
    pub title: String,
    /// 申请状态
    pub status: ApplyStatus,
    /// 实际使用的尝试次数（1..=最大尝试次数）
    pub attempts_used: usize,
    /// 申请时间
    pub applied_at: DateTime<Local>,
}

impl ApplicationOutcome {
    pub fn new(
        link: ListingLink,
        title: impl Into<String>,
        status: ApplyStatus,
        attempts_used: usize,
    ) -> Self {
        Self {
            link,
            title: title.into(),
            status,
            attempts_used,
            applied_at: Local::now(),
        }
    }

    /// 结果表中显示的申请时间
    pub fn applied_at_text(&self) -> String {
        self.applied_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// 运行提前终止的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAbort {
    /// 登录认证失败，零结果终止
    AuthenticationFailed,
    /// 浏览器会话失效，保留已有结果终止
    SessionLost,
}

/// 整次运行的结果汇总
///
/// 不变式：succeeded + failed == outcomes.len() == 实际尝试的职位数
#[derive(Debug, Default)]
pub struct RunResult {
    outcomes: Vec<ApplicationOutcome>,
    succeeded: usize,
    failed: usize,
    aborted: Option<RunAbort>,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个申请结果并更新计数
    pub fn record(&mut self, outcome: ApplicationOutcome) {
        match outcome.status {
            ApplyStatus::Succeeded => self.succeeded += 1,
            ApplyStatus::Failed => self.failed += 1,
        }
        self.outcomes.push(outcome);
        debug_assert_eq!(self.succeeded + self.failed, self.outcomes.len());
    }

    /// 标记运行提前终止
    pub fn abort(&mut self, reason: RunAbort) {
        self.aborted = Some(reason);
    }

    pub fn outcomes(&self) -> &[ApplicationOutcome] {
        &self.outcomes
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// 实际尝试的职位总数
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn aborted(&self) -> Option<RunAbort> {
        self.aborted
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: ApplyStatus, attempts: usize) -> ApplicationOutcome {
        ApplicationOutcome::new(
            ListingLink("https://www.dice.com/job-detail/abc".to_string()),
            "rust developer",
            status,
            attempts,
        )
    }

    #[test]
    fn test_counts_match_outcomes() {
        let mut result = RunResult::new();
        result.record(outcome(ApplyStatus::Succeeded, 1));
        result.record(outcome(ApplyStatus::Failed, 3));
        result.record(outcome(ApplyStatus::Succeeded, 2));

        assert_eq!(result.succeeded(), 2);
        assert_eq!(result.failed(), 1);
        assert_eq!(result.total(), 3);
        assert_eq!(result.succeeded() + result.failed(), result.total());
    }

    #[test]
    fn test_aborted_run_keeps_partial_outcomes() {
        // 5 个链接中处理了 2 个之后会话失效：结果里只有 2 条记录
        let mut result = RunResult::new();
        result.record(outcome(ApplyStatus::Succeeded, 1));
        result.record(outcome(ApplyStatus::Failed, 3));
        result.abort(RunAbort::SessionLost);

        assert_eq!(result.total(), 2);
        assert_eq!(result.aborted(), Some(RunAbort::SessionLost));
        assert_eq!(result.succeeded() + result.failed(), result.total());
    }

    #[test]
    fn test_auth_failure_has_zero_outcomes() {
        let mut result = RunResult::new();
        result.abort(RunAbort::AuthenticationFailed);

        assert_eq!(result.total(), 0);
        assert!(result.is_aborted());
    }

    #[test]
    fn test_status_text() {
        assert_eq!(ApplyStatus::Succeeded.as_str(), "Successful");
        assert_eq!(ApplyStatus::Failed.as_str(), "Failed");
    }
}
