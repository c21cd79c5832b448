//! 职位申请流程 - 流程层
//!
//! 核心职责：定义"一个职位"的完整申请流程
//!
//! 单次尝试的阶段顺序：
//! Start → Navigated → Applied → Advanced → Submitted
//!
//! 任何一步失败（元素未找到、点击被拒、超时）即本次尝试失败，
//! 在最大尝试次数内从头重试；只有会话失效会向上抛出

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::Session;
use crate::models::{ApplicationOutcome, ApplyStatus, ListingLink};
use crate::utils::logging::truncate_text;
use crate::workflow::job_ctx::JobCtx;

/// 申请入口控件：封装在 shadow DOM 内，需要脚本穿透
const APPLY_HOST: &str = "apply-button-wc";
const APPLY_INNER: &str = ".btn.btn-primary";
/// 多步表单的"下一步"控件
const NEXT_BUTTON: &str = "button.seds-button-primary.btn-next";
/// 最终提交控件：按可见文本匹配
const SUBMIT_CANDIDATES: &str = "button.seds-button-primary";
const SUBMIT_TEXT: &str = "Submit";

/// 单次尝试内的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptStage {
    Start,
    Navigated,
    Applied,
    Advanced,
    Submitted,
}

/// 一次尝试的失败分类
#[derive(Debug)]
pub(crate) enum AttemptError {
    /// 可恢复：重新导航后从头重试
    Recoverable(AppError),
    /// 致命：浏览器会话已失效，整个运行终止
    Fatal(AppError),
}

/// 职位申请流程
///
/// 职责：
/// - 编排单个职位的多步申请表单
/// - 失败后在最大尝试次数内从头重试，每次尝试互相独立
/// - 普通失败产出 Failed 结果，不向上抛错；只有会话失效返回 Err
pub struct ApplyFlow {
    max_attempts: usize,
    element_timeout: Duration,
    click_delay_ms: (u64, u64),
}

impl ApplyFlow {
    /// 创建新的申请流程
    pub fn new(config: &Config) -> Self {
        Self {
            max_attempts: config.max_apply_attempts.max(1),
            element_timeout: Duration::from_secs(config.element_timeout_secs),
            click_delay_ms: (config.click_delay_min_ms, config.click_delay_max_ms),
        }
    }

    /// 申请单个职位
    ///
    /// # 返回
    /// 返回申请结果（含实际尝试次数）；只有会话失效时返回 Err
    pub async fn run(&self, session: &Session, ctx: &JobCtx) -> AppResult<ApplicationOutcome> {
        info!("{} 🔗 开始申请: {}", ctx, truncate_text(ctx.link.as_str(), 80));

        let flow = self;
        let max_attempts = self.max_attempts;
        let (status, attempts_used) = run_attempts(max_attempts, move |attempt_no| {
            let link = ctx.link.clone();
            async move {
                match flow.attempt_once(session, &link).await {
                    Ok(()) => Ok(()),
                    Err(e) if e.is_session_lost() => Err(AttemptError::Fatal(e)),
                    Err(e) => {
                        // 探测会话：连探测脚本都失败说明浏览器本身已经没了
                        if !session.is_alive().await {
                            return Err(AttemptError::Fatal(AppError::session_lost()));
                        }
                        warn!(
                            "⚠️ 申请出错 (尝试 {}/{}): {}",
                            attempt_no, max_attempts, e
                        );
                        Err(AttemptError::Recoverable(e))
                    }
                }
            }
        })
        .await?;

        match status {
            ApplyStatus::Succeeded => {
                info!("{} ✅ 申请成功 (尝试 {} 次)", ctx, attempts_used);
            }
            ApplyStatus::Failed => {
                warn!("{} ❌ 已达最大尝试次数，放弃该职位", ctx);
            }
        }

        Ok(ApplicationOutcome::new(
            ctx.link.clone(),
            ctx.title.clone(),
            status,
            attempts_used,
        ))
    }

    /// 执行一次完整的申请尝试
    ///
    /// 每次尝试都从重新导航开始，不保留上次的中间进度
    async fn attempt_once(&self, session: &Session, link: &ListingLink) -> AppResult<()> {
        let mut stage = AttemptStage::Start;
        debug!("尝试开始，阶段: {:?}", stage);

        session.navigate(link.as_str()).await?;
        stage = AttemptStage::Navigated;
        debug!("阶段: {:?}", stage);
        self.click_pause().await;

        // 申请按钮藏在 shadow DOM 里，先等宿主出现再脚本穿透点击
        session
            .find_element_with_timeout(APPLY_HOST, self.element_timeout)
            .await?;
        session.click_in_shadow(APPLY_HOST, APPLY_INNER).await?;
        stage = AttemptStage::Applied;
        info!("✅ 已点击 'Apply' 按钮");
        self.click_pause().await;

        session
            .wait_until_clickable(NEXT_BUTTON, self.element_timeout)
            .await?;
        session.click(NEXT_BUTTON).await?;
        stage = AttemptStage::Advanced;
        info!("✅ 已点击 'Next' 按钮");
        self.click_pause().await;

        session
            .click_by_text(SUBMIT_CANDIDATES, SUBMIT_TEXT, self.element_timeout)
            .await?;
        stage = AttemptStage::Submitted;
        info!("✅ 已点击 'Submit' 按钮");
        self.click_pause().await;

        debug!("尝试完成，阶段: {:?}", stage);
        Ok(())
    }

    /// 点击后的随机停顿（2-4 秒量级，范围来自配置），等页面自己稳定下来
    async fn click_pause(&self) {
        let (min_ms, max_ms) = self.click_delay_ms;
        let delay_ms = {
            let mut rng = rand::thread_rng();
            rng.gen_range(min_ms..=max_ms.max(min_ms))
        };
        sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// 有界重试：在最大尝试次数内反复执行 `attempt`
///
/// # 返回
/// - 某次尝试成功 ⇒ Ok((Succeeded, 已用次数))
/// - 全部失败 ⇒ Ok((Failed, 最大次数))
/// - 致命失败 ⇒ Err，立即停止后续尝试
pub(crate) async fn run_attempts<F, Fut>(
    max_attempts: usize,
    mut attempt: F,
) -> AppResult<(ApplyStatus, usize)>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<(), AttemptError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempts_used = 0;

    for attempt_no in 1..=max_attempts {
        attempts_used = attempt_no;
        match attempt(attempt_no).await {
            Ok(()) => return Ok((ApplyStatus::Succeeded, attempts_used)),
            Err(AttemptError::Fatal(e)) => return Err(e),
            Err(AttemptError::Recoverable(_)) => continue,
        }
    }

    Ok((ApplyStatus::Failed, attempts_used))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recoverable() -> AttemptError {
        AttemptError::Recoverable(AppError::element_not_found("apply-button-wc", 10))
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let calls = AtomicUsize::new(0);

        let (status, attempts) = run_attempts(3, |_| {
            let calls = &calls;
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(recoverable())
                } else {
                    Ok(())
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(status, ApplyStatus::Succeeded);
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn test_all_attempts_fail() {
        let calls = AtomicUsize::new(0);

        let (status, attempts) = run_attempts(3, |_| {
            let calls = &calls;
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(recoverable())
            }
        })
        .await
        .unwrap();

        assert_eq!(status, ApplyStatus::Failed);
        assert_eq!(attempts, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fatal_error_stops_retrying() {
        let calls = AtomicUsize::new(0);

        let result = run_attempts(3, |_| {
            let calls = &calls;
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n == 2 {
                    Err(AttemptError::Fatal(AppError::session_lost()))
                } else {
                    Err(recoverable())
                }
            }
        })
        .await;

        assert!(result.is_err());
        assert!(result.unwrap_err().is_session_lost());
        // 致命错误后不再继续尝试
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_max_attempts_still_tries_once() {
        let calls = AtomicUsize::new(0);

        let (status, attempts) = run_attempts(0, |_| {
            let calls = &calls;
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await
        .unwrap();

        assert_eq!(status, ApplyStatus::Succeeded);
        assert_eq!(attempts, 1);
    }
}
