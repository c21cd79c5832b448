//! 进度上报服务 - 业务能力层
//!
//! 核心流程与展示层之间的唯一通道：每个事件同时写入日志，
//! 并在外部订阅时推送到 channel

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::models::{Phase, ProgressEvent};

/// 进度上报服务
///
/// 职责：
/// - 发出 {phase, fraction, message} 结构化事件
/// - 可恢复失败以 Warn 级别上报，运行不静默丢失任何链接
/// - 展示层缺席时退化为纯日志输出
#[derive(Clone, Default)]
pub struct ProgressReporter {
    sender: Option<UnboundedSender<ProgressEvent>>,
}

impl ProgressReporter {
    /// 创建纯日志模式的上报器
    pub fn new() -> Self {
        Self { sender: None }
    }

    /// 创建带事件订阅的上报器
    ///
    /// # 返回
    /// 返回 (上报器, 事件接收端)，接收端交给外部展示层
    pub fn with_channel() -> (Self, UnboundedReceiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// 上报一条进度
    pub fn report(&self, phase: Phase, fraction: f64, message: impl Into<String>) {
        let event = ProgressEvent::info(phase, fraction, message);
        info!(
            "🔄 [{}] {:.0}% - {}",
            event.phase.as_str(),
            event.fraction * 100.0,
            event.message
        );
        self.send(event);
    }

    /// 上报一条警告（可恢复失败）
    pub fn warn(&self, phase: Phase, fraction: f64, message: impl Into<String>) {
        let event = ProgressEvent::warn(phase, fraction, message);
        warn!("⚠️ [{}] {}", event.phase.as_str(), event.message);
        self.send(event);
    }

    fn send(&self, event: ProgressEvent) {
        if let Some(sender) = &self.sender {
            // 接收端掉线时退化为纯日志输出
            let _ = sender.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProgressLevel;

    #[tokio::test]
    async fn test_events_reach_subscriber() {
        let (reporter, mut receiver) = ProgressReporter::with_channel();

        reporter.report(Phase::Harvesting, 0.5, "已采集第 1/2 页");
        reporter.warn(Phase::Applying, 0.25, "第 2 页抓取失败，已跳过");

        let first = receiver.recv().await.unwrap();
        assert_eq!(first.phase, Phase::Harvesting);
        assert_eq!(first.fraction, 0.5);
        assert_eq!(first.level, ProgressLevel::Info);

        let second = receiver.recv().await.unwrap();
        assert_eq!(second.phase, Phase::Applying);
        assert_eq!(second.level, ProgressLevel::Warn);
    }

    #[test]
    fn test_log_only_reporter_does_not_panic() {
        let reporter = ProgressReporter::new();
        reporter.report(Phase::Harvesting, 1.0, "done");
        reporter.warn(Phase::Harvesting, 1.0, "warn");
    }
}
