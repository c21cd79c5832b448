//! 进度事件数据模型
//!
//! 核心流程通过结构化事件向外部展示层汇报进度，
//! 展示层（仪表盘/进度条）不在本 crate 范围内

use serde::Serialize;

/// 运行阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// 采集职位链接
    Harvesting,
    /// 逐个申请职位
    Applying,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Harvesting => "harvesting",
            Phase::Applying => "applying",
        }
    }
}

/// 事件级别
///
/// 可恢复的失败以 Warn 级别事件上报，运行不会静默丢失任何链接
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressLevel {
    Info,
    Warn,
}

/// 进度事件
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    pub phase: Phase,
    /// 完成比例，范围 0.0-1.0
    pub fraction: f64,
    pub message: String,
    pub level: ProgressLevel,
}

impl ProgressEvent {
    pub fn info(phase: Phase, fraction: f64, message: impl Into<String>) -> Self {
        Self {
            phase,
            fraction: fraction.clamp(0.0, 1.0),
            message: message.into(),
            level: ProgressLevel::Info,
        }
    }

    pub fn warn(phase: Phase, fraction: f64, message: impl Into<String>) -> Self {
        Self {
            phase,
            fraction: fraction.clamp(0.0, 1.0),
            message: message.into(),
            level: ProgressLevel::Warn,
        }
    }
}
