//! # Dice Auto Apply
//!
//! 一个用于自动化职位申请的 Rust 应用程序：
//! 登录目标站点，按关键词采集分页的职位链接，
//! 逐个驱动多步申请表单，最后产出结果日志
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Browser + Page），只暴露能力
//! - `Session` - 唯一的浏览器资源 owner，提供导航/查找/点击/脚本能力
//! - `wait` - 有界轮询等待原语，所有等待都带超时上限
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个关注点
//! - `LoginService` - 驱动登录 UI 的能力
//! - `LinkHarvester` / `PageFetcher` - 采集职位链接的能力
//! - `ReportWriter` - 导出 CSV 结果表的能力
//! - `ProgressReporter` - 向外部展示层上报进度的能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个职位"的完整申请流程
//! - `JobCtx` - 上下文封装（第几个职位 + 链接）
//! - `ApplyFlow` - 流程编排（navigate → apply → next → submit，带重试）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/run_processor` - 一次完整运行：登录 → 采集 → 逐个申请 → 导出
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{connect_to_browser_and_page, launch_headless_browser};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::Session;
pub use models::{
    ApplicationOutcome, ApplyStatus, Credentials, ListingLink, PageEstimate, Phase,
    ProgressEvent, RunAbort, RunResult, SearchQuery,
};
pub use orchestrator::App;
pub use services::{LinkHarvester, LoginService, ProgressReporter, ReportWriter};
pub use workflow::{ApplyFlow, JobCtx};
