use anyhow::Result;
/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use std::fs;
use tracing::info;

use crate::config::Config;
use crate::models::{RunAbort, RunResult};

/// 初始化 tracing 日志输出
///
/// 通过 RUST_LOG 环境变量控制级别，默认 info
pub fn init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n职位申请日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 职位自动申请模式");
    info!("🔍 搜索关键词: {}", config.job_search_term);
    info!("🔢 计划申请数量: {}", config.jobs_to_apply);
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
pub fn log_final_stats(result: &RunResult, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", result.succeeded(), result.total());
    info!("❌ 失败: {}", result.failed());
    match result.aborted() {
        Some(RunAbort::AuthenticationFailed) => {
            info!("⚠️ 运行因登录失败提前终止");
        }
        Some(RunAbort::SessionLost) => {
            info!("⚠️ 运行因会话失效提前终止，以上为部分结果");
        }
        None => {}
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", config.output_log_file);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
