use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// 程序配置文件
///
/// 所有运行参数的唯一来源：优先读取 config.toml，
/// 其次读取环境变量，最后落到默认值
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 目标站点基础URL
    pub base_url: String,
    /// 是否连接已运行的浏览器（否则启动无头浏览器）
    pub use_existing_browser: bool,
    /// 浏览器调试端口（连接已运行的浏览器时使用）
    pub browser_debug_port: u16,
    /// 浏览器可执行文件路径（启动无头浏览器时使用，留空则自动探测）
    pub chrome_executable: Option<String>,
    /// 登录邮箱
    pub dice_email: String,
    /// 登录密码
    pub dice_password: String,
    /// 职位搜索关键词
    pub job_search_term: String,
    /// 本次运行申请的职位数量（1-1000）
    pub jobs_to_apply: usize,
    /// 每个列表页的职位数量（站点固定为 20）
    pub page_size: usize,
    /// 总职位数解析失败时的默认估计值
    pub default_total_jobs: usize,
    /// 单个职位的最大申请尝试次数
    pub max_apply_attempts: usize,
    /// 元素查找超时（秒）
    pub element_timeout_secs: u64,
    /// 登录提交后的固定等待时间（秒）
    pub login_settle_secs: u64,
    /// 页面导航后的固定等待时间（秒）
    pub page_load_wait_secs: u64,
    /// 列表页之间的随机延迟范围（毫秒）
    pub page_delay_min_ms: u64,
    pub page_delay_max_ms: u64,
    /// 每次点击后的随机延迟范围（毫秒）
    pub click_delay_min_ms: u64,
    pub click_delay_max_ms: u64,
    /// 相邻两个职位之间的固定延迟（毫秒）
    pub job_pause_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 申请结果 CSV 文件
    pub output_csv_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://www.dice.com".to_string(),
            use_existing_browser: false,
            browser_debug_port: 9222,
            chrome_executable: None,
            dice_email: String::new(),
            dice_password: String::new(),
            job_search_term: String::new(),
            jobs_to_apply: 20,
            page_size: 20,
            default_total_jobs: 300,
            max_apply_attempts: 3,
            element_timeout_secs: 10,
            login_settle_secs: 5,
            page_load_wait_secs: 5,
            page_delay_min_ms: 1000,
            page_delay_max_ms: 3000,
            click_delay_min_ms: 2000,
            click_delay_max_ms: 4000,
            job_pause_ms: 2000,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            output_csv_file: "job_application_data.csv".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            base_url: std::env::var("DICE_BASE_URL").unwrap_or(default.base_url),
            use_existing_browser: std::env::var("USE_EXISTING_BROWSER").ok().and_then(|v| v.parse().ok()).unwrap_or(default.use_existing_browser),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.browser_debug_port),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(default.chrome_executable),
            dice_email: std::env::var("DICE_EMAIL").unwrap_or(default.dice_email),
            dice_password: std::env::var("DICE_PASSWORD").unwrap_or(default.dice_password),
            job_search_term: std::env::var("JOB_SEARCH_TERM").unwrap_or(default.job_search_term),
            jobs_to_apply: std::env::var("JOBS_TO_APPLY").ok().and_then(|v| v.parse().ok()).unwrap_or(default.jobs_to_apply),
            page_size: default.page_size,
            default_total_jobs: default.default_total_jobs,
            max_apply_attempts: std::env::var("MAX_APPLY_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_apply_attempts),
            element_timeout_secs: std::env::var("ELEMENT_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.element_timeout_secs),
            login_settle_secs: default.login_settle_secs,
            page_load_wait_secs: default.page_load_wait_secs,
            page_delay_min_ms: default.page_delay_min_ms,
            page_delay_max_ms: default.page_delay_max_ms,
            click_delay_min_ms: default.click_delay_min_ms,
            click_delay_max_ms: default.click_delay_max_ms,
            job_pause_ms: default.job_pause_ms,
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            output_csv_file: std::env::var("OUTPUT_CSV_FILE").unwrap_or(default.output_csv_file),
        }
    }

    /// 从 TOML 文件加载配置
    ///
    /// 缺失的字段会落到默认值
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::AppError::File(crate::error::FileError::ReadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            AppError::Config(crate::error::ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;
        Ok(config)
    }

    /// 加载配置：存在 config.toml 时优先使用，否则读取环境变量
    pub fn load() -> Self {
        let config_path = Path::new("config.toml");
        if config_path.exists() {
            match Self::from_file(config_path) {
                Ok(config) => {
                    info!("✓ 已从 config.toml 加载配置");
                    return config;
                }
                Err(e) => {
                    warn!("⚠️ 加载 config.toml 失败，改用环境变量: {}", e);
                }
            }
        }
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.default_total_jobs, 300);
        assert_eq!(config.max_apply_attempts, 3);
        assert_eq!(config.element_timeout_secs, 10);
    }

    #[test]
    fn test_from_toml_partial() {
        // 缺失的字段应落到默认值
        let config: Config = toml::from_str(
            r#"
            job_search_term = "rust developer"
            jobs_to_apply = 45
            "#,
        )
        .unwrap();
        assert_eq!(config.job_search_term, "rust developer");
        assert_eq!(config.jobs_to_apply, 45);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.base_url, "https://www.dice.com");
    }
}
