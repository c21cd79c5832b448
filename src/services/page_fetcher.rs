//! 列表页抓取服务 - 业务能力层
//!
//! 只负责"抓取一个 URL 的 HTML"能力，不关心流程。
//! 列表页是静态可抓取的，不需要经过浏览器会话

use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::error::{AppError, AppResult, HarvestError};

/// 请求超时
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// 轮换使用的 User-Agent 池，降低被目标站点拦截的概率
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.113 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/63.0.3239.132 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/66.0.3359.117 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/64.0.3282.140 Safari/537.36 Edge/17.17134",
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/66.0.3359.117 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/64.0.3282.140 Safari/537.36 Edge/18.17763",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_6) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/11.1.2 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/12.1.1 Safari/605.1.15",
];

/// 列表页抓取服务
///
/// 职责：
/// - 抓取单个 URL 的 HTML 文本
/// - 每次请求随机选择 User-Agent
/// - 不解析 HTML，不出现 ListingLink
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// 创建新的抓取服务
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client }
    }

    /// 抓取指定 URL 的 HTML
    ///
    /// # 返回
    /// 返回页面 HTML 文本；非 2xx 状态码视为失败
    pub async fn fetch_html(&self, url: &str) -> AppResult<String> {
        let user_agent = random_user_agent();
        debug!("抓取列表页: {} (UA: {}...)", url, &user_agent[..30]);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| AppError::page_fetch_failed(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Harvest(HarvestError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }));
        }

        let html = response
            .text()
            .await
            .map_err(|e| AppError::page_fetch_failed(url, e))?;

        debug!("抓取成功: {} ({} 字节)", url, html.len());
        Ok(html)
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// 从池中随机选择一个 User-Agent
fn random_user_agent() -> &'static str {
    let index = rand::thread_rng().gen_range(0..USER_AGENTS.len());
    USER_AGENTS[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_user_agent_from_pool() {
        for _ in 0..50 {
            let ua = random_user_agent();
            assert!(USER_AGENTS.contains(&ua));
        }
    }
}
