//! 职位链接采集服务 - 业务能力层
//!
//! 给定搜索关键词和目标数量，估算需要访问的结果页数，
//! 逐页抓取并提取职位详情页链接。
//!
//! 单页抓取失败不会作废已采集的链接：记录警告后继续下一页

use std::time::Duration;

use rand::Rng;
use regex::Regex;
use scraper::{Html, Selector};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::Session;
use crate::models::{ListingLink, PageEstimate, Phase, SearchQuery};
use crate::services::page_fetcher::PageFetcher;
use crate::services::progress_reporter::ProgressReporter;

/// 详情页链接的路径特征
const JOB_DETAIL_MARKER: &str = "job-detail";

/// 首页上承载总结果数的元素
const TOTAL_COUNT_SELECTOR: &str = "span.p-reg-100";

/// 职位链接采集服务
///
/// 职责：
/// - 推导总职位数估计（解析失败时兜底）
/// - 计算需要抓取的页数
/// - 逐页提取详情页链接，保持页序和 DOM 顺序，不去重
pub struct LinkHarvester {
    fetcher: PageFetcher,
    base_url: String,
    page_size: usize,
    default_total: usize,
    page_load_wait: Duration,
    page_delay_ms: (u64, u64),
}

impl LinkHarvester {
    /// 创建新的采集服务
    pub fn new(config: &Config) -> Self {
        Self {
            fetcher: PageFetcher::new(),
            base_url: config.base_url.clone(),
            page_size: config.page_size,
            default_total: config.default_total_jobs,
            page_load_wait: Duration::from_secs(config.page_load_wait_secs),
            page_delay_ms: (config.page_delay_min_ms, config.page_delay_max_ms),
        }
    }

    /// 采集职位详情页链接
    ///
    /// # 参数
    /// - `session`: 浏览器会话（只用于渲染首页以解析总数）
    /// - `query`: 搜索条件
    /// - `progress`: 进度上报
    ///
    /// # 返回
    /// 返回有序的链接序列（页序 + DOM 顺序）
    pub async fn harvest(
        &self,
        session: &Session,
        query: &SearchQuery,
        progress: &ProgressReporter,
    ) -> AppResult<Vec<ListingLink>> {
        let first_page_url = self.search_url(query, 1);
        info!("🔍 正在打开搜索结果页: {}", first_page_url);
        session.navigate(&first_page_url).await?;
        sleep(self.page_load_wait).await;

        let estimate = self.estimate_total(session, progress).await;

        self.harvest_pages(estimate, query, progress).await
    }

    /// 根据总数估计逐页采集链接
    ///
    /// 与浏览器会话无关，列表页全部走 HTTP 抓取
    pub async fn harvest_pages(
        &self,
        estimate: PageEstimate,
        query: &SearchQuery,
        progress: &ProgressReporter,
    ) -> AppResult<Vec<ListingLink>> {
        let jobs_to_scrape = jobs_to_scrape(query.requested_count, estimate.total_available);
        let pages_to_scrape = pages_to_scrape(jobs_to_scrape, self.page_size);

        info!(
            "📄 计划采集 {} 个职位，共 {} 页",
            jobs_to_scrape, pages_to_scrape
        );

        let mut links = Vec::new();

        for page in 1..=pages_to_scrape {
            let url = self.search_url(query, page);

            let fraction = page as f64 / pages_to_scrape as f64;

            match self.fetcher.fetch_html(&url).await {
                Ok(html) => {
                    let page_links = extract_job_links(&html, &self.base_url);
                    debug!("第 {} 页提取到 {} 个链接", page, page_links.len());
                    links.extend(page_links);
                    progress.report(
                        Phase::Harvesting,
                        fraction,
                        format!("已采集第 {}/{} 页", page, pages_to_scrape),
                    );
                }
                Err(e) => {
                    // 单页失败不作废已有结果，记录警告后继续下一页
                    warn!("⚠️ 第 {} 页抓取失败，跳过: {}", page, e);
                    progress.warn(
                        Phase::Harvesting,
                        fraction,
                        format!("第 {} 页抓取失败，已跳过", page),
                    );
                }
            }

            // 页间随机延迟，避免触发站点的反自动化防御
            if page < pages_to_scrape {
                self.page_pause().await;
            }
        }

        info!("🎉 采集完成，共 {} 个职位链接", links.len());
        Ok(links)
    }

    /// 从渲染后的首页解析总职位数
    ///
    /// 解析失败时使用默认估计值，不会让整次运行失败
    pub async fn estimate_total(
        &self,
        session: &Session,
        progress: &ProgressReporter,
    ) -> PageEstimate {
        let js_code = format!(
            r#"
            (function() {{
                const el = document.querySelector({});
                return el ? el.textContent : "";
            }})()
            "#,
            serde_json::to_string(TOTAL_COUNT_SELECTOR).unwrap_or_default()
        );

        let count_text: String = match session.run_script_as(js_code).await {
            Ok(text) => text,
            Err(e) => {
                warn!("⚠️ 读取总职位数失败，使用默认值 {}: {}", self.default_total, e);
                progress.warn(Phase::Harvesting, 0.0, "无法确定总职位数，使用默认估计");
                return PageEstimate::fallback(self.default_total);
            }
        };

        match parse_total_jobs(&count_text) {
            Some(total) => {
                info!("📊 站点总职位数: {}", total);
                PageEstimate::parsed(total)
            }
            None => {
                warn!(
                    "⚠️ 无法从 '{}' 解析总职位数，使用默认值 {}",
                    count_text, self.default_total
                );
                progress.warn(Phase::Harvesting, 0.0, "无法确定总职位数，使用默认估计");
                PageEstimate::fallback(self.default_total)
            }
        }
    }

    /// 构建搜索结果页 URL
    fn search_url(&self, query: &SearchQuery, page: usize) -> String {
        let base = format!("{}/jobs/q-{}-jobs", self.base_url, query.encoded_term());
        if page <= 1 {
            base
        } else {
            format!("{}?page={}", base, page)
        }
    }

    /// 页间随机停顿（1-3 秒量级，范围来自配置）
    async fn page_pause(&self) {
        let (min_ms, max_ms) = self.page_delay_ms;
        let delay_ms = {
            let mut rng = rand::thread_rng();
            rng.gen_range(min_ms..=max_ms.max(min_ms))
        };
        sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// 实际要采集的职位数：不超过请求数，也不超过站点总数
pub fn jobs_to_scrape(requested_count: usize, total_estimate: usize) -> usize {
    requested_count.min(total_estimate)
}

/// 需要抓取的页数：向上取整
pub fn pages_to_scrape(jobs: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    jobs.div_ceil(page_size)
}

/// 从首页文本中解析总职位数（如 "Showing 1 - 20 of 1,234"）
pub fn parse_total_jobs(text: &str) -> Option<usize> {
    // 宽松匹配：千分位逗号可有可无
    let re = Regex::new(r"of ([\d,]+)").ok()?;
    let captures = re.captures(text)?;
    captures
        .get(1)?
        .as_str()
        .replace(',', "")
        .parse::<usize>()
        .ok()
}

/// 从列表页 HTML 中提取职位详情页链接
///
/// 保持 DOM 顺序，不去重；相对链接会补全为绝对链接
pub fn extract_job_links(html: &str, base_url: &str) -> Vec<ListingLink> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| href.contains(JOB_DETAIL_MARKER))
        .map(|href| ListingLink(absolutize(href, base_url)))
        .collect()
}

/// 相对链接补全为绝对链接
fn absolutize(href: &str, base_url: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jobs_and_pages_math() {
        // requestedCount=45, totalEstimate=300 ⇒ 45 个职位，3 页
        let jobs = jobs_to_scrape(45, 300);
        assert_eq!(jobs, 45);
        assert_eq!(pages_to_scrape(jobs, 20), 3);

        // 站点职位数少于请求数时以站点为准
        let jobs = jobs_to_scrape(100, 35);
        assert_eq!(jobs, 35);
        assert_eq!(pages_to_scrape(jobs, 20), 2);

        // 整除时不多抓一页
        assert_eq!(pages_to_scrape(40, 20), 2);
        assert_eq!(pages_to_scrape(0, 20), 0);
    }

    #[test]
    fn test_fallback_estimate_math() {
        // 解析失败 ⇒ 默认 300 ⇒ 请求 20 个只需 1 页
        let estimate = PageEstimate::fallback(300);
        let jobs = jobs_to_scrape(20, estimate.total_available);
        assert_eq!(jobs, 20);
        assert_eq!(pages_to_scrape(jobs, 20), 1);
    }

    #[test]
    fn test_parse_total_jobs() {
        assert_eq!(parse_total_jobs("Showing 1 - 20 of 1,234 jobs"), Some(1234));
        assert_eq!(parse_total_jobs("1 - 20 of 300"), Some(300));
        assert_eq!(parse_total_jobs("of 12,345,678"), Some(12345678));
        assert_eq!(parse_total_jobs("no numbers here"), None);
        assert_eq!(parse_total_jobs(""), None);
    }

    #[test]
    fn test_extract_job_links_keeps_order_and_duplicates() {
        let html = r#"
            <html><body>
                <a href="/job-detail/aaa">Job A</a>
                <a href="/about">About</a>
                <a href="https://www.dice.com/job-detail/bbb">Job B</a>
                <a href="/job-detail/aaa">Job A again</a>
            </body></html>
        "#;

        let links = extract_job_links(html, "https://www.dice.com");
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].as_str(), "https://www.dice.com/job-detail/aaa");
        assert_eq!(links[1].as_str(), "https://www.dice.com/job-detail/bbb");
        // 站点可能重复同一链接，核心流程不去重
        assert_eq!(links[2], links[0]);
    }

    #[test]
    fn test_search_url_encoding_and_paging() {
        let config = Config::default();
        let harvester = LinkHarvester::new(&config);
        let query = SearchQuery::new("data engineer", 45);

        assert_eq!(
            harvester.search_url(&query, 1),
            "https://www.dice.com/jobs/q-data%20engineer-jobs"
        );
        assert_eq!(
            harvester.search_url(&query, 3),
            "https://www.dice.com/jobs/q-data%20engineer-jobs?page=3"
        );
    }
}
