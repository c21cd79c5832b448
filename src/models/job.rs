//! 运行输入数据模型
//!
//! 封装一次运行的不可变输入：登录凭证、搜索条件，
//! 以及采集过程产生的链接和总数估计

use std::fmt::Display;

/// 登录凭证
///
/// 一次性传入，核心流程不做任何持久化
#[derive(Clone)]
pub struct Credentials {
    /// 登录邮箱
    pub email: String,
    /// 登录密码
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// 密码不进入任何日志输出
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"******")
            .finish()
    }
}

/// 职位搜索条件
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// 搜索关键词
    pub term: String,
    /// 期望申请的职位数量（已限制在 1-1000 范围内）
    pub requested_count: usize,
}

impl SearchQuery {
    /// 创建搜索条件，申请数量限制在 1-1000
    pub fn new(term: impl Into<String>, requested_count: usize) -> Self {
        Self {
            term: term.into(),
            requested_count: requested_count.clamp(1, 1000),
        }
    }

    /// URL 编码后的关键词（空格替换为 %20）
    pub fn encoded_term(&self) -> String {
        self.term.replace(' ', "%20")
    }
}

/// 职位详情页链接
///
/// 由采集器产生，申请执行器消费。站点可能在多页间重复同一链接，
/// 核心流程不做去重
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLink(pub String);

impl ListingLink {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ListingLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 总职位数估计的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateSource {
    /// 从首页成功解析
    Parsed,
    /// 解析失败，使用默认值
    Default,
}

/// 总职位数估计
///
/// 每次运行从第一个搜索结果页推导一次，只用于限制抓取的页数
#[derive(Debug, Clone, Copy)]
pub struct PageEstimate {
    pub total_available: usize,
    pub source: EstimateSource,
}

impl PageEstimate {
    pub fn parsed(total: usize) -> Self {
        Self {
            total_available: total,
            source: EstimateSource::Parsed,
        }
    }

    pub fn fallback(default_total: usize) -> Self {
        Self {
            total_available: default_total,
            source: EstimateSource::Default,
        }
    }

    /// 估计值是否来自解析失败后的兜底
    pub fn is_fallback(&self) -> bool {
        self.source == EstimateSource::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_clamps_count() {
        assert_eq!(SearchQuery::new("rust", 0).requested_count, 1);
        assert_eq!(SearchQuery::new("rust", 20).requested_count, 20);
        assert_eq!(SearchQuery::new("rust", 5000).requested_count, 1000);
    }

    #[test]
    fn test_encoded_term() {
        let query = SearchQuery::new("data engineer", 10);
        assert_eq!(query.encoded_term(), "data%20engineer");
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("user@example.com", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("user@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_page_estimate_fallback() {
        let estimate = PageEstimate::fallback(300);
        assert_eq!(estimate.total_available, 300);
        assert!(estimate.is_fallback());

        let parsed = PageEstimate::parsed(1234);
        assert_eq!(parsed.total_available, 1234);
        assert!(!parsed.is_fallback());
    }
}
