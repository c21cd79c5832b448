//! 职位处理上下文
//!
//! 封装"我正在申请第几个职位、链接是什么"这一信息

use std::fmt::Display;

use crate::models::ListingLink;

/// 职位处理上下文
///
/// 包含申请单个职位所需的所有上下文信息
#[derive(Debug, Clone)]
pub struct JobCtx {
    /// 职位详情页链接
    pub link: ListingLink,

    /// 职位索引（从1开始，仅用于日志显示）
    pub job_index: usize,

    /// 本次运行的职位总数
    pub total_jobs: usize,

    /// 职位标题（结果表中记录搜索关键词）
    pub title: String,
}

impl JobCtx {
    /// 创建新的职位上下文
    pub fn new(link: ListingLink, job_index: usize, total_jobs: usize, title: String) -> Self {
        Self {
            link,
            job_index,
            total_jobs,
            title,
        }
    }
}

impl Display for JobCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[职位 {}/{}]", self.job_index, self.total_jobs)
    }
}
