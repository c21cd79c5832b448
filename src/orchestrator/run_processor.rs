//! 运行编排器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次完整运行的调度和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志、获取浏览器、创建 Session
//! 2. **登录**：认证失败以零结果终止
//! 3. **采集**：获取职位链接序列（汇报采集进度）
//! 4. **逐个申请**：严格串行，一个会话一个登录身份，不并行
//! 5. **资源管理**：唯一持有 Session，所有退出路径上恰好释放一次
//! 6. **结果定稿**：导出 CSV 结果表并输出全局统计

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::Session;
use crate::models::{Credentials, Phase, ProgressEvent, RunAbort, RunResult, SearchQuery};
use crate::services::{LinkHarvester, LoginService, ProgressReporter, ReportWriter};
use crate::utils::logging::{init_log_file, log_final_stats, log_startup};
use crate::workflow::{ApplyFlow, JobCtx};

/// 应用主结构
pub struct App {
    config: Config,
    session: Session,
    progress: ProgressReporter,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config);

        // 获取浏览器：连接已有实例或启动无头浏览器
        let (browser, page) = if config.use_existing_browser {
            browser::connect_to_browser_and_page(
                config.browser_debug_port,
                Some(&config.base_url),
            )
            .await?
        } else {
            browser::launch_headless_browser(
                &config.base_url,
                config.chrome_executable.as_deref(),
            )
            .await?
        };

        // 创建 Session（持有 browser + page）
        let session = Session::new(
            browser,
            page,
            Duration::from_secs(config.element_timeout_secs),
        );

        Ok(Self {
            config,
            session,
            progress: ProgressReporter::new(),
        })
    }

    /// 订阅进度事件
    ///
    /// 接收端交给外部展示层（进度条/仪表盘）消费
    pub fn subscribe_progress(&mut self) -> UnboundedReceiver<ProgressEvent> {
        let (reporter, receiver) = ProgressReporter::with_channel();
        self.progress = reporter;
        receiver
    }

    /// 运行应用主逻辑
    ///
    /// 无论哪条路径退出，会话都恰好关闭一次
    pub async fn run(mut self) -> Result<RunResult> {
        let outcome = self.run_inner().await;

        if let Err(e) = self.session.close().await {
            warn!("⚠️ 关闭会话时出错: {}", e);
        }

        outcome
    }

    async fn run_inner(&mut self) -> Result<RunResult> {
        let credentials = Credentials::new(
            self.config.dice_email.clone(),
            self.config.dice_password.clone(),
        );
        let query = SearchQuery::new(&self.config.job_search_term, self.config.jobs_to_apply);

        let mut result = RunResult::new();

        // ========== 阶段 1: 登录 ==========
        let login = LoginService::new(&self.config);
        if let Err(e) = login.login(&self.session, &credentials).await {
            if e.is_auth_error() {
                error!("❌ 登录失败，本次运行以零结果终止: {}", e);
                result.abort(RunAbort::AuthenticationFailed);
                log_final_stats(&result, &self.config);
                return Ok(result);
            }
            // 登录之外的失败（浏览器本身出错）直接向上抛
            return Err(e.into());
        }

        // ========== 阶段 2: 采集职位链接 ==========
        let harvester = LinkHarvester::new(&self.config);
        let links = harvester
            .harvest(&self.session, &query, &self.progress)
            .await?;
        info!("✅ 共找到 {} 个职位链接", links.len());

        // ========== 阶段 3: 逐个申请 ==========
        // 一个会话一个登录身份，只能严格串行，不做任何并行
        let flow = ApplyFlow::new(&self.config);
        let total = links.len();

        for (index, link) in links.into_iter().enumerate() {
            let job_index = index + 1;
            let ctx = JobCtx::new(link, job_index, total, query.term.clone());

            info!("💼 正在申请第 {}/{} 个职位", job_index, total);
            self.progress.report(
                Phase::Applying,
                job_index as f64 / total as f64,
                format!("正在申请第 {}/{} 个职位", job_index, total),
            );

            match flow.run(&self.session, &ctx).await {
                Ok(outcome) => {
                    result.record(outcome);
                }
                Err(e) => {
                    // 会话失效：保留已有结果，终止剩余职位
                    error!("❌ 浏览器会话失效，终止剩余职位: {}", e);
                    self.progress.warn(
                        Phase::Applying,
                        job_index as f64 / total as f64,
                        "浏览器会话失效，运行提前终止",
                    );
                    result.abort(RunAbort::SessionLost);
                    break;
                }
            }

            // 职位之间固定停顿（限速礼貌，不是正确性要求）
            if job_index < total {
                sleep(Duration::from_millis(self.config.job_pause_ms)).await;
            }
        }

        // ========== 阶段 4: 导出与统计 ==========
        let writer = ReportWriter::new(self.config.output_csv_file.clone());
        match writer.write(&result) {
            Ok(path) => info!("📥 结果表已导出: {}", path),
            Err(e) => error!("❌ 导出结果表失败: {}", e),
        }

        log_final_stats(&result, &self.config);

        Ok(result)
    }
}
