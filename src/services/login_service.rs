//! 登录服务 - 业务能力层
//!
//! 驱动目标站点的登录界面完成认证。这里驱动的是第三方登录 UI，
//! 不实现任何认证协议

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, AuthError};
use crate::infrastructure::Session;
use crate::models::Credentials;

/// 登录页各控件的选择器
const EMAIL_INPUT: &str = r#"input[name="email"]"#;
const SIGN_IN_BUTTON: &str = r#"[data-testid="sign-in-button"]"#;
const PASSWORD_INPUT: &str = r#"input[name="password"]"#;
const SUBMIT_PASSWORD_BUTTON: &str = r#"[data-testid="submit-password"]"#;

/// 登录服务
///
/// 职责：
/// - 按顺序驱动邮箱输入、确认、密码输入、提交四个步骤
/// - 任何一步超时即视为认证失败（调用方以零结果终止运行）
/// - 提交后固定等待一段时间，再用 URL 检查确认已离开登录页
pub struct LoginService {
    login_path: String,
    settle: Duration,
}

impl LoginService {
    /// 创建新的登录服务
    pub fn new(config: &Config) -> Self {
        Self {
            login_path: format!("{}/dashboard/login", config.base_url),
            settle: Duration::from_secs(config.login_settle_secs),
        }
    }

    /// 登录目标站点
    ///
    /// # 返回
    /// 登录步骤超时或提交后仍停留在登录页时返回认证错误
    pub async fn login(&self, session: &Session, credentials: &Credentials) -> AppResult<()> {
        info!("🔐 正在登录: {}", self.login_path);
        session.navigate(&self.login_path).await?;

        // 输入邮箱
        self.step(session.type_text(EMAIL_INPUT, &credentials.email).await, "输入邮箱")?;
        info!("✅ 邮箱输入完成");

        // 点击确认按钮，等待密码输入框出现
        self.step(session.click(SIGN_IN_BUTTON).await, "点击确认按钮")?;
        info!("✅ 已点击确认按钮，等待密码输入框...");

        // 输入密码
        self.step(
            session.type_text(PASSWORD_INPUT, &credentials.password).await,
            "输入密码",
        )?;
        info!("✅ 密码输入完成");

        // 提交密码
        self.step(session.click(SUBMIT_PASSWORD_BUTTON).await, "提交密码")?;
        info!("✅ 密码已提交，等待登录完成...");

        // 站点没有任何登录完成的回调可以等待，只能固定停顿
        sleep(self.settle).await;

        // 停顿之后确认已经离开登录页，避免慢登录被误判为成功
        self.confirm_logged_in(session).await?;

        info!("✅ 登录成功");
        Ok(())
    }

    /// 把元素查找超时归一为认证错误
    fn step(&self, result: AppResult<()>, step_name: &str) -> AppResult<()> {
        result.map_err(|e| {
            warn!("❌ 登录步骤 '{}' 失败: {}", step_name, e);
            if e.is_session_lost() {
                e
            } else {
                AppError::auth_step_timeout(step_name)
            }
        })
    }

    /// 登录后的确认检查：仍停留在登录页说明凭证被拒绝或登录过慢
    async fn confirm_logged_in(&self, session: &Session) -> AppResult<()> {
        let current_url: String = session
            .run_script_as("window.location.href")
            .await
            .unwrap_or_default();

        if current_url.contains("/dashboard/login") {
            warn!("❌ 提交后仍停留在登录页: {}", current_url);
            return Err(AppError::Auth(AuthError::LoginRejected));
        }
        Ok(())
    }
}
