//! 浏览器会话句柄 - 基础设施层
//!
//! 持有唯一的 Browser + Page 资源，只暴露能力：
//! 导航、带超时的元素查找、点击、执行脚本。
//! 不认识职位 / 链接，不处理业务流程

use std::time::Duration;

use chromiumoxide::{Browser, Element, Page};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::infrastructure::wait::poll_until;

/// 浏览器会话句柄
///
/// 职责：
/// - 持有唯一的 Browser 和 Page 资源
/// - 所有元素查找都是带超时的轮询等待，绝不无限阻塞
/// - 查找超时返回结构化的 ElementNotFound，调用方可以据此分支
/// - close() 幂等，重复调用无副作用
pub struct Session {
    browser: Browser,
    page: Page,
    element_timeout: Duration,
    closed: bool,
}

impl Session {
    /// 创建新的会话句柄
    pub fn new(browser: Browser, page: Page, element_timeout: Duration) -> Self {
        Self {
            browser,
            page,
            element_timeout,
            closed: false,
        }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 导航到指定 URL
    pub async fn navigate(&self, url: &str) -> AppResult<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| AppError::navigation_failed(url, e))?;
        Ok(())
    }

    /// 在默认超时内轮询查找元素
    pub async fn find_element(&self, selector: &str) -> AppResult<Element> {
        self.find_element_with_timeout(selector, self.element_timeout)
            .await
    }

    /// 在指定超时内轮询查找元素
    ///
    /// # 返回
    /// 超时未找到时返回 ElementNotFound，而不是无结构的错误
    pub async fn find_element_with_timeout(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> AppResult<Element> {
        let page = &self.page;
        let found = poll_until(timeout, move || {
            let sel = selector.to_string();
            async move { page.find_element(sel).await.ok() }
        })
        .await;

        found.ok_or_else(|| AppError::element_not_found(selector, timeout.as_secs()))
    }

    /// 等待元素出现且可点击（存在、未禁用、有可见尺寸）
    pub async fn wait_until_clickable(&self, selector: &str, timeout: Duration) -> AppResult<()> {
        let js_code = format!(
            r#"
            (function() {{
                const el = document.querySelector({});
                if (!el || el.disabled) {{
                    return false;
                }}
                const rect = el.getBoundingClientRect();
                return rect.width > 0 && rect.height > 0;
            }})()
            "#,
            serde_json::to_string(selector)?
        );

        let page = &self.page;
        let clickable = poll_until(timeout, move || {
            let js = js_code.clone();
            async move {
                let result = page.evaluate(js).await.ok()?;
                match result.into_value::<bool>() {
                    Ok(true) => Some(()),
                    _ => None,
                }
            }
        })
        .await;

        clickable.ok_or_else(|| AppError::element_not_clickable(selector))
    }

    /// 查找元素并点击
    pub async fn click(&self, selector: &str) -> AppResult<()> {
        let element = self.find_element(selector).await?;
        element
            .click()
            .await
            .map_err(|_| AppError::element_not_clickable(selector))?;
        Ok(())
    }

    /// 查找输入框并键入文本
    pub async fn type_text(&self, selector: &str, text: &str) -> AppResult<()> {
        let element = self.find_element(selector).await?;
        element
            .click()
            .await
            .map_err(|_| AppError::element_not_clickable(selector))?
            .type_str(text)
            .await?;
        Ok(())
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn run_script(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn run_script_as<T: DeserializeOwned>(
        &self,
        js_code: impl Into<String>,
    ) -> AppResult<T> {
        let json_value = self.run_script(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 点击封装在 shadow DOM 内部的控件
    ///
    /// 普通选择器无法穿透 shadowRoot，只能通过脚本遍历。
    /// 调用方保持选择器无关，宿主元素是否存在请先用 find_element 确认
    ///
    /// # 参数
    /// - `host_selector`: shadow 宿主元素的选择器
    /// - `inner_selector`: shadowRoot 内部控件的选择器
    pub async fn click_in_shadow(
        &self,
        host_selector: &str,
        inner_selector: &str,
    ) -> AppResult<()> {
        let js_code = format!(
            r#"
            (function() {{
                const host = document.querySelector({});
                if (!host || !host.shadowRoot) {{
                    return false;
                }}
                const control = host.shadowRoot.querySelector({});
                if (!control) {{
                    return false;
                }}
                control.click();
                return true;
            }})()
            "#,
            serde_json::to_string(host_selector)?,
            serde_json::to_string(inner_selector)?
        );

        let clicked: bool = self.run_script_as(js_code).await?;
        if clicked {
            Ok(())
        } else {
            Err(AppError::element_not_clickable(host_selector))
        }
    }

    /// 在超时内等待并点击包含指定可见文本的元素
    ///
    /// # 参数
    /// - `selector`: 候选元素的选择器
    /// - `text`: 元素可见文本需要包含的内容
    pub async fn click_by_text(
        &self,
        selector: &str,
        text: &str,
        timeout: Duration,
    ) -> AppResult<()> {
        let js_code = format!(
            r#"
            (function() {{
                const text = {};
                const candidates = document.querySelectorAll({});
                for (const el of candidates) {{
                    if (el.textContent && el.textContent.includes(text)) {{
                        el.click();
                        return true;
                    }}
                }}
                return false;
            }})()
            "#,
            serde_json::to_string(text)?,
            serde_json::to_string(selector)?
        );

        let page = &self.page;
        let clicked = poll_until(timeout, move || {
            let js = js_code.clone();
            async move {
                let result = page.evaluate(js).await.ok()?;
                match result.into_value::<bool>() {
                    Ok(true) => Some(()),
                    _ => None,
                }
            }
        })
        .await;

        clicked.ok_or_else(|| {
            AppError::element_not_found(
                format!("{} (文本: {})", selector, text),
                timeout.as_secs(),
            )
        })
    }

    /// 探测会话是否仍然存活
    ///
    /// 连最简单的脚本都无法执行时，说明浏览器会话已经失效
    pub async fn is_alive(&self) -> bool {
        matches!(
            self.run_script_as::<i64>("1 + 1").await,
            Ok(2)
        )
    }

    /// 关闭会话，终止底层浏览器
    ///
    /// 幂等：重复调用直接返回，不报错
    pub async fn close(&mut self) -> AppResult<()> {
        if self.closed {
            debug!("会话已关闭，跳过重复关闭");
            return Ok(());
        }
        self.closed = true;

        if let Err(e) = self.browser.close().await {
            warn!("⚠️ 关闭浏览器时出错（忽略）: {}", e);
        }
        let _ = self.browser.wait().await;

        info!("✓ 浏览器会话已关闭");
        Ok(())
    }

    /// 会话是否已关闭
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
