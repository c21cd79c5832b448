use anyhow::Result;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 连接到已运行的浏览器并获取页面
///
/// 优先复用已经打开目标站点的页面，找不到时创建新页面。
/// 适用于远程调试模式下已登录过的浏览器实例
pub async fn connect_to_browser_and_page(
    port: u16,
    target_url: Option<&str>,
) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);
    debug!("目标 URL: {:?}", target_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        e
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await?;
    debug!("获取到 {} 个页面", pages.len());

    // 如果指定了目标 URL，尝试复用已打开同站点的页面
    if let Some(url) = target_url {
        if let Some(host) = host_of(url) {
            debug!("正在查找已打开 '{}' 的页面", host);
            for p in pages.iter() {
                if let Ok(Some(page_url)) = p.url().await {
                    debug!("检查页面: {}", page_url);
                    if page_url.contains(&host) {
                        info!("✓ 复用已打开的页面: {}", page_url);
                        return Ok((browser, p.clone()));
                    }
                }
            }
        }
        debug!("未找到匹配的页面，将创建新页面");

        let page = browser.new_page("about:blank").await.map_err(|e| {
            error!("创建新页面失败: {}", e);
            e
        })?;
        page.goto(url).await.map_err(|e| {
            error!("导航到 {} 失败: {}", url, e);
            e
        })?;
        info!("已导航到: {}", url);
        return Ok((browser, page));
    }

    // 没有目标 URL 时创建空白页面
    debug!("创建空白页面");
    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建空白页面失败: {}", e);
        e
    })?;

    Ok((browser, page))
}

/// 提取 URL 的主机名部分，用于页面匹配
fn host_of(url: &str) -> Option<String> {
    let rest = url.strip_prefix("https://").or_else(|| url.strip_prefix("http://"))?;
    let host = rest.split('/').next()?;
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_of() {
        assert_eq!(
            host_of("https://www.dice.com/dashboard/login"),
            Some("www.dice.com".to_string())
        );
        assert_eq!(host_of("http://localhost:9222"), Some("localhost:9222".to_string()));
        assert_eq!(host_of("not a url"), None);
    }
}
