//! 有界轮询等待原语 - 基础设施层
//!
//! 被驱动的页面是第三方站点，没有任何完成回调可用，
//! 所以全部等待都是带超时上限的轮询，绝不无限阻塞

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};

/// 轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 反复执行 `check` 直到它返回 Some 或超时
///
/// # 参数
/// - `timeout`: 等待上限
/// - `check`: 每次轮询执行的检查，返回 Some 表示条件满足
///
/// # 返回
/// 条件满足时返回 Some(值)，超时返回 None
pub async fn poll_until<F, Fut, T>(timeout: Duration, mut check: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(value) = check().await {
            return Some(value);
        }
        if Instant::now() + POLL_INTERVAL > deadline {
            return None;
        }
        sleep(POLL_INTERVAL).await;
    }
}
