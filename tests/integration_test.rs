use std::time::Duration;

use dice_auto_apply::browser::connect_to_browser_and_page;
use dice_auto_apply::infrastructure::Session;
use dice_auto_apply::orchestrator::App;
use dice_auto_apply::utils::logging;
use dice_auto_apply::Config;

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_browser_connection() {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 测试浏览器连接
    let result =
        connect_to_browser_and_page(config.browser_debug_port, Some(&config.base_url)).await;

    assert!(result.is_ok(), "应该能够成功连接浏览器");
}

#[tokio::test]
#[ignore]
async fn test_session_close_is_idempotent() {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    let (browser, page) =
        connect_to_browser_and_page(config.browser_debug_port, Some(&config.base_url))
            .await
            .expect("连接浏览器失败");

    let mut session = Session::new(browser, page, Duration::from_secs(10));

    // 连续关闭两次：第二次不应有任何副作用，也不应报错
    session.close().await.expect("第一次关闭应该成功");
    session.close().await.expect("第二次关闭应该静默成功");
    assert!(session.is_closed());
}

#[tokio::test]
#[ignore]
async fn test_full_run() {
    // 初始化日志
    logging::init();

    // 加载配置
    // 注意：需要设置 DICE_EMAIL / DICE_PASSWORD / JOB_SEARCH_TERM 环境变量
    let config = Config::from_env();

    let result = App::initialize(config)
        .await
        .expect("初始化应用失败")
        .run()
        .await
        .expect("运行失败");

    // 不变式：成功数 + 失败数 == 实际尝试的职位数
    assert_eq!(result.succeeded() + result.failed(), result.total());
}
