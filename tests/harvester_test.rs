use dice_auto_apply::models::{PageEstimate, Phase, ProgressLevel, SearchQuery};
use dice_auto_apply::services::{LinkHarvester, PageFetcher, ProgressReporter};
use dice_auto_apply::Config;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 构造指向 mock 服务器、页间零延迟的测试配置
fn test_config(server_uri: &str) -> Config {
    Config {
        base_url: server_uri.to_string(),
        page_delay_min_ms: 0,
        page_delay_max_ms: 0,
        ..Config::default()
    }
}

fn listing_page(ids: &[&str]) -> String {
    let anchors: String = ids
        .iter()
        .map(|id| format!(r#"<a href="/job-detail/{}">Job {}</a>"#, id, id))
        .collect();
    format!("<html><body>{}</body></html>", anchors)
}

#[tokio::test]
async fn test_fetcher_returns_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>ok</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new();
    let url = format!("{}/page", server.uri());

    let html = fetcher.fetch_html(&url).await.expect("抓取应该成功");
    assert_eq!(html, "<html>ok</html>");
}

#[tokio::test]
async fn test_fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new();
    let url = format!("{}/missing", server.uri());

    let result = fetcher.fetch_html(&url).await;
    assert!(result.is_err(), "404 应该视为抓取失败");
}

#[tokio::test]
async fn test_harvest_survives_single_page_failure() {
    let server = MockServer::start().await;

    // 第 1 页正常
    Mock::given(method("GET"))
        .and(path("/jobs/q-rust-jobs"))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(listing_page(&["a1", "a2"]), "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    // 第 2 页返回 500
    Mock::given(method("GET"))
        .and(path("/jobs/q-rust-jobs"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    // 第 3 页正常
    Mock::given(method("GET"))
        .and(path("/jobs/q-rust-jobs"))
        .and(query_param("page", "3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(listing_page(&["c1"]), "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let harvester = LinkHarvester::new(&config);
    let (reporter, mut events) = ProgressReporter::with_channel();

    // 请求 45 个、估计 300 个 ⇒ 3 页
    let query = SearchQuery::new("rust", 45);
    let links = harvester
        .harvest_pages(PageEstimate::fallback(300), &query, &reporter)
        .await
        .expect("单页失败不应让采集整体失败");

    // 第 1、3 页的链接保留，第 2 页被跳过
    assert_eq!(links.len(), 3);
    assert!(links[0].as_str().ends_with("/job-detail/a1"));
    assert!(links[2].as_str().ends_with("/job-detail/c1"));

    // 失败的页必须以 Warn 事件上报，不能静默丢失
    let mut saw_warning = false;
    while let Ok(event) = events.try_recv() {
        if event.phase == Phase::Harvesting && event.level == ProgressLevel::Warn {
            saw_warning = true;
        }
    }
    assert!(saw_warning, "跳过的页应该产生警告事件");
}

#[tokio::test]
async fn test_harvest_single_page_for_twenty_jobs() {
    let server = MockServer::start().await;

    let ids: Vec<String> = (0..20).map(|i| format!("job{}", i)).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();

    Mock::given(method("GET"))
        .and(path("/jobs/q-data%20engineer-jobs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(listing_page(&id_refs), "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let harvester = LinkHarvester::new(&config);
    let reporter = ProgressReporter::new();

    // 请求 20 个、估计值兜底 300 ⇒ 只抓 1 页
    let query = SearchQuery::new("data engineer", 20);
    let links = harvester
        .harvest_pages(PageEstimate::fallback(300), &query, &reporter)
        .await
        .unwrap();

    assert_eq!(links.len(), 20);
    assert!(links.iter().all(|l| l.as_str().contains("/job-detail/")));
}
