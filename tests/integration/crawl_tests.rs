//! Integration tests for the archive crawler
//!
//! These tests use wiremock to serve archive listing pages and run the full
//! crawl cycle end-to-end, down to the committed CSV file.

use archive_sweep::config::{
    Config, CrawlerConfig, OutputConfig, SelectorConfig, UserAgentConfig, WindowConfig,
};
use archive_sweep::crawler::{crawl_archive, Coordinator, CrawlOutcome};
use archive_sweep::state::DateTermination;
use archive_sweep::{ArchiveError, CrawlWindow};
use chrono::NaiveDate;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock archive
fn create_test_config(archive_url: &str, output_dir: &Path, date_workers: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            archive_url: archive_url.to_string(),
            max_retries: 3,
            retry_base_delay: 1, // Very short for testing
            page_delay: 0,
            request_timeout: 30,
            date_workers,
            crawl_timeout: None,
        },
        user_agent: UserAgentConfig::default(),
        selectors: SelectorConfig {
            headline: "h2.headline a".to_string(),
            category: "span.kind".to_string(),
            pagination: ".pagination a".to_string(),
        },
        output: OutputConfig {
            directory: output_dir.display().to_string(),
            file_prefix: "econ".to_string(),
        },
        window: None,
    }
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

/// Renders a listing page; each item is `(category, title, href)`
fn listing(items: &[(&str, &str, &str)], pages: u32) -> String {
    let mut html = String::from("<html><body><main>");
    for (category, title, href) in items {
        html.push_str(&format!(
            r#"<div class="item"><span class="kind">{}</span><h2 class="headline"><a href="{}">{}</a></h2></div>"#,
            category, href, title
        ));
    }
    if pages > 1 {
        html.push_str(r#"<div class="pagination">"#);
        for page in 1..=pages {
            html.push_str(&format!(r#"<a href="?page={0}">{0}</a>"#, page));
        }
        html.push_str(r#"<a href="?page=2">Next</a></div>"#);
    }
    html.push_str("</main></body></html>");
    html
}

fn empty_listing() -> String {
    "<html><body><main><p>No articles found.</p></main></body></html>".to_string()
}

async fn mount_page(server: &MockServer, day: u32, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/news/archive/2024/01/{:02}", day)))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn read_dataset(outcome: &CrawlOutcome) -> String {
    let dataset = outcome.dataset().expect("crawl should have committed a dataset");
    std::fs::read_to_string(&dataset.path).expect("dataset file should exist")
}

#[tokio::test]
async fn test_full_crawl_visits_pages_in_order() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    // Page 1 is fetched once for pagination discovery and once for articles
    Mock::given(method("GET"))
        .and(path("/news/archive/2024/01/01"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(
            &[
                ("U.S. Economy", "Fed Holds Rates", "/articles/fed"),
                ("Sports", "Team Wins", "/articles/team"),
            ],
            2,
        )))
        .expect(2)
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        1,
        2,
        listing(&[("U.S. Markets", "Stocks Rally", "/articles/stocks")], 2),
    )
    .await;
    mount_page(&mock_server, 1, 3, empty_listing()).await;
    mount_page(&mock_server, 2, 1, empty_listing()).await;

    let config = create_test_config(&mock_server.uri(), output.path(), 1);
    let outcome = crawl_archive(config, date(1), date(2)).await.unwrap();

    let content = read_dataset(&outcome);
    assert_eq!(
        content,
        "Date,Title,Category,URL\n\
         2024/01/01,Fed Holds Rates,U.S. Economy,/articles/fed\n\
         2024/01/01,Stocks Rally,U.S. Markets,/articles/stocks\n"
    );
    assert_eq!(
        outcome.dataset().unwrap().path,
        output.path().join("econ_20240101_20240102.csv")
    );

    let visited: Vec<String> = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| format!("{}?{}", r.url.path(), r.url.query().unwrap_or_default()))
        .collect();
    assert_eq!(
        visited,
        vec![
            "/news/archive/2024/01/01?page=1",
            "/news/archive/2024/01/01?page=1",
            "/news/archive/2024/01/01?page=2",
            "/news/archive/2024/01/01?page=3",
            "/news/archive/2024/01/02?page=1",
            "/news/archive/2024/01/02?page=1",
        ]
    );

    let report = outcome.report();
    assert!(!report.is_partial());
    assert_eq!(report.dates[0].pages_crawled, 2);
    assert_eq!(report.dates[0].max_pages, 2);
    assert_eq!(report.dates[0].headlines_seen, 3);
    assert_eq!(report.dates[1].articles, 0);
}

#[tokio::test]
async fn test_failed_page_ends_its_date_only() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        1,
        1,
        listing(&[("U.S. Economy", "Jobs Report", "/jobs")], 3),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/news/archive/2024/01/01"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news/archive/2024/01/01"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(empty_listing()))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        2,
        1,
        listing(&[("U.S. Markets", "Bonds Slip", "/bonds")], 1),
    )
    .await;
    mount_page(&mock_server, 2, 2, empty_listing()).await;

    let config = create_test_config(&mock_server.uri(), output.path(), 2);
    let outcome = crawl_archive(config, date(1), date(2)).await.unwrap();

    let content = read_dataset(&outcome);
    assert_eq!(
        content,
        "Date,Title,Category,URL\n\
         2024/01/01,Jobs Report,U.S. Economy,/jobs\n\
         2024/01/02,Bonds Slip,U.S. Markets,/bonds\n"
    );

    let report = outcome.report();
    assert!(report.is_partial());
    assert_eq!(report.failed_urls.len(), 1);
    let failed = &report.failed_urls[0];
    assert_eq!(
        failed.url,
        format!("{}/news/archive/2024/01/01?page=2", mock_server.uri())
    );
    assert_eq!(failed.attempts, 3);
    assert_eq!(failed.last_error, "status code: 500");
    assert_eq!(report.dates[0].termination, DateTermination::FetchFailed);
    assert_eq!(report.dates[1].termination, DateTermination::Exhausted);
}

#[tokio::test]
async fn test_no_articles_writes_no_file() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let output_dir = output.path().join("raw");

    mount_page(
        &mock_server,
        1,
        1,
        listing(&[("Opinion", "A Column", "/column")], 1),
    )
    .await;
    mount_page(&mock_server, 1, 2, empty_listing()).await;

    let config = create_test_config(&mock_server.uri(), &output_dir, 1);
    let outcome = crawl_archive(config, date(1), date(1)).await.unwrap();

    assert!(outcome.is_empty());
    assert_eq!(outcome.report().total_articles, 0);
    assert_eq!(outcome.report().dates[0].headlines_seen, 1);
    assert!(!output_dir.exists());
}

#[tokio::test]
async fn test_transient_errors_are_retried() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/news/archive/2024/01/01"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        1,
        1,
        listing(&[("U.S. Economy", "Inflation Cools", "/cpi")], 1),
    )
    .await;
    mount_page(&mock_server, 1, 2, empty_listing()).await;

    let config = create_test_config(&mock_server.uri(), output.path(), 1);
    let outcome = crawl_archive(config, date(1), date(1)).await.unwrap();

    let report = outcome.report();
    assert!(report.failed_urls.is_empty());
    assert!(!report.dates[0].discovery_failed);
    assert_eq!(outcome.dataset().unwrap().articles.len(), 1);
}

#[tokio::test]
async fn test_failed_pagination_probe_is_tolerated() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    // Enough failures to exhaust the probe, after which page 1 recovers
    Mock::given(method("GET"))
        .and(path("/news/archive/2024/01/01"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(3)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        1,
        1,
        listing(&[("U.S. Markets", "Dollar Gains", "/fx")], 4),
    )
    .await;
    mount_page(
        &mock_server,
        1,
        2,
        listing(&[("U.S. Markets", "Oil Falls", "/oil")], 4),
    )
    .await;
    mount_page(&mock_server, 1, 3, empty_listing()).await;

    let config = create_test_config(&mock_server.uri(), output.path(), 1);
    let outcome = crawl_archive(config, date(1), date(1)).await.unwrap();

    let report = outcome.report();
    assert!(report.failed_urls.is_empty());
    assert!(!report.is_partial());
    assert!(report.dates[0].discovery_failed);
    assert_eq!(report.dates[0].max_pages, 1);
    assert_eq!(report.dates[0].pages_crawled, 2);

    let titles: Vec<_> = outcome
        .dataset()
        .unwrap()
        .articles
        .iter()
        .map(|a| a.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Dollar Gains", "Oil Falls"]);
}

#[tokio::test]
async fn test_rerun_produces_identical_bytes() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        1,
        1,
        listing(
            &[
                ("U.S. Economy", "Retail Sales, Revised", "/retail"),
                ("U.S. Markets", "\"Risk-On\" Returns", "/risk"),
            ],
            1,
        ),
    )
    .await;
    mount_page(&mock_server, 1, 2, empty_listing()).await;

    let config = create_test_config(&mock_server.uri(), output.path(), 1);
    let first = crawl_archive(config.clone(), date(1), date(1)).await.unwrap();
    let first_bytes = std::fs::read(&first.dataset().unwrap().path).unwrap();

    let second = crawl_archive(config, date(1), date(1)).await.unwrap();
    let second_bytes = std::fs::read(&second.dataset().unwrap().path).unwrap();

    assert_eq!(first_bytes, second_bytes);
    assert_eq!(
        String::from_utf8(first_bytes).unwrap(),
        "Date,Title,Category,URL\n\
         2024/01/01,\"Retail Sales, Revised\",U.S. Economy,/retail\n\
         2024/01/01,\"\"\"Risk-On\"\" Returns\",U.S. Markets,/risk\n"
    );
}

#[tokio::test]
async fn test_deadline_commits_partial_results() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        1,
        1,
        listing(&[("U.S. Economy", "GDP Beats", "/gdp")], 2),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/news/archive/2024/01/01"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(empty_listing())
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), output.path(), 1);
    config.crawler.crawl_timeout = Some(1);

    let started = Instant::now();
    let outcome = crawl_archive(config, date(1), date(2)).await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(10));

    let report = outcome.report();
    assert!(report.cancelled);
    assert!(report.is_partial());
    assert_eq!(report.dates[0].termination, DateTermination::Cancelled);
    assert_eq!(report.dates[1].termination, DateTermination::Cancelled);
    assert_eq!(report.partial_dates(), 2);

    let content = read_dataset(&outcome);
    assert_eq!(
        content,
        "Date,Title,Category,URL\n2024/01/01,GDP Beats,U.S. Economy,/gdp\n"
    );
}

#[tokio::test]
async fn test_concurrent_dates_keep_date_order() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    // The first date answers last
    Mock::given(method("GET"))
        .and(path("/news/archive/2024/01/01"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing(&[("U.S. Economy", "Day One", "/1")], 1))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        2,
        1,
        listing(&[("U.S. Economy", "Day Two", "/2")], 1),
    )
    .await;
    mount_page(
        &mock_server,
        3,
        1,
        listing(&[("U.S. Markets", "Day Three", "/3")], 1),
    )
    .await;
    for day in 1..=3 {
        mount_page(&mock_server, day, 2, empty_listing()).await;
    }

    let config = create_test_config(&mock_server.uri(), output.path(), 3);
    let outcome = crawl_archive(config, date(1), date(3)).await.unwrap();

    let content = read_dataset(&outcome);
    assert_eq!(
        content,
        "Date,Title,Category,URL\n\
         2024/01/01,Day One,U.S. Economy,/1\n\
         2024/01/02,Day Two,U.S. Economy,/2\n\
         2024/01/03,Day Three,U.S. Markets,/3\n"
    );
    let dates: Vec<_> = outcome.report().dates.iter().map(|d| d.date).collect();
    assert_eq!(dates, vec![date(1), date(2), date(3)]);
}

#[tokio::test]
async fn test_inverted_window_sends_no_requests() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), output.path(), 1);
    let result = crawl_archive(config, date(5), date(4)).await;

    match result {
        Err(ArchiveError::InvalidRange { start, end }) => {
            assert_eq!(start, date(5));
            assert_eq!(end, date(4));
        }
        other => panic!("expected InvalidRange, got {:?}", other),
    }
}

#[tokio::test]
async fn test_explicit_window_ignores_inverted_config_window() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        1,
        1,
        listing(&[("U.S. Economy", "Payrolls Jump", "/payrolls")], 1),
    )
    .await;
    mount_page(&mock_server, 1, 2, empty_listing()).await;

    let mut config = create_test_config(&mock_server.uri(), output.path(), 1);
    config.window = Some(WindowConfig {
        start_date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    });

    let outcome = crawl_archive(config, date(1), date(1)).await.unwrap();

    assert_eq!(
        read_dataset(&outcome),
        "Date,Title,Category,URL\n2024/01/01,Payrolls Jump,U.S. Economy,/payrolls\n"
    );
}

#[tokio::test]
async fn test_cancelled_before_start_crawls_nothing() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), output.path(), 2);
    let coordinator = Coordinator::new(config).unwrap();
    let window = CrawlWindow::new(date(1), date(3)).unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let outcome = coordinator.run_with_cancellation(&window, cancel).await.unwrap();

    assert!(outcome.is_empty());
    assert!(outcome.report().cancelled);
    assert_eq!(outcome.report().partial_dates(), 3);
}
