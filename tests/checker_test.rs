//! 健康检测集成测试
//!
//! 使用 mockito 启动本地HTTP服务，覆盖真实的 reqwest 传输路径

use app_vitals::config::Config;
use app_vitals::health::{
    HealthChecker, HealthStatus, HttpHealthChecker, Report, TargetSpec,
};
use mockito::Matcher;
use serde_json::json;

fn fast_config() -> Config {
    Config {
        timeout: 2.0,
        retry_attempts: 3,
        retry_delay: 0.0,
        ..Default::default()
    }
}

fn checker(config: &Config) -> HttpHealthChecker {
    HttpHealthChecker::new(config)
        .expect("创建检测器失败")
        .with_progress(false)
}

#[tokio::test]
async fn test_healthy_endpoint_is_up() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body("All systems running")
        .expect(1)
        .create_async()
        .await;

    let target = TargetSpec::new(format!("{}/health", server.url())).with_name("API");
    let result = checker(&fast_config()).check(&target).await;

    mock.assert_async().await;
    assert_eq!(result.name, "API");
    assert_eq!(result.status, HealthStatus::Up);
    assert_eq!(result.status_code, Some(200));
    assert!(result.response_time_ms.is_some());
    assert!(result.error.is_none());

    let analysis = result.content_analysis.expect("缺少内容分析");
    assert!(!analysis.has_critical_keywords);
    assert!(analysis.has_success_keywords);
}

#[tokio::test]
async fn test_critical_keyword_marks_down_without_retry() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_body("Database error occurred")
        .expect(1)
        .create_async()
        .await;

    let target = TargetSpec::new(server.url());
    let result = checker(&fast_config()).check(&target).await;

    mock.assert_async().await;
    assert_eq!(result.status, HealthStatus::Down);
    assert_eq!(result.status_code, Some(200));
    assert!(result.error.is_none());
    assert!(result.content_analysis.unwrap().has_critical_keywords);
}

#[tokio::test]
async fn test_unexpected_status_is_down_without_retry() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/status")
        .with_status(503)
        .with_body("Service Unavailable")
        .expect(1)
        .create_async()
        .await;

    let target = TargetSpec::new(format!("{}/status", server.url()));
    let result = checker(&fast_config()).check(&target).await;

    mock.assert_async().await;
    assert_eq!(result.status, HealthStatus::Down);
    assert_eq!(result.status_code, Some(503));
}

#[tokio::test]
async fn test_post_sends_headers_and_json_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/health")
        .match_header("x-api-key", "secret")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"check": "deep"})))
        .with_status(201)
        .with_body("{\"status\": \"ok\"}")
        .expect(1)
        .create_async()
        .await;

    let target = TargetSpec::new(format!("{}/api/health", server.url()))
        .with_method("post")
        .with_header("X-Api-Key", "secret")
        .with_body(json!({"check": "deep"}));
    let result = checker(&fast_config()).check(&target).await;

    mock.assert_async().await;
    assert_eq!(result.status, HealthStatus::Up);
    assert_eq!(result.status_code, Some(201));
}

#[tokio::test]
async fn test_string_body_sent_raw() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/raw")
        .match_body("ping")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let target = TargetSpec::new(format!("{}/raw", server.url()))
        .with_method("PUT")
        .with_body(json!("ping"));
    let result = checker(&fast_config()).check(&target).await;

    mock.assert_async().await;
    assert_eq!(result.status, HealthStatus::Up);
    assert_eq!(result.status_code, Some(204));
}

#[tokio::test]
async fn test_unreachable_target_is_down_with_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = Config {
        retry_attempts: 2,
        ..fast_config()
    };
    let target = TargetSpec::new(format!("http://127.0.0.1:{port}/")).with_name("Dead");
    let result = checker(&config).check(&target).await;

    assert_eq!(result.status, HealthStatus::Down);
    assert!(result.status_code.is_none());
    assert!(result.response_time_ms.is_none());
    assert!(result.content_analysis.is_none());
    assert!(result.error.is_some());
}

#[tokio::test]
async fn test_invalid_method_is_down() {
    let target = TargetSpec::new("http://127.0.0.1:1/").with_method("BAD METHOD");
    let result = checker(&fast_config()).check(&target).await;

    assert_eq!(result.status, HealthStatus::Down);
    assert!(result.error.unwrap().contains("BAD METHOD"));
}

#[tokio::test]
async fn test_malformed_url_is_down_after_retries() {
    let config = Config {
        retry_attempts: 2,
        ..fast_config()
    };
    let target = TargetSpec::new("not a url").with_name("Broken");
    let result = checker(&config).check(&target).await;

    assert_eq!(result.status, HealthStatus::Down);
    assert!(result.status_code.is_none());
    assert!(result.error.unwrap().contains("Invalid URL"));
}

#[tokio::test]
async fn test_check_all_summary() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/ok")
        .with_status(200)
        .with_body("healthy")
        .create_async()
        .await;
    server
        .mock("GET", "/also-ok")
        .with_status(200)
        .with_body("OK")
        .create_async()
        .await;
    server
        .mock("GET", "/broken")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let targets = vec![
        TargetSpec::new(format!("{}/ok", server.url())).with_name("One"),
        TargetSpec::new(format!("{}/broken", server.url())).with_name("Two"),
        TargetSpec::new(format!("{}/also-ok", server.url())).with_name("Three"),
    ];

    let config = Config {
        max_concurrent_checks: 3,
        ..fast_config()
    };
    let results = checker(&config).check_all(&targets).await;

    let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["One", "Two", "Three"]);

    let report = Report::summarize(&results);
    assert_eq!(report.total, 3);
    assert_eq!(report.up, 2);
    assert_eq!(report.down, 1);
    assert_eq!(report.success_rate_display(), "66.7%");
    assert!(!report.all_up);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "Two");
    assert!(report.response_times.is_some());
}
