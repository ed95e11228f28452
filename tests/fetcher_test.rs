// Tests for ArchiveFetcher against a mocked archive
// Uses mockito for HTTP mocking

mod common;

use mockito::{Matcher, Server};
use std::time::Duration;
use weather_archive_service::fetch_error::FetchError;
use weather_archive_service::fetcher::ArchiveFetcher;

fn create_test_fetcher(url: String) -> ArchiveFetcher {
    ArchiveFetcher::new(url, Duration::from_secs(5)).unwrap()
}

fn nyc_january_params() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("latitude".into(), "40.7128".into()),
        Matcher::UrlEncoded("longitude".into(), "-74.006".into()),
        Matcher::UrlEncoded("start_date".into(), "2023-01-01".into()),
        Matcher::UrlEncoded("end_date".into(), "2023-01-31".into()),
        Matcher::UrlEncoded(
            "daily".into(),
            "temperature_2m_max,temperature_2m_min,temperature_2m_mean,\
             apparent_temperature_max,apparent_temperature_min,apparent_temperature_mean"
                .into(),
        ),
        Matcher::UrlEncoded("timezone".into(), "auto".into()),
    ])
}

#[tokio::test]
async fn test_fetch_daily_success() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/v1/archive")
        .match_query(nyc_january_params())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::nyc_january_payload().to_string())
        .create_async()
        .await;

    let fetcher = create_test_fetcher(server.url() + "/v1/archive");
    let data = fetcher
        .fetch_daily(&common::nyc_january_query())
        .await
        .unwrap();

    // Payload comes back untouched
    assert_eq!(data, common::nyc_january_payload());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_daily_bad_request() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/v1/archive")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error": true, "reason": "Parameter 'start_date' is out of range"}"#)
        .create_async()
        .await;

    let fetcher = create_test_fetcher(server.url() + "/v1/archive");
    let result = fetcher.fetch_daily(&common::nyc_january_query()).await;

    assert!(matches!(result, Err(FetchError::InvalidParameters)));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_daily_rate_limited() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/v1/archive")
        .match_query(Matcher::Any)
        .with_status(429)
        .expect(1)
        .create_async()
        .await;

    let fetcher = create_test_fetcher(server.url() + "/v1/archive");
    let result = fetcher.fetch_daily(&common::nyc_january_query()).await;

    assert!(matches!(result, Err(FetchError::RateLimited)));

    // Exactly one request, no retries
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_daily_upstream_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/v1/archive")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let fetcher = create_test_fetcher(server.url() + "/v1/archive");
    let result = fetcher.fetch_daily(&common::nyc_january_query()).await;

    match result {
        Err(FetchError::Upstream(status)) => assert_eq!(status, 503),
        other => panic!("Expected Upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_daily_invalid_json() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/v1/archive")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json at all")
        .create_async()
        .await;

    let fetcher = create_test_fetcher(server.url() + "/v1/archive");
    let result = fetcher.fetch_daily(&common::nyc_january_query()).await;

    assert!(matches!(result, Err(FetchError::ParseError(_))));
}

#[tokio::test]
async fn test_fetch_daily_connection_refused() {
    let fetcher = create_test_fetcher("http://127.0.0.1:1/v1/archive".to_string());
    let result = fetcher.fetch_daily(&common::nyc_january_query()).await;

    assert!(matches!(result, Err(FetchError::Connect(_))));
}
