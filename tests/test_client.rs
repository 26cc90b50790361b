//! HTTP behaviour of `LunarCrushClient` against a local mock server.

mod common;

use std::io::Read;
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use btc_social_pulse::config::{POSTS_PATH, TIME_SERIES_PATH};
use btc_social_pulse::{
    DataSource, Granularity, LunarCrushClient, SocialPulse, SocialPulseError, SocialSource,
};
use common::NOW;
use mockito::{Matcher, Server};
use serde_json::json;

const TOKEN: &str = "test-token";

fn client(server: &Server) -> LunarCrushClient {
    LunarCrushClient::new(TOKEN, server.url(), Duration::from_secs(5)).unwrap()
}

fn series_path() -> String {
    format!("/{TIME_SERIES_PATH}")
}

fn series_query(bucket: &str, start: i64, end: i64) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("bucket".into(), bucket.into()),
        Matcher::UrlEncoded("start".into(), start.to_string()),
        Matcher::UrlEncoded("end".into(), end.to_string()),
    ])
}

// ---------------------------------------------------------------------------
// Successful responses
// ---------------------------------------------------------------------------

#[test]
fn time_series_sends_bearer_and_window_query() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", series_path().as_str())
        .match_header("authorization", "Bearer test-token")
        .match_query(series_query("minute", NOW - 7200, NOW))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"data": [{"time": NOW - 60, "social_volume": 12}]}).to_string())
        .create();

    let points = client(&server)
        .time_series(Granularity::Minute, NOW - 7200, NOW)
        .unwrap();

    mock.assert();
    assert_eq!(points, vec![json!({"time": NOW - 60, "social_volume": 12})]);
}

#[test]
fn posts_request_carries_limit() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", format!("/{POSTS_PATH}").as_str())
        .match_header("authorization", "Bearer test-token")
        .match_query(Matcher::UrlEncoded("limit".into(), "50".into()))
        .with_status(200)
        .with_body(json!({"data": [{"post_id": "1"}, {"post_id": "2"}]}).to_string())
        .create();

    let posts = client(&server).posts(50).unwrap();

    mock.assert();
    assert_eq!(posts.len(), 2);
}

#[test]
fn missing_data_field_is_empty() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", series_path().as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"config": {}}"#)
        .create();

    let points = client(&server)
        .time_series(Granularity::Hour, NOW - 3600, NOW)
        .unwrap();

    mock.assert();
    assert!(points.is_empty());
}

// ---------------------------------------------------------------------------
// Error statuses
// ---------------------------------------------------------------------------

#[test]
fn too_many_requests_is_rate_limited() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", series_path().as_str())
        .match_header("authorization", "Bearer test-token")
        .match_query(series_query("minute", NOW - 600, NOW))
        .with_status(429)
        .with_body("slow down")
        .create();

    let err = client(&server)
        .time_series(Granularity::Minute, NOW - 600, NOW)
        .unwrap_err();

    mock.assert();
    assert!(err.is_rate_limited(), "got {err:?}");
    match err {
        SocialPulseError::Upstream { status, message } => {
            assert_eq!(status, Some(429));
            assert_eq!(message, "Rate limit exceeded");
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[test]
fn error_body_message_is_surfaced() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", format!("/{POSTS_PATH}").as_str())
        .match_header("authorization", "Bearer test-token")
        .match_query(Matcher::UrlEncoded("limit".into(), "50".into()))
        .with_status(403)
        .with_body(json!({"error": "subscription required"}).to_string())
        .create();

    let err = client(&server).posts(50).unwrap_err();

    mock.assert();
    assert!(!err.is_rate_limited());
    match err {
        SocialPulseError::Upstream { status, message } => {
            assert_eq!(status, Some(403));
            assert_eq!(message, "subscription required");
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[test]
fn server_error_without_body_gets_generic_message() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", series_path().as_str())
        .match_query(Matcher::Any)
        .with_status(502)
        .create();

    let err = client(&server)
        .time_series(Granularity::Minute, NOW - 600, NOW)
        .unwrap_err();

    mock.assert();
    assert_eq!(err.upstream_status(), Some(502));
    assert!(err.to_string().contains("Failed to fetch data from LunarCrush."));
}

#[test]
fn non_json_success_body_is_malformed() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", series_path().as_str())
        .match_header("authorization", "Bearer test-token")
        .match_query(series_query("hour", NOW - 3600, NOW))
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create();

    let err = client(&server)
        .time_series(Granularity::Hour, NOW - 3600, NOW)
        .unwrap_err();

    mock.assert();
    match err {
        SocialPulseError::Upstream { status, message } => {
            assert_eq!(status, Some(200));
            assert_eq!(message, "Malformed JSON from LunarCrush");
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Transport failures
// ---------------------------------------------------------------------------

#[test]
fn slow_upstream_times_out_without_status() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let stalled = thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        let mut buf = [0u8; 1024];
        let _ = conn.read(&mut buf);
        thread::sleep(Duration::from_secs(2));
    });

    let client =
        LunarCrushClient::new(TOKEN, format!("http://{addr}"), Duration::from_millis(200)).unwrap();
    let err = client.posts(50).unwrap_err();

    match &err {
        SocialPulseError::Upstream { status, message } => {
            assert_eq!(*status, None);
            assert!(message.contains("timed out"), "unexpected message: {message}");
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
    assert!(!err.is_rate_limited());
    stalled.join().unwrap();
}

#[test]
fn unreachable_upstream_has_no_status() {
    let addr = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let client =
        LunarCrushClient::new(TOKEN, format!("http://{addr}"), Duration::from_secs(1)).unwrap();
    let err = client
        .time_series(Granularity::Minute, NOW - 600, NOW)
        .unwrap_err();

    assert_eq!(err.upstream_status(), None);
    assert!(matches!(err, SocialPulseError::Upstream { .. }), "got {err:?}");
}

// ---------------------------------------------------------------------------
// Pipeline over HTTP
// ---------------------------------------------------------------------------

#[test]
fn pipeline_falls_back_to_hourly_over_http() {
    let mut server = Server::new();
    let minute = server
        .mock("GET", series_path().as_str())
        .match_query(series_query("minute", NOW - 7200, NOW))
        .with_status(200)
        .with_body(r#"{"data": []}"#)
        .create();
    let hour = server
        .mock("GET", series_path().as_str())
        .match_query(series_query("hour", NOW - 7200, NOW))
        .with_status(200)
        .with_body(
            json!({"data": [
                {"time": NOW - 7200, "social_volume": 100},
                {"time": NOW - 3600, "social_volume": 110},
            ]})
            .to_string(),
        )
        .create();

    let pulse = SocialPulse::builder()
        .token(TOKEN)
        .api_base(server.url())
        .build()
        .unwrap();
    let report = pulse.social_data_at("1h", NOW).unwrap();

    minute.assert();
    hour.assert();
    assert_eq!(report.source, DataSource::CoarseFallback);
    assert_eq!(report.data.len(), 2);
    assert_eq!(report.data[1].delta, 10);
}
