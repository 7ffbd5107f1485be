//! Integration tests for partial failures over HTTP

use crate::mock_server::{unreachable_url, MockServerFixture};
use requests_batch::prelude::*;
use std::io::Write;

fn expect_batch_error<T: std::fmt::Debug>(result: Result<Vec<T>>) -> BatchError {
    match result {
        Err(Error::Batch(err)) => *err,
        other => panic!("expected batch error, got {:?}", other),
    }
}

#[test]
fn test_one_failed_request_fails_the_batch() {
    let mut fixture = MockServerFixture::new();
    fixture.mock_text("/a", 200, "a");
    fixture.mock_error("/b", 500, r#"{"error": "boom"}"#);
    fixture.mock_text("/c", 200, "c");

    let err = expect_batch_error(batch_request(
        vec![
            get(fixture.url("/a")),
            get(fixture.url("/b")),
            get(fixture.url("/c")),
        ],
        Text,
        Strategy::bounded_concurrent(3).unwrap(),
    ));

    assert_eq!(err.accepted(), &[0, 2]);
    assert_eq!(err.failed(), &[1]);
    assert!(err.missing().is_empty());

    let (index, request, failure) = err.failures().next().unwrap();
    assert_eq!(index, 1);
    assert_eq!(request.url().path(), "/b");
    assert_eq!(failure.class(), "server_error");
    assert_eq!(failure.status_code().map(|s| s.as_u16()), Some(500));
    assert_eq!(failure.response().unwrap().text(), r#"{"error": "boom"}"#);

    let bodies: Vec<String> = err.successes().map(|(_, resp)| resp.text()).collect();
    assert_eq!(bodies, vec!["a", "c"]);
}

#[test]
fn test_status_classes_from_server() {
    let mut fixture = MockServerFixture::new();
    fixture.mock_error("/missing", 404, "{}");
    fixture.mock_error("/limited", 429, "{}");
    fixture.mock_error("/busy", 503, "{}");

    let err = expect_batch_error(batch_request(
        vec![
            get(fixture.url("/missing")),
            get(fixture.url("/limited")),
            get(fixture.url("/busy")),
        ],
        Raw,
        Strategy::Sequential,
    ));

    let classes: Vec<&str> = err.failures().map(|(_, _, e)| e.class()).collect();
    assert_eq!(classes, vec!["not_found", "rate_limited", "overloaded"]);
    assert!(err.accepted().is_empty());
}

#[test]
fn test_connection_failure_is_recorded() {
    let mut fixture = MockServerFixture::new();
    fixture.mock_text("/ok", 200, "ok");

    let err = expect_batch_error(batch_request(
        vec![get(fixture.url("/ok")), get(unreachable_url("/down"))],
        Text,
        Strategy::Sequential,
    ));

    assert_eq!(err.accepted(), &[0]);
    assert_eq!(err.failed(), &[1]);
    let (_, _, failure) = err.failures().next().unwrap();
    assert!(failure.status_code().is_none());
    assert!(matches!(failure, TransportError::Http(_)));
}

#[test]
fn test_unresolved_requests_can_be_resubmitted() {
    let mut fixture = MockServerFixture::new();
    fixture.mock_text("/stable", 200, "stable");
    let flaky = fixture.mock_error("/flaky", 502, "{}");

    let err = expect_batch_error(batch_request(
        vec![get(fixture.url("/stable")), get(fixture.url("/flaky"))],
        Text,
        Strategy::Sequential,
    ));
    let retry = err.unresolved_requests();
    assert_eq!(retry.len(), 1);
    assert_eq!(retry[0].url().path(), "/flaky");

    flaky.remove();
    fixture.mock_text("/flaky", 200, "recovered");
    let out = Strategy::Sequential
        .execute(retry, &HttpTransport::default(), &Text)
        .unwrap();
    assert_eq!(out, vec!["recovered"]);
}

#[test]
fn test_deserialization_failure_after_success() {
    let mut fixture = MockServerFixture::new();
    fixture.mock_text("/not-json", 200, "plain words");

    let err = batch_request(
        vec![get(fixture.url("/not-json"))],
        Json::<serde_json::Value>::new(),
        Strategy::Sequential,
    )
    .unwrap_err();

    assert!(matches!(err, Error::Serialization(_)));
}

#[test]
fn test_per_request_timeout() {
    let mut fixture = MockServerFixture::new();
    fixture
        .server
        .mock("GET", "/slow")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(std::time::Duration::from_millis(500));
            w.write_all(b"late")
        })
        .create();

    let err = expect_batch_error(batch_request(
        vec![get(fixture.url("/slow")).with_timeout(std::time::Duration::from_millis(50))],
        Text,
        Strategy::Sequential,
    ));

    let (_, _, failure) = err.failures().next().unwrap();
    assert!(failure.is_timeout());
}

fn transport_with(config: TransportConfig) -> std::sync::Arc<dyn Transport> {
    std::sync::Arc::new(HttpTransport::new(config).unwrap())
}

#[test]
fn test_sub_second_transport_timeout() {
    let mut fixture = MockServerFixture::new();
    fixture.mock_text("/fast", 200, "fast");

    let config = TransportConfig::new().with_timeout(std::time::Duration::from_millis(500));
    assert_eq!(config.timeout_ms, Some(500));

    let mut batch = BatchRequest::new()
        .with_deserializer(Text)
        .with_transport(transport_with(config));
    batch.add(get(fixture.url("/fast"))).unwrap();
    assert_eq!(batch.send().unwrap(), vec!["fast"]);
}

#[test]
fn test_redirect_limit() {
    let mut fixture = MockServerFixture::new();
    fixture
        .server
        .mock("GET", "/old")
        .with_status(302)
        .with_header("location", "/new")
        .create();
    fixture.mock_text("/new", 200, "moved");

    let mut followed = BatchRequest::new()
        .with_deserializer(Text)
        .with_transport(transport_with(TransportConfig::new()));
    followed.add(get(fixture.url("/old"))).unwrap();
    assert_eq!(followed.send().unwrap(), vec!["moved"]);

    let mut pinned = BatchRequest::new()
        .with_deserializer(Text)
        .with_transport(transport_with(TransportConfig::new().with_max_redirects(0)));
    pinned.add(get(fixture.url("/old"))).unwrap();
    let err = expect_batch_error(pinned.send());
    let (_, _, failure) = err.failures().next().unwrap();
    assert_eq!(failure.status_code().map(|s| s.as_u16()), Some(302));
    assert_eq!(failure.class(), "http_error");
}
