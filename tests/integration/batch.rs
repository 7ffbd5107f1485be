//! Integration tests for batch dispatch over HTTP

use crate::mock_server::MockServerFixture;
use mockito::Matcher;
use requests_batch::prelude::*;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
}

#[test]
fn test_json_batch_preserves_submission_order() {
    let mut fixture = MockServerFixture::new();
    let mocks: Vec<_> = (1..=4)
        .map(|id| {
            fixture.mock_json(
                "GET",
                &format!("/users/{}", id),
                &json!({"id": id, "name": format!("user-{}", id)}).to_string(),
            )
        })
        .collect();

    let users: Vec<User> = batch_request(
        (1..=4)
            .map(|id| get(fixture.url(&format!("/users/{}", id))))
            .collect::<RequestSpec>(),
        Json::<User>::new(),
        Strategy::bounded_concurrent(2).unwrap(),
    )
    .unwrap();

    let ids: Vec<u32> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(users[2].name, "user-3");
    for mock in mocks {
        mock.assert();
    }
}

#[test]
fn test_nested_spec_is_flattened_depth_first() {
    let mut fixture = MockServerFixture::new();
    for path in ["/a", "/b", "/c", "/d"] {
        fixture.mock_text(path, 200, path);
    }

    let bodies = batch_request(
        requests![
            get(fixture.url("/a")),
            vec![
                RequestSpec::from(get(fixture.url("/b"))),
                RequestSpec::from([get(fixture.url("/c"))]),
            ],
            get(fixture.url("/d")),
        ],
        Text,
        Strategy::Sequential,
    )
    .unwrap();

    assert_eq!(bodies, vec!["/a", "/b", "/c", "/d"]);
}

#[test]
fn test_every_verb_reaches_the_server() {
    let mut fixture = MockServerFixture::new();
    let verbs = ["GET", "PUT", "POST", "PATCH", "DELETE", "HEAD", "OPTIONS"];
    let mocks: Vec<_> = verbs
        .iter()
        .map(|verb| {
            fixture
                .server
                .mock(verb, "/resource")
                .with_status(204)
                .expect(1)
                .create()
        })
        .collect();

    let url = fixture.url("/resource");
    let responses = batch_request(
        requests![
            get(&url),
            put(&url),
            post(&url),
            patch(&url),
            delete(&url),
            head(&url),
            options(&url),
        ],
        Raw,
        Strategy::bounded_concurrent(3).unwrap(),
    )
    .unwrap();

    assert_eq!(responses.len(), verbs.len());
    assert!(responses.iter().all(|r| r.status().as_u16() == 204));
    for mock in mocks {
        mock.assert();
    }
}

#[test]
fn test_request_details_are_sent() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", "/items")
        .match_query(Matcher::UrlEncoded("dry_run".into(), "true".into()))
        .match_header("authorization", "Bearer secret")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"name": "widget"})))
        .with_status(201)
        .with_body(r#"{"created": true}"#)
        .create();

    let out = batch_request(
        post(fixture.url("/items"))
            .with_query("dry_run", "true")
            .bearer_auth("secret")
            .with_json(json!({"name": "widget"})),
        Json::<serde_json::Value>::new(),
        Strategy::Sequential,
    )
    .unwrap();

    assert_eq!(out, vec![json!({"created": true})]);
    mock.assert();
}

#[test]
fn test_configuration_driven_submit() {
    let mut fixture = MockServerFixture::new();
    fixture.mock_json("GET", "/envelope/1", r#"{"data": {"id": 1}}"#);
    fixture.mock_json("GET", "/envelope/2", r#"{"data": {"id": 2}}"#);

    let config = BatchConfig::from_yaml_str(
        r#"
strategy:
  kind: threaded
deserializer:
  kind: json
  json:
    pointer: /data/id
transport:
  timeout_ms: 5000
  user_agent: requests-batch-tests
"#,
    )
    .unwrap();

    let out = submit(
        vec![get(fixture.url("/envelope/1")), get(fixture.url("/envelope/2"))],
        &config,
    )
    .unwrap();

    let ids: Vec<_> = out.into_iter().filter_map(Deserialized::into_json).collect();
    assert_eq!(ids, vec![json!(1), json!(2)]);
}

#[test]
fn test_batch_request_builder_over_http() {
    let mut fixture = MockServerFixture::new();
    fixture.mock_text("/one", 200, "one");
    fixture.mock_text("/two", 200, "two");

    let mut batch = BatchRequest::new().with_deserializer(Text);
    batch.add(get(fixture.url("/one"))).unwrap();
    batch.add(get(fixture.url("/two"))).unwrap();

    assert_eq!(batch.send().unwrap(), vec!["one", "two"]);
}
