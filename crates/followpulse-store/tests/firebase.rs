//! Integration tests for `FirebaseStore` against a `wiremock` stand-in for
//! the Realtime Database REST API.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use followpulse_core::{FirebaseConfig, Handle, HistorySnapshot, ProfileRecord, SourceKind};
use followpulse_store::{FirebaseStore, HistoryStore, Recorder, StoreError};

fn store(server: &MockServer, auth_token: Option<&str>) -> FirebaseStore {
    FirebaseStore::new(
        &FirebaseConfig {
            database_url: server.uri(),
            auth_token: auth_token.map(str::to_string),
        },
        5,
        "followpulse-test/0.1",
    )
    .expect("failed to build FirebaseStore")
}

fn handle(raw: &str) -> Handle {
    Handle::parse(raw).expect("valid test handle")
}

#[tokio::test]
async fn latest_reads_summary_and_ignores_history_child() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/alice.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "alice",
            "followers": 325,
            "following": 26,
            "fullName": "Alice",
            "biography": "",
            "profilePicUrl": "",
            "isDemo": true,
            "lastUpdate": "2026-10-01T12:00:00Z",
            "currentFollowers": 325,
            "history": {
                "20261001T120000000Z": { "followers": 325, "timestamp": "2026-10-01T12:00:00Z" }
            }
        })))
        .mount(&server)
        .await;

    let latest = store(&server, None)
        .latest(&handle("alice"))
        .await
        .expect("read should succeed")
        .expect("summary should exist");

    assert_eq!(latest.current_followers, 325);
    assert_eq!(latest.profile.following_count, 26);
    assert_eq!(latest.profile.source_kind, SourceKind::Live);
}

#[tokio::test]
async fn latest_is_none_for_missing_or_history_only_node() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/ghost.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/half.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "history": { "20261001T120000000Z": { "followers": 1, "timestamp": "2026-10-01T12:00:00Z" } }
        })))
        .mount(&server)
        .await;

    let store = store(&server, None);
    assert!(store.latest(&handle("ghost")).await.unwrap().is_none());
    assert!(store.latest(&handle("half")).await.unwrap().is_none());
}

#[tokio::test]
async fn dotted_handles_use_comma_keys_and_auth_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/first,last/history.json"))
        .and(query_param("auth", "db-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "20261002T000000000Z": { "followers": 20, "timestamp": "2026-10-02T00:00:00Z" },
            "20261001T000000000Z": { "followers": 10, "timestamp": "2026-10-01T00:00:00Z" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let history = store(&server, Some("db-secret"))
        .history(&handle("first.last"))
        .await
        .expect("history read should succeed");

    assert_eq!(
        history.iter().map(|s| s.followers).collect::<Vec<_>>(),
        vec![10, 20]
    );
}

#[tokio::test]
async fn empty_history_is_an_empty_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/alice/history.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let history = store(&server, None).history(&handle("alice")).await.unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn append_snapshot_puts_under_timestamp_key() {
    let server = MockServer::start().await;
    let at = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();

    Mock::given(method("PUT"))
        .and(path("/users/alice/history/20261001T120000000Z.json"))
        .and(body_partial_json(json!({ "followers": 400 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "followers": 400 })))
        .expect(1)
        .mount(&server)
        .await;

    store(&server, None)
        .append_snapshot(&handle("alice"), &HistorySnapshot { followers: 400, timestamp: at })
        .await
        .expect("append should succeed");
}

#[tokio::test]
async fn server_errors_surface_as_unexpected_status_without_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = store(&server, Some("db-secret"))
        .latest(&handle("alice"))
        .await
        .unwrap_err();

    match err {
        StoreError::UnexpectedStatus { status, url } => {
            assert_eq!(status, 401);
            assert!(!url.contains("db-secret"), "token leaked into error: {url}");
        }
        other => panic!("expected UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn transport_errors_do_not_carry_the_auth_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/alice.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!(null))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let slow = FirebaseStore::new(
        &FirebaseConfig {
            database_url: server.uri(),
            auth_token: Some("db-secret".to_string()),
        },
        1,
        "followpulse-test/0.1",
    )
    .expect("failed to build FirebaseStore");

    let err = slow
        .latest(&handle("alice"))
        .await
        .expect_err("request should time out");

    assert!(matches!(err, StoreError::Http(_)), "got: {err:?}");
    assert!(!err.to_string().contains("db-secret"), "token leaked: {err}");
    assert!(!format!("{err:?}").contains("db-secret"), "token leaked: {err:?}");
}

#[tokio::test]
async fn recorder_writes_snapshot_then_patches_summary() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/alice.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "alice",
            "followers": 325,
            "lastUpdate": "2026-10-01T12:00:00Z",
            "currentFollowers": 325
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/users/alice/history/20261001T130000000Z.json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/users/alice.json"))
        .and(body_partial_json(json!({
            "username": "alice",
            "followers": 400,
            "currentFollowers": 400,
            "sourceKind": "live"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let recorder = Recorder::new(Arc::new(store(&server, None)));
    let h = handle("alice");
    let mut profile = ProfileRecord::new(h.clone(), SourceKind::Live, "rapidapi");
    profile.follower_count = 400;

    let outcome = recorder
        .record_at(&h, &profile, Utc.with_ymd_and_hms(2026, 10, 1, 13, 0, 0).unwrap())
        .await;

    assert_eq!(outcome.previous_follower_count, 325);
    assert!(outcome.persisted);
}
