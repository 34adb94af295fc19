// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end session recovery against a fake backend.

use std::sync::Arc;

use bierzmo_client::{ApiClient, ApiRequest, SESSION_EXPIRED_MESSAGE};
use bierzmo_core::BierzmoError;
use bierzmo_test_utils::{MockBackend, RecordingNotifier, RefreshScript, SESSION_TOKEN};
use futures::future::join_all;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn client_for(backend: &MockBackend, notifier: &RecordingNotifier) -> ApiClient {
    ApiClient::with_notifier(backend.client_settings(), Arc::new(notifier.clone())).unwrap()
}

#[tokio::test]
async fn concurrent_401s_share_one_refresh_and_all_replay() {
    let backend = MockBackend::start().await;
    backend.mount_refresh(RefreshScript::Succeed, 1).await;
    backend.mount_protected("GET", "/events", json!([])).await;
    backend.mount_protected("GET", "/groups", json!([])).await;
    backend.mount_protected("GET", "/users", json!([])).await;

    let notifier = RecordingNotifier::new();
    let client = client_for(&backend, &notifier);

    let results = join_all(
        ["/events", "/groups", "/users"]
            .into_iter()
            .map(|route| client.send(ApiRequest::get(route))),
    )
    .await;

    for result in &results {
        assert!(result.is_ok(), "request failed: {result:?}");
    }
    assert_eq!(client.session().refresh_count(), 1);
    assert!(!client.session().is_refreshing());
    assert_eq!(client.session().pending_len(), 0);
    assert_eq!(notifier.count(), 0);
    assert!(client.has_session_cookie());

    // Each route: one 401 and one replay.
    for route in ["/events", "/groups", "/users"] {
        assert_eq!(backend.hits(route).await, 2, "route {route}");
    }
}

#[tokio::test]
async fn failed_refresh_rejects_all_and_notifies_once() {
    let backend = MockBackend::start().await;
    backend.mount_refresh(RefreshScript::Fail(401), 1).await;
    backend.mount_protected("GET", "/events", json!([])).await;
    backend.mount_protected("GET", "/groups", json!([])).await;

    let notifier = RecordingNotifier::new();
    let client = client_for(&backend, &notifier);

    let (events, groups) = tokio::join!(
        client.send(ApiRequest::get("/events")),
        client.send(ApiRequest::get("/groups")),
    );

    for result in [events, groups] {
        let err = result.unwrap_err();
        assert!(
            matches!(err, BierzmoError::SessionExpired { .. }),
            "expected SessionExpired, got {err:?}"
        );
        assert!(err.is_auth_failure());
    }

    let notifications = notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].message, SESSION_EXPIRED_MESSAGE);
    assert!(!client.session().is_refreshing());

    // Originals are not replayed after a failed refresh.
    assert_eq!(backend.hits("/events").await, 1);
    assert_eq!(backend.hits("/groups").await, 1);
}

#[tokio::test]
async fn repeated_failures_keep_a_single_notification() {
    let backend = MockBackend::start().await;
    backend.mount_refresh(RefreshScript::Fail(500), 3).await;
    backend.mount_protected("GET", "/events", json!([])).await;

    let notifier = RecordingNotifier::new();
    let client = client_for(&backend, &notifier);

    for _ in 0..3 {
        let err = client.send(ApiRequest::get("/events")).await.unwrap_err();
        assert!(matches!(err, BierzmoError::SessionExpired { .. }));
    }
    assert_eq!(client.session().refresh_count(), 3);
    assert_eq!(notifier.count(), 1);
}

#[tokio::test]
async fn login_rearms_the_expiry_notification() {
    let backend = MockBackend::start().await;
    backend.mount_refresh(RefreshScript::Fail(401), 2).await;
    backend.mount_protected("GET", "/events", json!([])).await;
    // The login cookie is not one the protected routes accept, so the next
    // call starts a fresh expiry episode.
    backend
        .mount_login(json!({ "id": 1, "login": "kancelaria", "role": "3" }), "stale")
        .await;

    let notifier = RecordingNotifier::new();
    let client = client_for(&backend, &notifier);

    assert!(client.send(ApiRequest::get("/events")).await.is_err());
    assert_eq!(notifier.count(), 1);

    client.auth().login("kancelaria", "tajne").await.unwrap();

    assert!(client.send(ApiRequest::get("/events")).await.is_err());
    assert_eq!(notifier.count(), 2);
}

#[tokio::test]
async fn session_check_rearms_the_expiry_notification() {
    let backend = MockBackend::start().await;
    backend.mount_refresh(RefreshScript::Fail(401), 2).await;
    backend.mount_protected("GET", "/events", json!([])).await;
    Mock::given(method("GET"))
        .and(path("/api/auth/check-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "user": { "id": 1, "login": "kancelaria", "role": "3" }
        })))
        .expect(1)
        .mount(backend.server())
        .await;

    let notifier = RecordingNotifier::new();
    let client = client_for(&backend, &notifier);

    assert!(client.send(ApiRequest::get("/events")).await.is_err());
    assert_eq!(notifier.count(), 1);

    let user = client.auth().check_session().await.unwrap();
    assert_eq!(user.login, "kancelaria");

    let err = client.send(ApiRequest::get("/events")).await.unwrap_err();
    assert!(matches!(err, BierzmoError::SessionExpired { .. }), "got {err:?}");
    assert_eq!(notifier.count(), 2);
    assert_eq!(client.session().refresh_count(), 2);
}

#[tokio::test]
async fn rejected_login_does_not_trigger_refresh() {
    let backend = MockBackend::start().await;
    backend.mount_refresh(RefreshScript::Succeed, 0).await;
    backend.mount_login_rejected().await;

    let notifier = RecordingNotifier::new();
    let client = client_for(&backend, &notifier);

    let err = client.auth().login("ktoś", "złe").await.unwrap_err();
    assert!(matches!(err, BierzmoError::Unauthorized { .. }), "got {err:?}");
    assert_eq!(client.session().refresh_count(), 0);
    assert_eq!(notifier.count(), 0);
}

#[tokio::test]
async fn replayed_request_is_not_refreshed_twice() {
    let backend = MockBackend::start().await;
    backend.mount_refresh(RefreshScript::IssueToken("useless"), 1).await;
    backend.mount_protected("GET", "/events", json!([])).await;

    let notifier = RecordingNotifier::new();
    let client = client_for(&backend, &notifier);

    let err = client.send(ApiRequest::get("/events")).await.unwrap_err();
    assert!(matches!(err, BierzmoError::Unauthorized { .. }), "got {err:?}");
    assert_eq!(client.session().refresh_count(), 1);
    assert_eq!(backend.hits("/events").await, 2);
    assert_eq!(notifier.count(), 0);
}

#[tokio::test]
async fn non_auth_failures_bypass_the_coordinator() {
    let backend = MockBackend::start().await;
    backend.mount_refresh(RefreshScript::Succeed, 0).await;
    backend
        .mount_failure("GET", "/events/404", 404, "Nie znaleziono wydarzenia")
        .await;
    backend
        .mount_failure("GET", "/groups", 500, "Błąd serwera")
        .await;

    let notifier = RecordingNotifier::new();
    let client = client_for(&backend, &notifier);

    let not_found = client.send(ApiRequest::get("/events/404")).await.unwrap_err();
    assert_eq!(not_found.status(), Some(404));
    let server_error = client.send(ApiRequest::get("/groups")).await.unwrap_err();
    assert_eq!(server_error.status(), Some(500));
    assert!(!server_error.is_auth_failure());
    assert_eq!(client.session().refresh_count(), 0);
}

#[tokio::test]
async fn valid_session_needs_no_refresh() {
    let backend = MockBackend::start().await;
    backend.mount_refresh(RefreshScript::Succeed, 0).await;
    backend
        .mount_login(json!({ "id": 1, "login": "proboszcz", "role": "2" }), SESSION_TOKEN)
        .await;
    backend.mount_protected("GET", "/groups", json!([])).await;

    let notifier = RecordingNotifier::new();
    let client = client_for(&backend, &notifier);

    let user = client.auth().login("proboszcz", "tajne").await.unwrap();
    assert_eq!(user.login, "proboszcz");
    assert!(client.has_session_cookie());

    let groups = client.groups().list().await.unwrap();
    assert!(groups.is_empty());
    assert_eq!(client.session().refresh_count(), 0);
}
