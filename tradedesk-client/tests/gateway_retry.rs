//! Gateway behavior: retry of transport failures with linear backoff, status
//! classification, single user notification per failure, and the silent flag.

mod helpers;

use helpers::{auth_body, spawn_harness, Step};
use tradedesk_client::ApiRequest;
use tradedesk_core::DeskError;

#[tokio::test(start_paused = true)]
async fn transport_failures_are_retried_then_surfaced() {
    let harness = spawn_harness(vec![
        Step::FailTransport,
        Step::FailTransport,
        Step::FailTransport,
        Step::FailTransport,
    ]);

    let err = harness.client.gateway().get("/trades").await.unwrap_err();

    assert!(matches!(err, DeskError::Network { .. }));
    assert_eq!(harness.transport.request_count(), 4, "initial try + 3 retries");
    assert_eq!(
        harness
            .notifier
            .count_of("Network error. Please check your connection."),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn recovery_mid_retry_succeeds_with_linear_backoff() {
    let harness = spawn_harness(vec![
        Step::FailTransport,
        Step::FailTransport,
        Step::FailTransport,
        Step::ok(r#"[]"#),
    ]);

    let started = tokio::time::Instant::now();
    let response = harness.client.gateway().get("/trades").await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(harness.transport.request_count(), 4);
    // Waits of 1s, 2s and 3s precede the three retries.
    assert!(started.elapsed() >= std::time::Duration::from_secs(6));
    assert!(harness.notifier.messages().is_empty(), "no notice on success");
}

#[tokio::test]
async fn http_statuses_map_to_their_notices() {
    let cases: Vec<(u16, &str, fn(&DeskError) -> bool)> = vec![
        (403, "Access denied. You don't have permission.", |e| {
            matches!(e, DeskError::Forbidden { .. })
        }),
        (429, "Too many requests. Please try again later.", |e| {
            matches!(e, DeskError::RateLimited { .. })
        }),
        (404, "Resource not found.", |e| {
            matches!(e, DeskError::NotFound { .. })
        }),
        (500, "Server error. Our team has been notified.", |e| {
            matches!(e, DeskError::Server { .. })
        }),
        (503, "Server error. Our team has been notified.", |e| {
            matches!(e, DeskError::Server { .. })
        }),
    ];

    for (status, notice, is_expected) in cases {
        let harness = spawn_harness(vec![Step::status(status, "")]);
        let err = harness.client.gateway().get("/trades").await.unwrap_err();

        assert!(is_expected(&err), "status {status} produced {err:?}");
        assert_eq!(harness.transport.request_count(), 1, "no retry for {status}");
        assert_eq!(harness.notifier.count_of(notice), 1, "notice for {status}");
        assert_eq!(harness.notifier.messages().len(), 1);
    }
}

#[tokio::test]
async fn generic_failure_surfaces_the_server_message() {
    let harness = spawn_harness(vec![Step::status(
        422,
        r#"{"message":"Validation failed"}"#,
    )]);

    let err = harness.client.gateway().get("/trades").await.unwrap_err();

    assert!(matches!(err, DeskError::Api { .. }));
    assert_eq!(harness.notifier.count_of("Validation failed"), 1);
}

#[tokio::test]
async fn generic_failure_without_detail_gets_the_fallback_notice() {
    let harness = spawn_harness(vec![Step::status(422, "not json")]);

    harness.client.gateway().get("/trades").await.unwrap_err();

    assert_eq!(harness.notifier.count_of("An error occurred"), 1);
}

#[tokio::test]
async fn unauthorized_response_tears_down_the_session() {
    let harness = spawn_harness(vec![
        Step::ok(auth_body("jwt-1", "client", "active")),
        Step::status(401, ""),
    ]);
    let session = harness.client.session();

    session.login("a@b.com", "pw").await.unwrap();
    assert!(session.is_authenticated());

    let err = harness.client.api().trades(None).await.unwrap_err();

    assert!(matches!(err, DeskError::Unauthorized { .. }));
    assert!(!session.is_authenticated());
    assert!(session.current_user().is_none());
    assert!(!harness.snapshot_path().exists());
    assert_eq!(
        harness
            .notifier
            .count_of("Session expired. Please login again."),
        1
    );
}

#[tokio::test]
async fn silent_requests_suppress_notices_but_not_teardown() {
    let harness = spawn_harness(vec![
        Step::ok(auth_body("jwt-1", "client", "active")),
        Step::status(401, ""),
    ]);
    let session = harness.client.session();

    session.login("a@b.com", "pw").await.unwrap();

    let err = harness
        .client
        .gateway()
        .send(ApiRequest::get("/trades").silent())
        .await
        .unwrap_err();

    assert!(matches!(err, DeskError::Unauthorized { .. }));
    assert!(!session.is_authenticated(), "teardown still happens");
    assert!(
        harness.notifier.messages().is_empty(),
        "silent request produced a notice"
    );
}

#[tokio::test]
async fn credential_is_attached_once_authenticated() {
    let harness = spawn_harness(vec![
        Step::ok(auth_body("jwt-1", "client", "active")),
        Step::ok(r#"[]"#),
    ]);
    let session = harness.client.session();

    session.login("a@b.com", "pw").await.unwrap();
    harness.client.api().trades(None).await.unwrap();

    let seen = harness.transport.seen();
    assert_eq!(seen[0].path, "/auth/login");
    assert!(seen[0].credential.is_none(), "login is unauthenticated");
    assert_eq!(seen[1].credential.as_deref(), Some("jwt-1"));
}
