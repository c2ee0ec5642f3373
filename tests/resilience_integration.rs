//! Retry and token handling through the full client stack

use pingone_forms::api::models::{EnvironmentCredential, Region};
use pingone_forms::api::{
    ApiError, AuthError, ClientManager, ManualClock, Platform, RecordingSleeper,
    ResilienceConfig, TokenCache,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TENANT: &str = "33333333-3333-3333-3333-333333333333";

fn credential() -> EnvironmentCredential {
    EnvironmentCredential {
        name: "Staging".to_string(),
        tenant_id: TENANT.to_string(),
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        region: Region::NorthAmerica,
    }
}

async fn mount_token(server: &MockServer, expires_in: i64) {
    Mock::given(method("POST"))
        .and(path(format!("/{}/as/token", TENANT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token",
            "expires_in": expires_in
        })))
        .mount(server)
        .await;
}

fn manager(
    server: &MockServer,
    clock: Arc<ManualClock>,
    sleeper: Arc<RecordingSleeper>,
) -> ClientManager {
    ClientManager::with_parts(
        Platform::with_urls(server.uri(), format!("{}/v1", server.uri())),
        ResilienceConfig::default(),
        Arc::new(TokenCache::new()),
        clock,
        sleeper,
    )
    .unwrap()
}

#[tokio::test]
async fn test_rate_limited_listing_recovers_after_backoff() {
    let server = MockServer::start().await;
    mount_token(&server, 3600).await;

    let forms_path = format!("/v1/environments/{}/forms", TENANT);
    Mock::given(method("GET"))
        .and(path(forms_path.clone()))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(3)
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(forms_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_embedded": { "forms": [ { "id": "f-1", "name": "Login" } ] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let manager = manager(&server, Arc::new(ManualClock::new(0)), sleeper.clone());

    let forms = manager.list_forms(&credential()).await.unwrap();

    assert_eq!(forms.len(), 1);
    assert_eq!(
        sleeper.delays(),
        vec![
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_secs(4)
        ]
    );
    assert_eq!(sleeper.total(), Duration::from_secs(7));
}

#[tokio::test]
async fn test_persistent_server_error_surfaces_after_retries() {
    let server = MockServer::start().await;
    mount_token(&server, 3600).await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/environments/{}/forms/f-9", TENANT)))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(4)
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let manager = manager(&server, Arc::new(ManualClock::new(0)), sleeper.clone());

    let error = manager.download_form(&credential(), "f-9").await.unwrap_err();

    assert_eq!(error.status(), Some(503));
    assert!(error.to_string().contains("unavailable"));
    assert_eq!(sleeper.delays().len(), 3);
}

#[tokio::test]
async fn test_token_reused_until_expiry_buffer() {
    let server = MockServer::start().await;
    mount_token(&server, 3600).await;

    let clock = Arc::new(ManualClock::new(1_000_000));
    let manager = manager(&server, clock.clone(), Arc::new(RecordingSleeper::new()));
    let credential = credential();

    manager.get_access_token(&credential).await.unwrap();
    clock.advance(Duration::from_secs(3600 - 31));
    manager.get_access_token(&credential).await.unwrap();
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    clock.advance(Duration::from_secs(1));
    manager.get_access_token(&credential).await.unwrap();
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_authentication_failure_stops_before_api_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let manager = manager(
        &server,
        Arc::new(ManualClock::new(0)),
        Arc::new(RecordingSleeper::new()),
    );

    let error = manager.list_forms(&credential()).await.unwrap_err();
    assert!(matches!(
        error,
        ApiError::Authentication(AuthError::InvalidClient { .. })
    ));
    assert!(error.to_string().contains("Staging"));
}
