//! Mock token exchange endpoint helpers.

use std::time::Duration;
use upst_auth::Backoff;
use upst_auth::exchange::TOKEN_PATH;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Backoff unit used in tests instead of one second.
pub const TEST_BACKOFF_UNIT: Duration = Duration::from_millis(50);

pub fn test_backoff() -> Backoff {
    Backoff::linear(TEST_BACKOFF_UNIT)
}

/// Successful exchange response carrying `token`.
pub fn session_token_response(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": token }))
}

/// Answer every exchange with `token`.
pub async fn mount_session_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(session_token_response(token))
        .mount(server)
        .await;
}

/// Fail the first `times` exchanges with `status`, ahead of any other mock.
pub async fn mount_failures(server: &MockServer, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
            "error": "server_error",
            "error_description": "upstream unavailable",
        })))
        .up_to_n_times(times)
        .with_priority(1)
        .mount(server)
        .await;
}

/// Number of requests the exchange endpoint received.
pub async fn exchange_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == TOKEN_PATH)
        .count()
}
