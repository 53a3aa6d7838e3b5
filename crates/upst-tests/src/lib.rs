//! Integration test infrastructure for the OCI session bootstrapper.
//!
//! Provides a recording platform double, fixtures for environments and
//! identity tokens, and helpers that stand up a mock token exchange
//! endpoint with wiremock.
//!
//! # Usage
//!
//! ```ignore
//! use upst_tests::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let server = MockServer::start().await;
//!     mount_session_token(&server, "upst-123").await;
//!     let platform = RecordingPlatform::local(LocalEnv::new(&server.uri()).build());
//! }
//! ```

pub mod fixtures;
pub mod helpers;
pub mod recording;

pub use fixtures::*;
pub use helpers::*;
pub use recording::RecordingPlatform;

/// Initialize test logging (call once per test binary).
pub fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,upst=debug")),
        )
        .with_test_writer()
        .try_init();
}
