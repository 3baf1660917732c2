//! Test utilities for integration testing.

use axum_test::TestServer;
use sqlx::PgPool;

use crate::config::Config;

/// Configuration suitable for tests: no API key, rate limiting effectively
/// disabled so request-heavy tests never trip it.
pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        rate_limit: crate::config::RateLimitConfig {
            max_requests: 0,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Spin up a test server over the given pool with the default test config.
pub async fn create_test_app(pool: PgPool) -> TestServer {
    create_test_app_with_config(pool, create_test_config()).await
}

/// Test server with shared-secret gating enabled.
pub async fn create_test_app_with_key(pool: PgPool, api_key: &str) -> TestServer {
    let config = Config {
        api_key: Some(api_key.to_string()),
        ..create_test_config()
    };
    create_test_app_with_config(pool, config).await
}

pub async fn create_test_app_with_config(pool: PgPool, config: Config) -> TestServer {
    let app = crate::Application::new_with_pool(config, Some(pool))
        .await
        .expect("Failed to create application");

    app.into_test_server()
}
