//! Test helpers: build the router around an in-memory media store.
//!
//! Run with: `cargo test -p vitrine-api --test uploads_test`

pub mod fixtures;

use axum_test::TestServer;
use std::sync::Arc;
use vitrine_api::setup::{routes, services};
use vitrine_core::{Config, MediaServiceConfig};
use vitrine_storage::MemoryStore;

/// Test application: server plus the store it publishes to.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: Vec<(String, String)> = vec![
        ("MEDIA_STORE".to_string(), "memory".to_string()),
        ("MEDIA_FOLDER_ROOT".to_string(), "nono-vitrine".to_string()),
        ("ENVIRONMENT".to_string(), "test".to_string()),
    ];
    for (key, value) in overrides {
        vars.retain(|(k, _)| k != key);
        vars.push((key.to_string(), value.to_string()));
    }

    let media = MediaServiceConfig::from_lookup(|key| {
        vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    })
    .expect("Failed to build test configuration");
    Config(Box::new(media))
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(&[])
}

pub fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let config = test_config(overrides);
    let store = Arc::new(MemoryStore::new());
    let state = services::initialize_services(&config, store.clone());
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, store }
}
