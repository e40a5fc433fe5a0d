//! Shared helpers for server integration tests.

use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;

/// Find an available port
pub fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// A minimal valid config with the refresher disabled, so tests never talk
/// to the real feed.
pub fn offline_config(port: u16, snapshot_path: &Path) -> String {
    format!(
        r#"
[snapshot]
path = "{}"

[server]
host = "127.0.0.1"
port = {}

[refresher]
enabled = false
"#,
        snapshot_path.display(),
        port
    )
}

/// Spawn the server and return a handle
pub async fn spawn_server(config_path: &Path) -> tokio::process::Child {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_marquee"))
        .env("MARQUEE_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server")
}

/// Wait for server to be ready
pub async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/api/v1/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}
