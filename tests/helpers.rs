// Shared test helpers for spawning servers and writing feed files.

use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;

use tempfile::NamedTempFile;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use wayguard::dashboard::{AlertStore, DashboardState};
use wayguard::relay::RelayState;
use wayguard::RelayConfig;

/// A server bound on a free local port; cancelled on drop.
#[allow(dead_code)] // Used by other test files
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: CancellationToken,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Starts a dashboard over `store` on a free port.
#[allow(dead_code)]
pub async fn spawn_dashboard(store: Arc<AlertStore>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test dashboard");
    let addr = listener.local_addr().expect("No local address");
    let shutdown = CancellationToken::new();
    let state = DashboardState::new(store, shutdown.clone());

    tokio::spawn(async move {
        if let Err(e) = wayguard::dashboard::serve(listener, state).await {
            eprintln!("test dashboard failed: {e}");
        }
    });

    TestServer { addr, shutdown }
}

/// Starts a relay forwarding to `dashboard_url` on a free port.
#[allow(dead_code)]
pub async fn spawn_relay(dashboard_url: &str, forward_retries: usize) -> (TestServer, RelayState) {
    let config = RelayConfig {
        dashboard_url: dashboard_url.to_string(),
        timeout_seconds: 2,
        forward_retries,
        ..Default::default()
    };
    let state = RelayState::from_config(&config).expect("Failed to build relay state");

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test relay");
    let addr = listener.local_addr().expect("No local address");
    let shutdown = CancellationToken::new();

    let serve_state = state.clone();
    let serve_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = wayguard::relay::serve(listener, serve_state, serve_shutdown).await {
            eprintln!("test relay failed: {e}");
        }
    });

    (TestServer { addr, shutdown }, state)
}

/// A port with nothing listening on it.
#[allow(dead_code)]
pub fn unused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    listener.local_addr().expect("No local address").port()
}

/// Writes `lines` to a temporary file, one per line.
#[allow(dead_code)]
pub fn write_lines(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    for line in lines {
        writeln!(file, "{}", line).expect("Failed to write line");
    }
    file.flush().expect("Failed to flush file");
    file
}
