//! API server lifecycle — starts/stops the axum HTTP server.
//!
//! Pattern: bind → spawn background task → return handle with
//! shutdown channel.

use std::net::SocketAddr;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::patient_api_router;
use crate::config::ServiceConfig;

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

/// Metadata for a running API server.
#[derive(Debug, Clone)]
pub struct ApiSession {
    pub server_addr: String,
    pub port: u16,
}

/// Handle to a running API server.
pub struct ApiServer {
    pub session: ApiSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ApiServer {
    /// Signal the server to stop accepting connections.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Shut down and wait for in-flight requests to finish.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("API server task failed: {e}");
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Start the API server on `config.bind_addr`.
///
/// The database must already be initialized. Port 0 binds an ephemeral port;
/// the chosen port is reported in the returned session.
pub async fn start_api_server(config: ServiceConfig) -> std::io::Result<ApiServer> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr: SocketAddr = listener.local_addr()?;

    tracing::info!(%addr, db = %config.db_path.display(), "API server binding");

    let app = patient_api_router(config);

    let session = ApiSession {
        server_addr: addr.to_string(),
        port: addr.port(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        session,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn test_config(tmp: &tempfile::TempDir) -> ServiceConfig {
        let mut config = ServiceConfig::with_db_path(tmp.path().join("patients.db"));
        config.bind_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);
        crate::db::initialize(&config.db_path).unwrap();
        config
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let tmp = tempfile::tempdir().unwrap();
        let server = start_api_server(test_config(&tmp))
            .await
            .expect("server should start");

        assert!(server.session.port > 0);

        let url = format!("http://127.0.0.1:{}/", server.session.port);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        server.stop().await;
    }

    #[tokio::test]
    async fn serves_patient_routes_over_http() {
        let tmp = tempfile::tempdir().unwrap();
        let server = start_api_server(test_config(&tmp))
            .await
            .expect("server should start");
        let port = server.session.port;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("http://127.0.0.1:{port}/create_patients"))
            .json(&serde_json::json!({
                "name": "Huzaifa Khan",
                "age": 27,
                "gender": "male",
                "blood_type": "A+",
                "contact_phone": "0312-3456789",
                "doctor_assigned": "Dr. Hamza"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let patients: Vec<serde_json::Value> = client
            .get(format!("http://127.0.0.1:{port}/patients"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0]["gender"], "Male");

        // Unknown route returns 404
        let resp = client
            .get(format!("http://127.0.0.1:{port}/nonexistent"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.stop().await;
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let mut server = start_api_server(test_config(&tmp))
            .await
            .expect("server should start");

        server.shutdown();
        server.shutdown(); // Second call should be safe
        server.stop().await;
    }
}
