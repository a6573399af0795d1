//! Liveness endpoint answering `ok` to any request.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::error;

pub(crate) const HEALTH_RESPONSE_BODY: &str = "ok";

pub(crate) struct HealthServer {
    pub(crate) local_addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl HealthServer {
    pub(crate) fn shutdown(self) {
        self.handle.abort();
    }
}

pub(crate) fn build_health_router() -> Router {
    Router::new().fallback(handle_liveness_check)
}

async fn handle_liveness_check() -> &'static str {
    HEALTH_RESPONSE_BODY
}

/// Binds `bind` and serves the liveness router on a background task.
pub(crate) async fn spawn_health_server(bind: SocketAddr) -> Result<HealthServer> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind liveness endpoint on {bind}"))?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve bound liveness endpoint address")?;
    let handle = tokio::spawn(async move {
        if let Err(serve_error) = axum::serve(listener, build_health_router()).await {
            error!(error = %serve_error, "liveness endpoint exited unexpectedly");
        }
    });
    Ok(HealthServer { local_addr, handle })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn integration_health_endpoint_answers_ok_for_any_path_and_method() {
        let server = spawn_health_server("127.0.0.1:0".parse().expect("addr"))
            .await
            .expect("health server");
        let base = format!("http://{}", server.local_addr);
        let client = reqwest::Client::new();

        let root = client.get(&base).send().await.expect("get root");
        assert_eq!(root.status(), reqwest::StatusCode::OK);
        assert_eq!(root.text().await.expect("body"), "ok");

        let nested = client
            .post(format!("{base}/anything/else"))
            .body("ignored")
            .send()
            .await
            .expect("post nested");
        assert_eq!(nested.status(), reqwest::StatusCode::OK);
        assert_eq!(nested.text().await.expect("body"), "ok");

        server.shutdown();
    }

    #[tokio::test]
    async fn regression_health_server_reports_bind_conflicts() {
        let first = spawn_health_server("127.0.0.1:0".parse().expect("addr"))
            .await
            .expect("first server");
        let error = match spawn_health_server(first.local_addr).await {
            Ok(_) => panic!("second bind on the same port must fail"),
            Err(error) => error,
        };
        assert!(error.to_string().contains("failed to bind liveness endpoint"));
        first.shutdown();
    }
}
