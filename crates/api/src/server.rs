//! HTTP server bootstrap.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::app::{self, services::AppServices};

/// A server accepting requests on a background task.
pub struct RunningServer {
    /// Base URL, e.g. `http://127.0.0.1:4000`.
    pub url: String,
    handle: JoinHandle<io::Result<()>>,
}

impl RunningServer {
    /// Full URL of the operation endpoint.
    pub fn operations_url(&self) -> String {
        format!("{}{}", self.url, app::OPERATIONS_PATH)
    }

    /// Block until the server stops.
    pub async fn wait(self) -> io::Result<()> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(io::Error::other(e)),
        }
    }

    /// Stop accepting requests.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

/// Bind `0.0.0.0:<port>` (port `0` picks an ephemeral port) and start serving.
pub async fn start(port: u16, services: Arc<AppServices>) -> io::Result<RunningServer> {
    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await?;
    let addr = listener.local_addr()?;
    let url = format!("http://127.0.0.1:{}", addr.port());

    let router = app::build_app(services);
    let handle = tokio::spawn(async move { axum::serve(listener, router).await });

    tracing::info!(%addr, "listening");
    Ok(RunningServer { url, handle })
}
