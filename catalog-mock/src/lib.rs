//! Catalog Mock - scripted stand-in for the remote catalog API
//!
//! Serves the establishment, category and product endpoints from in-memory
//! fixtures, records every product update it receives, and can be told to
//! misbehave per establishment (malformed bodies, stalled responses, error
//! statuses) so failure isolation can be exercised over real HTTP.

pub mod api;
pub mod state;

pub use state::{CategoryRequest, MockCatalog, RecordedPatch};

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Running mock server bound to an ephemeral local port
pub struct MockServer {
    pub addr: SocketAddr,
    pub catalog: Arc<MockCatalog>,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Base URL to hand to the catalog client
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serve `catalog` on `127.0.0.1:0`
pub async fn spawn(catalog: MockCatalog) -> std::io::Result<MockServer> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    serve_on(listener, catalog)
}

/// Serve `catalog` on an already bound listener
pub fn serve_on(
    listener: tokio::net::TcpListener,
    catalog: MockCatalog,
) -> std::io::Result<MockServer> {
    let addr = listener.local_addr()?;
    let catalog = Arc::new(catalog);
    let app = api::router(catalog.clone());

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Mock catalog server error: {e}");
        }
    });

    Ok(MockServer {
        addr,
        catalog,
        handle,
    })
}
