//! Local sandbox serving the demo catalog
//!
//! ```ignore
//! MOCK_PORT=8000 cargo run -p catalog-mock
//! CATALOG_BASE_URL=http://127.0.0.1:8000 CATALOG_API_KEY=sandbox upcharge-patch run --all
//! ```

use catalog_mock::MockCatalog;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_mock=info".into()),
        )
        .init();

    let port: u16 = std::env::var("MOCK_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let api_key = std::env::var("MOCK_API_KEY").unwrap_or_else(|_| "sandbox".into());

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let catalog = MockCatalog::demo().with_api_key(api_key);
    let server = catalog_mock::serve_on(listener, catalog)?;
    tracing::info!("Mock catalog listening on {}", server.url());

    tokio::signal::ctrl_c().await?;
    tracing::info!(
        patches = server.catalog.patches().len(),
        "Mock catalog shutting down"
    );
    Ok(())
}
