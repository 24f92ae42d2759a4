use anyhow::Result;
use catalog_engine::Catalog;
use catalog_server::CatalogServer;
use std::sync::Arc;

pub async fn handle(catalog: Catalog, host: &str, port: u16, front_url: &str) -> Result<()> {
    println!("Starting catalog server on {}:{}", host, port);
    println!("  Images: {}", catalog.blobs().root().display());
    println!("  CORS origin: {}", front_url);

    CatalogServer::serve(Arc::new(catalog), host, port, front_url).await
}
