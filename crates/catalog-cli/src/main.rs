mod cli;
mod commands;

use anyhow::Result;
use catalog_config::Config;
use catalog_engine::Catalog;
use catalog_storage::{BlobStore, Storage};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = Some(data_dir);
    }

    let catalog = open_catalog(&config).await?;

    match cli.command {
        cli::Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            commands::serve::handle(catalog, &host, port, &config.server.front_url).await
        }
        cli::Commands::Item(item_cmd) => commands::item::handle(item_cmd, &catalog).await,
        cli::Commands::Categories => commands::item::categories(&catalog).await,
    }
}

/// Open the database and image directory named by the config
async fn open_catalog(config: &Config) -> Result<Catalog> {
    let storage = Storage::new(Some(config.storage.database_path())).await?;
    let blobs = BlobStore::new(config.storage.images_path())?
        .with_placeholder(config.storage.placeholder.clone());

    if !blobs.placeholder_path().exists() {
        tracing::warn!(
            path = %blobs.placeholder_path().display(),
            "placeholder image missing; unresolvable images will fail"
        );
    }

    Ok(Catalog::new(storage, blobs))
}
