use anyhow::{Context, Result};
use catalog_core::{Item, ItemId, NewItem};
use catalog_engine::Catalog;
use std::path::Path;

use crate::cli::ItemCommands;

pub async fn handle(cmd: ItemCommands, catalog: &Catalog) -> Result<()> {
    match cmd {
        ItemCommands::Add {
            name,
            category,
            image,
        } => add(catalog, &name, &category, &image).await.map(|_| ()),
        ItemCommands::List { json } => list(catalog, json).await,
        ItemCommands::Show { id } => show(catalog, &id).await,
        ItemCommands::Search { keyword } => search(catalog, &keyword).await,
        ItemCommands::Image { id, output } => image(catalog, &id, &output).await,
    }
}

async fn add(catalog: &Catalog, name: &str, category: &str, image: &Path) -> Result<ItemId> {
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("failed to read image {}", image.display()))?;

    let id = catalog
        .add_item(NewItem::new(name, category, &bytes))
        .await?;
    let item = catalog.get_item(id).await?;

    println!("✓ Added item: {}", item.name);
    println!("  ID: {}", item.id);
    println!("  Category: {}", item.category);
    println!("  Image: {}", item.image_name);

    Ok(id)
}

async fn list(catalog: &Catalog, json: bool) -> Result<()> {
    let items = catalog.list_items().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No items found.");
        return Ok(());
    }

    println!("Items:");
    print_items(&items);
    Ok(())
}

async fn show(catalog: &Catalog, id: &str) -> Result<()> {
    let id: ItemId = id.parse()?;
    let item = catalog.get_item(id).await?;

    println!("Item: {}", item.name);
    println!("  ID: {}", item.id);
    println!("  Category: {}", item.category);
    println!("  Image: {}", item.image_name);

    Ok(())
}

async fn search(catalog: &Catalog, keyword: &str) -> Result<()> {
    let items = catalog.search_items(keyword).await?;

    if items.is_empty() {
        println!("No items matching {:?}.", keyword);
        return Ok(());
    }

    println!("Items matching {:?}:", keyword);
    print_items(&items);
    Ok(())
}

async fn image(catalog: &Catalog, id: &str, output: &Path) -> Result<()> {
    let id: ItemId = id.parse()?;
    let image = catalog.fetch_image(id).await?;

    tokio::fs::write(output, &image.bytes)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;

    if image.placeholder {
        println!("⚠ No photo for item {}, wrote placeholder", id);
    } else {
        println!("✓ Wrote photo for item {}", id);
    }
    println!("  Output: {} ({} bytes)", output.display(), image.bytes.len());

    Ok(())
}

pub async fn categories(catalog: &Catalog) -> Result<()> {
    let categories = catalog.list_categories().await?;

    if categories.is_empty() {
        println!("No categories found.");
        return Ok(());
    }

    println!("Categories:");
    for category in categories {
        println!("  {} ({})", category.name, category.id);
    }

    Ok(())
}

fn print_items(items: &[Item]) {
    for item in items {
        println!("  [{}] {}", item.id, item.name);
        println!("    Category: {}", item.category);
    }
}
