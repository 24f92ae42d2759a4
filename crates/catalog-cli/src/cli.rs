use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Item catalog with content-addressed photos", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding the database and images (overrides config)
    #[arg(long, global = true, env = "CATALOG_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Manage items
    #[command(subcommand)]
    Item(ItemCommands),

    /// List all categories
    Categories,
}

#[derive(Subcommand)]
pub enum ItemCommands {
    /// Add an item with its photo
    Add {
        /// Item name
        name: String,

        /// Category name (created if new)
        category: String,

        /// Path to the photo
        image: PathBuf,
    },

    /// List all items
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show item details
    Show {
        /// Item ID
        id: String,
    },

    /// Find items whose name contains a keyword
    Search {
        /// Substring to match (case-sensitive)
        keyword: String,
    },

    /// Write an item's photo to a file
    Image {
        /// Item ID
        id: String,

        /// Output file
        #[arg(long, short)]
        output: PathBuf,
    },
}
