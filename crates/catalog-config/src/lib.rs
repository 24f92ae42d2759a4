use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the allowed CORS origin
pub const FRONT_URL_ENV: &str = "FRONT_URL";

/// Simple configuration for the catalog service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origin allowed by CORS (the web front end)
    #[serde(default = "default_front_url")]
    pub front_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root for the database and image directory; platform data dir if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_images_dir")]
    pub images_dir: String,

    /// File inside the image directory served when an image cannot be resolved
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            front_url: default_front_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            database: default_database(),
            images_dir: default_images_dir(),
            placeholder: default_placeholder(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9000
}

fn default_front_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_database() -> String {
    "catalog.sqlite3".to_string()
}

fn default_images_dir() -> String {
    "images".to_string()
}

fn default_placeholder() -> String {
    "default.jpg".to_string()
}

impl StorageConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(&self.database)
    }

    pub fn images_path(&self) -> PathBuf {
        self.data_dir().join(&self.images_dir)
    }
}

fn default_data_dir() -> PathBuf {
    if let Some(dirs) = directories::ProjectDirs::from("com", "catalog", "catalog") {
        dirs.data_dir().to_path_buf()
    } else {
        PathBuf::from(".catalog")
    }
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let config = Self::load_from(&Self::config_path())?;
        Ok(config.with_front_url(std::env::var(FRONT_URL_ENV).ok()))
    }

    /// Load config from `path`, writing the defaults there if it does not exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(path, content)?;
            Ok(config)
        }
    }

    /// Override the CORS origin when a non-empty value is given
    pub fn with_front_url(mut self, front_url: Option<String>) -> Self {
        if let Some(url) = front_url.filter(|u| !u.trim().is_empty()) {
            self.server.front_url = url;
        }
        self
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "catalog", "catalog") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from(".catalog/config.toml")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.front_url, "http://localhost:3000");
        assert_eq!(config.storage.placeholder, "default.jpg");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.storage.database, config.storage.database);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml_str = r#"
[server]
port = 8080

[storage]
data_dir = "/srv/catalog"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(
            config.storage.database_path(),
            PathBuf::from("/srv/catalog/catalog.sqlite3")
        );
        assert_eq!(
            config.storage.images_path(),
            PathBuf::from("/srv/catalog/images")
        );
    }

    #[test]
    fn test_front_url_override() {
        let config = Config::default().with_front_url(Some("https://shop.example".into()));
        assert_eq!(config.server.front_url, "https://shop.example");

        let config = Config::default().with_front_url(Some("  ".into()));
        assert_eq!(config.server.front_url, "http://localhost:3000");
    }

    #[test]
    fn test_load_from_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.server.port, 9000);

        std::fs::write(&path, "[server]\nport = 9100\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap().server.port, 9100);
    }
}
