//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the catalog, the session's cart store, and configuration.

use anyhow::Context;
use cart_core::{CartStore, Catalog};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Explicit catalog file; falls back to `config/products.toml` lookup
    pub catalog_path: Option<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            catalog_path: std::env::var("CATALOG_PATH").ok(),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            catalog_path: None,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Product catalog
    pub catalog: Arc<Catalog>,
    /// Cart for the running session
    pub cart: Arc<CartStore>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state from the environment, loading the catalog from disk
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let catalog = load_product_catalog(config.catalog_path.as_deref())?;
        Ok(Self::with_catalog(config, catalog))
    }

    /// Create state around an already loaded catalog, opening a fresh cart session
    pub fn with_catalog(config: AppConfig, catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            cart: Arc::new(CartStore::new()),
            config,
        }
    }
}

/// Load product catalog from config file
fn load_product_catalog(explicit: Option<&str>) -> anyhow::Result<Catalog> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path))?;
        return parse_catalog(path, &content);
    }

    let config_paths = [
        "config/products.toml",
        "../config/products.toml",
        "../../config/products.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            return parse_catalog(path, &content);
        }
    }

    // Return empty catalog if no config found
    tracing::warn!("No product catalog found, using empty catalog");
    Ok(Catalog::new())
}

fn parse_catalog(path: &str, content: &str) -> anyhow::Result<Catalog> {
    let catalog =
        Catalog::from_toml(content).with_context(|| format!("Failed to parse {}", path))?;
    tracing::info!("Loaded {} products from {}", catalog.len(), path);
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..AppConfig::default()
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_bad_host_is_an_error() {
        let config = AppConfig {
            host: "not a host".to_string(),
            ..AppConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_explicit_catalog_path() {
        let path = std::env::temp_dir().join(format!("shop-cart-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[[items]]\nid = \"1\"\nname = \"Cup\"\nprice = 1000\ncategory = \"kitchen\"\n",
        )
        .unwrap();

        let catalog = load_product_catalog(path.to_str()).unwrap();
        assert_eq!(catalog.len(), 1);
        std::fs::remove_file(&path).unwrap();

        assert!(load_product_catalog(Some("/definitely/not/here.toml")).is_err());
    }

    #[test]
    fn test_each_state_opens_its_own_session() {
        let a = AppState::with_catalog(AppConfig::default(), Catalog::new());
        let b = AppState::with_catalog(AppConfig::default(), Catalog::new());
        assert_ne!(a.cart.session_id(), b.cart.session_id());
    }
}
