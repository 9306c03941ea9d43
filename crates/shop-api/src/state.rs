//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the product repository, token service, credential verifier and configuration.
//! Everything is constructed here and injected; nothing lives in a global.

use shop_auth::{BoxedCredentialVerifier, LoginMode, Subject, TokenConfig, TokenService};
use shop_core::{ProductCatalog, ProductRepository, ShopError};
use std::sync::Arc;

/// Subject that a successful login is issued tokens for
pub const DEFAULT_LOGIN_SUBJECT: Subject = 999;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Credential verifier selection
    pub login_mode: LoginMode,
    /// Subject embedded in tokens issued by `/login`
    pub login_subject: Subject,
    /// Seed catalog location (searched for when unset)
    pub catalog_path: Option<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, ShopError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ShopError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                ShopError::Configuration(format!("PORT must be a port number, got {raw:?}"))
            })?,
            None => 8000,
        };

        let login_mode = match lookup("LOGIN_MODE") {
            Some(raw) => raw.parse::<LoginMode>().map_err(ShopError::Configuration)?,
            None => LoginMode::default(),
        };

        let login_subject = match lookup("LOGIN_SUBJECT") {
            Some(raw) => raw.trim().parse::<Subject>().map_err(|_| {
                ShopError::Configuration(format!("LOGIN_SUBJECT must be an integer, got {raw:?}"))
            })?,
            None => DEFAULT_LOGIN_SUBJECT,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            login_mode,
            login_subject,
            catalog_path: lookup("CATALOG_PATH").filter(|p| !p.is_empty()),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, ShopError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ShopError::Configuration(format!("invalid socket address: {e}")))
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
            port: 8000,
            environment: "development".to_string(),
            login_mode: LoginMode::default(),
            login_subject: DEFAULT_LOGIN_SUBJECT,
            catalog_path: None,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Product repository
    pub products: ProductRepository,
    /// Token issuer and verifier
    pub tokens: Arc<TokenService>,
    /// Login decision
    pub verifier: BoxedCredentialVerifier,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let token_config = TokenConfig::from_env()?;

        let catalog = load_product_catalog(config.catalog_path.as_deref())?;
        let products = ProductRepository::from_catalog(catalog);

        Ok(Self::from_parts(
            config.clone(),
            TokenService::new(token_config),
            config.login_mode.verifier(),
            products,
        ))
    }

    /// Assemble state from explicit parts
    pub fn from_parts(
        config: AppConfig,
        tokens: TokenService,
        verifier: BoxedCredentialVerifier,
        products: ProductRepository,
    ) -> Self {
        Self {
            products,
            tokens: Arc::new(tokens),
            verifier,
            config,
        }
    }
}

/// Load the seed catalog from `path`, or from `config/products.toml` when unset
fn load_product_catalog(path: Option<&str>) -> anyhow::Result<ProductCatalog> {
    if let Some(path) = path {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
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
    tracing::warn!("No product catalog found, starting with an empty repository");
    Ok(ProductCatalog::new())
}

fn parse_catalog(path: &str, content: &str) -> anyhow::Result<ProductCatalog> {
    let catalog = ProductCatalog::from_toml(content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
    tracing::info!("Loaded {} products from {}", catalog.products.len(), path);
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.login_mode, LoginMode::CoinFlip);
        assert_eq!(config.login_subject, 999);
        assert!(config.catalog_path.is_none());
        assert!(!config.is_production());
    }

    #[test]
    fn test_app_config_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "3000"),
            ("ENVIRONMENT", "production"),
            ("LOGIN_MODE", "allow-all"),
            ("LOGIN_SUBJECT", "7"),
            ("CATALOG_PATH", "seed.toml"),
        ]))
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.login_mode, LoginMode::AllowAll);
        assert_eq!(config.login_subject, 7);
        assert_eq!(config.catalog_path.as_deref(), Some("seed.toml"));
        assert!(config.is_production());
    }

    #[test]
    fn test_app_config_rejects_bad_values() {
        assert!(AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("LOGIN_MODE", "maybe")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("LOGIN_SUBJECT", "x")])).is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..AppConfig::default()
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");

        let bad = AppConfig {
            host: "not a host".to_string(),
            ..AppConfig::default()
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_missing_explicit_catalog_is_an_error() {
        assert!(load_product_catalog(Some("does/not/exist.toml")).is_err());
    }
}
