//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SHOPHUB_CATALOG_URL` - Catalog API base URL (default: <https://dummyjson.com>)
//! - `SHOPHUB_DATA_DIR` - Directory for persisted cart and wishlist (default: .shophub)
//! - `SHOPHUB_CATALOG_TIMEOUT_SECS` - Catalog request timeout (default: 10)
//! - `SHOPHUB_CACHE_TTL_SECS` - Catalog response cache TTL (default: 300)
//! - `SHOPHUB_PAGE_SIZE` - Products per listing page (default: 12)
//! - `SHOPHUB_PROMO_CODES` - Promo table as `CODE=PERCENT[,CODE=PERCENT...]`,
//!   replacing the built-in codes
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use shophub_core::PromoPolicy;
use shophub_core::filter::DEFAULT_PAGE_SIZE;
use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com";
const DEFAULT_DATA_DIR: &str = ".shophub";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog API settings
    pub catalog: CatalogConfig,
    /// Directory holding `cart.json` and `wishlist.json`
    pub data_dir: PathBuf,
    /// Products per listing page
    pub page_size: usize,
    /// Accepted promo codes
    pub promo_policy: PromoPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL; endpoints are appended as path segments
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long fetched products stay cached
    pub cache_ttl: Duration,
}

impl CatalogConfig {
    /// Defaults pointed at `base_url`.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if any variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_base_url(
            "SHOPHUB_CATALOG_URL",
            &get_env_or_default("SHOPHUB_CATALOG_URL", DEFAULT_CATALOG_URL),
        )?;
        let timeout = parse_secs(
            "SHOPHUB_CATALOG_TIMEOUT_SECS",
            get_optional_env("SHOPHUB_CATALOG_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        )?;
        let cache_ttl = parse_secs(
            "SHOPHUB_CACHE_TTL_SECS",
            get_optional_env("SHOPHUB_CACHE_TTL_SECS"),
            DEFAULT_CACHE_TTL_SECS,
        )?;
        let page_size = parse_page_size(
            "SHOPHUB_PAGE_SIZE",
            get_optional_env("SHOPHUB_PAGE_SIZE"),
        )?;
        let promo_policy = parse_promo_policy(
            "SHOPHUB_PROMO_CODES",
            get_optional_env("SHOPHUB_PROMO_CODES"),
        )?;

        Ok(Self {
            catalog: CatalogConfig {
                base_url,
                timeout,
                cache_ttl,
            },
            data_dir: PathBuf::from(get_env_or_default("SHOPHUB_DATA_DIR", DEFAULT_DATA_DIR)),
            page_size,
            promo_policy,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn invalid(key: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

/// Parse the catalog base URL. It must be an absolute http(s) URL.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|e| invalid(key, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(key, format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(url)
}

fn parse_secs(key: &str, value: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    let secs = match value {
        Some(v) => v.trim().parse::<u64>().map_err(|e| invalid(key, e))?,
        None => default,
    };
    if secs == 0 {
        return Err(invalid(key, "must be at least 1 second"));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_page_size(key: &str, value: Option<String>) -> Result<usize, ConfigError> {
    let Some(value) = value else {
        return Ok(DEFAULT_PAGE_SIZE);
    };
    let size = value.trim().parse::<usize>().map_err(|e| invalid(key, e))?;
    if size == 0 {
        return Err(invalid(key, "must be at least 1"));
    }
    Ok(size)
}

fn parse_promo_policy(key: &str, value: Option<String>) -> Result<PromoPolicy, ConfigError> {
    value.map_or_else(
        || Ok(PromoPolicy::default()),
        |codes| PromoPolicy::parse(&codes).map_err(|e| invalid(key, e)),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url() {
        let url = parse_base_url("K", "http://127.0.0.1:8080").unwrap();
        assert_eq!(url.port(), Some(8080));

        assert!(matches!(
            parse_base_url("K", "not a url"),
            Err(ConfigError::InvalidEnvVar(k, _)) if k == "K"
        ));
        assert!(parse_base_url("K", "ftp://example.com").is_err());
    }

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("K", None, 10).unwrap(), Duration::from_secs(10));
        assert_eq!(
            parse_secs("K", Some(" 30 ".to_string()), 10).unwrap(),
            Duration::from_secs(30)
        );
        assert!(parse_secs("K", Some("0".to_string()), 10).is_err());
        assert!(parse_secs("K", Some("-5".to_string()), 10).is_err());
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("K", None).unwrap(), DEFAULT_PAGE_SIZE);
        assert_eq!(parse_page_size("K", Some("24".to_string())).unwrap(), 24);
        assert!(parse_page_size("K", Some("0".to_string())).is_err());
        assert!(parse_page_size("K", Some("twelve".to_string())).is_err());
    }

    #[test]
    fn test_parse_promo_policy() {
        let default = parse_promo_policy("K", None).unwrap();
        assert_eq!(default, PromoPolicy::default());

        let custom = parse_promo_policy("K", Some("FLASH=30".to_string())).unwrap();
        assert_eq!(custom.lookup("flash").map(|p| p.discount), Some(30));
        assert!(custom.lookup("SAVE10").is_none());

        assert!(parse_promo_policy("K", Some("FLASH=300".to_string())).is_err());
    }

    #[test]
    fn test_catalog_config_defaults() {
        let config = CatalogConfig::new(Url::parse(DEFAULT_CATALOG_URL).unwrap());
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
    }
}
