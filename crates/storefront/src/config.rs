//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (sitemap `<loc>` prefix)
//! - `SHOPIFY_STORE_DOMAIN` - Shopify store domain (e.g., your-store.myshopify.com),
//!   falls back to `SHOPIFY_STORE`
//! - `SHOPIFY_ADMIN_ACCESS_TOKEN` - Admin API access token (discounts, price updates)
//! - `SHOPIFY_STOREFRONT_PRIVATE_TOKEN` or `SHOPIFY_STOREFRONT_ACCESS_TOKEN` -
//!   Storefront API token (private preferred)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SHOPIFY_API_VERSION` - API version (default: 2026-01)
//! - `SHOPIFY_STORE_URL` - Public store URL used for checkout permalinks, falls back
//!   to `NEXT_PUBLIC_SHOPIFY_STORE_URL`, then `https://{SHOPIFY_STORE_DOMAIN}`
//! - `SHOPIFY_WEBHOOK_SECRET` - Webhook HMAC secret (webhooks rejected when unset)
//! - `REVALIDATE_SECRET` - Cache revalidation secret (endpoint rejects when unset)
//! - `PROMOTIONS_CACHE_TTL_SECS` - Promotions cache TTL (default: 300)
//! - `DEALS_COLLECTION_HANDLE` - Collection checked for markdowns by header detection
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_PROMOTIONS_TTL_SECS: u64 = 300;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Shopify API configuration
    pub shopify: ShopifyConfig,
    /// Promotions cache configuration
    pub promotions: PromotionsConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Storefront API access token.
///
/// Private tokens are server-side only; public tokens are the ones that would
/// otherwise be embedded in a browser bundle.
#[derive(Clone)]
pub enum StorefrontToken {
    /// `Shopify-Storefront-Private-Token`
    Private(SecretString),
    /// `X-Shopify-Storefront-Access-Token`
    Public(SecretString),
}

impl StorefrontToken {
    /// The HTTP header this token is sent in.
    #[must_use]
    pub const fn header_name(&self) -> &'static str {
        match self {
            Self::Private(_) => "Shopify-Storefront-Private-Token",
            Self::Public(_) => "X-Shopify-Storefront-Access-Token",
        }
    }

    /// The token secret.
    #[must_use]
    pub const fn secret(&self) -> &SecretString {
        match self {
            Self::Private(s) | Self::Public(s) => s,
        }
    }
}

/// Shopify API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store_domain: String,
    /// Public store URL for checkout permalinks (e.g., <https://shop.example.com>)
    pub store_url: String,
    /// Shopify API version (e.g., 2026-01)
    pub api_version: String,
    /// Storefront API token
    pub storefront_token: StorefrontToken,
    /// Admin API access token
    pub admin_access_token: SecretString,
    /// Shared secret for webhook HMAC verification
    pub webhook_secret: Option<SecretString>,
    /// Shared secret for the revalidation endpoint
    pub revalidate_secret: Option<SecretString>,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token_kind = match self.storefront_token {
            StorefrontToken::Private(_) => "private",
            StorefrontToken::Public(_) => "public",
        };
        f.debug_struct("ShopifyConfig")
            .field("store_domain", &self.store_domain)
            .field("store_url", &self.store_url)
            .field("api_version", &self.api_version)
            .field("storefront_token", &format!("[REDACTED {token_kind}]"))
            .field("admin_access_token", &"[REDACTED]")
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "revalidate_secret",
                &self.revalidate_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ShopifyConfig {
    /// Storefront API GraphQL endpoint.
    #[must_use]
    pub fn storefront_endpoint(&self) -> String {
        format!(
            "https://{}/api/{}/graphql.json",
            self.store_domain, self.api_version
        )
    }

    /// Admin API GraphQL endpoint.
    #[must_use]
    pub fn admin_endpoint(&self) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            self.store_domain, self.api_version
        )
    }
}

/// Promotions cache and banner configuration.
#[derive(Debug, Clone)]
pub struct PromotionsConfig {
    /// How long a cached promotions read stays fresh
    pub cache_ttl: Duration,
    /// Collection whose products are checked for markdowns by header detection
    pub deals_collection_handle: Option<String>,
}

impl Default for PromotionsConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DEFAULT_PROMOTIONS_TTL_SECS),
            deals_collection_handle: None,
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
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = parse_env_or_default("STOREFRONT_PORT", 3000_u16)?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;

        let shopify = ShopifyConfig::from_env()?;
        let promotions = PromotionsConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            shopify,
            promotions,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", 1.0_f32)?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", 0.0_f32)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ShopifyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let store_domain = get_env_with_fallback("SHOPIFY_STORE_DOMAIN", "SHOPIFY_STORE")
            .ok_or_else(|| ConfigError::MissingEnvVar("SHOPIFY_STORE_DOMAIN".to_string()))?;

        let store_url = get_env_with_fallback("SHOPIFY_STORE_URL", "NEXT_PUBLIC_SHOPIFY_STORE_URL")
            .unwrap_or_else(|| format!("https://{store_domain}"));

        let storefront_token = if let Some(token) = get_optional_env("SHOPIFY_STOREFRONT_PRIVATE_TOKEN")
        {
            StorefrontToken::Private(SecretString::from(token))
        } else if let Some(token) = get_optional_env("SHOPIFY_STOREFRONT_ACCESS_TOKEN") {
            StorefrontToken::Public(SecretString::from(token))
        } else {
            return Err(ConfigError::MissingEnvVar(
                "SHOPIFY_STOREFRONT_PRIVATE_TOKEN".to_string(),
            ));
        };

        Ok(Self {
            store_domain,
            store_url,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", "2026-01"),
            storefront_token,
            admin_access_token: get_required_secret("SHOPIFY_ADMIN_ACCESS_TOKEN")?,
            webhook_secret: get_optional_validated_secret("SHOPIFY_WEBHOOK_SECRET")?,
            revalidate_secret: get_optional_validated_secret("REVALIDATE_SECRET")?,
        })
    }
}

impl PromotionsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let ttl_secs =
            parse_env_or_default("PROMOTIONS_CACHE_TTL_SECS", DEFAULT_PROMOTIONS_TTL_SECS)?;
        Ok(Self {
            cache_ttl: Duration::from_secs(ttl_secs),
            deals_collection_handle: get_optional_env("DEALS_COLLECTION_HANDLE"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable, falling back to a legacy name.
fn get_env_with_fallback(primary_key: &str, fallback_key: &str) -> Option<String> {
    get_optional_env(primary_key).or_else(|| get_optional_env(fallback_key))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, using a default when unset.
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate an optional secret from environment.
///
/// Unset is fine; a set-but-weak secret is a configuration error.
fn get_optional_validated_secret(key: &str) -> Result<Option<SecretString>, ConfigError> {
    get_optional_env(key)
        .map(|value| {
            validate_secret_strength(&value, key)?;
            Ok(SecretString::from(value))
        })
        .transpose()
}
