use serde::Deserialize;
use validator::Validate;

/// Top-level configuration of the storefront service.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Key used to sign the flash-message cookie.
    #[validate(length(min = 32, message = "secret_key must be at least 32 characters"))]
    pub secret_key: String,
    #[serde(default)]
    pub media: MediaConfig,
    pub payments: PaymentConfig,
}

/// Locations of the two blob directories.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Private directory holding downloadable product files.
    #[serde(default = "default_files_dir")]
    pub files_dir: String,
    /// Web root whose `products/` subdirectory holds preview images.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            files_dir: default_files_dir(),
            public_dir: default_public_dir(),
        }
    }
}

/// Credentials and options for the payment gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    pub secret_key: String,
    pub publishable_key: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_database_url() -> String {
    "storefront.db".to_string()
}

fn default_files_dir() -> String {
    "products".to_string()
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_currency() -> String {
    "aud".to_string()
}

fn default_api_base() -> String {
    "https://api.stripe.com".to_string()
}
