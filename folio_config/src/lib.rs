use std::{net::IpAddr, path::Path};

use anyhow::Context;
use config::{Environment, File, FileFormat};
use folio_models::email_address::EmailAddress;
use serde::Deserialize;
use url::Url;

pub use duration::Duration;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Prefix of environment variables overriding config values, e.g.
/// `FOLIO_HTTP__PORT=9000` sets `http.port`.
pub const ENV_PREFIX: &str = "FOLIO";

/// Load the given config files in order and apply overrides from the process
/// environment.
pub fn load(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    load_with_env(paths, None)
}

/// Same as [`load`], but reads environment overrides from `env` instead of the
/// process environment if it is `Some`.
pub fn load_with_env(
    paths: &[impl AsRef<Path>],
    env: Option<config::Map<String, String>>,
) -> anyhow::Result<Config> {
    paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("http.allowed_origins")
                .source(env),
        )
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

pub fn load_default() -> anyhow::Result<Config> {
    load(&[DEFAULT_CONFIG_PATH])
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    /// Name of the environment variable holding the sender account.
    pub username_env: String,
    /// Name of the environment variable holding the sender account's access
    /// credential.
    pub password_env: String,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub dispatch: ContactDispatchMode,
    pub log_delay: Duration,
    pub recipient: Option<EmailAddress>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactDispatchMode {
    Log,
    Email,
}

#[derive(Debug, Deserialize)]
pub struct ClientConfig {
    pub api_url: Url,
    pub confirmation_duration: Duration,
}
