use std::collections::HashMap;
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use common::ValidationRules;

use crate::smoke::SmokeConfig;

/// Backend connection settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Default: "http://localhost:5000".
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. Default: 30.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token sent with every request.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:5000".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AdminConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub rules: ValidationRules,
    #[serde(default)]
    pub smoke: SmokeConfig,
}

const ENV_PREFIX: &str = "JUDGING";
const DEFAULT_CONFIG_PATH: &str = "config/admin";

impl AdminConfig {
    /// Load from `path` (or `JUDGING_CONFIG`, or `config/admin`) and the
    /// process environment (e.g., JUDGING__API__BASE_URL).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env = Environment::with_prefix(ENV_PREFIX).separator("__");
        Self::build(path, env)
    }

    /// Same as [`AdminConfig::load`] but reads variables from `vars`
    /// instead of the process environment.
    pub fn load_with_env(
        path: Option<&Path>,
        vars: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let env = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .source(Some(vars));
        Self::build(path, env)
    }

    fn build(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => {
                let name = std::env::var("JUDGING_CONFIG")
                    .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
                File::with_name(&name).required(false)
            }
        };

        let s = Config::builder()
            .set_default("api.base_url", default_base_url())?
            .set_default("api.timeout_secs", default_timeout_secs() as i64)?
            .add_source(file)
            .add_source(env)
            .build()?;

        let config: AdminConfig = s.try_deserialize()?;
        config
            .rules
            .check()
            .map_err(|e| ConfigError::Message(format!("invalid rules: {e}")))?;
        Ok(config)
    }
}
