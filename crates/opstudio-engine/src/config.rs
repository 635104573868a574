//! Layered studio configuration
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. TOML file (`opstudio.toml` in the working directory, or an explicit path)
//! 3. `OPSTUDIO_*` environment variables, after loading `.env`

use ::config::{Config, Environment, File, FileFormat};
use opstudio_core::errors::{Result, StudioError};
use opstudio_core::logging_facility::Profile;
use opstudio_core::navigation::RULE_LISTING_PATH;
use opstudio_core_types::Sensitive;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "opstudio.toml";
pub const ENV_PREFIX: &str = "OPSTUDIO";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// Origin of the rule backend, without the `/api/...` path
    pub api_base_url: String,
    /// Route opened after a successful save
    pub listing_route: String,
    pub request_timeout_secs: u64,
    pub log_profile: String,
    pub auth_token: Option<Sensitive<String>>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            listing_route: RULE_LISTING_PATH.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_profile: "development".to_string(),
            auth_token: None,
        }
    }
}

impl StudioConfig {
    /// Load from all sources, reading `.env` and the process environment
    ///
    /// # Errors
    ///
    /// `StudioError::Configuration` if a source is unreadable, a value has
    /// the wrong type, or the result fails [`StudioConfig::validate`]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_with_env(path, None)
    }

    /// Load with an explicit environment map instead of the process env
    ///
    /// # Errors
    ///
    /// See [`StudioConfig::load`]
    pub fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).format(FileFormat::Toml).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
        };
        let environment = Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(env);

        let config: StudioConfig = Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| StudioError::Configuration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// `StudioError::Configuration` naming the first offending key
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(StudioError::Configuration { message });

        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return invalid(format!(
                "api_base_url must be an http(s) URL, got `{}`",
                self.api_base_url
            ));
        }
        if !self.listing_route.starts_with('/') {
            return invalid(format!(
                "listing_route must start with `/`, got `{}`",
                self.listing_route
            ));
        }
        if self.request_timeout_secs == 0 {
            return invalid("request_timeout_secs must be greater than zero".to_string());
        }
        self.profile().map(|_| ())
    }

    /// # Errors
    ///
    /// `StudioError::Configuration` for an unknown profile name
    pub fn profile(&self) -> Result<Profile> {
        self.log_profile
            .parse()
            .map_err(|message| StudioError::Configuration { message })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Full URL of the rule creation endpoint
    pub fn rules_endpoint(&self) -> String {
        format!(
            "{}{}",
            self.api_base_url.trim_end_matches('/'),
            crate::transport::RULES_API_PATH
        )
    }
}
