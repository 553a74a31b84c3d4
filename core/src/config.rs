//! Client configuration.
//!
//! The four values the pipeline needs at call time (credential, timeout,
//! redirect limit, debug flag) plus where the API lives. A `ClientConfig` is
//! moved into the client when it is built and never changes afterwards.
//!
//! # Environment
//!
//! [`ClientConfig::from_env`] layers `CRUNCHBASE_*` variables over the
//! built-in defaults with figment. `CRUNCHBASE_USER_KEY` maps to `user_key`,
//! `CRUNCHBASE_TIMEOUT_MS` to `timeout_ms`, and so on; `CRUNCHBASE_API_URL`
//! is accepted for `base_url`.

use std::time::Duration;

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ClientError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.crunchbase.com";
pub const DEFAULT_API_VERSION: &str = "3.1";
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_REDIRECT_LIMIT: u32 = 2;

const ENV_PREFIX: &str = "CRUNCHBASE_";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(deserialize_with = "text")]
    pub api_version: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "optional_text")]
    pub user_key: Option<String>,
    /// Overall deadline for one logical request, redirects included.
    pub timeout_ms: u64,
    pub redirect_limit: u32,
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_key: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            redirect_limit: DEFAULT_REDIRECT_LIMIT,
            debug: false,
        }
    }
}

impl ClientConfig {
    /// Defaults with `base_url` replaced, e.g. for a local mock server.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_user_key(mut self, key: impl Into<String>) -> Self {
        self.user_key = Some(key.into());
        self
    }

    /// Millisecond precision; anything finer is dropped.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_redirect_limit(mut self, limit: u32) -> Self {
        self.redirect_limit = limit;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// The provider chain: defaults, then `CRUNCHBASE_*` variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(
            Env::prefixed(ENV_PREFIX).map(|key| match key.as_str() {
                "api_url" => "base_url".into(),
                other => other.into(),
            }),
        )
    }

    /// Read `CRUNCHBASE_*` environment variables over the defaults. An
    /// empty user key counts as missing.
    pub fn from_env() -> Result<Self> {
        Self::from_figment(&Self::figment())
    }

    /// Extract from any figment, e.g. one with extra providers merged in.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let mut config: Self = figment.extract().map_err(config_error)?;
        config.user_key = config.user_key.filter(|k| !k.is_empty());
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// `{base_url}/v{version}/`, with any trailing slash on the base removed.
    pub fn api_url(&self) -> String {
        format!("{}/v{}/", self.base_url.trim_end_matches('/'), self.api_version)
    }
}

/// Environment values arrive parsed, so `3.1` or an all-digit key comes in
/// as a number. Textual fields take them back as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Text {
    String(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
}

impl From<Text> for String {
    fn from(raw: Text) -> Self {
        match raw {
            Text::String(s) => s,
            Text::Unsigned(n) => n.to_string(),
            Text::Signed(n) => n.to_string(),
            Text::Float(n) => n.to_string(),
            Text::Bool(b) => b.to_string(),
        }
    }
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Text::deserialize(deserializer).map(String::from)
}

fn optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Option::<Text>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

fn config_error(e: figment::Error) -> ClientError {
    let field = if e.path.is_empty() {
        "config".to_string()
    } else {
        e.path.join(".")
    };
    ClientError::Config {
        field,
        reason: e.kind.to_string(),
    }
}
