use secure_states::{SnapshotClone, State, state_assign_impl};
use serde::Deserialize;
use std::any::Any;
use thiserror::Error;
use ustr::Ustr;

/// Where the remote auth service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    pub api_base_url: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid environment: {0}")]
    Env(String),
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    secure_api_base_url: Option<String>,
}

impl BusinessConfig {
    /// Local backend address and context path.
    pub const LOCAL_API_BASE_URL: &'static str = "http://localhost:8080/api/v1.0";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
        }
    }

    /// Builds the config from `SECURE_API_BASE_URL`, keeping the build-time default
    /// when the variable is absent.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Result<Self, ConfigError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let vars: Vec<(String, String)> = vars
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_owned(), v.as_ref().to_owned()))
            .collect();
        let raw: RawConfig =
            serde_env::from_iter(vars).map_err(|err| ConfigError::Env(err.to_string()))?;

        Ok(match raw.secure_api_base_url {
            Some(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        })
    }

    /// Reads the process environment after loading an optional `.env` file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded environment from {}", path.display()),
            Err(err) if err.not_found() => {}
            Err(err) => log::warn!("Ignoring unreadable .env file: {err}"),
        }
        Self::from_vars(std::env::vars())
    }

    /// Joins the base URL and an endpoint path.
    pub fn api_url(&self, path: &str) -> Ustr {
        let base = self.api_base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ustr::from(&format!("{base}/{path}"))
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self::new(option_env!("SECURE_API_BASE_URL").unwrap_or(Self::LOCAL_API_BASE_URL))
    }
}

impl SnapshotClone for BusinessConfig {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for BusinessConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}
