use std::env;

use derive_new::new;
use getset::Getters;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),
}

/// Opaque configuration values supplied by the environment (or a `.env`
/// file loaded by the binary). Read-only for the rest of the crate.
#[derive(Clone, Getters, new)]
pub struct Credentials {
    #[get = "pub"]
    project_id: String,
    device_id: Option<String>,
    #[get = "pub"]
    access_token: String,
}

impl Credentials {
    /// `PROJECT_ID` and `ACCESS_TOKEN` are always required. `DEVICE_ID` is
    /// only required for streaming; device discovery works without it.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            project_id: required("PROJECT_ID")?,
            device_id: optional("DEVICE_ID"),
            access_token: required("ACCESS_TOKEN")?,
        })
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// Streaming targets a concrete device; absence fails here, before any
    /// request is issued.
    pub fn require_device_id(&self) -> Result<&str, ConfigError> {
        self.device_id().ok_or(ConfigError::MissingVar("DEVICE_ID"))
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::MissingVar(name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
