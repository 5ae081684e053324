//! Configuration for apiq.
//!
//! The backend decides what the three query parameters are called, so the
//! names come from configuration rather than constants:
//!
//! ```toml
//! [param_names]
//! columns = "fields"
//! filters = "where"
//! relationships = "include"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "APIQ_CONFIG";

/// Query parameter names used when sending a built query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamNames {
    pub columns: String,
    pub filters: String,
    pub relationships: String,
}

impl Default for ParamNames {
    fn default() -> Self {
        Self {
            columns: "columns".to_string(),
            filters: "filters".to_string(),
            relationships: "relationships".to_string(),
        }
    }
}

impl ParamNames {
    fn validate(&self) -> ApiResult<()> {
        let names = [&self.columns, &self.filters, &self.relationships];
        if names.iter().any(|n| n.is_empty()) {
            return Err(ApiError::Config("parameter names must not be empty".into()));
        }
        if self.columns == self.filters
            || self.columns == self.relationships
            || self.filters == self.relationships
        {
            return Err(ApiError::Config(format!(
                "parameter names must be distinct (columns='{}', filters='{}', relationships='{}')",
                self.columns, self.filters, self.relationships
            )));
        }
        Ok(())
    }
}

/// Main apiq configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub param_names: ParamNames,
}

impl ApiConfig {
    /// Create a new configuration builder
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::default()
    }

    pub fn from_toml_str(content: &str) -> ApiResult<Self> {
        let config: ApiConfig = toml::from_str(content)?;
        config.param_names.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Locate and load the config file.
    ///
    /// `$APIQ_CONFIG` wins; otherwise `<config dir>/apiq/config.toml` is used
    /// when it exists, and defaults apply when nothing is found.
    pub fn discover() -> ApiResult<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(path);
        }
        match default_path() {
            Some(path) if path.is_file() => Self::load(path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// `<config dir>/apiq/config.toml`, if the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("apiq").join("config.toml"))
}

/// Builder for ApiConfig
#[derive(Debug, Default)]
pub struct ApiConfigBuilder {
    config: ApiConfig,
}

impl ApiConfigBuilder {
    pub fn columns_param(mut self, name: impl Into<String>) -> Self {
        self.config.param_names.columns = name.into();
        self
    }

    pub fn filters_param(mut self, name: impl Into<String>) -> Self {
        self.config.param_names.filters = name.into();
        self
    }

    pub fn relationships_param(mut self, name: impl Into<String>) -> Self {
        self.config.param_names.relationships = name.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> ApiResult<ApiConfig> {
        self.config.param_names.validate()?;
        Ok(self.config)
    }
}
