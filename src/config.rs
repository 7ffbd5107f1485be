//! Batch configuration: strategy and deserializer selectors plus transport settings.
//!
//! Selectors are kept as strings until [`BatchConfig::resolve`], which maps them
//! onto the closed [`Strategy`] and [`AnyDeserializer`] sets. An unknown name
//! is a configuration error raised before anything is prepared or sent.
//!
//! ```yaml
//! strategy:
//!   kind: bounded-concurrent
//!   max_degree: 5
//! deserializer:
//!   kind: json
//!   json:
//!     pointer: /data
//! transport:
//!   timeout_ms: 10000
//! ```

use crate::batch::Strategy;
use crate::deserializer::{AnyDeserializer, DeserializerKind, JsonOptions, MarkupOptions};
use crate::transport::{HttpTransport, TransportConfig};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategyConfig {
    /// `sequential` or `bounded-concurrent` (aliases: `sequence`, `threaded`, `concurrent`).
    pub kind: String,
    /// In-flight limit for bounded concurrency; defaults to 3.
    pub max_degree: Option<usize>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            kind: "sequential".to_string(),
            max_degree: None,
        }
    }
}

impl StrategyConfig {
    pub fn resolve(&self) -> Result<Strategy> {
        let strategy: Strategy = self.kind.parse()?;
        match (strategy, self.max_degree) {
            (Strategy::BoundedConcurrent { .. }, Some(degree)) => {
                Strategy::bounded_concurrent(degree)
            }
            (Strategy::Sequential, Some(degree)) if degree != 1 => {
                warn!(max_degree = degree, "max_degree has no effect on the sequential strategy");
                Ok(strategy)
            }
            _ => Ok(strategy),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeserializerConfig {
    /// `default`, `json`, `text` or `markup`.
    pub kind: String,
    pub json: JsonOptions,
    pub markup: MarkupOptions,
}

impl Default for DeserializerConfig {
    fn default() -> Self {
        Self {
            kind: "default".to_string(),
            json: JsonOptions::default(),
            markup: MarkupOptions::default(),
        }
    }
}

impl DeserializerConfig {
    pub fn resolve(&self) -> Result<AnyDeserializer> {
        self.kind
            .parse::<DeserializerKind>()?
            .build(self.json.clone(), self.markup.clone())
    }
}

/// Everything needed to run a configuration-driven batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    pub strategy: StrategyConfig,
    pub deserializer: DeserializerConfig,
    pub transport: TransportConfig,
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, kind: impl Into<String>) -> Self {
        self.strategy.kind = kind.into();
        self
    }

    pub fn with_max_degree(mut self, degree: usize) -> Self {
        self.strategy.max_degree = Some(degree);
        self
    }

    pub fn with_deserializer(mut self, kind: impl Into<String>) -> Self {
        self.deserializer.kind = kind.into();
        self
    }

    pub fn with_json_options(mut self, options: JsonOptions) -> Self {
        self.deserializer.json = options;
        self
    }

    pub fn with_markup_options(mut self, options: MarkupOptions) -> Self {
        self.deserializer.markup = options;
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    /// Parse YAML (or JSON, which is valid YAML).
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).map_err(|e| {
            Error::configuration_with_context(
                "malformed batch configuration",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("config_loader"),
            )
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read batch configuration '{}'", path.display()),
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("config_loader"),
            )
        })?;
        Self::from_yaml_str(&source)
    }

    /// Build from the environment, falling back to defaults for unset variables.
    ///
    /// - `REQUESTS_BATCH_STRATEGY`
    /// - `REQUESTS_BATCH_MAX_DEGREE`
    /// - `REQUESTS_BATCH_DESERIALIZER`
    /// - transport variables, see [`TransportConfig::from_env`]
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new().with_transport(TransportConfig::from_env()?);
        if let Ok(kind) = env::var("REQUESTS_BATCH_STRATEGY") {
            config.strategy.kind = kind;
        }
        if let Ok(raw) = env::var("REQUESTS_BATCH_MAX_DEGREE") {
            let degree = raw.trim().parse::<usize>().map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid max degree '{}'", raw),
                    ErrorContext::new()
                        .with_field_path("REQUESTS_BATCH_MAX_DEGREE")
                        .with_details(e.to_string())
                        .with_source("config_loader"),
                )
            })?;
            config.strategy.max_degree = Some(degree);
        }
        if let Ok(kind) = env::var("REQUESTS_BATCH_DESERIALIZER") {
            config.deserializer.kind = kind;
        }
        Ok(config)
    }

    /// Map selectors onto the closed strategy and deserializer sets.
    pub fn resolve(&self) -> Result<(Strategy, AnyDeserializer)> {
        Ok((self.strategy.resolve()?, self.deserializer.resolve()?))
    }

    /// Default HTTP transport for these settings.
    pub fn http_transport(&self) -> Result<HttpTransport> {
        HttpTransport::new(self.transport.clone())
    }
}
