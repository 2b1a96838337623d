//! Configuration management for the support agent
//!
//! Supports loading configuration from:
//! - YAML/TOML/JSON files (`config/default.*`, `config/{env}.*`)
//! - Environment variables (SUPPORT_AGENT_ prefix, `__` separator)
//!
//! # Intent Catalog
//!
//! The ordered intent catalog (trigger patterns, response pools, optional
//! quick replies) lives in `domain/` and is loaded from `dialogue.catalog_path`.
//! A built-in catalog is used when no file is available.

pub mod constants;
pub mod domain;
pub mod settings;

pub use domain::{IntentCatalog, IntentDefinition};
pub use settings::{
    load_settings, BrandConfig, DialogueConfig, ObservabilityConfig, PersonalizationConfig,
    PersonalizationMode, RuntimeEnvironment, ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
