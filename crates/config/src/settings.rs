//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{brand, dialogue, server};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Dialogue policy and catalog location
    #[serde(default)]
    pub dialogue: DialogueConfig,

    /// Company information surfaced to customers
    #[serde(default)]
    pub brand: BrandConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_dialogue()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if self.server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    fn validate_dialogue(&self) -> Result<(), ConfigError> {
        let probability = self.dialogue.personalization.probability;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ConfigError::InvalidValue {
                field: "dialogue.personalization.probability".to_string(),
                message: format!("Must be between 0.0 and 1.0, got {}", probability),
            });
        }

        if self.dialogue.default_session_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "dialogue.default_session_id".to_string(),
                message: "Default session id cannot be empty".to_string(),
            });
        }

        if self.dialogue.catalog_path.trim().is_empty() {
            return Err(ConfigError::MissingField("dialogue.catalog_path".to_string()));
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    server::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    server::DEFAULT_PORT
}

fn default_timeout() -> u64 {
    server::DEFAULT_TIMEOUT_SECONDS
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// How the response generator decides whether to address the customer by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PersonalizationMode {
    /// Coin flip weighted by `probability`
    #[default]
    Random,
    Always,
    Never,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalizationConfig {
    #[serde(default)]
    pub mode: PersonalizationMode,

    /// Used only in `random` mode
    #[serde(default = "default_personalization_probability")]
    pub probability: f64,
}

fn default_personalization_probability() -> f64 {
    dialogue::PERSONALIZATION_PROBABILITY
}

impl Default for PersonalizationConfig {
    fn default() -> Self {
        Self {
            mode: PersonalizationMode::default(),
            probability: default_personalization_probability(),
        }
    }
}

/// Dialogue engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueConfig {
    /// Path to the intent catalog (.json or .yaml)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Offer a human agent when a negative message arrives after more than
    /// this many messages in the session
    #[serde(default = "default_escalation_threshold")]
    pub escalation_threshold: usize,

    #[serde(default)]
    pub personalization: PersonalizationConfig,

    /// Session id used for requests that carry none
    #[serde(default = "default_session_id")]
    pub default_session_id: String,
}

fn default_catalog_path() -> String {
    dialogue::CATALOG_PATH.to_string()
}

fn default_escalation_threshold() -> usize {
    dialogue::ESCALATION_THRESHOLD
}

fn default_session_id() -> String {
    dialogue::DEFAULT_SESSION_ID.to_string()
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            escalation_threshold: default_escalation_threshold(),
            personalization: PersonalizationConfig::default(),
            default_session_id: default_session_id(),
        }
    }
}

/// Company information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandConfig {
    #[serde(default = "default_company_name")]
    pub company_name: String,

    #[serde(default = "default_bot_name")]
    pub bot_name: String,

    #[serde(default = "default_support_email")]
    pub support_email: String,

    #[serde(default = "default_support_phone")]
    pub support_phone: String,
}

fn default_company_name() -> String {
    brand::COMPANY_NAME.to_string()
}

fn default_bot_name() -> String {
    brand::BOT_NAME.to_string()
}

fn default_support_email() -> String {
    brand::SUPPORT_EMAIL.to_string()
}

fn default_support_phone() -> String {
    brand::SUPPORT_PHONE.to_string()
}

impl BrandConfig {
    /// Substitute `{brand.*}` placeholders in a catalog response
    pub fn substitute(&self, template: &str) -> String {
        if !template.contains("{brand.") {
            return template.to_string();
        }

        template
            .replace("{brand.company_name}", &self.company_name)
            .replace("{brand.bot_name}", &self.bot_name)
            .replace("{brand.support_email}", &self.support_email)
            .replace("{brand.support_phone}", &self.support_phone)
    }
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            company_name: default_company_name(),
            bot_name: default_bot_name(),
            support_email: default_support_email(),
            support_phone: default_support_phone(),
        }
    }
}

/// Load settings from files and environment
///
/// Priority: env vars > config/{env}.* > config/default.* > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("SUPPORT_AGENT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
