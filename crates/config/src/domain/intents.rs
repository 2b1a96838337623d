//! Intent Catalog
//!
//! Ordered, immutable set of intent definitions loaded once at startup.
//! Classification walks the catalog in load order, so the catalog is kept as
//! a sequence rather than a map.
//!
//! Two file formats are accepted:
//!
//! ```json
//! {
//!   "greeting": { "patterns": ["hello", "hi"], "responses": ["Hello!"] },
//!   "default":  { "responses": ["Can you rephrase?"] }
//! }
//! ```
//!
//! ```yaml
//! intents:
//!   - name: greeting
//!     patterns: [hello, hi]
//!     responses: ["Hello!"]
//!   - name: default
//!     responses: ["Can you rephrase?"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::constants::intents;
use crate::ConfigError;

/// Single intent definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentDefinition {
    /// Intent name (unique key)
    pub name: String,
    /// Trigger phrases, in match order. Empty for the default intent.
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Candidate responses; at least one
    #[serde(default)]
    pub responses: Vec<String>,
    /// Overrides the built-in quick replies for this intent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<Vec<String>>,
}

impl IntentDefinition {
    pub fn new(
        name: impl Into<String>,
        patterns: &[&str],
        responses: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            responses: responses.iter().map(|r| r.to_string()).collect(),
            quick_replies: None,
        }
    }

    pub fn with_quick_replies(mut self, replies: &[&str]) -> Self {
        self.quick_replies = Some(replies.iter().map(|r| r.to_string()).collect());
        self
    }

    pub fn is_default(&self) -> bool {
        self.name == intents::DEFAULT
    }
}

/// Body of an intent in the legacy JSON object format
#[derive(Debug, Deserialize)]
struct IntentBody {
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    responses: Vec<String>,
    #[serde(default)]
    quick_replies: Option<Vec<String>>,
}

/// YAML catalog file
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    intents: Vec<IntentDefinition>,
}

/// Ordered intent catalog with a guaranteed `default` entry
#[derive(Debug, Clone, PartialEq)]
pub struct IntentCatalog {
    intents: Vec<IntentDefinition>,
    default_index: usize,
}

impl IntentCatalog {
    /// Catalog used when no configuration is available
    pub fn builtin() -> Self {
        let definitions = vec![
            IntentDefinition::new(
                intents::GREETING,
                &[
                    "hello",
                    "hi",
                    "hey",
                    "good morning",
                    "good afternoon",
                    "good evening",
                ],
                &["Hello! 👋 How can I help you today?"],
            ),
            IntentDefinition::new(
                "return",
                &["return", "refund", "exchange", "send back"],
                &["You can return items within 30 days of purchase."],
            ),
            builtin_default(),
        ];

        Self {
            default_index: definitions.len() - 1,
            intents: definitions,
        }
    }

    /// Validate and normalize a list of definitions
    ///
    /// Patterns are trimmed and case-folded, blank patterns dropped. Names
    /// must be unique and every intent needs a response. A missing `default`
    /// entry is filled from the built-in catalog.
    pub fn from_definitions(definitions: Vec<IntentDefinition>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(definitions.len() + 1);

        for mut definition in definitions {
            definition.name = definition.name.trim().to_string();
            if definition.name.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "intents.name".to_string(),
                    message: "Intent name cannot be empty".to_string(),
                });
            }
            if !seen.insert(definition.name.clone()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("intents.{}", definition.name),
                    message: "Duplicate intent name".to_string(),
                });
            }
            if definition.responses.iter().all(|r| r.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("intents.{}.responses", definition.name),
                    message: "At least one response is required".to_string(),
                });
            }

            definition.responses.retain(|r| !r.trim().is_empty());
            definition.patterns = definition
                .patterns
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect();

            normalized.push(definition);
        }

        let default_index = match normalized.iter().position(|d| d.is_default()) {
            Some(index) => index,
            None => {
                tracing::warn!("Intent catalog has no default intent, using built-in default");
                normalized.push(builtin_default());
                normalized.len() - 1
            },
        };

        Ok(Self {
            intents: normalized,
            default_index,
        })
    }

    /// Parse the legacy JSON object format, preserving key order
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let raw: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        let mut definitions = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            let body: IntentBody = serde_json::from_value(value).map_err(|e| {
                ConfigError::ParseError(format!("intent '{}': {}", name, e))
            })?;
            definitions.push(IntentDefinition {
                name,
                patterns: body.patterns,
                responses: body.responses,
                quick_replies: body.quick_replies,
            });
        }

        Self::from_definitions(definitions)
    }

    /// Parse the YAML list format
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        Self::from_definitions(file.intents)
    }

    /// Load from a file; the extension selects the format
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// Load from a file, falling back to the built-in catalog on any error
    pub fn load_or_builtin<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(catalog) => {
                tracing::info!(
                    path = %path.display(),
                    intents = ?catalog.names(),
                    "Loaded intent catalog"
                );
                catalog
            },
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Intent catalog unavailable, using built-in catalog"
                );
                Self::builtin()
            },
        }
    }

    /// Get an intent definition by name
    pub fn get(&self, name: &str) -> Option<&IntentDefinition> {
        self.intents.iter().find(|i| i.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The `default` entry
    pub fn default_intent(&self) -> &IntentDefinition {
        &self.intents[self.default_index]
    }

    /// Definitions in load order
    pub fn iter(&self) -> impl Iterator<Item = &IntentDefinition> {
        self.intents.iter()
    }

    /// Intent names in load order
    pub fn names(&self) -> Vec<&str> {
        self.intents.iter().map(|i| i.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

impl Default for IntentCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_default() -> IntentDefinition {
    IntentDefinition::new(
        intents::DEFAULT,
        &[],
        &["I'm not sure about that. Can you rephrase?"],
    )
}
