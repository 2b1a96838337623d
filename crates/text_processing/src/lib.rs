//! Text Processing for the Support Agent
//!
//! This crate provides the rule-based language layer:
//! - **Entity Extraction**: customer names and order numbers
//! - **Intent Classification**: layered keyword rules over the intent catalog
//! - **Sentiment Scoring**: lexicon-based polarity, mapped to three labels
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use support_agent_config::IntentCatalog;
//! use support_agent_text_processing::IntentClassifier;
//!
//! let classifier = IntentClassifier::new(Arc::new(IntentCatalog::builtin()));
//! assert_eq!(classifier.classify("my name is Sam").intent, "name_intro");
//! assert_eq!(classifier.classify("track order #123456").intent, "order_tracking");
//! ```

pub mod entities;
pub mod intent;
pub mod sentiment;

pub use entities::{extract_name, extract_order_number};
pub use intent::{Classification, IntentClassifier, MatchRule};
pub use sentiment::LexiconSentimentAnalyzer;
