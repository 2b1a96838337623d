//! Domain configuration
//!
//! Holds the intent catalog: which phrases trigger which intent, the pool of
//! canned responses for each intent, and optional quick-reply overrides.

mod intents;

pub use intents::{IntentCatalog, IntentDefinition};
