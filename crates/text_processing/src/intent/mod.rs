//! Intent Classification
//!
//! Maps a raw message to one intent name from the catalog. The classifier is
//! total: every input resolves to some intent, `default` when nothing fires.
//!
//! Rules, first hit wins:
//! 1. A name introduction resolves to `name_intro`
//! 2. An order reference resolves to `order_tracking`
//! 3. Priority intents (return, refund, shipping, payment, contact) match when
//!    every word of one of their patterns appears in the message
//! 4. Remaining catalog intents, in load order, match on a pattern found at
//!    word boundaries or anywhere as a substring
//! 5. Greeting keywords anywhere in the message resolve to `greeting`
//! 6. Otherwise `default`

use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

use support_agent_config::constants::intents;
use support_agent_config::IntentCatalog;

use crate::entities::{extract_name, extract_order_number};

/// Which rule produced a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    NameIntroduction,
    OrderReference,
    PriorityKeywords,
    WordBoundary,
    Substring,
    GreetingKeyword,
    Fallback,
}

impl MatchRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchRule::NameIntroduction => "name_introduction",
            MatchRule::OrderReference => "order_reference",
            MatchRule::PriorityKeywords => "priority_keywords",
            MatchRule::WordBoundary => "word_boundary",
            MatchRule::Substring => "substring",
            MatchRule::GreetingKeyword => "greeting_keyword",
            MatchRule::Fallback => "fallback",
        }
    }
}

/// Classification result
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Resolved intent name
    pub intent: String,
    /// Rule that fired
    pub rule: MatchRule,
    /// Catalog pattern or keyword that matched, if any
    pub pattern: Option<String>,
}

impl Classification {
    fn new(intent: &str, rule: MatchRule, pattern: Option<&str>) -> Self {
        Self {
            intent: intent.to_string(),
            rule,
            pattern: pattern.map(str::to_string),
        }
    }
}

/// Trigger pattern compiled for both matching styles
struct CompiledPattern {
    text: String,
    words: HashSet<String>,
    boundary: Option<Regex>,
}

impl CompiledPattern {
    fn compile(text: &str) -> Self {
        let boundary = match Regex::new(&format!(r"\b{}\b", regex::escape(text))) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!(pattern = %text, error = %e, "Failed to compile boundary pattern");
                None
            },
        };

        Self {
            text: text.to_string(),
            words: text.split_whitespace().map(str::to_string).collect(),
            boundary,
        }
    }

    fn is_word_subset(&self, message_words: &HashSet<&str>) -> bool {
        !self.words.is_empty() && self.words.iter().all(|w| message_words.contains(w.as_str()))
    }
}

struct CompiledIntent {
    name: String,
    patterns: Vec<CompiledPattern>,
}

impl CompiledIntent {
    fn compile(name: &str, patterns: &[String]) -> Self {
        Self {
            name: name.to_string(),
            patterns: patterns.iter().map(|p| CompiledPattern::compile(p)).collect(),
        }
    }
}

/// Rule-based intent classifier over an immutable catalog
pub struct IntentClassifier {
    catalog: Arc<IntentCatalog>,
    /// Priority intents present in the catalog, in priority order
    priority: Vec<CompiledIntent>,
    /// Every other non-default intent, in catalog order
    general: Vec<CompiledIntent>,
}

impl IntentClassifier {
    /// Compile a classifier for the given catalog
    pub fn new(catalog: Arc<IntentCatalog>) -> Self {
        let priority: Vec<CompiledIntent> = intents::PRIORITY
            .iter()
            .filter_map(|name| catalog.get(name))
            .map(|def| CompiledIntent::compile(&def.name, &def.patterns))
            .collect();

        let general: Vec<CompiledIntent> = catalog
            .iter()
            .filter(|def| !def.is_default() && !intents::PRIORITY.contains(&def.name.as_str()))
            .map(|def| CompiledIntent::compile(&def.name, &def.patterns))
            .collect();

        tracing::debug!(
            priority = priority.len(),
            general = general.len(),
            "Compiled intent classifier"
        );

        Self {
            catalog,
            priority,
            general,
        }
    }

    /// The catalog this classifier was compiled from
    pub fn catalog(&self) -> &Arc<IntentCatalog> {
        &self.catalog
    }

    /// Classify a message
    pub fn classify(&self, text: &str) -> Classification {
        let message = text.trim().to_lowercase();
        let classification = self.resolve(&message);

        tracing::debug!(
            intent = %classification.intent,
            rule = classification.rule.as_str(),
            pattern = ?classification.pattern,
            "Classified message"
        );

        classification
    }

    fn resolve(&self, message: &str) -> Classification {
        if extract_name(message).is_some() {
            return Classification::new(intents::NAME_INTRO, MatchRule::NameIntroduction, None);
        }

        if extract_order_number(message).is_some() {
            return Classification::new(intents::ORDER_TRACKING, MatchRule::OrderReference, None);
        }

        let words: HashSet<&str> = message.split_whitespace().collect();
        for intent in &self.priority {
            if let Some(pattern) = intent.patterns.iter().find(|p| p.is_word_subset(&words)) {
                return Classification::new(
                    &intent.name,
                    MatchRule::PriorityKeywords,
                    Some(&pattern.text),
                );
            }
        }

        for intent in &self.general {
            for pattern in &intent.patterns {
                if pattern
                    .boundary
                    .as_ref()
                    .is_some_and(|regex| regex.is_match(message))
                {
                    return Classification::new(
                        &intent.name,
                        MatchRule::WordBoundary,
                        Some(&pattern.text),
                    );
                }
                if message.contains(pattern.text.as_str()) {
                    return Classification::new(&intent.name, MatchRule::Substring, Some(&pattern.text));
                }
            }
        }

        if let Some(keyword) = intents::GREETING_KEYWORDS
            .iter()
            .find(|keyword| message.contains(*keyword))
        {
            return Classification::new(intents::GREETING, MatchRule::GreetingKeyword, Some(keyword));
        }

        Classification::new(intents::DEFAULT, MatchRule::Fallback, None)
    }
}
