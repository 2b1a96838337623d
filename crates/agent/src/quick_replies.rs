//! Quick-reply suggestions per intent

use std::collections::HashMap;

use support_agent_config::constants::intents;
use support_agent_config::{BrandConfig, IntentCatalog};

/// Offered alongside the escalation message
pub const ESCALATION_REPLIES: [&str; 3] = ["Yes please", "No thanks", "Continue chat"];

const DEFAULT_REPLIES: [&str; 4] = ["Store hours", "Return policy", "Shipping info", "Contact us"];

/// Static lookup table keyed by intent name, with a default fallback
#[derive(Debug, Clone)]
pub struct QuickReplyTable {
    table: HashMap<String, Vec<String>>,
    fallback: Vec<String>,
}

fn owned(replies: &[&str]) -> Vec<String> {
    replies.iter().map(|r| r.to_string()).collect()
}

impl QuickReplyTable {
    /// Standard table; the contact entry leads with the configured phone number
    pub fn new(brand: &BrandConfig) -> Self {
        let mut table = HashMap::new();
        table.insert(intents::GREETING.to_string(), owned(&DEFAULT_REPLIES));
        table.insert(
            "hours".to_string(),
            owned(&["Weekend hours", "Holiday hours", "Location hours"]),
        );
        table.insert(
            "return".to_string(),
            owned(&["Start a return", "Return policy", "Exchange item", "Refund status"]),
        );
        table.insert(
            "shipping".to_string(),
            owned(&["Track my order", "Shipping cost", "Delivery time", "Free shipping"]),
        );
        table.insert(
            "payment".to_string(),
            owned(&["Credit card", "PayPal", "Installments", "Gift card"]),
        );
        table.insert(
            "contact".to_string(),
            vec![
                brand.support_phone.clone(),
                "Email support".to_string(),
                "Live chat".to_string(),
                "Call me".to_string(),
            ],
        );
        table.insert(
            "thanks".to_string(),
            owned(&["You're welcome!", "Any other questions?", "Have a great day!"]),
        );
        table.insert(
            "goodbye".to_string(),
            owned(&["Thanks for chatting!", "Come back soon!", "Rate your experience"]),
        );
        table.insert(intents::ESCALATION.to_string(), owned(&ESCALATION_REPLIES));

        Self {
            table,
            fallback: owned(&DEFAULT_REPLIES),
        }
    }

    /// Suggestions for an intent from the static table
    pub fn get(&self, intent: &str) -> &[String] {
        self.table.get(intent).unwrap_or(&self.fallback)
    }

    /// Suggestions for an intent, preferring the catalog entry's own list
    pub fn lookup(&self, catalog: &IntentCatalog, intent: &str) -> Vec<String> {
        catalog
            .get(intent)
            .and_then(|def| def.quick_replies.clone())
            .unwrap_or_else(|| self.get(intent).to_vec())
    }
}

impl Default for QuickReplyTable {
    fn default() -> Self {
        Self::new(&BrandConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use support_agent_config::IntentDefinition;

    #[test]
    fn test_known_intents() {
        let table = QuickReplyTable::default();
        assert_eq!(
            table.get("greeting"),
            ["Store hours", "Return policy", "Shipping info", "Contact us"]
        );
        assert_eq!(table.get("payment")[1], "PayPal");
        assert_eq!(table.get("escalation"), ESCALATION_REPLIES);
    }

    #[test]
    fn test_unknown_intent_falls_back() {
        let table = QuickReplyTable::default();
        assert_eq!(table.get("name_intro"), table.get("default"));
        assert_eq!(table.get("no_such_intent")[0], "Store hours");
    }

    #[test]
    fn test_contact_uses_brand_phone() {
        let brand = BrandConfig {
            support_phone: "555-0100".to_string(),
            ..BrandConfig::default()
        };
        let table = QuickReplyTable::new(&brand);
        assert_eq!(table.get("contact")[0], "555-0100");
    }

    #[test]
    fn test_catalog_override() {
        let catalog = IntentCatalog::from_definitions(vec![
            IntentDefinition::new("hours", &["hours"], &["9 to 5."])
                .with_quick_replies(&["Sunday?", "Holidays?"]),
            IntentDefinition::new("payment", &["pay"], &["Cards."]),
        ])
        .unwrap();
        let table = QuickReplyTable::default();

        assert_eq!(table.lookup(&catalog, "hours"), vec!["Sunday?", "Holidays?"]);
        assert_eq!(table.lookup(&catalog, "payment")[0], "Credit card");
        assert_eq!(table.lookup(&catalog, "default")[0], "Store hours");
    }
}
