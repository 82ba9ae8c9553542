//! Typed knowledge base records.
//!
//! Every collection defaults to empty and every descriptive field is
//! optional, so a sparse data file still yields a usable [`KnowledgeBase`].
//! Fields the assistant does not interpret are kept in `extra` and
//! serialized back verbatim.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The whole static dataset: brand, contact, packages, FAQ, routing rules.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeBase {
    /// Opaque brand record, forwarded as-is.
    #[serde(default)]
    pub brand: Value,
    /// Opaque contact record, forwarded as-is.
    #[serde(default)]
    pub contact: Value,
    #[serde(default)]
    pub packages: Vec<Package>,
    #[serde(default)]
    pub faq: Vec<FaqEntry>,
    /// Accepts either a bare array of rules or `{ "packageSuggestionRules": [...] }`.
    #[serde(default, deserialize_with = "routing_rules")]
    pub routing: Vec<SuggestionRule>,
}

/// A service package offered by the business.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Heavier fields (deliverables, duration, audience, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Package {
    /// Projection carrying only `{id, name, headline, summary}`.
    pub fn lightweight(&self) -> Package {
        Package {
            id: self.id.clone(),
            name: self.name.clone(),
            headline: self.headline.clone(),
            summary: self.summary.clone(),
            extra: Map::new(),
        }
    }
}

/// A frequently asked question with its answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// The answer (usually `a`) and anything else on the entry.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FaqEntry {
    /// Question text, empty when absent.
    pub fn question(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }
}

/// Maps trigger phrases to the package they should surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRule {
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_package_id: Option<String>,
}

impl SuggestionRule {
    /// Non-empty target id, if any.
    pub fn target(&self) -> Option<&str> {
        self.target_package_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RoutingShape {
    Rules(Vec<SuggestionRule>),
    Table {
        #[serde(default, rename = "packageSuggestionRules")]
        package_suggestion_rules: Vec<SuggestionRule>,
    },
}

fn routing_rules<'de, D>(deserializer: D) -> Result<Vec<SuggestionRule>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RoutingShape>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RoutingShape::Rules(rules)) => rules,
        Some(RoutingShape::Table {
            package_suggestion_rules,
        }) => package_suggestion_rules,
    })
}
