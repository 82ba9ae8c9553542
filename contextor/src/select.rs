//! Keyword-driven context selection over the static knowledge base.
//!
//! Narrows the knowledge base to the slice worth sending along with a
//! question: packages surfaced by routing triggers (or a fallback listing of
//! all of them) and the FAQ entries that share a word with the question.
//! Selection is total and pure: any question, including an empty one,
//! yields a usable slice.

use std::{collections::HashSet, str::FromStr};

use knowledge_base::{FaqEntry, KnowledgeBase, Package, SuggestionRule};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ContextorError;

/// Maximum FAQ entries kept when the question matches some.
pub const FAQ_MATCH_LIMIT: usize = 4;

/// FAQ entries sent when nothing matches.
pub const FAQ_FALLBACK_COUNT: usize = 3;

/// What to send when no routing trigger matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PackageFallback {
    /// Every package, reduced to `{id, name, headline, summary}`.
    #[default]
    Lightweight,
    /// Every package with all of its fields.
    Full,
}

impl FromStr for PackageFallback {
    type Err = ContextorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lightweight" | "light" => Ok(PackageFallback::Lightweight),
            "full" => Ok(PackageFallback::Full),
            other => Err(ContextorError::Config(format!(
                "PACKAGE_FALLBACK must be `lightweight` or `full`, got `{other}`"
            ))),
        }
    }
}

/// Tunables for [`select_with`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectorPolicy {
    pub package_fallback: PackageFallback,
}

/// The part of the knowledge base forwarded with one question.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContextSlice {
    pub brand: Value,
    pub contact: Value,
    pub packages: Vec<Package>,
    pub faq: Vec<FaqEntry>,
}

/// Selects context with the default policy (lightweight package fallback).
///
/// # Example
/// ```
/// use contextor::select;
/// use knowledge_base::KnowledgeBase;
///
/// let kb = KnowledgeBase::from_json_str(r#"{
///     "packages": [ { "id": "sec1", "name": "Security" }, { "id": "train1", "name": "Training" } ],
///     "routing": [ { "triggers": ["security audit"], "targetPackageId": "sec1" } ]
/// }"#).unwrap();
///
/// let slice = select("I need a Security Audit", &kb);
/// assert_eq!(slice.packages.len(), 1);
/// assert_eq!(slice.packages[0].id, "sec1");
/// ```
pub fn select(question: &str, kb: &KnowledgeBase) -> ContextSlice {
    select_with(question, kb, &SelectorPolicy::default())
}

/// Selects the context slice for `question` under `policy`.
pub fn select_with(question: &str, kb: &KnowledgeBase, policy: &SelectorPolicy) -> ContextSlice {
    let q = question.to_lowercase();

    let relevant = relevant_package_ids(&q, &kb.routing);
    let packages: Vec<Package> = if relevant.is_empty() {
        match policy.package_fallback {
            PackageFallback::Lightweight => kb.packages.iter().map(Package::lightweight).collect(),
            PackageFallback::Full => kb.packages.clone(),
        }
    } else {
        kb.packages
            .iter()
            .filter(|p| relevant.contains(p.id.as_str()))
            .cloned()
            .collect()
    };

    let faq = select_faq(&q, &kb.faq);

    debug!(
        matched_rules = relevant.len(),
        packages = packages.len(),
        faq = faq.len(),
        "context selected"
    );

    ContextSlice {
        brand: kb.brand.clone(),
        contact: kb.contact.clone(),
        packages,
        faq,
    }
}

/// Targets of every rule with at least one trigger contained in `q`.
/// `q` must already be lowercase. An empty trigger is contained in every
/// question, so its rule always fires.
fn relevant_package_ids<'a>(q: &str, rules: &'a [SuggestionRule]) -> HashSet<&'a str> {
    rules
        .iter()
        .filter(|rule| {
            rule.triggers.iter().any(|t| {
                q.contains(&t.to_lowercase())
            })
        })
        .filter_map(SuggestionRule::target)
        .collect()
}

/// Non-empty runs of ASCII word characters (`[A-Za-z0-9_]`). Accented
/// letters are separators, so `auditoría` yields `auditor` and `a`.
fn question_words(q: &str) -> Vec<&str> {
    q.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .collect()
}

fn select_faq(q: &str, faq: &[FaqEntry]) -> Vec<FaqEntry> {
    let words = question_words(q);

    let matched: Vec<FaqEntry> = faq
        .iter()
        .filter(|entry| {
            let fq = entry.question().to_lowercase();
            !fq.is_empty() && words.iter().any(|w| fq.contains(w))
        })
        .take(FAQ_MATCH_LIMIT)
        .cloned()
        .collect();

    if matched.is_empty() {
        faq.iter().take(FAQ_FALLBACK_COUNT).cloned().collect()
    } else {
        matched
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn kb() -> KnowledgeBase {
        serde_json::from_value(json!({
            "brand": { "name": "CelesteIQ" },
            "contact": { "email": "support@celesteiq.com" },
            "packages": [
                { "id": "sec1", "name": "Security Audit", "headline": "h1", "summary": "s1",
                  "deliverables": ["report"] },
                { "id": "train1", "name": "Copilot Training", "headline": "h2", "summary": "s2",
                  "durationDays": 2 },
                { "id": "cloud1", "name": "Azure Migration", "headline": "h3", "summary": "s3",
                  "phases": 4 }
            ],
            "faq": [
                { "q": "How long does a security audit take?", "a": "Two weeks." },
                { "q": "Do you offer Copilot training?", "a": "Yes." },
                { "q": "Where are you located?", "a": "Montevideo." },
                { "q": "Do you work remotely?", "a": "Yes." },
                { "q": "Do you sign NDAs?", "a": "Always." },
                { "q": "Do you support Azure?", "a": "Yes." }
            ],
            "routing": { "packageSuggestionRules": [
                { "triggers": ["security audit", "Pentest"], "targetPackageId": "sec1" },
                { "triggers": ["copilot", "training"], "targetPackageId": "train1" },
                { "triggers": ["capacitación"], "targetPackageId": "train1" },
                { "triggers": ["azure"], "targetPackageId": "" }
            ] }
        }))
        .unwrap()
    }

    fn ids(slice: &ContextSlice) -> Vec<&str> {
        slice.packages.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn security_audit_question_selects_its_package() {
        let kb = serde_json::from_value::<KnowledgeBase>(json!({
            "packages": [ { "id": "sec1", "name": "A" }, { "id": "train1", "name": "B" } ],
            "routing": [ { "triggers": ["security audit"], "targetPackageId": "sec1" } ]
        }))
        .unwrap();

        let slice = select("I need a security audit", &kb);
        assert_eq!(ids(&slice), vec!["sec1"]);
    }

    #[test]
    fn matched_packages_keep_all_fields() {
        let slice = select("We want a PENTEST", &kb());
        assert_eq!(ids(&slice), vec!["sec1"]);
        assert_eq!(slice.packages[0].extra["deliverables"], json!(["report"]));
    }

    #[test]
    fn two_rules_union_in_source_order_without_duplicates() {
        // Two rules target train1; one targets sec1.
        let slice = select("Copilot training after the security audit, capacitación", &kb());
        assert_eq!(ids(&slice), vec!["sec1", "train1"]);
    }

    #[test]
    fn no_trigger_falls_back_to_lightweight_listing() {
        let kb = kb();
        let slice = select("hola", &kb);

        assert_eq!(ids(&slice), vec!["sec1", "train1", "cloud1"]);
        for (out, src) in slice.packages.iter().zip(&kb.packages) {
            assert!(out.extra.is_empty());
            assert_eq!(out.name, src.name);
            assert_eq!(out.headline, src.headline);
            assert_eq!(out.summary, src.summary);
        }
    }

    #[test]
    fn full_fallback_policy_keeps_everything() {
        let kb = kb();
        let policy = SelectorPolicy {
            package_fallback: PackageFallback::Full,
        };
        let slice = select_with("hola", &kb, &policy);
        assert_eq!(slice.packages, kb.packages);
    }

    #[test]
    fn empty_trigger_matches_every_question() {
        let kb: KnowledgeBase = serde_json::from_value(json!({
            "packages": [ { "id": "a", "x": 1 }, { "id": "b" } ],
            "routing": [ { "triggers": [""], "targetPackageId": "a" } ]
        }))
        .unwrap();

        for q in ["hello", ""] {
            let slice = select(q, &kb);
            assert_eq!(ids(&slice), vec!["a"], "question {q:?}");
            assert_eq!(slice.packages[0].extra["x"], 1);
        }
    }

    #[test]
    fn blank_target_is_ignored() {
        // "azure" fires a rule whose target is blank.
        let slice = select("Do you support Azure?", &kb());
        assert_eq!(slice.packages.len(), 3);
        assert!(slice.packages.iter().all(|p| p.extra.is_empty()));
    }

    #[test]
    fn faq_matches_on_shared_words_in_order() {
        let slice = select("Where is the office located?", &kb());
        let qs: Vec<&str> = slice.faq.iter().map(FaqEntry::question).collect();
        // "the" does not occur; "located" and "where" hit entry 3 only.
        assert_eq!(qs, vec!["Where are you located?"]);
        assert_eq!(slice.faq[0].extra["a"], "Montevideo.");
    }

    #[test]
    fn faq_capped_at_four() {
        // "you" appears in five questions.
        let slice = select("you", &kb());
        assert_eq!(slice.faq.len(), FAQ_MATCH_LIMIT);
        assert_eq!(slice.faq[0].question(), "Do you offer Copilot training?");
    }

    #[test]
    fn faq_falls_back_to_first_three() {
        let kb = kb();
        let slice = select("zzz", &kb);
        assert_eq!(slice.faq, kb.faq[..FAQ_FALLBACK_COUNT].to_vec());

        let short: KnowledgeBase =
            serde_json::from_value(json!({ "faq": [ { "q": "only one?", "a": "yes" } ] })).unwrap();
        assert_eq!(select("zzz", &short).faq.len(), 1);
    }

    #[test]
    fn faq_entries_without_question_never_match() {
        let kb: KnowledgeBase = serde_json::from_value(json!({
            "faq": [ { "a": "orphan" }, { "q": "", "a": "blank" }, { "q": "pricing?", "a": "ask" } ]
        }))
        .unwrap();
        let slice = select("pricing", &kb);
        assert_eq!(slice.faq.len(), 1);
        assert_eq!(slice.faq[0].question(), "pricing?");
    }

    #[test]
    fn accented_letters_split_words() {
        assert_eq!(
            question_words("¿qué incluye la auditoría?"),
            vec!["qu", "incluye", "la", "auditor", "a"]
        );

        let kb: KnowledgeBase = serde_json::from_value(json!({
            "faq": [
                { "q": "¿Dónde están?", "a": "Montevideo." },
                { "q": "Hola", "a": "x" },
                { "q": "zzz", "a": "y" },
                { "q": "yyy", "a": "z" }
            ]
        }))
        .unwrap();
        // The lone "a" fragment matches every question containing an `a`.
        let slice = select("auditoría", &kb);
        let qs: Vec<&str> = slice.faq.iter().map(FaqEntry::question).collect();
        assert_eq!(qs, vec!["¿Dónde están?", "Hola"]);
    }

    #[test]
    fn empty_knowledge_base_and_question() {
        let slice = select("", &KnowledgeBase::default());
        assert!(slice.packages.is_empty());
        assert!(slice.faq.is_empty());
        assert!(slice.brand.is_null());
    }

    #[test]
    fn empty_question_lists_everything_lightly() {
        let kb = kb();
        let slice = select("", &kb);
        assert_eq!(slice.packages.len(), kb.packages.len());
        assert_eq!(slice.faq.len(), FAQ_FALLBACK_COUNT);
    }

    #[test]
    fn selection_invariants_hold_across_questions() {
        let kb = kb();
        for q in [
            "",
            "you you you",
            "security audit and copilot training",
            "¿?",
            "Do you support Azure? Where are you located? Do you sign NDAs?",
            "____",
        ] {
            let first = select(q, &kb);
            assert!(first.faq.len() <= FAQ_MATCH_LIMIT, "faq cap for {q:?}");
            assert!(!first.packages.is_empty(), "packages for {q:?}");
            assert_eq!(first, select(q, &kb), "idempotence for {q:?}");
            assert_eq!(first.brand, kb.brand);
            assert_eq!(first.contact, kb.contact);
        }
    }

    #[test]
    fn package_fallback_parses() {
        assert_eq!("FULL".parse::<PackageFallback>().unwrap(), PackageFallback::Full);
        assert_eq!(
            "lightweight".parse::<PackageFallback>().unwrap(),
            PackageFallback::Lightweight
        );
        assert!("none".parse::<PackageFallback>().is_err());
    }
}
