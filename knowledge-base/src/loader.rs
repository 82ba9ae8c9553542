//! One-time loading of the knowledge base from a JSON file.

use std::{
    collections::HashSet,
    path::Path,
    sync::Arc,
};

use tracing::{info, warn};

use crate::{errors::KnowledgeError, model::KnowledgeBase};

impl KnowledgeBase {
    /// Parses a knowledge base from an in-memory JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads and parses the knowledge base at `path`.
    ///
    /// Data inconsistencies (duplicate package ids, rules pointing at unknown
    /// packages) are logged as warnings; they never fail the load.
    ///
    /// # Errors
    /// [`KnowledgeError::Io`] if the file cannot be read,
    /// [`KnowledgeError::Parse`] if it is not a valid knowledge base document.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let kb = Self::from_json_str(&raw).map_err(|source| KnowledgeError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        for id in kb.duplicate_package_ids() {
            warn!(package_id = %id, "duplicate package id in knowledge base");
        }
        for id in kb.dangling_targets() {
            warn!(package_id = %id, "routing rule targets a package that does not exist");
        }

        info!(
            path = %path.display(),
            packages = kb.packages.len(),
            faq = kb.faq.len(),
            rules = kb.routing.len(),
            "knowledge base loaded"
        );
        Ok(kb)
    }

    /// Loads once and wraps in an `Arc` for lock-free sharing across requests.
    pub fn load_shared(path: impl AsRef<Path>) -> Result<Arc<Self>, KnowledgeError> {
        Self::from_path(path).map(Arc::new)
    }

    /// Package ids that appear more than once, in first-repeat order.
    pub fn duplicate_package_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut dups = Vec::new();
        for p in &self.packages {
            if !seen.insert(p.id.as_str()) && !dups.contains(&p.id.as_str()) {
                dups.push(p.id.as_str());
            }
        }
        dups
    }

    /// Rule targets that match no package id.
    pub fn dangling_targets(&self) -> Vec<&str> {
        let ids: HashSet<&str> = self.packages.iter().map(|p| p.id.as_str()).collect();
        let mut out = Vec::new();
        for target in self.routing.iter().filter_map(|r| r.target()) {
            if !ids.contains(target) && !out.contains(&target) {
                out.push(target);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"{
        "brand": { "name": "Acme" },
        "contact": { "email": "hi@acme.test" },
        "packages": [
            { "id": "sec1", "name": "Security" },
            { "id": "train1", "name": "Training" },
            { "id": "sec1", "name": "Security again" }
        ],
        "faq": [ { "q": "Where are you?", "a": "Montevideo" } ],
        "routing": { "packageSuggestionRules": [
            { "triggers": ["audit"], "targetPackageId": "sec1" },
            { "triggers": ["cloud"], "targetPackageId": "cloud9" }
        ] }
    }"#;

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let kb = KnowledgeBase::load_shared(file.path()).unwrap();
        assert_eq!(kb.packages.len(), 3);
        assert_eq!(kb.faq.len(), 1);
        assert_eq!(kb.routing.len(), 2);
        assert_eq!(kb.duplicate_package_ids(), vec!["sec1"]);
        assert_eq!(kb.dangling_targets(), vec!["cloud9"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = KnowledgeBase::from_path(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, KnowledgeError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ \"packages\": 42 }").unwrap();

        let err = KnowledgeBase::from_path(file.path()).unwrap_err();
        assert!(matches!(err, KnowledgeError::Parse { .. }));
        assert!(err.to_string().contains("failed to parse knowledge base"));
    }
}
