//! Static business knowledge base for the support assistant.
//!
//! The dataset (brand, contact, service packages, FAQ, package routing rules)
//! is read once at startup with [`KnowledgeBase::load_shared`] and then only
//! ever borrowed.

mod errors;
mod loader;
mod model;

pub use errors::KnowledgeError;
pub use model::{FaqEntry, KnowledgeBase, Package, SuggestionRule};
