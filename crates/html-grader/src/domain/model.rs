//! Domain models for selector lists, documents, and check results.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Ordered selector strings loaded from a checks file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorSpec {
    selectors: Vec<String>,
}

impl SelectorSpec {
    pub fn new(selectors: Vec<String>) -> Self {
        Self { selectors }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.selectors
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Selectors in lexicographic order. The sort is stable, so equal entries keep input order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut sorted: Vec<&str> = self.selectors.iter().map(String::as_str).collect();
        sorted.sort();
        sorted
    }
}

impl FromIterator<String> for SelectorSpec {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Where the document under test comes from. A run targets exactly one origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOrigin {
    Local(PathBuf),
    Remote(String),
}

impl fmt::Display for DocumentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentOrigin::Local(path) => write!(f, "{}", path.display()),
            DocumentOrigin::Remote(url) => f.write_str(url),
        }
    }
}

/// Raw document text together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPayload {
    pub origin: DocumentOrigin,
    pub text: String,
}

/// Presence of each selector, keyed and ordered by selector string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CheckResult {
    entries: BTreeMap<String, bool>,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selector outcome, replacing any earlier outcome for the same selector.
    pub fn insert(&mut self, selector: impl Into<String>, present: bool) {
        self.entries.insert(selector.into(), present);
    }

    pub fn get(&self, selector: &str) -> Option<bool> {
        self.entries.get(selector).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries
            .iter()
            .map(|(selector, present)| (selector.as_str(), *present))
    }
}
