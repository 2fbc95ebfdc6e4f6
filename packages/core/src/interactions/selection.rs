//! Validated set of medications selected for an assessment

use std::collections::HashSet;

use serde::Serialize;

use crate::interactions::error::{ScoringError, MIN_SELECTED_DRUGS};

/// Normalised lookup key for a drug name: trimmed and lowercased.
pub fn drug_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A set of at least two distinct drug names.
///
/// Names are trimmed, blank entries are dropped and duplicates (compared
/// case-insensitively) keep their first spelling and position. The scorer
/// only accepts this type, so an assessment can never run on fewer than two
/// medications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectedDrugs {
    names: Vec<String>,
    #[serde(skip)]
    keys: HashSet<String>,
}

impl SelectedDrugs {
    pub fn new<I, S>(drugs: I) -> Result<Self, ScoringError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = Vec::new();
        let mut keys = HashSet::new();

        for drug in drugs {
            let name = drug.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if keys.insert(drug_key(name)) {
                names.push(name.to_string());
            }
        }

        if names.len() < MIN_SELECTED_DRUGS {
            return Err(ScoringError::insufficient_drugs(names.len()));
        }

        Ok(Self { names, keys })
    }

    /// Whether `name` is part of the selection, ignoring case and surrounding whitespace.
    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains(&drug_key(name))
    }

    /// Selected names in first-occurrence order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
