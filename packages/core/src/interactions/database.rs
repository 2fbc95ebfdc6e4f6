//! Interaction database
//!
//! A flat, append-only list of [`InteractionRecord`]s assembled once at
//! startup from the built-in catalogs (plus an optional external file) and
//! then shared read-only behind an `Arc`. Records are never canonicalised:
//! reversed or repeated pairs stay in the list and each one counts when
//! scoring.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::interactions::{
    error::ScoringError,
    selection::{drug_key, SelectedDrugs},
    types::InteractionRecord,
};

/// Built-in catalogs, concatenated in this order.
const BUILTIN_SOURCES: &[(&str, &str)] = &[
    (
        "antimicrobial_core",
        include_str!("../../data/antimicrobial_core.json"),
    ),
    (
        "anticoagulation",
        include_str!("../../data/anticoagulation.json"),
    ),
    (
        "qt_prolongation",
        include_str!("../../data/qt_prolongation.json"),
    ),
    ("nephrotoxicity", include_str!("../../data/nephrotoxicity.json")),
];

/// Immutable in-memory list of known drug-drug interactions
#[derive(Debug, Clone)]
pub struct InteractionDatabase {
    records: Vec<InteractionRecord>,
    loaded_at: DateTime<Utc>,
}

impl InteractionDatabase {
    pub fn from_records(records: Vec<InteractionRecord>) -> Self {
        Self {
            records,
            loaded_at: Utc::now(),
        }
    }

    /// Database holding only the catalogs compiled into the binary.
    pub fn builtin() -> Result<Self, ScoringError> {
        let mut records = Vec::new();
        for (name, json) in BUILTIN_SOURCES {
            records.extend(parse_records(name, json)?);
        }
        Ok(Self::from_records(records))
    }

    /// Built-in catalogs followed by the records of `extra_file`, if any.
    pub fn load(extra_file: Option<&Path>) -> Result<Self, ScoringError> {
        let mut database = Self::builtin()?;
        if let Some(path) = extra_file {
            let extra = read_records_file(path)?;
            tracing::info!(
                "Appending {} interaction records from {}",
                extra.len(),
                path.display()
            );
            database.records.extend(extra);
        }
        Ok(database)
    }

    /// Records whose two drugs are both in `selected`, in database order.
    ///
    /// Matching is symmetric: it does not matter which of `drugA` / `drugB`
    /// holds which name.
    pub fn matching(&self, selected: &SelectedDrugs) -> Vec<&InteractionRecord> {
        self.records
            .iter()
            .filter(|record| selected.contains(&record.drug_a) && selected.contains(&record.drug_b))
            .collect()
    }

    /// All records that mention `drug` on either side.
    pub fn interactions_for(&self, drug: &str) -> Vec<&InteractionRecord> {
        let key = drug_key(drug);
        self.records
            .iter()
            .filter(|record| drug_key(&record.drug_a) == key || drug_key(&record.drug_b) == key)
            .collect()
    }

    /// Every drug name mentioned by the database, sorted case-insensitively.
    /// The first spelling seen for a name wins.
    pub fn known_drugs(&self) -> Vec<String> {
        let mut names: HashMap<String, &str> = HashMap::new();
        for record in &self.records {
            for name in [record.drug_a.as_str(), record.drug_b.as_str()] {
                names.entry(drug_key(name)).or_insert_with(|| name.trim());
            }
        }

        let mut keyed: Vec<(String, &str)> = names.into_iter().collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.into_iter().map(|(_, name)| name.to_string()).collect()
    }

    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Parse a JSON array of interaction records.
pub fn parse_records(source_name: &str, json: &str) -> Result<Vec<InteractionRecord>, ScoringError> {
    serde_json::from_str(json).map_err(|err| ScoringError::catalog(source_name, err.to_string()))
}

fn read_records_file(path: &Path) -> Result<Vec<InteractionRecord>, ScoringError> {
    let source_name = path.display().to_string();
    let json = fs::read_to_string(path)
        .map_err(|err| ScoringError::catalog(source_name.as_str(), err.to_string()))?;
    parse_records(&source_name, &json)
}
