//! Drug Interaction Risk Module
//!
//! Scores combinations of selected medications against a static database of
//! known drug-drug interactions, adjusting for optional patient factors.

pub mod config;
pub mod database;
pub mod documentation;
pub mod error;
pub mod scorer;
pub mod selection;
pub mod types;


pub use config::{EvidenceWeighting, ScoringConfig};
pub use database::InteractionDatabase;
pub use documentation::render_documentation;
pub use error::ScoringError;
pub use scorer::InteractionRiskScorer;
pub use selection::SelectedDrugs;
pub use types::*;
