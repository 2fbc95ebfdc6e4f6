//! Core data types for interaction risk scoring

use serde::{Deserialize, Serialize};
use std::fmt;

/// Clinical severity of a drug-drug interaction, ordered from least to most dangerous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Major,
    Contraindicated,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Major => "major",
            Severity::Contraindicated => "contraindicated",
        }
    }

    /// Major and contraindicated interactions generate monitoring requirements.
    pub fn requires_monitoring(&self) -> bool {
        matches!(self, Severity::Major | Severity::Contraindicated)
    }
}

/// Strength of the literature behind an interaction's documented severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvidenceLevel {
    #[serde(alias = "high")]
    High,
    #[serde(alias = "moderate")]
    Moderate,
    #[serde(alias = "low")]
    Low,
}

/// Renal or hepatic function grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganFunction {
    Normal,
    Mild,
    Moderate,
    Severe,
}

impl OrganFunction {
    pub fn is_impaired(&self) -> bool {
        !matches!(self, OrganFunction::Normal)
    }
}

/// A known pairwise drug-drug interaction.
///
/// `drug_a` / `drug_b` form an unordered pair; records are read-only once
/// loaded into the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub drug_a: String,
    pub drug_b: String,
    pub severity: Severity,
    pub evidence_level: EvidenceLevel,
    pub description: String,
    #[serde(default)]
    pub mechanism: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_management: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onset_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub risk_factors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Optional patient attributes that modulate the risk score.
///
/// `allergies` and `comorbidities` are carried for display only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientFactors {
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub renal_function: Option<OrganFunction>,
    #[serde(default)]
    pub hepatic_function: Option<OrganFunction>,
    #[serde(default)]
    pub pregnancy: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allergies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comorbidities: Vec<String>,
}

/// Overall risk tier of a drug combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallRisk {
    Low,
    Moderate,
    High,
    Critical,
}

impl OverallRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallRisk::Low => "low",
            OverallRisk::Moderate => "moderate",
            OverallRisk::High => "high",
            OverallRisk::Critical => "critical",
        }
    }

    /// Advisory sentence shown alongside the tier.
    pub fn clinical_significance(&self) -> &'static str {
        match self {
            OverallRisk::Low => {
                "Low risk of clinically significant interactions. Standard monitoring is appropriate."
            }
            OverallRisk::Moderate => {
                "Moderate interaction risk. Monitor the patient and consider dose adjustments."
            }
            OverallRisk::High => {
                "High interaction risk. Close monitoring is required and alternative therapy should be considered."
            }
            OverallRisk::Critical => {
                "Critical interaction risk. This combination should be avoided or used only under specialist supervision."
            }
        }
    }
}

impl fmt::Display for OverallRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scoring a drug combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub overall_risk: OverallRisk,
    /// Display score, clamped to `[0, 100]`.
    pub risk_score: f64,
    pub clinical_significance: String,
    pub recommendations: Vec<String>,
    pub monitoring_requirements: Vec<String>,
    pub contraindications_found: bool,
}

impl RiskAssessment {
    /// Assessment for a combination with no known interactions.
    pub fn no_interactions() -> Self {
        Self {
            overall_risk: OverallRisk::Low,
            risk_score: 0.0,
            clinical_significance: OverallRisk::Low.clinical_significance().to_string(),
            recommendations: Vec::new(),
            monitoring_requirements: Vec::new(),
            contraindications_found: false,
        }
    }
}

/// Count of matched interactions per severity tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub contraindicated: usize,
    pub major: usize,
    pub moderate: usize,
    pub minor: usize,
}

impl SeverityBreakdown {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Contraindicated => self.contraindicated += 1,
            Severity::Major => self.major += 1,
            Severity::Moderate => self.moderate += 1,
            Severity::Minor => self.minor += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.contraindicated + self.major + self.moderate + self.minor
    }
}

/// Assessment plus the context the dashboard renders around it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionReport {
    pub selected_drugs: Vec<String>,
    pub interactions: Vec<InteractionRecord>,
    pub interaction_count: usize,
    pub severity_breakdown: SeverityBreakdown,
    /// Score before display clamping; this is what the tier is classified on.
    pub raw_score: f64,
    pub assessment: RiskAssessment,
}
