//! Configuration for interaction risk scoring

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::interactions::{
    error::ScoringError,
    types::{EvidenceLevel, Severity},
};

/// Configuration for the interaction risk scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub severity_points: SeverityPoints,
    pub evidence_multipliers: EvidenceMultipliers,
    pub evidence_weighting: EvidenceWeighting,
    pub patient_multipliers: PatientMultipliers,
    pub thresholds: RiskThresholds,
    pub max_display_score: f64,
}

/// Points added to the running score per matched interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityPoints {
    pub contraindicated: f64,
    pub major: f64,
    pub moderate: f64,
    pub minor: f64,
}

/// Multipliers keyed by evidence level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceMultipliers {
    pub high: f64,
    pub moderate: f64,
    pub low: f64,
}

/// How the evidence multiplier is applied to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceWeighting {
    /// Multiply the whole running total after each interaction. Effects of
    /// earlier interactions compound with every later match.
    Compounding,
    /// Multiply only the interaction's own points before adding them.
    PerInteraction,
}

/// Multipliers applied once per abnormal patient factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientMultipliers {
    /// Patients strictly older than this are treated as elderly.
    pub elderly_age: f64,
    pub elderly: f64,
    pub renal_impairment: f64,
    pub hepatic_impairment: f64,
    pub pregnancy: f64,
}

/// Lower bounds (inclusive) of each tier, applied to the unclamped score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub critical: f64,
    pub high: f64,
    pub moderate: f64,
}

impl SeverityPoints {
    pub fn for_severity(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Contraindicated => self.contraindicated,
            Severity::Major => self.major,
            Severity::Moderate => self.moderate,
            Severity::Minor => self.minor,
        }
    }
}

impl EvidenceMultipliers {
    pub fn for_level(&self, level: EvidenceLevel) -> f64 {
        match level {
            EvidenceLevel::High => self.high,
            EvidenceLevel::Moderate => self.moderate,
            EvidenceLevel::Low => self.low,
        }
    }
}

impl EvidenceWeighting {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceWeighting::Compounding => "compounding",
            EvidenceWeighting::PerInteraction => "per_interaction",
        }
    }
}

impl FromStr for EvidenceWeighting {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compounding" => Ok(EvidenceWeighting::Compounding),
            "per_interaction" | "per-interaction" => Ok(EvidenceWeighting::PerInteraction),
            other => Err(ScoringError::invalid_config(format!(
                "unknown evidence weighting '{}', expected 'compounding' or 'per_interaction'",
                other
            ))),
        }
    }
}

impl ScoringConfig {
    pub fn with_evidence_weighting(mut self, weighting: EvidenceWeighting) -> Self {
        self.evidence_weighting = weighting;
        self
    }

    /// Reject configurations that would make scores negative, tiers overlap
    /// or display clamping meaningless.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let points = &self.severity_points;
        let weights = [
            ("severity_points.contraindicated", points.contraindicated),
            ("severity_points.major", points.major),
            ("severity_points.moderate", points.moderate),
            ("severity_points.minor", points.minor),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::invalid_config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        let evidence = &self.evidence_multipliers;
        let patient = &self.patient_multipliers;
        let multipliers = [
            ("evidence_multipliers.high", evidence.high),
            ("evidence_multipliers.moderate", evidence.moderate),
            ("evidence_multipliers.low", evidence.low),
            ("patient_multipliers.elderly", patient.elderly),
            ("patient_multipliers.renal_impairment", patient.renal_impairment),
            ("patient_multipliers.hepatic_impairment", patient.hepatic_impairment),
            ("patient_multipliers.pregnancy", patient.pregnancy),
        ];
        for (name, value) in multipliers {
            if !value.is_finite() || value <= 0.0 {
                return Err(ScoringError::invalid_config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        let t = &self.thresholds;
        if !(0.0 < t.moderate && t.moderate < t.high && t.high < t.critical) {
            return Err(ScoringError::invalid_config(format!(
                "thresholds must satisfy 0 < moderate < high < critical, got {} / {} / {}",
                t.moderate, t.high, t.critical
            )));
        }

        if !self.max_display_score.is_finite() || self.max_display_score <= 0.0 {
            return Err(ScoringError::invalid_config(format!(
                "max_display_score must be positive, got {}",
                self.max_display_score
            )));
        }

        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            severity_points: SeverityPoints::default(),
            evidence_multipliers: EvidenceMultipliers::default(),
            evidence_weighting: EvidenceWeighting::Compounding,
            patient_multipliers: PatientMultipliers::default(),
            thresholds: RiskThresholds::default(),
            max_display_score: 100.0,
        }
    }
}

impl Default for SeverityPoints {
    fn default() -> Self {
        Self {
            contraindicated: 100.0,
            major: 50.0,
            moderate: 25.0,
            minor: 10.0,
        }
    }
}

impl Default for EvidenceMultipliers {
    fn default() -> Self {
        Self {
            high: 1.2,
            moderate: 1.0,
            low: 0.8,
        }
    }
}

impl Default for PatientMultipliers {
    fn default() -> Self {
        Self {
            elderly_age: 65.0,
            elderly: 1.15,
            renal_impairment: 1.3,
            hepatic_impairment: 1.25,
            pregnancy: 1.4,
        }
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            critical: 100.0,
            high: 60.0,
            moderate: 30.0,
        }
    }
}
