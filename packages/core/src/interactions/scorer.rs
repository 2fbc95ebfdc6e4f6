//! Interaction Risk Scorer - severity/evidence weighted scoring over the
//! interaction database, adjusted by patient factors

use std::collections::HashSet;
use std::sync::Arc;

use crate::interactions::{
    config::{EvidenceWeighting, ScoringConfig},
    database::InteractionDatabase,
    error::ScoringError,
    selection::SelectedDrugs,
    types::*,
};

/// Scored assessment together with the score it was classified on
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    /// Accumulated score before display clamping.
    pub raw_score: f64,
    pub assessment: RiskAssessment,
}

/// Stateless scorer over a shared, read-only interaction database.
///
/// Every call recomputes the assessment from scratch; nothing is cached
/// between invocations, so a single scorer can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct InteractionRiskScorer {
    database: Arc<InteractionDatabase>,
    config: ScoringConfig,
}

impl InteractionRiskScorer {
    pub fn new(database: Arc<InteractionDatabase>, config: ScoringConfig) -> Result<Self, ScoringError> {
        config.validate()?;
        Ok(Self { database, config })
    }

    /// Assess a drug combination.
    pub fn assess(&self, selected: &SelectedDrugs, factors: Option<&PatientFactors>) -> RiskAssessment {
        self.evaluate(selected, factors).assessment
    }

    /// Assess a drug combination and keep the matched interactions for display.
    pub fn evaluate(&self, selected: &SelectedDrugs, factors: Option<&PatientFactors>) -> InteractionReport {
        let matched = self.database.matching(selected);

        let mut severity_breakdown = SeverityBreakdown::default();
        for record in &matched {
            severity_breakdown.record(record.severity);
        }

        let outcome = score_interactions(&self.config, matched.iter().copied(), factors);

        tracing::debug!(
            drugs = ?selected.names(),
            matched = matched.len(),
            raw_score = outcome.raw_score,
            overall_risk = %outcome.assessment.overall_risk,
            "Interaction risk assessed"
        );

        InteractionReport {
            selected_drugs: selected.names().to_vec(),
            interaction_count: matched.len(),
            interactions: matched.into_iter().cloned().collect(),
            severity_breakdown,
            raw_score: outcome.raw_score,
            assessment: outcome.assessment,
        }
    }

    pub fn database(&self) -> &InteractionDatabase {
        &self.database
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }
}

/// Score an already-filtered list of interactions, in the given order.
pub fn score_interactions<'a, I>(
    config: &ScoringConfig,
    interactions: I,
    factors: Option<&PatientFactors>,
) -> ScoreOutcome
where
    I: IntoIterator<Item = &'a InteractionRecord>,
{
    let mut score = 0.0_f64;
    let mut contraindications_found = false;
    let mut recommendations = Vec::new();
    let mut monitoring_requirements = Vec::new();

    for record in interactions {
        let points = config.severity_points.for_severity(record.severity);
        let evidence = config.evidence_multipliers.for_level(record.evidence_level);

        match config.evidence_weighting {
            EvidenceWeighting::Compounding => {
                score += points;
                score *= evidence;
            }
            EvidenceWeighting::PerInteraction => score += points * evidence,
        }

        if record.severity == Severity::Contraindicated {
            contraindications_found = true;
        }

        if let Some(management) = &record.clinical_management {
            recommendations.push(management.clone());
        }

        if record.severity.requires_monitoring() {
            monitoring_requirements.push(format!("Monitor for {}", record.description.to_lowercase()));
        }
    }

    let raw_score = apply_patient_factors(config, score, factors);
    let overall_risk = classify(config, raw_score, contraindications_found);

    ScoreOutcome {
        raw_score,
        assessment: RiskAssessment {
            overall_risk,
            risk_score: raw_score.clamp(0.0, config.max_display_score),
            clinical_significance: overall_risk.clinical_significance().to_string(),
            recommendations: dedup_preserving_order(recommendations),
            monitoring_requirements: dedup_preserving_order(monitoring_requirements),
            contraindications_found,
        },
    }
}

/// Multiply `score` by every patient factor that applies.
pub fn apply_patient_factors(config: &ScoringConfig, score: f64, factors: Option<&PatientFactors>) -> f64 {
    let Some(factors) = factors else {
        return score;
    };
    let multipliers = &config.patient_multipliers;
    let mut score = score;

    if factors.age.is_some_and(|age| age > multipliers.elderly_age) {
        score *= multipliers.elderly;
    }
    if factors.renal_function.is_some_and(|f| f.is_impaired()) {
        score *= multipliers.renal_impairment;
    }
    if factors.hepatic_function.is_some_and(|f| f.is_impaired()) {
        score *= multipliers.hepatic_impairment;
    }
    if factors.pregnancy == Some(true) {
        score *= multipliers.pregnancy;
    }

    score
}

/// Tier for an unclamped score. Any contraindication is critical.
pub fn classify(config: &ScoringConfig, raw_score: f64, contraindications_found: bool) -> OverallRisk {
    let thresholds = &config.thresholds;
    if contraindications_found || raw_score >= thresholds.critical {
        OverallRisk::Critical
    } else if raw_score >= thresholds.high {
        OverallRisk::High
    } else if raw_score >= thresholds.moderate {
        OverallRisk::Moderate
    } else {
        OverallRisk::Low
    }
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
