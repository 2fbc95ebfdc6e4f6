//! Plain-text clinical documentation block for a scored combination

use crate::interactions::types::InteractionReport;

/// Recommendations beyond this count are left to the full report.
pub const MAX_DOCUMENTED_RECOMMENDATIONS: usize = 3;

/// Render the documentation block a clinician pastes into the chart.
///
/// The score is printed exactly as the report's `riskScore`, so 62.5 stays
/// 62.5 and whole scores print without a decimal point.
pub fn render_documentation(report: &InteractionReport) -> String {
    let assessment = &report.assessment;
    let mut lines = vec![
        "DRUG INTERACTION ASSESSMENT".to_string(),
        format!("Selected Medications: {}", report.selected_drugs.join(", ")),
        format!("Risk Level: {}", assessment.overall_risk.as_str().to_uppercase()),
        format!("Risk Score: {}/100", assessment.risk_score),
        format!("Interactions Found: {}", report.interaction_count),
    ];

    if assessment.contraindications_found {
        lines.push("WARNING: CONTRAINDICATED COMBINATION DETECTED".to_string());
    }

    if !assessment.recommendations.is_empty() {
        lines.push("Recommendations:".to_string());
        lines.extend(
            assessment
                .recommendations
                .iter()
                .take(MAX_DOCUMENTED_RECOMMENDATIONS)
                .map(|recommendation| format!("- {}", recommendation)),
        );
    }

    let mut doc = lines.join("\n");
    doc.push('\n');
    doc
}
