use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::interactions::{EvidenceWeighting, OrganFunction, PatientFactors};

/// Interaction risk service CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "interaction-risk",
    version,
    about = "Drug-interaction risk scoring for antibiotic decision support"
)]
pub struct Cli {
    /// Address the HTTP server listens on
    #[arg(long)]
    pub bind_addr: Option<SocketAddr>,

    /// Extra JSON file of interaction records appended to the built-in catalog
    #[arg(long)]
    pub interactions_file: Option<PathBuf>,

    /// Evidence weighting mode (compounding or per_interaction)
    #[arg(long)]
    pub evidence_weighting: Option<EvidenceWeighting>,

    /// Score these medications, print the documentation block and exit
    #[arg(long, num_args = 1.., value_name = "DRUG")]
    pub check: Vec<String>,

    /// Patient age in years (with --check)
    #[arg(long, requires = "check")]
    pub age: Option<f64>,

    /// Renal function: normal, mild, moderate or severe (with --check)
    #[arg(long, value_parser = parse_organ_function, requires = "check")]
    pub renal: Option<OrganFunction>,

    /// Hepatic function: normal, mild, moderate or severe (with --check)
    #[arg(long, value_parser = parse_organ_function, requires = "check")]
    pub hepatic: Option<OrganFunction>,

    /// Patient is pregnant (with --check)
    #[arg(long, requires = "check")]
    pub pregnant: bool,
}

impl Cli {
    /// Patient factors given on the command line, if any.
    pub fn patient_factors(&self) -> Option<PatientFactors> {
        if self.age.is_none() && self.renal.is_none() && self.hepatic.is_none() && !self.pregnant {
            return None;
        }
        Some(PatientFactors {
            age: self.age,
            renal_function: self.renal,
            hepatic_function: self.hepatic,
            pregnancy: self.pregnant.then_some(true),
            ..Default::default()
        })
    }
}

fn parse_organ_function(value: &str) -> Result<OrganFunction, String> {
    match value.trim().to_lowercase().as_str() {
        "normal" => Ok(OrganFunction::Normal),
        "mild" => Ok(OrganFunction::Mild),
        "moderate" => Ok(OrganFunction::Moderate),
        "severe" => Ok(OrganFunction::Severe),
        other => Err(format!(
            "invalid organ function '{}', expected normal, mild, moderate or severe",
            other
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_mode_collects_drugs_and_factors() {
        let cli = Cli::parse_from([
            "interaction-risk",
            "--check",
            "warfarin",
            "fluconazole",
            "--age",
            "70",
            "--renal",
            "mild",
            "--pregnant",
        ]);

        assert_eq!(cli.check, vec!["warfarin", "fluconazole"]);
        let factors = cli.patient_factors().unwrap();
        assert_eq!(factors.age, Some(70.0));
        assert_eq!(factors.renal_function, Some(OrganFunction::Mild));
        assert_eq!(factors.hepatic_function, None);
        assert_eq!(factors.pregnancy, Some(true));
    }

    #[test]
    fn server_mode_has_no_patient_factors() {
        let cli = Cli::parse_from(["interaction-risk", "--bind-addr", "127.0.0.1:9000"]);
        assert!(cli.check.is_empty());
        assert!(cli.patient_factors().is_none());
        assert_eq!(cli.bind_addr, Some("127.0.0.1:9000".parse().unwrap()));
    }

    #[test]
    fn patient_flags_require_check() {
        assert!(Cli::try_parse_from(["interaction-risk", "--age", "70"]).is_err());
    }

    #[test]
    fn invalid_weighting_is_rejected() {
        assert!(Cli::try_parse_from(["interaction-risk", "--evidence-weighting", "linear"]).is_err());
    }
}
